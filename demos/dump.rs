// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  dump.rs - Extraction demo for infrared code spreadsheets.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use clap::Parser;

use irsheet::converter::*;
use irsheet::loader::*;
use irsheet::protocol::ProntoDecoder;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,

    /// Name of the page listing the devices.
    #[arg(long, default_value = DEFAULT_INDEX_PAGE)]
    index_page: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let source = match SourceDocument::open(&args.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error opening file {:?}: {}", &args.file, error);
            return;
        }
    };

    let document = match source.parse() {
        Ok(document) => document,
        Err(error) => {
            eprintln!("Error parsing file {:?}: {}", &args.file, error);
            return;
        }
    };

    let options = ConvertOptions::default().with_index_page(args.index_page);
    let converter = Converter::new(ProntoDecoder::default(), options);
    let conversion = match converter.convert(&source, &document) {
        Ok(conversion) => conversion,
        Err(error) => {
            eprintln!("Error converting file {:?}: {}", &args.file, error);
            return;
        }
    };

    for remote in conversion.remote_set.remotes.values() {
        println!("{}", remote.name);
        for command_set in &remote.command_sets {
            println!("  [{}] {:?}", command_set.name, command_set.notes);
            for command in command_set.commands.values() {
                println!(
                    "    {:<24} {} {:?}",
                    command.name, command.protocol, command.parameters
                );
            }
        }
    }

    println!("{:#?}", conversion.report);
}
