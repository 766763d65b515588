// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  irsheet.rs - Convert an infrared code spreadsheet into a Girr file.
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

use std::fs;
use std::io;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use irsheet::converter::*;
use irsheet::export::write_csv;
use irsheet::girr::{self, Charset};
use irsheet::loader::SourceDocument;
use irsheet::protocol::ProntoDecoder;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Girr XML remote definitions.
    Girr,
    /// One CSV line per command.
    Csv,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to write, or "-" for standard output.
    #[arg(default_value = "All_Sony_Codes V1.0.girr")]
    outfile: String,

    /// Character set of the Girr output.
    #[arg(default_value = "US-ASCII")]
    charset: String,

    /// The spreadsheet to read.
    #[arg(short, long, default_value = "All Sony Codes V1.0.fods")]
    input: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Girr)]
    format: Format,
}

fn run(args: &Args) -> irsheet::Result<()> {
    let charset: Charset = args.charset.parse()?;

    let source = SourceDocument::open(&args.input)?;
    let document = source.parse()?;

    let converter = Converter::new(ProntoDecoder::default(), ConvertOptions::default());
    let conversion = converter.convert(&source, &document)?;

    let bytes = match args.format {
        Format::Girr => {
            girr::serialize(&conversion.remote_set, &converter.title(&source), charset)?
        }
        Format::Csv => {
            let mut buffer = Vec::new();
            write_csv(&conversion.remote_set, &mut buffer)?;
            buffer
        }
    };

    if args.outfile == "-" {
        io::Write::write_all(&mut io::stdout().lock(), &bytes)?;
    } else {
        fs::write(&args.outfile, bytes)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => {
            if args.outfile != "-" {
                println!("{} successfully written", args.outfile);
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            log::error!("Error converting {:?}: {}", &args.input, error);
            ExitCode::FAILURE
        }
    }
}
