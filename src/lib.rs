// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Converter library for infrared code spreadsheets.
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

/*!
 * # `irsheet` Crate
 *
 * A library for converting spreadsheets of infrared remote control codes
 * (flat OpenDocument `.fods` files holding Pronto Hex codes) into Girr
 * remote definitions.
 *
 * This crate provides a full pipeline:
 *
 * 1. [loader]: Reads (and if needed, inflates) the spreadsheet.
 * 2. [pages]: Indexes the spreadsheet's pages by name.
 * 3. [extractor]: Reads index and command rows by column position.
 * 4. [protocol]: Decodes each Pronto code into a protocol and parameters.
 * 5. [converter]: Groups the commands into remotes.
 * 6. [girr] and [export]: Write the result.
 *
 * ## Usage Example
 *
 * ```no_run
 * use std::fs::File;
 *
 * use irsheet::converter::{ConvertOptions, Converter};
 * use irsheet::girr::{self, Charset};
 * use irsheet::loader::SourceDocument;
 * use irsheet::protocol::ProntoDecoder;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Open and parse the spreadsheet
 *     let source = SourceDocument::open("codes.fods")?;
 *     let document = source.parse()?;
 *
 *     // Extract and decode every command
 *     let converter = Converter::new(ProntoDecoder::default(), ConvertOptions::default());
 *     let conversion = converter.convert(&source, &document)?;
 *
 *     // Write the Girr file
 *     let file = File::create("codes.girr")?;
 *     girr::write(&conversion.remote_set, &converter.title(&source), file, Charset::UsAscii)?;
 *
 *     Ok(())
 * }
 * ```
 */

pub mod converter;
pub mod error;
pub mod export;
pub mod extractor;
pub mod girr;
pub mod loader;
pub mod model;
pub mod namespace;
pub mod pages;
pub mod pronto;
pub mod protocol;
pub mod text;

pub use error::{Error, Result};
