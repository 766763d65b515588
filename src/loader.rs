// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/loader.rs - Loader for flat OpenDocument spreadsheet files.
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

use std::fs::File;
use std::io::BufReader;
use std::io::prelude::*;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn decompress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut buffer = Vec::with_capacity(data.len() * 4);
    decoder.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// The raw XML text of a flat OpenDocument spreadsheet (`.fods`), optionally
/// gzip-compressed on disk.
#[derive(Debug)]
pub struct SourceDocument {
    /// The path the document was read from.
    pub path: String,
    /// The XML text.
    pub content: String,
}

impl SourceDocument {
    /// Reads a spreadsheet from disk, inflating it first if it is gzipped.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the `.fods` or `.fods.gz` file.
    ///
    /// # Returns
    ///
    /// A `Result` containing the document text, or [`Error::DocumentOpen`] if
    /// the file cannot be read, inflated or decoded as UTF-8.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().to_string();
        let open_error = |reason: String| Error::DocumentOpen {
            path: path.clone(),
            reason,
        };

        let file = File::open(&path).map_err(|e| open_error(e.to_string()))?;
        let mut reader = BufReader::new(file);

        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|e| open_error(e.to_string()))?;

        if buffer.starts_with(&GZIP_MAGIC) {
            log::debug!("{}: inflating gzip-compressed document", path);
            buffer = decompress(&buffer).map_err(|e| open_error(format!("gzip: {}", e)))?;
        }

        let content = String::from_utf8(buffer).map_err(|e| open_error(e.to_string()))?;

        Ok(Self { path, content })
    }

    /// Wraps XML text that is already in memory.
    pub fn from_string(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// The final component of [`SourceDocument::path`].
    pub fn file_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.clone())
    }

    /// Parses the XML text into a document tree that borrows from `self`.
    pub fn parse(&self) -> Result<roxmltree::Document<'_>> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        roxmltree::Document::parse_with_options(&self.content, options).map_err(|e| {
            Error::DocumentOpen {
                path: self.path.clone(),
                reason: format!("XML parse error: {}", e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    const XML: &str = r#"<?xml version="1.0"?><office:document xmlns:office="urn:o"/>"#;

    #[test]
    fn reads_plain_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(XML.as_bytes()).unwrap();

        let source = SourceDocument::open(file.path()).unwrap();
        assert_eq!(source.content, XML);
        assert!(source.parse().is_ok());
    }

    #[test]
    fn inflates_gzip_file() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(XML.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&compressed).unwrap();

        let source = SourceDocument::open(file.path()).unwrap();
        assert_eq!(source.content, XML);
    }

    #[test]
    fn missing_file_is_open_error() {
        let err = SourceDocument::open("/nonexistent/irsheet/input.fods").unwrap_err();
        assert!(matches!(err, Error::DocumentOpen { .. }));
    }

    #[test]
    fn malformed_xml_is_open_error() {
        let source = SourceDocument::from_string("bad.fods", "<office:document>");
        assert!(matches!(source.parse(), Err(Error::DocumentOpen { .. })));
    }

    #[test]
    fn file_name_strips_directories() {
        let source = SourceDocument::from_string("some/dir/codes.fods", XML);
        assert_eq!(source.file_name(), "codes.fods");
    }
}
