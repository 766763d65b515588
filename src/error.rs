// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for the irsheet library.
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

//! Error types for the conversion pipeline.
//!
//! Only conditions that abort a run are represented here. Spreadsheet
//! variability (hidden rows, short cells, dangling page references) is
//! skipped by the extractor and counted in the
//! [`ConversionReport`](crate::converter::ConversionReport) instead.

/// Result type alias for irsheet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a conversion run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source document could not be read, inflated, or parsed as XML.
    #[error("Failed to open document {path:?}: {reason}")]
    DocumentOpen {
        /// Path of the document.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// The document parsed, but a load-bearing part of it is missing.
    #[error("Invalid document structure: {0}")]
    DocumentStructure(String),

    /// A signal cell does not hold a recognized encoded signal.
    #[error("Unrecognized signal format: {0}")]
    SignalFormat(String),

    /// A signal was recognized, but its values are structurally inconsistent.
    #[error("Invalid signal parameters: {0}")]
    ParameterValidation(String),

    /// The output could not be represented in the requested character set.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            other => Error::Encoding(format!("{:?}", other)),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => Error::Io(std::io::Error::new(io.kind(), io.to_string())),
            other => Error::Encoding(other.to_string()),
        }
    }
}
