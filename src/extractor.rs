// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/extractor.rs - Row extraction for infrared code spreadsheets.
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
 * # `extractor` Module
 *
 * Reads rows out of spreadsheet pages by column position.
 *
 * The index page lists one device page per row:
 *
 * | column | content                                  |
 * |--------|------------------------------------------|
 * | 0      | device number, as a link to its page     |
 * | 1      | device name                              |
 * | 2      | bit count (unused)                       |
 * | 3      | comment                                  |
 *
 * Each device page lists one command per row, with the command name in
 * column 4 and its Pronto code in column 5.
 */

use roxmltree::Node;

use crate::error::Result;
use crate::model::{Command, CommandSet, ENGLISH};
use crate::namespace::{ResolvedName, Vocabulary, attribute, elements, first_element, text_content};
use crate::pages::Page;
use crate::protocol::SignalDecoder;
use crate::text::normalize;

/// Minimum number of cells in a usable index page row.
pub const INDEX_MIN_CELLS: usize = 5;
/// Minimum number of cells in a usable command row.
pub const COMMAND_MIN_CELLS: usize = 6;
/// Signal cells shorter than this are placeholders, not codes.
pub const MIN_SIGNAL_LENGTH: usize = 20;

const VISIBILITY_COLLAPSE: &str = "collapse";

const DEVICE_NUMBER_COLUMN: usize = 0;
const DEVICE_NAME_COLUMN: usize = 1;
const COMMENT_COLUMN: usize = 3;
const COMMAND_NAME_COLUMN: usize = 4;
const SIGNAL_COLUMN: usize = 5;

/// A row of a page, before any column is interpreted.
#[derive(Debug, Clone)]
pub struct RawRow<'a, 'input> {
    /// Whether the row is collapsed (hidden) in the spreadsheet.
    pub hidden: bool,
    pub cells: Vec<Node<'a, 'input>>,
}

/// One device listed on the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Name of the device's page.
    pub device_number: String,
    /// Name of the remote the device's commands belong to.
    pub device_name: String,
    pub comment: String,
}

/// Why a command row produced no command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSkip {
    /// Fewer than [`COMMAND_MIN_CELLS`] cells.
    Narrow,
    /// The signal cell has no paragraph.
    MissingSignal,
    /// The signal is shorter than [`MIN_SIGNAL_LENGTH`].
    ShortSignal,
    /// The name cell has no paragraph, or only whitespace.
    MissingName,
}

/// Per-page extraction statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageStats {
    /// Rows that produced a command, including later duplicates.
    pub commands: usize,
    /// Rows skipped as [`RowSkip::Narrow`].
    pub narrow_rows: usize,
    /// Rows skipped as [`RowSkip::MissingSignal`].
    pub missing_signals: usize,
    /// Rows skipped as [`RowSkip::ShortSignal`].
    pub short_signals: usize,
    /// Rows skipped as [`RowSkip::MissingName`].
    pub missing_names: usize,
    /// Commands that replaced an earlier command of the same name.
    pub replaced_commands: usize,
}

impl PageStats {
    fn record(&mut self, skip: RowSkip) {
        match skip {
            RowSkip::Narrow => self.narrow_rows += 1,
            RowSkip::MissingSignal => self.missing_signals += 1,
            RowSkip::ShortSignal => self.short_signals += 1,
            RowSkip::MissingName => self.missing_names += 1,
        }
    }

    /// Total number of command rows that produced no command.
    pub fn skipped(&self) -> usize {
        self.narrow_rows + self.missing_signals + self.short_signals + self.missing_names
    }
}

/// Positional row reader over one document's vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> Extractor<'v> {
    /// Creates an extractor for documents resolved to `vocabulary`.
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Every row of `page`, in document order. Each call walks the page anew.
    pub fn rows<'a, 'input>(
        &self,
        page: Page<'a, 'input>,
    ) -> impl Iterator<Item = RawRow<'a, 'input>> + 'v
    where
        'input: 'a,
        'a: 'v,
    {
        let vocabulary = self.vocabulary;
        elements(page.node, &vocabulary.table_row).map(move |row| RawRow {
            hidden: attribute(row, &vocabulary.table_visibility) == Some(VISIBILITY_COLLAPSE),
            cells: elements(row, &vocabulary.table_cell).collect(),
        })
    }

    /// Text of the first `name` element in cell `column`, if there is one.
    fn cell_text(
        &self,
        row: &RawRow,
        column: usize,
        name: &Option<ResolvedName>,
    ) -> Option<String> {
        let cell = *row.cells.get(column)?;
        first_element(cell, name).map(text_content)
    }

    /// Interprets an index page row. Returns `None` for rows that are too
    /// narrow; visibility is left to the caller.
    pub fn index_entry(&self, row: &RawRow) -> Option<IndexEntry> {
        if row.cells.len() < INDEX_MIN_CELLS {
            return None;
        }

        let text_a = &self.vocabulary.text_a;
        let text_p = &self.vocabulary.text_p;
        let device_number = self
            .cell_text(row, DEVICE_NUMBER_COLUMN, text_a)
            .unwrap_or_default()
            .trim()
            .to_string();
        let device_name = self
            .cell_text(row, DEVICE_NAME_COLUMN, text_p)
            .unwrap_or_default()
            .trim()
            .to_string();
        let comment = self.cell_text(row, COMMENT_COLUMN, text_p).unwrap_or_default();

        Some(IndexEntry {
            device_number,
            device_name,
            comment,
        })
    }

    /// Builds the command described by a device page row.
    ///
    /// Absent or placeholder cells skip the row. The signal is decoded before
    /// the name is looked at, and decoder errors are returned as-is.
    pub fn command<D: SignalDecoder>(
        &self,
        row: &RawRow,
        decoder: &D,
    ) -> Result<std::result::Result<Command, RowSkip>> {
        if row.cells.len() < COMMAND_MIN_CELLS {
            return Ok(Err(RowSkip::Narrow));
        }

        let text_p = &self.vocabulary.text_p;
        let Some(signal) = self.cell_text(row, SIGNAL_COLUMN, text_p) else {
            return Ok(Err(RowSkip::MissingSignal));
        };
        if signal.chars().count() < MIN_SIGNAL_LENGTH {
            return Ok(Err(RowSkip::ShortSignal));
        }

        let decode = decoder.decode(&signal)?;

        let name = match self.cell_text(row, COMMAND_NAME_COLUMN, text_p) {
            Some(name) if !name.trim().is_empty() => normalize(&name).into_owned(),
            _ => return Ok(Err(RowSkip::MissingName)),
        };

        Ok(Ok(Command {
            name,
            protocol: decode.protocol,
            parameters: decode.parameters,
        }))
    }

    /// Collects every command on a device page into a command set named
    /// `device_number`. Returns `None` when the page has no commands.
    pub fn command_set<D: SignalDecoder>(
        &self,
        page: Page,
        device_number: &str,
        comment: &str,
        decoder: &D,
        stats: &mut PageStats,
    ) -> Result<Option<CommandSet>> {
        let mut command_set = CommandSet::new(device_number);

        for row in self.rows(page) {
            match self.command(&row, decoder)? {
                Ok(command) => {
                    stats.commands += 1;
                    if let Some(previous) = command_set.insert_command(command) {
                        log::debug!(
                            "Page {:?}: command {:?} redefined",
                            device_number,
                            previous.name
                        );
                        stats.replaced_commands += 1;
                    }
                }
                Err(skip) => stats.record(skip),
            }
        }

        if command_set.is_empty() {
            return Ok(None);
        }
        command_set.add_note(ENGLISH, comment);
        Ok(Some(command_set))
    }
}
