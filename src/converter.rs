// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/converter.rs - Spreadsheet to remote set conversion.
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
 * # `converter` Module
 *
 * Drives a full conversion: index the pages, walk the index page, extract
 * every referenced device page, and group the resulting command sets into
 * remotes.
 *
 * ## Usage Example
 *
 * ```no_run
 * use irsheet::converter::{ConvertOptions, Converter};
 * use irsheet::loader::SourceDocument;
 * use irsheet::protocol::ProntoDecoder;
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let source = SourceDocument::open("All Sony Codes V1.0.fods")?;
 *     let document = source.parse()?;
 *
 *     let converter = Converter::new(ProntoDecoder::default(), ConvertOptions::default());
 *     let conversion = converter.convert(&source, &document)?;
 *
 *     for remote in conversion.remote_set.remotes.values() {
 *         println!("{}: {} command sets", remote.name, remote.command_sets.len());
 *     }
 *
 *     Ok(())
 * }
 * ```
 */

use chrono::Local;

use crate::error::{Error, Result};
use crate::extractor::{Extractor, PageStats};
use crate::loader::SourceDocument;
use crate::model::{AdminData, RemoteSet, RemoteSetBuilder};
use crate::namespace::{NamespaceResolver, Vocabulary};
use crate::pages::PageIndex;
use crate::protocol::SignalDecoder;

/// Name of the page listing the devices.
pub const DEFAULT_INDEX_PAGE: &str = "Cover Page";
/// Tool identifier recorded in the output.
pub const DEFAULT_TOOL: &str = "irsheet";
/// `chrono` format of the creation date recorded in the output.
pub const DATE_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Conversion settings.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Name of the page listing the devices.
    pub index_page: String,
    /// Tool name recorded in the output and its title.
    pub tool: String,
    /// Tool version recorded in the output.
    pub tool_version: String,
    /// User recorded in the output.
    pub creating_user: String,
    /// Fixed creation date; the current local time is used when `None`.
    pub creation_date: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            index_page: DEFAULT_INDEX_PAGE.to_string(),
            tool: DEFAULT_TOOL.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            creating_user: current_user(),
            creation_date: None,
        }
    }
}

impl ConvertOptions {
    pub fn with_index_page(mut self, name: impl Into<String>) -> Self {
        self.index_page = name.into();
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn with_creating_user(mut self, user: impl Into<String>) -> Self {
        self.creating_user = user.into();
        self
    }

    pub fn with_creation_date(mut self, date: impl Into<String>) -> Self {
        self.creation_date = Some(date.into());
        self
    }
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// What a run skipped, so a silently lost device can still be noticed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Index page rows examined, excluding the header.
    pub index_rows: usize,
    /// Index rows skipped because they are collapsed.
    pub hidden_rows: usize,
    /// Index rows with too few cells.
    pub narrow_rows: usize,
    /// Device numbers whose page does not exist.
    pub unresolved_pages: Vec<String>,
    /// Device pages that yielded no commands.
    pub empty_command_sets: usize,
    /// Command sets attached to a remote.
    pub command_sets: usize,
    /// Row statistics summed over every device page.
    pub pages: PageStats,
}

impl ConversionReport {
    fn add_page(&mut self, stats: &PageStats) {
        self.pages.commands += stats.commands;
        self.pages.narrow_rows += stats.narrow_rows;
        self.pages.missing_signals += stats.missing_signals;
        self.pages.short_signals += stats.short_signals;
        self.pages.missing_names += stats.missing_names;
        self.pages.replaced_commands += stats.replaced_commands;
    }

    fn log(&self) {
        log::info!(
            "Scanned {} index rows: {} hidden, {} too narrow, {} unresolved, {} without commands",
            self.index_rows,
            self.hidden_rows,
            self.narrow_rows,
            self.unresolved_pages.len(),
            self.empty_command_sets
        );
        log::info!(
            "Extracted {} command sets with {} commands ({} duplicates replaced, {} rows skipped)",
            self.command_sets,
            self.pages.commands,
            self.pages.replaced_commands,
            self.pages.skipped()
        );
    }
}

/// The result of a successful run.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The converted remotes.
    pub remote_set: RemoteSet,
    /// What was skipped on the way.
    pub report: ConversionReport,
}

/// Converts spreadsheet documents using the signal decoder `D`.
#[derive(Debug, Clone)]
pub struct Converter<D> {
    decoder: D,
    options: ConvertOptions,
}

impl<D: SignalDecoder> Converter<D> {
    pub fn new(decoder: D, options: ConvertOptions) -> Self {
        Self { decoder, options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Title written into the output document.
    pub fn title(&self, source: &SourceDocument) -> String {
        format!("{} version of {}", self.options.tool, source.file_name())
    }

    /// Converts a parsed document. `source` supplies provenance only.
    ///
    /// Fails if the index page is missing or if any signal cannot be decoded;
    /// everything else that cannot be used is skipped and counted in the
    /// returned [`ConversionReport`].
    pub fn convert(
        &self,
        source: &SourceDocument,
        document: &roxmltree::Document,
    ) -> Result<Conversion> {
        let vocabulary = Vocabulary::new(&NamespaceResolver::from_document(document));
        let pages = PageIndex::new(document, &vocabulary);
        let extractor = Extractor::new(&vocabulary);

        let index_page = pages.lookup(&self.options.index_page).ok_or_else(|| {
            Error::DocumentStructure(format!(
                "Index page {:?} not found",
                self.options.index_page
            ))
        })?;

        let mut report = ConversionReport::default();
        let mut builder = RemoteSetBuilder::new();

        // The first row holds the column names.
        for row in extractor.rows(index_page).skip(1) {
            report.index_rows += 1;
            if row.hidden {
                report.hidden_rows += 1;
                continue;
            }
            let Some(entry) = extractor.index_entry(&row) else {
                report.narrow_rows += 1;
                continue;
            };

            let Some(page) = pages.lookup(&entry.device_number) else {
                log::warn!(
                    "Device {:?} ({:?}) has no page; skipping it",
                    entry.device_number,
                    entry.device_name
                );
                report.unresolved_pages.push(entry.device_number);
                continue;
            };

            let mut stats = PageStats::default();
            let command_set = extractor.command_set(
                page,
                &entry.device_number,
                &entry.comment,
                &self.decoder,
                &mut stats,
            )?;
            report.add_page(&stats);

            match command_set {
                Some(command_set) => {
                    log::debug!(
                        "Page {:?}: {} commands for {:?}",
                        entry.device_number,
                        command_set.commands.len(),
                        entry.device_name
                    );
                    builder.add(&entry.device_name, command_set);
                    report.command_sets += 1;
                }
                None => {
                    log::debug!("Page {:?} has no commands", entry.device_number);
                    report.empty_command_sets += 1;
                }
            }
        }

        let admin_data = AdminData {
            creating_user: self.options.creating_user.clone(),
            source: source.path.clone(),
            creation_date: self
                .options
                .creation_date
                .clone()
                .unwrap_or_else(|| Local::now().format(DATE_FORMAT).to_string()),
            tool: self.options.tool.clone(),
            tool_version: self.options.tool_version.clone(),
        };

        report.log();
        Ok(Conversion {
            remote_set: builder.build(admin_data),
            report,
        })
    }
}
