// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/pages.rs - Page (sheet) index for OpenDocument spreadsheets.
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

use indexmap::IndexMap;
use roxmltree::Node;

use crate::namespace::{Vocabulary, attribute, elements};

/// A named sheet of the spreadsheet.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a, 'input> {
    /// The sheet name shown on its tab.
    pub name: &'a str,
    /// The `table:table` element.
    pub node: Node<'a, 'input>,
}

/// Every page of a document, keyed by name. Built in a single pass.
#[derive(Debug)]
pub struct PageIndex<'a, 'input> {
    pages: IndexMap<&'a str, Page<'a, 'input>>,
}

impl<'a, 'input: 'a> PageIndex<'a, 'input> {
    /// Indexes every `table:table` element of `document` by its `table:name`.
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed spreadsheet.
    /// * `vocabulary` - The document's resolved element and attribute names.
    ///
    /// # Returns
    ///
    /// The page index. A document without a table namespace yields an empty one.
    pub fn new(document: &'a roxmltree::Document<'input>, vocabulary: &Vocabulary) -> Self {
        let mut index = Self {
            pages: IndexMap::new(),
        };
        for node in elements(document.root_element(), &vocabulary.table) {
            let name = attribute(node, &vocabulary.table_name).unwrap_or("");
            index.insert(Page { name, node });
        }
        log::debug!("Indexed {} pages", index.len());
        index
    }

    /// Records `page`. A later page with the same name replaces the earlier
    /// one (keeping its position); the replacement is logged but not an error.
    fn insert(&mut self, page: Page<'a, 'input>) {
        if let Some(previous) = self.pages.insert(page.name, page) {
            log::warn!(
                "Page {:?} is defined more than once; using the later definition",
                previous.name
            );
        }
    }

    /// Finds the page called `name`.
    pub fn lookup(&self, name: &str) -> Option<Page<'a, 'input>> {
        self.pages.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.pages.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{NamespaceResolver, first_element};

    const XML: &str = r#"<office:document
        xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
        xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0"
        xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
        <office:body><office:spreadsheet>
            <table:table table:name="Cover Page"><table:table-row/></table:table>
            <table:table table:name="12"><table:table-row><table:table-cell><text:p>first</text:p></table:table-cell></table:table-row></table:table>
            <table:table table:name="12"><table:table-row><table:table-cell><text:p>second</text:p></table:table-cell></table:table-row></table:table>
        </office:spreadsheet></office:body>
    </office:document>"#;

    #[test]
    fn indexes_pages_by_name() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let vocabulary = Vocabulary::new(&NamespaceResolver::from_document(&doc));
        let index = PageIndex::new(&doc, &vocabulary);

        assert_eq!(index.len(), 2);
        assert_eq!(index.names().collect::<Vec<_>>(), ["Cover Page", "12"]);
        assert!(index.lookup("Cover Page").is_some());
        assert!(index.lookup("13").is_none());
    }

    #[test]
    fn later_duplicate_page_wins() {
        let doc = roxmltree::Document::parse(XML).unwrap();
        let vocabulary = Vocabulary::new(&NamespaceResolver::from_document(&doc));
        let index = PageIndex::new(&doc, &vocabulary);

        let page = index.lookup("12").unwrap();
        let p = first_element(page.node, &vocabulary.text_p).unwrap();
        assert_eq!(p.text(), Some("second"));
    }

    #[test]
    fn undeclared_table_namespace_yields_no_pages() {
        let doc = roxmltree::Document::parse(
            r#"<office:document xmlns:office="urn:o"><table/></office:document>"#,
        )
        .unwrap();
        let vocabulary = Vocabulary::new(&NamespaceResolver::from_document(&doc));
        assert!(PageIndex::new(&doc, &vocabulary).is_empty());
    }
}
