// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/namespace.rs - Namespace prefix resolution for OpenDocument XML.
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
 * # `namespace` Module
 *
 * Every element and attribute in an OpenDocument file is qualified with a
 * namespace prefix (`table:table-row`, `text:p`, ...). The prefixes are
 * whatever the document's root element declares, so the names this crate
 * looks for are resolved against those declarations once, up front, and
 * matched by namespace URI afterwards.
 */

use std::collections::HashMap;

use roxmltree::Node;

/// The synthetic prefix bound to the root element's default namespace.
pub const DEFAULT_PREFIX: &str = "default";

/// Bidirectional prefix/URI bindings taken from the document root.
#[derive(Debug, Default, Clone)]
pub struct NamespaceResolver {
    prefix_to_uri: HashMap<String, String>,
    uri_to_prefix: HashMap<String, String>,
}

/// A qualified name whose prefix has been resolved to a namespace URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// The namespace URI.
    pub uri: String,
    /// The name without its prefix.
    pub local: String,
}

impl NamespaceResolver {
    /// Captures the namespace declarations in scope on the root element.
    pub fn from_document(document: &roxmltree::Document) -> Self {
        let mut resolver = Self::default();
        for ns in document.root_element().namespaces() {
            match ns.name() {
                Some(prefix) => resolver.bind(prefix, ns.uri()),
                None if !ns.uri().is_empty() => resolver.bind(DEFAULT_PREFIX, ns.uri()),
                None => (),
            }
        }
        resolver
    }

    fn bind(&mut self, prefix: &str, uri: &str) {
        self.prefix_to_uri.insert(prefix.into(), uri.into());
        self.uri_to_prefix.insert(uri.into(), prefix.into());
    }

    /// Returns the URI bound to `prefix`, if any.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.prefix_to_uri.get(prefix).map(String::as_str)
    }

    /// Returns the prefix bound to `uri`, if any.
    pub fn prefix_of(&self, uri: &str) -> Option<&str> {
        self.uri_to_prefix.get(uri).map(String::as_str)
    }

    /// Resolves a `prefix:local` name. Names without a prefix, or with an
    /// unbound one, resolve to nothing.
    pub fn qualify(&self, qualified_name: &str) -> Option<ResolvedName> {
        let (prefix, local) = qualified_name.split_once(':')?;
        let uri = self.resolve(prefix)?;
        Some(ResolvedName {
            uri: uri.to_string(),
            local: local.to_string(),
        })
    }
}

/// The spreadsheet names used by the extractor, resolved once per document.
///
/// A `None` entry means the document does not declare the namespace, and every
/// query using it matches nothing.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// `table:table`, one per page.
    pub table: Option<ResolvedName>,
    /// `table:table-row`.
    pub table_row: Option<ResolvedName>,
    /// `table:table-cell`.
    pub table_cell: Option<ResolvedName>,
    /// `table:name`, the page name attribute.
    pub table_name: Option<ResolvedName>,
    /// `table:visibility`, the row visibility attribute.
    pub table_visibility: Option<ResolvedName>,
    /// `text:p`, a paragraph of cell text.
    pub text_p: Option<ResolvedName>,
    /// `text:a`, a hyperlink inside cell text.
    pub text_a: Option<ResolvedName>,
}

impl Vocabulary {
    /// Resolves the spreadsheet names against a document's bindings.
    ///
    /// # Arguments
    ///
    /// * `resolver` - The bindings declared on the document root.
    ///
    /// # Returns
    ///
    /// The vocabulary, with `None` for every name whose prefix is unbound.
    pub fn new(resolver: &NamespaceResolver) -> Self {
        Self {
            table: resolver.qualify("table:table"),
            table_row: resolver.qualify("table:table-row"),
            table_cell: resolver.qualify("table:table-cell"),
            table_name: resolver.qualify("table:name"),
            table_visibility: resolver.qualify("table:visibility"),
            text_p: resolver.qualify("text:p"),
            text_a: resolver.qualify("text:a"),
        }
    }
}

fn is_named(node: &Node, name: &ResolvedName) -> bool {
    node.is_element()
        && node.tag_name().name() == name.local
        && node.tag_name().namespace() == Some(name.uri.as_str())
}

/// All element descendants of `node` (excluding `node` itself) carrying `name`,
/// in document order.
pub fn elements<'a, 'input, 'n>(
    node: Node<'a, 'input>,
    name: &'n Option<ResolvedName>,
) -> impl Iterator<Item = Node<'a, 'input>> + 'n
where
    'input: 'a,
    'a: 'n,
{
    node.descendants()
        .skip(1)
        .filter(move |n| name.as_ref().is_some_and(|name| is_named(n, name)))
}

/// The first element descendant of `node` carrying `name`.
pub fn first_element<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &Option<ResolvedName>,
) -> Option<Node<'a, 'input>> {
    elements(node, name).next()
}

/// Looks up a namespaced attribute on `node`.
pub fn attribute<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &Option<ResolvedName>,
) -> Option<&'a str> {
    let name = name.as_ref()?;
    node.attribute((name.uri.as_str(), name.local.as_str()))
}

/// The concatenated text of every text node below `node`.
pub fn text_content(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
