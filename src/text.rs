// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/text.rs - Typographic character normalization.
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

use std::borrow::Cow;

/// Typographic characters spreadsheet editors like to auto-substitute, and
/// their ASCII replacements. No right-hand side appears on the left.
const TRANSLATE_TABLE: [(char, char); 5] = [
    ('\u{2013}', '-'),  // EN DASH
    ('\u{ff0b}', '+'),  // FULLWIDTH PLUS SIGN
    ('\u{201c}', '"'),  // LEFT DOUBLE QUOTATION MARK
    ('\u{201d}', '"'),  // RIGHT DOUBLE QUOTATION MARK
    ('\u{2019}', '\''), // RIGHT SINGLE QUOTATION MARK
];

fn translate(c: char) -> char {
    TRANSLATE_TABLE
        .iter()
        .find(|(from, _)| *from == c)
        .map_or(c, |(_, to)| *to)
}

/// Replaces curly quotes, en dashes and full-width plus signs with their
/// ASCII equivalents. Borrows when there is nothing to replace.
pub fn normalize(s: &str) -> Cow<'_, str> {
    if s.chars().any(|c| translate(c) != c) {
        Cow::Owned(s.chars().map(translate).collect())
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn replaces_every_table_entry() {
        assert_eq!(
            normalize("Vol\u{ff0b} \u{2013} \u{201c}Mute\u{201d} Don\u{2019}t"),
            "Vol+ - \"Mute\" Don't"
        );
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(normalize("Power On"), Cow::Borrowed("Power On")));
    }

    #[test]
    fn other_typography_is_untouched() {
        // EM DASH and LEFT SINGLE QUOTATION MARK are not in the table.
        assert_eq!(normalize("a\u{2014}b\u{2018}"), "a\u{2014}b\u{2018}");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "[a-z \u{2013}\u{ff0b}\u{201c}\u{201d}\u{2019}\u{2014}]{0,40}") {
            let once = normalize(&s).into_owned();
            prop_assert_eq!(normalize(&once).into_owned(), once);
        }

        #[test]
        fn normalized_text_has_no_table_characters(s in ".{0,60}") {
            let out = normalize(&s);
            prop_assert!(out.chars().all(|c| translate(c) == c));
        }
    }
}
