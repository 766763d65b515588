// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/pronto.rs - Pronto Hex infrared signal parser.
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
 * # `pronto` Module
 *
 * Parses "learned" Pronto Hex codes into flash/gap durations.
 *
 * A learned code is a list of 4-digit hex words:
 *
 * ```text
 * 0000 0067 0000 000D 0060 0018 0030 0018 ...
 * |    |    |    |    \___ burst pairs (flash, gap), in carrier periods
 * |    |    |    \________ number of burst pairs in the repeat sequence
 * |    |    \_____________ number of burst pairs in the intro sequence
 * |    \__________________ carrier period, in units of 0.241246 µs
 * \_______________________ format: 0000 modulated, 0100 unmodulated
 * ```
 */

use crate::error::{Error, Result};

/// The Pronto reference clock period, in microseconds.
pub const PRONTO_CLOCK_US: f64 = 0.241246;

const LEARNED_MODULATED: u16 = 0x0000;
const LEARNED_UNMODULATED: u16 = 0x0100;
const HEADER_WORDS: usize = 4;

fn parse_word(word: &str) -> Result<u16> {
    if word.len() > 4 {
        return Err(Error::SignalFormat(format!("Pronto word {:?} is too long", word)));
    }
    // from_str_radix alone would accept a leading sign.
    if !word.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::SignalFormat(format!("{:?} is not a Pronto hex word", word)));
    }
    u16::from_str_radix(word, 16).map_err(|e| Error::SignalFormat(format!("{:?}: {}", word, e)))
}

/// A decoded Pronto signal. Durations are in microseconds and alternate
/// flash, gap, flash, gap...
#[derive(Debug, Clone, PartialEq)]
pub struct ProntoSignal {
    /// Carrier frequency in Hz, or 0 for unmodulated signals.
    pub frequency: f64,
    /// Sent once.
    pub intro: Vec<f64>,
    /// Sent for as long as the button is held.
    pub repeat: Vec<f64>,
}

impl ProntoSignal {
    /// Parses a learned Pronto Hex code.
    ///
    /// # Arguments
    ///
    /// * `text` - Whitespace-separated hex words.
    ///
    /// # Returns
    ///
    /// A `Result` containing the signal, [`Error::SignalFormat`] if the text
    /// is not a supported Pronto code, or [`Error::ParameterValidation`] if its
    /// header disagrees with its body.
    pub fn parse(text: &str) -> Result<Self> {
        let words = text
            .split_whitespace()
            .map(parse_word)
            .collect::<Result<Vec<u16>>>()?;

        if words.len() < HEADER_WORDS {
            return Err(Error::SignalFormat(format!(
                "Pronto code has {} words, at least {} are required",
                words.len(),
                HEADER_WORDS
            )));
        }

        let modulated = match words[0] {
            LEARNED_MODULATED => true,
            LEARNED_UNMODULATED => false,
            other => {
                return Err(Error::SignalFormat(format!(
                    "Pronto type {:04X} is not supported",
                    other
                )));
            }
        };

        let frequency_code = words[1];
        if frequency_code == 0 {
            return Err(Error::ParameterValidation(
                "Pronto frequency code is zero".to_string(),
            ));
        }
        let period_us = f64::from(frequency_code) * PRONTO_CLOCK_US;
        let frequency = if modulated {
            1_000_000.0 / period_us
        } else {
            0.0
        };

        let intro_pairs = usize::from(words[2]);
        let repeat_pairs = usize::from(words[3]);
        if intro_pairs + repeat_pairs == 0 {
            return Err(Error::ParameterValidation(
                "Pronto code has empty intro and repeat sequences".to_string(),
            ));
        }

        let expected = HEADER_WORDS + 2 * (intro_pairs + repeat_pairs);
        if words.len() != expected {
            return Err(Error::ParameterValidation(format!(
                "Pronto code has {} words, but its header announces {}",
                words.len(),
                expected
            )));
        }

        let durations: Vec<f64> = words[HEADER_WORDS..]
            .iter()
            .map(|&w| f64::from(w) * period_us)
            .collect();
        let (intro, repeat) = durations.split_at(2 * intro_pairs);

        Ok(Self {
            frequency,
            intro: intro.to_vec(),
            repeat: repeat.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_learned_code() {
        let signal = ProntoSignal::parse("0000 0067 0001 0001 0060 0018 0030 03F6").unwrap();

        assert!((signal.frequency - 40_244.0).abs() < 10.0);
        assert_eq!(signal.intro.len(), 2);
        assert_eq!(signal.repeat.len(), 2);
        let period = 103.0 * PRONTO_CLOCK_US;
        assert!((signal.intro[0] - 96.0 * period).abs() < 1e-6);
        assert!((signal.repeat[1] - 1014.0 * period).abs() < 1e-6);
    }

    #[test]
    fn unmodulated_code_has_zero_frequency() {
        let signal = ProntoSignal::parse("0100 0067 0000 0001 0060 0018").unwrap();
        assert_eq!(signal.frequency, 0.0);
        assert!(signal.intro.is_empty());
    }

    #[test]
    fn lowercase_and_extra_whitespace_are_accepted() {
        assert!(ProntoSignal::parse("  0000 006d\t0000 0001\n0060 03f6 ").is_ok());
    }

    #[test]
    fn non_hex_is_format_error() {
        let err = ProntoSignal::parse("0000 0067 0000 0001 ZZZZ 0018").unwrap_err();
        assert!(matches!(err, Error::SignalFormat(_)));
    }

    #[test]
    fn signed_word_is_format_error() {
        for code in [
            "0000 +067 0000 0001 0060 0018",
            "0000 0067 0000 0001 -060 0018",
        ] {
            let err = ProntoSignal::parse(code).unwrap_err();
            assert!(matches!(err, Error::SignalFormat(_)), "{}", code);
        }
    }

    #[test]
    fn overlong_word_is_format_error() {
        let err = ProntoSignal::parse("0000 00067 0000 0001 0060 0018").unwrap_err();
        assert!(matches!(err, Error::SignalFormat(_)));
    }

    #[test]
    fn unsupported_type_is_format_error() {
        let err = ProntoSignal::parse("5000 0073 0000 0001 0001 0001").unwrap_err();
        assert!(matches!(err, Error::SignalFormat(_)));
    }

    #[test]
    fn too_few_words_is_format_error() {
        assert!(matches!(
            ProntoSignal::parse("0000 0067"),
            Err(Error::SignalFormat(_))
        ));
    }

    #[test]
    fn length_mismatch_is_parameter_error() {
        let err = ProntoSignal::parse("0000 0067 0000 0002 0060 0018").unwrap_err();
        assert!(matches!(err, Error::ParameterValidation(_)));
    }

    #[test]
    fn zero_frequency_is_parameter_error() {
        let err = ProntoSignal::parse("0000 0000 0000 0001 0060 0018").unwrap_err();
        assert!(matches!(err, Error::ParameterValidation(_)));
    }

    #[test]
    fn empty_sequences_are_parameter_error() {
        let err = ProntoSignal::parse("0000 0067 0000 0000").unwrap_err();
        assert!(matches!(err, Error::ParameterValidation(_)));
    }
}
