// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/protocol.rs - Infrared protocol decoder.
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
 * # `protocol` Module
 *
 * Turns an encoded signal into a protocol name and its parameters.
 *
 * The conversion pipeline only depends on the [`SignalDecoder`] trait. The
 * built-in [`ProntoDecoder`] understands Pronto Hex and recognizes the Sony
 * (SIRC), NEC1 and RC5 protocols.
 *
 * ## Usage Example
 *
 * ```
 * use irsheet::protocol::{ProntoDecoder, SignalDecoder};
 *
 * let decode = ProntoDecoder::default().decode(
 *     "0000 0067 0000 000D 0060 0018 0030 0018 0018 0018 0030 0018 0018 0018 \
 *      0030 0018 0018 0018 0018 0018 0030 0018 0018 0018 0018 0018 0018 0018 \
 *      0018 03F6",
 * )?;
 * assert_eq!(decode.protocol, "Sony12");
 * assert_eq!(decode.parameters["D"], 1);
 * assert_eq!(decode.parameters["F"], 21);
 * # Ok::<(), irsheet::Error>(())
 * ```
 */

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::pronto::ProntoSignal;

/// The result of decoding one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decode {
    /// Protocol name, e.g. `Sony12`.
    pub protocol: String,
    /// Parameter values keyed by parameter name.
    pub parameters: IndexMap<String, i64>,
}

impl Decode {
    fn new(protocol: &str, parameters: &[(&str, i64)]) -> Self {
        Self {
            protocol: protocol.to_string(),
            parameters: parameters
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }
}

/// Maps the raw text of a signal cell to its best decode.
///
/// Errors must be [`Error::SignalFormat`] for text that is not a recognized
/// signal and [`Error::ParameterValidation`] for a recognized but inconsistent
/// one.
pub trait SignalDecoder {
    fn decode(&self, raw: &str) -> Result<Decode>;
}

impl<D: SignalDecoder + ?Sized> SignalDecoder for &D {
    fn decode(&self, raw: &str) -> Result<Decode> {
        (**self).decode(raw)
    }
}

/// Pronto Hex decoder for the Sony, NEC1 and RC5 protocols.
#[derive(Debug, Clone)]
pub struct ProntoDecoder {
    /// Allowed deviation from a nominal duration, as a fraction of it.
    pub relative_tolerance: f64,
    /// Allowed deviation for short durations, in microseconds.
    pub absolute_tolerance: f64,
}

impl Default for ProntoDecoder {
    fn default() -> Self {
        Self {
            relative_tolerance: 0.35,
            absolute_tolerance: 100.0,
        }
    }
}

const SONY_UNIT: f64 = 600.0;
const NEC_UNIT: f64 = 564.0;
const RC5_UNIT: f64 = 889.0;
/// Lead-in pair, 32 bit pairs, stop flash and lead-out gap.
const NEC1_FRAME: usize = 68;

type Matcher = fn(&ProntoDecoder, &[f64]) -> Option<Decode>;

const MATCHERS: [Matcher; 3] = [
    ProntoDecoder::sony,
    ProntoDecoder::nec1,
    ProntoDecoder::rc5,
];

impl SignalDecoder for ProntoDecoder {
    fn decode(&self, raw: &str) -> Result<Decode> {
        let signal = ProntoSignal::parse(raw)?;

        for sequence in [&signal.repeat, &signal.intro] {
            if sequence.is_empty() {
                continue;
            }
            if let Some(decode) = MATCHERS.iter().find_map(|matcher| matcher(self, sequence)) {
                log::trace!("Decoded {:?} as {:?}", raw, decode);
                return Ok(decode);
            }
        }

        Err(Error::SignalFormat(format!(
            "No known protocol matches {:?}",
            raw
        )))
    }
}

impl ProntoDecoder {
    fn close(&self, actual: f64, nominal: f64) -> bool {
        let tolerance = (nominal * self.relative_tolerance).max(self.absolute_tolerance);
        (actual - nominal).abs() <= tolerance
    }

    /// Sony SIRC: `<1,-1|2,-1>(4,-1,F:7,D:5|8,S:0|8,^45m)`, unit 600 µs.
    fn sony(&self, durations: &[f64]) -> Option<Decode> {
        let durations = leading_frame(durations, |gap| self.close(gap, SONY_UNIT));
        if durations.len() < 4 || durations.len() % 2 != 0 {
            return None;
        }
        if !self.close(durations[0], 4.0 * SONY_UNIT) || !self.close(durations[1], SONY_UNIT) {
            return None;
        }

        let bit_count = durations.len() / 2 - 1;
        if ![12, 15, 20].contains(&bit_count) {
            return None;
        }

        let mut bits = Vec::with_capacity(bit_count);
        for (i, pair) in durations[2..].chunks_exact(2).enumerate() {
            let (flash, gap) = (pair[0], pair[1]);
            let last = i == bit_count - 1;
            if !last && !self.close(gap, SONY_UNIT) {
                return None;
            }
            if self.close(flash, 2.0 * SONY_UNIT) {
                bits.push(true);
            } else if self.close(flash, SONY_UNIT) {
                bits.push(false);
            } else {
                return None;
            }
        }

        let f = lsb_first(&bits[0..7]);
        let decode = match bit_count {
            12 => Decode::new("Sony12", &[("D", lsb_first(&bits[7..12])), ("F", f)]),
            15 => Decode::new("Sony15", &[("D", lsb_first(&bits[7..15])), ("F", f)]),
            _ => Decode::new(
                "Sony20",
                &[
                    ("D", lsb_first(&bits[7..12])),
                    ("S", lsb_first(&bits[12..20])),
                    ("F", f),
                ],
            ),
        };
        Some(decode)
    }

    /// NEC1: `<1,-1|1,-3>(16,-8,D:8,S:8,F:8,~F:8,1,^108m)`, unit 564 µs.
    fn nec1(&self, durations: &[f64]) -> Option<Decode> {
        if durations.len() < NEC1_FRAME {
            return None;
        }
        let durations = &durations[..NEC1_FRAME];
        let (lead_flash, lead_gap) = (durations[0], durations[1]);
        if !self.close(lead_flash, 16.0 * NEC_UNIT) || !self.close(lead_gap, 8.0 * NEC_UNIT) {
            return None;
        }

        let mut bits = Vec::with_capacity(32);
        for pair in durations[2..66].chunks_exact(2) {
            let (flash, gap) = (pair[0], pair[1]);
            if !self.close(flash, NEC_UNIT) {
                return None;
            }
            if self.close(gap, 3.0 * NEC_UNIT) {
                bits.push(true);
            } else if self.close(gap, NEC_UNIT) {
                bits.push(false);
            } else {
                return None;
            }
        }
        if !self.close(durations[66], NEC_UNIT) {
            return None;
        }

        let d = lsb_first(&bits[0..8]);
        let s = lsb_first(&bits[8..16]);
        let f = lsb_first(&bits[16..24]);
        let f_inverted = lsb_first(&bits[24..32]);
        if f ^ f_inverted != 0xFF {
            return None;
        }

        // S defaults to 255-D and is only reported when it differs.
        let decode = if s == 255 - d {
            Decode::new("NEC1", &[("D", d), ("F", f)])
        } else {
            Decode::new("NEC1", &[("D", d), ("S", s), ("F", f)])
        };
        Some(decode)
    }

    /// RC5: `<1,-1|-1,1>(1,~F:1:6,T:1,D:5,F:6,^114m)`, unit 889 µs, MSB first.
    fn rc5(&self, durations: &[f64]) -> Option<Decode> {
        let durations = leading_frame(durations, |gap| {
            self.close(gap, RC5_UNIT) || self.close(gap, 2.0 * RC5_UNIT)
        });
        if durations.len() < 2 || durations.len() % 2 != 0 {
            return None;
        }

        // The first half of the start bit is a gap, which is not transmitted.
        let mut halves = vec![false];
        for (i, &duration) in durations[..durations.len() - 1].iter().enumerate() {
            let flash = i % 2 == 0;
            let count = if self.close(duration, RC5_UNIT) {
                1
            } else if self.close(duration, 2.0 * RC5_UNIT) {
                2
            } else {
                return None;
            };
            halves.extend(std::iter::repeat(flash).take(count));
        }
        // A trailing zero bit ends in a gap, which merges into the lead-out.
        if halves.len() == 27 {
            halves.push(false);
        }
        if halves.len() != 28 {
            return None;
        }

        let mut bits = Vec::with_capacity(14);
        for pair in halves.chunks_exact(2) {
            match (pair[0], pair[1]) {
                (false, true) => bits.push(true),
                (true, false) => bits.push(false),
                _ => return None,
            }
        }
        if !bits[0] {
            return None;
        }

        let f_high = i64::from(!bits[1]) << 6;
        let t = i64::from(bits[2]);
        let d = msb_first(&bits[3..8]);
        let f = f_high | msb_first(&bits[8..14]);
        Some(Decode::new("RC5", &[("D", d), ("F", f), ("T", t)]))
    }
}

/// The first frame of a sequence: everything up to and including the first
/// gap `in_frame` rejects (the lead-out), or the whole sequence. Later frames
/// are repeats and are ignored.
fn leading_frame(durations: &[f64], in_frame: impl Fn(f64) -> bool) -> &[f64] {
    durations
        .iter()
        .enumerate()
        .skip(1)
        .step_by(2)
        .find(|&(_, &gap)| !in_frame(gap))
        .map_or(durations, |(i, _)| &durations[..=i])
}

fn lsb_first(bits: &[bool]) -> i64 {
    bits.iter()
        .enumerate()
        .fold(0, |acc, (i, &bit)| acc | (i64::from(bit) << i))
}

fn msb_first(bits: &[bool]) -> i64 {
    bits.iter().fold(0, |acc, &bit| (acc << 1) | i64::from(bit))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a learned Pronto code from burst durations given in carrier periods.
    pub(crate) fn pronto(frequency_code: u16, intro: &[u16], repeat: &[u16]) -> String {
        let mut words = vec![
            0x0000,
            frequency_code,
            (intro.len() / 2) as u16,
            (repeat.len() / 2) as u16,
        ];
        words.extend_from_slice(intro);
        words.extend_from_slice(repeat);
        words
            .iter()
            .map(|w| format!("{:04X}", w))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Sony bursts at 0x67 (about 24.85 µs per period).
    pub(crate) fn sony_bursts(f: u32, d: u32, d_bits: usize, s: Option<u32>) -> Vec<u16> {
        let mut bits: Vec<bool> = (0..7).map(|i| f >> i & 1 == 1).collect();
        bits.extend((0..d_bits).map(|i| d >> i & 1 == 1));
        if let Some(s) = s {
            bits.extend((0..8).map(|i| s >> i & 1 == 1));
        }
        let mut bursts = vec![0x60, 0x18];
        for bit in bits {
            bursts.push(if bit { 0x30 } else { 0x18 });
            bursts.push(0x18);
        }
        if let Some(last) = bursts.last_mut() {
            *last = 0x03F6;
        }
        bursts
    }

    /// Sony12 `D=1, F=21` ("Power" on most Sony TVs).
    pub(crate) const SONY12_POWER: &str = "0000 0067 0000 000D 0060 0018 0030 0018 0018 0018 0030 0018 0018 0018 0030 0018 0018 0018 0018 0018 0030 0018 0018 0018 0018 0018 0018 0018 0018 03F6";

    fn nec1_bursts(d: u32, s: u32, f: u32, f_inverted: u32) -> Vec<u16> {
        // 0x6D: about 26.3 µs per period.
        let mut bursts = vec![0x0156, 0x00AB];
        let word = d | s << 8 | f << 16 | f_inverted << 24;
        for i in 0..32 {
            bursts.push(0x0015);
            bursts.push(if word >> i & 1 == 1 { 0x0040 } else { 0x0015 });
        }
        bursts.push(0x0015);
        bursts.push(0x05ED);
        bursts
    }

    fn rc5_bursts(d: u32, f: u32, t: u32) -> Vec<u16> {
        let mut bits = vec![true, f & 0x40 == 0, t == 1];
        bits.extend((0..5).rev().map(|i| d >> i & 1 == 1));
        bits.extend((0..6).rev().map(|i| f >> i & 1 == 1));

        let mut halves = Vec::new();
        for bit in bits {
            if bit {
                halves.extend([false, true]);
            } else {
                halves.extend([true, false]);
            }
        }
        // Run-length encode, dropping the untransmitted leading gap. 0x73 is
        // about 27.7 µs, so one half bit is 32 periods.
        let mut bursts: Vec<u16> = Vec::new();
        let mut previous = None;
        for half in halves.into_iter().skip(1) {
            if previous == Some(half) {
                if let Some(last) = bursts.last_mut() {
                    *last += 0x20;
                }
            } else {
                bursts.push(0x20);
            }
            previous = Some(half);
        }
        if previous == Some(true) {
            bursts.push(0x0CC8);
        } else if let Some(last) = bursts.last_mut() {
            *last = 0x0CC8;
        }
        bursts
    }

    #[test]
    fn sony_helper_matches_reference_code() {
        let code = pronto(0x67, &[], &sony_bursts(21, 1, 5, None));
        assert_eq!(code, SONY12_POWER);
    }

    #[test]
    fn decodes_sony12() {
        let decode = ProntoDecoder::default().decode(SONY12_POWER).unwrap();
        assert_eq!(decode.protocol, "Sony12");
        assert_eq!(
            decode.parameters.into_iter().collect::<Vec<_>>(),
            [("D".to_string(), 1), ("F".to_string(), 21)]
        );
    }

    #[test]
    fn decodes_sony15() {
        let code = pronto(0x67, &[], &sony_bursts(0x2A, 0x97, 8, None));
        let decode = ProntoDecoder::default().decode(&code).unwrap();
        assert_eq!(decode.protocol, "Sony15");
        assert_eq!(decode.parameters["D"], 0x97);
        assert_eq!(decode.parameters["F"], 0x2A);
    }

    #[test]
    fn decodes_sony20() {
        let code = pronto(0x67, &[], &sony_bursts(57, 26, 5, Some(113)));
        let decode = ProntoDecoder::default().decode(&code).unwrap();
        assert_eq!(decode.protocol, "Sony20");
        assert_eq!(decode.parameters["D"], 26);
        assert_eq!(decode.parameters["S"], 113);
        assert_eq!(decode.parameters["F"], 57);
    }

    #[test]
    fn decodes_nec1_from_intro_when_repeat_is_a_ditto() {
        let ditto = [0x0156, 0x0055, 0x0015, 0x0E47];
        let code = pronto(0x6D, &nec1_bursts(4, 251, 8, 247), &ditto);
        let decode = ProntoDecoder::default().decode(&code).unwrap();
        assert_eq!(decode.protocol, "NEC1");
        assert_eq!(
            decode.parameters.into_iter().collect::<Vec<_>>(),
            [("D".to_string(), 4), ("F".to_string(), 8)]
        );
    }

    #[test]
    fn nec1_reports_non_default_subdevice() {
        let code = pronto(0x6D, &nec1_bursts(0x40, 0x12, 0x0A, 0xF5), &[]);
        let decode = ProntoDecoder::default().decode(&code).unwrap();
        assert_eq!(decode.parameters["S"], 0x12);
    }

    #[test]
    fn nec1_rejects_bad_checksum() {
        let code = pronto(0x6D, &nec1_bursts(4, 251, 8, 8), &[]);
        assert!(matches!(
            ProntoDecoder::default().decode(&code),
            Err(Error::SignalFormat(_))
        ));
    }

    #[test]
    fn decodes_rc5() {
        for (d, f, t) in [(0, 12, 0), (5, 53, 1), (31, 127, 1), (20, 0, 0)] {
            let code = pronto(0x73, &[], &rc5_bursts(d, f, t));
            let decode = ProntoDecoder::default().decode(&code).unwrap();
            assert_eq!(decode.protocol, "RC5", "{}", code);
            assert_eq!(decode.parameters["D"], i64::from(d));
            assert_eq!(decode.parameters["F"], i64::from(f));
            assert_eq!(decode.parameters["T"], i64::from(t));
        }
    }

    #[test]
    fn decodes_first_of_several_frames() {
        let sony = sony_bursts(21, 1, 5, None);
        let code = pronto(0x67, &[], &[sony.clone(), sony].concat());
        assert!(code.starts_with("0000 0067 0000 001A "));
        let decode = ProntoDecoder::default().decode(&code).unwrap();
        assert_eq!(decode.protocol, "Sony12");
        assert_eq!(decode.parameters["D"], 1);
        assert_eq!(decode.parameters["F"], 21);

        let nec1 = nec1_bursts(0x40, 0x12, 0x0A, 0xF5);
        let code = pronto(0x6D, &[], &[nec1.clone(), nec1].concat());
        let decode = ProntoDecoder::default().decode(&code).unwrap();
        assert_eq!(decode.protocol, "NEC1");
        assert_eq!(decode.parameters["F"], 0x0A);

        for (d, f, t) in [(5, 53, 1), (20, 0, 0)] {
            let rc5 = rc5_bursts(d, f, t);
            let code = pronto(0x73, &[], &[rc5.clone(), rc5].concat());
            let decode = ProntoDecoder::default().decode(&code).unwrap();
            assert_eq!(decode.protocol, "RC5", "{}", code);
            assert_eq!(decode.parameters["D"], i64::from(d));
            assert_eq!(decode.parameters["F"], i64::from(f));
        }
    }

    #[test]
    fn unknown_waveform_is_format_error() {
        let code = pronto(0x67, &[], &[0x0010, 0x0010, 0x0010, 0x0400]);
        assert!(matches!(
            ProntoDecoder::default().decode(&code),
            Err(Error::SignalFormat(_))
        ));
    }

    #[test]
    fn structural_error_is_parameter_error() {
        assert!(matches!(
            ProntoDecoder::default().decode("0000 0067 0000 0005 0060 0018"),
            Err(Error::ParameterValidation(_))
        ));
    }

    #[test]
    fn bit_helpers() {
        assert_eq!(lsb_first(&[true, false, true]), 5);
        assert_eq!(msb_first(&[true, false, false]), 4);
    }
}
