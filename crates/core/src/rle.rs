//! Decoder for the RLE token text stored in session files.
//!
//! A token value alternates hex data segments and bracketed run lengths:
//!
//! ```text
//! 0F16[04]3021[1F]
//! ```
//!
//! Splitting on `[` and `]` yields data at even indices and run lengths at
//! odd ones. A run length `N` (hex, at least 2) repeats the last byte of the
//! data segment right before it until that byte occurs `N` times in total.

use crate::error::{Error, GrammarError};
use crate::logging::LogCategory;

/// Largest decoded token accepted, in bytes.
pub const MAX_DECODED_BYTES: usize = i32::MAX as usize;

enum Segment<'a> {
    Data(&'a str),
    Run(&'a str),
}

fn segments(input: &str) -> impl Iterator<Item = Segment<'_>> {
    input
        .split(['[', ']'])
        .enumerate()
        .map(|(i, s)| if i % 2 == 0 { Segment::Data(s) } else { Segment::Run(s) })
}

fn parse_run_length(text: &str) -> Result<usize, GrammarError> {
    let digits = text.trim();
    let invalid = || GrammarError::InvalidRunLength(text.to_string());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let count = i32::from_str_radix(digits, 16).map_err(|_| invalid())?;
    if count <= 1 {
        return Err(invalid());
    }
    Ok(count as usize)
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

fn decode_data(text: &str, out: &mut Vec<u8>) -> Result<(), GrammarError> {
    for pair in text.as_bytes().chunks_exact(2) {
        match (hex_value(pair[0]), hex_value(pair[1])) {
            (Some(hi), Some(lo)) => out.push((hi << 4) | lo),
            _ => return Err(GrammarError::InvalidHex(text.to_string())),
        }
    }
    Ok(())
}

fn grow(size: usize, extra: usize) -> Result<usize, GrammarError> {
    size.checked_add(extra)
        .filter(|&total| total <= MAX_DECODED_BYTES)
        .ok_or(GrammarError::TooLarge {
            limit: MAX_DECODED_BYTES,
        })
}

/// Number of bytes `input` decodes to, validating segment shapes on the way.
fn measure(input: &str) -> Result<usize, GrammarError> {
    let mut size = 0usize;
    for segment in segments(input) {
        match segment {
            Segment::Data(text) => {
                if text.len() % 2 != 0 {
                    return Err(GrammarError::OddDataSegment(text.to_string()));
                }
                size = grow(size, text.len() / 2)?;
            }
            // One occurrence already came from the data segment.
            Segment::Run(text) => size = grow(size, parse_run_length(text)? - 1)?,
        }
    }
    Ok(size)
}

fn expand(input: &str, size: usize) -> Result<Vec<u8>, GrammarError> {
    let mut out = Vec::new();
    out.try_reserve_exact(size)
        .map_err(|_| GrammarError::OutOfMemory(size))?;
    let mut last: Option<u8> = None;
    for segment in segments(input) {
        match segment {
            Segment::Data(text) => {
                decode_data(text, &mut out)?;
                last = if text.is_empty() { None } else { out.last().copied() };
            }
            Segment::Run(text) => {
                let byte = last.ok_or_else(|| GrammarError::OrphanRun(text.to_string()))?;
                let count = parse_run_length(text)?;
                out.resize(out.len() + count - 1, byte);
            }
        }
    }

    if out.len() != size {
        return Err(GrammarError::LengthMismatch {
            expected: size,
            written: out.len(),
        });
    }
    Ok(out)
}

/// Decode the token named `token` into raw bytes.
///
/// Blank input decodes to an empty buffer. Any malformed segment fails the
/// whole token; no partial output is returned.
pub fn decode(token: &str, input: &str) -> Result<Vec<u8>, Error> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let size = measure(input).map_err(|e| Error::grammar(token, e))?;
    log::trace!(target: LogCategory::Decode.target(), "token {}: {} bytes", token, size);
    expand(input, size).map_err(|e| Error::grammar(token, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar_error(input: &str) -> GrammarError {
        match decode("Test", input) {
            Err(Error::Grammar { token, source }) => {
                assert_eq!(token, "Test");
                source
            }
            other => panic!("expected grammar error for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_data() {
        assert_eq!(decode("Test", "0F1630").unwrap(), vec![0x0F, 0x16, 0x30]);
        assert_eq!(decode("Test", "abCD").unwrap(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_run_repeats_last_byte() {
        assert_eq!(decode("Test", "AB[03]").unwrap(), vec![0xAB, 0xAB, 0xAB]);
        assert_eq!(
            decode("Test", "0102[04]03").unwrap(),
            vec![0x01, 0x02, 0x02, 0x02, 0x02, 0x03]
        );
    }

    #[test]
    fn test_run_length_is_hex() {
        let out = decode("Test", "00[10]").unwrap();
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_decoding_is_deterministic() {
        let input = "0F[20]30[08]2716[1F]";
        assert_eq!(decode("Test", input).unwrap(), decode("Test", input).unwrap());
    }

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(decode("Test", "").unwrap(), Vec::<u8>::new());
        assert_eq!(decode("Test", "  \t\r\n").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_odd_data_segment_fails() {
        assert_eq!(grammar_error("ABC"), GrammarError::OddDataSegment("ABC".into()));
        assert!(matches!(grammar_error("AB[03]C"), GrammarError::OddDataSegment(_)));
    }

    #[test]
    fn test_orphan_run_fails() {
        assert_eq!(grammar_error("[05]"), GrammarError::OrphanRun("05".into()));
        // The data segment between two runs is empty, so the second run has nothing to repeat.
        assert!(matches!(grammar_error("AB[03][04]"), GrammarError::OrphanRun(_)));
    }

    #[test]
    fn test_short_run_lengths_fail() {
        assert!(matches!(grammar_error("AB[01]"), GrammarError::InvalidRunLength(_)));
        assert!(matches!(grammar_error("AB[00]"), GrammarError::InvalidRunLength(_)));
        assert!(matches!(grammar_error("AB[]"), GrammarError::InvalidRunLength(_)));
        assert!(matches!(grammar_error("AB[-5]"), GrammarError::InvalidRunLength(_)));
        assert!(matches!(grammar_error("AB[ZZ]"), GrammarError::InvalidRunLength(_)));
        assert!(matches!(grammar_error("AB[FFFFFFFF]"), GrammarError::InvalidRunLength(_)));
    }

    #[test]
    fn test_oversized_token_fails() {
        let input = "00[7FFFFFFF]".repeat(8);
        assert_eq!(
            grammar_error(&input),
            GrammarError::TooLarge {
                limit: MAX_DECODED_BYTES
            }
        );
        // A single maximal run still fits the limit once the data byte is counted.
        assert_eq!(measure("00[7FFFFFFF]"), Ok(MAX_DECODED_BYTES));
        assert!(matches!(measure("0000[7FFFFFFF]"), Err(GrammarError::TooLarge { .. })));
    }

    #[test]
    fn test_non_hex_data_fails() {
        assert!(matches!(grammar_error("0G"), GrammarError::InvalidHex(_)));
    }
}
