//! Error types shared by every decoder and composer in the crate.

use thiserror::Error;

/// Malformed RLE token text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("data segment `{0}` has an odd number of hex digits")]
    OddDataSegment(String),
    #[error("data segment `{0}` contains non-hex characters")]
    InvalidHex(String),
    #[error("invalid RLE segment `{0}`")]
    InvalidRunLength(String),
    #[error("RLE segment `{0}` has no preceding data byte to repeat")]
    OrphanRun(String),
    #[error("decoded size exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("unable to allocate {0} bytes")]
    OutOfMemory(usize),
    #[error("wrote {written} bytes but the sizing pass computed {expected}")]
    LengthMismatch { expected: usize, written: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("token {token}: {source}")]
    Grammar { token: String, source: GrammarError },

    #[error("{what} at offset {offset} needs {len} bytes but the source holds {available}")]
    Bounds {
        what: &'static str,
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    CoordinateOutOfRange {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("{what} must be exactly {expected} bytes, got {actual}")]
    SizeContract {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("RGB lookup `{0}` is not registered")]
    UnknownLookup(String),

    #[error("RGB lookup is missing its id")]
    MissingLookupId,

    #[error("invalid color `{0}`")]
    InvalidColor(String),
}

impl Error {
    pub(crate) fn grammar(token: &str, source: GrammarError) -> Self {
        Error::Grammar {
            token: token.to_string(),
            source,
        }
    }

    pub(crate) fn check_bounds(
        what: &'static str,
        source: &[u8],
        offset: usize,
        len: usize,
    ) -> Result<(), Self> {
        match offset.checked_add(len) {
            Some(end) if end <= source.len() => Ok(()),
            _ => Err(Error::Bounds {
                what,
                offset,
                len,
                available: source.len(),
            }),
        }
    }

    pub(crate) fn check_size(what: &'static str, raw: &[u8], expected: usize) -> Result<(), Self> {
        if raw.len() == expected {
            Ok(())
        } else {
            Err(Error::SizeContract {
                what,
                expected,
                actual: raw.len(),
            })
        }
    }
}
