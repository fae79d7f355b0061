//! NSS session files.
//!
//! A session is a plain text file of `Name=value` lines. Values of the PPU
//! tokens are RLE text understood by [`nss_core::rle::decode`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::ExportError;

/// Pattern table bytes.
pub const CHR_MAIN: &str = "CHRMain";
/// Palette RAM, four palette sets.
pub const PALETTE: &str = "Palette";
/// 960-byte tile map.
pub const NAME_TABLE: &str = "NameTable";
/// 64-byte attribute table.
pub const ATTR_TABLE: &str = "AttrTable";

#[derive(Debug, Clone, Default)]
pub struct Session {
    tokens: HashMap<String, String>,
    duplicates: Vec<String>,
}

impl Session {
    /// Collect every `name=value` line. Lines that do not split into exactly
    /// two parts are ignored. The first occurrence of a name wins.
    pub fn parse(text: &str) -> Self {
        let mut session = Session::default();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let mut parts = line.split('=');
            let (Some(name), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                continue;
            };
            if session.tokens.contains_key(name) {
                session.duplicates.push(name.to_string());
                continue;
            }
            session
                .tokens
                .insert(name.to_string(), value.trim_end().to_string());
        }
        session
    }

    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let text = fs::read_to_string(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn token(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }

    /// Decode token `name` into bytes.
    pub fn bytes(&self, name: &'static str) -> Result<Vec<u8>, ExportError> {
        let text = self.token(name).ok_or(ExportError::MissingToken(name))?;
        Ok(nss_core::rle::decode(name, text)?)
    }

    /// Names that appeared more than once, in file order.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
