//! Session export pipeline.
//!
//! Reads the JSON configuration, parses each NEXXT/NESST session file into
//! named tokens and runs the export directives listed for it:
//!
//! - **ExportCHR**: raw pattern bytes
//! - **ExportPalette**: ca65 `.byte` rows for one palette set
//! - **ExportNametable** / **ExportNametableAttributes**: raw tile map bytes
//! - **ExportBitmap**: PNG tile sheet
//! - **ExportNametableBitmap**: PNG render of the full nametable
//!
//! A failing directive is reported through the [`LogSink`] and skipped;
//! the rest keep running.
//!
//! [`LogSink`]: nss_core::logging::LogSink

pub mod artifact;
pub mod config;
pub mod directive;
pub mod pipeline;
pub mod session;

use std::path::PathBuf;

use thiserror::Error;

pub use config::{Config, ConfigError};
pub use pipeline::{build_lookup_registry, run, ExportSummary};
pub use session::Session;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("missing or empty {0} attribute")]
    MissingAttribute(&'static str),

    #[error("invalid {attribute} attribute `{value}`")]
    InvalidNumber { attribute: &'static str, value: String },

    #[error("{attribute} attribute {value} is out of range")]
    OutOfRange { attribute: &'static str, value: i64 },

    #[error("session does not contain a {0} token")]
    MissingToken(&'static str),

    #[error("{token} is {available} bytes, smaller than the requested start {start} and size {size}")]
    RangeExceedsData {
        token: &'static str,
        available: usize,
        start: usize,
        size: usize,
    },

    #[error("composed canvas is {width}x{height}, nothing to write")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("PNG encoding failed for {}: {source}", .path.display())]
    Png {
        path: PathBuf,
        source: png::EncodingError,
    },

    #[error(transparent)]
    Core(#[from] nss_core::Error),
}
