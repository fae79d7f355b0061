//! Export logging.
//!
//! Every operation that reports progress or failures takes a [`LogSink`]
//! instead of writing to global state. [`ExportLog`] is the standard sink:
//! an append-only, thread-safe collector that keeps the full log and the
//! error list for the log file, and optionally echoes each line through the
//! `log` facade.
//!
//! # Usage
//!
//! ```rust
//! use nss_core::logging::{ExportLog, LogCategory, LogSink};
//!
//! let sink = ExportLog::quiet();
//! sink.info(LogCategory::Session, format!("Opening NSS file: {}", "title.nss"));
//! sink.error(LogCategory::Export, "bitmap export to out.png failed".to_string());
//! assert_eq!(sink.error_count(), 1);
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Log level for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Parse log level from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// Filter to hand to a `log` backend.
    pub fn as_level_filter(self) -> log::LevelFilter {
        self.as_log_level()
            .map_or(log::LevelFilter::Off, |l| l.to_level_filter())
    }

    fn as_log_level(self) -> Option<log::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(log::Level::Error),
            LogLevel::Warn => Some(log::Level::Warn),
            LogLevel::Info => Some(log::Level::Info),
            LogLevel::Debug => Some(log::Level::Debug),
            LogLevel::Trace => Some(log::Level::Trace),
        }
    }
}

/// Which stage of the export produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Configuration and lookup table setup
    Config,
    /// Session (.nss) file reading and token parsing
    Session,
    /// Structural decoding of token bytes
    Decode,
    /// Bitmap composition
    Compose,
    /// Export directives and artifact writing
    Export,
}

impl LogCategory {
    /// Target name used when echoing through the `log` facade.
    pub fn target(self) -> &'static str {
        match self {
            LogCategory::Config => "config",
            LogCategory::Session => "session",
            LogCategory::Decode => "decode",
            LogCategory::Compose => "compose",
            LogCategory::Export => "export",
        }
    }
}

/// Destination for export progress and failure reports.
pub trait LogSink: Send + Sync {
    fn log(&self, category: LogCategory, level: LogLevel, message: String);

    fn info(&self, category: LogCategory, message: String) {
        self.log(category, LogLevel::Info, message);
    }

    fn warn(&self, category: LogCategory, message: String) {
        self.log(category, LogLevel::Warn, message);
    }

    fn error(&self, category: LogCategory, message: String) {
        self.log(category, LogLevel::Error, message);
    }
}

#[derive(Debug, Default)]
struct Buffers {
    log: String,
    errors: String,
    error_count: usize,
}

/// Append-only collector backing the export log file.
#[derive(Debug)]
pub struct ExportLog {
    echo: bool,
    level: LogLevel,
    buffers: Mutex<Buffers>,
}

impl Default for ExportLog {
    fn default() -> Self {
        Self::new(true, LogLevel::Info)
    }
}

impl ExportLog {
    /// `echo` forwards each recorded line to the `log` facade; `level` is the
    /// most verbose level kept in the log. Errors are always kept.
    pub fn new(echo: bool, level: LogLevel) -> Self {
        Self {
            echo,
            level: level.max(LogLevel::Error),
            buffers: Mutex::new(Buffers::default()),
        }
    }

    /// A sink that records without echoing.
    pub fn quiet() -> Self {
        Self::new(false, LogLevel::Info)
    }

    pub fn error_count(&self) -> usize {
        self.lock().error_count
    }

    /// Full log text recorded so far.
    pub fn contents(&self) -> String {
        self.lock().log.clone()
    }

    /// Error lines recorded so far.
    pub fn errors(&self) -> String {
        self.lock().errors.clone()
    }

    /// Write the log file: the full log followed by an error section.
    pub fn write_log_file(&self, path: &Path) -> std::io::Result<()> {
        const RULE: &str =
            "--------------------------------------------------------------------------------";
        let buffers = self.lock();
        let mut out = String::with_capacity(buffers.log.len() + buffers.errors.len() + 256);
        let _ = writeln!(out, "NSS Export Log\n{RULE}");
        out.push_str(&buffers.log);
        let _ = writeln!(out, "ERRORS\n{RULE}");
        out.push_str(&buffers.errors);
        fs::write(path, out)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Buffers> {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for ExportLog {
    fn log(&self, category: LogCategory, level: LogLevel, message: String) {
        if level == LogLevel::Off || level > self.level {
            return;
        }
        if self.echo {
            if let Some(lvl) = level.as_log_level() {
                log::log!(target: category.target(), lvl, "{}", message);
            }
        }

        let mut buffers = self.lock();
        if level == LogLevel::Error {
            buffers.error_count += 1;
            buffers.errors.push_str(&message);
            buffers.errors.push('\n');
            buffers.log.push_str("ERROR: ");
        }
        buffers.log.push_str(&message);
        buffers.log.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::from_str("OFF"), Some(LogLevel::Off));
        assert_eq!(LogLevel::from_str("0"), Some(LogLevel::Off));

        assert_eq!(LogLevel::from_str("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str("ERR"), Some(LogLevel::Error));

        assert_eq!(LogLevel::from_str("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("WARNING"), Some(LogLevel::Warn));

        assert_eq!(LogLevel::from_str("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_str("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("TRACE"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str("5"), Some(LogLevel::Trace));

        assert_eq!(LogLevel::from_str("invalid"), None);
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(LogLevel::Off.as_level_filter(), log::LevelFilter::Off);
        assert_eq!(LogLevel::Warn.as_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Trace.as_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_records_info_and_errors() {
        let sink = ExportLog::quiet();
        sink.info(LogCategory::Session, "Opening NSS file: a.nss".to_string());
        sink.error(LogCategory::Export, "missing CHRMain token".to_string());

        assert_eq!(sink.error_count(), 1);
        assert_eq!(
            sink.contents(),
            "Opening NSS file: a.nss\nERROR: missing CHRMain token\n"
        );
        assert_eq!(sink.errors(), "missing CHRMain token\n");
    }

    #[test]
    fn test_level_threshold() {
        let sink = ExportLog::new(false, LogLevel::Warn);
        sink.log(LogCategory::Decode, LogLevel::Debug, "dropped".to_string());
        sink.info(LogCategory::Decode, "dropped too".to_string());
        sink.warn(LogCategory::Decode, "kept".to_string());
        assert_eq!(sink.contents(), "kept\n");
    }

    #[test]
    fn test_errors_survive_off_level() {
        let sink = ExportLog::new(false, LogLevel::Off);
        sink.error(LogCategory::Export, "still recorded".to_string());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn test_concurrent_appends() {
        let sink = ExportLog::quiet();
        std::thread::scope(|s| {
            for t in 0..4 {
                let sink = &sink;
                s.spawn(move || {
                    for i in 0..25 {
                        sink.error(LogCategory::Export, format!("worker {t} failure {i}"));
                    }
                });
            }
        });
        assert_eq!(sink.error_count(), 100);
        assert_eq!(sink.errors().lines().count(), 100);
    }

    #[test]
    fn test_write_log_file() {
        let dir = std::env::temp_dir().join("nss_core_log_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("export.log");

        let sink = ExportLog::quiet();
        sink.info(LogCategory::Export, "Writing CHR".to_string());
        sink.error(LogCategory::Export, "bad palette".to_string());
        sink.write_log_file(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("NSS Export Log\n"));
        let errors_at = text.find("ERRORS").unwrap();
        assert!(text[..errors_at].contains("Writing CHR"));
        assert!(text[errors_at..].contains("bad palette"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
