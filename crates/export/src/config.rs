//! JSON export configuration.
//!
//! Keys are PascalCase. Numeric attributes may be given as JSON integers or
//! as strings in decimal, `$hex` or `%binary`.

use std::fs;
use std::path::{Path, PathBuf};

use nss_core::compose::BitmapLayout;
use nss_core::ppu::RgbLookup;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Accept `null` wherever a list or struct is optional.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse `$hex`, `%binary` or decimal text.
pub fn parse_number(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix('$') {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = text.strip_prefix('%') {
        i64::from_str_radix(bin, 2).ok()
    } else {
        text.parse().ok()
    }
}

/// A numeric attribute written either as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigNumber {
    Int(i64),
    Text(String),
}

impl ConfigNumber {
    /// `Ok(None)` for blank text, `Err(())` for text that is not a number.
    #[allow(clippy::result_unit_err)]
    pub fn resolve(&self) -> Result<Option<i64>, ()> {
        match self {
            ConfigNumber::Int(v) => Ok(Some(*v)),
            ConfigNumber::Text(t) if t.trim().is_empty() => Ok(None),
            ConfigNumber::Text(t) => parse_number(t).map(Some).ok_or(()),
        }
    }
}

impl std::fmt::Display for ConfigNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigNumber::Int(v) => write!(f, "{}", v),
            ConfigNumber::Text(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogFileConfig {
    #[serde(default)]
    pub echo: Option<bool>,
    #[serde(default)]
    pub log_file: Option<String>,
}

impl LogFileConfig {
    pub fn echo(&self) -> bool {
        self.echo.unwrap_or(true)
    }

    pub fn log_file(&self) -> Option<&str> {
        self.log_file.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RgbLookupConfig {
    #[serde(rename = "ID", default)]
    pub id: Option<String>,
    #[serde(rename = "Colors", default)]
    pub colors: Option<Vec<String>>,
}

impl RgbLookupConfig {
    pub fn to_lookup(&self) -> Result<RgbLookup, nss_core::Error> {
        let id = self.id.as_deref().unwrap_or_default();
        let colors = self.colors.as_deref().unwrap_or_default();
        RgbLookup::from_hex(id, colors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportChrConfig {
    #[serde(default)]
    pub target_file: Option<String>,
    #[serde(default)]
    pub start: Option<ConfigNumber>,
    #[serde(default)]
    pub size: Option<ConfigNumber>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportPaletteConfig {
    #[serde(default)]
    pub target_file: Option<String>,
    #[serde(default)]
    pub target_segment_name: Option<String>,
    #[serde(default)]
    pub target_variable_name: Option<String>,
    #[serde(default)]
    pub target_append: Option<bool>,
    #[serde(default)]
    pub source_sub_palette: Option<ConfigNumber>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportNametableConfig {
    #[serde(default)]
    pub target_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportNametableAttributesConfig {
    #[serde(default)]
    pub target_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportBitmapConfig {
    #[serde(default)]
    pub target_file: Option<String>,
    #[serde(default)]
    pub start_tile_index: Option<ConfigNumber>,
    #[serde(default)]
    pub tile_count: Option<ConfigNumber>,
    #[serde(default)]
    pub layout: Option<BitmapLayout>,
    #[serde(rename = "RGBLookupID", default)]
    pub rgb_lookup_id: Option<String>,
    #[serde(default)]
    pub palette_set_index: Option<ConfigNumber>,
    #[serde(default)]
    pub palette_index: Option<ConfigNumber>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportNametableBitmapConfig {
    #[serde(default)]
    pub target_file: Option<String>,
    #[serde(rename = "RGBLookupID", default)]
    pub rgb_lookup_id: Option<String>,
    #[serde(default)]
    pub palette_set_index: Option<ConfigNumber>,
    #[serde(default)]
    pub start_tile_index: Option<ConfigNumber>,
}

/// One session file and the exports to run against it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NssConfig {
    #[serde(rename = "SourceFile", default)]
    pub source_file: Option<String>,
    #[serde(rename = "ExportCHR", default, deserialize_with = "null_as_default")]
    pub export_chr: Vec<ExportChrConfig>,
    #[serde(rename = "ExportPalette", default, deserialize_with = "null_as_default")]
    pub export_palette: Vec<ExportPaletteConfig>,
    #[serde(rename = "ExportNametable", default, deserialize_with = "null_as_default")]
    pub export_nametable: Vec<ExportNametableConfig>,
    #[serde(
        rename = "ExportNametableAttributes",
        default,
        deserialize_with = "null_as_default"
    )]
    pub export_nametable_attributes: Vec<ExportNametableAttributesConfig>,
    #[serde(rename = "ExportBitmap", default, deserialize_with = "null_as_default")]
    pub export_bitmap: Vec<ExportBitmapConfig>,
    #[serde(
        rename = "ExportNametableBitmap",
        default,
        deserialize_with = "null_as_default"
    )]
    pub export_nametable_bitmap: Vec<ExportNametableBitmapConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "LogConfig", default, deserialize_with = "null_as_default")]
    pub log_config: LogFileConfig,
    #[serde(rename = "NSSFiles", default, deserialize_with = "null_as_default")]
    pub nss_files: Vec<NssConfig>,
    #[serde(rename = "RGBLookupTables", default, deserialize_with = "null_as_default")]
    pub rgb_lookup_tables: Vec<RgbLookupConfig>,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
