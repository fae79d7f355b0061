//! Export directives.
//!
//! Each `Export*` entry of an NSS file config implements [`ExportDirective`].
//! A directive validates every attribute and decodes every token it needs
//! before it touches the target file, so a failed directive leaves no
//! partial output behind.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use nss_core::compose::{compose_nametable, compose_tile_sheet};
use nss_core::logging::{LogCategory, LogSink};
use nss_core::ppu::palette::{PALETTES_PER_SET, PALETTE_SETS_PER_BLOCK, PALETTE_SET_BYTES};
use nss_core::ppu::tile::TILE_BYTES;
use nss_core::ppu::{AttributeTable, Nametable, PaletteSet, Pattern, RgbLookupRegistry, DEFAULT_LOOKUP_ID};

use crate::artifact::{format_byte_rows, write_binary, write_png};
use crate::config::{
    ConfigNumber, ExportBitmapConfig, ExportChrConfig, ExportNametableAttributesConfig,
    ExportNametableBitmapConfig, ExportNametableConfig, ExportPaletteConfig,
};
use crate::session::{Session, ATTR_TABLE, CHR_MAIN, NAME_TABLE, PALETTE};
use crate::ExportError;

const DEFAULT_CHR_SIZE: i64 = 1024;
const DEFAULT_TILE_COUNT: i64 = 256;
/// Pattern table size a nametable indexes into.
const NAMETABLE_PATTERNS: usize = 256;

/// Everything a directive reads while running against one NSS file.
pub struct ExportContext<'a> {
    /// Source file as named in the config, for messages.
    pub source: &'a str,
    pub session: &'a Session,
    pub lookups: &'a RgbLookupRegistry,
    pub sink: &'a dyn LogSink,
}

impl ExportContext<'_> {
    fn info(&self, message: String) {
        self.sink.info(LogCategory::Export, message);
    }
}

pub trait ExportDirective {
    /// Short name used in failure reports, e.g. `CHR`.
    const KIND: &'static str;

    fn target_file(&self) -> Option<&str>;

    fn export(&self, ctx: &ExportContext<'_>) -> Result<(), ExportError>;
}

fn target(file: Option<&str>) -> Result<&Path, ExportError> {
    file.filter(|f| !f.trim().is_empty())
        .map(Path::new)
        .ok_or(ExportError::MissingAttribute("TargetFile"))
}

/// Resolve an optional numeric attribute; blank text falls back to `default`.
fn number(
    attribute: &'static str,
    value: Option<&ConfigNumber>,
    default: i64,
) -> Result<i64, ExportError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.resolve() {
        Ok(v) => Ok(v.unwrap_or(default)),
        Err(()) => Err(ExportError::InvalidNumber {
            attribute,
            value: value.to_string(),
        }),
    }
}

fn non_negative(
    attribute: &'static str,
    value: Option<&ConfigNumber>,
    default: i64,
) -> Result<usize, ExportError> {
    let v = number(attribute, value, default)?;
    usize::try_from(v).map_err(|_| ExportError::OutOfRange { attribute, value: v })
}

/// An index that must fall in `0..limit`.
fn index(
    attribute: &'static str,
    value: Option<&ConfigNumber>,
    limit: usize,
) -> Result<usize, ExportError> {
    let v = non_negative(attribute, value, 0)?;
    if v >= limit {
        return Err(ExportError::OutOfRange {
            attribute,
            value: v as i64,
        });
    }
    Ok(v)
}

fn lookup_id(id: Option<&str>) -> &str {
    id.filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_LOOKUP_ID)
}

fn palette_sets(session: &Session) -> Result<[PaletteSet; PALETTE_SETS_PER_BLOCK], ExportError> {
    let raw = session.bytes(PALETTE)?;
    Ok(PaletteSet::decode_block(&raw)?)
}

impl ExportDirective for ExportChrConfig {
    const KIND: &'static str = "CHR";

    fn target_file(&self) -> Option<&str> {
        self.target_file.as_deref()
    }

    fn export(&self, ctx: &ExportContext<'_>) -> Result<(), ExportError> {
        let path = target(self.target_file())?;
        let start = non_negative("Start", self.start.as_ref(), 0)?;
        let size = non_negative("Size", self.size.as_ref(), DEFAULT_CHR_SIZE)?;

        let data = ctx.session.bytes(CHR_MAIN)?;
        let end = start
            .checked_add(size)
            .filter(|&end| end <= data.len())
            .ok_or(ExportError::RangeExceedsData {
                token: CHR_MAIN,
                available: data.len(),
                start,
                size,
            })?;

        ctx.info(format!("Writing CHR [{},{}] to file {}", start, size, path.display()));
        write_binary(path, &data[start..end])
    }
}

impl ExportPaletteConfig {
    /// The ca65 text block for one palette set.
    pub fn render(&self, data: &[u8], set: usize) -> Result<String, ExportError> {
        let start = set * PALETTE_SET_BYTES;
        let bytes = data
            .get(start..start + PALETTE_SET_BYTES)
            .ok_or(ExportError::RangeExceedsData {
                token: PALETTE,
                available: data.len(),
                start,
                size: PALETTE_SET_BYTES,
            })?;

        let mut text = String::new();
        if let Some(segment) = self.target_segment_name.as_deref().filter(|s| !s.trim().is_empty()) {
            text.push_str(&format!(".segment \"{}\"\n", segment));
        }
        if let Some(label) = self.target_variable_name.as_deref().filter(|s| !s.trim().is_empty()) {
            text.push_str(&format!("{}:\n", label));
        }
        text.push_str(&format_byte_rows(bytes, PALETTES_PER_SET));
        text.push('\n');
        Ok(text)
    }
}

impl ExportDirective for ExportPaletteConfig {
    const KIND: &'static str = "palette";

    fn target_file(&self) -> Option<&str> {
        self.target_file.as_deref()
    }

    fn export(&self, ctx: &ExportContext<'_>) -> Result<(), ExportError> {
        let path = target(self.target_file())?;
        let append = self.target_append.unwrap_or(true);
        let set = index(
            "SourceSubPalette",
            self.source_sub_palette.as_ref(),
            PALETTE_SETS_PER_BLOCK,
        )?;

        let data = ctx.session.bytes(PALETTE)?;
        let text = self.render(&data, set)?;

        ctx.info(format!(
            "Exporting palette to file {} from subpalette {} (append: {})",
            path.display(),
            set,
            append
        ));
        let io_err = |source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(io_err)?;
        file.write_all(text.as_bytes()).map_err(io_err)
    }
}

impl ExportDirective for ExportNametableConfig {
    const KIND: &'static str = "nametable";

    fn target_file(&self) -> Option<&str> {
        self.target_file.as_deref()
    }

    fn export(&self, ctx: &ExportContext<'_>) -> Result<(), ExportError> {
        let path = target(self.target_file())?;
        let data = ctx.session.bytes(NAME_TABLE)?;
        ctx.info(format!("Writing nametable to file {}", path.display()));
        write_binary(path, &data)
    }
}

impl ExportDirective for ExportNametableAttributesConfig {
    const KIND: &'static str = "nametable attributes";

    fn target_file(&self) -> Option<&str> {
        self.target_file.as_deref()
    }

    fn export(&self, ctx: &ExportContext<'_>) -> Result<(), ExportError> {
        let path = target(self.target_file())?;
        let data = ctx.session.bytes(ATTR_TABLE)?;
        ctx.info(format!("Writing nametable attributes to file {}", path.display()));
        write_binary(path, &data)
    }
}

impl ExportDirective for ExportBitmapConfig {
    const KIND: &'static str = "bitmap";

    fn target_file(&self) -> Option<&str> {
        self.target_file.as_deref()
    }

    fn export(&self, ctx: &ExportContext<'_>) -> Result<(), ExportError> {
        let path = target(self.target_file())?;
        let start_tile = non_negative("StartTileIndex", self.start_tile_index.as_ref(), 0)?;
        let tile_count = non_negative("TileCount", self.tile_count.as_ref(), DEFAULT_TILE_COUNT)?;
        let set_index = index(
            "PaletteSetIndex",
            self.palette_set_index.as_ref(),
            PALETTE_SETS_PER_BLOCK,
        )?;
        let palette_index = index("PaletteIndex", self.palette_index.as_ref(), PALETTES_PER_SET)?;
        let layout = self.layout.unwrap_or_default();

        let sets = palette_sets(ctx.session)?;
        let lookup = ctx.lookups.get(lookup_id(self.rgb_lookup_id.as_deref()))?;
        let chr = ctx.session.bytes(CHR_MAIN)?;
        if start_tile
            .checked_add(tile_count)
            .and_then(|tiles| tiles.checked_mul(TILE_BYTES))
            .map_or(true, |end| end > chr.len())
        {
            return Err(ExportError::RangeExceedsData {
                token: CHR_MAIN,
                available: chr.len(),
                start: start_tile,
                size: tile_count,
            });
        }
        let patterns = Pattern::decode_range(&chr, start_tile, tile_count)?;

        let palette = &sets[set_index].palettes()[palette_index];
        let frame = compose_tile_sheet(&patterns, palette, lookup, layout)?;
        if frame.is_empty() {
            return Err(ExportError::EmptyCanvas {
                width: frame.width,
                height: frame.height,
            });
        }

        ctx.info(format!(
            "Writing {}x{} bitmap to {}",
            frame.width,
            frame.height,
            path.display()
        ));
        write_png(path, &frame)
    }
}

impl ExportDirective for ExportNametableBitmapConfig {
    const KIND: &'static str = "nametable bitmap";

    fn target_file(&self) -> Option<&str> {
        self.target_file.as_deref()
    }

    fn export(&self, ctx: &ExportContext<'_>) -> Result<(), ExportError> {
        let path = target(self.target_file())?;
        let set_index = index(
            "PaletteSetIndex",
            self.palette_set_index.as_ref(),
            PALETTE_SETS_PER_BLOCK,
        )?;
        let start_tile = non_negative("StartTileIndex", self.start_tile_index.as_ref(), 0)?;

        let sets = palette_sets(ctx.session)?;
        let nametable = Nametable::decode(&ctx.session.bytes(NAME_TABLE)?)?;
        let attributes = AttributeTable::decode(&ctx.session.bytes(ATTR_TABLE)?)?;
        let chr = ctx.session.bytes(CHR_MAIN)?;
        let patterns = Pattern::decode_range(&chr, start_tile, NAMETABLE_PATTERNS)?;
        let lookup = ctx.lookups.get(lookup_id(self.rgb_lookup_id.as_deref()))?;

        let frame = compose_nametable(&patterns, &sets, &attributes, &nametable, set_index, lookup)?;

        ctx.info(format!(
            "Writing {}x{} nametable bitmap to {}",
            frame.width,
            frame.height,
            path.display()
        ));
        write_png(path, &frame)
    }
}
