//! Bitmap composition from decoded PPU structures.
//!
//! Tile sheets lay out a run of patterns under one palette using a
//! [`BitmapLayout`]. Nametables are always 256x240 and pick each tile's
//! palette from the attribute table.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::logging::LogCategory;
use crate::ppu::attribute::AttributeTable;
use crate::ppu::nametable::{Nametable, NAMETABLE_HEIGHT, NAMETABLE_WIDTH};
use crate::ppu::palette::{IndexedPalette, Palette, PaletteSet};
use crate::ppu::tile::{Pattern, TILE_SIZE};
use crate::types::Frame;

const TILE: u32 = TILE_SIZE as u32;
/// Tiles per row in the rectangular layouts (128 pixels).
const SHEET_COLUMNS: usize = 16;

/// Nametable canvas width in pixels.
pub const NAMETABLE_PIXEL_WIDTH: u32 = NAMETABLE_WIDTH as u32 * TILE;
/// Nametable canvas height in pixels.
pub const NAMETABLE_PIXEL_HEIGHT: u32 = NAMETABLE_HEIGHT as u32 * TILE;

/// How a tile sheet arranges its patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BitmapLayout {
    /// One row, left to right.
    #[default]
    Linear,
    /// Rows of up to 16 tiles.
    Rect,
    /// Rows of up to 16 vertically stacked tile pairs, matching 8x16 sprite
    /// storage order.
    #[serde(alias = "Rect8By16")]
    Rect8x16,
}

impl BitmapLayout {
    /// Canvas size in pixels for `tile_count` tiles.
    ///
    /// The Rect8x16 height counts only complete rows of 16 pairs, so sheets
    /// of fewer than 32 tiles get a zero-height canvas.
    pub fn canvas_size(self, tile_count: usize) -> (u32, u32) {
        let t = tile_count as u32;
        match self {
            BitmapLayout::Linear => (TILE * t, TILE),
            BitmapLayout::Rect => {
                let rows = t.div_ceil(SHEET_COLUMNS as u32);
                ((TILE * t).min(128), TILE * rows)
            }
            BitmapLayout::Rect8x16 => {
                let pairs = t.div_ceil(2);
                // TODO: round the row count up once callers stop relying on the truncated height.
                ((TILE * pairs).min(128), 2 * TILE * (pairs / SHEET_COLUMNS as u32))
            }
        }
    }

    /// Pixel origin of tile `index`.
    pub fn tile_origin(self, index: usize) -> (u32, u32) {
        let (column, row) = match self {
            BitmapLayout::Linear => (index, 0),
            BitmapLayout::Rect => (index % SHEET_COLUMNS, index / SHEET_COLUMNS),
            BitmapLayout::Rect8x16 => {
                let row = 2 * (index / (2 * SHEET_COLUMNS)) + index % 2;
                ((index / 2) % SHEET_COLUMNS, row)
            }
        };
        (column as u32 * TILE, row as u32 * TILE)
    }
}

/// Draw `pattern` with its top-left corner at (`target_x`, `target_y`).
///
/// Pixels landing outside the frame are dropped. Fails if a palette entry
/// the tile uses has no color in `lookup`.
pub fn blit_tile<L: IndexedPalette>(
    frame: &mut Frame,
    target_x: u32,
    target_y: u32,
    pattern: &Pattern,
    palette: &Palette,
    lookup: &L,
) -> Result<(), Error> {
    for y in 0..TILE_SIZE {
        for x in 0..TILE_SIZE {
            let color_index = palette.entry(pattern.pixel(x, y));
            let color = lookup.color(color_index as usize)?;
            frame.set_pixel(target_x + x as u32, target_y + y as u32, color);
        }
    }
    Ok(())
}

/// Render `patterns` into a tile sheet under a single palette.
///
/// The canvas is first filled with the palette's entry 0 so that cells not
/// covered by a tile have a defined color.
pub fn compose_tile_sheet<L: IndexedPalette>(
    patterns: &[Pattern],
    palette: &Palette,
    lookup: &L,
    layout: BitmapLayout,
) -> Result<Frame, Error> {
    let (width, height) = layout.canvas_size(patterns.len());
    let mut frame = Frame::new(width, height);
    frame.clear(lookup.color(palette.entry(0) as usize)?);

    for (i, pattern) in patterns.iter().enumerate() {
        let (x, y) = layout.tile_origin(i);
        blit_tile(&mut frame, x, y, pattern, palette, lookup)?;
    }

    log::trace!(
        target: LogCategory::Compose.target(),
        "{:?} sheet: {} tiles -> {}x{}",
        layout,
        patterns.len(),
        width,
        height
    );
    Ok(frame)
}

/// Render a full 32x30 nametable using palette set `selected_set`.
///
/// `patterns` is the pattern table the nametable indexes into; every index
/// it holds must be in range.
pub fn compose_nametable<L: IndexedPalette>(
    patterns: &[Pattern],
    palette_sets: &[PaletteSet],
    attributes: &AttributeTable,
    nametable: &Nametable,
    selected_set: usize,
    lookup: &L,
) -> Result<Frame, Error> {
    let set = palette_sets.get(selected_set).ok_or(Error::Bounds {
        what: "palette set",
        offset: selected_set,
        len: 1,
        available: palette_sets.len(),
    })?;

    let mut frame = Frame::new(NAMETABLE_PIXEL_WIDTH, NAMETABLE_PIXEL_HEIGHT);
    frame.clear(lookup.color(set.palettes()[0].entry(0) as usize)?);

    for y in 0..NAMETABLE_HEIGHT {
        for x in 0..NAMETABLE_WIDTH {
            let pattern_index = nametable.tile(x, y)? as usize;
            let pattern = patterns.get(pattern_index).ok_or(Error::Bounds {
                what: "nametable pattern",
                offset: pattern_index,
                len: 1,
                available: patterns.len(),
            })?;
            let select = attributes.get(x as i32, y as i32)?;
            let palette = &set.palettes()[select as usize];
            blit_tile(&mut frame, x as u32 * TILE, y as u32 * TILE, pattern, palette, lookup)?;
        }
    }
    Ok(frame)
}
