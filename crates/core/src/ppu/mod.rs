//! Decoders for the fixed NES PPU memory layouts stored in session files.
//!
//! - [`Pattern`]: 16-byte 2bpp planar tile
//! - [`Palette`] / [`PaletteSet`]: 4-byte palettes grouped four to a set
//! - [`AttributeTable`]: 64-byte palette-select table
//! - [`Nametable`]: 960-byte tile map
//! - [`RgbLookup`]: 64-entry color-index to RGB table

pub mod attribute;
pub mod lookup;
pub mod nametable;
pub mod palette;
pub mod tile;

pub use attribute::AttributeTable;
pub use lookup::{RgbLookup, RgbLookupRegistry, DEFAULT_LOOKUP_ID};
pub use nametable::Nametable;
pub use palette::{IndexedPalette, Palette, PaletteSet};
pub use tile::Pattern;
