//! Palette RAM structures.
//!
//! NES palette RAM holds 32 bytes of 6-bit color indices, but session files
//! store a 64-byte block: four groups of four 4-entry palettes. Pixel values
//! index a [`Palette`], whose entries index an RGB table implementing
//! [`IndexedPalette`].

use crate::error::Error;

/// Entries in one palette.
pub const PALETTE_ENTRIES: usize = 4;
/// Palettes in one palette set.
pub const PALETTES_PER_SET: usize = 4;
/// Bytes covered by one palette set.
pub const PALETTE_SET_BYTES: usize = PALETTE_ENTRIES * PALETTES_PER_SET;
/// Palette sets in a full palette block.
pub const PALETTE_SETS_PER_BLOCK: usize = 4;
/// Size of the full palette block stored in a session.
pub const PALETTE_BLOCK_BYTES: usize = PALETTE_SET_BYTES * PALETTE_SETS_PER_BLOCK;

/// Maps a color index to a 32-bit ARGB color (0xAARRGGBB).
pub trait IndexedPalette {
    /// Get the RGB color for a palette index. `index` must be below
    /// [`len`](Self::len).
    fn get_color(&self, index: usize) -> u32;

    /// Checked variant of [`get_color`](Self::get_color).
    fn color(&self, index: usize) -> Result<u32, Error> {
        if index >= self.len() {
            return Err(Error::Bounds {
                what: "color index",
                offset: index,
                len: 1,
                available: self.len(),
            });
        }
        Ok(self.get_color(index))
    }

    /// Get the number of colors in this palette.
    fn len(&self) -> usize;

    /// Check if the palette is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Four color-index slots selected by a tile's 2-bit pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    offset: usize,
    entries: [u8; PALETTE_ENTRIES],
}

impl Palette {
    pub fn decode(source: &[u8], offset: usize) -> Result<Self, Error> {
        Error::check_bounds("palette", source, offset, PALETTE_ENTRIES)?;
        let mut entries = [0u8; PALETTE_ENTRIES];
        entries.copy_from_slice(&source[offset..offset + PALETTE_ENTRIES]);
        Ok(Self { offset, entries })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn entries(&self) -> &[u8; PALETTE_ENTRIES] {
        &self.entries
    }

    /// Color index stored for the 2-bit pixel value `pixel`.
    #[inline]
    pub fn entry(&self, pixel: u8) -> u8 {
        self.entries[(pixel & 0b11) as usize]
    }
}

/// Four palettes decoded from one 16-byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteSet {
    offset: usize,
    palettes: [Palette; PALETTES_PER_SET],
}

impl PaletteSet {
    pub fn decode(source: &[u8], offset: usize) -> Result<Self, Error> {
        Error::check_bounds("palette set", source, offset, PALETTE_SET_BYTES)?;
        let palette = |i: usize| Palette::decode(source, offset + i * PALETTE_ENTRIES);
        Ok(Self {
            offset,
            palettes: [palette(0)?, palette(1)?, palette(2)?, palette(3)?],
        })
    }

    /// Decode the four palette sets of a full 64-byte palette block.
    pub fn decode_block(raw: &[u8]) -> Result<[Self; PALETTE_SETS_PER_BLOCK], Error> {
        Error::check_size("palette block", raw, PALETTE_BLOCK_BYTES)?;
        let set = |i: usize| Self::decode(raw, i * PALETTE_SET_BYTES);
        Ok([set(0)?, set(1)?, set(2)?, set(3)?])
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn palettes(&self) -> &[Palette; PALETTES_PER_SET] {
        &self.palettes
    }

    pub fn palette(&self, index: usize) -> Option<&Palette> {
        self.palettes.get(index)
    }
}
