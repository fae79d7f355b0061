//! NES pattern (CHR tile) decoding.
//!
//! Each 8x8 tile is stored in 16 bytes:
//! - Bytes 0-7: Low bitplane (one bit per pixel for 8 rows)
//! - Bytes 8-15: High bitplane (one bit per pixel for 8 rows)
//!
//! Bit 7 of each plane byte is the leftmost pixel of the row.

use crate::error::Error;

/// Bytes occupied by one tile in CHR data.
pub const TILE_BYTES: usize = 16;
/// Width and height of a tile in pixels.
pub const TILE_SIZE: usize = 8;

/// One decoded 8x8 tile of 2-bit palette indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    offset: usize,
    pixels: [u8; TILE_SIZE * TILE_SIZE],
}

#[inline]
fn decode_pixel(tile_data: &[u8], x: usize, y: usize) -> u8 {
    let lo = tile_data[y];
    let hi = tile_data[y + 8];
    let bit = 7 - x;
    let lo_bit = (lo >> bit) & 1;
    let hi_bit = (hi >> bit) & 1;

    (hi_bit << 1) | lo_bit
}

impl Pattern {
    /// Decode the tile whose 16 bytes start at `offset` in `source`.
    pub fn decode(source: &[u8], offset: usize) -> Result<Self, Error> {
        Error::check_bounds("pattern", source, offset, TILE_BYTES)?;
        let tile_data = &source[offset..offset + TILE_BYTES];

        let mut pixels = [0u8; TILE_SIZE * TILE_SIZE];
        for y in 0..TILE_SIZE {
            for x in 0..TILE_SIZE {
                pixels[y * TILE_SIZE + x] = decode_pixel(tile_data, x, y);
            }
        }
        Ok(Self { offset, pixels })
    }

    /// Decode `count` consecutive tiles starting at tile number `start_tile`.
    pub fn decode_range(source: &[u8], start_tile: usize, count: usize) -> Result<Vec<Self>, Error> {
        let offset = start_tile.saturating_mul(TILE_BYTES);
        Error::check_bounds("pattern range", source, offset, count.saturating_mul(TILE_BYTES))?;
        (0..count)
            .map(|i| Self::decode(source, offset + i * TILE_BYTES))
            .collect()
    }

    /// Byte offset of the tile in the buffer it was decoded from.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Palette index (0-3) of the pixel at column `x`, row `y`.
    ///
    /// Both coordinates must be in `0..8`. Out of range coordinates panic.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < TILE_SIZE && y < TILE_SIZE, "pixel ({}, {}) outside tile", x, y);
        self.pixels[y * TILE_SIZE + x]
    }

    /// All 64 pixels in row-major order.
    pub fn pixels(&self) -> &[u8; TILE_SIZE * TILE_SIZE] {
        &self.pixels
    }
}
