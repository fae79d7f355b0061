//! Attribute table decoding.
//!
//! Each attribute byte covers a 4x4 tile block and holds one 2-bit palette
//! select per 2x2 quadrant:
//!
//! ```text
//!  bits 0-1 | bits 2-3
//! ----------+----------
//!  bits 4-5 | bits 6-7
//! ```
//!
//! The table is expanded into a full 32x32 grid of palette selects when it
//! is decoded, so lookups during nametable rendering are plain indexing.

use crate::error::Error;

/// Raw size of an attribute table.
pub const ATTRIBUTE_TABLE_BYTES: usize = 64;
/// Width and height of the decoded grid, in tiles.
pub const ATTRIBUTE_GRID_SIZE: usize = 32;

const BLOCKS_PER_ROW: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTable {
    raw: [u8; ATTRIBUTE_TABLE_BYTES],
    grid: [u8; ATTRIBUTE_GRID_SIZE * ATTRIBUTE_GRID_SIZE],
}

fn quadrant_shift(x: usize, y: usize) -> u8 {
    match (x % 4 < 2, y % 4 < 2) {
        (true, true) => 0,   // upper left
        (false, true) => 2,  // upper right
        (true, false) => 4,  // lower left
        (false, false) => 6, // lower right
    }
}

impl AttributeTable {
    pub fn decode(raw: &[u8]) -> Result<Self, Error> {
        Error::check_size("attribute table", raw, ATTRIBUTE_TABLE_BYTES)?;
        let mut table = Self {
            raw: [0; ATTRIBUTE_TABLE_BYTES],
            grid: [0; ATTRIBUTE_GRID_SIZE * ATTRIBUTE_GRID_SIZE],
        };
        table.raw.copy_from_slice(raw);

        for y in 0..ATTRIBUTE_GRID_SIZE {
            for x in 0..ATTRIBUTE_GRID_SIZE {
                let byte = table.raw[(y >> 2) * BLOCKS_PER_ROW + (x >> 2)];
                table.grid[y * ATTRIBUTE_GRID_SIZE + x] = (byte >> quadrant_shift(x, y)) & 0b11;
            }
        }
        Ok(table)
    }

    /// Palette select (0-3) for the tile at column `x`, row `y`.
    pub fn get(&self, x: i32, y: i32) -> Result<u8, Error> {
        let size = ATTRIBUTE_GRID_SIZE as i32;
        if !(0..size).contains(&x) || !(0..size).contains(&y) {
            return Err(Error::CoordinateOutOfRange {
                x: x.into(),
                y: y.into(),
                width: ATTRIBUTE_GRID_SIZE,
                height: ATTRIBUTE_GRID_SIZE,
            });
        }
        Ok(self.grid[y as usize * ATTRIBUTE_GRID_SIZE + x as usize])
    }

    pub fn raw(&self) -> &[u8; ATTRIBUTE_TABLE_BYTES] {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_first_byte(byte: u8) -> AttributeTable {
        let mut raw = [0u8; 64];
        raw[0] = byte;
        AttributeTable::decode(&raw).unwrap()
    }

    #[test]
    fn test_quadrant_bit_offsets() {
        // 11 01 10 01: LR=3, LL=1, UR=2, UL=1
        let table = with_first_byte(0b11_01_10_01);

        for (x, y, expected) in [
            (0, 0, 0b01), // upper left, bits 0-1
            (3, 0, 0b10), // upper right, bits 2-3
            (0, 3, 0b01), // lower left, bits 4-5
            (3, 3, 0b11), // lower right, bits 6-7
        ] {
            assert_eq!(table.get(x, y).unwrap(), expected, "tile ({x}, {y})");
        }
    }

    #[test]
    fn test_each_quadrant_isolated() {
        for shift in [0u8, 2, 4, 6] {
            let table = with_first_byte(0b11 << shift);
            let lit: Vec<(i32, i32)> = (0..4)
                .flat_map(|y| (0..4).map(move |x| (x, y)))
                .filter(|&(x, y)| table.get(x, y).unwrap() == 3)
                .collect();
            assert_eq!(lit.len(), 4, "shift {shift}");
            let (x0, y0) = lit[0];
            assert_eq!(quadrant_shift(x0 as usize, y0 as usize), shift);
        }
    }

    #[test]
    fn test_block_addressing() {
        let mut raw = [0u8; 64];
        raw[8 + 1] = 0xFF; // block row 1, column 1 -> tiles (4..8, 4..8)
        raw[63] = 0b10_10_10_10; // last block -> tiles (28..32, 28..32)
        let table = AttributeTable::decode(&raw).unwrap();

        assert_eq!(table.get(4, 4).unwrap(), 3);
        assert_eq!(table.get(7, 7).unwrap(), 3);
        assert_eq!(table.get(8, 4).unwrap(), 0);
        assert_eq!(table.get(3, 4).unwrap(), 0);
        assert_eq!(table.get(31, 31).unwrap(), 2);
        assert_eq!(table.get(28, 28).unwrap(), 2);
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let table = with_first_byte(0);
        assert!(matches!(
            table.get(32, 0),
            Err(Error::CoordinateOutOfRange { x: 32, y: 0, .. })
        ));
        assert!(matches!(
            table.get(-1, 0),
            Err(Error::CoordinateOutOfRange { x: -1, y: 0, .. })
        ));
        assert!(table.get(0, 32).is_err());
        assert!(table.get(31, 31).is_ok());
    }

    #[test]
    fn test_size_contract() {
        assert!(matches!(
            AttributeTable::decode(&[0u8; 63]),
            Err(Error::SizeContract { expected: 64, actual: 63, .. })
        ));
        assert!(matches!(
            AttributeTable::decode(&[0u8; 65]),
            Err(Error::SizeContract { expected: 64, actual: 65, .. })
        ));
        let table = AttributeTable::decode(&[0xAAu8; 64]).unwrap();
        assert_eq!(table.raw(), &[0xAAu8; 64]);
    }
}
