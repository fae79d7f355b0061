//! Nametable (background tile map) decoding.

use crate::error::Error;

/// Nametable width in tiles.
pub const NAMETABLE_WIDTH: usize = 32;
/// Nametable height in tiles.
pub const NAMETABLE_HEIGHT: usize = 30;
/// Raw size of a nametable, without its attribute table.
pub const NAMETABLE_BYTES: usize = NAMETABLE_WIDTH * NAMETABLE_HEIGHT;

/// 32x30 grid of pattern indices, one per background tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nametable {
    indices: [u8; NAMETABLE_BYTES],
}

impl Nametable {
    pub fn decode(raw: &[u8]) -> Result<Self, Error> {
        Error::check_size("nametable", raw, NAMETABLE_BYTES)?;
        let mut indices = [0u8; NAMETABLE_BYTES];
        indices.copy_from_slice(raw);
        Ok(Self { indices })
    }

    /// Pattern index at tile column `x`, row `y`.
    pub fn tile(&self, x: usize, y: usize) -> Result<u8, Error> {
        if x >= NAMETABLE_WIDTH || y >= NAMETABLE_HEIGHT {
            return Err(Error::CoordinateOutOfRange {
                x: x as i64,
                y: y as i64,
                width: NAMETABLE_WIDTH,
                height: NAMETABLE_HEIGHT,
            });
        }
        Ok(self.indices[y * NAMETABLE_WIDTH + x])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let raw: Vec<u8> = (0..NAMETABLE_BYTES).map(|i| (i % 251) as u8).collect();
        let nametable = Nametable::decode(&raw).unwrap();
        assert_eq!(nametable.tile(0, 0).unwrap(), 0);
        assert_eq!(nametable.tile(5, 0).unwrap(), 5);
        assert_eq!(nametable.tile(0, 1).unwrap(), 32);
        assert_eq!(nametable.tile(31, 29).unwrap(), (959 % 251) as u8);
    }

    #[test]
    fn test_size_contract() {
        assert!(Nametable::decode(&[0u8; 959]).is_err());
        assert!(Nametable::decode(&[0u8; 1024]).is_err());
        assert!(Nametable::decode(&[0u8; 960]).is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let nametable = Nametable::decode(&[0u8; 960]).unwrap();
        assert!(nametable.tile(32, 0).is_err());
        assert!(nametable.tile(0, 30).is_err());
    }
}
