//! Core decoding and composition primitives for NEXXT/NESST session data.
//!
//! Everything in this crate is a pure transformation over borrowed, immutable
//! input: token strings become bytes ([`rle`]), bytes become PPU structures
//! ([`ppu`]), and PPU structures become pixels ([`compose`]). No file or
//! network access happens here.

pub mod compose;
pub mod error;
pub mod graphics;
pub mod logging;
pub mod ppu;
pub mod rle;

pub use error::{Error, GrammarError};

pub mod types {
    use serde::Serialize;

    /// ARGB8888 pixel buffer.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; (width * height) as usize],
            }
        }

        /// Fill every pixel with `color`.
        pub fn clear(&mut self, color: u32) {
            self.pixels.fill(color);
        }

        /// Write a pixel; coordinates outside the frame are ignored.
        #[inline]
        pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
            if x < self.width && y < self.height {
                self.pixels[(y * self.width + x) as usize] = color;
            }
        }

        pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
            if x < self.width && y < self.height {
                Some(self.pixels[(y * self.width + x) as usize])
            } else {
                None
            }
        }

        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::types::Frame;

    #[test]
    fn frame_initialization() {
        let f = Frame::new(10, 10);
        assert_eq!(f.pixels.len(), 100);
        assert_eq!(f.width, 10);
        assert_eq!(f.height, 10);
    }

    #[test]
    fn frame_set_pixel_clips() {
        let mut f = Frame::new(4, 2);
        f.set_pixel(3, 1, 0xFFFF0000);
        f.set_pixel(4, 0, 0xFF00FF00);
        f.set_pixel(0, 2, 0xFF00FF00);

        assert_eq!(f.pixel(3, 1), Some(0xFFFF0000));
        assert_eq!(f.pixel(4, 0), None);
        assert_eq!(f.pixels.iter().filter(|&&p| p != 0).count(), 1);
    }

    #[test]
    fn frame_clear_and_empty() {
        let mut f = Frame::new(2, 2);
        f.clear(0xFF123456);
        assert!(f.pixels.iter().all(|&p| p == 0xFF123456));
        assert!(!f.is_empty());
        assert!(Frame::new(80, 0).is_empty());
    }
}
