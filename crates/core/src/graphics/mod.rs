//! Shared graphics helpers.

pub mod color;

pub use color::ColorOps;
