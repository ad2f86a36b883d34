//! Colors for the 2D canvas.

mod color;

pub use color::Color;
