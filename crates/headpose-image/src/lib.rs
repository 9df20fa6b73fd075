#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for computer vision purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// Raster drawing primitives: lines, polylines and bitmap text.
pub mod draw;

mod font;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
