#![deny(missing_docs)]
//! Image buffers and pixel encodings with a normalized vector adapter.

/// image buffer generic over the pixel encoding.
pub mod image;

/// pixel encodings and their conversion to normalized vectors.
pub mod pixel;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::pixel::{Pixel, Vector4};
