#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use lumen_image as image;

#[doc(inline)]
pub use lumen_imgproc as imgproc;
