//! Filter operations
//!
//! Kernel convolution over any [`lumen_image::Pixel`] encoding: generic 2D, gradient pair
//! and separable two-pass convolution, edge detectors and blurs.

/// Filter kernels
pub mod kernels;

mod kernel;
pub use kernel::*;

mod convolution;
pub use convolution::{convolve_2d, convolve_2d_pair, convolve_separable, FilterOptions};
pub(crate) use convolution::{check_same_size, vectorize};

mod edge;
pub use edge::*;

mod ops;
pub use ops::*;

mod bokeh;
pub use bokeh::{bokeh_blur, BokehKernel, MAX_BOKEH_COMPONENTS};
