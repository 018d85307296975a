#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// border handling for kernel sampling.
pub mod border;

/// color transformations module.
pub mod color;

/// error types of the processing operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// module containing parallization utilities.
pub mod parallel;

/// resampling weight functions.
pub mod resample;

/// utility functions for resizing images.
pub mod resize;

/// image geometric transformations module.
pub mod warp;
