use lumen_image::ImageError;
use thiserror::Error;

use crate::parallel::ParallelError;

/// Errors raised while building kernels or resampling functions.
///
/// These are always reported when the kernel is constructed, never when it is applied.
#[derive(Error, Debug, PartialEq)]
pub enum KernelError {
    /// The kernel has no weights.
    #[error("kernel must contain at least one weight")]
    Empty,

    /// The kernel has an even number of rows or columns.
    #[error("kernel dimensions must be odd, got {0}x{1}")]
    EvenDimension(usize, usize),

    /// A row of a nested kernel definition has a different length than the first row.
    #[error("kernel row {0} has {1} weights, expected {2}")]
    RaggedRows(usize, usize, usize),

    /// The weight buffer does not match the requested dimensions.
    #[error("kernel data length ({0}) does not match {1}x{2}")]
    InvalidDataLength(usize, usize, usize),

    /// Two kernels that must share their dimensions do not.
    #[error("kernel size mismatch: {0}x{1} != {2}x{3}")]
    SizeMismatch(usize, usize, usize, usize),

    /// A separable kernel pair is not made of a row and a column.
    #[error("kernel pair must be 1xN and Nx1, got {0}x{1} and {2}x{3}")]
    InvalidPairShape(usize, usize, usize, usize),

    /// Sigma must be a finite positive number.
    #[error("sigma must be finite and positive, got {0}")]
    InvalidSigma(f32),

    /// The requested kernel size is not supported by the builder.
    #[error("unsupported kernel size {0}")]
    UnsupportedSize(usize),

    /// Cubic resampler coefficients out of the `[0, 1]` range.
    #[error("cubic coefficients must lie in [0, 1], got b={0} c={1}")]
    InvalidCubicCoefficients(f32, f32),

    /// Lanczos windows need a positive radius.
    #[error("lanczos radius must be positive, got {0}")]
    InvalidLanczosRadius(u32),

    /// A bokeh kernel supports between one and six components.
    #[error("bokeh component count must be in 1..=6, got {0}")]
    InvalidComponentCount(usize),

    /// The bokeh highlight gamma must be a finite positive number.
    #[error("gamma must be finite and positive, got {0}")]
    InvalidGamma(f32),
}

/// Errors raised by the filtering and resampling operations.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    /// The source or destination image is not valid for the operation.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The kernel is not valid.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// The parallel executor failed.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// A resize was requested with both the target width and height set to zero.
    #[error("target width and height must not both be zero")]
    EmptyTargetSize,
}
