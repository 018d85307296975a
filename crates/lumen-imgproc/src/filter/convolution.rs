use std::time::Instant;

use lumen_image::{Image, ImageError, ImageSize, Pixel, Vector4};

use super::kernel::{GradientPair, Kernel, KernelPair};
use crate::border::{BorderMode, BorderSamplingMap};
use crate::error::FilterError;
use crate::parallel::{self, ExecutionStrategy, ParallelError};

/// Settings shared by every convolution based operation.
///
/// # Examples
///
/// ```
/// use lumen_imgproc::border::BorderMode;
/// use lumen_imgproc::filter::FilterOptions;
///
/// let options = FilterOptions {
///     border_x: BorderMode::Wrap,
///     ..Default::default()
/// };
///
/// assert_eq!(options.border_y, BorderMode::Repeat);
/// assert!(!options.preserve_alpha);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterOptions {
    /// Border mode along the x axis.
    pub border_x: BorderMode,
    /// Border mode along the y axis.
    pub border_y: BorderMode,
    /// Keep the alpha of each source pixel instead of the convolved alpha.
    pub preserve_alpha: bool,
    /// How the rows are scheduled.
    pub strategy: ExecutionStrategy,
}

impl FilterOptions {
    /// Options using the same border mode on both axes.
    pub fn with_border(border: BorderMode) -> Self {
        Self {
            border_x: border,
            border_y: border,
            ..Default::default()
        }
    }
}

/// Check that both images have the same size.
pub(crate) fn check_same_size<P: Pixel, Q: Pixel>(
    src: &Image<P>,
    dst: &Image<Q>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Convert every pixel of the image to its normalized vector.
pub(crate) fn vectorize<P: Pixel>(
    src: &Image<P>,
    strategy: ExecutionStrategy,
) -> Result<Vec<Vector4>, ParallelError> {
    let width = src.width();
    let mut out = vec![[0.0; 4]; src.size().area()];
    parallel::par_rows_zip(
        src.as_slice(),
        width,
        &mut out,
        width,
        strategy,
        |_, src_row, out_row| {
            out_row
                .iter_mut()
                .zip(src_row)
                .for_each(|(v, p)| *v = p.to_vector());
        },
    )?;
    Ok(out)
}

/// Accumulate `kernel` centered on the pixel `(x, y)`.
#[inline]
fn accumulate_2d(
    src: &[Vector4],
    width: usize,
    kernel: &Kernel,
    map: &BorderSamplingMap,
    y: usize,
    x: usize,
) -> Vector4 {
    let columns = map.column_offsets(x);
    let mut acc = [0.0f32; 4];
    for (ky, &sy) in map.row_offsets(y).iter().enumerate() {
        let src_row = &src[sy * width..(sy + 1) * width];
        for (&w, &sx) in kernel.row_weights(ky).iter().zip(columns) {
            let v = &src_row[sx];
            acc[0] += w * v[0];
            acc[1] += w * v[1];
            acc[2] += w * v[2];
            acc[3] += w * v[3];
        }
    }
    acc
}

/// Direct 2D convolution of a vector buffer into `dst`.
pub(crate) fn direct_pass(
    src: &[Vector4],
    dst: &mut [Vector4],
    size: ImageSize,
    kernel: &Kernel,
    border_x: BorderMode,
    border_y: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<(), ParallelError> {
    let map = BorderSamplingMap::new(size, kernel.rows(), kernel.cols(), border_x, border_y);
    let width = size.width;
    parallel::par_rows_mut(dst, width, strategy, |y, dst_row| {
        for (x, out) in dst_row.iter_mut().enumerate() {
            *out = accumulate_2d(src, width, kernel, &map, y, x);
        }
    })
}

/// Convolve both kernels of a gradient pair and combine them as `sqrt(gx^2 + gy^2)`.
pub(crate) fn gradient_pass(
    src: &[Vector4],
    dst: &mut [Vector4],
    size: ImageSize,
    pair: &GradientPair,
    border_x: BorderMode,
    border_y: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<(), ParallelError> {
    let (kx, ky) = (pair.x(), pair.y());
    // both kernels share their dimensions so one map serves both
    let map = BorderSamplingMap::new(size, kx.rows(), kx.cols(), border_x, border_y);
    let width = size.width;
    parallel::par_rows_mut(dst, width, strategy, |y, dst_row| {
        for (x, out) in dst_row.iter_mut().enumerate() {
            let gx = accumulate_2d(src, width, kx, &map, y, x);
            let gy = accumulate_2d(src, width, ky, &map, y, x);
            for c in 0..4 {
                out[c] = (gx[c] * gx[c] + gy[c] * gy[c]).sqrt();
            }
        }
    })
}

/// Two-pass convolution: rows with the horizontal kernel, then columns with the vertical one.
pub(crate) fn separable_pass(
    src: &[Vector4],
    dst: &mut [Vector4],
    size: ImageSize,
    pair: &KernelPair,
    border_x: BorderMode,
    border_y: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<(), ParallelError> {
    let n = pair.len();
    let map = BorderSamplingMap::new(size, n, n, border_x, border_y);
    let width = size.width;
    let horizontal = pair.horizontal().as_slice();
    let vertical = pair.vertical().as_slice();

    let mut intermediate = vec![[0.0f32; 4]; src.len()];

    parallel::par_rows_mut(&mut intermediate, width, strategy, |y, row| {
        let src_row = &src[y * width..(y + 1) * width];
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = [0.0f32; 4];
            for (&w, &sx) in horizontal.iter().zip(map.column_offsets(x)) {
                let v = &src_row[sx];
                acc[0] += w * v[0];
                acc[1] += w * v[1];
                acc[2] += w * v[2];
                acc[3] += w * v[3];
            }
            *out = acc;
        }
    })?;

    log::trace!("horizontal pass done, starting vertical pass");

    // the horizontal pass has returned, every intermediate row is complete
    let intermediate = &intermediate;
    parallel::par_rows_mut(dst, width, strategy, |y, row| {
        let rows = map.row_offsets(y);
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = [0.0f32; 4];
            for (&w, &sy) in vertical.iter().zip(rows) {
                let v = &intermediate[sy * width + x];
                acc[0] += w * v[0];
                acc[1] += w * v[1];
                acc[2] += w * v[2];
                acc[3] += w * v[3];
            }
            *out = acc;
        }
    })
}

/// Clamp the accumulated vectors into `[0, 1]` and quantize them into `dst`.
///
/// With `preserve_alpha` the fourth channel is taken from the same pixel of `src`.
pub(crate) fn write_back<P: Pixel>(
    acc: &[Vector4],
    src: &Image<P>,
    dst: &mut Image<P>,
    preserve_alpha: bool,
    strategy: ExecutionStrategy,
) -> Result<(), ParallelError> {
    let width = dst.width();
    parallel::par_rows_zip(
        acc,
        width,
        dst.as_slice_mut(),
        width,
        strategy,
        |y, acc_row, dst_row| {
            let src_row = src.row(y);
            for ((out, &v), orig) in dst_row.iter_mut().zip(acc_row).zip(src_row) {
                let mut v = v.map(|c| c.clamp(0.0, 1.0));
                if preserve_alpha {
                    v[3] = orig.to_vector()[3];
                }
                *out = P::from_vector(v);
            }
        },
    )
}

/// Convolve an image with a single 2D kernel.
///
/// Border taps are resolved with the border modes of `options`; every destination pixel
/// receives a value.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, same size as `src`.
/// * `kernel` - The kernel to apply.
/// * `options` - Border modes, alpha handling and execution strategy.
///
/// # Errors
///
/// Fails if the images do not have the same size.
///
/// # Examples
///
/// ```
/// use lumen_image::{Image, pixel::L8};
/// use lumen_imgproc::filter::{convolve_2d, FilterOptions, Kernel};
///
/// let src = Image::from_fn([5, 5].into(), |x, _| L8((x * 50) as u8));
/// let mut dst = Image::from_size_val(src.size(), L8(0));
/// let identity = Kernel::new(3, 3, vec![0., 0., 0., 0., 1., 0., 0., 0., 0.]).unwrap();
///
/// convolve_2d(&src, &mut dst, &identity, &FilterOptions::default()).unwrap();
/// assert_eq!(dst, src);
/// ```
pub fn convolve_2d<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    kernel: &Kernel,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    check_same_size(src, dst)?;
    if src.is_empty() {
        return Ok(());
    }

    log::debug!(
        "convolve_2d: image {} kernel {}x{}",
        src.size(),
        kernel.rows(),
        kernel.cols()
    );
    let start = Instant::now();

    let input = vectorize(src, options.strategy)?;
    let mut acc = vec![[0.0f32; 4]; input.len()];
    direct_pass(
        &input,
        &mut acc,
        src.size(),
        kernel,
        options.border_x,
        options.border_y,
        options.strategy,
    )?;
    write_back(&acc, src, dst, options.preserve_alpha, options.strategy)?;

    log::trace!("convolve_2d: elapsed {:?}", start.elapsed());
    Ok(())
}

/// Convolve an image with a gradient pair and write the per-channel magnitude.
///
/// Each channel of the output is `sqrt(gx^2 + gy^2)` clamped to `[0, 1]`.
pub fn convolve_2d_pair<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    pair: &GradientPair,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    check_same_size(src, dst)?;
    if src.is_empty() {
        return Ok(());
    }

    log::debug!(
        "convolve_2d_pair: image {} kernel {}x{}",
        src.size(),
        pair.x().rows(),
        pair.x().cols()
    );
    let start = Instant::now();

    let input = vectorize(src, options.strategy)?;
    let mut acc = vec![[0.0f32; 4]; input.len()];
    gradient_pass(
        &input,
        &mut acc,
        src.size(),
        pair,
        options.border_x,
        options.border_y,
        options.strategy,
    )?;
    write_back(&acc, src, dst, options.preserve_alpha, options.strategy)?;

    log::trace!("convolve_2d_pair: elapsed {:?}", start.elapsed());
    Ok(())
}

/// Convolve an image with a separable kernel pair in two passes.
///
/// The result matches [`convolve_2d`] with the outer product of the pair up to floating
/// point rounding.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, same size as `src`.
/// * `pair` - The horizontal and vertical kernels.
/// * `options` - Border modes, alpha handling and execution strategy.
pub fn convolve_separable<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    pair: &KernelPair,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    check_same_size(src, dst)?;
    if src.is_empty() {
        return Ok(());
    }

    log::debug!(
        "convolve_separable: image {} kernel length {}",
        src.size(),
        pair.len()
    );
    let start = Instant::now();

    let input = vectorize(src, options.strategy)?;
    let mut acc = vec![[0.0f32; 4]; input.len()];
    separable_pass(
        &input,
        &mut acc,
        src.size(),
        pair,
        options.border_x,
        options.border_y,
        options.strategy,
    )?;
    write_back(&acc, src, dst, options.preserve_alpha, options.strategy)?;

    log::trace!("convolve_separable: elapsed {:?}", start.elapsed());
    Ok(())
}
