use std::ops::Range;
use std::time::Instant;

use lumen_image::{Image, Pixel, Vector4};

use crate::error::FilterError;
use crate::filter::vectorize;
use crate::parallel::{self, ExecutionStrategy};
use crate::resample::{Resampler, WeightWindow};

mod target;
pub use target::*;

/// Precomputed weight windows of every destination sample along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeKernelMap {
    windows: Vec<WeightWindow>,
}

impl ResizeKernelMap {
    /// Build the windows mapping `dst_len` destination samples onto `src_len` source samples.
    ///
    /// Destination sample `i` is centered on `(i + 0.5) * src_len / dst_len - 0.5`. When
    /// downsampling the weight function is stretched by the scale factor so every source
    /// sample contributes. Nearest neighbor reads `floor(i * src_len / dst_len)` directly.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_imgproc::resample::Resampler;
    /// use lumen_imgproc::resize::ResizeKernelMap;
    ///
    /// let map = ResizeKernelMap::new(&Resampler::TRIANGLE, 4, 2);
    /// assert_eq!(map.window(0).start, 0);
    /// assert_eq!(map.window(0).weights.len(), 3);
    /// ```
    pub fn new(resampler: &Resampler, src_len: usize, dst_len: usize) -> Self {
        if src_len == 0 || dst_len == 0 {
            return Self {
                windows: Vec::new(),
            };
        }

        let ratio = src_len as f32 / dst_len as f32;
        let windows = (0..dst_len)
            .map(|i| {
                if resampler.is_nearest() {
                    let src_i = ((i as f32 * ratio).floor() as usize).min(src_len - 1);
                    WeightWindow {
                        start: src_i,
                        weights: vec![1.0],
                    }
                } else {
                    let center = (i as f32 + 0.5) * ratio - 0.5;
                    resampler.window(center, ratio, src_len)
                }
            })
            .collect();

        Self { windows }
    }

    /// The window of destination sample `i`.
    ///
    /// PRECONDITION: `i < dst_len`.
    pub fn window(&self, i: usize) -> &WeightWindow {
        &self.windows[i]
    }

    /// The number of destination samples.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns true if the map has no destination sample.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[inline]
fn weighted_sum<'a>(window: &WeightWindow, sample: impl Fn(usize) -> &'a Vector4) -> Vector4 {
    let mut acc = [0.0f32; 4];
    for (i, w) in window.iter() {
        let v = sample(i);
        acc[0] += w * v[0];
        acc[1] += w * v[1];
        acc[2] += w * v[2];
        acc[3] += w * v[3];
    }
    acc
}

/// Resize an image to the size of the destination.
///
/// The resize runs in two passes: every source row is resampled to the destination width
/// into an intermediate buffer, then every column of that buffer is resampled to the
/// destination height. Results are clamped before quantization.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image. Its size is the target size.
/// * `resampler` - The resampling weight function.
/// * `strategy` - The execution strategy.
///
/// # Example
///
/// ```
/// use lumen_image::{Image, ImageSize, pixel::Rgba32};
/// use lumen_imgproc::parallel::ExecutionStrategy;
/// use lumen_imgproc::resample::Resampler;
/// use lumen_imgproc::resize::resize;
///
/// let image = Image::from_size_val([4, 5].into(), Rgba32::new(10, 20, 30, 255));
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
/// let mut dst = Image::from_size_val(new_size, Rgba32::default());
///
/// resize(&image, &mut dst, &Resampler::BICUBIC, ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(dst.size().width, 2);
/// assert_eq!(dst.size().height, 3);
/// assert_eq!(dst.get(1, 2), Some(&Rgba32::new(10, 20, 30, 255)));
/// ```
pub fn resize<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    resampler: &Resampler,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    let rect = TargetRect::from_size(dst.size());
    resize_to_rect(src, dst, rect, resampler, strategy)
}

/// The destination samples of an axis covered by a run of `len` samples at `origin`.
fn visible_range(origin: isize, len: usize, dst_len: usize) -> Option<Range<usize>> {
    let start = origin.max(0);
    let end = origin.saturating_add(len as isize).min(dst_len as isize);
    (start < end).then(|| start as usize..end as usize)
}

/// Resize an image into a rectangle of the destination.
///
/// The source is resampled to the size of `rect`. Only the part of `rect` overlapping
/// `dst` is written, every other destination pixel is left untouched. A rectangle with
/// the size of the source copies the pixels without resampling.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image.
/// * `rect` - The rectangle of `dst` receiving the source. It may have a negative origin.
/// * `resampler` - The resampling weight function.
/// * `strategy` - The execution strategy.
///
/// # Example
///
/// ```
/// use lumen_image::{Image, pixel::L8};
/// use lumen_imgproc::parallel::ExecutionStrategy;
/// use lumen_imgproc::resample::Resampler;
/// use lumen_imgproc::resize::{resize_to_rect, TargetRect};
///
/// let src = Image::from_size_val([2, 2].into(), L8(90));
/// let mut dst = Image::from_size_val([4, 4].into(), L8(0));
///
/// let rect = TargetRect::new(2, 2, 4, 4);
/// resize_to_rect(&src, &mut dst, rect, &Resampler::TRIANGLE, ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(dst.get(1, 1), Some(&L8(0)));
/// assert_eq!(dst.get(3, 3), Some(&L8(90)));
/// ```
pub fn resize_to_rect<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    rect: TargetRect,
    resampler: &Resampler,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    if src.is_empty() || dst.is_empty() {
        return Ok(());
    }

    let (dst_w, dst_h) = (dst.width(), dst.height());
    let (Some(xs), Some(ys)) = (
        visible_range(rect.x, rect.width, dst_w),
        visible_range(rect.y, rect.height, dst_h),
    ) else {
        return Ok(());
    };

    // offsets of the first visible sample inside the rectangle
    let tx0 = (xs.start as isize - rect.x) as usize;
    let ty0 = (ys.start as isize - rect.y) as usize;
    let (x0, x1, y0, y1) = (xs.start, xs.end, ys.start, ys.end);
    let visible_w = x1 - x0;

    if rect.size() == src.size() {
        for y in y0..y1 {
            let src_row = &src.row(ty0 + y - y0)[tx0..tx0 + visible_w];
            dst.row_mut(y)[x0..x1].copy_from_slice(src_row);
        }
        return Ok(());
    }

    log::debug!(
        "resize: {} -> {:?} in {} radius {}",
        src.size(),
        rect,
        dst.size(),
        resampler.radius()
    );
    let start = Instant::now();

    let src_w = src.width();
    let map_x = ResizeKernelMap::new(resampler, src_w, rect.width);
    let map_y = ResizeKernelMap::new(resampler, src.height(), rect.height);

    let input = vectorize(src, strategy)?;

    // horizontal pass: src_h rows of the visible columns
    let mut intermediate = vec![[0.0f32; 4]; visible_w * src.height()];
    parallel::par_rows_zip(
        &input,
        src_w,
        &mut intermediate,
        visible_w,
        strategy,
        |_, src_row, row| {
            for (i, out) in row.iter_mut().enumerate() {
                *out = weighted_sum(map_x.window(tx0 + i), |j| &src_row[j]);
            }
        },
    )?;

    log::trace!("resize: horizontal pass done");

    // vertical pass, reads the complete intermediate buffer
    let intermediate = &intermediate;
    parallel::par_rows_mut(dst.as_slice_mut(), dst_w, strategy, |y, row| {
        if y < y0 || y >= y1 {
            return;
        }
        let window = map_y.window(ty0 + y - y0);
        for (i, out) in row[x0..x1].iter_mut().enumerate() {
            let v = weighted_sum(window, |j| &intermediate[j * visible_w + i]);
            *out = P::from_vector(v.map(|c| c.clamp(0.0, 1.0)));
        }
    })?;

    log::trace!("resize: elapsed {:?}", start.elapsed());
    Ok(())
}

/// Resize an image following a [`ResizeMode`].
///
/// The output size and the target rectangle come from [`target_location_and_bounds`].
/// Pixels of the output outside the target rectangle take `options.background`.
///
/// # Errors
///
/// Fails if both the requested width and height are zero.
///
/// # Example
///
/// ```
/// use lumen_image::{Image, pixel::Rgba32};
/// use lumen_imgproc::resize::{resize_with_options, ResizeMode, ResizeOptions};
///
/// let src = Image::from_size_val([8, 4].into(), Rgba32::new(255, 0, 0, 255));
/// let options = ResizeOptions {
///     size: [4, 4].into(),
///     mode: ResizeMode::Pad,
///     ..Default::default()
/// };
///
/// let dst = resize_with_options(&src, &options).unwrap();
///
/// assert_eq!(dst.size(), [4, 4].into());
/// assert_eq!(dst.get(0, 0), Some(&Rgba32::new(0, 0, 0, 0)));
/// assert_eq!(dst.get(0, 1), Some(&Rgba32::new(255, 0, 0, 255)));
/// ```
pub fn resize_with_options<P: Pixel>(
    src: &Image<P>,
    options: &ResizeOptions,
) -> Result<Image<P>, FilterError> {
    let (size, rect) = target_location_and_bounds(src.size(), options)?;
    let mut dst = Image::from_size_val(size, P::from_vector(options.background));
    resize_to_rect(src, &mut dst, rect, &options.resampler, options.strategy)?;
    Ok(dst)
}
