use lumen_image::{ImageSize, Vector4};

use crate::error::FilterError;
use crate::parallel::ExecutionStrategy;
use crate::resample::Resampler;

/// The rectangle of the destination image that receives the resized source.
///
/// The origin may be negative and the rectangle may extend past the destination. Only the
/// part overlapping the destination is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetRect {
    /// The x coordinate of the top-left corner.
    pub x: isize,
    /// The y coordinate of the top-left corner.
    pub y: isize,
    /// The width of the rectangle.
    pub width: usize,
    /// The height of the rectangle.
    pub height: usize,
}

impl TargetRect {
    /// Create a new rectangle.
    pub fn new(x: isize, y: isize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle covering a whole image of the given size.
    pub fn from_size(size: ImageSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// The size of the rectangle.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// Where the resized image is anchored when it does not fill the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnchorPosition {
    /// Centered on both axes.
    #[default]
    Center,
    /// Top edge, centered horizontally.
    Top,
    /// Bottom edge, centered horizontally.
    Bottom,
    /// Left edge, centered vertically.
    Left,
    /// Right edge, centered vertically.
    Right,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-right corner.
    BottomRight,
    /// Bottom-left corner.
    BottomLeft,
}

#[derive(Clone, Copy)]
enum Align {
    Start,
    Middle,
    End,
}

impl Align {
    /// The offset of a run inside an axis with `free` spare samples.
    fn offset(self, free: f32) -> isize {
        match self {
            Align::Start => 0,
            Align::Middle => (free / 2.0).round() as isize,
            Align::End => free.round() as isize,
        }
    }

    /// Same as `offset` with integer halving.
    fn offset_int(self, free: isize) -> isize {
        match self {
            Align::Start => 0,
            Align::Middle => free / 2,
            Align::End => free,
        }
    }
}

impl AnchorPosition {
    fn horizontal(self) -> Align {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Align::Start,
            Self::Right | Self::TopRight | Self::BottomRight => Align::End,
            _ => Align::Middle,
        }
    }

    fn vertical(self) -> Align {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Align::Start,
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Align::End,
            _ => Align::Middle,
        }
    }
}

/// How the source is fitted into the requested size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResizeMode {
    /// Scale to cover the requested size keeping the aspect ratio, cropping the overflow.
    #[default]
    Crop,
    /// Scale to fit inside the requested size keeping the aspect ratio. The remaining
    /// area is padded.
    Pad,
    /// Pad without scaling when the requested size is larger on both axes, otherwise
    /// behave as [`ResizeMode::Pad`].
    BoxPad,
    /// Scale to fit inside the requested size keeping the aspect ratio. The output takes
    /// the size of the scaled image.
    Max,
    /// Scale down until the shortest distance reaches the requested size. Never upscales.
    Min,
    /// Resize into a caller supplied rectangle. A zero width or height of the rectangle
    /// takes the requested size.
    Manual(TargetRect),
    /// Scale each axis independently to the requested size.
    Stretch,
}

/// Parameters of [`super::resize_with_options`].
///
/// A zero width or height in `size` is derived from the other one, keeping the aspect
/// ratio of the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOptions {
    /// The requested size.
    pub size: ImageSize,
    /// How the source is fitted into `size`.
    pub mode: ResizeMode,
    /// The anchor of the resized image for the crop and pad modes.
    pub position: AnchorPosition,
    /// A normalized focal point for [`ResizeMode::Crop`]. Takes precedence over `position`.
    pub center: Option<[f32; 2]>,
    /// The resampling weight function.
    pub resampler: Resampler,
    /// The value of the destination pixels outside the target rectangle.
    pub background: Vector4,
    /// How the rows are scheduled.
    pub strategy: ExecutionStrategy,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            size: ImageSize::default(),
            mode: ResizeMode::default(),
            position: AnchorPosition::default(),
            center: None,
            resampler: Resampler::BICUBIC,
            background: [0.0; 4],
            strategy: ExecutionStrategy::default(),
        }
    }
}

impl ResizeOptions {
    /// Options requesting `size` with the default mode and resampler.
    pub fn with_size(size: ImageSize) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }
}

fn sanitize(v: usize) -> usize {
    v.max(1)
}

fn sanitized(width: usize, height: usize) -> ImageSize {
    ImageSize {
        width: sanitize(width),
        height: sanitize(height),
    }
}

/// Compute the output size and the target rectangle of a resize.
///
/// # Arguments
///
/// * `source` - The size of the source image.
/// * `options` - The requested size, mode and anchor.
///
/// # Returns
///
/// The size of the output image and the rectangle of it that receives the source. Both
/// have a width and height of at least one.
///
/// # Errors
///
/// Fails if both the requested width and height are zero.
///
/// # Examples
///
/// ```
/// use lumen_image::ImageSize;
/// use lumen_imgproc::resize::{target_location_and_bounds, ResizeMode, ResizeOptions, TargetRect};
///
/// let options = ResizeOptions {
///     size: [100, 100].into(),
///     mode: ResizeMode::Pad,
///     ..Default::default()
/// };
/// let (size, rect) = target_location_and_bounds([200, 100].into(), &options).unwrap();
///
/// assert_eq!(size, ImageSize { width: 100, height: 100 });
/// assert_eq!(rect, TargetRect::new(0, 25, 100, 50));
/// ```
pub fn target_location_and_bounds(
    source: ImageSize,
    options: &ResizeOptions,
) -> Result<(ImageSize, TargetRect), FilterError> {
    let ImageSize {
        mut width,
        mut height,
    } = options.size;

    if width == 0 && height == 0 {
        return Err(FilterError::EmptyTargetSize);
    }

    let (sw, sh) = (source.width as f32, source.height as f32);
    if width == 0 {
        width = sanitize((sw * height as f32 / sh).round() as usize);
    }
    if height == 0 {
        height = sanitize((sh * width as f32 / sw).round() as usize);
    }

    let bounds = match options.mode {
        ResizeMode::Crop => crop_rect(source, options, width, height),
        ResizeMode::Pad => pad_rect(source, options.position, width, height),
        ResizeMode::BoxPad => box_pad_rect(source, options.position, width, height),
        ResizeMode::Max => max_rect(source, width, height),
        ResizeMode::Min => min_rect(source, width, height),
        ResizeMode::Manual(rect) => {
            let w = if rect.width > 0 { rect.width } else { width };
            let h = if rect.height > 0 { rect.height } else { height };
            (
                sanitized(width, height),
                TargetRect::new(rect.x, rect.y, sanitize(w), sanitize(h)),
            )
        }
        ResizeMode::Stretch => (
            sanitized(width, height),
            TargetRect::new(0, 0, sanitize(width), sanitize(height)),
        ),
    };

    log::debug!(
        "resize bounds: {} {:?} -> {} at {:?}",
        source,
        options.mode,
        bounds.0,
        bounds.1
    );

    Ok(bounds)
}

fn crop_rect(
    source: ImageSize,
    options: &ResizeOptions,
    width: usize,
    height: usize,
) -> (ImageSize, TargetRect) {
    let (sw, sh) = (source.width as f32, source.height as f32);
    let (w, h) = (width as f32, height as f32);
    let percent_w = w / sw;
    let percent_h = h / sh;

    let mut rect = TargetRect::new(0, 0, width, height);

    if percent_h < percent_w {
        // fit the width, overflow vertically
        let free = h - sh * percent_w;
        rect.y = match options.center {
            Some([_, cy]) => {
                let y = (-(percent_w * sh) * cy + h / 2.0).round() as isize;
                y.min(0).max(free.round() as isize)
            }
            None => options.position.vertical().offset(free),
        };
        rect.height = (sh * percent_w).ceil() as usize;
    } else {
        let free = w - sw * percent_h;
        rect.x = match options.center {
            Some([cx, _]) => {
                let x = (-(percent_h * sw) * cx + w / 2.0).round() as isize;
                x.min(0).max(free.round() as isize)
            }
            None => options.position.horizontal().offset(free),
        };
        rect.width = (sw * percent_h).ceil() as usize;
    }

    rect.width = sanitize(rect.width);
    rect.height = sanitize(rect.height);
    (sanitized(width, height), rect)
}

fn pad_rect(
    source: ImageSize,
    position: AnchorPosition,
    width: usize,
    height: usize,
) -> (ImageSize, TargetRect) {
    let (sw, sh) = (source.width as f32, source.height as f32);
    let (w, h) = (width as f32, height as f32);
    let percent_w = w / sw;
    let percent_h = h / sh;

    let mut rect = TargetRect::new(0, 0, width, height);

    if percent_h < percent_w {
        // fit the height, pad horizontally
        rect.width = (sw * percent_h).round() as usize;
        rect.x = position.horizontal().offset(w - sw * percent_h);
    } else {
        rect.height = (sh * percent_w).round() as usize;
        rect.y = position.vertical().offset(h - sh * percent_w);
    }

    rect.width = sanitize(rect.width);
    rect.height = sanitize(rect.height);
    (sanitized(width, height), rect)
}

fn box_pad_rect(
    source: ImageSize,
    position: AnchorPosition,
    width: usize,
    height: usize,
) -> (ImageSize, TargetRect) {
    if source.width < width && source.height < height {
        let free_x = width as isize - source.width as isize;
        let free_y = height as isize - source.height as isize;
        let rect = TargetRect::new(
            position.horizontal().offset_int(free_x),
            position.vertical().offset_int(free_y),
            sanitize(source.width),
            sanitize(source.height),
        );
        return (sanitized(width, height), rect);
    }

    pad_rect(source, position, width, height)
}

fn max_rect(source: ImageSize, width: usize, height: usize) -> (ImageSize, TargetRect) {
    let (sw, sh) = (source.width as f32, source.height as f32);
    let (w, h) = (width as f32, height as f32);

    let (mut tw, mut th) = (width, height);
    if sh / sw < h / w {
        th = (sh * (w / sw)).round() as usize;
    } else {
        tw = (sw * (h / sh)).round() as usize;
    }

    let size = sanitized(tw, th);
    (size, TargetRect::from_size(size))
}

fn min_rect(source: ImageSize, width: usize, height: usize) -> (ImageSize, TargetRect) {
    if width > source.width || height > source.height {
        return (source, TargetRect::from_size(source));
    }

    let (sw, sh) = (source.width as f32, source.height as f32);
    let (w, h) = (width as f32, height as f32);

    // the axis with the shortest distance to go decides the scale
    let width_diff = source.width - width;
    let height_diff = source.height - height;

    let (mut tw, mut th) = (width, height);
    if width_diff < height_diff {
        th = (w * sh / sw).round() as usize;
    } else if width_diff > height_diff {
        tw = (h * sw / sh).round() as usize;
    } else if height > width {
        th = (sh * (w / sw)).round() as usize;
    } else {
        tw = (sw * (h / sh)).round() as usize;
    }

    let size = sanitized(tw, th);
    (size, TargetRect::from_size(size))
}
