use std::f32::consts::PI;

use crate::error::KernelError;

/// Weights smaller than this in absolute value are not normalized.
const NORMALIZE_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ResamplerKind {
    Nearest,
    Box,
    Triangle,
    Cubic { b: f32, c: f32 },
    Lanczos,
    Welch,
}

/// A radius bounded weight function used to synthesize pixels during resize and warp.
///
/// Every weight function is even and returns zero for `|x| >= radius`, except the nearest
/// neighbor resampler which returns `x` itself and is handled as a direct lookup.
///
/// # Examples
///
/// ```
/// use lumen_imgproc::resample::Resampler;
///
/// let r = Resampler::CATMULL_ROM;
/// assert_eq!(r.radius(), 2.0);
/// assert_eq!(r.weight(0.0), 1.0);
/// assert_eq!(r.weight(1.0), 0.0);
/// assert_eq!(r.weight(2.5), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resampler {
    kind: ResamplerKind,
    radius: f32,
}

impl Resampler {
    /// Nearest neighbor.
    pub const NEAREST: Self = Self::new(ResamplerKind::Nearest, 1.0);

    /// Box filter, averages the samples under the pixel footprint.
    pub const BOX: Self = Self::new(ResamplerKind::Box, 0.5);

    /// Triangle filter, bilinear interpolation.
    pub const TRIANGLE: Self = Self::new(ResamplerKind::Triangle, 1.0);

    /// Hermite cubic, `B = 0, C = 0`.
    pub const HERMITE: Self = Self::cubic_unchecked(0.0, 0.0);

    /// Catmull-Rom cubic, `B = 0, C = 0.5`.
    pub const CATMULL_ROM: Self = Self::cubic_unchecked(0.0, 0.5);

    /// Bicubic interpolation, same weights as [`Resampler::CATMULL_ROM`].
    pub const BICUBIC: Self = Self::CATMULL_ROM;

    /// Mitchell-Netravali cubic, `B = 1/3, C = 1/3`.
    pub const MITCHELL_NETRAVALI: Self = Self::cubic_unchecked(1.0 / 3.0, 1.0 / 3.0);

    /// Robidoux cubic.
    pub const ROBIDOUX: Self = Self::cubic_unchecked(0.378_215_75, 0.310_892_12);

    /// Robidoux sharp cubic.
    pub const ROBIDOUX_SHARP: Self = Self::cubic_unchecked(0.262_014_5, 0.368_992_75);

    /// Cubic B-spline, `B = 1, C = 0`.
    pub const SPLINE: Self = Self::cubic_unchecked(1.0, 0.0);

    /// Lanczos windowed sinc with two lobes.
    pub const LANCZOS2: Self = Self::new(ResamplerKind::Lanczos, 2.0);

    /// Lanczos windowed sinc with three lobes.
    pub const LANCZOS3: Self = Self::new(ResamplerKind::Lanczos, 3.0);

    /// Lanczos windowed sinc with five lobes.
    pub const LANCZOS5: Self = Self::new(ResamplerKind::Lanczos, 5.0);

    /// Lanczos windowed sinc with eight lobes.
    pub const LANCZOS8: Self = Self::new(ResamplerKind::Lanczos, 8.0);

    /// Welch windowed sinc, radius 3.
    pub const WELCH: Self = Self::new(ResamplerKind::Welch, 3.0);

    const fn new(kind: ResamplerKind, radius: f32) -> Self {
        Self { kind, radius }
    }

    const fn cubic_unchecked(b: f32, c: f32) -> Self {
        Self::new(ResamplerKind::Cubic { b, c }, 2.0)
    }

    /// A cubic resampler with custom B-spline and cardinal coefficients.
    ///
    /// # Errors
    ///
    /// Fails if either coefficient is outside of `[0, 1]`.
    pub fn cubic(b: f32, c: f32) -> Result<Self, KernelError> {
        if !(0.0..=1.0).contains(&b) || !(0.0..=1.0).contains(&c) {
            return Err(KernelError::InvalidCubicCoefficients(b, c));
        }
        Ok(Self::cubic_unchecked(b, c))
    }

    /// A Lanczos resampler with a custom number of lobes.
    ///
    /// # Errors
    ///
    /// Fails if the radius is zero.
    pub fn lanczos(radius: u32) -> Result<Self, KernelError> {
        if radius == 0 {
            return Err(KernelError::InvalidLanczosRadius(radius));
        }
        Ok(Self::new(ResamplerKind::Lanczos, radius as f32))
    }

    /// The radius of the weight function.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns true for the nearest neighbor resampler.
    pub fn is_nearest(&self) -> bool {
        self.kind == ResamplerKind::Nearest
    }

    /// Evaluate the weight function at `x`.
    pub fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        match self.kind {
            ResamplerKind::Nearest => x,
            ResamplerKind::Box => {
                if ax < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            ResamplerKind::Triangle => {
                if ax < 1.0 {
                    1.0 - ax
                } else {
                    0.0
                }
            }
            ResamplerKind::Cubic { b, c } => cubic_bc(ax, b, c),
            ResamplerKind::Lanczos => {
                if ax < self.radius {
                    sinc(ax) * sinc(ax / self.radius)
                } else {
                    0.0
                }
            }
            ResamplerKind::Welch => {
                if ax < self.radius {
                    let w = ax / self.radius;
                    sinc(ax) * (1.0 - w * w)
                } else {
                    0.0
                }
            }
        }
    }

    /// Build the normalized weight window of a sample centered on `center`.
    ///
    /// # Arguments
    ///
    /// * `center` - The position of the sample in source coordinates.
    /// * `scale` - The ratio of source to destination length. Values below one are raised
    ///   to one so upsampling keeps the natural radius.
    /// * `len` - The length of the source axis.
    ///
    /// The window is clamped to `[0, len)`. Nearest neighbor picks the closest source
    /// index, and so does any window whose weights sum to zero, with halves rounded away
    /// from zero. The window is empty when it falls completely outside of the axis.
    pub fn window(&self, center: f32, scale: f32, len: usize) -> WeightWindow {
        if len == 0 {
            return WeightWindow::default();
        }
        let last = len as isize - 1;

        if self.is_nearest() {
            let i = center.round() as isize;
            if i < 0 || i > last {
                return WeightWindow::default();
            }
            return WeightWindow {
                start: i as usize,
                weights: vec![1.0],
            };
        }

        let scale = scale.max(1.0);
        let radius = (scale * self.radius).ceil();
        let start = ((center - radius).ceil() as isize).max(0);
        let end = ((center + radius).floor() as isize).min(last);
        if end < start {
            return WeightWindow::default();
        }

        let mut weights: Vec<f32> = (start..=end)
            .map(|j| self.weight((j as f32 - center) / scale))
            .collect();

        let sum: f32 = weights.iter().sum();
        if sum.abs() <= NORMALIZE_EPSILON {
            // every tap sits on the edge of the support, use the closest one
            let i = (center.round() as isize).clamp(start, end);
            return WeightWindow {
                start: i as usize,
                weights: vec![1.0],
            };
        }
        weights.iter_mut().for_each(|w| *w /= sum);

        WeightWindow {
            start: start as usize,
            weights,
        }
    }
}

/// A run of consecutive source samples and their weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightWindow {
    /// Index of the first source sample.
    pub start: usize,
    /// One weight per source sample starting at `start`.
    pub weights: Vec<f32>,
}

impl WeightWindow {
    /// Returns true if the window covers no source sample.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over `(source_index, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.weights
            .iter()
            .enumerate()
            .map(move |(k, &w)| (self.start + k, w))
    }
}

/// Normalized sinc, `sin(pi x) / (pi x)`.
#[inline]
fn sinc(x: f32) -> f32 {
    if x.abs() > f32::EPSILON {
        let px = PI * x;
        px.sin() / px
    } else {
        1.0
    }
}

/// The Mitchell-Netravali piecewise cubic evaluated at `x >= 0`.
#[inline]
fn cubic_bc(x: f32, b: f32, c: f32) -> f32 {
    let (x2, x3) = (x * x, x * x * x);
    if x < 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * x3 + (-18.0 + 12.0 * b + 6.0 * c) * x2 + (6.0 - 2.0 * b))
            / 6.0
    } else if x < 2.0 {
        ((-b - 6.0 * c) * x3 + (6.0 * b + 30.0 * c) * x2 + (-12.0 * b - 48.0 * c) * x
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}
