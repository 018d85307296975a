use std::time::Instant;

use lumen_image::{Image, Pixel};
use num_complex::Complex32;

use super::convolution::{check_same_size, vectorize, write_back, FilterOptions};
use crate::border::BorderSamplingMap;
use crate::error::{FilterError, KernelError};
use crate::parallel;

/// Per component `[a, b, real weight, imaginary weight]` for 1 to 6 components.
///
/// Each component is the complex gaussian `exp(-a x^2) * (cos(b x^2) + i sin(b x^2))`.
const COMPONENT_PARAMETERS: [&[[f32; 4]]; 6] = [
    &[[0.862325, 1.624835, 0.767583, 1.862321]],
    &[
        [0.886528, 5.268909, 0.411259, -0.548794],
        [1.960518, 1.558213, 0.513282, 4.56111],
    ],
    &[
        [2.17649, 5.043495, 1.621035, -2.105439],
        [1.019306, 9.027613, -0.28086, -0.162882],
        [2.81511, 1.597273, -0.366471, 10.300301],
    ],
    &[
        [4.338459, 1.553635, -5.767909, 46.164397],
        [3.839993, 4.693183, 9.795391, -15.227561],
        [2.791880, 8.178137, -3.048324, 0.302959],
        [1.342190, 12.328289, 0.010001, 0.244650],
    ],
    &[
        [4.892608, 1.685979, -22.356787, 85.91246],
        [4.71187, 4.998496, 35.918936, -28.875618],
        [4.052795, 8.244168, -13.212253, -1.578428],
        [2.929212, 11.900859, 0.507991, 1.816328],
        [1.512961, 16.116382, 0.138051, -0.01],
    ],
    &[
        [5.143778, 2.079813, -82.326596, 111.231024],
        [5.612426, 6.153387, 113.878661, 58.004879],
        [5.982921, 9.802895, 39.479083, -162.028887],
        [6.505167, 11.059237, -71.286026, 95.027069],
        [3.869579, 14.81052, 1.405746, -3.704914],
        [2.201904, 19.032909, -0.152784, -0.107988],
    ],
];

/// Stretch of the sampled range of each component set.
const COMPONENT_SCALES: [f32; 6] = [1.4, 1.2, 1.2, 1.2, 1.2, 1.2];

/// The largest supported number of components.
pub const MAX_BOKEH_COMPONENTS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
struct BokehComponent {
    taps: Vec<Complex32>,
    real_weight: f32,
    imag_weight: f32,
}

/// A lens blur kernel made of separable complex gaussian components.
///
/// The 2D response of every component is the outer product of its 1D taps with
/// themselves. The blur sums `real_weight * Re + imag_weight * Im` of all the responses,
/// which approximates a flat disc. The taps are scaled so this sum over the whole kernel
/// is one.
///
/// # Examples
///
/// ```
/// use lumen_imgproc::filter::BokehKernel;
///
/// let kernel = BokehKernel::new(32, 2).unwrap();
/// assert_eq!(kernel.len(), 65);
/// assert_eq!(kernel.components(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BokehKernel {
    radius: usize,
    components: Vec<BokehComponent>,
}

impl BokehKernel {
    /// Build a kernel of `2 * radius + 1` taps with the given number of components.
    ///
    /// More components give a sharper disc edge at a higher cost.
    ///
    /// # Errors
    ///
    /// Fails if the radius is zero or the number of components is not in `1..=6`.
    pub fn new(radius: usize, components: usize) -> Result<Self, KernelError> {
        if radius == 0 {
            return Err(KernelError::UnsupportedSize(1));
        }
        if !(1..=MAX_BOKEH_COMPONENTS).contains(&components) {
            return Err(KernelError::InvalidComponentCount(components));
        }

        let scale = COMPONENT_SCALES[components - 1];
        let r = radius as isize;

        let mut parts: Vec<BokehComponent> = COMPONENT_PARAMETERS[components - 1]
            .iter()
            .map(|&[a, b, real_weight, imag_weight]| {
                let taps = (-r..=r)
                    .map(|n| {
                        let v = n as f32 * scale / radius as f32;
                        let v = v * v;
                        Complex32::from_polar((-a * v).exp(), b * v)
                    })
                    .collect();
                BokehComponent {
                    taps,
                    real_weight,
                    imag_weight,
                }
            })
            .collect();

        // the 2D sum of a component is the square of its 1D sum
        let total: f32 = parts.iter().map(BokehComponent::response).sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(KernelError::UnsupportedSize(2 * radius + 1));
        }

        let scalar = 1.0 / total.sqrt();
        for part in parts.iter_mut() {
            part.taps.iter_mut().for_each(|t| *t *= scalar);
        }

        Ok(Self {
            radius,
            components: parts,
        })
    }

    /// The radius of the kernel.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// The number of taps of every 1D component.
    pub fn len(&self) -> usize {
        2 * self.radius + 1
    }

    /// Always false, a kernel has at least three taps.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The number of components.
    pub fn components(&self) -> usize {
        self.components.len()
    }

    /// The 1D taps of component `i`.
    ///
    /// PRECONDITION: `i < self.components()`.
    pub fn taps(&self, i: usize) -> &[Complex32] {
        &self.components[i].taps
    }

    /// The real and imaginary weights of component `i`.
    ///
    /// PRECONDITION: `i < self.components()`.
    pub fn weights(&self, i: usize) -> (f32, f32) {
        let part = &self.components[i];
        (part.real_weight, part.imag_weight)
    }

    /// Sum of the weighted 2D responses of all components.
    pub fn response(&self) -> f32 {
        self.components.iter().map(BokehComponent::response).sum()
    }
}

impl BokehComponent {
    fn response(&self) -> f32 {
        let sum: Complex32 = self.taps.iter().sum();
        let square = sum * sum;
        self.real_weight * square.re + self.imag_weight * square.im
    }
}

/// Apply a bokeh lens blur.
///
/// The color channels are premultiplied by alpha and raised to `gamma` so bright areas
/// bloom into discs. Every component runs a vertical pass from the real pixels to complex
/// values, then a horizontal complex pass, and is folded into the result. The result is
/// raised to `1 / gamma` and divided by alpha again.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, same size as `src`.
/// * `kernel` - The bokeh kernel.
/// * `gamma` - The highlight exposure. `1` is a plain lens blur.
/// * `options` - Border modes, alpha handling and execution strategy.
///
/// # Errors
///
/// Fails if `gamma` is not finite and positive or the images differ in size.
///
/// # Examples
///
/// ```
/// use lumen_image::{Image, pixel::Rgba32};
/// use lumen_imgproc::filter::{bokeh_blur, BokehKernel, FilterOptions};
///
/// let src = Image::from_size_val([12, 8].into(), Rgba32::new(90, 40, 200, 255));
/// let mut dst = Image::from_size_val(src.size(), Rgba32::default());
/// let kernel = BokehKernel::new(3, 2).unwrap();
///
/// bokeh_blur(&src, &mut dst, &kernel, 3.0, &FilterOptions::default()).unwrap();
/// assert_eq!(dst, src);
/// ```
pub fn bokeh_blur<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    kernel: &BokehKernel,
    gamma: f32,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(KernelError::InvalidGamma(gamma).into());
    }
    check_same_size(src, dst)?;
    if src.is_empty() {
        return Ok(());
    }

    log::debug!(
        "bokeh_blur: {} radius {} components {} gamma {}",
        src.size(),
        kernel.radius(),
        kernel.components(),
        gamma
    );
    let start = Instant::now();

    let size = src.size();
    let width = size.width;
    let strategy = options.strategy;

    let mut exposed = vectorize(src, strategy)?;
    parallel::par_rows_mut(&mut exposed, width, strategy, |_, row| {
        for v in row.iter_mut() {
            let alpha = v[3];
            for c in v.iter_mut().take(3) {
                *c = (*c * alpha).powf(gamma);
            }
        }
    })?;

    let n = kernel.len();
    let map = BorderSamplingMap::new(size, n, n, options.border_x, options.border_y);

    let mut acc = vec![[0.0f32; 4]; exposed.len()];
    let mut partial = vec![[Complex32::default(); 4]; exposed.len()];

    for part in kernel.components.iter() {
        let taps = part.taps.as_slice();

        parallel::par_rows_mut(&mut partial, width, strategy, |y, row| {
            let rows = map.row_offsets(y);
            for (x, out) in row.iter_mut().enumerate() {
                let mut sum = [Complex32::default(); 4];
                for (&t, &sy) in taps.iter().zip(rows) {
                    let v = &exposed[sy * width + x];
                    for c in 0..4 {
                        sum[c] += t * v[c];
                    }
                }
                *out = sum;
            }
        })?;

        let (re_w, im_w) = (part.real_weight, part.imag_weight);
        parallel::par_rows_zip(
            &partial,
            width,
            &mut acc,
            width,
            strategy,
            |_, partial_row, acc_row| {
                for (x, out) in acc_row.iter_mut().enumerate() {
                    let mut sum = [Complex32::default(); 4];
                    for (&t, &sx) in taps.iter().zip(map.column_offsets(x)) {
                        let v = &partial_row[sx];
                        for c in 0..4 {
                            sum[c] += t * v[c];
                        }
                    }
                    for c in 0..4 {
                        out[c] += re_w * sum[c].re + im_w * sum[c].im;
                    }
                }
            },
        )?;
    }

    log::trace!("bokeh_blur: {} components done", kernel.components());

    let inv_gamma = 1.0 / gamma;
    parallel::par_rows_mut(&mut acc, width, strategy, |_, row| {
        for v in row.iter_mut() {
            let alpha = v[3].max(0.0);
            for c in v.iter_mut().take(3) {
                let lifted = c.max(0.0).powf(inv_gamma);
                *c = if alpha > 0.0 { lifted / alpha } else { 0.0 };
            }
            v[3] = alpha;
        }
    })?;

    write_back(&acc, src, dst, options.preserve_alpha, strategy)?;

    log::trace!("bokeh_blur: elapsed {:?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderMode;
    use crate::parallel::ExecutionStrategy;
    use approx::assert_relative_eq;
    use lumen_image::pixel::{Rgba32, RgbaVector};

    #[test]
    fn test_bokeh_kernel_validation() {
        assert_eq!(BokehKernel::new(0, 2), Err(KernelError::UnsupportedSize(1)));
        assert_eq!(
            BokehKernel::new(4, 0),
            Err(KernelError::InvalidComponentCount(0))
        );
        assert_eq!(
            BokehKernel::new(4, 7),
            Err(KernelError::InvalidComponentCount(7))
        );
    }

    #[test]
    fn test_bokeh_kernel_is_normalized() -> Result<(), KernelError> {
        for components in 1..=MAX_BOKEH_COMPONENTS {
            for radius in [2, 5, 16] {
                let kernel = BokehKernel::new(radius, components)?;
                assert_eq!(kernel.components(), components);
                assert_eq!(kernel.taps(0).len(), 2 * radius + 1);
                assert_relative_eq!(kernel.response(), 1.0, epsilon = 1e-3);
            }
        }
        Ok(())
    }

    #[test]
    fn test_bokeh_taps_are_symmetric() -> Result<(), KernelError> {
        let kernel = BokehKernel::new(6, 3)?;
        for i in 0..kernel.components() {
            let taps = kernel.taps(i);
            for j in 0..taps.len() / 2 {
                assert_eq!(taps[j], taps[taps.len() - 1 - j]);
            }
        }
        // the center tap is exp(0) before normalization, so every center shares its value
        assert_eq!(kernel.weights(2), (-0.366471, 10.300301));
        let center = kernel.taps(0)[6];
        assert_eq!(center.im, 0.0);
        assert_eq!(kernel.taps(1)[6], center);
        Ok(())
    }

    #[test]
    fn test_bokeh_constant_image() -> Result<(), FilterError> {
        let src = Image::from_size_val([9, 7].into(), Rgba32::new(90, 180, 30, 200));
        let mut dst = Image::from_size_val(src.size(), Rgba32::default());
        let kernel = BokehKernel::new(4, 2)?;
        for mode in [BorderMode::Repeat, BorderMode::Bounce, BorderMode::Mirror, BorderMode::Wrap] {
            for gamma in [1.0, 3.0] {
                bokeh_blur(&src, &mut dst, &kernel, gamma, &FilterOptions::with_border(mode))?;
                assert_eq!(dst, src);
            }
        }
        Ok(())
    }

    #[test]
    fn test_bokeh_spreads_symmetrically() -> Result<(), FilterError> {
        let src = Image::from_fn([11, 11].into(), |x, y| {
            let v = if x == 5 && y == 5 { 1.0 } else { 0.1 };
            RgbaVector::new(v, v, v, 1.0)
        });
        let mut dst = Image::from_size_val(src.size(), RgbaVector::default());
        let kernel = BokehKernel::new(3, 1)?;
        bokeh_blur(&src, &mut dst, &kernel, 3.0, &FilterOptions::default())?;

        let at = |x: usize, y: usize| dst.get(x, y).copied().unwrap_or_default();
        assert!(at(5, 5).r < 1.0);
        assert!(at(6, 5).r > 0.1);
        for d in 1..=3 {
            assert_relative_eq!(at(5 - d, 5).r, at(5 + d, 5).r, epsilon = 1e-5);
            assert_relative_eq!(at(5, 5 - d).r, at(5, 5 + d).r, epsilon = 1e-5);
            assert_relative_eq!(at(5 - d, 5).r, at(5, 5 - d).r, epsilon = 1e-5);
        }
        // out of reach of the kernel
        assert_relative_eq!(at(0, 0).r, 0.1, epsilon = 1e-4);
        assert_relative_eq!(at(5, 5).a, 1.0, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn test_bokeh_transparent_pixels() -> Result<(), FilterError> {
        let src = Image::from_size_val([5, 5].into(), Rgba32::new(50, 60, 70, 0));
        let mut dst = Image::from_size_val(src.size(), Rgba32::new(1, 1, 1, 1));
        let kernel = BokehKernel::new(2, 2)?;
        bokeh_blur(&src, &mut dst, &kernel, 3.0, &FilterOptions::default())?;
        assert!(dst.as_slice().iter().all(|p| *p == Rgba32::new(0, 0, 0, 0)));
        Ok(())
    }

    #[test]
    fn test_bokeh_invalid_gamma_and_strategies() -> Result<(), FilterError> {
        let src = Image::from_fn([8, 6].into(), |x, y| {
            Rgba32::new((x * 30) as u8, (y * 40) as u8, 100, 255)
        });
        let mut serial = Image::from_size_val(src.size(), Rgba32::default());
        let kernel = BokehKernel::new(2, 3)?;

        for gamma in [0.0, -1.0, f32::NAN] {
            let res = bokeh_blur(&src, &mut serial, &kernel, gamma, &FilterOptions::default());
            assert!(matches!(
                res,
                Err(FilterError::Kernel(KernelError::InvalidGamma(_)))
            ));
        }

        bokeh_blur(&src, &mut serial, &kernel, 2.0, &FilterOptions::default())?;
        let mut parallel = Image::from_size_val(src.size(), Rgba32::default());
        let options = FilterOptions {
            strategy: ExecutionStrategy::ParallelRows,
            ..Default::default()
        };
        bokeh_blur(&src, &mut parallel, &kernel, 2.0, &options)?;
        assert_eq!(serial, parallel);
        Ok(())
    }
}
