use std::time::Instant;

use lumen_image::{Image, Pixel};

use super::convolution::{
    check_same_size, direct_pass, gradient_pass, vectorize, write_back, FilterOptions,
};
use super::kernel::{GradientPair, Kernel};
use crate::color;
use crate::error::{FilterError, KernelError};
use crate::parallel;

/// The eight directional kernels of a compass edge detector.
///
/// Ordered north, north-west, west, south-west, south, south-east, east, north-east.
#[derive(Debug, Clone, PartialEq)]
pub struct CompassKernels {
    kernels: Box<[Kernel; 8]>,
}

impl CompassKernels {
    /// Create a compass set.
    ///
    /// # Errors
    ///
    /// Fails if the kernels do not all have the same dimensions.
    pub fn new(kernels: [Kernel; 8]) -> Result<Self, KernelError> {
        let (rows, cols) = (kernels[0].rows(), kernels[0].cols());
        if let Some(k) = kernels
            .iter()
            .find(|k| k.rows() != rows || k.cols() != cols)
        {
            return Err(KernelError::SizeMismatch(rows, cols, k.rows(), k.cols()));
        }
        Ok(Self {
            kernels: Box::new(kernels),
        })
    }

    /// The directional kernels.
    pub fn kernels(&self) -> &[Kernel; 8] {
        &self.kernels
    }
}

/// Describes how an edge detector convolves the image.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeDetector {
    /// A single kernel whose raw response is the output.
    Single2D(Kernel),
    /// Horizontal and vertical gradients combined by euclidean magnitude.
    GradientPair(GradientPair),
    /// The per-channel maximum response over eight directional kernels.
    Compass(CompassKernels),
}

impl EdgeDetector {
    /// 3x3 Laplacian.
    pub fn laplacian_3x3() -> Self {
        Self::Single2D(Kernel::from_array([
            [-1.0, -1.0, -1.0],
            [-1.0, 8.0, -1.0],
            [-1.0, -1.0, -1.0],
        ]))
    }

    /// 5x5 Laplacian.
    pub fn laplacian_5x5() -> Self {
        Self::Single2D(Kernel::from_array([
            [-1.0, -1.0, -1.0, -1.0, -1.0],
            [-1.0, -1.0, -1.0, -1.0, -1.0],
            [-1.0, -1.0, 24.0, -1.0, -1.0],
            [-1.0, -1.0, -1.0, -1.0, -1.0],
            [-1.0, -1.0, -1.0, -1.0, -1.0],
        ]))
    }

    /// 5x5 Laplacian of Gaussian.
    pub fn laplacian_of_gaussian() -> Self {
        Self::Single2D(Kernel::from_array([
            [0.0, 0.0, -1.0, 0.0, 0.0],
            [0.0, -1.0, -2.0, -1.0, 0.0],
            [-1.0, -2.0, 16.0, -2.0, -1.0],
            [0.0, -1.0, -2.0, -1.0, 0.0],
            [0.0, 0.0, -1.0, 0.0, 0.0],
        ]))
    }

    /// Sobel operator.
    pub fn sobel() -> Self {
        Self::gradient(
            [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]],
            [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]],
        )
    }

    /// Prewitt operator.
    pub fn prewitt() -> Self {
        Self::gradient(
            [[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]],
            [[1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -1.0, -1.0]],
        )
    }

    /// Scharr operator.
    pub fn scharr() -> Self {
        Self::gradient(
            [[-3.0, 0.0, 3.0], [-10.0, 0.0, 10.0], [-3.0, 0.0, 3.0]],
            [[3.0, 10.0, 3.0], [0.0, 0.0, 0.0], [-3.0, -10.0, -3.0]],
        )
    }

    /// Kayyali operator.
    pub fn kayyali() -> Self {
        Self::gradient(
            [[6.0, 0.0, -6.0], [0.0, 0.0, 0.0], [-6.0, 0.0, 6.0]],
            [[-6.0, 0.0, 6.0], [0.0, 0.0, 0.0], [6.0, 0.0, -6.0]],
        )
    }

    /// Roberts cross operator.
    ///
    /// The 2x2 kernels are padded into the top-left corner of a 3x3 kernel.
    pub fn roberts_cross() -> Self {
        Self::gradient(
            [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 0.0]],
            [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]],
        )
    }

    /// Kirsch compass operator.
    pub fn kirsch() -> Self {
        Self::compass([
            [[5.0, 5.0, 5.0], [-3.0, 0.0, -3.0], [-3.0, -3.0, -3.0]],
            [[5.0, 5.0, -3.0], [5.0, 0.0, -3.0], [-3.0, -3.0, -3.0]],
            [[5.0, -3.0, -3.0], [5.0, 0.0, -3.0], [5.0, -3.0, -3.0]],
            [[-3.0, -3.0, -3.0], [5.0, 0.0, -3.0], [5.0, 5.0, -3.0]],
            [[-3.0, -3.0, -3.0], [-3.0, 0.0, -3.0], [5.0, 5.0, 5.0]],
            [[-3.0, -3.0, -3.0], [-3.0, 0.0, 5.0], [-3.0, 5.0, 5.0]],
            [[-3.0, -3.0, 5.0], [-3.0, 0.0, 5.0], [-3.0, -3.0, 5.0]],
            [[-3.0, 5.0, 5.0], [-3.0, 0.0, 5.0], [-3.0, -3.0, -3.0]],
        ])
    }

    /// Robinson compass operator.
    pub fn robinson() -> Self {
        Self::compass([
            [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]],
            [[2.0, 1.0, 0.0], [1.0, 0.0, -1.0], [0.0, -1.0, -2.0]],
            [[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]],
            [[0.0, -1.0, -2.0], [1.0, 0.0, -1.0], [2.0, 1.0, 0.0]],
            [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]],
            [[-2.0, -1.0, 0.0], [-1.0, 0.0, 1.0], [0.0, 1.0, 2.0]],
            [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]],
            [[0.0, 1.0, 2.0], [-1.0, 0.0, 1.0], [-2.0, -1.0, 0.0]],
        ])
    }

    fn gradient(x: [[f32; 3]; 3], y: [[f32; 3]; 3]) -> Self {
        Self::GradientPair(GradientPair::from_arrays(x, y))
    }

    fn compass(kernels: [[[f32; 3]; 3]; 8]) -> Self {
        Self::Compass(CompassKernels {
            kernels: Box::new(kernels.map(Kernel::from_array)),
        })
    }
}

/// Detect the edges of an image.
///
/// The alpha of every pixel is carried over from the (optionally grayscaled) source so the
/// result can be composited over the original.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image, same size as `src`.
/// * `detector` - The kernels to apply.
/// * `grayscale` - Convert the source to grayscale once before any convolution.
/// * `options` - Border modes and execution strategy. `preserve_alpha` is ignored.
///
/// # Examples
///
/// ```
/// use lumen_image::{Image, pixel::Rgba32};
/// use lumen_imgproc::filter::{detect_edges, EdgeDetector, FilterOptions};
///
/// let src = Image::from_size_val([8, 8].into(), Rgba32::new(90, 90, 90, 200));
/// let mut dst = Image::from_size_val(src.size(), Rgba32::default());
///
/// detect_edges(&src, &mut dst, &EdgeDetector::sobel(), false, &FilterOptions::default()).unwrap();
///
/// // a flat image has no edges
/// assert!(dst.as_slice().iter().all(|p| *p == Rgba32::new(0, 0, 0, 200)));
/// ```
pub fn detect_edges<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    detector: &EdgeDetector,
    grayscale: bool,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    check_same_size(src, dst)?;
    if src.is_empty() {
        return Ok(());
    }

    log::debug!(
        "detect_edges: image {} detector {} grayscale {}",
        src.size(),
        match detector {
            EdgeDetector::Single2D(_) => "single",
            EdgeDetector::GradientPair(_) => "gradient pair",
            EdgeDetector::Compass(_) => "compass",
        },
        grayscale
    );
    let start = Instant::now();

    let strategy = options.strategy;
    let gray;
    let source = if grayscale {
        let mut tmp = Image::from_size_val(src.size(), P::default());
        color::grayscale(src, &mut tmp, strategy)?;
        gray = tmp;
        &gray
    } else {
        src
    };

    let size = source.size();
    let (bx, by) = (options.border_x, options.border_y);
    let input = vectorize(source, strategy)?;
    let mut acc = vec![[0.0f32; 4]; input.len()];

    match detector {
        EdgeDetector::Single2D(kernel) => {
            direct_pass(&input, &mut acc, size, kernel, bx, by, strategy)?;
        }
        EdgeDetector::GradientPair(pair) => {
            gradient_pass(&input, &mut acc, size, pair, bx, by, strategy)?;
        }
        EdgeDetector::Compass(compass) => {
            let [first, rest @ ..] = compass.kernels();
            direct_pass(&input, &mut acc, size, first, bx, by, strategy)?;

            let mut scratch = vec![[0.0f32; 4]; input.len()];
            for kernel in rest {
                direct_pass(&input, &mut scratch, size, kernel, bx, by, strategy)?;
                parallel::par_rows_zip(
                    &scratch,
                    size.width,
                    &mut acc,
                    size.width,
                    strategy,
                    |_, scratch_row, acc_row| {
                        for (a, s) in acc_row.iter_mut().zip(scratch_row) {
                            for c in 0..4 {
                                a[c] = a[c].max(s[c]);
                            }
                        }
                    },
                )?;
            }
        }
    }

    write_back(&acc, source, dst, true, strategy)?;

    log::trace!("detect_edges: elapsed {:?}", start.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::kernels::sobel_kernel_1d;
    use lumen_image::pixel::{L8, Rgba32};

    fn odd(kernel: &Kernel) -> bool {
        kernel.rows() % 2 == 1 && kernel.cols() % 2 == 1
    }

    #[test]
    fn test_catalog_shapes() {
        for detector in [
            EdgeDetector::laplacian_3x3(),
            EdgeDetector::laplacian_5x5(),
            EdgeDetector::laplacian_of_gaussian(),
        ] {
            match detector {
                EdgeDetector::Single2D(k) => {
                    assert!(odd(&k));
                    assert_eq!(k.sum(), 0.0);
                }
                _ => panic!("expected a single kernel"),
            }
        }

        for detector in [
            EdgeDetector::sobel(),
            EdgeDetector::prewitt(),
            EdgeDetector::scharr(),
            EdgeDetector::kayyali(),
            EdgeDetector::roberts_cross(),
        ] {
            match detector {
                EdgeDetector::GradientPair(pair) => {
                    assert_eq!((pair.x().rows(), pair.x().cols()), (3, 3));
                    assert_eq!(pair.x().sum(), 0.0);
                    assert_eq!(pair.y().sum(), 0.0);
                }
                _ => panic!("expected a gradient pair"),
            }
        }

        for detector in [EdgeDetector::kirsch(), EdgeDetector::robinson()] {
            match detector {
                EdgeDetector::Compass(compass) => {
                    assert!(compass.kernels().iter().all(|k| k.sum() == 0.0 && odd(k)));
                }
                _ => panic!("expected a compass set"),
            }
        }
    }

    #[test]
    fn test_sobel_is_separable() -> Result<(), KernelError> {
        let (derivative, smooth) = sobel_kernel_1d(3)?;
        let EdgeDetector::GradientPair(pair) = EdgeDetector::sobel() else {
            panic!("expected a gradient pair");
        };
        assert_eq!(pair.x(), &Kernel::outer(&derivative, &smooth)?);
        assert_eq!(pair.y(), &Kernel::outer(&smooth, &derivative)?);
        Ok(())
    }

    #[test]
    fn test_compass_rotations() {
        let EdgeDetector::Compass(kirsch) = EdgeDetector::kirsch() else {
            panic!("expected a compass set");
        };
        let k = kirsch.kernels();
        // north and south are vertical flips of each other
        for y in 0..3 {
            assert_eq!(k[0].row_weights(y), k[4].row_weights(2 - y));
        }
        // west is the transposed north
        assert_eq!(k[2], k[0].transpose());
    }

    #[test]
    fn test_compass_new_rejects_mixed_sizes() {
        let small = Kernel::from_array([[0.0; 3]; 3]);
        let large = Kernel::from_array([[0.0; 5]; 5]);
        let mut kernels: [Kernel; 8] = std::array::from_fn(|_| small.clone());
        kernels[5] = large;
        assert_eq!(
            CompassKernels::new(kernels),
            Err(KernelError::SizeMismatch(3, 3, 5, 5))
        );
    }

    #[test]
    fn test_laplacian_on_point() -> Result<(), FilterError> {
        let src = Image::from_fn([5, 5].into(), |x, y| {
            if (x, y) == (2, 2) {
                L8(30)
            } else {
                L8(0)
            }
        });
        let mut dst = Image::from_size_val(src.size(), L8(0));
        detect_edges(
            &src,
            &mut dst,
            &EdgeDetector::laplacian_3x3(),
            false,
            &FilterOptions::default(),
        )?;
        assert_eq!(dst.get(2, 2), Some(&L8(240)));
        // neighbours get a negative response clamped to zero
        assert_eq!(dst.get(1, 2), Some(&L8(0)));
        Ok(())
    }

    #[test]
    fn test_grayscale_prepass() -> Result<(), FilterError> {
        let src = Image::from_fn([6, 6].into(), |x, _| {
            if x < 3 {
                Rgba32::new(255, 0, 0, 10)
            } else {
                Rgba32::new(0, 0, 255, 10)
            }
        });
        let mut dst = Image::from_size_val(src.size(), Rgba32::default());
        detect_edges(
            &src,
            &mut dst,
            &EdgeDetector::prewitt(),
            true,
            &FilterOptions::default(),
        )?;
        for p in dst.as_slice() {
            assert_eq!(p.r, p.g);
            assert_eq!(p.g, p.b);
            assert_eq!(p.a, 10);
        }
        assert!(dst.get(2, 3).map(|p| p.r > 0).unwrap_or(false));
        Ok(())
    }
}
