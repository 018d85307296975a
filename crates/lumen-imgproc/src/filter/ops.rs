use lumen_image::{Image, Pixel};

use super::convolution::{convolve_separable, FilterOptions};
use super::kernel::KernelPair;
use super::kernels;
use crate::error::FilterError;

/// Blur an image using a box blur filter
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `radius` - The radius of the kernel. Both passes use `2 * radius + 1` equal weights.
/// * `options` - Border modes, alpha handling and execution strategy.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn box_blur<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    radius: usize,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    let kernel = kernels::box_blur_kernel_1d(radius);
    let pair = KernelPair::symmetric(&kernel)?;
    convolve_separable(src, dst, &pair, options)
}

/// Blur an image using a gaussian blur filter
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `sigma` - The sigma of the gaussian kernel.
/// * `radius` - An explicit kernel radius. When `None` it is derived from the sigma.
/// * `options` - Border modes, alpha handling and execution strategy.
///
/// PRECONDITION: `src` and `dst` must have the same size.
///
/// # Examples
///
/// ```
/// use lumen_image::{Image, pixel::Rgba32};
/// use lumen_imgproc::filter::{gaussian_blur, FilterOptions};
///
/// let src = Image::from_size_val([5, 5].into(), Rgba32::new(10, 20, 30, 255));
/// let mut dst = Image::from_size_val(src.size(), Rgba32::default());
///
/// gaussian_blur(&src, &mut dst, 1.5, None, &FilterOptions::default()).unwrap();
/// assert_eq!(dst, src);
/// ```
pub fn gaussian_blur<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    sigma: f32,
    radius: Option<usize>,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    let size = kernels::gaussian_kernel_size(sigma, radius)?;
    let kernel = kernels::gaussian_kernel_1d(size, sigma)?;
    let pair = KernelPair::symmetric(&kernel)?;
    convolve_separable(src, dst, &pair, options)
}

/// Sharpen an image with the inverse of a gaussian blur.
///
/// See [`kernels::gaussian_sharpen_kernel_1d`] for the kernel.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn gaussian_sharpen<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    sigma: f32,
    radius: Option<usize>,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    let size = kernels::gaussian_kernel_size(sigma, radius)?;
    let kernel = kernels::gaussian_sharpen_kernel_1d(size, sigma)?;
    let pair = KernelPair::symmetric(&kernel)?;
    convolve_separable(src, dst, &pair, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::border::BorderMode;
    use crate::error::KernelError;
    use lumen_image::pixel::{Rgba32, L8};

    #[test]
    fn test_box_blur() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let src = Image::new(
            [5, 5].into(),
            vec![
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
                0, 0, 225, 0, 0,
                0, 0, 0, 0, 0,
                0, 0, 0, 0, 0,
            ]
            .into_iter()
            .map(L8)
            .collect(),
        )?;
        let mut dst = Image::from_size_val(src.size(), L8(0));

        box_blur(&src, &mut dst, 1, &FilterOptions::default())?;

        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0, 0, 0, 0, 0,
            0, 25, 25, 25, 0,
            0, 25, 25, 25, 0,
            0, 25, 25, 25, 0,
            0, 0, 0, 0, 0,
        ];
        assert_eq!(dst.as_slice().iter().map(|p| p.0).collect::<Vec<_>>(), expected);

        Ok(())
    }

    #[test]
    fn test_gaussian_blur_keeps_flat_image() -> Result<(), FilterError> {
        let src = Image::from_size_val([7, 4].into(), Rgba32::new(12, 200, 99, 40));
        let mut dst = Image::from_size_val(src.size(), Rgba32::default());
        for mode in [BorderMode::Repeat, BorderMode::Bounce, BorderMode::Mirror, BorderMode::Wrap] {
            gaussian_blur(&src, &mut dst, 2.0, None, &FilterOptions::with_border(mode))?;
            assert_eq!(dst, src);
        }
        Ok(())
    }

    #[test]
    fn test_blur_alpha_is_convolved() -> Result<(), FilterError> {
        let src = Image::from_fn([3, 1].into(), |x, _| {
            Rgba32::new(0, 0, 0, if x == 1 { 255 } else { 0 })
        });
        let mut dst = Image::from_size_val(src.size(), Rgba32::default());
        box_blur(&src, &mut dst, 1, &FilterOptions::default())?;
        assert_eq!(dst.get(1, 0).map(|p| p.a), Some(85));

        let options = FilterOptions {
            preserve_alpha: true,
            ..Default::default()
        };
        box_blur(&src, &mut dst, 1, &options)?;
        assert_eq!(dst.get(1, 0).map(|p| p.a), Some(255));
        Ok(())
    }

    #[test]
    fn test_gaussian_sharpen_boosts_contrast() -> Result<(), FilterError> {
        let src = Image::from_fn([5, 1].into(), |x, _| L8(if x < 2 { 100 } else { 150 }));
        let mut dst = Image::from_size_val(src.size(), L8(0));
        gaussian_sharpen(&src, &mut dst, 1.0, Some(1), &FilterOptions::default())?;
        let dark = dst.get(1, 0).map(|p| p.0).unwrap_or_default();
        let bright = dst.get(2, 0).map(|p| p.0).unwrap_or_default();
        assert!(dark < 100);
        assert!(bright > 150);
        // flat areas are untouched
        assert_eq!(dst.get(4, 0), Some(&L8(150)));
        Ok(())
    }

    #[test]
    fn test_invalid_sigma() {
        let src = Image::from_size_val([3, 3].into(), L8(0));
        let mut dst = src.clone();
        let res = gaussian_blur(&src, &mut dst, -1.0, None, &FilterOptions::default());
        assert_eq!(res, Err(FilterError::Kernel(KernelError::InvalidSigma(-1.0))));
    }
}
