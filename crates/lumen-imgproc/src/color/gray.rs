use lumen_image::{pixel::luminance, Image, Pixel};

use crate::error::FilterError;
use crate::filter::check_same_size;
use crate::parallel::{self, ExecutionStrategy};

/// Convert an image to grayscale using the BT.709 luma weights:
///
/// Y = 0.2126 * R + 0.7152 * G + 0.0722 * B
///
/// The luma is written to the red, green and blue channels; alpha is kept.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image. May use a different pixel encoding than `src`.
/// * `strategy` - The execution strategy.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use lumen_image::{Image, pixel::{L8, Rgba32}};
/// use lumen_imgproc::color::grayscale;
/// use lumen_imgproc::parallel::ExecutionStrategy;
///
/// let image = Image::from_size_val([4, 5].into(), Rgba32::new(0, 255, 0, 128));
///
/// let mut gray = Image::from_size_val(image.size(), Rgba32::default());
/// grayscale(&image, &mut gray, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(gray.get(0, 0), Some(&Rgba32::new(182, 182, 182, 128)));
///
/// let mut luma = Image::from_size_val(image.size(), L8(0));
/// grayscale(&image, &mut luma, ExecutionStrategy::Serial).unwrap();
/// assert_eq!(luma.get(3, 4), Some(&L8(182)));
/// ```
pub fn grayscale<P: Pixel, Q: Pixel>(
    src: &Image<P>,
    dst: &mut Image<Q>,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    check_same_size(src, dst)?;

    log::debug!("grayscale: image {}", src.size());

    let width = src.width();
    // parallelize the grayscale conversion by rows
    parallel::par_rows_zip(
        src.as_slice(),
        width,
        dst.as_slice_mut(),
        width,
        strategy,
        |_, src_row, dst_row| {
            for (s, d) in src_row.iter().zip(dst_row.iter_mut()) {
                let v = s.to_vector();
                let y = luminance(&v);
                *d = Q::from_vector([y, y, y, v[3]]);
            }
        },
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_image::pixel::{Bgra32, Rgb24};
    use lumen_image::ImageError;

    #[test]
    fn test_grayscale_weights() -> Result<(), FilterError> {
        let src = Image::new(
            [3, 1].into(),
            vec![
                Rgb24::new(255, 0, 0),
                Rgb24::new(0, 255, 0),
                Rgb24::new(0, 0, 255),
            ],
        )?;
        let mut dst = Image::from_size_val(src.size(), Rgb24::default());
        grayscale(&src, &mut dst, ExecutionStrategy::Serial)?;
        assert_eq!(
            dst.as_slice(),
            &[
                Rgb24::new(54, 54, 54),
                Rgb24::new(182, 182, 182),
                Rgb24::new(18, 18, 18),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_grayscale_keeps_alpha() -> Result<(), FilterError> {
        let src = Image::from_size_val([2, 2].into(), Bgra32::new(10, 20, 30, 99));
        let mut dst = Image::from_size_val(src.size(), Bgra32::default());
        grayscale(&src, &mut dst, ExecutionStrategy::ParallelRows)?;
        assert!(dst.as_slice().iter().all(|p| p.a == 99 && p.r == p.g && p.g == p.b));
        Ok(())
    }

    #[test]
    fn test_grayscale_size_mismatch() {
        let src = Image::from_size_val([2, 2].into(), Rgb24::default());
        let mut dst = Image::from_size_val([2, 3].into(), Rgb24::default());
        let res = grayscale(&src, &mut dst, ExecutionStrategy::Serial);
        assert_eq!(
            res,
            Err(FilterError::Image(ImageError::InvalidImageSize(2, 2, 2, 3)))
        );
    }
}
