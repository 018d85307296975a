use lumen_image::{Image, ImageError, Pixel};

use super::remap;
use crate::error::FilterError;
use crate::parallel::ExecutionStrategy;
use crate::resample::Resampler;

#[rustfmt::skip]
fn determinant3x3(m: &[f32; 9]) -> f32 {
    m[0] * (m[4] * m[8] - m[5] * m[7]) -
    m[1] * (m[3] * m[8] - m[5] * m[6]) +
    m[2] * (m[3] * m[7] - m[4] * m[6])
}

#[rustfmt::skip]
fn adjugate3x3(m: &[f32; 9]) -> [f32; 9] {
    [
        m[4] * m[8] - m[5] * m[7],  // [0, 0]
        m[2] * m[7] - m[1] * m[8],  // [0, 1]
        m[1] * m[5] - m[2] * m[4],  // [0, 2]
        m[5] * m[6] - m[3] * m[8],  // [1, 0]
        m[0] * m[8] - m[2] * m[6],  // [1, 1]
        m[2] * m[3] - m[0] * m[5],  // [1, 2]
        m[3] * m[7] - m[4] * m[6],  // [2, 0]
        m[1] * m[6] - m[0] * m[7],  // [2, 1]
        m[0] * m[4] - m[1] * m[3],  // [2, 2]
    ]
}

fn inverse_perspective_matrix(m: &[f32; 9]) -> Result<[f32; 9], ImageError> {
    let det = determinant3x3(m);

    if det == 0.0 {
        return Err(ImageError::CannotComputeDeterminant);
    }

    let adj = adjugate3x3(m);
    let inv_det = 1.0 / det;

    Ok(adj.map(|v| v * inv_det))
}

/// Project a point with a homography. `None` for points mapped to infinity.
fn transform_point(x: f32, y: f32, m: &[f32; 9]) -> Option<(f32, f32)> {
    let w = m[6] * x + m[7] * y + m[8];
    if w == 0.0 {
        return None;
    }
    let u = (m[0] * x + m[1] * y + m[2]) / w;
    let v = (m[3] * x + m[4] * y + m[5]) / w;
    Some((u, v))
}

/// Applies a perspective transformation to an image.
///
/// * `src` - The input image.
/// * `dst` - The output image. May have a different size than `src`.
/// * `m` - The 3x3 perspective transformation matrix src -> dst.
/// * `resampler` - The resampling weight function.
/// * `strategy` - The execution strategy.
///
/// # Errors
///
/// Returns [`ImageError::CannotComputeDeterminant`] if the matrix is singular.
///
/// # Example
///
/// ```
/// use lumen_image::{Image, ImageSize, pixel::L8};
/// use lumen_imgproc::parallel::ExecutionStrategy;
/// use lumen_imgproc::resample::Resampler;
/// use lumen_imgproc::warp::warp_perspective;
///
/// let src = Image::from_size_val([4, 5].into(), L8(0));
///
/// let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
///
/// let mut dst = Image::from_size_val(
///   ImageSize {
///     width: 2,
///     height: 3,
///   },
///   L8(0),
/// );
///
/// warp_perspective(&src, &mut dst, &m, &Resampler::TRIANGLE, ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(dst.size().width, 2);
/// assert_eq!(dst.size().height, 3);
/// ```
pub fn warp_perspective<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    m: &[f32; 9],
    resampler: &Resampler,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    log::debug!("warp_perspective: {} -> {} m {:?}", src.size(), dst.size(), m);

    // inverse perspective matrix
    let inv_m = inverse_perspective_matrix(m)?;

    remap(src, dst, resampler, strategy, |x, y| {
        transform_point(x, y, &inv_m)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_image::pixel::L8;

    #[test]
    fn inverse_perspective_matrix() -> Result<(), ImageError> {
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
        let expected = [1.0, 0.0, 1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0];
        let inv_m = super::inverse_perspective_matrix(&m)?;
        assert_eq!(inv_m, expected);
        Ok(())
    }

    #[test]
    fn transform_point() {
        let m = [1.0, 0.0, -1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
        assert_eq!(super::transform_point(1.0, 1.0, &m), Some((0.0, 2.0)));

        // the second coordinate uses the original x
        let shear = [1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 2.0];
        assert_eq!(super::transform_point(4.0, 2.0, &shear), Some((2.0, 3.0)));

        let at_infinity = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0];
        assert_eq!(super::transform_point(0.0, 5.0, &at_infinity), None);
    }

    #[test]
    fn warp_perspective_hflip() -> Result<(), FilterError> {
        let image = Image::new(
            [2, 3].into(),
            vec![L8(0), L8(10), L8(20), L8(30), L8(40), L8(50)],
        )?;

        let image_expected = vec![L8(10), L8(0), L8(30), L8(20), L8(50), L8(40)];

        // flip matrix
        let m = [-1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

        let mut image_transformed = Image::from_size_val(image.size(), L8(0));

        warp_perspective(
            &image,
            &mut image_transformed,
            &m,
            &Resampler::TRIANGLE,
            ExecutionStrategy::Serial,
        )?;

        assert_eq!(image_transformed.as_slice(), image_expected);

        Ok(())
    }

    #[test]
    fn warp_perspective_singular() {
        let image = Image::from_size_val([2, 2].into(), L8(0));
        let mut dst = image.clone();
        let m = [1.0, 2.0, 0.0, 2.0, 4.0, 0.0, 0.0, 0.0, 1.0];
        let res = warp_perspective(&image, &mut dst, &m, &Resampler::BOX, ExecutionStrategy::Serial);
        assert_eq!(
            res,
            Err(FilterError::Image(ImageError::CannotComputeDeterminant))
        );
    }
}
