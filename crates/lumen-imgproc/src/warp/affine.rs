use std::f32::consts::PI;

use lumen_image::{Image, ImageError, Pixel};

use super::remap;
use crate::error::FilterError;
use crate::parallel::ExecutionStrategy;
use crate::resample::Resampler;

/// Inverts a 2x3 affine transformation matrix.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix. A singular matrix inverts to zeros.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    // follow OpenCV: a zero determinant gives a zero matrix
    inverse_affine_matrix(m).unwrap_or([0.0; 6])
}

fn inverse_affine_matrix(m: &[f32; 6]) -> Result<[f32; 6], ImageError> {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    let determinant = a * e - b * d;
    if determinant == 0.0 {
        return Err(ImageError::CannotComputeDeterminant);
    }
    let inv_determinant = 1.0 / determinant;

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    Ok([new_a, new_b, new_c, new_d, new_e, new_f])
}

/// Returns a 2x3 rotation matrix for a 2D rotation around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> [f32; 6] {
    let angle = angle * PI / 180.0f32;
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    [alpha, beta, tx, -beta, alpha, ty]
}

/// Applies an affine transformation to a point.
fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image. May have a different size than `src`.
/// * `m` - The 2x3 affine transformation matrix mapping `src` to `dst`.
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
/// use lumen_imgproc::warp::warp_affine;
///
/// let src = Image::from_size_val([4, 5].into(), L8(1));
///
/// let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
/// let new_size = ImageSize {
///     width: 4,
///     height: 5,
/// };
///
/// let mut dst = Image::from_size_val(new_size, L8(0));
///
/// warp_affine(&src, &mut dst, &m, &Resampler::NEAREST, ExecutionStrategy::Serial).unwrap();
///
/// assert_eq!(dst, src);
/// ```
pub fn warp_affine<P: Pixel>(
    src: &Image<P>,
    dst: &mut Image<P>,
    m: &[f32; 6],
    resampler: &Resampler,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    log::debug!("warp_affine: {} -> {} m {:?}", src.size(), dst.size(), m);

    // invert affine transform matrix to find corresponding positions in src from dst
    let m_inv = inverse_affine_matrix(m)?;

    remap(src, dst, resampler, strategy, |x, y| {
        Some(transform_point(x, y, &m_inv))
    })
}
