//! Geometric image transformations using affine and perspective warps.
//!
//! This module provides functions for applying 2D transformations to images:
//!
//! - Affine transformations (rotation, translation, scaling, shearing)
//! - Perspective transformations (homographies)
//! - Rotation matrix generation
//! - Affine transform inversion
//!
//! Every destination pixel is mapped back into the source and synthesized from a window of
//! source pixels weighted by a [`Resampler`]. Destination pixels that map outside of the
//! source are left untouched.
//!
//! # Examples
//!
//! Rotating an image by 45 degrees:
//!
//! ```no_run
//! use lumen_imgproc::warp::get_rotation_matrix2d;
//!
//! let rotation_matrix = get_rotation_matrix2d((128.0, 128.0), 45.0, 1.0);
//! // Use with warp_affine to rotate the image
//! ```

mod affine;
mod perspective;

pub use affine::{get_rotation_matrix2d, invert_affine_transform, warp_affine};
pub use perspective::warp_perspective;

use lumen_image::{Image, Pixel};

use crate::error::FilterError;
use crate::filter::vectorize;
use crate::parallel::{self, ExecutionStrategy};
use crate::resample::Resampler;

/// Fill `dst` by sampling `src` at the position returned by `map(x, y)`.
///
/// `map` returns `None` for destinations without a source position. Positions outside of
/// the source pixel footprints `[-0.5, len - 0.5)` leave the destination untouched.
fn remap<P, F>(
    src: &Image<P>,
    dst: &mut Image<P>,
    resampler: &Resampler,
    strategy: ExecutionStrategy,
    map: F,
) -> Result<(), FilterError>
where
    P: Pixel,
    F: Fn(f32, f32) -> Option<(f32, f32)> + Send + Sync,
{
    if src.is_empty() || dst.is_empty() {
        return Ok(());
    }

    let (src_w, src_h) = (src.width(), src.height());
    let input = vectorize(src, strategy)?;
    let (max_u, max_v) = (src_w as f32 - 0.5, src_h as f32 - 0.5);

    let dst_w = dst.width();
    parallel::par_rows_mut(dst.as_slice_mut(), dst_w, strategy, |y, row| {
        for (x, out) in row.iter_mut().enumerate() {
            let Some((u, v)) = map(x as f32, y as f32) else {
                continue;
            };
            // check if the position is within the bounds of the src image
            if !(u >= -0.5 && u < max_u && v >= -0.5 && v < max_v) {
                continue;
            }

            let window_x = resampler.window(u, 1.0, src_w);
            let window_y = resampler.window(v, 1.0, src_h);
            if window_x.is_empty() || window_y.is_empty() {
                continue;
            }

            let mut acc = [0.0f32; 4];
            for (sy, wy) in window_y.iter() {
                let src_row = &input[sy * src_w..(sy + 1) * src_w];
                for (sx, wx) in window_x.iter() {
                    let w = wy * wx;
                    let s = &src_row[sx];
                    acc[0] += w * s[0];
                    acc[1] += w * s[1];
                    acc[2] += w * s[2];
                    acc[3] += w * s[3];
                }
            }
            *out = P::from_vector(acc.map(|c| c.clamp(0.0, 1.0)));
        }
    })?;

    Ok(())
}
