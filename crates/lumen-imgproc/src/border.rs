use lumen_image::ImageSize;

/// Policy used to resolve kernel taps that fall outside of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderMode {
    /// Take the outermost row or column of pixels and repeat it.
    ///
    /// Example: ...a a a | a b c d | d d d...
    #[default]
    Repeat,

    /// Reflect the pixel values at the boundary, starting with the pixel next to the edge.
    ///
    /// Example: ...d c b | a b c d | c b a...
    Bounce,

    /// Reflect the pixel values at the boundary, starting with the edge pixel itself.
    ///
    /// Example: ...c b a | a b c d | d c b...
    Mirror,

    /// Wrap the content from the opposite side.
    ///
    /// Example: ...b c d | a b c d | a b c...
    Wrap,
}

impl BorderMode {
    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the border mode.
    ///
    /// Indices far away from the image keep cycling through the same pattern, so kernels
    /// wider than the image need no special treatment.
    ///
    /// PRECONDITION: `len > 0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_imgproc::border::BorderMode;
    ///
    /// assert_eq!(BorderMode::Repeat.map_index(-2, 7), 0);
    /// assert_eq!(BorderMode::Bounce.map_index(-2, 7), 2);
    /// assert_eq!(BorderMode::Mirror.map_index(-2, 7), 1);
    /// assert_eq!(BorderMode::Wrap.map_index(-2, 7), 5);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        let n = len as isize;
        match self {
            BorderMode::Repeat => i.clamp(0, n - 1) as usize,
            BorderMode::Wrap => i.rem_euclid(n) as usize,
            BorderMode::Mirror => {
                let period = 2 * n;
                let m = i.rem_euclid(period);
                (if m < n { m } else { period - 1 - m }) as usize
            }
            BorderMode::Bounce => {
                if n == 1 {
                    return 0;
                }
                let period = 2 * n - 2;
                let m = i.rem_euclid(period);
                (if m < n { m } else { period - m }) as usize
            }
        }
    }
}

/// Build the sampling offsets of a single axis.
///
/// The returned table has `len * kernel_len` entries; entry `i * kernel_len + k` holds the
/// source index read by destination `i` for the tap `k - kernel_len / 2`.
///
/// # Arguments
///
/// * `len` - The length of the axis.
/// * `kernel_len` - The kernel length along the axis. Expected to be odd.
/// * `mode` - The border mode of the axis.
pub fn sampling_offsets(len: usize, kernel_len: usize, mode: BorderMode) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }

    let radius = (kernel_len / 2) as isize;
    let mut offsets = Vec::with_capacity(len * kernel_len);
    for i in 0..len as isize {
        for k in 0..kernel_len as isize {
            offsets.push(mode.map_index(i + k - radius, len));
        }
    }
    offsets
}

/// Precomputed row and column offsets of a kernel over an image.
///
/// Built once per operation and shared read-only by every worker.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderSamplingMap {
    row_offsets: Vec<usize>,
    column_offsets: Vec<usize>,
    kernel_height: usize,
    kernel_width: usize,
}

impl BorderSamplingMap {
    /// Create the sampling map of a `kernel_height x kernel_width` kernel over an image.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the sampled image.
    /// * `kernel_height` - The number of kernel rows.
    /// * `kernel_width` - The number of kernel columns.
    /// * `border_x` - The border mode along the x axis.
    /// * `border_y` - The border mode along the y axis.
    pub fn new(
        size: ImageSize,
        kernel_height: usize,
        kernel_width: usize,
        border_x: BorderMode,
        border_y: BorderMode,
    ) -> Self {
        Self {
            row_offsets: sampling_offsets(size.height, kernel_height, border_y),
            column_offsets: sampling_offsets(size.width, kernel_width, border_x),
            kernel_height,
            kernel_width,
        }
    }

    /// The source rows read by the kernel centered on destination row `y`.
    #[inline]
    pub fn row_offsets(&self, y: usize) -> &[usize] {
        &self.row_offsets[y * self.kernel_height..(y + 1) * self.kernel_height]
    }

    /// The source columns read by the kernel centered on destination column `x`.
    #[inline]
    pub fn column_offsets(&self, x: usize) -> &[usize] {
        &self.column_offsets[x * self.kernel_width..(x + 1) * self.kernel_width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [BorderMode; 4] = [
        BorderMode::Repeat,
        BorderMode::Bounce,
        BorderMode::Mirror,
        BorderMode::Wrap,
    ];

    fn offsets_at(mode: BorderMode, len: usize, radius: usize, i: usize) -> Vec<usize> {
        let kernel_len = 2 * radius + 1;
        sampling_offsets(len, kernel_len, mode)[i * kernel_len..(i + 1) * kernel_len].to_vec()
    }

    #[test]
    fn repeat_offsets() {
        assert_eq!(offsets_at(BorderMode::Repeat, 7, 2, 0), vec![0, 0, 0, 1, 2]);
        assert_eq!(offsets_at(BorderMode::Repeat, 7, 2, 6), vec![4, 5, 6, 6, 6]);
    }

    #[test]
    fn bounce_offsets() {
        assert_eq!(offsets_at(BorderMode::Bounce, 7, 2, 0), vec![2, 1, 0, 1, 2]);
        assert_eq!(offsets_at(BorderMode::Bounce, 7, 2, 6), vec![4, 5, 6, 5, 4]);
    }

    #[test]
    fn mirror_offsets() {
        assert_eq!(offsets_at(BorderMode::Mirror, 7, 2, 0), vec![1, 0, 0, 1, 2]);
        assert_eq!(offsets_at(BorderMode::Mirror, 7, 2, 6), vec![4, 5, 6, 6, 5]);
    }

    #[test]
    fn wrap_offsets() {
        assert_eq!(offsets_at(BorderMode::Wrap, 7, 2, 0), vec![5, 6, 0, 1, 2]);
        assert_eq!(offsets_at(BorderMode::Wrap, 7, 2, 6), vec![4, 5, 6, 0, 1]);
    }

    #[test]
    fn offsets_stay_in_bounds() {
        for mode in MODES {
            for len in 1..12 {
                for radius in 0..30 {
                    let offsets = sampling_offsets(len, 2 * radius + 1, mode);
                    assert_eq!(offsets.len(), len * (2 * radius + 1));
                    assert!(offsets.iter().all(|&o| o < len), "{mode:?} {len} {radius}");
                }
            }
        }
    }

    #[test]
    fn radius_larger_than_axis_keeps_cycling() {
        // ... 1 0 1 2 1 | 0 1 2 | 1 0 1 ...
        assert_eq!(
            offsets_at(BorderMode::Bounce, 3, 5, 0),
            vec![1, 0, 1, 2, 1, 0, 1, 2, 1, 0, 1]
        );
        // ... 0 1 1 0 | 0 1 | 1 0 0 ...
        assert_eq!(
            offsets_at(BorderMode::Mirror, 2, 4, 0),
            vec![0, 1, 1, 0, 0, 1, 1, 0, 0]
        );
        assert_eq!(
            offsets_at(BorderMode::Wrap, 2, 3, 1),
            vec![0, 1, 0, 1, 0, 1, 0]
        );
    }

    #[test]
    fn single_pixel_axis() {
        for mode in MODES {
            assert_eq!(offsets_at(mode, 1, 3, 0), vec![0; 7]);
        }
    }

    #[test]
    fn zero_radius_is_identity() {
        for mode in MODES {
            assert_eq!(sampling_offsets(5, 1, mode), vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn sampling_map_axes_are_independent() {
        let size = ImageSize {
            width: 7,
            height: 4,
        };
        let map = BorderSamplingMap::new(size, 3, 5, BorderMode::Wrap, BorderMode::Repeat);
        assert_eq!(map.column_offsets(0), &[5, 6, 0, 1, 2]);
        assert_eq!(map.row_offsets(0), &[0, 0, 1]);
        assert_eq!(map.row_offsets(3), &[2, 3, 3]);
    }
}
