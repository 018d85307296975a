use crate::error::KernelError;

/// An immutable matrix of convolution weights.
///
/// Both dimensions are odd so every kernel has a well defined center; the radius along an
/// axis is `(dimension - 1) / 2`. Weights are stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Kernel {
    /// Create a kernel from row-major weights.
    ///
    /// # Arguments
    ///
    /// * `rows` - The number of rows (kernel height).
    /// * `cols` - The number of columns (kernel width).
    /// * `data` - The weights in row-major order.
    ///
    /// # Errors
    ///
    /// Fails if the kernel is empty, a dimension is even, or the data length does not
    /// match `rows * cols`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_imgproc::filter::Kernel;
    ///
    /// let kernel = Kernel::new(1, 3, vec![0.25, 0.5, 0.25]).unwrap();
    /// assert_eq!(kernel.radius_x(), 1);
    /// assert_eq!(kernel.radius_y(), 0);
    ///
    /// assert!(Kernel::new(2, 2, vec![1.0; 4]).is_err());
    /// ```
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, KernelError> {
        if rows == 0 || cols == 0 {
            return Err(KernelError::Empty);
        }
        if rows % 2 == 0 || cols % 2 == 0 {
            return Err(KernelError::EvenDimension(rows, cols));
        }
        if data.len() != rows * cols {
            return Err(KernelError::InvalidDataLength(data.len(), rows, cols));
        }
        Ok(Self { data, rows, cols })
    }

    /// Create a kernel from nested rows.
    ///
    /// # Errors
    ///
    /// Fails on ragged rows in addition to the checks of [`Kernel::new`].
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self, KernelError> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(KernelError::RaggedRows(i, row.len(), cols));
            }
            data.extend_from_slice(row);
        }
        Self::new(rows.len(), cols, data)
    }

    /// Create a `1xN` kernel.
    pub fn row(weights: &[f32]) -> Result<Self, KernelError> {
        Self::new(1, weights.len(), weights.to_vec())
    }

    /// Create a `Nx1` kernel.
    pub fn column(weights: &[f32]) -> Result<Self, KernelError> {
        Self::new(weights.len(), 1, weights.to_vec())
    }

    /// Build one of the fixed catalog kernels.
    pub(crate) fn from_array<const R: usize, const C: usize>(m: [[f32; C]; R]) -> Self {
        debug_assert!(R % 2 == 1 && C % 2 == 1, "catalog kernels must be odd");
        Self {
            data: m.iter().flatten().copied().collect(),
            rows: R,
            cols: C,
        }
    }

    /// The outer product `vertical x horizontal` of two 1D weight vectors.
    ///
    /// Entry `[ky][kx]` is `vertical[ky] * horizontal[kx]`, which is the 2D kernel a
    /// separable two-pass convolution reproduces.
    pub fn outer(horizontal: &[f32], vertical: &[f32]) -> Result<Self, KernelError> {
        let data = vertical
            .iter()
            .flat_map(|&v| horizontal.iter().map(move |&h| v * h))
            .collect();
        Self::new(vertical.len(), horizontal.len(), data)
    }

    /// The number of rows (kernel height).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns (kernel width).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The horizontal radius.
    pub fn radius_x(&self) -> usize {
        (self.cols - 1) / 2
    }

    /// The vertical radius.
    pub fn radius_y(&self) -> usize {
        (self.rows - 1) / 2
    }

    /// The weight at row `y` and column `x`.
    ///
    /// PRECONDITION: `y < rows` and `x < cols`.
    #[inline]
    pub fn get(&self, y: usize, x: usize) -> f32 {
        self.data[y * self.cols + x]
    }

    /// The weights in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// The weights of row `y`.
    #[inline]
    pub fn row_weights(&self, y: usize) -> &[f32] {
        &self.data[y * self.cols..(y + 1) * self.cols]
    }

    /// The sum of every weight.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// The kernel mirrored along its diagonal.
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for x in 0..self.cols {
            for y in 0..self.rows {
                data.push(self.get(y, x));
            }
        }
        Self {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }
}

/// A horizontal `1xN` and a vertical `Nx1` kernel applied in two passes.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelPair {
    horizontal: Kernel,
    vertical: Kernel,
}

impl KernelPair {
    /// Create a pair from the 1D weights of each pass.
    ///
    /// # Errors
    ///
    /// Fails if either set of weights is not a valid kernel or their lengths differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_imgproc::filter::KernelPair;
    ///
    /// let pair = KernelPair::new(&[0.25, 0.5, 0.25], &[0.0, 1.0, 0.0]).unwrap();
    /// assert_eq!(pair.len(), 3);
    ///
    /// assert!(KernelPair::new(&[1.0], &[0.0, 1.0, 0.0]).is_err());
    /// ```
    pub fn new(horizontal: &[f32], vertical: &[f32]) -> Result<Self, KernelError> {
        Self::from_kernels(Kernel::row(horizontal)?, Kernel::column(vertical)?)
    }

    /// Create a pair using the same 1D weights along both axes.
    pub fn symmetric(weights: &[f32]) -> Result<Self, KernelError> {
        Self::new(weights, weights)
    }

    /// Create a pair from already built kernels.
    ///
    /// # Errors
    ///
    /// Fails if `horizontal` is not `1xN`, `vertical` is not `Nx1`, or `N` differs.
    pub fn from_kernels(horizontal: Kernel, vertical: Kernel) -> Result<Self, KernelError> {
        if horizontal.rows() != 1 || vertical.cols() != 1 {
            return Err(KernelError::InvalidPairShape(
                horizontal.rows(),
                horizontal.cols(),
                vertical.rows(),
                vertical.cols(),
            ));
        }
        if horizontal.cols() != vertical.rows() {
            return Err(KernelError::SizeMismatch(
                horizontal.rows(),
                horizontal.cols(),
                vertical.rows(),
                vertical.cols(),
            ));
        }
        Ok(Self {
            horizontal,
            vertical,
        })
    }

    /// The horizontal kernel.
    pub fn horizontal(&self) -> &Kernel {
        &self.horizontal
    }

    /// The vertical kernel.
    pub fn vertical(&self) -> &Kernel {
        &self.vertical
    }

    /// The length of both kernels.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.horizontal.cols()
    }

    /// The equivalent 2D kernel.
    pub fn to_2d(&self) -> Result<Kernel, KernelError> {
        Kernel::outer(self.horizontal.as_slice(), self.vertical.as_slice())
    }
}

/// Horizontal and vertical gradient kernels combined by euclidean magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPair {
    x: Kernel,
    y: Kernel,
}

impl GradientPair {
    /// Create a gradient pair.
    ///
    /// # Arguments
    ///
    /// * `x` - The kernel responding to horizontal changes.
    /// * `y` - The kernel responding to vertical changes.
    ///
    /// # Errors
    ///
    /// Fails if the two kernels do not have the same dimensions.
    pub fn new(x: Kernel, y: Kernel) -> Result<Self, KernelError> {
        if x.rows() != y.rows() || x.cols() != y.cols() {
            return Err(KernelError::SizeMismatch(
                x.rows(),
                x.cols(),
                y.rows(),
                y.cols(),
            ));
        }
        Ok(Self { x, y })
    }

    /// Build a pair from two catalog kernels of the same literal shape.
    pub(crate) fn from_arrays<const R: usize, const C: usize>(
        x: [[f32; C]; R],
        y: [[f32; C]; R],
    ) -> Self {
        Self {
            x: Kernel::from_array(x),
            y: Kernel::from_array(y),
        }
    }

    /// The horizontal gradient kernel.
    pub fn x(&self) -> &Kernel {
        &self.x
    }

    /// The vertical gradient kernel.
    pub fn y(&self) -> &Kernel {
        &self.y
    }
}
