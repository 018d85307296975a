use crate::error::ImageError;
use crate::pixel::{Pixel, Vector4};

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use lumen_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Returns true if the size covers no pixel at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total number of pixels.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

impl From<ImageSize> for [u32; 2] {
    fn from(size: ImageSize) -> Self {
        [size.width as u32, size.height as u32]
    }
}

/// Represents an image with pixel data.
///
/// The pixels are stored contiguously in row-major order. The encoding is given by the
/// pixel type `P`; the processing crates only ever see it through [`Pixel`].
#[derive(Clone, Debug, PartialEq)]
pub struct Image<P> {
    size: ImageSize,
    data: Vec<P>,
}

impl<P: Pixel> Image<P> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_image::{Image, ImageSize};
    /// use lumen_image::pixel::Rgb24;
    ///
    /// let image = Image::<Rgb24>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![Rgb24::default(); 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// ```
    pub fn new(size: ImageSize, data: Vec<P>) -> Result<Self, ImageError> {
        if data.len() != size.area() {
            return Err(ImageError::InvalidDataLength(data.len(), size.area()));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size filled with a single pixel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_image::{Image, ImageSize};
    /// use lumen_image::pixel::L8;
    ///
    /// let image = Image::from_size_val([4, 3].into(), L8(7));
    ///
    /// assert_eq!(image.width(), 4);
    /// assert_eq!(image.get(3, 2), Some(&L8(7)));
    /// ```
    pub fn from_size_val(size: ImageSize, val: P) -> Self {
        Self {
            size,
            data: vec![val; size.area()],
        }
    }

    /// Create a new image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(size: ImageSize, f: impl Fn(usize, usize) -> P) -> Self {
        let mut data = Vec::with_capacity(size.area());
        for y in 0..size.height {
            for x in 0..size.width {
                data.push(f(x, y));
            }
        }
        Self { size, data }
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Returns true if the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Get the pixel data as a slice in row-major order.
    pub fn as_slice(&self) -> &[P] {
        &self.data
    }

    /// Get the pixel data as a mutable slice in row-major order.
    pub fn as_slice_mut(&mut self) -> &mut [P] {
        &mut self.data
    }

    /// Consume the image and return its pixel data.
    pub fn into_vec(self) -> Vec<P> {
        self.data
    }

    /// Get a reference to the pixel at `(x, y)` or `None` if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&P> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.data.get(y * self.width() + x)
    }

    /// Get a mutable reference to the pixel at `(x, y)` or `None` if out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut P> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let width = self.width();
        self.data.get_mut(y * width + x)
    }

    /// Set the pixel at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] when the coordinates lie outside the image.
    pub fn set(&mut self, x: usize, y: usize, pixel: P) -> Result<(), ImageError> {
        let (width, height) = (self.width(), self.height());
        let dst = self
            .get_mut(x, y)
            .ok_or(ImageError::PixelIndexOutOfBounds(x, y, width, height))?;
        *dst = pixel;
        Ok(())
    }

    /// Get the pixels of the row `y`.
    ///
    /// PRECONDITION: `y < height`.
    pub fn row(&self, y: usize) -> &[P] {
        let width = self.width();
        &self.data[y * width..(y + 1) * width]
    }

    /// Get the pixels of the row `y` for writing.
    ///
    /// PRECONDITION: `y < height`.
    pub fn row_mut(&mut self, y: usize) -> &mut [P] {
        let width = self.width();
        &mut self.data[y * width..(y + 1) * width]
    }

    /// Read the pixel at `(x, y)` as a normalized vector.
    ///
    /// PRECONDITION: `x < width` and `y < height`.
    pub fn vector_at(&self, x: usize, y: usize) -> Vector4 {
        self.data[y * self.width() + x].to_vector()
    }

    /// Convert the image into a different pixel encoding through the vector representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_image::{Image, ImageSize};
    /// use lumen_image::pixel::{L8, Rgba32};
    ///
    /// let image = Image::from_size_val([2, 2].into(), L8(255));
    /// let rgba: Image<Rgba32> = image.map();
    ///
    /// assert_eq!(rgba.get(1, 1), Some(&Rgba32::new(255, 255, 255, 255)));
    /// ```
    pub fn map<Q: Pixel>(&self) -> Image<Q> {
        Image {
            size: self.size,
            data: self
                .data
                .iter()
                .map(|p| Q::from_vector(p.to_vector()))
                .collect(),
        }
    }
}
