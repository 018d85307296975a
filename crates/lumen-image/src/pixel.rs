use num_traits::PrimInt;

/// A normalized four component vector holding `[r, g, b, a]` in the `[0, 1]` range.
pub type Vector4 = [f32; 4];

/// Trait implemented by every pixel encoding supported by the processing crates.
///
/// All the numeric work happens on [`Vector4`] values; an encoding only needs to
/// describe how to move its channels in and out of that representation.
///
/// # Examples
///
/// ```
/// use lumen_image::pixel::{Pixel, Rgba32};
///
/// let pixel = Rgba32::new(255, 0, 51, 255);
/// let v = pixel.to_vector();
/// assert_eq!(v, [1.0, 0.0, 0.2, 1.0]);
/// assert_eq!(Rgba32::from_vector(v), pixel);
/// ```
pub trait Pixel: Copy + Default + Send + Sync + 'static {
    /// The packed numeric representation of the pixel.
    type Packed: Copy;

    /// Convert the pixel to a normalized vector.
    fn to_vector(&self) -> Vector4;

    /// Create a pixel from a normalized vector.
    ///
    /// Components outside of `[0, 1]` are clamped before quantization.
    fn from_vector(v: Vector4) -> Self;

    /// Get the packed value of the pixel.
    fn to_packed(&self) -> Self::Packed;

    /// Create a pixel from its packed value.
    fn from_packed(packed: Self::Packed) -> Self;
}

/// Scale an unsigned normalized channel to `[0, 1]`.
#[inline]
fn unorm_to_f32<T: PrimInt>(value: T) -> f32 {
    let max = T::max_value().to_f32().unwrap_or(1.0);
    value.to_f32().unwrap_or(0.0) / max
}

/// Quantize a `[0, 1]` value to an unsigned normalized channel, rounding to nearest.
#[inline]
fn unorm_from_f32<T: PrimInt>(value: f32) -> T {
    let max = T::max_value().to_f32().unwrap_or(1.0);
    <T as num_traits::NumCast>::from((value.clamp(0.0, 1.0) * max).round()).unwrap_or_else(T::zero)
}

/// BT.709 luminance of a normalized vector.
#[inline]
pub fn luminance(v: &Vector4) -> f32 {
    0.2126 * v[0] + 0.7152 * v[1] + 0.0722 * v[2]
}

/// 8 bits per channel red, green, blue and alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgba32 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba32 {
    /// Create a new pixel from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Pixel for Rgba32 {
    type Packed = u32;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        [
            unorm_to_f32(self.r),
            unorm_to_f32(self.g),
            unorm_to_f32(self.b),
            unorm_to_f32(self.a),
        ]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self::new(
            unorm_from_f32(v[0]),
            unorm_from_f32(v[1]),
            unorm_from_f32(v[2]),
            unorm_from_f32(v[3]),
        )
    }

    fn to_packed(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    fn from_packed(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_le_bytes();
        Self::new(r, g, b, a)
    }
}

/// 8 bits per channel blue, green, red and alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bgra32 {
    /// Blue channel.
    pub b: u8,
    /// Green channel.
    pub g: u8,
    /// Red channel.
    pub r: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Bgra32 {
    /// Create a new pixel from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }
}

impl Pixel for Bgra32 {
    type Packed = u32;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        [
            unorm_to_f32(self.r),
            unorm_to_f32(self.g),
            unorm_to_f32(self.b),
            unorm_to_f32(self.a),
        ]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self::new(
            unorm_from_f32(v[0]),
            unorm_from_f32(v[1]),
            unorm_from_f32(v[2]),
            unorm_from_f32(v[3]),
        )
    }

    fn to_packed(&self) -> u32 {
        u32::from_le_bytes([self.b, self.g, self.r, self.a])
    }

    fn from_packed(packed: u32) -> Self {
        let [b, g, r, a] = packed.to_le_bytes();
        Self::new(r, g, b, a)
    }
}

/// 8 bits per channel alpha, red, green and blue.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Argb32 {
    /// Alpha channel.
    pub a: u8,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Argb32 {
    /// Create a new pixel from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { a, r, g, b }
    }
}

impl Pixel for Argb32 {
    type Packed = u32;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        [
            unorm_to_f32(self.r),
            unorm_to_f32(self.g),
            unorm_to_f32(self.b),
            unorm_to_f32(self.a),
        ]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self::new(
            unorm_from_f32(v[0]),
            unorm_from_f32(v[1]),
            unorm_from_f32(v[2]),
            unorm_from_f32(v[3]),
        )
    }

    fn to_packed(&self) -> u32 {
        u32::from_le_bytes([self.a, self.r, self.g, self.b])
    }

    fn from_packed(packed: u32) -> Self {
        let [a, r, g, b] = packed.to_le_bytes();
        Self::new(r, g, b, a)
    }
}

/// 8 bits per channel red, green and blue. Alpha is always opaque.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb24 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb24 {
    /// Create a new pixel from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Pixel for Rgb24 {
    type Packed = u32;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        [
            unorm_to_f32(self.r),
            unorm_to_f32(self.g),
            unorm_to_f32(self.b),
            1.0,
        ]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self::new(
            unorm_from_f32(v[0]),
            unorm_from_f32(v[1]),
            unorm_from_f32(v[2]),
        )
    }

    fn to_packed(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, 0])
    }

    fn from_packed(packed: u32) -> Self {
        let [r, g, b, _] = packed.to_le_bytes();
        Self::new(r, g, b)
    }
}

/// 8 bits per channel blue, green and red. Alpha is always opaque.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bgr24 {
    /// Blue channel.
    pub b: u8,
    /// Green channel.
    pub g: u8,
    /// Red channel.
    pub r: u8,
}

impl Bgr24 {
    /// Create a new pixel from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r }
    }
}

impl Pixel for Bgr24 {
    type Packed = u32;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        [
            unorm_to_f32(self.r),
            unorm_to_f32(self.g),
            unorm_to_f32(self.b),
            1.0,
        ]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self::new(
            unorm_from_f32(v[0]),
            unorm_from_f32(v[1]),
            unorm_from_f32(v[2]),
        )
    }

    fn to_packed(&self) -> u32 {
        u32::from_le_bytes([self.b, self.g, self.r, 0])
    }

    fn from_packed(packed: u32) -> Self {
        let [b, g, r, _] = packed.to_le_bytes();
        Self::new(r, g, b)
    }
}

/// 8 bit luminance.
///
/// Vectors are collapsed to a single channel with BT.709 luminance weights.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct L8(pub u8);

impl Pixel for L8 {
    type Packed = u8;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        let l = unorm_to_f32(self.0);
        [l, l, l, 1.0]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self(unorm_from_f32(luminance(&v)))
    }

    fn to_packed(&self) -> u8 {
        self.0
    }

    fn from_packed(packed: u8) -> Self {
        Self(packed)
    }
}

/// 8 bit luminance with 8 bit alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct La16 {
    /// Luminance channel.
    pub l: u8,
    /// Alpha channel.
    pub a: u8,
}

impl La16 {
    /// Create a new pixel from its channels.
    pub const fn new(l: u8, a: u8) -> Self {
        Self { l, a }
    }
}

impl Pixel for La16 {
    type Packed = u16;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        let l = unorm_to_f32(self.l);
        [l, l, l, unorm_to_f32(self.a)]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self::new(unorm_from_f32(luminance(&v)), unorm_from_f32(v[3]))
    }

    fn to_packed(&self) -> u16 {
        u16::from_le_bytes([self.l, self.a])
    }

    fn from_packed(packed: u16) -> Self {
        let [l, a] = packed.to_le_bytes();
        Self::new(l, a)
    }
}

/// 16 bit luminance.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct L16(pub u16);

impl Pixel for L16 {
    type Packed = u16;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        let l = unorm_to_f32(self.0);
        [l, l, l, 1.0]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self(unorm_from_f32(luminance(&v)))
    }

    fn to_packed(&self) -> u16 {
        self.0
    }

    fn from_packed(packed: u16) -> Self {
        Self(packed)
    }
}

/// 16 bits per channel red, green, blue and alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgba64 {
    /// Red channel.
    pub r: u16,
    /// Green channel.
    pub g: u16,
    /// Blue channel.
    pub b: u16,
    /// Alpha channel.
    pub a: u16,
}

impl Rgba64 {
    /// Create a new pixel from its channels.
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }
}

impl Pixel for Rgba64 {
    type Packed = u64;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        [
            unorm_to_f32(self.r),
            unorm_to_f32(self.g),
            unorm_to_f32(self.b),
            unorm_to_f32(self.a),
        ]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self::new(
            unorm_from_f32(v[0]),
            unorm_from_f32(v[1]),
            unorm_from_f32(v[2]),
            unorm_from_f32(v[3]),
        )
    }

    fn to_packed(&self) -> u64 {
        u64::from(self.r)
            | (u64::from(self.g) << 16)
            | (u64::from(self.b) << 32)
            | (u64::from(self.a) << 48)
    }

    fn from_packed(packed: u64) -> Self {
        Self::new(
            packed as u16,
            (packed >> 16) as u16,
            (packed >> 32) as u16,
            (packed >> 48) as u16,
        )
    }
}

/// Packed 16 bit color with 5 bits of red, 6 bits of green and 5 bits of blue.
///
/// Red lives in the most significant bits.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bgr565(pub u16);

impl Bgr565 {
    /// Create a new pixel from already reduced 5/6/5 bit channels.
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self(((r & 0x1F) << 11) | ((g & 0x3F) << 5) | (b & 0x1F))
    }
}

impl Pixel for Bgr565 {
    type Packed = u16;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        [
            ((self.0 >> 11) & 0x1F) as f32 / 31.0,
            ((self.0 >> 5) & 0x3F) as f32 / 63.0,
            (self.0 & 0x1F) as f32 / 31.0,
            1.0,
        ]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        let r = (v[0].clamp(0.0, 1.0) * 31.0).round() as u16;
        let g = (v[1].clamp(0.0, 1.0) * 63.0).round() as u16;
        let b = (v[2].clamp(0.0, 1.0) * 31.0).round() as u16;
        Self::new(r, g, b)
    }

    fn to_packed(&self) -> u16 {
        self.0
    }

    fn from_packed(packed: u16) -> Self {
        Self(packed)
    }
}

/// 32 bit floating point red, green, blue and alpha.
///
/// `to_vector` returns the stored components untouched; `from_vector` clamps them.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RgbaVector {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl RgbaVector {
    /// Create a new pixel from its channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Pixel for RgbaVector {
    type Packed = Vector4;

    #[inline]
    fn to_vector(&self) -> Vector4 {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    fn from_vector(v: Vector4) -> Self {
        Self::new(
            v[0].clamp(0.0, 1.0),
            v[1].clamp(0.0, 1.0),
            v[2].clamp(0.0, 1.0),
            v[3].clamp(0.0, 1.0),
        )
    }

    fn to_packed(&self) -> Vector4 {
        self.to_vector()
    }

    fn from_packed(packed: Vector4) -> Self {
        Self::new(packed[0], packed[1], packed[2], packed[3])
    }
}
