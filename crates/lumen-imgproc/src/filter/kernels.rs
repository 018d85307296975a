use crate::error::KernelError;

/// Create a box blur kernel.
///
/// # Arguments
///
/// * `radius` - The radius of the kernel. The kernel has `2 * radius + 1` weights.
///
/// # Returns
///
/// A vector of equal weights summing to one.
pub fn box_blur_kernel_1d(radius: usize) -> Vec<f32> {
    let kernel_size = 2 * radius + 1;
    vec![1.0 / kernel_size as f32; kernel_size]
}

/// Compute the length of a gaussian kernel.
///
/// An explicit radius gives `2 * radius + 1`, otherwise the length is derived from the
/// sigma as `ceil(sigma) * 2 + 1`.
///
/// # Errors
///
/// Fails if the sigma is not a finite positive number.
pub fn gaussian_kernel_size(sigma: f32, radius: Option<usize>) -> Result<usize, KernelError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(KernelError::InvalidSigma(sigma));
    }
    Ok(match radius {
        Some(radius) => 2 * radius + 1,
        None => sigma.ceil() as usize * 2 + 1,
    })
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel. Must be odd.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel normalized to sum one.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Result<Vec<f32>, KernelError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(KernelError::InvalidSigma(sigma));
    }
    if kernel_size == 0 {
        return Err(KernelError::Empty);
    }
    if kernel_size % 2 == 0 {
        return Err(KernelError::EvenDimension(1, kernel_size));
    }

    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);

    // mirror the upper half so both sides hold bit-identical weights
    for i in 0..kernel_size / 2 {
        kernel[kernel_size - 1 - i] = kernel[i];
    }

    Ok(kernel)
}

/// Create a gaussian sharpen kernel.
///
/// The center weight is `2 - g[mid]` and every other weight `-g[i]`, with `g` the
/// normalized gaussian of the same size, so the kernel still sums to one.
pub fn gaussian_sharpen_kernel_1d(kernel_size: usize, sigma: f32) -> Result<Vec<f32>, KernelError> {
    let mut kernel = gaussian_kernel_1d(kernel_size, sigma)?;
    let mid = kernel_size / 2;
    kernel.iter_mut().enumerate().for_each(|(i, k)| {
        *k = if i == mid { 2.0 - *k } else { -*k };
    });
    Ok(kernel)
}

/// Create a sobel kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel. Either 3 or 5.
///
/// # Returns
///
/// The derivative and the smoothing vectors of the kernel.
pub fn sobel_kernel_1d(kernel_size: usize) -> Result<(Vec<f32>, Vec<f32>), KernelError> {
    let (kernel_x, kernel_y) = match kernel_size {
        3 => (vec![-1.0, 0.0, 1.0], vec![1.0, 2.0, 1.0]),
        5 => (
            vec![-1.0, -2.0, 0.0, 2.0, 1.0],
            vec![1.0, 4.0, 6.0, 4.0, 1.0],
        ),
        _ => return Err(KernelError::UnsupportedSize(kernel_size)),
    };
    Ok((kernel_x, kernel_y))
}
