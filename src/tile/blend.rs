//! Seam smoothing for composed tiles.
//!
//! After four mirrored quadrants are stitched together the only visible
//! discontinuities sit on the two mid-lines of the tile. This module blurs a
//! narrow band around each mid-line with a small Gaussian kernel and leaves
//! every other pixel untouched.
//!
//! # Arithmetic
//!
//! Small apertures use the binomial kernel (`[1, 4, 6, 4, 1] / 16` for the
//! 5-tap seam blur). The kernel is converted to 16-bit fixed point with
//! weights summing to exactly `1 << 16`, and both separable passes accumulate
//! in integers with a single rounding at the end. A constant field stays
//! constant and a mirror-symmetric band stays mirror-symmetric, bit for bit.
//!
//! Borders inside a band are handled by reflect-101 (`dcb|abcd|cba`), with the
//! band treated as a standalone image.

use image::{imageops, Rgb, RgbImage};

/// Half-width of each seam band, and the aperture of the Gaussian kernel.
pub const BLEND_KERNEL_SIZE: u32 = 5;

/// Fixed-point precision of kernel weights.
const WEIGHT_BITS: u32 = 16;

/// Standard deviation implied by a kernel aperture that has no fixed table.
///
/// Matches the usual `0.3 * ((k - 1) / 2 - 1) + 0.8` rule.
pub fn gaussian_sigma(kernel_size: u32) -> f64 {
    0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Binomial kernels used for small odd apertures.
fn binomial_kernel(kernel_size: u32) -> Option<Vec<f64>> {
    match kernel_size {
        1 => Some(vec![1.0]),
        3 => Some(vec![0.25, 0.5, 0.25]),
        5 => Some(vec![0.0625, 0.25, 0.375, 0.25, 0.0625]),
        7 => Some(vec![
            0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
        ]),
        _ => None,
    }
}

/// Build a normalised 1-D Gaussian kernel of the given (odd) aperture.
///
/// Apertures up to 7 use the binomial table (`[1, 4, 6, 4, 1] / 16` for 5
/// taps); larger ones sample a Gaussian with [`gaussian_sigma`].
pub fn gaussian_kernel(kernel_size: u32) -> Vec<f64> {
    if let Some(table) = binomial_kernel(kernel_size) {
        return table;
    }

    let sigma = gaussian_sigma(kernel_size);
    let center = (kernel_size / 2) as f64;
    let weights: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - center;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Quantise a kernel to fixed point so the weights sum to exactly `1 << 16`.
///
/// Rounding slack is folded into the centre tap, which keeps the kernel
/// symmetric.
pub fn fixed_point_kernel(kernel: &[f64]) -> Vec<u32> {
    let one = 1u32 << WEIGHT_BITS;
    let mut fixed: Vec<u32> = kernel
        .iter()
        .map(|w| (w * one as f64).round() as u32)
        .collect();

    if !fixed.is_empty() {
        let sum: i64 = fixed.iter().map(|&w| w as i64).sum();
        let center = fixed.len() / 2;
        fixed[center] = (fixed[center] as i64 + (one as i64 - sum)) as u32;
    }

    fixed
}

/// Map an out-of-range coordinate back into `0..len` by reflect-101.
fn reflect_101(index: i64, len: u32) -> u32 {
    if len <= 1 {
        return 0;
    }
    let last = len as i64 - 1;
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as u32;
        }
    }
}

/// Gaussian-blur an entire image with a separable square kernel.
///
/// The horizontal pass runs first, then the vertical pass over its
/// fixed-point output.
pub fn gaussian_blur(image: &RgbImage, kernel_size: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let weights = fixed_point_kernel(&gaussian_kernel(kernel_size));
    let radius = (weights.len() / 2) as i64;

    // Row pass: values scaled by 1 << WEIGHT_BITS.
    let mut rows = vec![[0u64; 3]; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0u64; 3];
            for (k, &w) in weights.iter().enumerate() {
                let sx = reflect_101(x as i64 + k as i64 - radius, width);
                let p = image.get_pixel(sx, y);
                for c in 0..3 {
                    acc[c] += w as u64 * p[c] as u64;
                }
            }
            rows[(y * width + x) as usize] = acc;
        }
    }

    // Column pass: values scaled by 1 << (2 * WEIGHT_BITS).
    let shift = 2 * WEIGHT_BITS;
    let half = 1u64 << (shift - 1);
    let mut out = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0u64; 3];
            for (k, &w) in weights.iter().enumerate() {
                let sy = reflect_101(y as i64 + k as i64 - radius, height);
                let v = rows[(sy * width + x) as usize];
                for c in 0..3 {
                    acc[c] += w as u64 * v[c];
                }
            }
            let px = acc.map(|a| ((a + half) >> shift).min(u8::MAX as u64) as u8);
            out.put_pixel(x, y, Rgb(px));
        }
    }

    out
}

/// Replace a rectangular region with a blurred copy of itself.
fn blur_region(tile: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, kernel_size: u32) {
    if width == 0 || height == 0 {
        return;
    }
    let band = imageops::crop_imm(&*tile, x, y, width, height).to_image();
    let blurred = gaussian_blur(&band, kernel_size);
    imageops::replace(tile, &blurred, x as i64, y as i64);
}

/// Blur rows `[center - half_width, center + half_width)` across the full
/// width with a `kernel_size` aperture.
pub fn blur_horizontal_seam(
    tile: &mut RgbImage,
    center: u32,
    half_width: u32,
    kernel_size: u32,
) {
    let start = center.saturating_sub(half_width);
    let end = center.saturating_add(half_width).min(tile.height());
    let width = tile.width();
    blur_region(
        tile,
        0,
        start,
        width,
        end.saturating_sub(start),
        kernel_size,
    );
}

/// Blur columns `[center - half_width, center + half_width)` across the full
/// height with a `kernel_size` aperture.
pub fn blur_vertical_seam(
    tile: &mut RgbImage,
    center: u32,
    half_width: u32,
    kernel_size: u32,
) {
    let start = center.saturating_sub(half_width);
    let end = center.saturating_add(half_width).min(tile.width());
    let height = tile.height();
    blur_region(
        tile,
        start,
        0,
        end.saturating_sub(start),
        height,
        kernel_size,
    );
}
