//! Utility functions for visual secret sharing

use image::{GrayImage, Luma};

use crate::error::{ensure_same_dimensions, Result};

/// Display value of a black pixel
pub const BLACK: u8 = 0;
/// Display value of a white pixel
pub const WHITE: u8 = 255;

/// Map a display pixel to the internal share bit (black = 1, white = 0).
///
/// Only an exact 0 counts as black, so binary images saved with any
/// non-zero "on" value still decode correctly.
#[inline]
pub fn pixel_to_bit(value: u8) -> u8 {
    if value == BLACK {
        1
    } else {
        0
    }
}

/// Map an internal share bit back to its display value
#[inline]
pub fn bit_to_pixel(bit: u8) -> u8 {
    if bit == 1 {
        BLACK
    } else {
        WHITE
    }
}

/// Rewrite a binary image so every pixel is exactly 0 or 255.
///
/// Shares that went through a lossy round trip (or a 0/1 channel) come back
/// with arbitrary non-zero values for white; this puts them back on the
/// display alphabet without touching the input.
pub fn normalize_binary(image: &GrayImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([bit_to_pixel(pixel_to_bit(image.get_pixel(x, y)[0]))])
    })
}

/// Fraction of pixels that are black (display value 0)
pub fn black_ratio(image: &GrayImage) -> f64 {
    let total = image.width() as usize * image.height() as usize;
    if total == 0 {
        return 0.0;
    }
    let black = image.pixels().filter(|p| p[0] == BLACK).count();
    black as f64 / total as f64
}

/// Fraction of samples that match exactly between two images
pub fn match_rate(original: &GrayImage, reconstructed: &GrayImage) -> Result<f64> {
    ensure_same_dimensions(original.dimensions(), reconstructed.dimensions())?;
    let total = original.as_raw().len();
    if total == 0 {
        return Ok(1.0);
    }
    let matching = original
        .as_raw()
        .iter()
        .zip(reconstructed.as_raw())
        .filter(|(a, b)| a == b)
        .count();
    Ok(matching as f64 / total as f64)
}

/// Peak signal-to-noise ratio in dB; identical images give infinity
pub fn psnr(original: &GrayImage, reconstructed: &GrayImage) -> Result<f64> {
    ensure_same_dimensions(original.dimensions(), reconstructed.dimensions())?;
    let total = original.as_raw().len();
    if total == 0 {
        return Ok(f64::INFINITY);
    }
    let squared_error: f64 = original
        .as_raw()
        .iter()
        .zip(reconstructed.as_raw())
        .map(|(&a, &b)| {
            let diff = a as f64 - b as f64;
            diff * diff
        })
        .sum();
    let mse = squared_error / total as f64;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0 * 255.0 / mse).log10())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_mapping() {
        assert_eq!(pixel_to_bit(0), 1);
        assert_eq!(pixel_to_bit(1), 0);
        assert_eq!(pixel_to_bit(255), 0);
        assert_eq!(bit_to_pixel(1), BLACK);
        assert_eq!(bit_to_pixel(0), WHITE);
    }

    #[test]
    fn test_normalize_binary_leaves_input_untouched() {
        let mut img = GrayImage::new(3, 1);
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(1, 0, Luma([1]));
        img.put_pixel(2, 0, Luma([200]));

        let normalized = normalize_binary(&img);

        assert_eq!(normalized.as_raw(), &vec![0, 255, 255]);
        assert_eq!(img.as_raw(), &vec![0, 1, 200]);
    }

    #[test]
    fn test_black_ratio() {
        let mut img = GrayImage::from_pixel(2, 2, Luma([WHITE]));
        img.put_pixel(0, 0, Luma([BLACK]));
        assert!((black_ratio(&img) - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quality_metrics() {
        let a = GrayImage::from_pixel(4, 4, Luma([100]));
        let mut b = a.clone();
        assert_eq!(psnr(&a, &b).unwrap(), f64::INFINITY);
        assert_eq!(match_rate(&a, &b).unwrap(), 1.0);

        b.put_pixel(0, 0, Luma([110]));
        assert!(psnr(&a, &b).unwrap().is_finite());
        assert!((match_rate(&a, &b).unwrap() - 15.0 / 16.0).abs() < 1e-12);

        let c = GrayImage::new(2, 2);
        assert!(psnr(&a, &c).is_err());
    }
}
