//! Floyd-Steinberg error diffusion for turning one 8-bit channel into a
//! binary image.
//!
//! The scan is row-major and strictly sequential: every pixel reads values
//! already adjusted by the error of all pixels visited before it, so rows
//! cannot be processed out of order. Independent channels can be dithered
//! separately.

use image::{GrayImage, Luma};
use tracing::debug;

use crate::utils::{BLACK, WHITE};

/// Values strictly above this become white
const THRESHOLD: i32 = 128;

/// (dx, dy, weight) in sixteenths.
///
/// ```text
///        X   7
///    3   5   1
/// ```
const FLOYD_STEINBERG: [(i64, i64, i32); 4] = [
    (1, 0, 7),  // right
    (-1, 1, 3), // bottom-left
    (0, 1, 5),  // bottom
    (1, 1, 1),  // bottom-right
];

/// Dither an 8-bit channel into a binary image (0 = black, 255 = white).
///
/// Each neighbour receives `floor(error * weight / 16)` and is clamped back
/// to `[0, 255]` immediately, so saturated regions do not accumulate
/// unbounded error. The input is left untouched; the diffusion runs on a
/// private working copy. Deterministic for a given input.
pub fn floyd_steinberg(channel: &GrayImage) -> GrayImage {
    let (width, height) = channel.dimensions();
    debug!(width, height, "Applying Floyd-Steinberg dithering");

    let w = width as usize;
    let h = height as usize;
    let mut working: Vec<i32> = channel.as_raw().iter().map(|&v| v as i32).collect();
    let mut output = GrayImage::new(width, height);

    for y in 0..h {
        for x in 0..w {
            let old_value = working[y * w + x];
            let new_value = if old_value > THRESHOLD {
                WHITE
            } else {
                BLACK
            };
            output.put_pixel(x as u32, y as u32, Luma([new_value]));

            let error = old_value - new_value as i32;
            for &(dx, dy, weight) in &FLOYD_STEINBERG {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || nx >= w as i64 || ny >= h as i64 {
                    continue;
                }
                let idx = ny as usize * w + nx as usize;
                let diffused = (error * weight).div_euclid(16);
                working[idx] = (working[idx] + diffused).clamp(0, 255);
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::black_ratio;

    #[test]
    fn test_output_is_binary() {
        let img = GrayImage::from_fn(16, 16, |x, y| Luma([((x * 16 + y) % 256) as u8]));
        let dithered = floyd_steinberg(&img);
        assert_eq!(dithered.dimensions(), (16, 16));
        assert!(dithered.pixels().all(|p| p[0] == BLACK || p[0] == WHITE));
    }

    #[test]
    fn test_solid_extremes_stay_solid() {
        let white = GrayImage::from_pixel(5, 5, Luma([255]));
        assert!(floyd_steinberg(&white).pixels().all(|p| p[0] == WHITE));

        let black = GrayImage::from_pixel(5, 5, Luma([0]));
        assert!(floyd_steinberg(&black).pixels().all(|p| p[0] == BLACK));
    }

    #[test]
    fn test_threshold_boundary() {
        // Single row, no neighbours below: 128 stays black, 129 turns white.
        let mut img = GrayImage::new(1, 1);
        img.put_pixel(0, 0, Luma([128]));
        assert_eq!(floyd_steinberg(&img).get_pixel(0, 0)[0], BLACK);

        img.put_pixel(0, 0, Luma([129]));
        assert_eq!(floyd_steinberg(&img).get_pixel(0, 0)[0], WHITE);
    }

    #[test]
    fn test_error_diffuses_right() {
        // 100 -> black with error 100, right neighbour gets floor(700/16) = 43.
        // 100 + 43 = 143 > 128 so it turns white.
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([100]));
        img.put_pixel(1, 0, Luma([100]));
        let dithered = floyd_steinberg(&img);
        assert_eq!(dithered.get_pixel(0, 0)[0], BLACK);
        assert_eq!(dithered.get_pixel(1, 0)[0], WHITE);
    }

    #[test]
    fn test_negative_error_rounds_down() {
        // 200 -> white, error -55, right neighbour gets floor(-385/16) = -25.
        // 153 - 25 = 128, which is not above the threshold.
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([200]));
        img.put_pixel(1, 0, Luma([153]));
        let dithered = floyd_steinberg(&img);
        assert_eq!(dithered.get_pixel(0, 0)[0], WHITE);
        assert_eq!(dithered.get_pixel(1, 0)[0], BLACK);
    }

    fn from_rows<const W: usize>(rows: &[[u8; W]]) -> GrayImage {
        GrayImage::from_fn(W as u32, rows.len() as u32, |x, y| {
            Luma([rows[y as usize][x as usize]])
        })
    }

    #[test]
    fn test_known_output_uses_every_weight() {
        // Any permutation of the 7/3/5/1 weights changes at least one pixel.
        let img = from_rows(&[
            [63, 100, 137, 174],
            [122, 159, 196, 233],
            [181, 218, 255, 36],
        ]);
        let expected = from_rows(&[
            [0, 0, 255, 255],
            [255, 255, 0, 255],
            [255, 255, 255, 0],
        ]);
        assert_eq!(floyd_steinberg(&img), expected);
    }

    #[test]
    fn test_floyd_steinberg_known_3x3() {
        let img = from_rows(&[[100, 150, 200], [50, 127, 250], [0, 80, 160]]);
        let expected = from_rows(&[[0, 255, 255], [0, 0, 255], [0, 255, 0]]);
        assert_eq!(floyd_steinberg(&img), expected);
    }

    #[test]
    fn test_clamp_below_zero() {
        // 10 - 25 clamps to 0, so the black pixel has no error to pass on and
        // 135 stays white. Unclamped, -15 would push it down to 128.
        let img = from_rows(&[[200, 10, 135]]);
        assert_eq!(floyd_steinberg(&img), from_rows(&[[WHITE, BLACK, WHITE]]));
    }

    #[test]
    fn test_clamp_above_white() {
        // 255 + 56 clamps to 255, leaving no error for 110 to pick up.
        // Unclamped, the extra 56 would carry 24 over and turn it white.
        let img = from_rows(&[[128, 255, 110]]);
        assert_eq!(floyd_steinberg(&img), from_rows(&[[BLACK, WHITE, BLACK]]));
    }

    #[test]
    fn test_mid_gray_tone_preserved() {
        let img = GrayImage::from_pixel(32, 32, Luma([128]));
        let ratio = black_ratio(&floyd_steinberg(&img));
        assert!((ratio - 0.5).abs() < 0.1, "black ratio {ratio}");
    }

    #[test]
    fn test_deterministic_and_input_untouched() {
        let img = GrayImage::from_fn(8, 8, |x, y| Luma([(x * 30 + y * 7) as u8]));
        let before = img.clone();
        assert_eq!(floyd_steinberg(&img), floyd_steinberg(&img));
        assert_eq!(img, before);
    }
}
