//! Naor-Shamir (2,2) visual cryptography with 2x2 pixel expansion.
//!
//! Every secret pixel becomes a 2x2 block in each share, filled from a
//! column-permuted basis matrix. Stacking (OR) turns black pixels into fully
//! black blocks and white pixels into half-black blocks; the contrast loss is
//! inherent to the scheme.

use image::{GrayImage, Luma};
use rand::Rng;
use tracing::debug;

use crate::error::{ensure_same_dimensions, Result, VCError};
use crate::matrix::{basis_for, permute_columns, SUBPIXELS};
use crate::utils::{bit_to_pixel, pixel_to_bit};

/// Side length of the expanded block
pub const BLOCK_SIZE: u32 = 2;

/// Encrypt a binary secret into two shares of size `2W x 2H`.
///
/// Column `k` of the permuted basis lands at `(k % 2, k / 2)` inside the
/// block: row 0 goes to the first share, row 1 to the second.
pub fn encrypt<R>(secret: &GrayImage, rng: &mut R) -> (GrayImage, GrayImage)
where
    R: Rng + ?Sized,
{
    let (width, height) = secret.dimensions();
    debug!(width, height, "Pixel expansion encryption");

    let mut share1 = GrayImage::new(width * BLOCK_SIZE, height * BLOCK_SIZE);
    let mut share2 = GrayImage::new(width * BLOCK_SIZE, height * BLOCK_SIZE);

    for (x, y, pixel) in secret.enumerate_pixels() {
        let matrix = permute_columns(&basis_for(pixel_to_bit(pixel[0])), rng);

        let base_x = x * BLOCK_SIZE;
        let base_y = y * BLOCK_SIZE;
        for k in 0..SUBPIXELS {
            let dx = k as u32 % BLOCK_SIZE;
            let dy = k as u32 / BLOCK_SIZE;
            share1.put_pixel(base_x + dx, base_y + dy, Luma([bit_to_pixel(matrix[(0, k)])]));
            share2.put_pixel(base_x + dx, base_y + dy, Luma([bit_to_pixel(matrix[(1, k)])]));
        }
    }

    (share1, share2)
}

/// Stack two expanded shares with OR, sub-pixel by sub-pixel.
///
/// The result stays at the expanded resolution. Inputs are not modified; use
/// [`crate::utils::normalize_binary`] to clean up share display values.
pub fn decrypt(share1: &GrayImage, share2: &GrayImage) -> Result<GrayImage> {
    ensure_same_dimensions(share1.dimensions(), share2.dimensions())?;
    let (width, height) = share1.dimensions();
    if width % BLOCK_SIZE != 0 || height % BLOCK_SIZE != 0 {
        return Err(VCError::OddDimensions { width, height });
    }
    debug!(width, height, "Pixel expansion decryption");

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let a = pixel_to_bit(share1.get_pixel(x, y)[0]);
        let b = pixel_to_bit(share2.get_pixel(x, y)[0]);
        Luma([bit_to_pixel(a | b)])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{BLACK, WHITE};
    use rand::{rngs::StdRng, SeedableRng};

    fn block_black_count(image: &GrayImage, bx: u32, by: u32) -> usize {
        let mut count = 0;
        for dy in 0..BLOCK_SIZE {
            for dx in 0..BLOCK_SIZE {
                if image.get_pixel(bx * BLOCK_SIZE + dx, by * BLOCK_SIZE + dy)[0] == BLACK {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_share_dimensions() {
        let secret = GrayImage::from_pixel(5, 3, Luma([WHITE]));
        let mut rng = StdRng::seed_from_u64(1);
        let (share1, share2) = encrypt(&secret, &mut rng);
        assert_eq!(share1.dimensions(), (10, 6));
        assert_eq!(share2.dimensions(), (10, 6));

        let stacked = decrypt(&share1, &share2).unwrap();
        assert_eq!(stacked.dimensions(), (10, 6));
    }

    #[test]
    fn test_all_black_reconstructs_fully_black() {
        let secret = GrayImage::from_pixel(6, 6, Luma([BLACK]));
        let mut rng = StdRng::seed_from_u64(2);
        let (share1, share2) = encrypt(&secret, &mut rng);
        let stacked = decrypt(&share1, &share2).unwrap();

        for by in 0..6 {
            for bx in 0..6 {
                assert_eq!(block_black_count(&stacked, bx, by), 4);
            }
        }
    }

    #[test]
    fn test_all_white_reconstructs_half_black() {
        let secret = GrayImage::from_pixel(6, 6, Luma([WHITE]));
        let mut rng = StdRng::seed_from_u64(3);
        let (share1, share2) = encrypt(&secret, &mut rng);
        let stacked = decrypt(&share1, &share2).unwrap();

        for by in 0..6 {
            for bx in 0..6 {
                assert_eq!(block_black_count(&stacked, bx, by), 2);
            }
        }
    }

    #[test]
    fn test_every_share_block_is_half_black() {
        let secret = GrayImage::from_fn(8, 8, |x, y| {
            Luma([if (x + y) % 3 == 0 { BLACK } else { WHITE }])
        });
        let mut rng = StdRng::seed_from_u64(4);
        let (share1, share2) = encrypt(&secret, &mut rng);

        for share in [&share1, &share2] {
            for by in 0..8 {
                for bx in 0..8 {
                    assert_eq!(block_black_count(share, bx, by), 2);
                }
            }
        }
    }

    #[test]
    fn test_decrypt_does_not_touch_inputs() {
        let mut share1 = GrayImage::from_pixel(2, 2, Luma([WHITE]));
        share1.put_pixel(0, 0, Luma([7]));
        let share2 = GrayImage::from_pixel(2, 2, Luma([BLACK]));
        let before = share1.clone();

        decrypt(&share1, &share2).unwrap();
        assert_eq!(share1, before);
    }

    #[test]
    fn test_decrypt_rejects_bad_shapes() {
        let a = GrayImage::new(4, 4);
        let b = GrayImage::new(4, 6);
        assert!(matches!(
            decrypt(&a, &b),
            Err(VCError::DimensionMismatch { .. })
        ));

        let odd = GrayImage::new(3, 4);
        assert_eq!(
            decrypt(&odd, &odd),
            Err(VCError::OddDimensions { width: 3, height: 4 })
        );
    }
}
