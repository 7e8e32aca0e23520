//! Random grid sharing of binary images (Kafri-Keren style).
//!
//! Internally black is 1 and white is 0. The first share is a uniform random
//! bit grid; the second copies it where the secret is white and flips it
//! where the secret is black. Stacking with OR darkens every black pixel and
//! half of the white ones; XOR cancels the random bit and recovers the
//! secret exactly.

use std::fmt;
use std::str::FromStr;

use image::{GrayImage, Luma};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_same_dimensions, Result, VCError};
use crate::utils::{bit_to_pixel, pixel_to_bit};

/// How the two shares are combined on decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReconstructionMode {
    /// Physical stacking; black-preserving but loses contrast
    #[default]
    #[serde(rename = "OR", alias = "or")]
    Or,
    /// Exact recovery of the binary secret
    #[serde(rename = "XOR", alias = "xor")]
    Xor,
}

impl ReconstructionMode {
    /// Combine two internal bits
    #[inline]
    pub fn combine(self, a: u8, b: u8) -> u8 {
        match self {
            ReconstructionMode::Or => a | b,
            ReconstructionMode::Xor => a ^ b,
        }
    }

    /// Label used in parameter descriptions
    pub fn as_str(self) -> &'static str {
        match self {
            ReconstructionMode::Or => "OR",
            ReconstructionMode::Xor => "XOR",
        }
    }
}

impl FromStr for ReconstructionMode {
    type Err = VCError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OR" => Ok(ReconstructionMode::Or),
            "XOR" => Ok(ReconstructionMode::Xor),
            _ => Err(VCError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ReconstructionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for the halftone codec; only decoding reads them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HalftoneParams {
    pub mode: ReconstructionMode,
}

/// Second-share bit for one secret bit and its random first-share bit
#[inline]
pub fn share_bit(secret_bit: u8, random_bit: u8) -> u8 {
    if secret_bit == 0 {
        random_bit
    } else {
        1 - random_bit
    }
}

/// Share a grid of internal bits (1 = black). Returns `(rg1, rg2)`.
///
/// This is the building block reused per bitplane by the bitplane codec.
pub fn encrypt_bits<R>(secret: &[u8], rng: &mut R) -> (Vec<u8>, Vec<u8>)
where
    R: Rng + ?Sized,
{
    let rg1: Vec<u8> = (0..secret.len()).map(|_| rng.random_range(0..2u8)).collect();
    let rg2 = secret
        .iter()
        .zip(&rg1)
        .map(|(&s, &r)| share_bit(s, r))
        .collect();
    (rg1, rg2)
}

/// Encrypt a binary image (0 = black, non-zero = white) into two noise shares.
///
/// Shares use the display convention: internal 1 is drawn black.
pub fn encrypt<R>(secret: &GrayImage, rng: &mut R) -> (GrayImage, GrayImage)
where
    R: Rng + ?Sized,
{
    let (width, height) = secret.dimensions();
    debug!(width, height, "Random grid halftone encryption");

    let bits: Vec<u8> = secret.as_raw().iter().map(|&v| pixel_to_bit(v)).collect();
    let (rg1, rg2) = encrypt_bits(&bits, rng);

    (bits_to_image(width, height, &rg1), bits_to_image(width, height, &rg2))
}

/// Stack two binary shares with the chosen operation.
///
/// The result is mapped back to display values: a combined 1 is black.
pub fn decrypt(
    share1: &GrayImage,
    share2: &GrayImage,
    mode: ReconstructionMode,
) -> Result<GrayImage> {
    ensure_same_dimensions(share1.dimensions(), share2.dimensions())?;
    let (width, height) = share1.dimensions();
    debug!(width, height, %mode, "Random grid halftone decryption");

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let a = pixel_to_bit(share1.get_pixel(x, y)[0]);
        let b = pixel_to_bit(share2.get_pixel(x, y)[0]);
        Luma([bit_to_pixel(mode.combine(a, b))])
    }))
}

fn bits_to_image(width: u32, height: u32, bits: &[u8]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([bit_to_pixel(bits[(y * width + x) as usize])])
    })
}
