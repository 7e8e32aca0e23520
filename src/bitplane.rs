//! Bitplane layered random grids for 8-bit grayscale secrets.
//!
//! The secret is inverted, split into its most significant bitplanes, and
//! every plane is shared with the halftone random grid rule. Plane `i`
//! (0 = MSB) of both shares lives at bit `7 - i`, so each share is itself an
//! ordinary grayscale image. Planes that are not encoded stay zero in both
//! shares; fewer planes means noisier shares and a coarser reconstruction.

use image::{GrayImage, Luma};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ensure_same_dimensions, Result, VCError};
use crate::halftone;

/// Number of bitplanes in an 8-bit sample
pub const MAX_PLANES: u8 = 8;

/// Parameters for the bitplane codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitplaneParams {
    /// Most significant planes to encode / decode, in `1..=8`
    pub planes: u8,
}

impl Default for BitplaneParams {
    fn default() -> Self {
        Self { planes: 3 }
    }
}

impl BitplaneParams {
    pub fn new(planes: u8) -> Result<Self> {
        validate_planes(planes)?;
        Ok(Self { planes })
    }
}

/// Check that a plane count lies in `1..=8`
pub fn validate_planes(planes: u8) -> Result<()> {
    if planes == 0 || planes > MAX_PLANES {
        return Err(VCError::ParameterOutOfRange {
            name: "bitplanes",
            value: planes as i64,
            min: 1,
            max: MAX_PLANES as i64,
        });
    }
    Ok(())
}

/// Extract the `num_planes` most significant bitplanes, MSB first.
///
/// Each plane is a row-major grid of 0/1 values.
pub fn extract_bitplanes(image: &GrayImage, num_planes: u8) -> Result<Vec<Vec<u8>>> {
    validate_planes(num_planes)?;
    Ok((0..num_planes)
        .map(|i| {
            let shift = 7 - i;
            image.as_raw().iter().map(|&v| (v >> shift) & 1).collect()
        })
        .collect())
}

/// Encrypt a grayscale secret into two grayscale shares of the same size
pub fn encrypt<R>(secret: &GrayImage, num_planes: u8, rng: &mut R) -> Result<(GrayImage, GrayImage)>
where
    R: Rng + ?Sized,
{
    validate_planes(num_planes)?;
    let (width, height) = secret.dimensions();
    debug!(width, height, planes = num_planes, "Bitplane encryption");

    // Black must be 1 in the halftone convention, so work on 255 - v.
    let inverted = GrayImage::from_fn(width, height, |x, y| {
        Luma([255 - secret.get_pixel(x, y)[0]])
    });
    let planes = extract_bitplanes(&inverted, num_planes)?;

    let mut share1 = vec![0u8; planes[0].len()];
    let mut share2 = vec![0u8; planes[0].len()];
    for (i, plane) in planes.iter().enumerate() {
        let shift = 7 - i as u32;
        let (rg1, rg2) = halftone::encrypt_bits(plane, rng);
        for (acc, bit) in share1.iter_mut().zip(&rg1) {
            *acc += *bit << shift;
        }
        for (acc, bit) in share2.iter_mut().zip(&rg2) {
            *acc += *bit << shift;
        }
    }

    Ok((from_samples(width, height, &share1), from_samples(width, height, &share2)))
}

/// Recover the secret from the `num_planes` most significant planes.
///
/// Always XOR-based: each plane pair is XORed and inverted back, which
/// undoes both the random grid and the inversion applied at encode time.
/// With all 8 planes the original is recovered exactly; with fewer, the low
/// bits come back as zero.
pub fn decrypt(share1: &GrayImage, share2: &GrayImage, num_planes: u8) -> Result<GrayImage> {
    validate_planes(num_planes)?;
    ensure_same_dimensions(share1.dimensions(), share2.dimensions())?;
    let (width, height) = share1.dimensions();
    debug!(width, height, planes = num_planes, "Bitplane decryption");

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let a = share1.get_pixel(x, y)[0];
        let b = share2.get_pixel(x, y)[0];
        let value = (0..num_planes).fold(0u8, |acc, i| {
            let shift = 7 - i;
            let overlaid = ((a >> shift) & 1) ^ ((b >> shift) & 1);
            acc + ((1 - overlaid) << shift)
        });
        Luma([value])
    }))
}

fn from_samples(width: u32, height: u32, samples: &[u8]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([samples[(y * width + x) as usize]]))
}
