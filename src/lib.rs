//! Visual Secret Sharing Library
//!
//! (2,2) threshold schemes that split a secret image into two shares:
//! - Naor-Shamir pixel expansion on binary images
//! - Per-channel pixel expansion for CMYK images
//! - Random grid additive sharing for grayscale and RGB images
//! - Random grid halftone sharing with OR or XOR reconstruction
//! - Bitplane layering of random grids for grayscale images
//!
//! Binary-only schemes receive their input through Floyd-Steinberg dithering.
//! Randomness is always supplied by the caller.

pub mod additive;
pub mod algorithms;
pub mod bitplane;
pub mod cmyk;
pub mod dither;
pub mod error;
pub mod expansion;
pub mod halftone;
pub mod matrix;
pub mod share;
pub mod utils;

pub use algorithms::{ParameterSpec, Requirements, Scheme};
pub use bitplane::BitplaneParams;
pub use cmyk::CmykImage;
pub use error::{Result, VCError};
pub use halftone::{HalftoneParams, ReconstructionMode};
pub use share::{ImageMode, Share, VcImage};

// Re-export common types
pub use image::{GrayImage, Luma, Rgb, RgbImage};

use rand::Rng;

/// Main struct for visual secret sharing operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualCryptography {
    scheme: Scheme,
}

impl VisualCryptography {
    /// Create a new instance, rejecting out-of-range scheme parameters
    pub fn new(scheme: Scheme) -> Result<Self> {
        scheme.validate()?;
        Ok(Self { scheme })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Encrypt an image into two shares
    pub fn encrypt<R>(&self, image: &VcImage, rng: &mut R) -> Result<[Share; 2]>
    where
        R: Rng + ?Sized,
    {
        algorithms::encrypt(&self.scheme, image, rng)
    }

    /// Decrypt shares back into an image
    pub fn decrypt(&self, shares: &[Share]) -> Result<VcImage> {
        algorithms::decrypt(&self.scheme, shares)
    }
}
