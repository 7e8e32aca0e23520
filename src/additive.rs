//! Random grid additive secret sharing over 8-bit samples.
//!
//! The first share is a fresh uniform grid; the second is chosen so that the
//! two shares sum to the secret modulo 256. No pixel expansion, and every
//! channel is handled independently, so the same code serves grayscale and
//! RGB buffers.

use std::ops::DerefMut;

use image::{ImageBuffer, Pixel};
use rand::Rng;
use tracing::debug;

use crate::error::{ensure_same_dimensions, Result};

/// Split `secret` into two shares with `(share1 + share2) mod 256 == secret`.
///
/// `share1` is drawn uniformly from `rng` and never depends on the secret.
pub fn encrypt<P, R>(
    secret: &ImageBuffer<P, Vec<u8>>,
    rng: &mut R,
) -> (ImageBuffer<P, Vec<u8>>, ImageBuffer<P, Vec<u8>>)
where
    P: Pixel<Subpixel = u8>,
    R: Rng + ?Sized,
{
    let (width, height) = secret.dimensions();
    debug!(width, height, channels = P::CHANNEL_COUNT, "Additive encryption");

    let mut share1 = secret.clone();
    rng.fill(share1.deref_mut());

    let mut share2 = secret.clone();
    for (s2, &s1) in share2.deref_mut().iter_mut().zip(share1.as_raw()) {
        *s2 = s2.wrapping_sub(s1);
    }

    (share1, share2)
}

/// Reconstruct the secret as `(share1 + share2) mod 256`, sample by sample
pub fn decrypt<P>(
    share1: &ImageBuffer<P, Vec<u8>>,
    share2: &ImageBuffer<P, Vec<u8>>,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    ensure_same_dimensions(share1.dimensions(), share2.dimensions())?;
    debug!(
        width = share1.width(),
        height = share1.height(),
        "Additive decryption"
    );

    let mut secret = share1.clone();
    for (s, &s2) in secret.deref_mut().iter_mut().zip(share2.as_raw()) {
        *s = s.wrapping_add(s2);
    }
    Ok(secret)
}
