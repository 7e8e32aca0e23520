//! CMYK composition on top of the pixel expansion scheme.
//!
//! C, M and Y are dithered and shared independently; K is dropped. Each
//! combined share stores the per-channel binary shares as 0/1 samples with
//! K = 0, so both shares render as (nearly) blank white pages. That is a
//! side effect of reusing the binary codec, not a defect.

use image::{GrayImage, ImageBuffer, Luma, Rgba};
use rand::Rng;
use tracing::{debug, trace};

use crate::dither::floyd_steinberg;
use crate::error::{ensure_same_dimensions, Result};
use crate::expansion;
use crate::utils::{BLACK, WHITE};

pub const CYAN: usize = 0;
pub const MAGENTA: usize = 1;
pub const YELLOW: usize = 2;
pub const KEY: usize = 3;

/// Channels that carry secret data
pub const SHARED_CHANNELS: [usize; 3] = [CYAN, MAGENTA, YELLOW];

/// A four-channel 8-bit CMYK image.
///
/// `image` has no CMYK pixel type, so the samples are stored in a
/// four-channel buffer and interpreted as C, M, Y, K in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmykImage {
    buffer: ImageBuffer<Rgba<u8>, Vec<u8>>,
}

impl CmykImage {
    /// Blank image (all channels 0)
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: ImageBuffer::new(width, height),
        }
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        Self {
            buffer: ImageBuffer::from_fn(width, height, |x, y| Rgba(f(x, y))),
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// `[c, m, y, k]` at `(x, y)`
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    /// Iterate over `[c, m, y, k]` samples in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.buffer.pixels().map(|p| p.0)
    }

    /// Copy one channel out as a grayscale image
    pub fn channel(&self, channel: usize) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([self.buffer.get_pixel(x, y)[channel]])
        })
    }

    /// Assemble C, M and Y planes into one image with K = 0.
    ///
    /// All three planes must share the same dimensions.
    pub fn from_channels(c: &GrayImage, m: &GrayImage, y: &GrayImage) -> Result<Self> {
        ensure_same_dimensions(c.dimensions(), m.dimensions())?;
        ensure_same_dimensions(c.dimensions(), y.dimensions())?;
        Ok(Self::from_fn(c.width(), c.height(), |px, py| {
            [
                c.get_pixel(px, py)[0],
                m.get_pixel(px, py)[0],
                y.get_pixel(px, py)[0],
                0,
            ]
        }))
    }
}

/// Encrypt a CMYK secret into two combined shares of size `2W x 2H`.
///
/// Share channel samples are 1 for a white sub-pixel and 0 for a black one.
pub fn encrypt<R>(secret: &CmykImage, rng: &mut R) -> Result<(CmykImage, CmykImage)>
where
    R: Rng + ?Sized,
{
    let (width, height) = secret.dimensions();
    debug!(width, height, "CMYK encryption");

    let mut first = Vec::with_capacity(SHARED_CHANNELS.len());
    let mut second = Vec::with_capacity(SHARED_CHANNELS.len());
    for channel in SHARED_CHANNELS {
        let dithered = floyd_steinberg(&secret.channel(channel));
        let (share1, share2) = expansion::encrypt(&dithered, rng);
        trace!(channel, "Channel shares generated");
        first.push(to_unit_samples(&share1));
        second.push(to_unit_samples(&share2));
    }

    let combined1 = CmykImage::from_channels(&first[CYAN], &first[MAGENTA], &first[YELLOW])?;
    let combined2 = CmykImage::from_channels(&second[CYAN], &second[MAGENTA], &second[YELLOW])?;
    debug!("Combined shares generated");
    Ok((combined1, combined2))
}

/// Stack two combined shares channel by channel.
///
/// Decoded C/M/Y channels hold display values (0 or 255); K is 0. The
/// output stays at the expanded resolution.
pub fn decrypt(share1: &CmykImage, share2: &CmykImage) -> Result<CmykImage> {
    ensure_same_dimensions(share1.dimensions(), share2.dimensions())?;
    debug!(
        width = share1.width(),
        height = share1.height(),
        "CMYK decryption"
    );

    let mut decoded = Vec::with_capacity(SHARED_CHANNELS.len());
    for channel in SHARED_CHANNELS {
        let stacked = expansion::decrypt(&share1.channel(channel), &share2.channel(channel))?;
        trace!(channel, "Channel overlap completed");
        decoded.push(stacked);
    }

    CmykImage::from_channels(&decoded[CYAN], &decoded[MAGENTA], &decoded[YELLOW])
}

/// Binary display image (0 / 255) to 0 / 1 channel samples
fn to_unit_samples(binary: &GrayImage) -> GrayImage {
    GrayImage::from_fn(binary.width(), binary.height(), |x, y| {
        Luma([if binary.get_pixel(x, y)[0] == BLACK { 0 } else { 1 }])
    })
}
