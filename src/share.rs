//! Images crossing the library boundary, and the shares built from them

use std::fmt;

use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::cmyk::CmykImage;
use crate::dither::floyd_steinberg;
use crate::error::{Result, VCError};

/// Channel layout of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// 1-bit: 0 is black, anything else is white
    Binary,
    /// 8-bit single channel
    Grayscale,
    /// Three 8-bit channels
    Rgb,
    /// Four 8-bit channels, C/M/Y/K
    Cmyk,
}

/// An in-memory image tagged with its channel layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcImage {
    Binary(GrayImage),
    Grayscale(GrayImage),
    Rgb(RgbImage),
    Cmyk(CmykImage),
}

impl VcImage {
    pub fn mode(&self) -> ImageMode {
        match self {
            VcImage::Binary(_) => ImageMode::Binary,
            VcImage::Grayscale(_) => ImageMode::Grayscale,
            VcImage::Rgb(_) => ImageMode::Rgb,
            VcImage::Cmyk(_) => ImageMode::Cmyk,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            VcImage::Binary(img) | VcImage::Grayscale(img) => img.dimensions(),
            VcImage::Rgb(img) => img.dimensions(),
            VcImage::Cmyk(img) => img.dimensions(),
        }
    }

    /// Convert to another channel layout.
    ///
    /// Conversions to binary dither with Floyd-Steinberg (colour goes through
    /// Rec.601 luma first). RGB maps to CMYK as `(255-R, 255-G, 255-B, 0)`. CMYK
    /// inputs cannot be converted to anything else.
    pub fn convert(&self, to: ImageMode) -> Result<VcImage> {
        let from = self.mode();
        if from == to {
            return Ok(self.clone());
        }
        match (self, to) {
            (VcImage::Grayscale(img), ImageMode::Binary) => Ok(VcImage::Binary(floyd_steinberg(img))),
            (VcImage::Rgb(img), ImageMode::Binary) => {
                Ok(VcImage::Binary(floyd_steinberg(&rgb_to_luma(img))))
            }
            (VcImage::Binary(img), ImageMode::Grayscale) => Ok(VcImage::Grayscale(img.clone())),
            (VcImage::Rgb(img), ImageMode::Grayscale) => Ok(VcImage::Grayscale(rgb_to_luma(img))),
            (VcImage::Binary(img) | VcImage::Grayscale(img), ImageMode::Rgb) => {
                Ok(VcImage::Rgb(gray_to_rgb(img)))
            }
            (VcImage::Rgb(img), ImageMode::Cmyk) => Ok(VcImage::Cmyk(rgb_to_cmyk(img))),
            (VcImage::Binary(img) | VcImage::Grayscale(img), ImageMode::Cmyk) => {
                Ok(VcImage::Cmyk(rgb_to_cmyk(&gray_to_rgb(img))))
            }
            _ => Err(VCError::UnsupportedConversion { from, to }),
        }
    }

    pub fn as_gray(&self) -> Option<&GrayImage> {
        match self {
            VcImage::Binary(img) | VcImage::Grayscale(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_rgb(&self) -> Option<&RgbImage> {
        match self {
            VcImage::Rgb(img) => Some(img),
            _ => None,
        }
    }

    pub fn as_cmyk(&self) -> Option<&CmykImage> {
        match self {
            VcImage::Cmyk(img) => Some(img),
            _ => None,
        }
    }
}

/// Rec.601 luma in 16-bit fixed point, rounded to nearest.
///
/// Not `DynamicImage::to_luma8`, which weights with Rec.709.
fn rgb_to_luma(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgb([r, g, b]) = *img.get_pixel(x, y);
        let luma = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        Luma([luma as u8])
    })
}

fn gray_to_rgb(img: &GrayImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let v = img.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

fn rgb_to_cmyk(img: &RgbImage) -> CmykImage {
    CmykImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgb([r, g, b]) = *img.get_pixel(x, y);
        [255 - r, 255 - g, 255 - b, 0]
    })
}

/// Represents a single share in a (2,2) scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// The share image data
    pub image: VcImage,
    /// 1 or 2
    pub index: usize,
    /// Side of the block each secret pixel expands to (1 = no expansion)
    pub expansion: u32,
}

impl Share {
    pub fn new(image: VcImage, index: usize, expansion: u32) -> Self {
        Self {
            image,
            index,
            expansion,
        }
    }

    /// Get the dimensions of the share image
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn mode(&self) -> ImageMode {
        self.image.mode()
    }

    /// Size of the secret this share was produced from
    pub fn secret_dimensions(&self) -> (u32, u32) {
        let (width, height) = self.dimensions();
        (width / self.expansion.max(1), height / self.expansion.max(1))
    }

    /// Check if this share can be stacked with another
    pub fn is_compatible(&self, other: &Share) -> bool {
        self.dimensions() == other.dimensions()
            && self.mode() == other.mode()
            && self.expansion == other.expansion
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        let (secret_width, secret_height) = self.secret_dimensions();
        write!(
            f,
            "Share {}/2: {:?} {}x{} (secret: {}x{}, expansion: {})",
            self.index,
            self.mode(),
            width,
            height,
            secret_width,
            secret_height,
            self.expansion
        )
    }
}

impl From<GrayImage> for VcImage {
    fn from(img: GrayImage) -> Self {
        VcImage::Grayscale(img)
    }
}

impl From<RgbImage> for VcImage {
    fn from(img: RgbImage) -> Self {
        VcImage::Rgb(img)
    }
}

impl From<CmykImage> for VcImage {
    fn from(img: CmykImage) -> Self {
        VcImage::Cmyk(img)
    }
}
