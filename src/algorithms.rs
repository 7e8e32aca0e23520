//! Scheme selection and dispatch

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use image::{GrayImage, RgbImage};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    additive, bitplane,
    bitplane::BitplaneParams,
    cmyk::{self, CmykImage},
    error::{Result, VCError},
    expansion, halftone,
    halftone::{HalftoneParams, ReconstructionMode},
    share::{ImageMode, Share, VcImage},
};

/// Available (2,2) schemes, each carrying its own parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Scheme {
    /// Naor-Shamir pixel expansion on a dithered binary secret
    PixelExpansion,
    /// Per-channel pixel expansion of a CMYK secret
    Cmyk,
    /// Modular additive random grid on grayscale
    AdditiveGrayscale,
    /// Modular additive random grid on RGB
    AdditiveColor,
    /// Kafri-Keren random grid on a dithered binary secret
    Halftone(HalftoneParams),
    /// Random grids over the most significant bitplanes
    Bitplane(BitplaneParams),
}

/// Registry keys, in display order
pub const SCHEME_KEYS: [&str; 6] = [
    "vc_grayscale_halftone",
    "vc_color_cmyk",
    "rg_grayscale_additive_SS",
    "rg_color_additive_SS",
    "rg_grayscale_halftone",
    "rg_grayscale_bitplane",
];

impl Scheme {
    /// Every scheme with default parameters
    pub fn all() -> Vec<Scheme> {
        SCHEME_KEYS
            .iter()
            .filter_map(|key| key.parse().ok())
            .collect()
    }

    /// Registry key
    pub fn key(&self) -> &'static str {
        match self {
            Scheme::PixelExpansion => "vc_grayscale_halftone",
            Scheme::Cmyk => "vc_color_cmyk",
            Scheme::AdditiveGrayscale => "rg_grayscale_additive_SS",
            Scheme::AdditiveColor => "rg_color_additive_SS",
            Scheme::Halftone(_) => "rg_grayscale_halftone",
            Scheme::Bitplane(_) => "rg_grayscale_bitplane",
        }
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            Scheme::PixelExpansion => "VC - Grayscale Halftone",
            Scheme::Cmyk => "VC - Color CMYK",
            Scheme::AdditiveGrayscale => "RG - Grayscale Additive Secret Sharing",
            Scheme::AdditiveColor => "RG - Color (RGB) Additive Secret Sharing",
            Scheme::Halftone(_) => "RG - Grayscale Halftone",
            Scheme::Bitplane(_) => "RG - Grayscale Bitplane",
        }
    }

    /// Channel layout inputs are converted to before encoding or decoding
    pub fn image_mode(&self) -> ImageMode {
        match self {
            Scheme::PixelExpansion | Scheme::Halftone(_) => ImageMode::Binary,
            Scheme::Cmyk => ImageMode::Cmyk,
            Scheme::AdditiveGrayscale | Scheme::Bitplane(_) => ImageMode::Grayscale,
            Scheme::AdditiveColor => ImageMode::Rgb,
        }
    }

    /// Side of the block each secret pixel expands to
    pub fn expansion(&self) -> u32 {
        match self {
            Scheme::PixelExpansion | Scheme::Cmyk => expansion::BLOCK_SIZE,
            _ => 1,
        }
    }

    /// Check the carried parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            Scheme::Bitplane(params) => bitplane::validate_planes(params.planes),
            _ => Ok(()),
        }
    }

    /// Set a named parameter from its string form, as submitted by a form.
    ///
    /// Only coerces the type; range checks happen in [`Scheme::validate`].
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        match (self, name) {
            (Scheme::Bitplane(params), "bitplanes") => {
                params.planes = value.trim().parse().map_err(|_| {
                    VCError::InvalidConfiguration(format!(
                        "Parameter 'bitplanes' must be a number, got '{}'",
                        value
                    ))
                })?;
                Ok(())
            }
            (Scheme::Halftone(params), "xor_or") => {
                params.mode = value.parse()?;
                Ok(())
            }
            (scheme, _) => Err(VCError::InvalidConfiguration(format!(
                "Scheme '{}' has no parameter '{}'",
                scheme.key(),
                name
            ))),
        }
    }

    /// Inputs and parameters each operation expects
    pub fn requirements(&self) -> Requirements {
        let mut encryption = OperationRequirements::images(1);
        let mut decryption = OperationRequirements::images(2);

        match self {
            Scheme::Halftone(_) => {
                decryption.parameters.insert(
                    "xor_or",
                    ParameterSpec::Select {
                        options: vec![
                            ReconstructionMode::Or.as_str(),
                            ReconstructionMode::Xor.as_str(),
                        ],
                        default: ReconstructionMode::default().as_str(),
                        label: "Choose whether to decrypt using OR or XOR:",
                    },
                );
            }
            Scheme::Bitplane(_) => {
                let planes = ParameterSpec::Number {
                    default: BitplaneParams::default().planes as i64,
                    label: "Number of Most Significant Bit Planes to use:",
                };
                encryption.parameters.insert("bitplanes", planes.clone());
                decryption.parameters.insert("bitplanes", planes);
            }
            _ => {}
        }

        Requirements {
            encryption,
            decryption,
        }
    }
}

impl FromStr for Scheme {
    type Err = VCError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vc_grayscale_halftone" => Ok(Scheme::PixelExpansion),
            "vc_color_cmyk" => Ok(Scheme::Cmyk),
            "rg_grayscale_additive_SS" => Ok(Scheme::AdditiveGrayscale),
            "rg_color_additive_SS" => Ok(Scheme::AdditiveColor),
            "rg_grayscale_halftone" => Ok(Scheme::Halftone(HalftoneParams::default())),
            "rg_grayscale_bitplane" => Ok(Scheme::Bitplane(BitplaneParams::default())),
            _ => Err(VCError::UnknownScheme(s.to_string())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a scheme needs for encryption and decryption
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirements {
    pub encryption: OperationRequirements,
    pub decryption: OperationRequirements,
}

/// Image count and named parameters of one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRequirements {
    pub num_images: usize,
    pub parameters: BTreeMap<&'static str, ParameterSpec>,
}

impl OperationRequirements {
    fn images(num_images: usize) -> Self {
        Self {
            num_images,
            parameters: BTreeMap::new(),
        }
    }
}

/// Shape of a single named parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParameterSpec {
    Number {
        default: i64,
        label: &'static str,
    },
    Select {
        options: Vec<&'static str>,
        default: &'static str,
        label: &'static str,
    },
}

/// Main encryption function that dispatches to the appropriate scheme
pub fn encrypt<R>(scheme: &Scheme, image: &VcImage, rng: &mut R) -> Result<[Share; 2]>
where
    R: Rng + ?Sized,
{
    scheme.validate()?;
    let secret = image.convert(scheme.image_mode())?;
    debug!(scheme = scheme.key(), from = ?image.mode(), "Encrypting");

    let (first, second) = match scheme {
        Scheme::PixelExpansion => {
            let (a, b) = expansion::encrypt(expect_gray(&secret, ImageMode::Binary)?, rng);
            (VcImage::Binary(a), VcImage::Binary(b))
        }
        Scheme::Cmyk => {
            let (a, b) = cmyk::encrypt(expect_cmyk(&secret)?, rng)?;
            (VcImage::Cmyk(a), VcImage::Cmyk(b))
        }
        Scheme::AdditiveGrayscale => {
            let (a, b) = additive::encrypt(expect_gray(&secret, ImageMode::Grayscale)?, rng);
            (VcImage::Grayscale(a), VcImage::Grayscale(b))
        }
        Scheme::AdditiveColor => {
            let (a, b) = additive::encrypt(expect_rgb(&secret)?, rng);
            (VcImage::Rgb(a), VcImage::Rgb(b))
        }
        Scheme::Halftone(_) => {
            let (a, b) = halftone::encrypt(expect_gray(&secret, ImageMode::Binary)?, rng);
            (VcImage::Binary(a), VcImage::Binary(b))
        }
        Scheme::Bitplane(params) => {
            let (a, b) = bitplane::encrypt(
                expect_gray(&secret, ImageMode::Grayscale)?,
                params.planes,
                rng,
            )?;
            (VcImage::Grayscale(a), VcImage::Grayscale(b))
        }
    };

    let expansion = scheme.expansion();
    Ok([
        Share::new(first, 1, expansion),
        Share::new(second, 2, expansion),
    ])
}

/// Main decryption function that dispatches to the appropriate scheme
pub fn decrypt(scheme: &Scheme, shares: &[Share]) -> Result<VcImage> {
    scheme.validate()?;
    let [first, second] = shares else {
        return Err(VCError::InsufficientShares {
            required: 2,
            provided: shares.len(),
        });
    };
    let mode = scheme.image_mode();
    let a = first.image.convert(mode)?;
    let b = second.image.convert(mode)?;
    debug!(scheme = scheme.key(), "Decrypting");

    match scheme {
        Scheme::PixelExpansion => Ok(VcImage::Binary(expansion::decrypt(
            expect_gray(&a, ImageMode::Binary)?,
            expect_gray(&b, ImageMode::Binary)?,
        )?)),
        Scheme::Cmyk => Ok(VcImage::Cmyk(cmyk::decrypt(
            expect_cmyk(&a)?,
            expect_cmyk(&b)?,
        )?)),
        Scheme::AdditiveGrayscale => Ok(VcImage::Grayscale(additive::decrypt(
            expect_gray(&a, ImageMode::Grayscale)?,
            expect_gray(&b, ImageMode::Grayscale)?,
        )?)),
        Scheme::AdditiveColor => Ok(VcImage::Rgb(additive::decrypt(
            expect_rgb(&a)?,
            expect_rgb(&b)?,
        )?)),
        Scheme::Halftone(params) => Ok(VcImage::Binary(halftone::decrypt(
            expect_gray(&a, ImageMode::Binary)?,
            expect_gray(&b, ImageMode::Binary)?,
            params.mode,
        )?)),
        Scheme::Bitplane(params) => Ok(VcImage::Grayscale(bitplane::decrypt(
            expect_gray(&a, ImageMode::Grayscale)?,
            expect_gray(&b, ImageMode::Grayscale)?,
            params.planes,
        )?)),
    }
}

fn expect_gray(image: &VcImage, expected: ImageMode) -> Result<&GrayImage> {
    match image.as_gray() {
        Some(img) if image.mode() == expected => Ok(img),
        _ => Err(VCError::ModeMismatch {
            expected,
            found: image.mode(),
        }),
    }
}

fn expect_rgb(image: &VcImage) -> Result<&RgbImage> {
    image.as_rgb().ok_or(VCError::ModeMismatch {
        expected: ImageMode::Rgb,
        found: image.mode(),
    })
}

fn expect_cmyk(image: &VcImage) -> Result<&CmykImage> {
    image.as_cmyk().ok_or(VCError::ModeMismatch {
        expected: ImageMode::Cmyk,
        found: image.mode(),
    })
}
