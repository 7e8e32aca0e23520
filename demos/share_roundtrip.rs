//! Share Round-Trip Example
//!
//! Runs every scheme on a generated secret and writes the shares and the
//! reconstruction to `assets/`. Set `RUST_LOG=debug` to see codec progress.

use std::fs;
use tracing_subscriber::EnvFilter;
use visual_secret_sharing::{
    cmyk::SHARED_CHANNELS, utils::psnr, Rgb, RgbImage, Scheme, VcImage,
    VisualCryptography,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Visual Secret Sharing Example");
    println!("=============================\n");

    fs::create_dir_all("assets")?;
    let secret = create_secret_image(96, 64);
    secret.save("assets/secret.png")?;
    let secret = VcImage::Rgb(secret);
    let mut rng = rand::rng();

    for scheme in Scheme::all() {
        println!("{} ({})", scheme, scheme.key());
        let vc = VisualCryptography::new(scheme)?;
        let shares = vc.encrypt(&secret, &mut rng)?;

        for share in &shares {
            println!("  {}", share);
            save(&share.image, &format!("{}_share_{}", scheme.key(), share.index))?;
        }

        let decrypted = vc.decrypt(&shares)?;
        save(&decrypted, &format!("{}_decrypted", scheme.key()))?;

        if let (VcImage::Grayscale(original), VcImage::Grayscale(result)) =
            (secret.convert(scheme.image_mode())?, &decrypted)
        {
            println!("  PSNR: {:.2} dB", psnr(&original, result)?);
        }
    }

    println!("\nSaved images to assets/");
    Ok(())
}

/// Save an image; CMYK is written as one grayscale file per shared channel
fn save(image: &VcImage, stem: &str) -> Result<(), Box<dyn std::error::Error>> {
    match image {
        VcImage::Binary(img) | VcImage::Grayscale(img) => img.save(format!("assets/{}.png", stem))?,
        VcImage::Rgb(img) => img.save(format!("assets/{}.png", stem))?,
        VcImage::Cmyk(img) => {
            for (channel, name) in SHARED_CHANNELS.iter().zip(["c", "m", "y"]) {
                img.channel(*channel)
                    .save(format!("assets/{}_{}.png", stem, name))?;
            }
        }
    }
    Ok(())
}

/// Create a test secret: a gradient with a dark frame and a bright square
fn create_secret_image(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 160])
    });

    for x in 0..width {
        for y in 0..height {
            if x < 4 || y < 4 || x >= width - 4 || y >= height - 4 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
    }

    for x in width / 3..2 * width / 3 {
        for y in height / 3..2 * height / 3 {
            img.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }

    img
}
