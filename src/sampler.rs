// ------------------------------------------------------------
// Downscaling and pixel sampling ahead of clustering
// ------------------------------------------------------------

use image::{RgbImage, imageops::FilterType};
use rand::Rng;

use crate::error::{PaletteError, Result};

/// One RGB pixel.
pub type Pixel = [u8; 3];

/// Shrink `img` so that its longest side equals `max_dimension`, keeping the
/// aspect ratio. Images that already fit are returned unchanged.
pub fn resize(img: &RgbImage, max_dimension: u32) -> Result<RgbImage> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(PaletteError::InvalidInput(format!("image has no pixels ({w}x{h})")));
    }
    if max_dimension == 0 {
        return Err(PaletteError::InvalidInput("max dimension must be positive".into()));
    }

    // Fast path – no scaling required.
    let max_side = w.max(h);
    if max_side <= max_dimension {
        return Ok(img.clone());
    }

    let ratio = max_dimension as f32 / max_side as f32;
    let new_w = scaled_side(w, max_side, max_dimension, ratio);
    let new_h = scaled_side(h, max_side, max_dimension, ratio);

    Ok(image::imageops::resize(img, new_w, new_h, FilterType::Triangle))
}

// The longest side lands exactly on the target; the other is rounded.
fn scaled_side(side: u32, max_side: u32, target: u32, ratio: f32) -> u32 {
    if side == max_side {
        target
    } else {
        ((side as f32) * ratio).round().max(1.0) as u32
    }
}

/// Flatten an image into row-major pixels.
pub fn pixels_of(img: &RgbImage) -> Vec<Pixel> {
    img.pixels().map(|p| p.0).collect()
}

/// Draw `sample_size` pixels uniformly without replacement. When the input
/// already fits it is returned as-is.
pub fn sample<R: Rng + ?Sized>(pixels: &[Pixel], sample_size: usize, rng: &mut R) -> Result<Vec<Pixel>> {
    if pixels.is_empty() {
        return Err(PaletteError::InvalidInput("no pixels to sample".into()));
    }
    if sample_size == 0 {
        return Err(PaletteError::InvalidInput("sample size must be positive".into()));
    }
    if pixels.len() <= sample_size {
        return Ok(pixels.to_vec());
    }

    let picked = rand::seq::index::sample(rng, pixels.len(), sample_size);
    Ok(picked.iter().map(|i| pixels[i]).collect())
}
