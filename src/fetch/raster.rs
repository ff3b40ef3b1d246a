//! Rasterization of fetched images into embeddable bitmaps

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::GenericImageView;
use std::io::Write;

use super::FetchError;

/// Decoded image, ready to be written as a PDF image XObject.
///
/// Pixel data is 8-bit RGB, Flate-compressed. Images with any transparency
/// carry a separate compressed 8-bit alpha plane used as a soft mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

/// Decode PNG, JPEG, GIF, WebP or BMP bytes at their native pixel size
pub fn rasterize(bytes: &[u8]) -> Result<Bitmap, FetchError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(FetchError::Decode("image has no pixels".to_string()));
    }

    let rgba = decoded.to_rgba8();
    let pixel_count = (width as usize) * (height as usize);
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_alpha = false;
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        if a != 255 {
            has_alpha = true;
        }
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let alpha = if has_alpha {
        Some(flate_compress(&alpha)?)
    } else {
        None
    };

    Ok(Bitmap {
        width,
        height,
        rgb: flate_compress(&rgb)?,
        alpha,
    })
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>, FetchError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| FetchError::Decode(format!("compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| FetchError::Decode(format!("compression failed: {}", e)))
}
