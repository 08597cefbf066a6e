use std::io::Cursor;

use anyhow::Result;
use image::{ImageFormat, RgbaImage};
use log::debug;

use crate::cli::CompressionLevel;
use crate::error::AtlasError;

/// Encode the canvas as PNG, optionally recompressed losslessly with oxipng
pub fn encode_png(image: &RgbaImage, compress: Option<CompressionLevel>) -> Result<Vec<u8>> {
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| AtlasError::ImageSave { source: e })?;
    let png_data = png_data.into_inner();

    let Some(level) = compress else {
        return Ok(png_data);
    };

    let opts = match level {
        CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
        CompressionLevel::Max => oxipng::Options::max_compression(),
    };
    let optimized =
        oxipng::optimize_from_memory(&png_data, &opts).map_err(|e| AtlasError::PngCompress {
            message: e.to_string(),
        })?;

    debug!(
        "PNG compressed from {} to {} bytes",
        png_data.len(),
        optimized.len()
    );
    Ok(optimized)
}
