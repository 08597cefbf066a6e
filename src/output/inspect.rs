use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::ImageReader;
use log::{debug, info};

use super::binary::bad;
use super::font_atlas::{DecodedFontAtlas, FONT_ATLAS_MAGIC, decode_font_atlas};
use super::image_atlas::{DecodedImageAtlas, IMAGE_ATLAS_MAGIC, decode_image_atlas};
use crate::error::AtlasError;

/// A decoded asset of either kind
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Image(DecodedImageAtlas),
    Font(DecodedFontAtlas),
}

impl Asset {
    pub fn png(&self) -> &[u8] {
        match self {
            Asset::Image(atlas) => &atlas.png,
            Asset::Font(font) => &font.png,
        }
    }
}

/// Decode an asset, picking the layout from its magic
pub fn decode_asset(bytes: &[u8]) -> Result<Asset, AtlasError> {
    match bytes.get(..4) {
        Some(magic) if magic == IMAGE_ATLAS_MAGIC => decode_image_atlas(bytes).map(Asset::Image),
        Some(magic) if magic == FONT_ATLAS_MAGIC => decode_font_atlas(bytes).map(Asset::Font),
        _ => Err(bad("unknown magic, NGAT or NGFN expected")),
    }
}

/// Width and height of the embedded canvas
pub fn canvas_dimensions(png: &[u8]) -> Result<(u32, u32)> {
    let dims = ImageReader::new(Cursor::new(png))
        .with_guessed_format()
        .context("failed to read embedded canvas")?
        .into_dimensions()
        .map_err(|e| AtlasError::BadAsset {
            reason: format!("embedded canvas is not a valid image: {e}"),
        })?;
    Ok(dims)
}

/// Read and decode an asset file, logging every table entry
pub fn inspect_asset(path: &Path) -> Result<Asset> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let asset =
        decode_asset(&bytes).with_context(|| format!("failed to decode {}", path.display()))?;

    match &asset {
        Asset::Image(atlas) => {
            info!("Atlas");
            info!("N Images: {}", atlas.entries.len());
            for e in &atlas.entries {
                info!(
                    "Image entry: ({}) {} {} {} {} ({:.3} {:.3} {:.3} {:.3})",
                    e.name,
                    e.rect.x,
                    e.rect.y,
                    e.rect.width,
                    e.rect.height,
                    e.tex.tx,
                    e.tex.ty,
                    e.tex.tx2,
                    e.tex.ty2
                );
            }
        }
        Asset::Font(font) => {
            info!("Font height: {}", font.line_height);
            info!("N Glyphs: {}", font.glyphs.len());
            for (codepoint, index) in &font.encoding {
                debug!("Encoding entry: {} = {}", codepoint, index);
            }
            for g in &font.glyphs {
                info!(
                    "Glyphs entry: {} {} {} {} ({:.3} {:.3} {:.3} {:.3}) {}",
                    g.offset_x,
                    g.offset_y,
                    g.width,
                    g.height,
                    g.tex.tx,
                    g.tex.ty,
                    g.tex.tx2,
                    g.tex.ty2,
                    g.x_advance
                );
            }
        }
    }

    let (width, height) = canvas_dimensions(asset.png())?;
    info!("Canvas: {}x{} ({} bytes PNG)", width, height, asset.png().len());

    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasBuilder;
    use crate::item::AtlasItem;
    use crate::output::{encode_image_atlas, encode_png};
    use image::RgbaImage;

    #[test]
    fn test_inspect_image_atlas_file() {
        let items = vec![
            AtlasItem::new("ui/ok.png", RgbaImage::new(12, 6)),
            AtlasItem::new("ui/cancel.png", RgbaImage::new(20, 6)),
        ];
        let atlas = AtlasBuilder::new().build(items).unwrap();
        let png = encode_png(&atlas.image, None).unwrap();
        let bytes = encode_image_atlas(&atlas, &png).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui.atlas");
        std::fs::write(&path, bytes).unwrap();

        let asset = inspect_asset(&path).unwrap();
        let Asset::Image(decoded) = &asset else {
            panic!("expected an image atlas");
        };
        assert_eq!(decoded.entries.len(), 2);
        assert_eq!(decoded.entries[0].name, "ok.png");
        assert_eq!(
            canvas_dimensions(asset.png()).unwrap(),
            (atlas.width, atlas.height)
        );
    }

    #[test]
    fn test_unknown_magic() {
        assert!(matches!(
            decode_asset(b"RIFF0000"),
            Err(AtlasError::BadAsset { .. })
        ));
        assert!(decode_asset(b"").is_err());
    }

    #[test]
    fn test_garbage_canvas() {
        assert!(canvas_dimensions(b"definitely not a png").is_err());
    }
}
