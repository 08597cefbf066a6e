use std::path::Path;

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use image::{Rgba, RgbaImage};
use log::{debug, info};
use rayon::prelude::*;

use crate::error::AtlasError;

/// Symbol set used when no symbols file is given
pub const DEFAULT_SYMBOLS: &str = " `1234567890-=\\~!@#$%^&*()_+|qwertyuiop[]QWERTYUIOP{}asdfghjkl;'ASDFGHJKL:\"zxcvbnm,./ZXCVBNM<>?";

/// Vertical metrics of a font at the rasterised size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    /// Distance from the top of a line to the baseline
    pub ascent: i32,
    /// Distance between consecutive baselines
    pub line_height: i32,
}

/// One rendered symbol
#[derive(Debug, Clone)]
pub struct GlyphRecord {
    pub symbol: char,
    /// Offset from the pen position to the bitmap's left edge
    pub bearing_x: i32,
    /// Offset from the baseline to the bitmap's top edge, negative above the baseline
    pub bearing_y: i32,
    /// Horizontal pen advance
    pub advance: i32,
    /// White glyph with coverage in the alpha channel; may be 0x0
    pub bitmap: RgbaImage,
}

impl GlyphRecord {
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Glyphs without pixels (e.g. space) are kept for their advance but never packed
    pub fn is_blank(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Font backend that turns symbols into bitmaps
pub trait GlyphRasterizer: Sync {
    fn line_metrics(&self) -> FontMetrics;
    fn rasterize(&self, symbol: char) -> Result<GlyphRecord>;
}

/// [`GlyphRasterizer`] backed by `fontdue`
pub struct FontdueRasterizer {
    font: Font,
    px: f32,
}

impl FontdueRasterizer {
    pub fn load(path: &Path, px: f32) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| AtlasError::FontLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let font = parse_font(&data).map_err(|message| AtlasError::FontLoad {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(Self { font, px })
    }
}

fn parse_font(data: &[u8]) -> std::result::Result<Font, String> {
    Font::from_bytes(data, FontSettings::default()).map_err(str::to_string)
}

impl GlyphRasterizer for FontdueRasterizer {
    fn line_metrics(&self) -> FontMetrics {
        match self.font.horizontal_line_metrics(self.px) {
            Some(lm) => FontMetrics {
                ascent: round_px(lm.ascent),
                line_height: round_px(lm.new_line_size),
            },
            None => FontMetrics {
                ascent: round_px(self.px),
                line_height: round_px(self.px),
            },
        }
    }

    fn rasterize(&self, symbol: char) -> Result<GlyphRecord> {
        let (metrics, coverage) = self.font.rasterize(symbol, self.px);
        let width = u32::try_from(metrics.width)
            .with_context(|| format!("glyph {symbol:?} is too wide"))?;
        let height = u32::try_from(metrics.height)
            .with_context(|| format!("glyph {symbol:?} is too tall"))?;

        let bitmap = RgbaImage::from_fn(width, height, |x, y| {
            let offset = y as usize * metrics.width + x as usize;
            Rgba([255, 255, 255, coverage[offset]])
        });

        let top = metrics.ymin + i32::try_from(metrics.height).unwrap_or(i32::MAX);
        Ok(GlyphRecord {
            symbol,
            bearing_x: metrics.xmin,
            bearing_y: -top,
            advance: round_px(metrics.advance_width),
            bitmap,
        })
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "font metrics are small pixel values"
)]
fn round_px(value: f32) -> i32 {
    value.round() as i32
}

/// Rasterise every symbol, preserving order
pub fn rasterize_symbols(
    rasterizer: &dyn GlyphRasterizer,
    symbols: &[char],
) -> Result<Vec<GlyphRecord>> {
    info!("Rasterizing {} glyphs...", symbols.len());
    let glyphs = symbols
        .par_iter()
        .map(|&symbol| rasterizer.rasterize(symbol))
        .collect::<Result<Vec<_>>>()?;

    let blank = glyphs.iter().filter(|g| g.is_blank()).count();
    if blank > 0 {
        debug!("{} glyphs have no pixels and will not be packed", blank);
    }
    Ok(glyphs)
}

/// Read a UTF-8 symbols file; line breaks are not symbols
pub fn read_symbols_file(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read symbols file: {}", path.display()))?;
    Ok(text.replace(['\n', '\r'], ""))
}

/// Symbols in first-seen order without duplicates or line breaks
pub fn unique_symbols(text: &str) -> Vec<char> {
    let mut seen = std::collections::HashSet::new();
    text.chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .filter(|c| seen.insert(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_symbols() {
        assert_eq!(unique_symbols("abca\r\nb"), vec!['a', 'b', 'c']);
        assert_eq!(unique_symbols(""), Vec::<char>::new());
    }

    #[test]
    fn test_default_symbols_are_unique_ascii() {
        let symbols = unique_symbols(DEFAULT_SYMBOLS);
        assert_eq!(symbols.len(), DEFAULT_SYMBOLS.chars().count());
        assert!(symbols.contains(&' '));
        assert!(symbols.contains(&'\\'));
        assert!(symbols.contains(&'"'));
        assert!(symbols.iter().all(|c| c.is_ascii()));
    }

    #[test]
    fn test_read_symbols_file_strips_line_breaks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symbols.txt");
        std::fs::write(&path, "abc\r\nдж\n").unwrap();

        assert_eq!(read_symbols_file(&path).unwrap(), "abcдж");
    }

    #[test]
    fn test_invalid_font_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let err = FontdueRasterizer::load(&path, 12.0).err().unwrap();
        match err.downcast_ref::<AtlasError>() {
            Some(AtlasError::FontLoad { path: reported, .. }) => assert_eq!(reported, &path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_glyph() {
        let glyph = GlyphRecord {
            symbol: ' ',
            bearing_x: 0,
            bearing_y: 0,
            advance: 4,
            bitmap: RgbaImage::new(0, 0),
        };
        assert!(glyph.is_blank());
    }
}
