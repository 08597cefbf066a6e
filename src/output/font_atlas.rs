use anyhow::Result;

use super::binary::{ByteReader, ByteWriter, bad};
use crate::atlas::{FontAtlas, TexCoords};
use crate::error::AtlasError;

pub const FONT_ATLAS_MAGIC: &[u8; 4] = b"NGFN";

/// One decoded glyph record
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphEntry {
    pub offset_x: i32,
    /// Distance from the top of the line to the bitmap's top edge
    pub offset_y: i32,
    pub width: i32,
    pub height: i32,
    pub x_advance: i32,
    pub tex: TexCoords,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFontAtlas {
    pub line_height: i32,
    /// `(codepoint, glyph index)` pairs in ascending codepoint order
    pub encoding: Vec<(i32, i32)>,
    pub glyphs: Vec<GlyphEntry>,
    pub png: Vec<u8>,
}

impl DecodedFontAtlas {
    /// Binary search the encoding table, the way the runtime looks glyphs up
    pub fn find_glyph(&self, symbol: char) -> Option<&GlyphEntry> {
        let codepoint = i32::try_from(u32::from(symbol)).ok()?;
        let at = self
            .encoding
            .binary_search_by_key(&codepoint, |&(cp, _)| cp)
            .ok()?;
        let index = usize::try_from(self.encoding[at].1).ok()?;
        self.glyphs.get(index)
    }
}

pub fn encode_font_atlas(font: &FontAtlas, png: &[u8]) -> Result<Vec<u8>> {
    let count = font.glyphs.len();
    let mut w = ByteWriter::with_capacity(12 + count * 44 + png.len());
    w.bytes(FONT_ATLAS_MAGIC);
    w.i32(font.metrics.line_height);
    w.len_i32(count, "glyph count")?;

    for (index, glyph) in font.glyphs.iter().enumerate() {
        w.len_i32(u32::from(glyph.symbol), "codepoint")?;
        w.len_i32(index, "glyph index")?;
    }

    for glyph in &font.glyphs {
        let r = glyph.rect;
        w.i32(glyph.bearing_x);
        w.i32(font.metrics.ascent + glyph.bearing_y);
        w.len_i32(r.width, "glyph width")?;
        w.len_i32(r.height, "glyph height")?;
        w.i32(glyph.advance);

        let tc = font.atlas.tex_coords(&r);
        w.f32(tc.tx);
        w.f32(tc.ty);
        w.f32(tc.tx2);
        w.f32(tc.ty2);
    }

    w.bytes(png);
    Ok(w.finish())
}

pub fn decode_font_atlas(bytes: &[u8]) -> Result<DecodedFontAtlas, AtlasError> {
    let mut r = ByteReader::new(bytes);
    if r.take(4).map_err(|_e| bad("Bad magic, NGFN expected"))? != FONT_ATLAS_MAGIC {
        return Err(bad("Bad magic, NGFN expected"));
    }

    let line_height = r.i32()?;
    let count = r.count("glyph count")?;

    let mut encoding = Vec::new();
    for _ in 0..count {
        let codepoint = r.i32()?;
        let index = r.i32()?;
        if !usize::try_from(index).is_ok_and(|i| i < count) {
            return Err(bad(&format!("glyph index {index} out of range")));
        }
        encoding.push((codepoint, index));
    }

    let mut glyphs = Vec::new();
    for _ in 0..count {
        let offset_x = r.i32()?;
        let offset_y = r.i32()?;
        let width = r.i32()?;
        let height = r.i32()?;
        let x_advance = r.i32()?;
        let tex = TexCoords {
            tx: r.f32()?,
            ty: r.f32()?,
            tx2: r.f32()?,
            ty2: r.f32()?,
        };
        glyphs.push(GlyphEntry {
            offset_x,
            offset_y,
            width,
            height,
            x_advance,
            tex,
        });
    }

    Ok(DecodedFontAtlas {
        line_height,
        encoding,
        glyphs,
        png: r.rest().to_vec(),
    })
}
