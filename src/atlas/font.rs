use std::collections::HashSet;

use anyhow::Result;
use log::warn;

use super::{Atlas, AtlasBuilder};
use crate::item::{AtlasItem, FontMetrics, GlyphRecord};
use crate::packing::Rect;

/// A glyph with its final placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontGlyph {
    pub symbol: char,
    pub bearing_x: i32,
    pub bearing_y: i32,
    pub advance: i32,
    /// Zero-sized at the origin for blank glyphs
    pub rect: Rect,
}

/// A packed bitmap font; glyphs are sorted by codepoint
#[derive(Debug)]
pub struct FontAtlas {
    pub metrics: FontMetrics,
    pub glyphs: Vec<FontGlyph>,
    pub atlas: Atlas,
}

/// Pack rendered glyphs with the shared packing pipeline.
///
/// Duplicate symbols keep their first occurrence. Blank glyphs are left out
/// of the canvas but stay in the glyph table.
pub fn build_font_atlas(
    builder: &AtlasBuilder,
    glyphs: Vec<GlyphRecord>,
    metrics: FontMetrics,
) -> Result<FontAtlas> {
    let mut seen = HashSet::new();
    let glyphs: Vec<GlyphRecord> = glyphs
        .into_iter()
        .filter(|g| {
            let fresh = seen.insert(g.symbol);
            if !fresh {
                warn!("Duplicate glyph {:?} ignored", g.symbol);
            }
            fresh
        })
        .collect();

    // Drawable glyphs become items; remember which glyph each item came from
    let mut glyph_of_item = Vec::new();
    let mut items = Vec::new();
    for (i, glyph) in glyphs.iter().enumerate() {
        if !glyph.is_blank() {
            glyph_of_item.push(i);
            items.push(AtlasItem::new(glyph.symbol.to_string(), glyph.bitmap.clone()));
        }
    }

    let atlas = builder.build(items)?;

    let mut rects = vec![Rect::default(); glyphs.len()];
    for placed in &atlas.placements {
        rects[glyph_of_item[placed.source_index]] = placed.rect;
    }

    let mut font_glyphs: Vec<FontGlyph> = glyphs
        .iter()
        .zip(rects)
        .map(|(glyph, rect)| FontGlyph {
            symbol: glyph.symbol,
            bearing_x: glyph.bearing_x,
            bearing_y: glyph.bearing_y,
            advance: glyph.advance,
            rect,
        })
        .collect();
    font_glyphs.sort_by_key(|g| g.symbol);

    Ok(FontAtlas {
        metrics,
        glyphs: font_glyphs,
        atlas,
    })
}
