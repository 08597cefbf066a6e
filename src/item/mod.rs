mod glyph;
mod item;
mod loader;

pub use glyph::{
    DEFAULT_SYMBOLS, FontMetrics, FontdueRasterizer, GlyphRasterizer, GlyphRecord,
    rasterize_symbols, read_symbols_file, unique_symbols,
};
pub use item::{AtlasItem, PlacedItem};
pub use loader::load_items;
