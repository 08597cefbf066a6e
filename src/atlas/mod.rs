mod builder;
mod font;
mod types;

pub use builder::AtlasBuilder;
pub use font::{FontAtlas, FontGlyph, build_font_atlas};
pub use types::{Atlas, TexCoords};
