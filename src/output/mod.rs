mod binary;
mod font_atlas;
mod image_atlas;
mod inspect;
mod png;
mod write;

pub use font_atlas::{
    DecodedFontAtlas, FONT_ATLAS_MAGIC, GlyphEntry, decode_font_atlas, encode_font_atlas,
};
pub use image_atlas::{
    DecodedImageAtlas, IMAGE_ATLAS_MAGIC, ImageEntry, common_prefix_len, decode_image_atlas,
    encode_image_atlas,
};
pub use inspect::{Asset, canvas_dimensions, decode_asset, inspect_asset};
pub use png::encode_png;
pub use write::{write_outputs, write_staged};
