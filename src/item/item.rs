use image::RgbaImage;
use std::path::PathBuf;

use crate::packing::Rect;

/// A raster waiting to be packed
#[derive(Debug, Clone)]
pub struct AtlasItem {
    /// Identifier written to the asset; need not be unique
    pub name: String,
    /// File the raster was decoded from, if any
    pub path: Option<PathBuf>,
    /// Pixel payload, copied verbatim onto the canvas
    pub image: RgbaImage,
}

impl AtlasItem {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            path: None,
            image,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// An item after packing at the accepted canvas size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedItem {
    pub name: String,
    /// Placement in canvas pixels; width and height equal the source raster's
    pub rect: Rect,
    /// Position of the item in the caller's input sequence
    pub source_index: usize,
}
