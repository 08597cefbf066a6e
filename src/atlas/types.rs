use image::RgbaImage;

use crate::item::PlacedItem;
use crate::packing::{FitResult, Rect};

/// A packed canvas and where every item landed
#[derive(Debug)]
pub struct Atlas {
    pub width: u32,
    pub height: u32,
    /// Composed canvas
    pub image: RgbaImage,
    /// Placements in packing order (not input order)
    pub placements: Vec<PlacedItem>,
    /// How the canvas size was found
    pub fit: FitResult,
}

impl Atlas {
    /// Fraction of the canvas covered by items
    pub fn occupancy(&self) -> f64 {
        let total = u64::from(self.width) * u64::from(self.height);
        if total == 0 {
            return 0.0;
        }
        let used: u64 = self.placements.iter().map(|p| p.rect.area()).sum();
        used as f64 / total as f64
    }

    pub fn tex_coords(&self, rect: &Rect) -> TexCoords {
        TexCoords::new(rect, self.width, self.height)
    }
}

/// Placement as fractions of the canvas, without half-texel bias
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TexCoords {
    pub tx: f32,
    pub ty: f32,
    pub tx2: f32,
    pub ty2: f32,
}

impl TexCoords {
    pub fn new(rect: &Rect, canvas_width: u32, canvas_height: u32) -> Self {
        let xs = 1.0 / f64::from(canvas_width);
        let ys = 1.0 / f64::from(canvas_height);
        Self {
            tx: narrow(f64::from(rect.x) * xs),
            ty: narrow(f64::from(rect.y) * ys),
            tx2: narrow(rect.right() as f64 * xs),
            ty2: narrow(rect.bottom() as f64 * ys),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the asset stores texture coordinates as f32"
)]
fn narrow(value: f64) -> f32 {
    value as f32
}
