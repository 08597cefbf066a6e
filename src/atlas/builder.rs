use anyhow::Result;
use image::{Rgba, RgbaImage, imageops};
use log::info;

use super::Atlas;
use crate::error::AtlasError;
use crate::item::{AtlasItem, PlacedItem};
use crate::packing::{FitPath, Rect, fit_dimensions, pack, packing_order, validate_sizes};

const OUTLINE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Packs a batch of items into one canvas.
///
/// Items are sorted with the packing-order heuristic, the canvas size is
/// searched with [`fit_dimensions`], and a final pack at the accepted size
/// gives every item its rect. The run either places every item or fails.
#[derive(Debug, Clone, Default)]
pub struct AtlasBuilder {
    pub outline: bool,
}

impl AtlasBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a white box around every placed item
    pub fn outline(mut self, outline: bool) -> Self {
        self.outline = outline;
        self
    }

    pub fn build(&self, items: Vec<AtlasItem>) -> Result<Atlas> {
        let sizes: Vec<(u32, u32)> = items.iter().map(AtlasItem::size).collect();
        if let Err(err) = validate_sizes(&sizes) {
            return Err(name_error(err, &items));
        }

        let order = packing_order(&sizes);
        let sorted_sizes: Vec<(u32, u32)> = order.iter().map(|&i| sizes[i]).collect();

        let fit = match fit_dimensions(&sorted_sizes) {
            Ok(fit) => fit,
            Err(AtlasError::ItemTooLarge {
                index,
                width,
                height,
                max_width,
                max_height,
            }) => {
                let err = AtlasError::ItemTooLarge {
                    index: order[index],
                    width,
                    height,
                    max_width,
                    max_height,
                };
                return Err(name_error(err, &items));
            }
            Err(err) => return Err(err.into()),
        };

        // Packing is deterministic, so the accepted size packs again
        let rects = pack(&sorted_sizes, fit.width, fit.height).ok_or(AtlasError::FitExhausted {
            width: fit.width,
            height: fit.height,
            count: items.len(),
        })?;

        let mut image = RgbaImage::new(fit.width, fit.height);
        let mut placements = Vec::with_capacity(items.len());

        for (&source_index, rect) in order.iter().zip(rects) {
            let item = &items[source_index];
            imageops::replace(
                &mut image,
                &item.image,
                i64::from(rect.x),
                i64::from(rect.y),
            );
            placements.push(PlacedItem {
                name: item.name.clone(),
                rect,
                source_index,
            });
        }

        if self.outline {
            for placed in &placements {
                draw_outline(&mut image, &placed.rect);
            }
        }

        let atlas = Atlas {
            width: fit.width,
            height: fit.height,
            image,
            placements,
            fit,
        };

        info!(
            "Atlas {}x{} with {} items ({:.1}% efficiency, {})",
            atlas.width,
            atlas.height,
            atlas.placements.len(),
            atlas.occupancy() * 100.0,
            match atlas.fit.path {
                FitPath::ExactFit => "grown",
                FitPath::Shrink => "shrunk",
            }
        );

        Ok(atlas)
    }
}

/// Attach the offending item's name to an index-carrying error
fn name_error(err: AtlasError, items: &[AtlasItem]) -> anyhow::Error {
    let index = match &err {
        AtlasError::MalformedInput { index, .. } | AtlasError::ItemTooLarge { index, .. } => {
            Some(*index)
        }
        _ => None,
    };

    match index {
        Some(index) => {
            let name = items[index].name.clone();
            anyhow::Error::new(err).context(format!("cannot pack item '{name}'"))
        }
        None => err.into(),
    }
}

/// One-pixel box spanning `x..=x+w` and `y..=y+h`, clipped to the canvas
fn draw_outline(image: &mut RgbaImage, rect: &Rect) {
    let (width, height) = image.dimensions();
    let x0 = rect.x;
    let y0 = rect.y;
    let x1 = rect.x.saturating_add(rect.width);
    let y1 = rect.y.saturating_add(rect.height);

    let mut plot = |x: u32, y: u32| {
        if x < width && y < height {
            image.put_pixel(x, y, OUTLINE_COLOR);
        }
    };

    for x in x0..=x1 {
        plot(x, y0);
        plot(x, y1);
    }
    for y in y0..=y1 {
        plot(x0, y);
        plot(x1, y);
    }
}
