use log::{debug, info};

use super::{PackTree, Rect};
use crate::error::AtlasError;

/// Which branch of the size search produced the accepted canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitPath {
    /// The initial guess was too small and the canvas was grown.
    /// The grown size is accepted as-is, no shrinking follows.
    ExactFit,
    /// The initial guess fit and was halved until one more halving failed
    Shrink,
}

/// Accepted canvas size for a packing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitResult {
    pub width: u32,
    pub height: u32,
    pub path: FitPath,
    /// Square side the search started from
    pub initial: u32,
    /// Number of full packs performed, including failed ones
    pub attempts: usize,
}

/// Reject empty input and items with a zero dimension
pub fn validate_sizes(sizes: &[(u32, u32)]) -> Result<(), AtlasError> {
    if sizes.is_empty() {
        return Err(AtlasError::NoItems);
    }

    match sizes.iter().position(|&(w, h)| w == 0 || h == 0) {
        Some(index) => Err(AtlasError::MalformedInput {
            index,
            width: sizes[index].0,
            height: sizes[index].1,
        }),
        None => Ok(()),
    }
}

/// Pack every size in order into a fresh `width` x `height` tree
pub fn pack(sizes: &[(u32, u32)], width: u32, height: u32) -> Option<Vec<Rect>> {
    if width == 0 || height == 0 {
        return None;
    }

    let mut tree = PackTree::new(width, height);
    sizes.iter().map(|&(w, h)| tree.insert(w, h)).collect()
}

/// Side of the square the search starts from:
/// the power of two at or above the floor of the square root of the total area
pub fn initial_guess(sizes: &[(u32, u32)]) -> Result<u32, AtlasError> {
    let total_area: u64 = sizes
        .iter()
        .map(|&(w, h)| u64::from(w) * u64::from(h))
        .sum();

    // isqrt of a u64 always fits in a u32
    let side = u32::try_from(total_area.isqrt()).unwrap_or(u32::MAX);
    side.checked_next_power_of_two().ok_or(AtlasError::FitExhausted {
        width: u32::MAX,
        height: u32::MAX,
        count: sizes.len(),
    })
}

/// Next candidate of the shrink phase. Even steps halve the height, odd steps the width.
pub fn shrink_step(width: u32, height: u32, step: usize) -> (u32, u32) {
    if step % 2 == 1 {
        (width / 2, height)
    } else {
        (width, height / 2)
    }
}

/// Find the canvas size for `sizes`, which must already be in packing order.
///
/// Starts from a square power-of-two guess. If that fails the width is
/// doubled, then the height; the first size that fits is accepted
/// ([`FitPath::ExactFit`]). If the guess fits, it is halved (height first,
/// then alternating) while the halved size still fits ([`FitPath::Shrink`]).
///
/// Growth is bounded at one doubling per axis. Past that the input is rejected
/// with [`AtlasError::ItemTooLarge`] when a single item cannot fit the largest
/// candidate, otherwise with [`AtlasError::FitExhausted`].
pub fn fit_dimensions(sizes: &[(u32, u32)]) -> Result<FitResult, AtlasError> {
    validate_sizes(sizes)?;

    let initial = initial_guess(sizes)?;
    let mut attempts = 0usize;
    let mut try_fit = |width: u32, height: u32| {
        attempts += 1;
        let ok = pack(sizes, width, height).is_some();
        debug!(
            "Candidate {}x{}: {}",
            width,
            height,
            if ok { "fits" } else { "no room" }
        );
        ok
    };

    let (mut width, mut height) = (initial, initial);

    if !try_fit(width, height) {
        width = grow(width, sizes.len())?;
        if !try_fit(width, height) {
            height = grow(height, sizes.len())?;
            if !try_fit(width, height) {
                return Err(growth_failure(sizes, width, height));
            }
        }

        info!(
            "Canvas grown from {}x{} to {}x{} (exact fit)",
            initial, initial, width, height
        );
        return Ok(FitResult {
            width,
            height,
            path: FitPath::ExactFit,
            initial,
            attempts,
        });
    }

    let mut step = 0;
    loop {
        let (next_w, next_h) = shrink_step(width, height, step);
        if next_w == 0 || next_h == 0 || !try_fit(next_w, next_h) {
            break;
        }
        width = next_w;
        height = next_h;
        step += 1;
    }

    info!(
        "Canvas shrunk from {}x{} to {}x{}",
        initial, initial, width, height
    );
    Ok(FitResult {
        width,
        height,
        path: FitPath::Shrink,
        initial,
        attempts,
    })
}

fn grow(side: u32, count: usize) -> Result<u32, AtlasError> {
    side.checked_mul(2).ok_or(AtlasError::FitExhausted {
        width: side,
        height: side,
        count,
    })
}

fn growth_failure(sizes: &[(u32, u32)], width: u32, height: u32) -> AtlasError {
    match sizes.iter().position(|&(w, h)| w > width || h > height) {
        Some(index) => AtlasError::ItemTooLarge {
            index,
            width: sizes[index].0,
            height: sizes[index].1,
            max_width: width,
            max_height: height,
        },
        None => AtlasError::FitExhausted {
            width,
            height,
            count: sizes.len(),
        },
    }
}
