mod fit;
mod order;
mod rect;
mod timsort;
mod tree;

pub use fit::{FitPath, FitResult, fit_dimensions, initial_guess, pack, shrink_step, validate_sizes};
pub use order::{compare_sizes, packing_order};
pub use rect::Rect;
pub use tree::PackTree;
