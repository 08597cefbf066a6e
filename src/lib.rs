pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod item;
pub mod output;
pub mod packing;

pub use atlas::{Atlas, AtlasBuilder, FontAtlas};
pub use cli::{CliArgs, Command, CompressionLevel};
pub use error::AtlasError;
pub use item::{AtlasItem, PlacedItem};
