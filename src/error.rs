use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode atlas image: {source}")]
    ImageSave { source: image::ImageError },

    #[error("No items to pack")]
    NoItems,

    #[error("Item #{index} has invalid size {width}x{height}")]
    MalformedInput { index: usize, width: u32, height: u32 },

    #[error(
        "Item #{index} ({width}x{height}) exceeds the largest candidate canvas ({max_width}x{max_height})"
    )]
    ItemTooLarge {
        index: usize,
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    #[error("{count} items do not fit even after growing the canvas to {width}x{height}")]
    FitExhausted { width: u32, height: u32, count: usize },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG: {message}")]
    PngCompress { message: String },

    #[error("Failed to load font '{path}': {message}")]
    FontLoad { path: PathBuf, message: String },

    #[error("Malformed asset: {reason}")]
    BadAsset { reason: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
