use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageReader;
use log::{debug, info};
use rayon::prelude::*;

use super::AtlasItem;
use crate::error::AtlasError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tga", "webp"];

/// Load items from input paths (files or directories).
///
/// Directories are walked recursively in path order. Each item is named by
/// its path as given or discovered; the encoder strips the shared directory
/// prefix later. Output order matches input order.
pub fn load_items(inputs: &[impl AsRef<Path>]) -> Result<Vec<AtlasItem>> {
    let image_paths = collect_image_paths(inputs)?;

    if image_paths.is_empty() {
        return Err(AtlasError::NoItems.into());
    }

    info!("Loading {} images...", image_paths.len());

    image_paths
        .par_iter()
        .map(|path| load_single_item(path))
        .collect()
}

fn collect_image_paths(inputs: &[impl AsRef<Path>]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(AtlasError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) {
                paths.push(path.to_path_buf());
            } else {
                debug!("Skipping unsupported file {}", path.display());
            }
        } else if path.is_dir() {
            collect_from_directory(path, &mut paths)?;
        }
    }

    Ok(paths)
}

fn collect_from_directory(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_file() && is_supported_image(&path) {
            paths.push(path);
        } else if path.is_dir() {
            collect_from_directory(&path, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn load_single_item(path: &Path) -> Result<AtlasItem> {
    let image = ImageReader::open(path)
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    Ok(AtlasItem {
        name: path.to_string_lossy().into_owned(),
        path: Some(path.to_path_buf()),
        image,
    })
}
