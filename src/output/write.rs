use std::io::Write;
use std::path::Path;

use log::info;

use crate::error::AtlasError;

/// Write `bytes` to a temp file next to `path`, sync it, then rename it into
/// place. A failed write leaves any existing file at `path` untouched.
pub fn write_staged(path: &Path, bytes: &[u8]) -> Result<(), AtlasError> {
    let io_err = |source| AtlasError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    staged.write_all(bytes).map_err(io_err)?;
    staged.as_file().sync_all().map_err(io_err)?;
    staged.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Write the asset, then the optional plain PNG copy of its canvas.
///
/// The copy is only written once the asset is in place, so a failed run never
/// leaves a fresh PNG next to a stale or missing asset.
pub fn write_outputs(
    asset: &Path,
    bytes: &[u8],
    png_copy: Option<(&Path, &[u8])>,
) -> Result<(), AtlasError> {
    write_staged(asset, bytes)?;
    info!("Saved {}", asset.display());

    if let Some((path, png)) = png_copy {
        write_staged(path, png)?;
        info!("Saved {}", path.display());
    }
    Ok(())
}
