use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::AtlasConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AtlasConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: AtlasConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Input files and directories named by the config, relative to it.
    ///
    /// A glob entry expands to its matches in sorted order and may match
    /// directories as well as files; the loader walks those later. A path
    /// reached twice, through overlapping globs or an explicit entry, is kept
    /// at its first position only.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut seen = HashSet::new();
        let mut inputs = Vec::new();

        for entry in &self.config.input {
            let joined = self.config_dir.join(entry);
            let matched = if has_wildcard(entry) {
                expand_glob(&joined)
                    .with_context(|| format!("failed to expand input pattern: {entry}"))?
            } else {
                vec![joined]
            };

            inputs.extend(matched.into_iter().filter(|path| seen.insert(path.clone())));
        }

        Ok(inputs)
    }

    /// Resolve an optional config path relative to the config file directory
    pub fn resolve_path(&self, path: Option<&str>) -> Option<PathBuf> {
        path.map(|p| self.config_dir.join(p))
    }
}

/// Whether a config input uses glob syntax rather than naming a path
fn has_wildcard(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

fn expand_glob(pattern: &Path) -> Result<Vec<PathBuf>> {
    let matches = glob::glob(&pattern.to_string_lossy())?;
    Ok(matches.collect::<Result<Vec<_>, _>>()?)
}
