use serde::{Deserialize, Serialize};

use crate::cli::CompressionLevel;

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

impl CompressConfig {
    pub fn to_level(&self) -> Result<CompressionLevel, String> {
        match self {
            CompressConfig::Level(n) => n.to_string().parse(),
            CompressConfig::Max(s) => s.parse(),
        }
    }
}

/// Font rasterization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// TrueType or OpenType font file
    pub path: Option<String>,
    /// Pixel size
    pub size: u32,
    /// UTF-8 file listing the symbols to render
    pub symbols: Option<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: 8,
            symbols: None,
        }
    }
}

/// Atlas configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Input file paths, directories or glob patterns
    pub input: Vec<String>,
    /// Output asset file
    pub output: Option<String>,
    /// Plain PNG copy of the canvas
    pub outpng: Option<String>,
    /// Draw a white box around every packed image
    pub outline: bool,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    pub font: FontConfig,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            input: Vec::new(),
            output: None,
            outpng: None,
            outline: false,
            compress: None,
            font: FontConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AtlasConfig = serde_json::from_str(r#"{ "input": ["gfx/*.png"] }"#).unwrap();
        assert_eq!(config.input, vec!["gfx/*.png"]);
        assert!(!config.outline);
        assert_eq!(config.font.size, 8);
        assert_eq!(config.compress, None);
    }

    #[test]
    fn test_compress_forms() {
        let config: AtlasConfig = serde_json::from_str(r#"{ "compress": 4 }"#).unwrap();
        assert_eq!(
            config.compress.unwrap().to_level(),
            Ok(CompressionLevel::Level(4))
        );

        let config: AtlasConfig = serde_json::from_str(r#"{ "compress": "max" }"#).unwrap();
        assert_eq!(config.compress.unwrap().to_level(), Ok(CompressionLevel::Max));

        let config: AtlasConfig = serde_json::from_str(r#"{ "compress": 9 }"#).unwrap();
        assert!(config.compress.unwrap().to_level().is_err());
    }

    #[test]
    fn test_font_section() {
        let config: AtlasConfig =
            serde_json::from_str(r#"{ "font": { "path": "mono.ttf", "size": 14 } }"#).unwrap();
        assert_eq!(config.font.path.as_deref(), Some("mono.ttf"));
        assert_eq!(config.font.size, 14);
        assert_eq!(config.font.symbols, None);
    }
}
