use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ngatlas")]
#[command(version, about = "Image and bitmap-font atlas generator", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Pack image files into an NGAT atlas
    Image(ImageArgs),
    /// Rasterize a font and pack its glyphs into an NGFN atlas
    Font(FontArgs),
    /// Print the contents of an NGAT or NGFN file
    Inspect(InspectArgs),
}

/// Options shared by the packing subcommands
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output asset file [default: outatlas.atlas or outfont.font]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Also save the packed canvas as a plain PNG
    #[arg(long, value_name = "FILE")]
    pub outpng: Option<PathBuf>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Input image files or directories
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Draw a white box around every packed image
    #[arg(long)]
    pub outline: bool,

    #[command(flatten)]
    pub common: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct FontArgs {
    /// TrueType or OpenType font file
    #[arg(long, value_name = "FILE", required_unless_present = "config")]
    pub font: Option<PathBuf>,

    /// Font size in pixels [default: 8]
    #[arg(long, value_name = "PX")]
    pub size: Option<u32>,

    /// UTF-8 file listing the symbols to render [default: printable ASCII]
    #[arg(long, value_name = "FILE")]
    pub symbols: Option<PathBuf>,

    #[command(flatten)]
    pub common: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Asset file to read
    pub file: PathBuf,

    /// Also print the codepoint table of font atlases
    #[arg(short, long)]
    pub verbose: bool,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_parse() {
        assert_eq!("max".parse(), Ok(CompressionLevel::Max));
        assert_eq!("MAX".parse(), Ok(CompressionLevel::Max));
        assert_eq!("0".parse(), Ok(CompressionLevel::Level(0)));
        assert_eq!("6".parse(), Ok(CompressionLevel::Level(6)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_image_command() {
        let cli = CliArgs::try_parse_from([
            "ngatlas", "image", "a.png", "gfx", "-o", "ui.atlas", "--outline", "--compress",
        ])
        .unwrap();

        let Command::Image(args) = cli.command else {
            panic!("expected image command");
        };
        assert_eq!(args.input, vec![PathBuf::from("a.png"), PathBuf::from("gfx")]);
        assert!(args.outline);
        assert_eq!(args.common.output, Some(PathBuf::from("ui.atlas")));
        assert_eq!(args.common.compress, Some(CompressionLevel::Level(2)));
    }

    #[test]
    fn test_image_requires_input_or_config() {
        assert!(CliArgs::try_parse_from(["ngatlas", "image"]).is_err());
        assert!(CliArgs::try_parse_from(["ngatlas", "image", "-c", "atlas.json"]).is_ok());
    }

    #[test]
    fn test_font_command() {
        let cli = CliArgs::try_parse_from([
            "ngatlas", "font", "--font", "mono.ttf", "--size", "12", "--compress", "max",
        ])
        .unwrap();

        let Command::Font(args) = cli.command else {
            panic!("expected font command");
        };
        assert_eq!(args.font, Some(PathBuf::from("mono.ttf")));
        assert_eq!(args.size, Some(12));
        assert_eq!(args.symbols, None);
        assert_eq!(args.common.compress, Some(CompressionLevel::Max));
    }

    #[test]
    fn test_inspect_command() {
        let cli = CliArgs::try_parse_from(["ngatlas", "inspect", "ui.atlas", "-v"]).unwrap();
        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect command");
        };
        assert_eq!(args.file, PathBuf::from("ui.atlas"));
        assert!(args.verbose);
    }
}
