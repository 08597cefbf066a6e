use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;

use ngatlas::atlas::{AtlasBuilder, build_font_atlas};
use ngatlas::cli::{CliArgs, Command, CompressionLevel, FontArgs, ImageArgs, OutputArgs};
use ngatlas::config::LoadedConfig;
use ngatlas::item::{
    DEFAULT_SYMBOLS, FontdueRasterizer, GlyphRasterizer, load_items, rasterize_symbols,
    read_symbols_file, unique_symbols,
};
use ngatlas::output::{
    encode_font_atlas, encode_image_atlas, encode_png, inspect_asset, write_outputs,
};

const DEFAULT_IMAGE_OUTPUT: &str = "outatlas.atlas";
const DEFAULT_FONT_OUTPUT: &str = "outfont.font";
const DEFAULT_FONT_SIZE: u32 = 8;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    match cli.command {
        Command::Image(args) => run_image(&args),
        Command::Font(args) => run_font(&args),
        Command::Inspect(args) => {
            init_logging(args.verbose);
            inspect_asset(&args.file)?;
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run_image(args: &ImageArgs) -> Result<()> {
    let loaded = load_config(&args.common)?;
    let merged = merge_output(&args.common, loaded.as_ref(), DEFAULT_IMAGE_OUTPUT)?;

    // Inputs: CLI > config
    let input = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded {
        lc.resolve_inputs()
            .context("failed to resolve input files from config")?
    } else {
        Vec::new()
    };
    let outline = args.outline || loaded.as_ref().is_some_and(|lc| lc.config.outline);

    init_logging(merged.verbose);
    info!("ngatlas v{}", env!("CARGO_PKG_VERSION"));

    let items = load_items(input.as_slice())?;
    info!("Loaded {} images", items.len());

    let atlas = AtlasBuilder::new().outline(outline).build(items)?;
    let png = encode_png(&atlas.image, merged.compress)?;

    let bytes = encode_image_atlas(&atlas, &png)?;
    write_outputs(&merged.output, &bytes, merged.png_copy(&png))?;

    info!("Done!");
    Ok(())
}

fn run_font(args: &FontArgs) -> Result<()> {
    let loaded = load_config(&args.common)?;
    let merged = merge_output(&args.common, loaded.as_ref(), DEFAULT_FONT_OUTPUT)?;

    let font_path = args
        .font
        .clone()
        .or_else(|| {
            loaded
                .as_ref()
                .and_then(|lc| lc.resolve_path(lc.config.font.path.as_deref()))
        })
        .ok_or_else(|| anyhow!("no font file given (use --font or the config's font.path)"))?;

    let size = args.size.unwrap_or_else(|| {
        loaded
            .as_ref()
            .map(|lc| lc.config.font.size)
            .unwrap_or(DEFAULT_FONT_SIZE)
    });
    if size == 0 {
        return Err(anyhow!("font size must be positive"));
    }

    let symbols_path = args.symbols.clone().or_else(|| {
        loaded
            .as_ref()
            .and_then(|lc| lc.resolve_path(lc.config.font.symbols.as_deref()))
    });

    init_logging(merged.verbose);
    info!("ngatlas v{}", env!("CARGO_PKG_VERSION"));

    let symbols = match symbols_path {
        Some(path) => unique_symbols(&read_symbols_file(&path)?),
        None => unique_symbols(DEFAULT_SYMBOLS),
    };

    let px = u16::try_from(size).map_err(|_e| anyhow!("font size {size} is too large"))?;
    let rasterizer = FontdueRasterizer::load(&font_path, f32::from(px))?;
    let metrics = rasterizer.line_metrics();
    let glyphs = rasterize_symbols(&rasterizer, &symbols)?;

    let font = build_font_atlas(&AtlasBuilder::new(), glyphs, metrics)?;
    let png = encode_png(&font.atlas.image, merged.compress)?;

    let bytes = encode_font_atlas(&font, &png)?;
    write_outputs(&merged.output, &bytes, merged.png_copy(&png))?;
    info!(
        "{} glyphs, line height {}",
        font.glyphs.len(),
        font.metrics.line_height
    );

    info!("Done!");
    Ok(())
}

/// Output settings merged from CLI args and an optional config file.
struct MergedOutput {
    output: PathBuf,
    outpng: Option<PathBuf>,
    compress: Option<CompressionLevel>,
    verbose: bool,
}

impl MergedOutput {
    /// Destination and bytes of the plain PNG copy, when one was requested
    fn png_copy<'a>(&'a self, png: &'a [u8]) -> Option<(&'a Path, &'a [u8])> {
        self.outpng.as_deref().map(|path| (path, png))
    }
}

fn load_config(args: &OutputArgs) -> Result<Option<LoadedConfig>> {
    args.config
        .as_deref()
        .map(|path: &Path| {
            LoadedConfig::load(path)
                .with_context(|| format!("failed to load config: {}", path.display()))
        })
        .transpose()
}

/// CLI arguments always take precedence over config values.
fn merge_output(
    args: &OutputArgs,
    loaded: Option<&LoadedConfig>,
    default_output: &str,
) -> Result<MergedOutput> {
    // Output file: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded
            .and_then(|lc| lc.resolve_path(lc.config.output.as_deref()))
            .unwrap_or_else(|| PathBuf::from(default_output))
    });

    let outpng = args
        .outpng
        .clone()
        .or_else(|| loaded.and_then(|lc| lc.resolve_path(lc.config.outpng.as_deref())));

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(c) = loaded.and_then(|lc| lc.config.compress.as_ref()) {
        Some(
            c.to_level()
                .map_err(|e| anyhow!("{e} in config file"))?,
        )
    } else {
        None
    };

    Ok(MergedOutput {
        output,
        outpng,
        compress,
        // Verbose is CLI-only
        verbose: args.verbose,
    })
}
