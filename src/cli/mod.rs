//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod detect;
mod extract;
mod inspect;
mod mask;
mod preview;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, TsheetConfig};
use crate::level::Ruleset;
use crate::telemetry::{self, ErrorEntry};
use crate::tileset::{ActiveTileset, TilesetError};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Check if a path has an image extension tilesets are shipped in.
pub fn is_sheet_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
        Some("bmp") | Some("png")
    )
}

/// Find all sheet images in a directory (recursively), sorted.
pub fn find_sheet_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let pattern = format!("{}/**/*", dir.display());

    // Extensions are matched case-insensitively (TILES.BMP)
    if let Ok(paths) = glob(&pattern) {
        files.extend(paths.filter_map(Result::ok).filter(|p| p.is_file() && is_sheet_file(p)));
    }

    files.sort();
    files
}

/// tsheet - inspect and slice Tile World tilesets
#[derive(Parser)]
#[command(name = "tsheet")]
#[command(about = "tsheet - Inspect, slice and preview Tile World style tilesets (MS and Lynx)")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use this tsheet.toml instead of searching for one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Append tileset load failures to the configured error log
    #[arg(long, global = true)]
    pub collect_errors: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report which convention each image follows
    Detect {
        /// Images or directories (searched recursively for .bmp/.png)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every sprite in a tileset
    Inspect {
        /// Tileset image. Defaults to the configured sheet for --ruleset
        image: Option<PathBuf>,

        /// Parse with this ruleset's convention instead of detecting it
        #[arg(long, value_enum)]
        ruleset: Option<Ruleset>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Crop one sprite frame to a PNG
    Extract {
        /// Tileset image. Defaults to the configured sheet for --ruleset
        image: Option<PathBuf>,

        /// Parse with this ruleset's convention instead of detecting it
        #[arg(long, value_enum)]
        ruleset: Option<Ruleset>,

        /// Tile name, e.g. `ice_wall_northwest` or `bug`
        #[arg(long)]
        tile: String,

        /// Facing for actors (n, w, s, e)
        #[arg(long = "dir", default_value = "n")]
        direction: String,

        /// Actor animation counter
        #[arg(long, conflicts_with = "tick")]
        frame: Option<i8>,

        /// World tick for animated terrain
        #[arg(long)]
        tick: Option<u32>,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Scale output by this factor (overrides viewport.scale)
        #[arg(long)]
        scale: Option<f32>,
    },

    /// Write the chroma-keyed sheet as a PNG
    Mask {
        /// Tileset image. Defaults to the configured sheet for --ruleset
        image: Option<PathBuf>,

        /// Parse with this ruleset's convention instead of detecting it
        #[arg(long, value_enum)]
        ruleset: Option<Ruleset>,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render one viewport frame over a floor showing every terrain tile
    Preview {
        /// Tileset image. Defaults to the configured sheet for --ruleset
        image: Option<PathBuf>,

        /// Parse with this ruleset's convention instead of detecting it
        #[arg(long, value_enum)]
        ruleset: Option<Ruleset>,

        /// World tick
        #[arg(long, default_value = "0")]
        tick: u32,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Scale output by this factor (overrides viewport.scale)
        #[arg(long)]
        scale: Option<f32>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Detect { .. } => "detect",
            Commands::Inspect { .. } => "inspect",
            Commands::Extract { .. } => "extract",
            Commands::Mask { .. } => "mask",
            Commands::Preview { .. } => "preview",
        }
    }

    fn scale(&self) -> Option<f32> {
        match self {
            Commands::Extract { scale, .. } | Commands::Preview { scale, .. } => *scale,
            _ => None,
        }
    }
}

/// Load the tileset a command works on.
///
/// An explicit image is auto-detected unless a ruleset is given; without an
/// image the configured sheet for the ruleset (Lynx by default) is used.
/// Failures are reported to telemetry before being returned.
pub(crate) fn open_tileset(
    command: &str,
    image: Option<&Path>,
    ruleset: Option<Ruleset>,
    config: &TsheetConfig,
) -> Result<ActiveTileset, TilesetError> {
    let (path, result) = match (image, ruleset) {
        (Some(path), None) => (path.to_path_buf(), ActiveTileset::detect(path)),
        (Some(path), Some(ruleset)) => (path.to_path_buf(), ActiveTileset::open(ruleset, path)),
        (None, ruleset) => {
            let ruleset = ruleset.unwrap_or(Ruleset::Lynx);
            let path = config.tilesets.path_for(ruleset).clone();
            let result = ActiveTileset::open(ruleset, &path);
            (path, result)
        }
    };

    if let Err(e) = &result {
        log::warn!("failed to load {}: {}", path.display(), e);
        telemetry::log_error(
            &ErrorEntry::from_tileset_error(command, e).with_file(path.display().to_string()),
        );
    }
    result
}

/// Entry point for the `tsheet` binary.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Keep the handle alive so buffered records are flushed on exit
    let _logger = match crate::logging::init(cli.verbose) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: could not start logger: {}", e);
            None
        }
    };

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let overrides = CliOverrides {
        scale: cli.command.scale(),
        collect_errors: cli.collect_errors.then_some(true),
    };
    merge_cli_overrides(&mut config, &overrides);
    if let Some(err) = config.validate().first() {
        eprintln!("Error: {}", err);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    telemetry::init_collector(&config.telemetry.error_log, config.telemetry.collect_errors);

    log::debug!("running {}", cli.command.name());
    match cli.command {
        Commands::Detect { paths, json } => detect::run_detect(&paths, json),
        Commands::Inspect { image, ruleset, json } => {
            inspect::run_inspect(image.as_deref(), ruleset, json, &config)
        }
        Commands::Extract { image, ruleset, tile, direction, frame, tick, output, scale: _ } => {
            extract::run_extract(
                image.as_deref(),
                ruleset,
                &tile,
                &direction,
                frame,
                tick,
                &output,
                &config,
            )
        }
        Commands::Mask { image, ruleset, output } => {
            mask::run_mask(image.as_deref(), ruleset, &output, &config)
        }
        Commands::Preview { image, ruleset, tick, output, scale: _ } => {
            preview::run_preview(image.as_deref(), ruleset, tick, &output, &config)
        }
    }
}
