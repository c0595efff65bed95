//! `tsheet mask` - write a sheet with its transparency color keyed out

use std::path::Path;
use std::process::ExitCode;

use crate::config::TsheetConfig;
use crate::level::Ruleset;
use crate::output::save_png;

use super::{open_tileset, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the mask command
pub fn run_mask(image: Option<&Path>, ruleset: Option<Ruleset>, output: &Path, config: &TsheetConfig) -> ExitCode {
    let active = match open_tileset("mask", image, ruleset, config) {
        Ok(active) => active,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let masked = active.get().image();
    let transparent = masked.pixels().filter(|p| p[3] == 0).count();
    log::info!("{} of {} pixels keyed out", transparent, masked.width() * masked.height());

    if let Err(e) = save_png(masked, output) {
        eprintln!("Error: Failed to write '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("{}", output.display());
    ExitCode::from(EXIT_SUCCESS)
}
