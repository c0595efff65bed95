//! `tsheet detect` - report the convention of each image

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::telemetry::{self, ErrorEntry};
use crate::tileset::lynx::detect_tile_size;
use crate::tileset::{detect_convention, Convention, TilesetError};

use super::{find_sheet_files, EXIT_ERROR, EXIT_SUCCESS};

#[derive(Debug, Serialize)]
struct Detection {
    file: String,
    /// `None` when the image matches neither convention
    convention: Option<Convention>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tile_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn detect_file(path: &Path) -> Detection {
    let file = path.display().to_string();
    let image = match image::open(path) {
        Ok(image) => image.to_rgba8(),
        Err(e) => {
            let err = TilesetError::from(e);
            telemetry::log_error(&ErrorEntry::from_tileset_error("detect", &err).with_file(&file));
            return Detection { file, convention: None, tile_size: None, error: Some(err.to_string()) };
        }
    };

    let convention = detect_convention(&image);
    let tile_size = match convention {
        Some(Convention::Lynx) => detect_tile_size(&image).ok().map(|(w, _)| w),
        Some(Convention::Ms) => Some(image.height() / 16),
        None => None,
    };
    Detection { file, convention, tile_size, error: None }
}

/// Expand directories into the sheets they contain.
fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(find_sheet_files(path));
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Execute the detect command
pub fn run_detect(paths: &[PathBuf], json: bool) -> ExitCode {
    let files = collect_inputs(paths);
    if files.is_empty() {
        eprintln!("Error: No .bmp or .png files found");
        return ExitCode::from(EXIT_ERROR);
    }

    let results: Vec<Detection> = files.iter().map(|f| detect_file(f)).collect();
    let failed = results.iter().any(|r| r.error.is_some());

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for result in &results {
            match (&result.error, result.convention) {
                (Some(e), _) => eprintln!("Error: Cannot read '{}': {}", result.file, e),
                (None, Some(convention)) => println!("{}: {}", result.file, convention),
                (None, None) => println!("{}: unrecognized", result.file),
            }
        }
    }

    if failed {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
