//! `tsheet inspect` - list the sprite index of a tileset

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::config::TsheetConfig;
use crate::level::Ruleset;
use crate::tileset::{Convention, Placement, Rect, Tileset};

use super::{open_tileset, EXIT_ERROR, EXIT_SUCCESS};

#[derive(Debug, Serialize)]
struct InspectEntry {
    id: String,
    placement: Placement,
    frames: Vec<Rect>,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    convention: Convention,
    tile_size: u32,
    width: u32,
    height: u32,
    entries: Vec<InspectEntry>,
}

fn build_report(tileset: &dyn Tileset) -> InspectReport {
    let (width, height) = tileset.image().dimensions();
    let entries = tileset
        .entries()
        .into_iter()
        .map(|entry| InspectEntry { id: entry.id.to_string(), placement: entry.placement, frames: entry.frames })
        .collect();
    InspectReport { convention: tileset.convention(), tile_size: tileset.tile_size(), width, height, entries }
}

fn print_text(report: &InspectReport) {
    println!(
        "{} tileset, {}x{} px, {}px tiles, {} sprites",
        report.convention,
        report.width,
        report.height,
        report.tile_size,
        report.entries.len()
    );
    for entry in &report.entries {
        let frames: Vec<String> = entry.frames.iter().map(|f| format!("({},{})", f.x, f.y)).collect();
        let size = entry.frames.first().map(|f| format!("{}x{}", f.w, f.h)).unwrap_or_default();
        println!("  {:<28} {:<7} {:<6} {}", entry.id, entry.placement.to_string(), size, frames.join(" "));
    }
}

/// Execute the inspect command
pub fn run_inspect(
    image: Option<&Path>,
    ruleset: Option<Ruleset>,
    json: bool,
    config: &TsheetConfig,
) -> ExitCode {
    let active = match open_tileset("inspect", image, ruleset, config) {
        Ok(active) => active,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let report = build_report(active.get());
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        print_text(&report);
    }
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lynx_sheet, ms_sheet};
    use crate::tile::TileId;
    use crate::tileset::{LynxTileset, MsTileset};

    #[test]
    fn test_report_lists_ms_grid() {
        let tileset = MsTileset::from_image(&ms_sheet(4)).unwrap();
        let report = build_report(&tileset);
        assert_eq!(report.convention, Convention::Ms);
        assert_eq!((report.width, report.height), (28, 64));
        assert_eq!(report.entries.len(), 108);
        assert!(report.entries.iter().any(|e| e.id == "chip:south"));
    }

    #[test]
    fn test_report_json_shape() {
        let image = lynx_sheet(4).footprint(TileId::Block.into(), 16, 2).build();
        let tileset = LynxTileset::from_image(&image).unwrap();
        let value = serde_json::to_value(build_report(&tileset)).unwrap();

        assert_eq!(value["convention"], "lynx");
        assert_eq!(value["tile_size"], 4);
        let block = value["entries"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["id"] == "block:west")
            .unwrap();
        assert_eq!(block["placement"], "stretch");
        assert_eq!(block["frames"].as_array().unwrap().len(), 4);
        assert_eq!(block["frames"][0]["w"], 8);
    }
}
