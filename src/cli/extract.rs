//! `tsheet extract` - crop one resolved sprite frame to a PNG

use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;

use crate::config::TsheetConfig;
use crate::level::Ruleset;
use crate::output::{crop, save_png, scale_image};
use crate::tile::{AnyTileId, Direction, TileId};
use crate::tileset::{Rect, Tileset};

use super::{open_tileset, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// What to pull out of the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Selection {
    id: TileId,
    facing: Direction,
    frame: i8,
    tick: u32,
}

impl Selection {
    fn parse(tile: &str, direction: &str, frame: Option<i8>, tick: Option<u32>) -> Result<Self, String> {
        let id = TileId::from_str(tile).map_err(|_| format!("Unknown tile '{}'", tile))?;
        if id == TileId::Nothing {
            return Err("'nothing' has no sprite".to_string());
        }
        let facing = Direction::parse(direction)
            .filter(|d| d.is_cardinal())
            .ok_or_else(|| format!("--dir must be one of n, w, s, e (got '{}')", direction))?;
        Ok(Self { id, facing, frame: frame.unwrap_or(0), tick: tick.unwrap_or(0) })
    }

    /// Index key this selection reads.
    fn key(&self) -> AnyTileId {
        if self.id.is_actor() {
            AnyTileId::for_actor(self.id, self.facing)
        } else {
            AnyTileId::Terrain(self.id)
        }
    }

    fn resolve(&self, tileset: &dyn Tileset) -> Option<Rect> {
        if !tileset.contains(self.key()) {
            return None;
        }
        let rect = if self.id.is_actor() {
            tileset.lookup_actor(self.id, self.facing, self.frame).1
        } else {
            tileset.lookup_terrain(self.key(), self.tick)
        };
        Some(rect)
    }
}

/// Execute the extract command
pub fn run_extract(
    image: Option<&Path>,
    ruleset: Option<Ruleset>,
    tile: &str,
    direction: &str,
    frame: Option<i8>,
    tick: Option<u32>,
    output: &Path,
    config: &TsheetConfig,
) -> ExitCode {
    let selection = match Selection::parse(tile, direction, frame, tick) {
        Ok(selection) => selection,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let active = match open_tileset("extract", image, ruleset, config) {
        Ok(active) => active,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let tileset = active.get();

    let Some(rect) = selection.resolve(tileset) else {
        eprintln!("Error: {} tileset has no sprite for {}", tileset.convention(), selection.key());
        return ExitCode::from(EXIT_ERROR);
    };
    log::info!("extracting {} from {},{} {}x{}", selection.key(), rect.x, rect.y, rect.w, rect.h);

    let sprite = match crop(tileset.image(), rect) {
        Ok(sprite) => scale_image(sprite, config.viewport.scale),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(e) = save_png(&sprite, output) {
        eprintln!("Error: Failed to write '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("{}", output.display());
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lynx_sheet, ms_sheet};
    use crate::tileset::{LynxTileset, MsTileset};

    #[test]
    fn test_parse_selection() {
        let selection = Selection::parse("Ice_Wall_Northwest", "w", None, Some(3)).unwrap();
        assert_eq!(selection.id, TileId::IceWallNorthwest);
        assert_eq!(selection.key(), AnyTileId::Terrain(TileId::IceWallNorthwest));
        assert_eq!(selection.tick, 3);

        let bug = Selection::parse("bug", "east", Some(2), None).unwrap();
        assert_eq!(bug.key(), AnyTileId::Actor(TileId::Bug, Direction::EAST));
        assert_eq!(bug.frame, 2);
    }

    #[test]
    fn test_parse_selection_rejects_bad_input() {
        assert!(Selection::parse("lava", "n", None, None).unwrap_err().contains("Unknown tile"));
        assert!(Selection::parse("nothing", "n", None, None).is_err());
        assert!(Selection::parse("bug", "ne", None, None).unwrap_err().contains("--dir"));
        assert!(Selection::parse("bug", "nil", None, None).is_err());
    }

    #[test]
    fn test_resolve_missing_sprite_is_none() {
        let tileset = MsTileset::from_image(&ms_sheet(2)).unwrap();
        let pushing = Selection::parse("pushing_chip", "n", None, None).unwrap();
        assert_eq!(pushing.resolve(&tileset), None);

        let chip = Selection::parse("chip", "s", None, None).unwrap();
        assert_eq!(chip.resolve(&tileset), Some(Rect::new(12, 28, 2, 2)));
    }

    #[test]
    fn test_resolve_animation_ignores_facing() {
        let tileset = LynxTileset::from_image(&lynx_sheet(2).build()).unwrap();
        let splash = Selection::parse("water_splash", "e", None, None).unwrap();
        let rect = splash.resolve(&tileset).unwrap();
        assert_eq!((rect.w, rect.h), (6, 6));
    }
}
