//! `tsheet preview` - render a viewport frame to a PNG
//!
//! The frame shows every terrain tile the sheet draws, laid out row by row,
//! followed by one south-facing sprite per actor kind, with the player
//! standing at the centre of the view.

use std::path::Path;
use std::process::ExitCode;
use strum::IntoEnumIterator;

use crate::config::TsheetConfig;
use crate::level::{ActorState, Ruleset, StaticLevel};
use crate::output::save_png;
use crate::tile::{AnyTileId, Direction, Position, TileId};
use crate::tileset::Tileset;
use crate::viewport::Viewport;

use super::{open_tileset, EXIT_ERROR, EXIT_SUCCESS};

/// Lay the sheet's sprites out on a level sized for `viewport`.
fn showcase_level(tileset: &dyn Tileset, ruleset: Ruleset, viewport: &Viewport, tick: u32) -> StaticLevel {
    let mut level = StaticLevel::new(ruleset).with_tick(tick);
    let columns = viewport.width.clamp(1, Position::MAP_WIDTH as u32) as i32;
    let cell = |idx: i32| Position::new(idx % columns, idx / columns);

    let terrain = TileId::iter()
        .filter(|id| id.is_terrain() && *id != TileId::Nothing)
        .filter(|id| tileset.contains(AnyTileId::Terrain(*id)));
    let mut next = 0;
    for id in terrain {
        level.set_top(cell(next), id);
        next += 1;
    }

    // The camera follows the first player form, so Chip goes in first
    let centre = Position::new(viewport.width as i32 / 2, viewport.height as i32 / 2);
    level.push_actor(ActorState::new(TileId::Chip, centre, Direction::SOUTH));

    let actors = TileId::iter()
        .filter(|id| id.is_actor() && !id.is_animation() && *id != TileId::Chip)
        .filter(|id| tileset.contains(AnyTileId::Actor(*id, Direction::SOUTH)));
    for id in actors {
        level.push_actor(ActorState::new(id, cell(next), Direction::SOUTH));
        next += 1;
    }
    level
}

/// Execute the preview command
pub fn run_preview(
    image: Option<&Path>,
    ruleset: Option<Ruleset>,
    tick: u32,
    output: &Path,
    config: &TsheetConfig,
) -> ExitCode {
    let active = match open_tileset("preview", image, ruleset, config) {
        Ok(active) => active,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let viewport = Viewport::from(&config.viewport);
    let level = showcase_level(active.get(), active.ruleset(), &viewport, tick);
    let frame = viewport.render(active.get(), &level);

    if let Err(e) = save_png(&frame, output) {
        eprintln!("Error: Failed to write '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("{}", output.display());
    ExitCode::from(EXIT_SUCCESS)
}
