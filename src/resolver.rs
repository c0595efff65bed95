//! Sprite resolution - picking frames and world placement from live state
//!
//! Tilesets own the identity index; this module owns the rules for turning a
//! world tick or an actor's animation counter into a frame, and an actor's
//! pose into a destination rectangle on the world grid.

use serde::Serialize;

use crate::level::ActorState;
use crate::tile::{AnyTileId, Direction, Position};
use crate::tileset::{Placement, Rect, Tileset};

/// Sub-steps in one cell-to-cell move.
pub const MOVE_STEPS: f32 = 8.0;

/// Frame shown for terrain at `tick`.
///
/// Single-frame terrain always yields 0.
pub fn terrain_frame_index(tick: u32, frame_count: usize) -> usize {
    debug_assert!(frame_count > 0);
    ((tick as u64 + 1) % frame_count as u64) as usize
}

/// Frame shown for an actor with animation counter `counter`.
///
/// Single-frame records ignore the counter. Lynx sheets store actor frames
/// back to front, so `reversed` plays them from the last frame down.
pub fn actor_frame_index(counter: i8, frame_count: usize, reversed: bool) -> usize {
    debug_assert!(frame_count > 0);
    if frame_count <= 1 {
        return 0;
    }
    let index = counter.max(0) as usize % frame_count;
    if reversed {
        frame_count - 1 - index
    } else {
        index
    }
}

/// A rectangle in world tile units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl WorldRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// The 1x1 rectangle of a grid cell.
    pub fn cell(pos: Position) -> Self {
        Self::new(pos.x as f32, pos.y as f32, 1.0, 1.0)
    }
}

/// A source region paired with where it lands in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedSprite {
    pub placement: Placement,
    pub source: Rect,
    pub target: WorldRect,
}

/// Where an actor appears between cells while a move is in progress.
///
/// The engine counts `move_cooldown` down from [`MOVE_STEPS`] as the actor
/// travels from the cell behind it into `position`.
pub fn visual_position(position: Position, facing: Direction, move_cooldown: i8) -> (f32, f32) {
    let (dx, dy) = facing.offset();
    let progress = move_cooldown.max(0) as f32 / MOVE_STEPS;
    (position.x as f32 - dx as f32 * progress, position.y as f32 - dy as f32 * progress)
}

/// Destination rectangle for an actor sprite with the given placement.
///
/// Stretched sprites span the actor's cell and the cell it moved from; their
/// frames already encode the motion, so no interpolation is applied.
pub fn placement_target(placement: Placement, actor: &ActorState) -> WorldRect {
    match placement {
        Placement::Normal => {
            let (x, y) = visual_position(actor.position, actor.direction, actor.move_cooldown);
            WorldRect::new(x, y, 1.0, 1.0)
        }
        Placement::ThreeByThree => WorldRect::new(
            actor.position.x as f32 - 1.0,
            actor.position.y as f32 - 1.0,
            3.0,
            3.0,
        ),
        Placement::Stretch => {
            let behind = actor.position.neighbor(actor.direction.back());
            let x = actor.position.x.min(behind.x);
            let y = actor.position.y.min(behind.y);
            let w = (actor.position.x - behind.x).abs() + 1;
            let h = (actor.position.y - behind.y).abs() + 1;
            WorldRect::new(x as f32, y as f32, w as f32, h as f32)
        }
    }
}

/// Resolve a terrain tile at `pos` for world tick `tick`.
pub fn resolve_terrain(tileset: &dyn Tileset, pos: Position, id: AnyTileId, tick: u32) -> ResolvedSprite {
    ResolvedSprite {
        placement: Placement::Normal,
        source: tileset.lookup_terrain(id, tick),
        target: WorldRect::cell(pos),
    }
}

/// Resolve a live actor.
pub fn resolve_actor(tileset: &dyn Tileset, actor: &ActorState) -> ResolvedSprite {
    let (placement, source) = tileset.lookup_actor(actor.id, actor.direction, actor.animation_frame);
    ResolvedSprite { placement, source, target: placement_target(placement, actor) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileId;

    fn actor(id: TileId, x: i32, y: i32, direction: Direction, move_cooldown: i8) -> ActorState {
        ActorState {
            id,
            position: Position::new(x, y),
            direction,
            move_cooldown,
            animation_frame: 0,
            hidden: false,
        }
    }

    #[test]
    fn test_terrain_frame_index() {
        assert_eq!(terrain_frame_index(3, 4), 0);
        assert_eq!(terrain_frame_index(0, 4), 1);
        assert_eq!(terrain_frame_index(12345, 1), 0);
        assert_eq!(terrain_frame_index(u32::MAX, 4), 0);
    }

    #[test]
    fn test_actor_frame_index_reversed() {
        assert_eq!(actor_frame_index(1, 4, true), 2);
        assert_eq!(actor_frame_index(0, 4, true), 3);
        assert_eq!(actor_frame_index(3, 4, true), 0);
        assert_eq!(actor_frame_index(1, 4, false), 1);
    }

    #[test]
    fn test_actor_frame_index_single_frame_ignores_counter() {
        assert_eq!(actor_frame_index(7, 1, true), 0);
        assert_eq!(actor_frame_index(-3, 1, false), 0);
    }

    #[test]
    fn test_actor_frame_index_clamps_out_of_range() {
        assert_eq!(actor_frame_index(-1, 4, false), 0);
        assert_eq!(actor_frame_index(5, 4, false), 1);
    }

    #[test]
    fn test_visual_position_interpolates() {
        assert_eq!(visual_position(Position::new(5, 5), Direction::NORTH, 0), (5.0, 5.0));
        assert_eq!(visual_position(Position::new(5, 5), Direction::NORTH, 4), (5.0, 5.5));
        assert_eq!(visual_position(Position::new(5, 5), Direction::EAST, 8), (4.0, 5.0));
    }

    #[test]
    fn test_placement_target_three_by_three() {
        let effect = actor(TileId::BombExplosion, 4, 4, Direction::NIL, 0);
        assert_eq!(placement_target(Placement::ThreeByThree, &effect), WorldRect::new(3.0, 3.0, 3.0, 3.0));
    }

    #[test]
    fn test_placement_target_stretch_spans_move() {
        let north = actor(TileId::Block, 4, 4, Direction::NORTH, 4);
        assert_eq!(placement_target(Placement::Stretch, &north), WorldRect::new(4.0, 4.0, 1.0, 2.0));

        let south = actor(TileId::Block, 4, 4, Direction::SOUTH, 4);
        assert_eq!(placement_target(Placement::Stretch, &south), WorldRect::new(4.0, 3.0, 1.0, 2.0));

        let east = actor(TileId::Block, 4, 4, Direction::EAST, 4);
        assert_eq!(placement_target(Placement::Stretch, &east), WorldRect::new(3.0, 4.0, 2.0, 1.0));

        let west = actor(TileId::Block, 4, 4, Direction::WEST, 4);
        assert_eq!(placement_target(Placement::Stretch, &west), WorldRect::new(4.0, 4.0, 2.0, 1.0));
    }
}
