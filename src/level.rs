//! Read-only view of the simulation that drawing consumes
//!
//! The rules engine lives outside this crate. Renderers only see it through
//! [`LevelView`]: two terrain layers, the actor list, and the world tick.
//! [`StaticLevel`] is a plain snapshot implementation used by the CLI and tests.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resolver;
use crate::tile::{AnyTileId, Direction, Position, TileId};
use crate::tileset::Convention;

/// Levels are square.
pub const MAP_HEIGHT: i32 = 32;

/// The rules variant a level is played under.
///
/// Each ruleset is drawn with the sheet convention of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    Lynx,
    Ms,
}

impl Ruleset {
    pub fn convention(self) -> Convention {
        match self {
            Ruleset::Lynx => Convention::Lynx,
            Ruleset::Ms => Convention::Ms,
        }
    }

    /// The ruleset drawn with sheets of `convention`.
    pub fn for_convention(convention: Convention) -> Self {
        match convention {
            Convention::Lynx => Ruleset::Lynx,
            Convention::Ms => Ruleset::Ms,
        }
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.convention())
    }
}

/// Pose of one actor as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorState {
    pub id: TileId,
    pub position: Position,
    pub direction: Direction,
    /// Sub-steps left in the current move, counting down from 8.
    pub move_cooldown: i8,
    pub animation_frame: i8,
    pub hidden: bool,
}

impl ActorState {
    /// A resting, visible actor.
    pub fn new(id: TileId, position: Position, direction: Direction) -> Self {
        Self { id, position, direction, move_cooldown: 0, animation_frame: 0, hidden: false }
    }

    /// Sprite lookup key for this actor's kind and facing.
    pub fn key(&self) -> AnyTileId {
        AnyTileId::for_actor(self.id, self.direction)
    }

    pub fn visual_position(&self) -> (f32, f32) {
        resolver::visual_position(self.position, self.direction, self.move_cooldown)
    }

    /// Whether the actor is one of the player's forms.
    pub fn is_player(&self) -> bool {
        matches!(self.id, TileId::Chip | TileId::PushingChip | TileId::SwimmingChip)
    }
}

/// Queries the renderer makes against a running level.
pub trait LevelView {
    fn ruleset(&self) -> Ruleset;

    fn current_tick(&self) -> u32;

    /// Terrain under the top layer; `Nothing` where the cell has none.
    fn bottom_terrain(&self, pos: Position) -> AnyTileId;

    /// The top layer. Under MS rules this can hold a creature tile with its
    /// facing, decoded by [`TileId::from_raw`].
    fn top_terrain(&self, pos: Position) -> AnyTileId;

    /// Live actors in engine order.
    fn actors(&self) -> Vec<ActorState>;

    /// The actor the camera follows.
    fn player(&self) -> Option<ActorState> {
        self.actors().into_iter().find(ActorState::is_player)
    }
}

/// Whether `pos` lies on the level grid.
pub fn in_bounds(pos: Position) -> bool {
    (0..Position::MAP_WIDTH).contains(&pos.x) && (0..MAP_HEIGHT).contains(&pos.y)
}

/// An owned snapshot of a level.
#[derive(Debug, Clone)]
pub struct StaticLevel {
    ruleset: Ruleset,
    tick: u32,
    bottom: Vec<AnyTileId>,
    top: Vec<AnyTileId>,
    actors: Vec<ActorState>,
}

impl StaticLevel {
    /// An empty floor with nothing beneath it.
    pub fn new(ruleset: Ruleset) -> Self {
        let cells = (Position::MAP_WIDTH * MAP_HEIGHT) as usize;
        Self {
            ruleset,
            tick: 0,
            bottom: vec![TileId::Nothing.into(); cells],
            top: vec![TileId::Empty.into(); cells],
            actors: Vec::new(),
        }
    }

    pub fn with_tick(mut self, tick: u32) -> Self {
        self.tick = tick;
        self
    }

    /// Set the top terrain at `pos`. Positions off the grid are ignored.
    pub fn set_top(&mut self, pos: Position, id: impl Into<AnyTileId>) {
        if in_bounds(pos) {
            self.top[pos.to_index() as usize] = id.into();
        }
    }

    /// Set the bottom terrain at `pos`. Positions off the grid are ignored.
    pub fn set_bottom(&mut self, pos: Position, id: impl Into<AnyTileId>) {
        if in_bounds(pos) {
            self.bottom[pos.to_index() as usize] = id.into();
        }
    }

    pub fn push_actor(&mut self, actor: ActorState) {
        self.actors.push(actor);
    }

    pub fn actors_mut(&mut self) -> &mut [ActorState] {
        &mut self.actors
    }

    fn layer(layer: &[AnyTileId], pos: Position) -> AnyTileId {
        if in_bounds(pos) {
            layer[pos.to_index() as usize]
        } else {
            TileId::Nothing.into()
        }
    }
}

impl LevelView for StaticLevel {
    fn ruleset(&self) -> Ruleset {
        self.ruleset
    }

    fn current_tick(&self) -> u32 {
        self.tick
    }

    fn bottom_terrain(&self, pos: Position) -> AnyTileId {
        Self::layer(&self.bottom, pos)
    }

    fn top_terrain(&self, pos: Position) -> AnyTileId {
        Self::layer(&self.top, pos)
    }

    fn actors(&self) -> Vec<ActorState> {
        self.actors.clone()
    }
}
