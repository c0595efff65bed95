//! Tile identity model
//!
//! Value types shared by every tileset convention: facing directions, the
//! catalog of tile kinds, the composite lookup key, and grid positions.
//! Numeric values match the rules engine's raw encoding so identities can be
//! decoded straight from engine queries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, Sub};
use strum::{Display, EnumIter, EnumString};

/// A facing or movement direction, stored as a bitmask.
///
/// Cardinal directions are single bits; diagonals are the union of two
/// cardinals and only appear in input gestures, never as render facings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Direction(u8);

impl Direction {
    pub const NIL: Direction = Direction(0);
    pub const NORTH: Direction = Direction(1);
    pub const WEST: Direction = Direction(2);
    pub const SOUTH: Direction = Direction(4);
    pub const EAST: Direction = Direction(8);

    pub const NORTHWEST: Direction = Direction(1 | 2);
    pub const NORTHEAST: Direction = Direction(1 | 8);
    pub const SOUTHWEST: Direction = Direction(4 | 2);
    pub const SOUTHEAST: Direction = Direction(4 | 8);

    /// The four render facings, in dense index order.
    pub const CARDINALS: [Direction; 4] =
        [Direction::NORTH, Direction::WEST, Direction::SOUTH, Direction::EAST];

    /// Build a direction from raw bits, dropping anything above the four cardinals.
    pub const fn from_bits(bits: u8) -> Self {
        Direction(bits & 0x0F)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_nil(self) -> bool {
        self.0 == 0
    }

    /// True for a single cardinal direction.
    pub const fn is_cardinal(self) -> bool {
        self.0.count_ones() == 1
    }

    /// True when two perpendicular cardinals are combined.
    pub const fn is_diagonal(self) -> bool {
        let vertical = self.0 & (1 | 4);
        let horizontal = self.0 & (2 | 8);
        vertical.count_ones() == 1 && horizontal.count_ones() == 1
    }

    pub const fn contains(self, other: Direction) -> bool {
        self.0 & other.0 == other.0
    }

    /// Dense index of a cardinal: North=0, West=1, South=2, East=3.
    ///
    /// Returns `None` for nil or combined directions.
    pub fn to_idx(self) -> Option<usize> {
        if self.is_cardinal() {
            Some(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Inverse of [`Direction::to_idx`]; only the low two bits are used.
    pub const fn from_idx(idx: u8) -> Self {
        Direction(1 << (idx & 3))
    }

    /// Rotate a cardinal a quarter turn counter-clockwise.
    pub fn left(self) -> Self {
        match self.to_idx() {
            Some(idx) => Direction::from_idx((idx as u8 + 1) & 3),
            None => self,
        }
    }

    /// Rotate a cardinal a quarter turn clockwise.
    pub fn right(self) -> Self {
        match self.to_idx() {
            Some(idx) => Direction::from_idx((idx as u8 + 3) & 3),
            None => self,
        }
    }

    /// The opposite direction. Works on diagonals too.
    pub const fn back(self) -> Self {
        // Swapping N<->S and W<->E is a two-bit rotation of each axis pair.
        let bits = self.0;
        Direction(((bits << 2) | (bits >> 2)) & 0x0F)
    }

    /// Unit grid delta; north is negative y.
    pub const fn offset(self) -> (i32, i32) {
        let mut dx = 0;
        let mut dy = 0;
        if self.0 & Direction::NORTH.0 != 0 {
            dy -= 1;
        }
        if self.0 & Direction::SOUTH.0 != 0 {
            dy += 1;
        }
        if self.0 & Direction::WEST.0 != 0 {
            dx -= 1;
        }
        if self.0 & Direction::EAST.0 != 0 {
            dx += 1;
        }
        (dx, dy)
    }

    /// Short lowercase name used by the CLI and inspection output.
    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "nil",
            1 => "north",
            2 => "west",
            4 => "south",
            8 => "east",
            3 => "northwest",
            9 => "northeast",
            6 => "southwest",
            12 => "southeast",
            _ => "invalid",
        }
    }

    /// Parse a facing name or its first letter (`n`, `w`, `s`, `e`).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "n" | "north" => Some(Direction::NORTH),
            "w" | "west" => Some(Direction::WEST),
            "s" | "south" => Some(Direction::SOUTH),
            "e" | "east" => Some(Direction::EAST),
            "nil" | "none" => Some(Direction::NIL),
            _ => None,
        }
    }
}

impl BitOr for Direction {
    type Output = Direction;

    fn bitor(self, rhs: Direction) -> Direction {
        Direction(self.0 | rhs.0)
    }
}

impl Sub for Direction {
    type Output = Direction;

    /// Remove the bits of `rhs`.
    fn sub(self, rhs: Direction) -> Direction {
        Direction(self.0 & !rhs.0)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every tile kind the rules engine can report.
///
/// Discriminants are the engine's raw values. Actor kinds are spaced by four
/// because the engine packs a facing index into the low two bits.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum TileId {
    Nothing = 0x00,

    Empty = 0x01,

    SlideNorth = 0x02,
    SlideWest = 0x03,
    SlideSouth = 0x04,
    SlideEast = 0x05,
    SlideRandom = 0x06,
    Ice = 0x07,
    IceWallNorthwest = 0x08,
    IceWallNortheast = 0x09,
    IceWallSouthwest = 0x0A,
    IceWallSoutheast = 0x0B,
    Gravel = 0x0C,
    Dirt = 0x0D,
    Water = 0x0E,
    Fire = 0x0F,
    Bomb = 0x10,
    Beartrap = 0x11,
    Burglar = 0x12,
    HintButton = 0x13,

    ButtonBlue = 0x14,
    ButtonGreen = 0x15,
    ButtonRed = 0x16,
    ButtonBrown = 0x17,
    Teleport = 0x18,

    Wall = 0x19,
    WallNorth = 0x1A,
    WallWest = 0x1B,
    WallSouth = 0x1C,
    WallEast = 0x1D,
    WallSoutheast = 0x1E,
    HiddenWallPerm = 0x1F,
    HiddenWallTemp = 0x20,
    BlueWallReal = 0x21,
    BlueWallFake = 0x22,
    SwitchWallOpen = 0x23,
    SwitchWallClosed = 0x24,
    PopupWall = 0x25,

    CloneMachine = 0x26,

    DoorRed = 0x27,
    DoorBlue = 0x28,
    DoorYellow = 0x29,
    DoorGreen = 0x2A,
    Socket = 0x2B,
    Exit = 0x2C,

    IcChip = 0x2D,
    KeyRed = 0x2E,
    KeyBlue = 0x2F,
    KeyYellow = 0x30,
    KeyGreen = 0x31,
    BootsIce = 0x32,
    BootsSlide = 0x33,
    BootsFire = 0x34,
    BootsWater = 0x35,

    BlockStatic = 0x36,

    DrownedChip = 0x37,
    BurnedChip = 0x38,
    BombedChip = 0x39,
    ExitedChip = 0x3A,
    ExitExtra1 = 0x3B,
    ExitExtra2 = 0x3C,

    OverlayBuffer = 0x3D,

    FloorReserved2 = 0x3E,
    FloorReserved1 = 0x3F,

    Chip = 0x40,

    Block = 0x44,

    Tank = 0x48,
    Ball = 0x4C,
    Glider = 0x50,
    Fireball = 0x54,
    Walker = 0x58,
    Blob = 0x5C,
    Teeth = 0x60,
    Bug = 0x64,
    Paramecium = 0x68,

    SwimmingChip = 0x6C,
    PushingChip = 0x70,

    EntityReserved2 = 0x74,
    EntityReserved1 = 0x78,

    WaterSplash = 0x7C,
    BombExplosion = 0x7D,
    EntityExplosion = 0x7E,
    AnimationReserved1 = 0x7F,
}

/// First identity of the actor range.
pub const ACTOR_FIRST: TileId = TileId::Chip;
/// First identity of the animation sub-range (inside the actor range).
pub const ANIMATION_FIRST: TileId = TileId::WaterSplash;
/// Last identity of both the actor and animation ranges.
pub const ANIMATION_LAST: TileId = TileId::AnimationReserved1;

/// All tile identities ordered by raw value, for decoding.
static BY_RAW: [Option<TileId>; 0x80] = {
    let mut table = [None; 0x80];
    let ids = TileId::ALL;
    let mut i = 0;
    while i < ids.len() {
        table[ids[i] as usize] = Some(ids[i]);
        i += 1;
    }
    table
};

impl TileId {
    const ALL: [TileId; 83] = [
        TileId::Nothing,
        TileId::Empty,
        TileId::SlideNorth,
        TileId::SlideWest,
        TileId::SlideSouth,
        TileId::SlideEast,
        TileId::SlideRandom,
        TileId::Ice,
        TileId::IceWallNorthwest,
        TileId::IceWallNortheast,
        TileId::IceWallSouthwest,
        TileId::IceWallSoutheast,
        TileId::Gravel,
        TileId::Dirt,
        TileId::Water,
        TileId::Fire,
        TileId::Bomb,
        TileId::Beartrap,
        TileId::Burglar,
        TileId::HintButton,
        TileId::ButtonBlue,
        TileId::ButtonGreen,
        TileId::ButtonRed,
        TileId::ButtonBrown,
        TileId::Teleport,
        TileId::Wall,
        TileId::WallNorth,
        TileId::WallWest,
        TileId::WallSouth,
        TileId::WallEast,
        TileId::WallSoutheast,
        TileId::HiddenWallPerm,
        TileId::HiddenWallTemp,
        TileId::BlueWallReal,
        TileId::BlueWallFake,
        TileId::SwitchWallOpen,
        TileId::SwitchWallClosed,
        TileId::PopupWall,
        TileId::CloneMachine,
        TileId::DoorRed,
        TileId::DoorBlue,
        TileId::DoorYellow,
        TileId::DoorGreen,
        TileId::Socket,
        TileId::Exit,
        TileId::IcChip,
        TileId::KeyRed,
        TileId::KeyBlue,
        TileId::KeyYellow,
        TileId::KeyGreen,
        TileId::BootsIce,
        TileId::BootsSlide,
        TileId::BootsFire,
        TileId::BootsWater,
        TileId::BlockStatic,
        TileId::DrownedChip,
        TileId::BurnedChip,
        TileId::BombedChip,
        TileId::ExitedChip,
        TileId::ExitExtra1,
        TileId::ExitExtra2,
        TileId::OverlayBuffer,
        TileId::FloorReserved2,
        TileId::FloorReserved1,
        TileId::Chip,
        TileId::Block,
        TileId::Tank,
        TileId::Ball,
        TileId::Glider,
        TileId::Fireball,
        TileId::Walker,
        TileId::Blob,
        TileId::Teeth,
        TileId::Bug,
        TileId::Paramecium,
        TileId::SwimmingChip,
        TileId::PushingChip,
        TileId::EntityReserved2,
        TileId::EntityReserved1,
        TileId::WaterSplash,
        TileId::BombExplosion,
        TileId::EntityExplosion,
        TileId::AnimationReserved1,
    ];

    /// Raw engine value.
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Actors (creatures, the player, blocks, and animations).
    pub const fn is_actor(self) -> bool {
        let raw = self as u8;
        raw >= ACTOR_FIRST as u8 && raw <= ANIMATION_LAST as u8
    }

    /// One-shot animation effects; these have no facing.
    pub const fn is_animation(self) -> bool {
        let raw = self as u8;
        raw >= ANIMATION_FIRST as u8 && raw <= ANIMATION_LAST as u8
    }

    /// Anything that is neither nothing nor an actor.
    pub const fn is_terrain(self) -> bool {
        !matches!(self, TileId::Nothing) && !self.is_actor()
    }

    /// Look up the identity with this exact raw value.
    pub fn from_u8(raw: u8) -> Option<TileId> {
        BY_RAW.get(raw as usize).copied().flatten()
    }

    /// Decode an engine byte into a lookup key.
    ///
    /// Directional actors carry their facing index in the low two bits;
    /// terrain and animation bytes are taken as-is.
    pub fn from_raw(raw: u8) -> Option<AnyTileId> {
        let base = TileId::from_u8(raw & !3)?;
        if base.is_actor() && !base.is_animation() {
            return Some(AnyTileId::Actor(base, Direction::from_idx(raw & 3)));
        }
        TileId::from_u8(raw).map(AnyTileId::Terrain)
    }
}

/// Composite sprite lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnyTileId {
    /// A tile drawn without a facing: terrain and animation effects.
    Terrain(TileId),
    /// A directional actor sprite.
    Actor(TileId, Direction),
}

impl AnyTileId {
    pub fn id(self) -> TileId {
        match self {
            AnyTileId::Terrain(id) | AnyTileId::Actor(id, _) => id,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            AnyTileId::Terrain(_) => None,
            AnyTileId::Actor(_, dir) => Some(dir),
        }
    }

    /// Key used to look up an actor of `kind` facing `facing`.
    ///
    /// Animation effects have no facing, so they collapse to a bare key.
    pub fn for_actor(kind: TileId, facing: Direction) -> Self {
        if kind.is_animation() {
            AnyTileId::Terrain(kind)
        } else {
            AnyTileId::Actor(kind, facing)
        }
    }
}

impl From<TileId> for AnyTileId {
    fn from(id: TileId) -> Self {
        AnyTileId::Terrain(id)
    }
}

impl fmt::Display for AnyTileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyTileId::Terrain(id) => write!(f, "{}", id),
            AnyTileId::Actor(id, dir) => write!(f, "{}:{}", id, dir),
        }
    }
}

/// A cell on the level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Levels are 32 cells wide; the engine packs positions as `x + y * 32`.
    pub const MAP_WIDTH: i32 = 32;

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn from_index(idx: i32) -> Self {
        Self { x: idx % Self::MAP_WIDTH, y: idx / Self::MAP_WIDTH }
    }

    pub const fn to_index(self) -> i32 {
        self.x + self.y * Self::MAP_WIDTH
    }

    pub const fn neighbor(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self { x: self.x + dx, y: self.y + dy }
    }
}
