//! Static layout tables for both sheet conventions
//!
//! The order of these tables is part of each sheet format: slot `n` of a
//! table is the `n`-th tile region in the image. They are read-only data,
//! never mutated after compilation.

use crate::tile::{AnyTileId, Direction, TileId};

/// Columns in an MS sheet.
pub const MS_COLUMNS: u32 = 7;
/// Rows in an MS sheet.
pub const MS_ROWS: u32 = 16;

const fn t(id: TileId) -> Option<AnyTileId> {
    Some(AnyTileId::Terrain(id))
}

const fn a(id: TileId, dir: Direction) -> Option<AnyTileId> {
    Some(AnyTileId::Actor(id, dir))
}

const N: Direction = Direction::NORTH;
const W: Direction = Direction::WEST;
const S: Direction = Direction::SOUTH;
const E: Direction = Direction::EAST;

/// MS grid slots. Slots are filled column-major: slot `i` sits in column
/// `i / 16`, row `i % 16`. `None` marks art that no identity uses.
pub static MS_LAYOUT: [Option<AnyTileId>; (MS_COLUMNS * MS_ROWS) as usize] = [
    // Column 0
    t(TileId::Empty),
    t(TileId::Wall),
    t(TileId::IcChip),
    t(TileId::Water),
    t(TileId::Fire),
    t(TileId::HiddenWallPerm),
    t(TileId::WallNorth),
    t(TileId::WallWest),
    t(TileId::WallSouth),
    t(TileId::WallEast),
    t(TileId::BlockStatic),
    t(TileId::Dirt),
    t(TileId::Ice),
    t(TileId::SlideSouth),
    a(TileId::Block, N),
    a(TileId::Block, W),
    // Column 1
    a(TileId::Block, S),
    a(TileId::Block, E),
    t(TileId::SlideNorth),
    t(TileId::SlideEast),
    t(TileId::SlideWest),
    t(TileId::Exit),
    t(TileId::DoorBlue),
    t(TileId::DoorRed),
    t(TileId::DoorGreen),
    t(TileId::DoorYellow),
    t(TileId::IceWallNorthwest),
    t(TileId::IceWallNortheast),
    t(TileId::IceWallSoutheast),
    t(TileId::IceWallSouthwest),
    t(TileId::BlueWallFake),
    t(TileId::BlueWallReal),
    // Column 2
    None,
    t(TileId::Burglar),
    t(TileId::Socket),
    t(TileId::ButtonGreen),
    t(TileId::ButtonRed),
    t(TileId::SwitchWallClosed),
    t(TileId::SwitchWallOpen),
    t(TileId::ButtonBrown),
    t(TileId::ButtonBlue),
    t(TileId::Teleport),
    t(TileId::Bomb),
    t(TileId::Beartrap),
    t(TileId::HiddenWallTemp),
    t(TileId::Gravel),
    t(TileId::PopupWall),
    t(TileId::HintButton),
    // Column 3
    t(TileId::WallSoutheast),
    t(TileId::CloneMachine),
    t(TileId::SlideRandom),
    t(TileId::DrownedChip),
    t(TileId::BurnedChip),
    t(TileId::BombedChip),
    None,
    None,
    None,
    t(TileId::ExitedChip),
    t(TileId::ExitExtra1),
    t(TileId::ExitExtra2),
    a(TileId::SwimmingChip, N),
    a(TileId::SwimmingChip, W),
    a(TileId::SwimmingChip, S),
    a(TileId::SwimmingChip, E),
    // Column 4
    a(TileId::Bug, N),
    a(TileId::Bug, W),
    a(TileId::Bug, S),
    a(TileId::Bug, E),
    a(TileId::Fireball, N),
    a(TileId::Fireball, W),
    a(TileId::Fireball, S),
    a(TileId::Fireball, E),
    a(TileId::Ball, N),
    a(TileId::Ball, W),
    a(TileId::Ball, S),
    a(TileId::Ball, E),
    a(TileId::Tank, N),
    a(TileId::Tank, W),
    a(TileId::Tank, S),
    a(TileId::Tank, E),
    // Column 5
    a(TileId::Glider, N),
    a(TileId::Glider, W),
    a(TileId::Glider, S),
    a(TileId::Glider, E),
    a(TileId::Teeth, N),
    a(TileId::Teeth, W),
    a(TileId::Teeth, S),
    a(TileId::Teeth, E),
    a(TileId::Walker, N),
    a(TileId::Walker, W),
    a(TileId::Walker, S),
    a(TileId::Walker, E),
    a(TileId::Blob, N),
    a(TileId::Blob, W),
    a(TileId::Blob, S),
    a(TileId::Blob, E),
    // Column 6
    a(TileId::Paramecium, N),
    a(TileId::Paramecium, W),
    a(TileId::Paramecium, S),
    a(TileId::Paramecium, E),
    t(TileId::KeyBlue),
    t(TileId::KeyRed),
    t(TileId::KeyGreen),
    t(TileId::KeyYellow),
    t(TileId::BootsWater),
    t(TileId::BootsFire),
    t(TileId::BootsIce),
    t(TileId::BootsSlide),
    a(TileId::Chip, N),
    a(TileId::Chip, W),
    a(TileId::Chip, S),
    a(TileId::Chip, E),
];

/// How a Lynx sheet region is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LynxImageKind {
    /// Terrain with exactly one frame.
    NormalSingle,
    /// Terrain with one or more frames in a single row.
    Normal,
    /// Directional actor; the footprint picks one of seven layouts.
    Actor,
    /// One-shot effect made of 3x3 frames.
    Animation,
}

/// One region of a Lynx sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LynxSlot {
    pub id: AnyTileId,
    pub kind: LynxImageKind,
}

const fn single(id: TileId) -> LynxSlot {
    LynxSlot { id: AnyTileId::Terrain(id), kind: LynxImageKind::NormalSingle }
}

const fn normal(id: TileId) -> LynxSlot {
    LynxSlot { id: AnyTileId::Terrain(id), kind: LynxImageKind::Normal }
}

const fn actor(id: TileId) -> LynxSlot {
    LynxSlot { id: AnyTileId::Terrain(id), kind: LynxImageKind::Actor }
}

const fn animation(id: TileId) -> LynxSlot {
    LynxSlot { id: AnyTileId::Terrain(id), kind: LynxImageKind::Animation }
}

const fn facing(id: TileId, dir: Direction) -> LynxSlot {
    LynxSlot { id: AnyTileId::Actor(id, dir), kind: LynxImageKind::NormalSingle }
}

/// Lynx sheet regions in left-to-right, top-to-bottom order.
///
/// Actor slots use a bare key; the parser expands them into one record per
/// facing.
pub static LYNX_LAYOUT: [LynxSlot; 75] = [
    single(TileId::Empty),
    normal(TileId::SlideNorth),
    normal(TileId::SlideWest),
    normal(TileId::SlideSouth),
    normal(TileId::SlideEast),
    normal(TileId::SlideRandom),
    normal(TileId::Ice),
    normal(TileId::IceWallNorthwest),
    normal(TileId::IceWallNortheast),
    normal(TileId::IceWallSouthwest),
    normal(TileId::IceWallSoutheast),
    normal(TileId::Gravel),
    normal(TileId::Dirt),
    normal(TileId::Water),
    normal(TileId::Fire),
    normal(TileId::Bomb),
    normal(TileId::Beartrap),
    normal(TileId::Burglar),
    normal(TileId::HintButton),
    normal(TileId::ButtonBlue),
    normal(TileId::ButtonGreen),
    normal(TileId::ButtonRed),
    normal(TileId::ButtonBrown),
    normal(TileId::Teleport),
    normal(TileId::Wall),
    normal(TileId::WallNorth),
    normal(TileId::WallWest),
    normal(TileId::WallSouth),
    normal(TileId::WallEast),
    normal(TileId::WallSoutheast),
    normal(TileId::BlueWallReal),
    normal(TileId::SwitchWallOpen),
    normal(TileId::SwitchWallClosed),
    normal(TileId::PopupWall),
    normal(TileId::CloneMachine),
    normal(TileId::DoorRed),
    normal(TileId::DoorBlue),
    normal(TileId::DoorYellow),
    normal(TileId::DoorGreen),
    normal(TileId::Socket),
    normal(TileId::Exit),
    normal(TileId::IcChip),
    normal(TileId::KeyRed),
    normal(TileId::KeyBlue),
    normal(TileId::KeyYellow),
    normal(TileId::KeyGreen),
    normal(TileId::BootsIce),
    normal(TileId::BootsSlide),
    normal(TileId::BootsFire),
    normal(TileId::BootsWater),
    single(TileId::ExitExtra1),
    single(TileId::ExitExtra2),
    single(TileId::BurnedChip),
    single(TileId::BombedChip),
    single(TileId::ExitedChip),
    single(TileId::DrownedChip),
    facing(TileId::SwimmingChip, N),
    facing(TileId::SwimmingChip, W),
    facing(TileId::SwimmingChip, S),
    facing(TileId::SwimmingChip, E),
    actor(TileId::Chip),
    actor(TileId::PushingChip),
    actor(TileId::Block),
    actor(TileId::Tank),
    actor(TileId::Ball),
    actor(TileId::Glider),
    actor(TileId::Fireball),
    actor(TileId::Bug),
    actor(TileId::Paramecium),
    actor(TileId::Teeth),
    actor(TileId::Blob),
    actor(TileId::Walker),
    animation(TileId::WaterSplash),
    animation(TileId::BombExplosion),
    animation(TileId::EntityExplosion),
];

/// Identities a Lynx sheet draws with another identity's art.
pub static LYNX_ALIASES: [(AnyTileId, AnyTileId); 5] = [
    (AnyTileId::Terrain(TileId::HiddenWallPerm), AnyTileId::Terrain(TileId::Empty)),
    (AnyTileId::Terrain(TileId::HiddenWallTemp), AnyTileId::Terrain(TileId::Empty)),
    (AnyTileId::Terrain(TileId::OverlayBuffer), AnyTileId::Terrain(TileId::Empty)),
    (AnyTileId::Terrain(TileId::BlueWallFake), AnyTileId::Terrain(TileId::BlueWallReal)),
    (AnyTileId::Terrain(TileId::BlockStatic), AnyTileId::Actor(TileId::Block, Direction::NORTH)),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ms_layout_identities_are_unique() {
        let ids: Vec<AnyTileId> = MS_LAYOUT.iter().flatten().copied().collect();
        let unique: HashSet<AnyTileId> = ids.iter().copied().collect();
        assert_eq!(ids.len(), 108);
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_lynx_actor_slots_are_bare_actors() {
        for slot in LYNX_LAYOUT.iter() {
            match slot.kind {
                LynxImageKind::Actor => {
                    assert!(matches!(slot.id, AnyTileId::Terrain(id) if id.is_actor() && !id.is_animation()));
                }
                LynxImageKind::Animation => {
                    assert!(matches!(slot.id, AnyTileId::Terrain(id) if id.is_animation()));
                }
                LynxImageKind::Normal => assert!(slot.id.id().is_terrain()),
                LynxImageKind::NormalSingle => {}
            }
        }
    }

    #[test]
    fn test_lynx_aliases_point_at_drawn_regions() {
        let drawn: HashSet<TileId> = LYNX_LAYOUT.iter().map(|slot| slot.id.id()).collect();
        for (alias, target) in LYNX_ALIASES.iter() {
            assert!(!drawn.contains(&alias.id()), "{} is both drawn and aliased", alias);
            assert!(drawn.contains(&target.id()), "{} aliases undrawn {}", alias, target);
        }
    }
}
