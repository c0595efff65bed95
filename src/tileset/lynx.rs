//! Self-describing ("Lynx") tilesets
//!
//! A Lynx sheet carries its own layout. The color at pixel (1,0) is the
//! terminator: it keys out transparency and it fills the one-pixel border
//! row above every tile row, where a non-terminator marker pixel closes each
//! tile. Column 0 is a border column that is terminator-colored down every
//! tile row and holds a marker at the start of each border row.
//!
//! ```text
//!  x: 0         ts        2ts
//!     M t t t t M t t t t M t t ...   <- border row (M = marker, t = terminator)
//!     t [tile 0 ] [tile 1 ] ...
//!     t [       ] [       ]
//!     M t t t t t t t t M ...         <- next border row
//! ```
//!
//! Regions are read left to right, top to bottom, in [`LYNX_LAYOUT`] order.
//! A region's size in tiles selects how its frames are assigned.

use image::{Rgba, RgbaImage};
use std::collections::HashMap;

use super::catalog::{LynxImageKind, LynxSlot, LYNX_ALIASES, LYNX_LAYOUT};
use super::{
    mask_out_color, Convention, IndexEntry, Placement, Point, Rect, SpriteRegion, Tileset, TilesetError,
};
use crate::resolver::{actor_frame_index, terrain_frame_index};
use crate::tile::{AnyTileId, Direction, TileId};

/// Walks terminator runs in a sheet.
struct TerminatorScanner<'a> {
    image: &'a RgbaImage,
    terminator: Rgba<u8>,
}

impl<'a> TerminatorScanner<'a> {
    fn new(image: &'a RgbaImage, terminator: Rgba<u8>) -> Self {
        Self { image, terminator }
    }

    fn is_terminator(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel_checked(x, y) == Some(&self.terminator)
    }

    /// Distance from the marker at `(x, y)` to the next marker on its row.
    ///
    /// `None` when the row has no further tiles: the cursor is on the last
    /// column, or terminator pixels run to the right edge.
    fn horizontal(&self, x: u32, y: u32) -> Option<u32> {
        let width = self.image.width();
        if y >= self.image.height() || x + 1 >= width {
            return None;
        }
        let mut tile_width = 1;
        while self.is_terminator(x + tile_width, y) {
            tile_width += 1;
            if x + tile_width == width {
                return None;
            }
        }
        Some(tile_width)
    }

    /// Number of terminator pixels directly below `(x, y)`.
    ///
    /// `None` when the cursor is on the last row or the run reaches the
    /// bottom edge without a closing marker.
    fn vertical(&self, x: u32, y: u32) -> Option<u32> {
        let height = self.image.height();
        if x >= self.image.width() || y + 1 >= height {
            return None;
        }
        let mut tile_height = 1;
        while self.is_terminator(x, y + tile_height) {
            tile_height += 1;
            if y + tile_height == height {
                return None;
            }
        }
        Some(tile_height - 1)
    }
}

/// Measured width and height of the first tile, from the signature corner.
pub fn detect_tile_size(image: &RgbaImage) -> Result<(u32, u32), TilesetError> {
    if image.width() < 2 || image.height() < 2 {
        return Err(TilesetError::InvalidTerminators);
    }
    let first_marker = *image.get_pixel(0, 0);
    let terminator = *image.get_pixel(1, 0);
    if first_marker == terminator || terminator != *image.get_pixel(0, 1) {
        return Err(TilesetError::InvalidTerminators);
    }

    let scanner = TerminatorScanner::new(image, terminator);
    let width = scanner.horizontal(0, 0).ok_or(TilesetError::UnterminatedScan)?;
    let height = scanner.vertical(0, 0).ok_or(TilesetError::UnterminatedScan)?;
    Ok((width, height))
}

/// Frame records for an actor, indexed North, West, South, East.
fn actor_layout(first: Point, ts: u32, width: u32, height: u32) -> Option<[SpriteRegion; 4]> {
    let normal = |frames: Vec<Point>| SpriteRegion::new(Placement::Normal, frames);
    let layout = match (width, height) {
        // One sprite for every facing
        (1, 1) => [
            SpriteRegion::single(first),
            SpriteRegion::single(first),
            SpriteRegion::single(first),
            SpriteRegion::single(first),
        ],
        // One sprite for North/South, the other for East/West
        (2, 1) | (1, 2) => {
            let other = if width == 2 { first.tiles(ts, 1, 0) } else { first.tiles(ts, 0, 1) };
            [
                SpriteRegion::single(first),
                SpriteRegion::single(other),
                SpriteRegion::single(first),
                SpriteRegion::single(other),
            ]
        }
        (4, 1) => [
            SpriteRegion::single(first),
            SpriteRegion::single(first.tiles(ts, 1, 0)),
            SpriteRegion::single(first.tiles(ts, 2, 0)),
            SpriteRegion::single(first.tiles(ts, 3, 0)),
        ],
        (2, 2) => [
            SpriteRegion::single(first),
            SpriteRegion::single(first.tiles(ts, 1, 0)),
            SpriteRegion::single(first.tiles(ts, 0, 1)),
            SpriteRegion::single(first.tiles(ts, 1, 1)),
        ],
        // Four frames per facing, row-major
        (8, 2) => {
            let frames: Vec<Point> = (0..16).map(|idx| first.tiles(ts, idx % 8, idx / 8)).collect();
            [
                normal(frames[0..4].to_vec()),
                normal(frames[4..8].to_vec()),
                normal(frames[8..12].to_vec()),
                normal(frames[12..16].to_vec()),
            ]
        }
        // Stretchy sprites: 1x2 vertical frames, then 2x1 horizontal frames
        (16, 2) => {
            let vertical: Vec<Point> = (0..8).map(|idx| first.tiles(ts, idx, 0)).collect();
            let west: Vec<Point> = (0..4).map(|idx| first.tiles(ts, 8 + 2 * idx, 0)).collect();
            let east: Vec<Point> = (0..4).map(|idx| first.tiles(ts, 8 + 2 * idx, 1)).collect();
            [
                SpriteRegion::new(Placement::Stretch, vertical[0..4].to_vec()),
                SpriteRegion::new(Placement::Stretch, west),
                SpriteRegion::new(Placement::Stretch, vertical[4..8].to_vec()),
                SpriteRegion::new(Placement::Stretch, east),
            ]
        }
        _ => return None,
    };
    Some(layout)
}

/// Turn one measured region into index records.
fn classify(
    slot: &LynxSlot,
    first: Point,
    tile_size: u32,
    width: u32,
    height: u32,
    index: &mut HashMap<AnyTileId, SpriteRegion>,
) -> Result<(), TilesetError> {
    let tile = slot.id;
    if height != 1 && matches!(slot.kind, LynxImageKind::NormalSingle | LynxImageKind::Normal) {
        return Err(TilesetError::MultiRowTerrain { tile, width, height });
    }

    match slot.kind {
        LynxImageKind::NormalSingle => {
            if width != 1 {
                return Err(TilesetError::MultiFrameSingle { tile, width, height });
            }
            index.insert(tile, SpriteRegion::single(first));
        }
        LynxImageKind::Normal => {
            let frames = (0..width).map(|idx| first.tiles(tile_size, idx, 0)).collect();
            index.insert(tile, SpriteRegion::new(Placement::Normal, frames));
        }
        LynxImageKind::Animation => {
            if width % 3 != 0 || height != 3 {
                return Err(TilesetError::BadAnimation { tile, width, height });
            }
            let frames = (0..width / 3).map(|idx| first.tiles(tile_size, 3 * idx, 0)).collect();
            index.insert(tile, SpriteRegion::new(Placement::ThreeByThree, frames));
        }
        LynxImageKind::Actor => {
            let kind = tile.id();
            let records = actor_layout(first, tile_size, width, height)
                .ok_or(TilesetError::UnrecognizedActorLayout { tile: kind, width, height })?;
            for (dir, record) in Direction::CARDINALS.into_iter().zip(records) {
                index.insert(AnyTileId::Actor(kind, dir), record);
            }
        }
    }
    Ok(())
}

/// Walk the sheet in catalog order and build the full index.
///
/// The index is only returned once every region has been read, so a
/// malformed sheet never yields a partial index.
fn build_index(
    image: &RgbaImage,
    terminator: Rgba<u8>,
    tile_size: u32,
) -> Result<HashMap<AnyTileId, SpriteRegion>, TilesetError> {
    let scanner = TerminatorScanner::new(image, terminator);
    let mut index = HashMap::new();

    let mut x = 0;
    let mut y = 0;
    // Height of the current row, in tiles
    let mut row_height = 1;

    for slot in LYNX_LAYOUT.iter() {
        let pixel_width = loop {
            if let Some(width) = scanner.horizontal(x, y) {
                break width;
            }
            x = 0;
            y += row_height * tile_size + 1;
            let pixel_height = scanner
                .vertical(x, y)
                .ok_or(TilesetError::MissingFinalTerminator { tile: slot.id })?;
            if pixel_height == 0 || pixel_height % tile_size != 0 {
                return Err(TilesetError::InvalidTileSize {
                    tile: slot.id,
                    width: 0,
                    height: pixel_height,
                    tile_size,
                });
            }
            row_height = pixel_height / tile_size;
        };

        if pixel_width % tile_size != 0 {
            return Err(TilesetError::InvalidTileSize {
                tile: slot.id,
                width: pixel_width,
                height: row_height * tile_size,
                tile_size,
            });
        }
        let width = pixel_width / tile_size;
        log::debug!("{} at ({}, {}): {}x{}", slot.id, x, y, width, row_height);

        classify(slot, Point::new(x + 1, y + 1), tile_size, width, row_height, &mut index)?;
        x += pixel_width;
    }

    for (alias, target) in LYNX_ALIASES.iter() {
        if let Some(record) = index.get(target).cloned() {
            index.insert(*alias, record);
        }
    }

    Ok(index)
}

/// A tileset parsed from a self-describing sheet.
#[derive(Debug, Clone)]
pub struct LynxTileset {
    image: RgbaImage,
    tile_size: u32,
    terminator: Rgba<u8>,
    index: HashMap<AnyTileId, SpriteRegion>,
}

impl LynxTileset {
    /// True when the corner pixels form a terminator signature that the
    /// first tile can be measured from.
    pub fn looks_like(image: &RgbaImage) -> bool {
        detect_tile_size(image).is_ok()
    }

    pub fn from_image(image: &RgbaImage) -> Result<Self, TilesetError> {
        let (width, height) = detect_tile_size(image)?;
        if width != height {
            return Err(TilesetError::NonSquare { width, height });
        }
        let tile_size = width;
        let terminator = *image.get_pixel(1, 0);
        let index = build_index(image, terminator, tile_size)?;

        Ok(Self { image: mask_out_color(image, terminator), tile_size, terminator, index })
    }

    /// The sheet's terminator/transparency color.
    pub fn terminator(&self) -> Rgba<u8> {
        self.terminator
    }

    /// The full record for `id`, if indexed.
    pub fn region(&self, id: AnyTileId) -> Option<&SpriteRegion> {
        self.index.get(&id)
    }

    fn record(&self, id: AnyTileId) -> &SpriteRegion {
        match self.index.get(&id) {
            Some(record) => record,
            None => panic!("Lynx tileset has no sprite for {}", id),
        }
    }
}

impl Tileset for LynxTileset {
    fn convention(&self) -> Convention {
        Convention::Lynx
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn lookup_terrain(&self, id: AnyTileId, tick: u32) -> Rect {
        let record = self.record(id);
        let frame = record.frames[terrain_frame_index(tick, record.frame_count())];
        // Terrain fills one cell even when aliased to a larger actor frame
        Placement::Normal.rect(frame, self.tile_size, None)
    }

    fn lookup_actor(&self, kind: TileId, facing: Direction, animation_frame: i8) -> (Placement, Rect) {
        let id = AnyTileId::for_actor(kind, facing);
        let record = self.record(id);
        let frame = record.frames[actor_frame_index(animation_frame, record.frame_count(), true)];
        (record.placement, record.placement.rect(frame, self.tile_size, id.direction()))
    }

    fn entries(&self) -> Vec<IndexEntry> {
        let mut entries: Vec<IndexEntry> = self
            .index
            .iter()
            .map(|(id, record)| IndexEntry {
                id: *id,
                placement: record.placement,
                frames: record
                    .frames
                    .iter()
                    .map(|frame| record.placement.rect(*frame, self.tile_size, id.direction()))
                    .collect(),
            })
            .collect();
        entries.sort_by_key(|entry| entry.id);
        entries
    }

    fn contains(&self, id: AnyTileId) -> bool {
        self.index.contains_key(&id)
    }
}
