//! Fixed-grid ("MS") tilesets
//!
//! An MS sheet is a 7x16 grid of square tiles with one static frame per
//! identity, keyed with magenta.

use image::{Rgba, RgbaImage};
use std::collections::HashMap;

use super::catalog::{MS_COLUMNS, MS_LAYOUT, MS_ROWS};
use super::{mask_out_color, Convention, IndexEntry, Placement, Point, Rect, Tileset, TilesetError};
use crate::tile::{AnyTileId, Direction, TileId};

/// Transparency color of MS sheets.
pub const MS_TRANSPARENT: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// A tileset laid out on the fixed MS grid.
#[derive(Debug, Clone)]
pub struct MsTileset {
    image: RgbaImage,
    tile_size: u32,
    index: HashMap<AnyTileId, Point>,
}

impl MsTileset {
    /// Width divisible by 7, height by 16, and square cells.
    pub fn looks_like(image: &RgbaImage) -> bool {
        let (width, height) = image.dimensions();
        if width == 0 || width % MS_COLUMNS != 0 || height % MS_ROWS != 0 {
            return false;
        }
        width / MS_COLUMNS == height / MS_ROWS
    }

    pub fn from_image(image: &RgbaImage) -> Result<Self, TilesetError> {
        if !Self::looks_like(image) {
            return Err(TilesetError::Validation(format!(
                "{}x{} is not a {}x{} grid of square tiles",
                image.width(),
                image.height(),
                MS_COLUMNS,
                MS_ROWS
            )));
        }
        let tile_size = image.height() / MS_ROWS;

        let mut index = HashMap::new();
        for (slot, id) in MS_LAYOUT.iter().enumerate() {
            if let Some(id) = id {
                let slot = slot as u32;
                let origin = Point::new(slot / MS_ROWS * tile_size, slot % MS_ROWS * tile_size);
                index.insert(*id, origin);
            }
        }

        Ok(Self { image: mask_out_color(image, MS_TRANSPARENT), tile_size, index })
    }

    fn origin(&self, id: AnyTileId) -> Point {
        match self.index.get(&id) {
            Some(origin) => *origin,
            None => panic!("MS tileset has no sprite for {}", id),
        }
    }

    fn cell(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.tile_size, self.tile_size)
    }
}

impl Tileset for MsTileset {
    fn convention(&self) -> Convention {
        Convention::Ms
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn lookup_terrain(&self, id: AnyTileId, _tick: u32) -> Rect {
        self.cell(self.origin(id))
    }

    fn lookup_actor(&self, kind: TileId, facing: Direction, _animation_frame: i8) -> (Placement, Rect) {
        let origin = self.origin(AnyTileId::for_actor(kind, facing));
        (Placement::Normal, self.cell(origin))
    }

    fn entries(&self) -> Vec<IndexEntry> {
        let mut entries: Vec<IndexEntry> = self
            .index
            .iter()
            .map(|(id, origin)| IndexEntry {
                id: *id,
                placement: Placement::Normal,
                frames: vec![self.cell(*origin)],
            })
            .collect();
        entries.sort_by_key(|entry| entry.id);
        entries
    }

    fn contains(&self, id: AnyTileId) -> bool {
        self.index.contains_key(&id)
    }
}
