//! Tilesets - sprite-sheet ingestion and sprite lookup
//!
//! A tileset pairs a chroma-keyed sheet image with an index from tile
//! identity to the pixel region(s) depicting it. Two sheet conventions are
//! supported:
//!
//! - [`MsTileset`]: a fixed 7x16 grid with one static frame per identity.
//! - [`LynxTileset`]: a self-describing sheet whose tile boundaries are
//!   discovered at load time by scanning for a terminator color.
//!
//! The convention of an unknown image is picked at runtime with
//! [`detect_convention`] / [`load_tileset`].

pub mod active;
pub mod catalog;
pub mod lynx;
pub mod ms;

use image::{DynamicImage, Rgba, RgbaImage};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::tile::{AnyTileId, Direction, TileId};

pub use active::ActiveTileset;
pub use lynx::LynxTileset;
pub use ms::MsTileset;

/// A pixel position inside a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Offset by whole tiles.
    pub const fn tiles(self, tile_size: u32, dx: u32, dy: u32) -> Self {
        Self { x: self.x + dx * tile_size, y: self.y + dy * tile_size }
    }
}

/// A pixel rectangle inside a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// How a resolved region is laid onto the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// One 1x1 cell.
    Normal,
    /// A sprite spanning the actor's cell and the cell it is leaving.
    Stretch,
    /// A 3x3 block centred on the cell.
    ThreeByThree,
}

impl Placement {
    /// Size of the region in tiles for an actor facing `facing`.
    pub fn footprint(self, facing: Option<Direction>) -> (u32, u32) {
        match self {
            Placement::Normal => (1, 1),
            Placement::ThreeByThree => (3, 3),
            Placement::Stretch => match facing {
                Some(dir) if dir == Direction::WEST || dir == Direction::EAST => (2, 1),
                _ => (1, 2),
            },
        }
    }

    /// Pixel rectangle of a frame starting at `origin`.
    pub fn rect(self, origin: Point, tile_size: u32, facing: Option<Direction>) -> Rect {
        let (w, h) = self.footprint(facing);
        Rect::new(origin.x, origin.y, w * tile_size, h * tile_size)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Normal => write!(f, "normal"),
            Placement::Stretch => write!(f, "stretch"),
            Placement::ThreeByThree => write!(f, "3x3"),
        }
    }
}

/// A placement plus the ordered frame origins of one composite identity.
///
/// Every frame shares the sheet's tile size; `frames` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpriteRegion {
    pub placement: Placement,
    pub frames: Vec<Point>,
}

impl SpriteRegion {
    pub fn new(placement: Placement, frames: Vec<Point>) -> Self {
        debug_assert!(!frames.is_empty(), "sprite region without frames");
        Self { placement, frames }
    }

    pub fn single(origin: Point) -> Self {
        Self::new(Placement::Normal, vec![origin])
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// The two sheet layout conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// Self-describing sheet with terminator-delimited tiles.
    Lynx,
    /// Fixed 7x16 grid.
    Ms,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Lynx => write!(f, "lynx"),
            Convention::Ms => write!(f, "ms"),
        }
    }
}

/// One entry of a tileset index, for inspection and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub id: AnyTileId,
    pub placement: Placement,
    pub frames: Vec<Rect>,
}

/// Errors raised while validating or parsing a tileset image.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TilesetError {
    /// Image does not fit the requested convention's structure
    #[error("Invalid tileset image: {0}")]
    Validation(String),
    /// Image matches neither convention
    #[error("Unrecognized tileset: image is neither a Lynx nor an MS sheet")]
    Unrecognized,
    /// Pixels (0,0), (1,0) and (0,1) do not form a terminator signature
    #[error("Invalid tile terminators")]
    InvalidTerminators,
    /// A scan ran off the image edge before finding a terminator
    #[error("Reached end of line before finding a terminator")]
    UnterminatedScan,
    /// Detected tile width and height differ
    #[error("Non-square tilesets not supported: detected {width}x{height} tiles")]
    NonSquare { width: u32, height: u32 },
    /// The last tile row has no closing terminator row
    #[error("Tileset lacks a final vertical terminator (while looking for {tile})")]
    MissingFinalTerminator { tile: AnyTileId },
    /// A region is not a whole number of tiles
    #[error("Invalid tile size for {tile}: a {width}x{height} tile in a {tile_size}x{tile_size} tileset")]
    InvalidTileSize { tile: AnyTileId, width: u32, height: u32, tile_size: u32 },
    /// A terrain tile spans more than one row
    #[error("Non-actor tile {tile} must only have one row of tiles, found {width}x{height}")]
    MultiRowTerrain { tile: AnyTileId, width: u32, height: u32 },
    /// A single-frame tile has several frames
    #[error("Tile {tile} must only have one frame, found {width}x{height}")]
    MultiFrameSingle { tile: AnyTileId, width: u32, height: u32 },
    /// Animation footprint is not a row of 3x3 frames
    #[error("Tile {tile} is an animation and must have 3x3 frames, received {width}x{height}")]
    BadAnimation { tile: AnyTileId, width: u32, height: u32 },
    /// Actor footprint matches none of the known layouts
    #[error("Actor {tile} has an unrecognized frame layout {width}x{height}")]
    UnrecognizedActorLayout { tile: TileId, width: u32, height: u32 },
    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The sprite lookup capability shared by both conventions.
///
/// Lookups of identities missing from the index panic: the identity catalog
/// and the sheet layout tables are built together, so a miss means the
/// tables have drifted apart rather than a recoverable condition.
pub trait Tileset: Send + Sync {
    /// Which convention this sheet was parsed with.
    fn convention(&self) -> Convention;

    /// Edge length of one square tile, in pixels.
    fn tile_size(&self) -> u32;

    /// The chroma-keyed sheet that source rectangles refer to.
    fn image(&self) -> &RgbaImage;

    /// Region to blit for a terrain tile at world tick `tick`.
    fn lookup_terrain(&self, id: AnyTileId, tick: u32) -> Rect;

    /// Placement and region for an actor, selecting a frame with the
    /// engine's per-actor animation counter.
    fn lookup_actor(&self, kind: TileId, facing: Direction, animation_frame: i8) -> (Placement, Rect);

    /// Every indexed identity with its frames, sorted by identity.
    fn entries(&self) -> Vec<IndexEntry>;

    /// Whether the index has a sprite for `id`.
    fn contains(&self, id: AnyTileId) -> bool;
}

/// Replace every pixel of `color` with a fully transparent one.
///
/// The color channels are kept; only alpha is cleared.
pub fn mask_out_color(image: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let mut masked = image.clone();
    for pixel in masked.pixels_mut() {
        if *pixel == color {
            pixel.0[3] = 0;
        }
    }
    masked
}

/// Work out which convention an image follows, if any.
///
/// The Lynx signature is checked first since a self-describing sheet can
/// happen to have grid-compatible dimensions.
pub fn detect_convention(image: &RgbaImage) -> Option<Convention> {
    if LynxTileset::looks_like(image) {
        Some(Convention::Lynx)
    } else if MsTileset::looks_like(image) {
        Some(Convention::Ms)
    } else {
        None
    }
}

/// Build a tileset of the given convention.
pub fn load_with_convention(
    image: &RgbaImage,
    convention: Convention,
) -> Result<Box<dyn Tileset>, TilesetError> {
    let tileset: Box<dyn Tileset> = match convention {
        Convention::Lynx => Box::new(LynxTileset::from_image(image)?),
        Convention::Ms => Box::new(MsTileset::from_image(image)?),
    };
    log::info!(
        "loaded {} tileset ({}px tiles, {} entries)",
        convention,
        tileset.tile_size(),
        tileset.entries().len()
    );
    Ok(tileset)
}

/// Build a tileset from an image, detecting its convention.
pub fn load_tileset(image: &DynamicImage) -> Result<Box<dyn Tileset>, TilesetError> {
    let rgba = image.to_rgba8();
    match detect_convention(&rgba) {
        Some(convention) => load_with_convention(&rgba, convention),
        None => {
            log::warn!(
                "{}x{} image matches no tileset convention",
                rgba.width(),
                rgba.height()
            );
            Err(TilesetError::Unrecognized)
        }
    }
}

/// Read an image file and build a tileset from it, detecting its convention.
pub fn load_tileset_file(path: &Path) -> Result<Box<dyn Tileset>, TilesetError> {
    let image = image::open(path)?;
    load_tileset(&image)
}
