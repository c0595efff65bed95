//! The tileset currently used for drawing
//!
//! Switching rulesets replaces the whole tileset. The replacement is built
//! before the old one is dropped, so a failed load leaves the previous
//! tileset in place.

use image::RgbaImage;
use std::path::Path;

use super::{load_tileset_file, load_with_convention, Tileset, TilesetError};
use crate::level::Ruleset;

pub struct ActiveTileset {
    ruleset: Ruleset,
    tileset: Box<dyn Tileset>,
}

impl ActiveTileset {
    /// Load the sheet at `path` with the convention `ruleset` draws with.
    pub fn open(ruleset: Ruleset, path: &Path) -> Result<Self, TilesetError> {
        let tileset = load_for(ruleset, path)?;
        Ok(Self { ruleset, tileset })
    }

    /// Load the sheet at `path`, picking the ruleset from its convention.
    pub fn detect(path: &Path) -> Result<Self, TilesetError> {
        let tileset = load_tileset_file(path)?;
        let ruleset = Ruleset::for_convention(tileset.convention());
        Ok(Self { ruleset, tileset })
    }

    pub fn from_image(ruleset: Ruleset, image: &RgbaImage) -> Result<Self, TilesetError> {
        let tileset = load_with_convention(image, ruleset.convention())?;
        Ok(Self { ruleset, tileset })
    }

    pub fn ruleset(&self) -> Ruleset {
        self.ruleset
    }

    pub fn get(&self) -> &dyn Tileset {
        self.tileset.as_ref()
    }

    /// Replace the tileset with an already built one.
    pub fn swap(&mut self, ruleset: Ruleset, tileset: Box<dyn Tileset>) -> Box<dyn Tileset> {
        log::info!("switching tileset from {} to {}", self.ruleset, ruleset);
        self.ruleset = ruleset;
        std::mem::replace(&mut self.tileset, tileset)
    }

    /// Load the sheet for `ruleset` and make it active.
    ///
    /// On error the current tileset stays active.
    pub fn switch_ruleset(&mut self, ruleset: Ruleset, path: &Path) -> Result<(), TilesetError> {
        let tileset = load_for(ruleset, path)?;
        self.swap(ruleset, tileset);
        Ok(())
    }
}

impl std::fmt::Debug for ActiveTileset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveTileset")
            .field("ruleset", &self.ruleset)
            .field("convention", &self.tileset.convention())
            .field("tile_size", &self.tileset.tile_size())
            .finish()
    }
}

fn load_for(ruleset: Ruleset, path: &Path) -> Result<Box<dyn Tileset>, TilesetError> {
    let image = image::open(path)?.to_rgba8();
    load_with_convention(&image, ruleset.convention())
}
