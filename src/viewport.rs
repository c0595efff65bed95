//! Scrolling viewport: camera placement, draw-call generation and compositing
//!
//! Each frame the viewport centres on the player, walks the visible cells
//! (plus a one-cell margin so sprites sliding in from the edge are drawn),
//! and emits draw calls in paint order: bottom terrain, top terrain, then
//! every visible actor in engine order.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::Serialize;

use crate::config::ViewportConfig;
use crate::level::{in_bounds, LevelView};
use crate::resolver::{resolve_actor, resolve_terrain, ResolvedSprite, WorldRect};
use crate::tile::{AnyTileId, Position, TileId};
use crate::tileset::{Rect, Tileset};

/// A destination rectangle in output pixels. May extend past the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

/// Copy `source` from the sheet into `target` on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawCall {
    pub source: Rect,
    pub target: TargetRect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Visible width in tiles
    pub width: u32,
    /// Visible height in tiles
    pub height: u32,
    /// Output pixels per sheet pixel
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 9, height: 9, scale: 1.0 }
    }
}

impl From<&ViewportConfig> for Viewport {
    fn from(config: &ViewportConfig) -> Self {
        Self { width: config.width, height: config.height, scale: config.scale }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, scale: 1.0 }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// World position of the top-left corner of the view, in tiles.
    ///
    /// Centres the player's visual position; without a player the view sits
    /// at the map origin.
    pub fn camera(&self, level: &dyn LevelView) -> (f32, f32) {
        match level.player() {
            Some(player) => {
                let (x, y) = player.visual_position();
                (x - self.width as f32 / 2.0 + 0.5, y - self.height as f32 / 2.0 + 0.5)
            }
            None => (0.0, 0.0),
        }
    }

    /// Output size in pixels for sheets with `tile_size` pixel tiles.
    pub fn pixel_size(&self, tile_size: u32) -> (u32, u32) {
        let unit = tile_size as f32 * self.scale;
        ((self.width as f32 * unit).round() as u32, (self.height as f32 * unit).round() as u32)
    }

    /// Draw calls for one frame, in paint order.
    pub fn draw_calls(&self, tileset: &dyn Tileset, level: &dyn LevelView) -> Vec<DrawCall> {
        let camera = self.camera(level);
        let tick = level.current_tick();
        let origin_x = camera.0.floor() as i32;
        let origin_y = camera.1.floor() as i32;

        let mut calls = Vec::new();
        for dy in -1..self.height as i32 + 2 {
            for dx in -1..self.width as i32 + 2 {
                let pos = Position::new(origin_x + dx, origin_y + dy);
                if !in_bounds(pos) {
                    continue;
                }
                for id in [level.bottom_terrain(pos), level.top_terrain(pos)] {
                    if id == AnyTileId::Terrain(TileId::Nothing) {
                        continue;
                    }
                    let sprite = resolve_terrain(tileset, pos, id, tick);
                    calls.push(self.to_screen(&sprite, camera, tileset.tile_size()));
                }
            }
        }

        for actor in level.actors() {
            if actor.hidden {
                continue;
            }
            let sprite = resolve_actor(tileset, &actor);
            if self.is_visible(sprite.target, camera) {
                calls.push(self.to_screen(&sprite, camera, tileset.tile_size()));
            }
        }
        calls
    }

    fn is_visible(&self, target: WorldRect, camera: (f32, f32)) -> bool {
        target.x + target.w > camera.0 - 1.0
            && target.y + target.h > camera.1 - 1.0
            && target.x < camera.0 + self.width as f32 + 1.0
            && target.y < camera.1 + self.height as f32 + 1.0
    }

    fn to_screen(&self, sprite: &ResolvedSprite, camera: (f32, f32), tile_size: u32) -> DrawCall {
        let unit = tile_size as f32 * self.scale;
        let target = TargetRect {
            x: ((sprite.target.x - camera.0) * unit).round() as i32,
            y: ((sprite.target.y - camera.1) * unit).round() as i32,
            w: (sprite.target.w * unit).round() as u32,
            h: (sprite.target.h * unit).round() as u32,
        };
        DrawCall { source: sprite.source, target }
    }

    /// Blit draw calls onto a transparent canvas, alpha blending in order.
    pub fn compose(&self, tileset: &dyn Tileset, calls: &[DrawCall]) -> RgbaImage {
        let (width, height) = self.pixel_size(tileset.tile_size());
        let mut canvas = RgbaImage::new(width, height);
        let sheet = tileset.image();

        for call in calls {
            let Rect { x, y, w, h } = call.source;
            if w == 0 || h == 0 || call.target.w == 0 || call.target.h == 0 {
                continue;
            }
            let mut sprite = imageops::crop_imm(sheet, x, y, w, h).to_image();
            if (call.target.w, call.target.h) != sprite.dimensions() {
                sprite = imageops::resize(&sprite, call.target.w, call.target.h, FilterType::Nearest);
            }
            imageops::overlay(&mut canvas, &sprite, call.target.x as i64, call.target.y as i64);
        }
        canvas
    }

    /// Draw one frame of `level`.
    pub fn render(&self, tileset: &dyn Tileset, level: &dyn LevelView) -> RgbaImage {
        let calls = self.draw_calls(tileset, level);
        self.compose(tileset, &calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{ActorState, Ruleset, StaticLevel};
    use crate::testing::ms_sheet;
    use crate::tile::Direction;
    use crate::tileset::MsTileset;
    use image::Rgba;

    fn level_with_player(x: i32, y: i32) -> StaticLevel {
        let mut level = StaticLevel::new(Ruleset::Ms);
        level.push_actor(ActorState::new(TileId::Chip, Position::new(x, y), Direction::SOUTH));
        level
    }

    #[test]
    fn test_camera_centres_player() {
        let viewport = Viewport::new(3, 3);
        assert_eq!(viewport.camera(&level_with_player(5, 5)), (4.0, 4.0));
        assert_eq!(viewport.camera(&StaticLevel::new(Ruleset::Ms)), (0.0, 0.0));

        let mut level = level_with_player(5, 5);
        level.actors_mut()[0].move_cooldown = 4;
        // Moving south: halfway between (5,4) and (5,5)
        assert_eq!(viewport.camera(&level), (4.0, 3.5));
    }

    #[test]
    fn test_draw_calls_paint_order() {
        let tileset = MsTileset::from_image(&ms_sheet(4)).unwrap();
        let mut level = level_with_player(5, 5);
        level.set_bottom(Position::new(5, 5), TileId::Water);
        level.set_top(Position::new(5, 5), TileId::Wall);
        let mut ghost = ActorState::new(TileId::Bug, Position::new(4, 4), Direction::NORTH);
        ghost.hidden = true;
        level.push_actor(ghost);

        let calls = Viewport::new(3, 3).draw_calls(&tileset, &level);
        // 6x6 cells with a top layer, one bottom tile, one visible actor
        assert_eq!(calls.len(), 36 + 1 + 1);

        let cell = TargetRect { x: 4, y: 4, w: 4, h: 4 };
        let at_cell: Vec<&DrawCall> = calls.iter().filter(|c| c.target == cell).collect();
        assert_eq!(at_cell.len(), 3);
        assert_eq!(at_cell[0].source, tileset.lookup_terrain(TileId::Water.into(), 0));
        assert_eq!(at_cell[1].source, tileset.lookup_terrain(TileId::Wall.into(), 0));
        assert_eq!(at_cell[2].source, tileset.lookup_actor(TileId::Chip, Direction::SOUTH, 0).1);
        assert_eq!(calls.last().unwrap().target, cell);
    }

    #[test]
    fn test_creature_tile_in_top_layer_keeps_facing() {
        let tileset = MsTileset::from_image(&ms_sheet(4)).unwrap();
        let mut level = level_with_player(5, 5);
        let block = TileId::from_raw(0x45).unwrap();
        level.set_top(Position::new(6, 5), block);

        let calls = Viewport::new(3, 3).draw_calls(&tileset, &level);
        let cell = TargetRect { x: 8, y: 4, w: 4, h: 4 };
        let at_cell: Vec<&DrawCall> = calls.iter().filter(|c| c.target == cell).collect();
        assert_eq!(at_cell.len(), 1);
        assert_eq!(at_cell[0].source, tileset.lookup_actor(TileId::Block, Direction::WEST, 0).1);
    }

    #[test]
    fn test_cells_off_the_map_are_skipped() {
        let tileset = MsTileset::from_image(&ms_sheet(2)).unwrap();
        let calls = Viewport::new(3, 3).draw_calls(&tileset, &level_with_player(0, 0));
        // Camera at (-1,-1): only cells 0..=3 on each axis exist
        assert_eq!(calls.len(), 16 + 1);
        assert!(calls.iter().all(|c| c.target.x >= 0 && c.target.y >= 0));
    }

    #[test]
    fn test_pixel_size_applies_scale() {
        assert_eq!(Viewport::new(9, 9).pixel_size(32), (288, 288));
        assert_eq!(Viewport::new(9, 5).with_scale(2.0).pixel_size(4), (72, 40));
        assert_eq!(Viewport::new(3, 3).with_scale(0.5).pixel_size(4), (6, 6));
    }

    #[test]
    fn test_render_composites_sprites() {
        let tileset = MsTileset::from_image(&ms_sheet(4)).unwrap();
        let image = Viewport::new(3, 3).render(&tileset, &level_with_player(5, 5));
        assert_eq!(image.dimensions(), (12, 12));
        // Empty floor is slot 0; Chip facing south is slot 110
        assert_eq!(*image.get_pixel(0, 0), Rgba([0, 64, 64, 255]));
        assert_eq!(*image.get_pixel(4, 4), Rgba([110, 64, 64, 255]));
    }

    #[test]
    fn test_render_scales_nearest() {
        let tileset = MsTileset::from_image(&ms_sheet(2)).unwrap();
        let image = Viewport::new(3, 3).with_scale(2.0).render(&tileset, &level_with_player(5, 5));
        assert_eq!(image.dimensions(), (12, 12));
        assert_eq!(*image.get_pixel(4, 4), Rgba([110, 64, 64, 255]));
        assert_eq!(*image.get_pixel(5, 5), Rgba([110, 64, 64, 255]));
    }
}
