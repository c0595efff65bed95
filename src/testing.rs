//! Synthetic sheet builders for tests and benchmarks
//!
//! Builds well-formed sheets of either convention in memory so tests do not
//! depend on shipped art. Every tile pixel gets a color derived from its slot
//! and frame, which keeps regions distinguishable after a round trip.

use image::{Rgba, RgbaImage};
use std::collections::HashMap;

use crate::tile::AnyTileId;
use crate::tileset::catalog::{LynxImageKind, MS_COLUMNS, MS_ROWS, LYNX_LAYOUT};

/// Terminator and MS transparency color.
pub const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);
/// Marker color closing tiles on Lynx border rows.
pub const MARKER: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Widest row the builder lays out, in tiles.
const MAX_ROW_TILES: u32 = 16;

/// Builder for a Lynx sheet covering the whole layout table.
#[derive(Debug, Clone)]
pub struct LynxSheetBuilder {
    tile_size: u32,
    footprints: HashMap<AnyTileId, (u32, u32)>,
    truncate: usize,
    final_terminator: bool,
}

/// Start a Lynx sheet with `tile_size` pixel tiles and default footprints.
pub fn lynx_sheet(tile_size: u32) -> LynxSheetBuilder {
    assert!(tile_size >= 2, "Lynx sheets need tiles of at least 2px");
    LynxSheetBuilder { tile_size, footprints: HashMap::new(), truncate: 0, final_terminator: true }
}

impl LynxSheetBuilder {
    /// Draw the region for `slot` as `width`x`height` tiles.
    pub fn footprint(mut self, slot: AnyTileId, width: u32, height: u32) -> Self {
        self.footprints.insert(slot, (width, height));
        self
    }

    /// Leave the last `count` regions out of the sheet.
    pub fn truncate(mut self, count: usize) -> Self {
        self.truncate = count;
        self
    }

    /// Omit the border row under the last tile row.
    pub fn without_final_terminator(mut self) -> Self {
        self.final_terminator = false;
        self
    }

    fn footprint_of(&self, slot: AnyTileId, kind: LynxImageKind) -> (u32, u32) {
        if let Some(footprint) = self.footprints.get(&slot) {
            return *footprint;
        }
        match kind {
            LynxImageKind::Animation => (3, 3),
            _ => (1, 1),
        }
    }

    /// Group regions into rows of equal height.
    fn rows(&self) -> Vec<Vec<(usize, u32, u32)>> {
        let count = LYNX_LAYOUT.len().saturating_sub(self.truncate);
        let mut rows: Vec<Vec<(usize, u32, u32)>> = Vec::new();
        let mut current: Vec<(usize, u32, u32)> = Vec::new();
        let mut used = 0;

        for (idx, slot) in LYNX_LAYOUT.iter().take(count).enumerate() {
            let (w, h) = self.footprint_of(slot.id, slot.kind);
            let break_row = match current.first() {
                Some(&(_, _, row_h)) => row_h != h || used + w > MAX_ROW_TILES,
                None => false,
            };
            if break_row {
                rows.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push((idx, w, h));
            used += w;
        }
        if !current.is_empty() {
            rows.push(current);
        }
        rows
    }

    pub fn build(&self) -> RgbaImage {
        let ts = self.tile_size;
        let rows = self.rows();

        let widest = rows
            .iter()
            .map(|row| row.iter().map(|(_, w, _)| w).sum::<u32>())
            .max()
            .unwrap_or(1);
        let width = 1 + widest * ts;
        let content: u32 = rows.iter().map(|row| 1 + row[0].2 * ts).sum();
        let height = content + u32::from(self.final_terminator);

        let mut image = RgbaImage::from_pixel(width, height, MAGENTA);
        let mut y = 0;
        for row in &rows {
            let row_h = row[0].2;
            image.put_pixel(0, y, MARKER);
            let mut x = 0;
            for &(slot, w, _) in row {
                for py in 0..row_h * ts {
                    for px in 0..w * ts {
                        let frame = (px / ts) * 16 + py / ts;
                        image.put_pixel(x + 1 + px, y + 1 + py, Rgba([slot as u8, frame as u8, 128, 255]));
                    }
                }
                x += w * ts;
                image.put_pixel(x, y, MARKER);
            }
            y += 1 + row_h * ts;
        }
        if self.final_terminator {
            image.put_pixel(0, y, MARKER);
        }
        image
    }
}

/// A complete MS sheet with `tile_size` pixel tiles.
///
/// Each cell is filled with a color unique to its slot, and its bottom-right
/// pixel is magenta.
pub fn ms_sheet(tile_size: u32) -> RgbaImage {
    assert!(tile_size >= 2, "MS test sheets need tiles of at least 2px");
    let mut image = RgbaImage::new(MS_COLUMNS * tile_size, MS_ROWS * tile_size);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let (col, row) = (x / tile_size, y / tile_size);
        let last = tile_size - 1;
        *pixel = if x % tile_size == last && y % tile_size == last {
            MAGENTA
        } else {
            Rgba([(col * MS_ROWS + row) as u8, 64, 64, 255])
        };
    }
    image
}
