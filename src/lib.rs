//! Tilesheet - sprite-sheet ingestion and sprite lookup for Tile World style tilesets
//!
//! This library provides functionality to:
//! - Load MS (fixed 7x16 grid) and Lynx (self-describing) tile sheets
//! - Look up the pixel region for any terrain, actor facing or animation frame
//! - Turn a level snapshot into draw calls for a scrolling viewport

pub mod cli;
pub mod config;
pub mod level;
pub mod logging;
pub mod output;
pub mod resolver;
pub mod telemetry;
#[doc(hidden)]
pub mod testing;
pub mod tile;
pub mod tileset;
pub mod viewport;
