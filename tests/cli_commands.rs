//! CLI integration tests for the `tsheet` binary.
//!
//! Each test writes synthetic sheets into a scratch directory and runs the
//! binary there, so config discovery and the error log never leak outside
//! the test.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tilesheet::testing::{lynx_sheet, ms_sheet, MAGENTA};
use tilesheet::tile::TileId;

/// Scratch directory the binary runs in.
struct Sandbox {
    dir: TempDir,
}

/// Captured result of one invocation.
struct Run {
    stdout: String,
    stderr: String,
    code: Option<i32>,
}

impl Sandbox {
    fn new() -> Self {
        let sandbox = Self { dir: TempDir::new().expect("temp dir") };
        sandbox.write_image("atiles.png", &lynx_sheet(4).footprint(TileId::Water.into(), 4, 1).build());
        sandbox.write_image("tiles.png", &ms_sheet(4));
        sandbox
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_image(&self, name: &str, image: &image::RgbaImage) {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        image.save(&path).unwrap();
    }

    fn write_file(&self, name: &str, contents: &str) {
        fs::write(self.path(name), contents).unwrap();
    }

    fn run(&self, args: &[&str]) -> Run {
        let output = Command::new(env!("CARGO_BIN_EXE_tsheet"))
            .args(args)
            .current_dir(self.dir.path())
            .env("XDG_CONFIG_HOME", self.path("xdg"))
            .env("HOME", self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute tsheet");
        Run {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        }
    }
}

fn png_dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).expect("readable PNG")
}

// ============================================================================
// detect
// ============================================================================

#[test]
fn test_detect_text_output() {
    let sandbox = Sandbox::new();
    sandbox.write_image("blank.png", &image::RgbaImage::new(10, 10));

    let run = sandbox.run(&["detect", "atiles.png", "tiles.png", "blank.png"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(run.stdout.contains("atiles.png: lynx"));
    assert!(run.stdout.contains("tiles.png: ms"));
    assert!(run.stdout.contains("blank.png: unrecognized"));
}

#[test]
fn test_detect_directory_json() {
    let sandbox = Sandbox::new();
    sandbox.write_image("nested/more.png", &ms_sheet(2));

    let run = sandbox.run(&["detect", ".", "--json"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let json: serde_json::Value = serde_json::from_str(&run.stdout).expect("valid JSON");
    let results = json.as_array().expect("array of detections");
    assert_eq!(results.len(), 3);

    let nested = results.iter().find(|r| r["file"].as_str().unwrap().ends_with("more.png")).unwrap();
    assert_eq!(nested["convention"], "ms");
    assert_eq!(nested["tile_size"], 2);
    let lynx = results.iter().find(|r| r["file"].as_str().unwrap().ends_with("atiles.png")).unwrap();
    assert_eq!(lynx["tile_size"], 4);
}

#[test]
fn test_detect_unreadable_file_fails() {
    let sandbox = Sandbox::new();
    sandbox.write_file("broken.png", "not an image");

    let run = sandbox.run(&["detect", "broken.png", "tiles.png"]);
    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("broken.png"));
    assert!(run.stdout.contains("tiles.png: ms"));
}

#[test]
fn test_detect_empty_directory_fails() {
    let sandbox = Sandbox::new();
    fs::create_dir(sandbox.path("empty")).unwrap();

    let run = sandbox.run(&["detect", "empty"]);
    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("No .bmp or .png files found"));
}

// ============================================================================
// inspect
// ============================================================================

#[test]
fn test_inspect_json_lists_lynx_index() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["inspect", "atiles.png", "--json"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let json: serde_json::Value = serde_json::from_str(&run.stdout).expect("valid JSON");
    assert_eq!(json["convention"], "lynx");
    assert_eq!(json["tile_size"], 4);

    let entries = json["entries"].as_array().unwrap();
    let water = entries.iter().find(|e| e["id"] == "water").unwrap();
    assert_eq!(water["frames"].as_array().unwrap().len(), 4);
    let splash = entries.iter().find(|e| e["id"] == "water_splash").unwrap();
    assert_eq!(splash["placement"], "three_by_three");
}

#[test]
fn test_inspect_text_summary() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["inspect", "tiles.png"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let first = run.stdout.lines().next().unwrap();
    assert_eq!(first, "ms tileset, 28x64 px, 4px tiles, 108 sprites");
    assert!(run.stdout.contains("chip:south"));
}

#[test]
fn test_inspect_forced_ruleset_mismatch_fails() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["inspect", "tiles.png", "--ruleset", "lynx"]);
    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("Error: Invalid tile terminators"));
}

#[test]
fn test_inspect_uses_configured_sheet() {
    let sandbox = Sandbox::new();
    sandbox.write_image("art/custom.png", &ms_sheet(3));
    sandbox.write_file("tsheet.toml", "[tilesets]\nms = \"art/custom.png\"\n");

    let run = sandbox.run(&["inspect", "--ruleset", "ms", "--json"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let json: serde_json::Value = serde_json::from_str(&run.stdout).unwrap();
    assert_eq!(json["tile_size"], 3);
}

#[test]
fn test_inspect_defaults_to_lynx_sheet() {
    let sandbox = Sandbox::new();

    // Default config names atiles.bmp, which the sandbox does not have
    let run = sandbox.run(&["inspect"]);
    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("Error:"));

    fs::copy(sandbox.path("atiles.png"), sandbox.path("lynx.png")).unwrap();
    sandbox.write_file("tsheet.toml", "[tilesets]\nlynx = \"lynx.png\"\n");
    let run = sandbox.run(&["inspect"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(run.stdout.starts_with("lynx tileset"));
}

// ============================================================================
// extract
// ============================================================================

#[test]
fn test_extract_terrain_frame() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["extract", "atiles.png", "--tile", "water", "--tick", "2", "-o", "out/water.png"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert_eq!(run.stdout.trim(), "out/water.png");
    assert_eq!(png_dimensions(&sandbox.path("out/water.png")), (4, 4));
}

#[test]
fn test_extract_actor_scaled() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["extract", "tiles.png", "--tile", "bug", "--dir", "w", "--scale", "3", "-o", "bug.png"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let sprite = image::open(sandbox.path("bug.png")).unwrap().to_rgba8();
    assert_eq!(sprite.dimensions(), (12, 12));
    // The cell's magenta corner is keyed out
    assert_eq!(sprite.get_pixel(11, 11)[3], 0);
    assert_eq!(sprite.get_pixel(0, 0)[3], 255);
}

#[test]
fn test_extract_scale_from_config() {
    let sandbox = Sandbox::new();
    sandbox.write_file("tsheet.toml", "[viewport]\nscale = 2.0\n");

    let run = sandbox.run(&["extract", "tiles.png", "--tile", "exit", "-o", "exit.png"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert_eq!(png_dimensions(&sandbox.path("exit.png")), (8, 8));
}

#[test]
fn test_extract_rejects_unknown_tile() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["extract", "tiles.png", "--tile", "lava", "-o", "lava.png"]);
    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("Unknown tile 'lava'"));
    assert!(!sandbox.path("lava.png").exists());
}

#[test]
fn test_extract_rejects_bad_scale() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["extract", "tiles.png", "--tile", "wall", "--scale", "0", "-o", "wall.png"]);
    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("viewport.scale"));
}

#[test]
fn test_extract_missing_sprite_fails() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["extract", "tiles.png", "--tile", "pushing_chip", "-o", "push.png"]);
    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("no sprite for pushing_chip"));
}

// ============================================================================
// mask
// ============================================================================

#[test]
fn test_mask_clears_terminator() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["mask", "atiles.png", "-o", "masked.png"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);

    let original = image::open(sandbox.path("atiles.png")).unwrap().to_rgba8();
    let masked = image::open(sandbox.path("masked.png")).unwrap().to_rgba8();
    assert_eq!(masked.dimensions(), original.dimensions());
    assert_eq!(*original.get_pixel(1, 0), MAGENTA);
    assert_eq!(masked.get_pixel(1, 0)[3], 0);
    assert_eq!(masked.get_pixel(0, 0), original.get_pixel(0, 0));
}

// ============================================================================
// preview
// ============================================================================

#[test]
fn test_preview_renders_viewport() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["preview", "tiles.png", "-o", "frame.png"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert_eq!(png_dimensions(&sandbox.path("frame.png")), (36, 36));
}

#[test]
fn test_preview_uses_viewport_config() {
    let sandbox = Sandbox::new();
    sandbox.write_file("tsheet.toml", "[viewport]\nwidth = 5\nheight = 3\n");

    let run = sandbox.run(&["preview", "atiles.png", "--tick", "3", "--scale", "2", "-o", "frame.png"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert_eq!(png_dimensions(&sandbox.path("frame.png")), (40, 24));
}

// ============================================================================
// config and telemetry
// ============================================================================

#[test]
fn test_invalid_config_is_reported() {
    let sandbox = Sandbox::new();
    sandbox.write_file("tsheet.toml", "[viewport]\nwidth = 0\n");

    let run = sandbox.run(&["inspect", "tiles.png"]);
    assert_eq!(run.code, Some(1));
    assert!(run.stderr.contains("viewport.width"));
}

#[test]
fn test_explicit_config_flag() {
    let sandbox = Sandbox::new();
    sandbox.write_file("other.toml", "[viewport]\nscale = 4.0\n");

    let run = sandbox.run(&["extract", "tiles.png", "--tile", "wall", "--config", "other.toml", "-o", "wall.png"]);
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert_eq!(png_dimensions(&sandbox.path("wall.png")), (16, 16));
}

#[test]
fn test_collect_errors_writes_jsonl() {
    let sandbox = Sandbox::new();
    let broken = lynx_sheet(4).footprint(TileId::Glider.into(), 3, 1).build();
    sandbox.write_image("broken.png", &broken);

    let run = sandbox.run(&["inspect", "broken.png", "--collect-errors"]);
    assert_eq!(run.code, Some(1));

    let log = fs::read_to_string(sandbox.path(".tsheet-errors.jsonl")).expect("error log written");
    let entry: serde_json::Value = serde_json::from_str(log.lines().next().unwrap()).unwrap();
    assert_eq!(entry["command"], "inspect");
    assert_eq!(entry["error_type"], "unrecognized_actor_layout");
    assert_eq!(entry["file"], "broken.png");
}

#[test]
fn test_errors_not_collected_by_default() {
    let sandbox = Sandbox::new();

    let run = sandbox.run(&["inspect", "missing.png"]);
    assert_eq!(run.code, Some(1));
    assert!(!sandbox.path(".tsheet-errors.jsonl").exists());
}
