//! Local error telemetry
//!
//! When enabled, tileset load failures are appended to a JSONL file so that
//! broken sheets can be collected and compared later. Entries hold the error
//! kind and message only.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::tileset::TilesetError;

/// One line of the error log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// UTC time, `YYYY-MM-DDTHH:MM:SSZ`
    pub timestamp: String,
    /// CLI command that failed (e.g. "inspect")
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Stable snake_case error kind (e.g. "unrecognized_actor_layout")
    pub error_type: String,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorEntry {
    pub fn new(command: impl Into<String>, error_type: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            timestamp: utc_timestamp(SystemTime::now()),
            command: command.into(),
            file: None,
            error_type: error_type.into(),
            context: context.into(),
            suggestion: None,
        }
    }

    /// Entry describing a failed tileset load.
    pub fn from_tileset_error(command: &str, error: &TilesetError) -> Self {
        let entry = Self::new(command, error_kind(error), error.to_string());
        match suggestion(error) {
            Some(hint) => entry.with_suggestion(hint),
            None => entry,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Stable name of a tileset error kind.
pub fn error_kind(error: &TilesetError) -> &'static str {
    match error {
        TilesetError::Validation(_) => "validation_error",
        TilesetError::Unrecognized => "unrecognized_tileset",
        TilesetError::InvalidTerminators => "invalid_terminators",
        TilesetError::UnterminatedScan => "unterminated_scan",
        TilesetError::NonSquare { .. } => "non_square_tiles",
        TilesetError::MissingFinalTerminator { .. } => "missing_final_terminator",
        TilesetError::InvalidTileSize { .. } => "invalid_tile_size",
        TilesetError::MultiRowTerrain { .. } => "multi_row_terrain",
        TilesetError::MultiFrameSingle { .. } => "multi_frame_single",
        TilesetError::BadAnimation { .. } => "bad_animation",
        TilesetError::UnrecognizedActorLayout { .. } => "unrecognized_actor_layout",
        TilesetError::Image(_) => "image_error",
        TilesetError::Io(_) => "io_error",
    }
}

fn suggestion(error: &TilesetError) -> Option<&'static str> {
    match error {
        TilesetError::Unrecognized => Some(
            "MS sheets must be a 7x16 grid of square tiles; Lynx sheets need a terminator color at pixel (1,0)",
        ),
        TilesetError::MissingFinalTerminator { .. } => {
            Some("add a terminator row under the last row of tiles, starting with a marker pixel")
        }
        TilesetError::UnrecognizedActorLayout { .. } => {
            Some("actor regions must be 1x1, 2x1, 1x2, 4x1, 2x2, 8x2 or 16x2 tiles")
        }
        TilesetError::BadAnimation { .. } => Some("animation regions are a single row of 3x3 tile frames"),
        TilesetError::NonSquare { .. } => Some("the first tile sets the tile size and must be square"),
        _ => None,
    }
}

/// Format `time` as an ISO 8601 UTC timestamp.
fn utc_timestamp(time: SystemTime) -> String {
    let secs = time.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let rem = secs % 86_400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        rem / 3600,
        rem % 3600 / 60,
        rem % 60
    )
}

/// Gregorian date for a count of days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Appends entries to a JSONL file
#[derive(Debug, Clone)]
pub struct ErrorCollector {
    path: PathBuf,
    enabled: bool,
}

impl ErrorCollector {
    pub fn new(path: impl AsRef<Path>, enabled: bool) -> Self {
        Self { path: path.as_ref().to_path_buf(), enabled }
    }

    /// Append one entry. Does nothing when disabled.
    pub fn log(&self, entry: &ErrorEntry) -> std::io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, entry)?;
        writeln!(writer)?;
        writer.flush()
    }
}

// The CLI is single-threaded
thread_local! {
    static COLLECTOR: RefCell<Option<ErrorCollector>> = const { RefCell::new(None) };
}

/// Install the process-wide collector.
pub fn init_collector(path: impl AsRef<Path>, enabled: bool) {
    COLLECTOR.with(|c| *c.borrow_mut() = Some(ErrorCollector::new(path, enabled)));
}

/// Log through the installed collector, if any.
pub fn log_error(entry: &ErrorEntry) {
    COLLECTOR.with(|c| {
        if let Some(collector) = c.borrow().as_ref() {
            if let Err(e) = collector.log(entry) {
                log::warn!("could not write error log: {}", e);
            }
        }
    });
}
