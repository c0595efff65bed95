//! Logger setup for the `tsheet` binary
//!
//! Library code only talks to the `log` facade; the binary decides where
//! records go. Output is stderr so stdout stays clean for `--json`.

use flexi_logger::{DeferredNow, FlexiLoggerError, Logger, LoggerHandle};
use log::Record;
use std::io::Write;

/// Level spec for a `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Start logging to stderr.
///
/// With no `-v` flags the `RUST_LOG` environment variable is honoured and
/// the level defaults to `warn`; explicit flags take precedence.
pub fn init(verbose: u8) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = if verbose == 0 {
        Logger::try_with_env_or_str(level_for_verbosity(0))?
    } else {
        Logger::try_with_str(level_for_verbosity(verbose))?
    };

    logger.log_to_stderr().format(stderr_format).start()
}

fn stderr_format(write: &mut dyn Write, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
    write!(
        write,
        "{} {:5} [{}] {}",
        now.format("%H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("<unknown>"),
        record.args()
    )
}
