//! tsheet - command-line tool for inspecting and slicing Tile World tilesets

use std::process::ExitCode;

use tilesheet::cli;

fn main() -> ExitCode {
    cli::run()
}
