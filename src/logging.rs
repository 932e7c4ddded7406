//! Diagnostic logging to a file.
//!
//! The terminal belongs to the commands the shell runs, so log records only
//! ever go to the file named on the command line.

use crate::error::ShellResult;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::OpenOptions;
use std::path::Path;

/// Installs a global logger appending to `path` at `level`.
///
/// Fails if the file cannot be opened or a logger is already installed.
pub fn init(path: &Path, level: LevelFilter) -> ShellResult<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    WriteLogger::init(level, config, file)?;
    Ok(())
}
