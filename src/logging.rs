use std::fs::File;
use std::path::Path;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use crate::config::ensure_parent_dir;
use crate::error::AppError;

/// Routes `log` records to `path`.
///
/// The terminal is in raw mode on the alternate screen while a game runs,
/// so records go to a file instead of stderr.
pub fn init(path: &Path, level: LevelFilter) -> Result<(), AppError> {
    ensure_parent_dir(path)?;
    let file = File::create(path)?;

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    WriteLogger::init(level, config, file)?;
    Ok(())
}
