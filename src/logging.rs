use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, TermLogger, TerminalMode,
    WriteLogger,
};

/// Log to `<log_dir>/<tool>_<timestamp>.log` (Info, or Debug when verbose)
/// and echo warnings to stderr. Returns the log file path.
pub fn init(log_dir: &Path, tool: &str, verbose: bool) -> Result<PathBuf> {
    create_dir_all(log_dir).with_context(|| format!("Creating {}", log_dir.display()))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("{tool}_{ts}.log"));
    let file_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    CombinedLogger::init(vec![
        WriteLogger::new(
            file_level,
            LogConfig::default(),
            File::create(&log_path)
                .with_context(|| format!("Creating {}", log_path.display()))?,
        ),
        TermLogger::new(
            LevelFilter::Warn,
            LogConfig::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    ])?;

    Ok(log_path)
}
