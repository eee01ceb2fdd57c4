//! Logger initialization.
//!
//! The terminal is in raw mode on the alternate screen while a demo runs, so
//! records written to stderr land on top of the frame. Point `file` at a path
//! to keep them out of the way.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "glstep_core=debug").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            file: None,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored and touch nothing, not even `file`. Fails
/// only when the log file can't be created.
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| result = build_logger(&config));
    result
}

fn build_logger(config: &LoggingConfig) -> io::Result<()> {
    let file = config.file.as_ref().map(File::create).transpose()?;
    let mut builder = env_logger::Builder::new();

    if let Some(filter) = &config.env_filter {
        builder.parse_filters(filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(default_level(file.is_some()));
    }

    match file {
        Some(file) => {
            builder.write_style(env_logger::WriteStyle::Never);
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.write_style(config.write_style);
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();

    log::debug!("logging initialized");
    Ok(())
}

/// Quieter on stderr, where records land on top of the frame
fn default_level(to_file: bool) -> log::LevelFilter {
    if to_file {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), log::LevelFilter::Info);
        assert_eq!(default_level(false), log::LevelFilter::Warn);
    }

    #[test]
    fn test_repeated_init_leaves_log_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let log_file = dir.path().join("glstep.log");

        init_logging(LoggingConfig::default()).unwrap();
        init_logging(LoggingConfig {
            file: Some(log_file.clone()),
            ..LoggingConfig::default()
        })
        .unwrap();

        assert!(!log_file.exists());
    }
}
