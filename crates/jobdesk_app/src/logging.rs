//! Logger initialization for the `jobdesk` binary.
//!
//! Terminal output goes to stderr so that rendered tables on stdout stay
//! clean when piped.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const LOG_FILE: &str = "./jobdesk.log";

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    /// Write to stderr.
    Terminal,
    /// Write to `./jobdesk.log` in the current directory.
    File,
}

/// Installs the global logger. Failures are reported on stderr and leave the
/// process without a logger; they never abort a command.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let logger: Box<dyn SharedLogger> = match destination {
        LogDestination::Terminal => {
            TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
        }
        LogDestination::File => match create_file_logger(Path::new(LOG_FILE), level, config) {
            Some(logger) => logger,
            None => return,
        },
    };

    let _ = CombinedLogger::init(vec![logger]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logger_is_created_in_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobdesk.log");
        assert!(create_file_logger(&path, LevelFilter::Info, build_config()).is_some());
        assert!(path.exists());
    }

    #[test]
    fn missing_directory_yields_no_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("jobdesk.log");
        assert!(create_file_logger(&path, LevelFilter::Info, build_config()).is_none());
    }
}
