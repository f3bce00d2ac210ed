//! Logger setup for the harvester binary.
//!
//! Terminal lines are written through the progress bar's `suspend`, so a log
//! record never lands in the middle of a bar redraw on stderr.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use log::{LevelFilter, Log, Metadata, Record};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
#[derive(Debug, PartialEq, Eq)]
pub enum LogDestination<'a> {
    Terminal,
    File(&'a Path),
    Both(&'a Path),
}

impl<'a> LogDestination<'a> {
    /// `None` when `quiet` leaves nowhere to write.
    pub fn from_flags(log_file: Option<&'a Path>, quiet: bool) -> Option<Self> {
        match (log_file, quiet) {
            (Some(path), true) => Some(LogDestination::File(path)),
            (Some(path), false) => Some(LogDestination::Both(path)),
            (None, true) => None,
            (None, false) => Some(LogDestination::Terminal),
        }
    }
}

/// `-v` count to level: warnings by default, then info, debug, trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn initialize(
    destination: LogDestination<'_>,
    level: LevelFilter,
    bar: &ProgressBar,
) -> Result<()> {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::Terminal => vec![terminal_logger(level, config, bar)],
        LogDestination::File(path) => vec![file_logger(path, level, config)?],
        LogDestination::Both(path) => {
            vec![
                terminal_logger(level, config.clone(), bar),
                file_logger(path, level, config)?,
            ]
        }
    };

    // A second initialization (tests) keeps the first logger.
    let _ = CombinedLogger::init(loggers);
    Ok(())
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config, bar: &ProgressBar) -> Box<dyn SharedLogger> {
    Box::new(BarAwareLogger {
        inner: TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto),
        bar: bar.clone(),
    })
}

fn file_logger(path: &Path, level: LevelFilter, config: Config) -> Result<Box<dyn SharedLogger>> {
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    Ok(WriteLogger::new(level, config, file))
}

/// Terminal logger that hides the progress bar while it writes a record.
struct BarAwareLogger {
    inner: Box<TermLogger>,
    bar: ProgressBar,
}

impl Log for BarAwareLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if self.inner.enabled(record.metadata()) {
            self.bar.suspend(|| self.inner.log(record));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

impl SharedLogger for BarAwareLogger {
    fn level(&self) -> LevelFilter {
        self.inner.level()
    }

    fn config(&self) -> Option<&Config> {
        self.inner.config()
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }

    #[test]
    fn flags_select_every_destination() {
        let path = Path::new("harvest.log");
        assert_eq!(
            LogDestination::from_flags(Some(path), false),
            Some(LogDestination::Both(path))
        );
        assert_eq!(
            LogDestination::from_flags(Some(path), true),
            Some(LogDestination::File(path))
        );
        assert_eq!(
            LogDestination::from_flags(None, false),
            Some(LogDestination::Terminal)
        );
        assert_eq!(LogDestination::from_flags(None, true), None);
    }

    #[test]
    fn terminal_logger_keeps_the_configured_level() {
        let bar = ProgressBar::hidden();
        let logger = terminal_logger(LevelFilter::Debug, build_config(), &bar);
        assert_eq!(logger.level(), LevelFilter::Debug);
        let enabled = Metadata::builder().level(log::Level::Debug).build();
        let disabled = Metadata::builder().level(log::Level::Trace).build();
        let logger = logger.as_log();
        assert!(logger.enabled(&enabled));
        assert!(!logger.enabled(&disabled));
    }
}
