// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

/// Log file used when none is given.
pub const DEFAULT_LOG_FILE_NAME: &str = "log.txt";

/// Where log lines go and which levels pass.
///
/// - `writer_config`: [`WriterConfig`] to choose the destination(s).
/// - `level_filter`: [`LevelFilter::OFF`] disables logging altogether.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

/// The file variants hold the log file path, e.g. `log.txt` or `/tmp/tick_timer.log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String /* log file path */),
    DisplayAndFile(DisplayPreference, String /* log file path */),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

impl TracingConfig {
    /// Writes to `filename` (or [`DEFAULT_LOG_FILE_NAME`]) only, keeping the terminal
    /// free for the tick display.
    #[must_use]
    pub fn new_file(filename: Option<String>, level_filter: LevelFilter) -> Self {
        Self {
            writer_config: WriterConfig::File(
                filename.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level_filter,
        }
    }

    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference, level_filter: LevelFilter) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level_filter,
        }
    }

    #[must_use]
    pub fn new_file_and_display(
        filename: Option<String>,
        preferred_display: DisplayPreference,
        level_filter: LevelFilter,
    ) -> Self {
        Self {
            writer_config: WriterConfig::DisplayAndFile(
                preferred_display,
                filename.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level_filter,
        }
    }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::OFF,
        }
    }
}
