// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::TimerAppConfig;
use crate::core::{DEFAULT_LOG_FILE_NAME, TracingConfig};
use clap::{Args, Parser, ValueEnum};
use std::time::Duration;
use tracing_core::LevelFilter;

#[derive(Debug, Parser)]
#[command(bin_name = "tick_timer")]
#[command(about = "⏱ A background thread ticks, a single-threaded event loop counts")]
#[command(version)]
#[command(next_line_help = true)]
/// More info: <https://docs.rs/clap/latest/clap/_derive/#overview>
pub struct CLIArg {
    #[arg(
        long,
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Milliseconds between two ticks"
    )]
    pub period_ms: u64,

    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Exit after the counter reaches this value"
    )]
    pub max_ticks: Option<u64>,

    #[arg(
        long,
        help = "Advance the counter by every coalesced tick, not once per wakeup"
    )]
    pub count_aware: bool,

    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        short = 'l',
        help = "Log app output to a file named `log.txt` for debugging"
    )]
    pub enable_logging: bool,

    #[arg(global = true, long, value_enum, default_value_t = LogLevel::Debug)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl CLIArg {
    #[must_use]
    pub fn timer_app_config(&self) -> TimerAppConfig {
        TimerAppConfig {
            period: Duration::from_millis(self.period_ms),
            max_ticks: self.max_ticks,
            is_count_aware: self.count_aware,
            ..TimerAppConfig::default()
        }
    }

    /// Logs go to [`DEFAULT_LOG_FILE_NAME`] only, since stdout shows the label.
    #[must_use]
    pub fn tracing_config(&self) -> TracingConfig {
        if self.global_options.enable_logging {
            TracingConfig::new_file(
                Some(DEFAULT_LOG_FILE_NAME.to_string()),
                self.global_options.log_level.into(),
            )
        } else {
            TracingConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WriterConfig;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_is_well_formed() { CLIArg::command().debug_assert(); }

    #[test]
    fn test_defaults() {
        let cli_arg = CLIArg::try_parse_from(["tick_timer"]).unwrap();
        let config = cli_arg.timer_app_config();
        assert_eq!(config.period, Duration::from_secs(1));
        assert_eq!(config.max_ticks, None);
        assert!(!config.is_count_aware);
        assert_eq!(cli_arg.tracing_config().level_filter, LevelFilter::OFF);
    }

    #[test]
    fn test_all_flags() {
        let cli_arg = CLIArg::try_parse_from([
            "tick_timer",
            "--period-ms",
            "250",
            "--max-ticks",
            "3",
            "--count-aware",
            "-l",
            "--log-level",
            "warn",
        ])
        .unwrap();

        let config = cli_arg.timer_app_config();
        assert_eq!(config.period, Duration::from_millis(250));
        assert_eq!(config.max_ticks, Some(3));
        assert!(config.is_count_aware);

        let tracing_config = cli_arg.tracing_config();
        assert_eq!(tracing_config.level_filter, LevelFilter::WARN);
        assert_eq!(
            tracing_config.writer_config,
            WriterConfig::File("log.txt".to_string())
        );
    }

    #[test]
    fn test_zero_period_is_rejected() {
        assert!(CLIArg::try_parse_from(["tick_timer", "--period-ms", "0"]).is_err());
    }

    #[test]
    fn test_zero_max_ticks_is_rejected() {
        assert!(CLIArg::try_parse_from(["tick_timer", "--max-ticks", "0"]).is_err());
    }
}
