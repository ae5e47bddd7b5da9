// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words taskthreads

//! Configuration, exit reasons and errors for the [`BackgroundTicker`].
//!
//! [`BackgroundTicker`]: super::BackgroundTicker

use std::time::Duration;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);
pub const DEFAULT_TICKER_THREAD_NAME: &str = "background-ticker";

/// How the ticker thread behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerConfig {
    /// Time between two consecutive signals. Must be non-zero.
    pub period: Duration,
    /// Name given to the OS thread, visible in `top -H`, debuggers, and log lines.
    pub thread_name: String,
    /// Stop on its own after this many successful signals. [`None`] runs until
    /// cancelled or until the channel closes.
    pub max_ticks: Option<u64>,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_TICK_PERIOD,
            thread_name: DEFAULT_TICKER_THREAD_NAME.to_string(),
            max_ticks: None,
        }
    }
}

impl TickerConfig {
    #[must_use]
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    #[must_use]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Why the ticker thread's loop ended.
///
/// | Variant              | Cause                                              |
/// | :------------------- | :------------------------------------------------- |
/// | [`Cancelled`]        | The owner called [`stop()`] or dropped the ticker  |
/// | [`ChannelClosed`]    | The reader side was dropped (source removed)       |
/// | [`TickLimitReached`] | [`TickerConfig::max_ticks`] signals were delivered |
/// | [`Failed`]           | `signal()` hit an unexpected I/O error             |
///
/// [`Cancelled`]: Self::Cancelled
/// [`ChannelClosed`]: Self::ChannelClosed
/// [`Failed`]: Self::Failed
/// [`TickLimitReached`]: Self::TickLimitReached
/// [`stop()`]: super::BackgroundTicker::stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerExit {
    Cancelled,
    ChannelClosed,
    TickLimitReached,
    Failed(String),
}

/// Errors from starting or joining the [`BackgroundTicker`].
///
/// [`BackgroundTicker`]: super::BackgroundTicker
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TickerError {
    /// [`std::thread::Builder::spawn()`] failed.
    #[error("Failed to spawn the background ticker thread")]
    #[diagnostic(
        code(tick_relay::ticker::thread_spawn),
        help(
            "The system may have reached its thread limit - \
             check `ulimit -u` for per-user limit, \
             `cat /proc/sys/kernel/threads-max` for system-wide limit"
        )
    )]
    ThreadSpawn(#[source] std::io::Error),

    #[error("The background ticker thread panicked")]
    #[diagnostic(code(tick_relay::ticker::thread_panicked))]
    ThreadPanicked,

    #[error("Tick period must be greater than zero")]
    #[diagnostic(
        code(tick_relay::ticker::invalid_period),
        help("A zero period would spin the ticker thread; pass at least 1ms")
    )]
    InvalidPeriod,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = TickerConfig::default();
        assert_eq!(config.period, Duration::from_secs(1));
        assert_eq!(config.thread_name, "background-ticker");
        assert_eq!(config.max_ticks, None);
    }

    #[test]
    fn test_builder_methods() {
        let config = TickerConfig::with_period(Duration::from_millis(5))
            .max_ticks(Some(3))
            .thread_name("test-ticker");
        assert_eq!(
            config,
            TickerConfig {
                period: Duration::from_millis(5),
                thread_name: "test-ticker".into(),
                max_ticks: Some(3),
            }
        );
    }
}
