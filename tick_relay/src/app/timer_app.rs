// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{LabelSink, QUIT_SIGNALS, SignalSource, TickDisplay};
use crate::{core::{BackgroundTicker, ChannelError, DEFAULT_TICK_PERIOD, EventLoop,
                   LoopHandle, NotificationReader, NotificationWriter, SourceId,
                   TickerConfig, TickerExit, notification_channel},
            tick_source::{TickSource, TickSourceStats, TickSourceStatsHandle}};
use miette::{Context, IntoDiagnostic};
use std::time::Duration;

/// How the [`TimerApp`] is wired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerAppConfig {
    pub period: Duration,
    /// Quit once the displayed counter reaches this value.
    pub max_ticks: Option<u64>,
    pub is_count_aware: bool,
    /// Quit on `SIGINT` / `SIGTERM`. Tests turn this off.
    pub handle_signals: bool,
}

impl Default for TimerAppConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_TICK_PERIOD,
            max_ticks: None,
            is_count_aware: false,
            handle_signals: true,
        }
    }
}

/// One loop, one tick source, one ticker.
///
/// # Activation
///
/// 1. Create the [`EventLoop`] and, if asked, attach a [`SignalSource`].
/// 2. Create the notification channel.
/// 3. Attach a [`TickSource`] feeding a [`TickDisplay`] with the reader.
/// 4. Start the [`BackgroundTicker`] with the writer.
///
/// If step 2 fails with [`ChannelError::ResourceExhausted`] the app still starts, as a
/// loop without live ticking; [`is_ticking()`] tells which.
///
/// # Teardown
///
/// [`shutdown()`] cancels and joins the ticker, then drops the loop, which finalizes the
/// tick source and closes the channel. Without [`shutdown()`], dropping the app does
/// the same: the ticker field drops first.
///
/// [`is_ticking()`]: Self::is_ticking
/// [`shutdown()`]: Self::shutdown
#[allow(missing_debug_implementations)]
pub struct TimerApp {
    ticker: Option<BackgroundTicker>,
    event_loop: EventLoop,
    tick_source: Option<(SourceId, TickSourceStatsHandle)>,
}

impl TimerApp {
    /// Creates a fresh notification channel and wires everything to it.
    ///
    /// # Errors
    ///
    /// See [`activate_with_channel()`].
    ///
    /// [`activate_with_channel()`]: Self::activate_with_channel
    pub fn activate(
        config: TimerAppConfig,
        sink: Box<dyn LabelSink>,
    ) -> miette::Result<Self> {
        Self::activate_with_channel(config, sink, notification_channel())
    }

    /// Wires the app to an already attempted channel creation. A
    /// [`ChannelError::ResourceExhausted`] here degrades to a loop without ticks.
    ///
    /// # Errors
    ///
    /// - The loop or the signal handlers can't be created.
    /// - `channel` holds any error other than resource exhaustion.
    /// - The ticker thread can't be spawned.
    pub fn activate_with_channel(
        config: TimerAppConfig,
        sink: Box<dyn LabelSink>,
        channel: Result<(NotificationWriter, NotificationReader), ChannelError>,
    ) -> miette::Result<Self> {
        let mut event_loop = EventLoop::new()?;

        if config.handle_signals {
            let signal_source = SignalSource::new(&QUIT_SIGNALS, event_loop.handle())
                .into_diagnostic()
                .context("Failed to install quit signal handlers")?;
            event_loop.attach(Box::new(signal_source))?;
        }

        let display = TickDisplay::new(sink)
            .count_aware(config.is_count_aware)
            .stop_after(config.max_ticks, event_loop.handle());

        let (writer, reader) = match channel {
            Ok(endpoints) => endpoints,
            Err(ChannelError::ResourceExhausted(error)) => {
                tracing::error!(
                    message = "no notification channel, running without live ticks",
                    ?error
                );
                return Ok(Self {
                    ticker: None,
                    event_loop,
                    tick_source: None,
                });
            }
            Err(error) => return Err(error.into()),
        };

        let tick_source = TickSource::new(reader, display);
        let stats = tick_source.stats();
        let tick_source_id = tick_source.attach(&mut event_loop)?;

        let ticker = BackgroundTicker::start(writer, TickerConfig::with_period(config.period))?;

        tracing::info!(
            message = "timer app activated",
            period = ?config.period,
            max_ticks = ?config.max_ticks,
            count_aware = config.is_count_aware
        );

        Ok(Self {
            ticker: Some(ticker),
            event_loop,
            tick_source: Some((tick_source_id, stats)),
        })
    }

    /// Runs the loop until a quit signal, the tick limit, or [`LoopHandle::quit()`].
    ///
    /// # Errors
    ///
    /// The loop's poll failed.
    pub fn run(&mut self) -> miette::Result<()> {
        self.event_loop.run()?;
        Ok(())
    }

    /// Stops the ticker and tears the loop down. Returns why the ticker ended, or
    /// [`None`] if there never was one.
    ///
    /// # Errors
    ///
    /// The ticker thread panicked.
    pub fn shutdown(self) -> miette::Result<Option<TickerExit>> {
        let Self {
            ticker, event_loop, ..
        } = self;

        let ticker_exit = ticker.map(BackgroundTicker::stop).transpose()?;
        drop(event_loop);

        tracing::info!(message = "timer app shut down", ?ticker_exit);
        Ok(ticker_exit)
    }

    /// `false` when running degraded, without a channel.
    #[must_use]
    pub fn is_ticking(&self) -> bool { self.ticker.is_some() }

    /// [`None`] when running degraded.
    #[must_use]
    pub fn tick_stats(&self) -> Option<TickSourceStats> {
        self.tick_source.as_ref().map(|(_, stats)| stats.snapshot())
    }

    /// `false` once the tick source has been removed (tick limit, channel error).
    #[must_use]
    pub fn is_tick_source_attached(&self) -> bool {
        self.tick_source
            .as_ref()
            .is_some_and(|(id, _)| self.event_loop.contains(*id))
    }

    #[must_use]
    pub fn ticks_emitted(&self) -> u64 {
        self.ticker.as_ref().map_or(0, BackgroundTicker::ticks_emitted)
    }

    #[must_use]
    pub fn handle(&self) -> LoopHandle { self.event_loop.handle() }

    pub fn event_loop_mut(&mut self) -> &mut EventLoop { &mut self.event_loop }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::MemoryLabelSink;
    use pretty_assertions::assert_eq;
    use rustix::io::Errno;

    fn quiet_config() -> TimerAppConfig {
        TimerAppConfig {
            period: Duration::from_millis(5),
            handle_signals: false,
            ..TimerAppConfig::default()
        }
    }

    #[test]
    fn test_resource_exhaustion_degrades_to_loop_without_ticks() {
        let sink = MemoryLabelSink::default();
        let exhausted = Err(ChannelError::ResourceExhausted(Errno::MFILE.into()));

        let mut app =
            TimerApp::activate_with_channel(quiet_config(), Box::new(sink.clone()), exhausted)
                .unwrap();

        assert!(!app.is_ticking());
        assert!(!app.is_tick_source_attached());
        assert_eq!(app.tick_stats(), None);
        assert_eq!(app.ticks_emitted(), 0);
        assert_eq!(app.event_loop_mut().source_count(), 0);
        assert_eq!(sink.history(), vec!["countdown!".to_string()]);

        // The loop still runs and quits.
        app.handle().quit();
        app.run().unwrap();

        assert_eq!(app.shutdown().unwrap(), None);
    }

    #[test]
    fn test_other_channel_errors_fail_activation() {
        let broken = Err(ChannelError::Io(std::io::Error::other("eventfd unavailable")));
        let result = TimerApp::activate_with_channel(
            quiet_config(),
            Box::new(MemoryLabelSink::default()),
            broken,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_healthy_channel_attaches_tick_source() {
        let mut app = TimerApp::activate_with_channel(
            quiet_config(),
            Box::new(MemoryLabelSink::default()),
            notification_channel(),
        )
        .unwrap();

        assert!(app.is_ticking());
        assert!(app.is_tick_source_attached());
        assert_eq!(app.event_loop_mut().source_count(), 1);
        assert_eq!(app.shutdown().unwrap(), Some(TickerExit::Cancelled));
    }
}
