// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{CancellationToken, TickerConfig, TickerError, TickerExit};
use crate::core::{ChannelError, DEBUG_TICK_RELAY_TICKER, NotificationWriter};
use std::{sync::{Arc,
                 atomic::{AtomicBool, AtomicU64, Ordering}},
          thread::JoinHandle,
          time::Duration};

/// A producer thread that calls [`signal()`] once per period.
///
/// The thread owns only a [`NotificationWriter`] and a few atomics; it never touches
/// state owned by the loop thread. It runs until one of the [`TickerExit`] conditions
/// holds.
///
/// # Lifecycle
///
/// ```text
/// start() ──▶ ┌─ wait(period) ── cancelled? ──yes──▶ Cancelled
///             │        │no
///             │   signal() ── ChannelClosed ───────▶ ChannelClosed
///             │        │ok
///             └─ max_ticks reached? ──────yes──────▶ TickLimitReached
/// ```
///
/// The wait comes *before* the signal, so the first tick lands one full period after
/// [`start()`].
///
/// Owning a [`BackgroundTicker`] means owning the thread: [`stop()`] and [`Drop`] both
/// cancel and join, so the thread never outlives its owner.
///
/// [`signal()`]: NotificationWriter::signal
/// [`start()`]: Self::start
/// [`stop()`]: Self::stop
#[allow(missing_debug_implementations)]
pub struct BackgroundTicker {
    join_handle: Option<JoinHandle<TickerExit>>,
    cancellation_token: CancellationToken,
    ticks_emitted: Arc<AtomicU64>,
    is_finished: Arc<AtomicBool>,
}

impl BackgroundTicker {
    /// Spawns the ticker thread.
    ///
    /// # Errors
    ///
    /// - [`TickerError::InvalidPeriod`] if `config.period` is zero.
    /// - [`TickerError::ThreadSpawn`] if the OS refuses to create the thread.
    pub fn start(
        writer: NotificationWriter,
        config: TickerConfig,
    ) -> Result<Self, TickerError> {
        if config.period == Duration::ZERO {
            return Err(TickerError::InvalidPeriod);
        }

        let cancellation_token = CancellationToken::new();
        let ticks_emitted = Arc::new(AtomicU64::new(0));
        let is_finished = Arc::new(AtomicBool::new(false));

        let join_handle = {
            let token = cancellation_token.clone();
            let ticks_emitted = Arc::clone(&ticks_emitted);
            let finished_guard = FinishedGuard(Arc::clone(&is_finished));
            std::thread::Builder::new()
                .name(config.thread_name.clone())
                .spawn(move || {
                    let _finished_guard = finished_guard;
                    run_ticker_loop(&writer, &config, &token, &ticks_emitted)
                })
                .map_err(TickerError::ThreadSpawn)?
        };

        Ok(Self {
            join_handle: Some(join_handle),
            cancellation_token,
            ticks_emitted,
            is_finished,
        })
    }

    /// Number of signals successfully written so far.
    #[must_use]
    pub fn ticks_emitted(&self) -> u64 { self.ticks_emitted.load(Ordering::SeqCst) }

    /// `true` once the thread's loop has returned, for any [`TickerExit`] reason.
    #[must_use]
    pub fn is_finished(&self) -> bool { self.is_finished.load(Ordering::SeqCst) }

    /// A clone of the token the thread waits on. Cancelling it has the same effect as
    /// [`stop()`] minus the join.
    ///
    /// [`stop()`]: Self::stop
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Requests cancellation and joins the thread.
    ///
    /// If the thread had already exited by itself, that exit reason is returned,
    /// e.g. [`TickerExit::ChannelClosed`].
    ///
    /// # Errors
    ///
    /// [`TickerError::ThreadPanicked`] if the thread panicked.
    pub fn stop(mut self) -> Result<TickerExit, TickerError> {
        self.cancel_and_join().unwrap_or(Ok(TickerExit::Cancelled))
    }

    fn cancel_and_join(&mut self) -> Option<Result<TickerExit, TickerError>> {
        let join_handle = self.join_handle.take()?;
        self.cancellation_token.cancel();
        Some(join_handle.join().map_err(|_| TickerError::ThreadPanicked))
    }
}

impl Drop for BackgroundTicker {
    fn drop(&mut self) {
        if let Some(Err(error)) = self.cancel_and_join() {
            tracing::error!(message = "background ticker ended abnormally", ?error);
        }
    }
}

/// Marks the ticker finished when the thread's closure exits, including by panic.
struct FinishedGuard(Arc<AtomicBool>);

impl Drop for FinishedGuard {
    fn drop(&mut self) { self.0.store(true, Ordering::SeqCst); }
}

/// The body of the ticker thread. Public so it can be driven synchronously (tests,
/// embedding in an existing thread).
pub fn run_ticker_loop(
    writer: &NotificationWriter,
    config: &TickerConfig,
    cancellation_token: &CancellationToken,
    ticks_emitted: &AtomicU64,
) -> TickerExit {
    DEBUG_TICK_RELAY_TICKER.then(|| {
        tracing::debug!(
            message = "background ticker started",
            period = ?config.period,
            max_ticks = ?config.max_ticks
        );
    });

    let exit = loop {
        if let Some(max_ticks) = config.max_ticks
            && ticks_emitted.load(Ordering::SeqCst) >= max_ticks
        {
            break TickerExit::TickLimitReached;
        }

        if cancellation_token.wait_timeout(config.period) {
            break TickerExit::Cancelled;
        }

        match writer.signal() {
            Ok(()) => {
                let tick = ticks_emitted.fetch_add(1, Ordering::SeqCst) + 1;
                DEBUG_TICK_RELAY_TICKER.then(|| {
                    tracing::debug!(message = "tick signaled", tick);
                });
            }
            Err(ChannelError::ChannelClosed) => break TickerExit::ChannelClosed,
            Err(error) => {
                tracing::error!(message = "background ticker failed to signal", ?error);
                break TickerExit::Failed(error.to_string());
            }
        }
    };

    tracing::debug!(
        message = "background ticker exited",
        exit = ?exit,
        ticks = ticks_emitted.load(Ordering::SeqCst)
    );

    exit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notification_channel;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::time::Instant;

    fn wait_until(timeout: Duration, predicate: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if predicate() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        predicate()
    }

    #[test]
    fn test_run_ticker_loop_stops_at_tick_limit() {
        let (writer, reader) = notification_channel().unwrap();
        let config = TickerConfig::with_period(Duration::from_millis(1)).max_ticks(Some(5));
        let ticks = AtomicU64::new(0);

        let exit = run_ticker_loop(&writer, &config, &CancellationToken::new(), &ticks);

        assert_eq!(exit, TickerExit::TickLimitReached);
        assert_eq!(ticks.load(Ordering::SeqCst), 5);
        assert_eq!(reader.drain().unwrap(), 5);
    }

    #[test]
    fn test_run_ticker_loop_zero_tick_limit_never_signals() {
        let (writer, reader) = notification_channel().unwrap();
        let config = TickerConfig::default().max_ticks(Some(0));
        let ticks = AtomicU64::new(0);

        let exit = run_ticker_loop(&writer, &config, &CancellationToken::new(), &ticks);

        assert_eq!(exit, TickerExit::TickLimitReached);
        assert_eq!(reader.drain().unwrap(), 0);
    }

    #[test]
    fn test_run_ticker_loop_exits_on_closed_channel() {
        let (writer, reader) = notification_channel().unwrap();
        drop(reader);
        let config = TickerConfig::with_period(Duration::from_millis(1));
        let ticks = AtomicU64::new(0);

        let exit = run_ticker_loop(&writer, &config, &CancellationToken::new(), &ticks);

        assert_eq!(exit, TickerExit::ChannelClosed);
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let (writer, _reader) = notification_channel().unwrap();
        let result = BackgroundTicker::start(
            writer,
            TickerConfig::with_period(Duration::ZERO),
        );
        assert!(matches!(result, Err(TickerError::InvalidPeriod)));
    }

    #[test]
    #[serial]
    fn test_stop_interrupts_a_long_period() {
        let (writer, reader) = notification_channel().unwrap();
        let ticker =
            BackgroundTicker::start(writer, TickerConfig::with_period(Duration::from_secs(60)))
                .unwrap();

        let start = Instant::now();
        assert_eq!(ticker.stop().unwrap(), TickerExit::Cancelled);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(reader.drain().unwrap(), 0);
    }

    #[test]
    #[serial]
    fn test_ticker_signals_periodically() {
        let (writer, reader) = notification_channel().unwrap();
        let ticker = BackgroundTicker::start(
            writer,
            TickerConfig::with_period(Duration::from_millis(5)).max_ticks(Some(4)),
        )
        .unwrap();

        assert!(wait_until(Duration::from_secs(5), || ticker.is_finished()));
        assert_eq!(ticker.ticks_emitted(), 4);
        assert_eq!(ticker.stop().unwrap(), TickerExit::TickLimitReached);
        assert_eq!(reader.drain().unwrap(), 4);
    }

    #[test]
    #[serial]
    fn test_ticker_exits_quietly_when_reader_dropped() {
        let (writer, reader) = notification_channel().unwrap();
        let ticker =
            BackgroundTicker::start(writer, TickerConfig::with_period(Duration::from_millis(2)))
                .unwrap();
        drop(reader);

        assert!(wait_until(Duration::from_secs(5), || ticker.is_finished()));
        assert_eq!(ticker.stop().unwrap(), TickerExit::ChannelClosed);
    }

    #[test]
    #[serial]
    fn test_drop_cancels_and_joins() {
        let (writer, _reader) = notification_channel().unwrap();
        let ticker =
            BackgroundTicker::start(writer, TickerConfig::with_period(Duration::from_secs(60)))
                .unwrap();
        let token = ticker.cancellation_token();
        let is_finished = Arc::clone(&ticker.is_finished);

        drop(ticker);

        assert!(token.is_cancelled());
        assert!(is_finished.load(Ordering::SeqCst));
    }
}
