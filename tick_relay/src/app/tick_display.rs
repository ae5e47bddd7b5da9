// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::LabelSink;
use crate::{Continuation, core::LoopHandle, tick_source::TickConsumer};

/// Label text shown before the first tick.
pub const INITIAL_LABEL: &str = "countdown!";

/// The UI state mutated by ticks: a counter and the label that shows it.
///
/// Lives on the loop thread, inside the [`TickSource`] that feeds it. Each delivered
/// wakeup advances the counter and re-renders the label as the counter in decimal.
///
/// | Mode          | Advance per wakeup            |
/// | :------------ | :---------------------------- |
/// | default       | `1`, whatever the backlog     |
/// | count aware   | the number of coalesced ticks |
///
/// [`TickSource`]: crate::tick_source::TickSource
#[allow(missing_debug_implementations)]
pub struct TickDisplay<S: LabelSink> {
    counter: u64,
    label: String,
    sink: S,
    is_count_aware: bool,
    tick_limit: Option<TickLimit>,
}

/// Stop after `max_ticks` and quit the loop through `loop_handle`.
struct TickLimit {
    max_ticks: u64,
    loop_handle: LoopHandle,
}

impl<S: LabelSink> TickDisplay<S> {
    /// Renders [`INITIAL_LABEL`] right away.
    pub fn new(mut sink: S) -> Self {
        sink.set_text(INITIAL_LABEL);
        Self {
            counter: 0,
            label: INITIAL_LABEL.to_string(),
            sink,
            is_count_aware: false,
            tick_limit: None,
        }
    }

    #[must_use]
    pub fn count_aware(mut self, is_count_aware: bool) -> Self {
        self.is_count_aware = is_count_aware;
        self
    }

    /// Once the counter reaches `max_ticks`, quit the loop and detach. [`None`] never
    /// stops. With `Some(0)` the first tick quits without rendering anything.
    #[must_use]
    pub fn stop_after(mut self, max_ticks: Option<u64>, loop_handle: LoopHandle) -> Self {
        self.tick_limit = max_ticks.map(|max_ticks| TickLimit {
            max_ticks,
            loop_handle,
        });
        self
    }

    #[must_use]
    pub fn counter(&self) -> u64 { self.counter }

    #[must_use]
    pub fn label(&self) -> &str { &self.label }

    /// The counter never passes the tick limit: a batch is clamped to what is left.
    fn advance(&mut self, by: u64) -> Continuation {
        let by = match &self.tick_limit {
            Some(limit) => by.min(limit.max_ticks.saturating_sub(self.counter)),
            None => by,
        };

        if by > 0 {
            self.counter = self.counter.saturating_add(by);
            self.label = self.counter.to_string();
            self.sink.set_text(&self.label);
        }

        match &self.tick_limit {
            Some(limit) if self.counter >= limit.max_ticks => {
                tracing::info!(message = "tick limit reached", counter = self.counter);
                limit.loop_handle.quit();
                Continuation::Stop
            }
            _ => Continuation::Continue,
        }
    }
}

impl<S: LabelSink> TickConsumer for TickDisplay<S> {
    fn on_tick(&mut self) -> Continuation { self.advance(1) }

    fn on_tick_batch(&mut self, coalesced: u64) -> Continuation {
        if self.is_count_aware {
            self.advance(coalesced)
        } else {
            self.advance(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::MemoryLabelSink, core::EventLoop};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initial_label_is_rendered() {
        let sink = MemoryLabelSink::default();
        let display = TickDisplay::new(sink.clone());
        assert_eq!(display.counter(), 0);
        assert_eq!(display.label(), "countdown!");
        assert_eq!(sink.history(), vec!["countdown!".to_string()]);
    }

    #[test]
    fn test_one_refresh_per_wakeup_by_default() {
        let sink = MemoryLabelSink::default();
        let mut display = TickDisplay::new(sink.clone());

        display.on_tick_batch(3);
        display.on_tick();

        assert_eq!(display.counter(), 2);
        assert_eq!(sink.last_text().as_deref(), Some("2"));
    }

    #[test]
    fn test_count_aware_catches_up() {
        let sink = MemoryLabelSink::default();
        let mut display = TickDisplay::new(sink.clone()).count_aware(true);

        display.on_tick_batch(3);
        display.on_tick();

        assert_eq!(display.counter(), 4);
        assert_eq!(
            sink.history(),
            vec!["countdown!".to_string(), "3".to_string(), "4".to_string()]
        );
    }

    #[test]
    fn test_tick_limit_stops_and_quits_loop() {
        let event_loop = EventLoop::new().unwrap();
        let handle = event_loop.handle();
        let mut display =
            TickDisplay::new(MemoryLabelSink::default()).stop_after(Some(2), handle.clone());

        assert_eq!(display.on_tick(), Continuation::Continue);
        assert!(!handle.is_quit_requested());
        assert_eq!(display.on_tick(), Continuation::Stop);
        assert!(handle.is_quit_requested());
    }

    #[test]
    fn test_count_aware_batch_is_clamped_to_limit() {
        let event_loop = EventLoop::new().unwrap();
        let sink = MemoryLabelSink::default();
        let mut display = TickDisplay::new(sink.clone())
            .count_aware(true)
            .stop_after(Some(3), event_loop.handle());

        assert_eq!(display.on_tick_batch(5), Continuation::Stop);
        assert_eq!(display.counter(), 3);
        assert_eq!(
            sink.history(),
            vec!["countdown!".to_string(), "3".to_string()]
        );
    }

    #[test]
    fn test_zero_limit_stops_without_rendering() {
        let event_loop = EventLoop::new().unwrap();
        let handle = event_loop.handle();
        let sink = MemoryLabelSink::default();
        let mut display = TickDisplay::new(sink.clone()).stop_after(Some(0), handle.clone());

        assert_eq!(display.on_tick(), Continuation::Stop);
        assert!(handle.is_quit_requested());
        assert_eq!(display.counter(), 0);
        assert_eq!(display.label(), "countdown!");
        assert_eq!(sink.history(), vec!["countdown!".to_string()]);
    }
}
