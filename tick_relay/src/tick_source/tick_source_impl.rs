// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{TickConsumer, TickSourceStatsHandle};
use crate::{Continuation,
            core::{DEBUG_TICK_RELAY_LOOP, EventLoop, InterestTag, LoopError, LoopSource,
                   NotificationReader, Prepare, Readiness, Registrar, SourceContext,
                   SourceId}};
use mio::Interest;

/// [`LoopSource`] that owns a [`NotificationReader`] and forwards each wakeup to a
/// [`TickConsumer`]. See the [dispatch rules].
///
/// Its readiness is purely descriptor driven: [`prepare()`] always reports
/// [`Prepare::BLOCK_INDEFINITELY`] and every dispatch clears the ready time.
///
/// Finalizing drops the reader, which closes the channel; writers then get
/// [`ChannelClosed`] and a [`BackgroundTicker`] exits on its own.
///
/// [`BackgroundTicker`]: crate::core::BackgroundTicker
/// [`ChannelClosed`]: crate::core::ChannelError::ChannelClosed
/// [`prepare()`]: LoopSource::prepare
/// [dispatch rules]: super#dispatch-rules
#[allow(missing_debug_implementations)]
pub struct TickSource<C: TickConsumer> {
    reader: Option<NotificationReader>,
    consumer: C,
    tag: Option<InterestTag>,
    stats: TickSourceStatsHandle,
}

impl<C: TickConsumer> TickSource<C> {
    pub fn new(reader: NotificationReader, consumer: C) -> Self {
        Self {
            reader: Some(reader),
            consumer,
            tag: None,
            stats: TickSourceStatsHandle::default(),
        }
    }

    /// Hands the source to `event_loop`, which owns it from here on.
    ///
    /// # Errors
    ///
    /// [`LoopError::Registration`] if the reader can't be registered.
    pub fn attach(self, event_loop: &mut EventLoop) -> Result<SourceId, LoopError>
    where
        C: 'static,
    {
        event_loop.attach(Box::new(self))
    }

    #[must_use]
    pub fn stats(&self) -> TickSourceStatsHandle { self.stats.clone() }

    /// [`None`] once finalized.
    #[must_use]
    pub fn reader(&self) -> Option<&NotificationReader> { self.reader.as_ref() }

    #[must_use]
    pub fn consumer(&self) -> &C { &self.consumer }

    /// Applies the dispatch rules to one observed `readiness`.
    pub fn on_ready(&mut self, readiness: Readiness) -> Continuation {
        self.stats.record_dispatch();

        if readiness.is_broken() {
            tracing::warn!(
                message = "tick source saw error or hangup, removing it",
                %readiness
            );
            return Continuation::Stop;
        }

        if !readiness.readable {
            return self.spurious(readiness);
        }

        let Some(reader) = &self.reader else {
            tracing::warn!(message = "tick source dispatched after finalize");
            return Continuation::Stop;
        };

        match reader.drain() {
            Ok(0) => self.spurious(readiness),
            Ok(coalesced) => {
                self.stats.record_delivery(coalesced);
                DEBUG_TICK_RELAY_LOOP.then(|| {
                    tracing::debug!(message = "delivering tick", coalesced);
                });
                self.consumer.on_tick_batch(coalesced)
            }
            Err(error) => {
                tracing::warn!(
                    message = "tick source failed to drain, removing it",
                    ?error
                );
                Continuation::Stop
            }
        }
    }

    fn spurious(&self, readiness: Readiness) -> Continuation {
        self.stats.record_spurious();
        DEBUG_TICK_RELAY_LOOP.then(|| {
            tracing::debug!(message = "spurious wakeup ignored", %readiness);
        });
        Continuation::Continue
    }
}

impl<C: TickConsumer> LoopSource for TickSource<C> {
    fn register(&mut self, registrar: &mut Registrar<'_>) -> std::io::Result<()> {
        if let Some(reader) = &self.reader {
            self.tag = Some(registrar.register_descriptor(reader, Interest::READABLE)?);
        }
        Ok(())
    }

    fn prepare(&mut self) -> Prepare { Prepare::BLOCK_INDEFINITELY }

    fn dispatch(&mut self, context: &mut SourceContext<'_>) -> Continuation {
        context.set_ready_time(None);
        let readiness = self
            .tag
            .map_or(Readiness::NONE, |tag| context.query_readiness(tag));
        self.on_ready(readiness)
    }

    fn finalize(&mut self) {
        self.reader = None;
        DEBUG_TICK_RELAY_LOOP.then(|| {
            tracing::debug!(message = "tick source finalized, channel closed");
        });
    }

    fn name(&self) -> &str { "tick-source" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChannelError, NotificationWriter, notification_channel};
    use pretty_assertions::assert_eq;
    use std::{cell::Cell, rc::Rc};
    use test_case::test_case;

    const READABLE: Readiness = Readiness::READABLE;
    const NONE: Readiness = Readiness::NONE;
    const ERROR_AND_READABLE: Readiness = Readiness {
        readable: true,
        error: true,
        hangup: false,
    };
    const HANGUP_AND_READABLE: Readiness = Readiness {
        readable: true,
        error: false,
        hangup: true,
    };
    const ERROR_ONLY: Readiness = Readiness {
        readable: false,
        error: true,
        hangup: false,
    };

    type Calls = Rc<Cell<u64>>;

    fn counting_source(
        reply: Continuation,
    ) -> (NotificationWriter, TickSource<impl TickConsumer>, Calls) {
        let (writer, reader) = notification_channel().unwrap();
        let calls = Calls::default();
        let consumer = {
            let calls = Rc::clone(&calls);
            move || {
                calls.set(calls.get() + 1);
                reply
            }
        };
        (writer, TickSource::new(reader, consumer), calls)
    }

    #[test_case(3, READABLE, 1, Continuation::Continue, 0 ; "readable drains and calls once")]
    #[test_case(2, NONE, 0, Continuation::Continue, 2 ; "spurious leaves counter unchanged")]
    #[test_case(0, READABLE, 0, Continuation::Continue, 0 ; "readable but empty is spurious")]
    #[test_case(1, ERROR_AND_READABLE, 0, Continuation::Stop, 1 ; "error wins over readable")]
    #[test_case(1, HANGUP_AND_READABLE, 0, Continuation::Stop, 1 ; "hangup wins over readable")]
    #[test_case(0, ERROR_ONLY, 0, Continuation::Stop, 0 ; "error alone removes source")]
    fn test_dispatch_rules(
        signals: u64,
        readiness: Readiness,
        expected_calls: u64,
        expected_continuation: Continuation,
        expected_remaining: u64,
    ) {
        let (writer, mut source, calls) = counting_source(Continuation::Continue);
        writer.signal_n(signals).unwrap();

        let continuation = source.on_ready(readiness);

        assert_eq!(continuation, expected_continuation);
        assert_eq!(calls.get(), expected_calls);
        assert_eq!(source.reader().unwrap().drain().unwrap(), expected_remaining);
    }

    #[test]
    fn test_consumer_stop_is_propagated() {
        let (writer, mut source, calls) = counting_source(Continuation::Stop);
        writer.signal().unwrap();
        assert_eq!(source.on_ready(READABLE), Continuation::Stop);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_stats_track_every_dispatch() {
        let (writer, mut source, _calls) = counting_source(Continuation::Continue);
        let stats = source.stats();

        writer.signal_n(4).unwrap();
        source.on_ready(READABLE);
        source.on_ready(NONE);
        source.on_ready(READABLE);

        assert_eq!(
            stats.snapshot(),
            crate::tick_source::TickSourceStats {
                dispatches: 3,
                ticks_delivered: 1,
                signals_coalesced: 4,
                spurious_wakeups: 2,
            }
        );
    }

    #[test]
    fn test_count_aware_consumer_gets_batch() {
        struct Batches(Vec<u64>);
        impl TickConsumer for Batches {
            fn on_tick(&mut self) -> Continuation { self.on_tick_batch(1) }

            fn on_tick_batch(&mut self, coalesced: u64) -> Continuation {
                self.0.push(coalesced);
                Continuation::Continue
            }
        }

        let (writer, reader) = notification_channel().unwrap();
        let mut source = TickSource::new(reader, Batches(vec![]));
        writer.signal_n(5).unwrap();
        source.on_ready(READABLE);
        writer.signal().unwrap();
        source.on_ready(READABLE);

        assert_eq!(source.consumer().0, vec![5, 1]);
    }

    #[test]
    fn test_attached_source_ticks_through_the_loop() {
        let mut event_loop = EventLoop::new().unwrap();
        let (writer, source, calls) = counting_source(Continuation::Continue);
        let stats = source.stats();
        let id = source.attach(&mut event_loop).unwrap();

        for _ in 0..3 {
            writer.signal().unwrap();
        }
        assert_eq!(event_loop.iteration(false).unwrap(), 1);
        assert_eq!(calls.get(), 1);
        assert_eq!(stats.snapshot().signals_coalesced, 3);

        // Nothing pending: no dispatch, no callback.
        assert_eq!(event_loop.iteration(false).unwrap(), 0);
        assert_eq!(calls.get(), 1);

        assert!(event_loop.remove(id));
        assert!(matches!(writer.signal(), Err(ChannelError::ChannelClosed)));
    }

    #[test]
    fn test_consumer_stop_detaches_and_closes_channel() {
        let mut event_loop = EventLoop::new().unwrap();
        let (writer, source, calls) = counting_source(Continuation::Stop);
        let id = source.attach(&mut event_loop).unwrap();

        writer.signal().unwrap();
        event_loop.iteration(false).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(!event_loop.contains(id));
        assert!(writer.is_closed());
    }
}
