// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::Continuation;

/// Receives ticks on the loop thread. Implementations own the UI state that ticks
/// mutate, and must not block.
///
/// Only [`on_tick()`] is required. The default [`on_tick_batch()`] ignores how many
/// signals were coalesced into the wakeup and refreshes once. A consumer that wants to
/// catch up after a stall overrides it.
///
/// Any `FnMut() -> Continuation` closure is a [`TickConsumer`].
///
/// [`on_tick()`]: Self::on_tick
/// [`on_tick_batch()`]: Self::on_tick_batch
pub trait TickConsumer {
    fn on_tick(&mut self) -> Continuation;

    /// Called once per wakeup with the number of signals drained, always `>= 1`.
    fn on_tick_batch(&mut self, coalesced: u64) -> Continuation {
        debug_assert!(coalesced >= 1);
        self.on_tick()
    }
}

impl<F> TickConsumer for F
where
    F: FnMut() -> Continuation,
{
    fn on_tick(&mut self) -> Continuation { self() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct CatchUp {
        total: u64,
    }

    impl TickConsumer for CatchUp {
        fn on_tick(&mut self) -> Continuation { self.on_tick_batch(1) }

        fn on_tick_batch(&mut self, coalesced: u64) -> Continuation {
            self.total += coalesced;
            Continuation::Continue
        }
    }

    #[test]
    fn test_default_batch_is_one_tick() {
        let mut calls = 0;
        let mut consumer = || {
            calls += 1;
            Continuation::Continue
        };
        assert_eq!(consumer.on_tick_batch(7), Continuation::Continue);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_override_sees_count() {
        let mut consumer = CatchUp { total: 0 };
        consumer.on_tick_batch(4);
        consumer.on_tick();
        assert_eq!(consumer.total, 5);
    }
}
