// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc,
                atomic::{AtomicU64, Ordering}};

/// A snapshot of what a [`TickSource`] has done so far.
///
/// [`TickSource`]: super::TickSource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSourceStats {
    /// Every call to the dispatch logic, including no-ops.
    pub dispatches: u64,
    /// Consumer invocations.
    pub ticks_delivered: u64,
    /// Sum of every drained count.
    pub signals_coalesced: u64,
    /// Dispatches that found nothing to do.
    pub spurious_wakeups: u64,
}

/// Shared read access to a [`TickSource`]'s counters, usable after the loop has taken
/// ownership of the source, and from other threads.
///
/// [`TickSource`]: super::TickSource
#[derive(Debug, Clone, Default)]
pub struct TickSourceStatsHandle {
    inner: Arc<TickSourceCounters>,
}

#[derive(Debug, Default)]
struct TickSourceCounters {
    dispatches: AtomicU64,
    ticks_delivered: AtomicU64,
    signals_coalesced: AtomicU64,
    spurious_wakeups: AtomicU64,
}

impl TickSourceStatsHandle {
    #[must_use]
    pub fn snapshot(&self) -> TickSourceStats {
        TickSourceStats {
            dispatches: self.inner.dispatches.load(Ordering::SeqCst),
            ticks_delivered: self.inner.ticks_delivered.load(Ordering::SeqCst),
            signals_coalesced: self.inner.signals_coalesced.load(Ordering::SeqCst),
            spurious_wakeups: self.inner.spurious_wakeups.load(Ordering::SeqCst),
        }
    }

    pub(super) fn record_dispatch(&self) {
        self.inner.dispatches.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn record_delivery(&self, coalesced: u64) {
        self.inner.ticks_delivered.fetch_add(1, Ordering::SeqCst);
        self.inner
            .signals_coalesced
            .fetch_add(coalesced, Ordering::SeqCst);
    }

    pub(super) fn record_spurious(&self) {
        self.inner.spurious_wakeups.fetch_add(1, Ordering::SeqCst);
    }
}
