// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{sync::{Arc, Condvar, Mutex, PoisonError},
          time::{Duration, Instant}};

/// A cloneable, one-shot cancellation flag that a sleeping thread can wait on.
///
/// [`cancel()`] sets the flag and wakes every thread parked in [`wait_timeout()`], so a
/// ticker sleeping through a long period reacts immediately instead of at the end of the
/// period. Once cancelled, a token stays cancelled.
///
/// [`cancel()`]: Self::cancel
/// [`wait_timeout()`]: Self::wait_timeout
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<CancellationState>,
}

#[derive(Debug, Default)]
struct CancellationState {
    is_cancelled: Mutex<bool>,
    condvar: Condvar,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) {
        // A poisoned lock still holds a valid bool; cancellation must never be lost.
        let mut is_cancelled = self
            .inner
            .is_cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *is_cancelled = true;
        self.inner.condvar.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self
            .inner
            .is_cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks for up to `timeout`, returning early if the token is cancelled.
    ///
    /// Returns `true` if the token is cancelled (either before the call or while
    /// waiting), `false` if the full `timeout` elapsed. Spurious condvar wakeups are
    /// absorbed by waiting again until the deadline.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut is_cancelled = self
            .inner
            .is_cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        loop {
            if *is_cancelled {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            is_cancelled = self
                .inner
                .condvar
                .wait_timeout(is_cancelled, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}
