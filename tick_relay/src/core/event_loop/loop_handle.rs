// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc,
                atomic::{AtomicBool, Ordering}};

/// Cross-thread control of an [`EventLoop`]. Cheap to clone.
///
/// [`quit()`] sets a flag and then wakes the loop through its [`mio::Waker`], so a loop
/// blocked in [`Poll::poll()`] returns promptly and [`run()`] sees the flag.
///
/// [`EventLoop`]: super::EventLoop
/// [`Poll::poll()`]: mio::Poll::poll
/// [`quit()`]: Self::quit
/// [`run()`]: super::EventLoop::run
#[derive(Debug, Clone)]
pub struct LoopHandle {
    pub(super) waker: Arc<mio::Waker>,
    pub(super) quit_requested: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn quit(&self) {
        self.quit_requested.store(true, Ordering::SeqCst);
        self.wake();
    }

    /// Interrupts a blocking poll without asking the loop to quit.
    ///
    /// The return value of [`mio::Waker::wake()`] is discarded: if the loop has been
    /// dropped there is nothing left to wake.
    pub fn wake(&self) { let _unused = self.waker.wake(); }

    #[must_use]
    pub fn is_quit_requested(&self) -> bool { self.quit_requested.load(Ordering::SeqCst) }

    pub(super) fn take_quit_request(&self) -> bool {
        self.quit_requested.swap(false, Ordering::SeqCst)
    }
}
