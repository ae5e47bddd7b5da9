// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::InterestTag;
use crate::core::Readiness;
use mio::{Interest, Registry, Token, event::Source, unix::SourceFd};
use std::os::fd::{AsRawFd, RawFd};

/// Reserved for the loop's own [`mio::Waker`]. Source tokens start after it.
pub(super) const WAKER_TOKEN: Token = Token(0);

/// A descriptor registered on behalf of one source, plus the readiness reported for it
/// since that source was last dispatched.
#[derive(Debug)]
pub(super) struct RegisteredDescriptor {
    pub tag: InterestTag,
    /// [`Some`] for descriptors registered by number, which the loop deregisters on
    /// removal. [`None`] for [`mio`] sources the owning source closes in
    /// [`finalize()`].
    ///
    /// [`finalize()`]: super::LoopSource::finalize
    pub raw_fd: Option<RawFd>,
    pub pending: Readiness,
}

/// Handed to [`LoopSource::register()`] so a source can register its descriptors
/// without seeing the rest of the loop.
///
/// Every registration gets a fresh [`Token`], so two sources can never be confused even
/// if they register the same descriptor number one after the other.
///
/// [`LoopSource::register()`]: super::LoopSource::register
#[allow(missing_debug_implementations)]
pub struct Registrar<'a> {
    pub(super) registry: &'a Registry,
    pub(super) next_token: &'a mut usize,
    pub(super) descriptors: &'a mut Vec<RegisteredDescriptor>,
}

impl Registrar<'_> {
    /// Registers a raw descriptor. The loop deregisters it when the source is removed,
    /// before [`finalize()`] runs, so the source may close it there.
    ///
    /// Error and hangup conditions are always reported by epoll, so `interest` only
    /// needs [`Interest::READABLE`] for the `{readable, error, hangup}` set.
    ///
    /// # Errors
    ///
    /// The [`Registry::register()`] failure.
    ///
    /// [`finalize()`]: super::LoopSource::finalize
    pub fn register_descriptor(
        &mut self,
        fd: &impl AsRawFd,
        interest: Interest,
    ) -> std::io::Result<InterestTag> {
        let raw_fd = fd.as_raw_fd();
        let token = self.allocate_token();
        self.registry
            .register(&mut SourceFd(&raw_fd), token, interest)?;
        Ok(self.track(token, Some(raw_fd)))
    }

    /// Registers a [`mio`] [`Source`] (for example [`signal_hook_mio`] signals).
    ///
    /// The loop cannot reach the source later to deregister it; the owning
    /// [`LoopSource`] must drop it in [`finalize()`], which removes it from epoll.
    ///
    /// # Errors
    ///
    /// The [`Registry::register()`] failure.
    ///
    /// [`LoopSource`]: super::LoopSource
    /// [`finalize()`]: super::LoopSource::finalize
    pub fn register_source<S: Source + ?Sized>(
        &mut self,
        source: &mut S,
        interest: Interest,
    ) -> std::io::Result<InterestTag> {
        let token = self.allocate_token();
        self.registry.register(source, token, interest)?;
        Ok(self.track(token, None))
    }

    fn allocate_token(&mut self) -> Token {
        let token = Token(*self.next_token);
        *self.next_token += 1;
        token
    }

    fn track(&mut self, token: Token, raw_fd: Option<RawFd>) -> InterestTag {
        let tag = InterestTag(token);
        self.descriptors.push(RegisteredDescriptor {
            tag,
            raw_fd,
            pending: Readiness::NONE,
        });
        tag
    }
}

/// Removes every raw descriptor in `descriptors` from `registry`. Errors are ignored:
/// the descriptor may already be closed, which removes it from epoll anyway.
pub(super) fn deregister_all(registry: &Registry, descriptors: &[RegisteredDescriptor]) {
    for raw_fd in descriptors.iter().filter_map(|it| it.raw_fd) {
        let _unused = registry.deregister(&mut SourceFd(&raw_fd));
    }
}
