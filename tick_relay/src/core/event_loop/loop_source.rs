// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The four-phase contract between the [`EventLoop`] and the things it drives.
//!
//! [`EventLoop`]: super::EventLoop

use super::{Registrar, SourceContext};
use crate::Continuation;
use mio::Token;
use std::{fmt::{Display, Formatter},
          time::Duration};

/// Identifies a source attached to an [`EventLoop`]. Never reused within one loop.
///
/// [`EventLoop`]: super::EventLoop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub(super) u64);

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// Opaque handle returned by [`Registrar::register_descriptor()`]; pass it back to
/// [`SourceContext::query_readiness()`] to read that descriptor's readiness.
///
/// [`Registrar::register_descriptor()`]: super::Registrar::register_descriptor
/// [`SourceContext::query_readiness()`]: super::SourceContext::query_readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterestTag(pub(super) Token);

impl InterestTag {
    #[must_use]
    pub fn token(self) -> Token { self.0 }
}

/// What a source reports in the prepare phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prepare {
    /// Dispatch this source in the current iteration without waiting for the poll.
    pub ready_now: bool,
    /// Upper bound on how long the loop may block on this source's behalf. [`None`]
    /// means no bound.
    pub timeout: Option<Duration>,
}

impl Prepare {
    /// No immediate work, readiness is purely descriptor driven.
    pub const BLOCK_INDEFINITELY: Self = Self {
        ready_now: false,
        timeout: None,
    };

    pub const READY_NOW: Self = Self {
        ready_now: true,
        timeout: Some(Duration::ZERO),
    };

    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            ready_now: false,
            timeout: Some(timeout),
        }
    }
}

impl Default for Prepare {
    fn default() -> Self { Self::BLOCK_INDEFINITELY }
}

/// A custom event source driven by the [`EventLoop`].
///
/// Each [`iteration()`] walks every attached source through these phases:
///
/// | Phase        | Method         | Contract                                                     |
/// | :----------- | :------------- | :----------------------------------------------------------- |
/// | attach       | [`register()`] | Register descriptors with the loop; called exactly once      |
/// | prepare      | [`prepare()`]  | Report immediate work and the longest the loop may block    |
/// | check        | [`check()`]    | After polling: should [`dispatch()`] run this iteration?     |
/// | dispatch     | [`dispatch()`] | Do the work; [`Stop`] removes the source                    |
/// | finalize     | [`finalize()`] | Release resources; called once, after deregistration         |
///
/// Sources run on the loop thread only, so there is no `Send` bound. A source must not
/// block in any phase: a blocked source stalls every other source on the loop.
///
/// [`EventLoop`]: super::EventLoop
/// [`Stop`]: Continuation::Stop
/// [`check()`]: Self::check
/// [`dispatch()`]: Self::dispatch
/// [`finalize()`]: Self::finalize
/// [`iteration()`]: super::EventLoop::iteration
/// [`prepare()`]: Self::prepare
/// [`register()`]: Self::register
pub trait LoopSource {
    /// Registers this source's descriptors.
    ///
    /// # Errors
    ///
    /// Any registration failure; the loop rolls back what was registered, calls
    /// [`finalize()`], and fails the attach.
    ///
    /// [`finalize()`]: Self::finalize
    fn register(&mut self, registrar: &mut Registrar<'_>) -> std::io::Result<()>;

    fn prepare(&mut self) -> Prepare { Prepare::BLOCK_INDEFINITELY }

    /// Defaults to "any registered descriptor reported readable, error, or hangup".
    fn check(&mut self, context: &SourceContext<'_>) -> bool {
        context.has_actionable_readiness()
    }

    fn dispatch(&mut self, context: &mut SourceContext<'_>) -> Continuation;

    fn finalize(&mut self) {}

    /// Used in log lines.
    fn name(&self) -> &str { std::any::type_name::<Self>() }
}
