// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{InterestTag, SourceId, registrar::RegisteredDescriptor};
use crate::core::Readiness;
use std::time::Instant;

/// A source's view of the loop during [`check()`] and [`dispatch()`].
///
/// [`check()`]: super::LoopSource::check
/// [`dispatch()`]: super::LoopSource::dispatch
#[allow(missing_debug_implementations)]
pub struct SourceContext<'a> {
    source_id: SourceId,
    descriptors: &'a [RegisteredDescriptor],
    ready_time: &'a mut Option<Instant>,
}

impl<'a> SourceContext<'a> {
    pub(super) fn new(
        source_id: SourceId,
        descriptors: &'a [RegisteredDescriptor],
        ready_time: &'a mut Option<Instant>,
    ) -> Self {
        Self {
            source_id,
            descriptors,
            ready_time,
        }
    }

    #[must_use]
    pub fn source_id(&self) -> SourceId { self.source_id }

    /// Readiness accumulated for `tag` since this source was last dispatched. Unknown
    /// tags report [`Readiness::NONE`].
    #[must_use]
    pub fn query_readiness(&self, tag: InterestTag) -> Readiness {
        self.descriptors
            .iter()
            .find(|it| it.tag == tag)
            .map_or(Readiness::NONE, |it| it.pending)
    }

    #[must_use]
    pub fn has_actionable_readiness(&self) -> bool {
        self.descriptors.iter().any(|it| it.pending.is_actionable())
    }

    /// Schedules a time-driven dispatch. [`None`] means never; the source is then only
    /// dispatched on descriptor readiness or [`Prepare::ready_now`].
    ///
    /// [`Prepare::ready_now`]: super::Prepare::ready_now
    pub fn set_ready_time(&mut self, ready_time: Option<Instant>) {
        *self.ready_time = ready_time;
    }

    #[must_use]
    pub fn ready_time(&self) -> Option<Instant> { *self.ready_time }
}
