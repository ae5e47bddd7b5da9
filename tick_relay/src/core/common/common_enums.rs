// Copyright (c) 2023-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Control flow signal for loops and the callbacks they drive.
///
/// A unified type for indicating whether a loop or thread should continue processing or
/// stop. Used by:
/// - [`LoopSource::dispatch()`] - keep the source registered, or remove it.
/// - [`TickConsumer::on_tick()`] - keep receiving ticks, or detach.
///
/// [`LoopSource::dispatch()`]: crate::core::event_loop::LoopSource::dispatch
/// [`TickConsumer::on_tick()`]: crate::tick_source::TickConsumer::on_tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuation {
    /// Continue to the next iteration.
    #[default]
    Continue,

    /// Stop processing. For a loop source this removes it from the loop permanently.
    Stop,
}

impl Continuation {
    #[must_use]
    pub const fn is_continue(self) -> bool { matches!(self, Self::Continue) }
}

/// `true` maps to [`Continuation::Continue`], which matches the `continue: bool`
/// convention of callback based loops.
impl From<bool> for Continuation {
    fn from(keep_going: bool) -> Self {
        if keep_going {
            Self::Continue
        } else {
            Self::Stop
        }
    }
}
