// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words POLLIN POLLERR POLLHUP POLLNVAL

use rustix::event::PollFlags;
use std::fmt::{Display, Formatter};

/// Readiness of a pollable descriptor, as reported by the loop's polling primitive.
///
/// This is the `{readable, error, hangup}` interest set a [`LoopSource`] registers for.
/// [`mio`] always reports error and hangup conditions, so only `readable` needs to be
/// asked for explicitly.
///
/// A value with no bits set is a **spurious** wakeup: dispatching on it must be a no-op.
///
/// [`LoopSource`]: crate::core::event_loop::LoopSource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readiness {
    pub readable: bool,
    pub error: bool,
    pub hangup: bool,
}

impl Readiness {
    pub const NONE: Self = Self {
        readable: false,
        error: false,
        hangup: false,
    };

    pub const READABLE: Self = Self {
        readable: true,
        error: false,
        hangup: false,
    };

    #[must_use]
    pub const fn is_empty(self) -> bool { !self.readable && !self.error && !self.hangup }

    /// Any bit set.
    #[must_use]
    pub const fn is_actionable(self) -> bool { !self.is_empty() }

    /// The descriptor is presumed unrecoverable.
    #[must_use]
    pub const fn is_broken(self) -> bool { self.error || self.hangup }

    /// Bitwise OR, used to accumulate events reported between two dispatches.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            readable: self.readable || other.readable,
            error: self.error || other.error,
            hangup: self.hangup || other.hangup,
        }
    }
}

impl From<PollFlags> for Readiness {
    fn from(flags: PollFlags) -> Self {
        Self {
            readable: flags.contains(PollFlags::IN),
            error: flags.contains(PollFlags::ERR),
            hangup: flags.intersects(PollFlags::HUP | PollFlags::NVAL),
        }
    }
}

impl From<&mio::event::Event> for Readiness {
    fn from(event: &mio::event::Event) -> Self {
        Self {
            readable: event.is_readable(),
            error: event.is_error(),
            hangup: event.is_read_closed() || event.is_write_closed(),
        }
    }
}

impl Display for Readiness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names = [
            (self.readable, "readable"),
            (self.error, "error"),
            (self.hangup, "hangup"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter_map(|(is_set, name)| is_set.then_some(*name))
            .collect();
        write!(f, "{{{}}}", set.join(","))
    }
}
