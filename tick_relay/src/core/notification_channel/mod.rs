// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words eventfd wakeup EFD_NONBLOCK

//! A counting, non-blocking, coalescing signal primitive shared between threads.
//!
//! # How It Works
//!
//! The channel is a single [`eventfd(2)`] counter with two roles:
//!
//! | Role                     | Threads          | Operation                                         |
//! | :----------------------- | :--------------- | :------------------------------------------------ |
//! | [`NotificationWriter`]   | any, concurrent  | [`signal()`]: add `1` to the counter              |
//! | [`NotificationReader`]   | the loop thread  | [`drain()`]: fetch the counter and reset it to `0` |
//!
//! Both operations are a single [`syscall`] on a descriptor opened with
//! `EFD_NONBLOCK`, so neither side ever blocks, and the kernel makes the
//! fetch-and-reset atomic with respect to concurrent writers. No locks are involved.
//!
//! Any number of [`signal()`] calls between two [`drain()`] calls collapse into one
//! readable state. The count is preserved (up to saturation), but only the
//! *occurrence* is guaranteed to be observed:
//!
//! ```text
//! signal() signal() signal()           drain() → 3        drain() → 0
//!    │        │        │                  │                  │
//! ───┴────────┴────────┴──── readable ────┴─── not readable ─┴──▶
//! ```
//!
//! # Ownership
//!
//! The reader is the **only** strong owner of the descriptor. Writers hold a [`Weak`]
//! reference, so dropping the reader closes the [`eventfd`] and every later
//! [`signal()`] fails with [`ChannelError::ChannelClosed`] instead of writing to a
//! recycled descriptor number.
//!
//! [`Weak`]: std::sync::Weak
//! [`drain()`]: NotificationReader::drain
//! [`eventfd(2)`]: https://man7.org/linux/man-pages/man2/eventfd.2.html
//! [`eventfd`]: https://man7.org/linux/man-pages/man2/eventfd.2.html
//! [`signal()`]: NotificationWriter::signal
//! [`syscall`]: https://man7.org/linux/man-pages/man2/syscalls.2.html

// Attach sources.
pub mod channel_error;
pub mod eventfd_channel;
pub mod readiness;

// Re-export.
pub use channel_error::*;
pub use eventfd_channel::*;
pub use readiness::*;
