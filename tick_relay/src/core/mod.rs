// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Building blocks: the notification channel, the background ticker, the event loop,
//! and the ambient pieces (control flow, logging) they share.

/// Per-module debug switches. Verbose, per-tick logging is wrapped in
/// `DEBUG_X.then(|| ...)` so it costs nothing when the switch is off. Warnings and
/// errors are always emitted regardless of these flags.
pub const DEBUG_TICK_RELAY_CHANNEL: bool = false;
pub const DEBUG_TICK_RELAY_LOOP: bool = false;
pub const DEBUG_TICK_RELAY_TICKER: bool = false;

// Attach sources.
pub mod background_ticker;
pub mod common;
pub mod event_loop;
pub mod log;
pub mod notification_channel;

// Re-export.
pub use background_ticker::*;
pub use common::*;
pub use event_loop::*;
pub use log::*;
pub use notification_channel::*;
