// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A dedicated thread that periodically signals a [`NotificationWriter`]. See
//! [`BackgroundTicker`] for the lifecycle and [`TickerExit`] for how it ends.
//!
//! [`NotificationWriter`]: crate::core::NotificationWriter

// Attach sources.
pub mod cancellation_token;
pub mod ticker_thread;
pub mod ticker_types;

// Re-export.
pub use cancellation_token::*;
pub use ticker_thread::*;
pub use ticker_types::*;
