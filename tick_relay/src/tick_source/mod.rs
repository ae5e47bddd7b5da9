// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The adapter that plugs a [`NotificationReader`] into the [`EventLoop`] and turns
//! its readiness into [`TickConsumer`] calls on the loop thread.
//!
//! # Dispatch Rules
//!
//! | Readiness observed          | Channel         | Consumer                     | Result     |
//! | :-------------------------- | :-------------- | :--------------------------- | :--------- |
//! | `error` or `hangup` (any)   | left untouched  | not called                   | [`Stop`]   |
//! | `readable`, drain `n >= 1`  | reset to `0`    | [`on_tick_batch(n)`], once   | its result |
//! | `readable`, drain `0`       | unchanged       | not called (spurious)        | [`Continue`] |
//! | nothing set                 | unchanged       | not called (spurious)        | [`Continue`] |
//! | drain fails                 | unknown         | not called                   | [`Stop`]   |
//!
//! [`Continue`]: crate::Continuation::Continue
//! [`EventLoop`]: crate::core::event_loop::EventLoop
//! [`NotificationReader`]: crate::core::notification_channel::NotificationReader
//! [`Stop`]: crate::Continuation::Stop
//! [`on_tick_batch(n)`]: TickConsumer::on_tick_batch

// Attach sources.
pub mod tick_consumer;
pub mod tick_source_impl;
pub mod tick_source_stats;

// Re-export.
pub use tick_consumer::*;
pub use tick_source_impl::*;
pub use tick_source_stats::*;
