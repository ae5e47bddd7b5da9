// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words eventfd epoll wakeup

//! # tick_relay
//!
//! Deliver periodic "tick" notifications produced by a background thread into a
//! single-threaded, cooperative event loop that owns all UI state.
//!
//! The background thread never touches loop-owned state. It signals the loop through a
//! lightweight, non-blocking, coalescing notification channel, which the loop polls
//! alongside its other I/O sources:
//!
//! ```text
//! ┌──────────────────────┐  signal()  ┌─────────────────────┐  readable  ┌──────────────────────┐
//! │ BackgroundTicker     ├────────────▶ NotificationChannel ├────────────▶ TickSource (loop     │
//! │ (dedicated thread)   │            │ (eventfd counter)   │            │ thread) drain + call │
//! └──────────────────────┘            └─────────────────────┘            └──────────┬───────────┘
//!                                                                                   │ on_tick()
//!                                                                        ┌──────────▼───────────┐
//!                                                                        │ TickConsumer (UI)    │
//!                                                                        └──────────────────────┘
//! ```
//!
//! | Item                       | Role                                                          |
//! | :------------------------- | :------------------------------------------------------------ |
//! | [`notification_channel()`] | Creates the [`NotificationWriter`] / [`NotificationReader`]   |
//! | [`BackgroundTicker`]       | Cancellable producer thread calling [`signal()`] every period |
//! | [`EventLoop`]              | Single-threaded readiness loop on [`mio::Poll`]               |
//! | [`LoopSource`]             | The prepare / check / dispatch / finalize contract            |
//! | [`TickSource`]             | Adapter: drains the channel, invokes the [`TickConsumer`]     |
//! | [`TimerApp`]               | Wiring of all of the above for the `tick_timer` binary        |
//!
//! # Delivery Guarantee
//!
//! Coalescing is lossy on **count**, never on **occurrence**: any number of
//! [`signal()`] calls between two drains produce at least one wakeup, and each wakeup
//! invokes the consumer exactly once.
//!
//! # Platform
//!
//! Linux only. The channel is an [`eventfd(2)`] and the loop uses [`epoll(7)`] via
//! [`mio`].
//!
//! [`BackgroundTicker`]: crate::core::background_ticker::BackgroundTicker
//! [`EventLoop`]: crate::core::event_loop::EventLoop
//! [`LoopSource`]: crate::core::event_loop::LoopSource
//! [`NotificationReader`]: crate::core::notification_channel::NotificationReader
//! [`NotificationWriter`]: crate::core::notification_channel::NotificationWriter
//! [`TickConsumer`]: crate::tick_source::TickConsumer
//! [`TickSource`]: crate::tick_source::TickSource
//! [`TimerApp`]: crate::app::TimerApp
//! [`epoll(7)`]: https://man7.org/linux/man-pages/man7/epoll.7.html
//! [`eventfd(2)`]: https://man7.org/linux/man-pages/man2/eventfd.2.html
//! [`notification_channel()`]: crate::core::notification_channel::notification_channel
//! [`signal()`]: crate::core::notification_channel::NotificationWriter::signal

// Production library code denies unwrap_in_result; tests are allowed to use .unwrap().
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
#[cfg(target_os = "linux")]
pub mod app;
#[cfg(target_os = "linux")]
pub mod core;
#[cfg(target_os = "linux")]
pub mod tick_source;

// Re-export.
#[cfg(target_os = "linux")]
pub use crate::{app::*, core::*, tick_source::*};
