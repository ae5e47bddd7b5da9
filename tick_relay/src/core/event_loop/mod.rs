// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words epoll

//! A single-threaded, readiness-driven event loop with pluggable custom sources.
//!
//! | Item              | Role                                                         |
//! | :---------------- | :----------------------------------------------------------- |
//! | [`EventLoop`]     | Owns the [`mio::Poll`] and every attached source             |
//! | [`LoopSource`]    | The prepare / check / dispatch / finalize contract           |
//! | [`Registrar`]     | Lets a source register its descriptors on attach             |
//! | [`SourceContext`] | Per-dispatch readiness queries and ready-time scheduling     |
//! | [`LoopHandle`]    | Quit or wake the loop from any thread                        |
//!
//! All state touched by sources lives on the loop thread. Other threads reach the loop
//! only through descriptors (for example a [`NotificationWriter`]) or a [`LoopHandle`].
//!
//! [`NotificationWriter`]: crate::core::NotificationWriter

// Attach sources.
pub mod event_loop_impl;
pub mod loop_error;
pub mod loop_handle;
pub mod loop_source;
pub mod registrar;
pub mod source_context;

// Re-export.
pub use event_loop_impl::*;
pub use loop_error::*;
pub use loop_handle::*;
pub use loop_source::*;
pub use registrar::*;
pub use source_context::*;
