// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`tracing`] setup: pick where log lines go with [`TracingConfig`], then install it
//! with [`try_initialize_logging_global()`].
//!
//! Logging is **off** unless a binary installs a subscriber. Library code only emits
//! events; it never installs one.

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
pub use tracing_init::*;
