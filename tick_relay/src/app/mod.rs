// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The `tick_timer` app: a counter label refreshed by background ticks, wired from the
//! [core] building blocks. See [`TimerApp`].
//!
//! [core]: crate::core

// Attach sources.
pub mod clap_config;
pub mod label_sink;
pub mod signal_source;
pub mod tick_display;
pub mod timer_app;

// Re-export.
pub use clap_config::*;
pub use label_sink::*;
pub use signal_source::*;
pub use tick_display::*;
pub use timer_app::*;
