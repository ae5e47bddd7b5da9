// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words SIGINT SIGTERM

use crate::{Continuation,
            core::{LoopHandle, LoopSource, Registrar, SourceContext}};
use mio::Interest;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_mio::v1_0::Signals;

/// Signals that end the app: Ctrl+C and a polite `kill`.
pub const QUIT_SIGNALS: [i32; 2] = [SIGINT, SIGTERM];

/// [`LoopSource`] that quits the loop when one of its signals arrives.
///
/// [`signal_hook_mio`] turns signal delivery into readiness on an internal pipe, so
/// the handler itself does nothing but wake the loop; the quit happens on the loop
/// thread in [`dispatch()`].
///
/// [`dispatch()`]: LoopSource::dispatch
#[allow(missing_debug_implementations)]
pub struct SignalSource {
    signals: Option<Signals>,
    loop_handle: LoopHandle,
}

impl SignalSource {
    /// Installs handlers for `signals` right away.
    ///
    /// # Errors
    ///
    /// If a handler can't be installed (for example for `SIGKILL`).
    pub fn new(signals: &[i32], loop_handle: LoopHandle) -> std::io::Result<Self> {
        Ok(Self {
            signals: Some(Signals::new(signals)?),
            loop_handle,
        })
    }
}

impl LoopSource for SignalSource {
    fn register(&mut self, registrar: &mut Registrar<'_>) -> std::io::Result<()> {
        if let Some(signals) = &mut self.signals {
            registrar.register_source(signals, Interest::READABLE)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, _context: &mut SourceContext<'_>) -> Continuation {
        let Some(signals) = &mut self.signals else {
            return Continuation::Stop;
        };

        // Drain everything; one quit covers any number of pending signals.
        let received: Vec<i32> = signals.pending().collect();
        if !received.is_empty() {
            tracing::info!(message = "quit signal received", signals = ?received);
            self.loop_handle.quit();
        }

        Continuation::Continue
    }

    /// Dropping [`Signals`] unregisters its handlers and closes its pipe, which also
    /// removes it from epoll.
    fn finalize(&mut self) { self.signals = None; }

    fn name(&self) -> &str { "signal-source" }
}
