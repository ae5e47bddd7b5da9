// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words epoll

/// Errors from the [`EventLoop`].
///
/// | Variant            | Cause                                                   |
/// | :----------------- | :------------------------------------------------------ |
/// | [`PollCreation`]   | [`mio::Poll::new()`] failed (epoll instance)            |
/// | [`WakerCreation`]  | [`mio::Waker::new()`] failed (eventfd)                  |
/// | [`Registration`]   | A source's [`register()`] failed; it was not attached   |
/// | [`Poll`]           | [`mio::Poll::poll()`] failed with something other than `EINTR` |
///
/// [`EventLoop`]: super::EventLoop
/// [`PollCreation`]: Self::PollCreation
/// [`Poll`]: Self::Poll
/// [`Registration`]: Self::Registration
/// [`WakerCreation`]: Self::WakerCreation
/// [`mio::Poll::new()`]: mio::Poll::new
/// [`mio::Poll::poll()`]: mio::Poll::poll
/// [`mio::Waker::new()`]: mio::Waker::new
/// [`register()`]: super::LoopSource::register
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum LoopError {
    #[error("Failed to create mio::Poll")]
    #[diagnostic(
        code(tick_relay::event_loop::poll_creation),
        help("This usually means the system ran out of file descriptors")
    )]
    PollCreation(#[source] std::io::Error),

    #[error("Failed to create mio::Waker")]
    #[diagnostic(
        code(tick_relay::event_loop::waker_creation),
        help("This usually means the system ran out of file descriptors")
    )]
    WakerCreation(#[source] std::io::Error),

    #[error("Failed to register loop source `{source_name}`")]
    #[diagnostic(code(tick_relay::event_loop::registration))]
    Registration {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("mio::Poll::poll() failed")]
    #[diagnostic(code(tick_relay::event_loop::poll))]
    Poll(#[source] std::io::Error),
}
