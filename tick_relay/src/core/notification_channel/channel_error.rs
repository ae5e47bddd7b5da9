// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words MFILE NFILE NOMEM NODEV eventfd

use rustix::io::Errno;

/// Errors from the [notification channel].
///
/// | Variant                 | Cause                                        | Policy                         |
/// | :---------------------- | :------------------------------------------- | :----------------------------- |
/// | [`ResourceExhausted`]   | [`eventfd`] creation failed (fd table, etc.) | Degrade to a loop w/o ticks    |
/// | [`ChannelClosed`]       | Writer signaled after the reader was dropped | Producer exits quietly         |
/// | [`Io`]                  | Any other [`syscall`] failure                | Stop delivering ticks, log it  |
///
/// [`ChannelClosed`]: ChannelError::ChannelClosed
/// [`Io`]: ChannelError::Io
/// [`ResourceExhausted`]: ChannelError::ResourceExhausted
/// [`eventfd`]: https://man7.org/linux/man-pages/man2/eventfd.2.html
/// [`syscall`]: https://man7.org/linux/man-pages/man2/syscalls.2.html
/// [notification channel]: super
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ChannelError {
    #[error("Failed to allocate the notification eventfd")]
    #[diagnostic(
        code(tick_relay::channel::resource_exhausted),
        help(
            "The process ran out of file descriptors or kernel memory - \
             check `ulimit -n` and `cat /proc/sys/fs/file-max`"
        )
    )]
    ResourceExhausted(#[source] std::io::Error),

    #[error("Notification channel closed: the reader side has been dropped")]
    #[diagnostic(
        code(tick_relay::channel::closed),
        help("The loop source that owned the reader was removed; stop signaling")
    )]
    ChannelClosed,

    #[error("I/O error on the notification channel")]
    #[diagnostic(code(tick_relay::channel::io))]
    Io(#[source] std::io::Error),
}

impl ChannelError {
    /// Classifies an [`Errno`] returned by `eventfd()` creation.
    #[must_use]
    pub fn from_creation_errno(errno: Errno) -> Self {
        match errno {
            Errno::MFILE | Errno::NFILE | Errno::NOMEM | Errno::NODEV => {
                Self::ResourceExhausted(errno.into())
            }
            other => Self::Io(other.into()),
        }
    }

    #[must_use]
    pub fn is_channel_closed(&self) -> bool { matches!(self, Self::ChannelClosed) }
}
