// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words eventfd EINTR EAGAIN CLOEXEC NONBLOCK

use super::{ChannelError, Readiness};
use crate::core::DEBUG_TICK_RELAY_CHANNEL;
use rustix::{event::{EventfdFlags, PollFd, PollFlags, Timespec, eventfd, poll},
             fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd},
             io::{Errno, read, write}};
use std::{io::ErrorKind,
          sync::{Arc, Weak}};

/// The [`eventfd`] counter is always read and written as one native-endian `u64`.
///
/// [`eventfd`]: https://man7.org/linux/man-pages/man2/eventfd.2.html
const COUNTER_WIDTH: usize = size_of::<u64>();

/// The kernel rejects writes of `u64::MAX`; the largest value the counter can hold is
/// one less than that.
const MAX_COUNTER_VALUE: u64 = u64::MAX - 1;

/// Creates the writer and reader endpoints of a new notification channel.
///
/// The [`eventfd`] is opened with `EFD_NONBLOCK | EFD_CLOEXEC` and an initial count of
/// `0`, so the reader starts out not readable.
///
/// # Errors
///
/// - [`ChannelError::ResourceExhausted`] if the OS cannot allocate the descriptor.
/// - [`ChannelError::Io`] for any other creation failure.
///
/// [`eventfd`]: https://man7.org/linux/man-pages/man2/eventfd.2.html
pub fn notification_channel()
-> Result<(NotificationWriter, NotificationReader), ChannelError> {
    let fd = eventfd(0, EventfdFlags::NONBLOCK | EventfdFlags::CLOEXEC)
        .map_err(ChannelError::from_creation_errno)?;

    let reader = NotificationReader { fd: Arc::new(fd) };
    let writer = reader.writer();

    DEBUG_TICK_RELAY_CHANNEL.then(|| {
        tracing::debug!(
            message = "notification channel created",
            fd = reader.as_raw_fd()
        );
    });

    Ok((writer, reader))
}

/// The write side of the notification channel. Usable from any thread.
///
/// Cloning is cheap and every clone signals the same counter. The writer never keeps the
/// descriptor alive on its own, see [Ownership].
///
/// [Ownership]: super#ownership
#[derive(Debug, Clone)]
pub struct NotificationWriter {
    fd: Weak<OwnedFd>,
}

impl NotificationWriter {
    /// Adds `1` to the shared counter. Never blocks.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::ChannelClosed`] if the [`NotificationReader`] was dropped.
    /// - [`ChannelError::Io`] if the write fails for any other reason.
    pub fn signal(&self) -> Result<(), ChannelError> { self.signal_n(1) }

    /// Adds `count` to the shared counter in one write. `0` is a no-op.
    ///
    /// When the counter is saturated the kernel returns `EAGAIN` on a non-blocking
    /// descriptor. That is treated as success: the reader is already readable and the
    /// contract only promises that the occurrence is observed, not the exact count.
    ///
    /// # Errors
    ///
    /// See [`signal()`].
    ///
    /// [`signal()`]: Self::signal
    pub fn signal_n(&self, count: u64) -> Result<(), ChannelError> {
        if count == 0 {
            return Ok(());
        }

        // Hold a strong reference for the duration of the write so the descriptor can't
        // be closed (and its number recycled) underneath us.
        let Some(fd) = self.fd.upgrade() else {
            return Err(ChannelError::ChannelClosed);
        };

        let bytes = count.min(MAX_COUNTER_VALUE).to_ne_bytes();
        loop {
            match write(&*fd, &bytes) {
                Ok(_) => return Ok(()),
                Err(Errno::INTR) => {}
                Err(Errno::AGAIN) => {
                    DEBUG_TICK_RELAY_CHANNEL.then(|| {
                        tracing::debug!(
                            message = "notification counter saturated, signal coalesced"
                        );
                    });
                    return Ok(());
                }
                Err(errno) => return Err(ChannelError::Io(errno.into())),
            }
        }
    }

    /// `true` once the reader side has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool { self.fd.strong_count() == 0 }
}

/// The read side of the notification channel. Owned by the loop thread.
///
/// There is exactly one reader per channel (it is not [`Clone`]). It owns the
/// [`eventfd`] and exposes it through [`AsFd`] / [`AsRawFd`] so that it can be registered
/// with a readiness loop.
///
/// [`eventfd`]: https://man7.org/linux/man-pages/man2/eventfd.2.html
#[derive(Debug)]
pub struct NotificationReader {
    fd: Arc<OwnedFd>,
}

impl NotificationReader {
    /// Atomically fetches the counter and resets it to `0`. Never blocks.
    ///
    /// Returns the number of signals coalesced since the previous drain, or `0` when
    /// nothing is pending.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Io`] if the read fails with anything other than `EAGAIN`.
    pub fn drain(&self) -> Result<u64, ChannelError> {
        let mut buffer = [0_u8; COUNTER_WIDTH];
        loop {
            match read(&*self.fd, &mut buffer[..]) {
                Ok(COUNTER_WIDTH) => {
                    let count = u64::from_ne_bytes(buffer);
                    DEBUG_TICK_RELAY_CHANNEL.then(|| {
                        tracing::debug!(message = "notification channel drained", count);
                    });
                    return Ok(count);
                }
                Ok(short_read) => {
                    return Err(ChannelError::Io(std::io::Error::new(
                        ErrorKind::UnexpectedEof,
                        format!("eventfd read returned {short_read} bytes"),
                    )));
                }
                Err(Errno::INTR) => {}
                Err(Errno::AGAIN) => return Ok(0),
                Err(errno) => return Err(ChannelError::Io(errno.into())),
            }
        }
    }

    /// Reports the current readiness without consuming the counter.
    ///
    /// `readable` is `true` iff the counter is greater than `0`.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Io`] if [`poll(2)`] fails.
    ///
    /// [`poll(2)`]: https://man7.org/linux/man-pages/man2/poll.2.html
    pub fn poll_readiness(&self) -> Result<Readiness, ChannelError> {
        let zero_timeout = Timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        let mut poll_fds = [PollFd::new(&*self.fd, PollFlags::IN)];
        loop {
            match poll(&mut poll_fds, Some(&zero_timeout)) {
                Ok(_) => return Ok(Readiness::from(poll_fds[0].revents())),
                Err(Errno::INTR) => {}
                Err(errno) => return Err(ChannelError::Io(errno.into())),
            }
        }
    }

    /// Mints another writer for this channel. Multiple writers are safe.
    #[must_use]
    pub fn writer(&self) -> NotificationWriter {
        NotificationWriter {
            fd: Arc::downgrade(&self.fd),
        }
    }
}

impl AsFd for NotificationReader {
    fn as_fd(&self) -> BorrowedFd<'_> { self.fd.as_fd() }
}

impl AsRawFd for NotificationReader {
    fn as_raw_fd(&self) -> RawFd { self.fd.as_raw_fd() }
}
