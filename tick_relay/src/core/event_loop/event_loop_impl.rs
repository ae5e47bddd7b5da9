// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words EINTR epoll

use super::{LoopError, LoopHandle, LoopSource, SourceContext, SourceId,
            registrar::{RegisteredDescriptor, Registrar, WAKER_TOKEN, deregister_all}};
use crate::{Continuation,
            core::{DEBUG_TICK_RELAY_LOOP, Readiness}};
use mio::{Events, Poll, Token, Waker};
use std::{io::ErrorKind,
          sync::{Arc, atomic::AtomicBool},
          time::{Duration, Instant}};

/// Capacity for the [`mio::Events`] buffer.
const EVENTS_CAPACITY: usize = 16;

/// One attached source and the loop's bookkeeping for it.
struct SourceEntry {
    id: SourceId,
    source: Box<dyn LoopSource>,
    descriptors: Vec<RegisteredDescriptor>,
    ready_time: Option<Instant>,
    is_prepared_ready: bool,
}

/// A single-threaded, cooperative, readiness-driven event loop on [`mio::Poll`].
///
/// Sources are attached as [`LoopSource`] trait objects and then owned by the loop until
/// they are removed, either explicitly via [`remove()`] or by returning
/// [`Continuation::Stop`] from [`dispatch()`].
///
/// # One Iteration
///
/// ```text
/// prepare (all sources) ──▶ poll(timeout) ──▶ accumulate readiness by token
///                                                        │
///      ┌─────────────────────────────────────────────────┘
///      ▼  for each source, in attach order:
///   ready_now? ─or─ ready_time due? ─or─ check()? ──yes──▶ dispatch()
///                                                            │
///                                       Stop ──▶ deregister ─┴─▶ finalize ─▶ drop
/// ```
///
/// The poll timeout is `0` if any source is ready now (or if the caller passed
/// `may_block = false`), else the smallest of every source's [`Prepare::timeout`] and
/// the time left until the nearest ready time. `EINTR` from the poll is retried.
///
/// # Edge-Triggered Readiness
///
/// [`mio`] registers descriptors edge triggered: a descriptor that stays readable is
/// reported once, not on every poll. The loop therefore keeps reported readiness until
/// the owning source has been dispatched, and sources must fully consume their
/// descriptor in [`dispatch()`].
///
/// [`Prepare::timeout`]: super::Prepare::timeout
/// [`dispatch()`]: LoopSource::dispatch
/// [`remove()`]: Self::remove
#[allow(missing_debug_implementations)]
pub struct EventLoop {
    poll_handle: Poll,
    ready_events_buffer: Events,
    sources: Vec<SourceEntry>,
    next_source_id: u64,
    next_token: usize,
    handle: LoopHandle,
}

impl EventLoop {
    /// # Errors
    ///
    /// [`LoopError::PollCreation`] or [`LoopError::WakerCreation`] if the OS resources
    /// can't be allocated.
    pub fn new() -> Result<Self, LoopError> {
        let poll_handle = Poll::new().map_err(LoopError::PollCreation)?;
        let waker =
            Waker::new(poll_handle.registry(), WAKER_TOKEN).map_err(LoopError::WakerCreation)?;

        Ok(Self {
            poll_handle,
            ready_events_buffer: Events::with_capacity(EVENTS_CAPACITY),
            sources: Vec::new(),
            next_source_id: 0,
            next_token: WAKER_TOKEN.0 + 1,
            handle: LoopHandle {
                waker: Arc::new(waker),
                quit_requested: Arc::new(AtomicBool::new(false)),
            },
        })
    }

    #[must_use]
    pub fn handle(&self) -> LoopHandle { self.handle.clone() }

    /// Takes ownership of `source` and calls its [`register()`].
    ///
    /// # Errors
    ///
    /// [`LoopError::Registration`] if [`register()`] fails. Anything it registered
    /// before failing is deregistered and the source is finalized and dropped.
    ///
    /// [`register()`]: LoopSource::register
    pub fn attach(&mut self, mut source: Box<dyn LoopSource>) -> Result<SourceId, LoopError> {
        let mut descriptors = Vec::new();
        let mut registrar = Registrar {
            registry: self.poll_handle.registry(),
            next_token: &mut self.next_token,
            descriptors: &mut descriptors,
        };

        if let Err(error) = source.register(&mut registrar) {
            deregister_all(self.poll_handle.registry(), &descriptors);
            source.finalize();
            return Err(LoopError::Registration {
                source_name: source.name().to_string(),
                error,
            });
        }

        let id = SourceId(self.next_source_id);
        self.next_source_id += 1;

        DEBUG_TICK_RELAY_LOOP.then(|| {
            tracing::debug!(
                message = "source attached",
                %id,
                name = source.name(),
                descriptors = descriptors.len()
            );
        });

        self.sources.push(SourceEntry {
            id,
            source,
            descriptors,
            ready_time: None,
            is_prepared_ready: false,
        });

        Ok(id)
    }

    /// Deregisters and finalizes the source. Returns `false` if `id` is not attached
    /// (never was, or already removed).
    pub fn remove(&mut self, id: SourceId) -> bool {
        let Some(index) = self.sources.iter().position(|it| it.id == id) else {
            return false;
        };
        let entry = self.sources.remove(index);
        self.teardown(entry);
        true
    }

    #[must_use]
    pub fn contains(&self, id: SourceId) -> bool { self.sources.iter().any(|it| it.id == id) }

    #[must_use]
    pub fn source_count(&self) -> usize { self.sources.len() }

    /// Runs one prepare, poll, check, dispatch cycle. Returns the number of dispatches.
    ///
    /// With `may_block = false` the poll returns immediately, which makes this usable
    /// to pump the loop from tests or from another loop.
    ///
    /// # Errors
    ///
    /// [`LoopError::Poll`] if [`Poll::poll()`] fails with anything but `EINTR`.
    pub fn iteration(&mut self, may_block: bool) -> Result<usize, LoopError> {
        let prepared_timeout = self.prepare_all();
        let timeout = if may_block {
            prepared_timeout
        } else {
            Some(Duration::ZERO)
        };

        self.poll_and_accumulate(timeout)?;

        Ok(self.check_and_dispatch_all())
    }

    /// Iterates until [`LoopHandle::quit()`] is called. A quit requested before `run()`
    /// makes it return right away. The request is consumed on return, so the loop can
    /// be run again.
    ///
    /// # Errors
    ///
    /// See [`iteration()`].
    ///
    /// [`iteration()`]: Self::iteration
    pub fn run(&mut self) -> Result<(), LoopError> {
        DEBUG_TICK_RELAY_LOOP.then(|| {
            tracing::debug!(message = "event loop running", sources = self.sources.len());
        });

        while !self.handle.is_quit_requested() {
            self.iteration(true)?;
        }
        self.handle.take_quit_request();

        DEBUG_TICK_RELAY_LOOP.then(|| {
            tracing::debug!(message = "event loop quit", sources = self.sources.len());
        });

        Ok(())
    }

    /// Returns the poll timeout: [`None`] blocks until a descriptor is ready.
    fn prepare_all(&mut self) -> Option<Duration> {
        let now = Instant::now();
        let mut timeout: Option<Duration> = None;
        let mut tighten = |candidate: Duration| {
            timeout = Some(timeout.map_or(candidate, |current| current.min(candidate)));
        };

        for entry in &mut self.sources {
            let prepare = entry.source.prepare();
            entry.is_prepared_ready = prepare.ready_now;
            if prepare.ready_now {
                tighten(Duration::ZERO);
            }
            if let Some(source_timeout) = prepare.timeout {
                tighten(source_timeout);
            }
            if let Some(ready_time) = entry.ready_time {
                tighten(ready_time.saturating_duration_since(now));
            }
        }

        timeout
    }

    fn poll_and_accumulate(&mut self, timeout: Option<Duration>) -> Result<(), LoopError> {
        loop {
            match self.poll_handle.poll(&mut self.ready_events_buffer, timeout) {
                Ok(()) => break,
                Err(error) if error.kind() == ErrorKind::Interrupted => {}
                Err(error) => return Err(LoopError::Poll(error)),
            }
        }

        for event in &self.ready_events_buffer {
            let token = event.token();
            if token == WAKER_TOKEN {
                continue;
            }
            match find_descriptor(&mut self.sources, token) {
                Some(descriptor) => {
                    descriptor.pending = descriptor.pending.merge(Readiness::from(event));
                }
                None => handle_unknown(token),
            }
        }

        Ok(())
    }

    fn check_and_dispatch_all(&mut self) -> usize {
        let now = Instant::now();
        let mut dispatched = 0;
        let mut index = 0;

        while index < self.sources.len() {
            let entry = &mut self.sources[index];
            let is_time_due = entry.ready_time.is_some_and(|it| it <= now);
            let mut context =
                SourceContext::new(entry.id, &entry.descriptors, &mut entry.ready_time);

            let is_ready =
                entry.is_prepared_ready || is_time_due || entry.source.check(&context);
            if !is_ready {
                index += 1;
                continue;
            }

            let continuation = entry.source.dispatch(&mut context);
            dispatched += 1;
            entry.is_prepared_ready = false;
            for descriptor in &mut entry.descriptors {
                descriptor.pending = Readiness::NONE;
            }

            match continuation {
                Continuation::Continue => index += 1,
                Continuation::Stop => {
                    let entry = self.sources.remove(index);
                    DEBUG_TICK_RELAY_LOOP.then(|| {
                        tracing::debug!(
                            message = "source requested removal",
                            id = %entry.id,
                            name = entry.source.name()
                        );
                    });
                    self.teardown(entry);
                }
            }
        }

        dispatched
    }

    /// Deregister, then finalize, then drop.
    fn teardown(&self, mut entry: SourceEntry) {
        deregister_all(self.poll_handle.registry(), &entry.descriptors);
        entry.source.finalize();
        DEBUG_TICK_RELAY_LOOP.then(|| {
            tracing::debug!(
                message = "source finalized",
                id = %entry.id,
                name = entry.source.name()
            );
        });
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        for entry in std::mem::take(&mut self.sources) {
            self.teardown(entry);
        }
    }
}

fn find_descriptor(
    sources: &mut [SourceEntry],
    token: Token,
) -> Option<&mut RegisteredDescriptor> {
    sources
        .iter_mut()
        .flat_map(|it| it.descriptors.iter_mut())
        .find(|it| it.tag.token() == token)
}

/// Events for a token that no longer belongs to any source (removed earlier in the same
/// batch) are dropped.
fn handle_unknown(token: Token) {
    DEBUG_TICK_RELAY_LOOP.then(|| {
        tracing::debug!(message = "event for unknown token dropped", ?token);
    });
}
