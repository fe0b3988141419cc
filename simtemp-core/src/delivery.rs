// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Blocking reads and readiness polling over the shared sequence counter.
//!
//! ## Wake discipline
//!
//! Every tick broadcasts to all listeners. A woken consumer does not assume
//! the wake was meant for it: it re-reads the sequence and compares it with
//! its own cursor. Listeners are always registered *before* the final check,
//! so a tick landing between check and registration is never lost.
//!
//! ## Cursor rules
//!
//! - A read advances the cursor (sequence and alert state together) only
//!   after the record reached the caller.
//! - A poll never advances the cursor.
//! - `alerts` is bumped when a read observes an alert state different from
//!   the one this session recorded last. Each session counts its own edges,
//!   so N consumers observing the same crossing add N.
//!
//! ## Example
//!
//! ```
//! use simtemp_core::{Interrupt, SharedState, SimtempConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let state = Arc::new(SharedState::new(SimtempConfig::default()).unwrap());
//! let mut session = state.open_session();
//! let interrupt = Interrupt::new();
//!
//! // First touch snapshots the current sample; it is not "new" to us.
//! assert!(!session.readiness().unwrap().readable);
//!
//! state.apply_tick();
//!
//! let record = session.read_record(&interrupt).await.unwrap();
//! assert_eq!(record.temp_mc, 44_010);
//! # }
//! ```

use crate::sample_record::{RecordSink, SampleFlags, SampleRecord, RECORD_SIZE};
use crate::session::{ConsumerSession, Cursor};
use crate::shared_state::Snapshot;
use crate::Interrupt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::future::poll_fn;
use futures::{pin_mut, select_biased, FutureExt};
use simtemp_error::{Result, SimtempError};

/// Readiness bits reported to multiplexing callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    /// A sample this session has not read yet is available.
    pub readable: bool,
    /// The alert state differs from the one this session last read.
    pub priority: bool,
}

impl Readiness {
    pub const READABLE_BIT: u32 = 1 << 0;
    pub const PRIORITY_BIT: u32 = 1 << 1;

    #[must_use]
    pub const fn is_ready(self) -> bool {
        self.readable || self.priority
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        let mut bits = 0;
        if self.readable {
            bits |= Self::READABLE_BIT;
        }
        if self.priority {
            bits |= Self::PRIORITY_BIT;
        }
        bits
    }

    fn against(snapshot: &Snapshot, cursor: Cursor) -> Self {
        Self {
            readable: snapshot.seq != cursor.last_seen_seq,
            priority: snapshot.is_alert() != cursor.last_alert,
        }
    }
}

impl ConsumerSession {
    /// Wait for the next unseen sample and deliver it into `sink`.
    ///
    /// Returns the number of bytes delivered, always [`RECORD_SIZE`].
    ///
    /// There is no built-in timeout; race this future against a timer if one
    /// is needed. Dropping the future mid-wait leaves the cursor untouched.
    ///
    /// # Errors
    /// - `InvalidArgument` if `sink` cannot hold one record (checked before waiting)
    /// - `Interrupted` if `interrupt` is raised while waiting
    /// - `Fault` if `sink` rejects the record
    /// - `OutOfMemory` if this is the first touch and no cursor slot is free
    pub async fn read<S>(&mut self, sink: &mut S, interrupt: &Interrupt) -> Result<usize>
    where
        S: RecordSink + ?Sized,
    {
        if sink.capacity() < RECORD_SIZE {
            return Err(self.state.fail(SimtempError::invalid_argument(format!(
                "read buffer of {} bytes is smaller than one {RECORD_SIZE}-byte record",
                sink.capacity()
            ))));
        }

        let (record, next) = self.next_record(interrupt).await?;
        sink.deliver(&record.to_bytes())
            .map_err(|e| self.state.fail(e))?;
        self.commit(next);
        Ok(RECORD_SIZE)
    }

    /// Wait for the next unseen sample and return it decoded.
    ///
    /// # Errors
    /// Same as [`read`](Self::read), minus the sink-related ones.
    pub async fn read_record(&mut self, interrupt: &Interrupt) -> Result<SampleRecord> {
        let (record, next) = self.next_record(interrupt).await?;
        self.commit(next);
        Ok(record)
    }

    /// Report readiness and register `cx` to be woken by the next tick.
    ///
    /// The cursor is created on first use but never advanced here.
    ///
    /// # Errors
    /// `OutOfMemory` if this is the first touch and no cursor slot is free.
    pub fn poll_readiness(&mut self, cx: &mut Context<'_>) -> Result<Readiness> {
        let cursor = self.touch()?;

        let mut listener = self.state.listen();
        // Ready here means a tick already fired; the snapshot below sees it.
        let _ = Pin::new(&mut listener).poll(cx);
        self.listener = Some(listener);

        Ok(Readiness::against(&self.state.snapshot(), cursor))
    }

    /// Report readiness without registering for a wake-up.
    ///
    /// # Errors
    /// `OutOfMemory` if this is the first touch and no cursor slot is free.
    pub fn readiness(&mut self) -> Result<Readiness> {
        let cursor = self.touch()?;
        Ok(Readiness::against(&self.state.snapshot(), cursor))
    }

    /// Resolve once either readiness bit is set.
    ///
    /// # Errors
    /// `OutOfMemory` if this is the first touch and no cursor slot is free.
    pub async fn ready(&mut self) -> Result<Readiness> {
        poll_fn(|cx| match self.poll_readiness(cx) {
            Ok(readiness) if !readiness.is_ready() => Poll::Pending,
            other => Poll::Ready(other),
        })
        .await
    }

    async fn next_record(&mut self, interrupt: &Interrupt) -> Result<(SampleRecord, Cursor)> {
        let cursor = self.touch()?;
        self.wait_for_new_sample(cursor, interrupt).await?;

        let snapshot = self.state.snapshot();
        let alert = snapshot.is_alert();
        let mut flags = SampleFlags::NEW_SAMPLE;
        if alert {
            flags |= SampleFlags::THRESHOLD_CROSSED;
        }

        let record = SampleRecord {
            timestamp_ns: snapshot.timestamp_ns,
            temp_mc: snapshot.temp_mc,
            flags,
        };
        let next = Cursor {
            last_seen_seq: snapshot.seq,
            last_alert: alert,
        };
        Ok((record, next))
    }

    async fn wait_for_new_sample(&self, cursor: Cursor, interrupt: &Interrupt) -> Result<()> {
        loop {
            if self.state.sequence() != cursor.last_seen_seq {
                return Ok(());
            }

            let woken = self.state.listen();

            // A tick between the first check and registration would otherwise be missed.
            if self.state.sequence() != cursor.last_seen_seq {
                return Ok(());
            }

            let mut woken = woken.fuse();
            let raised = interrupt.raised().fuse();
            pin_mut!(raised);

            select_biased! {
                () = woken => {}
                () = raised => {
                    return Err(self.state.fail(SimtempError::Interrupted));
                }
            }
        }
    }

    fn commit(&mut self, next: Cursor) {
        if let Some(prev) = self.cursor() {
            if prev.last_alert != next.last_alert {
                self.state.record_alert();
                debug!(
                    "session {} observed alert edge {} -> {}",
                    self.id(),
                    prev.last_alert,
                    next.last_alert
                );
            }
        }
        self.advance(next);
    }
}
