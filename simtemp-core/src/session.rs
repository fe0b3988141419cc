// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-consumer sessions and their cursors.
//!
//! A session is what one open handle on the sensor owns. Its cursor records
//! the last sequence number and alert state that consumer has read, and is
//! allocated lazily on the first read or poll by snapshotting whatever is
//! current at that moment. The sample that was already current when the
//! session started is therefore never reported as new.
//!
//! Live cursors are drawn from a bounded pool; dropping the session returns
//! its slot.

use crate::SharedState;
use event_listener::EventListener;
use simtemp_error::{Result, SimtempError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What one consumer has already observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub last_seen_seq: u64,
    pub last_alert: bool,
}

/// Bounded pool of cursor allocations shared by all sessions of one state.
#[derive(Debug)]
pub(crate) struct CursorSlots {
    live: AtomicUsize,
    limit: usize,
}

impl CursorSlots {
    pub(crate) const fn new(limit: usize) -> Self {
        Self {
            live: AtomicUsize::new(0),
            limit,
        }
    }

    pub(crate) fn live(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<()> {
        self.live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                (live < self.limit).then_some(live + 1)
            })
            .map(|_| ())
            .map_err(|_| SimtempError::out_of_memory("consumer cursors", self.limit))
    }

    fn release(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// One consumer's handle on the sensor.
///
/// Reads and readiness polls are implemented in [`delivery`](crate::delivery).
/// Sessions are independent: each one blocks, polls and advances on its own.
#[derive(Debug)]
pub struct ConsumerSession {
    pub(crate) state: Arc<SharedState>,
    id: u64,
    cursor: Option<Cursor>,
    pub(crate) listener: Option<EventListener>,
}

impl ConsumerSession {
    /// Open a session on `state`. No cursor is allocated yet.
    #[must_use]
    pub fn open(state: Arc<SharedState>) -> Self {
        let id = state.next_session_id();
        debug!("session {} opened", id);
        Self {
            state,
            id,
            cursor: None,
            listener: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The cursor, if the session has been touched yet.
    #[must_use]
    pub const fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    #[must_use]
    pub fn state(&self) -> &Arc<SharedState> {
        &self.state
    }

    /// Return the cursor, allocating it from the current snapshot on first use.
    ///
    /// A failed allocation leaves the session untouched so a later call can retry.
    pub(crate) fn touch(&mut self) -> Result<Cursor> {
        if let Some(cursor) = self.cursor {
            return Ok(cursor);
        }

        self.state
            .cursors
            .acquire()
            .map_err(|e| self.state.fail(e))?;

        let snapshot = self.state.snapshot();
        let cursor = Cursor {
            last_seen_seq: snapshot.seq,
            last_alert: snapshot.is_alert(),
        };
        self.cursor = Some(cursor);
        debug!(
            "session {} cursor created at seq={} alert={}",
            self.id, cursor.last_seen_seq, cursor.last_alert
        );
        Ok(cursor)
    }

    /// Move the cursor forward after a successful read.
    pub(crate) fn advance(&mut self, cursor: Cursor) {
        self.cursor = Some(cursor);
    }
}

impl Drop for ConsumerSession {
    fn drop(&mut self) {
        if self.cursor.take().is_some() {
            self.state.cursors.release();
        }
        debug!("session {} closed", self.id);
    }
}

impl SharedState {
    /// Open a new consumer session on this state.
    #[must_use]
    pub fn open_session(self: &Arc<Self>) -> ConsumerSession {
        ConsumerSession::open(Arc::clone(self))
    }
}
