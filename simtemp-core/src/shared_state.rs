// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The single lock-guarded store behind the sensor.
//!
//! [`SharedState`] owns the current temperature, the sequence counter, the
//! live configuration, the generator and the statistics behind one
//! `parking_lot::Mutex`. Every tick mutates temperature and sequence inside
//! the same critical section and then broadcasts on an [`Event`], so any
//! observer that sees sequence `N` also sees the temperature written at tick `N`.
//!
//! Construct it once at start-up, wrap it in an `Arc`, and hand clones to
//! the producer ([`apply_tick`](SharedState::apply_tick)), to configuration
//! writers, and to every [`ConsumerSession`](crate::ConsumerSession).
//!
//! ```
//! use simtemp_core::{SharedState, SimtempConfig};
//!
//! let state = SharedState::new(SimtempConfig::default()).unwrap();
//! let before = state.snapshot();
//!
//! let after = state.apply_tick();
//!
//! assert_eq!(after.seq, before.seq + 1);
//! assert_eq!(after.temp_mc, before.temp_mc + 10);
//! ```

use crate::config::{Config, SimtempConfig};
use crate::generator::SampleGenerator;
use crate::session::CursorSlots;
use crate::stats::Stats;
use event_listener::{Event, EventListener};
use parking_lot::Mutex;
use simtemp_error::{Result, SimtempError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A consistent view of the values a consumer needs, taken under one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub temp_mc: i32,
    pub seq: u64,
    pub threshold_mc: i32,
    /// Monotonic time of the tick that produced `temp_mc`.
    pub timestamp_ns: u64,
}

impl Snapshot {
    /// Alert state against the threshold captured in this snapshot.
    #[must_use]
    pub const fn is_alert(&self) -> bool {
        self.temp_mc >= self.threshold_mc
    }
}

#[derive(Debug)]
pub(crate) struct Inner {
    pub(crate) temp_mc: i32,
    pub(crate) seq: u64,
    pub(crate) timestamp_ns: u64,
    pub(crate) config: Config,
    pub(crate) stats: Stats,
    generator: SampleGenerator,
}

impl Inner {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            temp_mc: self.temp_mc,
            seq: self.seq,
            threshold_mc: self.config.threshold_mc,
            timestamp_ns: self.timestamp_ns,
        }
    }
}

/// Shared sensor state: one lock, one broadcast wake.
#[derive(Debug)]
pub struct SharedState {
    inner: Mutex<Inner>,
    wake: Event,
    origin: Instant,
    pub(crate) cursors: CursorSlots,
    next_session_id: AtomicU64,
}

impl SharedState {
    /// Build the state from a validated start-up configuration.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `config` fails [`SimtempConfig::validate`].
    pub fn new(config: SimtempConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "simtemp state created: samplingMs={} thresholdMC={} mode={} temp={}",
            config.sampling_ms, config.threshold_mc, config.mode, config.initial_temp_mc
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                temp_mc: config.initial_temp_mc,
                seq: 0,
                timestamp_ns: 0,
                config: config.live(),
                stats: Stats::default(),
                generator: SampleGenerator::new(config.seed),
            }),
            wake: Event::new(),
            origin: Instant::now(),
            cursors: CursorSlots::new(config.max_sessions),
            next_session_id: AtomicU64::new(1),
        })
    }

    /// Temperature, sequence, threshold and timestamp, read together.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    /// Current sequence number.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.inner.lock().seq
    }

    /// Advance the simulation by one tick and wake every waiting consumer.
    ///
    /// Meant to be driven by the periodic producer only. Never fails: the
    /// mode is a closed enum, so every tick has a defined transition.
    pub fn apply_tick(&self) -> Snapshot {
        let snapshot = {
            let mut inner = self.inner.lock();
            let mode = inner.config.mode;
            let prev = inner.temp_mc;
            let next = inner.generator.next(mode, prev);
            inner.temp_mc = next;
            inner.seq = inner.seq.wrapping_add(1);
            inner.timestamp_ns = self.elapsed_ns();
            inner.stats.record_update();
            inner.snapshot()
        };

        trace!("tick seq={} temp={}", snapshot.seq, snapshot.temp_mc);
        self.wake.notify(usize::MAX);
        snapshot
    }

    /// Current statistics.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.inner.lock().stats
    }

    /// Number of consumer cursors currently allocated.
    #[must_use]
    pub fn live_cursors(&self) -> usize {
        self.cursors.live()
    }

    pub(crate) fn lock(&self) -> parking_lot::MutexGuard<'_, Inner> {
        self.inner.lock()
    }

    /// Register interest in the next tick.
    pub(crate) fn listen(&self) -> EventListener {
        self.wake.listen()
    }

    /// Record `err` as the most recent failure and hand it back.
    pub(crate) fn fail(&self, err: SimtempError) -> SimtempError {
        self.inner.lock().stats.record_error(err.code());
        warn!("simtemp: {}", err);
        err
    }

    pub(crate) fn record_alert(&self) {
        self.inner.lock().stats.record_alert();
    }

    pub(crate) fn next_session_id(&self) -> u64 {
        self.next_session_id.fetch_add(1, Ordering::Relaxed)
    }

    fn elapsed_ns(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}
