// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The periodic producer.
//!
//! The ticker re-arms after every tick, reading the sampling period afresh at
//! each rearm. The effective cadence is therefore `period + processing
//! latency`, and a period change never shortens a wait already in flight.

use crate::timer::Timer;
use core::time::Duration;
use futures::{pin_mut, select_biased, FutureExt};
use simtemp_core::{Interrupt, SharedState};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Handle to a spawned producer task.
///
/// Dropping the handle stops the task at its next wake-up.
///
/// ```
/// use simtemp_core::{SharedState, SimtempConfig};
/// use simtemp_exec::{Ticker, TokioTimer};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let state = Arc::new(SharedState::new(SimtempConfig::default().with_sampling_ms(1)).unwrap());
/// let ticker = Ticker::spawn(state.clone(), TokioTimer);
///
/// tokio::time::sleep(std::time::Duration::from_millis(20)).await;
/// let ticks = ticker.shutdown().await.unwrap();
///
/// assert_eq!(u64::from(state.stats().updates), ticks);
/// # }
/// ```
#[derive(Debug)]
pub struct Ticker {
    stop: Interrupt,
    handle: Option<JoinHandle<u64>>,
}

impl Ticker {
    /// Spawn the producer on the current tokio runtime.
    #[must_use]
    pub fn spawn<T: Timer>(state: Arc<SharedState>, timer: T) -> Self {
        let stop = Interrupt::new();
        let handle = tokio::spawn(run(state, timer, stop.clone()));
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Ask the producer to stop. Does not wait for it.
    pub fn stop(&self) {
        self.stop.raise();
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_raised()
    }

    /// Stop the producer and wait for it to finish.
    ///
    /// Returns the number of ticks it produced, or `None` if the task panicked
    /// or was aborted.
    pub async fn shutdown(mut self) -> Option<u64> {
        self.stop();
        let handle = self.handle.take()?;
        handle.await.ok()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop.raise();
    }
}

async fn run<T: Timer>(state: Arc<SharedState>, timer: T, stop: Interrupt) -> u64 {
    info!("ticker started: samplingMs={}", state.sampling_ms());
    let mut ticks = 0u64;

    loop {
        let period = Duration::from_millis(u64::from(state.sampling_ms()));
        let armed_at = timer.now();

        let sleep = timer.sleep_future(period).fuse();
        let stopped = stop.raised().fuse();
        pin_mut!(sleep, stopped);

        select_biased! {
            () = stopped => break,
            () = sleep => {
                let snapshot = state.apply_tick();
                ticks += 1;
                debug!(
                    "tick seq={} temp={} after {:?}",
                    snapshot.seq,
                    snapshot.temp_mc,
                    timer.now() - armed_at
                );
            }
        }
    }

    info!("ticker stopped after {} ticks", ticks);
    ticks
}
