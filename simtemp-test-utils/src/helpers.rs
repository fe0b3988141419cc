// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use simtemp_core::{ConsumerSession, Interrupt, SampleRecord, SharedState, Snapshot};
use simtemp_error::Result;
use std::time::Duration;
use tokio::time::sleep;

/// Apply `n` ticks and return the last snapshot.
///
/// # Panics
/// Panics if `n` is zero.
pub fn tick_n(state: &SharedState, n: usize) -> Snapshot {
    (0..n)
        .map(|_| state.apply_tick())
        .last()
        .expect("tick_n needs at least one tick")
}

/// Read the next record, giving up after `timeout_ms`.
///
/// The core has no intrinsic timeout, so this races the read against a
/// timer the way an external caller would. `None` means the deadline won.
pub async fn read_within(
    session: &mut ConsumerSession,
    timeout_ms: u64,
) -> Option<Result<SampleRecord>> {
    let interrupt = Interrupt::new();
    tokio::select! {
        result = session.read_record(&interrupt) => Some(result),
        () = sleep(Duration::from_millis(timeout_ms)) => None,
    }
}

/// Assert that no sample becomes readable for `timeout_ms`.
///
/// # Panics
/// Panics if a read completes before the deadline.
pub async fn assert_no_sample_within(session: &mut ConsumerSession, timeout_ms: u64) {
    if let Some(result) = read_within(session, timeout_ms).await {
        panic!("Unexpected read result, expected no output: {result:?}");
    }
}
