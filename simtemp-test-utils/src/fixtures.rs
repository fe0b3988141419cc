// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use simtemp_core::{Mode, SharedState, SimtempConfig};
use std::sync::Arc;

/// Seed used by every fixture so noisy runs are reproducible.
pub const TEST_SEED: u64 = 0x5EED;

/// A shared state starting at `temp_mc` with the given threshold and mode.
///
/// # Panics
/// Panics if the threshold is out of range.
#[must_use]
pub fn state_with(temp_mc: i32, threshold_mc: i32, mode: Mode) -> Arc<SharedState> {
    let config = SimtempConfig::default()
        .with_initial_temp_mc(temp_mc)
        .with_threshold_mc(threshold_mc)
        .with_mode(mode)
        .with_seed(TEST_SEED);
    Arc::new(SharedState::new(config).expect("fixture config must be valid"))
}

/// Like [`state_with`], with room for only `max_sessions` live cursors.
///
/// # Panics
/// Panics if `max_sessions` is zero.
#[must_use]
pub fn state_with_sessions(max_sessions: usize) -> Arc<SharedState> {
    let config = SimtempConfig::default()
        .with_max_sessions(max_sessions)
        .with_seed(TEST_SEED);
    Arc::new(SharedState::new(config).expect("fixture config must be valid"))
}
