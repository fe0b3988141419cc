// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Configuration values, their accepted ranges, and the start-up builder.

use crate::Mode;
use core::ops::RangeInclusive;
use simtemp_error::{Result, SimtempError};

/// Accepted sampling periods in milliseconds.
pub const SAMPLING_MS_RANGE: RangeInclusive<u32> = 1..=10_000;

/// Accepted alert thresholds in milli-degrees Celsius.
pub const THRESHOLD_MC_RANGE: RangeInclusive<i32> = -20_000..=60_000;

/// Lower edge of the simulated temperature band.
pub const BAND_LOW_MC: i32 = 44_000;

/// Upper edge of the simulated temperature band.
pub const BAND_HIGH_MC: i32 = 46_000;

/// Per-tick increment in normal mode.
pub const NORMAL_STEP_MC: i32 = 10;

/// Per-tick magnitude in ramp mode.
pub const RAMP_STEP_MC: i32 = 50;

/// Largest per-tick excursion in noisy mode, in either direction.
pub const NOISE_AMPLITUDE_MC: i32 = 100;

pub const DEFAULT_SAMPLING_MS: u32 = 100;
pub const DEFAULT_THRESHOLD_MC: i32 = 45_000;
pub const DEFAULT_INITIAL_TEMP_MC: i32 = BAND_LOW_MC;
pub const DEFAULT_MAX_SESSIONS: usize = 64;

/// Validate a sampling period.
///
/// # Errors
/// Returns `InvalidArgument` unless `ms` lies in [`SAMPLING_MS_RANGE`].
pub fn validate_sampling_ms(ms: u32) -> Result<u32> {
    if SAMPLING_MS_RANGE.contains(&ms) {
        Ok(ms)
    } else {
        Err(SimtempError::invalid_argument(format!(
            "samplingMs {ms} outside {}..={}",
            SAMPLING_MS_RANGE.start(),
            SAMPLING_MS_RANGE.end()
        )))
    }
}

/// Validate an alert threshold.
///
/// # Errors
/// Returns `InvalidArgument` unless `mc` lies in [`THRESHOLD_MC_RANGE`].
pub fn validate_threshold_mc(mc: i32) -> Result<i32> {
    if THRESHOLD_MC_RANGE.contains(&mc) {
        Ok(mc)
    } else {
        Err(SimtempError::invalid_argument(format!(
            "thresholdMC {mc} outside {}..={}",
            THRESHOLD_MC_RANGE.start(),
            THRESHOLD_MC_RANGE.end()
        )))
    }
}

/// The live, tunable configuration held inside the shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub sampling_ms: u32,
    pub threshold_mc: i32,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling_ms: DEFAULT_SAMPLING_MS,
            threshold_mc: DEFAULT_THRESHOLD_MC,
            mode: Mode::Normal,
        }
    }
}

/// Start-up configuration for a [`SharedState`](crate::SharedState).
///
/// ```
/// use simtemp_core::{Mode, SimtempConfig};
///
/// let config = SimtempConfig::default()
///     .with_sampling_ms(250)
///     .with_threshold_mc(45_500)
///     .with_mode(Mode::Ramp)
///     .with_seed(7);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimtempConfig {
    pub sampling_ms: u32,
    pub threshold_mc: i32,
    pub mode: Mode,
    /// Temperature reported before the first tick.
    pub initial_temp_mc: i32,
    /// Upper bound on simultaneously live consumer cursors.
    pub max_sessions: usize,
    /// Seed for noisy mode. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimtempConfig {
    fn default() -> Self {
        let live = Config::default();
        Self {
            sampling_ms: live.sampling_ms,
            threshold_mc: live.threshold_mc,
            mode: live.mode,
            initial_temp_mc: DEFAULT_INITIAL_TEMP_MC,
            max_sessions: DEFAULT_MAX_SESSIONS,
            seed: None,
        }
    }
}

impl SimtempConfig {
    #[must_use]
    pub fn with_sampling_ms(mut self, ms: u32) -> Self {
        self.sampling_ms = ms;
        self
    }

    #[must_use]
    pub fn with_threshold_mc(mut self, mc: i32) -> Self {
        self.threshold_mc = mc;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_initial_temp_mc(mut self, mc: i32) -> Self {
        self.initial_temp_mc = mc;
        self
    }

    #[must_use]
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field against the same rules the live setters apply.
    ///
    /// # Errors
    /// Returns `InvalidArgument` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_sampling_ms(self.sampling_ms)?;
        validate_threshold_mc(self.threshold_mc)?;
        if self.max_sessions == 0 {
            return Err(SimtempError::invalid_argument(
                "max_sessions must allow at least one consumer",
            ));
        }
        Ok(())
    }

    /// The tunable subset that lives on in the shared state.
    #[must_use]
    pub const fn live(&self) -> Config {
        Config {
            sampling_ms: self.sampling_ms,
            threshold_mc: self.threshold_mc,
            mode: self.mode,
        }
    }
}
