// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-tick temperature transitions.

use crate::config::{BAND_HIGH_MC, BAND_LOW_MC, NOISE_AMPLITUDE_MC, NORMAL_STEP_MC, RAMP_STEP_MC};
use crate::Mode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Normal mode: climb by a fixed step, restarting at the bottom of the band
/// as soon as the result would exceed the top.
#[must_use]
pub const fn normal_step(prev_mc: i32) -> i32 {
    let next = prev_mc.saturating_add(NORMAL_STEP_MC);
    if next > BAND_HIGH_MC {
        BAND_LOW_MC
    } else {
        next
    }
}

/// Noisy mode: apply `jitter_mc` and clamp to the band.
#[must_use]
pub fn noisy_step(prev_mc: i32, jitter_mc: i32) -> i32 {
    prev_mc
        .saturating_add(jitter_mc)
        .clamp(BAND_LOW_MC, BAND_HIGH_MC)
}

/// Produces the next temperature for whichever mode is active.
///
/// Holds the state that has to survive between ticks: the ramp direction and
/// the noise source. The shared state owns exactly one generator and only
/// calls it while holding its lock.
#[derive(Debug)]
pub struct SampleGenerator {
    direction: i32,
    rng: StdRng,
}

impl SampleGenerator {
    /// Create a generator whose noise is seeded from `seed`, or from OS entropy.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { direction: 1, rng }
    }

    /// Compute the temperature that follows `prev_mc` under `mode`.
    pub fn next(&mut self, mode: Mode, prev_mc: i32) -> i32 {
        match mode {
            Mode::Normal => normal_step(prev_mc),
            Mode::Noisy => {
                let jitter = self
                    .rng
                    .random_range(-NOISE_AMPLITUDE_MC..=NOISE_AMPLITUDE_MC);
                noisy_step(prev_mc, jitter)
            }
            Mode::Ramp => self.ramp_step(prev_mc),
        }
    }

    fn ramp_step(&mut self, prev_mc: i32) -> i32 {
        let next = prev_mc
            .saturating_add(self.direction * RAMP_STEP_MC)
            .clamp(BAND_LOW_MC, BAND_HIGH_MC);
        if next >= BAND_HIGH_MC {
            self.direction = -1;
        } else if next <= BAND_LOW_MC {
            self.direction = 1;
        }
        next
    }
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new(None)
    }
}
