// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Validated live reconfiguration.
//!
//! A rejected value leaves the previous one in place, records its errno as
//! `last_error`, and never touches the sequence or the temperature. An
//! accepted sampling period is picked up by the producer at its next rearm;
//! the wait already in flight keeps its original length.

use crate::config::{validate_sampling_ms, validate_threshold_mc, Config};
use crate::{Mode, SharedState};
use simtemp_error::Result;

impl SharedState {
    /// Change the sampling period.
    ///
    /// # Errors
    /// Returns `InvalidArgument` unless `1 <= ms <= 10000`.
    pub fn set_sampling_ms(&self, ms: u32) -> Result<()> {
        let ms = validate_sampling_ms(ms).map_err(|e| self.fail(e))?;
        self.lock().config.sampling_ms = ms;
        info!("samplingMs set to {}", ms);
        Ok(())
    }

    /// Change the alert threshold.
    ///
    /// Takes effect for the very next read or poll, including one for a
    /// sample produced before the change.
    ///
    /// # Errors
    /// Returns `InvalidArgument` unless `-20000 <= mc <= 60000`.
    pub fn set_threshold_mc(&self, mc: i32) -> Result<()> {
        let mc = validate_threshold_mc(mc).map_err(|e| self.fail(e))?;
        self.lock().config.threshold_mc = mc;
        info!("thresholdMC set to {}", mc);
        Ok(())
    }

    /// Switch the simulation mode by name.
    ///
    /// # Errors
    /// Returns `InvalidArgument` unless `name` is `normal`, `noisy` or `ramp`.
    pub fn set_mode(&self, name: &str) -> Result<()> {
        let mode: Mode = name.parse().map_err(|e| self.fail(e))?;
        self.lock().config.mode = mode;
        info!("mode set to {}", mode);
        Ok(())
    }

    #[must_use]
    pub fn sampling_ms(&self) -> u32 {
        self.lock().config.sampling_ms
    }

    #[must_use]
    pub fn threshold_mc(&self) -> i32 {
        self.lock().config.threshold_mc
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.lock().config.mode
    }

    /// All tunables, read under one lock.
    #[must_use]
    pub fn config(&self) -> Config {
        self.lock().config
    }
}
