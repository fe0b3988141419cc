// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Text key/value configuration surface.
//!
//! Each attribute holds one newline-terminated value:
//!
//! | key           | access | value                                      |
//! |---------------|--------|--------------------------------------------|
//! | `samplingMs`  | rw     | `u32` in `1..=10000`                       |
//! | `thresholdMC` | rw     | `i32` in `-20000..=60000`                  |
//! | `mode`        | rw     | `normal`, `noisy` or `ramp`                |
//! | `stats`       | ro     | `updates=<u32>\nalerts=<u32>\nlast_error=<i32>\n` |
//!
//! ```
//! use simtemp_core::{Attribute, SharedState, SimtempConfig};
//!
//! let state = SharedState::new(SimtempConfig::default()).unwrap();
//! state.store(Attribute::Mode, "ramp\n").unwrap();
//!
//! assert_eq!(state.show(Attribute::Mode), "ramp\n");
//! ```

use crate::SharedState;
use core::fmt;
use core::str::FromStr;
use simtemp_error::{Result, ResultExt, SimtempError};

/// One key of the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    SamplingMs,
    ThresholdMc,
    Mode,
    Stats,
}

impl Attribute {
    pub const ALL: [Self; 4] = [Self::SamplingMs, Self::ThresholdMc, Self::Mode, Self::Stats];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SamplingMs => "samplingMs",
            Self::ThresholdMc => "thresholdMC",
            Self::Mode => "mode",
            Self::Stats => "stats",
        }
    }

    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::Stats)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = SimtempError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|attr| attr.name() == s)
            .ok_or_else(|| SimtempError::invalid_argument(format!("unknown attribute {s:?}")))
    }
}

impl SharedState {
    /// Render one attribute, newline-terminated.
    #[must_use]
    pub fn show(&self, attr: Attribute) -> String {
        match attr {
            Attribute::SamplingMs => format!("{}\n", self.sampling_ms()),
            Attribute::ThresholdMc => format!("{}\n", self.threshold_mc()),
            Attribute::Mode => format!("{}\n", self.mode()),
            Attribute::Stats => self.stats().to_string(),
        }
    }

    /// Parse `text` and apply it to `attr`.
    ///
    /// Surrounding whitespace, including the trailing newline, is ignored.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for malformed or out-of-range values and for
    /// writes to `stats`. Every rejection is recorded as `last_error`.
    pub fn store(&self, attr: Attribute, text: &str) -> Result<()> {
        let value = text.trim();
        match attr {
            Attribute::SamplingMs => {
                let ms = self.parse_number(attr, value)?;
                self.set_sampling_ms(ms)
            }
            Attribute::ThresholdMc => {
                let mc = self.parse_number(attr, value)?;
                self.set_threshold_mc(mc)
            }
            Attribute::Mode => self.set_mode(value),
            Attribute::Stats => Err(self.fail(SimtempError::invalid_argument(
                "stats is read-only",
            ))),
        }
    }

    fn parse_number<T: FromStr>(&self, attr: Attribute, value: &str) -> Result<T> {
        value
            .parse()
            .map_err(|_| SimtempError::invalid_argument(format!("{value:?} is not a number")))
            .context(attr.name())
            .map_err(|e| self.fail(e))
    }
}
