// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use core::str::FromStr;
use simtemp_error::SimtempError;

/// Simulation mode selecting the per-tick temperature transition.
///
/// The set is closed: names are validated when parsed, so nothing past the
/// configuration boundary ever sees an unknown mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Steady climb of 10 m°C per tick, wrapping back to the bottom of the band.
    #[default]
    Normal,
    /// Random walk of ±100 m°C per tick, clamped to the band.
    Noisy,
    /// Triangle wave of 50 m°C per tick bouncing between the band limits.
    Ramp,
}

impl Mode {
    /// Every accepted mode, in display order.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Noisy, Self::Ramp];

    /// Name used on the text configuration surface.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Noisy => "noisy",
            Self::Ramp => "ramp",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SimtempError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                SimtempError::invalid_argument(format!(
                    "unknown mode {s:?}, expected one of normal, noisy, ramp"
                ))
            })
    }
}
