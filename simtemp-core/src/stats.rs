// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// Counters maintained by the producer and the delivery path.
///
/// Lives inside the shared state and is only mutated under its lock. Readers
/// get a copy; nothing outside the crate can reset it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Ticks produced since start-up, wrapping on overflow.
    pub updates: u32,
    /// Alert-state transitions observed by reads, one per observing consumer.
    pub alerts: u32,
    /// Negative errno of the most recent failure, `0` if none yet.
    pub last_error: i32,
}

impl Stats {
    pub(crate) fn record_update(&mut self) {
        self.updates = self.updates.wrapping_add(1);
    }

    pub(crate) fn record_alert(&mut self) {
        self.alerts = self.alerts.wrapping_add(1);
    }

    pub(crate) fn record_error(&mut self, code: i32) {
        self.last_error = code;
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "updates={}\nalerts={}\nlast_error={}\n",
            self.updates, self.alerts, self.last_error
        )
    }
}
