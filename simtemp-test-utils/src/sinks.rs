// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Record sinks that fail in controlled ways.

use simtemp_core::{RecordSink, RECORD_SIZE};
use simtemp_error::{Result, SimtempError};

/// Claims room for a record but rejects every delivery.
#[derive(Debug, Default)]
pub struct FailingSink {
    pub attempts: usize,
}

impl RecordSink for FailingSink {
    fn capacity(&self) -> usize {
        RECORD_SIZE
    }

    fn deliver(&mut self, _record: &[u8; RECORD_SIZE]) -> Result<()> {
        self.attempts += 1;
        Err(SimtempError::fault("destination unmapped"))
    }
}

/// A sink one byte too small for a record.
#[derive(Debug, Default)]
pub struct TinySink {
    pub delivered: bool,
}

impl RecordSink for TinySink {
    fn capacity(&self) -> usize {
        RECORD_SIZE - 1
    }

    fn deliver(&mut self, _record: &[u8; RECORD_SIZE]) -> Result<()> {
        self.delivered = true;
        Ok(())
    }
}
