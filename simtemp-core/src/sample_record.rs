// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The fixed-layout record handed to a consumer on every successful read.
//!
//! Layout (16 bytes, no padding, little-endian):
//!
//! | offset | field          | type  |
//! |--------|----------------|-------|
//! | 0      | `timestamp_ns` | `u64` |
//! | 8      | `temp_mc`      | `i32` |
//! | 12     | `flags`        | `u32` |

use core::fmt;
use core::ops::{BitOr, BitOrAssign};
use simtemp_error::{Result, SimtempError};

/// Size in bytes of an encoded [`SampleRecord`].
pub const RECORD_SIZE: usize = 16;

/// Event bits attached to a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SampleFlags(u32);

impl SampleFlags {
    /// The record carries a sample the consumer had not seen.
    pub const NEW_SAMPLE: Self = Self(1 << 0);
    /// The temperature was at or above the threshold when the record was read.
    pub const THRESHOLD_CROSSED: Self = Self(1 << 1);

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SampleFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SampleFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// One temperature reading as delivered to a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRecord {
    /// Monotonic time of the tick that produced the sample.
    pub timestamp_ns: u64,
    pub temp_mc: i32,
    pub flags: SampleFlags,
}

impl SampleRecord {
    #[must_use]
    pub const fn is_alert(&self) -> bool {
        self.flags.contains(SampleFlags::THRESHOLD_CROSSED)
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        out[0..8].copy_from_slice(&self.timestamp_ns.to_le_bytes());
        out[8..12].copy_from_slice(&self.temp_mc.to_le_bytes());
        out[12..16].copy_from_slice(&self.flags.bits().to_le_bytes());
        out
    }

    /// Decode a record from the front of `bytes`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if fewer than [`RECORD_SIZE`] bytes are given.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; RECORD_SIZE] = bytes
            .get(..RECORD_SIZE)
            .and_then(|prefix| prefix.try_into().ok())
            .ok_or_else(|| {
                SimtempError::invalid_argument(format!(
                    "record needs {RECORD_SIZE} bytes, got {}",
                    bytes.len()
                ))
            })?;

        let [t0, t1, t2, t3, t4, t5, t6, t7, c0, c1, c2, c3, f0, f1, f2, f3] = raw;
        Ok(Self {
            timestamp_ns: u64::from_le_bytes([t0, t1, t2, t3, t4, t5, t6, t7]),
            temp_mc: i32::from_le_bytes([c0, c1, c2, c3]),
            flags: SampleFlags::from_bits(u32::from_le_bytes([f0, f1, f2, f3])),
        })
    }
}

impl fmt::Display for SampleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "temp={:.1}C alert={}",
            f64::from(self.temp_mc) / 1000.0,
            u8::from(self.is_alert())
        )
    }
}

/// Caller-owned destination for an encoded record.
///
/// A read checks [`capacity`](RecordSink::capacity) before it starts waiting
/// and only commits the consumer's cursor once [`deliver`](RecordSink::deliver)
/// has succeeded.
pub trait RecordSink {
    /// Bytes the sink can accept in one delivery.
    fn capacity(&self) -> usize;

    /// Copy one encoded record into the sink.
    ///
    /// # Errors
    /// Returns `Fault` if the record could not be stored.
    fn deliver(&mut self, record: &[u8; RECORD_SIZE]) -> Result<()>;
}

impl RecordSink for [u8] {
    fn capacity(&self) -> usize {
        self.len()
    }

    fn deliver(&mut self, record: &[u8; RECORD_SIZE]) -> Result<()> {
        let len = self.len();
        let dst = self.get_mut(..RECORD_SIZE).ok_or_else(|| {
            SimtempError::fault(format!("destination holds only {len} bytes"))
        })?;
        dst.copy_from_slice(record);
        Ok(())
    }
}

impl RecordSink for Vec<u8> {
    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn deliver(&mut self, record: &[u8; RECORD_SIZE]) -> Result<()> {
        self.try_reserve(RECORD_SIZE)
            .map_err(|e| SimtempError::fault(e.to_string()))?;
        self.extend_from_slice(record);
        Ok(())
    }
}
