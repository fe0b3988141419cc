// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core of a simulated temperature sensor.
//!
//! One periodic producer mutates a [`SharedState`]; any number of
//! [`ConsumerSession`]s block on or poll for new samples, each tracking what
//! it has already seen through its own cursor.

#[macro_use]
mod logging;

pub mod attributes;
pub mod config;
mod config_store;
pub mod delivery;
pub mod generator;
pub mod interrupt;
pub mod mode;
pub mod sample_record;
pub mod session;
pub mod shared_state;
pub mod stats;

pub use self::attributes::Attribute;
pub use self::config::{Config, SimtempConfig};
pub use self::delivery::Readiness;
pub use self::generator::SampleGenerator;
pub use self::interrupt::Interrupt;
pub use self::mode::Mode;
pub use self::sample_record::{RecordSink, SampleFlags, SampleRecord, RECORD_SIZE};
pub use self::session::{ConsumerSession, Cursor};
pub use self::shared_state::{SharedState, Snapshot};
pub use self::stats::Stats;
pub use simtemp_error::{Result, SimtempError};
