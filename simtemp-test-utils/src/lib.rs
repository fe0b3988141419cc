// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the simtemp workspace.
//!
//! - [`fixtures`]: ready-made shared states with deterministic noise
//! - [`helpers`]: tick drivers and reads raced against a deadline
//! - [`sinks`]: record sinks that misbehave on purpose

pub mod fixtures;
pub mod helpers;
pub mod sinks;

pub use fixtures::{state_with, state_with_sessions, TEST_SEED};
pub use helpers::{assert_no_sample_within, read_within, tick_n};
pub use sinks::{FailingSink, TinySink};
