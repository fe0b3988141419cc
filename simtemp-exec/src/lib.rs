// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Drives a [`SharedState`](simtemp_core::SharedState) from a timer.

#[macro_use]
mod logging;

pub mod ticker;
pub mod timer;

// Re-export commonly used types
pub use ticker::Ticker;
pub use timer::{Timer, TokioTimer};
