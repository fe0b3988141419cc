// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the simulated temperature sensor.
//!
//! Every failure the sensor can report maps onto one [`SimtempError`] variant.
//! Each variant also carries a negative errno-style [`code`](SimtempError::code),
//! which is what the sensor records as its `last_error` statistic.
//!
//! # Examples
//!
//! ```
//! use simtemp_error::{Result, SimtempError};
//!
//! fn parse_period(ms: u32) -> Result<u32> {
//!     if ms == 0 {
//!         return Err(SimtempError::invalid_argument("sampling period must be positive"));
//!     }
//!     Ok(ms)
//! }
//!
//! assert_eq!(parse_period(0).unwrap_err().code(), -22);
//! ```

/// errno for an invalid argument.
pub const EINVAL: i32 = 22;
/// errno for an interrupted call.
pub const EINTR: i32 = 4;
/// errno for a bad destination address.
pub const EFAULT: i32 = 14;
/// errno for an exhausted allocation.
pub const ENOMEM: i32 = 12;

/// Root error type for all sensor operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimtempError {
    /// Out-of-range or malformed configuration, or an undersized read buffer.
    #[error("Invalid argument: {context}")]
    InvalidArgument {
        /// What was rejected and why
        context: String,
    },

    /// A blocking wait was aborted from outside.
    ///
    /// The consumer's cursor is left untouched, so the read can be retried.
    #[error("Interrupted while waiting for a sample")]
    Interrupted,

    /// The sample record could not be delivered into the caller's memory.
    #[error("Failed to deliver record: {context}")]
    Fault {
        /// Description of the delivery failure
        context: String,
    },

    /// A per-consumer cursor could not be allocated.
    #[error("Out of memory: {resource} (limit: {limit})")]
    OutOfMemory {
        /// Name of the exhausted resource
        resource: String,
        /// The limit that was reached
        limit: usize,
    },
}

impl SimtempError {
    /// Create an invalid argument error with the given context
    pub fn invalid_argument(context: impl Into<String>) -> Self {
        Self::InvalidArgument {
            context: context.into(),
        }
    }

    /// Create a delivery fault with the given context
    pub fn fault(context: impl Into<String>) -> Self {
        Self::Fault {
            context: context.into(),
        }
    }

    /// Create an allocation failure for the named resource
    pub fn out_of_memory(resource: impl Into<String>, limit: usize) -> Self {
        Self::OutOfMemory {
            resource: resource.into(),
            limit,
        }
    }

    /// Negative errno recorded as the sensor's `last_error`.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => -EINVAL,
            Self::Interrupted => -EINTR,
            Self::Fault { .. } => -EFAULT,
            Self::OutOfMemory { .. } => -ENOMEM,
        }
    }

    /// Whether the failed call can simply be issued again.
    ///
    /// Only an interrupted wait qualifies: it leaves no trace on the consumer.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Whether this error is a rejected configuration value.
    #[must_use]
    pub const fn is_config_rejection(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Specialized Result type for sensor operations.
pub type Result<T> = std::result::Result<T, SimtempError>;

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Prefix the error message with `context`.
    ///
    /// Variants without a message (`Interrupted`, `OutOfMemory`) pass through unchanged.
    ///
    /// # Errors
    /// Returns `Err(SimtempError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Lazily evaluated variant of [`context`](ResultExt::context).
    ///
    /// # Errors
    /// Returns `Err(SimtempError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.with_context(|| context.into())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e {
            SimtempError::InvalidArgument { context: inner } => SimtempError::InvalidArgument {
                context: format!("{}: {inner}", f()),
            },
            SimtempError::Fault { context: inner } => SimtempError::Fault {
                context: format!("{}: {inner}", f()),
            },
            other => other,
        })
    }
}
