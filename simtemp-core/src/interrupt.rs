// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! External abort signal for blocking reads and for the producer loop.

use event_listener::Event;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Runtime-agnostic, cloneable interrupt flag.
///
/// Raising any clone interrupts every read currently waiting on any clone.
/// A read that is interrupted returns
/// [`SimtempError::Interrupted`](simtemp_error::SimtempError::Interrupted)
/// and leaves the consumer's cursor exactly as it was.
///
/// ```
/// use simtemp_core::Interrupt;
///
/// let interrupt = Interrupt::new();
/// let handle = interrupt.clone();
///
/// handle.raise();
/// assert!(interrupt.is_raised());
/// ```
#[derive(Clone, Debug)]
pub struct Interrupt {
    inner: Arc<Signal>,
}

#[derive(Debug)]
struct Signal {
    raised: AtomicBool,
    event: Event,
}

impl Interrupt {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Signal {
                raised: AtomicBool::new(false),
                event: Event::new(),
            }),
        }
    }

    /// Raise the interrupt. Idempotent.
    pub fn raise(&self) {
        self.inner.raised.store(true, Ordering::Release);
        self.inner.event.notify(usize::MAX);
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::Acquire)
    }

    /// Resolve once the interrupt has been raised.
    pub async fn raised(&self) {
        loop {
            if self.is_raised() {
                return;
            }

            let woken = self.inner.event.listen();

            // raise() may have landed between the check and registration
            if self.is_raised() {
                return;
            }

            woken.await;
        }
    }
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}
