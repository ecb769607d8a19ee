//! Cooperative cancellation for the bump transaction
//!
//! A single shared flag is threaded through the workflow and checked at every
//! state boundary. The signal handler does nothing except set the flag; all
//! cleanup runs on the main thread, after the in-flight operation returns.

use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag, set from the signal handler
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    tripped: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the flag; safe to call from a signal handler context
    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// Install a Ctrl-C handler that trips this flag
    ///
    /// The handler only sets the flag; the workflow notices it at the next
    /// state boundary and unwinds from there. A second Ctrl-C is absorbed by
    /// the same handler and has no further effect.
    pub fn install_handler(&self) -> Result<()> {
        let flag = self.clone();
        ctrlc::set_handler(move || {
            flag.trip();
        })
        .map_err(|e| {
            crate::error::GitBumpError::environment(format!(
                "Cannot install interrupt handler: {}",
                e
            ))
        })
    }
}
