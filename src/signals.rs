//! Cooperative stop requests.
//!
//! Termination signals are turned into a single atomic store on a shared
//! [`StopFlag`]; the watch loop polls the flag between cycles and while it
//! sleeps. Nothing else runs inside the signal handler.

use anyhow::{Context, Result};
use signal_hook::consts::{SIGINT, SIGTERM};
use std::ffi::c_int;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Signals that request a graceful shutdown.
pub const STOP_SIGNALS: [c_int; 2] = [SIGINT, SIGTERM];

/// Value stored when the stop was requested programmatically.
const REQUESTED: usize = usize::MAX;

/// Shared stop request, cheap to clone.
///
/// Holds `0` while running, the number of the received signal after a signal
/// arrived, or [`REQUESTED`] after [`StopFlag::request_stop`].
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    state: Arc<AtomicUsize>,
}

impl StopFlag {
    /// Create a flag in the running state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register handlers so that every signal in `signals` sets this flag.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler cannot be registered (e.g. a forbidden signal).
    pub fn install(&self, signals: &[c_int]) -> Result<()> {
        for &signal in signals {
            let value = usize::try_from(signal)
                .with_context(|| format!("Invalid signal number {signal}"))?;
            signal_hook::flag::register_usize(signal, Arc::clone(&self.state), value)
                .with_context(|| format!("Failed to register handler for signal {signal}"))?;
        }
        Ok(())
    }

    /// Ask the loop to stop after the current cycle.
    pub fn request_stop(&self) {
        self.state.store(REQUESTED, Ordering::SeqCst);
    }

    /// True once a signal arrived or a stop was requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.state.load(Ordering::SeqCst) != 0
    }

    /// Name of the signal that caused the stop, if a signal did.
    #[must_use]
    pub fn received_signal(&self) -> Option<String> {
        match self.state.load(Ordering::SeqCst) {
            0 | REQUESTED => None,
            value => {
                let signal = c_int::try_from(value).ok()?;
                Some(
                    signal_hook::low_level::signal_name(signal)
                        .map_or_else(|| format!("signal {signal}"), str::to_string),
                )
            }
        }
    }
}
