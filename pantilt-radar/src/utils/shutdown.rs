//! Cooperative stop flag shared between the control loop and the interrupt listener.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};

/// A cloneable running flag: the control loop checks it at the top of each tick and every clone
/// can request the stop.
#[derive(Clone, Debug)]
pub struct Shutdown {
    running: Arc<AtomicBool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl Shutdown {
    /// Creates a flag in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a flag that trips on the first Ctrl-C received by the process.
    ///
    /// Must be called from within a tokio runtime.
    pub fn on_ctrl_c() -> Self {
        let shutdown = Self::new();
        let listener = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received");
                    listener.trigger();
                }
                Err(error) => warn!("Unable to listen for interrupt signal: {}", error),
            }
        });
        shutdown
    }

    /// Checks whether the loop should keep running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Requests the loop to stop before its next tick.
    pub fn trigger(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
