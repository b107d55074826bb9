//! Error types for the monitor layer.

use crate::network::AcquisitionError;
use std::io;
use thiserror::Error;

/// Error type for link listeners.
///
/// Represents failures in platform-specific link notification sources.
/// These errors are recoverable by falling back to polling mode.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The notification socket could not be opened or read.
    #[error("Link notification socket error: {0}")]
    Socket(#[from] io::Error),

    /// The listener stopped unexpectedly.
    ///
    /// This can happen when the underlying event source terminates
    /// without explicit shutdown request.
    #[error("Listener stopped unexpectedly")]
    Stopped,
}

/// Error type for monitor operations.
///
/// Callers decide recovery strategy based on the error variant.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The update cycle could not acquire a snapshot.
    #[error("Failed to acquire interface snapshot: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// The link listener failed.
    ///
    /// The monitor should fall back to polling-only mode.
    #[error("Link listener failed: {0}")]
    ListenerFailed(#[source] ListenerError),

    /// The monitor was stopped before the request was served.
    #[error("Monitor is stopped")]
    Stopped,
}
