//! Driver error types

use busylight_transport::TransportError;
use thiserror::Error;

/// Errors from driver operations
#[derive(Error, Debug, Clone)]
pub enum DriverError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The driver has been closed and must not be reused
    #[error("driver is closed")]
    Closed,
}
