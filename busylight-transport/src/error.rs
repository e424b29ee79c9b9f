//! Transport error types

use thiserror::Error;

/// Errors from enumeration, open, and write operations
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// Scan completed without finding a supported device
    #[error("no supported device found - is the Busylight connected?")]
    DeviceNotFound,

    /// A supported device was found but could not be opened exclusively
    #[error("unable to open the device: {0} - is it already opened by another process?")]
    OpenFailed(String),

    /// A report write failed
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// HID backend error (API initialization or enumeration)
    #[error("HID error: {0}")]
    HidError(String),
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        TransportError::HidError(e.to_string())
    }
}
