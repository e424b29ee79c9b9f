//! Device transport layer for Kuando Busylight status lights
//!
//! This crate provides the device-facing pieces the session driver is
//! built on:
//!
//! - HID enumeration and device matching (`discovery`)
//! - The open-handle write contract (`DeviceHandle`)
//! - Command report encoding (`protocol`)
//! - Known vendor/product registry (`device_registry`)

pub mod device_registry;
pub mod discovery;
pub mod error;
pub mod protocol;
pub mod types;

mod hid;

pub use discovery::{find_supported, DeviceDiscovery, HidDiscovery};
pub use error::TransportError;
pub use hid::HidDeviceHandle;
pub use protocol::{Command, PAYLOAD_SIZE, REPORT_SIZE};
pub use types::DeviceDescriptor;

/// The open-device write contract.
///
/// An implementation owns an exclusively opened device handle. The first
/// byte of `data` is the HID report ID, the remaining bytes the report
/// payload. Serialization of concurrent writers is the caller's job; this
/// trait only performs the I/O.
pub trait DeviceHandle: Send + Sync {
    /// Write one report to the device, returning the number of bytes the
    /// transport accepted.
    fn write(&self, data: &[u8]) -> Result<usize, TransportError>;

    /// Check whether the underlying handle still responds.
    fn is_open(&self) -> bool;

    /// Identification of the device this handle was opened for.
    fn descriptor(&self) -> &DeviceDescriptor;
}
