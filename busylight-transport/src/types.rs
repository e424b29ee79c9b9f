//! Common types for the transport layer

/// Identification of an attached HID device as reported by enumeration.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    /// USB vendor ID
    pub vendor_id: u16,
    /// USB product ID
    pub product_id: u16,
    /// Product name if available
    pub product_name: Option<String>,
    /// Serial number if available
    pub serial: Option<String>,
    /// Platform device path, used to reopen the same interface
    pub path: String,
}
