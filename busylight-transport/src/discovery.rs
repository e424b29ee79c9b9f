//! Device discovery and matching for Busylight status lights

use async_trait::async_trait;
use hidapi::HidApi;
use tracing::{debug, info, trace};

use crate::device_registry;
use crate::error::TransportError;
use crate::hid::HidDeviceHandle;
use crate::types::DeviceDescriptor;
use crate::DeviceHandle;

/// Device enumeration boundary.
///
/// Implementations list the currently attached HID devices and open an
/// exclusive handle to one of them. The session driver consumes this
/// trait, so tests can substitute a fake provider.
#[async_trait]
pub trait DeviceDiscovery: Send + Sync {
    /// List currently attached HID devices
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, TransportError>;

    /// Open an exclusive handle to a specific device
    async fn open_device(
        &self,
        device: &DeviceDescriptor,
    ) -> Result<Box<dyn DeviceHandle>, TransportError>;
}

/// Select the supported device from an enumeration snapshot.
///
/// Returns the first entry, in enumeration order, whose vendor ID equals
/// `vendor_id` and whose product ID is a member of `product_ids`.
pub fn find_supported<'a>(
    devices: &'a [DeviceDescriptor],
    vendor_id: u16,
    product_ids: &[u16],
) -> Option<&'a DeviceDescriptor> {
    for device in devices {
        trace!(
            "Scanned {}: {:04X}:{:04X}",
            device.product_name.as_deref().unwrap_or("(unnamed)"),
            device.vendor_id,
            device.product_id
        );
        if device.vendor_id == vendor_id && product_ids.contains(&device.product_id) {
            info!(
                "Found a compatible device {}: {:04X}:{:04X}",
                device.product_name.as_deref().unwrap_or("(unnamed)"),
                device.vendor_id,
                device.product_id
            );
            return Some(device);
        }
    }
    None
}

/// HID device discovery backed by `hidapi`.
pub struct HidDiscovery;

impl HidDiscovery {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HidDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceDiscovery for HidDiscovery {
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, TransportError> {
        // The API handle only lives for the scan; it is released as soon
        // as the snapshot has been taken.
        let api = HidApi::new().map_err(|e| TransportError::HidError(e.to_string()))?;
        let mut devices = Vec::new();

        for device_info in api.device_list() {
            devices.push(DeviceDescriptor {
                vendor_id: device_info.vendor_id(),
                product_id: device_info.product_id(),
                product_name: device_info.product_string().map(|s| s.to_string()),
                serial: device_info.serial_number().map(|s| s.to_string()),
                path: device_info.path().to_string_lossy().to_string(),
            });
        }

        debug!("Enumerated {} HID devices", devices.len());
        Ok(devices)
    }

    async fn open_device(
        &self,
        device: &DeviceDescriptor,
    ) -> Result<Box<dyn DeviceHandle>, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::HidError(e.to_string()))?;

        // Re-resolve by path; fall back to VID/PID in case the path
        // changed between the scan and the open.
        let info = api
            .device_list()
            .find(|d| d.path().to_string_lossy() == device.path.as_str())
            .or_else(|| {
                api.device_list().find(|d| {
                    d.vendor_id() == device.vendor_id && d.product_id() == device.product_id
                })
            })
            .cloned()
            .ok_or_else(|| {
                TransportError::OpenFailed(format!(
                    "device {:04X}:{:04X} not present at open time",
                    device.vendor_id, device.product_id
                ))
            })?;

        let hid_device = info
            .open_device(&api)
            .map_err(|e| TransportError::OpenFailed(e.to_string()))?;

        info!(
            "Opened {} at {}",
            device_registry::model_name(device.product_id),
            device.path
        );

        Ok(Box::new(HidDeviceHandle::new(hid_device, device.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(vendor_id: u16, product_id: u16, name: &str) -> DeviceDescriptor {
        DeviceDescriptor {
            vendor_id,
            product_id,
            product_name: Some(name.to_string()),
            serial: None,
            path: format!("mock:{vendor_id:04x}:{product_id:04x}"),
        }
    }

    #[test]
    fn matches_supported_vendor_and_product() {
        let devices = vec![descriptor(0x27BB, 0x3BCA, "Busylight")];
        let matched =
            find_supported(&devices, 0x27BB, &[0x3BCA, 0x3BCB]).expect("device should match");
        assert_eq!(matched.product_name.as_deref(), Some("Busylight"));
    }

    #[test]
    fn wrong_vendor_matches_nothing() {
        let devices = vec![descriptor(0x27BB, 0x3BCA, "Busylight")];
        assert!(find_supported(&devices, 0x1234, &[0x3BCA, 0x3BCB]).is_none());
    }

    #[test]
    fn vendor_match_alone_is_not_enough() {
        let devices = vec![descriptor(0x27BB, 0x9999, "Mystery")];
        assert!(find_supported(&devices, 0x27BB, &[0x3BCA]).is_none());
    }

    #[test]
    fn empty_list_matches_nothing() {
        assert!(find_supported(&[], 0x27BB, &[0x3BCA]).is_none());
    }

    #[test]
    fn match_is_found_at_any_position() {
        let devices = vec![
            descriptor(0x046D, 0xC31C, "Keyboard"),
            descriptor(0x046D, 0xC077, "Mouse"),
            descriptor(0x27BB, 0x3BCD, "Busylight Omega"),
        ];
        let matched = find_supported(&devices, 0x27BB, &[0x3BCA, 0x3BCD]).unwrap();
        assert_eq!(matched.product_id, 0x3BCD);
    }

    #[test]
    fn first_of_multiple_matches_wins() {
        let devices = vec![
            descriptor(0x27BB, 0x3BCD, "Omega on desk"),
            descriptor(0x27BB, 0x3BCA, "Alpha in drawer"),
        ];
        let matched = find_supported(&devices, 0x27BB, &[0x3BCA, 0x3BCD]).unwrap();
        assert_eq!(matched.product_id, 0x3BCD);
        assert_eq!(matched.product_name.as_deref(), Some("Omega on desk"));
    }
}
