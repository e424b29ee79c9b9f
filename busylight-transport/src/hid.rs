//! hidapi-backed device handle

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::trace;

use crate::error::TransportError;
use crate::types::DeviceDescriptor;
use crate::DeviceHandle;

/// Exclusive handle to an opened Busylight HID interface.
pub struct HidDeviceHandle {
    device: Mutex<HidDevice>,
    descriptor: DeviceDescriptor,
}

impl HidDeviceHandle {
    pub fn new(device: HidDevice, descriptor: DeviceDescriptor) -> Self {
        Self {
            device: Mutex::new(device),
            descriptor,
        }
    }
}

impl DeviceHandle for HidDeviceHandle {
    fn write(&self, data: &[u8]) -> Result<usize, TransportError> {
        let device = self.device.lock();
        let written = device
            .write(data)
            .map_err(|e| TransportError::WriteFailed(e.to_string()))?;
        trace!("Wrote {} bytes to {}", written, self.descriptor.path);
        Ok(written)
    }

    fn is_open(&self) -> bool {
        // A handle that no longer answers a string request has gone away
        // (unplugged or reclaimed by the OS).
        self.device.lock().get_product_string().is_ok()
    }

    fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }
}
