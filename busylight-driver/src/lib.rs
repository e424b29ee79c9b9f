//! Connection and session driver for the Kuando Busylight
//!
//! Manages the lifecycle of the single supported status-light device:
//! scan, match, exclusive open, periodic keep-alive, close.
//!
//! ```text
//! [HidDiscovery]                <- enumeration boundary (DeviceDiscovery)
//!       |
//!   [Driver]                    <- owns the handle, serializes every write
//!       |            \
//! [DeviceHandle]   [keep-alive task]
//! ```
//!
//! The driver is a state machine: Unacquired -> Acquiring -> Live ->
//! Closed, with Acquiring -> Failed when no device matches or the
//! exclusive open is refused. Live survives write failures; Closed is
//! terminal.

pub mod error;

mod keep_alive;

pub use busylight_transport::{
    find_supported, Command, DeviceDescriptor, DeviceDiscovery, DeviceHandle, HidDiscovery,
    TransportError, PAYLOAD_SIZE, REPORT_SIZE,
};
pub use error::DriverError;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use busylight_transport::{device_registry, protocol::timing};
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, info, trace};

use keep_alive::KeepAliveTask;

/// Configuration consumed by the driver.
///
/// Defaults come from the device registry and protocol timing constants.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Supported USB vendor ID
    pub vendor_id: u16,
    /// Accepted product IDs for that vendor
    pub product_ids: Vec<u16>,
    /// Interval between keep-alive reports
    pub keep_alive_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            vendor_id: device_registry::VENDOR_ID,
            product_ids: device_registry::SUPPORTED_PIDS.to_vec(),
            keep_alive_interval: Duration::from_millis(timing::KEEP_ALIVE_INTERVAL_MS),
        }
    }
}

/// Live session with the status-light device.
///
/// At most one handle to the device exists per `Driver`, and every write
/// - explicit sends and keep-alive reports alike - is serialized through
/// the handle lock. Once closed, the driver is terminal and never
/// reopens.
pub struct Driver {
    /// `None` only after close
    handle: Mutex<Option<Box<dyn DeviceHandle>>>,
    descriptor: DeviceDescriptor,
    keep_alive: Mutex<Option<KeepAliveTask>>,
    closed: AtomicBool,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("descriptor", &self.descriptor)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}

impl Driver {
    /// Scan, match, open, and start the keep-alive task.
    ///
    /// This is the injectable entry point: tests pass a fake
    /// [`DeviceDiscovery`]. Production callers normally go through
    /// [`acquire`]. Must be called from within a tokio runtime; the
    /// keep-alive task is spawned onto it.
    pub async fn connect_with(
        discovery: &dyn DeviceDiscovery,
        config: DriverConfig,
    ) -> Result<Arc<Self>, DriverError> {
        debug!("Searching for compatible devices");
        let devices = discovery.list_devices().await?;
        let matched = find_supported(&devices, config.vendor_id, &config.product_ids)
            .ok_or(TransportError::DeviceNotFound)?
            .clone();

        let handle = discovery.open_device(&matched).await?;

        let driver = Arc::new(Driver {
            handle: Mutex::new(Some(handle)),
            descriptor: matched,
            keep_alive: Mutex::new(None),
            closed: AtomicBool::new(false),
        });

        let task = keep_alive::spawn(Arc::clone(&driver), config.keep_alive_interval);
        *driver.keep_alive.lock() = Some(task);

        info!(
            "Connected to {} ({:04X}:{:04X})",
            driver.descriptor.product_name.as_deref().unwrap_or("device"),
            driver.descriptor.vendor_id,
            driver.descriptor.product_id
        );
        Ok(driver)
    }

    /// Send an encoded command report to the device.
    pub async fn send(&self, command: &Command) -> Result<(), DriverError> {
        trace!("Sending command: {:02X?}", &command.payload()[..8]);
        self.send_raw(&command.as_report()).await
    }

    /// Forward `buffer` verbatim to the device.
    ///
    /// The first byte is the HID report ID. A write failure surfaces as
    /// [`TransportError::WriteFailed`] and leaves the session live;
    /// callers may retry.
    pub async fn send_raw(&self, buffer: &[u8]) -> Result<(), DriverError> {
        let guard = self.handle.lock();
        let handle = guard.as_ref().ok_or(DriverError::Closed)?;
        let written = handle.write(buffer)?;
        trace!("Sent buffer data of {} bytes", written);
        Ok(())
    }

    /// Whether the underlying device handle is still open.
    ///
    /// Query-only; returns false once the driver has been closed.
    pub fn is_open(&self) -> bool {
        match self.handle.lock().as_ref() {
            Some(handle) => handle.is_open(),
            None => false,
        }
    }

    /// The matched device this session is bound to.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// Close the session.
    ///
    /// Stops the keep-alive task first and waits until it has exited, so
    /// no keep-alive write can race the handle teardown, then releases
    /// the device handle. Idempotent: closing an already-closed driver is
    /// a no-op. Callable from any task.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("Driver already closed");
            return;
        }
        info!("Closing the device connection");

        let task = self.keep_alive.lock().take();
        if let Some(task) = task {
            task.shutdown().await;
        }

        *self.handle.lock() = None;
    }
}

/// One-time acquisition cell.
///
/// Guarantees the scan-and-open sequence runs exactly once even under
/// concurrent first calls; every caller receives the same outcome. A
/// failed acquisition is cached: Failed is terminal for the cell.
pub struct DriverCell {
    cell: OnceCell<Result<Arc<Driver>, DriverError>>,
}

impl DriverCell {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// Acquire through this cell, scanning and opening on the first call.
    pub async fn acquire_with(
        &self,
        discovery: &dyn DeviceDiscovery,
        config: DriverConfig,
    ) -> Result<Arc<Driver>, DriverError> {
        self.cell
            .get_or_init(|| async move { Driver::connect_with(discovery, config).await })
            .await
            .clone()
    }
}

impl Default for DriverCell {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_DRIVER: DriverCell = DriverCell::new();

/// Acquire the process-wide driver, connecting on the first call.
///
/// Concurrent first calls are safe: the scan/open sequence runs once and
/// every caller gets the same [`Driver`]. Closed is terminal for the
/// process: after [`Driver::close`] this keeps returning the same, now
/// closed, driver - reconnecting requires a dedicated [`DriverCell`].
pub async fn acquire() -> Result<Arc<Driver>, DriverError> {
    info!("Trying to connect to the device");
    GLOBAL_DRIVER
        .acquire_with(&HidDiscovery::new(), DriverConfig::default())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_registry_constants() {
        let config = DriverConfig::default();
        assert_eq!(config.vendor_id, 0x27BB);
        assert!(config.product_ids.contains(&0x3BCA));
        assert_eq!(config.keep_alive_interval, Duration::from_secs(10));
    }
}
