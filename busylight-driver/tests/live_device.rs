//! Hardware smoke test.
//!
//! Requires a real Busylight on USB.
//! Run with: cargo test -p busylight-driver --test live_device -- --ignored --nocapture

use std::time::Duration;

use busylight_driver::{acquire, Command};

#[tokio::test(flavor = "multi_thread")]
#[ignore] // requires hardware
async fn connect_send_and_close() {
    let driver = acquire()
        .await
        .expect("No Busylight found - plug in a supported device");
    assert!(driver.is_open());

    let descriptor = driver.descriptor();
    eprintln!(
        "Connected to {} ({:04X}:{:04X})",
        descriptor.product_name.as_deref().unwrap_or("(unnamed)"),
        descriptor.vendor_id,
        descriptor.product_id
    );

    driver
        .send(&Command::keep_alive())
        .await
        .expect("keep-alive send failed");
    tokio::time::sleep(Duration::from_millis(250)).await;

    driver.close().await;
    assert!(!driver.is_open());
}
