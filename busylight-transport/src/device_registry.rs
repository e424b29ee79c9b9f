//! Device registry - supported Busylight models by VID/PID
//!
//! The constants here drive discovery matching. Model identity is
//! cosmetic (log output); the wire protocol is identical across models.

/// Plenom A/S (Kuando) vendor ID
pub const VENDOR_ID: u16 = 0x27BB;

/// Known Busylight product IDs
pub const SUPPORTED_PIDS: &[u16] = &[
    0x3BCA, // Busylight Alpha
    0x3BCB, // Busylight UC Alpha
    0x3BCD, // Busylight Omega
    0x3BCF, // Busylight UC Omega
];

/// Check if a PID is a known Busylight model
#[inline]
pub fn is_supported_pid(pid: u16) -> bool {
    SUPPORTED_PIDS.contains(&pid)
}

/// Human-readable model name for a product ID
pub fn model_name(pid: u16) -> &'static str {
    match pid {
        0x3BCA => "Busylight Alpha",
        0x3BCB => "Busylight UC Alpha",
        0x3BCD => "Busylight Omega",
        0x3BCF => "Busylight UC Omega",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pids_supported() {
        assert!(is_supported_pid(0x3BCA));
        assert!(is_supported_pid(0x3BCB));
        assert!(is_supported_pid(0x3BCD));
        assert!(is_supported_pid(0x3BCF));
    }

    #[test]
    fn test_foreign_pids_not_supported() {
        assert!(!is_supported_pid(0x0000));
        assert!(!is_supported_pid(0x5030)); // some other vendor's keyboard
    }

    #[test]
    fn test_model_names() {
        assert_eq!(model_name(0x3BCD), "Busylight Omega");
        assert_eq!(model_name(0xFFFF), "Unknown");
    }
}
