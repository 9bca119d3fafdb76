//! Constants for NetworkManager D-Bus interface values.
//!
//! These constants correspond to the numeric codes and fixed strings used by
//! NetworkManager's D-Bus API, plus the defaults this crate applies on top.

/// NetworkManager device type constants.
pub mod device_type {
    pub const ETHERNET: u32 = 1;
    pub const WIFI: u32 = 2;
    pub const WIFI_P2P: u32 = 30;
    pub const LOOPBACK: u32 = 32;
}

/// Well-known object paths.
pub mod paths {
    /// The "no object" path NetworkManager uses for empty references.
    pub const NONE: &str = "/";
}

/// Fixed values written into new Wi-Fi connection profiles.
pub mod profile {
    pub const ID_PREFIX: &str = "WiFi-";
    pub const CONNECTION_TYPE: &str = "802-11-wireless";
    pub const SECURITY_SETTING: &str = "802-11-wireless-security";
    pub const KEY_MGMT_PSK: &str = "wpa-psk";
    pub const IPV4_METHOD: &str = "auto";
    pub const IPV6_METHOD: &str = "ignore";
}

/// Scan completion polling defaults.
pub mod scan {
    use std::time::Duration;

    pub const POLL_INTERVAL_MS: u64 = 1000;
    pub const MAX_POLLS: u32 = 30;

    pub fn poll_interval() -> Duration {
        Duration::from_millis(POLL_INTERVAL_MS)
    }
}
