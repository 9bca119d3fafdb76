use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;
use zvariant::OwnedObjectPath;

use crate::types::constants::{device_type, profile, scan};
use crate::util::utils::decode_ssid;

/// NetworkManager device types.
///
/// Only [`DeviceType::Wifi`] drives behavior in this crate; the other
/// variants exist so snapshots and logs can name what they skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Ethernet,
    Wifi,
    WifiP2P,
    Loopback,
    Other(u32),
}

impl DeviceType {
    /// Returns `true` for 802.11 devices.
    pub fn is_wireless(&self) -> bool {
        matches!(self, DeviceType::Wifi)
    }
}

impl From<u32> for DeviceType {
    fn from(value: u32) -> Self {
        match value {
            device_type::ETHERNET => DeviceType::Ethernet,
            device_type::WIFI => DeviceType::Wifi,
            device_type::WIFI_P2P => DeviceType::WifiP2P,
            device_type::LOOPBACK => DeviceType::Loopback,
            v => DeviceType::Other(v),
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Ethernet => write!(f, "Ethernet"),
            DeviceType::Wifi => write!(f, "Wi-Fi"),
            DeviceType::WifiP2P => write!(f, "Wi-Fi P2P"),
            DeviceType::Loopback => write!(f, "Loopback"),
            DeviceType::Other(v) => write!(f, "Other({v})"),
        }
    }
}

bitflags! {
    /// Access point security capabilities (`NM80211ApSecurityFlags`).
    ///
    /// The same bitset is reported twice per access point: once for WPA and
    /// once for RSN (WPA2/WPA3).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ApSecurityFlags: u32 {
        const PAIR_WEP40 = 0x0000_0001;
        const PAIR_WEP104 = 0x0000_0002;
        const PAIR_TKIP = 0x0000_0004;
        const PAIR_CCMP = 0x0000_0008;
        const GROUP_WEP40 = 0x0000_0010;
        const GROUP_WEP104 = 0x0000_0020;
        const GROUP_TKIP = 0x0000_0040;
        const GROUP_CCMP = 0x0000_0080;
        const KEY_MGMT_PSK = 0x0000_0100;
        const KEY_MGMT_802_1X = 0x0000_0200;
        const KEY_MGMT_SAE = 0x0000_0400;
        const KEY_MGMT_OWE = 0x0000_0800;
        const KEY_MGMT_OWE_TM = 0x0000_1000;
        const KEY_MGMT_EAP_SUITE_B_192 = 0x0000_2000;
    }
}

/// Snapshot of an access point as reported by NetworkManager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPoint {
    /// Raw SSID bytes. Not guaranteed to be UTF-8.
    pub ssid: Vec<u8>,
    /// Signal strength in percent (0-100).
    pub strength: u8,
    pub wpa_flags: ApSecurityFlags,
    pub rsn_flags: ApSecurityFlags,
}

/// Coarse security classification of a scanned network.
///
/// WPA, WPA2 and WPA3 are all reported as [`Security::WpaWpa2`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Security {
    None,
    WpaWpa2,
}

impl Security {
    /// Classifies an access point from its WPA and RSN flag sets.
    pub fn from_flags(wpa: ApSecurityFlags, rsn: ApSecurityFlags) -> Self {
        if wpa.is_empty() && rsn.is_empty() {
            Security::None
        } else {
            Security::WpaWpa2
        }
    }
}

impl Display for Security {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Security::None => write!(f, "None"),
            Security::WpaWpa2 => write!(f, "WPA/WPA2"),
        }
    }
}

/// A network found by a completed scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub ssid: String,
    pub strength: u8,
    pub security: Security,
}

impl From<&AccessPoint> for ScanResult {
    fn from(ap: &AccessPoint) -> Self {
        Self {
            ssid: decode_ssid(&ap.ssid),
            strength: ap.strength,
            security: Security::from_flags(ap.wpa_flags, ap.rsn_flags),
        }
    }
}

/// Snapshot of a wireless device managed by NetworkManager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub path: String,
    pub interface: String,
    pub device_type: DeviceType,
    /// `CLOCK_BOOTTIME` milliseconds of the last finished scan, -1 if never.
    pub last_scan: i64,
    /// Path of the associated access point, if any.
    pub active_access_point: Option<String>,
}

/// Snapshot of an active connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveConnection {
    pub path: OwnedObjectPath,
    /// Display id of the profile backing this connection.
    pub id: String,
    /// Devices the connection is bound to.
    pub devices: Vec<OwnedObjectPath>,
}

/// A WPA-PSK Wi-Fi profile to hand to NetworkManager's settings service.
///
/// Built fresh for every connect request and never read back, except to
/// look for its display id among the active connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    /// Display id, always `"WiFi-" + ssid`.
    pub id: String,
    pub uuid: Uuid,
    pub ssid: String,
    pub psk: String,
}

impl ConnectionProfile {
    pub fn new(ssid: &str, psk: &str, uuid: Uuid) -> Self {
        Self {
            id: format!("{}{ssid}", profile::ID_PREFIX),
            uuid,
            ssid: ssid.to_string(),
            psk: psk.to_string(),
        }
    }

    /// Connection type written into the `connection` setting.
    pub fn connection_type(&self) -> &'static str {
        profile::CONNECTION_TYPE
    }

    pub fn key_mgmt(&self) -> &'static str {
        profile::KEY_MGMT_PSK
    }

    pub fn ipv4_method(&self) -> &'static str {
        profile::IPV4_METHOD
    }

    pub fn ipv6_method(&self) -> &'static str {
        profile::IPV6_METHOD
    }
}

/// Outcome of a connect request.
///
/// `verified` only means an active connection with the profile's display id
/// showed up right after activation. It says nothing about association,
/// authentication or addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectReport {
    pub ssid: String,
    pub profile_id: String,
    pub profile_path: OwnedObjectPath,
    pub active_path: OwnedObjectPath,
    pub verified: bool,
}

/// Outcome of a successful disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnected {
    /// Path of the active connection that was deactivated.
    pub connection: OwnedObjectPath,
    /// SSID of the access point that was associated, when it could be read.
    pub ssid: Option<String>,
}

/// Bounds for scan-completion polling.
///
/// ```
/// use nmwifi::ScanConfig;
/// use std::time::Duration;
///
/// let config = ScanConfig::new()
///     .with_poll_interval(Duration::from_millis(500))
///     .with_max_polls(20);
/// assert_eq!(config.max_polls, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Delay between two `LastScan` reads.
    pub poll_interval: Duration,
    /// Maximum number of `LastScan` reads before giving up.
    pub max_polls: u32,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the poll bound. Values below one are raised to one.
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls.max(1);
        self
    }

    /// Worst-case time spent sleeping between polls.
    pub fn max_wait(&self) -> Duration {
        self.poll_interval * self.max_polls.saturating_sub(1)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            poll_interval: scan::poll_interval(),
            max_polls: scan::MAX_POLLS,
        }
    }
}

/// Errors that can occur during Wi-Fi operations.
#[derive(Debug, Error)]
pub enum WifiError {
    /// A D-Bus communication error occurred.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A D-Bus call failed, with a note on what was being attempted.
    #[error("{context}: {source}")]
    DbusOperation {
        context: String,
        #[source]
        source: zbus::Error,
    },

    /// No wireless device carries the requested interface name.
    #[error("no Wi-Fi device found with interface '{0}'")]
    DeviceNotFound(String),

    /// No wireless device exists at all.
    #[error("no Wi-Fi device found")]
    NoWifiDevice,

    /// Nothing to disconnect.
    #[error("no active Wi-Fi connection found")]
    NoActiveConnection,

    /// The caller supplied unusable arguments.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `LastScan` never moved within the configured number of polls.
    #[error("scan did not complete after {polls} polls")]
    ScanTimedOut { polls: u32 },

    /// An object path could not be constructed.
    #[error("invalid object path: {0}")]
    InvalidPath(#[from] zvariant::Error),
}
