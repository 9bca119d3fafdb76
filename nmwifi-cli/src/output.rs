//! Human-readable messages printed by the command-line front end.

use nmwifi::{ConnectReport, Device, Disconnected, ScanResult, WifiError};

pub fn interface_detected(iface: Option<&str>) -> String {
    match iface {
        Some(name) => format!("Detected Wi-Fi device: {name}"),
        None => "No Wi-Fi device detected. Please check if your device Wi-Fi is active."
            .to_string(),
    }
}

pub fn device_line(device: &Device) -> String {
    format!(
        "{} ({}) last scan: {}, access point: {}",
        device.interface,
        device.path,
        device.last_scan,
        device.active_access_point.as_deref().unwrap_or("none"),
    )
}

pub fn scan_line(net: &ScanResult) -> String {
    format!(
        "SSID: {}, Strength: {}%, Security: {}",
        net.ssid, net.strength, net.security
    )
}

pub fn connect_outcome(report: &ConnectReport) -> String {
    if report.verified {
        format!("Successfully connected to '{}'.", report.ssid)
    } else {
        format!(
            "Failed to establish a stable connection to '{}'.",
            report.ssid
        )
    }
}

pub fn disconnected(done: &Disconnected) -> String {
    format!(
        "Deactivated Wi-Fi connection: {}",
        done.ssid.as_deref().unwrap_or("Unknown")
    )
}

/// Message for an operation that ended in `err`.
pub fn failure(err: &WifiError) -> String {
    match err {
        WifiError::DeviceNotFound(iface) => {
            format!("No Wi-Fi device found with interface '{iface}'")
        }
        WifiError::NoWifiDevice => "No Wi-Fi Interface found.".to_string(),
        WifiError::NoActiveConnection => "No active Wi-Fi connection found.".to_string(),
        WifiError::InvalidInput(reason) => format!("{reason}."),
        WifiError::ScanTimedOut { polls } => {
            format!("Wi-Fi scan did not complete after {polls} polls.")
        }
        other => format!("Failed to communicate with NetworkManager: {other}"),
    }
}
