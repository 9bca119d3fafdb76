//! Wireless device lookup.
//!
//! All lookups walk `GetDevices()` in the order NetworkManager returns it and
//! stop at the first match.

use log::debug;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::{Device, WifiError};
use crate::dbus::NmBus;

/// Returns the interface name of the first wireless device.
///
/// `Ok(None)` means the daemon answered but has no wireless device; bus
/// failures are returned as errors.
pub(crate) async fn resolve_wifi_interface(bus: &dyn NmBus) -> Result<Option<String>> {
    for path in bus.devices().await? {
        if bus.device_type(&path).await?.is_wireless() {
            let iface = bus.device_interface(&path).await?;
            debug!("Wi-Fi interface {iface} at {}", path.as_str());
            return Ok(Some(iface));
        }
    }

    debug!("No Wi-Fi device present");
    Ok(None)
}

/// Finds the first Wi-Fi device on the system.
///
/// Returns `NoWifiDevice` if none found.
pub(crate) async fn find_wifi_device(bus: &dyn NmBus) -> Result<OwnedObjectPath> {
    for path in bus.devices().await? {
        if bus.device_type(&path).await?.is_wireless() {
            return Ok(path);
        }
    }
    Err(WifiError::NoWifiDevice)
}

/// Finds the wireless device bound to `interface`.
///
/// A non-wireless device with the same name does not match. Returns
/// `DeviceNotFound` if nothing matches.
pub(crate) async fn find_wifi_device_by_interface(
    bus: &dyn NmBus,
    interface: &str,
) -> Result<OwnedObjectPath> {
    for path in bus.devices().await? {
        if bus.device_interface(&path).await? == interface
            && bus.device_type(&path).await?.is_wireless()
        {
            return Ok(path);
        }
    }
    Err(WifiError::DeviceNotFound(interface.to_string()))
}

/// Snapshots every wireless device.
pub(crate) async fn list_wifi_devices(bus: &dyn NmBus) -> Result<Vec<Device>> {
    let mut devices = Vec::new();

    for path in bus.devices().await? {
        let device_type = bus.device_type(&path).await?;
        if !device_type.is_wireless() {
            continue;
        }

        devices.push(Device {
            path: path.as_str().to_owned(),
            interface: bus.device_interface(&path).await?,
            device_type,
            last_scan: bus.last_scan(&path).await?,
            active_access_point: bus
                .active_access_point(&path)
                .await?
                .map(|ap| ap.as_str().to_owned()),
        });
    }

    Ok(devices)
}
