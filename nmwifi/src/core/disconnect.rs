//! Deactivating the active Wi-Fi connection.
//!
//! Deactivating the connection, rather than disconnecting the device, leaves
//! NetworkManager free to autoconnect another saved network afterwards.

use log::{debug, info, warn};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::{Disconnected, WifiError};
use crate::core::resolver::find_wifi_device;
use crate::dbus::NmBus;
use crate::util::utils::decode_ssid;

/// Deactivates the first active connection bound to a wireless device.
///
/// Active connections and their devices are visited in the daemon's order.
/// With several wireless connections up, only the first one found is
/// deactivated.
pub(crate) async fn disconnect(bus: &dyn NmBus) -> Result<Disconnected> {
    for path in bus.active_connections().await? {
        let active = bus.active_connection(&path).await?;

        for device in &active.devices {
            if !bus.device_type(device).await?.is_wireless() {
                continue;
            }

            let ssid = associated_ssid(bus, device).await;
            debug!(
                "Deactivating '{}' ({}) on {}",
                active.id,
                path.as_str(),
                device.as_str()
            );
            bus.deactivate_connection(&path).await?;

            info!(
                "Deactivated Wi-Fi connection: {}",
                ssid.as_deref().unwrap_or("Unknown")
            );
            return Ok(Disconnected {
                connection: path,
                ssid,
            });
        }
    }

    debug!("No active connection is bound to a Wi-Fi device");
    Err(WifiError::NoActiveConnection)
}

/// Returns the SSID the first wireless device is associated with, if any.
pub(crate) async fn current_ssid(bus: &dyn NmBus) -> Result<Option<String>> {
    match find_wifi_device(bus).await {
        Ok(device) => Ok(associated_ssid(bus, &device).await),
        Err(WifiError::NoWifiDevice) => Ok(None),
        Err(e) => Err(e),
    }
}

/// SSID of the access point `device` is associated with.
///
/// Only used for messages, so failures are logged and reported as `None`.
async fn associated_ssid(bus: &dyn NmBus, device: &OwnedObjectPath) -> Option<String> {
    let ap_path = match bus.active_access_point(device).await {
        Ok(Some(p)) => p,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read active access point of {}: {e}", device.as_str());
            return None;
        }
    };

    match bus.access_point(&ap_path).await {
        Ok(ap) => Some(decode_ssid(&ap.ssid)),
        Err(e) => {
            warn!("Failed to read access point {}: {e}", ap_path.as_str());
            None
        }
    }
}
