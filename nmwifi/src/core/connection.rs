//! Creating and activating Wi-Fi connection profiles.

use log::{debug, info, warn};
use uuid::Uuid;

use crate::Result;
use crate::api::models::{ConnectReport, ConnectionProfile, WifiError};
use crate::core::resolver::find_wifi_device;
use crate::dbus::NmBus;

/// Connects the first wireless device to `ssid` with a new WPA-PSK profile.
///
/// The flow:
/// 1. Reject an empty SSID before touching the bus
/// 2. Find the first Wi-Fi device
/// 3. Request a scan so the target is more likely to be visible (errors ignored)
/// 4. Add a `WiFi-<ssid>` profile through the settings service
/// 5. Activate it on the device
/// 6. Check whether an active connection with that display id exists
///
/// Step 6 is all the verification there is. Activation continues
/// asynchronously in the daemon, so a report with `verified == false` does
/// not mean the connection failed, and `verified == true` does not mean
/// authentication or DHCP succeeded.
pub(crate) async fn connect(
    bus: &dyn NmBus,
    ssid: &str,
    psk: &str,
    new_uuid: fn() -> Uuid,
) -> Result<ConnectReport> {
    if ssid.is_empty() {
        return Err(WifiError::InvalidInput("SSID is not specified".into()));
    }

    let device = find_wifi_device(bus).await?;
    debug!("Found WiFi device: {}", device.as_str());

    match bus.request_scan(&device).await {
        Ok(()) => debug!("Scan requested successfully"),
        Err(e) => warn!("Scan request failed: {e}"),
    }

    let profile = ConnectionProfile::new(ssid, psk, new_uuid());
    info!("Creating Wi-Fi connection: {}", profile.id);

    let profile_path = bus.add_connection(&profile).await?;
    debug!("New connection path: {}", profile_path.as_str());

    let active_path = bus.activate_connection(&profile_path, &device).await?;
    debug!("Activated connection path: {}", active_path.as_str());

    let verified = is_profile_active(bus, &profile.id).await;
    if verified {
        info!("Connection '{}' is listed as active", profile.id);
    } else {
        warn!("Connection '{}' not among active connections", profile.id);
    }

    Ok(ConnectReport {
        ssid: ssid.to_string(),
        profile_id: profile.id,
        profile_path,
        active_path,
        verified,
    })
}

/// Returns whether any active connection carries the display id `id`.
///
/// Activation already succeeded when this runs, so read failures are
/// logged and count as "not found" instead of failing the connect.
async fn is_profile_active(bus: &dyn NmBus, id: &str) -> bool {
    let paths = match bus.active_connections().await {
        Ok(paths) => paths,
        Err(e) => {
            warn!("Failed to list active connections: {e}");
            return false;
        }
    };

    for path in paths {
        match bus.active_connection(&path).await {
            Ok(active) if active.id == id => return true,
            Ok(_) => {}
            Err(e) => warn!("Skipping active connection {}: {e}", path.as_str()),
        }
    }
    false
}
