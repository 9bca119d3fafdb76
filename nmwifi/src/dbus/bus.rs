//! Typed access to the NetworkManager object model.
//!
//! [`NmBus`] is the only seam between the Wi-Fi operations and D-Bus. Each
//! method is one remote call or property read, returned as a typed value.
//! [`DbusBus`] implements it on top of the generated zbus proxies; tests and
//! embedders can supply their own implementation.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use zbus::Connection;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::builders::wifi::build_psk_connection;
use crate::api::models::{
    AccessPoint, ActiveConnection, ApSecurityFlags, ConnectionProfile, DeviceType, WifiError,
};
use crate::dbus::{
    NMAccessPointProxy, NMActiveConnectionProxy, NMDeviceProxy, NMProxy, NMSettingsProxy,
    NMWirelessProxy,
};
use crate::types::constants::paths;
use crate::util::utils::non_empty_path;

/// Remote operations the Wi-Fi components need from NetworkManager.
#[async_trait]
pub trait NmBus: Send + Sync {
    /// `NetworkManager.GetDevices()`.
    async fn devices(&self) -> Result<Vec<OwnedObjectPath>>;

    /// `Device.Interface`.
    async fn device_interface(&self, device: &OwnedObjectPath) -> Result<String>;

    /// `Device.DeviceType`.
    async fn device_type(&self, device: &OwnedObjectPath) -> Result<DeviceType>;

    /// `Device.Wireless.LastScan`.
    async fn last_scan(&self, device: &OwnedObjectPath) -> Result<i64>;

    /// `Device.Wireless.RequestScan({})`. Returns once the request is accepted,
    /// not when the scan finishes.
    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()>;

    /// `Device.Wireless.GetAccessPoints()`. Access points hiding their SSID
    /// are not listed.
    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>>;

    /// `Device.Wireless.ActiveAccessPoint`, with `"/"` mapped to `None`.
    async fn active_access_point(&self, device: &OwnedObjectPath)
    -> Result<Option<OwnedObjectPath>>;

    /// Reads SSID, strength and security flags of one access point.
    async fn access_point(&self, ap: &OwnedObjectPath) -> Result<AccessPoint>;

    /// `Settings.AddConnection(profile)`; returns the profile path.
    async fn add_connection(&self, profile: &ConnectionProfile) -> Result<OwnedObjectPath>;

    /// `NetworkManager.ActivateConnection(profile, device, "/")`; returns the
    /// active connection path.
    async fn activate_connection(
        &self,
        profile: &OwnedObjectPath,
        device: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath>;

    /// `NetworkManager.DeactivateConnection(active)`.
    async fn deactivate_connection(&self, active: &OwnedObjectPath) -> Result<()>;

    /// `NetworkManager.ActiveConnections`.
    async fn active_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Reads `Id` and `Devices` of one active connection.
    async fn active_connection(&self, path: &OwnedObjectPath) -> Result<ActiveConnection>;
}

/// [`NmBus`] backed by a zbus connection to the system bus.
#[derive(Debug, Clone)]
pub struct DbusBus {
    conn: Connection,
}

impl DbusBus {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Connects to the system bus.
    pub async fn system() -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self::new(conn))
    }

    async fn device_proxy(&self, path: &OwnedObjectPath) -> Result<NMDeviceProxy<'static>> {
        Ok(NMDeviceProxy::builder(&self.conn)
            .path(path.clone())?
            .build()
            .await?)
    }

    async fn wireless_proxy(&self, path: &OwnedObjectPath) -> Result<NMWirelessProxy<'static>> {
        Ok(NMWirelessProxy::builder(&self.conn)
            .path(path.clone())?
            .build()
            .await?)
    }
}

/// Wraps a failed call with a note on what was being attempted.
fn failed(context: impl Into<String>) -> impl FnOnce(zbus::Error) -> WifiError {
    let context = context.into();
    move |source| WifiError::DbusOperation { context, source }
}

#[async_trait]
impl NmBus for DbusBus {
    async fn devices(&self) -> Result<Vec<OwnedObjectPath>> {
        let nm = NMProxy::new(&self.conn).await?;
        nm.get_devices()
            .await
            .map_err(failed("failed to get device paths from NetworkManager"))
    }

    async fn device_interface(&self, device: &OwnedObjectPath) -> Result<String> {
        let dev = self.device_proxy(device).await?;
        dev.interface().await.map_err(failed(format!(
            "failed to get interface name for device {}",
            device.as_str()
        )))
    }

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<DeviceType> {
        let dev = self.device_proxy(device).await?;
        let raw = dev.device_type().await.map_err(failed(format!(
            "failed to get device type for {}",
            device.as_str()
        )))?;
        Ok(DeviceType::from(raw))
    }

    async fn last_scan(&self, device: &OwnedObjectPath) -> Result<i64> {
        let wifi = self.wireless_proxy(device).await?;
        wifi.last_scan().await.map_err(failed(format!(
            "failed to read LastScan of {}",
            device.as_str()
        )))
    }

    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()> {
        let wifi = self.wireless_proxy(device).await?;
        wifi.request_scan(HashMap::new())
            .await
            .map_err(failed(format!("failed to request scan on {}", device.as_str())))
    }

    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        let wifi = self.wireless_proxy(device).await?;
        wifi.get_access_points().await.map_err(failed(format!(
            "failed to list access points on {}",
            device.as_str()
        )))
    }

    async fn active_access_point(
        &self,
        device: &OwnedObjectPath,
    ) -> Result<Option<OwnedObjectPath>> {
        let wifi = self.wireless_proxy(device).await?;
        let path = wifi.active_access_point().await.map_err(failed(format!(
            "failed to read active access point of {}",
            device.as_str()
        )))?;
        Ok(non_empty_path(path))
    }

    async fn access_point(&self, ap: &OwnedObjectPath) -> Result<AccessPoint> {
        let proxy = NMAccessPointProxy::builder(&self.conn)
            .path(ap.clone())?
            .build()
            .await?;

        let read = async {
            Ok::<_, zbus::Error>(AccessPoint {
                ssid: proxy.ssid().await?,
                strength: proxy.strength().await?,
                wpa_flags: ApSecurityFlags::from_bits_retain(proxy.wpa_flags().await?),
                rsn_flags: ApSecurityFlags::from_bits_retain(proxy.rsn_flags().await?),
            })
        };
        read.await
            .map_err(failed(format!("failed to read access point {}", ap.as_str())))
    }

    async fn add_connection(&self, profile: &ConnectionProfile) -> Result<OwnedObjectPath> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        let dict = build_psk_connection(profile);
        debug!("Adding connection '{}' ({})", profile.id, profile.uuid);
        settings
            .add_connection(dict)
            .await
            .map_err(failed(format!("failed to add connection '{}'", profile.id)))
    }

    async fn activate_connection(
        &self,
        profile: &OwnedObjectPath,
        device: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath> {
        let nm = NMProxy::new(&self.conn).await?;
        let specific_object = OwnedObjectPath::try_from(paths::NONE)?;
        nm.activate_connection(profile.clone(), device.clone(), specific_object)
            .await
            .map_err(failed(format!(
                "failed to activate {} on {}",
                profile.as_str(),
                device.as_str()
            )))
    }

    async fn deactivate_connection(&self, active: &OwnedObjectPath) -> Result<()> {
        let nm = NMProxy::new(&self.conn).await?;
        nm.deactivate_connection(active.clone())
            .await
            .map_err(failed(format!("failed to deactivate {}", active.as_str())))
    }

    async fn active_connections(&self) -> Result<Vec<OwnedObjectPath>> {
        let nm = NMProxy::new(&self.conn).await?;
        nm.active_connections()
            .await
            .map_err(failed("failed to get active connections from NetworkManager"))
    }

    async fn active_connection(&self, path: &OwnedObjectPath) -> Result<ActiveConnection> {
        let ac = NMActiveConnectionProxy::builder(&self.conn)
            .path(path.clone())?
            .build()
            .await?;

        let context = || format!("failed to read active connection {}", path.as_str());
        Ok(ActiveConnection {
            path: path.clone(),
            id: ac.id().await.map_err(failed(context()))?,
            devices: ac.devices().await.map_err(failed(context()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_call_keeps_context_and_source() {
        let err = failed("failed to request scan on /dev/2")(zbus::Error::Failure(
            "not allowed".into(),
        ));

        match &err {
            WifiError::DbusOperation { context, source } => {
                assert_eq!(context, "failed to request scan on /dev/2");
                assert!(matches!(source, zbus::Error::Failure(m) if m == "not allowed"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().starts_with("failed to request scan on /dev/2: "));
    }
}
