use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::Result;
use crate::api::models::{ConnectReport, Device, Disconnected, ScanConfig, ScanResult};
use crate::core::clock::{Clock, SystemClock};
use crate::core::connection::connect;
use crate::core::disconnect::{current_ssid, disconnect};
use crate::core::resolver::{list_wifi_devices, resolve_wifi_interface};
use crate::core::scan::scan;
use crate::dbus::{DbusBus, NmBus};

/// High-level interface to NetworkManager's Wi-Fi functions over D-Bus.
///
/// # Creating an Instance
///
/// ```no_run
/// use nmwifi::NetworkManager;
///
/// # async fn example() -> nmwifi::Result<()> {
/// let nm = NetworkManager::new().await?;
/// # Ok(())
/// # }
/// ```
///
/// # Examples
///
/// ## Scan, then connect
///
/// ```no_run
/// use nmwifi::NetworkManager;
///
/// # async fn example() -> nmwifi::Result<()> {
/// let nm = NetworkManager::new().await?;
///
/// if let Some(iface) = nm.resolve_wifi_interface().await? {
///     for net in nm.scan(&iface).await? {
///         println!("{}: {}% {}", net.ssid, net.strength, net.security);
///     }
/// }
///
/// let report = nm.connect("MyNetwork", "password").await?;
/// println!("listed as active: {}", report.verified);
/// # Ok(())
/// # }
/// ```
///
/// ## Disconnect
///
/// ```no_run
/// use nmwifi::{NetworkManager, WifiError};
///
/// # async fn example() -> nmwifi::Result<()> {
/// let nm = NetworkManager::new().await?;
/// match nm.disconnect().await {
///     Ok(done) => println!("left {}", done.ssid.unwrap_or_default()),
///     Err(WifiError::NoActiveConnection) => println!("nothing to do"),
///     Err(e) => return Err(e),
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `NetworkManager` is `Clone` and can be shared across async tasks. Clones
/// share the same bus connection.
#[derive(Clone)]
pub struct NetworkManager {
    bus: Arc<dyn NmBus>,
    clock: Arc<dyn Clock>,
    config: ScanConfig,
    new_uuid: fn() -> Uuid,
}

impl NetworkManager {
    /// Creates a new `NetworkManager` connected to the system D-Bus.
    pub async fn new() -> Result<Self> {
        Self::with_config(ScanConfig::default()).await
    }

    /// Creates a new `NetworkManager` with custom scan polling bounds.
    pub async fn with_config(config: ScanConfig) -> Result<Self> {
        let bus = DbusBus::system().await?;
        Ok(Self::with_bus(Arc::new(bus)).with_scan_config(config))
    }

    /// Builds a `NetworkManager` on top of any [`NmBus`] implementation.
    pub fn with_bus(bus: Arc<dyn NmBus>) -> Self {
        Self {
            bus,
            clock: Arc::new(SystemClock),
            config: ScanConfig::default(),
            new_uuid: Uuid::new_v4,
        }
    }

    /// Replaces the clock used between scan polls.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the scan polling bounds.
    pub fn with_scan_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the generator for new profile UUIDs (v4 by default).
    pub fn with_uuid_source(mut self, new_uuid: fn() -> Uuid) -> Self {
        self.new_uuid = new_uuid;
        self
    }

    /// Returns the scan polling bounds in use.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Returns the interface name of the first wireless device, if any.
    pub async fn resolve_wifi_interface(&self) -> Result<Option<String>> {
        resolve_wifi_interface(self.bus.as_ref()).await
    }

    /// Lists every wireless device with its scan timestamp and associated
    /// access point.
    pub async fn list_wifi_devices(&self) -> Result<Vec<Device>> {
        list_wifi_devices(self.bus.as_ref()).await
    }

    /// Scans on `interface` and returns one entry per visible access point.
    ///
    /// # Errors
    ///
    /// Returns `WifiError::DeviceNotFound` if no wireless device has that
    /// interface name, and `WifiError::ScanTimedOut` if `LastScan` does not
    /// change within the configured number of polls.
    pub async fn scan(&self, interface: &str) -> Result<Vec<ScanResult>> {
        scan(
            self.bus.as_ref(),
            self.clock.as_ref(),
            interface,
            &self.config,
        )
        .await
    }

    /// Adds and activates a WPA-PSK profile named `WiFi-<ssid>` on the first
    /// wireless device.
    ///
    /// See [`ConnectReport::verified`] for how little the returned report
    /// promises.
    ///
    /// # Errors
    ///
    /// Returns `WifiError::InvalidInput` for an empty SSID (no bus call is
    /// made), `WifiError::NoWifiDevice` if there is no wireless device.
    pub async fn connect(&self, ssid: &str, password: &str) -> Result<ConnectReport> {
        connect(self.bus.as_ref(), ssid, password, self.new_uuid).await
    }

    /// Deactivates the first active Wi-Fi connection.
    ///
    /// # Errors
    ///
    /// Returns `WifiError::NoActiveConnection` if no active connection is
    /// bound to a wireless device.
    pub async fn disconnect(&self) -> Result<Disconnected> {
        disconnect(self.bus.as_ref()).await
    }

    /// Returns the SSID of the network the first wireless device is
    /// associated with.
    pub async fn current_ssid(&self) -> Result<Option<String>> {
        current_ssid(self.bus.as_ref()).await
    }
}

impl fmt::Debug for NetworkManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkManager")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
