//! In-memory NetworkManager used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zvariant::OwnedObjectPath;

use nmwifi::{
    AccessPoint, ActiveConnection, ApSecurityFlags, Clock, ConnectionProfile, DeviceType,
    NetworkManager, NmBus, Result, ScanConfig, WifiError,
};

pub fn path(s: &str) -> OwnedObjectPath {
    OwnedObjectPath::try_from(s).expect("valid object path")
}

pub fn open_ap(ssid: &str, strength: u8) -> AccessPoint {
    AccessPoint {
        ssid: ssid.as_bytes().to_vec(),
        strength,
        wpa_flags: ApSecurityFlags::empty(),
        rsn_flags: ApSecurityFlags::empty(),
    }
}

pub fn psk_ap(ssid: &str, strength: u8) -> AccessPoint {
    AccessPoint {
        ssid: ssid.as_bytes().to_vec(),
        strength,
        wpa_flags: ApSecurityFlags::empty(),
        rsn_flags: ApSecurityFlags::KEY_MGMT_PSK | ApSecurityFlags::PAIR_CCMP,
    }
}

pub struct FakeDevice {
    pub path: OwnedObjectPath,
    pub interface: String,
    pub device_type: DeviceType,
    /// Successive `LastScan` readings; the last one repeats forever.
    pub last_scan: Vec<i64>,
    pub access_points: Vec<OwnedObjectPath>,
    pub active_access_point: Option<OwnedObjectPath>,
}

impl FakeDevice {
    fn new(p: &str, interface: &str, device_type: DeviceType) -> Self {
        Self {
            path: path(p),
            interface: interface.to_string(),
            device_type,
            last_scan: vec![-1],
            access_points: Vec::new(),
            active_access_point: None,
        }
    }

    pub fn wifi(p: &str, interface: &str) -> Self {
        Self::new(p, interface, DeviceType::Wifi)
    }

    pub fn ethernet(p: &str, interface: &str) -> Self {
        Self::new(p, interface, DeviceType::Ethernet)
    }

    pub fn loopback(p: &str) -> Self {
        Self::new(p, "lo", DeviceType::Loopback)
    }

    pub fn with_last_scan(mut self, readings: &[i64]) -> Self {
        self.last_scan = readings.to_vec();
        self
    }

    pub fn with_access_point(mut self, ap: &str) -> Self {
        self.access_points.push(path(ap));
        self
    }

    pub fn associated_with(mut self, ap: &str) -> Self {
        self.active_access_point = Some(path(ap));
        self
    }
}

/// Scriptable [`NmBus`] that records every call it receives.
pub struct FakeBus {
    devices: Vec<FakeDevice>,
    access_points: HashMap<String, AccessPoint>,
    active: Mutex<Vec<ActiveConnection>>,
    scan_reads: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<&'static str>>,
    added: Mutex<Vec<(OwnedObjectPath, ConnectionProfile)>>,
    activated_on: Mutex<Vec<OwnedObjectPath>>,
    deactivated: Mutex<Vec<OwnedObjectPath>>,
    failing: Vec<&'static str>,
    list_activations: bool,
}

impl FakeBus {
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            access_points: HashMap::new(),
            active: Mutex::new(Vec::new()),
            scan_reads: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
            activated_on: Mutex::new(Vec::new()),
            deactivated: Mutex::new(Vec::new()),
            failing: Vec::new(),
            list_activations: true,
        }
    }

    pub fn with_device(mut self, device: FakeDevice) -> Self {
        self.devices.push(device);
        self
    }

    pub fn with_ap(mut self, p: &str, ap: AccessPoint) -> Self {
        self.access_points.insert(p.to_string(), ap);
        self
    }

    pub fn with_active(self, p: &str, id: &str, devices: &[&str]) -> Self {
        self.active.lock().unwrap().push(ActiveConnection {
            path: path(p),
            id: id.to_string(),
            devices: devices.iter().map(|d| path(d)).collect(),
        });
        self
    }

    /// Makes every call named `call` fail with a D-Bus error.
    pub fn failing(mut self, call: &'static str) -> Self {
        self.failing.push(call);
        self
    }

    /// Activations succeed but never show up in `ActiveConnections`.
    pub fn without_listed_activations(mut self) -> Self {
        self.list_activations = false;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn added_profiles(&self) -> Vec<ConnectionProfile> {
        self.added
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Devices passed to `ActivateConnection`, in call order.
    pub fn activated_on(&self) -> Vec<OwnedObjectPath> {
        self.activated_on.lock().unwrap().clone()
    }

    pub fn deactivated(&self) -> Vec<OwnedObjectPath> {
        self.deactivated.lock().unwrap().clone()
    }

    pub fn active_ids(&self) -> Vec<String> {
        self.active
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.id.clone())
            .collect()
    }

    fn record(&self, call: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(&call) {
            return Err(WifiError::Dbus(zbus::Error::Failure(format!(
                "{call} rejected"
            ))));
        }
        Ok(())
    }

    fn device(&self, p: &OwnedObjectPath) -> Result<&FakeDevice> {
        self.devices
            .iter()
            .find(|d| d.path == *p)
            .ok_or_else(|| unknown_object(p))
    }
}

impl Default for FakeBus {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown_object(p: &OwnedObjectPath) -> WifiError {
    WifiError::Dbus(zbus::Error::Failure(format!(
        "no such object {}",
        p.as_str()
    )))
}

#[async_trait]
impl NmBus for FakeBus {
    async fn devices(&self) -> Result<Vec<OwnedObjectPath>> {
        self.record("GetDevices")?;
        Ok(self.devices.iter().map(|d| d.path.clone()).collect())
    }

    async fn device_interface(&self, device: &OwnedObjectPath) -> Result<String> {
        self.record("Interface")?;
        Ok(self.device(device)?.interface.clone())
    }

    async fn device_type(&self, device: &OwnedObjectPath) -> Result<DeviceType> {
        self.record("DeviceType")?;
        Ok(self.device(device)?.device_type)
    }

    async fn last_scan(&self, device: &OwnedObjectPath) -> Result<i64> {
        self.record("LastScan")?;
        let dev = self.device(device)?;
        let mut reads = self.scan_reads.lock().unwrap();
        let idx = reads.entry(device.as_str().to_string()).or_insert(0);
        let value = dev
            .last_scan
            .get(*idx)
            .or(dev.last_scan.last())
            .copied()
            .unwrap_or(-1);
        *idx += 1;
        Ok(value)
    }

    async fn request_scan(&self, device: &OwnedObjectPath) -> Result<()> {
        self.record("RequestScan")?;
        self.device(device)?;
        Ok(())
    }

    async fn access_points(&self, device: &OwnedObjectPath) -> Result<Vec<OwnedObjectPath>> {
        self.record("GetAccessPoints")?;
        Ok(self.device(device)?.access_points.clone())
    }

    async fn active_access_point(
        &self,
        device: &OwnedObjectPath,
    ) -> Result<Option<OwnedObjectPath>> {
        self.record("ActiveAccessPoint")?;
        Ok(self.device(device)?.active_access_point.clone())
    }

    async fn access_point(&self, ap: &OwnedObjectPath) -> Result<AccessPoint> {
        self.record("AccessPoint")?;
        self.access_points
            .get(ap.as_str())
            .cloned()
            .ok_or_else(|| unknown_object(ap))
    }

    async fn add_connection(&self, profile: &ConnectionProfile) -> Result<OwnedObjectPath> {
        self.record("AddConnection")?;
        let mut added = self.added.lock().unwrap();
        let p = path(&format!(
            "/org/freedesktop/NetworkManager/Settings/{}",
            added.len() + 1
        ));
        added.push((p.clone(), profile.clone()));
        Ok(p)
    }

    async fn activate_connection(
        &self,
        profile: &OwnedObjectPath,
        device: &OwnedObjectPath,
    ) -> Result<OwnedObjectPath> {
        self.record("ActivateConnection")?;
        let id = self
            .added
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p == profile)
            .map(|(_, prof)| prof.id.clone())
            .ok_or_else(|| unknown_object(profile))?;
        self.activated_on.lock().unwrap().push(device.clone());

        let mut active = self.active.lock().unwrap();
        let p = path(&format!(
            "/org/freedesktop/NetworkManager/ActiveConnection/{}",
            active.len() + 100
        ));
        if self.list_activations {
            active.push(ActiveConnection {
                path: p.clone(),
                id,
                devices: vec![device.clone()],
            });
        }
        Ok(p)
    }

    async fn deactivate_connection(&self, active: &OwnedObjectPath) -> Result<()> {
        self.record("DeactivateConnection")?;
        self.active.lock().unwrap().retain(|a| a.path != *active);
        self.deactivated.lock().unwrap().push(active.clone());
        Ok(())
    }

    async fn active_connections(&self) -> Result<Vec<OwnedObjectPath>> {
        self.record("ActiveConnections")?;
        Ok(self
            .active
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.path.clone())
            .collect())
    }

    async fn active_connection(&self, p: &OwnedObjectPath) -> Result<ActiveConnection> {
        self.record("ActiveConnection")?;
        self.active
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.path == *p)
            .cloned()
            .ok_or_else(|| unknown_object(p))
    }
}

/// [`Clock`] that returns immediately and remembers what it was asked for.
#[derive(Default)]
pub struct FakeClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Wires a fake bus and clock into a `NetworkManager`.
pub fn manager(bus: &Arc<FakeBus>, clock: &Arc<FakeClock>) -> NetworkManager {
    NetworkManager::with_bus(bus.clone()).with_clock(clock.clone())
}

pub fn manager_with(
    bus: &Arc<FakeBus>,
    clock: &Arc<FakeClock>,
    config: ScanConfig,
) -> NetworkManager {
    manager(bus, clock).with_scan_config(config)
}
