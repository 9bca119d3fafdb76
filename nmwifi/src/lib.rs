//! A Rust library for scanning, joining and leaving Wi-Fi networks via
//! NetworkManager.
//!
//! This crate drives the NetworkManager daemon over the system D-Bus:
//!
//! - Resolving the wireless interface name
//! - Scanning and listing visible networks
//! - Adding and activating a WPA-PSK connection profile
//! - Deactivating the active Wi-Fi connection
//!
//! # Example
//!
//! ```no_run
//! use nmwifi::NetworkManager;
//!
//! # async fn example() -> nmwifi::Result<()> {
//! let nm = NetworkManager::new().await?;
//!
//! let Some(iface) = nm.resolve_wifi_interface().await? else {
//!     return Ok(());
//! };
//!
//! for net in nm.scan(&iface).await? {
//!     println!("SSID: {}, Strength: {}%, Security: {}", net.ssid, net.strength, net.security);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, WifiError>`. Missing devices, nothing to
//! disconnect, bad input and scan timeouts each have their own variant, so
//! callers decide what is worth printing.
//!
//! # Testing Against a Fake Daemon
//!
//! Every remote call goes through the [`NmBus`] trait. Implement it in
//! memory and pass it to [`NetworkManager::with_bus`], together with a
//! [`Clock`] that does not really sleep, to exercise the operations without
//! a system bus.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod core;
mod dbus;
mod types;
mod util;

// Public API modules
mod api;

// Re-exported public API
pub use crate::api::builders;
pub use crate::api::models::{
    AccessPoint, ActiveConnection, ApSecurityFlags, ConnectReport, ConnectionProfile, Device,
    DeviceType, Disconnected, ScanConfig, ScanResult, Security, WifiError,
};
pub use crate::api::network_manager::NetworkManager;
pub use crate::core::clock::{Clock, SystemClock};
pub use crate::dbus::{DbusBus, NmBus};

/// A specialized `Result` type for Wi-Fi operations.
pub type Result<T> = std::result::Result<T, WifiError>;
