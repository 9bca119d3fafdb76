//! Builders for NetworkManager settings dictionaries.
//!
//! [`ConnectionProfile`](crate::ConnectionProfile) is the typed form of a new
//! Wi-Fi profile; [`wifi::build_psk_connection`] lowers it to the
//! `a{sa{sv}}` dictionary NetworkManager accepts.
//!
//! ```
//! use nmwifi::ConnectionProfile;
//! use nmwifi::builders::wifi::build_psk_connection;
//! use uuid::Uuid;
//!
//! let profile = ConnectionProfile::new("HomeNet", "password123", Uuid::new_v4());
//! let settings = build_psk_connection(&profile);
//! assert!(settings.contains_key("802-11-wireless-security"));
//! ```

pub mod wifi;
