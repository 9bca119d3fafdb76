//! NetworkManager connection settings builder.
//!
//! Turns a [`ConnectionProfile`] into the nested dictionary expected by
//! `org.freedesktop.NetworkManager.Settings.AddConnection`.
//!
//! # Settings Structure
//!
//! - `connection`: type, uuid and display id
//! - `802-11-wireless`: the SSID as raw bytes
//! - `802-11-wireless-security`: key management and pre-shared key
//! - `ipv4` / `ipv6`: addressing methods

use std::collections::HashMap;
use zvariant::Value;

use crate::api::models::ConnectionProfile;
use crate::types::constants::profile;

/// One settings section, keyed by property name.
pub type Section = HashMap<&'static str, Value<'static>>;

/// A full connection settings dictionary, keyed by section name.
pub type ConnectionSettings = HashMap<&'static str, Section>;

fn connection_section(p: &ConnectionProfile) -> Section {
    let mut s = HashMap::new();
    s.insert("type", Value::from(p.connection_type()));
    s.insert("uuid", Value::from(p.uuid.to_string()));
    s.insert("id", Value::from(p.id.clone()));
    s
}

fn wireless_section(p: &ConnectionProfile) -> Section {
    let mut s = HashMap::new();
    s.insert("ssid", Value::from(p.ssid.as_bytes().to_vec()));
    s
}

fn psk_security_section(p: &ConnectionProfile) -> Section {
    let mut s = HashMap::new();
    s.insert("key-mgmt", Value::from(p.key_mgmt()));
    s.insert("psk", Value::from(p.psk.clone()));
    s
}

fn ip_section(method: &'static str) -> Section {
    let mut s = HashMap::new();
    s.insert("method", Value::from(method));
    s
}

/// Builds the settings dictionary for a WPA-PSK profile.
pub fn build_psk_connection(p: &ConnectionProfile) -> ConnectionSettings {
    let mut conn: ConnectionSettings = HashMap::new();

    conn.insert("connection", connection_section(p));
    conn.insert(profile::CONNECTION_TYPE, wireless_section(p));
    conn.insert(profile::SECURITY_SETTING, psk_security_section(p));
    conn.insert("ipv4", ip_section(p.ipv4_method()));
    conn.insert("ipv6", ip_section(p.ipv6_method()));

    conn
}
