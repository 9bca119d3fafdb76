//! Small conversion helpers shared by the scan, connect and disconnect paths.

use log::warn;
use zvariant::OwnedObjectPath;

use crate::types::constants::paths;

/// Decodes SSID bytes best-effort.
///
/// SSIDs are arbitrary octets. Invalid UTF-8 sequences are replaced with
/// U+FFFD rather than dropping the network.
pub(crate) fn decode_ssid(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(e) => {
            warn!("Invalid UTF-8 in SSID, decoding lossily: {e}");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Maps NetworkManager's `"/"` placeholder to `None`.
pub(crate) fn non_empty_path(path: OwnedObjectPath) -> Option<OwnedObjectPath> {
    if path.as_str() == paths::NONE {
        None
    } else {
        Some(path)
    }
}
