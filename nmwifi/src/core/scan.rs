//! Wi-Fi network scanning and enumeration.
//!
//! NetworkManager gives no completion reply for `RequestScan`; the only
//! signal is the device's `LastScan` timestamp moving. A scan therefore goes
//! through four states:
//!
//! ```text
//! Requested --read--> Polling --read--> ... --> Completed
//!                                          \--> TimedOut
//! ```
//!
//! Every read of `LastScan` is one poll. The first poll happens right after
//! the request, later ones are separated by the configured interval.

use log::{debug, info, warn};
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::{ScanConfig, ScanResult, WifiError};
use crate::core::clock::Clock;
use crate::core::resolver::find_wifi_device_by_interface;
use crate::dbus::NmBus;

/// Progress of a single scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanState {
    /// The scan was requested; `baseline` is `LastScan` from before the request.
    Requested { baseline: i64 },
    /// `polls` reads so far, none differing from `baseline`.
    Polling { baseline: i64, polls: u32 },
    /// Read number `polls` returned a new timestamp.
    Completed { last_scan: i64, polls: u32 },
    /// `polls` reads were spent without the timestamp moving.
    TimedOut { polls: u32 },
}

impl ScanState {
    /// Feeds one `LastScan` reading into the state machine.
    ///
    /// Terminal states ignore further readings.
    pub(crate) fn observe(self, reading: i64, max_polls: u32) -> Self {
        let (baseline, polls) = match self {
            ScanState::Requested { baseline } => (baseline, 0),
            ScanState::Polling { baseline, polls } => (baseline, polls),
            done => return done,
        };

        let polls = polls + 1;
        if reading != baseline {
            ScanState::Completed {
                last_scan: reading,
                polls,
            }
        } else if polls >= max_polls {
            ScanState::TimedOut { polls }
        } else {
            ScanState::Polling { baseline, polls }
        }
    }
}

/// Polls `LastScan` until it moves away from `baseline`.
///
/// Returns the number of polls spent, or `ScanTimedOut` once
/// `config.max_polls` reads have returned the baseline.
pub(crate) async fn wait_for_scan(
    bus: &dyn NmBus,
    clock: &dyn Clock,
    device: &OwnedObjectPath,
    baseline: i64,
    config: &ScanConfig,
) -> Result<u32> {
    let mut state = ScanState::Requested { baseline };

    loop {
        let reading = bus.last_scan(device).await?;
        state = state.observe(reading, config.max_polls);

        match state {
            ScanState::Completed { last_scan, polls } => {
                debug!("LastScan moved {baseline} -> {last_scan} after {polls} poll(s)");
                return Ok(polls);
            }
            ScanState::TimedOut { polls } => {
                warn!("LastScan still {baseline} after {polls} poll(s), giving up");
                return Err(WifiError::ScanTimedOut { polls });
            }
            _ => clock.sleep(config.poll_interval).await,
        }
    }
}

/// Scans on the wireless device named `interface` and lists what it sees.
///
/// One entry per access point, in the daemon's order, without merging
/// duplicate SSIDs. Networks that hide their SSID are left out.
pub(crate) async fn scan(
    bus: &dyn NmBus,
    clock: &dyn Clock,
    interface: &str,
    config: &ScanConfig,
) -> Result<Vec<ScanResult>> {
    let device = find_wifi_device_by_interface(bus, interface).await?;
    debug!("Scanning on {interface} ({})", device.as_str());

    let baseline = bus.last_scan(&device).await?;
    bus.request_scan(&device).await?;
    debug!("Scan requested, baseline LastScan = {baseline}");

    wait_for_scan(bus, clock, &device, baseline, config).await?;

    let mut results = Vec::new();
    for ap_path in bus.access_points(&device).await? {
        let ap = bus.access_point(&ap_path).await?;
        if ap.ssid.is_empty() {
            debug!("Skipping hidden network at {}", ap_path.as_str());
            continue;
        }
        results.push(ScanResult::from(&ap));
    }

    info!("Scan on {interface} found {} access point(s)", results.len());
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_differing_reading_completes() {
        let state = ScanState::Requested { baseline: 100 }.observe(250, 5);
        assert_eq!(
            state,
            ScanState::Completed {
                last_scan: 250,
                polls: 1
            }
        );
    }

    #[test]
    fn equal_readings_keep_polling() {
        let state = ScanState::Requested { baseline: 100 }
            .observe(100, 5)
            .observe(100, 5);
        assert_eq!(
            state,
            ScanState::Polling {
                baseline: 100,
                polls: 2
            }
        );
    }

    #[test]
    fn nth_reading_completes_after_n_polls() {
        for n in 1..=6u32 {
            let mut state = ScanState::Requested { baseline: -1 };
            let mut readings = vec![-1; (n - 1) as usize];
            readings.push(42);

            for r in readings {
                state = state.observe(r, 10);
            }
            assert_eq!(
                state,
                ScanState::Completed {
                    last_scan: 42,
                    polls: n
                }
            );
        }
    }

    #[test]
    fn bound_reached_times_out() {
        let mut state = ScanState::Requested { baseline: 7 };
        for _ in 0..3 {
            state = state.observe(7, 3);
        }
        assert_eq!(state, ScanState::TimedOut { polls: 3 });
    }

    #[test]
    fn change_on_last_allowed_poll_still_completes() {
        let state = ScanState::Requested { baseline: 7 }
            .observe(7, 2)
            .observe(8, 2);
        assert_eq!(
            state,
            ScanState::Completed {
                last_scan: 8,
                polls: 2
            }
        );
    }

    #[test]
    fn terminal_states_ignore_readings() {
        let done = ScanState::Completed {
            last_scan: 9,
            polls: 1,
        };
        assert_eq!(done.observe(10, 5), done);

        let timed_out = ScanState::TimedOut { polls: 5 };
        assert_eq!(timed_out.observe(10, 5), timed_out);
    }
}
