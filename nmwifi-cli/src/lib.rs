pub mod output;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::Env;
use log::debug;
use nmwifi::{NetworkManager, ScanConfig, WifiError};

use crate::output::{
    connect_outcome, device_line, disconnected, failure, interface_detected, scan_line,
};

#[derive(Parser, Debug)]
#[command(name = "nmwifi")]
#[command(version, about = "Scan, join and leave Wi-Fi networks through NetworkManager")]
struct Args {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the name of the Wi-Fi interface
    Interface {
        /// List every wireless device with its scan time and access point
        #[arg(long)]
        all: bool,
    },
    /// Scan for networks and list them
    Scan {
        /// Interface to scan on (first Wi-Fi device by default)
        #[arg(short, long)]
        interface: Option<String>,
        /// Delay between LastScan polls
        #[arg(long, value_name = "MS")]
        poll_interval_ms: Option<u64>,
        /// Give up after this many LastScan polls
        #[arg(long, value_name = "N")]
        max_polls: Option<u32>,
    },
    /// Add a WPA-PSK profile for SSID and activate it
    Connect {
        ssid: String,
        #[arg(short, long, env = "NMWIFI_PSK", hide_env_values = true)]
        password: String,
    },
    /// Deactivate the active Wi-Fi connection
    Disconnect,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn scan_config(poll_interval_ms: Option<u64>, max_polls: Option<u32>) -> ScanConfig {
    let mut config = ScanConfig::default();
    if let Some(ms) = poll_interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    if let Some(n) = max_polls {
        config = config.with_max_polls(n);
    }
    config
}

pub async fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.command {
        Command::Scan {
            poll_interval_ms,
            max_polls,
            ..
        } => scan_config(*poll_interval_ms, *max_polls),
        _ => ScanConfig::default(),
    };

    debug!("Scan polling: {config:?}");
    let nm = NetworkManager::with_config(config)
        .await
        .context("Failed to communicate with NetworkManager")?;

    match args.command {
        Command::Interface { all: false } => match nm.resolve_wifi_interface().await {
            Ok(iface) => {
                println!("{}", interface_detected(iface.as_deref()));
                Ok(exit_code(iface.is_some()))
            }
            Err(e) => Ok(report_failure(&e)),
        },
        Command::Interface { all: true } => match nm.list_wifi_devices().await {
            Ok(devices) => {
                if devices.is_empty() {
                    println!("{}", interface_detected(None));
                }
                for device in &devices {
                    println!("{}", device_line(device));
                }
                Ok(exit_code(!devices.is_empty()))
            }
            Err(e) => Ok(report_failure(&e)),
        },
        Command::Scan { interface, .. } => {
            let iface = match interface {
                Some(name) => name,
                None => match nm.resolve_wifi_interface().await {
                    Ok(Some(name)) => {
                        println!("Found Wi-Fi Interface: {name}");
                        name
                    }
                    Ok(None) => {
                        eprintln!("No Wi-Fi Interface found. Unable to scan");
                        return Ok(ExitCode::FAILURE);
                    }
                    Err(e) => return Ok(report_failure(&e)),
                },
            };

            println!("Scanning for available Wi-Fi networks...");
            match nm.scan(&iface).await {
                Ok(networks) => {
                    println!("Wi-Fi scan complete. Available networks:");
                    for net in &networks {
                        println!("{}", scan_line(net));
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report_failure(&e)),
            }
        }
        Command::Connect { ssid, password } => match nm.connect(&ssid, &password).await {
            Ok(report) => {
                println!("New connection path: {}", report.profile_path.as_str());
                println!("Activated connection path: {}", report.active_path.as_str());
                println!("{}", connect_outcome(&report));
                Ok(exit_code(report.verified))
            }
            Err(e) => {
                eprintln!("Failed to connect to Wi-Fi. {}", failure(&e));
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Disconnect => match nm.disconnect().await {
            Ok(done) => {
                println!("{}", disconnected(&done));
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(report_failure(&e)),
        },
    }
}

fn report_failure(err: &WifiError) -> ExitCode {
    eprintln!("{}", failure(err));
    ExitCode::FAILURE
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_scan_flags_build_config() {
        let config = scan_config(Some(250), Some(0));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.max_polls, 1);

        assert_eq!(scan_config(None, None), ScanConfig::default());
    }

    #[test]
    fn test_parse_connect() {
        let args =
            Args::try_parse_from(["nmwifi", "-v", "connect", "TestNet", "-p", "secret123"])
                .unwrap();
        assert_eq!(args.verbose, 1);
        match args.command {
            Command::Connect { ssid, password } => {
                assert_eq!(ssid, "TestNet");
                assert_eq!(password, "secret123");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_scan_options() {
        let args = Args::try_parse_from([
            "nmwifi",
            "scan",
            "--interface",
            "wlan0",
            "--max-polls",
            "5",
        ])
        .unwrap();
        match args.command {
            Command::Scan {
                interface,
                poll_interval_ms,
                max_polls,
            } => {
                assert_eq!(interface.as_deref(), Some("wlan0"));
                assert_eq!(poll_interval_ms, None);
                assert_eq!(max_polls, Some(5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
