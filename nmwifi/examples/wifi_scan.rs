use nmwifi::{NetworkManager, ScanConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> nmwifi::Result<()> {
    let config = ScanConfig::new()
        .with_poll_interval(Duration::from_millis(500))
        .with_max_polls(40);
    let nm = NetworkManager::with_config(config).await?;

    let Some(iface) = nm.resolve_wifi_interface().await? else {
        println!("No Wi-Fi interface found. Unable to scan");
        return Ok(());
    };

    println!("Scanning on {iface}...");
    for net in nm.scan(&iface).await? {
        println!("{:30} {:>3}% {}", net.ssid, net.strength, net.security);
    }

    Ok(())
}
