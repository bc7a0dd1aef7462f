// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device record collection and the best-effort local address lookup.

use std::net::IpAddr;
use std::time::Duration;

use chrono::Local;
use stempel_bridge::NativeEnvironment;
use stempel_core::types::DeviceInfo;
use stempel_security::generate_device_info;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Shown when no non-loopback address can be determined.
pub const FALLBACK_IP: &str = "127.0.0.1";

/// Upper bound on the address lookup.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// TEST-NET-1 discard port. Connecting a UDP socket sends nothing, it only
/// asks the OS which local interface would route there.
const ROUTE_PROBE: &str = "192.0.2.1:9";

/// Synchronous part of the device record. `ip_address` is still empty.
///
/// `screen` is the size of the monitor showing the window. It fills in the
/// dimensions the environment probe could not see.
pub fn collect_device_info<E: NativeEnvironment + ?Sized>(
    env: &E,
    screen: Option<(u32, u32)>,
) -> DeviceInfo {
    let mut signals = env.signals();
    if let Some((width, height)) = screen {
        signals.screen_width = signals.screen_width.or(Some(width));
        signals.screen_height = signals.screen_height.or(Some(height));
    }
    generate_device_info(&signals, Local::now())
}

/// Local address of the interface that carries outbound traffic.
///
/// This is informational only and never fails: any error or timeout yields
/// [`FALLBACK_IP`].
pub async fn resolve_ip_address() -> String {
    match tokio::time::timeout(LOOKUP_TIMEOUT, outbound_address()).await {
        Ok(Ok(ip)) if !ip.is_loopback() && !ip.is_unspecified() => {
            debug!(%ip, "local address resolved");
            ip.to_string()
        }
        Ok(Ok(ip)) => {
            debug!(%ip, "only a loopback address available");
            FALLBACK_IP.to_string()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "local address lookup failed");
            FALLBACK_IP.to_string()
        }
        Err(_) => {
            warn!("local address lookup timed out");
            FALLBACK_IP.to_string()
        }
    }
}

async fn outbound_address() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(ROUTE_PROBE).await?;
    Ok(socket.local_addr()?.ip())
}

#[cfg(test)]
mod tests {
    use stempel_core::types::EnvironmentSignals;

    use super::*;

    struct FixedEnvironment;

    struct HeadlessEnvironment;

    impl NativeEnvironment for HeadlessEnvironment {
        fn signals(&self) -> EnvironmentSignals {
            EnvironmentSignals {
                user_agent: Some("Stempel/0.1 (X11; Linux x86_64)".into()),
                ..EnvironmentSignals::default()
            }
        }
    }

    impl NativeEnvironment for FixedEnvironment {
        fn signals(&self) -> EnvironmentSignals {
            EnvironmentSignals {
                user_agent: Some("Stempel/0.1 (X11; Linux x86_64)".into()),
                language: Some("de-DE".into()),
                screen_width: Some(1280),
                screen_height: Some(800),
                ..EnvironmentSignals::default()
            }
        }
    }

    #[test]
    fn device_info_starts_without_ip() {
        let info = collect_device_info(&FixedEnvironment, None);
        assert_eq!(info.device_type, "Linux PC");
        assert_eq!(info.screen_resolution, "1280x800");
        assert_eq!(info.device_id.len(), 12);
        assert!(info.ip_address.is_none());
    }

    #[test]
    fn monitor_size_fills_missing_resolution() {
        assert_eq!(collect_device_info(&HeadlessEnvironment, None).screen_resolution, "Unknown");

        let with_monitor = collect_device_info(&HeadlessEnvironment, Some((2560, 1440)));
        assert_eq!(with_monitor.screen_resolution, "2560x1440");
        assert_ne!(
            with_monitor.device_id,
            collect_device_info(&HeadlessEnvironment, Some((1920, 1080))).device_id
        );
    }

    #[test]
    fn probed_resolution_wins_over_monitor_size() {
        let info = collect_device_info(&FixedEnvironment, Some((2560, 1440)));
        assert_eq!(info.screen_resolution, "1280x800");
    }

    #[tokio::test]
    async fn ip_lookup_always_yields_an_address() {
        let ip = resolve_ip_address().await;
        assert!(ip.parse::<IpAddr>().is_ok(), "not an address: {ip}");
    }
}
