// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Device fingerprint: a best-effort, non-cryptographic device identifier
// plus the descriptive metadata printed in the device-verification block.

use chrono::{DateTime, Local};
use stempel_core::types::{DeviceInfo, EnvironmentSignals};
use tracing::debug;

use crate::checksum::fingerprint_hex;

/// Length of the derived device identifier.
pub const DEVICE_ID_LEN: usize = 12;

/// Substituted for any environment reading that is unavailable.
pub const UNKNOWN: &str = "Unknown";

/// Timestamp format used in the device record and on stamped pages.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the device-type table: a case-insensitive user-agent token and
/// the label it maps to.
#[derive(Debug, Clone, Copy)]
pub struct DeviceRule {
    pub token: &'static str,
    pub label: &'static str,
}

impl DeviceRule {
    fn matches(&self, user_agent_lower: &str) -> bool {
        user_agent_lower.contains(&self.token.to_ascii_lowercase())
    }
}

/// Evaluated top to bottom; the first matching row wins. "Windows Phone"
/// must precede "Windows", and "iPad" user agents that also mention "Mac"
/// rely on iPad coming first.
pub const DEVICE_TYPES: &[DeviceRule] = &[
    DeviceRule { token: "iPhone", label: "iPhone" },
    DeviceRule { token: "iPad", label: "iPad" },
    DeviceRule { token: "Android", label: "Android Device" },
    DeviceRule { token: "Windows Phone", label: "Windows Phone" },
    DeviceRule { token: "Windows", label: "Windows PC" },
    DeviceRule { token: "Mac", label: "Mac" },
    DeviceRule { token: "Linux", label: "Linux PC" },
];

/// Label for a user-agent string, or `"Unknown Device"`.
pub fn classify_device_type(user_agent: &str) -> &'static str {
    let lower = user_agent.to_ascii_lowercase();
    DEVICE_TYPES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.label)
        .unwrap_or("Unknown Device")
}

/// First 12 characters of the checksum of the composite signal string.
///
/// The composite is the canvas signature, user agent, language, screen
/// width and screen height concatenated in that order.
pub fn generate_device_id(signals: &EnvironmentSignals) -> String {
    let dimension = |value: Option<u32>| value.map_or_else(|| UNKNOWN.to_string(), |v| v.to_string());
    let composite = format!(
        "{}{}{}{}{}",
        signals.canvas_signature.as_deref().unwrap_or(UNKNOWN),
        signals.user_agent.as_deref().unwrap_or(UNKNOWN),
        signals.language.as_deref().unwrap_or(UNKNOWN),
        dimension(signals.screen_width),
        dimension(signals.screen_height),
    );
    let mut id = fingerprint_hex(&composite);
    id.truncate(DEVICE_ID_LEN);
    id
}

/// Build the device record from environment readings.
///
/// `ip_address` is left empty; it is resolved separately and filled in later.
pub fn generate_device_info(signals: &EnvironmentSignals, now: DateTime<Local>) -> DeviceInfo {
    let known = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(UNKNOWN)
            .to_string()
    };

    let user_agent = known(&signals.user_agent);
    let screen_resolution = match (signals.screen_width, signals.screen_height) {
        (Some(w), Some(h)) => format!("{w}x{h}"),
        _ => UNKNOWN.to_string(),
    };

    let info = DeviceInfo {
        device_id: generate_device_id(signals),
        device_type: classify_device_type(&user_agent).to_string(),
        user_agent,
        platform: known(&signals.platform),
        language: known(&signals.language),
        timezone: known(&signals.timezone),
        screen_resolution,
        ip_address: None,
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
    };
    debug!(device_id = %info.device_id, device_type = %info.device_type, "device info generated");
    info
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn signals() -> EnvironmentSignals {
        EnvironmentSignals {
            canvas_signature: Some("canvas:abc".into()),
            user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)".into()),
            platform: Some("linux x86_64".into()),
            language: Some("en-US".into()),
            timezone: Some("Europe/Berlin".into()),
            screen_width: Some(1920),
            screen_height: Some(1080),
        }
    }

    #[test]
    fn device_id_is_deterministic_and_twelve_chars() {
        let first = generate_device_id(&signals());
        let second = generate_device_id(&signals());
        assert_eq!(first, second);
        assert_eq!(first.len(), DEVICE_ID_LEN);

        let empty = generate_device_id(&EnvironmentSignals::default());
        assert_eq!(empty.len(), DEVICE_ID_LEN);
    }

    #[test]
    fn device_id_changes_with_signals() {
        let mut other = signals();
        other.screen_width = Some(1280);
        assert_ne!(generate_device_id(&signals()), generate_device_id(&other));
    }

    #[test]
    fn classification_is_first_match_wins() {
        let cases = [
            ("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)", "iPhone"),
            ("Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X)", "iPad"),
            ("Mozilla/5.0 (Linux; Android 14; Pixel 8)", "Android Device"),
            ("Mozilla/5.0 (Windows Phone 10.0; Android 6.0.1)", "Android Device"),
            ("Mozilla/5.0 (compatible; MSIE 10.0; Windows Phone 8.0)", "Windows Phone"),
            ("Mozilla/5.0 (Windows NT 10.0; Win64; x64)", "Windows PC"),
            ("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)", "Mac"),
            ("Mozilla/5.0 (X11; Linux x86_64)", "Linux PC"),
            ("curl/8.0", "Unknown Device"),
        ];
        for (ua, expected) in cases {
            assert_eq!(classify_device_type(ua), expected, "{ua}");
        }
    }

    #[test]
    fn missing_signals_become_unknown() {
        let now = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let info = generate_device_info(&EnvironmentSignals::default(), now);
        assert_eq!(info.user_agent, UNKNOWN);
        assert_eq!(info.device_type, "Unknown Device");
        assert_eq!(info.platform, UNKNOWN);
        assert_eq!(info.screen_resolution, UNKNOWN);
        assert_eq!(info.ip_address, None);
        assert_eq!(info.timestamp, "2026-03-04 05:06:07");
    }

    #[test]
    fn full_record_from_signals() {
        let now = Local.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let info = generate_device_info(&signals(), now);
        assert_eq!(info.device_type, "Linux PC");
        assert_eq!(info.screen_resolution, "1920x1080");
        assert_eq!(info.timezone, "Europe/Berlin");
        assert_eq!(info.device_id, generate_device_id(&signals()));
    }
}
