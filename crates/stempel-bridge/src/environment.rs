// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop environment probe: build `EnvironmentSignals` from process
// environment variables and compile-time target information.

use std::env;
use std::path::Path;

use stempel_core::types::EnvironmentSignals;
use tracing::debug;

/// Locale variables in POSIX precedence order.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Turn a POSIX locale (`en_GB.UTF-8`, `de_DE@euro`) into a BCP 47 tag
/// (`en-GB`, `de-DE`). The `C` and `POSIX` locales carry no language.
pub fn language_tag(locale: &str) -> Option<String> {
    let base = locale.split(['.', '@']).next()?.trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

/// Zone name from the target of an `/etc/localtime` symlink, e.g.
/// `/usr/share/zoneinfo/Europe/Berlin` -> `Europe/Berlin`.
pub fn zone_from_localtime(target: &Path) -> Option<String> {
    let text = target.to_str()?;
    let (_, zone) = text.split_once("zoneinfo/")?;
    (!zone.is_empty()).then(|| zone.to_string())
}

/// A user-agent style string whose platform tokens classify the same way a
/// browser on this operating system would.
pub fn user_agent_for(os: &str, arch: &str) -> String {
    let platform = match os {
        "linux" => format!("X11; Linux {arch}"),
        "windows" => format!("Windows NT 10.0; {arch}"),
        "macos" => "Macintosh; Intel Mac OS X".to_string(),
        "android" => format!("Linux; Android; {arch}"),
        "ios" => "iPhone; CPU iPhone OS like Mac OS X".to_string(),
        other => format!("{other}; {arch}"),
    };
    format!("Stempel/{} ({platform})", env!("CARGO_PKG_VERSION"))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn probe_language() -> Option<String> {
    LOCALE_VARS
        .iter()
        .find_map(|name| non_empty_var(name))
        .and_then(|locale| language_tag(&locale))
}

fn probe_timezone() -> Option<String> {
    non_empty_var("TZ")
        .map(|tz| tz.trim_start_matches(':').to_string())
        .or_else(|| {
            std::fs::read_link("/etc/localtime")
                .ok()
                .and_then(|target| zone_from_localtime(&target))
        })
}

/// Stands in for a canvas rendering fingerprint: values that differ between
/// machines but are stable across runs on one.
fn probe_render_signature() -> String {
    let host = non_empty_var("HOSTNAME")
        .or_else(|| non_empty_var("COMPUTERNAME"))
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok().map(|h| h.trim().to_string()))
        .unwrap_or_default();
    format!(
        "{}/{}/{}/{}",
        env::consts::FAMILY,
        env::consts::OS,
        env::consts::ARCH,
        host
    )
}

/// Read everything available from the current process environment.
pub fn probe() -> EnvironmentSignals {
    let signals = EnvironmentSignals {
        canvas_signature: Some(probe_render_signature()),
        user_agent: Some(user_agent_for(env::consts::OS, env::consts::ARCH)),
        platform: Some(format!("{} {}", env::consts::OS, env::consts::ARCH)),
        language: probe_language(),
        timezone: probe_timezone(),
        // The process cannot see the display; the app window fills these in.
        screen_width: None,
        screen_height: None,
    };
    debug!(
        language = ?signals.language,
        timezone = ?signals.timezone,
        "Environment probed"
    );
    signals
}
