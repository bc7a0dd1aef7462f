// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// Return the application data directory, creating it if needed.
///
/// Only the configuration file lives here; captured images and generated
/// documents are never written to disk unless the user saves them.
pub fn data_dir() -> PathBuf {
    let dir = dirs_fallback().join("stempel");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), error = %e, "could not create data directory");
    }
    dir
}

fn dirs_fallback() -> PathBuf {
    base_dir(std::env::var("XDG_DATA_HOME").ok(), std::env::var("HOME").ok())
}

fn base_dir(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    // XDG data dir, then ~/.local/share
    if let Some(xdg) = xdg_data_home.filter(|s| !s.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_data_home_takes_precedence() {
        let dir = base_dir(Some("/data".into()), Some("/home/ada".into()));
        assert_eq!(dir, PathBuf::from("/data"));
    }

    #[test]
    fn empty_xdg_data_home_falls_back_to_home() {
        let dir = base_dir(Some(String::new()), Some("/home/ada".into()));
        assert_eq!(dir, PathBuf::from("/home/ada/.local/share"));
    }

    #[test]
    fn without_home_uses_temp_dir() {
        assert_eq!(base_dir(None, None), std::env::temp_dir());
    }
}
