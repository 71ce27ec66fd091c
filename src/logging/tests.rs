// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_filter_strings() {
    let filters: Vec<String> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::to_filter_string)
        .collect();
    assert_eq!(
        filters,
        [
            "off",
            "error",
            "warn",
            "warn,ghdesk=info",
            "warn,ghdesk=debug",
            "warn,ghdesk=trace",
            "trace",
        ]
    );
}

#[test]
fn test_log_level_rejects_out_of_range() {
    assert!(LogLevel::new(7).is_err());
    assert!(LogLevel::from_u8(9).is_none());
    assert_eq!(LogLevel::try_from(4).map(u8::from).ok(), Some(4));
}

#[test]
fn test_log_level_deserialize() {
    let level: LogLevel = serde_json::from_str("5").expect("valid level");
    assert_eq!(level, LogLevel::TRACE);
    assert!(serde_json::from_str::<LogLevel>("12").is_err());
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert!(config.log_file().is_none());
    assert!(!config.show_target());
}
