// ghdesk: GitHub repository desk
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::types::{GitTimeouts, SourceKind, WorkspaceConfig};
use super::{Config, ConfigLoader};
use crate::logging::LogLevel;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.github.source, SourceKind::Rest);
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.github.per_page, 100);
    assert_eq!(config.github.cli_program, "gh");
    assert_eq!(config.github.cli_limit, 200);
    assert_eq!(config.git.program, "git");
    assert_eq!(config.global.output_log_level, LogLevel::INFO);
    assert!(config.github.token().is_none());
}

#[test]
fn test_default_base_dir_under_home() {
    let config = Config::default();
    assert!(
        config
            .base_dir()
            .ends_with(WorkspaceConfig::DEFAULT_DIR_NAME)
    );
}

#[test]
fn test_source_kind_parse() {
    let parsed: Vec<_> = ["rest", "CLI", "gh", "api"]
        .into_iter()
        .map(|s| s.parse::<SourceKind>().ok())
        .collect();
    assert_eq!(
        parsed,
        [
            Some(SourceKind::Rest),
            Some(SourceKind::Cli),
            Some(SourceKind::Cli),
            Some(SourceKind::Rest)
        ]
    );
    let err = "svn".parse::<SourceKind>().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'source' in section '[github]': expected 'rest' or 'cli', got 'svn'");
}

#[test]
fn test_timeouts_zero_is_unlimited() {
    let t = GitTimeouts::default();
    assert_eq!(GitTimeouts::duration(t.clone), None);
    assert_eq!(
        GitTimeouts::duration(t.status),
        Some(Duration::from_secs(20))
    );
    assert_eq!(GitTimeouts::duration(t.fetch), Some(Duration::from_secs(60)));
    assert_eq!(GitTimeouts::duration(t.pull), Some(Duration::from_secs(120)));
}

#[test]
fn test_parse_sections() {
    let config = Config::parse(
        r#"
[global]
output_log_level = 4

[github]
source = "cli"
cli_limit = 50
token = "abc"

[workspace]
base_dir = "/srv/clones"

[git.timeouts]
fetch = 5
"#,
    )
    .expect("config should parse");

    assert_eq!(config.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(config.github.source, SourceKind::Cli);
    assert_eq!(config.github.cli_limit, 50);
    assert_eq!(config.github.token(), Some("abc"));
    assert_eq!(config.base_dir(), PathBuf::from("/srv/clones"));
    assert_eq!(config.git.timeouts.fetch, 5);
    assert_eq!(config.git.timeouts.pull, 120);
}

#[test]
fn test_unknown_key_rejected() {
    assert!(Config::parse("[github]\nsource_kind = \"rest\"\n").is_err());
    assert!(Config::parse("[nonsense]\nx = 1\n").is_err());
}

#[test]
fn test_invalid_log_level_rejected() {
    assert!(Config::parse("[global]\noutput_log_level = 9\n").is_err());
}

#[test]
fn test_overrides_win_over_files() {
    let config = ConfigLoader::new()
        .add_toml_str("[github]\nsource = \"rest\"\n[workspace]\nbase_dir = \"/a\"\n")
        .set("github.source", "cli")
        .set("workspace.base_dir", "/b")
        .build()
        .expect("config should build");

    assert_eq!(config.github.source, SourceKind::Cli);
    assert_eq!(config.base_dir(), PathBuf::from("/b"));
}

#[test]
fn test_blank_token_is_none() {
    let config = Config::parse("[github]\ntoken = \"   \"\n").expect("config should parse");
    assert!(config.github.token().is_none());
}

#[test]
fn test_format_options_hides_token() {
    let config = Config::parse("[github]\ntoken = \"secret\"\n").expect("config should parse");
    let options = config.format_options();
    let token_line = options
        .iter()
        .find(|line| line.starts_with("github.token"))
        .expect("token line present");
    assert!(token_line.ends_with("= [hidden]"));
    assert!(!options.iter().any(|line| line.contains("secret")));
}

#[test]
fn test_loaded_files_tracking() {
    let loader = ConfigLoader::new()
        .add_toml_str("")
        .add_toml_file_optional("definitely-not-here.toml");
    insta::assert_snapshot!(loader.format_loaded_files().join("\n"), @"1. [string] <string>");
}
