use gh_publish::load_config::{load_config, load_config_with, missing_env};
use serial_test::serial;
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

const ALL: [(&str, &str); 3] = [
    ("GITHUB_TOKEN", "ghp_x"),
    ("GITHUB_OWNER", "octocat"),
    ("GITHUB_REPO", "hello"),
];

#[test]
fn defaults_apply_without_settings_file() {
    let dir = tempdir().unwrap();
    let config = load_config_with(None, dir.path(), lookup(&ALL)).unwrap();
    assert_eq!(config.branch, "main");
    assert_eq!(config.api_url, "https://api.github.com");
    assert_eq!(config.credentials.full_name(), "octocat/hello");
    assert!(config.ignore_patterns.iter().any(|p| p == "node_modules/"));
}

#[test]
fn settings_file_overrides_defaults() {
    let dir = tempdir().unwrap();
    let settings = dir.path().join("publish.yaml");
    fs::write(
        &settings,
        r#"
branch: trunk
api_url: https://ghe.example.com/api/v3/
commit:
  title: "Release snapshot"
  body: |
    Line one
    Line two
committer:
  name: Release Bot
  email: bot@example.com
repository:
  description: Demo
  private: true
ignore:
  patterns: ["*.tmp"]
  extra_patterns: ["out/"]
"#,
    )
    .unwrap();

    let config = load_config_with(Some(settings.as_path()), dir.path(), lookup(&ALL)).unwrap();
    assert_eq!(config.branch, "trunk");
    assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    assert_eq!(config.commit.title, "Release snapshot");
    assert_eq!(config.commit.body, "Line one\nLine two\n");
    assert_eq!(config.committer.name, "Release Bot");
    assert!(config.repository.private);
    assert!(config.repository.auto_init);
    assert_eq!(config.ignore_patterns, vec!["*.tmp", "out/"]);
}

#[test]
fn unknown_settings_key_is_an_error() {
    let dir = tempdir().unwrap();
    let settings = dir.path().join("publish.yaml");
    fs::write(&settings, "branh: main\n").unwrap();
    let err = load_config_with(Some(settings.as_path()), dir.path(), lookup(&ALL)).unwrap_err();
    assert!(err.to_string().contains("Failed to parse settings YAML"));
}

#[test]
fn empty_branch_is_rejected() {
    let dir = tempdir().unwrap();
    let settings = dir.path().join("publish.yaml");
    fs::write(&settings, "branch: \"\"\n").unwrap();
    let err = load_config_with(Some(settings.as_path()), dir.path(), lookup(&ALL)).unwrap_err();
    assert!(format!("{err:#}").contains("branch"));
}

#[test]
fn missing_variable_keeps_typed_error() {
    let dir = tempdir().unwrap();
    let err = load_config_with(
        None,
        dir.path(),
        lookup(&[("GITHUB_TOKEN", "t"), ("GITHUB_REPO", "r")]),
    )
    .unwrap_err();
    let missing = missing_env(&err).expect("should be a missing env error");
    assert!(missing.to_string().contains("GITHUB_OWNER"));
}

#[test]
fn missing_settings_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = load_config_with(Some(dir.path().join("nope.yaml").as_path()), dir.path(), lookup(&ALL))
        .unwrap_err();
    assert!(err.to_string().contains("Failed to read settings file"));
}

#[test]
fn root_must_be_a_directory() {
    let dir = tempdir().unwrap();
    let err = load_config_with(None, &dir.path().join("absent"), lookup(&ALL)).unwrap_err();
    assert!(err.to_string().contains("not a directory"));
}

#[test]
#[serial]
fn reads_credentials_from_process_environment() {
    let dir = tempdir().unwrap();
    std::env::set_var("GITHUB_TOKEN", "ghp_env");
    std::env::set_var("GITHUB_OWNER", "env-owner");
    std::env::set_var("GITHUB_REPO", "env-repo");

    let config = load_config(None, dir.path()).unwrap();
    assert_eq!(config.credentials.token.expose(), "ghp_env");
    assert_eq!(config.credentials.full_name(), "env-owner/env-repo");

    std::env::remove_var("GITHUB_TOKEN");
    let err = load_config(None, dir.path()).unwrap_err();
    assert!(missing_env(&err).is_some());

    std::env::remove_var("GITHUB_OWNER");
    std::env::remove_var("GITHUB_REPO");
}
