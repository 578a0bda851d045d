/// `load_config` module: merges the optional YAML settings file and the
/// environment secrets into a [`PublishConfig`].
///
/// This is the only place where user-supplied YAML is parsed and where the
/// CLI reads `GITHUB_TOKEN`, `GITHUB_OWNER` and `GITHUB_REPO`.
///
/// # Responsibilities
/// - Parse the settings file (no secrets in it) into typed sections
/// - Read the three required environment variables and fail before any
///   network or subprocess activity when one is missing
/// - Overlay settings onto the defaults from [`PublishConfig::new`]
///
/// # Errors
/// All errors use `anyhow::Error` with context and are surfaced at the CLI boundary.
/// A missing variable keeps its [`ConfigError`] so the CLI can print the
/// per-variable status.
use anyhow::{bail, Context, Result};
use gh_publish_core::config::{ConfigError, Credentials, PublishConfig};
use gh_publish_core::ignore::DEFAULT_IGNORE_PATTERNS;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub branch: Option<String>,
    pub api_url: Option<String>,
    pub git_host: Option<String>,
    pub commit: CommitSection,
    pub committer: CommitterSection,
    pub repository: RepositorySection,
    pub ignore: IgnoreSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitSection {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommitterSection {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositorySection {
    pub description: Option<String>,
    pub private: Option<bool>,
    pub auto_init: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IgnoreSection {
    /// Replaces the built-in list.
    pub patterns: Option<Vec<String>>,
    /// Appended to whichever list is active.
    pub extra_patterns: Vec<String>,
}

impl IgnoreSection {
    pub fn resolve(&self) -> Vec<String> {
        let mut patterns: Vec<String> = match &self.patterns {
            Some(list) => list.clone(),
            None => DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        };
        patterns.extend(self.extra_patterns.iter().cloned());
        patterns
    }
}

/// Reads the settings file, or returns defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        info!("No settings file given, using defaults");
        return Ok(Settings::default());
    };
    info!(config_path = ?path, "Loading settings from file");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read settings file");
            return Err(anyhow::anyhow!(
                "Failed to read settings file {:?}: {}",
                path,
                e
            ));
        }
    };

    // An empty file is valid and means "all defaults".
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    match serde_yaml::from_str::<Settings>(&content) {
        Ok(settings) => {
            info!(config_path = ?path, "Parsed settings YAML successfully");
            Ok(settings)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse settings YAML");
            Err(anyhow::anyhow!("Failed to parse settings YAML: {e}"))
        }
    }
}

fn non_empty(field: &str, value: Option<String>) -> Result<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => bail!("settings field `{field}` must not be empty"),
        other => Ok(other),
    }
}

/// Overlays `settings` onto `config`.
pub fn apply_settings(config: &mut PublishConfig, settings: Settings) -> Result<()> {
    if let Some(branch) = non_empty("branch", settings.branch)? {
        config.branch = branch;
    }
    if let Some(api_url) = non_empty("api_url", settings.api_url)? {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    if let Some(host) = non_empty("git_host", settings.git_host)? {
        config.git_host = host;
    }
    if let Some(title) = non_empty("commit.title", settings.commit.title)? {
        config.commit.title = title;
    }
    if let Some(body) = settings.commit.body {
        config.commit.body = body;
    }
    if let Some(name) = non_empty("committer.name", settings.committer.name)? {
        config.committer.name = name;
    }
    if let Some(email) = non_empty("committer.email", settings.committer.email)? {
        config.committer.email = email;
    }
    if let Some(description) = settings.repository.description {
        config.repository.description = description;
    }
    if let Some(private) = settings.repository.private {
        config.repository.private = private;
    }
    if let Some(auto_init) = settings.repository.auto_init {
        config.repository.auto_init = auto_init;
    }
    config.ignore_patterns = settings.ignore.resolve();
    Ok(())
}

/// Like [`load_config`] but reads variables through `lookup` instead of the process environment.
pub fn load_config_with<F>(settings_path: Option<&Path>, root: &Path, lookup: F) -> Result<PublishConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = load_settings(settings_path)?;
    let credentials = Credentials::from_lookup(lookup)?;

    if !root.is_dir() {
        error!(root = %root.display(), "Project root is not a directory");
        bail!("project root {} is not a directory", root.display());
    }

    let mut config = PublishConfig::new(credentials, root);
    apply_settings(&mut config, settings).context("invalid settings")?;
    config.trace_loaded();
    Ok(config)
}

/// Loads settings from `settings_path` (if any) and credentials from the environment.
pub fn load_config(settings_path: Option<&Path>, root: &Path) -> Result<PublishConfig> {
    load_config_with(settings_path, root, |name| std::env::var(name).ok())
}

/// The missing-variable error inside `err`, if that is what it is.
pub fn missing_env(err: &anyhow::Error) -> Option<&ConfigError> {
    err.downcast_ref::<ConfigError>()
}
