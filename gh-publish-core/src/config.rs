//! Explicit configuration for a publish run.
//!
//! Nothing in the core crate reads the process environment except
//! [`Credentials::from_env`]; everything else receives a [`PublishConfig`].
//! The CLI crate layers its settings file on top of [`PublishConfig::new`].

use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info};

use crate::ignore::DEFAULT_IGNORE_PATTERNS;

pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const OWNER_VAR: &str = "GITHUB_OWNER";
pub const REPO_VAR: &str = "GITHUB_REPO";

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GIT_HOST: &str = "github.com";

const REDACTED: &str = "***";

static URL_USERINFO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<scheme>https?://)[^/@\s]+@").expect("static regex is valid")
});

/// An access token. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Removes this secret, and any credentials embedded in `http(s)://user@` URLs,
    /// from `text` before it is logged or printed.
    pub fn redact(&self, text: &str) -> String {
        let masked = if self.0.is_empty() {
            text.to_string()
        } else {
            text.replace(&self.0, REDACTED)
        };
        URL_USERINFO
            .replace_all(&masked, format!("${{scheme}}{REDACTED}@"))
            .into_owned()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .missing.join(", "))]
    MissingEnv {
        missing: Vec<&'static str>,
        /// Set/missing status of every required variable, in declaration order.
        status: Vec<(&'static str, bool)>,
    },
}

/// The three values both publish paths need before touching the network.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: Secret,
    pub owner: String,
    pub repo: String,
}

impl Credentials {
    /// Reads the credentials through `lookup`. Values are trimmed; empty ones count as missing.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingEnv`] listing every variable that is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let token = read(TOKEN_VAR);
        let repo = read(REPO_VAR);
        let owner = read(OWNER_VAR);

        let status = vec![
            (TOKEN_VAR, token.is_some()),
            (REPO_VAR, repo.is_some()),
            (OWNER_VAR, owner.is_some()),
        ];

        match (token, owner, repo) {
            (Some(token), Some(owner), Some(repo)) => {
                info!(%owner, %repo, "[CONFIG] Credentials found");
                Ok(Self {
                    token: Secret::new(token),
                    owner,
                    repo,
                })
            }
            _ => {
                let missing: Vec<&'static str> = status
                    .iter()
                    .filter(|(_, set)| !set)
                    .map(|(name, _)| *name)
                    .collect();
                error!(?missing, "[CONFIG] Required environment variables missing");
                Err(ConfigError::MissingEnv { missing, status })
            }
        }
    }

    /// # Errors
    /// See [`Credentials::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone)]
pub struct CommitSettings {
    pub title: String,
    pub body: String,
}

impl Default for CommitSettings {
    fn default() -> Self {
        Self {
            title: "Project update".to_string(),
            body: "Automated publish of the local project directory.\n\n\
                   - All tracked and untracked files staged\n\
                   - Ignored paths follow the repository's .gitignore"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

impl Default for Committer {
    fn default() -> Self {
        Self {
            name: "gh-publish".to_string(),
            email: "gh-publish@users.noreply.github.com".to_string(),
        }
    }
}

/// Body of the repository creation request.
#[derive(Debug, Clone)]
pub struct RepositorySettings {
    pub description: String,
    pub private: bool,
    pub auto_init: bool,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            description: "Published with gh-publish".to_string(),
            private: false,
            auto_init: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub credentials: Credentials,
    pub project_root: PathBuf,
    pub branch: String,
    pub api_url: String,
    pub git_host: String,
    pub commit: CommitSettings,
    pub committer: Committer,
    pub repository: RepositorySettings,
    pub ignore_patterns: Vec<String>,
}

impl PublishConfig {
    pub fn new(credentials: Credentials, project_root: impl Into<PathBuf>) -> Self {
        Self {
            credentials,
            project_root: project_root.into(),
            branch: DEFAULT_BRANCH.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            git_host: DEFAULT_GIT_HOST.to_string(),
            commit: CommitSettings::default(),
            committer: Committer::default(),
            repository: RepositorySettings::default(),
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }

    /// Browser URL of the target repository.
    pub fn repository_url(&self) -> String {
        format!(
            "https://{}/{}/{}",
            self.git_host, self.credentials.owner, self.credentials.repo
        )
    }

    /// Push URL carrying the token as userinfo. Never log this unredacted.
    pub fn authenticated_remote_url(&self) -> String {
        format!(
            "https://{}@{}/{}/{}.git",
            self.credentials.token.expose(),
            self.git_host,
            self.credentials.owner,
            self.credentials.repo
        )
    }

    pub fn trace_loaded(&self) {
        info!(
            repository = %self.credentials.full_name(),
            root = %self.project_root.display(),
            branch = %self.branch,
            ignore_patterns = self.ignore_patterns.len(),
            "[CONFIG] Publish config loaded"
        );
        debug!(?self, "[CONFIG] Publish config (full debug)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn all_three_variables_present_yields_credentials() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (TOKEN_VAR, "ghp_abc"),
            (OWNER_VAR, "octocat"),
            (REPO_VAR, "hello"),
        ]))
        .unwrap();
        assert_eq!(creds.token.expose(), "ghp_abc");
        assert_eq!(creds.full_name(), "octocat/hello");
    }

    #[test]
    fn each_missing_variable_is_reported() {
        let all = [(TOKEN_VAR, "t"), (OWNER_VAR, "o"), (REPO_VAR, "r")];
        for skip in 0..all.len() {
            let present: Vec<(&str, &str)> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, kv)| *kv)
                .collect();
            let err = Credentials::from_lookup(lookup_from(&present)).unwrap_err();
            let ConfigError::MissingEnv { missing, status } = err;
            assert_eq!(missing, vec![all[skip].0]);
            assert_eq!(status.iter().filter(|(_, set)| *set).count(), 2);
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (TOKEN_VAR, "  "),
            (OWNER_VAR, "o"),
            (REPO_VAR, "r"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(TOKEN_VAR));
    }

    #[test]
    fn surrounding_whitespace_is_stripped() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (TOKEN_VAR, "ghp_abc \n"),
            (OWNER_VAR, " octocat"),
            (REPO_VAR, "hello\t"),
        ]))
        .unwrap();
        assert_eq!(creds.token.expose(), "ghp_abc");
        assert_eq!(creds.full_name(), "octocat/hello");
    }

    #[test]
    fn secret_never_shows_in_debug_output() {
        let creds = Credentials {
            token: Secret::new("ghp_supersecret"),
            owner: "o".into(),
            repo: "r".into(),
        };
        let printed = format!("{creds:?}");
        assert!(!printed.contains("ghp_supersecret"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn redact_masks_token_and_url_userinfo() {
        let secret = Secret::new("ghp_supersecret");
        let text = "fatal: could not read from https://ghp_supersecret@github.com/o/r.git \
                    and https://someone:pw@example.com/x";
        let redacted = secret.redact(text);
        assert!(!redacted.contains("ghp_supersecret"));
        assert!(!redacted.contains("someone:pw"));
        assert!(redacted.contains("https://***@github.com/o/r.git"));
    }

    #[test]
    fn remote_url_embeds_token_and_repository() {
        let config = PublishConfig::new(
            Credentials {
                token: Secret::new("tok"),
                owner: "octocat".into(),
                repo: "hello".into(),
            },
            ".",
        );
        assert_eq!(
            config.authenticated_remote_url(),
            "https://tok@github.com/octocat/hello.git"
        );
        assert_eq!(config.repository_url(), "https://github.com/octocat/hello");
        assert_eq!(config.branch, "main");
    }
}
