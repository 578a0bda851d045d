//! Path exclusion rules applied before anything is uploaded or listed.
//!
//! Three rule shapes are recognised, each matched against a relative,
//! `/`-separated path string:
//!
//! - `dir/` excludes any path containing `/dir/` or starting with `dir/`
//! - `*.ext` excludes any path ending in `.ext`
//! - anything else excludes any path that contains it as a substring
//!
//! The substring rule is deliberately loose: `.env` also excludes
//! `config/.env.example`.

/// Patterns applied when the settings file does not replace them.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "node_modules/",
    ".git/",
    ".env",
    "*.log",
    "dist/",
    "build/",
    ".DS_Store",
    "*.tar.gz",
    ".cache/",
    ".vscode/",
    ".idea/",
    "__pycache__/",
    "*.pyc",
    ".replit",
    "repl.nix",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnorePattern {
    /// `name/`, stored without the trailing slash.
    Directory(String),
    /// `*.ext`, stored as `.ext`.
    Suffix(String),
    Substring(String),
}

impl IgnorePattern {
    /// Returns `None` for empty patterns, which would otherwise match everything.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if let Some(dir) = raw.strip_suffix('/') {
            if dir.is_empty() {
                return None;
            }
            return Some(Self::Directory(dir.to_string()));
        }
        if let Some(suffix) = raw.strip_prefix('*') {
            if suffix.starts_with('.') {
                return Some(Self::Suffix(suffix.to_string()));
            }
        }
        Some(Self::Substring(raw.to_string()))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Directory(dir) => {
                path.contains(&format!("/{dir}/")) || path.starts_with(&format!("{dir}/"))
            }
            Self::Suffix(suffix) => path.ends_with(suffix.as_str()),
            Self::Substring(needle) => path.contains(needle.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    patterns: Vec<IgnorePattern>,
}

impl Default for IgnoreFilter {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_PATTERNS.iter().copied())
    }
}

impl IgnoreFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .filter_map(|p| IgnorePattern::parse(p.as_ref()))
                .collect(),
        }
    }

    pub fn patterns(&self) -> &[IgnorePattern] {
        &self.patterns
    }

    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// True when every path below `dir` would be ignored, so a walk can skip it.
    ///
    /// Suffix rules never qualify: `logs.log/` does not make `logs.log/a.txt` end in `.log`.
    pub fn excludes_directory(&self, dir: &str) -> bool {
        let with_slash = format!("{dir}/");
        self.patterns.iter().any(|p| match p {
            IgnorePattern::Directory(_) => p.matches(&with_slash),
            IgnorePattern::Substring(_) => p.matches(dir),
            IgnorePattern::Suffix(_) => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_pattern_shape() {
        assert_eq!(
            IgnorePattern::parse("node_modules/"),
            Some(IgnorePattern::Directory("node_modules".into()))
        );
        assert_eq!(
            IgnorePattern::parse("*.pyc"),
            Some(IgnorePattern::Suffix(".pyc".into()))
        );
        assert_eq!(
            IgnorePattern::parse(".env"),
            Some(IgnorePattern::Substring(".env".into()))
        );
        assert_eq!(IgnorePattern::parse(""), None);
        assert_eq!(IgnorePattern::parse("/"), None);
    }

    #[test]
    fn filters_the_documented_example() {
        let filter = IgnoreFilter::new(["node_modules/", "*.pyc"]);
        assert!(!filter.is_ignored("src/app.py"));
        assert!(filter.is_ignored("node_modules/pkg/index.js"));
        assert!(filter.is_ignored("out.pyc"));
    }

    #[test]
    fn directory_rule_matches_nested_and_leading_directories() {
        let filter = IgnoreFilter::new(["build/"]);
        assert!(filter.is_ignored("build/out.o"));
        assert!(filter.is_ignored("crates/a/build/out.o"));
        assert!(!filter.is_ignored("rebuild/out.o"));
        assert!(!filter.is_ignored("src/build.rs"));
    }

    #[test]
    fn substring_rule_is_broad() {
        let filter = IgnoreFilter::new([".env"]);
        assert!(filter.is_ignored(".env"));
        assert!(filter.is_ignored("config/.env.example"));
        assert!(filter.is_ignored("a.environment"));
        assert!(!filter.is_ignored("src/env.rs"));
    }

    #[test]
    fn multi_dot_suffix_rule() {
        let filter = IgnoreFilter::new(["*.tar.gz"]);
        assert!(filter.is_ignored("release/app.tar.gz"));
        assert!(!filter.is_ignored("release/app.gz"));
    }

    #[test]
    fn default_patterns_cover_common_noise() {
        let filter = IgnoreFilter::default();
        for path in [
            ".git/HEAD",
            "web/node_modules/react/index.js",
            "server.log",
            "pkg/__pycache__/mod.cpython-311.pyc",
            ".DS_Store",
            ".vscode/settings.json",
        ] {
            assert!(filter.is_ignored(path), "{path} should be ignored");
        }
        for path in ["README.md", "src/main.rs", "web/src/index.tsx", ".gitignore"] {
            assert!(!filter.is_ignored(path), "{path} should be kept");
        }
    }

    #[test]
    fn directory_exclusion_agrees_with_file_rules() {
        let filter = IgnoreFilter::new(["target/", ".cache", "*.log"]);
        assert!(filter.excludes_directory("target"));
        assert!(filter.excludes_directory("crates/x/target"));
        assert!(filter.excludes_directory("home/.cache"));
        assert!(!filter.excludes_directory("logs.log"));
        assert!(!filter.excludes_directory("src"));
    }
}
