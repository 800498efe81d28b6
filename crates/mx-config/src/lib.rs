//! Configuration management for mx.
//!
//! Parses `mx.toml` with serde and provides auto-discovery of config files
//! in parent directories. CLI settings can be applied during load via
//! [`CliSettings`].
//!
//! ## Environment variable expansion
//!
//! `source.git_ref` supports environment variable expansion so builds can
//! pin canonical sample URLs to the commit being built:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! ```toml
//! [docs]
//! partials_dir = "content/partials"
//! examples_dir = "examples"
//!
//! [source]
//! org = "acme"
//! repo = "acme-docs"
//! git_ref = "${GIT_COMMIT_SHA:-main}"
//! allowed_orgs = ["acme", "acme-community"]
//! platform = true
//!
//! [flags]
//! newSdk = true
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mx.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override partials directory.
    pub partials_dir: Option<PathBuf>,
    /// Override examples directory.
    pub examples_dir: Option<PathBuf>,
    /// Override git ref for canonical internal sample URLs.
    pub git_ref: Option<String>,
    /// Override platform flag (external samples enabled).
    pub platform: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Documentation content paths.
    pub docs: DocsConfig,
    /// Canonical-source settings for `$CodeSample`.
    pub source: SourceConfig,
    /// Feature flags consumed by `$Show`.
    pub flags: HashMap<String, bool>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Documentation content paths.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// Directory holding `$Partial` documents.
    pub partials_dir: PathBuf,
    /// Directory holding internal `$CodeSample` files.
    pub examples_dir: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            partials_dir: PathBuf::from("content/partials"),
            examples_dir: PathBuf::from("examples"),
        }
    }
}

/// Canonical-source settings for `$CodeSample`.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// GitHub organization of this documentation repository.
    pub org: String,
    /// Repository name, used in canonical URLs for internal samples.
    pub repo: String,
    /// Git ref internal sample URLs point at. Supports `${VAR}` expansion.
    pub git_ref: String,
    /// GitHub organizations external samples may be fetched from.
    pub allowed_orgs: Vec<String>,
    /// Whether external fetches are enabled. When false, external samples
    /// render as `CodeSampleDummy` placeholders.
    pub platform: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            org: String::new(),
            repo: String::new(),
            git_ref: "main".to_owned(),
            allowed_orgs: Vec::new(),
            platform: true,
        }
    }
}

/// Configuration load error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`source.git_ref`").
        field: String,
        /// Error message.
        message: String,
    },
}

impl Config {
    /// Load configuration with optional explicit path and CLI settings.
    ///
    /// When `config_path` is `None`, searches for `mx.toml` upward from the
    /// working directory, falling back to defaults when none is found.
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.source.git_ref = expand_env(&config.source.git_ref, "source.git_ref")?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfig {
                partials_dir: base.join("content/partials"),
                examples_dir: base.join("examples"),
            },
            source: SourceConfig::default(),
            flags: HashMap::new(),
            config_path: None,
        }
    }

    /// Make relative content paths absolute against the config file's directory.
    fn resolve_paths(&mut self, base: &Path) {
        if self.docs.partials_dir.is_relative() {
            self.docs.partials_dir = base.join(&self.docs.partials_dir);
        }
        if self.docs.examples_dir.is_relative() {
            self.docs.examples_dir = base.join(&self.docs.examples_dir);
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(partials_dir) = &settings.partials_dir {
            self.docs.partials_dir.clone_from(partials_dir);
        }
        if let Some(examples_dir) = &settings.examples_dir {
            self.docs.examples_dir.clone_from(examples_dir);
        }
        if let Some(git_ref) = &settings.git_ref {
            self.source.git_ref.clone_from(git_ref);
        }
        if let Some(platform) = settings.platform {
            self.source.platform = platform;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` when external sampling is enabled
    /// without an allow-list, or the internal source coordinates are
    /// half-configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.org.is_empty() != self.source.repo.is_empty() {
            return Err(ConfigError::Validation(
                "source.org and source.repo must be set together".into(),
            ));
        }
        if self.source.git_ref.is_empty() {
            return Err(ConfigError::Validation(
                "source.git_ref cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Expand `${VAR}` and `${VAR:-default}` in a config value.
fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mx.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_full_config() {
        let (dir, path) = write_config(
            r#"
[docs]
partials_dir = "content/partials"
examples_dir = "code"

[source]
org = "acme"
repo = "acme-docs"
git_ref = "v2"
allowed_orgs = ["acme"]
platform = false

[flags]
newSdk = true
oldSdk = false
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.docs.examples_dir, dir.path().join("code"));
        assert_eq!(config.source.git_ref, "v2");
        assert!(!config.source.platform);
        assert_eq!(config.flags.get("newSdk"), Some(&true));
        assert_eq!(config.flags.get("oldSdk"), Some(&false));
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let (_dir, path) = write_config("[docs]\n");
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.source.git_ref, "main");
        assert!(config.source.platform);
        assert!(config.flags.is_empty());
    }

    #[test]
    fn test_env_expansion_with_default() {
        let (_dir, path) = write_config("[source]\ngit_ref = \"${MX_TEST_UNSET_VAR:-fallback}\"\n");
        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.source.git_ref, "fallback");
    }

    #[test]
    fn test_env_expansion_missing_var_errors() {
        let (_dir, path) = write_config("[source]\ngit_ref = \"${MX_TEST_UNSET_VAR}\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }

    #[test]
    fn test_cli_settings_override() {
        let (_dir, path) = write_config("[source]\ngit_ref = \"main\"\n");
        let settings = CliSettings {
            git_ref: Some("abc123".to_owned()),
            platform: Some(false),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.source.git_ref, "abc123");
        assert!(!config.source.platform);
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let err = Config::load(Some(Path::new("/nonexistent/mx.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_half_configured_source_rejected() {
        let (_dir, path) = write_config("[source]\norg = \"acme\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let (_dir, path) = write_config("[docs]\npartial_dir = \"typo\"\n");
        assert!(matches!(
            Config::load(Some(&path), None).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
