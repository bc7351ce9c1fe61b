//! Shared configuration for crudboard front-ends.
//!
//! TOML profiles layered with `CRUDBOARD_*` environment variables, and
//! translation to `crudboard_core::ClientConfig`. The CLI adds flag-aware
//! overrides on top.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crudboard_core::{ClientConfig, DEFAULT_BASE_URL};

/// Profile used when neither a flag nor the config names one.
pub const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Service root (e.g., "https://jsonplaceholder.typicode.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Override the default request timeout (seconds).
    pub timeout: Option<u64>,

    /// Rows per page in the users list.
    pub users_page_size: Option<usize>,

    /// Rows per page in the posts list.
    pub posts_page_size: Option<usize>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: None,
            users_page_size: None,
            posts_page_size: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "crudboard", "crudboard").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("crudboard");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Environment keys nest on a double underscore, e.g.
/// `CRUDBOARD_PROFILES__LOCAL__BASE_URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CRUDBOARD_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

impl Config {
    /// Name of the profile to use: the explicit one, else the configured
    /// default, else `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.into())
    }

    /// Comma-separated profile names, for messages.
    pub fn available_profiles(&self) -> String {
        if self.profiles.is_empty() {
            "(none)".into()
        } else {
            self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
        }
    }

    /// The profile called `name`. A missing `"default"` profile resolves to
    /// built-in defaults; any other missing name is an error.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == DEFAULT_PROFILE => Ok(Profile::default()),
            None => Err(ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.available_profiles(),
            }),
        }
    }
}

/// Build a `ClientConfig` from a profile, falling back to `defaults` for
/// anything the profile leaves unset.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    url::Url::parse(&profile.base_url).map_err(|e| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("{e}: {}", profile.base_url),
    })?;

    let fallback = ClientConfig::default();
    Ok(ClientConfig {
        base_url: profile.base_url.clone(),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        users_page_size: page_size("users_page_size", profile.users_page_size)?
            .unwrap_or(fallback.users_page_size),
        posts_page_size: page_size("posts_page_size", profile.posts_page_size)?
            .unwrap_or(fallback.posts_page_size),
    })
}

fn page_size(field: &str, raw: Option<usize>) -> Result<Option<NonZeroUsize>, ConfigError> {
    raw.map(|n| {
        NonZeroUsize::new(n).ok_or_else(|| ConfigError::Validation {
            field: field.into(),
            reason: "must be at least 1".into(),
        })
    })
    .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.active_profile_name(None), DEFAULT_PROFILE);
        assert_eq!(cfg.profile(DEFAULT_PROFILE).unwrap(), Profile::default());
    }

    #[test]
    fn reads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "local"

[defaults]
timeout = 5

[profiles.local]
base_url = "http://localhost:3000"
posts_page_size = 20
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        let name = cfg.active_profile_name(None);
        assert_eq!(name, "local");

        let client = profile_to_client_config(&cfg.profile(&name).unwrap(), &cfg.defaults).unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.posts_page_size.get(), 20);
        assert_eq!(client.users_page_size.get(), 6);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                base_url: "https://staging.example.com/api".into(),
                timeout: Some(10),
                ..Profile::default()
            },
        );

        save_config_to(&path, &cfg).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles, cfg.profiles);
    }

    #[test]
    fn unknown_profile_lists_available() {
        let mut cfg = Config::default();
        cfg.profiles.insert("a".into(), Profile::default());
        match cfg.profile("b").unwrap_err() {
            ConfigError::ProfileNotFound { name, available } => {
                assert_eq!(name, "b");
                assert_eq!(available, "a");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_values() {
        let defaults = Defaults::default();
        let bad_url = Profile {
            base_url: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_client_config(&bad_url, &defaults),
            Err(ConfigError::Validation { ref field, .. }) if field == "base_url"
        ));

        let zero_page = Profile {
            users_page_size: Some(0),
            ..Profile::default()
        };
        assert!(profile_to_client_config(&zero_page, &defaults).is_err());
    }
}
