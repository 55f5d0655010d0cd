//! TOML-based deployment configuration.
//!
//! Holds the values an operator sets before a game:
//! - Default countdown duration and refresh cadence
//! - Base hint allowance and the free (non-consuming) codes
//! - The shared admin secret and the bonus/reset policy switches
//! - How hints are presented
//!
//! Configuration is stored at `<data_dir>/config.toml` and read once at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::admin::AdminPolicy;
use crate::error::{ConfigError, CoreError};
use crate::hints::HintCode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintsConfig {
    #[serde(default = "default_base_max_uses")]
    pub base_max_uses: u32,
    #[serde(default = "default_free_codes")]
    pub free_codes: Vec<String>,
}

/// Admin secret and policy.
///
/// The secret is stored and compared in plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_secret")]
    pub secret: String,
    #[serde(default = "default_true")]
    pub bonus_on_login: bool,
    #[serde(default = "default_true")]
    pub repeatable_bonus: bool,
    #[serde(default)]
    pub allow_use_reset: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    /// Print to the operator's terminal.
    Terminal,
    /// Write a standalone HTML page and open it.
    Document,
    /// Print a link that re-derives the hint from its code.
    Link,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default = "default_mode")]
    pub mode: PresentationMode,
    #[serde(default = "default_true")]
    pub open_browser: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub hints: HintsConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

// Default functions
fn default_duration_secs() -> u64 {
    60 * 60
}
fn default_tick_interval_ms() -> u64 {
    250
}
fn default_base_max_uses() -> u32 {
    3
}
fn default_free_codes() -> Vec<String> {
    vec!["E-00".into()]
}
fn default_secret() -> String {
    "GAMEMASTER".into()
}
fn default_true() -> bool {
    true
}
fn default_mode() -> PresentationMode {
    PresentationMode::Terminal
}
fn default_base_url() -> String {
    "http://localhost/hint".into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: default_duration_secs(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for HintsConfig {
    fn default() -> Self {
        Self {
            base_max_uses: default_base_max_uses(),
            free_codes: default_free_codes(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            bonus_on_login: true,
            repeatable_bonus: true,
            allow_use_reset: false,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            open_browser: true,
            base_url: default_base_url(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Array(_) => serde_json::Value::Array(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| serde_json::Value::String(s.to_string()))
                            .collect(),
                    ),
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::info!(path = %path.display(), "wrote default configuration");
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving. List values are
    /// comma-separated.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Normalized free codes; blank entries are dropped.
    pub fn free_codes(&self) -> Vec<HintCode> {
        self.hints
            .free_codes
            .iter()
            .filter_map(|c| HintCode::parse(c))
            .collect()
    }

    pub fn admin_policy(&self) -> AdminPolicy {
        AdminPolicy {
            bonus_on_login: self.admin.bonus_on_login,
            repeatable_bonus: self.admin.repeatable_bonus,
            allow_use_reset: self.admin.allow_use_reset,
        }
    }

    /// Refresh cadence, never faster than 10 ms.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timer.tick_interval_ms.max(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.hints.base_max_uses, 3);
        assert_eq!(parsed.presentation.mode, PresentationMode::Terminal);
        assert_eq!(parsed.timer.default_duration_secs, 3600);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[admin]\nsecret = \"owl\"\n").unwrap();
        assert_eq!(parsed.admin.secret, "owl");
        assert!(parsed.admin.bonus_on_login);
        assert_eq!(parsed.timer.tick_interval_ms, 250);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("admin.allow_use_reset").as_deref(), Some("false"));
        assert_eq!(cfg.get("hints.base_max_uses").as_deref(), Some("3"));
        assert_eq!(cfg.get("hints.free_codes").as_deref(), Some("E-00"));
        assert_eq!(cfg.get("presentation.mode").as_deref(), Some("terminal"));
        assert!(cfg.get("admin.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("hints.base_max_uses", "5").unwrap();
        cfg.set("admin.allow_use_reset", "true").unwrap();
        cfg.set("hints.free_codes", "e-00, e-10").unwrap();
        cfg.set("presentation.mode", "link").unwrap();
        assert_eq!(cfg.hints.base_max_uses, 5);
        assert!(cfg.admin_policy().allow_use_reset);
        assert_eq!(
            cfg.free_codes(),
            vec![HintCode::parse("E-00").unwrap(), HintCode::parse("E-10").unwrap()]
        );
        assert_eq!(cfg.presentation.mode, PresentationMode::Link);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("admin.nonexistent_key", "x").is_err());
        assert!(cfg.set("admin", "x").is_err());
        assert!(cfg.set("admin.bonus_on_login", "not_a_bool").is_err());
        assert!(cfg.set("hints.base_max_uses", "-1").is_err());
        assert!(cfg.set("presentation.mode", "hologram").is_err());
        assert_eq!(cfg.presentation.mode, PresentationMode::Terminal);
    }

    #[test]
    fn load_from_writes_defaults_on_first_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.admin.secret, "GAMEMASTER");
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_malformed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[hints\nbase_max_uses = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
