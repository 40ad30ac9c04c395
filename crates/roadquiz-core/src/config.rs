//! Configuration loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::{QuizEngineConfig, DEFAULT_REVEAL_DELAY, DEFAULT_TIME_LIMIT_SECS};

/// Name of the config file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "roadquiz.toml";

/// Top-level roadquiz configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadquizConfig {
    /// Countdown budget per quiz attempt.
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u64,
    /// Delay before an answer is revealed and locked.
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_ms: u64,
    /// Finish as soon as the last question is answered.
    #[serde(default)]
    pub auto_finish: bool,
    /// Bank used by `run` when `--bank` is not given.
    #[serde(default)]
    pub default_bank: Option<PathBuf>,
    /// Where the profile store lives.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Output directory for saved result reports.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

fn default_time_limit() -> u64 {
    DEFAULT_TIME_LIMIT_SECS
}
fn default_reveal_delay() -> u64 {
    DEFAULT_REVEAL_DELAY.as_millis() as u64
}
fn default_data_dir() -> PathBuf {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".local").join("share").join("roadquiz"))
        .unwrap_or_else(|| PathBuf::from(".roadquiz"))
}
fn default_results_dir() -> PathBuf {
    PathBuf::from("./roadquiz-results")
}

impl Default for RoadquizConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit(),
            reveal_delay_ms: default_reveal_delay(),
            auto_finish: false,
            default_bank: None,
            data_dir: default_data_dir(),
            results_dir: default_results_dir(),
        }
    }
}

impl RoadquizConfig {
    /// Engine settings derived from this config.
    pub fn engine_config(&self) -> QuizEngineConfig {
        QuizEngineConfig {
            time_limit_secs: self.time_limit_secs,
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
            auto_finish: self.auto_finish,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables expand to an empty string. Substituted values are
/// inserted verbatim and not scanned again.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `roadquiz.toml` in the current directory
/// 2. `~/.config/roadquiz/config.toml`
///
/// Environment variable overrides: `ROADQUIZ_DATA_DIR`, `ROADQUIZ_TIME_LIMIT`.
pub fn load_config() -> Result<RoadquizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<RoadquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            Some(local)
        } else {
            config_dir()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<RoadquizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RoadquizConfig::default(),
    };

    // Apply env var overrides
    if let Ok(dir) = std::env::var("ROADQUIZ_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(limit) = std::env::var("ROADQUIZ_TIME_LIMIT") {
        config.time_limit_secs = limit
            .trim()
            .parse()
            .with_context(|| format!("invalid ROADQUIZ_TIME_LIMIT: '{limit}'"))?;
    }

    config.data_dir = resolve_path(&config.data_dir);
    config.results_dir = resolve_path(&config.results_dir);
    config.default_bank = config.default_bank.as_deref().map(resolve_path);

    Ok(config)
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("roadquiz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_ROADQUIZ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_ROADQUIZ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_ROADQUIZ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_ROADQUIZ_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_substituted_values() {
        std::env::set_var("_ROADQUIZ_SELF_REF", "${_ROADQUIZ_SELF_REF}");
        assert_eq!(
            resolve_env_vars("/data/${_ROADQUIZ_SELF_REF}/x"),
            "/data/${_ROADQUIZ_SELF_REF}/x"
        );
        std::env::remove_var("_ROADQUIZ_SELF_REF");

        assert_eq!(resolve_env_vars("${_ROADQUIZ_UNSET_VAR}/a"), "/a");
    }

    #[test]
    fn default_config() {
        let config = RoadquizConfig::default();
        assert_eq!(config.time_limit_secs, 1200);
        assert_eq!(config.reveal_delay_ms, 500);
        assert!(!config.auto_finish);

        let engine = config.engine_config();
        assert_eq!(engine, QuizEngineConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
time_limit_secs = 600
auto_finish = true
default_bank = "banks/speed.toml"
"#;
        let config: RoadquizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.time_limit_secs, 600);
        assert_eq!(config.reveal_delay_ms, 500);
        assert!(config.auto_finish);
        assert_eq!(config.default_bank, Some(PathBuf::from("banks/speed.toml")));
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "reveal_delay_ms = 250\nresults_dir = \"out\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.reveal_delay_ms, 250);
        assert_eq!(config.results_dir, PathBuf::from("out"));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/roadquiz.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
