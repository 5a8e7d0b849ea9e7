//! Tutor configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::locale::Locale;
use crate::model::{Difficulty, DEFAULT_DAILY_TARGET};
use crate::session::DEFAULT_COUNTDOWN_SECS;

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "timestable.toml";

/// Which speech backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechBackend {
    /// Run an external text-to-speech program.
    #[default]
    Command,
    /// Never speak.
    Silent,
}

/// Speech settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub backend: SpeechBackend,
    /// Program run by the command backend.
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments; `{voice}` and `{text}` are substituted per utterance.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_program() -> String {
    "espeak-ng".to_string()
}
fn default_args() -> Vec<String> {
    ["-v", "{voice}", "{text}"].map(String::from).to_vec()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: SpeechBackend::default(),
            program: default_program(),
            args: default_args(),
        }
    }
}

/// Top-level timestable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Directory holding the key-value store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Interface locale; when unset the stored preference is used.
    #[serde(default)]
    pub locale: Option<Locale>,
    #[serde(default)]
    pub default_difficulty: Difficulty,
    #[serde(default = "default_daily_target")]
    pub daily_target: u32,
    /// Seconds allowed per question.
    #[serde(default = "default_countdown")]
    pub countdown_secs: u32,
    /// Pause between an answer and the next question.
    #[serde(default = "default_advance_delay")]
    pub advance_delay_ms: u64,
    #[serde(default)]
    pub speech: SpeechConfig,
}

fn default_data_dir() -> PathBuf {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".local").join("share").join("timestable"))
        .unwrap_or_else(|| PathBuf::from("./timestable-data"))
}
fn default_daily_target() -> u32 {
    DEFAULT_DAILY_TARGET
}
fn default_countdown() -> u32 {
    DEFAULT_COUNTDOWN_SECS
}
fn default_advance_delay() -> u64 {
    3000
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            locale: None,
            default_difficulty: Difficulty::default(),
            daily_target: default_daily_target(),
            countdown_secs: default_countdown(),
            advance_delay_ms: default_advance_delay(),
            speech: SpeechConfig::default(),
        }
    }
}

impl TutorConfig {
    /// Render as TOML, e.g. for `timestable init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables expand to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("timestable"))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `path`, if given (must exist)
/// 2. `timestable.toml` in the current directory
/// 3. `~/.config/timestable/config.toml`
///
/// Environment overrides: `TIMESTABLE_DATA_DIR`, `TIMESTABLE_LOCALE`.
pub fn load_config_from(path: Option<&Path>) -> Result<TutorConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => return Err(ConfigError::NotFound(p.to_path_buf()).into()),
        None => {
            let local = PathBuf::from(LOCAL_CONFIG_FILE);
            if local.exists() {
                Some(local)
            } else {
                config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            toml::from_str::<TutorConfig>(&content)
                .map_err(|source| ConfigError::Parse { path, source })?
        }
        None => TutorConfig::default(),
    };

    if let Ok(dir) = std::env::var("TIMESTABLE_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(tag) = std::env::var("TIMESTABLE_LOCALE") {
        let locale = tag.parse::<Locale>().map_err(|_| ConfigError::InvalidOverride {
            var: "TIMESTABLE_LOCALE",
            value: tag.clone(),
        })?;
        config.locale = Some(locale);
    }

    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));
    config.speech.program = resolve_env_vars(&config.speech.program);
    config.speech.args = config.speech.args.iter().map(|a| resolve_env_vars(a)).collect();
    config.daily_target = config.daily_target.max(1);
    config.countdown_secs = config.countdown_secs.max(1);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_TIMESTABLE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_TIMESTABLE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_TIMESTABLE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_TIMESTABLE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = TutorConfig::default();
        assert_eq!(config.daily_target, 10);
        assert_eq!(config.countdown_secs, 10);
        assert_eq!(config.advance_delay_ms, 3000);
        assert_eq!(config.default_difficulty, Difficulty::Beginner);
        assert!(config.speech.enabled);
        assert_eq!(config.speech.program, "espeak-ng");
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
data_dir = "/tmp/tt"
locale = "en"
default_difficulty = "advanced"
countdown_secs = 15

[speech]
backend = "silent"
"#;
        let config: TutorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tt"));
        assert_eq!(config.locale, Some(Locale::En));
        assert_eq!(config.default_difficulty, Difficulty::Advanced);
        assert_eq!(config.countdown_secs, 15);
        assert_eq!(config.daily_target, 10);
        assert_eq!(config.speech.backend, SpeechBackend::Silent);
        assert_eq!(config.speech.args, default_args());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/timestable.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded_and_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "daily_target = 0\ncountdown_secs = 0\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.daily_target, 1);
        assert_eq!(config.countdown_secs, 1);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "daily_target = \"ten\"").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }

    #[test]
    fn to_toml_round_trips() {
        let config = TutorConfig::default();
        let parsed: TutorConfig = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
