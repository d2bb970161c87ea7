//! Configuration loader and validator for the homework status bot.
//!
//! Secrets come from the process environment (optionally seeded from `.env`),
//! everything else from an optional YAML settings file.
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 600;
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("missing required environment variable: {0}")]
    MissingCredential(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// The three secrets the bot cannot run without.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Read credentials from the environment. Unset variables become empty
    /// strings; use [`check_tokens`] or [`Credentials::ensure_present`] to
    /// reject them.
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).unwrap_or_default();
        Self {
            practicum_token: var(PRACTICUM_TOKEN_VAR),
            telegram_token: var(TELEGRAM_TOKEN_VAR),
            telegram_chat_id: var(TELEGRAM_CHAT_ID_VAR),
        }
    }

    /// Fails with the name of the first missing or blank variable.
    pub fn ensure_present(&self) -> Result<(), ConfigError> {
        let fields = [
            (PRACTICUM_TOKEN_VAR, &self.practicum_token),
            (TELEGRAM_TOKEN_VAR, &self.telegram_token),
            (TELEGRAM_CHAT_ID_VAR, &self.telegram_chat_id),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(ConfigError::MissingCredential(*name)),
            None => Ok(()),
        }
    }
}

/// True only when all three credentials are non-empty.
pub fn check_tokens(credentials: &Credentials) -> bool {
    credentials.ensure_present().is_ok()
}

/// Non-secret settings, mirroring the YAML schema.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub retry_interval_secs: u64,
    /// Initial poll cursor (Unix seconds). `None` starts from the current time.
    pub from_date: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry_interval_secs: DEFAULT_RETRY_INTERVAL_SECS,
            from_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub credentials: Credentials,
    pub settings: Settings,
}

/// Load settings from YAML and credentials from the environment, then validate.
/// - If `path` is None, uses `config.yaml` in the current working directory and
///   falls back to defaults when that file does not exist.
/// - An explicitly given path must exist.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let settings = match path {
        Some(path) => load_settings(path)?,
        None => match load_settings(Path::new(DEFAULT_CONFIG_FILE)) {
            Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => Settings::default(),
            other => other?,
        },
    };
    let cfg = Config {
        credentials: Credentials::from_env(),
        settings,
    };
    validate(&cfg)?;
    Ok(cfg)
}

fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path)?;
    let settings: Settings = serde_yaml::from_str(&content)?;
    Ok(settings)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.credentials.ensure_present()?;

    if cfg.settings.endpoint.trim().is_empty() {
        return Err(ConfigError::Invalid("endpoint must be non-empty"));
    }
    if reqwest::Url::parse(&cfg.settings.endpoint).is_err() {
        return Err(ConfigError::Invalid("endpoint must be an absolute URL"));
    }
    if cfg.settings.retry_interval_secs == 0 {
        return Err(ConfigError::Invalid("retry_interval_secs must be > 0"));
    }
    if matches!(cfg.settings.from_date, Some(ts) if ts < 0) {
        return Err(ConfigError::Invalid("from_date must be >= 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const EXAMPLE: &str = r#"endpoint: "https://practicum.yandex.ru/api/user_api/homework_statuses/"
retry_interval_secs: 600
# Unix timestamp to start polling from; omit to start from now.
from_date: 1657370096
"#;

    fn sample_credentials() -> Credentials {
        Credentials {
            practicum_token: "practicum".into(),
            telegram_token: "123:abc".into(),
            telegram_chat_id: "42".into(),
        }
    }

    fn sample_config() -> Config {
        Config {
            credentials: sample_credentials(),
            settings: serde_yaml::from_str(EXAMPLE).unwrap(),
        }
    }

    #[test]
    fn parse_example_ok() {
        let cfg = sample_config();
        validate(&cfg).unwrap();
        assert_eq!(cfg.settings.retry_interval_secs, 600);
        assert_eq!(cfg.settings.from_date, Some(1657370096));
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert!(settings.from_date.is_none());
    }

    #[test]
    fn check_tokens_accepts_full_set() {
        assert!(check_tokens(&sample_credentials()));
    }

    #[test]
    fn check_tokens_rejects_any_empty() {
        let mut creds = sample_credentials();
        creds.practicum_token = String::new();
        assert!(!check_tokens(&creds));

        let mut creds = sample_credentials();
        creds.telegram_token = "   ".into();
        assert!(!check_tokens(&creds));

        let mut creds = sample_credentials();
        creds.telegram_chat_id = String::new();
        assert!(!check_tokens(&creds));
    }

    #[test]
    fn missing_credential_names_variable() {
        let mut cfg = sample_config();
        cfg.credentials.telegram_chat_id = String::new();
        match validate(&cfg).unwrap_err() {
            ConfigError::MissingCredential(name) => assert_eq!(name, TELEGRAM_CHAT_ID_VAR),
            other => panic!("wrong error: {other:?}"),
        }
    }

    #[test]
    fn invalid_settings() {
        let mut cfg = sample_config();
        cfg.settings.retry_interval_secs = 0;
        match validate(&cfg).unwrap_err() {
            ConfigError::Invalid(msg) => assert!(msg.contains("retry_interval_secs")),
            other => panic!("wrong error: {other:?}"),
        }

        let mut cfg = sample_config();
        cfg.settings.endpoint = "not a url".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg = sample_config();
        cfg.settings.from_date = Some(-1);
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn debug_redacts_tokens() {
        let rendered = format!("{:?}", sample_credentials());
        assert!(!rendered.contains("practicum"));
        assert!(!rendered.contains("123:abc"));
        assert!(rendered.contains("42"));
    }

    #[test]
    fn load_settings_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(&p, "retry_interval_secs: 30\n").unwrap();
        let settings = load_settings(&p).unwrap();
        assert_eq!(settings.retry_interval_secs, 30);
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn load_explicit_missing_file_fails() {
        let td = tempdir().unwrap();
        let p = td.path().join("absent.yaml");
        assert!(matches!(load(Some(&p)), Err(ConfigError::Io(_))));
    }
}
