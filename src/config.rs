//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZ_RESERVE_CONFIG_PATH";
/// Environment variable that overrides the admin token from the config file.
const ADMIN_TOKEN_ENV: &str = "QUIZ_RESERVE_ADMIN_TOKEN";
/// Interval suggested to status pollers when the config does not set one.
const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    admin_token: Option<String>,
    poll_interval: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in
    /// defaults, then apply environment overrides.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    info!(path = %path.display(), "loaded configuration file");
                    raw.into()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        if let Ok(token) = env::var(ADMIN_TOKEN_ENV) {
            if !token.is_empty() {
                config.admin_token = Some(token);
            }
        }

        config
    }

    /// Token expected in the `X-Admin-Token` header of admin requests.
    ///
    /// `None` means no token is configured and every admin request is
    /// rejected.
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }

    /// Interval clients should wait between two status probes.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Build a configuration directly from values, used by tests.
    pub fn with_values(admin_token: Option<String>, poll_interval: Duration) -> Self {
        Self {
            admin_token,
            poll_interval,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_token: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// JSON representation of the configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    admin_token: Option<String>,
    poll_interval_ms: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            admin_token: value.admin_token.filter(|token| !token.is_empty()),
            poll_interval: value
                .poll_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
