use std::{net::SocketAddr, path::PathBuf, time::Duration};

use fixwatch_market_data::DEFAULT_BASE_URL;
use thiserror::Error;

use crate::secrets::{FileSecretStore, SecretsError};

/// Name of the token in the secrets file and in the environment.
pub const TOKEN_KEY: &str = "BANXICO_TOKEN";

const DEFAULT_SHORT_AVG_WINDOW: usize = 15;
const DEFAULT_LONG_AVG_WINDOW: usize = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Banxico token missing. Set it in the secrets file ({secrets_file}) or as env var `BANXICO_TOKEN`."
    )]
    MissingToken { secrets_file: String },
    #[error("Invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0}")]
    Secrets(#[from] SecretsError),
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub banxico_token: String,
    pub banxico_base_url: String,
    /// Observations in the short trailing average.
    pub short_avg_window: usize,
    /// Observations in the long trailing average.
    pub long_avg_window: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_raw = lookup("FW_LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let listen_addr: SocketAddr =
            listen_raw
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    key: "FW_LISTEN_ADDR",
                    value: listen_raw.clone(),
                    reason: e.to_string(),
                })?;
        let cors_allow = lookup("FW_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = lookup("FW_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .unwrap_or(30000);
        let banxico_base_url =
            lookup("FW_BANXICO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let short_avg_window =
            parse_window(&lookup, "FW_SHORT_AVG_WINDOW", DEFAULT_SHORT_AVG_WINDOW)?;
        let long_avg_window = parse_window(&lookup, "FW_LONG_AVG_WINDOW", DEFAULT_LONG_AVG_WINDOW)?;

        let banxico_token = resolve_token(&lookup)?;

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            banxico_token,
            banxico_base_url,
            short_avg_window,
            long_avg_window,
        })
    }
}

fn parse_window<F>(lookup: &F, key: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be at least 1".to_string(),
        }),
        Err(e) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

/// The secrets file wins over the environment variable.
fn resolve_token<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secrets_path =
        PathBuf::from(lookup("FW_SECRETS_FILE").unwrap_or_else(|| "secrets.json".to_string()));
    let secret_key = lookup("FW_SECRET_KEY");
    let store = FileSecretStore::new(secrets_path, secret_key.as_deref())?;

    if let Some(token) = store.get_secret(TOKEN_KEY)? {
        return Ok(token);
    }

    lookup(TOKEN_KEY)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ConfigError::MissingToken {
            secrets_file: store.path().display().to_string(),
        })
}
