//! Connection settings read from `KUMA_*` environment variables, optionally
//! layered over a config file.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("KUMA_URL is required")]
    MissingUrl,
    #[error("username/password or jwt_token is required")]
    MissingCredentials,
    #[error("KUMA_PREFER must be 'token' or 'password', got {0:?}")]
    InvalidPreference(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Password { username: String, password: String },
}

/// Which credential path wins when both are configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthPreference {
    #[default]
    Token,
    Password,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KumaSettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub jwt: Option<String>,
    pub ssl_verify: Option<String>,
    pub prefer: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Everything needed to open a session, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub url: String,
    pub credentials: Credentials,
    pub ssl_verify: bool,
    pub timeout: Duration,
}

/// A value that is set and not blank, returned exactly as given.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl KumaSettings {
    pub fn load(path: Option<&str>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, None)
    }

    /// Reads `KUMA_*` keys from `env` instead of the process environment when
    /// given.
    pub fn load_with_env(
        path: Option<&str>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder();
        if let Some(p) = path {
            builder = builder.add_source(config::File::with_name(p));
        }
        builder = builder.add_source(config::Environment::with_prefix("KUMA").source(env));
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn url(&self) -> Result<&str, SettingsError> {
        present(&self.url)
            .map(str::trim)
            .ok_or(SettingsError::MissingUrl)
    }

    /// Certificates are verified unless `ssl_verify` is `0`, `false` or `no`.
    pub fn ssl_verify(&self) -> bool {
        match present(&self.ssl_verify) {
            Some(v) => !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no"),
            None => true,
        }
    }

    pub fn preference(&self) -> Result<AuthPreference, SettingsError> {
        match present(&self.prefer)
            .map(|p| p.trim().to_lowercase())
            .as_deref()
        {
            None | Some("token") => Ok(AuthPreference::Token),
            Some("password") => Ok(AuthPreference::Password),
            Some(other) => Err(SettingsError::InvalidPreference(other.to_string())),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Picks the preferred credential path, falling back to the other one
    /// when the preferred path is incomplete.
    pub fn credentials(&self) -> Result<Credentials, SettingsError> {
        let token = present(&self.jwt).map(|t| Credentials::Token(t.to_string()));
        let password = match (present(&self.username), present(&self.password)) {
            (Some(username), Some(password)) => Some(Credentials::Password {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => None,
        };
        let chosen = match self.preference()? {
            AuthPreference::Token => token.or(password),
            AuthPreference::Password => password.or(token),
        };
        chosen.ok_or(SettingsError::MissingCredentials)
    }

    pub fn resolve(&self) -> Result<ServerConfig, SettingsError> {
        Ok(ServerConfig {
            url: self.url()?.to_string(),
            credentials: self.credentials()?,
            ssl_verify: self.ssl_verify(),
            timeout: self.timeout(),
        })
    }
}
