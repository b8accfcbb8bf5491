//! Uptime Kuma client abstractions and monitor endpoint listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

pub mod endpoint;
pub mod fixed;
pub mod settings;
pub mod socketio;

pub use settings::{Credentials, KumaSettings, SettingsError};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
    #[error("unexpected server response: {0}")]
    Protocol(String),
}

/// One monitor as pushed by the server. Only the fields used to resolve an
/// endpoint are typed; everything else is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub port: Option<Value>,
    #[serde(default)]
    pub grpc_url: Option<String>,
    #[serde(default)]
    pub database_connection_string: Option<String>,
    #[serde(default)]
    pub redis_connection_string: Option<String>,
    #[serde(default)]
    pub kafka_brokers: Option<Value>,
    #[serde(default, alias = "docker_container")]
    pub docker_container: Option<String>,
    #[serde(default, alias = "docker_host")]
    pub docker_host: Option<Value>,
    #[serde(default)]
    pub push_token: Option<String>,
    #[serde(default)]
    pub mqtt_topic: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<Value>>,
}

/// A server session that can authenticate and hand back its monitors.
pub trait MonitorSource {
    fn login(&mut self, username: &str, password: &str) -> Result<(), MonitorError>;
    fn login_by_token(&mut self, token: &str) -> Result<(), MonitorError>;
    /// All monitors, in the order the server sent them.
    fn monitors(&mut self) -> Result<Vec<Monitor>, MonitorError>;
}

pub fn authenticate(
    source: &mut dyn MonitorSource,
    credentials: &Credentials,
) -> Result<(), MonitorError> {
    match credentials {
        Credentials::Token(token) => {
            info!("Authenticating with session token");
            source.login_by_token(token)
        }
        Credentials::Password { username, password } => {
            info!("Authenticating as {}", username);
            source.login(username, password)
        }
    }
}

/// Authenticates once and formats one line per monitor.
pub fn list_endpoints(
    source: &mut dyn MonitorSource,
    credentials: &Credentials,
) -> Result<Vec<String>, MonitorError> {
    authenticate(source, credentials)?;
    let monitors = source.monitors()?;
    info!("Server returned {} monitors", monitors.len());
    Ok(monitors.iter().map(endpoint::format_line).collect())
}
