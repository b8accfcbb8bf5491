//! Uptime Kuma speaks Socket.IO: requests are emitted events answered through
//! acknowledgements, and the monitor list is pushed as a `monitorList` event
//! once the session is authenticated.

use crate::settings::ServerConfig;
use crate::{Monitor, MonitorError, MonitorSource};
use native_tls::TlsConnector;
use rust_socketio::client::Client;
use rust_socketio::{ClientBuilder, Payload, RawClient};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct LoginAck {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    msg: Option<String>,
}

pub struct SocketIoSource {
    client: Client,
    monitor_lists: Receiver<Value>,
    timeout: Duration,
}

fn first_value(payload: Payload) -> Option<Value> {
    match payload {
        Payload::Text(values) => values.into_iter().next(),
        _ => None,
    }
}

impl SocketIoSource {
    pub fn connect(cfg: &ServerConfig) -> Result<Self, MonitorError> {
        let (tx, monitor_lists) = mpsc::channel();
        let mut builder = ClientBuilder::new(cfg.url.as_str()).on(
            "monitorList",
            move |payload: Payload, _socket: RawClient| {
                if let Some(list) = first_value(payload) {
                    let _ = tx.send(list);
                }
            },
        );
        if !cfg.ssl_verify {
            warn!("Certificate verification disabled for {}", cfg.url);
            let tls = TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|e| MonitorError::Connection(e.to_string()))?;
            builder = builder.tls_config(tls);
        }
        debug!("Connecting to {}", cfg.url);
        let client = builder
            .connect()
            .map_err(|e| MonitorError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            monitor_lists,
            timeout: cfg.timeout,
        })
    }

    /// Emits `event` and blocks until the server acknowledges it.
    fn call(&self, event: &'static str, data: Value) -> Result<Value, MonitorError> {
        let (tx, rx) = mpsc::channel();
        self.client
            .emit_with_ack(
                event,
                data,
                self.timeout,
                move |payload: Payload, _socket: RawClient| {
                    let _ = tx.send(first_value(payload));
                },
            )
            .map_err(|e| MonitorError::Connection(e.to_string()))?;
        rx.recv_timeout(self.timeout)
            .map_err(|_| MonitorError::Timeout(event))?
            .ok_or_else(|| MonitorError::Protocol(format!("empty acknowledgement for {}", event)))
    }

    fn expect_ok(&self, event: &'static str, data: Value) -> Result<(), MonitorError> {
        let ack: LoginAck = serde_json::from_value(self.call(event, data)?)
            .map_err(|e| MonitorError::Protocol(e.to_string()))?;
        if ack.ok {
            Ok(())
        } else {
            Err(MonitorError::Auth(
                ack.msg.unwrap_or_else(|| "login rejected".to_string()),
            ))
        }
    }
}

impl MonitorSource for SocketIoSource {
    fn login(&mut self, username: &str, password: &str) -> Result<(), MonitorError> {
        self.expect_ok(
            "login",
            json!({ "username": username, "password": password, "token": "" }),
        )
    }

    fn login_by_token(&mut self, token: &str) -> Result<(), MonitorError> {
        self.expect_ok("loginByToken", Value::String(token.to_string()))
    }

    fn monitors(&mut self) -> Result<Vec<Monitor>, MonitorError> {
        let list = self
            .monitor_lists
            .recv_timeout(self.timeout)
            .map_err(|_| MonitorError::Timeout("monitorList"))?;
        parse_monitor_list(list)
    }
}

impl Drop for SocketIoSource {
    fn drop(&mut self) {
        if let Err(e) = self.client.disconnect() {
            debug!("Disconnect failed: {}", e);
        }
    }
}

fn decode(value: Value) -> Result<Monitor, MonitorError> {
    serde_json::from_value(value).map_err(|e| MonitorError::Protocol(e.to_string()))
}

/// `monitorList` carries an object keyed by monitor id; key order is the
/// server's order.
pub fn parse_monitor_list(list: Value) -> Result<Vec<Monitor>, MonitorError> {
    match list {
        Value::Object(map) => map.into_iter().map(|(_, v)| decode(v)).collect(),
        Value::Array(items) => items.into_iter().map(decode).collect(),
        other => Err(MonitorError::Protocol(format!(
            "monitorList is not an object: {}",
            other
        ))),
    }
}
