use cli::listing::{run_listing, EXIT_CONFIG, EXIT_FAILURE, EXIT_OK};
use kuma::fixed::{FixedSource, LoginAttempt};
use kuma::settings::ServerConfig;
use kuma::{KumaSettings, Monitor, MonitorError, MonitorSource};
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;

fn settings(pairs: &[(&str, &str)]) -> KumaSettings {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    KumaSettings::load_with_env(None, Some(env)).unwrap()
}

fn monitors() -> Vec<Monitor> {
    vec![
        json!({"id": 3, "name": "web", "type": "http", "url": "https://example.com"}),
        json!({"id": 1, "name": "gateway", "type": "ping", "hostname": "10.0.0.1"}),
        json!({"id": 2, "name": "db", "type": "port", "hostname": "db.local", "port": 5432}),
    ]
    .into_iter()
    .map(|v| serde_json::from_value(v).unwrap())
    .collect()
}

#[test]
fn missing_url_exits_before_connecting() {
    let connected = RefCell::new(false);
    let mut out = Vec::new();
    let code = run_listing(
        &settings(&[("KUMA_JWT", "t")]),
        |_: &ServerConfig| {
            *connected.borrow_mut() = true;
            Ok(FixedSource::new(monitors()))
        },
        &mut out,
    );
    assert_eq!(code, EXIT_CONFIG);
    assert!(!*connected.borrow());
    assert_eq!(String::from_utf8(out).unwrap(), "ERROR: KUMA_URL is required\n");
}

#[test]
fn missing_credentials_exit_before_connecting() {
    let connected = RefCell::new(false);
    let mut out = Vec::new();
    let code = run_listing(
        &settings(&[("KUMA_URL", "https://kuma.local"), ("KUMA_PASSWORD", "p")]),
        |_: &ServerConfig| {
            *connected.borrow_mut() = true;
            Ok(FixedSource::new(monitors()))
        },
        &mut out,
    );
    assert_eq!(code, EXIT_CONFIG);
    assert!(!*connected.borrow());
}

#[test]
fn token_path_is_used_when_both_are_set() {
    let attempts = RefCell::new(Vec::new());
    let mut out = Vec::new();
    let code = run_listing(
        &settings(&[
            ("KUMA_URL", "https://kuma.local"),
            ("KUMA_USERNAME", "admin"),
            ("KUMA_PASSWORD", "secret"),
            ("KUMA_JWT", "jwt-token"),
        ]),
        |_: &ServerConfig| Ok(RecordOnDrop::new(FixedSource::new(monitors()), &attempts)),
        &mut out,
    );
    assert_eq!(code, EXIT_OK);
    assert_eq!(*attempts.borrow(), vec![LoginAttempt::Token]);
}

#[test]
fn prints_one_line_per_monitor_in_server_order() {
    let mut out = Vec::new();
    let code = run_listing(
        &settings(&[
            ("KUMA_URL", "https://kuma.local"),
            ("KUMA_USERNAME", "admin"),
            ("KUMA_PASSWORD", "secret"),
        ]),
        |cfg: &ServerConfig| {
            assert_eq!(cfg.url, "https://kuma.local");
            assert!(cfg.ssl_verify);
            Ok(FixedSource::new(monitors()).accepting_password("admin", "secret"))
        },
        &mut out,
    );
    assert_eq!(code, EXIT_OK);
    let printed = String::from_utf8(out).unwrap();
    let lines: Vec<_> = printed.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[#3] web – https://example.com  (type=http)",
            "[#1] gateway – 10.0.0.1  (type=ping)",
            "[#2] db – db.local:5432  (type=port)",
        ]
    );
}

#[test]
fn empty_server_prints_placeholder() {
    let mut out = Vec::new();
    let code = run_listing(
        &settings(&[("KUMA_URL", "https://kuma.local"), ("KUMA_JWT", "t")]),
        |_: &ServerConfig| Ok(FixedSource::new(Vec::new())),
        &mut out,
    );
    assert_eq!(code, EXIT_OK);
    assert_eq!(String::from_utf8(out).unwrap(), "No monitors found.\n");
}

#[test]
fn rejected_login_is_fatal() {
    let mut out = Vec::new();
    let code = run_listing(
        &settings(&[("KUMA_URL", "https://kuma.local"), ("KUMA_JWT", "expired")]),
        |_: &ServerConfig| Ok(FixedSource::new(monitors()).accepting_token("fresh")),
        &mut out,
    );
    assert_eq!(code, EXIT_FAILURE);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "ERROR: authentication failed: Invalid token\n"
    );
}

#[test]
fn connection_failure_is_fatal() {
    let mut out = Vec::new();
    let code = run_listing(
        &settings(&[("KUMA_URL", "https://kuma.local"), ("KUMA_JWT", "t")]),
        |_: &ServerConfig| -> Result<FixedSource, MonitorError> {
            Err(MonitorError::Connection("connection refused".into()))
        },
        &mut out,
    );
    assert_eq!(code, EXIT_FAILURE);
    assert!(String::from_utf8(out).unwrap().starts_with("ERROR: connection failed"));
}

/// Copies the source's login attempts out when the listing is done with it.
struct RecordOnDrop<'a> {
    inner: FixedSource,
    sink: &'a RefCell<Vec<LoginAttempt>>,
}

impl<'a> RecordOnDrop<'a> {
    fn new(inner: FixedSource, sink: &'a RefCell<Vec<LoginAttempt>>) -> Self {
        Self { inner, sink }
    }
}

impl Drop for RecordOnDrop<'_> {
    fn drop(&mut self) {
        self.sink.borrow_mut().extend(self.inner.attempts.drain(..));
    }
}

impl MonitorSource for RecordOnDrop<'_> {
    fn login(&mut self, username: &str, password: &str) -> Result<(), MonitorError> {
        self.inner.login(username, password)
    }

    fn login_by_token(&mut self, token: &str) -> Result<(), MonitorError> {
        self.inner.login_by_token(token)
    }

    fn monitors(&mut self) -> Result<Vec<Monitor>, MonitorError> {
        self.inner.monitors()
    }
}
