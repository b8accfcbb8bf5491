//! Resolves the network endpoint of a monitor and renders listing lines.

use crate::Monitor;
use serde_json::Value;

/// Scalar JSON rendered without quotes; arrays are comma-joined. Null, empty
/// strings and `false` count as absent.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| text(Some(v)))
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

fn host_port(m: &Monitor) -> Option<String> {
    let host = non_empty(m.hostname.as_ref())?;
    Some(match text(m.port.as_ref()) {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

pub fn kind(m: &Monitor) -> String {
    m.kind.as_deref().unwrap_or_default().to_lowercase()
}

/// The address a monitor checks, chosen by monitor type.
pub fn endpoint_for(m: &Monitor) -> String {
    let kind = kind(m);
    let kind = kind.as_str();

    if matches!(kind, "http" | "json_query" | "keyword" | "real_browser") {
        if let Some(url) = non_empty(m.url.as_ref()) {
            return url.to_string();
        }
    }
    if matches!(kind, "ping" | "dns" | "tailscale_ping") {
        if let Some(host) = non_empty(m.hostname.as_ref()) {
            return host.to_string();
        }
    }
    if kind == "port" && m.port.as_ref().is_some_and(|p| !p.is_null()) {
        if let Some(addr) = host_port(m) {
            return addr;
        }
    }
    if kind == "grpc_keyword" {
        if let Some(url) = non_empty(m.grpc_url.as_ref()) {
            return url.to_string();
        }
    }
    let connection = non_empty(m.database_connection_string.as_ref())
        .map(str::to_string)
        .or_else(|| non_empty(m.redis_connection_string.as_ref()).map(str::to_string))
        .or_else(|| text(m.kafka_brokers.as_ref()));
    if let Some(conn) = connection {
        return conn;
    }
    match kind {
        "docker" => {
            let container = non_empty(m.docker_container.as_ref());
            let host = text(m.docker_host.as_ref());
            match (container, host) {
                (Some(c), Some(h)) => return format!("docker://{}/{}", h, c),
                (Some(c), None) => return format!("docker://{}", c),
                _ => {}
            }
        }
        "push" => {
            if let Some(token) = non_empty(m.push_token.as_ref()) {
                return format!("push://{}", token);
            }
        }
        "mqtt" => {
            let base = host_port(m).unwrap_or_default();
            let topic = non_empty(m.mqtt_topic.as_ref())
                .map(|t| format!(" topic={}", t))
                .unwrap_or_default();
            return format!("mqtt://{}{}", base, topic);
        }
        "steam" | "gamedig" | "sqlserver" | "postgres" | "mysql" => {
            if let Some(addr) = host_port(m) {
                return addr;
            }
        }
        _ => {}
    }

    format!(
        "{} (type={}, id={})",
        m.name.as_deref().unwrap_or("Unknown"),
        kind,
        text(m.id.as_ref()).unwrap_or_else(|| "None".to_string())
    )
}

fn tag_names(m: &Monitor) -> Vec<String> {
    m.tags
        .iter()
        .flatten()
        .map(|tag| match tag {
            Value::Object(obj) => text(obj.get("name")).unwrap_or_default(),
            other => text(Some(other)).unwrap_or_default(),
        })
        .collect()
}

/// `[#<id>] <name> – <endpoint>  (type=<type>)` plus a `[tags: ...]` suffix
/// when the monitor carries tags.
pub fn format_line(m: &Monitor) -> String {
    let id = text(m.id.as_ref()).unwrap_or_else(|| "?".to_string());
    let name = m
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("(no-name)");
    let kind = m
        .kind
        .as_deref()
        .filter(|k| !k.is_empty())
        .unwrap_or("?")
        .to_lowercase();
    let tags = tag_names(m);
    let tag_str = if tags.is_empty() {
        String::new()
    } else {
        format!(" [tags: {}]", tags.join(", "))
    };
    format!(
        "[#{}] {} – {}  (type={}){}",
        id,
        name,
        endpoint_for(m),
        kind,
        tag_str
    )
}
