use kuma::settings::ServerConfig;
use kuma::{KumaSettings, MonitorError, MonitorSource};
use std::io::Write;
use tracing::error;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;

/// Validates settings, connects through `connect` and prints one line per
/// monitor. Returns the process exit code. Configuration problems are reported
/// before `connect` is ever called.
pub fn run_listing<S, F>(settings: &KumaSettings, connect: F, out: &mut impl Write) -> u8
where
    S: MonitorSource,
    F: FnOnce(&ServerConfig) -> Result<S, MonitorError>,
{
    let server = match settings.resolve() {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            let _ = writeln!(out, "ERROR: {}", e);
            return EXIT_CONFIG;
        }
    };

    let result = connect(&server).and_then(|mut source| {
        kuma::list_endpoints(&mut source, &server.credentials)
    });
    match result {
        Ok(lines) => {
            let written = if lines.is_empty() {
                writeln!(out, "No monitors found.")
            } else {
                writeln!(out, "{}", lines.join("\n"))
            };
            match written {
                Ok(()) => EXIT_OK,
                Err(_) => EXIT_FAILURE,
            }
        }
        Err(e) => {
            error!("Listing failed: {}", e);
            let _ = writeln!(out, "ERROR: {}", e);
            EXIT_FAILURE
        }
    }
}
