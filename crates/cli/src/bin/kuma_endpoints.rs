use clap::Parser;
use cli::listing::{run_listing, EXIT_CONFIG, EXIT_FAILURE};
use kuma::socketio::SocketIoSource;
use kuma::KumaSettings;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kuma-endpoints", version)]
#[command(about = "List the endpoint of every Uptime Kuma monitor", long_about = None)]
struct Cli {
    /// Optional config file layered under the KUMA_* environment variables
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    cli::logging::init();

    let args = Cli::parse();
    let settings = match KumaSettings::load(args.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            println!("ERROR: {}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    // The Socket.IO client blocks on acknowledgements.
    let code = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        run_listing(&settings, SocketIoSource::connect, &mut out)
    })
    .await
    .unwrap_or(EXIT_FAILURE);
    ExitCode::from(code)
}
