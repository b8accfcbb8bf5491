use anyhow::{Context, Result};
use clap::Parser;
use cli::retag::run_retag;
use retag_core::config;
use retag_core::exiftool::ExifTool;

#[derive(Parser)]
#[command(name = "media-retag", version)]
#[command(about = "Write capture dates parsed from file names into media metadata", long_about = None)]
struct Cli {
    /// Path to config file (TOML / YAML / JSON)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    cli::logging::init();

    let args = Cli::parse();
    let cfg = config::load(args.config.as_deref()).context("load config")?;
    let writer = ExifTool::new(&cfg.exiftool.path, &cfg.exiftool.tag);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_retag(&cfg, &writer, &mut out).await?;
    Ok(())
}
