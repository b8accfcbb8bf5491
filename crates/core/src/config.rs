use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetagConfig {
    /// Comma-separated list of absolute folder paths.
    pub folders: String,
    pub exiftool: ExifToolConfig,
    pub report: ReportConfig,
    pub patterns: PatternConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExifToolConfig {
    pub path: String,
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub enabled: bool,
    pub dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default)]
    pub extended: bool,
}

impl RetagConfig {
    pub fn folder_list(&self) -> Vec<PathBuf> {
        self.folders
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
            .collect()
    }
}

pub fn load(path: Option<&str>) -> anyhow::Result<RetagConfig> {
    load_with_env(path, None)
}

/// Same as [`load`], but reads `RETAG_*` overrides from `env` instead of the
/// process environment when given.
pub fn load_with_env(
    path: Option<&str>,
    env: Option<HashMap<String, String>>,
) -> anyhow::Result<RetagConfig> {
    let mut settings = config::Config::builder()
        .set_default("folders", "/data")?
        .set_default("exiftool.path", "exiftool")?
        .set_default("exiftool.tag", "DateTimeOriginal")?
        .set_default("report.enabled", true)?
        .set_default("report.dir", ".")?
        .set_default("patterns.extended", false)?;
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/retag").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("RETAG")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
