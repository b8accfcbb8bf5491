use crate::models::CaptureTime;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

const RIFF_MARKER: &str = "Not a valid JPG (looks more like a RIFF)";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("exiftool exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
}

impl WriteError {
    /// The tool refused a JPEG-named file that is really a RIFF container.
    pub fn is_riff(&self) -> bool {
        matches!(self, WriteError::Failed { stderr, .. } if stderr.contains(RIFF_MARKER))
    }
}

/// Writes a capture time into a file's embedded metadata.
#[async_trait::async_trait]
pub trait MetadataWriter: Send + Sync {
    async fn write_capture_time(&self, path: &Path, time: &CaptureTime) -> Result<(), WriteError>;
}

#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
    tag: String,
}

impl ExifTool {
    pub fn new(program: impl Into<PathBuf>, tag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            tag: tag.into(),
        }
    }

    /// The path goes through as raw OS bytes so names that are not valid
    /// UTF-8 still reach the file.
    pub fn args(&self, path: &Path, time: &CaptureTime) -> Vec<OsString> {
        vec![
            OsString::from("-overwrite_original"),
            OsString::from(format!("-{}={}", self.tag, time.to_exif())),
            path.as_os_str().to_owned(),
        ]
    }
}

#[async_trait::async_trait]
impl MetadataWriter for ExifTool {
    async fn write_capture_time(&self, path: &Path, time: &CaptureTime) -> Result<(), WriteError> {
        let args = self.args(path, time);
        debug!("Running {:?} {:?}", self.program, args);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| WriteError::Spawn {
                tool: self.program.to_string_lossy().into_owned(),
                source,
            })?;
        if output.status.success() {
            Ok(())
        } else {
            Err(WriteError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
