//! The retagging run: classify each file name, write the capture time, record
//! the outcome.

use crate::config::RetagConfig;
use crate::exiftool::MetadataWriter;
use crate::models::{FileOutcome, FileStatus, RunSummary};
use crate::patterns::NameMatcher;
use crate::report::ReportLogs;
use crate::scanner;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Progress notifications emitted while a run is in flight.
pub enum RunEvent<'a> {
    SkippedDir(&'a str),
    File(&'a FileOutcome),
}

/// Retags every matching file directly under the configured folders, one file
/// at a time. Per-file failures are recorded and never abort the run; a report
/// log that could not be written is returned as an error once every file has
/// been handled.
pub async fn run(
    config: &RetagConfig,
    writer: &dyn MetadataWriter,
    mut on_event: impl FnMut(RunEvent<'_>),
) -> anyhow::Result<RunSummary> {
    let mut logs = if config.report.enabled {
        ReportLogs::create(Path::new(&config.report.dir))?
    } else {
        ReportLogs::disabled()
    };
    let matcher = NameMatcher::new(config.patterns.extended);
    let mut summary = RunSummary::default();

    for folder in config.folder_list() {
        info!("Scanning {:?}", folder);
        let listing = scanner::list_folder(&folder);
        for dir in &listing.skipped_dirs {
            let name = file_name(dir);
            logs.skipped_dir(&name);
            summary.skipped += 1;
            on_event(RunEvent::SkippedDir(&name));
        }
        for path in listing.files {
            let outcome = process_file(&matcher, writer, path).await;
            summary.record(&outcome);
            logs.record(&outcome);
            on_event(RunEvent::File(&outcome));
        }
    }

    info!(
        "Run complete: {} files, {} written, {} failed",
        summary.total, summary.matched, summary.failed
    );
    logs.finish()?;
    Ok(summary)
}

async fn process_file(
    matcher: &NameMatcher,
    writer: &dyn MetadataWriter,
    path: PathBuf,
) -> FileOutcome {
    let name = file_name(&path);
    let found = match matcher.classify(&name) {
        Ok(m) => m,
        Err(mismatch) => {
            debug!("Skipping {:?}: {}", name, mismatch);
            return FileOutcome {
                path,
                name,
                status: FileStatus::Unmatched {
                    reason: mismatch.to_string(),
                },
                size_before: None,
                size_after: None,
            };
        }
    };

    let size_before = file_size(&path);
    let result = writer.write_capture_time(&path, &found.time).await;
    let size_after = file_size(&path).or(size_before);

    let status = match result {
        Ok(()) => FileStatus::Written { stamp: found.raw },
        Err(err) if err.is_riff() => {
            warn!("{:?} looks like a RIFF container, not a JPEG", path);
            FileStatus::ToolFailed {
                reason: "RIFF detected (not a valid JPG)".to_string(),
            }
        }
        Err(err) => {
            warn!("Failed to retag {:?}: {}", path, err);
            FileStatus::ToolFailed {
                reason: format!("Exiftool error: {}", err),
            }
        }
    };

    FileOutcome {
        path,
        name,
        status,
        size_before,
        size_after,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExifToolConfig, PatternConfig, ReportConfig};
    use crate::exiftool::WriteError;
    use crate::models::CaptureTime;
    use std::fs;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<PathBuf>>,
    }

    #[async_trait::async_trait]
    impl MetadataWriter for Recorder {
        async fn write_capture_time(
            &self,
            path: &Path,
            _time: &CaptureTime,
        ) -> Result<(), WriteError> {
            self.calls.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    fn config(folder: &Path, report_dir: Option<&Path>) -> RetagConfig {
        RetagConfig {
            folders: folder.to_string_lossy().into_owned(),
            exiftool: ExifToolConfig {
                path: "exiftool".into(),
                tag: "DateTimeOriginal".into(),
            },
            report: ReportConfig {
                enabled: report_dir.is_some(),
                dir: report_dir
                    .map(|d| d.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            },
            patterns: PatternConfig { extended: false },
        }
    }

    #[tokio::test]
    async fn only_matching_names_reach_the_writer() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("amy__2024-02-29T101010Z.jpg"), "x").unwrap();
        fs::write(temp.path().join("amy__2023-02-29T101010Z.jpg"), "x").unwrap();
        fs::write(temp.path().join("readme.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let writer = Recorder::default();
        let mut events = Vec::new();
        let summary = run(&config(temp.path(), None), &writer, |event| {
            events.push(match event {
                RunEvent::SkippedDir(name) => format!("dir {}", name),
                RunEvent::File(outcome) => format!("file {}", outcome.name),
            })
        })
        .await
        .unwrap();

        assert_eq!(
            *writer.calls.lock().unwrap(),
            vec![temp.path().join("amy__2024-02-29T101010Z.jpg")]
        );
        assert_eq!(summary.total, 3);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.unmatched, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(events[0], "dir sub");
        assert_eq!(events.len(), 4);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn unwritable_report_does_not_stop_the_run() {
        let temp = tempfile::tempdir().unwrap();
        let media = temp.path().join("media");
        let reports = temp.path().join("reports");
        fs::create_dir_all(&media).unwrap();
        fs::create_dir_all(&reports).unwrap();
        std::os::unix::fs::symlink("/dev/full", reports.join(crate::report::MATCH_LOG)).unwrap();
        fs::write(media.join("a__2020-01-01T000000Z.jpg"), "x").unwrap();
        fs::write(media.join("b__2020-01-02T000000Z.jpg"), "x").unwrap();

        let writer = Recorder::default();
        let err = run(&config(&media, Some(&reports)), &writer, |_| {})
            .await
            .unwrap_err();

        assert_eq!(writer.calls.lock().unwrap().len(), 2);
        assert!(format!("{:#}", err).starts_with("Report logs are incomplete"));
    }
}
