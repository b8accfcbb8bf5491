//! Per-run report logs and console lines.

use crate::models::{FileOutcome, FileStatus, RunSummary, SizeChange};
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const MATCH_LOG: &str = "0Match.log";
pub const NOT_MATCH_LOG: &str = "0NotMatch.log";
pub const CHANGED_LOG: &str = "0FileChanged.log";

struct LogFiles {
    matched: BufWriter<File>,
    not_matched: BufWriter<File>,
    changed: BufWriter<File>,
}

/// The three report logs, truncated at the start of each run. A disabled
/// report swallows every record. Write failures do not interrupt the run;
/// the first one is returned from `finish`.
pub struct ReportLogs {
    files: Option<LogFiles>,
    write_error: Option<std::io::Error>,
}

impl ReportLogs {
    pub fn disabled() -> Self {
        Self {
            files: None,
            write_error: None,
        }
    }

    pub fn create(dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report dir {:?}", dir))?;
        let open = |name: &str| -> anyhow::Result<BufWriter<File>> {
            let path: PathBuf = dir.join(name);
            let file =
                File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
            Ok(BufWriter::new(file))
        };
        Ok(Self {
            files: Some(LogFiles {
                matched: open(MATCH_LOG)?,
                not_matched: open(NOT_MATCH_LOG)?,
                changed: open(CHANGED_LOG)?,
            }),
            write_error: None,
        })
    }

    pub fn skipped_dir(&mut self, name: &str) {
        let result = match &mut self.files {
            Some(files) => writeln!(files.not_matched, "{} --> skipped directory", name),
            None => Ok(()),
        };
        self.keep_first_error(result);
    }

    pub fn record(&mut self, outcome: &FileOutcome) {
        let result = match &mut self.files {
            Some(files) => write_outcome(files, outcome),
            None => Ok(()),
        };
        self.keep_first_error(result);
    }

    fn keep_first_error(&mut self, result: std::io::Result<()>) {
        if let Err(e) = result {
            if self.write_error.is_none() {
                warn!("Failed to write report log: {}", e);
                self.write_error = Some(e);
            }
        }
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        if let Some(files) = &mut self.files {
            let flushed = files
                .matched
                .flush()
                .and_then(|_| files.not_matched.flush())
                .and_then(|_| files.changed.flush());
            self.keep_first_error(flushed);
        }
        match self.write_error {
            Some(e) => Err(anyhow::Error::new(e).context("Report logs are incomplete")),
            None => Ok(()),
        }
    }
}

fn write_outcome(files: &mut LogFiles, outcome: &FileOutcome) -> std::io::Result<()> {
    match &outcome.status {
        FileStatus::Written { stamp } => {
            writeln!(files.matched, "{} --> {}", outcome.name, stamp)?
        }
        FileStatus::Unmatched { reason } | FileStatus::ToolFailed { reason } => {
            writeln!(files.not_matched, "{} --> {}", outcome.name, reason)?
        }
    }
    if let Some(change) = outcome.size_change() {
        writeln!(files.changed, "{} --> {}", outcome.name, describe_size(change))?;
    }
    Ok(())
}

fn describe_size(change: SizeChange) -> String {
    match change {
        SizeChange::Increased { before, after } => {
            format!("size increased ({} → {} bytes)", before, after)
        }
        SizeChange::Decreased { before, after } => {
            format!("size decreased ({} → {} bytes)", before, after)
        }
    }
}

/// Console lines for one file. Unmatched names print nothing.
pub fn outcome_lines(outcome: &FileOutcome) -> Vec<String> {
    if matches!(outcome.status, FileStatus::Unmatched { .. }) {
        return Vec::new();
    }
    let mut lines = vec![format!("\n--- Checking file: {} ---", outcome.name)];
    match &outcome.status {
        FileStatus::Written { stamp } => lines.push(format!("Matched timestamp: {}", stamp)),
        FileStatus::ToolFailed { reason } => lines.push(reason.clone()),
        FileStatus::Unmatched { .. } => {}
    }
    match outcome.size_change() {
        Some(SizeChange::Increased { before, after }) => {
            lines.push(format!("File size increased ({} → {} bytes).", before, after))
        }
        Some(SizeChange::Decreased { before, after }) => {
            lines.push(format!("File size decreased ({} → {} bytes).", before, after))
        }
        None => {}
    }
    lines
}

pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    vec![
        "\n=== Summary ===".to_string(),
        format!("Total files scanned: {}", summary.total),
        format!("Matched: {}", summary.matched),
        format!("Not matched: {}", summary.unmatched),
        format!("Tool failures: {}", summary.failed),
        format!("Skipped: {}", summary.skipped),
        format!("Size increased: {}", summary.size_increased),
        format!("Size decreased: {}", summary.size_decreased),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn outcome(name: &str, status: FileStatus, before: u64, after: u64) -> FileOutcome {
        FileOutcome {
            path: PathBuf::from("/data").join(name),
            name: name.to_string(),
            status,
            size_before: Some(before),
            size_after: Some(after),
        }
    }

    #[test]
    fn writes_each_log() {
        let temp = tempfile::tempdir().unwrap();
        let mut logs = ReportLogs::create(temp.path()).unwrap();
        logs.record(&outcome(
            "a__2020-01-01T000000Z.jpg",
            FileStatus::Written {
                stamp: "2020-01-01T000000Z".into(),
            },
            100,
            120,
        ));
        logs.record(&outcome(
            "notes.txt",
            FileStatus::Unmatched {
                reason: "no pattern matched".into(),
            },
            5,
            5,
        ));
        logs.skipped_dir("nested");
        logs.finish().unwrap();

        let matched = fs::read_to_string(temp.path().join(MATCH_LOG)).unwrap();
        assert_eq!(matched, "a__2020-01-01T000000Z.jpg --> 2020-01-01T000000Z\n");
        let not_matched = fs::read_to_string(temp.path().join(NOT_MATCH_LOG)).unwrap();
        assert!(not_matched.contains("notes.txt --> no pattern matched"));
        assert!(not_matched.contains("nested --> skipped directory"));
        let changed = fs::read_to_string(temp.path().join(CHANGED_LOG)).unwrap();
        assert_eq!(
            changed,
            "a__2020-01-01T000000Z.jpg --> size increased (100 → 120 bytes)\n"
        );
    }

    #[test]
    fn unmatched_files_are_silent_on_console() {
        let lines = outcome_lines(&outcome(
            "notes.txt",
            FileStatus::Unmatched {
                reason: "no pattern matched".into(),
            },
            5,
            5,
        ));
        assert!(lines.is_empty());
    }

    #[test]
    fn console_lines_for_failure() {
        let lines = outcome_lines(&outcome(
            "x.jpg",
            FileStatus::ToolFailed {
                reason: "Exiftool error: boom".into(),
            },
            10,
            8,
        ));
        assert_eq!(
            lines,
            vec![
                "\n--- Checking file: x.jpg ---".to_string(),
                "Exiftool error: boom".to_string(),
                "File size decreased (10 → 8 bytes).".to_string(),
            ]
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_failures_surface_at_finish() {
        let full = || BufWriter::with_capacity(1, File::create("/dev/full").unwrap());
        let mut logs = ReportLogs {
            files: Some(LogFiles {
                matched: full(),
                not_matched: full(),
                changed: full(),
            }),
            write_error: None,
        };
        logs.skipped_dir("nested");
        logs.record(&outcome(
            "a__2020-01-01T000000Z.jpg",
            FileStatus::Written {
                stamp: "2020-01-01T000000Z".into(),
            },
            1,
            2,
        ));
        let err = logs.finish().unwrap_err();
        assert!(format!("{:#}", err).starts_with("Report logs are incomplete"));
    }
}
