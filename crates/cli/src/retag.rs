use anyhow::Result;
use retag_core::config::RetagConfig;
use retag_core::exiftool::MetadataWriter;
use retag_core::models::RunSummary;
use retag_core::pipeline::{self, RunEvent};
use retag_core::report;
use std::io::Write;

/// Runs the retagger and prints progress and the closing summary to `out`.
pub async fn run_retag(
    cfg: &RetagConfig,
    writer: &dyn MetadataWriter,
    out: &mut impl Write,
) -> Result<RunSummary> {
    let mut write_err = None;
    let summary = pipeline::run(cfg, writer, |event| {
        let lines = match event {
            RunEvent::SkippedDir(name) => vec![format!("Skipped directory: {}", name)],
            RunEvent::File(outcome) => report::outcome_lines(outcome),
        };
        for line in lines {
            if let Err(e) = writeln!(out, "{}", line) {
                write_err.get_or_insert(e);
            }
        }
    })
    .await?;
    if let Some(e) = write_err {
        return Err(e.into());
    }
    for line in report::summary_lines(&summary) {
        writeln!(out, "{}", line)?;
    }
    Ok(summary)
}
