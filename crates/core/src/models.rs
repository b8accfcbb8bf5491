use chrono::NaiveDateTime;
use std::fmt;
use std::path::PathBuf;

/// Capture date/time recovered from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CaptureTime(pub NaiveDateTime);

impl CaptureTime {
    /// `YYYY:MM:DD hh:mm:ss`, the form exiftool expects for date tags.
    pub fn to_exif(&self) -> String {
        self.0.format("%Y:%m:%d %H:%M:%S").to_string()
    }

    /// `YYYY-MM-DDThhmmss.mmmZ`, the stamp embedded in `<user>__<stamp>` names.
    pub fn to_file_stamp(&self) -> String {
        self.0.format("%Y-%m-%dT%H%M%S%.3fZ").to_string()
    }
}

impl fmt::Display for CaptureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePattern {
    /// `<username>__YYYY-MM-DDThhmmss.msZ`
    UserStamp,
    /// `YYYY-MM-DD hh.mm.ss <image id>`
    DateTimeId,
    /// `<username>=_=YYYY-MM-DDThhmmss.msZ`
    UserStampEq,
    /// `YYMMDD <rest>` or `YYMMDD-<rest>`
    ShortDate,
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NamePattern::UserStamp => "user-stamp",
            NamePattern::DateTimeId => "date-time-id",
            NamePattern::UserStampEq => "user-stamp-eq",
            NamePattern::ShortDate => "short-date",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    pub pattern: NamePattern,
    /// Timestamp text exactly as it appears in the name.
    pub raw: String,
    pub time: CaptureTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Written { stamp: String },
    Unmatched { reason: String },
    ToolFailed { reason: String },
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub name: String,
    pub status: FileStatus,
    pub size_before: Option<u64>,
    pub size_after: Option<u64>,
}

impl FileOutcome {
    pub fn size_change(&self) -> Option<SizeChange> {
        let (before, after) = (self.size_before?, self.size_after?);
        if after > before {
            Some(SizeChange::Increased { before, after })
        } else if after < before {
            Some(SizeChange::Decreased { before, after })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeChange {
    Increased { before: u64, after: u64 },
    Decreased { before: u64, after: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub failed: usize,
    pub skipped: usize,
    pub size_increased: usize,
    pub size_decreased: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.total += 1;
        match outcome.status {
            FileStatus::Written { .. } => self.matched += 1,
            FileStatus::Unmatched { .. } => self.unmatched += 1,
            FileStatus::ToolFailed { .. } => self.failed += 1,
        }
        match outcome.size_change() {
            Some(SizeChange::Increased { .. }) => self.size_increased += 1,
            Some(SizeChange::Decreased { .. }) => self.size_decreased += 1,
            None => {}
        }
    }
}
