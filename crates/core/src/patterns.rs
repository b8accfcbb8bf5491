//! Recognizes timestamped media file names and recovers the capture time.

use crate::models::{CaptureTime, NameMatch, NamePattern};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

const ISO_STAMP: &str = r"(?P<stamp>(?P<y>\d{4})-(?P<mo>\d{2})-(?P<d>\d{2})T(?P<h>\d{2})(?P<mi>\d{2})(?P<s>\d{2})(?:\.(?P<ms>\d{3}))?Z)";
const ISO_TAIL: &str = r"(?:[_A-Za-z0-9+\-]+)?(?:\s*\(\d+\))?\.(?P<ext>.+)$";

static USER_STAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?P<user>.*)__{ISO_STAMP}{ISO_TAIL}")).expect("invalid regex")
});

static USER_STAMP_EQ: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?P<user>.*)=_={ISO_STAMP}{ISO_TAIL}")).expect("invalid regex")
});

static DATE_TIME_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<stamp>(?P<y>\d{4})-(?P<mo>\d{2})-(?P<d>\d{2}) (?P<h>\d{2})\.(?P<mi>\d{2})\.(?P<s>\d{2}))",
    )
    .expect("invalid regex")
});

static SHORT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<yy>\d{2})(?P<mo>\d{2})(?P<d>\d{2})(?:\s+|-)").expect("invalid regex"));

/// Why a name produced no capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    NoPattern,
    InvalidTimestamp { pattern: NamePattern, raw: String },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::NoPattern => f.write_str("no pattern matched"),
            Mismatch::InvalidTimestamp { pattern, raw } => {
                write!(f, "{pattern} timestamp {raw:?} is not a valid date")
            }
        }
    }
}

/// File name matcher. The default instance only knows the two primary shapes;
/// `extended` also enables the `=_=` separator and `YYMMDD` prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameMatcher {
    pub extended: bool,
}

impl NameMatcher {
    pub fn new(extended: bool) -> Self {
        Self { extended }
    }

    pub fn classify(&self, name: &str) -> Result<NameMatch, Mismatch> {
        if self.extended {
            if let Some(caps) = USER_STAMP_EQ.captures(name) {
                return full_stamp(NamePattern::UserStampEq, &caps);
            }
        }
        if let Some(caps) = USER_STAMP.captures(name) {
            return full_stamp(NamePattern::UserStamp, &caps);
        }
        if let Some(caps) = DATE_TIME_ID.captures(name) {
            return full_stamp(NamePattern::DateTimeId, &caps);
        }
        if self.extended {
            if let Some(caps) = SHORT_DATE.captures(name) {
                return short_date(&caps);
            }
        }
        Err(Mismatch::NoPattern)
    }
}

/// Parses a name with the two primary patterns only.
pub fn parse_file_name(name: &str) -> Option<NameMatch> {
    NameMatcher::default().classify(name).ok()
}

fn num(caps: &Captures<'_>, group: &str) -> Option<u32> {
    caps.name(group).and_then(|m| m.as_str().parse().ok())
}

fn full_stamp(pattern: NamePattern, caps: &Captures<'_>) -> Result<NameMatch, Mismatch> {
    let raw = caps
        .name("stamp")
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let time = (|| {
        let date = NaiveDate::from_ymd_opt(
            num(caps, "y")? as i32,
            num(caps, "mo")?,
            num(caps, "d")?,
        )?;
        date.and_hms_milli_opt(
            num(caps, "h")?,
            num(caps, "mi")?,
            num(caps, "s")?,
            num(caps, "ms").unwrap_or(0),
        )
    })();
    match time {
        Some(t) => Ok(NameMatch {
            pattern,
            raw,
            time: CaptureTime(t),
        }),
        None => Err(Mismatch::InvalidTimestamp { pattern, raw }),
    }
}

fn short_date(caps: &Captures<'_>) -> Result<NameMatch, Mismatch> {
    let (yy, mo, d) = (
        caps.name("yy").map(|m| m.as_str()).unwrap_or_default(),
        caps.name("mo").map(|m| m.as_str()).unwrap_or_default(),
        caps.name("d").map(|m| m.as_str()).unwrap_or_default(),
    );
    let raw = format!("20{yy}-{mo}-{d}");
    let time = (|| {
        NaiveDate::from_ymd_opt(2000 + num(caps, "yy")? as i32, num(caps, "mo")?, num(caps, "d")?)?
            .and_hms_opt(0, 0, 0)
    })();
    match time {
        Some(t) => Ok(NameMatch {
            pattern: NamePattern::ShortDate,
            raw,
            time: CaptureTime(t),
        }),
        None => Err(Mismatch::InvalidTimestamp {
            pattern: NamePattern::ShortDate,
            raw,
        }),
    }
}
