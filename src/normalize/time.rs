//! Converts event time ranges such as `"12:00 - 16:00 GMT+13"` or
//! `"23:00 - 01:00 UTC"` into a single target civil timezone.
//!
//! The offset printed on the page is fixed, but the target zone observes
//! daylight saving, so every conversion is anchored on the event's own date.

use crate::normalize::date::first_date;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::debug;

static EXPLICIT_OFFSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:GMT|UTC)\s*([+-])\s*(\d{1,2})(?::?(\d{2}))?")
        .expect("explicit offset regex is valid")
});

static BARE_UTC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bUTC\b").expect("bare utc regex is valid"));

static TIME_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}:\d{2})\s*[-–]\s*(\d{1,2}:\d{2})").expect("time range regex is valid")
});

const CLOCK_FORMAT: &str = "%H:%M";

/// A time range expressed in the target zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub zone_label: String,
}

impl fmt::Display for NormalizedTimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {}",
            self.start.format(CLOCK_FORMAT),
            self.end.format(CLOCK_FORMAT),
            self.zone_label
        )
    }
}

/// Where the source offset marker was found and what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceOffset {
    offset: FixedOffset,
    marker_start: usize,
}

#[derive(Debug, Clone)]
pub struct TimeZoneNormalizer {
    target: Tz,
}

impl TimeZoneNormalizer {
    pub fn new(target: Tz) -> Self {
        Self { target }
    }

    pub fn target(&self) -> Tz {
        self.target
    }

    /// Rewrites `time_text` into the target zone, or returns it unchanged
    /// when the notation is not recognized.
    pub fn normalize(&self, time_text: &str, date_text: &str) -> String {
        match self.normalize_range(time_text, date_text) {
            Some(range) => range.to_string(),
            None => time_text.to_string(),
        }
    }

    pub fn normalize_range(&self, time_text: &str, date_text: &str) -> Option<NormalizedTimeRange> {
        let source = detect_offset(time_text)?;
        let before_marker = &time_text[..source.marker_start];
        let caps = TIME_RANGE_RE.captures(before_marker)?;

        let start = NaiveTime::parse_from_str(&caps[1], CLOCK_FORMAT).ok()?;
        let end = NaiveTime::parse_from_str(&caps[2], CLOCK_FORMAT).ok()?;
        let anchor = anchor_date(date_text);

        let start_local = self.to_target(anchor, start, source.offset)?;
        let end_local = self.to_target(anchor, end, source.offset)?;

        Some(NormalizedTimeRange {
            start: start_local.time(),
            end: end_local.time(),
            zone_label: start_local.format("%Z").to_string(),
        })
    }

    fn to_target(&self, date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> Option<DateTime<Tz>> {
        let instant = offset.from_local_datetime(&date.and_time(time)).single()?;
        Some(instant.with_timezone(&self.target))
    }
}

/// The date the conversion is anchored on: the event's first date, or today.
fn anchor_date(date_text: &str) -> NaiveDate {
    first_date(date_text).unwrap_or_else(|| {
        debug!("No usable date in '{}'; anchoring on today", date_text);
        Local::now().date_naive()
    })
}

fn detect_offset(time_text: &str) -> Option<SourceOffset> {
    if let Some(caps) = EXPLICIT_OFFSET_RE.captures(time_text) {
        let marker_start = caps.get(0)?.start();
        let hours: i32 = caps[2].parse().ok()?;
        let minutes: i32 = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        if minutes >= 60 {
            return None;
        }
        let sign = if &caps[1] == "-" { -1 } else { 1 };
        let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;
        return Some(SourceOffset { offset, marker_start });
    }

    let bare = BARE_UTC_RE.find(time_text)?;
    Some(SourceOffset {
        offset: FixedOffset::east_opt(0)?,
        marker_start: bare.start(),
    })
}
