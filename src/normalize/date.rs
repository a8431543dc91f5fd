//! Free-text calendar dates as they appear on event pages, e.g.
//! `"Tuesday 24th February 2026"` or
//! `"Monday 23rd February 2026 - Tuesday 24th February 2026"`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static ORDINAL_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("ordinal suffix regex is valid")
});

static RANGE_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[-–—]\s+").expect("range separator regex is valid"));

static DAY_MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})\s+([A-Za-z]+)\s+(\d{4})").expect("day/month/year regex is valid")
});

/// Exact patterns tried in order against the first date of a range.
const DATE_FORMATS: &[&str] = &[
    "%A %d %B %Y",
    "%A, %d %B %Y",
    "%d %B %Y",
    "%A %B %d %Y",
    "%Y-%m-%d",
];

const CANONICAL_FORMAT: &str = "%d %B %Y";

/// Sort key derived from a date string.
///
/// `Unparseable` is declared after `Date` so the derived ordering places it
/// after every real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortDate {
    Date(NaiveDate),
    Unparseable,
}

impl SortDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            SortDate::Date(d) => Some(*d),
            SortDate::Unparseable => None,
        }
    }
}

/// Parses a date (or the first date of a range) into a sort key. Never fails.
pub fn parse_sort_date(text: &str) -> SortDate {
    match first_date(text) {
        Some(date) => SortDate::Date(date),
        None => SortDate::Unparseable,
    }
}

/// Returns the first calendar date found in `text`, if any.
pub fn first_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let cleaned = strip_ordinal_suffixes(trimmed);
    let head = RANGE_SEPARATOR_RE
        .split(&cleaned)
        .next()
        .unwrap_or(cleaned.as_str())
        .trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(head, format) {
            return Some(date);
        }
    }

    // Loose fallback: first "<day> <month> <year>" triple anywhere in the text
    let caps = DAY_MONTH_YEAR_RE.captures(&cleaned)?;
    let simple = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    match NaiveDate::parse_from_str(&simple, CANONICAL_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Could not parse date '{}': {}", text, e);
            None
        }
    }
}

/// Removes ordinal suffixes from day numbers and collapses whitespace.
pub fn strip_ordinal_suffixes(text: &str) -> String {
    let stripped = ORDINAL_SUFFIX_RE.replace_all(text, "$1");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_portal_format() {
        assert_eq!(first_date("Tuesday 24th February 2026"), Some(ymd(2026, 2, 24)));
        assert_eq!(first_date("Friday 30th January 2026"), Some(ymd(2026, 1, 30)));
        assert_eq!(first_date("Tuesday 24 February 2026"), Some(ymd(2026, 2, 24)));
    }

    #[test]
    fn test_ordinal_suffix_does_not_matter() {
        // March 2026: the 1st is a Sunday
        let weekdays = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
        for day in 1..=31u32 {
            let weekday = weekdays[((day - 1) % 7) as usize];
            let suffix = match day {
                1 | 21 | 31 => "st",
                2 | 22 => "nd",
                3 | 23 => "rd",
                _ => "th",
            };
            let bare = format!("{} {} March 2026", weekday, day);
            let suffixed = format!("{} {}{} March 2026", weekday, day, suffix);
            assert_eq!(parse_sort_date(&bare), parse_sort_date(&suffixed), "day {}", day);
            assert_eq!(parse_sort_date(&bare), SortDate::Date(ymd(2026, 3, day)));
        }
    }

    #[test]
    fn test_range_uses_first_date() {
        let text = "Monday 23rd February 2026 - Tuesday 24th February 2026";
        assert_eq!(first_date(text), Some(ymd(2026, 2, 23)));
    }

    #[test]
    fn test_wrong_weekday_falls_back_to_day_month_year() {
        // 24 February 2026 is a Tuesday; the weekday is ignored by the fallback
        assert_eq!(first_date("Monday 24th February 2026"), Some(ymd(2026, 2, 24)));
        assert_eq!(first_date("Starts 5th March 2026 at the venue"), Some(ymd(2026, 3, 5)));
    }

    #[test]
    fn test_abbreviated_names() {
        assert_eq!(first_date("Tue 24 Feb 2026"), Some(ymd(2026, 2, 24)));
    }

    #[test]
    fn test_unparseable_inputs_return_sentinel() {
        for text in ["", "   ", "TBA", "Coming soon", "31st February 2026", "24th Febtember 2026"] {
            assert_eq!(parse_sort_date(text), SortDate::Unparseable, "{:?}", text);
        }
    }

    #[test]
    fn test_unparseable_sorts_after_every_date() {
        let mut keys = vec![
            SortDate::Unparseable,
            SortDate::Date(ymd(2030, 12, 31)),
            SortDate::Date(ymd(2026, 1, 1)),
        ];
        keys.sort();
        assert_eq!(keys.last(), Some(&SortDate::Unparseable));
        assert!(SortDate::Date(NaiveDate::MAX) < SortDate::Unparseable);
    }
}
