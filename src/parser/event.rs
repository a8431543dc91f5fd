use crate::constants::{
    EVENT_NAME_FALLBACK_SELECTOR, EVENT_NAME_SELECTOR, INFO_ENTRY_HEADING_SELECTOR,
    INFO_ENTRY_SELECTOR, INFO_ENTRY_VALUE_SELECTOR,
};
use crate::error::Result;
use crate::parser::strategy::{first_value, normalized_text, own_text, parse_selector, SelectorStrategy};
use crate::types::RawEventRecord;
use scraper::Html;
use tracing::{debug, warn};

const NAME_STRATEGIES: &[SelectorStrategy<String>] = &[
    SelectorStrategy::new(EVENT_NAME_SELECTOR, own_text),
    SelectorStrategy::new(EVENT_NAME_FALLBACK_SELECTOR, normalized_text),
];

/// Which record field an information entry fills, by its heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoField {
    Location,
    Date,
    Time,
}

impl InfoField {
    fn from_heading(heading: &str) -> Option<Self> {
        let heading = heading.to_lowercase();
        if heading.contains("location") {
            Some(InfoField::Location)
        } else if heading.contains("date") {
            Some(InfoField::Date)
        } else if heading.contains("time") {
            Some(InfoField::Time)
        } else {
            None
        }
    }
}

/// Extracts an event from a rendered detail page.
///
/// Never fails: if the page cannot be read at all the result is an empty
/// record carrying only `registration_url`.
pub fn extract_event(html: &str, registration_url: &str) -> RawEventRecord {
    match try_extract_event(html, registration_url) {
        Ok(record) => record,
        Err(e) => {
            warn!("Error parsing event {}: {}", registration_url, e);
            RawEventRecord::empty(registration_url)
        }
    }
}

fn try_extract_event(html: &str, registration_url: &str) -> Result<RawEventRecord> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut record = RawEventRecord::empty(registration_url);
    record.event_name = first_value(root, NAME_STRATEGIES).unwrap_or_default();

    let entry_selector = parse_selector(INFO_ENTRY_SELECTOR)?;
    let heading_selector = parse_selector(INFO_ENTRY_HEADING_SELECTOR)?;
    let value_selector = parse_selector(INFO_ENTRY_VALUE_SELECTOR)?;

    for entry in root.select(&entry_selector) {
        // Value containers match the entry selector too; they carry no heading
        let Some(heading) = entry.select(&heading_selector).next().and_then(normalized_text) else {
            continue;
        };
        let value = entry
            .select(&value_selector)
            .filter_map(normalized_text)
            .collect::<Vec<_>>()
            .join(" ");
        if value.is_empty() {
            continue;
        }

        match InfoField::from_heading(&heading) {
            Some(InfoField::Location) => record.location_text = value,
            Some(InfoField::Date) => record.date_text = value,
            Some(InfoField::Time) => record.time_text = value,
            None => debug!("Ignoring information entry '{}'", heading),
        }
    }

    Ok(record)
}
