use serde::{Deserialize, Serialize};

/// One event as scraped from a detail page.
///
/// All fields except `registration_url` are free text copied from the page.
/// The serialized names are the interchange format shared with the
/// normalization stage (`event_name, date, time, location, registration_url`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEventRecord {
    #[serde(default)]
    pub event_name: String,
    #[serde(rename = "date", default)]
    pub date_text: String,
    #[serde(rename = "time", default)]
    pub time_text: String,
    #[serde(rename = "location", default)]
    pub location_text: String,
    #[serde(default)]
    pub registration_url: String,
}

impl RawEventRecord {
    /// A record with every field empty except its URL, used when a page
    /// could not be parsed.
    pub fn empty(registration_url: &str) -> Self {
        Self {
            registration_url: registration_url.to_string(),
            ..Self::default()
        }
    }

    pub fn has_name(&self) -> bool {
        !self.event_name.trim().is_empty()
    }

    /// Identity used for deduplication, taken before any normalization.
    pub fn dedup_key(&self) -> (&str, &str, &str, &str) {
        (
            &self.event_name,
            &self.location_text,
            &self.date_text,
            &self.time_text,
        )
    }
}
