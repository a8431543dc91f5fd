use crate::constants::{DISCOVERY_KEYWORDS, EMISSION_KEYWORDS};
use serde::Deserialize;

/// Keyword allow-list applied to free-text locations.
///
/// Two presets exist because the scraping stage and the spreadsheet stage
/// have always used different lists: discovery also admits Malaysia, emission
/// does not. Each stage picks its list from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowList {
    /// online, australia, new zealand, malaysia
    Discovery,
    /// new zealand, australia, online
    Emission,
    Custom(Vec<String>),
}

impl AllowList {
    pub fn keywords(&self) -> Vec<String> {
        match self {
            AllowList::Discovery => DISCOVERY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            AllowList::Emission => EMISSION_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            AllowList::Custom(keywords) => keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn filter(&self) -> LocationFilter {
        LocationFilter::new(self.keywords())
    }
}

/// Case-insensitive substring test against a fixed set of keywords.
#[derive(Debug, Clone)]
pub struct LocationFilter {
    keywords: Vec<String>,
}

impl LocationFilter {
    pub fn new(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn admits(&self, location_text: &str) -> bool {
        location_allowed(location_text, &self.keywords)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// True when the lowercased location contains at least one keyword.
/// Keywords are expected in lowercase.
pub fn location_allowed<S: AsRef<str>>(location_text: &str, keywords: &[S]) -> bool {
    let location = location_text.to_lowercase();
    keywords.iter().any(|k| location.contains(k.as_ref()))
}
