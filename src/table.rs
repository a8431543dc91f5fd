use crate::normalize::date::parse_sort_date;
use crate::normalize::location::LocationFilter;
use crate::normalize::time::TimeZoneNormalizer;
use crate::types::RawEventRecord;
use std::collections::HashSet;
use tracing::{debug, info};

/// Output columns, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    EventName,
    Date,
    Time,
    Location,
    RegistrationUrl,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::EventName,
        Column::Date,
        Column::Time,
        Column::Location,
        Column::RegistrationUrl,
    ];

    /// Field name in the interchange format.
    pub fn field_name(&self) -> &'static str {
        match self {
            Column::EventName => "event_name",
            Column::Date => "date",
            Column::Time => "time",
            Column::Location => "location",
            Column::RegistrationUrl => "registration_url",
        }
    }

    pub fn header(&self) -> String {
        match self {
            Column::RegistrationUrl => crate::constants::LINK_COLUMN_HEADER.to_string(),
            other => humanize(other.field_name()),
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Column::RegistrationUrl)
    }
}

/// `event_name` -> `Event Name`
pub fn humanize(field: &str) -> String {
    field
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// One output row: the record as scraped plus its normalized time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub record: RawEventRecord,
    pub normalized_time: String,
}

impl EventRow {
    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::EventName => &self.record.event_name,
            Column::Date => &self.record.date_text,
            Column::Time => &self.normalized_time,
            Column::Location => &self.record.location_text,
            Column::RegistrationUrl => &self.record.registration_url,
        }
    }
}

/// Deduplicated, date-ordered rows ready for emission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTable {
    rows: Vec<EventRow>,
}

impl EventTable {
    /// Filters, deduplicates, sorts and normalizes `records`.
    pub fn build(
        records: Vec<RawEventRecord>,
        filter: &LocationFilter,
        normalizer: &TimeZoneNormalizer,
    ) -> Self {
        let total = records.len();
        let admitted: Vec<RawEventRecord> = records
            .into_iter()
            .filter(|r| r.has_name())
            .filter(|r| {
                let keep = filter.admits(&r.location_text);
                if !keep {
                    debug!("Dropping '{}' (location filter): {}", r.event_name, r.location_text);
                }
                keep
            })
            .collect();
        let admitted_count = admitted.len();

        let rows: Vec<EventRow> = dedup_and_sort(admitted)
            .into_iter()
            .map(|record| {
                let normalized_time = normalizer.normalize(&record.time_text, &record.date_text);
                EventRow {
                    record,
                    normalized_time,
                }
            })
            .collect();

        info!(
            "Built table: {} records in, {} admitted, {} rows after deduplication",
            total,
            admitted_count,
            rows.len()
        );
        Self { rows }
    }

    pub fn rows(&self) -> &[EventRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> Vec<String> {
        Column::ALL.iter().map(Column::header).collect()
    }
}

/// Removes exact duplicates on (name, location, date, time); first wins.
pub fn dedup_records(records: Vec<RawEventRecord>) -> Vec<RawEventRecord> {
    let mut seen: HashSet<(String, String, String, String)> = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let (name, location, date, time) = r.dedup_key();
            seen.insert((
                name.to_string(),
                location.to_string(),
                date.to_string(),
                time.to_string(),
            ))
        })
        .collect()
}

/// Stable ascending sort by parsed date; unparseable dates go last.
pub fn sort_by_date(records: &mut [RawEventRecord]) {
    records.sort_by_key(|r| parse_sort_date(&r.date_text));
}

pub fn dedup_and_sort(records: Vec<RawEventRecord>) -> Vec<RawEventRecord> {
    let mut records = dedup_records(records);
    sort_by_date(&mut records);
    records
}
