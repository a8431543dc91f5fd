use crate::browser::{BrowserSession, WebDriverSession};
use crate::config::Config;
use crate::error::Result;
use crate::normalize::time::TimeZoneNormalizer;
use crate::parser::{discover_links, extract_event};
use crate::render::PageRenderer;
use crate::spreadsheet::SpreadsheetEmitter;
use crate::table::EventTable;
use crate::types::RawEventRecord;
use metrics::counter;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Counters for one harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestStats {
    pub listings: usize,
    pub links: usize,
    pub pages: usize,
    pub admitted: usize,
    pub rejected_location: usize,
    pub nameless: usize,
}

#[derive(Debug, Clone, Default)]
pub struct HarvestOutcome {
    pub records: Vec<RawEventRecord>,
    pub stats: HarvestStats,
}

/// Owns the browser session for the lifetime of a run.
pub struct Pipeline<S: BrowserSession> {
    session: S,
    config: Config,
}

impl<S: BrowserSession> Pipeline<S> {
    pub fn new(session: S, config: Config) -> Self {
        Self { session, config }
    }

    /// Harvests every start URL, then closes the session. The session is
    /// consumed here, so it is released exactly once whatever happened
    /// while rendering.
    pub async fn run(self) -> HarvestOutcome {
        let Pipeline {
            mut session,
            config,
        } = self;

        let outcome = harvest(&mut session, &config).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }
        outcome
    }
}

/// Starts a WebDriver session and runs the extraction stage with it.
/// Only a failure to start the session is reported as an error.
pub async fn scrape(config: &Config) -> Result<HarvestOutcome> {
    let session = WebDriverSession::connect(&config.browser).await?;
    Ok(Pipeline::new(session, config.clone()).run().await)
}

/// Extraction stage: listing pages → event links → detail pages → records
/// admitted by the discovery allow-list.
#[instrument(skip_all, fields(start_urls = config.start_urls.len()))]
pub async fn harvest<S: BrowserSession>(session: &mut S, config: &Config) -> HarvestOutcome {
    let started = Instant::now();
    let filter = config.filter.discovery.filter();
    let mut renderer = PageRenderer::new(session, &config.render);

    let mut records = Vec::new();
    let mut stats = HarvestStats::default();
    let mut visited: HashSet<String> = HashSet::new();

    for start_url in &config.start_urls {
        stats.listings += 1;
        info!("Parsing URL: {}", start_url);

        let listing = renderer.render_listing(start_url).await;
        let links = discover_links(&listing, start_url);
        if links.is_empty() {
            renderer.save_debug_screenshot(start_url).await;
            continue;
        }
        stats.links += links.len();

        for link in links {
            if !visited.insert(link.clone()) {
                debug!("Already scraped {}", link);
                continue;
            }

            info!("Loading event page: {}", link);
            let detail = renderer.render_detail(&link).await;
            stats.pages += 1;

            let record = extract_event(&detail, &link);
            if !record.has_name() {
                warn!("Skipping event with no name: {}", link);
                stats.nameless += 1;
                continue;
            }

            if filter.admits(&record.location_text) {
                info!("Yielding event: {} ({})", record.event_name, record.location_text);
                counter!("events_records_admitted_total").increment(1);
                stats.admitted += 1;
                records.push(record);
            } else {
                info!(
                    "Skipping event (location filter): {} ({})",
                    record.event_name, record.location_text
                );
                counter!("events_records_rejected_total").increment(1);
                stats.rejected_location += 1;
            }
        }
    }

    info!(
        "Harvest finished in {:.1}s: {} listings, {} links, {} pages, {} admitted, {} rejected, {} without name",
        started.elapsed().as_secs_f64(),
        stats.listings,
        stats.links,
        stats.pages,
        stats.admitted,
        stats.rejected_location,
        stats.nameless
    );

    HarvestOutcome { records, stats }
}

/// Normalization stage: emission allow-list, deduplication, date ordering
/// and time conversion.
pub fn build_table(records: Vec<RawEventRecord>, config: &Config) -> Result<EventTable> {
    let normalizer = TimeZoneNormalizer::new(config.output.target_tz()?);
    let filter = config.filter.emission.filter();
    Ok(EventTable::build(records, &filter, &normalizer))
}

/// Normalization plus emission, returning xlsx bytes.
pub fn emit(records: Vec<RawEventRecord>, config: &Config) -> Result<Vec<u8>> {
    let table = build_table(records, config)?;
    SpreadsheetEmitter::new(config.output.max_column_width).render(&table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::ScriptedSession;
    use crate::config::RenderConfig;

    const VIRTUAL: &str = "https://aws-experience.com/apj/smb/events?location=virtual";
    const NZ: &str = "https://aws-experience.com/apj/smb/events?location=NZ";

    fn detail_page(name: &str, date: &str, time: &str, location: &str) -> String {
        let entry = |heading: &str, value: &str| {
            format!(
                r#"<div class="BannerInformationEntry"><span class="BannerInformationEntryHeading">{}</span><div class="BannerInformationEntryValueContainer">{}</div></div>"#,
                heading, value
            )
        };
        format!(
            "<html><body><h1>{}</h1>{}{}{}</body></html>",
            name,
            entry("Date", date),
            entry("Time", time),
            entry("Location", location)
        )
    }

    fn config(start_urls: &[&str]) -> Config {
        Config {
            start_urls: start_urls.iter().map(|s| s.to_string()).collect(),
            render: RenderConfig::immediate(),
            ..Config::default()
        }
    }

    fn url(path: &str) -> String {
        format!("https://aws-experience.com{}", path)
    }

    #[tokio::test]
    async fn test_run_harvests_filters_and_closes_once() {
        let session = ScriptedSession::new()
            .with_page(
                VIRTUAL,
                r#"<a href="/apj/smb/e/online-1">A</a><a href="/apj/smb/e/kl-1">B</a>"#,
            )
            .with_page(NZ, r#"<a href="/apj/smb/e/online-1">A again</a><a href="/apj/smb/e/sg-1">C</a>"#)
            .with_page(
                &url("/apj/smb/e/online-1"),
                &detail_page("Online Builders", "Tuesday 17th February 2026", "08:30 - 10:30 GMT+13", "Online"),
            )
            .with_page(
                &url("/apj/smb/e/kl-1"),
                &detail_page("KL Summit", "Friday 30th January 2026", "14:00 - 21:30", "Malaysia - KUL"),
            )
            .with_page(
                &url("/apj/smb/e/sg-1"),
                &detail_page("Singapore Day", "Friday 30th January 2026", "14:00 - 21:30", "Singapore"),
            );
        let log = session.call_log();

        let outcome = Pipeline::new(session, config(&[VIRTUAL, NZ])).run().await;

        let names: Vec<&str> = outcome.records.iter().map(|r| r.event_name.as_str()).collect();
        assert_eq!(names, vec!["KL Summit", "Online Builders"]);
        assert_eq!(
            outcome.stats,
            HarvestStats {
                listings: 2,
                links: 4,
                pages: 3,
                admitted: 2,
                rejected_location: 1,
                nameless: 0,
            }
        );

        let calls = log.lock().unwrap().clone();
        assert_eq!(calls.iter().filter(|c| *c == "close").count(), 1);
        assert_eq!(calls.last().map(String::as_str), Some("close"));
    }

    #[tokio::test]
    async fn test_failing_pages_do_not_abort_the_run() {
        let session = ScriptedSession::new()
            .failing(VIRTUAL)
            .with_page(NZ, r#"<a href="/apj/smb/e/broken">X</a><a href="/apj/smb/e/ok">Y</a>"#)
            .failing(&url("/apj/smb/e/broken"))
            .with_page(
                &url("/apj/smb/e/ok"),
                &detail_page("Auckland Day", "Tuesday 24th February 2026", "12:00 - 16:00 GMT+13", "New Zealand - Auckland"),
            );
        let log = session.call_log();

        let outcome = Pipeline::new(session, config(&[VIRTUAL, NZ])).run().await;

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].event_name, "Auckland Day");
        assert_eq!(outcome.stats.nameless, 1);
        let calls = log.lock().unwrap().clone();
        assert_eq!(calls.iter().filter(|c| *c == "close").count(), 1);
    }

    #[tokio::test]
    async fn test_failed_detail_never_reuses_previous_page() {
        let session = ScriptedSession::new()
            .with_page(NZ, r#"<a href="/apj/smb/e/a">A</a><a href="/apj/smb/e/broken">B</a>"#)
            .with_page(
                &url("/apj/smb/e/a"),
                &detail_page("Real Event A", "Tuesday 24th February 2026", "12:00 - 16:00 GMT+13", "New Zealand - Auckland"),
            )
            .failing(&url("/apj/smb/e/broken"));

        let outcome = Pipeline::new(session, config(&[NZ])).run().await;

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].registration_url, url("/apj/smb/e/a"));
        assert_eq!(outcome.stats.pages, 2);
        assert_eq!(outcome.stats.nameless, 1);
    }

    #[tokio::test]
    async fn test_zero_events_is_a_normal_outcome() {
        let session = ScriptedSession::new().with_page(NZ, "<p>Nothing scheduled</p>");
        let outcome = Pipeline::new(session, config(&[NZ])).run().await;
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stats.listings, 1);
        assert_eq!(outcome.stats.pages, 0);
    }

    #[test]
    fn test_build_table_uses_emission_list() {
        let records = vec![
            RawEventRecord {
                event_name: "KL Summit".to_string(),
                date_text: "Friday 30th January 2026".to_string(),
                time_text: "14:00 - 21:30".to_string(),
                location_text: "Malaysia - KUL".to_string(),
                registration_url: url("/apj/smb/e/kl-1"),
            },
            RawEventRecord {
                event_name: "Online Builders".to_string(),
                date_text: "Tuesday 17th February 2026".to_string(),
                time_text: "08:30 - 10:30 GMT+13".to_string(),
                location_text: "Online".to_string(),
                registration_url: url("/apj/smb/e/online-1"),
            },
        ];
        let table = build_table(records, &Config::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].normalized_time, "08:30 - 10:30 NZDT");
    }
}
