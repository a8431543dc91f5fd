use crate::constants::{EVENT_KEYWORD, EVENT_LINK_SELECTORS, EVENT_PATH_FRAGMENT};
use crate::parser::strategy::{first_success, href, SelectorStrategy};
use scraper::Html;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};
use url::Url;

/// Finds event detail URLs on a rendered listing page.
///
/// Returns absolute URLs, deduplicated. An empty set means the page had no
/// recognizable event links; it is not an error.
pub fn discover_links(html: &str, page_url: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let strategies: Vec<SelectorStrategy<String>> = EVENT_LINK_SELECTORS
        .iter()
        .map(|selector| SelectorStrategy::new(*selector, href))
        .collect();

    let Some(found) = first_success(document.root_element(), &strategies) else {
        warn!("No event links found on {}", page_url);
        return BTreeSet::new();
    };
    info!(
        "Found {} links with selector: {}",
        found.values.len(),
        found.selector
    );

    let base = Url::parse(page_url).ok();
    let links: BTreeSet<String> = found
        .values
        .iter()
        .filter_map(|raw| resolve(base.as_ref(), raw))
        .filter(|url| looks_like_event(url))
        .map(String::from)
        .collect();

    info!("Found {} unique event links on {}", links.len(), page_url);
    links
}

fn resolve(base: Option<&Url>, raw: &str) -> Option<Url> {
    let resolved = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };
    match resolved {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        Ok(url) => {
            debug!("Ignoring non-web link {}", url);
            None
        }
        Err(e) => {
            debug!("Ignoring unresolvable link '{}': {}", raw, e);
            None
        }
    }
}

/// The path (or query) must point at an event, not just the host.
fn looks_like_event(url: &Url) -> bool {
    let path = url.path();
    if path.contains(EVENT_PATH_FRAGMENT) {
        return true;
    }
    let tail = format!("{}?{}", path, url.query().unwrap_or_default()).to_lowercase();
    tail.contains(EVENT_KEYWORD)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_URL: &str = "https://aws-experience.com/apj/smb/events?location=NZ";

    #[test]
    fn test_most_specific_selector_short_circuits() {
        let html = r#"
            <div>
                <a href="/apj/smb/e/a1b2c3/cloud-day">Cloud Day</a>
                <a href="https://aws-experience.com/apj/smb/e/d4e5f6/gen-ai">GenAI</a>
                <a href="/other/e/zzz">Other region</a>
                <a href="/apj/smb/events?location=AU">Australia</a>
            </div>
        "#;
        let links = discover_links(html, LISTING_URL);
        let expected: BTreeSet<String> = [
            "https://aws-experience.com/apj/smb/e/a1b2c3/cloud-day",
            "https://aws-experience.com/apj/smb/e/d4e5f6/gen-ai",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(links, expected);
    }

    #[test]
    fn test_falls_back_to_generic_event_links() {
        let html = r#"
            <a href="/community/events/meetup-42">Meetup</a>
            <a href="/community/events/meetup-42">Meetup again</a>
        "#;
        let links = discover_links(html, LISTING_URL);
        assert_eq!(links.len(), 1);
        assert!(links.contains("https://aws-experience.com/community/events/meetup-42"));
    }

    #[test]
    fn test_no_matching_links_is_empty_not_error() {
        let html = r#"<a href="/about">About</a><p>No events right now</p>"#;
        assert!(discover_links(html, LISTING_URL).is_empty());
        assert!(discover_links("", LISTING_URL).is_empty());
    }

    #[test]
    fn test_non_web_links_are_skipped() {
        let html = r#"
            <a href="mailto:events@example.com">Mail</a>
            <a href="javascript:openEvent()">Script</a>
        "#;
        assert!(discover_links(html, LISTING_URL).is_empty());
    }

    #[test]
    fn test_host_alone_does_not_qualify() {
        let html = r#"<a href="https://events.example.com/pricing?ref=event-banner-x">Pricing</a>"#;
        assert_eq!(discover_links(html, LISTING_URL).len(), 1);

        let html = r#"<a href="https://myevent.example.com/pricing">Pricing</a>"#;
        assert!(discover_links(html, LISTING_URL).is_empty());
    }
}
