//! Ordered selector strategies.
//!
//! Portal markup shifts between releases, so most lookups are expressed as a
//! list of `(selector, extractor)` pairs tried from most to least specific.
//! The first strategy whose extractor yields anything wins; later strategies
//! are never consulted and results are never merged.

use crate::error::{Result, ScraperError};
use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

pub type Extractor<T> = fn(ElementRef<'_>) -> Option<T>;

#[derive(Clone, Copy)]
pub struct SelectorStrategy<T> {
    pub selector: &'static str,
    pub extract: Extractor<T>,
}

impl<T> SelectorStrategy<T> {
    pub const fn new(selector: &'static str, extract: Extractor<T>) -> Self {
        Self { selector, extract }
    }
}

/// Values produced by the winning strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyMatch<T> {
    pub selector: &'static str,
    pub values: Vec<T>,
}

/// Runs `strategies` in order under `root` and returns the values of the
/// first one that extracted at least one value. Invalid selectors are logged
/// and skipped.
pub fn first_success<T>(
    root: ElementRef<'_>,
    strategies: &[SelectorStrategy<T>],
) -> Option<StrategyMatch<T>> {
    for strategy in strategies {
        let selector = match parse_selector(strategy.selector) {
            Ok(s) => s,
            Err(e) => {
                warn!("Skipping strategy: {}", e);
                continue;
            }
        };

        let values: Vec<T> = root.select(&selector).filter_map(strategy.extract).collect();
        if !values.is_empty() {
            debug!("Selector '{}' yielded {} values", strategy.selector, values.len());
            return Some(StrategyMatch {
                selector: strategy.selector,
                values,
            });
        }
    }
    None
}

/// Like [`first_success`] but keeps only the first value.
pub fn first_value<T>(root: ElementRef<'_>, strategies: &[SelectorStrategy<T>]) -> Option<T> {
    first_success(root, strategies).and_then(|m| m.values.into_iter().next())
}

pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Text nodes that are direct children of `element`, trimmed and joined.
pub fn own_text(element: ElementRef<'_>) -> Option<String> {
    let parts: Vec<&str> = element
        .children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .collect();
    non_empty(parts.join(" "))
}

/// Every descendant text node, trimmed, empties dropped, joined by one space.
pub fn normalized_text(element: ElementRef<'_>) -> Option<String> {
    let parts: Vec<&str> = element
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect();
    non_empty(parts.join(" "))
}

pub fn href(element: ElementRef<'_>) -> Option<String> {
    element
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
