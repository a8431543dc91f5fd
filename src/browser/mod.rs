//! Boundary to the browser-automation driver.
//!
//! The pipeline only needs a handful of driver capabilities; they are
//! collected in [`BrowserSession`] so rendering can be exercised without a
//! real browser. [`webdriver::WebDriverSession`] is the production
//! implementation.

pub mod webdriver;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub use webdriver::WebDriverSession;

#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates the session to `url`.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// The current rendered DOM as HTML.
    async fn source(&mut self) -> Result<String>;

    async fn execute(&mut self, script: &str) -> Result<()>;

    /// Finds elements by XPath and clicks the first one that is displayed.
    /// Returns whether anything was clicked.
    async fn click_visible(&mut self, xpath: &str) -> Result<bool>;

    /// Waits up to `timeout` for an element matching the CSS selector.
    /// Returns `false` on timeout.
    async fn wait_for(&mut self, css: &str, timeout: Duration) -> Result<bool>;

    /// PNG screenshot of the current viewport.
    async fn screenshot(&mut self) -> Result<Vec<u8>>;

    /// Ends the session. Consumes it, so it can only happen once.
    async fn close(self) -> Result<()>
    where
        Self: Sized;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::ScraperError;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    /// A session that serves canned HTML and records every call.
    #[derive(Default)]
    pub struct ScriptedSession {
        pages: HashMap<String, String>,
        failing: HashSet<String>,
        load_more_clicks: usize,
        element_present: bool,
        current: Option<String>,
        pub calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedSession {
        pub fn new() -> Self {
            Self {
                element_present: true,
                ..Self::default()
            }
        }

        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }

        /// Navigation to `url` fails.
        pub fn failing(mut self, url: &str) -> Self {
            self.failing.insert(url.to_string());
            self
        }

        /// A visible "load more" button is present for this many lookups.
        pub fn with_load_more(mut self, clicks: usize) -> Self {
            self.load_more_clicks = clicks;
            self
        }

        pub fn without_info_entries(mut self) -> Self {
            self.element_present = false;
            self
        }

        pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.calls)
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl BrowserSession for ScriptedSession {
        async fn goto(&mut self, url: &str) -> Result<()> {
            self.record(format!("goto {}", url));
            if self.failing.contains(url) {
                // a real browser keeps showing the previous page
                return Err(ScraperError::Config(format!("navigation to {} failed", url)));
            }
            self.current = Some(url.to_string());
            Ok(())
        }

        async fn source(&mut self) -> Result<String> {
            self.record("source".to_string());
            Ok(self
                .current
                .as_ref()
                .and_then(|url| self.pages.get(url))
                .cloned()
                .unwrap_or_else(|| "<html><head></head><body></body></html>".to_string()))
        }

        async fn execute(&mut self, script: &str) -> Result<()> {
            self.record(format!("execute {}", script));
            Ok(())
        }

        async fn click_visible(&mut self, _xpath: &str) -> Result<bool> {
            self.record("click_visible".to_string());
            if self.load_more_clicks > 0 {
                self.load_more_clicks -= 1;
                Ok(true)
            } else {
                Ok(false)
            }
        }

        async fn wait_for(&mut self, css: &str, _timeout: Duration) -> Result<bool> {
            self.record(format!("wait_for {}", css));
            Ok(self.element_present)
        }

        async fn screenshot(&mut self) -> Result<Vec<u8>> {
            self.record("screenshot".to_string());
            Ok(b"\x89PNG".to_vec())
        }

        async fn close(self) -> Result<()> {
            self.record("close".to_string());
            Ok(())
        }
    }
}
