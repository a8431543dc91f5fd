use crate::browser::BrowserSession;
use crate::config::RenderConfig;
use crate::constants::{
    INFO_ENTRY_SELECTOR, LOAD_MORE_XPATH, SCROLL_TO_BOTTOM_SCRIPT, SCROLL_TO_TOP_SCRIPT,
};
use metrics::{counter, histogram};
use std::path::PathBuf;
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Renders pages through a borrowed browser session.
///
/// Rendering never fails: navigation or lookup errors are logged and the best
/// snapshot available is returned, which may be an empty document. A page whose
/// navigation failed always yields an empty document, never the DOM of
/// whatever page the browser still shows.
pub struct PageRenderer<'a, S: BrowserSession> {
    session: &'a mut S,
    settings: &'a RenderConfig,
}

impl<'a, S: BrowserSession> PageRenderer<'a, S> {
    pub fn new(session: &'a mut S, settings: &'a RenderConfig) -> Self {
        Self { session, settings }
    }

    /// Loads a listing page and drives lazy loading with a fixed number of
    /// scroll cycles, clicking any visible "load more" control on the way.
    #[instrument(skip(self))]
    pub async fn render_listing(&mut self, url: &str) -> String {
        let started = Instant::now();
        counter!("events_pages_rendered_total", "kind" => "listing").increment(1);

        if let Err(e) = self.session.goto(url).await {
            warn!("Error loading listing page {}: {}", url, e);
            counter!("events_render_failures_total", "kind" => "listing").increment(1);
            return String::new();
        }
        info!("Page loaded");
        sleep(self.settings.listing_settle()).await;

        for cycle in 1..=self.settings.scroll_cycles {
            if let Err(e) = self.session.execute(SCROLL_TO_BOTTOM_SCRIPT).await {
                warn!("Scroll cycle {} failed on {}: {}", cycle, url, e);
            }
            sleep(self.settings.scroll_wait()).await;

            match self.session.click_visible(LOAD_MORE_XPATH).await {
                Ok(true) => {
                    info!("Clicking 'Load More' button (cycle {})", cycle);
                    sleep(self.settings.load_more_wait()).await;
                }
                Ok(false) => {}
                Err(e) => debug!("No load-more control on cycle {}: {}", cycle, e),
            }
        }

        if let Err(e) = self.session.execute(SCROLL_TO_TOP_SCRIPT).await {
            debug!("Could not scroll back to top: {}", e);
        }
        sleep(self.settings.scroll_top_wait()).await;

        let html = self.snapshot(url).await;
        histogram!("events_render_duration_seconds", "kind" => "listing")
            .record(started.elapsed().as_secs_f64());
        info!("Page source length: {} characters", html.len());
        html
    }

    /// Loads an event detail page and waits, bounded, for its information
    /// entries. A timeout is not an error; whatever rendered is returned.
    #[instrument(skip(self))]
    pub async fn render_detail(&mut self, url: &str) -> String {
        let started = Instant::now();
        counter!("events_pages_rendered_total", "kind" => "detail").increment(1);

        if let Err(e) = self.session.goto(url).await {
            warn!("Error loading event page {}: {}", url, e);
            counter!("events_render_failures_total", "kind" => "detail").increment(1);
            return String::new();
        }
        sleep(self.settings.detail_settle()).await;

        match self
            .session
            .wait_for(INFO_ENTRY_SELECTOR, self.settings.element_timeout())
            .await
        {
            Ok(true) => {}
            Ok(false) => warn!("Timeout loading event content on {}", url),
            Err(e) => warn!("Error waiting for event content on {}: {}", url, e),
        }

        let html = self.snapshot(url).await;
        histogram!("events_render_duration_seconds", "kind" => "detail")
            .record(started.elapsed().as_secs_f64());
        html
    }

    /// Saves a screenshot of the current page when a debug directory is
    /// configured. Returns the written path.
    pub async fn save_debug_screenshot(&mut self, url: &str) -> Option<PathBuf> {
        let dir = self.settings.debug_screenshot_dir.as_ref()?;
        let png = match self.session.screenshot().await {
            Ok(png) => png,
            Err(e) => {
                debug!("Screenshot failed for {}: {}", url, e);
                return None;
            }
        };

        let path = dir.join(screenshot_name(url));
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            debug!("Could not create {}: {}", dir.display(), e);
            return None;
        }
        match tokio::fs::write(&path, png).await {
            Ok(()) => {
                info!("Saved debug screenshot to {}", path.display());
                Some(path)
            }
            Err(e) => {
                debug!("Could not write {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn snapshot(&mut self, url: &str) -> String {
        match self.session.source().await {
            Ok(html) => html,
            Err(e) => {
                warn!("Could not read page source for {}: {}", url, e);
                String::new()
            }
        }
    }
}

/// `debug_screenshot_<last query value>.png`, e.g. `debug_screenshot_NZ.png`.
fn screenshot_name(url: &str) -> String {
    let tag: String = url
        .rsplit('=')
        .next()
        .unwrap_or(url)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("debug_screenshot_{}.png", tag)
}
