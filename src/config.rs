use crate::constants::{
    DEFAULT_CHROME_ARGS, DEFAULT_START_URLS, DEFAULT_TARGET_TIMEZONE, DEFAULT_USER_AGENT,
    DEFAULT_WEBDRIVER_URL, MAX_COLUMN_WIDTH, WEBDRIVER_URL_ENV,
};
use crate::error::{Result, ScraperError};
use crate::normalize::location::AllowList;
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub start_urls: Vec<String>,
    pub browser: BrowserConfig,
    pub render: RenderConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub chrome_args: Vec<String>,
    pub user_agent: String,
}

/// Waits and iteration counts used while rendering pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub listing_settle_ms: u64,
    pub scroll_cycles: u32,
    pub scroll_wait_ms: u64,
    pub load_more_wait_ms: u64,
    pub scroll_top_wait_ms: u64,
    pub detail_settle_ms: u64,
    pub element_timeout_seconds: u64,
    pub debug_screenshot_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub discovery: AllowList,
    pub emission: AllowList,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub target_timezone: String,
    pub max_column_width: usize,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_urls: DEFAULT_START_URLS.iter().map(|s| s.to_string()).collect(),
            browser: BrowserConfig::default(),
            render: RenderConfig::default(),
            filter: FilterConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            chrome_args: DEFAULT_CHROME_ARGS.iter().map(|s| s.to_string()).collect(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            listing_settle_ms: 5_000,
            scroll_cycles: 5,
            scroll_wait_ms: 2_000,
            load_more_wait_ms: 2_000,
            scroll_top_wait_ms: 1_000,
            detail_settle_ms: 3_000,
            element_timeout_seconds: 20,
            debug_screenshot_dir: None,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            discovery: AllowList::Discovery,
            emission: AllowList::Emission,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            target_timezone: DEFAULT_TARGET_TIMEZONE.to_string(),
            max_column_width: MAX_COLUMN_WIDTH,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl RenderConfig {
    /// Settings with every wait set to zero; used where timing is irrelevant.
    pub fn immediate() -> Self {
        Self {
            listing_settle_ms: 0,
            scroll_wait_ms: 0,
            load_more_wait_ms: 0,
            scroll_top_wait_ms: 0,
            detail_settle_ms: 0,
            element_timeout_seconds: 0,
            ..Self::default()
        }
    }

    pub fn listing_settle(&self) -> Duration {
        Duration::from_millis(self.listing_settle_ms)
    }

    pub fn scroll_wait(&self) -> Duration {
        Duration::from_millis(self.scroll_wait_ms)
    }

    pub fn load_more_wait(&self) -> Duration {
        Duration::from_millis(self.load_more_wait_ms)
    }

    pub fn scroll_top_wait(&self) -> Duration {
        Duration::from_millis(self.scroll_top_wait_ms)
    }

    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_seconds)
    }
}

impl OutputConfig {
    pub fn target_tz(&self) -> Result<Tz> {
        self.target_timezone.parse::<Tz>().map_err(|e| {
            ScraperError::Config(format!(
                "Unknown target timezone '{}': {}",
                self.target_timezone, e
            ))
        })
    }
}

impl Config {
    /// Loads configuration from a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                ScraperError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            info!("Loaded configuration from {}", path.display());
            toml::from_str::<Config>(&content)?
        } else {
            debug!("No config file at {}; using defaults", path.display());
            Config::default()
        };

        if let Ok(url) = std::env::var(WEBDRIVER_URL_ENV) {
            if !url.trim().is_empty() {
                config.browser.webdriver_url = url.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start_urls.is_empty() {
            return Err(ScraperError::Config("start_urls must not be empty".into()));
        }
        if self.output.max_column_width == 0 {
            return Err(ScraperError::Config(
                "output.max_column_width must be positive".into(),
            ));
        }
        self.output.target_tz()?;
        Ok(())
    }
}
