/// Constants shared across the scraping and normalization stages.
/// Selectors and keywords mirror the markup of the events portal.

// Listing pages scraped by default: virtual events plus the AU and NZ regions
pub const DEFAULT_START_URLS: &[&str] = &[
    "https://aws-experience.com/apj/smb/events?location=virtual",
    "https://aws-experience.com/apj/smb/events?location=AU",
    "https://aws-experience.com/apj/smb/events?location=NZ",
];

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const WEBDRIVER_URL_ENV: &str = "EVENTS_WEBDRIVER_URL";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_CHROME_ARGS: &[&str] = &[
    "--headless",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--window-size=1920,1080",
    "--disable-blink-features=AutomationControlled",
];

// Listing page rendering
pub const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";
pub const SCROLL_TO_TOP_SCRIPT: &str = "window.scrollTo(0, 0);";
pub const LOAD_MORE_XPATH: &str =
    "//button[contains(text(), 'Load More') or contains(text(), 'Show More')]";

// Link discovery, most specific first
pub const EVENT_LINK_SELECTORS: &[&str] = &[
    "a[href*='/apj/smb/e/']",
    "a[href*='/e/']",
    "a[href*='event']",
];
pub const EVENT_PATH_FRAGMENT: &str = "/e/";
pub const EVENT_KEYWORD: &str = "event";

// Detail page markup
pub const EVENT_NAME_SELECTOR: &str = "h1";
pub const EVENT_NAME_FALLBACK_SELECTOR: &str = "h1[class*='Heading']";
pub const INFO_ENTRY_SELECTOR: &str = "div[class*='BannerInformationEntry']";
pub const INFO_ENTRY_HEADING_SELECTOR: &str = "span[class*='BannerInformationEntryHeading']";
pub const INFO_ENTRY_VALUE_SELECTOR: &str = "div[class*='BannerInformationEntryValueContainer']";

// Location allow-lists. Discovery keeps Malaysia, emission does not.
pub const DISCOVERY_KEYWORDS: &[&str] = &["online", "australia", "new zealand", "malaysia"];
pub const EMISSION_KEYWORDS: &[&str] = &["new zealand", "australia", "online"];

// Output
pub const DEFAULT_TARGET_TIMEZONE: &str = "Pacific/Auckland";
pub const SHEET_NAME: &str = "Events";
pub const LINK_COLUMN_HEADER: &str = "Event Link";
pub const LINK_LABEL: &str = "Register Here";
pub const LINK_COLOR: u32 = 0x0563C1;
pub const MAX_COLUMN_WIDTH: usize = 50;
pub const COLUMN_PADDING: usize = 2;
pub const OUTPUT_FILE_PREFIX: &str = "aws_events";
