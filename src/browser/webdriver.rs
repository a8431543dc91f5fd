use crate::browser::BrowserSession;
use crate::config::BrowserConfig;
use crate::error::Result;
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// A Chrome session driven over the WebDriver protocol.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Starts a new headless Chrome session. Failure here is fatal for a run.
    #[instrument(skip(config), fields(webdriver = %config.webdriver_url))]
    pub async fn connect(config: &BrowserConfig) -> Result<Self> {
        info!("Initializing Chrome driver...");

        let mut args = config.chrome_args.clone();
        args.push(format!("user-agent={}", config.user_agent));

        let mut capabilities = serde_json::Map::new();
        capabilities.insert("browserName".to_string(), json!("chrome"));
        capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": args }));

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(&config.webdriver_url)
            .await?;

        info!("Chrome driver initialized successfully");
        Ok(Self { client })
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn source(&mut self) -> Result<String> {
        Ok(self.client.source().await?)
    }

    async fn execute(&mut self, script: &str) -> Result<()> {
        self.client.execute(script, Vec::new()).await?;
        Ok(())
    }

    async fn click_visible(&mut self, xpath: &str) -> Result<bool> {
        let elements = self.client.find_all(Locator::XPath(xpath)).await?;
        for element in elements {
            if element.is_displayed().await? {
                element.click().await?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn wait_for(&mut self, css: &str, timeout: Duration) -> Result<bool> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(css))
            .await
        {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => {
                debug!("Timed out after {:?} waiting for {}", timeout, css);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>> {
        Ok(self.client.screenshot().await?)
    }

    async fn close(self) -> Result<()> {
        self.client.close().await?;
        info!("Chrome driver closed");
        Ok(())
    }
}
