// PlaywrightDriver - BrowserDriver backed by playwright-rs
//
// Launches one Chromium, one context (viewport from Config) and one page.
// Selector chains are rendered to Playwright's selector-engine syntax, so
// strictness, auto-waiting and actionability checks are Playwright's own.

use crate::config::Config;
use crate::driver::{BrowserDriver, SelectorChain};
use crate::error::Result;
use async_trait::async_trait;
use playwright_rs::api::LaunchOptions;
use playwright_rs::protocol::{
    Browser, BrowserContext, BrowserContextOptions, ClickOptions, FillOptions, GotoOptions, Page,
    Playwright, PressOptions, Viewport,
};
use std::time::Duration;

pub struct PlaywrightDriver {
    playwright: Playwright,
    browser: Browser,
    context: BrowserContext,
    page: Page,
}

impl PlaywrightDriver {
    /// Launches Chromium configured from `config`.
    pub async fn launch(config: &Config) -> Result<Self> {
        tracing::info!(headless = config.headless, "Launching Chromium");
        let playwright = Playwright::launch().await?;
        let browser = playwright
            .chromium()
            .launch_with_options(LaunchOptions::new().headless(config.headless))
            .await?;
        let context = browser
            .new_context_with_options(
                BrowserContextOptions::builder()
                    .viewport(Viewport {
                        width: config.viewport.width,
                        height: config.viewport.height,
                    })
                    .build(),
            )
            .await?;
        let page = context.new_page().await?;
        Ok(Self {
            playwright,
            browser,
            context,
            page,
        })
    }

    async fn locator(&self, selector: &SelectorChain) -> playwright_rs::protocol::Locator {
        self.page.locator(&selector.to_engine_string()).await
    }
}

fn millis(timeout: Duration) -> f64 {
    timeout.as_millis() as f64
}

#[async_trait]
impl BrowserDriver for PlaywrightDriver {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        self.page
            .goto(url, Some(GotoOptions::new().timeout(timeout)))
            .await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.page.title().await?)
    }

    async fn count(&self, selector: &SelectorChain) -> Result<usize> {
        Ok(self.locator(selector).await.count().await?)
    }

    async fn is_visible(&self, selector: &SelectorChain) -> Result<bool> {
        Ok(self.locator(selector).await.is_visible().await?)
    }

    async fn text_content(&self, selector: &SelectorChain) -> Result<Option<String>> {
        Ok(self.locator(selector).await.text_content().await?)
    }

    async fn input_value(&self, selector: &SelectorChain) -> Result<String> {
        Ok(self.locator(selector).await.input_value(None).await?)
    }

    async fn get_attribute(&self, selector: &SelectorChain, name: &str) -> Result<Option<String>> {
        Ok(self.locator(selector).await.get_attribute(name).await?)
    }

    async fn click(&self, selector: &SelectorChain, timeout: Duration) -> Result<()> {
        let options = ClickOptions::builder().timeout(millis(timeout)).build();
        Ok(self.locator(selector).await.click(Some(options)).await?)
    }

    async fn fill(&self, selector: &SelectorChain, value: &str, timeout: Duration) -> Result<()> {
        let options = FillOptions::builder().timeout(millis(timeout)).build();
        Ok(self.locator(selector).await.fill(value, Some(options)).await?)
    }

    async fn press(&self, selector: &SelectorChain, key: &str, timeout: Duration) -> Result<()> {
        let options = PressOptions::builder().timeout(millis(timeout)).build();
        Ok(self.locator(selector).await.press(key, Some(options)).await?)
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(self.page.screenshot(None).await?)
    }

    async fn close(&self) -> Result<()> {
        if let Err(e) = self.context.close().await {
            tracing::warn!("Failed to close browser context: {}", e);
        }
        self.browser.close().await?;
        self.playwright.shutdown().await?;
        Ok(())
    }
}
