// PageHandle - The session's page, lent to page and component objects
//
// Cheap to clone: everything behind it is shared. Holders can navigate and
// query but cannot log out or close the tab; that belongs to `Session`.

use crate::config::{Config, Timeouts};
use crate::driver::{BrowserDriver, Locator, Selector, SelectorChain, WaitState};
use crate::error::{Error, Result};
use crate::poll::{self, PollOptions};
use crate::routes::Routes;
use crate::selectors::Selectors;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct PageHandle {
    driver: Arc<dyn BrowserDriver>,
    config: Arc<Config>,
    routes: Arc<Routes>,
    selectors: Arc<Selectors>,
}

impl PageHandle {
    pub fn new(driver: Arc<dyn BrowserDriver>, config: Arc<Config>) -> Self {
        Self {
            driver,
            config,
            routes: Arc::new(Routes::default()),
            selectors: Arc::new(Selectors::default()),
        }
    }

    pub fn with_routes(mut self, routes: Arc<Routes>) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_selectors(mut self, selectors: Arc<Selectors>) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.config.timeouts
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    pub(crate) fn driver(&self) -> &Arc<dyn BrowserDriver> {
        &self.driver
    }

    /// Creates a page-level locator.
    pub fn locator(&self, selector: Selector) -> Locator {
        self.locator_chain(SelectorChain::new(selector))
    }

    pub fn locator_chain(&self, chain: SelectorChain) -> Locator {
        Locator::new(Arc::clone(&self.driver), chain, self.config.timeouts.action)
    }

    /// Navigates to a route path under the configured base URL.
    pub async fn goto_path(&self, path: &str) -> Result<()> {
        let url = self.config.url_for(path)?;
        tracing::debug!(%url, "Navigating");
        self.driver
            .goto(url.as_str(), self.config.timeouts.navigation)
            .await
            .map_err(|e| e.context(format!("navigate to {}", path)))
    }

    pub async fn current_url(&self) -> Result<String> {
        self.driver.current_url().await
    }

    /// Probe: does the current URL match `pattern`?
    pub async fn url_matches(&self, pattern: &Regex) -> bool {
        match self.driver.current_url().await {
            Ok(url) => pattern.is_match(&url),
            Err(e) => {
                tracing::debug!("Probe url_matches failed: {}", e);
                false
            }
        }
    }

    /// Waits for the URL to match `pattern`, failing with `NavigationTimeout`.
    pub async fn wait_for_url(&self, pattern: &Regex, timeout: Duration) -> Result<()> {
        let reached = poll::poll_until(
            || self.url_matches(pattern),
            PollOptions::new(timeout, poll::WAIT_POLL_INTERVAL),
        )
        .await;
        if reached {
            return Ok(());
        }
        Err(Error::NavigationTimeout {
            expected: pattern.as_str().to_string(),
            actual: self.current_url().await.unwrap_or_default(),
            duration_ms: timeout.as_millis() as u64,
        })
    }

    pub async fn title(&self) -> Result<String> {
        self.driver.title().await
    }

    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        self.driver.screenshot().await
    }

    /// Waits for the loading spinner to go away.
    ///
    /// Opportunistic: if the spinner is still up after the probe budget the
    /// caller carries on and lets its own waits decide.
    pub async fn settle(&self) {
        let loader = self.locator(self.selectors.loader.clone());
        if let Err(e) = loader
            .wait_for(WaitState::Hidden, self.config.timeouts.probe)
            .await
        {
            tracing::debug!("Loader still visible: {}", e);
        }
    }
}
