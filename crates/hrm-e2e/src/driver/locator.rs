// Locator - Lazy element selector with probe/action split
//
// Locators don't touch the browser until an operation runs. Operations come
// in two named categories:
//
// - Probes (`is_visible`, `count`, `text`, `all_texts`, `value`, `attribute`,
//   `exists`): speculative questions about the current DOM. They never fail;
//   any driver error degrades to false/empty and is logged at debug level.
// - Actions (`click`, `fill`, `clear_and_fill`, `press`, `wait_for`): they
//   change or wait on the page and propagate errors to the caller.
//
// Callers choose the category by choosing the method, so there is no
// per-call-site error swallowing anywhere above this layer.

use crate::driver::{BrowserDriver, Selector, SelectorChain, Step};
use crate::error::{Error, Result};
use crate::poll::{self, PollOptions};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Element state to wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    /// At least one match and the first is visible
    Visible,
    /// No match, or the first match is hidden
    Hidden,
    /// At least one match in the DOM
    Attached,
    /// No match in the DOM
    Detached,
}

impl fmt::Display for WaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        };
        f.write_str(s)
    }
}

/// A way to find element(s) on the page at any given moment.
#[derive(Clone)]
pub struct Locator {
    driver: Arc<dyn BrowserDriver>,
    chain: SelectorChain,
    action_timeout: Duration,
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("selector", &self.chain.to_string())
            .finish()
    }
}

impl Locator {
    pub(crate) fn new(
        driver: Arc<dyn BrowserDriver>,
        chain: SelectorChain,
        action_timeout: Duration,
    ) -> Self {
        Self {
            driver,
            chain,
            action_timeout,
        }
    }

    /// Returns the selector chain for this locator
    pub fn selector(&self) -> &SelectorChain {
        &self.chain
    }

    fn with_step(&self, step: Step) -> Locator {
        Locator {
            driver: Arc::clone(&self.driver),
            chain: self.chain.clone().push(step),
            action_timeout: self.action_timeout,
        }
    }

    /// Creates a sub-locator within this locator's subtree.
    pub fn locator(&self, selector: Selector) -> Locator {
        self.with_step(Step::Query(selector))
    }

    /// Creates a locator for the nth matching element (0-indexed).
    pub fn nth(&self, index: i32) -> Locator {
        self.with_step(Step::Nth(index))
    }

    /// Creates a locator for the first matching element.
    pub fn first(&self) -> Locator {
        self.nth(0)
    }

    /// Creates a locator for the last matching element.
    pub fn last(&self) -> Locator {
        self.nth(-1)
    }

    /// Narrows to matches whose text contains `text` (case-insensitive).
    pub fn has_text(&self, text: &str) -> Locator {
        self.with_step(Step::HasText(text.to_string()))
    }

    /// Overrides the timeout used by this locator's actions.
    pub fn with_action_timeout(mut self, timeout: Duration) -> Locator {
        self.action_timeout = timeout;
        self
    }

    fn swallow<T>(&self, op: &str, result: Result<T>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(selector = %self.chain, "Probe {} failed: {}", op, e);
                fallback
            }
        }
    }

    // Probes

    /// Whether the first match is visible. False when nothing matches.
    pub async fn is_visible(&self) -> bool {
        let first = self.first();
        let result = self.driver.is_visible(&first.chain).await;
        self.swallow("is_visible", result, false)
    }

    /// Number of matches (0 when the query itself fails)
    pub async fn count(&self) -> usize {
        let result = self.driver.count(&self.chain).await;
        self.swallow("count", result, 0)
    }

    /// Whether anything matches
    pub async fn exists(&self) -> bool {
        self.count().await > 0
    }

    /// Trimmed text of the first match
    pub async fn text(&self) -> Option<String> {
        let first = self.first();
        let result = self.driver.text_content(&first.chain).await;
        self.swallow("text", result, None)
            .map(|t| t.trim().to_string())
    }

    /// Trimmed text of every match, in document order
    pub async fn all_texts(&self) -> Vec<String> {
        let count = self.count().await;
        let mut texts = Vec::with_capacity(count);
        for i in 0..count {
            texts.push(self.nth(i as i32).text().await.unwrap_or_default());
        }
        texts
    }

    /// Input value of the first match
    pub async fn value(&self) -> Option<String> {
        let first = self.first();
        let result = self.driver.input_value(&first.chain).await.map(Some);
        self.swallow("value", result, None)
    }

    /// Attribute of the first match
    pub async fn attribute(&self, name: &str) -> Option<String> {
        let first = self.first();
        let result = self.driver.get_attribute(&first.chain, name).await;
        self.swallow("attribute", result, None)
    }

    // Actions

    /// Clicks the element.
    pub async fn click(&self) -> Result<()> {
        self.driver
            .click(&self.chain, self.action_timeout)
            .await
            .map_err(|e| self.wrap_error(e))
    }

    /// Fills the element with text.
    pub async fn fill(&self, value: &str) -> Result<()> {
        self.driver
            .fill(&self.chain, value, self.action_timeout)
            .await
            .map_err(|e| self.wrap_error(e))
    }

    /// Empties the input before filling it.
    ///
    /// Some inputs are pre-populated by the application (generated employee
    /// ids); a single fill is not always applied over the existing value.
    pub async fn clear_and_fill(&self, value: &str) -> Result<()> {
        self.fill("").await?;
        self.fill(value).await
    }

    /// Presses a key on the element.
    pub async fn press(&self, key: &str) -> Result<()> {
        self.driver
            .press(&self.chain, key, self.action_timeout)
            .await
            .map_err(|e| self.wrap_error(e))
    }

    /// Waits until the locator reaches `state`, failing with `Error::Timeout`.
    pub async fn wait_for(&self, state: WaitState, timeout: Duration) -> Result<()> {
        let reached = poll::poll_until(
            || self.in_state(state),
            PollOptions::new(timeout, poll::WAIT_POLL_INTERVAL),
        )
        .await;

        if reached {
            Ok(())
        } else {
            Err(Error::Timeout {
                what: format!("'{}' to be {}", self.chain, state),
                waited: timeout,
            })
        }
    }

    /// Waits for visibility using the action timeout.
    pub async fn wait_visible(&self) -> Result<()> {
        self.wait_for(WaitState::Visible, self.action_timeout).await
    }

    async fn in_state(&self, state: WaitState) -> bool {
        match state {
            WaitState::Visible => self.is_visible().await,
            WaitState::Hidden => !self.is_visible().await,
            WaitState::Attached => self.count().await > 0,
            WaitState::Detached => self.count().await == 0,
        }
    }

    /// Wraps an error with selector context for better error messages.
    fn wrap_error(&self, error: Error) -> Error {
        match error {
            Error::Driver(msg) => Error::Driver(format!("{} [selector: {}]", msg, self.chain)),
            other => other,
        }
    }
}
