// Driver - The browser capability consumed by pages and components
//
// Architecture:
// - `BrowserDriver` is the narrow surface we need from a browser tab
// - `Locator` wraps a driver + selector chain and splits operations into
//   probes (never fail) and actions (propagate errors)
// - `PageHandle` is what a Session lends to page objects
//
// Implementations:
// - `FakeBrowser` - in-memory scripted DOM, used by the offline tests
// - `PlaywrightDriver` - real Chromium via playwright-rs (feature "playwright")

pub mod fake;
mod handle;
mod locator;
#[cfg(feature = "playwright")]
pub mod playwright;
mod selector;

pub use fake::FakeBrowser;
pub use handle::PageHandle;
pub use locator::{Locator, WaitState};
#[cfg(feature = "playwright")]
pub use playwright::PlaywrightDriver;
pub use selector::{Selector, SelectorChain, Step};

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A single logical browser tab.
///
/// Every method is a suspension point. Query methods operate on the set of
/// elements a chain resolves to; element methods (`text_content`,
/// `input_value`, `get_attribute`, `click`, `fill`, `press`) require the
/// chain to resolve to exactly one element, as Playwright's strict mode does.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigates the tab to an absolute URL.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Current URL of the tab
    async fn current_url(&self) -> Result<String>;

    /// Document title
    async fn title(&self) -> Result<String>;

    /// Number of elements matching the chain
    async fn count(&self, selector: &SelectorChain) -> Result<usize>;

    /// Whether the element matching the chain is visible
    async fn is_visible(&self, selector: &SelectorChain) -> Result<bool>;

    /// Text content of the element
    async fn text_content(&self, selector: &SelectorChain) -> Result<Option<String>>;

    /// Current value of an input element
    async fn input_value(&self, selector: &SelectorChain) -> Result<String>;

    /// Attribute of the element
    async fn get_attribute(&self, selector: &SelectorChain, name: &str) -> Result<Option<String>>;

    /// Clicks the element, waiting up to `timeout` for it to be actionable.
    async fn click(&self, selector: &SelectorChain, timeout: Duration) -> Result<()>;

    /// Replaces the value of an input element.
    async fn fill(&self, selector: &SelectorChain, value: &str, timeout: Duration) -> Result<()>;

    /// Presses a key with the element focused.
    async fn press(&self, selector: &SelectorChain, key: &str, timeout: Duration) -> Result<()>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Releases the tab and anything launched for it.
    async fn close(&self) -> Result<()>;
}
