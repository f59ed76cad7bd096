//! hrm-e2e: Page-object and domain-workflow end-to-end tests for OrangeHRM
//!
//! The crate is layered bottom-up:
//!
//! - [`driver`]: the browser capability surface ([`BrowserDriver`]),
//!   lazily-resolved [`Locator`]s with a strict split between probes (never
//!   fail) and actions (return `Result`), and two drivers: the in-memory
//!   [`FakeBrowser`] and, behind the `playwright` feature, a Chromium adapter.
//! - [`components`]: table, form, modal, toast and navigation regions.
//! - [`pages`]: one [`PageObject`] per application screen.
//! - [`workflows`]: business operations that return per-workflow outcome
//!   enums instead of failing on legitimate negative results.
//! - [`fixture`]: session lifecycle, test context, failure artifacts.
//!
//! # Example
//!
//! ```ignore
//! use hrm_e2e::{Config, PlaywrightDriver, run_test};
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn search_finds_new_employee() -> hrm_e2e::Result<()> {
//!     let config = Config::load()?;
//!     let driver = Arc::new(PlaywrightDriver::launch(&config).await?);
//!     run_test("search_finds_new_employee", driver, config, |ctx| async move {
//!         let employee = ctx.data().employee().build()?;
//!         let created = ctx.employees().create_employee(&employee).await?;
//!         assert!(created.is_created());
//!         Ok(())
//!     })
//!     .await
//! }
//! ```

pub mod components;
pub mod config;
pub mod data;
pub mod driver;
mod error;
pub mod fixture;
pub mod pages;
pub mod poll;
pub mod routes;
pub mod selectors;
pub mod workflows;

// Re-export error types
pub use error::{Error, Result};

// Re-export configuration
pub use config::{Config, Credentials, Timeouts, Viewport};

// Re-export driver surface
pub use driver::{BrowserDriver, FakeBrowser, Locator, PageHandle, Selector, WaitState};
#[cfg(feature = "playwright")]
pub use driver::PlaywrightDriver;

// Re-export page contract
pub use pages::{PageObject, PageState};

// Re-export fixture entry points
pub use fixture::{
    Artifact, ArtifactSink, FileArtifactSink, MemoryArtifactSink, Session, SessionState,
    TestContext, TestRunner, run_test,
};

pub use data::TestDataFactory;
pub use poll::{PollOptions, poll_for, poll_until};
pub use routes::Routes;
pub use selectors::Selectors;
