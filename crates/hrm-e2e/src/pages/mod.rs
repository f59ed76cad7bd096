// Pages - One object per application screen
//
// A page binds a route and a ready marker to the navigate / wait_for_ready /
// is_ready triad and adds screen-level actions built from components. Pages
// know nothing about workflows or outcomes.

mod admin;
mod auth;
mod leave;
mod pim;
mod recruitment;

pub use admin::{JobTitlesPage, SystemUsersPage};
pub use auth::{DashboardPage, LoginPage};
pub use leave::{ApplyLeavePage, AssignLeavePage, LeaveListPage};
pub use pim::{AddEmployeePage, EmployeeListPage, JobDetailsPage, PersonalDetailsPage};
pub use recruitment::{AddCandidatePage, CandidateProfilePage, CandidatesPage, VacanciesPage};

use crate::components::{NavBar, Toast};
use crate::driver::{Locator, PageHandle, WaitState};
use crate::error::Result;
use crate::routes::Routes;
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;

/// Where a page is in its load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    /// The browser is somewhere else
    Unloaded,
    /// URL matches but the screen has not rendered its marker yet
    Navigating,
    /// URL matches and the marker is visible
    Ready,
}

/// The navigate / wait_for_ready / is_ready contract every screen implements.
///
/// `is_ready` and `state` are probes and never fail. `navigate` and
/// `wait_for_ready` fail with timeouts or driver errors.
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Human-readable screen name, used in logs and error context
    fn name(&self) -> &'static str;

    fn handle(&self) -> &PageHandle;

    /// Route path under the base URL
    fn path(&self) -> String;

    /// Element whose visibility means the screen has rendered
    fn ready_marker(&self) -> Locator;

    /// Notifications shown over this screen
    fn toast(&self) -> Toast {
        Toast::new(self.handle())
    }

    fn nav(&self) -> NavBar {
        NavBar::new(self.handle())
    }

    /// URL pattern of the screen; defaults to a suffix match on `path`
    fn url_pattern(&self) -> Regex {
        Routes::pattern(&self.path())
    }

    /// Loads the screen and waits until it is ready.
    async fn navigate(&self) -> Result<()> {
        tracing::debug!(page = self.name(), "Navigating to page");
        self.handle().goto_path(&self.path()).await?;
        self.wait_for_ready().await
    }

    /// Blocks until the URL matches and the ready marker is visible.
    async fn wait_for_ready(&self) -> Result<()> {
        let handle = self.handle();
        let timeout = handle.timeouts().navigation;
        handle
            .wait_for_url(&self.url_pattern(), timeout)
            .await
            .map_err(|e| e.context(format!("{} page", self.name())))?;
        self.ready_marker()
            .wait_for(WaitState::Visible, timeout)
            .await
            .map_err(|e| e.context(format!("{} page", self.name())))?;
        handle.settle().await;
        Ok(())
    }

    /// Probe: is the screen loaded and rendered right now?
    async fn is_ready(&self) -> bool {
        self.state().await == PageState::Ready
    }

    async fn state(&self) -> PageState {
        if !self.handle().url_matches(&self.url_pattern()).await {
            return PageState::Unloaded;
        }
        if self.ready_marker().is_visible().await {
            PageState::Ready
        } else {
            PageState::Navigating
        }
    }
}

/// Parses a day count such as "2.00 Day(s)" or "0.5".
pub fn parse_days(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}
