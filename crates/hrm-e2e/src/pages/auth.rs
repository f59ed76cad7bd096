// Login and dashboard screens

use crate::components::Form;
use crate::driver::{Locator, PageHandle, Selector};
use crate::error::Result;
use crate::pages::PageObject;

/// `/auth/login`
pub struct LoginPage {
    handle: PageHandle,
}

impl LoginPage {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    fn username(&self) -> Locator {
        self.handle.locator(Selector::attr("name", "username"))
    }

    fn password(&self) -> Locator {
        self.handle.locator(Selector::attr("name", "password"))
    }

    /// Submits the credentials. Does not wait for the outcome.
    pub async fn submit_credentials(&self, username: &str, password: &str) -> Result<()> {
        self.username().clear_and_fill(username).await?;
        self.password().clear_and_fill(password).await?;
        self.handle
            .locator(Selector::css("button[type='submit']"))
            .first()
            .click()
            .await
    }

    /// Probe: banner shown for rejected credentials ("Invalid credentials")
    pub async fn error_message(&self) -> Option<String> {
        let alert = self.handle.locator(Selector::css(".oxd-alert-content-text"));
        if alert.is_visible().await {
            alert.text().await
        } else {
            None
        }
    }

    /// Probe: inline "Required" messages under empty fields
    pub async fn required_errors(&self) -> Vec<String> {
        Form::new(&self.handle).validation_errors().await
    }
}

impl PageObject for LoginPage {
    fn name(&self) -> &'static str {
        "Login"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().login.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.username()
    }
}

/// `/dashboard/index`, the landing screen after login
pub struct DashboardPage {
    handle: PageHandle,
}

impl DashboardPage {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    /// Titles of the dashboard widgets
    pub async fn widget_titles(&self) -> Vec<String> {
        self.handle
            .locator(Selector::css(".orangehrm-dashboard-widget-name"))
            .all_texts()
            .await
    }

    /// Display name in the user menu
    pub async fn user_name(&self) -> Option<String> {
        self.handle
            .locator(Selector::css(".oxd-userdropdown-name"))
            .text()
            .await
    }
}

impl PageObject for DashboardPage {
    fn name(&self) -> &'static str {
        "Dashboard"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().dashboard.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle
            .locator(Selector::css(".orangehrm-dashboard-grid"))
            .first()
    }
}
