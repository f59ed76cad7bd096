// NavBar - Side menu, breadcrumb and user menu

use crate::driver::{PageHandle, WaitState};
use crate::error::{Error, Result};
use crate::selectors::NavSelectors;

#[derive(Clone)]
pub struct NavBar {
    handle: PageHandle,
}

impl NavBar {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    fn selectors(&self) -> &NavSelectors {
        &self.handle.selectors().nav
    }

    /// Probe: is the side menu rendered? False on the login screen.
    pub async fn is_visible(&self) -> bool {
        self.handle
            .locator(self.selectors().menu_item.clone())
            .is_visible()
            .await
    }

    /// Labels of the side menu entries
    pub async fn menu_items(&self) -> Vec<String> {
        self.handle
            .locator(self.selectors().menu_item.clone())
            .all_texts()
            .await
    }

    /// Opens a module ("PIM", "Leave", ...) from the side menu.
    pub async fn go_to(&self, module: &str) -> Result<()> {
        let entry = self
            .handle
            .locator(self.selectors().menu_item.clone())
            .has_text(module)
            .first();
        if !entry.exists().await {
            return Err(Error::ElementNotFound(format!("menu entry '{}'", module)));
        }
        entry.click().await?;
        self.handle.settle().await;
        Ok(())
    }

    /// Current module heading
    pub async fn breadcrumb(&self) -> Option<String> {
        self.handle
            .locator(self.selectors().breadcrumb.clone())
            .text()
            .await
    }

    /// Signs out through the user menu.
    pub async fn logout(&self) -> Result<()> {
        let selectors = self.selectors();
        self.handle
            .locator(selectors.user_dropdown.clone())
            .first()
            .click()
            .await?;
        let logout = self.handle.locator(selectors.logout.clone()).first();
        logout
            .wait_for(WaitState::Visible, self.handle.timeouts().action)
            .await?;
        logout.click().await
    }
}
