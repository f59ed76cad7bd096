// Admin screens: system users, job titles

use crate::components::{Form, Modal, RowCriteria, Table};
use crate::driver::{Locator, PageHandle, Selector};
use crate::error::Result;
use crate::pages::PageObject;
use crate::routes::Routes;

/// `/admin/viewSystemUsers`
pub struct SystemUsersPage {
    handle: PageHandle,
}

impl SystemUsersPage {
    pub const COL_USERNAME: usize = 1;
    pub const COL_ROLE: usize = 2;
    pub const COL_EMPLOYEE: usize = 3;
    pub const COL_STATUS: usize = 4;

    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    fn filters(&self) -> Form {
        let panel = self.handle.locator(Selector::css(".oxd-table-filter")).first();
        Form::within(&self.handle, panel)
    }

    pub fn table(&self) -> Table {
        Table::new(&self.handle)
    }

    pub async fn set_username(&self, username: &str) -> Result<()> {
        self.filters().fill_field("Username", username).await
    }

    pub async fn select_role(&self, role: &str) -> Result<()> {
        self.filters().select_option("User Role", role).await
    }

    pub async fn submit_search(&self) -> Result<()> {
        self.filters().submit().await?;
        self.handle.settle().await;
        self.table()
            .wait_for_results(self.handle.timeouts().expect)
            .await;
        Ok(())
    }

    pub async fn results(&self) -> Vec<Vec<String>> {
        self.table().all_rows().await
    }
}

impl PageObject for SystemUsersPage {
    fn name(&self) -> &'static str {
        "System Users"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().system_users.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle.locator(Selector::css(".oxd-table-filter")).first()
    }
}

/// `/admin/viewJobTitleList`, plus the `/admin/saveJobTitle` form it opens
pub struct JobTitlesPage {
    handle: PageHandle,
}

impl JobTitlesPage {
    pub const COL_TITLE: usize = 1;
    pub const COL_DESCRIPTION: usize = 2;

    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    pub fn table(&self) -> Table {
        Table::new(&self.handle)
    }

    pub fn form(&self) -> Form {
        Form::new(&self.handle)
    }

    pub async fn titles(&self) -> Vec<String> {
        self.table()
            .all_rows()
            .await
            .into_iter()
            .filter_map(|row| row.into_iter().nth(Self::COL_TITLE))
            .collect()
    }

    /// Row of the title, matched exactly
    pub async fn find_title(&self, title: &str) -> Option<usize> {
        self.table()
            .find_row(&RowCriteria::new().equals(Self::COL_TITLE, title))
            .await
    }

    /// Opens the add form and waits for it.
    pub async fn open_add_form(&self) -> Result<()> {
        self.handle
            .locator(Selector::css("button"))
            .has_text("Add")
            .first()
            .click()
            .await?;
        let routes = self.handle.routes();
        self.handle
            .wait_for_url(
                &Routes::pattern(&routes.save_job_title),
                self.handle.timeouts().navigation,
            )
            .await?;
        self.form().wait_for_ready().await
    }

    pub async fn fill_title_form(&self, title: &str, description: Option<&str>) -> Result<()> {
        self.form().fill_field("Job Title", title).await?;
        if let Some(description) = description {
            self.handle
                .locator(Selector::css("textarea"))
                .first()
                .clear_and_fill(description)
                .await?;
        }
        Ok(())
    }

    pub async fn save(&self) -> Result<()> {
        self.form().submit().await
    }

    pub async fn validation_errors(&self) -> Vec<String> {
        self.form().validation_errors().await
    }

    /// Deletes a row through its trash button and the confirmation dialog.
    pub async fn delete_row(&self, row: usize) -> Result<()> {
        self.table()
            .click_in_row(row, Selector::css(".bi-trash"))
            .await?;
        let modal = Modal::new(&self.handle);
        modal.wait_open(self.handle.timeouts().action).await?;
        modal.confirm().await
    }
}

impl PageObject for JobTitlesPage {
    fn name(&self) -> &'static str {
        "Job Titles"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().job_titles.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle
            .locator(Selector::css(".orangehrm-container"))
            .first()
    }
}
