// Recruitment screens: candidates, add candidate, candidate profile, vacancies

use crate::components::{Form, RowCriteria, Table};
use crate::driver::{Locator, PageHandle, Selector};
use crate::error::Result;
use crate::pages::PageObject;
use crate::routes::Routes;

/// `/recruitment/viewCandidates`
pub struct CandidatesPage {
    handle: PageHandle,
}

impl CandidatesPage {
    pub const COL_VACANCY: usize = 1;
    pub const COL_CANDIDATE: usize = 2;
    pub const COL_HIRING_MANAGER: usize = 3;
    pub const COL_DATE_APPLIED: usize = 4;
    pub const COL_STATUS: usize = 5;

    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    pub fn table(&self) -> Table {
        Table::new(&self.handle)
    }

    fn filters(&self) -> Form {
        let panel = self.handle.locator(Selector::css(".oxd-table-filter")).first();
        Form::within(&self.handle, panel)
    }

    pub async fn set_keywords(&self, keywords: &str) -> Result<()> {
        self.filters().fill_field("Keywords", keywords).await
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

    /// First row whose candidate name contains `name`
    pub async fn find_candidate(&self, name: &str) -> Option<usize> {
        self.table()
            .find_row(&RowCriteria::new().contains(Self::COL_CANDIDATE, name))
            .await
    }

    /// Opens the candidate profile through the row's view button.
    pub async fn open_candidate(&self, row: usize) -> Result<()> {
        self.table()
            .click_in_row(row, Selector::css(".bi-eye-fill"))
            .await?;
        let prefix = format!("{}/", self.handle.routes().add_candidate);
        self.handle
            .wait_for_url(&Routes::contains(&prefix), self.handle.timeouts().navigation)
            .await
    }
}

impl PageObject for CandidatesPage {
    fn name(&self) -> &'static str {
        "Candidates"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().candidates.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle.locator(Selector::css(".oxd-table-filter")).first()
    }
}

/// `/recruitment/addCandidate`
pub struct AddCandidatePage {
    handle: PageHandle,
}

impl AddCandidatePage {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    pub fn form(&self) -> Form {
        Form::new(&self.handle)
    }

    pub async fn fill_names(&self, first: &str, middle: Option<&str>, last: &str) -> Result<()> {
        self.handle
            .locator(Selector::attr("name", "firstName"))
            .clear_and_fill(first)
            .await?;
        if let Some(middle) = middle {
            self.handle
                .locator(Selector::attr("name", "middleName"))
                .clear_and_fill(middle)
                .await?;
        }
        self.handle
            .locator(Selector::attr("name", "lastName"))
            .clear_and_fill(last)
            .await
    }

    pub async fn set_email(&self, email: &str) -> Result<()> {
        self.form().fill_field("Email", email).await
    }

    pub async fn select_vacancy(&self, vacancy: &str) -> Result<()> {
        self.form().select_option("Vacancy", vacancy).await
    }

    pub async fn save(&self) -> Result<()> {
        self.form().submit().await
    }

    pub async fn validation_errors(&self) -> Vec<String> {
        self.form().validation_errors().await
    }
}

impl PageObject for AddCandidatePage {
    fn name(&self) -> &'static str {
        "Add Candidate"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().add_candidate.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle.locator(Selector::attr("name", "firstName"))
    }
}

/// `/recruitment/addCandidate/{id}`: an existing candidate and their pipeline stage
pub struct CandidateProfilePage {
    handle: PageHandle,
    candidate_id: u64,
}

impl CandidateProfilePage {
    pub fn new(handle: &PageHandle, candidate_id: u64) -> Self {
        Self {
            handle: handle.clone(),
            candidate_id,
        }
    }

    /// The profile the browser is on, if any.
    pub async fn current(handle: &PageHandle) -> Option<Self> {
        let url = handle.current_url().await.ok()?;
        let id = handle.routes().candidate_id_from(&url)?;
        Some(Self::new(handle, id))
    }

    pub fn candidate_id(&self) -> u64 {
        self.candidate_id
    }

    fn stage_button(&self, action: &str) -> Locator {
        self.handle
            .locator(Selector::css(".orangehrm-recruitment-actions button"))
            .has_text(action)
            .first()
    }

    /// Probe: pipeline status, without the "Status:" prefix
    pub async fn status(&self) -> Option<String> {
        let text = self
            .handle
            .locator(Selector::css(".orangehrm-recruitment-status"))
            .text()
            .await?;
        Some(text.trim_start_matches("Status:").trim().to_string())
    }

    /// Probe: is the pipeline action ("Shortlist", "Reject", ...) offered?
    pub async fn action_available(&self, action: &str) -> bool {
        self.stage_button(action).is_visible().await
    }

    /// Runs a pipeline action and saves its status-change form.
    pub async fn perform_action(&self, action: &str) -> Result<()> {
        self.stage_button(action).click().await?;
        let routes = self.handle.routes();
        self.handle
            .wait_for_url(
                &Routes::contains(&routes.candidate_status_change),
                self.handle.timeouts().navigation,
            )
            .await?;
        let form = Form::new(&self.handle);
        form.wait_for_ready().await?;
        form.submit().await
    }
}

impl PageObject for CandidateProfilePage {
    fn name(&self) -> &'static str {
        "Candidate Profile"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().candidate_profile(self.candidate_id)
    }

    fn ready_marker(&self) -> Locator {
        self.handle
            .locator(Selector::css(".orangehrm-recruitment-status"))
            .first()
    }
}

/// `/recruitment/viewJobVacancy`
pub struct VacanciesPage {
    handle: PageHandle,
}

impl VacanciesPage {
    pub const COL_VACANCY: usize = 1;
    pub const COL_JOB_TITLE: usize = 2;
    pub const COL_HIRING_MANAGER: usize = 3;
    pub const COL_STATUS: usize = 4;

    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    pub fn table(&self) -> Table {
        Table::new(&self.handle)
    }

    pub async fn results(&self) -> Vec<Vec<String>> {
        self.table().all_rows().await
    }
}

impl PageObject for VacanciesPage {
    fn name(&self) -> &'static str {
        "Vacancies"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().vacancies.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle.locator(Selector::css(".oxd-table-filter")).first()
    }
}
