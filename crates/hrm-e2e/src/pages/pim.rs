// PIM screens: employee list, add employee, personal details, job details

use crate::components::{Form, Modal, Table};
use crate::driver::{Locator, PageHandle, Selector};
use crate::error::Result;
use crate::pages::PageObject;
use crate::routes::Routes;
use regex::Regex;

/// `/pim/viewEmployeeList`: filter panel over the employee table
pub struct EmployeeListPage {
    handle: PageHandle,
}

impl EmployeeListPage {
    pub const COL_ID: usize = 1;
    /// First and middle name share one column
    pub const COL_FIRST_NAME: usize = 2;
    pub const COL_LAST_NAME: usize = 3;
    pub const COL_JOB_TITLE: usize = 4;
    pub const COL_EMPLOYMENT_STATUS: usize = 5;
    pub const COL_SUB_UNIT: usize = 6;
    pub const COL_SUPERVISOR: usize = 7;

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

    pub async fn set_employee_id(&self, id: &str) -> Result<()> {
        self.filters().fill_field("Employee Id", id).await
    }

    /// Types into the name filter without picking a suggestion (partial match).
    pub async fn set_employee_name(&self, name: &str) -> Result<()> {
        self.filters().fill_field("Employee Name", name).await
    }

    /// Runs the search and waits for rows or the empty-results message.
    pub async fn submit_search(&self) -> Result<()> {
        self.filters().submit().await?;
        self.handle.settle().await;
        self.table()
            .wait_for_results(self.handle.timeouts().expect)
            .await;
        Ok(())
    }

    /// Cell texts of every listed employee
    pub async fn results(&self) -> Vec<Vec<String>> {
        self.table().all_rows().await
    }

    /// Opens an employee's personal details from the results.
    pub async fn open_row(&self, row: usize) -> Result<()> {
        self.table().click_row(row).await
    }
}

impl PageObject for EmployeeListPage {
    fn name(&self) -> &'static str {
        "Employee List"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().employee_list.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle.locator(Selector::css(".oxd-table-filter")).first()
    }
}

/// `/pim/addEmployee`
pub struct AddEmployeePage {
    handle: PageHandle,
}

impl AddEmployeePage {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    pub fn form(&self) -> Form {
        Form::new(&self.handle)
    }

    pub async fn fill_names(&self, first: &str, middle: Option<&str>, last: &str) -> Result<()> {
        fill_names(&self.handle, first, middle, last).await
    }

    /// Replaces the generated employee id.
    pub async fn set_employee_id(&self, id: &str) -> Result<()> {
        self.form().fill_field("Employee Id", id).await
    }

    /// Employee id currently in the form (generated or typed)
    pub async fn employee_id(&self) -> Option<String> {
        self.form().field_value("Employee Id").await
    }

    pub async fn save(&self) -> Result<()> {
        self.form().submit().await
    }

    pub async fn validation_errors(&self) -> Vec<String> {
        self.form().validation_errors().await
    }
}

impl PageObject for AddEmployeePage {
    fn name(&self) -> &'static str {
        "Add Employee"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().add_employee.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle.locator(Selector::attr("name", "firstName"))
    }
}

async fn fill_names(handle: &PageHandle, first: &str, middle: Option<&str>, last: &str) -> Result<()> {
    handle
        .locator(Selector::attr("name", "firstName"))
        .clear_and_fill(first)
        .await?;
    if let Some(middle) = middle {
        handle
            .locator(Selector::attr("name", "middleName"))
            .clear_and_fill(middle)
            .await?;
    }
    handle
        .locator(Selector::attr("name", "lastName"))
        .clear_and_fill(last)
        .await
}

/// `/pim/viewPersonalDetails/empNumber/{n}`
pub struct PersonalDetailsPage {
    handle: PageHandle,
    emp_number: u64,
}

impl PersonalDetailsPage {
    pub fn new(handle: &PageHandle, emp_number: u64) -> Self {
        Self {
            handle: handle.clone(),
            emp_number,
        }
    }

    /// Whatever personal-details screen the browser is on, if any.
    pub async fn current(handle: &PageHandle) -> Option<Self> {
        let url = handle.current_url().await.ok()?;
        let emp_number = handle.routes().emp_number_from(&url)?;
        url.contains(&handle.routes().personal_details_prefix)
            .then(|| Self::new(handle, emp_number))
    }

    /// Pattern for any personal-details screen
    pub fn any_pattern(routes: &Routes) -> Regex {
        Routes::contains(&routes.personal_details_prefix)
    }

    pub fn emp_number(&self) -> u64 {
        self.emp_number
    }

    pub fn form(&self) -> Form {
        Form::new(&self.handle)
    }

    pub async fn first_name(&self) -> Option<String> {
        self.handle
            .locator(Selector::attr("name", "firstName"))
            .value()
            .await
    }

    pub async fn last_name(&self) -> Option<String> {
        self.handle
            .locator(Selector::attr("name", "lastName"))
            .value()
            .await
    }

    pub async fn fill_names(&self, first: &str, middle: Option<&str>, last: &str) -> Result<()> {
        fill_names(&self.handle, first, middle, last).await
    }

    /// Saves the personal details section (the first form on the screen).
    pub async fn save(&self) -> Result<()> {
        self.form().submit().await
    }

    pub async fn validation_errors(&self) -> Vec<String> {
        self.form().validation_errors().await
    }
}

impl PageObject for PersonalDetailsPage {
    fn name(&self) -> &'static str {
        "Personal Details"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().personal_details(self.emp_number)
    }

    fn ready_marker(&self) -> Locator {
        self.handle.locator(Selector::attr("name", "firstName"))
    }
}

/// `/pim/viewJobDetails/empNumber/{n}`: job record and termination
pub struct JobDetailsPage {
    handle: PageHandle,
    emp_number: u64,
}

impl JobDetailsPage {
    pub fn new(handle: &PageHandle, emp_number: u64) -> Self {
        Self {
            handle: handle.clone(),
            emp_number,
        }
    }

    fn terminate_button(&self) -> Locator {
        self.handle
            .locator(Selector::css("button"))
            .has_text("Terminate Employment")
            .first()
    }

    /// Probe: can this employee be terminated right now?
    pub async fn termination_available(&self) -> bool {
        self.terminate_button().is_visible().await
    }

    /// Probe: "Terminated on: ..." banner of an already terminated employee
    pub async fn terminated_on(&self) -> Option<String> {
        let banner = self.handle.locator(Selector::css(".orangehrm-terminate-date"));
        if banner.is_visible().await {
            banner.text().await
        } else {
            None
        }
    }

    /// Opens the termination dialog and returns its form.
    pub async fn open_termination(&self) -> Result<Form> {
        self.terminate_button().click().await?;
        let modal = Modal::new(&self.handle);
        modal.wait_open(self.handle.timeouts().action).await?;
        Ok(Form::within(&self.handle, modal.region().await?))
    }

    /// Fills and submits an open termination dialog.
    pub async fn submit_termination(&self, form: &Form, date: &str, reason: &str) -> Result<()> {
        form.select_option("Termination Reason", reason).await?;
        form.fill_field("Termination Date", date).await?;
        form.submit().await
    }
}

impl PageObject for JobDetailsPage {
    fn name(&self) -> &'static str {
        "Job Details"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().job_details(self.emp_number)
    }

    fn ready_marker(&self) -> Locator {
        self.handle
            .locator(Selector::css(".orangehrm-edit-employee-content"))
            .first()
    }
}
