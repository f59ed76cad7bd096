// Leave screens: apply, assign, leave list

use crate::components::{Form, Modal, Table};
use crate::driver::{Locator, PageHandle, Selector};
use crate::error::Result;
use crate::pages::{PageObject, parse_days};

const NO_BALANCE_NOTICE: &str = "No Leave Types with Leave Balance";

// Apply and assign share the leave-type / balance / dates part of the form
async fn leave_types(handle: &PageHandle) -> Result<Vec<String>> {
    Form::new(handle).dropdown_options("Leave Type").await
}

async fn select_leave_type(handle: &PageHandle, leave_type: &str) -> Result<()> {
    Form::new(handle).select_option("Leave Type", leave_type).await
}

async fn balance(handle: &PageHandle) -> Option<f64> {
    let text = handle
        .locator(Selector::css(".orangehrm-leave-balance-text"))
        .text()
        .await?;
    parse_days(&text)
}

async fn set_dates(handle: &PageHandle, from: &str, to: &str) -> Result<()> {
    let form = Form::new(handle);
    form.fill_field("From Date", from).await?;
    form.fill_field("To Date", to).await
}

async fn set_comment(handle: &PageHandle, comment: &str) -> Result<()> {
    handle
        .locator(Selector::css("textarea"))
        .first()
        .clear_and_fill(comment)
        .await
}

/// `/leave/applyLeave`: the logged-in user's own leave request
pub struct ApplyLeavePage {
    handle: PageHandle,
}

impl ApplyLeavePage {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    pub fn form(&self) -> Form {
        Form::new(&self.handle)
    }

    /// Probe: the screen shows the no-balance notice instead of a form
    pub async fn has_no_balance_notice(&self) -> bool {
        self.handle
            .locator(Selector::text(NO_BALANCE_NOTICE))
            .is_visible()
            .await
    }

    pub async fn leave_types(&self) -> Result<Vec<String>> {
        leave_types(&self.handle).await
    }

    pub async fn select_leave_type(&self, leave_type: &str) -> Result<()> {
        select_leave_type(&self.handle, leave_type).await
    }

    /// Probe: balance shown for the selected leave type, in days
    pub async fn balance(&self) -> Option<f64> {
        balance(&self.handle).await
    }

    pub async fn set_dates(&self, from: &str, to: &str) -> Result<()> {
        set_dates(&self.handle, from, to).await
    }

    pub async fn set_comment(&self, comment: &str) -> Result<()> {
        set_comment(&self.handle, comment).await
    }

    pub async fn submit(&self) -> Result<()> {
        self.form().submit().await
    }

    pub async fn validation_errors(&self) -> Vec<String> {
        self.form().validation_errors().await
    }
}

impl PageObject for ApplyLeavePage {
    fn name(&self) -> &'static str {
        "Apply Leave"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().apply_leave.clone()
    }

    // Present both with the form and with the no-balance notice
    fn ready_marker(&self) -> Locator {
        self.handle
            .locator(Selector::css(".orangehrm-card-container"))
            .first()
    }
}

/// `/leave/assignLeave`: an administrator books leave for an employee
pub struct AssignLeavePage {
    handle: PageHandle,
}

impl AssignLeavePage {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    pub fn form(&self) -> Form {
        Form::new(&self.handle)
    }

    /// Types `query` into the employee autocomplete and returns the suggestions.
    pub async fn employee_suggestions(&self, query: &str) -> Result<Vec<String>> {
        self.form().autocomplete("Employee Name", query).await
    }

    pub async fn choose_employee(&self, index: usize) -> Result<()> {
        self.form().choose_suggestion(index).await
    }

    pub async fn leave_types(&self) -> Result<Vec<String>> {
        leave_types(&self.handle).await
    }

    pub async fn select_leave_type(&self, leave_type: &str) -> Result<()> {
        select_leave_type(&self.handle, leave_type).await
    }

    /// Probe: balance of the chosen employee for the selected type, in days
    pub async fn balance(&self) -> Option<f64> {
        balance(&self.handle).await
    }

    pub async fn set_dates(&self, from: &str, to: &str) -> Result<()> {
        set_dates(&self.handle, from, to).await
    }

    pub async fn set_comment(&self, comment: &str) -> Result<()> {
        set_comment(&self.handle, comment).await
    }

    pub async fn submit(&self) -> Result<()> {
        self.form().submit().await
    }

    /// Dialog asking to confirm an assignment that exceeds the balance
    pub fn confirmation(&self) -> Modal {
        Modal::new(&self.handle)
    }

    pub async fn validation_errors(&self) -> Vec<String> {
        self.form().validation_errors().await
    }
}

impl PageObject for AssignLeavePage {
    fn name(&self) -> &'static str {
        "Assign Leave"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().assign_leave.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle.locator(Selector::css("form")).first()
    }
}

/// `/leave/viewLeaveList`: requests awaiting action
pub struct LeaveListPage {
    handle: PageHandle,
}

impl LeaveListPage {
    pub const COL_DATE: usize = 1;
    pub const COL_EMPLOYEE: usize = 2;
    pub const COL_LEAVE_TYPE: usize = 3;
    pub const COL_STATUS: usize = 6;

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

    pub async fn set_employee_name(&self, name: &str) -> Result<()> {
        self.filters().fill_field("Employee Name", name).await
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

    async fn action_button(&self, row: usize, action: &str) -> Result<Locator> {
        Ok(self
            .table()
            .row(row)
            .await?
            .locator(Selector::css("button"))
            .has_text(action)
            .first())
    }

    /// Probe: does the row offer `action` ("Approve", "Reject", ...)?
    pub async fn action_available(&self, row: usize, action: &str) -> bool {
        match self.action_button(row, action).await {
            Ok(button) => button.is_visible().await,
            Err(_) => false,
        }
    }

    pub async fn perform_action(&self, row: usize, action: &str) -> Result<()> {
        self.action_button(row, action).await?.click().await
    }
}

impl PageObject for LeaveListPage {
    fn name(&self) -> &'static str {
        "Leave List"
    }

    fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn path(&self) -> String {
        self.handle.routes().leave_list.clone()
    }

    fn ready_marker(&self) -> Locator {
        self.handle.locator(Selector::css(".oxd-table-filter")).first()
    }
}
