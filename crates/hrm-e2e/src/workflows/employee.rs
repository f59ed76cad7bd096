// EmployeeWorkflow - Create, search, update and terminate employees

use crate::components::RowCriteria;
use crate::data::{Employee, ui_date};
use crate::driver::PageHandle;
use crate::error::{Error, Result};
use crate::pages::{
    AddEmployeePage, EmployeeListPage, JobDetailsPage, PageObject, PersonalDetailsPage,
};
use crate::poll::{self, PollOptions};
use crate::workflows::{Feedback, cell, messages_of, read_feedback};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Filters of the employee list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSearchCriteria {
    pub employee_id: Option<String>,
    /// Partial name, typed without picking a suggestion
    pub name: Option<String>,
}

impl EmployeeSearchCriteria {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One row of the employee list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSearchResult {
    pub id: String,
    /// First and middle name, as the list shows them
    pub first_name: String,
    pub last_name: String,
    pub job_title: String,
    pub employment_status: String,
    pub sub_unit: String,
    pub supervisor: String,
}

impl EmployeeSearchResult {
    fn from_cells(cells: &[String]) -> Self {
        Self {
            id: cell(cells, EmployeeListPage::COL_ID),
            first_name: cell(cells, EmployeeListPage::COL_FIRST_NAME),
            last_name: cell(cells, EmployeeListPage::COL_LAST_NAME),
            job_title: cell(cells, EmployeeListPage::COL_JOB_TITLE),
            employment_status: cell(cells, EmployeeListPage::COL_EMPLOYMENT_STATUS),
            sub_unit: cell(cells, EmployeeListPage::COL_SUB_UNIT),
            supervisor: cell(cells, EmployeeListPage::COL_SUPERVISOR),
        }
    }
}

/// Name changes; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
}

/// Termination details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termination {
    pub date: NaiveDate,
    /// Requested reason; the first configured reason when `None` or unknown
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreateEmployeeOutcome {
    Created {
        emp_number: u64,
        employee_id: Option<String>,
        toast: Option<String>,
    },
    ValidationError { messages: Vec<String> },
}

impl CreateEmployeeOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::ValidationError { .. } => "validation_error",
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    pub fn has_success_feedback(&self) -> bool {
        matches!(self, Self::Created { toast: Some(_), .. })
    }

    pub fn emp_number(&self) -> Option<u64> {
        match self {
            Self::Created { emp_number, .. } => Some(*emp_number),
            Self::ValidationError { .. } => None,
        }
    }

    pub fn validation_messages(&self) -> &[String] {
        match self {
            Self::ValidationError { messages } => messages,
            Self::Created { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateEmployeeOutcome {
    Updated { emp_number: u64, toast: String },
    ValidationError { messages: Vec<String> },
}

impl UpdateEmployeeOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Updated { .. } => "updated",
            Self::ValidationError { .. } => "validation_error",
        }
    }

    pub fn has_success_feedback(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    pub fn validation_messages(&self) -> &[String] {
        match self {
            Self::ValidationError { messages } => messages,
            Self::Updated { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TerminationOutcome {
    Terminated {
        emp_number: u64,
        terminated_on: Option<String>,
    },
    NotFound { employee_id: String },
    /// The employee exists but termination could not be carried out
    NotAvailable { reason: String },
}

impl TerminationOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Terminated { .. } => "terminated",
            Self::NotFound { .. } => "not_found",
            Self::NotAvailable { .. } => "not_available",
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated { .. })
    }
}

enum SaveSignal {
    Saved,
    Feedback(Feedback),
}

pub struct EmployeeWorkflow {
    handle: PageHandle,
    poll: PollOptions,
}

impl EmployeeWorkflow {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
            poll: PollOptions::with_timeout(handle.timeouts().expect),
        }
    }

    /// Overrides the budget of the post-submit poll loops.
    pub fn with_poll(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    /// Adds an employee through the PIM form.
    ///
    /// Created once the application navigates to the new employee's
    /// personal details; the success toast is recorded when it is seen.
    pub async fn create_employee(&self, employee: &Employee) -> Result<CreateEmployeeOutcome> {
        tracing::info!(name = %employee.full_name(), "Creating employee");
        let page = AddEmployeePage::new(&self.handle);
        page.navigate().await?;
        page.fill_names(
            &employee.first_name,
            employee.middle_name.as_deref(),
            &employee.last_name,
        )
        .await?;
        if let Some(id) = &employee.employee_id {
            page.set_employee_id(id).await?;
        }
        let employee_id = page.employee_id().await;
        page.save().await?;

        let details_pattern = PersonalDetailsPage::any_pattern(self.handle.routes());
        let form = page.form();
        let toast = page.toast();
        let signal = poll::poll_for(
            || async {
                if self.handle.url_matches(&details_pattern).await {
                    return Some(SaveSignal::Saved);
                }
                match read_feedback(&toast, &form).await {
                    // the success toast precedes the redirect; keep waiting for the URL
                    Some(Feedback::Success(_)) | None => None,
                    Some(other) => Some(SaveSignal::Feedback(other)),
                }
            },
            self.poll,
        )
        .await;

        let outcome = match signal {
            Some(SaveSignal::Saved) => {
                let details = PersonalDetailsPage::current(&self.handle).await.ok_or_else(|| {
                    Error::Driver("personal details URL carries no employee number".into())
                })?;
                details.wait_for_ready().await?;
                let toast = toast
                    .wait_for_message(self.handle.timeouts().probe)
                    .await;
                CreateEmployeeOutcome::Created {
                    emp_number: details.emp_number(),
                    employee_id,
                    toast,
                }
            }
            Some(SaveSignal::Feedback(feedback)) => CreateEmployeeOutcome::ValidationError {
                messages: messages_of(feedback),
            },
            None => {
                tracing::warn!("No save confirmation before the poll budget ran out");
                CreateEmployeeOutcome::ValidationError {
                    messages: page.validation_errors().await,
                }
            }
        };
        tracing::info!(status = outcome.status(), "Create employee finished");
        Ok(outcome)
    }

    /// Runs one search on the employee list and returns the rendered rows.
    pub async fn search_employee(
        &self,
        criteria: &EmployeeSearchCriteria,
    ) -> Result<Vec<EmployeeSearchResult>> {
        let page = EmployeeListPage::new(&self.handle);
        page.navigate().await?;
        if let Some(id) = &criteria.employee_id {
            page.set_employee_id(id).await?;
        }
        if let Some(name) = &criteria.name {
            page.set_employee_name(name).await?;
        }
        page.submit_search().await?;
        let results: Vec<_> = page
            .results()
            .await
            .iter()
            .map(|cells| EmployeeSearchResult::from_cells(cells))
            .filter(|r| !r.id.is_empty() || !r.last_name.is_empty())
            .collect();
        tracing::debug!(count = results.len(), "Employee search");
        Ok(results)
    }

    /// Repeats the id search until the employee is listed.
    ///
    /// The list is eventually consistent with the add form; `Ok(None)` means
    /// the employee never showed up within `timeout`.
    pub async fn wait_for_employee(
        &self,
        employee_id: &str,
        timeout: Duration,
    ) -> Result<Option<EmployeeSearchResult>> {
        let criteria = EmployeeSearchCriteria::by_id(employee_id);
        poll::poll_for(
            || async {
                match self.search_employee(&criteria).await {
                    Ok(rows) => rows.into_iter().find(|r| r.id == employee_id).map(Ok),
                    Err(e) => Some(Err(e)),
                }
            },
            PollOptions::with_timeout(timeout).interval(self.poll.interval),
        )
        .await
        .transpose()
    }

    // Searches by id and opens the matching row; None when nobody has that id
    async fn open_personal_details(&self, employee_id: &str) -> Result<Option<PersonalDetailsPage>> {
        self.search_employee(&EmployeeSearchCriteria::by_id(employee_id))
            .await?;
        // rendered row index, not the position among parsed results
        let list = EmployeeListPage::new(&self.handle);
        let criteria = RowCriteria::new().equals(EmployeeListPage::COL_ID, employee_id);
        let Some(row) = list.table().find_row(&criteria).await else {
            return Ok(None);
        };
        list.open_row(row).await?;
        self.handle
            .wait_for_url(
                &PersonalDetailsPage::any_pattern(self.handle.routes()),
                self.handle.timeouts().navigation,
            )
            .await?;
        let details = PersonalDetailsPage::current(&self.handle)
            .await
            .ok_or_else(|| Error::Driver("personal details URL carries no employee number".into()))?;
        details.wait_for_ready().await?;
        Ok(Some(details))
    }

    /// Changes an existing employee's names.
    ///
    /// The employee must exist: an unknown id is `Error::Precondition`.
    pub async fn update_employee(
        &self,
        employee_id: &str,
        update: &EmployeeUpdate,
    ) -> Result<UpdateEmployeeOutcome> {
        let details = self
            .open_personal_details(employee_id)
            .await?
            .ok_or_else(|| {
                Error::Precondition(format!("employee '{}' does not exist", employee_id))
            })?;

        let first = match &update.first_name {
            Some(first) => first.clone(),
            None => details.first_name().await.unwrap_or_default(),
        };
        let last = match &update.last_name {
            Some(last) => last.clone(),
            None => details.last_name().await.unwrap_or_default(),
        };
        details
            .fill_names(&first, update.middle_name.as_deref(), &last)
            .await?;
        details.save().await?;

        let form = details.form();
        let toast = details.toast();
        let feedback = poll::poll_for(|| read_feedback(&toast, &form), self.poll).await;
        let outcome = match feedback {
            Some(Feedback::Success(toast)) => UpdateEmployeeOutcome::Updated {
                emp_number: details.emp_number(),
                toast,
            },
            Some(other) => UpdateEmployeeOutcome::ValidationError {
                messages: messages_of(other),
            },
            None => UpdateEmployeeOutcome::ValidationError {
                messages: details.validation_errors().await,
            },
        };
        tracing::info!(employee_id, status = outcome.status(), "Update employee finished");
        Ok(outcome)
    }

    /// Terminates an employee from their job details.
    ///
    /// An unknown id is `NotFound`, not an error: termination tests probe
    /// ids that may already have been cleaned up.
    pub async fn terminate_employee(
        &self,
        employee_id: &str,
        termination: &Termination,
    ) -> Result<TerminationOutcome> {
        let Some(details) = self.open_personal_details(employee_id).await? else {
            tracing::info!(employee_id, "No employee to terminate");
            return Ok(TerminationOutcome::NotFound {
                employee_id: employee_id.to_string(),
            });
        };
        let emp_number = details.emp_number();
        let job = JobDetailsPage::new(&self.handle, emp_number);
        job.navigate().await?;

        if let Some(on) = job.terminated_on().await {
            return Ok(TerminationOutcome::NotAvailable {
                reason: format!("already terminated ({})", on),
            });
        }
        if !job.termination_available().await {
            return Ok(TerminationOutcome::NotAvailable {
                reason: "termination is not offered for this employee".into(),
            });
        }

        let form = job.open_termination().await?;
        let reasons = form.dropdown_options("Termination Reason").await?;
        let reason = termination
            .reason
            .as_ref()
            .and_then(|wanted| reasons.iter().find(|r| r.eq_ignore_ascii_case(wanted)))
            .or_else(|| reasons.first())
            .cloned();
        let Some(reason) = reason else {
            return Ok(TerminationOutcome::NotAvailable {
                reason: "no termination reasons are configured".into(),
            });
        };
        job.submit_termination(&form, &ui_date(termination.date), &reason)
            .await?;

        let toast = job.toast();
        let terminated = poll::poll_for(
            || async {
                if let Some(on) = job.terminated_on().await {
                    return Some(Ok(Some(on)));
                }
                match read_feedback(&toast, &form).await {
                    Some(Feedback::Success(_)) => Some(Ok(None)),
                    Some(other) => Some(Err(messages_of(other).join("; "))),
                    None => None,
                }
            },
            self.poll,
        )
        .await;

        let outcome = match terminated {
            Some(Ok(terminated_on)) => TerminationOutcome::Terminated {
                emp_number,
                terminated_on,
            },
            Some(Err(reason)) => TerminationOutcome::NotAvailable { reason },
            None => TerminationOutcome::NotAvailable {
                reason: "termination was not confirmed".into(),
            },
        };
        tracing::info!(employee_id, status = outcome.status(), "Terminate employee finished");
        Ok(outcome)
    }
}
