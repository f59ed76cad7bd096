// LeaveWorkflow - Apply, assign and act on leave requests
//
// Which leave types an account can use is external state the suite does
// not control, so every operation here has several legitimate endings
// besides success. The assignment search in particular only learns whether
// an employee/type combination has balance by selecting it.

use crate::components::RowCriteria;
use crate::config::millis;
use crate::data::{LeaveRequest, ui_date};
use crate::driver::PageHandle;
use crate::error::Result;
use crate::pages::{ApplyLeavePage, AssignLeavePage, LeaveListPage, PageObject};
use crate::poll::{self, PollOptions};
use crate::workflows::{Feedback, messages_of, read_feedback};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Bounds of the employee x leave-type search in `assign_leave_for_approval`
///
/// The search stops at the first combination with positive balance, after
/// `max_employees` suggestions, after `max_leave_types` types per employee,
/// or once `time_budget` has elapsed, whichever comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBudget {
    pub max_employees: usize,
    pub max_leave_types: usize,
    #[serde(with = "millis")]
    pub time_budget: Duration,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_employees: 1,
            max_leave_types: 2,
            time_budget: Duration::from_secs(20),
        }
    }
}

/// One employee/leave-type pair tried by the assignment search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combination {
    pub employee: String,
    pub leave_type: String,
    /// Balance shown after selecting both; `None` if it never rendered
    pub balance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApplyLeaveAttempt {
    Submitted { leave_type: String, toast: String },
    ValidationError { messages: Vec<String> },
    NoLeaveBalance { leave_type: Option<String> },
    /// The requested leave type is not offered (or nothing is)
    SelectionUnavailable {
        requested: Option<String>,
        offered: Vec<String>,
    },
}

impl ApplyLeaveAttempt {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "submitted",
            Self::ValidationError { .. } => "validation_error",
            Self::NoLeaveBalance { .. } => "no_leave_balance",
            Self::SelectionUnavailable { .. } => "selection_unavailable",
        }
    }

    pub fn has_success_feedback(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    /// True for a validation failure that mentions the dates
    pub fn has_past_date_validation(&self) -> bool {
        match self {
            Self::ValidationError { messages } => messages.iter().any(|m| is_date_message(m)),
            _ => false,
        }
    }

    pub fn validation_messages(&self) -> &[String] {
        match self {
            Self::ValidationError { messages } => messages,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LeaveAssignmentAttempt {
    Submitted {
        employee: String,
        leave_type: String,
        balance: f64,
        toast: String,
    },
    ValidationError { messages: Vec<String> },
    /// Every combination tried had no balance
    NoLeaveBalance {
        tried: Vec<Combination>,
        budget_exhausted: bool,
    },
    /// No employee matched, or no leave type was offered
    SelectionUnavailable { reason: String },
}

impl LeaveAssignmentAttempt {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "submitted",
            Self::ValidationError { .. } => "validation_error",
            Self::NoLeaveBalance { .. } => "no_leave_balance",
            Self::SelectionUnavailable { .. } => "selection_unavailable",
        }
    }

    pub fn has_success_feedback(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    pub fn has_past_date_validation(&self) -> bool {
        match self {
            Self::ValidationError { messages } => messages.iter().any(|m| is_date_message(m)),
            _ => false,
        }
    }

    /// Combinations inspected before giving up (empty unless `NoLeaveBalance`)
    pub fn tried(&self) -> &[Combination] {
        match self {
            Self::NoLeaveBalance { tried, .. } => tried,
            _ => &[],
        }
    }
}

fn is_date_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("past") || message.contains("date")
}

/// Action on a pending leave request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveAction {
    Approve,
    Reject,
}

impl LeaveAction {
    /// Button label in the leave list
    pub fn label(&self) -> &'static str {
        match self {
            LeaveAction::Approve => "Approve",
            LeaveAction::Reject => "Reject",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LeaveActionOutcome {
    Approved {
        employee: String,
        toast: Option<String>,
    },
    Rejected {
        employee: String,
        toast: Option<String>,
    },
    NotFound { employee: String },
    /// The request is listed but does not offer the action
    NotAvailable {
        employee: String,
        leave_status: Option<String>,
    },
}

impl LeaveActionOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Approved { .. } => "approved",
            Self::Rejected { .. } => "rejected",
            Self::NotFound { .. } => "not_found",
            Self::NotAvailable { .. } => "not_available",
        }
    }

    pub fn has_success_feedback(&self) -> bool {
        matches!(
            self,
            Self::Approved { toast: Some(_), .. } | Self::Rejected { toast: Some(_), .. }
        )
    }
}

enum AssignSignal {
    Confirm,
    Feedback(Feedback),
}

pub struct LeaveWorkflow {
    handle: PageHandle,
    budget: SearchBudget,
    poll: PollOptions,
}

impl LeaveWorkflow {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
            budget: SearchBudget::default(),
            poll: PollOptions::with_timeout(handle.timeouts().expect),
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_poll(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    pub fn budget(&self) -> &SearchBudget {
        &self.budget
    }

    /// Applies for leave as the logged-in user.
    pub async fn apply_for_leave(&self, request: &LeaveRequest) -> Result<ApplyLeaveAttempt> {
        let page = ApplyLeavePage::new(&self.handle);
        page.navigate().await?;

        if page.has_no_balance_notice().await {
            tracing::info!("Apply leave: no leave type has balance");
            return Ok(ApplyLeaveAttempt::NoLeaveBalance {
                leave_type: request.leave_type.clone(),
            });
        }

        let offered = page.leave_types().await?;
        let chosen = match &request.leave_type {
            Some(wanted) => offered.iter().find(|o| o.eq_ignore_ascii_case(wanted)),
            None => offered.first(),
        }
        .cloned();
        let Some(leave_type) = chosen else {
            return Ok(ApplyLeaveAttempt::SelectionUnavailable {
                requested: request.leave_type.clone(),
                offered,
            });
        };
        page.select_leave_type(&leave_type).await?;

        // balance renders after the type is chosen
        let balance = poll::poll_for(
            || page.balance(),
            PollOptions::with_timeout(self.handle.timeouts().probe),
        )
        .await;
        if balance.is_some_and(|days| days <= 0.0) {
            return Ok(ApplyLeaveAttempt::NoLeaveBalance {
                leave_type: Some(leave_type),
            });
        }

        page.set_dates(&ui_date(request.from), &ui_date(request.to))
            .await?;
        if let Some(comment) = &request.comment {
            page.set_comment(comment).await?;
        }
        page.submit().await?;

        let form = page.form();
        let toast = page.toast();
        let feedback = poll::poll_for(|| read_feedback(&toast, &form), self.poll).await;
        let attempt = match feedback {
            Some(Feedback::Success(toast)) => ApplyLeaveAttempt::Submitted { leave_type, toast },
            Some(other) => ApplyLeaveAttempt::ValidationError {
                messages: messages_of(other),
            },
            None => ApplyLeaveAttempt::ValidationError {
                messages: page.validation_errors().await,
            },
        };
        tracing::info!(status = attempt.status(), "Apply leave finished");
        Ok(attempt)
    }

    /// Assigns leave to an employee found by `employee_query`.
    ///
    /// Walks employee suggestions and their leave types within the search
    /// budget, stopping at the first combination showing positive balance,
    /// then submits (confirming the balance dialog if it appears).
    pub async fn assign_leave_for_approval(
        &self,
        employee_query: &str,
        request: &LeaveRequest,
    ) -> Result<LeaveAssignmentAttempt> {
        let page = AssignLeavePage::new(&self.handle);
        page.navigate().await?;

        let started = Instant::now();
        let over_budget = || started.elapsed() >= self.budget.time_budget;
        let probe = PollOptions::with_timeout(self.handle.timeouts().probe);

        let suggestions = page.employee_suggestions(employee_query).await?;
        if suggestions.is_empty() {
            return Ok(LeaveAssignmentAttempt::SelectionUnavailable {
                reason: format!("no employee matches '{}'", employee_query),
            });
        }

        let mut tried = Vec::new();
        let mut any_type_offered = false;
        let mut budget_exhausted = false;
        let mut found = None;

        'employees: for (index, employee) in suggestions
            .iter()
            .enumerate()
            .take(self.budget.max_employees)
        {
            if over_budget() {
                budget_exhausted = true;
                break;
            }
            if index > 0 {
                // choosing a suggestion closes the list; type again to reopen it
                page.employee_suggestions(employee_query).await?;
            }
            page.choose_employee(index).await?;

            let types: Vec<String> = page
                .leave_types()
                .await?
                .into_iter()
                .filter(|t| {
                    request
                        .leave_type
                        .as_ref()
                        .is_none_or(|wanted| t.eq_ignore_ascii_case(wanted))
                })
                .take(self.budget.max_leave_types)
                .collect();

            for leave_type in types {
                if over_budget() {
                    budget_exhausted = true;
                    break 'employees;
                }
                any_type_offered = true;
                page.select_leave_type(&leave_type).await?;
                let balance = poll::poll_for(|| page.balance(), probe).await;
                tracing::debug!(%employee, %leave_type, ?balance, "Assign leave candidate");
                tried.push(Combination {
                    employee: employee.clone(),
                    leave_type: leave_type.clone(),
                    balance,
                });
                if let Some(days) = balance.filter(|days| *days > 0.0) {
                    found = Some((employee.clone(), leave_type, days));
                    break 'employees;
                }
            }
        }

        let Some((employee, leave_type, balance)) = found else {
            // an aborted search says nothing about which types are offered
            let attempt = if any_type_offered || budget_exhausted {
                LeaveAssignmentAttempt::NoLeaveBalance {
                    tried,
                    budget_exhausted,
                }
            } else {
                LeaveAssignmentAttempt::SelectionUnavailable {
                    reason: "no leave type is offered".into(),
                }
            };
            tracing::info!(status = attempt.status(), "Assign leave finished without submitting");
            return Ok(attempt);
        };

        page.set_dates(&ui_date(request.from), &ui_date(request.to))
            .await?;
        if let Some(comment) = &request.comment {
            page.set_comment(comment).await?;
        }
        page.submit().await?;

        let form = page.form();
        let toast = page.toast();
        let dialog = page.confirmation();
        let mut confirmed = false;
        let attempt = loop {
            let signal = poll::poll_for(
                || async {
                    if dialog.is_open().await {
                        return Some(AssignSignal::Confirm);
                    }
                    read_feedback(&toast, &form).await.map(AssignSignal::Feedback)
                },
                self.poll,
            )
            .await;
            match signal {
                Some(AssignSignal::Confirm) if !confirmed => {
                    dialog.confirm().await?;
                    confirmed = true;
                }
                Some(AssignSignal::Confirm) => {
                    break LeaveAssignmentAttempt::ValidationError {
                        messages: vec!["assignment is still waiting for confirmation".into()],
                    };
                }
                Some(AssignSignal::Feedback(Feedback::Success(toast))) => {
                    break LeaveAssignmentAttempt::Submitted {
                        employee,
                        leave_type,
                        balance,
                        toast,
                    };
                }
                Some(AssignSignal::Feedback(other)) => {
                    break LeaveAssignmentAttempt::ValidationError {
                        messages: messages_of(other),
                    };
                }
                None => {
                    break LeaveAssignmentAttempt::ValidationError {
                        messages: page.validation_errors().await,
                    };
                }
            }
        };
        tracing::info!(status = attempt.status(), "Assign leave finished");
        Ok(attempt)
    }

    /// Approves or rejects the first listed request of `employee`.
    pub async fn act_on_leave(
        &self,
        employee: &str,
        action: LeaveAction,
    ) -> Result<LeaveActionOutcome> {
        let page = LeaveListPage::new(&self.handle);
        page.navigate().await?;
        let table = page.table();
        table.wait_for_results(self.handle.timeouts().expect).await;

        let criteria = RowCriteria::new().contains(LeaveListPage::COL_EMPLOYEE, employee);
        let Some(row) = table.find_row(&criteria).await else {
            return Ok(LeaveActionOutcome::NotFound {
                employee: employee.to_string(),
            });
        };
        if !page.action_available(row, action.label()).await {
            return Ok(LeaveActionOutcome::NotAvailable {
                employee: employee.to_string(),
                leave_status: table.cell_text(row, LeaveListPage::COL_STATUS).await,
            });
        }
        page.perform_action(row, action.label()).await?;

        let toast = page.toast();
        let done = poll::poll_for(
            || async {
                if toast.is_success().await {
                    return Some(toast.message().await);
                }
                let still_pending = match table.find_row(&criteria).await {
                    Some(row) => page.action_available(row, action.label()).await,
                    None => false,
                };
                (!still_pending).then_some(None)
            },
            self.poll,
        )
        .await;

        let employee = employee.to_string();
        let outcome = match (done, action) {
            (Some(toast), LeaveAction::Approve) => LeaveActionOutcome::Approved { employee, toast },
            (Some(toast), LeaveAction::Reject) => LeaveActionOutcome::Rejected { employee, toast },
            (None, _) => LeaveActionOutcome::NotAvailable {
                employee,
                leave_status: table.cell_text(row, LeaveListPage::COL_STATUS).await,
            },
        };
        tracing::info!(status = outcome.status(), "Leave action finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let budget = SearchBudget::default();
        assert_eq!(budget.max_employees, 1);
        assert_eq!(budget.max_leave_types, 2);
        assert_eq!(budget.time_budget, Duration::from_secs(20));

        let json = serde_json::to_value(budget).unwrap();
        assert_eq!(json["timeBudget"], 20_000);
    }

    #[test]
    fn test_past_date_flag_only_on_validation_errors() {
        let invalid = ApplyLeaveAttempt::ValidationError {
            messages: vec!["Should be a valid date in yyyy-dd-mm format".into()],
        };
        assert!(invalid.has_past_date_validation());
        assert!(!invalid.has_success_feedback());

        let no_balance = ApplyLeaveAttempt::NoLeaveBalance { leave_type: None };
        assert!(!no_balance.has_past_date_validation());
        assert!(!no_balance.has_success_feedback());
        assert_eq!(no_balance.status(), "no_leave_balance");

        let required = ApplyLeaveAttempt::ValidationError {
            messages: vec!["Required".into()],
        };
        assert!(!required.has_past_date_validation());
    }

    #[test]
    fn test_status_tag_matches_serialized_tag() {
        let attempts = [
            LeaveAssignmentAttempt::SelectionUnavailable { reason: "x".into() },
            LeaveAssignmentAttempt::NoLeaveBalance {
                tried: vec![],
                budget_exhausted: true,
            },
            LeaveAssignmentAttempt::ValidationError { messages: vec![] },
        ];
        for attempt in attempts {
            let json = serde_json::to_value(&attempt).unwrap();
            assert_eq!(json["status"], attempt.status());
        }
    }
}
