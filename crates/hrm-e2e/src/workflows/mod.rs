// Workflows - Business-level operations composed from pages
//
// Every operation follows the same shape: navigate and wait for the screen,
// fill or act, then poll every feedback channel (toast, inline errors, URL)
// at once until one of them reports a terminal state. Expected negative
// results come back as an outcome variant; only infrastructure failures and
// violated preconditions are `Err`.
//
// Outcome enums are per workflow on purpose: each one's tag set is what that
// screen can actually report. Accessors derive everything from the variant,
// so auxiliary signals can never disagree with the tag.

mod admin;
mod auth;
mod employee;
mod leave;
mod recruitment;

pub use admin::{AdminWorkflow, JobTitleDeletion, JobTitleOutcome, SystemUserQuery, SystemUserSummary};
pub use auth::AuthWorkflow;
pub use employee::{
    CreateEmployeeOutcome, EmployeeSearchCriteria, EmployeeSearchResult, EmployeeUpdate,
    EmployeeWorkflow, Termination, TerminationOutcome, UpdateEmployeeOutcome,
};
pub use leave::{
    ApplyLeaveAttempt, Combination, LeaveAction, LeaveActionOutcome, LeaveAssignmentAttempt,
    LeaveWorkflow, SearchBudget,
};
pub use recruitment::{
    CandidateOutcome, CandidateSummary, RecruitmentWorkflow, ShortlistOutcome, VacancySummary,
};

use crate::components::{Form, Toast, ToastKind};

/// What the screen said after a submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Feedback {
    /// Success toast, with its message
    Success(String),
    /// Any other toast ("Failed to Submit", "No Working Days Selected")
    Failure(String),
    /// Inline validation messages under the form fields
    Invalid(Vec<String>),
}

/// Reads the toast and the form's inline errors in one tick.
///
/// `None` means neither channel has said anything yet.
pub(crate) async fn read_feedback(toast: &Toast, form: &Form) -> Option<Feedback> {
    if toast.is_visible().await {
        let message = toast.message().await.unwrap_or_default();
        let success = match toast.kind().await {
            Some(kind) => kind == ToastKind::Success,
            None => message.to_lowercase().contains("success"),
        };
        return Some(if success {
            Feedback::Success(message)
        } else {
            Feedback::Failure(message)
        });
    }
    let errors = form.validation_errors().await;
    (!errors.is_empty()).then_some(Feedback::Invalid(errors))
}

/// Messages carried by any kind of feedback
pub(crate) fn messages_of(feedback: Feedback) -> Vec<String> {
    match feedback {
        Feedback::Success(m) | Feedback::Failure(m) => vec![m],
        Feedback::Invalid(messages) => messages,
    }
}

/// Cell text by column, empty when the row is shorter
pub(crate) fn cell(cells: &[String], column: usize) -> String {
    cells.get(column).cloned().unwrap_or_default()
}
