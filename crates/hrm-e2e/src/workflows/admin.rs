// AdminWorkflow - Job titles and system users

use crate::data::JobTitle;
use crate::driver::PageHandle;
use crate::error::Result;
use crate::pages::{JobTitlesPage, PageObject, PageState, SystemUsersPage};
use crate::poll::{self, PollOptions};
use crate::workflows::{Feedback, cell, messages_of, read_feedback};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobTitleOutcome {
    Saved { title: String, toast: Option<String> },
    /// Rejected by the form, e.g. "Already exists"
    ValidationError { messages: Vec<String> },
}

impl JobTitleOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Saved { .. } => "saved",
            Self::ValidationError { .. } => "validation_error",
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn validation_messages(&self) -> &[String] {
        match self {
            Self::ValidationError { messages } => messages,
            Self::Saved { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobTitleDeletion {
    Deleted { title: String },
    NotFound { title: String },
    /// Confirmed, but the row was still listed when the poll expired
    NotDeleted { title: String },
}

impl JobTitleDeletion {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Deleted { .. } => "deleted",
            Self::NotFound { .. } => "not_found",
            Self::NotDeleted { .. } => "not_deleted",
        }
    }
}

/// Filters of the system users list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemUserQuery {
    pub username: Option<String>,
    /// "Admin" or "ESS"
    pub role: Option<String>,
}

/// One row of the system users list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemUserSummary {
    pub username: String,
    pub role: String,
    pub employee_name: String,
    pub status: String,
}

enum SaveSignal {
    Listed,
    Feedback(Feedback),
}

pub struct AdminWorkflow {
    handle: PageHandle,
    poll: PollOptions,
}

impl AdminWorkflow {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
            poll: PollOptions::with_timeout(handle.timeouts().expect),
        }
    }

    pub fn with_poll(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    /// Adds a job title. Saved once the app returns to the list.
    pub async fn add_job_title(&self, job_title: &JobTitle) -> Result<JobTitleOutcome> {
        let page = JobTitlesPage::new(&self.handle);
        page.navigate().await?;
        page.open_add_form().await?;
        page.fill_title_form(&job_title.title, job_title.description.as_deref())
            .await?;
        page.save().await?;

        let form = page.form();
        let toast = page.toast();
        let signal = poll::poll_for(
            || async {
                if page.state().await == PageState::Ready {
                    return Some(SaveSignal::Listed);
                }
                match read_feedback(&toast, &form).await {
                    Some(Feedback::Success(_)) | None => None,
                    Some(other) => Some(SaveSignal::Feedback(other)),
                }
            },
            self.poll,
        )
        .await;

        let outcome = match signal {
            Some(SaveSignal::Listed) => JobTitleOutcome::Saved {
                title: job_title.title.clone(),
                toast: toast.wait_for_message(self.handle.timeouts().probe).await,
            },
            Some(SaveSignal::Feedback(feedback)) => JobTitleOutcome::ValidationError {
                messages: messages_of(feedback),
            },
            None => JobTitleOutcome::ValidationError {
                messages: page.validation_errors().await,
            },
        };
        tracing::info!(title = %job_title.title, status = outcome.status(), "Add job title finished");
        Ok(outcome)
    }

    /// Deletes a job title by exact name.
    ///
    /// A confirmed deletion whose row never leaves the list is
    /// `JobTitleDeletion::NotDeleted`.
    pub async fn delete_job_title(&self, title: &str) -> Result<JobTitleDeletion> {
        let page = JobTitlesPage::new(&self.handle);
        page.navigate().await?;
        page.table()
            .wait_for_results(self.handle.timeouts().expect)
            .await;
        let Some(row) = page.find_title(title).await else {
            return Ok(JobTitleDeletion::NotFound {
                title: title.to_string(),
            });
        };
        page.delete_row(row).await?;

        let gone = poll::poll_until(|| async { page.find_title(title).await.is_none() }, self.poll)
            .await;
        if !gone {
            tracing::warn!(title, waited = ?self.poll.timeout, "Job title still listed after delete");
            return Ok(JobTitleDeletion::NotDeleted {
                title: title.to_string(),
            });
        }
        tracing::info!(title, "Job title deleted");
        Ok(JobTitleDeletion::Deleted {
            title: title.to_string(),
        })
    }

    /// Filters the system users list.
    pub async fn search_system_users(
        &self,
        query: &SystemUserQuery,
    ) -> Result<Vec<SystemUserSummary>> {
        let page = SystemUsersPage::new(&self.handle);
        page.navigate().await?;
        if let Some(username) = &query.username {
            page.set_username(username).await?;
        }
        if let Some(role) = &query.role {
            page.select_role(role).await?;
        }
        page.submit_search().await?;
        Ok(page
            .results()
            .await
            .iter()
            .map(|cells| SystemUserSummary {
                username: cell(cells, SystemUsersPage::COL_USERNAME),
                role: cell(cells, SystemUsersPage::COL_ROLE),
                employee_name: cell(cells, SystemUsersPage::COL_EMPLOYEE),
                status: cell(cells, SystemUsersPage::COL_STATUS),
            })
            .filter(|user| !user.username.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_title_outcome_accessors() {
        let saved = JobTitleOutcome::Saved {
            title: "QA Lead".into(),
            toast: None,
        };
        assert!(saved.is_saved());
        assert!(saved.validation_messages().is_empty());

        let dup = JobTitleOutcome::ValidationError {
            messages: vec!["Already exists".into()],
        };
        assert!(!dup.is_saved());
        assert_eq!(dup.validation_messages(), ["Already exists".to_string()]);
        assert_eq!(serde_json::to_value(&dup).unwrap()["status"], "validation_error");
    }
}
