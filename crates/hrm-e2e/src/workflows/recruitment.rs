// RecruitmentWorkflow - Candidates and vacancies

use crate::data::Candidate;
use crate::driver::PageHandle;
use crate::error::{Error, Result};
use crate::pages::{
    AddCandidatePage, CandidateProfilePage, CandidatesPage, PageObject, VacanciesPage,
};
use crate::poll::{self, PollOptions};
use crate::routes::Routes;
use crate::workflows::{Feedback, cell, messages_of, read_feedback};
use serde::Serialize;

/// Pipeline status the shortlist action moves a candidate to
const SHORTLISTED: &str = "Shortlisted";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    Saved {
        candidate_id: u64,
        toast: Option<String>,
    },
    ValidationError { messages: Vec<String> },
}

impl CandidateOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Saved { .. } => "saved",
            Self::ValidationError { .. } => "validation_error",
        }
    }

    pub fn candidate_id(&self) -> Option<u64> {
        match self {
            Self::Saved { candidate_id, .. } => Some(*candidate_id),
            Self::ValidationError { .. } => None,
        }
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
pub enum ShortlistOutcome {
    Shortlisted {
        candidate_id: u64,
        pipeline_status: String,
    },
    NotFound { name: String },
    /// The candidate is past the stage where shortlisting is offered
    NotAvailable {
        name: String,
        pipeline_status: Option<String>,
    },
}

impl ShortlistOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Shortlisted { .. } => "shortlisted",
            Self::NotFound { .. } => "not_found",
            Self::NotAvailable { .. } => "not_available",
        }
    }
}

/// One row of the candidates list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub vacancy: String,
    pub name: String,
    pub hiring_manager: String,
    pub date_applied: String,
    pub status: String,
}

/// One row of the vacancies list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancySummary {
    pub name: String,
    pub job_title: String,
    pub hiring_manager: String,
    pub status: String,
}

enum SaveSignal {
    Saved,
    Feedback(Feedback),
}

pub struct RecruitmentWorkflow {
    handle: PageHandle,
    poll: PollOptions,
}

impl RecruitmentWorkflow {
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

    /// Adds a candidate. Saved once the app opens the new profile.
    pub async fn add_candidate(&self, candidate: &Candidate) -> Result<CandidateOutcome> {
        tracing::info!(name = %candidate.full_name(), "Adding candidate");
        let page = AddCandidatePage::new(&self.handle);
        page.navigate().await?;
        page.fill_names(
            &candidate.first_name,
            candidate.middle_name.as_deref(),
            &candidate.last_name,
        )
        .await?;
        page.set_email(&candidate.email).await?;
        if let Some(vacancy) = &candidate.vacancy {
            page.select_vacancy(vacancy).await?;
        }
        page.save().await?;

        let profile_prefix = Routes::contains(&format!("{}/", self.handle.routes().add_candidate));
        let form = page.form();
        let toast = page.toast();
        let signal = poll::poll_for(
            || async {
                if self.handle.url_matches(&profile_prefix).await {
                    return Some(SaveSignal::Saved);
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
            Some(SaveSignal::Saved) => {
                let profile = CandidateProfilePage::current(&self.handle)
                    .await
                    .ok_or_else(|| Error::Driver("candidate URL carries no id".into()))?;
                CandidateOutcome::Saved {
                    candidate_id: profile.candidate_id(),
                    toast: toast.wait_for_message(self.handle.timeouts().probe).await,
                }
            }
            Some(SaveSignal::Feedback(feedback)) => CandidateOutcome::ValidationError {
                messages: messages_of(feedback),
            },
            None => CandidateOutcome::ValidationError {
                messages: page.validation_errors().await,
            },
        };
        tracing::info!(status = outcome.status(), "Add candidate finished");
        Ok(outcome)
    }

    /// Lists candidates, optionally narrowed by a name keyword.
    pub async fn search_candidates(&self, name: Option<&str>) -> Result<Vec<CandidateSummary>> {
        let page = CandidatesPage::new(&self.handle);
        page.navigate().await?;
        if let Some(name) = name {
            page.set_keywords(name).await?;
            page.submit_search().await?;
        } else {
            page.table()
                .wait_for_results(self.handle.timeouts().expect)
                .await;
        }
        Ok(page
            .results()
            .await
            .iter()
            .map(|cells| CandidateSummary {
                vacancy: cell(cells, CandidatesPage::COL_VACANCY),
                name: cell(cells, CandidatesPage::COL_CANDIDATE),
                hiring_manager: cell(cells, CandidatesPage::COL_HIRING_MANAGER),
                date_applied: cell(cells, CandidatesPage::COL_DATE_APPLIED),
                status: cell(cells, CandidatesPage::COL_STATUS),
            })
            .filter(|c| !c.name.is_empty())
            .collect())
    }

    /// Moves a listed candidate to the shortlist.
    pub async fn shortlist_candidate(&self, name: &str) -> Result<ShortlistOutcome> {
        let list = CandidatesPage::new(&self.handle);
        list.navigate().await?;
        list.table()
            .wait_for_results(self.handle.timeouts().expect)
            .await;
        let Some(row) = list.find_candidate(name).await else {
            return Ok(ShortlistOutcome::NotFound {
                name: name.to_string(),
            });
        };
        list.open_candidate(row).await?;
        let profile = CandidateProfilePage::current(&self.handle)
            .await
            .ok_or_else(|| Error::Driver("candidate URL carries no id".into()))?;
        profile.wait_for_ready().await?;

        if !profile.action_available("Shortlist").await {
            return Ok(ShortlistOutcome::NotAvailable {
                name: name.to_string(),
                pipeline_status: profile.status().await,
            });
        }
        profile.perform_action("Shortlist").await?;

        let status = poll::poll_for(
            || async {
                profile
                    .status()
                    .await
                    .filter(|s| s.eq_ignore_ascii_case(SHORTLISTED))
            },
            self.poll,
        )
        .await;
        let outcome = match status {
            Some(pipeline_status) => ShortlistOutcome::Shortlisted {
                candidate_id: profile.candidate_id(),
                pipeline_status,
            },
            None => ShortlistOutcome::NotAvailable {
                name: name.to_string(),
                pipeline_status: profile.status().await,
            },
        };
        tracing::info!(name, status = outcome.status(), "Shortlist finished");
        Ok(outcome)
    }

    pub async fn list_vacancies(&self) -> Result<Vec<VacancySummary>> {
        let page = VacanciesPage::new(&self.handle);
        page.navigate().await?;
        page.table()
            .wait_for_results(self.handle.timeouts().expect)
            .await;
        Ok(page
            .results()
            .await
            .iter()
            .map(|cells| VacancySummary {
                name: cell(cells, VacanciesPage::COL_VACANCY),
                job_title: cell(cells, VacanciesPage::COL_JOB_TITLE),
                hiring_manager: cell(cells, VacanciesPage::COL_HIRING_MANAGER),
                status: cell(cells, VacanciesPage::COL_STATUS),
            })
            .filter(|v| !v.name.is_empty())
            .collect())
    }
}
