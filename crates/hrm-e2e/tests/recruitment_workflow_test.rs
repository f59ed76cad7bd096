// Integration tests for RecruitmentWorkflow
//
// Tests cover:
// - Adding a candidate lands on the new profile
// - Inline email validation
// - Candidate search by keyword
// - Shortlisting: shortlisted, past the stage, unknown candidate
// - Vacancy listing


use fake_hrm::FakeHrm;
use hrm_e2e::TestDataFactory;
use hrm_e2e::data::Candidate;
use hrm_e2e::workflows::{CandidateOutcome, RecruitmentWorkflow, ShortlistOutcome};

// ============================================================================
// Candidates
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_add_candidate_opens_profile() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;
    let candidate = TestDataFactory::new()
        .candidate()
        .vacancy("Senior QA Lead")
        .build()
        .expect("Failed to build candidate");

    let outcome = RecruitmentWorkflow::new(&handle)
        .add_candidate(&candidate)
        .await
        .expect("Failed to add candidate");

    assert_eq!(
        outcome,
        CandidateOutcome::Saved {
            candidate_id: 3,
            toast: Some("Successfully Saved".into()),
        }
    );
    let state = hrm.state();
    let stored = state
        .candidates
        .iter()
        .find(|c| c.id == 3)
        .expect("candidate stored");
    assert_eq!(stored.name, candidate.full_name());
    assert_eq!(stored.vacancy, "Senior QA Lead");
    assert_eq!(stored.hiring_manager, "Odis Adalwin");
    assert_eq!(stored.status, "Application Initiated");
}

#[tokio::test(start_paused = true)]
async fn test_malformed_email_is_a_validation_outcome() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;
    let candidate = Candidate {
        first_name: "Grace".into(),
        middle_name: None,
        last_name: "Brewster".into(),
        email: "not-an-email".into(),
        vacancy: None,
    };

    let outcome = RecruitmentWorkflow::new(&handle)
        .add_candidate(&candidate)
        .await
        .expect("validation is not an error");

    assert_eq!(outcome.status(), "validation_error");
    assert_eq!(outcome.candidate_id(), None);
    assert_eq!(
        outcome.validation_messages(),
        ["Expected format: admin@example.com"]
    );
    assert_eq!(hrm.state().candidates.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_search_candidates_by_keyword() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;
    let workflow = RecruitmentWorkflow::new(&handle);

    let all = workflow
        .search_candidates(None)
        .await
        .expect("Failed to search candidates");
    assert_eq!(all.len(), 2);

    let andersons = workflow
        .search_candidates(Some("Anderson"))
        .await
        .expect("Failed to search candidates");
    assert_eq!(andersons.len(), 2);

    let peter = workflow
        .search_candidates(Some("Peter"))
        .await
        .expect("Failed to search candidates");
    assert_eq!(peter.len(), 1);
    assert_eq!(peter[0].name, "Peter Mac Anderson");
    assert_eq!(peter[0].vacancy, "Senior QA Lead");
    assert_eq!(peter[0].hiring_manager, "Odis Adalwin");
    assert_eq!(peter[0].status, "Application Initiated");
}

// ============================================================================
// Shortlist
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_shortlist_candidate() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;

    let outcome = RecruitmentWorkflow::new(&handle)
        .shortlist_candidate("Peter")
        .await
        .expect("Failed to shortlist");

    assert_eq!(
        outcome,
        ShortlistOutcome::Shortlisted {
            candidate_id: 1,
            pipeline_status: "Shortlisted".into(),
        }
    );
    let state = hrm.state();
    let peter = state.candidates.iter().find(|c| c.id == 1).expect("Peter exists");
    assert_eq!(peter.status, "Shortlisted");
}

#[tokio::test(start_paused = true)]
async fn test_shortlist_hired_candidate_is_not_available() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;

    let outcome = RecruitmentWorkflow::new(&handle)
        .shortlist_candidate("Linda")
        .await
        .expect("not available is not an error");

    match outcome {
        ShortlistOutcome::NotAvailable {
            pipeline_status, ..
        } => assert_eq!(pipeline_status.as_deref(), Some("Hired")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    let state = hrm.state();
    let linda = state.candidates.iter().find(|c| c.id == 2).expect("Linda exists");
    assert_eq!(linda.status, "Hired");
}

#[tokio::test(start_paused = true)]
async fn test_shortlist_unknown_candidate_is_not_found() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;

    let outcome = RecruitmentWorkflow::new(&handle)
        .shortlist_candidate("Nobody")
        .await
        .expect("not found is not an error");

    assert_eq!(
        outcome,
        ShortlistOutcome::NotFound {
            name: "Nobody".into()
        }
    );
}

// ============================================================================
// Vacancies
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_list_vacancies() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;

    let vacancies = RecruitmentWorkflow::new(&handle)
        .list_vacancies()
        .await
        .expect("Failed to list vacancies");

    assert_eq!(vacancies.len(), 2);
    assert_eq!(vacancies[0].name, "Senior QA Lead");
    assert_eq!(vacancies[0].job_title, "QA Lead");
    assert_eq!(vacancies[0].status, "Active");
    assert_eq!(vacancies[1].name, "Junior Account Assistant");
    assert_eq!(vacancies[1].hiring_manager, "Paul Collings");
    assert_eq!(vacancies[1].status, "Closed");
}
