// Integration tests for AdminWorkflow
//
// Tests cover:
// - Adding a job title, and the duplicate-title validation outcome
// - Deleting through the confirmation dialog, and deleting a missing title
// - A confirmed delete that never lands, within the configured expect budget
// - System user search by username and by role


use fake_hrm::{FakeHrm, HrmState, config};
use hrm_e2e::TestDataFactory;
use hrm_e2e::data::JobTitle;
use hrm_e2e::workflows::{AdminWorkflow, JobTitleDeletion, JobTitleOutcome, SystemUserQuery};
use std::time::Duration;
use tokio::time::Instant;

// ============================================================================
// Job titles
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_add_job_title() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;
    let job_title = TestDataFactory::new()
        .job_title()
        .build()
        .expect("Failed to build job title");

    let outcome = AdminWorkflow::new(&handle)
        .add_job_title(&job_title)
        .await
        .expect("Failed to add job title");

    assert!(outcome.is_saved());
    assert_eq!(
        outcome,
        JobTitleOutcome::Saved {
            title: job_title.title.clone(),
            toast: Some("Successfully Saved".into()),
        }
    );
    assert!(
        hrm.state()
            .job_titles
            .iter()
            .any(|(title, _)| *title == job_title.title)
    );
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_job_title_is_a_validation_outcome() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;
    let job_title = JobTitle {
        title: "QA Engineer".into(),
        description: None,
    };

    let outcome = AdminWorkflow::new(&handle)
        .add_job_title(&job_title)
        .await
        .expect("validation is not an error");

    assert_eq!(outcome.status(), "validation_error");
    assert_eq!(outcome.validation_messages(), ["Already exists"]);
    assert_eq!(hrm.state().job_titles.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_delete_job_title_confirms_the_dialog() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;

    let outcome = AdminWorkflow::new(&handle)
        .delete_job_title("Account Assistant")
        .await
        .expect("Failed to delete job title");

    assert_eq!(
        outcome,
        JobTitleDeletion::Deleted {
            title: "Account Assistant".into()
        }
    );
    let state = hrm.state();
    assert_eq!(state.job_titles.len(), 1);
    assert!(state.job_titles.iter().all(|(title, _)| title != "Account Assistant"));
}

#[tokio::test(start_paused = true)]
async fn test_delete_missing_job_title_is_not_found() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;

    let outcome = AdminWorkflow::new(&handle)
        .delete_job_title("Nope")
        .await
        .expect("not found is not an error");

    assert_eq!(outcome.status(), "not_found");
    assert_eq!(hrm.state().job_titles.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_delete_that_never_lands_is_not_deleted() {
    let state = HrmState {
        reject_deletes: true,
        ..HrmState::default()
    };
    let hrm = FakeHrm::with_state(state);
    let handle = hrm.logged_in().await;

    let started = Instant::now();
    let outcome = AdminWorkflow::new(&handle)
        .delete_job_title("Account Assistant")
        .await
        .expect("a lingering row is not an error");

    assert_eq!(
        outcome,
        JobTitleDeletion::NotDeleted {
            title: "Account Assistant".into()
        }
    );
    assert_eq!(outcome.status(), "not_deleted");
    // default expect budget is 10s
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(10), "{waited:?}");
    assert!(waited < Duration::from_secs(15), "{waited:?}");
    assert_eq!(hrm.state().job_titles.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_delete_poll_follows_expect_timeout() {
    let state = HrmState {
        reject_deletes: true,
        ..HrmState::default()
    };
    let hrm = FakeHrm::with_state(state);
    let mut config = config();
    config.timeouts.expect = Duration::from_secs(2);
    let handle = hrm.logged_in_with(config).await;

    let started = Instant::now();
    let outcome = AdminWorkflow::new(&handle)
        .delete_job_title("QA Engineer")
        .await
        .expect("a lingering row is not an error");

    assert_eq!(outcome.status(), "not_deleted");
    let waited = started.elapsed();
    assert!(waited >= Duration::from_secs(2), "{waited:?}");
    assert!(waited < Duration::from_secs(5), "{waited:?}");
}

// ============================================================================
// System users
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_search_system_users() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;
    let workflow = AdminWorkflow::new(&handle);

    let everyone = workflow
        .search_system_users(&SystemUserQuery::default())
        .await
        .expect("Failed to search users");
    assert_eq!(everyone.len(), 3);

    let admin = workflow
        .search_system_users(&SystemUserQuery {
            username: Some("admin".into()),
            role: None,
        })
        .await
        .expect("Failed to search users");
    assert_eq!(admin.len(), 1);
    assert_eq!(admin[0].username, "Admin");
    assert_eq!(admin[0].role, "Admin");
    assert_eq!(admin[0].employee_name, "Paul Collings");
}

#[tokio::test(start_paused = true)]
async fn test_search_system_users_by_role() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;

    let ess = AdminWorkflow::new(&handle)
        .search_system_users(&SystemUserQuery {
            username: None,
            role: Some("ESS".into()),
        })
        .await
        .expect("Failed to search users");

    let names: Vec<&str> = ess.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["ada.l", "alan.t"]);
    assert!(ess.iter().all(|u| u.role == "ESS"));
    assert_eq!(ess[1].status, "Disabled");
}
