// Integration tests for page objects: load states and screen probes
//
// Tests cover:
// - Unloaded / Navigating / Ready transitions
// - Locating the current detail screen from the URL
// - Termination probes on the job details screen
// - Candidate profile stage probes


use fake_hrm::{FakeHrm, HrmState};
use hrm_e2e::pages::{
    CandidateProfilePage, DashboardPage, EmployeeListPage, JobDetailsPage, PageObject, PageState,
    PersonalDetailsPage,
};

// ============================================================================
// Load state
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_state_follows_navigation() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;
    let dashboard = DashboardPage::new(&handle);
    let list = EmployeeListPage::new(&handle);

    assert_eq!(dashboard.state().await, PageState::Ready);
    assert_eq!(list.state().await, PageState::Unloaded);
    assert!(!list.is_ready().await);

    list.navigate().await.expect("Failed to open employee list");

    assert!(list.is_ready().await);
    assert_eq!(dashboard.state().await, PageState::Unloaded);
}

#[tokio::test(start_paused = true)]
async fn test_matching_url_without_marker_is_navigating() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;
    let page = PersonalDetailsPage::new(&handle, 999);

    handle
        .goto_path(&page.path())
        .await
        .expect("Failed to navigate");

    assert_eq!(page.state().await, PageState::Navigating);
    let err = page.wait_for_ready().await.expect_err("marker never renders");
    assert!(err.is_timeout(), "{err}");
}

#[tokio::test(start_paused = true)]
async fn test_current_detail_screen_comes_from_url() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;
    assert!(PersonalDetailsPage::current(&handle).await.is_none());

    PersonalDetailsPage::new(&handle, 2)
        .navigate()
        .await
        .expect("Failed to open personal details");

    let current = PersonalDetailsPage::current(&handle)
        .await
        .expect("on a personal details screen");
    assert_eq!(current.emp_number(), 2);
    assert_eq!(current.first_name().await.as_deref(), Some("Alan"));
    assert_eq!(current.last_name().await.as_deref(), Some("Turing"));
    assert!(CandidateProfilePage::current(&handle).await.is_none());
}

// ============================================================================
// Job details
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_termination_probes() {
    let mut state = HrmState::default();
    state.employees[0].terminated_on = Some("2025-01-31".into());
    let hrm = FakeHrm::with_state(state);
    let handle = hrm.logged_in().await;

    let active = JobDetailsPage::new(&handle, 2);
    active.navigate().await.expect("Failed to open job details");
    assert!(active.termination_available().await);
    assert_eq!(active.terminated_on().await, None);

    let terminated = JobDetailsPage::new(&handle, 1);
    terminated.navigate().await.expect("Failed to open job details");
    assert!(!terminated.termination_available().await);
    assert_eq!(
        terminated.terminated_on().await.as_deref(),
        Some("Terminated on: 2025-01-31")
    );
}

// ============================================================================
// Candidate profile
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_candidate_profile_offers_stage_actions() {
    let hrm = FakeHrm::new();
    let handle = hrm.logged_in().await;

    let peter = CandidateProfilePage::new(&handle, 1);
    peter.navigate().await.expect("Failed to open profile");
    assert_eq!(peter.status().await.as_deref(), Some("Application Initiated"));
    assert!(peter.action_available("Shortlist").await);
    assert!(!peter.action_available("Schedule Interview").await);

    let linda = CandidateProfilePage::new(&handle, 2);
    linda.navigate().await.expect("Failed to open profile");
    assert_eq!(linda.status().await.as_deref(), Some("Hired"));
    assert!(!linda.action_available("Shortlist").await);
    assert!(!linda.action_available("Reject").await);
}
