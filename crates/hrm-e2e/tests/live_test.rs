// Scenarios against a real OrangeHRM deployment through Chromium
//
// Needs the `playwright` feature, a browser install and network access:
//
//   HRM_CONFIG=hrm.json cargo test -p hrm-e2e --features playwright -- --ignored
//
// Tests cover:
// - Create an employee and find it in the list
// - Apply for leave with whatever balance the account has
// - Add a candidate and shortlist them

#![cfg(feature = "playwright")]

use anyhow::{Context, Result};
use hrm_e2e::workflows::{ApplyLeaveAttempt, ShortlistOutcome};
use hrm_e2e::{Config, PlaywrightDriver, run_test};
use std::sync::Arc;
use std::time::Duration;

async fn live() -> Result<(Arc<PlaywrightDriver>, Config)> {
    let config = Config::load().context("Failed to load configuration")?;
    let driver = PlaywrightDriver::launch(&config)
        .await
        .context("Failed to launch Chromium")?;
    let driver = Arc::new(driver);
    Ok((driver, config))
}

#[tokio::test]
#[ignore = "Needs a live OrangeHRM deployment and Chromium"]
async fn live_create_and_find_employee() -> Result<()> {
    let (driver, config) = live().await?;
    run_test("live_create_and_find_employee", driver, config, |ctx| async move {
        let employee = ctx.data().employee().build()?;
        let created = ctx.employees().create_employee(&employee).await?;
        assert!(created.is_created(), "{created:?}");

        let id = employee.employee_id.clone().unwrap_or_default();
        let found = ctx
            .employees()
            .wait_for_employee(&id, Duration::from_secs(30))
            .await?;
        assert!(found.is_some(), "employee {id} never listed");
        Ok(())
    })
    .await?;
    Ok(())
}

#[tokio::test]
#[ignore = "Needs a live OrangeHRM deployment and Chromium"]
async fn live_apply_leave() -> Result<()> {
    let (driver, config) = live().await?;
    run_test("live_apply_leave", driver, config, |ctx| async move {
        let request = ctx.data().leave_request(14).build()?;
        let attempt = ctx.leave().apply_for_leave(&request).await?;
        // shared demo accounts often have no balance left
        assert!(
            matches!(
                attempt,
                ApplyLeaveAttempt::Submitted { .. }
                    | ApplyLeaveAttempt::NoLeaveBalance { .. }
                    | ApplyLeaveAttempt::ValidationError { .. }
            ),
            "{attempt:?}"
        );
        Ok(())
    })
    .await?;
    Ok(())
}

#[tokio::test]
#[ignore = "Needs a live OrangeHRM deployment and Chromium"]
async fn live_add_and_shortlist_candidate() -> Result<()> {
    let (driver, config) = live().await?;
    run_test("live_add_and_shortlist_candidate", driver, config, |ctx| async move {
        let candidate = ctx.data().candidate().build()?;
        let added = ctx.recruitment().add_candidate(&candidate).await?;
        assert!(added.candidate_id().is_some(), "{added:?}");

        let outcome = ctx
            .recruitment()
            .shortlist_candidate(&candidate.last_name)
            .await?;
        assert!(
            matches!(outcome, ShortlistOutcome::Shortlisted { .. }),
            "{outcome:?}"
        );
        Ok(())
    })
    .await?;
    Ok(())
}
