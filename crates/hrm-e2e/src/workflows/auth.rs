// AuthWorkflow - Login and logout

use crate::config::Credentials;
use crate::driver::PageHandle;
use crate::error::{Error, Result};
use crate::pages::{DashboardPage, LoginPage, PageObject, PageState};
use crate::poll::{self, PollOptions};

enum LoginSignal {
    Dashboard,
    Rejected(String),
}

pub struct AuthWorkflow {
    handle: PageHandle,
}

impl AuthWorkflow {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    /// Signs in and waits for the dashboard.
    ///
    /// Rejected credentials are `Error::AuthenticationFailed`; a login that
    /// never lands anywhere is `Error::NavigationTimeout`.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        tracing::info!(username = %credentials.username, "Logging in");
        let login = LoginPage::new(&self.handle);
        login.navigate().await?;
        login
            .submit_credentials(&credentials.username, &credentials.password)
            .await?;

        let dashboard = DashboardPage::new(&self.handle);
        let timeout = self.handle.timeouts().navigation;
        let signal = poll::poll_for(
            || async {
                if dashboard.state().await != PageState::Unloaded {
                    return Some(LoginSignal::Dashboard);
                }
                if let Some(message) = login.error_message().await {
                    return Some(LoginSignal::Rejected(message));
                }
                let required = login.required_errors().await;
                (!required.is_empty()).then(|| LoginSignal::Rejected(required.join(", ")))
            },
            PollOptions::with_timeout(timeout),
        )
        .await;

        match signal {
            Some(LoginSignal::Dashboard) => {
                dashboard.wait_for_ready().await?;
                tracing::info!(username = %credentials.username, "Logged in");
                Ok(())
            }
            Some(LoginSignal::Rejected(message)) => Err(Error::AuthenticationFailed {
                username: credentials.username.clone(),
                message,
            }),
            None => Err(Error::NavigationTimeout {
                expected: dashboard.url_pattern().as_str().to_string(),
                actual: self.handle.current_url().await.unwrap_or_default(),
                duration_ms: timeout.as_millis() as u64,
            }),
        }
    }

    /// Signs out through the user menu and waits for the login screen.
    pub async fn logout(&self) -> Result<()> {
        let dashboard = DashboardPage::new(&self.handle);
        dashboard.nav().logout().await?;
        LoginPage::new(&self.handle).wait_for_ready().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Probe: is the authenticated chrome showing?
    pub async fn is_logged_in(&self) -> bool {
        DashboardPage::new(&self.handle).nav().is_visible().await
    }
}
