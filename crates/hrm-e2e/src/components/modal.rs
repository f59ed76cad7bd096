// Modal - Confirmation and edit dialogs

use crate::components::first_visible;
use crate::driver::{Locator, PageHandle, WaitState};
use crate::error::{Error, Result};
use crate::poll::{self, PollOptions};
use crate::selectors::ModalSelectors;
use std::time::Duration;

#[derive(Clone)]
pub struct Modal {
    handle: PageHandle,
}

impl Modal {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    fn selectors(&self) -> &ModalSelectors {
        &self.handle.selectors().modal
    }

    fn candidates(&self) -> Vec<Locator> {
        self.selectors()
            .root
            .iter()
            .map(|s| self.handle.locator(s.clone()))
            .collect()
    }

    /// The open dialog, for scoping forms and buttons inside it
    pub async fn region(&self) -> Result<Locator> {
        first_visible(self.candidates())
            .await
            .map(|root| root.first())
            .ok_or_else(|| Error::ElementNotFound("open dialog".into()))
    }

    /// Probe: is a dialog open?
    pub async fn is_open(&self) -> bool {
        first_visible(self.candidates()).await.is_some()
    }

    /// Waits for a dialog to open.
    pub async fn wait_open(&self, timeout: Duration) -> Result<()> {
        let opened = poll::poll_until(
            || self.is_open(),
            PollOptions::new(timeout, poll::WAIT_POLL_INTERVAL),
        )
        .await;
        if opened {
            Ok(())
        } else {
            Err(Error::Timeout {
                what: "dialog to open".into(),
                waited: timeout,
            })
        }
    }

    /// Waits for every dialog to close.
    pub async fn wait_closed(&self, timeout: Duration) -> Result<()> {
        let closed = poll::poll_until(
            || async { !self.is_open().await },
            PollOptions::new(timeout, poll::WAIT_POLL_INTERVAL),
        )
        .await;
        if closed {
            Ok(())
        } else {
            Err(Error::Timeout {
                what: "dialog to close".into(),
                waited: timeout,
            })
        }
    }

    pub async fn title(&self) -> Option<String> {
        let root = self.region().await.ok()?;
        root.locator(self.selectors().title.clone()).text().await
    }

    pub async fn message(&self) -> Option<String> {
        let root = self.region().await.ok()?;
        root.locator(self.selectors().body.clone()).text().await
    }

    /// Clicks the confirming button and waits for the dialog to close.
    pub async fn confirm(&self) -> Result<()> {
        self.press_button(self.selectors().confirm.clone()).await
    }

    /// Clicks the dismissing button and waits for the dialog to close.
    pub async fn cancel(&self) -> Result<()> {
        self.press_button(self.selectors().cancel.clone()).await
    }

    pub async fn close(&self) -> Result<()> {
        self.press_button(self.selectors().close.clone()).await
    }

    async fn press_button(&self, button: crate::driver::Selector) -> Result<()> {
        let root = self.region().await?;
        let button = root.locator(button).first();
        button
            .wait_for(WaitState::Visible, self.handle.timeouts().action)
            .await?;
        button.click().await?;
        self.wait_closed(self.handle.timeouts().action).await
    }
}
