// Toast - Transient notifications
//
// Toasts appear some time after the triggering action and vanish on their
// own, so every read here is a probe and "not seen yet" is never an error.

use crate::driver::PageHandle;
use crate::error::Result;
use crate::poll::{self, PollOptions};
use crate::selectors::ToastSelectors;
use serde::Serialize;
use std::time::Duration;

/// Kind of notification, derived from the toast title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastKind {
    /// Classifies a toast title ("Success", "Info", ...).
    pub fn from_title(title: &str) -> Option<Self> {
        match title.trim().to_lowercase().as_str() {
            "success" => Some(ToastKind::Success),
            "info" => Some(ToastKind::Info),
            "warning" => Some(ToastKind::Warning),
            "error" => Some(ToastKind::Error),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct Toast {
    handle: PageHandle,
}

impl Toast {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    fn selectors(&self) -> &ToastSelectors {
        &self.handle.selectors().toast
    }

    /// Probe: is a toast showing?
    pub async fn is_visible(&self) -> bool {
        self.handle
            .locator(self.selectors().root.clone())
            .is_visible()
            .await
    }

    pub async fn title(&self) -> Option<String> {
        self.handle
            .locator(self.selectors().title.clone())
            .text()
            .await
    }

    pub async fn message(&self) -> Option<String> {
        self.handle
            .locator(self.selectors().message.clone())
            .text()
            .await
    }

    pub async fn kind(&self) -> Option<ToastKind> {
        ToastKind::from_title(&self.title().await?)
    }

    /// Probe: is a success toast showing?
    pub async fn is_success(&self) -> bool {
        self.is_visible().await && self.kind().await == Some(ToastKind::Success)
    }

    /// Probe: is a toast showing whose message contains `text`?
    pub async fn has_message(&self, text: &str) -> bool {
        self.message()
            .await
            .is_some_and(|m| m.to_lowercase().contains(&text.to_lowercase()))
    }

    /// Waits for a toast and returns its message, `None` if none showed up.
    pub async fn wait_for_message(&self, timeout: Duration) -> Option<String> {
        poll::poll_for(
            || async {
                if self.is_visible().await {
                    self.message().await
                } else {
                    None
                }
            },
            PollOptions::with_timeout(timeout),
        )
        .await
    }

    /// Closes the showing toast, if any.
    pub async fn dismiss(&self) -> Result<()> {
        let close = self.handle.locator(self.selectors().close.clone()).first();
        if close.is_visible().await {
            close.click().await?;
        }
        Ok(())
    }

    /// Waits for every toast to go away; false if one is still showing.
    pub async fn wait_until_dismissed(&self, timeout: Duration) -> bool {
        poll::poll_until(
            || async { !self.is_visible().await },
            PollOptions::with_timeout(timeout),
        )
        .await
    }
}
