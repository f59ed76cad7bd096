// Form - Field resolution, custom dropdowns, autocompletes, validation
//
// The application's markup does not associate labels with inputs
// consistently, so a field name is resolved through FIELD_STRATEGIES in
// order. The first strategy that finds anything wins, even if a later one
// would be more specific.

use crate::components::first_match;
use crate::driver::{Locator, PageHandle, Selector, WaitState};
use crate::error::{Error, Result};
use crate::poll::{self, PollOptions};
use crate::selectors::FormSelectors;

/// One way of turning a field name into a locator inside a form.
pub type FieldStrategy = fn(&Locator, &FormSelectors, &str) -> Locator;

/// Field lookup strategies, in priority order.
pub const FIELD_STRATEGIES: &[(&str, FieldStrategy)] = &[
    ("role", by_role),
    ("label", by_label),
    ("placeholder", by_placeholder),
    ("name", by_name),
    ("fuzzy-name", by_fuzzy_name),
    ("nearby-text", by_nearby_text),
];

fn by_role(root: &Locator, _: &FormSelectors, name: &str) -> Locator {
    root.locator(Selector::role("textbox", name))
}

fn by_label(root: &Locator, _: &FormSelectors, name: &str) -> Locator {
    root.locator(Selector::label(name))
}

fn by_placeholder(root: &Locator, _: &FormSelectors, name: &str) -> Locator {
    root.locator(Selector::placeholder(name))
}

fn by_name(root: &Locator, _: &FormSelectors, name: &str) -> Locator {
    root.locator(Selector::attr("name", name))
}

fn by_fuzzy_name(root: &Locator, _: &FormSelectors, name: &str) -> Locator {
    root.locator(Selector::attr_contains("name", fuzzy_key(name)))
}

fn by_nearby_text(root: &Locator, selectors: &FormSelectors, name: &str) -> Locator {
    root.locator(selectors.input_group.clone())
        .has_text(name)
        .locator(selectors.input.clone())
}

// "First Name" -> "firstname", matched case-insensitively against name attributes
fn fuzzy_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Form component
#[derive(Clone)]
pub struct Form {
    handle: PageHandle,
    root: Locator,
}

impl Form {
    /// The page's main form
    pub fn new(handle: &PageHandle) -> Self {
        let root = handle.locator(handle.selectors().form.root.clone()).first();
        Self::within(handle, root)
    }

    /// A form rooted at an arbitrary region (dialogs, filter panels)
    pub fn within(handle: &PageHandle, root: Locator) -> Self {
        Self {
            handle: handle.clone(),
            root,
        }
    }

    fn selectors(&self) -> &FormSelectors {
        &self.handle.selectors().form
    }

    /// Suspends until the form root is visible.
    pub async fn wait_for_ready(&self) -> Result<()> {
        self.root
            .wait_for(WaitState::Visible, self.handle.timeouts().navigation)
            .await
    }

    /// Probe: is the form visible?
    pub async fn is_visible(&self) -> bool {
        self.root.is_visible().await
    }

    /// Resolves a field by name, trying each strategy in order.
    pub async fn field(&self, name: &str) -> Option<Locator> {
        let selectors = self.selectors();
        for (strategy, lookup) in FIELD_STRATEGIES {
            let candidate = lookup(&self.root, selectors, name);
            if let Some(found) = first_match([candidate]).await {
                tracing::debug!(field = name, strategy, "Resolved form field");
                return Some(found.first());
            }
        }
        None
    }

    async fn require_field(&self, name: &str) -> Result<Locator> {
        self.field(name)
            .await
            .ok_or_else(|| Error::ElementNotFound(format!("form field '{}'", name)))
    }

    /// Fills a field, replacing any pre-populated value.
    pub async fn fill_field(&self, name: &str, value: &str) -> Result<()> {
        self.require_field(name).await?.clear_and_fill(value).await
    }

    /// Current value of a field, if it resolves
    pub async fn field_value(&self, name: &str) -> Option<String> {
        self.field(name).await?.value().await
    }

    /// The label + control wrapper for a field label
    pub fn group(&self, label: &str) -> Locator {
        let selectors = self.selectors();
        self.root
            .locator(selectors.input_group.clone())
            .has_text(label)
            .first()
    }

    /// Picks an option from the custom dropdown under `label`.
    ///
    /// Reuses the option list if `dropdown_options` left it open; clicking
    /// the trigger again would close it.
    pub async fn select_option(&self, label: &str, option: &str) -> Result<()> {
        let choice = self
            .handle
            .locator(self.selectors().select_option.clone())
            .has_text(option)
            .first();
        if !choice.is_visible().await {
            self.open_dropdown(label).await?;
        }
        choice
            .wait_for(WaitState::Visible, self.handle.timeouts().action)
            .await
            .map_err(|e| e.context(format!("option '{}' of '{}'", option, label)))?;
        choice.click().await
    }

    /// Lists the options of the dropdown under `label` (placeholder excluded).
    ///
    /// Leaves the dropdown open; the next click on the page closes it.
    pub async fn dropdown_options(&self, label: &str) -> Result<Vec<String>> {
        self.open_dropdown(label).await?;
        let options = self.handle.locator(self.selectors().select_option.clone());
        // Options render asynchronously; an empty list is a valid answer
        let _ = poll::poll_until(
            || async { options.exists().await },
            PollOptions::with_timeout(self.handle.timeouts().probe),
        )
        .await;
        Ok(options
            .all_texts()
            .await
            .into_iter()
            .filter(|o| !o.is_empty() && !o.starts_with("--"))
            .collect())
    }

    async fn open_dropdown(&self, label: &str) -> Result<()> {
        self.group(label)
            .locator(self.selectors().select_trigger.clone())
            .first()
            .click()
            .await
    }

    /// Text currently shown by the dropdown under `label`
    pub async fn selected_option(&self, label: &str) -> Option<String> {
        self.group(label)
            .locator(self.selectors().select_trigger.clone())
            .text()
            .await
    }

    /// Types into an autocomplete field and returns the suggestions once loaded.
    ///
    /// An empty result means the application offered nothing for `query`
    /// within the expect budget.
    pub async fn autocomplete(&self, name: &str, query: &str) -> Result<Vec<String>> {
        self.fill_field(name, query).await?;
        let options = self
            .handle
            .locator(self.selectors().autocomplete_option.clone());
        let pending = self.selectors().autocomplete_pending.clone();
        let loaded = poll::poll_for(
            || async {
                let texts = options.all_texts().await;
                let settled = !texts.is_empty()
                    && !texts
                        .iter()
                        .any(|t| pending.iter().any(|p| t.contains(p.as_str())));
                settled.then_some(texts)
            },
            PollOptions::with_timeout(self.handle.timeouts().expect),
        )
        .await;
        Ok(loaded
            .unwrap_or_default()
            .into_iter()
            .filter(|t| !t.eq_ignore_ascii_case("No Records Found"))
            .collect())
    }

    /// Clicks the nth autocomplete suggestion.
    pub async fn choose_suggestion(&self, index: usize) -> Result<()> {
        self.handle
            .locator(self.selectors().autocomplete_option.clone())
            .nth(index as i32)
            .click()
            .await
    }

    /// Clicks the submit button.
    pub async fn submit(&self) -> Result<()> {
        self.root
            .locator(self.selectors().submit.clone())
            .first()
            .click()
            .await
    }

    /// Inline validation messages currently showing
    pub async fn validation_errors(&self) -> Vec<String> {
        self.root
            .locator(self.selectors().error_message.clone())
            .all_texts()
            .await
            .into_iter()
            .filter(|m| !m.is_empty())
            .collect()
    }

    /// Probe: is any validation message showing?
    pub async fn has_errors(&self) -> bool {
        self.root
            .locator(self.selectors().error_message.clone())
            .is_visible()
            .await
    }

    /// Probe: does the field under `label` have no validation message?
    pub async fn is_field_valid(&self, label: &str) -> bool {
        !self
            .group(label)
            .locator(self.selectors().error_message.clone())
            .exists()
            .await
    }
}
