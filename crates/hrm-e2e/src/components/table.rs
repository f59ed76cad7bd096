// Table - Results region (semantic table or card list)
//
// Rows and cells are located through fallback chains from `TableSelectors`,
// so the same component reads `<tbody><tr>` tables and the card lists the
// application renders. All indices are 0-based.

use crate::components::{first_match, first_visible};
use crate::driver::{Locator, PageHandle, WaitState};
use crate::error::{Error, Result};
use crate::poll::{self, PollOptions};
use crate::selectors::TableSelectors;
use std::time::Duration;

/// Condition on a single cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellMatch {
    /// Trimmed cell text equals the value (case-sensitive)
    Equals(String),
    /// Cell text contains the value (case-insensitive)
    Contains(String),
}

impl CellMatch {
    fn matches(&self, cell: &str) -> bool {
        match self {
            CellMatch::Equals(v) => cell.trim() == v,
            CellMatch::Contains(v) => cell.to_lowercase().contains(&v.to_lowercase()),
        }
    }
}

/// Conjunction of cell conditions; a row matches when all of them hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCriteria {
    conditions: Vec<(usize, CellMatch)>,
}

impl RowCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, column: usize, value: impl Into<String>) -> Self {
        self.conditions.push((column, CellMatch::Equals(value.into())));
        self
    }

    pub fn contains(mut self, column: usize, value: impl Into<String>) -> Self {
        self.conditions.push((column, CellMatch::Contains(value.into())));
        self
    }

    /// True when every condition holds for `cells`. A missing column fails.
    pub fn matches(&self, cells: &[String]) -> bool {
        self.conditions.iter().all(|(column, condition)| {
            cells
                .get(*column)
                .is_some_and(|cell| condition.matches(cell))
        })
    }
}

/// Results table component
#[derive(Clone)]
pub struct Table {
    handle: PageHandle,
}

impl Table {
    pub fn new(handle: &PageHandle) -> Self {
        Self {
            handle: handle.clone(),
        }
    }

    fn selectors(&self) -> &TableSelectors {
        &self.handle.selectors().table
    }

    fn root_candidates(&self) -> Vec<Locator> {
        self.selectors()
            .root
            .iter()
            .map(|s| self.handle.locator(s.clone()))
            .collect()
    }

    async fn rows(&self) -> Option<Locator> {
        let candidates = self
            .selectors()
            .rows
            .iter()
            .map(|s| self.handle.locator(s.clone()))
            .collect::<Vec<_>>();
        first_match(candidates).await
    }

    async fn cells(&self, row: &Locator) -> Option<Locator> {
        let candidates = self
            .selectors()
            .cells
            .iter()
            .map(|s| row.locator(s.clone()))
            .collect::<Vec<_>>();
        first_match(candidates).await
    }

    /// Suspends until the results region is visible.
    pub async fn wait_for_ready(&self) -> Result<()> {
        let timeout = self.handle.timeouts().navigation;
        let ready = poll::poll_until(
            || async { first_visible(self.root_candidates()).await.is_some() },
            PollOptions::new(timeout, poll::WAIT_POLL_INTERVAL),
        )
        .await;
        if ready {
            Ok(())
        } else {
            Err(Error::Timeout {
                what: "results table to be visible".into(),
                waited: timeout,
            })
        }
    }

    /// Probe: is the results region visible?
    pub async fn is_visible(&self) -> bool {
        first_visible(self.root_candidates()).await.is_some()
    }

    /// Number of rows currently rendered
    pub async fn row_count(&self) -> usize {
        match self.rows().await {
            Some(rows) => rows.count().await,
            None => 0,
        }
    }

    /// Text of every cell in a row; empty when the row does not exist.
    pub async fn row_cells(&self, row: usize) -> Vec<String> {
        let Some(rows) = self.rows().await else {
            return Vec::new();
        };
        let row = rows.nth(row as i32);
        match self.cells(&row).await {
            Some(cells) => cells.all_texts().await,
            None => Vec::new(),
        }
    }

    /// Cell texts of every rendered row
    pub async fn all_rows(&self) -> Vec<Vec<String>> {
        let count = self.row_count().await;
        let mut rows = Vec::with_capacity(count);
        for row in 0..count {
            rows.push(self.row_cells(row).await);
        }
        rows
    }

    /// Text of one cell, if both row and column exist
    pub async fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        let rows = self.rows().await?;
        let cells = self.cells(&rows.nth(row as i32)).await?;
        let cell = cells.nth(column as i32);
        if cell.exists().await {
            Some(cell.text().await.unwrap_or_default())
        } else {
            None
        }
    }

    /// Header labels, in column order
    pub async fn headers(&self) -> Vec<String> {
        let candidates = self
            .selectors()
            .headers
            .iter()
            .map(|s| self.handle.locator(s.clone()))
            .collect::<Vec<_>>();
        match first_match(candidates).await {
            Some(headers) => headers.all_texts().await,
            None => Vec::new(),
        }
    }

    /// Index of the first row satisfying every criterion, `None` when no row does.
    pub async fn find_row(&self, criteria: &RowCriteria) -> Option<usize> {
        let count = self.row_count().await;
        for row in 0..count {
            if criteria.matches(&self.row_cells(row).await) {
                return Some(row);
            }
        }
        None
    }

    /// Locator for one row, for row-scoped actions.
    pub async fn row(&self, row: usize) -> Result<Locator> {
        let rows = self
            .rows()
            .await
            .ok_or_else(|| Error::ElementNotFound("table has no rows".into()))?;
        let located = rows.nth(row as i32);
        if !located.exists().await {
            return Err(Error::ElementNotFound(format!("table row {}", row)));
        }
        Ok(located)
    }

    /// Clicks a row.
    pub async fn click_row(&self, row: usize) -> Result<()> {
        self.row(row).await?.click().await
    }

    /// Sorts ascending by a column through the header sort menu.
    pub async fn sort_by_column(&self, column: usize) -> Result<()> {
        let candidates = self
            .selectors()
            .headers
            .iter()
            .map(|s| self.handle.locator(s.clone()))
            .collect::<Vec<_>>();
        let headers = first_match(candidates)
            .await
            .ok_or_else(|| Error::ElementNotFound("table headers".into()))?;
        headers
            .nth(column as i32)
            .locator(self.selectors().sort_icon.clone())
            .click()
            .await?;
        self.handle
            .locator(self.selectors().sort_ascending.clone())
            .first()
            .click()
            .await?;
        self.handle.settle().await;
        Ok(())
    }

    /// Filters the table through its free-text filter and waits for the results.
    pub async fn search(&self, query: &str) -> Result<()> {
        let selectors = self.selectors();
        self.handle
            .locator(selectors.filter_input.clone())
            .first()
            .fill(query)
            .await?;
        self.handle
            .locator(selectors.filter_submit.clone())
            .first()
            .click()
            .await?;
        self.handle.settle().await;
        self.wait_for_results(self.handle.timeouts().expect).await;
        Ok(())
    }

    /// Probe: is the empty-results message showing?
    pub async fn is_empty_state(&self) -> bool {
        let text = self.selectors().empty_text.clone();
        self.handle
            .locator(crate::driver::Selector::text(text))
            .is_visible()
            .await
    }

    /// Waits until rows or the empty-results message are showing.
    pub async fn wait_for_results(&self, timeout: Duration) -> bool {
        poll::poll_until(
            || async { self.row_count().await > 0 || self.is_empty_state().await },
            PollOptions::with_timeout(timeout),
        )
        .await
    }

    /// Clicks an element inside a row (edit, delete, approve buttons).
    pub async fn click_in_row(&self, row: usize, target: crate::driver::Selector) -> Result<()> {
        let row = self.row(row).await?;
        let button = row.locator(target).first();
        button.wait_for(WaitState::Visible, self.handle.timeouts().action).await?;
        button.click().await
    }
}
