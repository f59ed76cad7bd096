// Components - Reusable screen regions
//
// Each component wraps a root region of the page and exposes semantic
// operations on it. Components never import page or workflow types.
//
// Structural lookups that may legitimately find nothing (a results area that
// renders either as a table or as a card list, a form field that may be
// reachable by role, label or placeholder) go through `first_match`: an
// ordered list of candidates tried in sequence, first hit wins.

mod form;
mod modal;
mod nav;
mod table;
mod toast;

pub use form::{FIELD_STRATEGIES, FieldStrategy, Form};
pub use modal::Modal;
pub use nav::NavBar;
pub use table::{CellMatch, RowCriteria, Table};
pub use toast::{Toast, ToastKind};

use crate::driver::Locator;

/// Returns the first candidate that currently matches at least one element.
///
/// Order is significant: this is a priority list, not a set.
pub async fn first_match<I>(candidates: I) -> Option<Locator>
where
    I: IntoIterator<Item = Locator>,
{
    for candidate in candidates {
        if candidate.exists().await {
            return Some(candidate);
        }
    }
    None
}

/// Returns the first candidate whose first match is visible.
pub async fn first_visible<I>(candidates: I) -> Option<Locator>
where
    I: IntoIterator<Item = Locator>,
{
    for candidate in candidates {
        if candidate.is_visible().await {
            return Some(candidate);
        }
    }
    None
}
