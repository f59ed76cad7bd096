// Selectors - Markup of the shared UI regions
//
// One immutable value describing how tables, forms, dialogs, toasts and the
// navigation chrome are marked up. Built once, shared through `PageHandle`.
// Ordered lists are fallback chains: the first entry that matches wins.

use crate::driver::Selector;

/// Selector map for every component
#[derive(Debug, Clone)]
pub struct Selectors {
    pub table: TableSelectors,
    pub form: FormSelectors,
    pub modal: ModalSelectors,
    pub toast: ToastSelectors,
    pub nav: NavSelectors,
    /// Full-page loading spinner
    pub loader: Selector,
}

impl Default for Selectors {
    fn default() -> Self {
        Self::orangehrm()
    }
}

impl Selectors {
    /// Markup of OrangeHRM 5.x (the "oxd" component library)
    pub fn orangehrm() -> Self {
        Self {
            table: TableSelectors {
                root: vec![Selector::css(".orangehrm-container"), Selector::css("table")],
                rows: vec![
                    Selector::css(".oxd-table-body .oxd-table-card"),
                    Selector::css("tbody tr"),
                ],
                cells: vec![Selector::css(".oxd-table-cell"), Selector::css("td")],
                headers: vec![Selector::css(".oxd-table-header .oxd-table-th"), Selector::css("thead th")],
                sort_icon: Selector::css(".oxd-table-header-sort"),
                sort_ascending: Selector::css(".oxd-table-header-sort-dropdown-item"),
                filter_input: Selector::css(".oxd-table-filter input"),
                filter_submit: Selector::css(".oxd-table-filter button[type='submit']"),
                empty_text: "No Records Found".into(),
                row_checkbox: Selector::css(".oxd-checkbox-input"),
            },
            form: FormSelectors {
                root: Selector::css("form"),
                input_group: Selector::css(".oxd-input-group"),
                group_label: Selector::css("label"),
                input: Selector::css("input"),
                error_message: Selector::css(".oxd-input-field-error-message"),
                submit: Selector::css("button[type='submit']"),
                select_trigger: Selector::css(".oxd-select-text"),
                select_option: Selector::css(".oxd-select-dropdown [role='option']"),
                autocomplete_option: Selector::css(".oxd-autocomplete-dropdown [role='option']"),
                autocomplete_pending: vec!["Searching".into(), "Loading".into()],
            },
            modal: ModalSelectors {
                root: vec![Selector::css(".oxd-dialog-sheet"), Selector::css("[role='dialog']")],
                title: Selector::css(".oxd-text--card-title"),
                body: Selector::css(".oxd-text--card-body"),
                confirm: Selector::css(".oxd-button--label-danger, .oxd-button--secondary"),
                cancel: Selector::css(".oxd-button--ghost"),
                close: Selector::css(".oxd-dialog-close-button"),
            },
            toast: ToastSelectors {
                root: Selector::css(".oxd-toast"),
                title: Selector::css(".oxd-text--toast-title"),
                message: Selector::css(".oxd-text--toast-message"),
                close: Selector::css(".oxd-toast-close"),
            },
            nav: NavSelectors {
                menu_item: Selector::css(".oxd-main-menu-item"),
                breadcrumb: Selector::css(".oxd-topbar-header-breadcrumb"),
                user_dropdown: Selector::css(".oxd-userdropdown-tab"),
                logout: Selector::css("a[href*='logout']"),
            },
            loader: Selector::css(".oxd-loading-spinner"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableSelectors {
    /// Results region; semantic table and card list variants
    pub root: Vec<Selector>,
    /// Row strategies, card list first
    pub rows: Vec<Selector>,
    /// Cell strategies, relative to a row
    pub cells: Vec<Selector>,
    /// Header cell strategies
    pub headers: Vec<Selector>,
    /// Sort toggle inside a header cell
    pub sort_icon: Selector,
    /// First sort menu entry (ascending)
    pub sort_ascending: Selector,
    /// Free-text filter field above the table
    pub filter_input: Selector,
    pub filter_submit: Selector,
    /// Text shown when the result set is empty
    pub empty_text: String,
    pub row_checkbox: Selector,
}

#[derive(Debug, Clone)]
pub struct FormSelectors {
    pub root: Selector,
    /// Wrapper around one label + control
    pub input_group: Selector,
    pub group_label: Selector,
    pub input: Selector,
    pub error_message: Selector,
    pub submit: Selector,
    /// Custom dropdown trigger inside an input group
    pub select_trigger: Selector,
    pub select_option: Selector,
    pub autocomplete_option: Selector,
    /// Placeholder texts shown while an autocomplete is still loading
    pub autocomplete_pending: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ModalSelectors {
    pub root: Vec<Selector>,
    pub title: Selector,
    pub body: Selector,
    pub confirm: Selector,
    pub cancel: Selector,
    pub close: Selector,
}

#[derive(Debug, Clone)]
pub struct ToastSelectors {
    pub root: Selector,
    pub title: Selector,
    pub message: Selector,
    pub close: Selector,
}

#[derive(Debug, Clone)]
pub struct NavSelectors {
    pub menu_item: Selector,
    pub breadcrumb: Selector,
    pub user_dropdown: Selector,
    pub logout: Selector,
}
