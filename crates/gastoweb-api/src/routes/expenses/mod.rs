//! Expense routes - List, search, form, two-step delete, help
//!
//! Features:
//! - Paged list with sortable columns and a page-size selector
//! - Accent-insensitive search, debounced server-side
//! - Shared create/edit form with inline validation
//! - Delete only after confirmation
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page and fragment rendering

pub mod api;
pub mod page;

pub use api::{
    api_expense_detail,
    api_expenses,
    htmx_confirm,
    htmx_confirm_cancel,
    htmx_expense_delete,
    htmx_expense_edit,
    htmx_expense_store,
    htmx_expenses_list,
    htmx_expenses_search,
    htmx_form_new,
    htmx_form_reset,
    htmx_form_toggle,
    htmx_help,
    htmx_help_close,
};

pub use page::page_app;
