//! Core expense-book logic for gastoweb
//!
//! - models: expense records and transport modes
//! - query: search, sort and pagination pipeline
//! - form: draft record and validation
//! - ui: overlay mode, toasts, search debouncer
//! - auth: demo login/register checks
//! - book: the stateful owner of all of the above

pub mod auth;
pub mod book;
pub mod error;
pub mod form;
pub mod models;
pub mod query;
pub mod ui;

pub use auth::{
    authenticate, login_password_message, AuthOutcome, AuthRequest, AuthTab, LAST_EMAIL_KEY,
};
pub use book::{BookOperations, BookSummary, ExpenseBook};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use form::{Draft, FieldErrors, ValidDraft};
pub use models::{seed_records, ExpenseRecord, Medio};
pub use query::{PageView, QueryState, SortDir, SortKey};
pub use ui::{Debouncer, Ticket, Toast, ToastKind, ToastSlot, UiMode};
