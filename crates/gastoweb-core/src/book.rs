//! The expense book: records plus the screen state that edits them
//!
//! Every transition is a method on [`ExpenseBook`]. Mutations build the new
//! list on the side, persist it, and only then swap it in, so a failed write
//! leaves memory and store agreeing with each other.

use chrono::{DateTime, Utc};
use gastoweb_config::Config;
use gastoweb_store::StoreRef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::auth::LAST_EMAIL_KEY;
use crate::error::{CoreError, CoreResult};
use crate::form::Draft;
use crate::models::{seed_records, ExpenseRecord};
use crate::query::{self, PageView, QueryState, SortDir, SortKey};
use crate::ui::{Debouncer, Ticket, Toast, ToastSlot, UiMode};

pub const MSG_SAVED: &str = "Gasto guardado.";
pub const MSG_UPDATED: &str = "Gasto actualizado.";
pub const MSG_DELETED: &str = "Registro eliminado.";

/// Expense list with its query, form and overlay state
pub struct ExpenseBook {
    store: StoreRef,
    store_key: String,
    records: Vec<ExpenseRecord>,
    draft: Draft,
    mode: UiMode,
    toast: ToastSlot,
    query: QueryState,
    search: Debouncer<String>,
    page_size_options: Vec<usize>,
}

impl ExpenseBook {
    /// Load the list from `store`. A missing, unreadable or corrupt value
    /// falls back to the seed records.
    pub async fn hydrate(store: StoreRef, config: &Config) -> Self {
        let store_key = config.data.store_key.clone();
        let records = match store.get(&store_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ExpenseRecord>>(&raw) {
                Ok(records) => match check_stored(&records) {
                    Ok(()) => {
                        log::info!("Loaded {} expenses from '{}'", records.len(), store_key);
                        records
                    }
                    Err(reason) => {
                        log::warn!("Stored expenses under '{}' are corrupt, using seed data: {}", store_key, reason);
                        seed_records()
                    }
                },
                Err(e) => {
                    log::warn!("Stored expenses under '{}' are corrupt, using seed data: {}", store_key, e);
                    seed_records()
                }
            },
            Ok(None) => {
                log::info!("No stored expenses under '{}', using seed data", store_key);
                seed_records()
            }
            Err(e) => {
                log::warn!("Failed to read '{}', using seed data: {}", store_key, e);
                seed_records()
            }
        };

        Self {
            store,
            store_key,
            records,
            draft: Draft::default(),
            mode: UiMode::default(),
            toast: ToastSlot::new(Duration::from_millis(config.toast.timeout_ms)),
            query: QueryState::with_page_size(config.pagination.rows_per_page),
            search: Debouncer::new(Duration::from_millis(config.search.debounce_ms)),
            page_size_options: config.pagination.page_size_options.clone(),
        }
    }

    // ==================== Records ====================

    /// All records in stored order (newest created first)
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn record(&self, id: u64) -> Option<&ExpenseRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Id the next created record will get
    pub fn next_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    async fn persist(&self, records: &[ExpenseRecord]) -> CoreResult<()> {
        let raw = serde_json::to_string(records)?;
        self.store.set(&self.store_key, &raw).await.map_err(|e| {
            log::error!("Failed to persist expenses under '{}': {}", self.store_key, e);
            CoreError::from(e)
        })
    }

    // ==================== Query ====================

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Current page of the filtered, sorted list
    pub fn visible_page(&self) -> PageView {
        query::run(&self.records, &self.query)
    }

    pub fn set_sort(&mut self, key: SortKey, dir: SortDir) {
        self.query.sort_key = key;
        self.query.sort_dir = dir;
    }

    /// Out-of-range pages are clamped when the view is computed
    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    /// Sizes outside the configured options are ignored
    pub fn set_page_size(&mut self, page_size: usize) {
        if !self.page_size_options.contains(&page_size) {
            log::debug!("Ignoring page size {} (allowed: {:?})", page_size, self.page_size_options);
            return;
        }
        self.query.page_size = page_size;
        self.query.page = 1;
    }

    /// Apply search text right away, dropping any keystroke still waiting
    pub fn set_query_text(&mut self, text: &str) {
        self.search.cancel();
        self.query.text = text.to_string();
        self.query.page = 1;
    }

    pub fn next_page(&mut self) {
        let view = self.visible_page();
        self.query.page = (view.page + 1).min(view.total_pages);
    }

    pub fn prev_page(&mut self) {
        let view = self.visible_page();
        self.query.page = view.page.saturating_sub(1).max(1);
    }

    // ==================== Search ====================

    pub fn search_delay(&self) -> Duration {
        self.search.delay()
    }

    /// Register a keystroke; the returned ticket settles after the delay
    pub fn submit_search(&mut self, text: &str) -> Ticket {
        self.search.submit(text.to_string())
    }

    /// Apply the search text for `ticket` if no later keystroke replaced it
    pub fn settle_search(&mut self, ticket: Ticket) -> bool {
        match self.search.settle(ticket) {
            Some(text) => {
                self.set_query_text(&text);
                true
            }
            None => false,
        }
    }

    // ==================== Form ====================

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Show or hide the form. Hiding an edit form drops the edit.
    pub fn toggle_form(&mut self) {
        match self.mode {
            UiMode::Form { editing: Some(_) } => {
                self.draft = Draft::default();
                self.mode = UiMode::Browsing;
            }
            UiMode::Form { editing: None } => self.mode = UiMode::Browsing,
            _ => self.mode = UiMode::Form { editing: None },
        }
    }

    pub fn open_create(&mut self) {
        if self.mode.editing_id().is_some() {
            self.draft = Draft::default();
        }
        self.mode = UiMode::Form { editing: None };
    }

    /// Load record `id` into the draft and open the form on it
    pub fn open_edit(&mut self, id: u64) -> CoreResult<()> {
        let record = self.record(id).ok_or(CoreError::ExpenseNotFound { id })?;
        self.draft = Draft::from_record(record);
        self.mode = UiMode::Form { editing: Some(id) };
        Ok(())
    }

    /// "Limpiar": empty the draft and leave edit mode, keeping the form open
    pub fn reset_draft(&mut self) {
        self.draft = Draft::default();
        if self.mode.is_form_open() {
            self.mode = UiMode::Form { editing: None };
        }
    }

    pub fn set_draft(&mut self, draft: Draft) {
        self.draft = draft;
    }

    /// Save the draft as a new record or over the one being edited.
    /// Returns the id of the saved record.
    pub async fn submit(&mut self, now: DateTime<Utc>) -> CoreResult<u64> {
        let valid = match self.draft.validate() {
            Ok(valid) => valid,
            Err(e) => {
                log::debug!("Rejected expense draft: {}", e);
                self.show_toast(Toast::err(e.to_string(), Instant::now()));
                return Err(e);
            }
        };

        let mut next = self.records.clone();
        let (id, message) = match self.mode.editing_id() {
            Some(id) => {
                let record = next
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or(CoreError::ExpenseNotFound { id })?;
                valid.apply_to(record);
                (id, MSG_UPDATED)
            }
            None => {
                let id = self.next_id();
                let mut record = ExpenseRecord {
                    id,
                    medio: valid.medio,
                    anotaciones: String::new(),
                    zona: String::new(),
                    tiempo_demora: 0,
                    gasto: valid.gasto,
                    calificacion: valid.calificacion,
                    creado_el: now,
                };
                valid.apply_to(&mut record);
                next.insert(0, record);
                (id, MSG_SAVED)
            }
        };

        if let Err(e) = self.persist(&next).await {
            self.show_toast(Toast::err("No se pudo guardar.", Instant::now()));
            return Err(e);
        }

        self.records = next;
        log::info!("Saved expense {} ({})", id, message);
        self.draft = Draft::default();
        self.mode = UiMode::Browsing;
        self.show_toast(Toast::ok(message, Instant::now()));
        Ok(id)
    }

    // ==================== Delete ====================

    /// Ask for confirmation before deleting `id`. Nothing is removed yet.
    /// An open edit form is closed and its draft dropped.
    pub fn request_delete(&mut self, id: u64) -> CoreResult<()> {
        if self.record(id).is_none() {
            return Err(CoreError::ExpenseNotFound { id });
        }
        if self.mode.editing_id().is_some() {
            self.draft = Draft::default();
        }
        self.mode = UiMode::ConfirmDelete { id };
        Ok(())
    }

    /// Delete the record waiting for confirmation. Returns its id.
    pub async fn confirm_delete(&mut self) -> CoreResult<u64> {
        let Some(id) = self.mode.pending_delete() else {
            return Err(CoreError::NoPendingAction);
        };

        let next: Vec<ExpenseRecord> = self.records.iter().filter(|r| r.id != id).cloned().collect();
        if let Err(e) = self.persist(&next).await {
            self.mode = UiMode::Browsing;
            self.show_toast(Toast::err("No se pudo eliminar.", Instant::now()));
            return Err(e);
        }

        self.records = next;
        log::info!("Deleted expense {}", id);
        self.mode = UiMode::Browsing;
        self.show_toast(Toast::ok(MSG_DELETED, Instant::now()));
        Ok(id)
    }

    pub fn cancel_confirm(&mut self) {
        if self.mode.pending_delete().is_some() {
            self.mode = UiMode::Browsing;
        }
    }

    // ==================== Help ====================

    pub fn open_help(&mut self) {
        self.mode = UiMode::Help;
    }

    pub fn close_help(&mut self) {
        if self.mode == UiMode::Help {
            self.mode = UiMode::Browsing;
        }
    }

    // ==================== Toast ====================

    pub fn show_toast(&mut self, toast: Toast) {
        self.toast.show(toast);
    }

    pub fn current_toast_at(&mut self, now: Instant) -> Option<Toast> {
        self.toast.current(now).cloned()
    }

    pub fn current_toast(&mut self) -> Option<Toast> {
        self.current_toast_at(Instant::now())
    }

    pub fn toast_timeout(&self) -> Duration {
        self.toast.timeout()
    }

    pub fn dismiss_toast(&mut self) {
        self.toast.dismiss();
    }

    // ==================== Auth screen ====================

    /// Email from the last successful login, if any
    pub async fn remembered_email(&self) -> Option<String> {
        match self.store.get(LAST_EMAIL_KEY).await {
            Ok(email) => email,
            Err(e) => {
                log::warn!("Failed to read remembered email: {}", e);
                None
            }
        }
    }

    /// Store `email` for the next visit; a blank one forgets it
    pub async fn remember_email(&self, email: &str) -> CoreResult<()> {
        let email = email.trim();
        if email.is_empty() {
            self.store.remove(LAST_EMAIL_KEY).await?;
        } else {
            self.store.set(LAST_EMAIL_KEY, email).await?;
        }
        Ok(())
    }
}

/// Rules every stored list must meet: unique ids, `gasto > 0` and a
/// rating between 1 and 5
fn check_stored(records: &[ExpenseRecord]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            return Err(format!("duplicate id {}", record.id));
        }
        if record.gasto <= Decimal::ZERO {
            return Err(format!("record {} has gasto {}", record.id, record.gasto));
        }
        if !(1..=5).contains(&record.calificacion) {
            return Err(format!("record {} has calificacion {}", record.id, record.calificacion));
        }
    }
    Ok(())
}

/// Totals shown in the list footer and the summary endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub total_records: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_gasto: Decimal,
    pub last_created: Option<DateTime<Utc>>,
}

/// Read-only views over the book
pub trait BookOperations {
    fn summary(&self) -> BookSummary;
}

impl BookOperations for ExpenseBook {
    fn summary(&self) -> BookSummary {
        BookSummary {
            total_records: self.records.len(),
            total_gasto: self.records.iter().map(|r| r.gasto).sum(),
            last_created: self.records.iter().map(|r| r.creado_el).max(),
        }
    }
}
