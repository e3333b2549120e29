//! Expense endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_expenses: One page of the list (JSON), same params as the HTMX list
//! - api_expense_detail: Single record (JSON)
//! - htmx_expenses_list: List fragment; applies q/page/limit/sort/dir/nav
//! - htmx_expenses_search: Debounced search; 204 when superseded
//! - htmx_form_*: Open, close and clear the form
//! - htmx_expense_store: Save the draft (create or update)
//! - htmx_expense_delete / htmx_confirm / htmx_confirm_cancel: Two-step delete
//! - htmx_help / htmx_help_close: Help modal

use super::page::{render_book_list, render_form_slot, render_modal_slot, render_toggle_button};
use crate::routes::toast::render_book_toast;
use crate::{parse_form, ApiError, AppState};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use gastoweb_core::{query, CoreError, Draft, ExpenseBook, ExpenseRecord, PageView, QueryState, SortDir, SortKey, Toast};
use std::collections::HashMap;
use std::time::Instant;

/// Override `query` with whatever the request carries
fn apply_query_params(query: &mut QueryState, params: &HashMap<String, String>) {
    if let Some(text) = params.get("q") {
        query.text = text.clone();
    }
    if let Some(limit) = params.get("limit").and_then(|s| s.parse::<usize>().ok()).filter(|n| *n > 0) {
        query.page_size = limit;
    }
    if let Some(key) = params.get("sort").and_then(|s| s.parse::<SortKey>().ok()) {
        query.sort_key = key;
    }
    if let Some(dir) = params.get("dir").and_then(|s| s.parse::<SortDir>().ok()) {
        query.sort_dir = dir;
    }
    if let Some(page) = params.get("page").and_then(|s| s.parse::<usize>().ok()) {
        query.page = page;
    }
}

/// Get one page of expenses (JSON API). Does not change the screen state.
pub async fn api_expenses(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Json<PageView> {
    let book = state.book.read().await;
    let mut query = book.query().clone();
    apply_query_params(&mut query, &params);
    Json(query::run(book.records(), &query))
}

/// Get single expense detail (JSON API)
pub async fn api_expense_detail(
    state: axum::extract::State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ExpenseRecord>, ApiError> {
    let book = state.book.read().await;
    book.record(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| CoreError::ExpenseNotFound { id }.into())
}

/// HTMX: Expense list - Partial page update
pub async fn htmx_expenses_list(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Html<String> {
    let mut book = state.book.write().await;

    if let Some(text) = params.get("q") {
        book.set_query_text(text);
    }
    if let Some(limit) = params.get("limit").and_then(|s| s.parse().ok()) {
        book.set_page_size(limit);
    }
    let key = params.get("sort").and_then(|s| s.parse::<SortKey>().ok());
    let dir = params.get("dir").and_then(|s| s.parse::<SortDir>().ok());
    if key.is_some() || dir.is_some() {
        let current = book.query().clone();
        book.set_sort(key.unwrap_or(current.sort_key), dir.unwrap_or(current.sort_dir));
    }
    if let Some(page) = params.get("page").and_then(|s| s.parse().ok()) {
        book.set_page(page);
    }
    match params.get("nav").map(String::as_str) {
        Some("next") => book.next_page(),
        Some("prev") => book.prev_page(),
        _ => {}
    }

    Html(render_book_list(&book, &state.config.currency, false))
}

/// HTMX: Debounced search. Every keystroke waits out the quiet period; only
/// the last one renders, earlier ones answer 204 and leave the page alone.
pub async fn htmx_expenses_search(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Response {
    let text = params.get("q").cloned().unwrap_or_default();
    let (ticket, delay) = {
        let mut book = state.book.write().await;
        (book.submit_search(&text), book.search_delay())
    };

    tokio::time::sleep(delay).await;

    let mut book = state.book.write().await;
    if !book.settle_search(ticket) {
        return StatusCode::NO_CONTENT.into_response();
    }
    Html(render_book_list(&book, &state.config.currency, false)).into_response()
}

fn form_response(book: &ExpenseBook) -> Html<String> {
    let mut html = render_form_slot(book.mode(), book.draft(), false);
    html.push_str(&render_toggle_button(book.mode(), true));
    Html(html)
}

/// HTMX: Show or hide the form
pub async fn htmx_form_toggle(state: axum::extract::State<AppState>) -> Html<String> {
    let mut book = state.book.write().await;
    book.toggle_form();
    form_response(&book)
}

/// HTMX: Open the form in create mode
pub async fn htmx_form_new(state: axum::extract::State<AppState>) -> Html<String> {
    let mut book = state.book.write().await;
    book.open_create();
    form_response(&book)
}

/// HTMX: "Limpiar"
pub async fn htmx_form_reset(state: axum::extract::State<AppState>) -> Html<String> {
    let mut book = state.book.write().await;
    book.reset_draft();
    form_response(&book)
}

/// HTMX: Open the form on an existing record
pub async fn htmx_expense_edit(
    state: axum::extract::State<AppState>,
    Path(id): Path<u64>,
) -> Result<Html<String>, ApiError> {
    let mut book = state.book.write().await;
    book.open_edit(id)?;
    Ok(form_response(&book))
}

/// HTMX: Save the submitted draft
///
/// The form slot is always re-rendered: closed on success, still open with
/// inline errors otherwise. The toast rides along, and so does the list
/// when it changed.
pub async fn htmx_expense_store(
    state: axum::extract::State<AppState>,
    body: String,
) -> Html<String> {
    let params = parse_form(&body);
    let mut book = state.book.write().await;
    book.set_draft(Draft::from_form(&params));

    let result = book.submit(Utc::now()).await;
    if let Err(CoreError::ExpenseNotFound { id }) = &result {
        log::warn!("Expense {} vanished while being edited", id);
        book.reset_draft();
        book.show_toast(Toast::err("El registro ya no existe.", Instant::now()));
    }

    let mut html = form_response(&book).0;
    if result.is_ok() {
        html.push_str(&render_book_list(&book, &state.config.currency, true));
    }
    html.push_str(&render_book_toast(&mut book, true));
    Html(html)
}

/// HTMX: Ask for confirmation before deleting
pub async fn htmx_expense_delete(
    state: axum::extract::State<AppState>,
    Path(id): Path<u64>,
) -> Result<Html<String>, ApiError> {
    let mut book = state.book.write().await;
    book.request_delete(id)?;
    Ok(Html(render_modal_slot(book.mode(), &book, false)))
}

/// HTMX: Confirm the pending delete
pub async fn htmx_confirm(state: axum::extract::State<AppState>) -> Html<String> {
    let mut book = state.book.write().await;
    match book.confirm_delete().await {
        Ok(_) => {}
        // double click on "Sí, borrar"; the first one already closed the dialog
        Err(CoreError::NoPendingAction) => log::debug!("Confirm with nothing pending"),
        Err(e) => log::error!("Delete failed: {}", e),
    }

    let mut html = render_modal_slot(book.mode(), &book, false);
    html.push_str(&render_book_list(&book, &state.config.currency, true));
    html.push_str(&render_book_toast(&mut book, true));
    Html(html)
}

/// HTMX: Cancel the pending delete
pub async fn htmx_confirm_cancel(state: axum::extract::State<AppState>) -> Html<String> {
    let mut book = state.book.write().await;
    book.cancel_confirm();
    Html(render_modal_slot(book.mode(), &book, false))
}

/// HTMX: Help modal
pub async fn htmx_help(state: axum::extract::State<AppState>) -> Html<String> {
    let mut book = state.book.write().await;
    book.open_help();
    Html(render_modal_slot(book.mode(), &book, false))
}

/// HTMX: Close the help modal
pub async fn htmx_help_close(state: axum::extract::State<AppState>) -> Html<String> {
    let mut book = state.book.write().await;
    book.close_help();
    Html(render_modal_slot(book.mode(), &book, false))
}
