//! Toast rendering - Shared by the app and auth screens
//!
//! The app toast lives in the book and expires server-side: the slot polls
//! `/toast` once its time is up and gets back an empty slot. The auth toast
//! is not stored anywhere and simply hides itself.

use crate::{slot, AppState};
use gastoweb_core::{Toast, ToastKind};
use gastoweb_utils::escape_html;
use std::time::{Duration, Instant};

const SLOT_ID: &str = "toast-slot";

fn toast_box(kind: ToastKind, message: &str, close_attrs: &str) -> String {
    let (colors, icon) = match kind {
        ToastKind::Ok => ("bg-green-50 border-green-200 text-green-800", "✓"),
        ToastKind::Err => ("bg-red-50 border-red-200 text-red-800", "✗"),
    };
    format!(
        r#"<div class='fixed bottom-4 right-4 z-50 border rounded-lg shadow-lg px-4 py-3 flex items-center gap-3 {}' role='status' aria-live='polite'>
    <span>{}</span><span class='font-medium'>{}</span>
    <button type='button' class='ml-2 text-gray-400 hover:text-gray-600' aria-label='Cerrar' {}>✕</button>
</div>"#,
        colors,
        icon,
        escape_html(message),
        close_attrs
    )
}

/// Toast slot of the main screen. `remaining` is how long until the toast
/// expires; the slot reloads itself then.
pub fn render_toast_slot(toast: Option<&Toast>, remaining: Duration, oob: bool) -> String {
    match toast {
        Some(toast) => {
            let attrs = format!(
                "hx-get='/toast' hx-trigger='load delay:{}ms' hx-swap='outerHTML'",
                remaining.as_millis() + 50
            );
            let close = "hx-post='/toast/dismiss' hx-target='#toast-slot' hx-swap='outerHTML'";
            slot(SLOT_ID, oob, &attrs, &toast_box(toast.kind, &toast.message, close))
        }
        None => slot(SLOT_ID, oob, "", ""),
    }
}

/// Current toast of `book`, rendered with its remaining lifetime
pub fn render_book_toast(book: &mut gastoweb_core::ExpenseBook, oob: bool) -> String {
    let now = Instant::now();
    let timeout = book.toast_timeout();
    match book.current_toast_at(now) {
        Some(toast) => {
            let elapsed = now.saturating_duration_since(toast.shown_at);
            render_toast_slot(Some(&toast), timeout.saturating_sub(elapsed), oob)
        }
        None => render_toast_slot(None, Duration::ZERO, oob),
    }
}

/// Toast for the auth screen, hidden client-side after `timeout_ms`
pub fn render_auth_toast(kind: ToastKind, message: &str, timeout_ms: u64) -> String {
    let close = "onclick=\"document.getElementById('auth-toast').innerHTML = ''\"";
    format!(
        r#"<div id='auth-toast'>{}<script>setTimeout(function () {{ var el = document.getElementById('auth-toast'); if (el) el.innerHTML = ''; }}, {});</script></div>"#,
        toast_box(kind, message, close),
        timeout_ms
    )
}

/// HTMX: Toast slot, empty once the toast expired
pub async fn htmx_toast(state: axum::extract::State<AppState>) -> axum::response::Html<String> {
    let mut book = state.book.write().await;
    axum::response::Html(render_book_toast(&mut book, false))
}

/// HTMX: Dismiss the toast (click)
pub async fn htmx_toast_dismiss(state: axum::extract::State<AppState>) -> axum::response::Html<String> {
    let mut book = state.book.write().await;
    book.dismiss_toast();
    axum::response::Html(render_toast_slot(None, Duration::ZERO, false))
}
