//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::auth: Demo login/register screen
//! - routes::expenses: Expense list, form, confirm dialog, help, toasts
//! - routes::settings: Configuration dump

pub mod error;
pub mod routes;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use gastoweb_config::Config;
use gastoweb_core::{BookOperations, BookSummary, ExpenseBook};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub book: Arc<RwLock<ExpenseBook>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::auth::{htmx_auth_check, htmx_auth_submit, page_auth};
    use routes::toast::{htmx_toast, htmx_toast_dismiss};
    use routes::expenses::{
        api_expense_detail, api_expenses, htmx_confirm, htmx_confirm_cancel, htmx_expense_delete,
        htmx_expense_edit, htmx_expense_store, htmx_expenses_list, htmx_expenses_search,
        htmx_form_new, htmx_form_reset, htmx_form_toggle, htmx_help, htmx_help_close, page_app,
    };
    use routes::settings::api_settings;

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/expenses", get(api_expenses))
        .route("/api/expenses/:id", get(api_expense_detail))
        .route("/api/summary", get(api_summary))
        .route("/api/settings", get(api_settings))
        // Pages
        .route("/", get(page_auth))
        .route("/auth", post(htmx_auth_submit))
        .route("/auth/check", post(htmx_auth_check))
        .route("/app", get(page_app))
        // HTMX partial routes
        .route("/expenses", post(htmx_expense_store))
        .route("/expenses/list", get(htmx_expenses_list))
        .route("/expenses/search", get(htmx_expenses_search))
        .route("/expenses/form/toggle", get(htmx_form_toggle))
        .route("/expenses/form/new", get(htmx_form_new))
        .route("/expenses/form/reset", post(htmx_form_reset))
        .route("/expenses/:id/edit", get(htmx_expense_edit))
        .route("/expenses/:id/delete", post(htmx_expense_delete))
        .route("/confirm", post(htmx_confirm))
        .route("/confirm/cancel", post(htmx_confirm_cancel))
        .route("/help", get(htmx_help))
        .route("/help/close", post(htmx_help_close))
        .route("/toast", get(htmx_toast))
        .route("/toast/dismiss", post(htmx_toast_dismiss))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Totals over every stored record (JSON API)
async fn api_summary(state: axum::extract::State<AppState>) -> Json<BookSummary> {
    let book = state.book.read().await;
    Json(book.summary())
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="es-AR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Gastos de Transporte</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    <a href="#main" class="sr-only focus:not-sr-only">Saltar al contenido</a>
    {}
</body>
</html>"##,
        title, content
    )
}

/// Top bar for the signed-in screen
pub fn navbar() -> String {
    r##"<nav class='bg-white border-b sticky top-0 z-30'>
    <div class='max-w-5xl mx-auto px-4 py-3 flex items-center gap-4'>
        <a href='/app' class='flex items-center gap-2 font-semibold text-indigo-600'><span role='img' aria-label='app'>📱</span>Gastos de Transporte</a>
        <a href='#help' hx-get='/help' hx-target='#modal-slot' hx-swap='outerHTML' class='text-gray-600 hover:text-gray-900'>Ayuda</a>
        <div class='flex-1'></div>
        <a href='/' class='px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50' aria-label='Cerrar sesión y volver al inicio'>Cerrar sesión</a>
    </div>
</nav>"##
        .to_string()
}

/// Check if request is from HTMX (partial page update)
fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        inner_content.to_string()
    } else {
        base_html(
            title,
            &format!(
                "{}<main id='main' class='max-w-5xl mx-auto px-4 py-6'>{}</main>",
                navbar(),
                inner_content
            ),
        )
    }
}

/// A swappable slot element. With `oob` set the slot rides along in another
/// response and replaces its namesake in place.
pub fn slot(id: &str, oob: bool, attrs: &str, inner: &str) -> String {
    format!(
        "<div id='{}'{}{}{}>{}</div>",
        id,
        if oob { " hx-swap-oob='true'" } else { "" },
        if attrs.is_empty() { "" } else { " " },
        attrs,
        inner
    )
}

/// Decode an `application/x-www-form-urlencoded` body
pub fn parse_form(body: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = urlencoding::decode(&key.replace('+', " ")).map(|s| s.into_owned()).unwrap_or_default();
        let value = urlencoding::decode(&value.replace('+', " ")).map(|s| s.into_owned()).unwrap_or_default();
        params.insert(key, value);
    }
    params
}

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(config: Config, book: Arc<RwLock<ExpenseBook>>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { book, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    log::info!("Starting gastoweb server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Login)");
    log::info!("  - /app (Expenses)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form() {
        let params = parse_form("medio=App+%28Uber%2FCabify%29&zona=Nueva%20C%C3%B3rdoba&gasto=10,5&empty=&flag");
        assert_eq!(params["medio"], "App (Uber/Cabify)");
        assert_eq!(params["zona"], "Nueva Córdoba");
        assert_eq!(params["gasto"], "10,5");
        assert_eq!(params["empty"], "");
        assert_eq!(params["flag"], "");
    }

    #[test]
    fn test_slot() {
        assert_eq!(slot("toast-slot", false, "", ""), "<div id='toast-slot'></div>");
        assert_eq!(
            slot("toast-slot", true, "class='x'", "hola"),
            "<div id='toast-slot' hx-swap-oob='true' class='x'>hola</div>"
        );
    }

    #[test]
    fn test_page_response_partial() {
        let mut headers = axum::http::HeaderMap::new();
        assert!(page_response(&headers, "Gastos", "<p>x</p>").starts_with("<!DOCTYPE html>"));
        headers.insert("hx-request", "true".parse().unwrap());
        assert_eq!(page_response(&headers, "Gastos", "<p>x</p>"), "<p>x</p>");
    }
}
