//! Auth endpoints - HTMX partial responses
//!
//! Endpoints:
//! - htmx_auth_check: Re-render the submit button as the user types
//! - htmx_auth_submit: Check the credentials and answer with a toast

use super::page::render_submit_button;
use crate::routes::toast::render_auth_toast;
use crate::{parse_form, AppState};
use gastoweb_core::{authenticate, AuthRequest, ToastKind};
use std::collections::HashMap;

fn auth_request(params: &HashMap<String, String>) -> AuthRequest {
    let field = |name: &str| params.get(name).cloned().unwrap_or_default();
    AuthRequest {
        tab: params.get("tab").and_then(|s| s.parse().ok()).unwrap_or_default(),
        email: field("email"),
        password: field("password"),
        confirm_password: field("confirm_password"),
    }
}

/// HTMX: Submit button, enabled once the fields are long enough
pub async fn htmx_auth_check(
    state: axum::extract::State<AppState>,
    body: String,
) -> axum::response::Html<String> {
    let request = auth_request(&parse_form(&body));
    let min_len = state.config.auth.min_password_len;
    let enabled = request.can_submit(min_len);
    axum::response::Html(render_submit_button(request.tab, enabled, min_len))
}

/// HTMX: Demo sign-in. Success remembers the email and redirects to the app
pub async fn htmx_auth_submit(
    state: axum::extract::State<AppState>,
    body: String,
) -> axum::response::Html<String> {
    let request = auth_request(&parse_form(&body));
    let auth = &state.config.auth;
    let timeout_ms = state.config.toast.auth_timeout_ms;

    match authenticate(&request, auth.min_password_len) {
        Ok(outcome) => {
            {
                let book = state.book.read().await;
                if let Err(e) = book.remember_email(&outcome.email).await {
                    log::error!("Failed to remember email: {}", e);
                }
            }
            log::info!("Demo sign-in accepted ({:?})", request.tab);

            let mut html = render_auth_toast(ToastKind::Ok, outcome.message, timeout_ms);
            html.push_str(&format!(
                "<script>setTimeout(function () {{ window.location.href = '/app'; }}, {});</script>",
                auth.redirect_delay_ms
            ));
            axum::response::Html(html)
        }
        Err(e) => {
            log::debug!("Rejected sign-in: {}", e);
            axum::response::Html(render_auth_toast(ToastKind::Err, &e.to_string(), timeout_ms))
        }
    }
}
