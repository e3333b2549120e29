//! Auth page rendering - Login/register card

use crate::{base_html, AppState};
use axum::extract::Query;
use gastoweb_core::{login_password_message, AuthTab};
use gastoweb_utils::escape_html;
use std::collections::HashMap;

/// Submit button; disabled until the fields can be submitted
pub fn render_submit_button(tab: AuthTab, enabled: bool, min_len: usize) -> String {
    let label = match tab {
        AuthTab::Login => "Iniciar sesión",
        AuthTab::Register => "Crear cuenta",
    };
    let state = if enabled {
        "class='w-full px-4 py-3 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'".to_string()
    } else {
        format!(
            "class='w-full px-4 py-3 bg-indigo-300 text-white rounded-lg cursor-not-allowed' disabled aria-disabled='true' title='Completá la contraseña (y repetir) con {}+ caracteres'",
            min_len
        )
    };
    format!("<button id='auth-submit' type='submit' {}>{}</button>", state, label)
}

fn password_field(id: &str, name: &str, label: &str, autocomplete: &str, help: &str) -> String {
    format!(
        r#"<div class='mb-4'>
    <label for='{id}' class='block text-sm font-medium mb-1'>{label}</label>
    <div class='flex'>
        <input id='{id}' name='{name}' type='password' autocomplete='{autocomplete}' class='flex-1 px-3 py-2 border rounded-l-lg'>
        <button type='button' class='px-3 border border-l-0 rounded-r-lg text-sm hover:bg-gray-50' title='Mostrar'
            onclick="var i = document.getElementById('{id}'); i.type = i.type === 'password' ? 'text' : 'password'; this.title = i.type === 'password' ? 'Mostrar' : 'Ocultar';">👁</button>
    </div>
    <p class='text-xs text-gray-500 mt-1'>{help}</p>
</div>"#,
        id = id,
        name = name,
        label = label,
        autocomplete = autocomplete,
        help = help
    )
}

/// Auth card for `tab`, with the remembered email filled in
pub fn render_auth_card(tab: AuthTab, email: &str, min_len: usize) -> String {
    let tab_button = |target: AuthTab, href: &str, label: &str| {
        let class = if tab == target {
            "bg-indigo-600 text-white"
        } else {
            "border border-indigo-600 text-indigo-600 hover:bg-indigo-50"
        };
        format!("<a href='{}' class='px-4 py-2 rounded-lg {}'>{}</a>", href, class, label)
    };

    let (password_help, confirm) = match tab {
        AuthTab::Login => ("Luego agregaremos recuperación.".to_string(), String::new()),
        AuthTab::Register => (
            login_password_message(min_len),
            password_field(
                "confirmPwd",
                "confirm_password",
                "Repetir contraseña",
                "new-password",
                "Demo: no verificamos que coincida; podés escribir cualquier cosa.",
            ),
        ),
    };
    let tab_value = match tab {
        AuthTab::Login => "login",
        AuthTab::Register => "register",
    };
    let autocomplete = match tab {
        AuthTab::Login => "current-password",
        AuthTab::Register => "new-password",
    };

    format!(
        r#"<main id='main' class='max-w-xl mx-auto px-4 py-12'>
    <header class='text-center mb-6'>
        <h1 class='text-3xl font-semibold'>Gastos de Transporte</h1>
        <p class='text-gray-500'>Iniciá sesión o creá tu cuenta</p>
    </header>
    <div class='flex justify-center gap-2 mb-4'>{}{}</div>
    <section class='bg-white rounded-xl shadow-sm p-6'>
        <form hx-post='/auth' hx-target='#auth-toast' hx-swap='outerHTML'>
            <input type='hidden' name='tab' value='{}'>
            <div class='mb-4'>
                <label for='email' class='block text-sm font-medium mb-1'>Email</label>
                <input id='email' name='email' type='email' value='{}' autocomplete='email' placeholder='tu@email.com'
                    class='w-full px-3 py-2 border rounded-lg'
                    hx-post='/auth/check' hx-trigger='input changed' hx-target='#auth-submit' hx-swap='outerHTML' hx-include='closest form'>
            </div>
            <div hx-post='/auth/check' hx-trigger='input from:input[type=password]' hx-target='#auth-submit' hx-swap='outerHTML' hx-include='closest form'>
                {}
                {}
            </div>
            {}
            <p class='text-center text-sm text-gray-500 mt-3'>Demo: esta pantalla solo simula autenticación y te redirige a la app.</p>
        </form>
    </section>
    <div id='auth-toast'></div>
</main>"#,
        tab_button(AuthTab::Login, "/", "Iniciar sesión"),
        tab_button(AuthTab::Register, "/?tab=register", "Crear cuenta"),
        tab_value,
        escape_html(email),
        password_field("password", "password", "Contraseña", autocomplete, &password_help),
        confirm,
        render_submit_button(tab, false, min_len)
    )
}

/// Auth page (`/`)
pub async fn page_auth(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> axum::response::Html<String> {
    let tab = params
        .get("tab")
        .and_then(|s| s.parse::<AuthTab>().ok())
        .unwrap_or_default();
    let email = {
        let book = state.book.read().await;
        book.remembered_email().await.unwrap_or_default()
    };

    let min_len = state.config.auth.min_password_len;
    axum::response::Html(base_html("Ingresar", &render_auth_card(tab, &email, min_len)))
}
