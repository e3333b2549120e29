//! Demo login/register screen. Nothing is checked against an account store;
//! the only side effect of a successful submit is remembering the email.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Store key under which the last used email is kept
pub const LAST_EMAIL_KEY: &str = "lastEmail";

pub fn register_passwords_message(min_len: usize) -> String {
    format!("Completá ambas contraseñas ({}+ caracteres).", min_len)
}

pub fn login_password_message(min_len: usize) -> String {
    format!("Usá {}+ caracteres por ahora (demo).", min_len)
}

pub const MSG_EMAIL: &str = "Ingresá un email válido.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthTab {
    #[default]
    Login,
    Register,
}

impl std::str::FromStr for AuthTab {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "login" => Ok(AuthTab::Login),
            "register" => Ok(AuthTab::Register),
            _ => Err(format!("Invalid auth tab: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub tab: AuthTab,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Only read on the register tab
    #[serde(default)]
    pub confirm_password: String,
}

/// Successful submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub email: String,
    pub message: &'static str,
}

fn long_enough(s: &str, min_len: usize) -> bool {
    s.chars().count() >= min_len
}

impl AuthRequest {
    /// Whether the submit button is enabled
    pub fn can_submit(&self, min_len: usize) -> bool {
        let email_ok = !self.email.trim().is_empty();
        match self.tab {
            AuthTab::Login => email_ok && long_enough(&self.password, min_len),
            AuthTab::Register => {
                email_ok
                    && long_enough(&self.password, min_len)
                    && long_enough(&self.confirm_password, min_len)
            }
        }
    }
}

/// Check a submit. The two register passwords are not compared.
pub fn authenticate(request: &AuthRequest, min_len: usize) -> Result<AuthOutcome, CoreError> {
    match request.tab {
        AuthTab::Register => {
            if !long_enough(&request.password, min_len)
                || !long_enough(&request.confirm_password, min_len)
            {
                return Err(CoreError::validation("password", &register_passwords_message(min_len)));
            }
        }
        AuthTab::Login => {
            if !long_enough(&request.password, min_len) {
                return Err(CoreError::validation("password", &login_password_message(min_len)));
            }
        }
    }

    let email = request.email.trim();
    if !email.contains('@') {
        return Err(CoreError::validation("email", MSG_EMAIL));
    }

    let message = match request.tab {
        AuthTab::Login => "Sesión iniciada",
        AuthTab::Register => "Cuenta creada",
    };
    Ok(AuthOutcome { email: email.to_string(), message })
}
