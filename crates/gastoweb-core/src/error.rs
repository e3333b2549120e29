//! Error types for gastoweb-core
//!
//! Errors carry a stable code and a severity so the API layer can choose a
//! status and the UI can choose between an inline message and a toast.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use gastoweb_store::StoreError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    ExpenseNotFound,
    NoPendingAction,
    StoreError,
    SerializationError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::ExpenseNotFound => write!(f, "EXPENSE_NOT_FOUND"),
            ErrorCode::NoPendingAction => write!(f, "NO_PENDING_ACTION"),
            ErrorCode::StoreError => write!(f, "STORE_ERROR"),
            ErrorCode::SerializationError => write!(f, "SERIALIZATION_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Operation refused, user can fix the input
    Info,
    Warning,
    /// Operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    /// Form field the error refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            field: None,
            suggestions: vec![],
        }
    }

    pub fn with_field(mut self, field: String) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref field) = self.field {
            write!(f, "\nField: {}", field)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for gastoweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    /// Message is user-facing and already in Spanish
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Expense not found: {id}")]
    ExpenseNotFound { id: u64 },

    #[error("No pending confirmation")]
    NoPendingAction,

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: &str) -> Self {
        CoreError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Validation { .. } => ErrorCode::ValidationError,
            CoreError::ExpenseNotFound { .. } => ErrorCode::ExpenseNotFound,
            CoreError::NoPendingAction => ErrorCode::NoPendingAction,
            CoreError::Store { .. } => ErrorCode::StoreError,
            CoreError::Serialization { .. } => ErrorCode::SerializationError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Validation { .. } => ErrorSeverity::Info,
            CoreError::ExpenseNotFound { .. } => ErrorSeverity::Info,
            CoreError::NoPendingAction => ErrorSeverity::Warning,
            CoreError::Store { .. } => ErrorSeverity::Error,
            CoreError::Serialization { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Validation { field, .. } => {
                details = details.with_field(field.clone());
            }
            CoreError::ExpenseNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/expenses endpoint to list all expenses.".to_string()
                );
            }
            CoreError::Store { .. } => {
                details = details.with_suggestion(
                    "Check that the data directory exists and is writable.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> Self {
        CoreError::Store { message: error.to_string() }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::Serialization { message: error.to_string() }
    }
}
