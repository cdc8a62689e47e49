//! Error types for the listing surfaces
//!
//! This module provides error handling for view-level operations,
//! including error codes, detailed messages, and suggestions.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use taka_source::SourceError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewErrorCode {
    /// Page fetch failed
    FetchFailed,
    /// Record mutation failed
    MutationFailed,
}

impl std::fmt::Display for ViewErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ViewErrorCode::MutationFailed => write!(f, "MUTATION_FAILED"),
        }
    }
}

/// Detailed error information for presentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewErrorDetails {
    /// Error code
    pub code: ViewErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ViewErrorDetails {
    /// Create a new error detail
    pub fn new(code: ViewErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ViewErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
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

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewErrorSeverity {
    /// Debug information
    Debug,
    /// Informational
    Info,
    /// Warning - operation may be retried
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - view state may be unstable
    Critical,
}

impl std::fmt::Display for ViewErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewErrorSeverity::Debug => write!(f, "debug"),
            ViewErrorSeverity::Info => write!(f, "info"),
            ViewErrorSeverity::Warning => write!(f, "warning"),
            ViewErrorSeverity::Error => write!(f, "error"),
            ViewErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for the listing surfaces.
///
/// Nothing here is fatal: a failed fetch leaves pagination untouched
/// and may be retried or escaped via refresh; a failed mutation leaves
/// the records unchanged.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Fetch failed: {message}")]
    Fetch { message: String, transient: bool },

    #[error("Mutation failed: {message}")]
    Mutation { message: String },
}

impl ViewError {
    /// Wrap a source error from a page fetch
    pub fn fetch(error: &SourceError) -> Self {
        ViewError::Fetch {
            message: error.to_string(),
            transient: error.is_transient(),
        }
    }

    /// Wrap a source error from an insert/update/delete
    pub fn mutation(error: &SourceError) -> Self {
        ViewError::Mutation {
            message: error.to_string(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ViewErrorCode {
        match self {
            ViewError::Fetch { .. } => ViewErrorCode::FetchFailed,
            ViewError::Mutation { .. } => ViewErrorCode::MutationFailed,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ViewErrorSeverity {
        match self {
            ViewError::Fetch { transient: true, .. } => ViewErrorSeverity::Warning,
            ViewError::Fetch { transient: false, .. } => ViewErrorSeverity::Error,
            ViewError::Mutation { .. } => ViewErrorSeverity::Warning,
        }
    }

    /// Whether retrying the same operation can succeed. Non-transient
    /// fetch errors (a stale cursor, a rejected query) need a refresh
    /// instead.
    pub fn retryable(&self) -> bool {
        match self {
            ViewError::Fetch { transient, .. } => *transient,
            ViewError::Mutation { .. } => true,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ViewErrorDetails {
        let mut details = ViewErrorDetails::new(self.code(), self.to_string());

        match self {
            ViewError::Fetch { message, transient } => {
                details = details.with_detail(serde_json::json!({ "source_message": message }));
                if *transient {
                    details = details.with_suggestion(
                        "Check the connection and try again.".to_string(),
                    );
                } else {
                    details = details.with_suggestion(
                        "Refresh the listing to start over from the first page.".to_string(),
                    );
                }
            }
            ViewError::Mutation { message } => {
                details = details.with_detail(serde_json::json!({ "source_message": message }));
                details = details.with_suggestion(
                    "The records were left unchanged; retry the edit.".to_string(),
                );
            }
        }

        details
    }
}

/// Result type with ViewError
pub type ViewResult<T> = Result<T, ViewError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// User ID (if signed in)
    pub user_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: String) -> Self {
        Self {
            user_id: None,
            operation,
            data: serde_json::json!({}),
        }
    }

    /// Add user ID
    pub fn with_user_id(mut self, user_id: String) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &ViewError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
    /// Log debug information
    fn log_debug(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &ViewError, context: &ErrorContext) {
        log::error!(
            target: "taka::views",
            "ERROR [{}] {} - Operation: {} - User: {:?}",
            error.code(),
            error.to_details(),
            context.operation,
            context.user_id
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "taka::views",
            "WARNING: {} - Operation: {} - User: {:?}",
            message,
            context.operation,
            context.user_id
        );
    }

    fn log_debug(&self, message: &str, context: &ErrorContext) {
        log::debug!(
            target: "taka::views",
            "DEBUG: {} - Operation: {} - User: {:?}",
            message,
            context.operation,
            context.user_id
        );
    }
}

/// Log through the default logger and hand the error back to the caller
pub(crate) fn report(op: &str, user: Option<Uuid>, error: ViewError) -> ViewError {
    let mut context = ErrorContext::new(op.to_string());
    if let Some(user) = user {
        context = context.with_user_id(user.to_string());
    }
    DefaultErrorLogger.log_error(&error, &context);
    error
}

// ==================== Tests ====================
