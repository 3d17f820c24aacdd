//! Unified error handling system
//!
//! Every service-layer failure is one of a small, stable set of categories.
//! The HTTP layer maps each category to a status code; the categories
//! themselves carry only caller-safe messages, with internal detail kept in
//! `source` for logging.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

pub type VoyageResult<T> = Result<T, VoyageError>;

/// Boxed source error carried by storage and internal failures
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Where and when an error originated
#[derive(Debug, Clone, Serialize)]
pub struct ErrorContext {
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }
}

/// Stable error category, used for status mapping and response bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Conflict,
    Unauthorized,
    NotFound,
    Validation,
    Config,
    Storage,
    Internal,
}

impl ErrorKind {
    /// Machine-readable code exposed to clients
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Config | ErrorKind::Storage | ErrorKind::Internal => "internal_error",
        }
    }
}

/// Main error type for the Voyage system
#[derive(Error, Debug)]
pub enum VoyageError {
    /// A unique key is already taken (duplicate email on registration)
    #[error("{message}")]
    Conflict { message: String },

    /// Bad credentials or a missing, invalid, or expired token
    #[error("{message}")]
    Unauthorized { message: String },

    /// The resource does not exist or is not visible to the caller
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<BoxedSource>,
        context: ErrorContext,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxedSource>,
        context: ErrorContext,
    },
}

impl VoyageError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::Validation {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn storage<E>(message: impl Into<String>, component: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            message: message.into(),
            source: Some(Box::new(source)),
            context: ErrorContext::new(component),
        }
    }

    pub fn internal(message: impl Into<String>, component: &str) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
            context: ErrorContext::new(component),
        }
    }

    /// Record the operation that failed on a storage or internal error
    pub fn with_operation(mut self, operation: &str) -> Self {
        if let VoyageError::Storage { context, .. } | VoyageError::Internal { context, .. } =
            &mut self
        {
            *context = context.clone().with_operation(operation);
        }
        self
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoyageError::Conflict { .. } => ErrorKind::Conflict,
            VoyageError::Unauthorized { .. } => ErrorKind::Unauthorized,
            VoyageError::NotFound { .. } => ErrorKind::NotFound,
            VoyageError::Validation { .. } => ErrorKind::Validation,
            VoyageError::Config { .. } => ErrorKind::Config,
            VoyageError::Storage { .. } => ErrorKind::Storage,
            VoyageError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            VoyageError::Storage { context, .. } | VoyageError::Internal { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// Message that is safe to show to a client.
    ///
    /// Server-side failures never expose their detail.
    pub fn public_message(&self) -> String {
        match self {
            VoyageError::Config { .. }
            | VoyageError::Storage { .. }
            | VoyageError::Internal { .. } => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            VoyageError::Storage { context, source, .. }
            | VoyageError::Internal { context, source, .. } => {
                error!(
                    component = %context.component,
                    operation = ?context.operation,
                    source = ?source.as_ref().map(|s| s.to_string()),
                    error = %self,
                    "Internal failure"
                );
            }
            VoyageError::Config { .. } => {
                error!(error = %self, "Configuration error");
            }
            VoyageError::Unauthorized { .. } => {
                warn!(error = %self, "Request rejected as unauthorized");
            }
            VoyageError::Conflict { .. }
            | VoyageError::NotFound { .. }
            | VoyageError::Validation { .. } => {
                debug!(kind = ?self.kind(), error = %self, "Request rejected");
            }
        }
    }
}

/// Convenience macro for validation errors tied to one input field
#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr) => {
        $crate::VoyageError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
        }
    };
}
