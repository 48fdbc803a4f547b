//! Remote call errors and their classification

use thiserror::Error;

/// Error codes the compute platform and gateway use for a missing resource
const NOT_FOUND_CODES: &[&str] = &["ResourceNotFoundException", "NotFoundException"];

/// Error codes used when an equivalent resource already exists
const CONFLICT_CODES: &[&str] = &["ResourceConflictException", "ConflictException"];

/// How a remote failure should be treated by the rollout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    NotFound,
    Conflict,
    Other,
}

/// Map a machine-readable error code to its kind
pub fn classify(code: Option<&str>) -> RemoteErrorKind {
    match code {
        Some(code) if NOT_FOUND_CODES.contains(&code) => RemoteErrorKind::NotFound,
        Some(code) if CONFLICT_CODES.contains(&code) => RemoteErrorKind::Conflict,
        _ => RemoteErrorKind::Other,
    }
}

/// A failed request against the compute platform or the gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed ({}): {message}", .code.as_deref().unwrap_or("no error code"))]
pub struct RemoteError {
    /// Remote operation name, e.g. `GetAlias`
    pub operation: &'static str,

    /// Machine-readable error code, when the service returned one
    pub code: Option<String>,

    pub message: String,
}

impl RemoteError {
    pub fn new(operation: &'static str, code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            operation,
            code,
            message: message.into(),
        }
    }

    /// Error carrying a service error code
    pub fn with_code(
        operation: &'static str,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(operation, Some(code.into()), message)
    }

    /// The service answered, but without a field the rollout needs
    pub fn missing_field(operation: &'static str, field: &str) -> Self {
        Self::new(operation, None, format!("response is missing `{}`", field))
    }

    pub fn kind(&self) -> RemoteErrorKind {
        classify(self.code.as_deref())
    }
}
