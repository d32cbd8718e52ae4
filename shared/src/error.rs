use lambda_http::http::StatusCode;
use thiserror::Error;

/// Broad category of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    StoreFailure,
}

/// Errors surfaced by the user record handler. The display text is the
/// exact `err` message sent back to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("Username, {0}, already exists.")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Store(String),
}

impl UserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::Validation(_) => ErrorKind::Validation,
            UserError::Conflict(_) => ErrorKind::Conflict,
            UserError::NotFound(_) => ErrorKind::NotFound,
            UserError::Store(_) => ErrorKind::StoreFailure,
        }
    }

    /// Every failure goes out as 404, whatever its kind.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::NOT_FOUND
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        UserError::Validation(message.into())
    }
}

/// Failure reported by a document store backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),

    #[error("Unsupported attribute for field {field}: {reason}")]
    Conversion { field: String, reason: String },
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        UserError::Store(err.to_string())
    }
}
