//! Reev error types

use crate::store::StoreError;

/// Coarse error classification shared by every operation.
///
/// Kinds map one-to-one onto transport status codes; callers match on the
/// kind, never on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested API version is not implemented by this service.
    Unimplemented,
    /// The targeted post does not exist.
    NotFound,
    /// Datastore, transport or decode failure.
    Unknown,
}

impl ErrorKind {
    /// Short lowercase label, used for metrics and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unimplemented => "unimplemented",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unknown => "unknown",
        }
    }
}

/// Reev error types
#[derive(Debug, thiserror::Error)]
pub enum ReevError {
    #[error(
        "unsupported API version: service implements API version '{expected}', but asked for '{requested}'"
    )]
    UnsupportedApi {
        expected: &'static str,
        requested: String,
    },

    #[error("Post with ID='{id}' is not found")]
    NotFound { id: i64 },

    /// More than one row shares a single id.
    #[error("found multiple Post rows with ID='{id}'")]
    MultipleRows { id: i64 },

    // Datastore errors
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Transport errors
    #[error("transport error: {0}")]
    Transport(String),

    /// Error status returned by a remote service.
    #[error("{message}")]
    Remote { kind: ErrorKind, message: String },
}

impl ReevError {
    /// Wrap a datastore failure with a short description of the step that failed.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| ReevError::Store { context, source }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReevError::UnsupportedApi { .. } => ErrorKind::Unimplemented,
            ReevError::NotFound { .. } => ErrorKind::NotFound,
            ReevError::Remote { kind, .. } => *kind,
            ReevError::MultipleRows { .. }
            | ReevError::Store { .. }
            | ReevError::Configuration(_)
            | ReevError::Transport(_) => ErrorKind::Unknown,
        }
    }
}

#[cfg(any(feature = "server", feature = "client"))]
impl From<ErrorKind> for tonic::Code {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Unimplemented => tonic::Code::Unimplemented,
            ErrorKind::NotFound => tonic::Code::NotFound,
            ErrorKind::Unknown => tonic::Code::Unknown,
        }
    }
}

#[cfg(any(feature = "server", feature = "client"))]
impl From<ReevError> for tonic::Status {
    fn from(err: ReevError) -> Self {
        tonic::Status::new(err.kind().into(), err.to_string())
    }
}

/// Result type alias for Reev operations
pub type Result<T> = std::result::Result<T, ReevError>;
