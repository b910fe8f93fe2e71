use thiserror::Error;

/// External classification service failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    Timeout,
    RateLimited,
    MalformedResponse,
    Unavailable,
}

impl ServiceErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceErrorKind::Timeout => "timeout",
            ServiceErrorKind::RateLimited => "rate_limited",
            ServiceErrorKind::MalformedResponse => "malformed_response",
            ServiceErrorKind::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level extraction failures. These never abort a submission on their
/// own; the parser absorbs them into degraded defaults and records a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    MissingField,
    UnrecognizedCategory,
    MalformedConfidence,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::MissingField => "missing_field",
            ParseErrorKind::UnrecognizedCategory => "unrecognized_category",
            ParseErrorKind::MalformedConfidence => "malformed_confidence",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TriageError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("service error ({kind}): {detail}")]
    Service {
        kind: ServiceErrorKind,
        detail: String,
        /// True when the retry budget was spent before surfacing.
        retries_exhausted: bool,
    },

    #[error("parse error ({kind}): {detail}")]
    Parse { kind: ParseErrorKind, detail: String },

    #[error("duplicate case: {0}")]
    DuplicateCase(String),

    #[error("case not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    /// Runtime failures inside the engine itself, such as a worker task
    /// panicking or being cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TriageError {
    pub fn validation(detail: impl Into<String>) -> Self {
        TriageError::Validation(detail.into())
    }

    pub fn service(kind: ServiceErrorKind, detail: impl Into<String>) -> Self {
        TriageError::Service {
            kind,
            detail: detail.into(),
            retries_exhausted: false,
        }
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::service(ServiceErrorKind::Timeout, detail)
    }

    pub fn rate_limited(detail: impl Into<String>) -> Self {
        Self::service(ServiceErrorKind::RateLimited, detail)
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::service(ServiceErrorKind::Unavailable, detail)
    }

    pub fn malformed_response(detail: impl Into<String>) -> Self {
        Self::service(ServiceErrorKind::MalformedResponse, detail)
    }

    pub fn parse(kind: ParseErrorKind, detail: impl Into<String>) -> Self {
        TriageError::Parse {
            kind,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        TriageError::Config(detail.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        TriageError::Internal(detail.into())
    }

    /// Only timeouts and rate limits are retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TriageError::Service {
                kind: ServiceErrorKind::Timeout | ServiceErrorKind::RateLimited,
                ..
            }
        )
    }

    pub fn mark_retries_exhausted(self) -> Self {
        match self {
            TriageError::Service { kind, detail, .. } => TriageError::Service {
                kind,
                detail,
                retries_exhausted: true,
            },
            other => other,
        }
    }

    pub fn service_kind(&self) -> Option<ServiceErrorKind> {
        match self {
            TriageError::Service { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
