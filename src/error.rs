use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::models::{ExternalKey, SyncStage};

pub type SourceResult<T> = Result<T, SourceError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type SyncResult<T> = Result<T, SyncError>;
pub type AppResult<T> = Result<T, AppError>;

/// Failures of the upstream team source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure (`status` is `None`) or a non-success HTTP status.
    #[error("upstream source unavailable{}: {body}", display_status(.status))]
    Unavailable { status: Option<u16>, body: String },

    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    #[error("team with external key {0} not found upstream")]
    NotFound(ExternalKey),
}

impl SourceError {
    pub fn unavailable(status: Option<u16>, body: impl Into<String>) -> Self {
        Self::Unavailable {
            status,
            body: body.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// True for failures a later attempt may not hit again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

/// Failures of the team record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

const UNIQUE_VIOLATION: &str = "23505";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Self::Conflict(db_err.message().to_string())
            }
            _ => Self::Backend(err.to_string()),
        }
    }
}

/// Errors surfaced by the reconciliation engine.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to fetch teams from upstream: {0}")]
    Source(#[from] SourceError),

    #[error("lookup failed for external key {key}: {source}")]
    Lookup { key: ExternalKey, source: StoreError },

    #[error("create failed for external key {key}: {source}")]
    Create { key: ExternalKey, source: StoreError },

    #[error("update failed for external key {key}: {source}")]
    Update { key: ExternalKey, source: StoreError },
}

impl SyncError {
    pub fn store(stage: SyncStage, key: ExternalKey, source: StoreError) -> Self {
        match stage {
            SyncStage::Lookup => Self::Lookup { key, source },
            SyncStage::Create => Self::Create { key, source },
            SyncStage::Update => Self::Update { key, source },
        }
    }

    /// Store stage that failed, `None` for upstream failures.
    pub fn stage(&self) -> Option<SyncStage> {
        match self {
            Self::Source(_) => None,
            Self::Lookup { .. } => Some(SyncStage::Lookup),
            Self::Create { .. } => Some(SyncStage::Create),
            Self::Update { .. } => Some(SyncStage::Update),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    MissingRequired(&'static str),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

/// HTTP-facing error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => Self::NotFound(msg),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Backend(msg) => Self::Storage(msg),
        }
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotFound(_) => Self::NotFound(err.to_string()),
            _ => Self::Upstream(err.to_string()),
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Source(source) => source.into(),
            SyncError::Lookup { key, source }
            | SyncError::Create { key, source }
            | SyncError::Update { key, source } => match source {
                StoreError::Conflict(msg) => {
                    Self::Conflict(format!("external key {key}: {msg}"))
                }
                other => Self::Storage(format!("external key {key}: {other}")),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            Self::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg),
            Self::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg),
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                code,
            }),
        )
            .into_response()
    }
}
