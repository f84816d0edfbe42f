use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use skilltrack_core::error::CoreError;
use skilltrack_tracker::{RefreshError, StatsError, StoreError};

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain and tracker errors. Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Refresh(#[from] RefreshError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Core(core) => Self::Core(core),
            StatsError::Store(store) => Self::Store(store),
        }
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type ErrorParts = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            // --- Refresh errors ---
            AppError::Refresh(refresh) => match refresh {
                RefreshError::PlayerNotFound { handle, cause } => {
                    tracing::debug!(player = %handle, error = %cause, "Player not found");
                    (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        format!("Player '{handle}' not found"),
                    )
                }
                RefreshError::InvalidHandle(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                RefreshError::Store(store) => classify_store_error(store),
            },

            AppError::Store(store) => classify_store_error(store),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} '{id}' not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
    }
}

fn classify_store_error(err: &StoreError) -> ErrorParts {
    match err {
        StoreError::Database(db) => classify_sqlx_error(db),
        StoreError::Codec(codec) => {
            tracing::error!(error = %codec, "Cache payload could not be decoded");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// `RowNotFound` maps to 404; everything else maps to 500 with a
/// sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
