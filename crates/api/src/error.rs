use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use scopematter_core::error::CoreError;
use scopematter_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for the closed set of business-rule violations and
/// adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{ "error": ..., "code": ... }` JSON bodies. Infrastructure
/// failures are sanitized to a generic 500; business errors pass their
/// symbolic code through untouched.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A business-rule violation from the core taxonomy.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request-body validation failure.
    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(core) => AppError::Core(core),
            StoreError::Database(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => (core_status(*core), core.code(), core.to_string()),

            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                validation_message(errors),
            ),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// HTTP status for each business error.
///
/// Non-existence (including ownership misses) is 404; state conflicts are
/// 409; revoked/expired share links are 410; the remaining rule violations
/// are plain 400s.
fn core_status(err: CoreError) -> StatusCode {
    match err {
        CoreError::ProjectNotFound
        | CoreError::ScopeItemNotFound
        | CoreError::RequestNotFound
        | CoreError::ChangeOrderNotFound
        | CoreError::ShareLinkNotFound
        | CoreError::WalletNotFound
        | CoreError::PaymentLinkNotFound => StatusCode::NOT_FOUND,

        CoreError::RequestNotEligible
        | CoreError::InvalidStatusUpdate
        | CoreError::WalletExists => StatusCode::CONFLICT,

        CoreError::ShareLinkNotActive | CoreError::ShareLinkExpired => StatusCode::GONE,

        CoreError::AlreadyPrimary
        | CoreError::CannotDeletePrimary
        | CoreError::ChainMismatch
        | CoreError::UnsupportedAsset => StatusCode::BAD_REQUEST,
    }
}

/// Flatten validator errors into one user-facing sentence.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    collect_messages(errors, &mut parts);
    if parts.is_empty() {
        "Invalid request body".to_string()
    } else {
        parts.join("; ")
    }
}

fn collect_messages(errors: &validator::ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    match &err.message {
                        Some(msg) => out.push(msg.to_string()),
                        None => out.push(format!("{field} is invalid")),
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}
