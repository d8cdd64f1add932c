use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geosql::PromptError;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

/// A custom error type for the server application.
///
/// This enum encapsulates the errors a handler can end with, so each can be
/// turned into an HTTP response with a JSON `{"error": ...}` body.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from `geosql`.
    Prompt(PromptError),
    /// The generated SQL was produced but failed to run.
    Execution {
        generated_sql: String,
        source: PromptError,
    },
    /// No open session has this id.
    SessionNotFound(Uuid),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `PromptError` to `AppError`.
impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Prompt(err)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

fn prompt_status(err: &PromptError) -> StatusCode {
    match err {
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        e if e.is_translator() => StatusCode::BAD_GATEWAY,
        PromptError::StorageConnection(_) | PromptError::SchemaIntrospection(_) => {
            StatusCode::BAD_GATEWAY
        }
        PromptError::StorageQueryFailed(_) => StatusCode::BAD_REQUEST,
        PromptError::SessionClosed => StatusCode::GONE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            AppError::Prompt(err) => {
                // Log the original error for debugging purposes
                error!("PromptError: {:?}", err);
                (prompt_status(&err), json!({ "error": err.to_string() }))
            }
            AppError::Execution {
                generated_sql,
                source,
            } => {
                error!("Execution of generated SQL failed: {:?}", source);
                (
                    prompt_status(&source),
                    json!({ "error": source.to_string(), "generated_sql": generated_sql }),
                )
            }
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("No open session with id {id}") }),
            ),
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal server error occurred." }),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}
