//! # Query Session Handlers
//!
//! A session is opened with the user's SQL.AI key and MySQL credentials,
//! questions are asked against it, and it is closed explicitly. Every
//! session owns one connection; the id returned on open selects it.

use super::{wrap_response, ApiResponse, AppError, AppState, DebugParams};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use geosql::{
    constants::{CSV_FILE_NAME, CSV_MIME},
    export::to_csv,
    DbCredentials, QuerySession, SchemaEntry,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

// --- API Payloads ---

#[derive(Deserialize)]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub api_key: String,
    #[serde(flatten)]
    pub credentials: DbCredentials,
}

#[derive(Serialize, Deserialize)]
pub struct OpenSessionResponse {
    pub session_id: Uuid,
    pub schema: Vec<SchemaEntry>,
    pub warnings: Vec<String>,
}

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Deserialize, Default)]
pub struct FormatParams {
    #[serde(default)]
    pub format: ResultFormat,
}

#[derive(Serialize, Deserialize)]
pub struct AskResponse {
    pub generated_sql: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scalar: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CloseSessionResponse {
    pub session_id: Uuid,
    pub closed: bool,
}

async fn find_session(app_state: &AppState, id: Uuid) -> Result<Arc<QuerySession>, AppError> {
    app_state
        .sessions
        .get(&id)
        .await
        .ok_or(AppError::SessionNotFound(id))
}

// --- Handlers ---

/// Handler for `POST /sessions`: validates the inputs, connects, and
/// captures the schema. A session left unused for `session_idle_secs` is
/// closed by the idle sweeper and its id stops resolving.
pub async fn open_session_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OpenSessionResponse>>), AppError> {
    info!("Opening query session for {:?}", payload.credentials);
    let session = QuerySession::connect(
        app_state.storage_connector.as_ref(),
        &payload.credentials,
        &app_state.config.text_to_sql.api_url,
        &payload.api_key,
    )
    .await?;

    let schema = session.schema().to_vec();
    let warnings = session.warnings().to_vec();
    let session_id = app_state.sessions.insert(session).await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            debug: None,
            result: OpenSessionResponse {
                session_id,
                schema,
                warnings,
            },
        }),
    ))
}

/// Handler for `GET /sessions/{id}/schema`.
pub async fn session_schema_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<SchemaEntry>>>, AppError> {
    let session = find_session(&app_state, id).await?;
    Ok(Json(ApiResponse {
        debug: None,
        result: session.schema().to_vec(),
    }))
}

/// Handler for `POST /sessions/{id}/ask`.
///
/// The question is translated and, only if that succeeded, the generated SQL
/// is executed on the session's connection. With `?format=csv` the result
/// table is returned as a CSV attachment instead of JSON. An empty result is
/// never offered as a download; it gets the JSON notice either way.
pub async fn ask_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    Query(format_params): Query<FormatParams>,
    Json(payload): Json<AskRequest>,
) -> Result<Response, AppError> {
    let session = find_session(&app_state, id).await?;

    let generated_sql = session.translate(&payload.question).await?;
    let result = session
        .execute(&generated_sql)
        .await
        .map_err(|source| AppError::Execution {
            generated_sql: generated_sql.clone(),
            source,
        })?;

    if format_params.format == ResultFormat::Csv && !result.is_empty() {
        let body = to_csv(&result)?;
        let disposition = format!("attachment; filename=\"{CSV_FILE_NAME}\"");
        return Ok((
            [
                (header::CONTENT_TYPE, CSV_MIME.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            body,
        )
            .into_response());
    }

    let notice = result.is_empty().then(|| "No results found".to_string());
    let debug_info = Some(json!({
        "question": payload.question,
        "schema_entries": session.schema().len(),
        "row_count": result.rows.len(),
    }));
    let response = AskResponse {
        scalar: result.scalar().cloned(),
        generated_sql,
        columns: result.columns,
        rows: result.rows,
        notice,
    };
    Ok(wrap_response(response, debug_params, debug_info).into_response())
}

/// Handler for `DELETE /sessions/{id}`: drops the session and closes its connection.
pub async fn close_session_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CloseSessionResponse>>, AppError> {
    let session = app_state
        .sessions
        .remove(&id)
        .await
        .ok_or(AppError::SessionNotFound(id))?;

    if let Err(e) = session.close().await {
        warn!(session_id = %id, "Closing the session connection failed: {e}");
    }
    info!(session_id = %id, "Query session closed");

    Ok(Json(ApiResponse {
        debug: None,
        result: CloseSessionResponse {
            session_id: id,
            closed: true,
        },
    }))
}
