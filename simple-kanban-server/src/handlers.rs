//! JSON endpoint handlers
//!
//! Thin glue: extract the session and parameters, execute the matching
//! operation, serialize the outcome. Every failure becomes a well-formed
//! `{"success":false,"error":...}` body with the matching HTTP status.

use crate::session::Session;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use simple_kanban::board::{BoardView, GetBoard};
use simple_kanban::bug::{
    AssigneeUpdateOutcome, GetTicketAssignees, GetTicketDetails, StatusUpdateOutcome,
    UpdateAssignee, UpdateStatus,
};
use simple_kanban::{BoardError, Execute};

/// A `BoardError` with its HTTP rendering.
#[derive(Debug)]
pub struct ApiError(pub BoardError);

impl From<BoardError> for ApiError {
    fn from(error: BoardError) -> Self {
        Self(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            BoardError::Unauthenticated => StatusCode::UNAUTHORIZED,
            BoardError::AccessDenied => StatusCode::FORBIDDEN,
            BoardError::BugNotFound { .. }
            | BoardError::UserNotFound { .. }
            | BoardError::ProjectNotFound { .. } => StatusCode::NOT_FOUND,
            BoardError::InvalidStatusUpdate
            | BoardError::InvalidBugId
            | BoardError::InvalidAssignee
            | BoardError::InvalidStatus { .. } => StatusCode::BAD_REQUEST,
            BoardError::Store { .. } | BoardError::Io(_) | BoardError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, status = %status, "request rejected");
        }
        let body = json!({
            "success": false,
            "error": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    pub project_id: Option<i64>,
}

pub async fn board(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<BoardQuery>,
) -> Result<Json<BoardView>, ApiError> {
    let ctx = state.context(session.0);
    let view = GetBoard {
        project_id: query.project_id,
    }
    .execute(&ctx)
    .await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub bug_id: i64,
}

pub async fn ticket_details(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<Value>, ApiError> {
    let ctx = state.context(session.0);
    let details = GetTicketDetails::new(query.bug_id).execute(&ctx).await?;
    Ok(Json(json!({"success": true, "bug": details})))
}

#[derive(Debug, Deserialize)]
pub struct AssigneesQuery {
    pub ticket_id: i64,
}

pub async fn ticket_assignees(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AssigneesQuery>,
) -> Result<Json<Value>, ApiError> {
    let ctx = state.context(session.0);
    let list = GetTicketAssignees::new(query.ticket_id).execute(&ctx).await?;
    let mut value = serde_json::to_value(list).map_err(BoardError::from)?;
    value["success"] = Value::Bool(true);
    Ok(Json(value))
}

pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<UpdateStatus>, JsonRejection>,
) -> Result<Json<StatusUpdateOutcome>, ApiError> {
    // A body that cannot be read at all gets the same structured error the
    // operation gives unusable ids
    let Json(request) = payload.map_err(|_| BoardError::InvalidStatusUpdate)?;
    let ctx = state.context(session.0);
    Ok(Json(request.execute(&ctx).await?))
}

pub async fn update_assignee(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<UpdateAssignee>, JsonRejection>,
) -> Result<Json<AssigneeUpdateOutcome>, ApiError> {
    let Json(request) = payload.map_err(|_| BoardError::InvalidBugId)?;
    let ctx = state.context(session.0);
    Ok(Json(request.execute(&ctx).await?))
}
