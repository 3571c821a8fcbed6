//! Session extraction
//!
//! The host tracker owns authentication; it forwards the authenticated
//! user's id in a request header. The extractor validates the id against
//! the store (the account must exist and be enabled) before any handler
//! runs, so handlers only ever see a live session.

use crate::handlers::ApiError;
use crate::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;
use simple_kanban::types::UserId;
use simple_kanban::BoardError;

/// Header carrying the authenticated user id
pub const SESSION_HEADER: &str = "x-kanban-user";

/// A validated session.
#[derive(Debug, Clone, Copy)]
pub struct Session(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(UserId::from_wire)
            .ok_or(BoardError::Unauthenticated)?;

        match state.store().user(user_id).await? {
            Some(user) if user.enabled => Ok(Session(user_id)),
            _ => {
                tracing::debug!(user = user_id.value(), "rejected unknown or disabled session");
                Err(BoardError::Unauthenticated.into())
            }
        }
    }
}
