//! HTTP layer for the kanban board engine
//!
//! Wraps the `simple-kanban` operations in an axum router with JSON
//! endpoints, a header-based session, and a uniform error body. The binary
//! in `main.rs` serves this router over an in-memory store seeded from a
//! YAML file, so the whole system runs standalone.

pub mod handlers;
pub mod seed;
pub mod session;

use axum::routing::{get, post};
use axum::Router;
use simple_kanban::{BoardConfig, BoardContext, TicketStore};
use simple_kanban::types::UserId;
use std::sync::Arc;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TicketStore>,
    config: Arc<BoardConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn TicketStore>, config: BoardConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &Arc<dyn TicketStore> {
        &self.store
    }

    /// A per-request execution context for the given session.
    pub fn context(&self, user: UserId) -> BoardContext {
        BoardContext::new(self.store.clone(), (*self.config).clone()).with_user(user)
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/board", get(handlers::board))
        .route("/api/ticket_details", get(handlers::ticket_details))
        .route("/api/ticket_assignees", get(handlers::ticket_assignees))
        .route("/api/update_status", post(handlers::update_status))
        .route("/api/update_assignee", post(handlers::update_assignee))
        .with_state(state)
}
