//! Kanban board engine layered over an external issue tracker
//!
//! This crate turns a bug tracker's flat issue table into a drag-and-drop
//! kanban board. The tracker itself stays external: it is reached through the
//! [`TicketStore`] trait, and the only fields this crate ever writes back are
//! an issue's `status` and `handler`.
//!
//! ## Overview
//!
//! - **Operations** - Each remote operation is a command struct executed
//!   against a [`BoardContext`] via the [`Execute`] trait: move a card
//!   ([`bug::UpdateStatus`]), reassign it ([`bug::UpdateAssignee`]), fetch the
//!   detail popup ([`bug::GetTicketDetails`]), list assignment candidates
//!   ([`bug::GetTicketAssignees`]), or render the whole board
//!   ([`board::GetBoard`]).
//! - **Client state** - The [`client`] module is the browser side of the
//!   board expressed as plain state: a filter set, a column-visibility map
//!   with persisted preferences, and a per-card drag lifecycle that makes
//!   "one in-flight mutation per card" a type-level invariant.
//! - **Access control** - Every mutation checks the acting user's per-project
//!   access level against the thresholds in [`BoardConfig`] before touching
//!   the store.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use simple_kanban::{BoardConfig, BoardContext, Execute, MemoryTicketStore};
//! use simple_kanban::bug::UpdateStatus;
//! use simple_kanban::types::UserId;
//! use std::sync::Arc;
//!
//! # async fn example() -> simple_kanban::Result<()> {
//! let store = Arc::new(MemoryTicketStore::new());
//! let ctx = BoardContext::new(store, BoardConfig::default())
//!     .with_user(UserId::new(7));
//!
//! // Drag bug #42 into the "assigned" column
//! let outcome = UpdateStatus::new(42, 50).execute(&ctx).await?;
//! println!("{} -> {}", outcome.bug_id, outcome.status_name);
//! # Ok(())
//! # }
//! ```

mod config;
mod context;
mod error;
mod ops;
mod store;
pub mod types;

// Command modules
pub mod board;
pub mod bug;

// Client-side board state
pub mod client;

pub use config::BoardConfig;
pub use context::BoardContext;
pub use error::{BoardError, Result};
pub use ops::Execute;
pub use store::{MemoryTicketStore, ParentLink, TicketStore};

// Re-export commonly used types
pub use types::{
    AccessLevel, Bug, BugId, EnumLabels, PriorityCode, ProjectId, StatusCode, User, UserId,
};
