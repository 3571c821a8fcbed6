//! Core types for the board engine

mod bug;
mod enums;
mod ids;
mod user;

// Re-export all types
pub use bug::Bug;
pub use enums::EnumLabels;
pub use ids::{AccessLevel, BugId, PriorityCode, ProjectId, StatusCode, UserId};
pub use user::{access, User};
