//! Client board engine
//!
//! Pure in-memory state behind the rendered board: column visibility with
//! persisted preferences, the conjunctive filter set, and the per-card drag
//! lifecycle. None of this touches the store; the server operations in
//! [`crate::bug`] and [`crate::board`] are the only mutation path.

mod board_state;
mod card;
mod fallback;
mod filter;
mod visibility;

pub use board_state::{BoardState, StatusUpdateRequest};
pub use card::{DragError, DragState, DropAction};
pub use fallback::{
    fallback_assignees, DegradedDetails, FallbackAssignee, DETAIL_FALLBACK_NOTE,
};
pub use filter::{AssigneeFilter, FilterSet, FilterTag};
pub use visibility::{
    decode_preferences, encode_preferences, resolve_visibility, FilePreferenceStore,
    MemoryPreferenceStore, PreferenceStore, VisibilityMap, PREFERENCE_KEY,
};
