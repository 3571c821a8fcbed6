//! Per-card drag lifecycle
//!
//! Each card carries its own little state machine so that "at most one
//! in-flight status update per card" holds by construction. A drop either
//! resolves immediately (same column) or parks the card in `PendingUpdate`
//! until the server answers; only `settle_success`/`settle_failure` return
//! it to `Idle`.

use crate::types::StatusCode;
use thiserror::Error;

/// Misuse of the drag lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DragError {
    #[error("no card with bug id {id} on the board")]
    UnknownCard { id: u32 },
    #[error("card already has a drag or update in flight")]
    NotIdle,
    #[error("card is not being dragged")]
    NotDragging,
    #[error("card has no update in flight")]
    NotPending,
}

/// What a drop resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Dropped back into its own column, nothing to send
    SameColumn,
    /// Moved, a status update must be sent
    Moved { origin: StatusCode, dest: StatusCode },
}

/// Drag lifecycle of a single card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        origin: StatusCode,
    },
    PendingUpdate {
        origin: StatusCode,
        dest: StatusCode,
    },
}

impl DragState {
    /// Pick the card up from its current column.
    pub fn begin(&mut self, origin: StatusCode) -> Result<(), DragError> {
        match self {
            Self::Idle => {
                *self = Self::Dragging { origin };
                Ok(())
            }
            _ => Err(DragError::NotIdle),
        }
    }

    /// Drop the card onto a column. Same-column drops end the drag with no
    /// update; cross-column drops enter `PendingUpdate`.
    pub fn drop_on(&mut self, dest: StatusCode) -> Result<DropAction, DragError> {
        match *self {
            Self::Dragging { origin } if origin == dest => {
                *self = Self::Idle;
                Ok(DropAction::SameColumn)
            }
            Self::Dragging { origin } => {
                *self = Self::PendingUpdate { origin, dest };
                Ok(DropAction::Moved { origin, dest })
            }
            _ => Err(DragError::NotDragging),
        }
    }

    /// Release without dropping anywhere valid.
    pub fn cancel(&mut self) -> Result<StatusCode, DragError> {
        match *self {
            Self::Dragging { origin } => {
                *self = Self::Idle;
                Ok(origin)
            }
            _ => Err(DragError::NotDragging),
        }
    }

    /// The server accepted the update; returns the destination.
    pub fn settle_success(&mut self) -> Result<StatusCode, DragError> {
        match *self {
            Self::PendingUpdate { dest, .. } => {
                *self = Self::Idle;
                Ok(dest)
            }
            _ => Err(DragError::NotPending),
        }
    }

    /// The server rejected the update; returns the origin to roll back to.
    pub fn settle_failure(&mut self) -> Result<StatusCode, DragError> {
        match *self {
            Self::PendingUpdate { origin, .. } => {
                *self = Self::Idle;
                Ok(origin)
            }
            _ => Err(DragError::NotPending),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn in_flight(&self) -> bool {
        matches!(self, Self::PendingUpdate { .. })
    }
}
