//! UpdateStatus operation
//!
//! The server half of a card drag: persist the new status, and auto-assign
//! the acting user when an unassigned bug lands in the "assigned" column.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::ops::Execute;
use crate::types::{BugId, StatusCode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Change a bug's workflow status.
///
/// Wire fields default to 0 when absent, which the validation below then
/// rejects with the structured error.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatus {
    /// The bug to move
    #[serde(default)]
    pub bug_id: i64,
    /// The destination status code
    #[serde(default)]
    pub new_status: i64,
}

impl UpdateStatus {
    pub fn new(bug_id: i64, new_status: i64) -> Self {
        Self { bug_id, new_status }
    }
}

/// Response payload for a successful status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateOutcome {
    pub success: bool,
    pub bug_id: BugId,
    pub new_status: StatusCode,
    pub status_name: String,
    /// Display name of the resulting handler, empty when unassigned
    pub assigned_to: String,
    pub was_auto_assigned: bool,
    pub message: String,
}

#[async_trait]
impl Execute for UpdateStatus {
    type Output = StatusUpdateOutcome;

    async fn execute(&self, ctx: &BoardContext) -> Result<StatusUpdateOutcome> {
        // Reject bad input before any store access
        let (Some(bug_id), Some(new_status)) = (
            BugId::from_wire(self.bug_id),
            StatusCode::from_wire(self.new_status),
        ) else {
            return Err(BoardError::InvalidStatusUpdate);
        };

        let user = ctx.require_user()?;
        let bug = ctx.store().bug(bug_id).await?;
        ctx.ensure_bug_level(ctx.config().update_threshold, &bug)
            .await?;

        let statuses = ctx.config().statuses();
        if !statuses.contains(new_status.value()) {
            return Err(BoardError::InvalidStatus {
                code: self.new_status,
            });
        }

        ctx.store().set_status(bug_id, new_status).await?;
        tracing::info!(
            bug = bug_id.value(),
            status = new_status.value(),
            "bug status changed via drag and drop"
        );

        // Auto-assign to the acting user when an unassigned bug is dragged
        // into the configured "assigned" status
        let mut was_auto_assigned = false;
        if new_status == ctx.config().assigned_status && bug.handler.is_none() {
            ctx.store().set_handler(bug_id, Some(user)).await?;
            was_auto_assigned = true;
            tracing::info!(
                bug = bug_id.value(),
                user = user.value(),
                "bug auto-assigned on move to assigned status"
            );
        }

        let updated = ctx.store().bug(bug_id).await?;
        let assigned_to = match updated.handler {
            Some(handler) => ctx
                .store()
                .user(handler)
                .await?
                .map(|u| u.display_name().to_string())
                .unwrap_or_default(),
            None => String::new(),
        };

        Ok(StatusUpdateOutcome {
            success: true,
            bug_id,
            new_status,
            status_name: statuses.label_or_placeholder(new_status.value()),
            assigned_to,
            was_auto_assigned,
            message: "Bug status updated successfully".into(),
        })
    }
}
