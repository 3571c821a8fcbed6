//! UpdateAssignee operation

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::ops::Execute;
use crate::types::{BugId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reassign a bug's handler. `assignee_id` 0 means unassign. A missing
/// `bug_id` on the wire defaults to 0 and is rejected as invalid.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAssignee {
    #[serde(default)]
    pub bug_id: i64,
    #[serde(default)]
    pub assignee_id: i64,
}

impl UpdateAssignee {
    pub fn new(bug_id: i64, assignee_id: i64) -> Self {
        Self {
            bug_id,
            assignee_id,
        }
    }
}

/// Response payload for a successful reassignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssigneeUpdateOutcome {
    pub success: bool,
    pub assignee_id: i64,
    /// Display name of the new handler, empty when unassigned
    pub assignee_name: String,
    pub message: String,
}

#[async_trait]
impl Execute for UpdateAssignee {
    type Output = AssigneeUpdateOutcome;

    async fn execute(&self, ctx: &BoardContext) -> Result<AssigneeUpdateOutcome> {
        let bug_id = BugId::from_wire(self.bug_id).ok_or(BoardError::InvalidBugId)?;
        if self.assignee_id < 0 {
            return Err(BoardError::InvalidAssignee);
        }
        let assignee = if self.assignee_id == 0 {
            None
        } else {
            // 0 is the unassign sentinel; anything else must be a real user
            Some(UserId::from_wire(self.assignee_id).ok_or(BoardError::InvalidAssignee)?)
        };

        ctx.require_user()?;
        let bug = ctx.store().bug(bug_id).await?;
        ctx.ensure_bug_level(ctx.config().assign_threshold, &bug)
            .await?;

        let assignee_name = match assignee {
            Some(id) => ctx
                .store()
                .user(id)
                .await?
                .ok_or(BoardError::UserNotFound {
                    id: self.assignee_id,
                })?
                .display_name()
                .to_string(),
            None => String::new(),
        };

        ctx.store().set_handler(bug_id, assignee).await?;
        tracing::info!(
            bug = bug_id.value(),
            assignee = self.assignee_id,
            "bug handler changed"
        );

        Ok(AssigneeUpdateOutcome {
            success: true,
            assignee_id: self.assignee_id,
            assignee_name,
            message: "Assignee updated successfully".into(),
        })
    }
}
