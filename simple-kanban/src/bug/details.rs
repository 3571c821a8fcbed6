//! GetTicketDetails operation: the read-only detail popup fetch

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::ops::Execute;
use crate::types::BugId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Timestamp format used by the detail popup
const DETAIL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Fetch the full detail view of one bug.
#[derive(Debug, Clone, Deserialize)]
pub struct GetTicketDetails {
    pub bug_id: i64,
}

impl GetTicketDetails {
    pub fn new(bug_id: i64) -> Self {
        Self { bug_id }
    }
}

/// Everything the detail modal renders. All enum codes are resolved to their
/// display labels server-side; the client never sees raw codes here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDetails {
    pub id: BugId,
    pub summary: String,
    pub description: String,
    pub status_name: String,
    pub priority_name: String,
    pub severity_name: String,
    pub project_name: String,
    pub reporter_name: String,
    /// Empty when unassigned
    pub handler_name: String,
    pub date_submitted: String,
    pub last_updated: String,
    pub steps_to_reproduce: String,
    pub additional_information: String,
}

#[async_trait]
impl Execute for GetTicketDetails {
    type Output = TicketDetails;

    async fn execute(&self, ctx: &BoardContext) -> Result<TicketDetails> {
        let bug_id = BugId::from_wire(self.bug_id).ok_or(BoardError::InvalidBugId)?;

        ctx.require_user()?;
        let bug = ctx.store().bug(bug_id).await?;
        ctx.ensure_bug_level(ctx.config().view_threshold, &bug)
            .await?;

        let display_name = |user| async move {
            Ok::<_, BoardError>(
                ctx.store()
                    .user(user)
                    .await?
                    .map(|u| u.display_name().to_string())
                    .unwrap_or_default(),
            )
        };

        let reporter_name = display_name(bug.reporter).await?;
        let handler_name = match bug.handler {
            Some(handler) => display_name(handler).await?,
            None => String::new(),
        };

        Ok(TicketDetails {
            id: bug.id,
            summary: bug.summary,
            description: bug.description,
            status_name: ctx
                .config()
                .statuses()
                .label_or_placeholder(bug.status.value()),
            priority_name: ctx
                .config()
                .priorities()
                .label_or_placeholder(bug.priority.value()),
            severity_name: ctx
                .config()
                .severities()
                .label_or_placeholder(bug.severity),
            project_name: ctx.store().project_name(bug.project).await?,
            reporter_name,
            handler_name,
            date_submitted: bug.date_submitted.format(DETAIL_TIME_FORMAT).to_string(),
            last_updated: bug.last_updated.format(DETAIL_TIME_FORMAT).to_string(),
            steps_to_reproduce: bug.steps_to_reproduce,
            additional_information: bug.additional_information,
        })
    }
}
