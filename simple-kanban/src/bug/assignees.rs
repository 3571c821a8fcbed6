//! GetTicketAssignees operation: candidates for the assignee picker modal

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::ops::Execute;
use crate::types::{BugId, ProjectId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// List the users a bug can be assigned to.
#[derive(Debug, Clone, Deserialize)]
pub struct GetTicketAssignees {
    pub ticket_id: i64,
}

impl GetTicketAssignees {
    pub fn new(ticket_id: i64) -> Self {
        Self { ticket_id }
    }
}

/// One entry in the assignee picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssigneeOption {
    pub id: i64,
    pub username: String,
    pub realname: String,
    pub display_name: String,
    pub is_current_assignee: bool,
}

/// The assignee picker payload. `users` always starts with the explicit
/// "no one assigned" sentinel entry (id 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssigneeList {
    pub ticket_id: BugId,
    pub project_id: ProjectId,
    pub project_name: String,
    /// Current handler id, 0 when unassigned
    pub current_assignee: i64,
    pub users: Vec<AssigneeOption>,
}

#[async_trait]
impl Execute for GetTicketAssignees {
    type Output = AssigneeList;

    async fn execute(&self, ctx: &BoardContext) -> Result<AssigneeList> {
        let ticket_id = BugId::from_wire(self.ticket_id).ok_or(BoardError::InvalidBugId)?;

        ctx.require_user()?;
        let bug = ctx.store().bug(ticket_id).await?;
        ctx.ensure_bug_level(ctx.config().view_threshold, &bug)
            .await?;

        let threshold = ctx.config().assign_threshold;
        let mut candidates: Vec<AssigneeOption> = ctx
            .store()
            .project_members(bug.project)
            .await?
            .into_iter()
            .filter(|(user, level)| user.enabled && level.meets(threshold))
            .map(|(user, _)| AssigneeOption {
                id: user.id.value() as i64,
                display_name: user.display_name().to_string(),
                is_current_assignee: bug.handler == Some(user.id),
                username: user.username,
                realname: user.realname,
            })
            .collect();
        candidates.sort_by(|a, b| {
            (a.realname.as_str(), a.username.as_str())
                .cmp(&(b.realname.as_str(), b.username.as_str()))
        });

        // Sentinel entry first, always
        let mut users = vec![AssigneeOption {
            id: 0,
            username: String::new(),
            realname: String::new(),
            display_name: "[No one assigned]".into(),
            is_current_assignee: bug.handler.is_none(),
        }];
        users.extend(candidates);

        Ok(AssigneeList {
            ticket_id,
            project_id: bug.project,
            project_name: ctx.store().project_name(bug.project).await?,
            current_assignee: bug.handler.map(|h| h.value() as i64).unwrap_or(0),
            users,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::store::{MemoryTicketStore, TicketStore};
    use crate::types::{access, Bug, PriorityCode, StatusCode, User, UserId};
    use chrono::Utc;
    use std::sync::Arc;

    async fn setup() -> (Arc<MemoryTicketStore>, BoardContext) {
        let store = Arc::new(MemoryTicketStore::new());
        store.insert_project(ProjectId::new(1), "Core").await;

        // Eligible developers, an updater below the threshold, a disabled dev
        for (id, username, realname, level) in [
            (3u32, "zara", "Zara Quill", access::DEVELOPER),
            (4, "adam", "", access::DEVELOPER),
            (5, "upd", "Just Updater", access::UPDATER),
        ] {
            store
                .insert_user(User::new(UserId::new(id), username).with_realname(realname))
                .await;
            store.grant(ProjectId::new(1), UserId::new(id), level).await;
        }
        store
            .insert_user(User::new(UserId::new(6), "gone").disabled())
            .await;
        store
            .grant(ProjectId::new(1), UserId::new(6), access::DEVELOPER)
            .await;

        store
            .insert_bug(Bug {
                id: BugId::new(1),
                project: ProjectId::new(1),
                summary: "s".into(),
                description: String::new(),
                status: StatusCode::new(10),
                priority: PriorityCode::new(30),
                severity: 50,
                reporter: UserId::new(3),
                handler: Some(UserId::new(3)),
                date_submitted: Utc::now(),
                last_updated: Utc::now(),
                steps_to_reproduce: String::new(),
                additional_information: String::new(),
            })
            .await;

        let ctx = BoardContext::new(store.clone(), BoardConfig::default())
            .with_user(UserId::new(3));
        (store, ctx)
    }

    #[tokio::test]
    async fn test_sentinel_first_then_eligible_sorted() {
        let (_, ctx) = setup().await;

        let list = GetTicketAssignees::new(1).execute(&ctx).await.unwrap();
        assert_eq!(list.current_assignee, 3);

        // Sentinel, then adam (empty realname sorts first), then Zara.
        // The updater and the disabled account are excluded.
        let names: Vec<&str> = list.users.iter().map(|u| u.display_name.as_str()).collect();
        assert_eq!(names, vec!["[No one assigned]", "adam", "Zara Quill"]);

        assert!(!list.users[0].is_current_assignee);
        assert!(list.users[2].is_current_assignee);
    }

    #[tokio::test]
    async fn test_sentinel_current_when_unassigned() {
        let (store, ctx) = setup().await;
        store.set_handler(BugId::new(1), None).await.unwrap();

        let list = GetTicketAssignees::new(1).execute(&ctx).await.unwrap();
        assert_eq!(list.current_assignee, 0);
        assert!(list.users[0].is_current_assignee);
    }

    #[tokio::test]
    async fn test_invalid_ticket_id() {
        let (_, ctx) = setup().await;
        let err = GetTicketAssignees::new(-2).execute(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid bug ID");
    }
}
