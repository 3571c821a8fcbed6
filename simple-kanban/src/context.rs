//! Execution context shared by all operations

use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::store::TicketStore;
use crate::types::{AccessLevel, Bug, UserId};
use std::sync::Arc;

/// Everything an operation needs: the tracker store, the configuration, and
/// the acting user's session (if any).
///
/// A context is cheap to clone and is constructed per request; the session is
/// part of the context rather than ambient state so that access checks are
/// explicit and testable.
#[derive(Clone)]
pub struct BoardContext {
    store: Arc<dyn TicketStore>,
    config: Arc<BoardConfig>,
    acting_user: Option<UserId>,
}

impl BoardContext {
    /// Create an unauthenticated context
    pub fn new(store: Arc<dyn TicketStore>, config: BoardConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            acting_user: None,
        }
    }

    /// Attach the acting user's session
    pub fn with_user(mut self, user: UserId) -> Self {
        self.acting_user = Some(user);
        self
    }

    /// The tracker store
    pub fn store(&self) -> &dyn TicketStore {
        self.store.as_ref()
    }

    /// The board configuration
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The acting user, or `Unauthenticated` when there is no session.
    /// Every operation calls this before doing anything else.
    pub fn require_user(&self) -> Result<UserId> {
        self.acting_user.ok_or(BoardError::Unauthenticated)
    }

    /// Check that the acting user holds `threshold` on the bug's project.
    pub async fn ensure_bug_level(&self, threshold: AccessLevel, bug: &Bug) -> Result<()> {
        let user = self.require_user()?;
        let level = self.store.access_level(user, bug.project).await?;
        match level {
            Some(level) if level.meets(threshold) => Ok(()),
            _ => {
                tracing::debug!(
                    user = user.value(),
                    bug = bug.id.value(),
                    required = threshold.value(),
                    held = level.map(|l| l.value()),
                    "access check failed"
                );
                Err(BoardError::AccessDenied)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTicketStore;
    use crate::types::{access, BugId, PriorityCode, ProjectId, StatusCode, User};
    use chrono::Utc;

    fn sample_bug() -> Bug {
        Bug {
            id: BugId::new(1),
            project: ProjectId::new(1),
            summary: "s".into(),
            description: String::new(),
            status: StatusCode::new(10),
            priority: PriorityCode::new(30),
            severity: 50,
            reporter: UserId::new(1),
            handler: None,
            date_submitted: Utc::now(),
            last_updated: Utc::now(),
            steps_to_reproduce: String::new(),
            additional_information: String::new(),
        }
    }

    #[tokio::test]
    async fn test_require_user() {
        let store = Arc::new(MemoryTicketStore::new());
        let ctx = BoardContext::new(store.clone(), BoardConfig::default());
        assert!(matches!(
            ctx.require_user(),
            Err(BoardError::Unauthenticated)
        ));

        let ctx = ctx.with_user(UserId::new(3));
        assert_eq!(ctx.require_user().unwrap(), UserId::new(3));
    }

    #[tokio::test]
    async fn test_ensure_bug_level() {
        let store = Arc::new(MemoryTicketStore::new());
        store.insert_project(ProjectId::new(1), "Core").await;
        store.insert_user(User::new(UserId::new(3), "dev")).await;
        store
            .grant(ProjectId::new(1), UserId::new(3), access::UPDATER)
            .await;

        let ctx =
            BoardContext::new(store, BoardConfig::default()).with_user(UserId::new(3));
        let bug = sample_bug();

        ctx.ensure_bug_level(access::UPDATER, &bug).await.unwrap();
        let err = ctx
            .ensure_bug_level(access::DEVELOPER, &bug)
            .await
            .unwrap_err();
        assert!(matches!(err, BoardError::AccessDenied));
    }
}
