//! Tracker store abstraction
//!
//! [`TicketStore`] is the seam between this engine and the host tracker: the
//! host adapts its ORM behind this trait. [`MemoryTicketStore`] is a complete
//! in-process implementation used by the standalone server and by tests.

use crate::error::{BoardError, Result};
use crate::types::{AccessLevel, Bug, BugId, ProjectId, StatusCode, User, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// A directed "depends-on" relationship edge: `child` depends on `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLink {
    pub child: BugId,
    pub parent: BugId,
}

/// Read access to the tracker's data, plus the two field patches this engine
/// is allowed to make.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Fetch a bug, erroring if it does not exist
    async fn bug(&self, id: BugId) -> Result<Bug>;

    /// All bugs, optionally scoped to one project
    async fn bugs(&self, project: Option<ProjectId>) -> Result<Vec<Bug>>;

    /// Persist a new status for a bug
    async fn set_status(&self, id: BugId, status: StatusCode) -> Result<()>;

    /// Persist a new handler for a bug (`None` = unassign)
    async fn set_handler(&self, id: BugId, handler: Option<UserId>) -> Result<()>;

    /// Look up a user account
    async fn user(&self, id: UserId) -> Result<Option<User>>;

    /// A project's display name
    async fn project_name(&self, id: ProjectId) -> Result<String>;

    /// Users with access to a project, with their per-project level
    async fn project_members(&self, id: ProjectId) -> Result<Vec<(User, AccessLevel)>>;

    /// A user's access level on a project (`None` when not a member)
    async fn access_level(&self, user: UserId, project: ProjectId) -> Result<Option<AccessLevel>>;

    /// All parent/child relationship edges
    async fn parent_links(&self) -> Result<Vec<ParentLink>>;
}

#[derive(Debug, Default)]
struct StoreInner {
    bugs: BTreeMap<BugId, Bug>,
    users: BTreeMap<UserId, User>,
    projects: BTreeMap<ProjectId, ProjectRecord>,
    links: Vec<ParentLink>,
}

#[derive(Debug, Default)]
struct ProjectRecord {
    name: String,
    members: BTreeMap<UserId, AccessLevel>,
}

/// In-memory [`TicketStore`] used by tests and the standalone server.
#[derive(Debug, Default)]
pub struct MemoryTicketStore {
    inner: RwLock<StoreInner>,
}

impl MemoryTicketStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a project
    pub async fn insert_project(&self, id: ProjectId, name: impl Into<String>) {
        let mut inner = self.inner.write().await;
        inner.projects.entry(id).or_default().name = name.into();
    }

    /// Grant a user an access level on a project
    pub async fn grant(&self, project: ProjectId, user: UserId, level: AccessLevel) {
        let mut inner = self.inner.write().await;
        inner
            .projects
            .entry(project)
            .or_default()
            .members
            .insert(user, level);
    }

    /// Insert or replace a user
    pub async fn insert_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user);
    }

    /// Insert or replace a bug
    pub async fn insert_bug(&self, bug: Bug) {
        let mut inner = self.inner.write().await;
        inner.bugs.insert(bug.id, bug);
    }

    /// Record a parent/child edge
    pub async fn link_parent(&self, child: BugId, parent: BugId) {
        let mut inner = self.inner.write().await;
        let link = ParentLink { child, parent };
        if !inner.links.contains(&link) {
            inner.links.push(link);
        }
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn bug(&self, id: BugId) -> Result<Bug> {
        let inner = self.inner.read().await;
        inner
            .bugs
            .get(&id)
            .cloned()
            .ok_or(BoardError::BugNotFound {
                id: id.value() as i64,
            })
    }

    async fn bugs(&self, project: Option<ProjectId>) -> Result<Vec<Bug>> {
        let inner = self.inner.read().await;
        Ok(inner
            .bugs
            .values()
            .filter(|b| project.map_or(true, |p| b.project == p))
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: BugId, status: StatusCode) -> Result<()> {
        let mut inner = self.inner.write().await;
        let bug = inner.bugs.get_mut(&id).ok_or(BoardError::BugNotFound {
            id: id.value() as i64,
        })?;
        bug.status = status;
        bug.last_updated = chrono::Utc::now();
        Ok(())
    }

    async fn set_handler(&self, id: BugId, handler: Option<UserId>) -> Result<()> {
        let mut inner = self.inner.write().await;
        let bug = inner.bugs.get_mut(&id).ok_or(BoardError::BugNotFound {
            id: id.value() as i64,
        })?;
        bug.handler = handler;
        bug.last_updated = chrono::Utc::now();
        Ok(())
    }

    async fn user(&self, id: UserId) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn project_name(&self, id: ProjectId) -> Result<String> {
        let inner = self.inner.read().await;
        inner
            .projects
            .get(&id)
            .map(|p| p.name.clone())
            .ok_or(BoardError::ProjectNotFound {
                id: id.value() as i64,
            })
    }

    async fn project_members(&self, id: ProjectId) -> Result<Vec<(User, AccessLevel)>> {
        let inner = self.inner.read().await;
        let project = inner
            .projects
            .get(&id)
            .ok_or(BoardError::ProjectNotFound {
                id: id.value() as i64,
            })?;
        Ok(project
            .members
            .iter()
            .filter_map(|(user_id, level)| {
                inner.users.get(user_id).map(|u| (u.clone(), *level))
            })
            .collect())
    }

    async fn access_level(&self, user: UserId, project: ProjectId) -> Result<Option<AccessLevel>> {
        let inner = self.inner.read().await;
        Ok(inner
            .projects
            .get(&project)
            .and_then(|p| p.members.get(&user))
            .copied())
    }

    async fn parent_links(&self) -> Result<Vec<ParentLink>> {
        let inner = self.inner.read().await;
        Ok(inner.links.clone())
    }
}
