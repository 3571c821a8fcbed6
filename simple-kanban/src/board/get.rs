//! GetBoard operation
//!
//! Produces everything the initial page render needs: one column per
//! displayable status with its cards and count, the column-toggle metadata,
//! and the option lists the filter panel is built from. Each card carries the
//! data-attribute contract the client-side filter and drag logic reads.

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::ops::Execute;
use crate::types::{Bug, BugId, PriorityCode, ProjectId, StatusCode, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Parent-option summaries longer than this are truncated with an ellipsis
const PARENT_SUMMARY_MAX: usize = 50;

/// Assemble the board view, optionally scoped to one project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetBoard {
    /// `None` = all projects the acting user can view
    pub project_id: Option<i64>,
}

impl GetBoard {
    pub fn all_projects() -> Self {
        Self { project_id: None }
    }

    pub fn for_project(project_id: i64) -> Self {
        Self {
            project_id: Some(project_id),
        }
    }
}

/// One card as rendered into a column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    pub bug_id: BugId,
    pub summary: String,
    pub status: StatusCode,
    pub priority: PriorityCode,
    pub priority_name: String,
    /// `None` = unassigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<UserId>,
    /// Handler display name, empty when unassigned
    pub assignee_name: String,
    /// Parents via the depends-on relationship
    pub parents: Vec<BugId>,
}

impl CardView {
    /// The data attributes the rendering layer must embed on each card.
    /// This is the contract between server-rendered markup and client logic.
    pub fn data_attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            ("data-bug-id", self.bug_id.to_string()),
            ("data-priority", self.priority.to_string()),
            (
                "data-assignee",
                self.assignee.map(|a| a.to_string()).unwrap_or_default(),
            ),
            ("data-status", self.status.to_string()),
            (
                "data-parents",
                self.parents
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        ]
    }

    /// The text a free-text board search matches against: everything visible
    /// on the rendered card.
    pub fn search_text(&self) -> String {
        let assignee = if self.assignee_name.is_empty() {
            "Unassigned"
        } else {
            &self.assignee_name
        };
        format!(
            "#{} {} {} {}",
            self.bug_id, self.summary, self.priority_name, assignee
        )
    }
}

/// One status column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnView {
    pub status: StatusCode,
    pub name: String,
    pub count: usize,
    pub cards: Vec<CardView>,
}

/// Column-toggle metadata for the show/hide controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnToggle {
    pub status: StatusCode,
    pub name: String,
    pub count: usize,
    /// Checked on first visit, before any saved preference exists
    pub default_visible: bool,
}

/// A parent ticket selectable in the parent filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentOption {
    pub id: BugId,
    /// Truncated for display
    pub summary: String,
    pub status: StatusCode,
}

/// An assignee selectable in the assignee filter (distinct current handlers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssigneeFilterOption {
    pub id: UserId,
    pub display_name: String,
}

/// The complete board payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
    pub toggles: Vec<ColumnToggle>,
    pub parent_options: Vec<ParentOption>,
    pub assignee_options: Vec<AssigneeFilterOption>,
}

#[async_trait]
impl Execute for GetBoard {
    type Output = BoardView;

    async fn execute(&self, ctx: &BoardContext) -> Result<BoardView> {
        let user = ctx.require_user()?;

        let scope = match self.project_id {
            Some(raw) => Some(ProjectId::from_wire(raw).ok_or(BoardError::ProjectNotFound {
                id: raw,
            })?),
            None => None,
        };

        // Keep only bugs in projects the acting user can view
        let mut viewable: HashMap<ProjectId, bool> = HashMap::new();
        let mut bugs = Vec::new();
        for bug in ctx.store().bugs(scope).await? {
            let allowed = match viewable.get(&bug.project) {
                Some(allowed) => *allowed,
                None => {
                    let level = ctx.store().access_level(user, bug.project).await?;
                    let allowed =
                        level.map_or(false, |l| l.meets(ctx.config().view_threshold));
                    viewable.insert(bug.project, allowed);
                    allowed
                }
            };
            if allowed {
                bugs.push(bug);
            }
        }
        if let Some(project) = scope {
            let level = ctx.store().access_level(user, project).await?;
            if !level.map_or(false, |l| l.meets(ctx.config().view_threshold)) {
                return Err(BoardError::AccessDenied);
            }
        }

        // Parent edges, restricted to the bugs in scope
        let in_scope: BTreeMap<BugId, &Bug> = bugs.iter().map(|b| (b.id, b)).collect();
        let mut parents_of: BTreeMap<BugId, Vec<BugId>> = BTreeMap::new();
        let mut parent_ids: BTreeSet<BugId> = BTreeSet::new();
        for link in ctx.store().parent_links().await? {
            if in_scope.contains_key(&link.child) {
                parents_of.entry(link.child).or_default().push(link.parent);
            }
            if in_scope.contains_key(&link.parent) {
                parent_ids.insert(link.parent);
            }
        }

        // Resolve display names for every distinct handler once
        let handler_ids: BTreeSet<UserId> = bugs.iter().filter_map(|b| b.handler).collect();
        let mut handler_names: BTreeMap<UserId, String> = BTreeMap::new();
        for id in handler_ids {
            let name = ctx
                .store()
                .user(id)
                .await?
                .map(|u| u.display_name().to_string())
                .unwrap_or_default();
            handler_names.insert(id, name);
        }

        let statuses = ctx.config().statuses();
        let priorities = ctx.config().priorities();

        // Group by status, newest card first within a column
        let mut by_status: BTreeMap<u32, Vec<&Bug>> = BTreeMap::new();
        for bug in &bugs {
            by_status.entry(bug.status.value()).or_default().push(bug);
        }
        for group in by_status.values_mut() {
            group.sort_by(|a, b| b.id.cmp(&a.id));
        }

        // Displayable columns: every configured status in order, then any
        // stray code that currently has bugs
        let mut column_codes: Vec<u32> = statuses.codes().collect();
        for code in by_status.keys() {
            if !statuses.contains(*code) {
                column_codes.push(*code);
            }
        }

        let card_view = |bug: &Bug| CardView {
            bug_id: bug.id,
            summary: bug.summary.clone(),
            status: bug.status,
            priority: bug.priority,
            priority_name: priorities.label_or_placeholder(bug.priority.value()),
            assignee: bug.handler,
            assignee_name: bug
                .handler
                .and_then(|h| handler_names.get(&h).cloned())
                .unwrap_or_default(),
            parents: parents_of.get(&bug.id).cloned().unwrap_or_default(),
        };

        let mut columns = Vec::with_capacity(column_codes.len());
        let mut toggles = Vec::with_capacity(column_codes.len());
        for code in column_codes {
            let cards: Vec<CardView> = by_status
                .get(&code)
                .map(|group| group.iter().map(|b| card_view(b)).collect())
                .unwrap_or_default();
            let name = statuses.label_or_placeholder(code);
            let status = StatusCode::new(code);
            toggles.push(ColumnToggle {
                status,
                name: name.clone(),
                count: cards.len(),
                default_visible: ctx.config().default_visible.contains(&status),
            });
            columns.push(ColumnView {
                status,
                name,
                count: cards.len(),
                cards,
            });
        }

        let parent_options = parent_ids
            .iter()
            .filter_map(|id| in_scope.get(id))
            .map(|bug| ParentOption {
                id: bug.id,
                summary: truncate_summary(&bug.summary),
                status: bug.status,
            })
            .collect();

        let mut assignee_options: Vec<AssigneeFilterOption> = handler_names
            .into_iter()
            .map(|(id, display_name)| AssigneeFilterOption { id, display_name })
            .collect();
        assignee_options.sort_by(|a, b| a.display_name.cmp(&b.display_name));

        tracing::debug!(
            bugs = bugs.len(),
            columns = columns.len(),
            "assembled board view"
        );

        Ok(BoardView {
            columns,
            toggles,
            parent_options,
            assignee_options,
        })
    }
}

fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() > PARENT_SUMMARY_MAX {
        let head: String = summary.chars().take(PARENT_SUMMARY_MAX - 3).collect();
        format!("{head}...")
    } else {
        summary.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::store::MemoryTicketStore;
    use crate::types::{access, User};
    use chrono::Utc;
    use std::sync::Arc;

    fn bug(id: u32, project: u32, status: u32, handler: Option<u32>) -> Bug {
        Bug {
            id: BugId::new(id),
            project: ProjectId::new(project),
            summary: format!("bug {id}"),
            description: String::new(),
            status: StatusCode::new(status),
            priority: PriorityCode::new(30),
            severity: 50,
            reporter: UserId::new(1),
            handler: handler.map(UserId::new),
            date_submitted: Utc::now(),
            last_updated: Utc::now(),
            steps_to_reproduce: String::new(),
            additional_information: String::new(),
        }
    }

    async fn setup() -> (Arc<MemoryTicketStore>, BoardContext) {
        let store = Arc::new(MemoryTicketStore::new());
        store.insert_project(ProjectId::new(1), "Core").await;
        store
            .insert_user(User::new(UserId::new(7), "dev").with_realname("Dev One"))
            .await;
        store
            .grant(ProjectId::new(1), UserId::new(7), access::DEVELOPER)
            .await;

        let ctx = BoardContext::new(store.clone(), BoardConfig::default())
            .with_user(UserId::new(7));
        (store, ctx)
    }

    #[tokio::test]
    async fn test_columns_cover_full_enum() {
        let (store, ctx) = setup().await;
        store.insert_bug(bug(1, 1, 10, None)).await;
        store.insert_bug(bug(2, 1, 10, None)).await;
        store.insert_bug(bug(3, 1, 60, Some(7))).await;

        let view = GetBoard::all_projects().execute(&ctx).await.unwrap();
        assert_eq!(view.columns.len(), 10);

        let new_col = &view.columns[0];
        assert_eq!(new_col.status, StatusCode::new(10));
        assert_eq!(new_col.count, 2);
        // Newest first within a column
        assert_eq!(new_col.cards[0].bug_id, BugId::new(2));

        let in_progress = view
            .columns
            .iter()
            .find(|c| c.status == StatusCode::new(60))
            .unwrap();
        assert_eq!(in_progress.cards[0].assignee_name, "Dev One");
    }

    #[tokio::test]
    async fn test_stray_status_gets_extra_column() {
        let (store, ctx) = setup().await;
        store.insert_bug(bug(1, 1, 85, None)).await;

        let view = GetBoard::all_projects().execute(&ctx).await.unwrap();
        assert_eq!(view.columns.len(), 11);
        let stray = view.columns.last().unwrap();
        assert_eq!(stray.status, StatusCode::new(85));
        assert_eq!(stray.name, "@85@");
        assert_eq!(stray.count, 1);
    }

    #[tokio::test]
    async fn test_card_data_attribute_contract() {
        let (store, ctx) = setup().await;
        store.insert_bug(bug(5, 1, 10, Some(7))).await;
        store.insert_bug(bug(8, 1, 50, None)).await;
        store.insert_bug(bug(9, 1, 50, None)).await;
        store.link_parent(BugId::new(5), BugId::new(8)).await;
        store.link_parent(BugId::new(5), BugId::new(9)).await;

        let view = GetBoard::all_projects().execute(&ctx).await.unwrap();
        let card = &view.columns[0].cards[0];
        let attrs: BTreeMap<_, _> = card.data_attributes().into_iter().collect();
        assert_eq!(attrs["data-bug-id"], "5");
        assert_eq!(attrs["data-priority"], "30");
        assert_eq!(attrs["data-assignee"], "7");
        assert_eq!(attrs["data-status"], "10");
        assert_eq!(attrs["data-parents"], "8,9");

        // Unassigned card renders an empty assignee attribute
        let assigned_col = view
            .columns
            .iter()
            .find(|c| c.status == StatusCode::new(50))
            .unwrap();
        let attrs: BTreeMap<_, _> = assigned_col.cards[0].data_attributes().into_iter().collect();
        assert_eq!(attrs["data-assignee"], "");
    }

    #[tokio::test]
    async fn test_parent_and_assignee_options() {
        let (store, ctx) = setup().await;
        let long_summary = "x".repeat(60);
        store
            .insert_bug(Bug {
                summary: long_summary,
                ..bug(8, 1, 10, None)
            })
            .await;
        store.insert_bug(bug(5, 1, 10, Some(7))).await;
        store.link_parent(BugId::new(5), BugId::new(8)).await;

        let view = GetBoard::all_projects().execute(&ctx).await.unwrap();
        assert_eq!(view.parent_options.len(), 1);
        let option = &view.parent_options[0];
        assert_eq!(option.id, BugId::new(8));
        assert_eq!(option.summary.chars().count(), 50);
        assert!(option.summary.ends_with("..."));

        assert_eq!(view.assignee_options.len(), 1);
        assert_eq!(view.assignee_options[0].display_name, "Dev One");
    }

    #[tokio::test]
    async fn test_toggle_defaults() {
        let (_, ctx) = setup().await;
        let view = GetBoard::all_projects().execute(&ctx).await.unwrap();

        let toggle = |code: u32| {
            view.toggles
                .iter()
                .find(|t| t.status == StatusCode::new(code))
                .unwrap()
        };
        assert!(toggle(10).default_visible);
        assert!(toggle(50).default_visible);
        assert!(!toggle(20).default_visible);
        assert!(!toggle(40).default_visible);
    }

    #[tokio::test]
    async fn test_inaccessible_projects_are_filtered_out() {
        let (store, ctx) = setup().await;
        store.insert_project(ProjectId::new(2), "Secret").await;
        store.insert_bug(bug(1, 1, 10, None)).await;
        store.insert_bug(bug(2, 2, 10, None)).await;

        let view = GetBoard::all_projects().execute(&ctx).await.unwrap();
        assert_eq!(view.columns[0].count, 1);

        let err = GetBoard::for_project(2).execute(&ctx).await.unwrap_err();
        assert!(matches!(err, BoardError::AccessDenied));
    }
}
