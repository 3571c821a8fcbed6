//! Whole-board client state
//!
//! Owns the columns and cards delivered by `GetBoard`, the filter set, the
//! visibility map and each card's drag lifecycle. A drop moves the card
//! optimistically and hands back the request to send; the caller feeds the
//! server's answer into `apply_success`/`apply_failure`.

use crate::board::{BoardView, CardView};
use crate::bug::StatusUpdateOutcome;
use crate::client::card::{DragError, DragState, DropAction};
use crate::client::fallback::{fallback_assignees, DegradedDetails, FallbackAssignee};
use crate::client::filter::{AssigneeFilter, FilterSet, FilterTag};
use crate::client::visibility::{
    decode_preferences, encode_preferences, resolve_visibility, PreferenceStore, VisibilityMap,
    PREFERENCE_KEY,
};
use crate::error::Result;
use crate::types::{BugId, PriorityCode, StatusCode, UserId};
use std::collections::BTreeMap;

/// The status update a cross-column drop requires. Field shapes match the
/// `UpdateStatus` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdateRequest {
    pub bug_id: i64,
    pub new_status: i64,
}

#[derive(Debug)]
struct CardSlot {
    view: CardView,
    drag: DragState,
}

#[derive(Debug)]
struct Column {
    status: StatusCode,
    name: String,
    cards: Vec<CardSlot>,
}

/// Client-side board state over a preference store.
#[derive(Debug)]
pub struct BoardState<P: PreferenceStore> {
    columns: Vec<Column>,
    filters: FilterSet,
    visibility: VisibilityMap,
    prefs: P,
    acting_user: Option<UserId>,
    assignee_labels: BTreeMap<UserId, String>,
    parent_labels: BTreeMap<BugId, String>,
    priority_labels: BTreeMap<PriorityCode, String>,
    status_labels: BTreeMap<StatusCode, String>,
}

impl<P: PreferenceStore> BoardState<P> {
    /// Build the state from a board payload. On first visit (nothing
    /// stored, or a corrupt blob) the resolved defaults are persisted
    /// immediately.
    pub fn new(view: BoardView, prefs: P) -> Result<Self> {
        let stored = prefs
            .load(PREFERENCE_KEY)?
            .and_then(|raw| decode_preferences(&raw));
        let visibility = resolve_visibility(stored.as_ref(), &view.toggles);

        let status_labels = view
            .columns
            .iter()
            .map(|c| (c.status, c.name.clone()))
            .collect();
        let priority_labels = view
            .columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .map(|card| (card.priority, card.priority_name.clone()))
            .collect();
        let assignee_labels = view
            .assignee_options
            .iter()
            .map(|a| (a.id, a.display_name.clone()))
            .collect();
        let parent_labels = view
            .parent_options
            .iter()
            .map(|p| (p.id, p.summary.clone()))
            .collect();

        let columns = view
            .columns
            .into_iter()
            .map(|column| Column {
                status: column.status,
                name: column.name,
                cards: column
                    .cards
                    .into_iter()
                    .map(|view| CardSlot {
                        view,
                        drag: DragState::default(),
                    })
                    .collect(),
            })
            .collect();

        let mut state = Self {
            columns,
            filters: FilterSet::new(),
            visibility,
            prefs,
            acting_user: None,
            assignee_labels,
            parent_labels,
            priority_labels,
            status_labels,
        };
        if stored.is_none() {
            state.persist_visibility()?;
        }
        Ok(state)
    }

    /// Record who is using the board, so auto-assignment can be reflected
    /// on the card after a successful move.
    pub fn with_acting_user(mut self, user: UserId) -> Self {
        self.acting_user = Some(user);
        self
    }

    // ----- drag lifecycle ---------------------------------------------

    pub fn begin_drag(&mut self, bug_id: BugId) -> std::result::Result<(), DragError> {
        let slot = self.slot_mut(bug_id)?;
        let origin = slot.view.status;
        slot.drag.begin(origin)
    }

    /// Drop a dragged card onto a column. A cross-column drop moves the
    /// card optimistically and returns the update to send; a same-column
    /// drop resolves to `None` with nothing sent.
    pub fn drop_card(
        &mut self,
        bug_id: BugId,
        dest: StatusCode,
    ) -> std::result::Result<Option<StatusUpdateRequest>, DragError> {
        let slot = self.slot_mut(bug_id)?;
        match slot.drag.drop_on(dest)? {
            DropAction::SameColumn => Ok(None),
            DropAction::Moved { dest, .. } => {
                self.move_card(bug_id, dest);
                Ok(Some(StatusUpdateRequest {
                    bug_id: i64::from(bug_id.value()),
                    new_status: i64::from(dest.value()),
                }))
            }
        }
    }

    pub fn cancel_drag(&mut self, bug_id: BugId) -> std::result::Result<(), DragError> {
        self.slot_mut(bug_id)?.drag.cancel().map(|_| ())
    }

    /// The server accepted the move. The card keeps its optimistic
    /// position; auto-assignment is reflected on the card.
    pub fn apply_success(
        &mut self,
        outcome: &StatusUpdateOutcome,
    ) -> std::result::Result<(), DragError> {
        let acting_user = self.acting_user;
        let slot = self.slot_mut(outcome.bug_id)?;
        slot.drag.settle_success()?;
        if outcome.was_auto_assigned {
            slot.view.assignee = acting_user;
            slot.view.assignee_name = outcome.assigned_to.clone();
        }
        Ok(())
    }

    /// The server rejected the move. The card returns to its origin column.
    pub fn apply_failure(&mut self, bug_id: BugId) -> std::result::Result<(), DragError> {
        let origin = self.slot_mut(bug_id)?.drag.settle_failure()?;
        self.move_card(bug_id, origin);
        Ok(())
    }

    // ----- filters -----------------------------------------------------

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    pub fn clear_all_filters(&mut self) {
        self.filters.clear_all();
    }

    pub fn remove_filter_tag(&mut self, tag: &FilterTag) {
        self.filters.remove_tag(tag);
    }

    /// Active-filter chips with their display labels, rebuilt from scratch.
    pub fn active_filter_tags(&self) -> Vec<(FilterTag, String)> {
        self.filters
            .active_tags()
            .into_iter()
            .map(|tag| {
                let label = match &tag {
                    FilterTag::Search(text) => format!("Search: \"{text}\""),
                    FilterTag::Assignee(AssigneeFilter::Unassigned) => {
                        "Assignee: Unassigned".to_string()
                    }
                    FilterTag::Assignee(AssigneeFilter::User(id)) => {
                        let name = self
                            .assignee_labels
                            .get(id)
                            .cloned()
                            .unwrap_or_else(|| id.to_string());
                        format!("Assignee: {name}")
                    }
                    FilterTag::Priority(priority) => {
                        let name = self
                            .priority_labels
                            .get(priority)
                            .cloned()
                            .unwrap_or_else(|| priority.to_string());
                        format!("Priority: {name}")
                    }
                    FilterTag::Status(status) => {
                        let name = self
                            .status_labels
                            .get(status)
                            .cloned()
                            .unwrap_or_else(|| status.to_string());
                        format!("Status: {name}")
                    }
                    FilterTag::Parent(parent) => {
                        let summary = self
                            .parent_labels
                            .get(parent)
                            .cloned()
                            .unwrap_or_default();
                        format!("Parent: #{parent} {summary}").trim_end().to_string()
                    }
                };
                (tag, label)
            })
            .collect()
    }

    // ----- column visibility -------------------------------------------

    pub fn is_column_visible(&self, status: StatusCode) -> bool {
        self.visibility.get(&status).copied().unwrap_or(false)
    }

    pub fn visible_columns(&self) -> Vec<StatusCode> {
        self.columns
            .iter()
            .filter(|c| self.is_column_visible(c.status))
            .map(|c| c.status)
            .collect()
    }

    pub fn toggle_column(&mut self, status: StatusCode) -> Result<()> {
        let entry = self.visibility.entry(status).or_insert(false);
        *entry = !*entry;
        self.persist_visibility()
    }

    pub fn show_all_columns(&mut self) -> Result<()> {
        for visible in self.visibility.values_mut() {
            *visible = true;
        }
        self.persist_visibility()
    }

    /// Set every column's visibility to whether it currently has cards:
    /// empty columns are hidden, and a hidden column that has cards is
    /// shown again.
    pub fn hide_empty_columns(&mut self) -> Result<()> {
        let occupancy: Vec<(StatusCode, bool)> = self
            .columns
            .iter()
            .map(|c| (c.status, !c.cards.is_empty()))
            .collect();
        for (status, has_cards) in occupancy {
            self.visibility.insert(status, has_cards);
        }
        self.persist_visibility()
    }

    // ----- derived view -------------------------------------------------

    /// Cards in a column, ignoring filters.
    pub fn total_count(&self, status: StatusCode) -> usize {
        self.column(status).map(|c| c.cards.len()).unwrap_or(0)
    }

    /// Cards in a column that pass the active filters.
    pub fn visible_count(&self, status: StatusCode) -> usize {
        self.visible_cards(status).count()
    }

    /// Does this column currently render its empty placeholder?
    pub fn shows_empty_placeholder(&self, status: StatusCode) -> bool {
        self.visible_count(status) == 0
    }

    pub fn visible_cards(&self, status: StatusCode) -> impl Iterator<Item = &CardView> {
        self.column(status)
            .into_iter()
            .flat_map(|c| c.cards.iter())
            .map(|slot| &slot.view)
            .filter(|card| self.filters.matches(card))
    }

    pub fn column_name(&self, status: StatusCode) -> Option<&str> {
        self.column(status).map(|c| c.name.as_str())
    }

    pub fn card(&self, bug_id: BugId) -> Option<&CardView> {
        self.columns
            .iter()
            .flat_map(|c| c.cards.iter())
            .find(|slot| slot.view.bug_id == bug_id)
            .map(|slot| &slot.view)
    }

    // ----- degraded views -----------------------------------------------

    /// Detail view built from the rendered card alone, for when the detail
    /// fetch fails or returns something unusable.
    pub fn degraded_details(&self, bug_id: BugId) -> Option<DegradedDetails> {
        let card = self.card(bug_id)?;
        let status_name = self
            .status_labels
            .get(&card.status)
            .cloned()
            .unwrap_or_else(|| card.status.to_string());
        Some(DegradedDetails::from_card(card, status_name))
    }

    /// Assignee picker entries derived from the assignees visible on the
    /// board, for when the assignee fetch fails.
    pub fn fallback_assignee_options(&self) -> Vec<FallbackAssignee> {
        fallback_assignees(
            self.columns
                .iter()
                .flat_map(|c| c.cards.iter())
                .map(|slot| &slot.view),
        )
    }

    // ----- internals ----------------------------------------------------

    fn column(&self, status: StatusCode) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    fn slot_mut(&mut self, bug_id: BugId) -> std::result::Result<&mut CardSlot, DragError> {
        self.columns
            .iter_mut()
            .flat_map(|c| c.cards.iter_mut())
            .find(|slot| slot.view.bug_id == bug_id)
            .ok_or(DragError::UnknownCard {
                id: bug_id.value(),
            })
    }

    fn move_card(&mut self, bug_id: BugId, dest: StatusCode) {
        let mut slot = None;
        for column in &mut self.columns {
            if let Some(index) = column.cards.iter().position(|s| s.view.bug_id == bug_id) {
                slot = Some(column.cards.remove(index));
                break;
            }
        }
        let Some(mut slot) = slot else { return };
        slot.view.status = dest;
        match self.columns.iter_mut().find(|c| c.status == dest) {
            Some(column) => column.cards.push(slot),
            None => {
                // Dropping onto a column the board has never shown; keep the
                // card rather than lose it
                self.columns.push(Column {
                    status: dest,
                    name: dest.to_string(),
                    cards: vec![slot],
                });
            }
        }
    }

    fn persist_visibility(&mut self) -> Result<()> {
        let blob = encode_preferences(&self.visibility)?;
        self.prefs.save(PREFERENCE_KEY, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{AssigneeFilterOption, ColumnToggle, ColumnView, ParentOption};
    use crate::client::visibility::MemoryPreferenceStore;

    fn card(id: u32, summary: &str, status: u32, assignee: Option<u32>) -> CardView {
        CardView {
            bug_id: BugId::new(id),
            summary: summary.into(),
            status: StatusCode::new(status),
            priority: PriorityCode::new(30),
            priority_name: "normal".into(),
            assignee: assignee.map(UserId::new),
            assignee_name: assignee.map(|_| "Dev One".to_string()).unwrap_or_default(),
            parents: Vec::new(),
        }
    }

    fn board() -> BoardView {
        let columns = vec![
            ("new", 10u32, vec![card(1, "crash on save", 10, None), card(2, "slow load", 10, Some(7))]),
            ("assigned", 50, vec![]),
            ("in progress", 60, vec![card(3, "flaky test", 60, Some(7))]),
        ];
        BoardView {
            columns: columns
                .iter()
                .map(|(name, status, cards)| ColumnView {
                    status: StatusCode::new(*status),
                    name: (*name).into(),
                    count: cards.len(),
                    cards: cards.clone(),
                })
                .collect(),
            toggles: columns
                .iter()
                .map(|(name, status, cards)| ColumnToggle {
                    status: StatusCode::new(*status),
                    name: (*name).into(),
                    count: cards.len(),
                    default_visible: *status != 60,
                })
                .collect(),
            parent_options: vec![ParentOption {
                id: BugId::new(1),
                summary: "crash on save".into(),
                status: StatusCode::new(10),
            }],
            assignee_options: vec![AssigneeFilterOption {
                id: UserId::new(7),
                display_name: "Dev One".into(),
            }],
        }
    }

    fn state() -> BoardState<MemoryPreferenceStore> {
        BoardState::new(board(), MemoryPreferenceStore::new())
            .unwrap()
            .with_acting_user(UserId::new(7))
    }

    fn outcome(id: u32, status: u32, auto: bool) -> StatusUpdateOutcome {
        StatusUpdateOutcome {
            success: true,
            bug_id: BugId::new(id),
            new_status: StatusCode::new(status),
            status_name: String::new(),
            assigned_to: if auto { "Dev One".into() } else { String::new() },
            was_auto_assigned: auto,
            message: String::new(),
        }
    }

    #[test]
    fn test_first_visit_persists_defaults() {
        let mut prefs = MemoryPreferenceStore::new();
        prefs.save("unrelated", "x").unwrap();
        let state = BoardState::new(board(), prefs).unwrap();

        // 60 is not default-visible but has a card
        assert!(state.is_column_visible(StatusCode::new(60)));
        let blob = state.prefs.load(PREFERENCE_KEY).unwrap().unwrap();
        assert_eq!(decode_preferences(&blob).unwrap(), state.visibility);
    }

    #[test]
    fn test_stored_preferences_survive_reload() {
        let mut prefs = MemoryPreferenceStore::new();
        prefs.save(PREFERENCE_KEY, r#"{"10":false,"50":true,"60":true}"#).unwrap();
        let state = BoardState::new(board(), prefs).unwrap();

        assert!(!state.is_column_visible(StatusCode::new(10)));
        assert_eq!(
            state.visible_columns(),
            vec![StatusCode::new(50), StatusCode::new(60)]
        );
    }

    #[test]
    fn test_drop_moves_optimistically_and_requests_update() {
        let mut state = state();
        state.begin_drag(BugId::new(1)).unwrap();
        let request = state
            .drop_card(BugId::new(1), StatusCode::new(50))
            .unwrap()
            .unwrap();
        assert_eq!(
            request,
            StatusUpdateRequest {
                bug_id: 1,
                new_status: 50
            }
        );

        // Card column matches its status already, before the server answers
        assert_eq!(state.card(BugId::new(1)).unwrap().status, StatusCode::new(50));
        assert_eq!(state.total_count(StatusCode::new(10)), 1);
        assert_eq!(state.total_count(StatusCode::new(50)), 1);
    }

    #[test]
    fn test_same_column_drop_sends_nothing() {
        let mut state = state();
        state.begin_drag(BugId::new(1)).unwrap();
        let request = state.drop_card(BugId::new(1), StatusCode::new(10)).unwrap();
        assert_eq!(request, None);
        assert_eq!(state.total_count(StatusCode::new(10)), 2);
    }

    #[test]
    fn test_success_reflects_auto_assignment() {
        let mut state = state();
        state.begin_drag(BugId::new(1)).unwrap();
        state.drop_card(BugId::new(1), StatusCode::new(50)).unwrap();
        state.apply_success(&outcome(1, 50, true)).unwrap();

        let card = state.card(BugId::new(1)).unwrap();
        assert_eq!(card.assignee, Some(UserId::new(7)));
        assert_eq!(card.assignee_name, "Dev One");
        // Card is idle again, a new drag may start
        state.begin_drag(BugId::new(1)).unwrap();
    }

    #[test]
    fn test_failure_rolls_card_back() {
        let mut state = state();
        state.begin_drag(BugId::new(1)).unwrap();
        state.drop_card(BugId::new(1), StatusCode::new(50)).unwrap();
        state.apply_failure(BugId::new(1)).unwrap();

        let card = state.card(BugId::new(1)).unwrap();
        assert_eq!(card.status, StatusCode::new(10));
        assert_eq!(card.assignee, None);
        assert_eq!(state.total_count(StatusCode::new(50)), 0);
        assert!(state.shows_empty_placeholder(StatusCode::new(50)));
    }

    #[test]
    fn test_one_in_flight_per_card() {
        let mut state = state();
        state.begin_drag(BugId::new(1)).unwrap();
        state.drop_card(BugId::new(1), StatusCode::new(50)).unwrap();
        assert_eq!(
            state.begin_drag(BugId::new(1)).unwrap_err(),
            DragError::NotIdle
        );
        // Other cards stay independent
        state.begin_drag(BugId::new(2)).unwrap();
    }

    #[test]
    fn test_unassigned_filter_scenario() {
        let mut state = state();
        state
            .filters_mut()
            .toggle_assignee(AssigneeFilter::Unassigned);

        assert_eq!(state.visible_count(StatusCode::new(10)), 1);
        assert_eq!(state.visible_count(StatusCode::new(60)), 0);
        assert!(state.shows_empty_placeholder(StatusCode::new(60)));

        let tags = state.active_filter_tags();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].1, "Assignee: Unassigned");

        state.remove_filter_tag(&tags[0].0.clone());
        assert_eq!(state.visible_count(StatusCode::new(10)), 2);
        assert!(state.active_filter_tags().is_empty());
    }

    #[test]
    fn test_tag_labels_resolve_names() {
        let mut state = state();
        state.filters_mut().set_search("crash");
        state
            .filters_mut()
            .toggle_assignee(AssigneeFilter::User(UserId::new(7)));
        state.filters_mut().toggle_status(StatusCode::new(60));
        state.filters_mut().select_parent(BugId::new(1));

        let labels: Vec<String> = state
            .active_filter_tags()
            .into_iter()
            .map(|(_, label)| label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Search: \"crash\"",
                "Assignee: Dev One",
                "Status: in progress",
                "Parent: #1 crash on save",
            ]
        );
    }

    #[test]
    fn test_toggle_and_show_all_persist() {
        let mut state = state();
        state.toggle_column(StatusCode::new(10)).unwrap();
        assert!(!state.is_column_visible(StatusCode::new(10)));

        let blob = state.prefs.load(PREFERENCE_KEY).unwrap().unwrap();
        assert!(decode_preferences(&blob).unwrap()[&StatusCode::new(10)] == false);

        state.show_all_columns().unwrap();
        assert!(state.is_column_visible(StatusCode::new(10)));

        state.hide_empty_columns().unwrap();
        assert!(!state.is_column_visible(StatusCode::new(50)));
        assert!(state.is_column_visible(StatusCode::new(60)));
    }

    #[test]
    fn test_hide_empty_shows_hidden_occupied_columns() {
        let mut prefs = MemoryPreferenceStore::new();
        prefs
            .save(PREFERENCE_KEY, r#"{"10":true,"50":true,"60":false}"#)
            .unwrap();
        let mut state = BoardState::new(board(), prefs).unwrap();
        assert!(!state.is_column_visible(StatusCode::new(60)));

        state.hide_empty_columns().unwrap();
        // 60 has a card, so "hide empty" brings it back
        assert!(state.is_column_visible(StatusCode::new(60)));
        assert!(state.is_column_visible(StatusCode::new(10)));
        // 50 is empty and gets hidden
        assert!(!state.is_column_visible(StatusCode::new(50)));

        let blob = state.prefs.load(PREFERENCE_KEY).unwrap().unwrap();
        let stored = decode_preferences(&blob).unwrap();
        assert_eq!(stored[&StatusCode::new(60)], true);
        assert_eq!(stored[&StatusCode::new(50)], false);
    }

    #[test]
    fn test_degraded_views_from_board_data() {
        let state = state();

        let details = state.degraded_details(BugId::new(3)).unwrap();
        assert_eq!(details.summary, "flaky test");
        assert_eq!(details.status_name, "in progress");
        assert_eq!(details.assignee_name, "Dev One");
        assert!(!details.note.is_empty());
        assert_eq!(state.degraded_details(BugId::new(404)), None);

        let options = state.fallback_assignee_options();
        let names: Vec<&str> = options.iter().map(|o| o.display_name.as_str()).collect();
        assert_eq!(names, vec!["[No one assigned]", "Dev One"]);
    }

    #[test]
    fn test_unknown_card() {
        let mut state = state();
        assert_eq!(
            state.begin_drag(BugId::new(404)).unwrap_err(),
            DragError::UnknownCard { id: 404 }
        );
    }
}
