//! Board filters
//!
//! A card is shown when every active filter axis matches (conjunction).
//! An empty axis matches everything. The parent axis has a "show all"
//! sentinel represented as the empty set, so "all parents" and a specific
//! parent selection can never be active at once.

use crate::board::CardView;
use crate::types::{BugId, PriorityCode, StatusCode, UserId};
use std::collections::BTreeSet;

/// One entry in the assignee filter. `Unassigned` matches cards with no
/// handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssigneeFilter {
    Unassigned,
    User(UserId),
}

/// One removable chip in the active-filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterTag {
    Search(String),
    Assignee(AssigneeFilter),
    Priority(PriorityCode),
    Status(StatusCode),
    Parent(BugId),
}

/// The full conjunctive filter state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    search: String,
    assignees: BTreeSet<AssigneeFilter>,
    priorities: BTreeSet<PriorityCode>,
    statuses: BTreeSet<StatusCode>,
    /// Empty = show all parents
    parents: BTreeSet<BugId>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Does this card pass every active axis?
    pub fn matches(&self, card: &CardView) -> bool {
        if !self.search.is_empty() {
            let haystack = card.search_text().to_lowercase();
            if !haystack.contains(&self.search.to_lowercase()) {
                return false;
            }
        }
        if !self.assignees.is_empty() {
            let entry = match card.assignee {
                Some(id) => AssigneeFilter::User(id),
                None => AssigneeFilter::Unassigned,
            };
            if !self.assignees.contains(&entry) {
                return false;
            }
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&card.priority) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&card.status) {
            return false;
        }
        if !self.parents.is_empty() && !card.parents.iter().any(|p| self.parents.contains(p)) {
            return false;
        }
        true
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn toggle_assignee(&mut self, entry: AssigneeFilter) {
        if !self.assignees.remove(&entry) {
            self.assignees.insert(entry);
        }
    }

    pub fn toggle_priority(&mut self, priority: PriorityCode) {
        if !self.priorities.remove(&priority) {
            self.priorities.insert(priority);
        }
    }

    pub fn toggle_status(&mut self, status: StatusCode) {
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
    }

    /// Selecting a specific parent implicitly leaves "show all".
    pub fn select_parent(&mut self, parent: BugId) {
        self.parents.insert(parent);
    }

    /// Deselecting the last parent restores "show all".
    pub fn deselect_parent(&mut self, parent: BugId) {
        self.parents.remove(&parent);
    }

    /// Back to the "show all" sentinel.
    pub fn show_all_parents(&mut self) {
        self.parents.clear();
    }

    pub fn parent_filter_is_all(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.assignees.is_empty()
            && self.priorities.is_empty()
            && self.statuses.is_empty()
            && self.parents.is_empty()
    }

    /// Rebuild the chip list from scratch. Order: search, assignees,
    /// priorities, statuses, parents.
    pub fn active_tags(&self) -> Vec<FilterTag> {
        let mut tags = Vec::new();
        if !self.search.is_empty() {
            tags.push(FilterTag::Search(self.search.clone()));
        }
        tags.extend(self.assignees.iter().copied().map(FilterTag::Assignee));
        tags.extend(self.priorities.iter().copied().map(FilterTag::Priority));
        tags.extend(self.statuses.iter().copied().map(FilterTag::Status));
        tags.extend(self.parents.iter().copied().map(FilterTag::Parent));
        tags
    }

    /// Remove one chip; removing the last parent chip restores "show all".
    pub fn remove_tag(&mut self, tag: &FilterTag) {
        match tag {
            FilterTag::Search(_) => self.search.clear(),
            FilterTag::Assignee(entry) => {
                self.assignees.remove(entry);
            }
            FilterTag::Priority(priority) => {
                self.priorities.remove(priority);
            }
            FilterTag::Status(status) => {
                self.statuses.remove(status);
            }
            FilterTag::Parent(parent) => self.deselect_parent(*parent),
        }
    }

    /// Reset every axis; the parent axis ends at "show all".
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}
