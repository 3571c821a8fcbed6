//! Degraded views for failed fetches
//!
//! The board keeps working when the detail or assignee endpoints fail: the
//! detail modal falls back to the fields already present on the rendered
//! card (with an explanatory note), and the assignee picker is rebuilt from
//! the distinct assignees visible on the current cards.

use crate::board::CardView;
use crate::types::{BugId, UserId};
use std::collections::BTreeMap;

/// Note shown on a detail modal built from card data alone
pub const DETAIL_FALLBACK_NOTE: &str =
    "Could not load full ticket details. Showing information from the board card.";

/// Label of the unassign entry, shared with the server-built picker
const NO_ONE_ASSIGNED: &str = "[No one assigned]";

/// Detail view assembled from a rendered card when the fetch fails or the
/// response is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegradedDetails {
    pub id: BugId,
    pub summary: String,
    pub status_name: String,
    pub priority_name: String,
    /// Empty when unassigned
    pub assignee_name: String,
    pub note: String,
}

impl DegradedDetails {
    pub fn from_card(card: &CardView, status_name: impl Into<String>) -> Self {
        Self {
            id: card.bug_id,
            summary: card.summary.clone(),
            status_name: status_name.into(),
            priority_name: card.priority_name.clone(),
            assignee_name: card.assignee_name.clone(),
            note: DETAIL_FALLBACK_NOTE.to_string(),
        }
    }
}

/// One assignee picker entry derived without the server. Id 0 is the
/// unassign sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackAssignee {
    pub id: i64,
    pub display_name: String,
}

/// The distinct assignees visible on the given cards, sorted by display
/// name, prefixed with the unassign sentinel.
pub fn fallback_assignees<'a>(
    cards: impl IntoIterator<Item = &'a CardView>,
) -> Vec<FallbackAssignee> {
    let mut seen: BTreeMap<UserId, String> = BTreeMap::new();
    for card in cards {
        if let Some(id) = card.assignee {
            let name = if card.assignee_name.is_empty() {
                id.to_string()
            } else {
                card.assignee_name.clone()
            };
            seen.entry(id).or_insert(name);
        }
    }

    let mut entries: Vec<FallbackAssignee> = seen
        .into_iter()
        .map(|(id, display_name)| FallbackAssignee {
            id: i64::from(id.value()),
            display_name,
        })
        .collect();
    entries.sort_by(|a, b| a.display_name.cmp(&b.display_name).then(a.id.cmp(&b.id)));

    let mut options = vec![FallbackAssignee {
        id: 0,
        display_name: NO_ONE_ASSIGNED.to_string(),
    }];
    options.extend(entries);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PriorityCode, StatusCode};

    fn card(id: u32, assignee: Option<u32>, assignee_name: &str) -> CardView {
        CardView {
            bug_id: BugId::new(id),
            summary: format!("bug {id}"),
            status: StatusCode::new(10),
            priority: PriorityCode::new(40),
            priority_name: "high".into(),
            assignee: assignee.map(UserId::new),
            assignee_name: assignee_name.into(),
            parents: Vec::new(),
        }
    }

    #[test]
    fn test_degraded_details_mirror_the_card() {
        let details = DegradedDetails::from_card(&card(5, Some(7), "Dev One"), "new");
        assert_eq!(details.id, BugId::new(5));
        assert_eq!(details.summary, "bug 5");
        assert_eq!(details.status_name, "new");
        assert_eq!(details.priority_name, "high");
        assert_eq!(details.assignee_name, "Dev One");
        assert_eq!(details.note, DETAIL_FALLBACK_NOTE);
    }

    #[test]
    fn test_fallback_assignees_distinct_and_sorted() {
        let cards = [
            card(1, Some(9), "Zara Quill"),
            card(2, Some(7), "Dev One"),
            card(3, Some(9), "Zara Quill"),
            card(4, None, ""),
        ];
        let options = fallback_assignees(cards.iter());

        let names: Vec<&str> = options.iter().map(|o| o.display_name.as_str()).collect();
        assert_eq!(names, vec!["[No one assigned]", "Dev One", "Zara Quill"]);
        assert_eq!(options[0].id, 0);
        assert_eq!(options[2].id, 9);
    }

    #[test]
    fn test_sentinel_alone_when_nothing_assigned() {
        let cards = [card(1, None, "")];
        let options = fallback_assignees(cards.iter());
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].display_name, "[No one assigned]");
    }
}
