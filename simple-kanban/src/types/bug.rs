//! Bug type: the issue/card record read from the tracker

use super::ids::{BugId, PriorityCode, ProjectId, StatusCode, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An issue as this engine sees it.
///
/// Created and destroyed entirely by the external tracker; the engine only
/// ever writes back `status` and `handler`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: BugId,
    pub project: ProjectId,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    pub status: StatusCode,
    pub priority: PriorityCode,
    /// Severity code; display-only, never written
    pub severity: u32,
    pub reporter: UserId,
    /// `None` = unassigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<UserId>,
    pub date_submitted: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub steps_to_reproduce: String,
    #[serde(default)]
    pub additional_information: String,
}

impl Bug {
    /// True if a handler is set
    pub fn is_assigned(&self) -> bool {
        self.handler.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Bug {
        Bug {
            id: BugId::new(42),
            project: ProjectId::new(1),
            summary: "Crash on save".into(),
            description: "It crashes".into(),
            status: StatusCode::new(10),
            priority: PriorityCode::new(30),
            severity: 70,
            reporter: UserId::new(2),
            handler: None,
            date_submitted: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            last_updated: Utc.with_ymd_and_hms(2024, 3, 2, 14, 0, 0).unwrap(),
            steps_to_reproduce: String::new(),
            additional_information: String::new(),
        }
    }

    #[test]
    fn test_assignment_flag() {
        let mut bug = sample();
        assert!(!bug.is_assigned());
        bug.handler = Some(UserId::new(7));
        assert!(bug.is_assigned());
    }

    #[test]
    fn test_unassigned_serializes_without_handler() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("\"handler\""));
    }
}
