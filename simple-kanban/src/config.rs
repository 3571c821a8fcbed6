//! Board configuration
//!
//! Mirrors the host tracker's knobs: the status enumeration, the access
//! thresholds for the three operation classes, the status that triggers
//! auto-assignment, and the set of columns visible on a first visit.

use crate::types::{access, AccessLevel, EnumLabels, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Engine configuration, all fields host-supplied with tracker defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Status enumeration string, `"10:new,20:feedback,..."`
    pub status_enum: String,
    /// Priority enumeration string
    pub priority_enum: String,
    /// Severity enumeration string
    pub severity_enum: String,
    /// Minimum level to view a bug and the board
    pub view_threshold: AccessLevel,
    /// Minimum level to change a bug's status
    pub update_threshold: AccessLevel,
    /// Minimum level to change a bug's handler, and to be a handler
    pub assign_threshold: AccessLevel,
    /// Moving an unassigned bug into this status assigns it to the acting user
    pub assigned_status: StatusCode,
    /// Status columns shown by default before the user has saved preferences
    pub default_visible: BTreeSet<StatusCode>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            status_enum: String::new(),
            priority_enum: String::new(),
            severity_enum: String::new(),
            view_threshold: access::VIEWER,
            update_threshold: access::UPDATER,
            assign_threshold: access::DEVELOPER,
            assigned_status: StatusCode::new(50),
            default_visible: [10, 50, 60, 70, 75, 80, 90]
                .into_iter()
                .map(StatusCode::new)
                .collect(),
        }
    }
}

impl BoardConfig {
    /// The status enumeration, falling back to the standard workflow
    pub fn statuses(&self) -> EnumLabels {
        EnumLabels::parse_or(&self.status_enum, EnumLabels::status_default())
    }

    /// The priority enumeration, falling back to the standard scale
    pub fn priorities(&self) -> EnumLabels {
        EnumLabels::parse_or(&self.priority_enum, EnumLabels::priority_default())
    }

    /// The severity enumeration, falling back to the standard scale
    pub fn severities(&self) -> EnumLabels {
        EnumLabels::parse_or(&self.severity_enum, EnumLabels::severity_default())
    }
}
