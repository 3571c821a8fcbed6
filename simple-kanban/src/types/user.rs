//! User type and the tracker's access-level ladder

use super::ids::{AccessLevel, UserId};
use serde::{Deserialize, Serialize};

/// The tracker's fixed access-level ladder.
pub mod access {
    use super::AccessLevel;

    pub const VIEWER: AccessLevel = AccessLevel::new(10);
    pub const REPORTER: AccessLevel = AccessLevel::new(25);
    pub const UPDATER: AccessLevel = AccessLevel::new(40);
    pub const DEVELOPER: AccessLevel = AccessLevel::new(55);
    pub const MANAGER: AccessLevel = AccessLevel::new(70);
    pub const ADMINISTRATOR: AccessLevel = AccessLevel::new(90);
}

/// A tracker account. Read-only to this engine; used for display, filtering
/// and assignment targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub realname: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl User {
    /// Create an enabled user
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            realname: String::new(),
            enabled: true,
        }
    }

    /// Set the real name
    pub fn with_realname(mut self, realname: impl Into<String>) -> Self {
        self.realname = realname.into();
        self
    }

    /// Mark the account disabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Display name: real name when present, username otherwise
    pub fn display_name(&self) -> &str {
        if self.realname.is_empty() {
            &self.username
        } else {
            &self.realname
        }
    }
}
