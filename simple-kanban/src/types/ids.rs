//! Identifier and code newtypes
//!
//! Identifiers (`BugId`, `UserId`, `ProjectId`) are positive integers owned
//! by the external tracker. Codes (`StatusCode`, `PriorityCode`,
//! `AccessLevel`) are the tracker's stable integer enums; their display
//! labels live in [`super::EnumLabels`].

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! int_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw tracker value
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// The raw tracker value
            pub const fn value(&self) -> u32 {
                self.0
            }

            /// Wrap a wire integer, rejecting zero and negatives
            pub fn from_wire(value: i64) -> Option<Self> {
                u32::try_from(value).ok().filter(|v| *v > 0).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

int_newtype!(
    /// A bug/issue identifier
    BugId
);
int_newtype!(
    /// A user identifier (0 is never a valid user; "unassigned" is modeled as `Option<UserId>`)
    UserId
);
int_newtype!(
    /// A project identifier
    ProjectId
);
int_newtype!(
    /// A workflow status code (e.g. 10 = new, 50 = assigned)
    StatusCode
);
int_newtype!(
    /// A priority code (e.g. 30 = normal, 60 = immediate)
    PriorityCode
);

/// A per-project access level on the tracker's fixed ladder.
///
/// Levels are totally ordered; threshold checks are plain `>=` comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessLevel(u32);

impl AccessLevel {
    /// Wrap a raw level value
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw level value
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// True if this level meets the given threshold
    pub fn meets(&self, threshold: AccessLevel) -> bool {
        *self >= threshold
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
