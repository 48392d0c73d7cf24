//! Strongly typed identifiers.
//!
//! Novels and episodes are owned by an external system; their ids are opaque
//! values here and are never checked against a table.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw integer value.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque identifier of the owning novel.
    NovelId
);
define_id!(
    /// Opaque identifier of an episode within a novel.
    EpisodeId
);
define_id!(
    /// Identifier of a character.
    CharacterId
);
define_id!(
    /// Identifier of a directed character relationship.
    RelationshipId
);
define_id!(
    /// Identifier of a per-episode character state snapshot.
    CharacterStateId
);
define_id!(
    /// Identifier of a foreshadowing entry.
    ForeshadowingId
);
define_id!(
    /// Identifier of a relationship log entry.
    RelationshipLogId
);
define_id!(
    /// Identifier of a world setting.
    WorldSettingId
);
