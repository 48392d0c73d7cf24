use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{EpisodeId, ForeshadowingId, NovelId};

/// Lifecycle status of a foreshadowing entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForeshadowingStatus {
    /// Introduced in the text, not yet followed up.
    #[default]
    Planted,
    /// Referenced again without being paid off.
    Hinted,
    /// Paid off.
    Resolved,
    /// Dropped by the author.
    Abandoned,
}

impl ForeshadowingStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 4] = [Self::Planted, Self::Hinted, Self::Resolved, Self::Abandoned];

    /// Returns the wire token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planted => "planted",
            Self::Hinted => "hinted",
            Self::Resolved => "resolved",
            Self::Abandoned => "abandoned",
        }
    }

    /// True while the thread is still open (planted or hinted).
    #[must_use]
    pub fn is_unresolved(self) -> bool {
        matches!(self, Self::Planted | Self::Hinted)
    }
}

impl fmt::Display for ForeshadowingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForeshadowingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::InvalidToken {
                field: "status",
                value: s.to_owned(),
            })
    }
}

/// How much a foreshadowing entry matters to the plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// Flavor.
    Minor,
    /// Default weight.
    #[default]
    Normal,
    /// Subplot-level.
    Major,
    /// Main-plot-level.
    Critical,
}

impl Importance {
    /// Every importance level, in declaration order.
    pub const ALL: [Self; 4] = [Self::Minor, Self::Normal, Self::Major, Self::Critical];

    /// Returns the wire token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Normal => "normal",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| DomainError::InvalidToken {
                field: "importance",
                value: s.to_owned(),
            })
    }
}

/// The editable part of a foreshadowing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForeshadowingAttributes {
    /// Short label; required.
    pub title: String,
    /// Free text.
    pub description: Option<String>,
    /// Episode where it was planted.
    pub planted_episode_id: Option<EpisodeId>,
    /// Episode where it was paid off.
    pub resolved_episode_id: Option<EpisodeId>,
    /// Episode number the author intends to resolve it in.
    pub planned_resolution_episode: Option<i32>,
    /// Lifecycle status.
    pub status: ForeshadowingStatus,
    /// Plot weight.
    pub importance: Importance,
}

/// A stored foreshadowing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Foreshadowing {
    /// Record identifier.
    pub id: ForeshadowingId,
    /// Owning novel.
    pub novel_id: NovelId,
    /// Editable fields.
    #[serde(flatten)]
    pub attributes: ForeshadowingAttributes,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Optional list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForeshadowingFilter {
    /// Only entries with this status.
    pub status: Option<ForeshadowingStatus>,
    /// Only entries with this importance.
    pub importance: Option<Importance>,
}

impl ForeshadowingFilter {
    /// Returns true when `entry` passes every set filter.
    #[must_use]
    pub fn matches(&self, entry: &Foreshadowing) -> bool {
        self.status.is_none_or(|s| s == entry.attributes.status)
            && self
                .importance
                .is_none_or(|i| i == entry.attributes.importance)
    }
}
