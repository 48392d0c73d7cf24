use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{NovelId, WorldSettingId};

/// The closed set of world-building categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldSettingCategory {
    /// Places, maps, terrain.
    Geography,
    /// Magic systems.
    Magic,
    /// Customs, religion, daily life.
    Culture,
    /// Past events.
    History,
    /// Factions and governance.
    Politics,
}

impl WorldSettingCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Geography,
        Self::Magic,
        Self::Culture,
        Self::History,
        Self::Politics,
    ];

    /// Returns the wire token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Geography => "geography",
            Self::Magic => "magic",
            Self::Culture => "culture",
            Self::History => "history",
            Self::Politics => "politics",
        }
    }
}

impl fmt::Display for WorldSettingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorldSettingCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| DomainError::InvalidToken {
                field: "category",
                value: s.to_owned(),
            })
    }
}

/// The editable part of a world setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSettingAttributes {
    /// Category from the closed set.
    pub category: WorldSettingCategory,
    /// Short label; required.
    pub title: String,
    /// Free text.
    pub description: Option<String>,
    /// Free-form structured payload.
    pub details: serde_json::Value,
}

/// A stored world setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSetting {
    /// Record identifier.
    pub id: WorldSettingId,
    /// Owning novel.
    pub novel_id: NovelId,
    /// Editable fields.
    #[serde(flatten)]
    pub attributes: WorldSettingAttributes,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
