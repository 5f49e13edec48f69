//! Sidebar categories

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Bucket a note is listed under, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "pinned")]
    Pinned,
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "7")]
    Previous7Days,
    #[serde(rename = "30")]
    Previous30Days,
    #[serde(rename = "older")]
    Older,
}

impl Category {
    /// Every category, in the order the sidebar lists them
    pub const ALL: [Self; 6] = [
        Self::Pinned,
        Self::Today,
        Self::Yesterday,
        Self::Previous7Days,
        Self::Previous30Days,
        Self::Older,
    ];

    /// Stable key used in persisted and JSON output
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pinned => "pinned",
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Previous7Days => "7",
            Self::Previous30Days => "30",
            Self::Older => "older",
        }
    }

    /// Heading shown above the bucket
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pinned => "Pinned",
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::Previous7Days => "Previous 7 Days",
            Self::Previous30Days => "Previous 30 Days",
            Self::Older => "Older",
        }
    }

    /// Position in [`Category::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.key() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown category: {s}")))
    }
}
