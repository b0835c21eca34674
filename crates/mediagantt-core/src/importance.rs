use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Milestone,
    Crit,
    Active,
    Done,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Milestone => "milestone",
            Importance::Crit => "crit",
            Importance::Active => "active",
            Importance::Done => "done",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum counts for each tag. No ordering between the three is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    pub crit: i64,
    pub active: i64,
    pub done: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            crit: 5,
            active: 3,
            done: 2,
        }
    }
}

/// Tags a record. Milestone keywords are checked first as case-sensitive substrings of
/// the resolved category, then `crit`, `active` and `done` in that order.
pub fn classify(
    category: &str,
    count: Option<i64>,
    milestone_keywords: &[String],
    thresholds: &Thresholds,
) -> Option<Importance> {
    if milestone_keywords
        .iter()
        .any(|keyword| category.contains(keyword.as_str()))
    {
        return Some(Importance::Milestone);
    }

    let count = count?;
    if count >= thresholds.crit {
        Some(Importance::Crit)
    } else if count >= thresholds.active {
        Some(Importance::Active)
    } else if count >= thresholds.done {
        Some(Importance::Done)
    } else {
        None
    }
}

/// Text form used in exports and previews; unclassified records render empty.
pub fn importance_label(importance: Option<Importance>) -> &'static str {
    importance.map(|tag| tag.as_str()).unwrap_or("")
}
