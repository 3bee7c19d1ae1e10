use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Fixed set of activity categories.
/// `Rest` is a regular category, not a special "paused" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Cooking,
    Commute,
    Kids,
    Study,
    Rest,
    Exercise,
    Social,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Work,
        Category::Cooking,
        Category::Commute,
        Category::Kids,
        Category::Study,
        Category::Rest,
        Category::Exercise,
        Category::Social,
    ];

    /// Convert enum → DB string
    pub fn id(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Cooking => "cooking",
            Category::Commute => "commute",
            Category::Kids => "kids",
            Category::Study => "study",
            Category::Rest => "rest",
            Category::Exercise => "exercise",
            Category::Social => "social",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Cooking => "Cooking",
            Category::Commute => "Commute",
            Category::Kids => "Kids",
            Category::Study => "Study",
            Category::Rest => "Rest",
            Category::Exercise => "Exercise",
            Category::Social => "Social",
        }
    }

    /// Convert DB string → enum
    pub fn from_id(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.id() == s)
    }

    /// Helper: accept user input in any case ("Work", "WORK", "work")
    pub fn parse(input: &str) -> AppResult<Self> {
        Self::from_id(&input.trim().to_lowercase())
            .ok_or_else(|| {
                AppError::InvalidCategory(format!("{} (expected one of: {})", input, Self::ids()))
            })
    }

    pub fn ids() -> String {
        Self::ALL
            .iter()
            .map(|c| c.id())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
