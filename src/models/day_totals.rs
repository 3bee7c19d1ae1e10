use super::category::Category;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub minutes: i64,
    pub percent: i64,
}

/// Aggregated minutes for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DayTotals {
    pub day_key: String,
    /// Sorted by minutes, largest first.
    pub by_category: Vec<CategoryTotal>,
    pub tracked_minutes: i64,
    pub untracked_minutes: i64,
}
