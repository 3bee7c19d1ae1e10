use super::category::Category;
use serde::Serialize;

/// Whether a block is still being tracked.
/// A block is `Running` exactly while it has no end time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockState {
    Running,
    Closed { end_ts: i64 },
}

impl BlockState {
    /// Convert state → nullable `end_ts` column
    pub fn end_ts(&self) -> Option<i64> {
        match self {
            BlockState::Running => None,
            BlockState::Closed { end_ts } => Some(*end_ts),
        }
    }

    /// Convert nullable `end_ts` column → state
    pub fn from_end_ts(end_ts: Option<i64>) -> Self {
        match end_ts {
            Some(end_ts) => BlockState::Closed { end_ts },
            None => BlockState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, BlockState::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlockState::Running => "Running",
            BlockState::Closed { .. } => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityBlock {
    pub id: i64,
    pub category: Category, // ⇔ blocks.category_id
    pub start_ts: i64,      // ⇔ blocks.start_ts (ms since epoch)
    pub state: BlockState,  // ⇔ blocks.end_ts (NULL while running)
    pub note: String,       // ⇔ blocks.note
    pub day_key: String,    // ⇔ blocks.day_key ("YYYY-MM-DD", local)
}

impl ActivityBlock {
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// End of the block, measuring a running block against `now`.
    pub fn end_or(&self, now: i64) -> i64 {
        self.state.end_ts().unwrap_or(now)
    }
}

/// Fields of a block that does not exist in the store yet.
#[derive(Debug, Clone)]
pub struct NewBlock {
    pub category: Category,
    pub start_ts: i64,
    pub state: BlockState,
    pub note: String,
    pub day_key: String,
}

/// Partial update of a stored block: `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct BlockPatch {
    pub category: Option<Category>,
    pub start_ts: Option<i64>,
    pub state: Option<BlockState>,
    pub note: Option<String>,
    pub day_key: Option<String>,
}

impl BlockPatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.start_ts.is_none()
            && self.state.is_none()
            && self.note.is_none()
            && self.day_key.is_none()
    }
}
