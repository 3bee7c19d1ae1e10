//! Timeline state machine.
//!
//! The timeline is either idle (no running block) or running one block.
//! Starting a category while another runs closes the old block and opens the
//! new one inside a single transaction, so at most one block ever lacks an
//! end time.
//!
//! The timeline also owns `last_switch_at`, the transient timestamp of the
//! latest user interaction that the idle watchdog measures against.

use crate::core::clock::SharedClock;
use crate::core::totals::build_totals;
use crate::db::blocks;
use crate::db::log::{last_activity_ts, ttlog_at};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::block::{ActivityBlock, BlockPatch, BlockState, NewBlock};
use crate::models::category::Category;
use crate::models::day_totals::DayTotals;
use crate::utils::time::{day_key_from, fmt_time};
use tracing::debug;

/// Result of tapping a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Nothing was running; a block was opened.
    Started { opened: i64 },
    /// Another category was running; it was closed and a new block opened.
    Switched { closed: i64, opened: i64 },
    /// The same category was already running; only the activity stamp moved.
    Continued { block: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped { closed: i64 },
    AlreadyIdle,
}

/// Full replacement of a block's editable fields.
#[derive(Debug, Clone)]
pub struct BlockEdit {
    pub category: Category,
    pub start_ts: i64,
    pub end_ts: i64,
    pub note: String,
}

pub struct Timeline {
    clock: SharedClock,
    last_switch_at: i64,
}

impl Timeline {
    /// `last_switch_at` starts at process start: it is never restored.
    pub fn new(clock: SharedClock) -> Self {
        let now = clock.now_ms();
        Self {
            clock,
            last_switch_at: now,
        }
    }

    pub fn now(&self) -> i64 {
        self.clock.now_ms()
    }

    pub fn last_switch_at(&self) -> i64 {
        self.last_switch_at
    }

    pub fn today_key(&self) -> AppResult<String> {
        day_key_from(self.now())
    }

    pub fn running(&self, pool: &DbPool) -> AppResult<Option<ActivityBlock>> {
        blocks::running_block(&pool.conn)
    }

    /// Start tracking `category`, switching away from whatever runs.
    pub fn start_or_switch(
        &mut self,
        pool: &mut DbPool,
        category: Category,
    ) -> AppResult<SwitchOutcome> {
        let now = self.now();
        let tx = pool.conn.transaction()?;

        let running = blocks::running_block(&tx)?;

        let outcome = match running {
            Some(block) if block.category == category => {
                ttlog_at(&tx, now, "continue", category.id(), "Same category tapped again")?;
                SwitchOutcome::Continued { block: block.id }
            }
            Some(block) => {
                // close before open
                blocks::update_block(
                    &tx,
                    block.id,
                    &BlockPatch {
                        state: Some(BlockState::Closed { end_ts: now }),
                        ..BlockPatch::default()
                    },
                )?;
                let opened = blocks::insert_block(&tx, &Self::fresh_block(category, now)?)?;
                ttlog_at(
                    &tx,
                    now,
                    "switch",
                    category.id(),
                    &format!(
                        "Closed block {} ({}), opened block {}",
                        block.id,
                        block.category.id(),
                        opened
                    ),
                )?;
                SwitchOutcome::Switched {
                    closed: block.id,
                    opened,
                }
            }
            None => {
                let opened = blocks::insert_block(&tx, &Self::fresh_block(category, now)?)?;
                ttlog_at(
                    &tx,
                    now,
                    "start",
                    category.id(),
                    &format!("Opened block {}", opened),
                )?;
                SwitchOutcome::Started { opened }
            }
        };

        tx.commit()?;
        self.last_switch_at = now;
        debug!(?outcome, category = category.id(), "timeline switch");
        Ok(outcome)
    }

    fn fresh_block(category: Category, now: i64) -> AppResult<NewBlock> {
        Ok(NewBlock {
            category,
            start_ts: now,
            state: BlockState::Running,
            note: String::new(),
            day_key: day_key_from(now)?,
        })
    }

    /// Close the running block, if any. The activity stamp moves regardless.
    pub fn stop(&mut self, pool: &mut DbPool) -> AppResult<StopOutcome> {
        let now = self.now();
        let tx = pool.conn.transaction()?;

        let outcome = match blocks::running_block(&tx)? {
            Some(block) => {
                blocks::update_block(
                    &tx,
                    block.id,
                    &BlockPatch {
                        state: Some(BlockState::Closed { end_ts: now }),
                        ..BlockPatch::default()
                    },
                )?;
                ttlog_at(
                    &tx,
                    now,
                    "stop",
                    block.category.id(),
                    &format!("Closed block {}", block.id),
                )?;
                StopOutcome::Stopped { closed: block.id }
            }
            None => {
                ttlog_at(&tx, now, "stop", "", "Nothing running")?;
                StopOutcome::AlreadyIdle
            }
        };

        tx.commit()?;
        self.last_switch_at = now;
        Ok(outcome)
    }

    /// Replace a block's fields. `day_key` follows the (possibly new) start.
    pub fn edit_block(
        &mut self,
        pool: &mut DbPool,
        id: i64,
        edit: BlockEdit,
    ) -> AppResult<ActivityBlock> {
        if edit.end_ts <= edit.start_ts {
            return Err(AppError::Validation("End must be after Start.".into()));
        }

        let day_key = day_key_from(edit.start_ts)?;
        let patch = BlockPatch {
            category: Some(edit.category),
            start_ts: Some(edit.start_ts),
            state: Some(BlockState::Closed {
                end_ts: edit.end_ts,
            }),
            note: Some(edit.note),
            day_key: Some(day_key),
        };

        if !blocks::update_block(&pool.conn, id, &patch)? {
            return Err(AppError::BlockNotFound(id));
        }

        ttlog_at(
            &pool.conn,
            self.now(),
            "edit",
            &id.to_string(),
            &format!("Block {} edited", id),
        )?;

        blocks::get_block(&pool.conn, id)?.ok_or(AppError::BlockNotFound(id))
    }

    /// Remove a block. Returns `false` when it did not exist.
    pub fn delete_block(&mut self, pool: &mut DbPool, id: i64) -> AppResult<bool> {
        let removed = blocks::delete_block(&pool.conn, id)?;
        if removed {
            ttlog_at(
                &pool.conn,
                self.now(),
                "del",
                &id.to_string(),
                &format!("Block {} deleted", id),
            )?;
        }
        Ok(removed)
    }

    /// Append a timestamped line to the running block, or else to today's
    /// latest block. Returns the id of the annotated block.
    pub fn append_note(&mut self, pool: &mut DbPool, text: &str) -> AppResult<Option<i64>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let now = self.now();
        let target = match blocks::running_block(&pool.conn)? {
            Some(block) => Some(block),
            None => blocks::latest_block_for_day(&pool.conn, &day_key_from(now)?)?,
        };

        let Some(block) = target else {
            return Ok(None);
        };

        let line = format!("{} - {}", fmt_time(now), text);
        let note = if block.note.is_empty() {
            line
        } else {
            format!("{}\n{}", block.note, line)
        };

        blocks::update_block(
            &pool.conn,
            block.id,
            &BlockPatch {
                note: Some(note),
                ..BlockPatch::default()
            },
        )?;
        ttlog_at(&pool.conn, now, "note", &block.id.to_string(), text)?;

        Ok(Some(block.id))
    }

    pub fn blocks_for_day(&self, pool: &DbPool, day_key: &str) -> AppResult<Vec<ActivityBlock>> {
        blocks::blocks_by_day_key(&pool.conn, day_key)
    }

    /// Today's blocks, oldest first.
    pub fn todays_blocks(&self, pool: &DbPool) -> AppResult<Vec<ActivityBlock>> {
        self.blocks_for_day(pool, &self.today_key()?)
    }

    pub fn daily_totals(&self, pool: &DbPool) -> AppResult<DayTotals> {
        let day_key = self.today_key()?;
        let blocks = self.blocks_for_day(pool, &day_key)?;
        Ok(build_totals(&day_key, &blocks, self.now()))
    }

    /// Delete every block of a day. Returns how many were removed.
    pub fn clear_day(&mut self, pool: &mut DbPool, day_key: &str) -> AppResult<usize> {
        let ids = blocks::block_ids_by_day_key(&pool.conn, day_key)?;
        let removed = blocks::delete_blocks(&pool.conn, &ids)?;
        ttlog_at(
            &pool.conn,
            self.now(),
            "clear",
            day_key,
            &format!("{} blocks deleted", removed),
        )?;
        Ok(removed)
    }

    /// Pick up switches made by other processes sharing the database.
    /// Never moves the activity stamp backwards.
    pub fn sync_activity(&mut self, pool: &DbPool) -> AppResult<i64> {
        if let Some(ts) = last_activity_ts(&pool.conn)?
            && ts > self.last_switch_at
        {
            debug!(from = self.last_switch_at, to = ts, "activity synced from log");
            self.last_switch_at = ts;
        }
        Ok(self.last_switch_at)
    }
}
