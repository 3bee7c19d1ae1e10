use crate::core::timeline::Timeline;
use crate::db::log::ttlog_at;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::block::ActivityBlock;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One block as it appears in the exported document.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockExport {
    pub id: i64,
    pub category_id: String,
    pub start_ts: i64,
    pub end_ts: Option<i64>,
    pub note: String,
    pub day_key: String,
}

impl From<&ActivityBlock> for BlockExport {
    fn from(b: &ActivityBlock) -> Self {
        Self {
            id: b.id,
            category_id: b.category.id().to_string(),
            start_ts: b.start_ts,
            end_ts: b.state.end_ts(),
            note: b.note.clone(),
            day_key: b.day_key.clone(),
        }
    }
}

/// `{ "date": ..., "logs": [...] }`
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DayExport {
    pub date: String,
    pub logs: Vec<BlockExport>,
}

/// Default output name for a day.
pub fn default_file_name(day_key: &str) -> String {
    format!("day-tracker-{day_key}.json")
}

/// Refuse to clobber an existing file unless `force` is set.
fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        return Err(AppError::Export(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Ok(())
}

pub struct ExportLogic;

impl ExportLogic {
    /// Today's blocks plus the day key.
    pub fn build(pool: &DbPool, timeline: &Timeline) -> AppResult<DayExport> {
        let date = timeline.today_key()?;
        let logs = timeline
            .todays_blocks(pool)?
            .iter()
            .map(BlockExport::from)
            .collect();
        Ok(DayExport { date, logs })
    }

    /// Write today's document as pretty JSON. Returns the written path.
    pub fn export(
        pool: &mut DbPool,
        timeline: &Timeline,
        file: Option<&str>,
        force: bool,
    ) -> AppResult<PathBuf> {
        let doc = Self::build(pool, timeline)?;
        let path = match file {
            Some(f) => PathBuf::from(f),
            None => PathBuf::from(default_file_name(&doc.date)),
        };

        ensure_writable(&path, force)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&doc)?;
        fs::write(&path, json)?;

        ttlog_at(
            &pool.conn,
            timeline.now(),
            "export",
            &doc.date,
            &format!("{} blocks exported to {}", doc.logs.len(), path.display()),
        )?;

        Ok(path)
    }
}
