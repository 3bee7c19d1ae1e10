use super::open;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::timeline::BlockEdit;
use crate::db::blocks::get_block;
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::ui::messages::success;
use crate::utils::time::{fmt_range, parse_local_datetime};

/// Fields not given on the command line keep their stored value.
/// Editing a running block closes it (at now unless `--end` is given).
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        category,
        start,
        end,
        note,
    } = cmd
    {
        let (mut pool, mut timeline) = open(cfg)?;
        let now = timeline.now();

        let current = get_block(&pool.conn, *id)?.ok_or(AppError::BlockNotFound(*id))?;

        let edit = BlockEdit {
            category: match category {
                Some(c) => Category::parse(c)?,
                None => current.category,
            },
            start_ts: match start {
                Some(s) => parse_local_datetime(s, now)?,
                None => current.start_ts,
            },
            end_ts: match end {
                Some(e) => parse_local_datetime(e, now)?,
                None => current.end_or(now),
            },
            note: note.clone().unwrap_or(current.note),
        };

        let updated = timeline.edit_block(&mut pool, *id, edit)?;
        success(format!(
            "Block {} updated: {} {}",
            updated.id,
            updated.category.name(),
            fmt_range(updated.start_ts, updated.state.end_ts())
        ));
    }

    Ok(())
}
