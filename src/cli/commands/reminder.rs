use super::open;
use crate::cli::parser::{Commands, ReminderCmd};
use crate::config::Config;
use crate::core::reminders::{ReminderDraft, ReminderLogic};
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::reminder::Reminder;
use crate::ui::messages::{info, success};
use crate::utils::colors::{RESET, color_for_status};
use crate::utils::date;
use crate::utils::formatting::bold;
use crate::utils::table::{Column, Table};
use crate::utils::time::{fmt_time, parse_optional_time};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Reminder { action } = cmd else {
        return Ok(());
    };

    let (mut pool, timeline) = open(cfg)?;
    let now = timeline.now();

    match action {
        ReminderCmd::Add {
            category,
            title,
            kind,
            date: d,
            time,
            repeat,
        } => {
            let date = match d {
                Some(s) => Some(date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?),
                None => None,
            };
            let draft = ReminderDraft {
                category: Category::parse(category)?,
                title: title.clone(),
                kind: kind.clone(),
                date,
                time: parse_optional_time(time.as_ref())?,
                repeat_minutes: *repeat,
            };

            let r = ReminderLogic::add(&mut pool, cfg, draft, now)?;
            success(format!(
                "Reminder {} added: {} at {} ({}).",
                r.id,
                r.title,
                r.time.format("%H:%M"),
                r.schedule.label()
            ));
        }

        ReminderCmd::List { category } => {
            let filter = category.as_deref().map(Category::parse).transpose()?;
            let list = ReminderLogic::list(&pool, filter)?;
            if list.is_empty() {
                info("No reminders.");
            } else {
                print_reminders(&list, now);
            }
        }

        ReminderCmd::Done { id } => {
            let r = ReminderLogic::toggle_done(&mut pool, *id, now)?;
            success(format!("Reminder {} is now {}.", r.id, r.status_label()));
        }

        ReminderCmd::Snooze { id, minutes } => {
            let minutes = minutes.unwrap_or(cfg.snooze_minutes);
            let r = ReminderLogic::snooze(&mut pool, *id, minutes, now)?;
            let until = r.snooze_until_ts.map(fmt_time).unwrap_or_default();
            success(format!("Reminder {} snoozed until {}.", r.id, until));
        }

        ReminderCmd::Toggle { id } => {
            let r = ReminderLogic::toggle_active(&mut pool, *id, now)?;
            success(format!("Reminder {} is now {}.", r.id, r.status_label()));
        }

        ReminderCmd::Del { id } => {
            ReminderLogic::delete(&mut pool, *id, now)?;
            success(format!("Reminder {} deleted.", id));
        }
    }

    Ok(())
}

fn print_reminders(list: &[Reminder], now: i64) {
    let mut table = Table::new(vec![
        Column::new("ID", 3),
        Column::new("STATUS", 6),
        Column::new("TIME", 5),
        Column::new("SCHEDULE", 10),
        Column::new("CATEGORY", 8),
        Column::new("TITLE", 10),
    ]);

    for r in list {
        let status = if r.is_snoozed_at(now) {
            format!("{} (snoozed)", r.status_label())
        } else {
            r.status_label().to_string()
        };
        table.add_row(vec![
            r.id.to_string(),
            status,
            r.time.format("%H:%M").to_string(),
            r.schedule.label(),
            r.category.name().to_string(),
            r.title.clone(),
        ]);
    }
    table.fit();

    let rendered = table.render();
    let mut lines = rendered.lines();
    if let Some(h) = lines.next() {
        println!("{}", bold(h.trim_end()));
    }
    for (line, r) in lines.zip(list) {
        println!("{}{}{}", color_for_status(r.status_label()), line.trim_end(), RESET);
    }
}
