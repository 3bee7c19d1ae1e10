//! Reminder scheduling engine.
//!
//! Three sub-mechanisms share one `TaskScheduler`:
//!
//! - the idle watchdog (periodic) nudges the user when no category has been
//!   touched for `idle_minutes`, then again at most every
//!   `max(10, idle_minutes / 2)` minutes while the silence lasts;
//! - the wind-up notifier (one-shot) fires at the next local occurrence of the
//!   wind-up time and re-arms itself relative to the moment it actually ran;
//! - the reminder evaluator (periodic) walks the active user reminders.
//!
//! Every fire persists its watermark before dispatching. Dispatch never fails
//! from the engine's point of view, so one lost notification cannot stop the
//! rest of a pass.

use crate::config::Config;
use crate::core::clock::SharedClock;
use crate::core::scheduler::{TaskKind, TaskScheduler};
use crate::core::timeline::Timeline;
use crate::db::pool::DbPool;
use crate::db::reminders;
use crate::errors::AppResult;
use crate::models::reminder::{Reminder, ReminderPatch, ReminderSchedule};
use crate::models::settings::Settings;
use crate::notify::{Delivery, Notification, Notifier, Permission, dispatch};
use crate::utils::time::{
    MS_PER_DAY, MS_PER_MINUTE, elapsed_minutes, local_date, month_key, next_occurrence,
    parse_time_strict, today_at,
};
use chrono::{Datelike, NaiveTime};
use serde_json::json;
use tracing::{debug, info, warn};

pub const WINDUP_BODY: &str = "Wind up your day: review your timeline.";

/// Lower bound of the idle re-fire interval, in minutes.
pub const MIN_IDLE_THROTTLE_MINUTES: i64 = 10;

/// Everything the engine needs to arm its timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Master switch (`remindersEnabled`).
    pub enabled: bool,
    pub idle_minutes: i64,
    pub windup_time: NaiveTime,
    pub idle_enabled: bool,
    pub windup_enabled: bool,
    pub evaluator_enabled: bool,
    pub idle_check_ms: i64,
    pub reminder_check_ms: i64,
    pub app_title: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_minutes: 30,
            windup_time: NaiveTime::from_hms_opt(21, 45, 0).unwrap_or_default(),
            idle_enabled: true,
            windup_enabled: true,
            evaluator_enabled: true,
            idle_check_ms: 30_000,
            reminder_check_ms: 60_000,
            app_title: "Day Tracker".to_string(),
        }
    }
}

impl EngineConfig {
    /// Merge the runtime settings stored in the database with the file config.
    pub fn from_settings(settings: &Settings, cfg: &Config) -> AppResult<Self> {
        Ok(Self {
            enabled: settings.reminders_enabled,
            idle_minutes: settings.idle_minutes.max(1),
            windup_time: parse_time_strict(&settings.windup_time)?,
            idle_enabled: cfg.idle_enabled,
            windup_enabled: cfg.windup_enabled,
            evaluator_enabled: cfg.evaluator_enabled,
            idle_check_ms: (cfg.idle_check_seconds.max(1) * 1000) as i64,
            reminder_check_ms: (cfg.reminder_check_seconds.max(1) * 1000) as i64,
            app_title: cfg.app_title.clone(),
        })
    }

    /// Minutes that must pass between two idle notifications.
    pub fn idle_throttle_minutes(&self) -> i64 {
        (self.idle_minutes / 2).max(MIN_IDLE_THROTTLE_MINUTES)
    }
}

/// Transient scheduling state, reset whenever the process starts.
#[derive(Debug, Default)]
pub struct SchedulerState {
    pub config: Option<EngineConfig>,
    /// Last idle notification (ms). Zero means never.
    pub last_reminder_at: i64,
    pub tasks: TaskScheduler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireKind {
    Idle,
    Windup,
    Reminder(i64),
}

/// One notification the engine decided to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Fire {
    pub kind: FireKind,
    pub at: i64,
    pub notification: Notification,
    pub delivery: Delivery,
}

/// Decide whether a user reminder is due at `now`.
pub fn should_fire(reminder: &Reminder, now: i64) -> AppResult<bool> {
    if !reminder.active || reminder.done || reminder.is_snoozed_at(now) {
        return Ok(false);
    }

    if now < today_at(now, reminder.time)? {
        return Ok(false);
    }

    let fire = match reminder.schedule {
        ReminderSchedule::Today { repeat_minutes } => match reminder.last_fired_ts {
            None => true,
            Some(last) => now - last >= repeat_minutes * MS_PER_MINUTE,
        },
        ReminderSchedule::Date { date } => {
            local_date(now)? == date && reminder.last_fired_ts.is_none()
        }
        ReminderSchedule::Monthly { date } => {
            if local_date(now)?.day() != date.day() {
                false
            } else {
                match reminder.last_fired_ts {
                    None => true,
                    Some(last) => month_key(last)? != month_key(now)?,
                }
            }
        }
    };

    Ok(fire)
}

pub struct ReminderEngine {
    clock: SharedClock,
    notifier: Box<dyn Notifier>,
    state: SchedulerState,
}

impl ReminderEngine {
    pub fn new(clock: SharedClock, notifier: Box<dyn Notifier>) -> Self {
        Self {
            clock,
            notifier,
            state: SchedulerState::default(),
        }
    }

    pub fn start(&mut self, config: EngineConfig) -> AppResult<()> {
        info!(enabled = config.enabled, "reminder engine starting");
        self.reconfigure(config)
    }

    /// Cancel every task, then arm again from `config` and the current time.
    /// Missed occurrences are never replayed.
    pub fn reconfigure(&mut self, config: EngineConfig) -> AppResult<()> {
        let now = self.clock.now_ms();
        // computed up front so a failure leaves the current schedule armed
        let windup_due = if config.enabled && config.windup_enabled {
            Some(next_occurrence(now, config.windup_time)?)
        } else {
            None
        };

        self.state.tasks.cancel_all();

        if config.enabled {
            if config.idle_enabled {
                self.state
                    .tasks
                    .arm_every(TaskKind::Idle, config.idle_check_ms, now);
            }
            if let Some(due) = windup_due {
                self.state.tasks.arm_at(TaskKind::Windup, due);
            }
            if config.evaluator_enabled {
                self.state
                    .tasks
                    .arm_every(TaskKind::Evaluate, config.reminder_check_ms, now);
            }
        }

        debug!(next = ?self.state.tasks.next_due(), "reminder engine armed");
        self.state.config = Some(config);
        Ok(())
    }

    /// Tear down every timer.
    pub fn stop(&mut self) {
        self.state.tasks.cancel_all();
        self.state.config = None;
        info!("reminder engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.state.config.is_some()
    }

    pub fn config(&self) -> Option<&EngineConfig> {
        self.state.config.as_ref()
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// When the next task is due, if any is armed.
    pub fn next_wakeup(&self) -> Option<i64> {
        self.state.tasks.next_due()
    }

    pub fn permission(&self) -> Permission {
        self.notifier.permission()
    }

    /// Swap the delivery backend, e.g. after permission was granted elsewhere.
    pub fn set_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifier = notifier;
    }

    /// Run every task due at the current time, each at most once.
    pub fn tick(&mut self, pool: &DbPool, timeline: &mut Timeline) -> Vec<Fire> {
        let now = self.clock.now_ms();
        let due = self.state.tasks.take_due(now);
        let mut fires = Vec::new();

        for kind in due {
            self.run_task(kind, pool, timeline, now, &mut fires);
            self.state.tasks.complete(kind, self.clock.now_ms());
        }

        fires
    }

    /// Run the given armed tasks right away, without touching their schedule.
    pub fn run_now(
        &mut self,
        kinds: &[TaskKind],
        pool: &DbPool,
        timeline: &mut Timeline,
    ) -> Vec<Fire> {
        let now = self.clock.now_ms();
        let mut fires = Vec::new();

        for &kind in kinds {
            if self.state.tasks.is_armed(kind) {
                self.run_task(kind, pool, timeline, now, &mut fires);
            }
        }

        fires
    }

    fn run_task(
        &mut self,
        kind: TaskKind,
        pool: &DbPool,
        timeline: &mut Timeline,
        now: i64,
        fires: &mut Vec<Fire>,
    ) {
        let result = match kind {
            TaskKind::Idle => self.check_idle(pool, timeline, now).map(|f| fires.extend(f)),
            TaskKind::Windup => self.fire_windup(now).map(|f| fires.extend(f)),
            TaskKind::Evaluate => self.evaluate_reminders(pool, now).map(|f| fires.extend(f)),
        };

        if let Err(e) = result {
            warn!(task = kind.as_str(), error = %e, "scheduled task failed");
        }
    }

    fn check_idle(
        &mut self,
        pool: &DbPool,
        timeline: &mut Timeline,
        now: i64,
    ) -> AppResult<Option<Fire>> {
        let Some(cfg) = self.state.config.as_ref() else {
            return Ok(None);
        };
        let idle_minutes = cfg.idle_minutes;
        let throttle = cfg.idle_throttle_minutes();
        let title = cfg.app_title.clone();

        let last_switch = timeline.sync_activity(pool)?;
        let idle_for = elapsed_minutes(last_switch, now);
        if idle_for < idle_minutes {
            return Ok(None);
        }

        if elapsed_minutes(self.state.last_reminder_at, now) < throttle {
            debug!(idle_for, "idle notification throttled");
            return Ok(None);
        }

        let running = timeline.running(pool)?;
        let label = running
            .as_ref()
            .map(|b| b.category.name())
            .unwrap_or("nothing");

        self.state.last_reminder_at = now;

        let notification = Notification::new(
            title,
            format!("Still doing: {}?", label),
            json!({
                "type": "idle",
                "running": running.as_ref().map(|b| b.category.id()),
            }),
        );
        Ok(Some(self.fire(FireKind::Idle, notification, now)))
    }

    fn fire_windup(&mut self, now: i64) -> AppResult<Option<Fire>> {
        let Some(cfg) = self.state.config.as_ref() else {
            return Ok(None);
        };
        let title = cfg.app_title.clone();
        let windup_time = cfg.windup_time;

        let fire = self.fire(
            FireKind::Windup,
            Notification::new(title, WINDUP_BODY, json!({ "type": "windup" })),
            now,
        );

        // relative to now, not to the missed occurrence
        let next = next_occurrence(now, windup_time).unwrap_or_else(|e| {
            warn!(error = %e, "wind-up time not computable, retrying in a day");
            now.saturating_add(MS_PER_DAY)
        });
        self.state.tasks.arm_at(TaskKind::Windup, next);
        debug!(next, "wind-up re-armed");

        Ok(Some(fire))
    }

    fn evaluate_reminders(&mut self, pool: &DbPool, now: i64) -> AppResult<Vec<Fire>> {
        let title = self
            .state
            .config
            .as_ref()
            .map(|c| c.app_title.clone())
            .unwrap_or_default();

        let mut fires = Vec::new();
        for reminder in reminders::active_reminders(&pool.conn)? {
            match should_fire(&reminder, now) {
                Ok(false) => {}
                Ok(true) => {
                    // watermark first; a failed dispatch must not cause a re-fire
                    if let Err(e) = reminders::update_reminder(
                        &pool.conn,
                        reminder.id,
                        &ReminderPatch::fired_at(now),
                    ) {
                        warn!(id = reminder.id, error = %e, "could not record reminder fire");
                        continue;
                    }

                    let notification = Notification::new(
                        title.clone(),
                        format!("{}: {}", reminder.category.name(), reminder.title),
                        json!({ "type": "reminder", "id": reminder.id }),
                    );
                    fires.push(self.fire(FireKind::Reminder(reminder.id), notification, now));
                }
                Err(e) => {
                    warn!(id = reminder.id, error = %e, "could not evaluate reminder");
                }
            }
        }

        Ok(fires)
    }

    fn fire(&self, kind: FireKind, notification: Notification, at: i64) -> Fire {
        let delivery = dispatch(self.notifier.as_ref(), &notification);
        info!(?kind, ?delivery, body = %notification.body, "reminder fired");
        Fire {
            kind,
            at,
            notification,
            delivery,
        }
    }
}
