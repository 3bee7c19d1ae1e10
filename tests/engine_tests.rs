mod common;

use chrono::{NaiveDate, NaiveTime};
use common::{MINUTE, local_ms, setup, shared};
use rdaytracker::config::Config;
use rdaytracker::core::clock::ManualClock;
use rdaytracker::core::engine::{EngineConfig, Fire, FireKind, ReminderEngine, should_fire};
use rdaytracker::core::reminders::{ReminderDraft, ReminderLogic};
use rdaytracker::core::scheduler::TaskKind;
use rdaytracker::core::timeline::Timeline;
use rdaytracker::db::pool::DbPool;
use rdaytracker::db::reminders;
use rdaytracker::models::category::Category;
use rdaytracker::models::reminder::{Reminder, ReminderSchedule};
use rdaytracker::notify::{Delivery, Permission, RecordingNotifier};

struct Rig {
    pool: DbPool,
    clock: ManualClock,
    timeline: Timeline,
    engine: ReminderEngine,
    notifier: RecordingNotifier,
}

impl Rig {
    fn new(start: i64) -> Self {
        Self::with_notifier(start, RecordingNotifier::new())
    }

    fn with_notifier(start: i64, notifier: RecordingNotifier) -> Self {
        let (pool, clock, timeline) = setup(start);
        let engine = ReminderEngine::new(shared(&clock), Box::new(notifier.clone()));
        Self {
            pool,
            clock,
            timeline,
            engine,
            notifier,
        }
    }

    fn tick(&mut self) -> Vec<Fire> {
        self.engine.tick(&self.pool, &mut self.timeline)
    }

    /// Advance in `step_secs` steps for `minutes`, ticking after every step.
    fn run_for(&mut self, minutes: i64, step_secs: i64) -> Vec<Fire> {
        let steps = minutes * 60 / step_secs;
        let mut fires = Vec::new();
        for _ in 0..steps {
            self.clock.advance_secs(step_secs);
            fires.extend(self.tick());
        }
        fires
    }

    fn add_reminder(&mut self, kind: &str, date: Option<NaiveDate>, time: &str, repeat: Option<i64>) -> i64 {
        let draft = ReminderDraft {
            category: Category::Study,
            title: "Flashcards".to_string(),
            kind: kind.to_string(),
            date,
            time: Some(NaiveTime::parse_from_str(time, "%H:%M").unwrap()),
            repeat_minutes: repeat,
        };
        let now = self.clock_now();
        ReminderLogic::add(&mut self.pool, &Config::default(), draft, now)
            .unwrap()
            .id
    }

    fn clock_now(&self) -> i64 {
        self.timeline.now()
    }

    fn reminder(&self, id: i64) -> Reminder {
        reminders::get_reminder(&self.pool.conn, id).unwrap().unwrap()
    }
}

fn idle_only(idle_minutes: i64) -> EngineConfig {
    EngineConfig {
        idle_minutes,
        windup_enabled: false,
        evaluator_enabled: false,
        ..EngineConfig::default()
    }
}

fn windup_only(hh: u32, mm: u32) -> EngineConfig {
    EngineConfig {
        windup_time: NaiveTime::from_hms_opt(hh, mm, 0).unwrap(),
        idle_enabled: false,
        evaluator_enabled: false,
        ..EngineConfig::default()
    }
}

fn evaluator_only() -> EngineConfig {
    EngineConfig {
        idle_enabled: false,
        windup_enabled: false,
        ..EngineConfig::default()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------
// Idle watchdog
// ---------------------------------------------------------------

#[test]
fn idle_fires_once_at_threshold_and_throttles() {
    let start = local_ms(2025, 6, 10, 9, 0);
    let mut rig = Rig::new(start);
    rig.timeline
        .start_or_switch(&mut rig.pool, Category::Work)
        .unwrap();
    rig.engine.start(idle_only(30)).unwrap();

    let fires = rig.run_for(35, 30);
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].kind, FireKind::Idle);
    assert_eq!(fires[0].at, start + 30 * MINUTE);
    assert_eq!(fires[0].notification.body, "Still doing: Work?");
    assert_eq!(fires[0].notification.data["type"], "idle");
    assert_eq!(fires[0].notification.data["running"], "work");
    assert_eq!(rig.engine.state().last_reminder_at, start + 30 * MINUTE);
    assert_eq!(rig.notifier.sent()[0].title, "Day Tracker");

    // throttle = max(10, 15) = 15 minutes after the first fire
    let fires = rig.run_for(9, 30);
    assert!(fires.is_empty(), "no second fire before minute 45");
    assert_eq!(rig.clock_now(), start + 44 * MINUTE);

    let fires = rig.run_for(1, 30);
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].at, start + 45 * MINUTE);
    assert_eq!(rig.notifier.count_of("idle"), 2);
}

#[test]
fn idle_throttle_never_drops_below_ten_minutes() {
    let start = local_ms(2025, 6, 10, 9, 0);
    let mut rig = Rig::new(start);
    rig.engine.start(idle_only(12)).unwrap();

    let fires = rig.run_for(32, 30);
    let at: Vec<i64> = fires.iter().map(|f| (f.at - start) / MINUTE).collect();
    assert_eq!(at, vec![12, 22, 32]);
    assert_eq!(fires[0].notification.body, "Still doing: nothing?");
}

#[test]
fn activity_resets_the_idle_countdown() {
    let start = local_ms(2025, 6, 10, 9, 0);
    let mut rig = Rig::new(start);
    rig.timeline
        .start_or_switch(&mut rig.pool, Category::Work)
        .unwrap();
    rig.engine.start(idle_only(30)).unwrap();

    rig.run_for(20, 30);
    rig.timeline
        .start_or_switch(&mut rig.pool, Category::Commute)
        .unwrap();

    let fires = rig.run_for(29, 30);
    assert!(fires.is_empty());

    let fires = rig.run_for(2, 30);
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].at, start + 50 * MINUTE);
    assert_eq!(fires[0].notification.body, "Still doing: Commute?");
}

#[test]
fn idle_sees_switches_made_by_another_process() {
    let start = local_ms(2025, 6, 10, 9, 0);
    let mut rig = Rig::new(start);
    rig.engine.start(idle_only(30)).unwrap();

    let mut other = Timeline::new(shared(&rig.clock));
    rig.run_for(25, 30);
    other.start_or_switch(&mut rig.pool, Category::Kids).unwrap();

    let fires = rig.run_for(29, 30);
    assert!(fires.is_empty());
    let fires = rig.run_for(1, 30);
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].notification.body, "Still doing: Kids?");
}

// ---------------------------------------------------------------
// Wind-up
// ---------------------------------------------------------------

#[test]
fn windup_fires_after_a_missed_occurrence_without_backlog() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 21, 0));
    rig.engine.start(windup_only(21, 45)).unwrap();
    assert_eq!(rig.engine.next_wakeup(), Some(local_ms(2025, 6, 10, 21, 45)));

    // the process was suspended past 21:45
    rig.clock.set(local_ms(2025, 6, 10, 22, 10));
    let fires = rig.tick();
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].kind, FireKind::Windup);
    assert_eq!(
        fires[0].notification.body,
        "Wind up your day: review your timeline."
    );
    assert_eq!(rig.engine.next_wakeup(), Some(local_ms(2025, 6, 11, 21, 45)));

    assert!(rig.tick().is_empty());

    // a whole day skipped still yields one fire
    rig.clock.set(local_ms(2025, 6, 13, 8, 0));
    assert_eq!(rig.tick().len(), 1);
    assert_eq!(rig.engine.next_wakeup(), Some(local_ms(2025, 6, 13, 21, 45)));
}

#[test]
fn windup_armed_after_its_time_waits_for_tomorrow() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 22, 10));
    rig.engine.start(windup_only(21, 45)).unwrap();

    assert!(rig.tick().is_empty());
    assert_eq!(rig.engine.next_wakeup(), Some(local_ms(2025, 6, 11, 21, 45)));

    rig.clock.set(local_ms(2025, 6, 11, 21, 45));
    assert_eq!(rig.tick().len(), 1);
}

// ---------------------------------------------------------------
// User-defined reminders
// ---------------------------------------------------------------

#[test]
fn monthly_reminder_fires_once_per_month() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 9, 0));
    let id = rig.add_reminder("monthly", Some(date(2025, 5, 10)), "08:00", None);
    rig.engine.start(evaluator_only()).unwrap();
    assert_eq!(rig.engine.config().map(|c| c.idle_enabled), Some(false));

    let fires = rig.run_for(1, 60);
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].kind, FireKind::Reminder(id));
    assert_eq!(fires[0].notification.body, "Study: Flashcards");
    assert_eq!(fires[0].notification.data["id"], id);

    // immediate re-evaluation
    let again = rig
        .engine
        .run_now(&[TaskKind::Evaluate], &rig.pool, &mut rig.timeline);
    assert!(again.is_empty());
    assert!(rig.run_for(120, 60).is_empty());

    // other days of the month stay quiet
    rig.clock.set(local_ms(2025, 6, 11, 9, 0));
    assert!(rig.tick().is_empty());

    rig.notifier.clear();
    rig.clock.set(local_ms(2025, 7, 10, 9, 0));
    assert_eq!(rig.tick().len(), 1);
    assert_eq!(rig.notifier.count_of("reminder"), 1);
}

#[test]
fn today_reminder_repeats_at_most_once_per_window() {
    let start = local_ms(2025, 6, 10, 9, 0);
    let mut rig = Rig::new(start);
    rig.add_reminder("today", None, "09:00", Some(60));
    rig.engine.start(evaluator_only()).unwrap();

    let fires = rig.run_for(180, 60);
    let at: Vec<i64> = fires.iter().map(|f| (f.at - start) / MINUTE).collect();
    assert_eq!(at, vec![1, 61, 121]);

    for pair in fires.windows(2) {
        assert!(pair[1].at - pair[0].at >= 60 * MINUTE);
    }
}

#[test]
fn reminders_wait_for_their_time_of_day() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 9, 0));
    let id = rig.add_reminder("today", None, "10:30", Some(60));
    rig.engine.start(evaluator_only()).unwrap();

    assert!(rig.run_for(89, 60).is_empty());
    let fires = rig.run_for(1, 60);
    assert_eq!(fires.len(), 1);
    assert_eq!(
        rig.reminder(id).last_fired_ts,
        Some(local_ms(2025, 6, 10, 10, 30))
    );
}

#[test]
fn date_reminder_fires_once_on_its_date_only() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 9, 0));
    let today = rig.add_reminder("date", Some(date(2025, 6, 10)), "08:00", None);
    let tomorrow = rig.add_reminder("date", Some(date(2025, 6, 11)), "08:00", None);
    rig.engine.start(evaluator_only()).unwrap();

    let fires = rig.run_for(60, 60);
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].kind, FireKind::Reminder(today));

    rig.clock.set(local_ms(2025, 6, 11, 9, 0));
    let fires = rig.tick();
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].kind, FireKind::Reminder(tomorrow));

    // already fired once: never again
    assert!(rig.run_for(60, 60).is_empty());
}

#[test]
fn snoozed_reminder_stays_quiet_until_the_snooze_ends() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 9, 0));
    let id = rig.add_reminder("today", None, "08:00", Some(60));
    let now = rig.clock_now();
    ReminderLogic::snooze(&mut rig.pool, id, 10, now).unwrap();
    rig.engine.start(evaluator_only()).unwrap();

    assert!(rig.run_for(9, 60).is_empty());
    let fires = rig.run_for(1, 60);
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].at, now + 10 * MINUTE);
}

#[test]
fn done_and_paused_reminders_never_fire() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 9, 0));
    let done = rig.add_reminder("today", None, "08:00", Some(60));
    let paused = rig.add_reminder("today", None, "08:00", Some(60));
    let now = rig.clock_now();
    ReminderLogic::toggle_done(&mut rig.pool, done, now).unwrap();
    ReminderLogic::toggle_active(&mut rig.pool, paused, now).unwrap();
    rig.engine.start(evaluator_only()).unwrap();

    assert!(rig.run_for(30, 60).is_empty());
}

#[test]
fn denied_permission_still_records_the_fire() {
    let notifier = RecordingNotifier::with_permission(Permission::Denied);
    let mut rig = Rig::with_notifier(local_ms(2025, 6, 10, 9, 0), notifier);
    let id = rig.add_reminder("today", None, "08:00", Some(60));
    rig.engine.start(evaluator_only()).unwrap();

    let fires = rig.run_for(1, 60);
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].delivery, Delivery::Skipped);
    assert_eq!(rig.notifier.count(), 0);
    assert_eq!(rig.reminder(id).last_fired_ts, Some(fires[0].at));

    // no re-fire storm once permission comes back
    rig.notifier.set_permission(Permission::Granted);
    assert!(rig.run_for(30, 60).is_empty());
}

#[test]
fn transport_failure_does_not_stop_the_pass() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 9, 0));
    let a = rig.add_reminder("today", None, "08:00", Some(60));
    let b = rig.add_reminder("today", None, "08:30", Some(60));
    rig.notifier.set_failing(true);
    rig.engine.start(evaluator_only()).unwrap();

    let fires = rig.run_for(1, 60);
    assert_eq!(fires.len(), 2);
    assert!(fires.iter().all(|f| f.delivery == Delivery::Failed));
    assert_eq!(rig.notifier.count(), 0);
    assert!(rig.reminder(a).last_fired_ts.is_some());
    assert!(rig.reminder(b).last_fired_ts.is_some());
}

#[test]
fn should_fire_respects_flags_and_schedule() {
    let now = local_ms(2025, 6, 10, 12, 0);
    let base = Reminder {
        id: 1,
        category: Category::Work,
        title: "Timesheet".to_string(),
        schedule: ReminderSchedule::Today { repeat_minutes: 30 },
        time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        active: true,
        done: false,
        last_fired_ts: None,
        snooze_until_ts: None,
        created_ts: now,
    };

    assert!(should_fire(&base, now).unwrap());

    let recent = Reminder {
        last_fired_ts: Some(now - 29 * MINUTE),
        ..base.clone()
    };
    assert!(!should_fire(&recent, now).unwrap());

    let old = Reminder {
        last_fired_ts: Some(now - 30 * MINUTE),
        ..base.clone()
    };
    assert!(should_fire(&old, now).unwrap());

    let snooze_over = Reminder {
        snooze_until_ts: Some(now),
        ..base.clone()
    };
    assert!(should_fire(&snooze_over, now).unwrap());

    let inactive = Reminder {
        active: false,
        ..base.clone()
    };
    assert!(!should_fire(&inactive, now).unwrap());

    let monthly_fired_last_month = Reminder {
        schedule: ReminderSchedule::Monthly {
            date: date(2025, 1, 10),
        },
        last_fired_ts: Some(local_ms(2025, 5, 10, 11, 0)),
        ..base.clone()
    };
    assert!(should_fire(&monthly_fired_last_month, now).unwrap());

    let date_past = Reminder {
        schedule: ReminderSchedule::Date {
            date: date(2025, 6, 9),
        },
        ..base
    };
    assert!(!should_fire(&date_past, now).unwrap());
}

// ---------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------

#[test]
fn disabling_tears_down_every_timer_and_enabling_rearms_from_now() {
    let start = local_ms(2025, 6, 10, 9, 0);
    let mut rig = Rig::new(start);
    rig.add_reminder("today", None, "08:00", Some(60));
    rig.engine.start(EngineConfig::default()).unwrap();
    assert!(rig.engine.next_wakeup().is_some());

    rig.engine
        .reconfigure(EngineConfig {
            enabled: false,
            ..EngineConfig::default()
        })
        .unwrap();
    assert_eq!(rig.engine.next_wakeup(), None);
    assert!(rig.run_for(120, 60).is_empty());

    rig.engine.reconfigure(EngineConfig::default()).unwrap();
    let now = rig.clock_now();
    assert_eq!(rig.engine.next_wakeup(), Some(now + 30_000));

    // nothing was tapped since 09:00, so the idle watchdog joins in
    let fires = rig.run_for(1, 60);
    let kinds: Vec<FireKind> = fires.iter().map(|f| f.kind).collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&FireKind::Idle));
    assert!(kinds.iter().any(|k| matches!(k, FireKind::Reminder(_))));
}

#[test]
fn reconfigure_moves_the_windup() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 18, 0));
    rig.engine.start(windup_only(21, 45)).unwrap();
    rig.engine.reconfigure(windup_only(19, 0)).unwrap();
    assert_eq!(rig.engine.next_wakeup(), Some(local_ms(2025, 6, 10, 19, 0)));
}

/// Far past the last date the calendar can represent.
const BEYOND_CALENDAR: i64 = i64::MAX / 2;

#[test]
fn failed_reconfigure_keeps_the_previous_schedule() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 18, 0));
    rig.engine.start(windup_only(21, 45)).unwrap();
    let armed = rig.engine.next_wakeup();

    rig.clock.set(BEYOND_CALENDAR);
    assert!(rig.engine.reconfigure(windup_only(19, 0)).is_err());

    assert_eq!(rig.engine.config(), Some(&windup_only(21, 45)));
    assert_eq!(rig.engine.next_wakeup(), armed);
}

#[test]
fn windup_rearms_a_day_later_when_its_next_time_cannot_be_computed() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 18, 0));
    rig.engine.start(windup_only(21, 45)).unwrap();

    rig.clock.set(BEYOND_CALENDAR);
    let fires = rig.tick();
    assert_eq!(fires.len(), 1);
    assert_eq!(rig.notifier.count_of("windup"), 1);

    assert_eq!(
        rig.engine.next_wakeup(),
        Some(BEYOND_CALENDAR + 24 * 60 * MINUTE)
    );
}

#[test]
fn stop_cancels_everything() {
    let mut rig = Rig::new(local_ms(2025, 6, 10, 9, 0));
    rig.engine.start(EngineConfig::default()).unwrap();
    assert!(rig.engine.is_running());

    rig.engine.stop();
    assert!(!rig.engine.is_running());
    assert!(rig.engine.config().is_none());
    assert_eq!(rig.engine.next_wakeup(), None);
    assert!(rig.run_for(60, 60).is_empty());
}
