mod common;

use common::{MINUTE, local_ms, setup};
use rdaytracker::core::timeline::{BlockEdit, StopOutcome, SwitchOutcome, Timeline};
use rdaytracker::core::totals::windup_summary;
use rdaytracker::db::blocks;
use rdaytracker::errors::AppError;
use rdaytracker::models::block::BlockState;
use rdaytracker::models::category::Category;

#[test]
fn at_most_one_block_is_running() {
    let (mut pool, clock, mut tl) = setup(local_ms(2025, 6, 10, 8, 0));

    let steps = [
        Some(Category::Work),
        Some(Category::Work),
        Some(Category::Commute),
        None,
        None,
        Some(Category::Kids),
        Some(Category::Rest),
        Some(Category::Study),
        None,
        Some(Category::Social),
    ];

    for step in steps {
        clock.advance_minutes(7);
        match step {
            Some(c) => {
                tl.start_or_switch(&mut pool, c).unwrap();
            }
            None => {
                tl.stop(&mut pool).unwrap();
            }
        }
        assert!(blocks::count_running(&pool.conn).unwrap() <= 1);
    }

    assert_eq!(blocks::count_running(&pool.conn).unwrap(), 1);
    let running = tl.running(&pool).unwrap().unwrap();
    assert_eq!(running.category, Category::Social);
}

#[test]
fn same_category_twice_keeps_one_block_but_refreshes_activity() {
    let start = local_ms(2025, 6, 10, 9, 0);
    let (mut pool, clock, mut tl) = setup(start);

    let first = tl.start_or_switch(&mut pool, Category::Work).unwrap();
    let SwitchOutcome::Started { opened } = first else {
        panic!("expected a fresh block, got {first:?}");
    };

    clock.advance_minutes(12);
    let again = tl.start_or_switch(&mut pool, Category::Work).unwrap();

    assert_eq!(again, SwitchOutcome::Continued { block: opened });
    assert_eq!(tl.todays_blocks(&pool).unwrap().len(), 1);
    assert_eq!(tl.last_switch_at(), start + 12 * MINUTE);
}

#[test]
fn switching_closes_the_old_block_at_the_switch_time() {
    let nine = local_ms(2025, 6, 10, 9, 0);
    let (mut pool, clock, mut tl) = setup(nine);

    tl.start_or_switch(&mut pool, Category::Work).unwrap();
    clock.advance_minutes(30);
    let outcome = tl.start_or_switch(&mut pool, Category::Study).unwrap();
    assert!(matches!(outcome, SwitchOutcome::Switched { .. }));

    let day = tl.todays_blocks(&pool).unwrap();
    assert_eq!(day.len(), 2);

    assert_eq!(day[0].category, Category::Work);
    assert_eq!(day[0].start_ts, nine);
    assert_eq!(
        day[0].state,
        BlockState::Closed {
            end_ts: nine + 30 * MINUTE
        }
    );
    assert_eq!(day[0].state.label(), "Done");

    assert_eq!(day[1].category, Category::Study);
    assert_eq!(day[1].start_ts, nine + 30 * MINUTE);
    assert_eq!(day[1].state, BlockState::Running);
    assert_eq!(day[1].state.label(), "Running");
}

#[test]
fn stop_when_idle_is_a_noop_that_still_counts_as_activity() {
    let start = local_ms(2025, 6, 10, 9, 0);
    let (mut pool, clock, mut tl) = setup(start);

    clock.advance_minutes(5);
    assert_eq!(tl.stop(&mut pool).unwrap(), StopOutcome::AlreadyIdle);
    assert_eq!(tl.last_switch_at(), start + 5 * MINUTE);
    assert!(tl.todays_blocks(&pool).unwrap().is_empty());
}

#[test]
fn edit_block_round_trips_and_recomputes_day_key() {
    let (mut pool, clock, mut tl) = setup(local_ms(2025, 6, 10, 9, 0));

    tl.start_or_switch(&mut pool, Category::Work).unwrap();
    clock.advance_minutes(45);
    tl.stop(&mut pool).unwrap();
    let id = tl.todays_blocks(&pool).unwrap()[0].id;

    let new_start = local_ms(2025, 6, 9, 20, 0);
    let new_end = local_ms(2025, 6, 9, 21, 15);
    let edited = tl
        .edit_block(
            &mut pool,
            id,
            BlockEdit {
                category: Category::Exercise,
                start_ts: new_start,
                end_ts: new_end,
                note: "evening run".to_string(),
            },
        )
        .unwrap();

    assert_eq!(edited.category, Category::Exercise);
    assert_eq!(edited.start_ts, new_start);
    assert_eq!(edited.state.end_ts(), Some(new_end));
    assert_eq!(edited.note, "evening run");
    assert_eq!(edited.day_key, "2025-06-09");

    let stored = blocks::get_block(&pool.conn, id).unwrap().unwrap();
    assert_eq!(stored, edited);
    assert!(tl.todays_blocks(&pool).unwrap().is_empty());
}

#[test]
fn edit_block_rejects_end_before_start_without_touching_the_row() {
    let (mut pool, clock, mut tl) = setup(local_ms(2025, 6, 10, 9, 0));

    tl.start_or_switch(&mut pool, Category::Cooking).unwrap();
    clock.advance_minutes(20);
    tl.stop(&mut pool).unwrap();
    let before = tl.todays_blocks(&pool).unwrap()[0].clone();

    let err = tl
        .edit_block(
            &mut pool,
            before.id,
            BlockEdit {
                category: Category::Work,
                start_ts: before.start_ts,
                end_ts: before.start_ts,
                note: "changed".to_string(),
            },
        )
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(blocks::get_block(&pool.conn, before.id).unwrap(), Some(before));
}

#[test]
fn edit_unknown_block_is_not_found() {
    let now = local_ms(2025, 6, 10, 9, 0);
    let (mut pool, _clock, mut tl) = setup(now);

    let err = tl
        .edit_block(
            &mut pool,
            42,
            BlockEdit {
                category: Category::Work,
                start_ts: now,
                end_ts: now + MINUTE,
                note: String::new(),
            },
        )
        .unwrap_err();

    assert!(matches!(err, AppError::BlockNotFound(42)));
}

#[test]
fn delete_block_removes_it() {
    let (mut pool, _clock, mut tl) = setup(local_ms(2025, 6, 10, 9, 0));
    tl.start_or_switch(&mut pool, Category::Work).unwrap();
    let id = tl.running(&pool).unwrap().unwrap().id;

    assert!(tl.delete_block(&mut pool, id).unwrap());
    assert!(!tl.delete_block(&mut pool, id).unwrap());
    assert!(tl.running(&pool).unwrap().is_none());
}

#[test]
fn append_note_targets_running_then_latest_block() {
    let (mut pool, clock, mut tl) = setup(local_ms(2025, 6, 10, 9, 0));

    // nothing to annotate yet
    assert_eq!(tl.append_note(&mut pool, "hello").unwrap(), None);

    tl.start_or_switch(&mut pool, Category::Study).unwrap();
    clock.advance_minutes(5);
    let id = tl.append_note(&mut pool, "  chapter 3  ").unwrap().unwrap();
    clock.advance_minutes(10);
    tl.append_note(&mut pool, "exercises").unwrap();

    let block = blocks::get_block(&pool.conn, id).unwrap().unwrap();
    assert_eq!(block.note, "09:05 - chapter 3\n09:15 - exercises");

    tl.stop(&mut pool).unwrap();
    clock.advance_minutes(1);
    assert_eq!(tl.append_note(&mut pool, "wrap-up").unwrap(), Some(id));
    assert_eq!(tl.append_note(&mut pool, "   ").unwrap(), None);

    let block = blocks::get_block(&pool.conn, id).unwrap().unwrap();
    assert!(block.note.ends_with("\n09:16 - wrap-up"));
}

#[test]
fn daily_totals_split_tracked_time_by_category() {
    let (mut pool, clock, mut tl) = setup(local_ms(2025, 6, 10, 8, 0));

    tl.start_or_switch(&mut pool, Category::Work).unwrap();
    clock.advance_minutes(60);
    tl.start_or_switch(&mut pool, Category::Study).unwrap();
    clock.advance_minutes(40);
    tl.start_or_switch(&mut pool, Category::Rest).unwrap();
    clock.advance_minutes(20);
    tl.stop(&mut pool).unwrap();

    let totals = tl.daily_totals(&pool).unwrap();
    assert_eq!(totals.day_key, "2025-06-10");
    assert_eq!(totals.tracked_minutes, 120);
    assert_eq!(totals.untracked_minutes, 1320);

    let mins: Vec<(Category, i64)> = totals
        .by_category
        .iter()
        .map(|t| (t.category, t.minutes))
        .collect();
    assert_eq!(
        mins,
        vec![
            (Category::Work, 60),
            (Category::Study, 40),
            (Category::Rest, 20)
        ]
    );

    let percent: i64 = totals.by_category.iter().map(|t| t.percent).sum();
    assert_eq!(percent, 100);
}

#[test]
fn equal_thirds_still_sum_to_one_hundred_percent() {
    let (mut pool, clock, mut tl) = setup(local_ms(2025, 6, 10, 8, 0));

    tl.start_or_switch(&mut pool, Category::Work).unwrap();
    clock.advance_minutes(40);
    tl.start_or_switch(&mut pool, Category::Study).unwrap();
    clock.advance_minutes(40);
    tl.start_or_switch(&mut pool, Category::Rest).unwrap();
    clock.advance_minutes(40);
    tl.stop(&mut pool).unwrap();

    let totals = tl.daily_totals(&pool).unwrap();
    assert_eq!(totals.tracked_minutes, 120);
    assert_eq!(totals.untracked_minutes, 1320);

    let percent: Vec<(Category, i64)> = totals
        .by_category
        .iter()
        .map(|t| (t.category, t.percent))
        .collect();
    assert_eq!(
        percent,
        vec![
            (Category::Work, 34),
            (Category::Study, 33),
            (Category::Rest, 33)
        ]
    );
}

#[test]
fn daily_totals_measure_the_running_block_against_now() {
    let (mut pool, clock, mut tl) = setup(local_ms(2025, 6, 10, 14, 0));

    tl.start_or_switch(&mut pool, Category::Kids).unwrap();
    clock.advance_minutes(25);

    let totals = tl.daily_totals(&pool).unwrap();
    assert_eq!(totals.tracked_minutes, 25);
    assert_eq!(totals.by_category[0].percent, 100);

    clock.advance_minutes(5);
    assert_eq!(tl.daily_totals(&pool).unwrap().tracked_minutes, 30);
}

#[test]
fn empty_day_has_no_percentages() {
    let (pool, _clock, tl) = setup(local_ms(2025, 6, 10, 14, 0));

    let totals = tl.daily_totals(&pool).unwrap();
    assert!(totals.by_category.is_empty());
    assert_eq!(totals.tracked_minutes, 0);
    assert_eq!(totals.untracked_minutes, 1440);
    assert_eq!(windup_summary(&totals), "No data yet.");
}

#[test]
fn windup_summary_lists_minutes_per_category() {
    let (mut pool, clock, mut tl) = setup(local_ms(2025, 6, 10, 18, 0));

    tl.start_or_switch(&mut pool, Category::Cooking).unwrap();
    clock.advance_minutes(45);
    tl.start_or_switch(&mut pool, Category::Social).unwrap();
    clock.advance_minutes(15);
    tl.stop(&mut pool).unwrap();

    let totals = tl.daily_totals(&pool).unwrap();
    assert_eq!(windup_summary(&totals), "Cooking: 45 min\nSocial: 15 min");
}

#[test]
fn clear_day_only_touches_that_day() {
    let (mut pool, clock, mut tl) = setup(local_ms(2025, 6, 9, 22, 0));

    tl.start_or_switch(&mut pool, Category::Rest).unwrap();
    clock.advance_minutes(30);
    tl.stop(&mut pool).unwrap();

    clock.set(local_ms(2025, 6, 10, 9, 0));
    tl.start_or_switch(&mut pool, Category::Work).unwrap();
    clock.advance_minutes(30);
    tl.start_or_switch(&mut pool, Category::Commute).unwrap();

    assert_eq!(tl.clear_day(&mut pool, "2025-06-10").unwrap(), 2);
    assert!(tl.todays_blocks(&pool).unwrap().is_empty());
    assert_eq!(tl.blocks_for_day(&pool, "2025-06-09").unwrap().len(), 1);
}

#[test]
fn sync_activity_picks_up_switches_from_another_timeline() {
    let start = local_ms(2025, 6, 10, 9, 0);
    let (mut pool, clock, mut watcher) = setup(start);

    // a second process sharing the database
    let mut cli = Timeline::new(common::shared(&clock));

    clock.advance_minutes(20);
    cli.start_or_switch(&mut pool, Category::Work).unwrap();

    assert_eq!(watcher.last_switch_at(), start);
    assert_eq!(watcher.sync_activity(&pool).unwrap(), start + 20 * MINUTE);

    // a stamp newer than the log is kept
    clock.advance_minutes(5);
    watcher.stop(&mut pool).unwrap();
    clock.advance_minutes(5);
    watcher.start_or_switch(&mut pool, Category::Rest).unwrap();
    assert_eq!(watcher.sync_activity(&pool).unwrap(), start + 30 * MINUTE);
}
