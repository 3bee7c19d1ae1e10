#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{Local, TimeZone};
use rdaytracker::core::clock::{ManualClock, SharedClock};
use rdaytracker::core::timeline::Timeline;
use rdaytracker::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub const MINUTE: i64 = 60_000;

pub fn rti() -> Command {
    cargo_bin_cmd!("rdaytracker")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rdaytracker.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a fresh database through the CLI
pub fn init_db(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Epoch milliseconds of a local wall time.
pub fn local_ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
    Local
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("unambiguous local time")
        .timestamp_millis()
}

/// In-memory database, a manual clock set to `start` and a timeline on that clock.
pub fn setup(start: i64) -> (DbPool, ManualClock, Timeline) {
    let pool = DbPool::in_memory().expect("in-memory db");
    let clock = ManualClock::new(start);
    let shared: SharedClock = Arc::new(clock.clone());
    let timeline = Timeline::new(shared);
    (pool, clock, timeline)
}

pub fn shared(clock: &ManualClock) -> SharedClock {
    Arc::new(clock.clone())
}
