/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Reminder status color:
/// Done → green, Active → yellow, Paused → grey
pub fn color_for_status(status: &str) -> &'static str {
    match status {
        "Done" => GREEN,
        "Active" => YELLOW,
        _ => GREY,
    }
}

/// Share of the day color: large shares stand out.
pub fn color_for_percent(pct: i64) -> &'static str {
    if pct >= 50 {
        MAGENTA
    } else if pct >= 20 {
        CYAN
    } else {
        RESET
    }
}
