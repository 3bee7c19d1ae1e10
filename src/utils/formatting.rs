//! Formatting utilities used for CLI and export outputs.

use crate::models::block::BlockState;
use crate::utils::colors::{GREEN, GREY, RESET, YELLOW};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn mins2readable(mins: i64, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;
    let sign = if mins < 0 { "-" } else { "" };

    if short {
        // es: 02:25
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        // es: 02h 25m
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Pill shown next to a block: green "Done", yellow "Running".
pub fn state_pill(state: &BlockState) -> String {
    match state {
        BlockState::Running => format!("{YELLOW}[Running]{RESET}"),
        BlockState::Closed { .. } => format!("{GREEN}[Done]{RESET}"),
    }
}

/// Wrap a multi-line note and indent every line after the first.
pub fn wrap_note(note: &str, width: usize, indent: &str) -> String {
    let mut out = Vec::new();
    for line in note.lines() {
        for piece in textwrap::wrap(line, width.max(10)) {
            out.push(piece.into_owned());
        }
    }
    out.join(&format!("\n{indent}"))
}

pub fn dimmed(s: &str) -> String {
    format!("{GREY}{s}{RESET}")
}
