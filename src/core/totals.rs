use crate::models::block::ActivityBlock;
use crate::models::category::Category;
use crate::models::day_totals::{CategoryTotal, DayTotals};
use crate::utils::time::{MINUTES_PER_DAY, minutes_between};

/// Sum the minutes of a day's blocks per category.
/// A running block is measured up to `now`.
pub fn build_totals(day_key: &str, blocks: &[ActivityBlock], now: i64) -> DayTotals {
    // -----------------------------
    // Minutes per category, in first-seen order
    // -----------------------------
    let mut per_cat: Vec<(Category, i64)> = Vec::new();
    let mut tracked = 0;

    for block in blocks {
        let mins = minutes_between(block.start_ts, block.end_or(now));
        tracked += mins;

        match per_cat.iter_mut().find(|(c, _)| *c == block.category) {
            Some((_, total)) => *total += mins,
            None => per_cat.push((block.category, mins)),
        }
    }

    // -----------------------------
    // Largest share first
    // -----------------------------
    per_cat.sort_by(|a, b| b.1.cmp(&a.1));

    let percents = percent_shares(&per_cat, tracked);
    let by_category = per_cat
        .into_iter()
        .zip(percents)
        .map(|((category, minutes), percent)| CategoryTotal {
            category,
            minutes,
            percent,
        })
        .collect();

    DayTotals {
        day_key: day_key.to_string(),
        by_category,
        tracked_minutes: tracked,
        untracked_minutes: (MINUTES_PER_DAY - tracked).max(0),
    }
}

/// Whole percentages summing to exactly 100 (largest remainder method).
/// All zeros when nothing is tracked.
fn percent_shares(per_cat: &[(Category, i64)], tracked: i64) -> Vec<i64> {
    if tracked == 0 {
        return vec![0; per_cat.len()];
    }

    let mut shares: Vec<i64> = per_cat.iter().map(|(_, m)| m * 100 / tracked).collect();
    let leftover = 100 - shares.iter().sum::<i64>();

    // stable: on equal remainders the bigger category, then the earlier one, wins
    let mut by_remainder: Vec<usize> = (0..per_cat.len()).collect();
    by_remainder.sort_by_key(|&i| std::cmp::Reverse(per_cat[i].1 * 100 % tracked));

    for &i in by_remainder.iter().take(leftover.max(0) as usize) {
        shares[i] += 1;
    }
    shares
}

/// Plain-text wind-up review: one `Category: N min` line per category.
pub fn windup_summary(totals: &DayTotals) -> String {
    if totals.by_category.is_empty() {
        return "No data yet.".to_string();
    }

    totals
        .by_category
        .iter()
        .map(|t| format!("{}: {} min", t.category.name(), t.minutes))
        .collect::<Vec<_>>()
        .join("\n")
}
