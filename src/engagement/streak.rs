use std::collections::BTreeSet;

use time::Date;

/// Consecutive active days ending today. A day without activity only breaks
/// the streak once it is over, so a run ending yesterday still counts.
pub fn current_streak(active_days: &BTreeSet<Date>, today: Date) -> u32 {
    let start = if active_days.contains(&today) {
        Some(today)
    } else {
        today
            .previous_day()
            .filter(|yesterday| active_days.contains(yesterday))
    };

    let mut streak = 0;
    let mut cursor = start;
    while let Some(day) = cursor {
        if !active_days.contains(&day) {
            break;
        }
        streak += 1;
        cursor = day.previous_day();
    }
    streak
}

pub fn longest_streak(active_days: &BTreeSet<Date>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<Date> = None;

    for &day in active_days {
        run = match previous.and_then(Date::next_day) {
            Some(expected) if expected == day => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}
