//! Display formatting for card metadata. Pure functions, no clock access:
//! anything time-relative takes the current instant as an argument.

use time::OffsetDateTime;

/// Human-scaled byte size on the base-1024 ladder, B through TB.
pub fn format_byte_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes < TB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    }
}

/// Clip duration as `minutes:seconds`, seconds zero-padded and rounded.
///
/// Stays in minutes past the hour (3661 s renders "61:01"). The rounded
/// remainder can reach 60; it carries into the minutes component so the
/// display always equals the duration rounded to the nearest whole second.
pub fn format_duration(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mut minutes = (seconds / 60.0).floor() as u64;
    let mut secs = (seconds % 60.0).round() as u64;
    if secs == 60 {
        minutes += 1;
        secs = 0;
    }
    format!("{}:{:02}", minutes, secs)
}

/// Elapsed time between `then` and `now` in coarse human granularity
/// ("3 days ago"). Thresholds follow the conventional fromNow ladder:
/// 45 s, 90 s, 45 min, 90 min, 22 h, 36 h, 26 d, 46 d, 320 d, 548 d.
pub fn format_relative_time(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let delta = now - then;
    let phrase = relative_phrase(delta.whole_seconds().unsigned_abs());
    if delta.is_negative() {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

fn relative_phrase(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const MONTH: u64 = 30 * DAY;
    const YEAR: u64 = 365 * DAY;

    if seconds < 45 {
        "a few seconds".to_string()
    } else if seconds < 90 {
        "a minute".to_string()
    } else if seconds < 45 * MINUTE {
        format!("{} minutes", div_round(seconds, MINUTE))
    } else if seconds < 90 * MINUTE {
        "an hour".to_string()
    } else if seconds < 22 * HOUR {
        format!("{} hours", div_round(seconds, HOUR))
    } else if seconds < 36 * HOUR {
        "a day".to_string()
    } else if seconds < 26 * DAY {
        format!("{} days", div_round(seconds, DAY))
    } else if seconds < 46 * DAY {
        "a month".to_string()
    } else if seconds < 320 * DAY {
        format!("{} months", div_round(seconds, MONTH))
    } else if seconds < 548 * DAY {
        "a year".to_string()
    } else {
        format!("{} years", div_round(seconds, YEAR))
    }
}

fn div_round(n: u64, unit: u64) -> u64 {
    (n + unit / 2) / unit
}

/// Size reduction from `original` to `compressed` as a rounded percentage.
/// Negative when the output grew. `None` when the original size is zero,
/// so division by zero never reaches the display layer.
pub fn compression_percentage(original: u64, compressed: u64) -> Option<i64> {
    if original == 0 {
        return None;
    }
    let ratio = compressed as f64 / original as f64;
    Some(((1.0 - ratio) * 100.0).round() as i64)
}
