//! Wall-clock time arithmetic on `HH:mm` strings and minute offsets.
//!
//! Every parser here returns `None` on malformed input. Downstream code treats
//! `None` as "no assignment", so a bad string makes a section unscheduled
//! rather than failing.

use chrono::NaiveTime;

/// Minutes since midnight.
pub type Minute = i32;

/// Minutes in a day. `24:00` is the only time that maps to this value.
pub const MINUTES_PER_DAY: Minute = 1440;

/// Parse a strict `HH:mm` string into minutes since midnight.
///
/// Hours run `00..=23` and minutes `00..=59`. `24:00` is accepted as the end
/// of the day. Anything else (`9:00`, `09:00:00`, `ab:cd`) yields `None`.
pub fn time_to_minutes(text: &str) -> Option<Minute> {
    let bytes = text.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digit = |i: usize| -> Option<Minute> {
        let b = bytes[i];
        b.is_ascii_digit().then(|| Minute::from(b - b'0'))
    };
    let hours = digit(0)? * 10 + digit(1)?;
    let minutes = digit(3)? * 10 + digit(4)?;

    match (hours, minutes) {
        (24, 0) => Some(MINUTES_PER_DAY),
        (0..=23, 0..=59) => Some(hours * 60 + minutes),
        _ => None,
    }
}

/// Format minutes since midnight as `HH:mm`.
///
/// Callers clamp to `[0, 1440]` first; `1440` formats as `24:00`.
pub fn minutes_to_time(minutes: Minute) -> String {
    let hours = minutes.div_euclid(60);
    let mins = minutes.rem_euclid(60);
    format!("{:02}:{:02}", hours, mins)
}

/// Strict overlap test on `(start, end)` minute pairs.
///
/// Touching ranges (`a.end == b.start`) do not overlap.
pub fn overlaps(a: (Minute, Minute), b: (Minute, Minute)) -> bool {
    a.0 < b.1 && a.1 > b.0
}

/// Overlap test on `HH:mm` strings. Returns false if any endpoint is invalid.
pub fn times_overlap(start_a: &str, end_a: &str, start_b: &str, end_b: &str) -> bool {
    match (
        time_to_minutes(start_a),
        time_to_minutes(end_a),
        time_to_minutes(start_b),
        time_to_minutes(end_b),
    ) {
        (Some(sa), Some(ea), Some(sb), Some(eb)) => overlaps((sa, ea), (sb, eb)),
        _ => false,
    }
}

/// Format a span of minutes as `"1 hr 30 min"`, omitting zero components.
pub fn format_duration(minutes: Minute) -> String {
    if minutes <= 0 {
        return String::new();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{} hr", hours));
    }
    if mins > 0 {
        parts.push(format!("{} min", mins));
    }
    parts.join(" ")
}

/// Duration text between two `HH:mm` strings.
///
/// Empty when either side is missing or invalid, or when `end <= start`.
pub fn duration_between(start: Option<&str>, end: Option<&str>) -> String {
    let (Some(start), Some(end)) = (start.and_then(time_to_minutes), end.and_then(time_to_minutes))
    else {
        return String::new();
    };
    if end <= start {
        return String::new();
    }
    format_duration(end - start)
}

/// Render an `HH:mm` string on a 12-hour clock (`"13:05"` -> `"1:05 PM"`).
///
/// Invalid input renders as an empty string.
pub fn format_12h(text: &str) -> String {
    match time_to_minutes(text) {
        Some(MINUTES_PER_DAY) => "12:00 AM".to_string(),
        Some(minutes) => NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
            .map(|t| t.format("%-I:%M %p").to_string())
            .unwrap_or_default(),
        None => String::new(),
    }
}
