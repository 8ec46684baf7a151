//! Due-date extraction from free text.
//!
//! Three expression families are tried in a fixed order as an explicit rule
//! table: `by <X>`, then `at <X>`, then relative `in <N> <unit>`. The first
//! family whose pattern matches is final; if its expression cannot be
//! resolved (e.g. "by next monday", which the clock parser does not
//! understand) the result is absent, and later families are not consulted.
//!
//! Everything resolves relative to a caller-supplied reference time so that
//! extraction is deterministic. No timezone handling: the reference time is
//! the local clock and results are naive local timestamps with second
//! precision.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime, Timelike};
use regex::{Captures, Regex};

static BY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)by\s+(\d{1,2}(?::\d{2})?\s*(?:am|pm)?|tomorrow|today|next\s+\w+)")
        .expect("invalid regex")
});
static AT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)at\s+(\d{1,2}(?::\d{2})?\s*(?:am|pm)?|noon|midnight)")
        .expect("invalid regex")
});
static RELATIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)in\s+(\d+)\s+(minutes?|hours?|days?)").expect("invalid regex")
});
static CLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm)?").expect("invalid regex")
});

type Resolver = fn(&Captures, NaiveDateTime) -> Option<NaiveDateTime>;

fn resolve_by_at(caps: &Captures, now: NaiveDateTime) -> Option<NaiveDateTime> {
    resolve_time_expression(caps[1].trim(), now)
}

fn resolve_in(caps: &Captures, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let amount: i64 = caps[1].parse().ok()?;
    resolve_relative(amount, &caps[2], now)
}

/// Find a time/date expression in `text` and resolve it against `now`.
///
/// Returns `None` when no family matches or the matched expression cannot
/// be resolved. Callers must not fabricate a default due date.
pub fn extract_due_date(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    // Precedence order: `by` outranks `at` outranks `in`, so a compound
    // like "by tomorrow in 2 days" resolves through `by`.
    let rules: [(&Regex, Resolver); 3] = [
        (&BY_PATTERN, resolve_by_at),
        (&AT_PATTERN, resolve_by_at),
        (&RELATIVE_PATTERN, resolve_in),
    ];

    for (pattern, resolve) in rules {
        if let Some(caps) = pattern.captures(text) {
            return resolve(&caps, now);
        }
    }
    None
}

/// Resolve a `by`/`at` expression: a literal day word, a named time of day,
/// or a 12-hour clock time.
fn resolve_time_expression(expr: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let expr = expr.to_lowercase();

    match expr.as_str() {
        // Tomorrow defaults to the start of the working day.
        "tomorrow" => return (now + Duration::days(1)).date().and_hms_opt(9, 0, 0),
        // "today" pins to end of day even if 18:00 has already passed.
        "today" => return now.date().and_hms_opt(18, 0, 0),
        "noon" => return now.date().and_hms_opt(12, 0, 0),
        "midnight" => return now.date().and_hms_opt(0, 0, 0),
        _ => {}
    }

    let caps = CLOCK_PATTERN.captures(&expr)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps.get(2).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let period = caps.get(3).map(|m| m.as_str());

    // 12-hour convention when a period is present.
    match period {
        Some("pm") if hour != 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }

    let candidate = now.date().and_hms_opt(hour, minute, 0)?;

    // A clock time at or before the reference moment rolls forward exactly
    // one day, never more.
    if candidate <= now {
        candidate.checked_add_signed(Duration::days(1))
    } else {
        Some(candidate)
    }
}

/// Resolve `in <N> <unit>` arithmetic. Unrecognized units yield absent
/// rather than an error.
fn resolve_relative(amount: i64, unit: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let unit = unit.to_lowercase();
    let delta = if unit.starts_with("minute") {
        Duration::minutes(amount)
    } else if unit.starts_with("hour") {
        Duration::hours(amount)
    } else if unit.starts_with("day") {
        Duration::days(amount)
    } else {
        return None;
    };

    now.checked_add_signed(delta)
        .map(|t| t.with_nanosecond(0).unwrap_or(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_at_clock_time_later_today() {
        let now = at(2024, 1, 1, 10, 0, 0);
        assert_eq!(
            extract_due_date("remind me to call mom at 3 pm", now),
            Some(at(2024, 1, 1, 15, 0, 0))
        );
    }

    #[test]
    fn test_clock_time_already_passed_rolls_one_day() {
        let now = at(2024, 1, 1, 16, 30, 0);
        // 3 pm is before 4:30 pm, so it lands on Jan 2 — exactly one day.
        assert_eq!(
            extract_due_date("call mom at 3 pm", now),
            Some(at(2024, 1, 2, 15, 0, 0))
        );
    }

    #[test]
    fn test_clock_time_equal_to_now_rolls_forward() {
        let now = at(2024, 1, 1, 15, 0, 0);
        assert_eq!(
            extract_due_date("call mom at 3 pm", now),
            Some(at(2024, 1, 2, 15, 0, 0))
        );
    }

    #[test]
    fn test_clock_time_with_minutes() {
        let now = at(2024, 1, 1, 1, 0, 0);
        assert_eq!(
            extract_due_date("standup at 9:45 am", now),
            Some(at(2024, 1, 1, 9, 45, 0))
        );
    }

    #[test]
    fn test_twelve_hour_edges() {
        let now = at(2024, 1, 1, 1, 0, 0);
        // 12 pm stays 12, 12 am maps to 0 (rolled to tomorrow since 00:00 < now).
        assert_eq!(
            extract_due_date("lunch at 12 pm", now),
            Some(at(2024, 1, 1, 12, 0, 0))
        );
        assert_eq!(
            extract_due_date("backup at 12 am", now),
            Some(at(2024, 1, 2, 0, 0, 0))
        );
    }

    #[test]
    fn test_by_tomorrow_is_nine_am() {
        let now = at(2024, 3, 15, 22, 11, 5);
        assert_eq!(
            extract_due_date("finish report by tomorrow", now),
            Some(at(2024, 3, 16, 9, 0, 0))
        );
    }

    #[test]
    fn test_by_today_is_six_pm_even_when_past() {
        let now = at(2024, 3, 15, 21, 0, 0);
        // No forward shift for "today": 18:00 is already past but stays.
        assert_eq!(
            extract_due_date("submit by today", now),
            Some(at(2024, 3, 15, 18, 0, 0))
        );
    }

    #[test]
    fn test_at_noon_and_midnight() {
        let now = at(2024, 3, 15, 8, 0, 0);
        assert_eq!(
            extract_due_date("meet at noon", now),
            Some(at(2024, 3, 15, 12, 0, 0))
        );
        assert_eq!(
            extract_due_date("job runs at midnight", now),
            Some(at(2024, 3, 15, 0, 0, 0))
        );
    }

    #[test]
    fn test_relative_units() {
        let now = at(2024, 1, 1, 10, 0, 0);
        assert_eq!(
            extract_due_date("ping me in 2 hours", now),
            Some(at(2024, 1, 1, 12, 0, 0))
        );
        assert_eq!(
            extract_due_date("ping me in 30 minutes", now),
            Some(at(2024, 1, 1, 10, 30, 0))
        );
        assert_eq!(
            extract_due_date("follow up in 3 days", now),
            Some(at(2024, 1, 4, 10, 0, 0))
        );
        assert_eq!(
            extract_due_date("check back in 1 hour", now),
            Some(at(2024, 1, 1, 11, 0, 0))
        );
    }

    #[test]
    fn test_unrecognized_unit_is_absent() {
        let now = at(2024, 1, 1, 10, 0, 0);
        assert_eq!(extract_due_date("in 2 weeks", now), None);
        assert_eq!(resolve_relative(2, "weeks", now), None);
    }

    #[test]
    fn test_no_expression_is_absent() {
        let now = at(2024, 1, 1, 10, 0, 0);
        assert_eq!(extract_due_date("buy milk", now), None);
    }

    #[test]
    fn test_by_next_word_matches_but_resolves_absent() {
        // "by next friday" is claimed by the `by` family but has no
        // resolution rule, so the result is absent and the `in` family is
        // never consulted.
        let now = at(2024, 1, 1, 10, 0, 0);
        assert_eq!(extract_due_date("by next friday", now), None);
        assert_eq!(extract_due_date("by next friday in 2 days", now), None);
    }

    #[test]
    fn test_by_outranks_relative() {
        let now = at(2024, 1, 1, 10, 0, 0);
        assert_eq!(
            extract_due_date("by tomorrow in 2 days", now),
            Some(at(2024, 1, 2, 9, 0, 0))
        );
    }

    #[test]
    fn test_invalid_hour_is_absent() {
        // "23 pm" maps to hour 35, which is not a valid time.
        let now = at(2024, 1, 1, 10, 0, 0);
        assert_eq!(extract_due_date("at 23 pm", now), None);
    }

    #[test]
    fn test_case_insensitive() {
        let now = at(2024, 1, 1, 10, 0, 0);
        assert_eq!(
            extract_due_date("Call Mom At 3 PM", now),
            Some(at(2024, 1, 1, 15, 0, 0))
        );
        assert_eq!(
            extract_due_date("Finish BY TOMORROW", now),
            Some(at(2024, 1, 2, 9, 0, 0))
        );
    }
}
