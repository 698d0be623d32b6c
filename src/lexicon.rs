//! Keyword tables shared by the lexer, parser and formatter.
//!
//! Long forms are matched case-insensitively (callers pass lowercase). The
//! one-letter unit abbreviations are matched against the verbatim source
//! character, because casing is what separates `m` (minutes) from `M`
//! (months).

use crate::ir::{DayPattern, IntervalUnit, Weekday};

/// Long unit forms, singular and plural.
pub fn long_unit(word: &str) -> Option<IntervalUnit> {
    match word {
        "second" | "seconds" => Some(IntervalUnit::Seconds),
        "minute" | "minutes" => Some(IntervalUnit::Minutes),
        "hour" | "hours" => Some(IntervalUnit::Hours),
        "day" | "days" => Some(IntervalUnit::Days),
        "week" | "weeks" => Some(IntervalUnit::Weeks),
        "month" | "months" => Some(IntervalUnit::Months),
        "year" | "years" => Some(IntervalUnit::Years),
        _ => None,
    }
}

/// One-letter unit abbreviations, matched verbatim: `m` is minutes and `M`
/// is months; every other letter is accepted in either case.
pub fn short_unit(ch: char) -> Option<IntervalUnit> {
    match ch {
        's' | 'S' => Some(IntervalUnit::Seconds),
        'm' => Some(IntervalUnit::Minutes),
        'M' => Some(IntervalUnit::Months),
        'h' | 'H' => Some(IntervalUnit::Hours),
        'd' | 'D' => Some(IntervalUnit::Days),
        'w' | 'W' => Some(IntervalUnit::Weeks),
        'y' | 'Y' => Some(IntervalUnit::Years),
        _ => None,
    }
}

/// Weekday names, full and three-letter.
pub fn weekday(word: &str) -> Option<Weekday> {
    match word {
        "monday" | "mon" => Some(Weekday::Monday),
        "tuesday" | "tue" => Some(Weekday::Tuesday),
        "wednesday" | "wed" => Some(Weekday::Wednesday),
        "thursday" | "thu" => Some(Weekday::Thursday),
        "friday" | "fri" => Some(Weekday::Friday),
        "saturday" | "sat" => Some(Weekday::Saturday),
        "sunday" | "sun" => Some(Weekday::Sunday),
        _ => None,
    }
}

/// Weekday class names, singular and plural.
pub fn day_pattern(word: &str) -> Option<DayPattern> {
    match word {
        "weekday" | "weekdays" => Some(DayPattern::Weekdays),
        "weekend" | "weekends" => Some(DayPattern::Weekends),
        _ => None,
    }
}

/// Month names, full and three-letter. Returns the month number 1..=12.
pub fn month(word: &str) -> Option<u8> {
    match word {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

/// Canonical full month name for a validated month number.
pub fn month_name(month: u8) -> &'static str {
    match month {
        1 => "january",
        2 => "february",
        3 => "march",
        4 => "april",
        5 => "may",
        6 => "june",
        7 => "july",
        8 => "august",
        9 => "september",
        10 => "october",
        11 => "november",
        12 => "december",
        _ => unreachable!("month out of range"),
    }
}
