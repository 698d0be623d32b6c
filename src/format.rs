//! Canonical rendering of a [`ScheduleSpec`].
//!
//! The output is the fixed point of the codec: parsing what this module
//! produces and rendering it again yields the same string. Rendering first
//! resolves which phrases are present, then joins them; nothing is
//! overwritten after the fact.

use std::fmt;

use crate::ir::{DayPattern, IntervalUnit, ScheduleSpec, TimeOfDay};
use crate::lexicon;

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&parts(self).join(" "))
    }
}

fn parts(spec: &ScheduleSpec) -> Vec<String> {
    let mut parts = vec!["every".to_string()];

    let day_word = spec
        .day_of_week()
        .map(|d| d.as_str().to_string())
        .or_else(|| {
            spec.day_pattern().map(|p| {
                match p {
                    DayPattern::Weekdays => "weekday",
                    DayPattern::Weekends => "weekend",
                }
                .to_string()
            })
        });

    // A day constraint on a plain daily schedule replaces the unit word:
    // "every monday", not "every day on monday".
    let folded = spec.unit() == IntervalUnit::Days && spec.interval() == 1 && day_word.is_some();

    if folded {
        if let Some(word) = day_word {
            parts.push(word);
        }
    } else {
        if spec.interval() == 1 {
            parts.push(spec.unit().singular().to_string());
        } else {
            parts.push(format!("{} {}", spec.interval(), spec.unit().plural()));
        }
        if let Some(day) = spec.day_of_week() {
            parts.push(format!("on {}", day.as_str()));
        } else if let Some(pattern) = spec.day_pattern() {
            parts.push(format!(
                "on {}",
                match pattern {
                    DayPattern::Weekdays => "weekdays",
                    DayPattern::Weekends => "weekends",
                }
            ));
        }
    }

    if let Some(day) = spec.day_of_month() {
        parts.push(format!("on {day}"));
    }

    match spec.month() {
        crate::ir::MonthSpecifier::None => {}
        crate::ir::MonthSpecifier::Single(m) => {
            parts.push(format!("in {}", lexicon::month_name(*m)));
        }
        crate::ir::MonthSpecifier::Range(start, end) => {
            parts.push(format!(
                "between {} and {}",
                lexicon::month_name(*start),
                lexicon::month_name(*end)
            ));
        }
        crate::ir::MonthSpecifier::List(months) => {
            let names: Vec<&str> = months.iter().map(|m| lexicon::month_name(*m)).collect();
            parts.push(format!("in {}", names.join(",")));
        }
    }

    if let Some(time) = spec.time_of_day() {
        parts.push(format!("at {}", time_phrase(time)));
    }

    parts
}

/// Whole hours render on the 12-hour clock; anything else renders as HH:MM.
fn time_phrase(time: TimeOfDay) -> String {
    if time.minute != 0 {
        return format!("{:02}:{:02}", time.hour, time.minute);
    }
    match time.hour {
        0 => "12am".to_string(),
        12 => "12pm".to_string(),
        h if h < 12 => format!("{h}am"),
        h => format!("{}pm", h - 12),
    }
}
