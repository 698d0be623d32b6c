//! Field lowering shared by every dialect, plus the Unix 5-field emitter.

use crate::error::ScheduleError;
use crate::ir::{DayPattern, Dialect, IntervalUnit, MonthSpecifier, ScheduleSpec, TimeOfDay};
use crate::zone::{self, CronContext};

/// Convert a schedule to a Unix 5-field cron expression
/// (`min hr dom mon dow`, weekdays 0=Sunday..6=Saturday).
///
/// The time of day is shifted from the schedule's zone into the context's
/// server zone using the offsets at the clock's reference instant.
pub fn to_cron(spec: &ScheduleSpec, ctx: &CronContext<'_>) -> Result<String, ScheduleError> {
    let time = zone::resolve_time_of_day(spec, ctx)?;
    let fields = lower(spec, Dialect::Unix, time)?;
    Ok(format!(
        "{} {} {} {} {}",
        fields.minute, fields.hour, fields.day_of_month, fields.month, fields.day_of_week
    ))
}

/// The six columns every dialect draws from. Unix drops the seconds column;
/// Quartz appends a year column and rewrites one of dom/dow to `?`.
pub(crate) struct Fields {
    pub second: String,
    pub minute: String,
    pub hour: String,
    pub day_of_month: String,
    pub month: String,
    pub day_of_week: String,
}

pub(crate) fn lower(
    spec: &ScheduleSpec,
    dialect: Dialect,
    time: Option<TimeOfDay>,
) -> Result<Fields, ScheduleError> {
    let interval = spec.interval();
    let anchored = time.unwrap_or(TimeOfDay { hour: 0, minute: 0 });

    match spec.unit() {
        IntervalUnit::Seconds => {
            if dialect == Dialect::Unix {
                return Err(ScheduleError::unsupported(dialect, "seconds"));
            }
            if 60 % interval != 0 {
                return Err(ScheduleError::unsupported(
                    dialect,
                    format!("a {interval}-second step ({interval} does not divide 60, so the step restarts at each minute)"),
                ));
            }
            Ok(Fields {
                second: step(interval),
                minute: "*".into(),
                hour: "*".into(),
                day_of_month: "*".into(),
                month: "*".into(),
                day_of_week: "*".into(),
            })
        }

        IntervalUnit::Minutes => {
            if 60 % interval != 0 {
                return Err(ScheduleError::unsupported(
                    dialect,
                    format!("a {interval}-minute step ({interval} does not divide 60, so the step restarts at each hour)"),
                ));
            }
            Ok(Fields {
                second: "0".into(),
                minute: step(interval),
                hour: "*".into(),
                day_of_month: "*".into(),
                month: "*".into(),
                day_of_week: "*".into(),
            })
        }

        IntervalUnit::Hours => {
            if interval > 23 {
                return Err(ScheduleError::unsupported(
                    dialect,
                    format!("an {interval}-hour step (hour field is 0-23)"),
                ));
            }
            // `at 00:30` anchors the minute within each step; an hour-of-day
            // anchor has no cron rendering. Uneven steps like */7 are kept:
            // every dialect tolerates them in the hour field.
            let minute = match time {
                None => 0,
                Some(t) if t.hour == 0 => t.minute,
                Some(_) => {
                    return Err(ScheduleError::unsupported(
                        dialect,
                        "an hour-of-day anchor with an hourly interval",
                    ))
                }
            };
            Ok(Fields {
                second: "0".into(),
                minute: minute.to_string(),
                hour: step(interval),
                day_of_month: "*".into(),
                month: "*".into(),
                day_of_week: "*".into(),
            })
        }

        IntervalUnit::Days => {
            if interval > 31 {
                return Err(ScheduleError::unsupported(
                    dialect,
                    format!("a {interval}-day step (day-of-month field is 1-31)"),
                ));
            }
            if interval > 1 && (spec.day_of_week().is_some() || spec.day_pattern().is_some()) {
                return Err(ScheduleError::unsupported(
                    dialect,
                    "a day-of-week filter with a multi-day interval",
                ));
            }
            Ok(Fields {
                second: "0".into(),
                minute: anchored.minute.to_string(),
                hour: anchored.hour.to_string(),
                day_of_month: step(interval),
                month: "*".into(),
                day_of_week: day_of_week_field(spec, dialect),
            })
        }

        IntervalUnit::Weeks => {
            if interval > 1 {
                return Err(ScheduleError::unsupported(dialect, "multi-week intervals"));
            }
            Ok(Fields {
                second: "0".into(),
                minute: anchored.minute.to_string(),
                hour: anchored.hour.to_string(),
                day_of_month: "*".into(),
                month: "*".into(),
                day_of_week: day_of_week_field(spec, dialect),
            })
        }

        IntervalUnit::Months => {
            if interval > 12 {
                return Err(ScheduleError::unsupported(
                    dialect,
                    format!("a {interval}-month step (month field is 1-12)"),
                ));
            }
            let month = if spec.month().is_none() {
                step(interval)
            } else {
                if interval > 1 {
                    return Err(ScheduleError::unsupported(
                        dialect,
                        "a month constraint combined with a multi-month interval",
                    ));
                }
                month_field(spec.month())
            };
            Ok(Fields {
                second: "0".into(),
                minute: anchored.minute.to_string(),
                hour: anchored.hour.to_string(),
                day_of_month: spec.day_of_month().unwrap_or(1).to_string(),
                month,
                day_of_week: day_of_week_field(spec, dialect),
            })
        }

        IntervalUnit::Years => {
            if interval > 1 {
                return Err(ScheduleError::unsupported(dialect, "multi-year intervals"));
            }
            let month = if spec.month().is_none() {
                "1".to_string()
            } else {
                month_field(spec.month())
            };
            Ok(Fields {
                second: "0".into(),
                minute: anchored.minute.to_string(),
                hour: anchored.hour.to_string(),
                day_of_month: spec.day_of_month().unwrap_or(1).to_string(),
                month,
                day_of_week: day_of_week_field(spec, dialect),
            })
        }
    }
}

/// `*/1` collapses to `*`.
fn step(interval: u32) -> String {
    if interval == 1 {
        "*".to_string()
    } else {
        format!("*/{interval}")
    }
}

fn month_field(month: &MonthSpecifier) -> String {
    match month {
        MonthSpecifier::None => "*".to_string(),
        MonthSpecifier::Single(m) => m.to_string(),
        MonthSpecifier::Range(start, end) => format!("{start}-{end}"),
        MonthSpecifier::List(months) => months
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn day_of_week_field(spec: &ScheduleSpec, dialect: Dialect) -> String {
    if let Some(day) = spec.day_of_week() {
        let n = match dialect {
            Dialect::Unix | Dialect::NCrontab => day.unix_number(),
            Dialect::Quartz => day.quartz_number(),
        };
        return n.to_string();
    }
    match spec.day_pattern() {
        Some(DayPattern::Weekdays) => match dialect {
            Dialect::Unix | Dialect::NCrontab => "1-5".to_string(),
            Dialect::Quartz => "2-6".to_string(),
        },
        Some(DayPattern::Weekends) => match dialect {
            Dialect::Unix | Dialect::NCrontab => "0,6".to_string(),
            Dialect::Quartz => "1,7".to_string(),
        },
        None => "*".to_string(),
    }
}
