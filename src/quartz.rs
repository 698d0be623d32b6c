//! Quartz emitter. Point-in-time recurrences become a 7-field Quartz cron;
//! pure intervals cron cannot express become a calendar-interval descriptor
//! for the host scheduler's calendar-interval trigger.

use crate::error::ScheduleError;
use crate::ir::{Dialect, IntervalUnit, ScheduleSpec, TimeOfDay};

/// What the Quartz emitter produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuartzOutput {
    /// `sec min hr dom mon dow year`, weekdays 1=Sunday..7=Saturday. The
    /// schedule's zone travels out-of-band: Quartz triggers take the zone
    /// separately, so the wall-clock fields are never shifted here.
    Cron(String),
    /// A schedule cron cannot express, e.g. "every 3 months" with no time
    /// anchor.
    CalendarInterval(CalendarInterval),
}

/// Inputs for a calendar-interval trigger: fire every `interval` `unit`s,
/// optionally anchored to a start time, evaluated in `time_zone`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarInterval {
    pub interval: u32,
    pub unit: IntervalUnit,
    pub start_time: Option<TimeOfDay>,
    pub time_zone: Option<String>,
}

/// Convert a schedule to Quartz output.
pub fn to_quartz(spec: &ScheduleSpec) -> Result<QuartzOutput, ScheduleError> {
    if wants_calendar_interval(spec) {
        return Ok(QuartzOutput::CalendarInterval(CalendarInterval {
            interval: spec.interval(),
            unit: spec.unit(),
            start_time: spec.time_of_day(),
            time_zone: spec.time_zone().map(str::to_string),
        }));
    }

    let fields = crate::cron::lower(spec, Dialect::Quartz, spec.time_of_day())?;

    // Quartz requires exactly one of dom/dow to be `?`. When both are
    // constrained, day-of-month wins and day-of-week is dropped.
    let (dom, dow) = if fields.day_of_week != "*" && fields.day_of_month == "*" {
        ("?".to_string(), fields.day_of_week)
    } else {
        (fields.day_of_month, "?".to_string())
    };

    Ok(QuartzOutput::Cron(format!(
        "{} {} {} {} {} {} *",
        fields.second, fields.minute, fields.hour, dom, fields.month, dow
    )))
}

/// Pure intervals with no cron rendering: multi-week always, and multi-day /
/// multi-month / multi-year with no anchor at all.
fn wants_calendar_interval(spec: &ScheduleSpec) -> bool {
    if spec.interval() <= 1 {
        return false;
    }
    let day_free = spec.day_of_week().is_none() && spec.day_pattern().is_none();
    let date_free = day_free && spec.day_of_month().is_none() && spec.month().is_none();
    match spec.unit() {
        IntervalUnit::Weeks => day_free,
        IntervalUnit::Days | IntervalUnit::Months | IntervalUnit::Years => {
            date_free && spec.time_of_day().is_none()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn emit(input: &str) -> Result<QuartzOutput, ScheduleError> {
        to_quartz(&parse(input)?)
    }

    fn cron(input: &str) -> String {
        match emit(input).unwrap() {
            QuartzOutput::Cron(s) => s,
            other => panic!("expected Cron, got {other:?}"),
        }
    }

    #[test]
    fn test_daily_cron() {
        assert_eq!(cron("every day at 2pm"), "0 0 14 * * ? *");
        assert_eq!(cron("every day at 09:30"), "0 30 9 * * ? *");
    }

    #[test]
    fn test_weekday_numbering() {
        assert_eq!(cron("every sunday at 3am"), "0 0 3 ? * 1 *");
        assert_eq!(cron("every saturday at 3am"), "0 0 3 ? * 7 *");
        assert_eq!(cron("every weekday at 2pm"), "0 0 14 ? * 2-6 *");
        assert_eq!(cron("every weekend at 2pm"), "0 0 14 ? * 1,7 *");
    }

    #[test]
    fn test_seconds_and_minutes() {
        assert_eq!(cron("every 30 seconds"), "*/30 * * * * ? *");
        assert_eq!(cron("30m"), "0 */30 * * * ? *");
        assert_eq!(cron("every 2 hours"), "0 0 */2 * * ? *");
    }

    #[test]
    fn test_day_of_month_wins_over_day_of_week() {
        // Both constrained: dom is kept, dow becomes ?.
        assert_eq!(
            cron("every month on 15 on friday at 9am"),
            "0 0 9 15 * ? *"
        );
    }

    #[test]
    fn test_monthly_cron() {
        assert_eq!(cron("every month on 15 at 2pm"), "0 0 14 15 * ? *");
        assert_eq!(cron("every 3 months at 9am"), "0 0 9 1 */3 ? *");
        assert_eq!(
            cron("every year on 25 in december at 12am"),
            "0 0 0 25 12 ? *"
        );
    }

    #[test]
    fn test_calendar_interval_for_pure_intervals() {
        match emit("every 3 months").unwrap() {
            QuartzOutput::CalendarInterval(ci) => {
                assert_eq!(ci.interval, 3);
                assert_eq!(ci.unit, IntervalUnit::Months);
                assert_eq!(ci.start_time, None);
            }
            other => panic!("expected CalendarInterval, got {other:?}"),
        }

        match emit("every 2 weeks at 3am").unwrap() {
            QuartzOutput::CalendarInterval(ci) => {
                assert_eq!(ci.interval, 2);
                assert_eq!(ci.unit, IntervalUnit::Weeks);
                assert_eq!(ci.start_time, Some(TimeOfDay { hour: 3, minute: 0 }));
            }
            other => panic!("expected CalendarInterval, got {other:?}"),
        }

        assert!(matches!(
            emit("every 2 days").unwrap(),
            QuartzOutput::CalendarInterval(_)
        ));
    }

    #[test]
    fn test_anchored_multi_day_stays_cron() {
        assert_eq!(cron("every 3 days at 2pm"), "0 0 14 */3 * ? *");
        assert_eq!(cron("every 3 months at 9am"), "0 0 9 1 */3 ? *");
    }

    #[test]
    fn test_multi_week_with_day_filter_rejected() {
        assert!(matches!(
            emit("every 2 weeks on monday at 9am"),
            Err(ScheduleError::UnsupportedByDialect { .. })
        ));
    }

    #[test]
    fn test_anchored_multi_year_rejected() {
        assert!(matches!(
            emit("every 2 years at 9am"),
            Err(ScheduleError::UnsupportedByDialect { .. })
        ));
    }

    #[test]
    fn test_zone_travels_on_calendar_interval() {
        let spec = parse("every 3 months")
            .unwrap()
            .with_time_zone("America/New_York")
            .unwrap();
        match to_quartz(&spec).unwrap() {
            QuartzOutput::CalendarInterval(ci) => {
                assert_eq!(ci.time_zone.as_deref(), Some("America/New_York"));
            }
            other => panic!("expected CalendarInterval, got {other:?}"),
        }
    }
}
