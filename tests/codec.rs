//! End-to-end codec scenarios across the parser, formatter, emitters and
//! recognizer.

use humancron::{
    CronContext, Dialect, FixedClock, IntervalUnit, QuartzOutput, ScheduleError, ScheduleSpec,
    Tzdb,
};

fn fixed_clock() -> FixedClock {
    FixedClock("2026-01-15T12:00:00Z".parse().unwrap())
}

#[test]
fn scenario_compact_minutes_to_ncrontab() {
    let clock = fixed_clock();
    let zones = Tzdb;
    let ctx = CronContext::new(None, &clock, &zones);
    let spec = ScheduleSpec::parse("30m").unwrap();
    assert_eq!(spec.to_ncrontab(&ctx).unwrap(), "0 */30 * * * *");
}

#[test]
fn scenario_daily_at_2pm_to_cron_utc() {
    assert_eq!(
        humancron::to_cron("1d at 2pm", "UTC", Some("UTC")).unwrap(),
        "0 14 * * *"
    );
}

#[test]
fn scenario_weekday_to_ncrontab() {
    assert_eq!(
        humancron::to_ncrontab("every weekday at 2pm").unwrap(),
        "0 0 14 * * 1-5"
    );
}

#[test]
fn scenario_weekly_sunday_to_cron() {
    assert_eq!(
        humancron::to_cron("1w on sunday at 3am", "UTC", Some("UTC")).unwrap(),
        "0 3 * * 0"
    );
}

#[test]
fn scenario_cron_to_natural() {
    assert_eq!(
        humancron::to_natural("0 14 * * *", Dialect::Unix).unwrap(),
        "every day at 2pm"
    );
}

#[test]
fn scenario_quarterly_to_quartz_calendar_interval() {
    match humancron::to_quartz("every 3 months").unwrap() {
        QuartzOutput::CalendarInterval(interval) => {
            assert_eq!(interval.interval, 3);
            assert_eq!(interval.unit, IntervalUnit::Months);
        }
        other => panic!("expected CalendarInterval, got {other:?}"),
    }
}

#[test]
fn scenario_canonical_form_is_stable() {
    let once = humancron::format(&humancron::parse("every day at 12am").unwrap());
    assert_eq!(once, "every day at 12am");
    let twice = humancron::format(&humancron::parse(&once).unwrap());
    assert_eq!(twice, once);
}

#[test]
fn scenario_ambiguous_suffix_offset() {
    let err = humancron::parse("15pm").unwrap_err();
    assert!(matches!(err, ScheduleError::AmbiguousTimeSuffix { .. }));
    assert_eq!(err.offset(), Some(2));
}

#[test]
fn scenario_day_of_month_with_weeks() {
    let err = humancron::parse("every week on 15").unwrap_err();
    match err {
        ScheduleError::IncompatibleConstraint { reason } => {
            assert_eq!(reason, "day_of_month with weeks");
        }
        other => panic!("expected IncompatibleConstraint, got {other:?}"),
    }
}

#[test]
fn scenario_seconds_unsupported_by_unix() {
    let err = humancron::to_cron("every 30 seconds", "UTC", None).unwrap_err();
    match err {
        ScheduleError::UnsupportedByDialect { dialect, .. } => {
            assert_eq!(dialect, Dialect::Unix);
        }
        other => panic!("expected UnsupportedByDialect, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Cross-cutting round trips
// ---------------------------------------------------------------------------

#[test]
fn cron_strings_survive_a_full_round_trip() {
    let clock = fixed_clock();
    let zones = Tzdb;
    let ctx = CronContext::new(Some("UTC"), &clock, &zones);

    for input in [
        "every minute",
        "30m",
        "every hour",
        "every hour at 00:30",
        "every 2 hours",
        "every day at 2pm",
        "every weekday at 2pm",
        "every weekend at 09:30",
        "every sunday at 3am",
        "every 3 days at 2pm",
        "every month on 15 at 2pm",
        "every 3 months on 1 at 9am",
        "every month on 15 in january at 2pm",
        "every month on 1 between march and june at 9am",
        "every month on 1 in january,april,july at 9am",
    ] {
        let spec = humancron::parse(input).unwrap().with_time_zone("UTC").unwrap();
        let emitted = spec.to_cron(&ctx).unwrap();
        let recovered = ScheduleSpec::from_cron(&emitted, Dialect::Unix)
            .unwrap()
            .with_time_zone("UTC")
            .unwrap();
        let re_emitted = recovered.to_cron(&ctx).unwrap();
        assert_eq!(re_emitted, emitted, "{input} drifted through the recognizer");
    }
}

#[test]
fn quartz_cron_strings_survive_a_full_round_trip() {
    for input in [
        "every 30 seconds",
        "30m",
        "every day at 2pm",
        "every weekday at 2pm",
        "every sunday at 3am",
        "every month on 15 at 2pm",
    ] {
        let spec = humancron::parse(input).unwrap();
        let QuartzOutput::Cron(emitted) = spec.to_quartz().unwrap() else {
            panic!("{input} should emit a Quartz cron");
        };
        let recovered = ScheduleSpec::from_cron(&emitted, Dialect::Quartz).unwrap();
        let QuartzOutput::Cron(re_emitted) = recovered.to_quartz().unwrap() else {
            panic!("{input} recognizer output should emit a Quartz cron");
        };
        assert_eq!(re_emitted, emitted, "{input} drifted through the recognizer");
    }
}

#[test]
fn natural_round_trip_is_idempotent_for_recognized_cron() {
    for (expr, dialect) in [
        ("0 14 * * *", Dialect::Unix),
        ("*/30 * * * *", Dialect::Unix),
        ("0 0 14 * * 1-5", Dialect::NCrontab),
        ("0 0 3 ? * 1 *", Dialect::Quartz),
    ] {
        let natural = humancron::to_natural(expr, dialect).unwrap();
        let reparsed = humancron::format(&humancron::parse(&natural).unwrap());
        assert_eq!(reparsed, natural);
    }
}

#[test]
fn dst_gap_fails_conversion() {
    let clock = FixedClock("2026-03-08T17:00:00Z".parse().unwrap());
    let zones = Tzdb;
    let ctx = CronContext::new(Some("UTC"), &clock, &zones);
    let spec = humancron::parse("every day at 2:30am")
        .unwrap()
        .with_time_zone("America/New_York")
        .unwrap();
    let err = spec.to_cron(&ctx).unwrap_err();
    assert!(matches!(err, ScheduleError::AmbiguousLocalTime { .. }));
}

#[test]
fn conversion_is_deterministic_under_a_fixed_clock() {
    let clock = fixed_clock();
    let zones = Tzdb;
    let ctx = CronContext::new(Some("UTC"), &clock, &zones);
    let spec = humancron::parse("every day at 2pm")
        .unwrap()
        .with_time_zone("Asia/Kolkata")
        .unwrap();
    let first = spec.to_cron(&ctx).unwrap();
    let second = spec.to_cron(&ctx).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "30 8 * * *");
}
