//! Reverse recognizer: cron string → schedule, per dialect.
//!
//! Deliberately narrow. Only the shapes the forward emitters produce are
//! decoded; anything else (minute lists, busy-hour windows, `L`/`W`/`#`
//! extensions) returns [`ScheduleError::NotRoundTrippable`] so callers keep
//! the original string. Per field, recognition tries `*`, then `*/N`, then a
//! single literal, then range, then list. `*/1` reads as `*`.

use crate::error::ScheduleError;
use crate::ir::{DayPattern, Dialect, IntervalUnit, MonthSpecifier, ScheduleSpec, Weekday};

/// One of the simple columns: second, minute, hour or day-of-month.
enum Shape {
    Any,
    Step(u32),
    Value(u32),
}

enum MonthShape {
    Any,
    Step(u32),
    Spec(MonthSpecifier),
}

enum DowShape {
    Any,
    Single(Weekday),
    Pattern(DayPattern),
}

/// Reconstruct the schedule a cron expression was emitted from.
pub fn from_cron(expr: &str, dialect: Dialect) -> Result<ScheduleSpec, ScheduleError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let expected = match dialect {
        Dialect::Unix => 5,
        Dialect::NCrontab => 6,
        Dialect::Quartz => 7,
    };
    if fields.len() != expected {
        return Err(ScheduleError::not_round_trippable(
            dialect,
            format!("count: expected {expected} fields, got {}", fields.len()),
        ));
    }

    let (second, core) = match dialect {
        Dialect::Unix => (None, &fields[0..5]),
        Dialect::NCrontab => (Some(fields[0]), &fields[1..6]),
        Dialect::Quartz => (Some(fields[0]), &fields[1..6]),
    };
    let minute = core[0];
    let hour = core[1];
    let mut dom = core[2];
    let month = core[3];
    let mut dow = core[4];

    if dialect == Dialect::Quartz {
        if fields[6] != "*" {
            return Err(ScheduleError::not_round_trippable(dialect, "year"));
        }
        if dom == "?" {
            dom = "*";
        }
        if dow == "?" {
            dow = "*";
        }
    }

    let rest_wild =
        minute == "*" && hour == "*" && dom == "*" && month == "*" && dow == "*";

    if let Some(second) = second {
        match shape(second, dialect, "second")? {
            Shape::Step(n) => {
                if !rest_wild {
                    return Err(ScheduleError::not_round_trippable(dialect, "second"));
                }
                if 60 % n != 0 {
                    return Err(ScheduleError::not_round_trippable(
                        dialect,
                        format!("second (*/{n} restarts at each minute)"),
                    ));
                }
                return ScheduleSpec::new(n, IntervalUnit::Seconds);
            }
            Shape::Any => {
                if !rest_wild {
                    return Err(ScheduleError::not_round_trippable(dialect, "second"));
                }
                return ScheduleSpec::new(1, IntervalUnit::Seconds);
            }
            Shape::Value(0) => {}
            Shape::Value(_) => {
                return Err(ScheduleError::not_round_trippable(dialect, "second"));
            }
        }
    }

    match shape(minute, dialect, "minute")? {
        Shape::Step(n) => {
            if !(hour == "*" && dom == "*" && month == "*" && dow == "*") {
                return Err(ScheduleError::not_round_trippable(dialect, "minute"));
            }
            if 60 % n != 0 {
                return Err(ScheduleError::not_round_trippable(
                    dialect,
                    format!("minute (*/{n} restarts at each hour)"),
                ));
            }
            ScheduleSpec::new(n, IntervalUnit::Minutes)
        }
        Shape::Any => {
            if !(hour == "*" && dom == "*" && month == "*" && dow == "*") {
                return Err(ScheduleError::not_round_trippable(dialect, "minute"));
            }
            ScheduleSpec::new(1, IntervalUnit::Minutes)
        }
        Shape::Value(m) => {
            if m > 59 {
                return Err(ScheduleError::not_round_trippable(dialect, "minute"));
            }
            let m = m as u8;
            match shape(hour, dialect, "hour")? {
                Shape::Step(n) => {
                    if !(dom == "*" && month == "*" && dow == "*") {
                        return Err(ScheduleError::not_round_trippable(dialect, "hour"));
                    }
                    let spec = ScheduleSpec::new(n, IntervalUnit::Hours)?;
                    if m != 0 {
                        return spec.with_time_of_day(0, m);
                    }
                    Ok(spec)
                }
                // A literal minute against a wildcard hour is an hourly
                // schedule anchored to that minute.
                Shape::Any => {
                    if !(dom == "*" && month == "*" && dow == "*") {
                        return Err(ScheduleError::not_round_trippable(dialect, "hour"));
                    }
                    let spec = ScheduleSpec::new(1, IntervalUnit::Hours)?;
                    if m != 0 {
                        return spec.with_time_of_day(0, m);
                    }
                    Ok(spec)
                }
                Shape::Value(h) => {
                    if h > 23 {
                        return Err(ScheduleError::not_round_trippable(dialect, "hour"));
                    }
                    let dated = dated_spec(
                        shape(dom, dialect, "day-of-month")?,
                        month_shape(month, dialect)?,
                        dow_shape(dow, dialect)?,
                        dialect,
                    )?;
                    dated.with_time_of_day(h as u8, m)
                }
            }
        }
    }
}

/// Pick the calendar unit from the date columns. A literal month field
/// always reads as a month-constrained monthly schedule, never a yearly
/// one: the two emit identical strings, and the monthly reading is the
/// canonical inverse.
fn dated_spec(
    dom: Shape,
    month: MonthShape,
    dow: DowShape,
    dialect: Dialect,
) -> Result<ScheduleSpec, ScheduleError> {
    match month {
        MonthShape::Step(n) => {
            let Shape::Value(day) = dom else {
                return Err(ScheduleError::not_round_trippable(dialect, "day-of-month"));
            };
            let spec = ScheduleSpec::new(n, IntervalUnit::Months)?
                .with_day_of_month(dom_value(day, dialect)?)?;
            apply_dow(spec, dow)
        }
        MonthShape::Spec(months) => {
            let Shape::Value(day) = dom else {
                return Err(ScheduleError::not_round_trippable(dialect, "day-of-month"));
            };
            let spec = ScheduleSpec::new(1, IntervalUnit::Months)?
                .with_day_of_month(dom_value(day, dialect)?)?
                .with_month(months)?;
            apply_dow(spec, dow)
        }
        MonthShape::Any => match dom {
            Shape::Step(n) => {
                if !matches!(dow, DowShape::Any) {
                    return Err(ScheduleError::not_round_trippable(dialect, "day-of-week"));
                }
                ScheduleSpec::new(n, IntervalUnit::Days)
            }
            Shape::Value(day) => {
                let spec = ScheduleSpec::new(1, IntervalUnit::Months)?
                    .with_day_of_month(dom_value(day, dialect)?)?;
                apply_dow(spec, dow)
            }
            Shape::Any => {
                let spec = ScheduleSpec::new(1, IntervalUnit::Days)?;
                apply_dow(spec, dow)
            }
        },
    }
}

fn dom_value(day: u32, dialect: Dialect) -> Result<u8, ScheduleError> {
    if !(1..=31).contains(&day) {
        return Err(ScheduleError::not_round_trippable(dialect, "day-of-month"));
    }
    Ok(day as u8)
}

fn apply_dow(spec: ScheduleSpec, dow: DowShape) -> Result<ScheduleSpec, ScheduleError> {
    match dow {
        DowShape::Any => Ok(spec),
        DowShape::Single(day) => spec.with_day_of_week(day),
        DowShape::Pattern(pattern) => spec.with_day_pattern(pattern),
    }
}

fn shape(field: &str, dialect: Dialect, name: &'static str) -> Result<Shape, ScheduleError> {
    if field == "*" {
        return Ok(Shape::Any);
    }
    if let Some(step) = field.strip_prefix("*/") {
        let n: u32 = step
            .parse()
            .map_err(|_| ScheduleError::not_round_trippable(dialect, name))?;
        return match n {
            0 => Err(ScheduleError::not_round_trippable(dialect, name)),
            1 => Ok(Shape::Any),
            n => Ok(Shape::Step(n)),
        };
    }
    field
        .parse()
        .map(Shape::Value)
        .map_err(|_| ScheduleError::not_round_trippable(dialect, name))
}

fn month_shape(field: &str, dialect: Dialect) -> Result<MonthShape, ScheduleError> {
    match shape(field, dialect, "month") {
        Ok(Shape::Any) => return Ok(MonthShape::Any),
        Ok(Shape::Step(n)) => return Ok(MonthShape::Step(n)),
        Ok(Shape::Value(m)) => {
            return Ok(MonthShape::Spec(MonthSpecifier::Single(month_number(
                m, dialect,
            )?)))
        }
        Err(_) => {}
    }
    if let Some((start, end)) = field.split_once('-') {
        let start = parse_month(start, dialect)?;
        let end = parse_month(end, dialect)?;
        return Ok(MonthShape::Spec(MonthSpecifier::Range(start, end)));
    }
    if field.contains(',') {
        let months = field
            .split(',')
            .map(|part| parse_month(part, dialect))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(MonthShape::Spec(MonthSpecifier::List(months)));
    }
    Err(ScheduleError::not_round_trippable(dialect, "month"))
}

fn parse_month(part: &str, dialect: Dialect) -> Result<u8, ScheduleError> {
    let n: u32 = part
        .parse()
        .map_err(|_| ScheduleError::not_round_trippable(dialect, "month"))?;
    month_number(n, dialect)
}

fn month_number(n: u32, dialect: Dialect) -> Result<u8, ScheduleError> {
    if !(1..=12).contains(&n) {
        return Err(ScheduleError::not_round_trippable(dialect, "month"));
    }
    Ok(n as u8)
}

fn dow_shape(field: &str, dialect: Dialect) -> Result<DowShape, ScheduleError> {
    if field == "*" {
        return Ok(DowShape::Any);
    }
    let (weekdays, weekends) = match dialect {
        Dialect::Unix | Dialect::NCrontab => ("1-5", "0,6"),
        Dialect::Quartz => ("2-6", "1,7"),
    };
    if field == weekdays {
        return Ok(DowShape::Pattern(DayPattern::Weekdays));
    }
    if field == weekends {
        return Ok(DowShape::Pattern(DayPattern::Weekends));
    }
    let n: u8 = field
        .parse()
        .map_err(|_| ScheduleError::not_round_trippable(dialect, "day-of-week"))?;
    let day = match dialect {
        Dialect::Unix | Dialect::NCrontab => Weekday::from_unix_number(n),
        Dialect::Quartz => Weekday::from_quartz_number(n),
    };
    day.map(DowShape::Single)
        .ok_or_else(|| ScheduleError::not_round_trippable(dialect, "day-of-week"))
}
