use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScheduleError;
use crate::lexicon;

/// A cron grammar a schedule can be lowered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dialect {
    /// 5-field `min hr dom mon dow`, weekdays numbered 0=Sunday..6=Saturday.
    Unix,
    /// 6-field with a leading seconds column, otherwise as Unix.
    NCrontab,
    /// 7-field `sec min hr dom mon dow year`, weekdays 1=Sunday..7=Saturday.
    Quartz,
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unix => "unix",
            Self::NCrontab => "ncrontab",
            Self::Quartz => "quartz",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unix" | "cron" => Ok(Self::Unix),
            "ncrontab" => Ok(Self::NCrontab),
            "quartz" => Ok(Self::Quartz),
            _ => Err(format!("unknown dialect '{s}'")),
        }
    }
}

/// Interval unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IntervalUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl IntervalUnit {
    pub fn singular(self) -> &'static str {
        match self {
            Self::Seconds => "second",
            Self::Minutes => "minute",
            Self::Hours => "hour",
            Self::Days => "day",
            Self::Weeks => "week",
            Self::Months => "month",
            Self::Years => "year",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    /// True for units that repeat at least daily.
    pub fn is_calendar(self) -> bool {
        matches!(self, Self::Days | Self::Weeks | Self::Months | Self::Years)
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// Weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Unix cron numbering: 0=Sunday..6=Saturday.
    pub fn unix_number(self) -> u8 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    /// Quartz numbering: 1=Sunday..7=Saturday.
    pub fn quartz_number(self) -> u8 {
        self.unix_number() + 1
    }

    pub fn from_unix_number(n: u8) -> Option<Self> {
        match n {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }

    pub fn from_quartz_number(n: u8) -> Option<Self> {
        match n {
            1..=7 => Self::from_unix_number(n - 1),
            _ => None,
        }
    }
}

/// A weekday class constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DayPattern {
    Weekdays,
    Weekends,
}

/// Month constraint. Closed set of shapes; months are numbered 1..=12.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MonthSpecifier {
    #[default]
    None,
    Single(u8),
    Range(u8, u8),
    List(Vec<u8>),
}

impl MonthSpecifier {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Time of day (hours and minutes). Schedules never carry seconds; sub-minute
/// granularity is expressed through `IntervalUnit::Seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[cfg(feature = "serde")]
impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| serde::de::Error::custom("expected HH:MM"))?;
        let hour = h
            .parse()
            .map_err(|_| serde::de::Error::custom("invalid hour"))?;
        let minute = m
            .parse()
            .map_err(|_| serde::de::Error::custom("invalid minute"))?;
        if hour > 23 || minute > 59 {
            return Err(serde::de::Error::custom("time out of range"));
        }
        Ok(TimeOfDay { hour, minute })
    }
}

/// An immutable schedule: how often something repeats, plus optional day,
/// month and time-of-day constraints.
///
/// Constructed by [`ScheduleSpec::new`] and refined through the `with_*`
/// updaters, each of which returns a new value and re-checks every
/// invariant. Fields are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSpec {
    interval: u32,
    unit: IntervalUnit,
    day_of_week: Option<Weekday>,
    day_pattern: Option<DayPattern>,
    day_of_month: Option<u8>,
    month: MonthSpecifier,
    time_of_day: Option<TimeOfDay>,
    time_zone: Option<String>,
}

impl ScheduleSpec {
    /// Create a schedule that repeats every `interval` `unit`s.
    pub fn new(interval: u32, unit: IntervalUnit) -> Result<Self, ScheduleError> {
        Self {
            interval,
            unit,
            day_of_week: None,
            day_pattern: None,
            day_of_month: None,
            month: MonthSpecifier::None,
            time_of_day: None,
            time_zone: None,
        }
        .validated()
    }

    /// Constrain to one weekday. Replaces any weekday class already set.
    pub fn with_day_of_week(mut self, day: Weekday) -> Result<Self, ScheduleError> {
        self.day_of_week = Some(day);
        self.day_pattern = None;
        self.validated()
    }

    /// Constrain to a weekday class. Replaces any specific weekday already set.
    pub fn with_day_pattern(mut self, pattern: DayPattern) -> Result<Self, ScheduleError> {
        self.day_pattern = Some(pattern);
        self.day_of_week = None;
        self.validated()
    }

    /// Constrain to a day of the month (1..=31).
    pub fn with_day_of_month(mut self, day: u8) -> Result<Self, ScheduleError> {
        self.day_of_month = Some(day);
        self.validated()
    }

    /// Constrain to a month, month range, or month list.
    pub fn with_month(mut self, month: MonthSpecifier) -> Result<Self, ScheduleError> {
        self.month = month;
        self.validated()
    }

    /// Fire at this wall-clock time.
    pub fn with_time_of_day(mut self, hour: u8, minute: u8) -> Result<Self, ScheduleError> {
        self.time_of_day = Some(TimeOfDay { hour, minute });
        self.validated()
    }

    /// Interpret the time of day in this IANA zone instead of the host zone.
    pub fn with_time_zone(mut self, id: &str) -> Result<Self, ScheduleError> {
        if id.trim().is_empty() {
            return Err(ScheduleError::invalid_schedule("time zone id is empty"));
        }
        self.time_zone = Some(id.to_string());
        self.validated()
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn unit(&self) -> IntervalUnit {
        self.unit
    }

    pub fn day_of_week(&self) -> Option<Weekday> {
        self.day_of_week
    }

    pub fn day_pattern(&self) -> Option<DayPattern> {
        self.day_pattern
    }

    pub fn day_of_month(&self) -> Option<u8> {
        self.day_of_month
    }

    pub fn month(&self) -> &MonthSpecifier {
        &self.month
    }

    pub fn time_of_day(&self) -> Option<TimeOfDay> {
        self.time_of_day
    }

    pub fn time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }

    fn validated(self) -> Result<Self, ScheduleError> {
        self.check()?;
        Ok(self)
    }

    fn check(&self) -> Result<(), ScheduleError> {
        if self.interval < 1 {
            return Err(ScheduleError::invalid_schedule("interval must be at least 1"));
        }

        if self.day_of_week.is_some() && self.day_pattern.is_some() {
            return Err(ScheduleError::invalid_schedule(
                "day_of_week and day_pattern are mutually exclusive",
            ));
        }

        if (self.day_of_week.is_some() || self.day_pattern.is_some()) && !self.unit.is_calendar() {
            return Err(ScheduleError::incompatible(format!(
                "day_of_week with {}",
                self.unit.plural()
            )));
        }

        if let Some(day) = self.day_of_month {
            if !(1..=31).contains(&day) {
                return Err(ScheduleError::invalid_schedule(format!(
                    "day_of_month {day} is outside 1..=31"
                )));
            }
            if !matches!(self.unit, IntervalUnit::Months | IntervalUnit::Years) {
                return Err(ScheduleError::incompatible(format!(
                    "day_of_month with {}",
                    self.unit.plural()
                )));
            }
        }

        if !self.month.is_none() && !matches!(self.unit, IntervalUnit::Months | IntervalUnit::Years)
        {
            return Err(ScheduleError::incompatible(format!(
                "month constraint with {}",
                self.unit.plural()
            )));
        }
        self.check_month()?;

        if let Some(time) = self.time_of_day {
            if time.hour > 23 {
                return Err(ScheduleError::invalid_schedule(format!(
                    "hour {} is outside 0..=23",
                    time.hour
                )));
            }
            if time.minute > 59 {
                return Err(ScheduleError::invalid_schedule(format!(
                    "minute {} is outside 0..=59",
                    time.minute
                )));
            }
            if matches!(self.unit, IntervalUnit::Seconds | IntervalUnit::Minutes) {
                return Err(ScheduleError::incompatible(format!(
                    "time_of_day with {}",
                    self.unit.plural()
                )));
            }
        }

        Ok(())
    }

    fn check_month(&self) -> Result<(), ScheduleError> {
        let valid = |m: u8| (1..=12).contains(&m);
        match &self.month {
            MonthSpecifier::None => {}
            MonthSpecifier::Single(m) => {
                if !valid(*m) {
                    return Err(ScheduleError::invalid_schedule(format!(
                        "month {m} is outside 1..=12"
                    )));
                }
            }
            MonthSpecifier::Range(start, end) => {
                if !valid(*start) || !valid(*end) {
                    return Err(ScheduleError::invalid_schedule(
                        "month range bounds must be 1..=12",
                    ));
                }
                if start > end {
                    return Err(ScheduleError::invalid_schedule(format!(
                        "month range start {} is after end {}",
                        lexicon::month_name(*start),
                        lexicon::month_name(*end)
                    )));
                }
            }
            MonthSpecifier::List(months) => {
                if months.is_empty() {
                    return Err(ScheduleError::invalid_schedule("month list is empty"));
                }
                for (i, m) in months.iter().enumerate() {
                    if !valid(*m) {
                        return Err(ScheduleError::invalid_schedule(format!(
                            "month {m} is outside 1..=12"
                        )));
                    }
                    if months[..i].contains(m) {
                        return Err(ScheduleError::invalid_schedule(format!(
                            "month list repeats {}",
                            lexicon::month_name(*m)
                        )));
                    }
                }
            }
        }

        // A day-of-month that can never occur under the month constraint is
        // rejected up front; days the dialects merely skip in short months
        // (e.g. 31 with no month constraint) are kept.
        if let Some(day) = self.day_of_month {
            let cap = match &self.month {
                MonthSpecifier::None => 31,
                MonthSpecifier::Single(m) => max_days_in_month(*m),
                MonthSpecifier::Range(start, end) => (*start..=*end)
                    .map(max_days_in_month)
                    .max()
                    .unwrap_or(31),
                MonthSpecifier::List(months) => months
                    .iter()
                    .map(|m| max_days_in_month(*m))
                    .max()
                    .unwrap_or(31),
            };
            if day > cap {
                return Err(ScheduleError::invalid_schedule(format!(
                    "day_of_month {day} can never occur under the month constraint"
                )));
            }
        }

        Ok(())
    }
}

/// Longest length a month can have (leap years included).
fn max_days_in_month(month: u8) -> u8 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}
