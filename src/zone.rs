//! Injected clock and time-zone collaborators.
//!
//! The codec itself never reads the host clock or the environment; everything
//! time-related flows through [`Clock`] and [`TimeZoneDb`]. With a fixed
//! clock the same input always produces the same output.

use jiff::civil::{Date, Time};
use jiff::tz::{Offset, TimeZone};
use jiff::Timestamp;

use crate::error::ScheduleError;
use crate::ir::{ScheduleSpec, TimeOfDay};

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Reads the host clock. The only place the process time is consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock pinned to one instant, for deterministic conversions.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

pub trait TimeZoneDb {
    fn system_default(&self) -> TimeZone;

    fn by_id(&self, id: &str) -> Option<TimeZone>;

    /// Offset from UTC, in minutes, for a wall-clock time in `zone` on
    /// `date`. Fails with [`ScheduleError::AmbiguousLocalTime`] when the
    /// local time falls in a DST gap or fold.
    fn convert_local(
        &self,
        zone: &TimeZone,
        date: Date,
        hour: u8,
        minute: u8,
    ) -> Result<i32, ScheduleError>;
}

/// The IANA database bundled with jiff.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tzdb;

impl TimeZoneDb for Tzdb {
    fn system_default(&self) -> TimeZone {
        TimeZone::system()
    }

    fn by_id(&self, id: &str) -> Option<TimeZone> {
        TimeZone::get(id).ok()
    }

    fn convert_local(
        &self,
        zone: &TimeZone,
        date: Date,
        hour: u8,
        minute: u8,
    ) -> Result<i32, ScheduleError> {
        let time = Time::new(hour as i8, minute as i8, 0, 0)
            .map_err(|e| ScheduleError::invalid_schedule(format!("invalid wall-clock time: {e}")))?;
        let dt = date.to_datetime(time);
        let zoned = zone
            .to_ambiguous_zoned(dt)
            .unambiguous()
            .map_err(|_| ScheduleError::ambiguous_local_time(zone_id(zone), dt.to_string()))?;
        Ok(zoned.offset().seconds() / 60)
    }
}

fn zone_id(zone: &TimeZone) -> String {
    zone.iana_name().unwrap_or("fixed-offset").to_string()
}

/// Caller-configured environment for the Unix and NCrontab emitters: the
/// zone the cron daemon runs in, plus the injected collaborators.
pub struct CronContext<'a> {
    /// Zone the emitted cron string is evaluated in. `None` means the host
    /// zone.
    pub server_zone: Option<&'a str>,
    pub clock: &'a dyn Clock,
    pub zones: &'a dyn TimeZoneDb,
}

impl<'a> CronContext<'a> {
    pub fn new(
        server_zone: Option<&'a str>,
        clock: &'a dyn Clock,
        zones: &'a dyn TimeZoneDb,
    ) -> Self {
        Self {
            server_zone,
            clock,
            zones,
        }
    }
}

/// Resolve a schedule's time of day into the server zone, using the offsets
/// in effect at the clock's reference instant.
pub(crate) fn resolve_time_of_day(
    spec: &ScheduleSpec,
    ctx: &CronContext<'_>,
) -> Result<Option<TimeOfDay>, ScheduleError> {
    let Some(time) = spec.time_of_day() else {
        return Ok(None);
    };
    let user = match spec.time_zone() {
        Some(id) => lookup(ctx, id)?,
        None => ctx.zones.system_default(),
    };
    let server = match ctx.server_zone {
        Some(id) => lookup(ctx, id)?,
        None => ctx.zones.system_default(),
    };
    if user.iana_name() == server.iana_name() {
        return Ok(Some(time));
    }
    convert_time_of_day(time, &user, &server, ctx.clock, ctx.zones).map(Some)
}

fn lookup(ctx: &CronContext<'_>, id: &str) -> Result<TimeZone, ScheduleError> {
    ctx.zones
        .by_id(id)
        .ok_or_else(|| ScheduleError::invalid_schedule(format!("unknown time zone '{id}'")))
}

/// Shift a wall-clock time from `user` into `server`, anchored to the date
/// the clock reports in the user zone.
pub fn convert_time_of_day(
    time: TimeOfDay,
    user: &TimeZone,
    server: &TimeZone,
    clock: &dyn Clock,
    zones: &dyn TimeZoneDb,
) -> Result<TimeOfDay, ScheduleError> {
    let reference = clock.now().to_zoned(user.clone());
    let date = reference.date();

    let offset_minutes = zones.convert_local(user, date, time.hour, time.minute)?;
    let offset = Offset::from_seconds(offset_minutes * 60)
        .map_err(|e| ScheduleError::invalid_schedule(format!("zone offset out of range: {e}")))?;
    let wall = Time::new(time.hour as i8, time.minute as i8, 0, 0)
        .map_err(|e| ScheduleError::invalid_schedule(format!("invalid wall-clock time: {e}")))?;
    let instant = date
        .to_datetime(wall)
        .to_zoned(TimeZone::fixed(offset))
        .map_err(|e| ScheduleError::invalid_schedule(format!("cannot anchor wall-clock time: {e}")))?
        .timestamp();

    let local = instant.to_zoned(server.clone());
    Ok(TimeOfDay {
        hour: local.hour() as u8,
        minute: local.minute() as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(instant: &str) -> FixedClock {
        FixedClock(instant.parse().unwrap())
    }

    fn zone(id: &str) -> TimeZone {
        Tzdb.by_id(id).unwrap()
    }

    #[test]
    fn test_convert_winter_new_york_to_utc() {
        let clock = clock_at("2026-01-15T12:00:00Z");
        let time = TimeOfDay { hour: 14, minute: 0 };
        let out = convert_time_of_day(
            time,
            &zone("America/New_York"),
            &zone("UTC"),
            &clock,
            &Tzdb,
        )
        .unwrap();
        assert_eq!(out, TimeOfDay { hour: 19, minute: 0 });
    }

    #[test]
    fn test_convert_half_hour_zone() {
        let clock = clock_at("2026-01-15T12:00:00Z");
        let time = TimeOfDay { hour: 14, minute: 0 };
        let out =
            convert_time_of_day(time, &zone("Asia/Kolkata"), &zone("UTC"), &clock, &Tzdb).unwrap();
        assert_eq!(out, TimeOfDay { hour: 8, minute: 30 });
    }

    #[test]
    fn test_convert_wraps_across_midnight() {
        let clock = clock_at("2026-01-15T12:00:00Z");
        let time = TimeOfDay { hour: 1, minute: 0 };
        let out =
            convert_time_of_day(time, &zone("Asia/Tokyo"), &zone("UTC"), &clock, &Tzdb).unwrap();
        assert_eq!(out, TimeOfDay { hour: 16, minute: 0 });
    }

    #[test]
    fn test_dst_gap_is_rejected() {
        // 2026-03-08 02:30 does not exist in America/New_York.
        let clock = clock_at("2026-03-08T17:00:00Z");
        let time = TimeOfDay { hour: 2, minute: 30 };
        let err = convert_time_of_day(
            time,
            &zone("America/New_York"),
            &zone("UTC"),
            &clock,
            &Tzdb,
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::AmbiguousLocalTime { .. }));
    }

    #[test]
    fn test_determinism_under_fixed_clock() {
        let clock = clock_at("2026-06-01T00:00:00Z");
        let time = TimeOfDay { hour: 9, minute: 15 };
        let a = convert_time_of_day(
            time,
            &zone("Europe/Berlin"),
            &zone("America/Chicago"),
            &clock,
            &Tzdb,
        )
        .unwrap();
        let b = convert_time_of_day(
            time,
            &zone("Europe/Berlin"),
            &zone("America/Chicago"),
            &clock,
            &Tzdb,
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
