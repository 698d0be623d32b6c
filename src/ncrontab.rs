//! NCrontab 6-field emitter: a seconds column in front of the Unix fields.

use crate::error::ScheduleError;
use crate::ir::{Dialect, ScheduleSpec};
use crate::zone::{self, CronContext};

/// Convert a schedule to a 6-field NCrontab expression
/// (`sec min hr dom mon dow`).
pub fn to_ncrontab(spec: &ScheduleSpec, ctx: &CronContext<'_>) -> Result<String, ScheduleError> {
    let time = zone::resolve_time_of_day(spec, ctx)?;
    let fields = crate::cron::lower(spec, Dialect::NCrontab, time)?;
    Ok(format!(
        "{} {} {} {} {} {}",
        fields.second,
        fields.minute,
        fields.hour,
        fields.day_of_month,
        fields.month,
        fields.day_of_week
    ))
}
