//! humancron — a bidirectional schedule codec.
//!
//! Translates compact, human-readable schedules ("every 30 seconds",
//! "every weekday at 2pm", "1d at 2am") into cron expressions for several
//! dialects, and translates those cron expressions back into the canonical
//! human form.
//!
//! # Examples
//!
//! ```
//! use humancron::Dialect;
//!
//! // text -> cron, per dialect
//! assert_eq!(
//!     humancron::to_cron("every weekday at 2pm", "UTC", Some("UTC")).unwrap(),
//!     "0 14 * * 1-5"
//! );
//! assert_eq!(
//!     humancron::to_ncrontab("30m").unwrap(),
//!     "0 */30 * * * *"
//! );
//!
//! // cron -> text
//! assert_eq!(
//!     humancron::to_natural("0 14 * * *", Dialect::Unix).unwrap(),
//!     "every day at 2pm"
//! );
//! ```
//!
//! The parser, formatter and emitters all agree on one intermediate value,
//! [`ScheduleSpec`]. Parsing the formatter's output always reproduces the
//! same string, and recognizing an emitted cron expression reproduces a
//! schedule that emits the same expression.

pub mod cron;
pub mod error;
pub mod format;
pub mod ir;
pub mod lexer;
pub mod lexicon;
pub mod ncrontab;
pub mod parser;
pub mod quartz;
pub mod recognize;
pub mod zone;

pub use error::{ScheduleError, Span};
pub use ir::{Dialect, DayPattern, IntervalUnit, MonthSpecifier, ScheduleSpec, TimeOfDay, Weekday};
pub use parser::ParseOptions;
pub use quartz::{CalendarInterval, QuartzOutput};
pub use zone::{Clock, CronContext, FixedClock, SystemClock, TimeZoneDb, Tzdb};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

impl ScheduleSpec {
    /// Parse a schedule expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use humancron::ScheduleSpec;
    ///
    /// let spec = ScheduleSpec::parse("every weekday at 2pm").unwrap();
    /// assert_eq!(spec.to_string(), "every weekday at 2pm");
    /// ```
    pub fn parse(input: &str) -> Result<Self, ScheduleError> {
        parser::parse(input)
    }

    /// Check whether an input string is a valid schedule expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use humancron::ScheduleSpec;
    ///
    /// assert!(ScheduleSpec::validate("every day at 9am"));
    /// assert!(!ScheduleSpec::validate("not a schedule"));
    /// ```
    pub fn validate(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Lower to a Unix 5-field cron expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use humancron::{CronContext, ScheduleSpec, SystemClock, Tzdb};
    ///
    /// let clock = SystemClock;
    /// let zones = Tzdb;
    /// let ctx = CronContext::new(None, &clock, &zones);
    /// let spec = ScheduleSpec::parse("every sunday at 3am").unwrap();
    /// assert_eq!(spec.to_cron(&ctx).unwrap(), "0 3 * * 0");
    /// ```
    pub fn to_cron(&self, ctx: &CronContext<'_>) -> Result<String, ScheduleError> {
        cron::to_cron(self, ctx)
    }

    /// Lower to a 6-field NCrontab expression.
    pub fn to_ncrontab(&self, ctx: &CronContext<'_>) -> Result<String, ScheduleError> {
        ncrontab::to_ncrontab(self, ctx)
    }

    /// Lower to Quartz output: either a 7-field Quartz cron or a
    /// calendar-interval descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use humancron::{QuartzOutput, ScheduleSpec};
    ///
    /// let spec = ScheduleSpec::parse("every 3 months").unwrap();
    /// assert!(matches!(spec.to_quartz().unwrap(), QuartzOutput::CalendarInterval(_)));
    /// ```
    pub fn to_quartz(&self) -> Result<QuartzOutput, ScheduleError> {
        quartz::to_quartz(self)
    }

    /// Reconstruct the schedule a cron expression was emitted from.
    ///
    /// # Examples
    ///
    /// ```
    /// use humancron::{Dialect, ScheduleSpec};
    ///
    /// let spec = ScheduleSpec::from_cron("0 14 * * 1-5", Dialect::Unix).unwrap();
    /// assert_eq!(spec.to_string(), "every weekday at 2pm");
    /// ```
    pub fn from_cron(expr: &str, dialect: Dialect) -> Result<Self, ScheduleError> {
        recognize::from_cron(expr, dialect)
    }
}

impl FromStr for ScheduleSpec {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Serialization writes the canonical expression string and deserialization
/// parses one; the canonical form is the interchange format.
#[cfg(feature = "serde")]
impl Serialize for ScheduleSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ScheduleSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a schedule expression into a [`ScheduleSpec`].
pub fn parse(input: &str) -> Result<ScheduleSpec, ScheduleError> {
    parser::parse(input)
}

/// Render a schedule in canonical form. Equivalent to `spec.to_string()`.
pub fn format(spec: &ScheduleSpec) -> String {
    spec.to_string()
}

/// Translate a schedule expression into a Unix 5-field cron expression.
///
/// `server_zone` is the zone the cron daemon runs in; `user_zone`, when
/// given, overrides the zone the expression's time of day is interpreted in
/// (otherwise the host zone). Uses the host clock and the bundled IANA
/// database; inject collaborators through [`ScheduleSpec::to_cron`] instead
/// when determinism matters.
pub fn to_cron(
    input: &str,
    server_zone: &str,
    user_zone: Option<&str>,
) -> Result<String, ScheduleError> {
    let options = ParseOptions {
        time_zone: user_zone.map(str::to_string),
    };
    let spec = parser::parse_with(input, &options)?;
    let clock = SystemClock;
    let zones = Tzdb;
    let ctx = CronContext::new(Some(server_zone), &clock, &zones);
    spec.to_cron(&ctx)
}

/// Translate a schedule expression into a 6-field NCrontab expression.
pub fn to_ncrontab(input: &str) -> Result<String, ScheduleError> {
    let spec = parser::parse(input)?;
    let clock = SystemClock;
    let zones = Tzdb;
    let ctx = CronContext::new(None, &clock, &zones);
    spec.to_ncrontab(&ctx)
}

/// Translate a schedule expression into Quartz output.
pub fn to_quartz(input: &str) -> Result<QuartzOutput, ScheduleError> {
    parser::parse(input)?.to_quartz()
}

/// Translate a cron expression back into canonical human form.
pub fn to_natural(expr: &str, dialect: Dialect) -> Result<String, ScheduleError> {
    Ok(recognize::from_cron(expr, dialect)?.to_string())
}
