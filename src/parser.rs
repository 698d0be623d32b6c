// Recursive descent over the token stream. Constraints accumulate into
// per-axis records and collapse into a ScheduleSpec once every token is
// consumed; among mutually exclusive constraints the last one read wins.

use crate::error::{ScheduleError, Span};
use crate::ir::{DayPattern, IntervalUnit, MonthSpecifier, ScheduleSpec, TimeOfDay, Weekday};
use crate::lexer::{Lexer, Meridiem, Token, TokenKind};

/// Options applied while collapsing tokens into a schedule.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// IANA zone the time of day is interpreted in. Defaults to the host zone.
    pub time_zone: Option<String>,
}

/// Day-axis constraints gathered during parsing.
#[derive(Debug, Default)]
struct DayConstraints {
    of_week: Option<Weekday>,
    pattern: Option<DayPattern>,
    of_month: Option<u8>,
}

/// Month-axis constraints gathered during parsing.
#[derive(Debug, Default)]
struct MonthConstraints {
    spec: MonthSpecifier,
}

/// Time-axis constraints gathered during parsing.
#[derive(Debug, Default)]
struct TimeConstraints {
    time_of_day: Option<TimeOfDay>,
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    input: &'a str,
    interval: u32,
    unit: IntervalUnit,
    days: DayConstraints,
    months: MonthConstraints,
    times: TimeConstraints,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], input: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            input,
            interval: 1,
            unit: IntervalUnit::Days,
            days: DayConstraints::default(),
            months: MonthConstraints::default(),
            times: TimeConstraints::default(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn end_span(&self) -> Span {
        match self.tokens.last() {
            Some(last) => Span::new(last.span.end, last.span.end),
            None => Span::new(0, 0),
        }
    }

    /// Error for a token the grammar does not allow here (or end of input).
    fn unexpected(&self) -> ScheduleError {
        match self.peek() {
            Some(tok) => ScheduleError::unknown_token(
                tok.span,
                self.input[tok.span.start..tok.span.end].to_string(),
            ),
            None => ScheduleError::unknown_token(self.end_span(), ""),
        }
    }

    // schedule := "every"? interval unit constraints*
    fn parse_head(&mut self) -> Result<(), ScheduleError> {
        while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Every)) {
            self.advance();
        }

        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Number(n)) => {
                let span = self.peek().map(|t| t.span).unwrap_or_else(|| self.end_span());
                self.advance();
                // `15pm` and friends: a bare suffixed hour is a time, not an
                // interval, and gets the time diagnostics.
                if let Some(TokenKind::Meridiem(meridiem)) = self.peek().map(|t| t.kind.clone()) {
                    let suffix_span = self.peek().map(|t| t.span).unwrap_or(span);
                    self.advance();
                    suffixed_hour(n, meridiem, suffix_span)?;
                    return Err(ScheduleError::incompatible(
                        "time of day without an interval unit",
                    ));
                }
                if n == 0 {
                    return Err(ScheduleError::out_of_range(span, "interval", 0, 1, u32::MAX));
                }
                match self.peek().map(|t| t.kind.clone()) {
                    Some(TokenKind::Unit(unit)) => {
                        self.advance();
                        self.interval = n;
                        self.unit = unit;
                        Ok(())
                    }
                    _ => Err(self.unexpected()),
                }
            }
            Some(TokenKind::Unit(unit)) => {
                self.advance();
                self.interval = 1;
                self.unit = unit;
                Ok(())
            }
            // "every monday", "every weekday": the day word implies a daily
            // unit and carries the constraint.
            Some(TokenKind::DayName(day)) => {
                self.advance();
                self.interval = 1;
                self.unit = IntervalUnit::Days;
                self.days.of_week = Some(day);
                Ok(())
            }
            Some(TokenKind::DayClass(pattern)) => {
                self.advance();
                self.interval = 1;
                self.unit = IntervalUnit::Days;
                self.days.pattern = Some(pattern);
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    // constraints := day-constraint | month-constraint | time-constraint
    fn parse_constraint(&mut self) -> Result<(), ScheduleError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Every) => {
                self.advance();
                Ok(())
            }
            Some(TokenKind::On) => {
                self.advance();
                self.parse_day_constraint()
            }
            Some(TokenKind::In) => {
                self.advance();
                self.parse_month_spec()
            }
            Some(TokenKind::Between) => {
                self.advance();
                self.parse_month_between()
            }
            Some(TokenKind::At) => {
                self.advance();
                let time = self.parse_time()?;
                self.times.time_of_day = Some(time);
                Ok(())
            }
            Some(TokenKind::DayName(_))
            | Some(TokenKind::DayClass(_))
            | Some(TokenKind::Number(_))
            | Some(TokenKind::OrdinalNumber(_)) => self.parse_day_constraint(),
            Some(TokenKind::MonthName(_)) => self.parse_month_spec(),
            _ => Err(self.unexpected()),
        }
    }

    // day-constraint := "on"? ( weekday | "weekday" | "weekend" | day-of-month )
    fn parse_day_constraint(&mut self) -> Result<(), ScheduleError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::DayName(day)) => {
                self.advance();
                self.days.of_week = Some(day);
                self.days.pattern = None;
                Ok(())
            }
            Some(TokenKind::DayClass(pattern)) => {
                self.advance();
                self.days.pattern = Some(pattern);
                self.days.of_week = None;
                Ok(())
            }
            Some(TokenKind::Number(n)) | Some(TokenKind::OrdinalNumber(n)) => {
                let span = self.peek().map(|t| t.span).unwrap_or_else(|| self.end_span());
                self.advance();
                if !(1..=31).contains(&n) {
                    return Err(ScheduleError::out_of_range(span, "day of month", n, 1, 31));
                }
                self.days.of_month = Some(n as u8);
                Ok(())
            }
            _ => Err(self.unexpected()),
        }
    }

    // month-constraint := "in" month ("," month)* | "in" month "-"/"through" month
    fn parse_month_spec(&mut self) -> Result<(), ScheduleError> {
        let first = self.expect_month()?;
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Through) => {
                self.advance();
                let end = self.expect_month()?;
                self.months.spec = MonthSpecifier::Range(first, end);
            }
            Some(TokenKind::Comma) => {
                let mut list = vec![first];
                while matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Comma)) {
                    self.advance();
                    let month = self.expect_month()?;
                    if !list.contains(&month) {
                        list.push(month);
                    }
                }
                self.months.spec = if list.len() == 1 {
                    MonthSpecifier::Single(list[0])
                } else {
                    MonthSpecifier::List(list)
                };
            }
            _ => {
                self.months.spec = MonthSpecifier::Single(first);
            }
        }
        Ok(())
    }

    // month-constraint := "between" month "and" month
    fn parse_month_between(&mut self) -> Result<(), ScheduleError> {
        let start = self.expect_month()?;
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::And) => {
                self.advance();
            }
            _ => return Err(self.unexpected()),
        }
        let end = self.expect_month()?;
        self.months.spec = MonthSpecifier::Range(start, end);
        Ok(())
    }

    fn expect_month(&mut self) -> Result<u8, ScheduleError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::MonthName(month)) => {
                self.advance();
                Ok(month)
            }
            _ => Err(self.unexpected()),
        }
    }

    // time := H (":" MM)? ("am"|"pm")? | "noon" | "midnight"
    fn parse_time(&mut self) -> Result<TimeOfDay, ScheduleError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Noon) => {
                self.advance();
                Ok(TimeOfDay { hour: 12, minute: 0 })
            }
            Some(TokenKind::Midnight) => {
                self.advance();
                Ok(TimeOfDay { hour: 0, minute: 0 })
            }
            Some(TokenKind::Time(hour, minute)) => {
                self.advance();
                if let Some(TokenKind::Meridiem(meridiem)) = self.peek().map(|t| t.kind.clone()) {
                    let span = self.peek().map(|t| t.span).unwrap_or_else(|| self.end_span());
                    self.advance();
                    let hour = suffixed_hour(u32::from(hour), meridiem, span)?;
                    return Ok(TimeOfDay { hour, minute });
                }
                Ok(TimeOfDay { hour, minute })
            }
            Some(TokenKind::Number(n)) => {
                let span = self.peek().map(|t| t.span).unwrap_or_else(|| self.end_span());
                self.advance();
                if let Some(TokenKind::Meridiem(meridiem)) = self.peek().map(|t| t.kind.clone()) {
                    let suffix_span = self.peek().map(|t| t.span).unwrap_or(span);
                    self.advance();
                    let hour = suffixed_hour(n, meridiem, suffix_span)?;
                    return Ok(TimeOfDay { hour, minute: 0 });
                }
                if n > 23 {
                    return Err(ScheduleError::out_of_range(span, "hour", n, 0, 23));
                }
                Ok(TimeOfDay {
                    hour: n as u8,
                    minute: 0,
                })
            }
            _ => Err(self.unexpected()),
        }
    }

    fn collapse(self, options: &ParseOptions) -> Result<ScheduleSpec, ScheduleError> {
        let mut spec = ScheduleSpec::new(self.interval, self.unit)?;
        if let Some(day) = self.days.of_week {
            spec = spec.with_day_of_week(day)?;
        }
        if let Some(pattern) = self.days.pattern {
            spec = spec.with_day_pattern(pattern)?;
        }
        if let Some(day) = self.days.of_month {
            spec = spec.with_day_of_month(day)?;
        }
        if !self.months.spec.is_none() {
            spec = spec.with_month(self.months.spec.clone())?;
        }
        if let Some(time) = self.times.time_of_day {
            spec = spec.with_time_of_day(time.hour, time.minute)?;
        }
        if let Some(zone) = &options.time_zone {
            spec = spec.with_time_zone(zone)?;
        }
        Ok(spec)
    }
}

/// Resolve a 12-hour clock hour against its am/pm suffix.
fn suffixed_hour(hour: u32, meridiem: Meridiem, span: Span) -> Result<u8, ScheduleError> {
    if !(1..=12).contains(&hour) {
        return Err(ScheduleError::ambiguous_suffix(span));
    }
    let hour = hour as u8;
    Ok(match meridiem {
        Meridiem::Am => {
            if hour == 12 {
                0
            } else {
                hour
            }
        }
        Meridiem::Pm => {
            if hour == 12 {
                12
            } else {
                hour + 12
            }
        }
    })
}

/// Parse a schedule expression into a [`ScheduleSpec`].
pub fn parse(input: &str) -> Result<ScheduleSpec, ScheduleError> {
    parse_with(input, &ParseOptions::default())
}

/// Parse with explicit options.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<ScheduleSpec, ScheduleError> {
    if input.trim().is_empty() {
        return Err(ScheduleError::EmptyInput);
    }
    let tokens = Lexer::new(input).tokenize()?;
    if tokens.is_empty() {
        return Err(ScheduleError::EmptyInput);
    }
    let mut parser = Parser::new(&tokens, input);
    parser.parse_head()?;
    while parser.peek().is_some() {
        parser.parse_constraint()?;
    }
    parser.collapse(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_day() {
        let spec = parse("every day").unwrap();
        assert_eq!(spec.interval(), 1);
        assert_eq!(spec.unit(), IntervalUnit::Days);
        assert_eq!(spec.time_of_day(), None);
    }

    #[test]
    fn test_parse_compact_forms() {
        let spec = parse("30m").unwrap();
        assert_eq!(spec.interval(), 30);
        assert_eq!(spec.unit(), IntervalUnit::Minutes);

        let spec = parse("1d at 2am").unwrap();
        assert_eq!(spec.unit(), IntervalUnit::Days);
        assert_eq!(spec.time_of_day(), Some(TimeOfDay { hour: 2, minute: 0 }));

        let spec = parse("1w on sunday at 3am").unwrap();
        assert_eq!(spec.unit(), IntervalUnit::Weeks);
        assert_eq!(spec.day_of_week(), Some(Weekday::Sunday));
        assert_eq!(spec.time_of_day(), Some(TimeOfDay { hour: 3, minute: 0 }));
    }

    #[test]
    fn test_parse_short_unit_casing() {
        assert_eq!(parse("3m").unwrap().unit(), IntervalUnit::Minutes);
        assert_eq!(parse("3M").unwrap().unit(), IntervalUnit::Months);
    }

    #[test]
    fn test_parse_day_word_implies_daily() {
        let spec = parse("every monday at 9am").unwrap();
        assert_eq!(spec.unit(), IntervalUnit::Days);
        assert_eq!(spec.interval(), 1);
        assert_eq!(spec.day_of_week(), Some(Weekday::Monday));

        let spec = parse("every weekday at 2pm").unwrap();
        assert_eq!(spec.day_pattern(), Some(DayPattern::Weekdays));
        assert_eq!(spec.time_of_day(), Some(TimeOfDay { hour: 14, minute: 0 }));
    }

    #[test]
    fn test_last_wins_between_weekday_and_pattern() {
        let spec = parse("every day on weekdays on monday at 9am").unwrap();
        assert_eq!(spec.day_of_week(), Some(Weekday::Monday));
        assert_eq!(spec.day_pattern(), None);

        let spec = parse("every day on monday on weekdays at 9am").unwrap();
        assert_eq!(spec.day_of_week(), None);
        assert_eq!(spec.day_pattern(), Some(DayPattern::Weekdays));
    }

    #[test]
    fn test_last_wins_for_times() {
        let spec = parse("every day at 9am at 5pm").unwrap();
        assert_eq!(spec.time_of_day(), Some(TimeOfDay { hour: 17, minute: 0 }));
    }

    #[test]
    fn test_parse_day_of_month() {
        let spec = parse("every month on 15 at 2pm").unwrap();
        assert_eq!(spec.day_of_month(), Some(15));

        let spec = parse("every month on the15th").map(|_| ());
        assert!(spec.is_err(), "'the15th' is not a token");

        let spec = parse("every month on 15th at 2pm").unwrap();
        assert_eq!(spec.day_of_month(), Some(15));
    }

    #[test]
    fn test_parse_day_of_month_wrong_unit() {
        let err = parse("every week on 15").unwrap_err();
        match err {
            ScheduleError::IncompatibleConstraint { reason } => {
                assert_eq!(reason, "day_of_month with weeks");
            }
            other => panic!("expected IncompatibleConstraint, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_month_single() {
        let spec = parse("every month on 1 in january").unwrap();
        assert_eq!(*spec.month(), MonthSpecifier::Single(1));
    }

    #[test]
    fn test_parse_month_range() {
        let spec = parse("every year on 1 between march and june").unwrap();
        assert_eq!(*spec.month(), MonthSpecifier::Range(3, 6));

        let spec = parse("every year on 1 in march through june").unwrap();
        assert_eq!(*spec.month(), MonthSpecifier::Range(3, 6));

        let spec = parse("every year on 1 in march-june").unwrap();
        assert_eq!(*spec.month(), MonthSpecifier::Range(3, 6));
    }

    #[test]
    fn test_parse_month_list_dedupes_in_order() {
        let spec = parse("every month on 1 in january,april,january,july").unwrap();
        assert_eq!(*spec.month(), MonthSpecifier::List(vec![1, 4, 7]));
    }

    #[test]
    fn test_parse_times() {
        assert_eq!(
            parse("every day at 2pm").unwrap().time_of_day(),
            Some(TimeOfDay { hour: 14, minute: 0 })
        );
        assert_eq!(
            parse("every day at 12am").unwrap().time_of_day(),
            Some(TimeOfDay { hour: 0, minute: 0 })
        );
        assert_eq!(
            parse("every day at 12pm").unwrap().time_of_day(),
            Some(TimeOfDay { hour: 12, minute: 0 })
        );
        assert_eq!(
            parse("every day at noon").unwrap().time_of_day(),
            Some(TimeOfDay { hour: 12, minute: 0 })
        );
        assert_eq!(
            parse("every day at midnight").unwrap().time_of_day(),
            Some(TimeOfDay { hour: 0, minute: 0 })
        );
        assert_eq!(
            parse("every day at 09:30").unwrap().time_of_day(),
            Some(TimeOfDay { hour: 9, minute: 30 })
        );
        assert_eq!(
            parse("every day at 2:30pm").unwrap().time_of_day(),
            Some(TimeOfDay { hour: 14, minute: 30 })
        );
        assert_eq!(
            parse("every day at 14").unwrap().time_of_day(),
            Some(TimeOfDay { hour: 14, minute: 0 })
        );
    }

    #[test]
    fn test_parse_ambiguous_suffix() {
        let err = parse("15pm").unwrap_err();
        match err {
            ScheduleError::AmbiguousTimeSuffix { span } => assert_eq!(span.start, 2),
            other => panic!("expected AmbiguousTimeSuffix, got {other:?}"),
        }

        let err = parse("every day at 13am").unwrap_err();
        assert!(matches!(err, ScheduleError::AmbiguousTimeSuffix { .. }));
        let err = parse("every day at 0pm").unwrap_err();
        assert!(matches!(err, ScheduleError::AmbiguousTimeSuffix { .. }));
    }

    #[test]
    fn test_parse_bare_hour_out_of_range() {
        let err = parse("every day at 25").unwrap_err();
        match err {
            ScheduleError::NumberOutOfRange { field, value, .. } => {
                assert_eq!(field, "hour");
                assert_eq!(value, 25);
            }
            other => panic!("expected NumberOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_time_with_sub_hourly_unit() {
        let err = parse("every 30 minutes at 2pm").unwrap_err();
        assert!(matches!(err, ScheduleError::IncompatibleConstraint { .. }));
        let err = parse("every 30 seconds at 2pm").unwrap_err();
        assert!(matches!(err, ScheduleError::IncompatibleConstraint { .. }));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse(""), Err(ScheduleError::EmptyInput)));
        assert!(matches!(parse("   "), Err(ScheduleError::EmptyInput)));
    }

    #[test]
    fn test_parse_unknown_token_points_at_token() {
        let err = parse("every blorp").unwrap_err();
        assert_eq!(err.offset(), Some(6));
    }

    #[test]
    fn test_parse_zero_interval() {
        let err = parse("every 0 days").unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::NumberOutOfRange { field: "interval", .. }
        ));
    }

    #[test]
    fn test_parse_redundant_connectives() {
        let spec = parse("every every 2 weeks on sunday at 3am").unwrap();
        assert_eq!(spec.interval(), 2);
        assert_eq!(spec.day_of_week(), Some(Weekday::Sunday));
    }

    #[test]
    fn test_parse_constraint_order_insensitive() {
        let a = parse("every month on 15 in january at 2pm").unwrap();
        let b = parse("every month at 2pm in january on 15").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_trailing_garbage() {
        assert!(parse("every day at 2pm banana").is_err());
    }

    #[test]
    fn test_weekday_ranges_are_not_supported() {
        // `between` only introduces month ranges
        let err = parse("every week between monday and thursday").unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownToken { .. }));
    }

    #[test]
    fn test_weekday_lists_are_not_supported() {
        let err = parse("every week on monday, wednesday at 9am").unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownToken { .. }));
    }

    #[test]
    fn test_parse_with_time_zone_option() {
        let options = ParseOptions {
            time_zone: Some("America/New_York".to_string()),
        };
        let spec = parse_with("every day at 2pm", &options).unwrap();
        assert_eq!(spec.time_zone(), Some("America/New_York"));
    }
}
