use crate::error::{ScheduleError, Span};
use crate::ir::{DayPattern, IntervalUnit, Weekday};
use crate::lexicon;

/// Token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// An am/pm suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Connectives
    Every,
    On,
    In,
    At,
    Between,
    And,
    Through,
    Comma,
    Last,

    // Literals
    Number(u32),
    OrdinalNumber(u32), // 1st, 2nd, 15th — the number part
    Time(u8, u8),       // HH:MM

    // Lexicon hits
    Unit(IntervalUnit),
    DayName(Weekday),
    DayClass(DayPattern),
    MonthName(u8),

    // Time words
    Meridiem(Meridiem),
    Noon,
    Midnight,
}

pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ScheduleError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            if self.pos >= self.bytes.len() {
                break;
            }

            let start = self.pos;
            let ch = self.bytes[self.pos];

            if ch == b',' {
                self.pos += 1;
                tokens.push(Token {
                    kind: TokenKind::Comma,
                    span: Span::new(start, self.pos),
                });
                continue;
            }

            if ch == b'-' {
                self.pos += 1;
                tokens.push(Token {
                    kind: TokenKind::Through,
                    span: Span::new(start, self.pos),
                });
                continue;
            }

            if ch.is_ascii_digit() {
                tokens.push(self.lex_number_or_time()?);
                continue;
            }

            if ch.is_ascii_alphabetic() {
                tokens.push(self.lex_word()?);
                continue;
            }

            return Err(ScheduleError::unknown_token(
                Span::new(start, start + 1),
                (ch as char).to_string(),
            ));
        }
        Ok(tokens)
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn lex_number_or_time(&mut self) -> Result<Token, ScheduleError> {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let digits = &self.input[start..self.pos];

        // HH:MM time literal
        if (digits.len() == 1 || digits.len() == 2)
            && self.pos < self.bytes.len()
            && self.bytes[self.pos] == b':'
        {
            self.pos += 1;
            let minute_start = self.pos;
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            let minute_digits = &self.input[minute_start..self.pos];
            let span = Span::new(start, self.pos);
            if minute_digits.len() != 2 {
                return Err(ScheduleError::unknown_token(
                    span,
                    self.input[start..self.pos].to_string(),
                ));
            }
            let hour: u32 = digits
                .parse()
                .map_err(|_| ScheduleError::unknown_token(span, digits.to_string()))?;
            let minute: u32 = minute_digits
                .parse()
                .map_err(|_| ScheduleError::unknown_token(span, minute_digits.to_string()))?;
            if hour > 23 {
                return Err(ScheduleError::out_of_range(span, "hour", hour, 0, 23));
            }
            if minute > 59 {
                return Err(ScheduleError::out_of_range(span, "minute", minute, 0, 59));
            }
            return Ok(Token {
                kind: TokenKind::Time(hour as u8, minute as u8),
                span,
            });
        }

        let value: u32 = digits.parse().map_err(|_| {
            ScheduleError::unknown_token(Span::new(start, self.pos), digits.to_string())
        })?;

        // Ordinal suffix (st, nd, rd, th), only when nothing alphanumeric follows
        if self.pos + 2 <= self.bytes.len() {
            let suffix = self.input[self.pos..self.pos + 2].to_lowercase();
            let followed = self
                .bytes
                .get(self.pos + 2)
                .is_some_and(|b| b.is_ascii_alphanumeric());
            if matches!(suffix.as_str(), "st" | "nd" | "rd" | "th") && !followed {
                self.pos += 2;
                return Ok(Token {
                    kind: TokenKind::OrdinalNumber(value),
                    span: Span::new(start, self.pos),
                });
            }
        }

        Ok(Token {
            kind: TokenKind::Number(value),
            span: Span::new(start, self.pos),
        })
    }

    fn lex_word(&mut self) -> Result<Token, ScheduleError> {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_alphanumeric() {
            self.pos += 1;
        }
        let raw = &self.input[start..self.pos];
        let word = raw.to_lowercase();
        let span = Span::new(start, self.pos);

        let kind = match word.as_str() {
            "every" => TokenKind::Every,
            "on" => TokenKind::On,
            "in" => TokenKind::In,
            "at" => TokenKind::At,
            "between" => TokenKind::Between,
            "and" => TokenKind::And,
            "through" => TokenKind::Through,
            "last" => TokenKind::Last,
            "am" => TokenKind::Meridiem(Meridiem::Am),
            "pm" => TokenKind::Meridiem(Meridiem::Pm),
            "noon" => TokenKind::Noon,
            "midnight" => TokenKind::Midnight,
            _ => {
                if let Some(pattern) = lexicon::day_pattern(&word) {
                    TokenKind::DayClass(pattern)
                } else if let Some(day) = lexicon::weekday(&word) {
                    TokenKind::DayName(day)
                } else if let Some(month) = lexicon::month(&word) {
                    TokenKind::MonthName(month)
                } else if let Some(unit) = lexicon::long_unit(&word) {
                    TokenKind::Unit(unit)
                } else if let Some(unit) = single_char_unit(raw) {
                    // Short units resolve from the verbatim character so that
                    // `m` stays minutes and `M` stays months.
                    TokenKind::Unit(unit)
                } else {
                    return Err(ScheduleError::unknown_token(span, raw.to_string()));
                }
            }
        };

        Ok(Token { kind, span })
    }
}

fn single_char_unit(raw: &str) -> Option<IntervalUnit> {
    let mut chars = raw.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    lexicon::short_unit(first)
}
