//! Time format patterns
//!
//! A pattern is a run of letter tokens and literals:
//!
//! | token | meaning |
//! |---|---|
//! | `y` `yy` `yyyy` | year (full, two-digit, four-digit padded) |
//! | `M` `MM` | month |
//! | `d` `dd` | day of month |
//! | `E` .. `EEE`, `EEEE` | weekday, short or long |
//! | `a` `aa` | AM/PM marker |
//! | `H` `HH` | hour 0-23 |
//! | `h` `hh` | hour 1-12 |
//! | `m` `mm` | minute |
//! | `s` `ss` | second |
//! | `S` `SS` `SSS` | fraction of a second |
//!
//! Text inside single quotes is literal (`''` is a quote). Any other character is literal.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use smallvec::SmallVec;

use crate::error::TextClockError;

/// Default pattern for the 12-hour clock
pub const DEFAULT_FORMAT_12H: &str = "aa hh:mm:ss";
/// Default pattern for the 24-hour clock
pub const DEFAULT_FORMAT_24H: &str = "HH:mm:ss";

const WEEKDAYS_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const WEEKDAYS_LONG: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Clone, Debug, PartialEq)]
pub enum FormatToken {
    Year(u8),
    Month(u8),
    Day(u8),
    Weekday { long: bool },
    AmPm,
    Hour24(u8),
    Hour12(u8),
    Minute(u8),
    Second(u8),
    /// Fraction digits, 1 to 3
    Fraction(u8),
    Literal(String),
}

impl FormatToken {
    fn is_field(&self) -> bool {
        !matches!(self, Self::Literal(_))
    }

    fn is_sub_minute(&self) -> bool {
        matches!(self, Self::Second(_) | Self::Fraction(_))
    }
}

/// How often the rendered text can change
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RefreshInterval {
    Minute,
    Second,
    /// Fraction-of-second digits shown (1-3)
    Fraction(u8),
}

impl RefreshInterval {
    /// Length of one step in milliseconds
    pub fn step_ms(&self) -> i64 {
        match self {
            Self::Minute => 60_000,
            Self::Second => 1_000,
            Self::Fraction(digits) => 10_i64.pow(3 - u32::from((*digits).clamp(1, 3))),
        }
    }

    /// Milliseconds from `now_ms` to the next step boundary (always > 0)
    pub fn delay_from(&self, now_ms: i64) -> i64 {
        let step = self.step_ms();
        step - now_ms.rem_euclid(step)
    }
}

/// A parsed time format
#[derive(Clone, Debug, PartialEq)]
pub struct TimeFormat {
    tokens: SmallVec<[FormatToken; 12]>,
}

fn push_literal(tokens: &mut SmallVec<[FormatToken; 12]>, text: &str) {
    if let Some(FormatToken::Literal(last)) = tokens.last_mut() {
        last.push_str(text);
    } else {
        tokens.push(FormatToken::Literal(text.to_string()));
    }
}

impl TimeFormat {
    /// Parse a pattern; fails when it contains no date or time field
    pub fn try_parse(pattern: &str) -> Result<Self, TextClockError> {
        let mut tokens: SmallVec<[FormatToken; 12]> = SmallVec::new();
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    push_literal(&mut tokens, "'");
                    i += 2;
                    continue;
                }
                let mut literal = String::new();
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\'' {
                        if chars.get(i + 1) == Some(&'\'') {
                            literal.push('\'');
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    literal.push(chars[i]);
                    i += 1;
                }
                // Skip the closing quote, if any.
                i += 1;
                push_literal(&mut tokens, &literal);
                continue;
            }

            let mut run = 1;
            while chars.get(i + run) == Some(&c) {
                run += 1;
            }
            let n = run.min(4) as u8;
            let token = match c {
                'y' => Some(FormatToken::Year(n)),
                'M' => Some(FormatToken::Month(n.min(2))),
                'd' => Some(FormatToken::Day(n.min(2))),
                'E' => Some(FormatToken::Weekday { long: run >= 4 }),
                'a' => Some(FormatToken::AmPm),
                'H' => Some(FormatToken::Hour24(n.min(2))),
                'h' => Some(FormatToken::Hour12(n.min(2))),
                'm' => Some(FormatToken::Minute(n.min(2))),
                's' => Some(FormatToken::Second(n.min(2))),
                'S' => Some(FormatToken::Fraction(n.min(3))),
                _ => None,
            };
            match token {
                Some(token) => tokens.push(token),
                None => {
                    let text: String = chars[i..i + run].iter().collect();
                    push_literal(&mut tokens, &text);
                }
            }
            i += run;
        }

        if !tokens.iter().any(FormatToken::is_field) {
            return Err(TextClockError::NoTimeFields(pattern.to_string()));
        }
        Ok(Self { tokens })
    }

    /// Parse `pattern`, falling back to the default for the hour cycle
    pub fn parse_or_default(pattern: &str, is_24_hour: bool) -> Self {
        match Self::try_parse(pattern) {
            Ok(format) => format,
            Err(err) => {
                if !pattern.is_empty() {
                    tracing::debug!("{}, using default format", err);
                }
                Self::default_for(is_24_hour)
            }
        }
    }

    pub fn default_for(is_24_hour: bool) -> Self {
        let pattern = if is_24_hour {
            DEFAULT_FORMAT_24H
        } else {
            DEFAULT_FORMAT_12H
        };
        Self::try_parse(pattern).unwrap_or_else(|_| Self {
            tokens: SmallVec::new(),
        })
    }

    pub fn tokens(&self) -> &[FormatToken] {
        &self.tokens
    }

    /// Finest refresh step the pattern needs
    pub fn refresh_interval(&self) -> RefreshInterval {
        let mut interval = RefreshInterval::Minute;
        for token in &self.tokens {
            match token {
                FormatToken::Fraction(digits) => return RefreshInterval::Fraction(*digits),
                FormatToken::Second(_) => interval = RefreshInterval::Second,
                _ => {}
            }
        }
        interval
    }

    /// Copy without second and fraction fields, or the separators that led into them
    pub fn without_seconds(&self) -> Self {
        let mut tokens: SmallVec<[FormatToken; 12]> = SmallVec::new();
        for token in &self.tokens {
            if token.is_sub_minute() {
                if let Some(FormatToken::Literal(sep)) = tokens.last() {
                    if sep.chars().all(|c| matches!(c, ':' | '.' | ',')) {
                        tokens.pop();
                    }
                }
                continue;
            }
            tokens.push(token.clone());
        }
        if !tokens.iter().any(FormatToken::is_field) {
            return Self::default_for(true).without_seconds();
        }
        Self { tokens }
    }

    pub fn render(&self, time: &DateTime<FixedOffset>) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            // Writing to a String cannot fail.
            let _ = match token {
                FormatToken::Year(2) => write!(out, "{:02}", time.year().rem_euclid(100)),
                FormatToken::Year(4) => write!(out, "{:04}", time.year()),
                FormatToken::Year(_) => write!(out, "{}", time.year()),
                FormatToken::Month(n) => pad(&mut out, time.month(), *n),
                FormatToken::Day(n) => pad(&mut out, time.day(), *n),
                FormatToken::Weekday { long } => {
                    let index = time.weekday().num_days_from_monday() as usize;
                    let names = if *long { &WEEKDAYS_LONG } else { &WEEKDAYS_SHORT };
                    write!(out, "{}", names[index])
                }
                FormatToken::AmPm => write!(out, "{}", if time.hour() < 12 { "AM" } else { "PM" }),
                FormatToken::Hour24(n) => pad(&mut out, time.hour(), *n),
                FormatToken::Hour12(n) => pad(&mut out, time.hour12().1, *n),
                FormatToken::Minute(n) => pad(&mut out, time.minute(), *n),
                FormatToken::Second(n) => pad(&mut out, time.second(), *n),
                FormatToken::Fraction(digits) => {
                    let millis = time.timestamp_subsec_millis().min(999);
                    let shown = millis / 10_u32.pow(3 - u32::from(*digits));
                    write!(out, "{:0width$}", shown, width = usize::from(*digits))
                }
                FormatToken::Literal(text) => write!(out, "{}", text),
            };
        }
        out
    }
}

fn pad(out: &mut String, value: u32, width: u8) -> std::fmt::Result {
    if width >= 2 {
        write!(out, "{:02}", value)
    } else {
        write!(out, "{}", value)
    }
}
