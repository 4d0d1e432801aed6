use std::fmt::{Display, Formatter};

use time::Duration;

use crate::ParseError;

/// Unit letter accepted at the end of a lookback token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    /// Calendar-agnostic year of 365 days.
    Years,
}

impl PeriodUnit {
    pub const ALL: [Self; 5] = [
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Weeks,
        Self::Years,
    ];

    pub const fn seconds(self) -> i64 {
        match self {
            Self::Minutes => 60,
            Self::Hours => 3_600,
            Self::Days => 86_400,
            Self::Weeks => 604_800,
            Self::Years => 31_536_000,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            Self::Minutes => 'm',
            Self::Hours => 'h',
            Self::Days => 'd',
            Self::Weeks => 'w',
            Self::Years => 'y',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        let letter = letter.to_ascii_lowercase();
        Self::ALL.into_iter().find(|unit| unit.letter() == letter)
    }
}

/// Trailing span of time the user wants summarized, e.g. `90m` or `5d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LookbackPeriod {
    magnitude: u64,
    unit: PeriodUnit,
    total_seconds: i64,
}

impl LookbackPeriod {
    /// Parse `<positive integer><unit>` where unit is one of `m h d w y`.
    ///
    /// Surrounding whitespace is ignored and the unit letter is case-insensitive.
    /// Only ASCII digits are accepted for the magnitude, so signs, decimals and
    /// exponent forms are rejected.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let token = input.trim();
        let Some(last) = token.chars().next_back() else {
            return Err(ParseError::Empty);
        };

        if last.is_ascii_digit() {
            return Err(ParseError::MissingUnit {
                value: token.to_owned(),
            });
        }

        let unit = PeriodUnit::from_letter(last).ok_or_else(|| ParseError::UnknownUnit {
            value: token.to_owned(),
            unit: last,
        })?;

        let digits = &token[..token.len() - last.len_utf8()];
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(ParseError::InvalidMagnitude {
                value: token.to_owned(),
            });
        }

        let magnitude = digits.parse::<u64>().map_err(|_| ParseError::Overflow {
            value: token.to_owned(),
        })?;
        if magnitude == 0 {
            return Err(ParseError::Zero {
                value: token.to_owned(),
            });
        }

        let total_seconds = i64::try_from(magnitude)
            .ok()
            .and_then(|value| value.checked_mul(unit.seconds()))
            .ok_or_else(|| ParseError::Overflow {
                value: token.to_owned(),
            })?;

        Ok(Self {
            magnitude,
            unit,
            total_seconds,
        })
    }

    pub const fn total_seconds(&self) -> i64 {
        self.total_seconds
    }

    pub const fn as_duration(&self) -> Duration {
        Duration::seconds(self.total_seconds)
    }
}

impl Display for LookbackPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.letter())
    }
}
