use std::fmt::{Display, Formatter};

use crate::ValidationError;

const MAX_TICKER_LEN: usize = 15;

/// Joins a listing to its exchange or share class (`TSCO.LON`, `BRK.B`, `RDS-A`).
const SEPARATORS: [char; 2] = ['.', '-'];

/// Ticker as sent in the `symbol` query parameter.
///
/// The value is uppercase ASCII: alphanumeric runs joined by single `.` or
/// `-` separators, so it never needs escaping inside the URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim().to_ascii_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        if let Some((index, ch)) = ticker
            .chars()
            .enumerate()
            .find(|(_, ch)| !ch.is_ascii_alphanumeric() && !SEPARATORS.contains(ch))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        // Only ASCII remains, so byte length is character count.
        if ticker.len() > MAX_TICKER_LEN {
            return Err(ValidationError::SymbolTooLong {
                len: ticker.len(),
                max: MAX_TICKER_LEN,
            });
        }

        if ticker.split(SEPARATORS).any(str::is_empty) {
            return Err(ValidationError::SymbolMisplacedSeparator { value: ticker });
        }

        Ok(Self(ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
