use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::ValidationError;

const WITH_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const WITH_MINUTES: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const DATE_ONLY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Timezone-naive timestamp in the provider's market-local clock.
///
/// Alpha Vantage reports intraday bars as `YYYY-MM-DD HH:MM:SS` without an
/// offset (the zone is only named in the metadata block), so comparisons are
/// done on the naive wall-clock value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarketDateTime(PrimitiveDateTime);

impl MarketDateTime {
    pub const fn new(value: PrimitiveDateTime) -> Self {
        Self(value)
    }

    /// The machine's UTC offset, or UTC when it cannot be determined.
    ///
    /// `time` refuses to read the local offset once the process has more than
    /// one thread, so call this before starting any runtime.
    pub fn local_offset() -> UtcOffset {
        UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
    }

    /// Current wall-clock time at `offset`, with the offset dropped.
    pub fn now_at(offset: UtcOffset) -> Self {
        let now = OffsetDateTime::now_utc().to_offset(offset);
        Self(PrimitiveDateTime::new(now.date(), now.time()))
    }

    /// Parse a provider timestamp.
    ///
    /// Accepted shapes, tried in order: `YYYY-MM-DD HH:MM:SS`,
    /// `YYYY-MM-DD HH:MM`, RFC 3339 with an offset (converted to UTC, then the
    /// offset is dropped) and a bare `YYYY-MM-DD` (midnight).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();

        if let Ok(value) = PrimitiveDateTime::parse(trimmed, WITH_SECONDS) {
            return Ok(Self(value));
        }
        if let Ok(value) = PrimitiveDateTime::parse(trimmed, WITH_MINUTES) {
            return Ok(Self(value));
        }
        if let Ok(value) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            let utc = value.to_offset(UtcOffset::UTC);
            return Ok(Self(PrimitiveDateTime::new(utc.date(), utc.time())));
        }
        if let Ok(date) = Date::parse(trimmed, DATE_ONLY) {
            return Ok(Self(PrimitiveDateTime::new(date, Time::MIDNIGHT)));
        }

        Err(ValidationError::InvalidTimestamp {
            value: input.to_owned(),
        })
    }

    pub const fn into_inner(self) -> PrimitiveDateTime {
        self.0
    }

    pub fn checked_sub(self, duration: Duration) -> Option<Self> {
        self.0.checked_sub(duration).map(Self)
    }
}

impl Display for MarketDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = self.0;
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            value.year(),
            u8::from(value.month()),
            value.day(),
            value.hour(),
            value.minute(),
            value.second()
        )
    }
}

impl Serialize for MarketDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_intraday_timestamp() {
        let parsed = MarketDateTime::parse("2025-10-07 15:59:00").expect("must parse");
        assert_eq!(parsed.into_inner(), datetime!(2025-10-07 15:59:00));
        assert_eq!(parsed.to_string(), "2025-10-07 15:59:00");
    }

    #[test]
    fn parses_minute_and_date_forms() {
        let minute = MarketDateTime::parse("2025-10-07 09:30").expect("must parse");
        assert_eq!(minute.into_inner(), datetime!(2025-10-07 09:30:00));

        let date = MarketDateTime::parse("2025-10-07").expect("must parse");
        assert_eq!(date.into_inner(), datetime!(2025-10-07 00:00:00));
    }

    #[test]
    fn converts_offset_timestamps_to_naive_utc() {
        let parsed = MarketDateTime::parse("2025-10-07T15:59:00-04:00").expect("must parse");
        assert_eq!(parsed.into_inner(), datetime!(2025-10-07 19:59:00));
    }

    #[test]
    fn now_at_applies_offset() {
        let shifted = MarketDateTime::now_at(UtcOffset::from_hms(-4, 0, 0).expect("valid offset"))
            .into_inner();
        let utc = MarketDateTime::now_at(UtcOffset::UTC).into_inner();
        let gap = utc - shifted;
        assert!(gap >= Duration::hours(4) && gap < Duration::hours(4) + Duration::seconds(5));
    }

    #[test]
    fn rejects_garbage() {
        let err = MarketDateTime::parse("yesterday").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimestamp { .. }));
    }

    #[test]
    fn serializes_as_display_string() {
        let parsed = MarketDateTime::parse("2025-01-02 03:04:05").expect("must parse");
        let json = serde_json::to_string(&parsed).expect("serializes");
        assert_eq!(json, "\"2025-01-02 03:04:05\"");
    }
}
