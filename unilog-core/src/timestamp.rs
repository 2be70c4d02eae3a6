//! Fixed-width UTC timestamps.
//!
//! Fields are pulled out of the instant one by one and zero-padded by hand, so
//! the output never depends on locale or on any platform "ISO string" helper.

use std::fmt::Write;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Timelike, Utc};

/// How much of the time of day ends up in the timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// `YYYY-MM-DDTHH:MM:SS+00Z`
    Seconds,
    /// `YYYY-MM-DDTHH:MM:SS.mmmZ`
    #[default]
    Millis,
}

impl Precision {
    /// Length of a timestamp for years 0 through 9999.
    pub const fn width(self) -> usize {
        match self {
            Precision::Seconds => 23,
            Precision::Millis => 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("{field} out of range: {value}")]
    FieldOutOfRange { field: &'static str, value: i64 },
    #[error("date is outside the representable range")]
    Unrepresentable,
}

/// Formats `instant` using UTC fields only.
pub fn format_timestamp(instant: &DateTime<Utc>, precision: Precision) -> String {
    let mut timestamp = String::with_capacity(precision.width());
    let year = instant.year();
    // `write!` into a String cannot fail.
    if (0..=9999).contains(&year) {
        let _ = write!(timestamp, "{year:04}");
    } else {
        let _ = write!(timestamp, "{year:+07}");
    }
    let _ = write!(
        timestamp,
        "-{:02}-{:02}T{:02}:{:02}:{:02}",
        instant.month(),
        instant.day(),
        instant.hour(),
        instant.minute(),
        instant.second(),
    );
    match precision {
        Precision::Seconds => timestamp.push_str("+00Z"),
        Precision::Millis => {
            // Leap seconds report nanos past 1e9; fold them back.
            let millis = (instant.nanosecond() % 1_000_000_000) / 1_000_000;
            let _ = write!(timestamp, ".{millis:03}Z");
        }
    }
    timestamp
}

/// Millisecond timestamp of `instant`, or of the current time when `None`.
pub fn get_timestamp(instant: Option<DateTime<Utc>>) -> String {
    let instant = instant.unwrap_or_else(Utc::now);
    format_timestamp(&instant, Precision::Millis)
}

/// Broken-down UTC date and time. `month` is 1-based.
///
/// Fields may hold any value; [`UtcFields::to_instant`] carries overflow into
/// the next larger unit the way calendar arithmetic does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcFields {
    pub year: i32,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub millisecond: i64,
}

impl UtcFields {
    pub fn new(year: i32, month: i64, day: i64) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        }
    }

    pub fn with_time(self, hour: i64, minute: i64, second: i64, millisecond: i64) -> Self {
        Self {
            hour,
            minute,
            second,
            millisecond,
            ..self
        }
    }

    /// Builds the instant, normalizing out-of-range fields.
    ///
    /// Day 0 is the last day of the previous month, month 13 is January of
    /// the following year, hour 25 is 01:00 the next day, and so on.
    pub fn to_instant(&self) -> Result<DateTime<Utc>, TimestampError> {
        let months = (i64::from(self.year) * 12)
            .checked_add(self.month)
            .and_then(|months| months.checked_sub(1))
            .ok_or(TimestampError::Unrepresentable)?;
        let year = i32::try_from(months.div_euclid(12))
            .map_err(|_| TimestampError::Unrepresentable)?;
        let month = months.rem_euclid(12) as u32 + 1;
        let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or(TimestampError::Unrepresentable)?;
        let offsets = [
            TimeDelta::try_days(self.day.saturating_sub(1)),
            TimeDelta::try_hours(self.hour),
            TimeDelta::try_minutes(self.minute),
            TimeDelta::try_seconds(self.second),
            TimeDelta::try_milliseconds(self.millisecond),
        ];
        let mut instant = first_of_month;
        for offset in offsets {
            instant = offset
                .and_then(|offset| instant.checked_add_signed(offset))
                .ok_or(TimestampError::Unrepresentable)?;
        }
        Ok(instant.and_utc())
    }

    /// Builds the instant, rejecting any field outside its calendar range.
    pub fn to_instant_strict(&self) -> Result<DateTime<Utc>, TimestampError> {
        check("month", self.month, 1, 12)?;
        let days = days_in_month(self.year, self.month as u32)?;
        check("day", self.day, 1, days)?;
        check("hour", self.hour, 0, 23)?;
        check("minute", self.minute, 0, 59)?;
        check("second", self.second, 0, 59)?;
        check("millisecond", self.millisecond, 0, 999)?;
        self.to_instant()
    }
}

fn check(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), TimestampError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TimestampError::FieldOutOfRange { field, value })
    }
}

fn days_in_month(year: i32, month: u32) -> Result<i64, TimestampError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(TimestampError::Unrepresentable)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(TimestampError::Unrepresentable)?;
    Ok((next - first).num_days())
}
