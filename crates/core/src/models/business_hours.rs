use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{BookingError, BookingResult};

/// Shortest open interval accepted for a working day.
pub const MIN_OPEN_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHours {
    pub day_of_week: Weekday,
    pub is_open: bool,
    #[serde(default, with = "time_of_day")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, with = "time_of_day")]
    pub close_time: Option<NaiveTime>,
}

impl BusinessHours {
    pub fn open(day_of_week: Weekday, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            day_of_week,
            is_open: true,
            open_time: Some(open_time),
            close_time: Some(close_time),
        }
    }

    pub fn closed(day_of_week: Weekday) -> Self {
        Self {
            day_of_week,
            is_open: false,
            open_time: None,
            close_time: None,
        }
    }

    /// Placeholder shown in the settings editor for a day with nothing saved.
    ///
    /// Only for pre-filling an unsaved form. Schedule lookups treat a missing
    /// entry as closed and never consult this.
    pub fn form_default(day_of_week: Weekday) -> Self {
        Self::open(
            day_of_week,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
        )
    }

    pub fn validate(&self) -> BookingResult<()> {
        if !self.is_open {
            return Ok(());
        }

        let (open, close) = match (self.open_time, self.close_time) {
            (Some(open), Some(close)) => (open, close),
            _ => {
                return Err(BookingError::Validation(format!(
                    "{:?}: open and close times are required for an open day",
                    self.day_of_week
                )));
            }
        };

        if open >= close {
            return Err(BookingError::Validation(format!(
                "{:?}: opening time must be before closing time",
                self.day_of_week
            )));
        }

        if close - open < Duration::minutes(MIN_OPEN_MINUTES) {
            return Err(BookingError::Validation(format!(
                "{:?}: must be open for at least {} minutes",
                self.day_of_week, MIN_OPEN_MINUTES
            )));
        }

        Ok(())
    }
}

/// Checks a full week of hours before it is saved.
pub fn validate_business_hours(hours: &[BusinessHours]) -> BookingResult<()> {
    let mut seen = HashSet::new();
    for entry in hours {
        if !seen.insert(entry.day_of_week) {
            return Err(BookingError::Validation(format!(
                "{:?} is listed more than once",
                entry.day_of_week
            )));
        }
        entry.validate()?;
    }
    Ok(())
}

/// `HH:mm` on the wire; seconds are accepted on input.
mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveTime::parse_from_str(text, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
                .map(Some)
                .map_err(D::Error::custom),
        }
    }
}
