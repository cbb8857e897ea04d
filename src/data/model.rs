use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Season / Weather – fixed categorical codes
// ---------------------------------------------------------------------------

/// Meteorological season, encoded 1–4 in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring = 1,
    Summer = 2,
    Fall = 3,
    Winter = 4,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Season::Spring),
            2 => Some(Season::Summer),
            3 => Some(Season::Fall),
            4 => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// Weather situation, encoded 1–3 in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weather {
    Clear = 1,
    Misty = 2,
    LightPrecipitation = 3,
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Clear, Weather::Misty, Weather::LightPrecipitation];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Weather::Clear),
            2 => Some(Weather::Misty),
            3 => Some(Weather::LightPrecipitation),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Misty => "Misty",
            Weather::LightPrecipitation => "Light precipitation",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Anything that can be used as a chart category label.
pub trait CategoryLabel {
    fn category_label(&self) -> String;
}

impl CategoryLabel for Season {
    fn category_label(&self) -> String {
        self.label().to_string()
    }
}

impl CategoryLabel for Weather {
    fn category_label(&self) -> String {
        self.label().to_string()
    }
}

impl CategoryLabel for u8 {
    fn category_label(&self) -> String {
        format!("{self:02}:00")
    }
}

// ---------------------------------------------------------------------------
// RawRecord – one row exactly as it appears in the input file
// ---------------------------------------------------------------------------

/// Untyped row as read from CSV / JSON / Parquet, before validation.
///
/// Column names follow the combined day+hour export (`dteday`, `cnt_day`,
/// `cnt_hour`, …). Unknown columns are ignored.
///
/// Integer columns also accept whole floats (`5.0`), which is how pandas
/// writes an integer column that contains missing values.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub dteday: String,
    #[serde(alias = "season_day", deserialize_with = "whole_number")]
    pub season: i64,
    #[serde(alias = "workingday_day", deserialize_with = "whole_number")]
    pub workingday: i64,
    #[serde(alias = "weathersit_day", deserialize_with = "whole_number")]
    pub weathersit: i64,
    #[serde(alias = "temp")]
    pub temp_day: f64,
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub hr: Option<i64>,
    #[serde(deserialize_with = "whole_number")]
    pub cnt_day: i64,
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub cnt_hour: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn into_whole(self) -> Result<i64, String> {
        match self {
            Number::Int(i) => Ok(i),
            Number::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
            Number::Float(f) => Err(format!("expected a whole number, got {f}")),
        }
    }
}

fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Number::deserialize(deserializer)?
        .into_whole()
        .map_err(serde::de::Error::custom)
}

fn optional_whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Option::<Number>::deserialize(deserializer)?
        .map(Number::into_whole)
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// Reasons a raw row cannot become a [`RentalRecord`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("unparseable date '{0}'")]
    InvalidDate(String),
    #[error("unknown season code {0} (expected 1-4)")]
    UnknownSeason(i64),
    #[error("unknown weather code {0} (expected 1-3)")]
    UnknownWeather(i64),
    #[error("working-day flag must be 0 or 1, got {0}")]
    InvalidWorkingDay(i64),
    #[error("hour {0} is outside 0-23")]
    InvalidHour(i64),
    #[error("{field} must be a non-negative count, got {value}")]
    InvalidCount { field: &'static str, value: i64 },
    #[error("normalized temperature {0} is outside [0, 1]")]
    InvalidTemperature(f64),
}

// ---------------------------------------------------------------------------
// RentalRecord – one validated row
// ---------------------------------------------------------------------------

/// A single day (or hour within a day) of rentals.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalRecord {
    pub date: NaiveDate,
    pub season: Season,
    pub working_day: bool,
    pub weather: Weather,
    /// Normalized temperature in `[0, 1]`.
    pub temperature: f64,
    /// Hour of day, present only for hourly rows.
    pub hour: Option<u8>,
    pub daily_count: u32,
    pub hourly_count: Option<u32>,
}

impl TryFrom<RawRecord> for RentalRecord {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let date = parse_date(&raw.dteday)?;
        let season = Season::from_code(raw.season).ok_or(RecordError::UnknownSeason(raw.season))?;
        let weather =
            Weather::from_code(raw.weathersit).ok_or(RecordError::UnknownWeather(raw.weathersit))?;
        let working_day = match raw.workingday {
            0 => false,
            1 => true,
            other => return Err(RecordError::InvalidWorkingDay(other)),
        };

        if !raw.temp_day.is_finite() || !(0.0..=1.0).contains(&raw.temp_day) {
            return Err(RecordError::InvalidTemperature(raw.temp_day));
        }

        let hour = raw
            .hr
            .map(|h| u8::try_from(h).ok().filter(|h| *h < 24).ok_or(RecordError::InvalidHour(h)))
            .transpose()?;

        let daily_count = to_count("cnt_day", raw.cnt_day)?;
        let hourly_count = raw.cnt_hour.map(|c| to_count("cnt_hour", c)).transpose()?;

        Ok(RentalRecord {
            date,
            season,
            working_day,
            weather,
            temperature: raw.temp_day,
            hour,
            daily_count,
            hourly_count,
        })
    }
}

fn to_count(field: &'static str, value: i64) -> Result<u32, RecordError> {
    u32::try_from(value).map_err(|_| RecordError::InvalidCount { field, value })
}

/// Accepts `YYYY-MM-DD`, or a datetime whose date part is used.
pub fn parse_date(s: &str) -> Result<NaiveDate, RecordError> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(RecordError::InvalidDate(s.to_string()))
}

// ---------------------------------------------------------------------------
// RentalDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full, immutable record set held for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct RentalDataset {
    pub records: Vec<RentalRecord>,
}

impl RentalDataset {
    pub fn new(records: Vec<RentalRecord>) -> Self {
        RentalDataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date, used to bound the date pickers.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Lowest and highest normalized temperature.
    pub fn temperature_bounds(&self) -> Option<(f64, f64)> {
        temperature_bounds(self.records.iter())
    }
}

/// Temperature bounds over any set of records (e.g. a filtered view).
pub fn temperature_bounds<'a>(records: impl IntoIterator<Item = &'a RentalRecord>) -> Option<(f64, f64)> {
    records.into_iter().fold(None, |acc, r| match acc {
        None => Some((r.temperature, r.temperature)),
        Some((lo, hi)) => Some((lo.min(r.temperature), hi.max(r.temperature))),
    })
}
