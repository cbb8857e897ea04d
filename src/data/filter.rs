use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{RentalDataset, RentalRecord, Season, Weather};

// ---------------------------------------------------------------------------
// Filter predicate: which records the user has selected
// ---------------------------------------------------------------------------

/// Working-day selector from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkingDayFilter {
    #[default]
    Any,
    WorkingOnly,
    HolidayOnly,
}

impl WorkingDayFilter {
    pub const ALL: [WorkingDayFilter; 3] = [
        WorkingDayFilter::Any,
        WorkingDayFilter::WorkingOnly,
        WorkingDayFilter::HolidayOnly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WorkingDayFilter::Any => "All days",
            WorkingDayFilter::WorkingOnly => "Working days",
            WorkingDayFilter::HolidayOnly => "Holidays",
        }
    }

    fn matches(self, working_day: bool) -> bool {
        match self {
            WorkingDayFilter::Any => true,
            WorkingDayFilter::WorkingOnly => working_day,
            WorkingDayFilter::HolidayOnly => !working_day,
        }
    }
}

/// Inclusive date bounds. An inverted range (`start > end`) matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Inclusive hour-of-day bounds for the peak-hours chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub start: u8,
    pub end: u8,
}

impl HourRange {
    pub const FULL_DAY: HourRange = HourRange { start: 0, end: 23 };

    pub fn new(start: u8, end: u8) -> Self {
        HourRange { start, end }
    }

    /// Records without an hour (daily rows) never match.
    pub fn contains(&self, hour: Option<u8>) -> bool {
        hour.is_some_and(|h| self.start <= h && h <= self.end)
    }
}

/// Inclusive normalized-temperature bounds for the temperature chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    pub fn new(min: f64, max: f64) -> Self {
        TemperatureRange { min, max }
    }

    pub fn contains(&self, temperature: f64) -> bool {
        self.min <= temperature && temperature <= self.max
    }
}

/// Conjunction of every sidebar predicate plus the per-chart refinements.
///
/// `None` on an optional field means "no constraint". An empty season or
/// weather set selects nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub seasons: BTreeSet<Season>,
    pub weather: Option<BTreeSet<Weather>>,
    pub working_day: WorkingDayFilter,
    pub date_range: Option<DateRange>,
    pub hours: Option<HourRange>,
    pub temperature: Option<TemperatureRange>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::match_all()
    }
}

impl FilterSpec {
    /// The all-inclusive spec: filtering with it returns every record.
    pub fn match_all() -> Self {
        FilterSpec {
            seasons: Season::ALL.into_iter().collect(),
            weather: None,
            working_day: WorkingDayFilter::Any,
            date_range: None,
            hours: None,
            temperature: None,
        }
    }

    /// The same filter with the per-chart refinements removed.
    pub fn without_refinements(&self) -> Self {
        FilterSpec {
            hours: None,
            temperature: None,
            ..self.clone()
        }
    }

    /// Whether a single record passes every predicate.
    pub fn matches(&self, record: &RentalRecord) -> bool {
        if !self.seasons.contains(&record.season) {
            return false;
        }
        if let Some(weather) = &self.weather {
            if !weather.contains(&record.weather) {
                return false;
            }
        }
        if !self.working_day.matches(record.working_day) {
            return false;
        }
        if let Some(range) = &self.date_range {
            if !range.contains(record.date) {
                return false;
            }
        }
        if let Some(hours) = &self.hours {
            if !hours.contains(record.hour) {
                return false;
            }
        }
        if let Some(temp) = &self.temperature {
            if !temp.contains(record.temperature) {
                return false;
            }
        }
        true
    }
}

/// Return indices of records that pass the filter, in original order.
pub fn filtered_indices(dataset: &RentalDataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| spec.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Borrowing view of the records that pass the filter, in original order.
pub fn filter<'a>(dataset: &'a RentalDataset, spec: &FilterSpec) -> Vec<&'a RentalRecord> {
    refine(dataset.records.iter(), spec)
}

/// Apply `spec` to an already-filtered view.
pub fn refine<'a>(
    records: impl IntoIterator<Item = &'a RentalRecord>,
    spec: &FilterSpec,
) -> Vec<&'a RentalRecord> {
    records.into_iter().filter(|rec| spec.matches(rec)).collect()
}
