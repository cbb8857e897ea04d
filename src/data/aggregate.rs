use std::collections::BTreeMap;

use super::model::{CategoryLabel, RentalRecord, Season, Weather};

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Numeric column that can be averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    DailyCount,
    HourlyCount,
    Temperature,
}

impl ValueField {
    /// `None` when the record has no value for this field (e.g. the hourly
    /// count of a daily row).
    pub fn extract(self, record: &RentalRecord) -> Option<f64> {
        match self {
            ValueField::DailyCount => Some(f64::from(record.daily_count)),
            ValueField::HourlyCount => record.hourly_count.map(f64::from),
            ValueField::Temperature => Some(record.temperature),
        }
    }
}

/// Unweighted arithmetic mean of `field` per group key.
///
/// Only keys present in the input appear in the result. A key whose records
/// all lack `field` is absent as well, so no entry is ever NaN.
pub fn mean_by<'a, K, F>(
    records: impl IntoIterator<Item = &'a RentalRecord>,
    key: F,
    field: ValueField,
) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&RentalRecord) -> Option<K>,
{
    let mut sums: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for rec in records {
        let (Some(k), Some(v)) = (key(rec), field.extract(rec)) else {
            continue;
        };
        let entry = sums.entry(k).or_insert((0.0, 0));
        entry.0 += v;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

pub fn mean_by_season<'a>(
    records: impl IntoIterator<Item = &'a RentalRecord>,
    field: ValueField,
) -> BTreeMap<Season, f64> {
    mean_by(records, |r| Some(r.season), field)
}

/// Hour-of-day means; daily rows (no hour) are skipped.
pub fn mean_by_hour<'a>(
    records: impl IntoIterator<Item = &'a RentalRecord>,
    field: ValueField,
) -> BTreeMap<u8, f64> {
    mean_by(records, |r| r.hour, field)
}

pub fn mean_by_weather<'a>(
    records: impl IntoIterator<Item = &'a RentalRecord>,
    field: ValueField,
) -> BTreeMap<Weather, f64> {
    mean_by(records, |r| Some(r.weather), field)
}

/// Turn a grouped series into `(label, value)` pairs for presenters.
pub fn labelled<K: CategoryLabel>(series: &BTreeMap<K, f64>) -> Vec<(String, f64)> {
    series
        .iter()
        .map(|(k, v)| (k.category_label(), *v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(season: Season, daily: u32, hour: Option<u8>, hourly: Option<u32>) -> RentalRecord {
        RentalRecord {
            date: "2011-01-01".parse().unwrap(),
            season,
            working_day: true,
            weather: Weather::Clear,
            temperature: 0.3,
            hour,
            daily_count: daily,
            hourly_count: hourly,
        }
    }

    #[test]
    fn season_means_skip_absent_categories() {
        let records = vec![
            record(Season::Spring, 10, None, None),
            record(Season::Spring, 20, None, None),
            record(Season::Summer, 30, None, None),
            record(Season::Winter, 40, None, None),
        ];
        let means = mean_by_season(&records, ValueField::DailyCount);
        assert_eq!(means.len(), 3);
        assert_eq!(means[&Season::Spring], 15.0);
        assert_eq!(means[&Season::Summer], 30.0);
        assert_eq!(means[&Season::Winter], 40.0);
        assert!(!means.contains_key(&Season::Fall));
    }

    #[test]
    fn hour_means_ignore_rows_without_value() {
        let records = vec![
            record(Season::Spring, 10, Some(8), Some(4)),
            record(Season::Spring, 10, Some(8), Some(6)),
            record(Season::Spring, 10, Some(9), None),
            record(Season::Spring, 10, None, Some(100)),
        ];
        let means = mean_by_hour(&records, ValueField::HourlyCount);
        assert_eq!(means.len(), 1);
        assert_eq!(means[&8], 5.0);
    }

    #[test]
    fn temperature_means_per_weather() {
        let mut misty = record(Season::Fall, 10, None, None);
        misty.weather = Weather::Misty;
        misty.temperature = 0.5;
        let records = vec![record(Season::Fall, 10, None, None), misty];
        let means = mean_by_weather(&records, ValueField::Temperature);
        assert_eq!(means[&Weather::Clear], 0.3);
        assert_eq!(means[&Weather::Misty], 0.5);
    }

    #[test]
    fn empty_input_gives_empty_mapping() {
        let records: Vec<RentalRecord> = Vec::new();
        assert!(mean_by_weather(&records, ValueField::DailyCount).is_empty());
    }

    #[test]
    fn labels_follow_key_order() {
        let records = vec![
            record(Season::Winter, 40, None, None),
            record(Season::Spring, 10, None, None),
        ];
        let series = labelled(&mean_by_season(&records, ValueField::DailyCount));
        assert_eq!(
            series,
            vec![("Spring".to_string(), 10.0), ("Winter".to_string(), 40.0)]
        );
    }
}
