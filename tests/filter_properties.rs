use std::collections::{BTreeMap, BTreeSet};

use bike_dashboard::data::aggregate::{ValueField, mean_by_season};
use bike_dashboard::data::filter::{DateRange, FilterSpec, WorkingDayFilter, filter, filtered_indices};
use bike_dashboard::data::model::{RentalDataset, RentalRecord, Season, Weather};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2011, 1, 1).unwrap()
}

prop_compose! {
    fn arb_record()(
        day in 0i64..730,
        season in 1i64..=4,
        working_day in any::<bool>(),
        weather in 1i64..=3,
        temperature in 0.0f64..=1.0,
        hour in proptest::option::of(0u8..24),
        daily_count in 0u32..10_000,
        hourly_count in 0u32..1_000,
    ) -> RentalRecord {
        RentalRecord {
            date: base_date() + Duration::days(day),
            season: Season::from_code(season).unwrap(),
            working_day,
            weather: Weather::from_code(weather).unwrap(),
            temperature,
            hour,
            daily_count,
            hourly_count: hour.map(|_| hourly_count),
        }
    }
}

fn arb_dataset() -> impl Strategy<Value = RentalDataset> {
    proptest::collection::vec(arb_record(), 0..60).prop_map(RentalDataset::new)
}

fn arb_spec() -> impl Strategy<Value = FilterSpec> {
    (
        proptest::collection::vec(1i64..=4, 0..6),
        proptest::option::of(proptest::collection::vec(1i64..=3, 0..5)),
        prop_oneof![
            Just(WorkingDayFilter::Any),
            Just(WorkingDayFilter::WorkingOnly),
            Just(WorkingDayFilter::HolidayOnly)
        ],
        proptest::option::of((0i64..730, 0i64..730)),
    )
        .prop_map(|(seasons, weather, working_day, range)| FilterSpec {
            seasons: seasons.into_iter().filter_map(Season::from_code).collect(),
            weather: weather.map(|w| w.into_iter().filter_map(Weather::from_code).collect()),
            working_day,
            date_range: range.map(|(a, b)| {
                DateRange::new(base_date() + Duration::days(a), base_date() + Duration::days(b))
            }),
            ..FilterSpec::match_all()
        })
}

proptest! {
    #[test]
    fn match_all_returns_every_record(ds in arb_dataset()) {
        let out: Vec<RentalRecord> = filter(&ds, &FilterSpec::match_all()).into_iter().cloned().collect();
        prop_assert_eq!(out, ds.records.clone());
    }

    #[test]
    fn inverted_date_range_is_empty(ds in arb_dataset(), a in 0i64..730, gap in 1i64..100) {
        let spec = FilterSpec {
            date_range: Some(DateRange::new(
                base_date() + Duration::days(a + gap),
                base_date() + Duration::days(a),
            )),
            ..FilterSpec::match_all()
        };
        prop_assert!(filter(&ds, &spec).is_empty());
    }

    #[test]
    fn filtered_records_satisfy_every_predicate(ds in arb_dataset(), spec in arb_spec()) {
        let indices = filtered_indices(&ds, &spec);
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        for (i, rec) in ds.records.iter().enumerate() {
            let selected = indices.contains(&i);
            let expected = spec.seasons.contains(&rec.season)
                && spec.weather.as_ref().map_or(true, |w| w.contains(&rec.weather))
                && match spec.working_day {
                    WorkingDayFilter::Any => true,
                    WorkingDayFilter::WorkingOnly => rec.working_day,
                    WorkingDayFilter::HolidayOnly => !rec.working_day,
                }
                && spec.date_range.map_or(true, |r| r.start <= rec.date && rec.date <= r.end);
            prop_assert_eq!(selected, expected);
        }
    }

    #[test]
    fn filtered_seasons_stay_within_selection(ds in arb_dataset(), spec in arb_spec()) {
        for rec in filter(&ds, &spec) {
            prop_assert!(Season::ALL.contains(&rec.season));
            prop_assert!(spec.seasons.contains(&rec.season));
        }
    }

    #[test]
    fn season_means_ignore_record_order(ds in arb_dataset(), seed in any::<u64>()) {
        let forward = mean_by_season(&ds.records, ValueField::DailyCount);

        let mut shuffled = ds.records.clone();
        // Deterministic rotation + reversal is enough to change the order.
        if !shuffled.is_empty() {
            let k = (seed % shuffled.len() as u64) as usize;
            shuffled.rotate_left(k);
        }
        shuffled.reverse();
        let permuted = mean_by_season(&shuffled, ValueField::DailyCount);

        prop_assert_eq!(forward.len(), permuted.len());
        for (season, mean) in &forward {
            prop_assert!((mean - permuted[season]).abs() < 1e-9);
        }
    }
}

fn record(season: Season, working_day: bool, daily_count: u32) -> RentalRecord {
    RentalRecord {
        date: base_date(),
        season,
        working_day,
        weather: Weather::Clear,
        temperature: 0.5,
        hour: None,
        daily_count,
        hourly_count: None,
    }
}

#[test]
fn season_means_for_four_records() {
    let ds = RentalDataset::new(vec![
        record(Season::Spring, true, 10),
        record(Season::Spring, true, 20),
        record(Season::Summer, true, 30),
        record(Season::Winter, true, 40),
    ]);
    let means = mean_by_season(&ds.records, ValueField::DailyCount);
    let expected: BTreeMap<Season, f64> = [(Season::Spring, 15.0), (Season::Summer, 30.0), (Season::Winter, 40.0)]
        .into_iter()
        .collect();
    assert_eq!(means, expected);
}

#[test]
fn empty_season_selection_yields_nothing() {
    let ds = RentalDataset::new(vec![record(Season::Fall, true, 1), record(Season::Winter, false, 2)]);
    let spec = FilterSpec {
        seasons: BTreeSet::new(),
        ..FilterSpec::match_all()
    };
    assert!(filter(&ds, &spec).is_empty());
}

#[test]
fn holiday_only_on_working_days_yields_nothing() {
    let ds = RentalDataset::new(vec![record(Season::Fall, true, 1), record(Season::Winter, true, 2)]);
    let spec = FilterSpec {
        working_day: WorkingDayFilter::HolidayOnly,
        ..FilterSpec::match_all()
    };
    assert!(filter(&ds, &spec).is_empty());
}
