//! Everything a presenter needs for one interaction, computed in one pass.
//!
//! The sidebar filter is applied once; the hour and temperature refinements
//! then narrow that view for their own charts only.

use std::collections::BTreeMap;

use crate::data::aggregate::{ValueField, mean_by_hour, mean_by_season, mean_by_weather};
use crate::data::filter::{FilterSpec, filter, refine};
use crate::data::model::{RentalDataset, RentalRecord, Season, Weather, temperature_bounds};
use crate::stats::{
    BoxSummary, CorrelationMatrix, HistogramBin, LinearFit, correlation_matrix, gaussian_kde,
    histogram, linear_regression,
};

/// Bin count of the daily-count histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

const KDE_POINTS: usize = 200;

/// Rendering options that are not part of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub histogram_bins: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// Daily-count distribution with a KDE curve scaled to bin counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    pub bins: Vec<HistogramBin>,
    pub kde: Vec<[f64; 2]>,
}

/// Scatter of temperature vs daily count plus its regression line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemperatureChart {
    pub points: Vec<[f64; 2]>,
    pub fit: Option<LinearFit>,
    /// Temperature span of the sidebar-filtered view (slider bounds).
    pub bounds: Option<(f64, f64)>,
    /// Temperature span of the plotted points; the fit line is drawn over it.
    pub span: Option<(f64, f64)>,
}

/// All chart series for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub total_records: usize,
    pub filtered_records: usize,
    pub distribution: Distribution,
    pub season_means: BTreeMap<Season, f64>,
    pub weather_means: BTreeMap<Weather, f64>,
    pub hourly_means: BTreeMap<u8, f64>,
    pub temperature: TemperatureChart,
    pub season_boxes: BTreeMap<Season, BoxSummary>,
    pub weather_boxes: BTreeMap<Weather, BoxSummary>,
    pub correlation: CorrelationMatrix,
}

impl DashboardView {
    pub fn compute(dataset: &RentalDataset, spec: &FilterSpec, options: ViewOptions) -> Self {
        let base = filter(dataset, &spec.without_refinements());

        let hours_only = FilterSpec {
            hours: spec.hours,
            ..FilterSpec::match_all()
        };
        let hourly_view = refine(base.iter().copied(), &hours_only);

        let temperature_only = FilterSpec {
            temperature: spec.temperature,
            ..FilterSpec::match_all()
        };
        let temperature_view = refine(base.iter().copied(), &temperature_only);

        log::debug!(
            "recomputed view: {} of {} records ({} hourly, {} in temperature range)",
            base.len(),
            dataset.len(),
            hourly_view.len(),
            temperature_view.len()
        );

        DashboardView {
            total_records: dataset.len(),
            filtered_records: base.len(),
            distribution: distribution(&base, options.histogram_bins),
            season_means: mean_by_season(base.iter().copied(), ValueField::DailyCount),
            weather_means: mean_by_weather(base.iter().copied(), ValueField::DailyCount),
            hourly_means: mean_by_hour(hourly_view.iter().copied(), ValueField::HourlyCount),
            temperature: temperature_chart(&base, &temperature_view),
            season_boxes: boxes_by(&base, |r| r.season),
            weather_boxes: boxes_by(&base, |r| r.weather),
            correlation: correlation_matrix(base.iter().copied()),
        }
    }
}

fn daily_counts(records: &[&RentalRecord]) -> Vec<f64> {
    records.iter().map(|r| f64::from(r.daily_count)).collect()
}

fn distribution(records: &[&RentalRecord], bins: usize) -> Distribution {
    let counts = daily_counts(records);
    let bins = histogram(&counts, bins);
    // Scale density to "records per bin" so it overlays the bars.
    let scale = counts.len() as f64 * bins.first().map_or(0.0, HistogramBin::width);
    let kde = gaussian_kde(&counts, KDE_POINTS)
        .into_iter()
        .map(|[x, d]| [x, d * scale])
        .collect();
    Distribution { bins, kde }
}

fn temperature_chart(base: &[&RentalRecord], view: &[&RentalRecord]) -> TemperatureChart {
    let points: Vec<[f64; 2]> = view
        .iter()
        .map(|r| [r.temperature, f64::from(r.daily_count)])
        .collect();
    TemperatureChart {
        fit: linear_regression(&points),
        points,
        bounds: temperature_bounds(base.iter().copied()),
        span: temperature_bounds(view.iter().copied()),
    }
}

fn boxes_by<K: Ord>(records: &[&RentalRecord], key: impl Fn(&RentalRecord) -> K) -> BTreeMap<K, BoxSummary> {
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups.entry(key(*r)).or_default().push(f64::from(r.daily_count));
    }
    groups
        .into_iter()
        .filter_map(|(k, values)| Some((k, BoxSummary::compute(&values)?)))
        .collect()
}

// ---------------------------------------------------------------------------
// Presentation boundary
// ---------------------------------------------------------------------------

/// A collaborator that renders a computed view (text report, GUI, …).
pub trait Presenter {
    fn present(&mut self, view: &DashboardView) -> anyhow::Result<()>;
}
