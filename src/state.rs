use bike_dashboard::data::filter::{DateRange, FilterSpec, HourRange, TemperatureRange};
use bike_dashboard::data::model::{RentalDataset, Season, Weather};
use bike_dashboard::view::{DashboardView, ViewOptions};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Chart tab shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Distribution,
    Seasons,
    PeakHours,
    Temperature,
    Weather,
    Correlation,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Distribution,
        Tab::Seasons,
        Tab::PeakHours,
        Tab::Temperature,
        Tab::Weather,
        Tab::Correlation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Distribution => "Distribution",
            Tab::Seasons => "Seasons",
            Tab::PeakHours => "Peak Hours",
            Tab::Temperature => "Temperature",
            Tab::Weather => "Weather",
            Tab::Correlation => "Correlation",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<RentalDataset>,

    /// Current sidebar selection plus chart refinements.
    pub filters: FilterSpec,

    /// Charts for the current selection, rebuilt whenever `filters` changes.
    pub view: Option<DashboardView>,

    pub options: ViewOptions,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            dataset: None,
            filters: FilterSpec::match_all(),
            view: None,
            options,
            tab: Tab::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset filters to show everything.
    pub fn set_dataset(&mut self, dataset: RentalDataset) {
        self.filters = initial_filters(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view after a filter change.
    pub fn refilter(&mut self) {
        self.view = self
            .dataset
            .as_ref()
            .map(|ds| DashboardView::compute(ds, &self.filters, self.options));
    }

    pub fn toggle_season(&mut self, season: Season) {
        if !self.filters.seasons.remove(&season) {
            self.filters.seasons.insert(season);
        }
        self.reset_temperature_range();
    }

    pub fn toggle_weather(&mut self, weather: Weather) {
        let selected = self
            .filters
            .weather
            .get_or_insert_with(|| Weather::ALL.into_iter().collect());
        if !selected.remove(&weather) {
            selected.insert(weather);
        }
        self.reset_temperature_range();
    }

    /// Reset the temperature refinement to the span of the current selection.
    ///
    /// Every sidebar change ends here, so the slider never sits outside the
    /// filtered records.
    pub fn reset_temperature_range(&mut self) {
        self.filters.temperature = None;
        self.refilter();
        if let Some((lo, hi)) = self.view.as_ref().and_then(|v| v.temperature.bounds) {
            self.filters.temperature = Some(TemperatureRange::new(lo, hi));
        }
    }
}

/// Every season and weather condition, the full date span, all hours.
fn initial_filters(dataset: &RentalDataset) -> FilterSpec {
    FilterSpec {
        weather: Some(Weather::ALL.into_iter().collect()),
        date_range: dataset
            .date_bounds()
            .map(|(start, end)| DateRange::new(start, end)),
        hours: Some(HourRange::FULL_DAY),
        temperature: dataset
            .temperature_bounds()
            .map(|(lo, hi)| TemperatureRange::new(lo, hi)),
        ..FilterSpec::match_all()
    }
}
