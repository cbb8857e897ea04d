use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points,
};

use bike_dashboard::data::filter::{HourRange, TemperatureRange};
use bike_dashboard::data::model::{Season, Weather};
use bike_dashboard::stats::BoxSummary;
use bike_dashboard::view::DashboardView;

use crate::color::{coolwarm, season_color, weather_color};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Central panel – one chart tab at a time
// ---------------------------------------------------------------------------

/// Render the selected chart tab in the central panel.
pub fn chart_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(view) = state.view.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view rentals  (File → Open…)");
        });
        return;
    };

    if view.filtered_records == 0 {
        ui.label(RichText::new("No records match the current filters.").color(Color32::YELLOW));
    }

    match state.tab {
        Tab::Distribution => distribution_chart(ui, &view),
        Tab::Seasons => season_chart(ui, &view),
        Tab::PeakHours => peak_hours_chart(ui, state, &view),
        Tab::Temperature => temperature_chart(ui, state, &view),
        Tab::Weather => weather_charts(ui, &view),
        Tab::Correlation => correlation_heatmap(ui, &view),
    }
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

fn distribution_chart(ui: &mut Ui, view: &DashboardView) {
    ui.heading("Daily rentals distribution");

    let bars: Vec<Bar> = view
        .distribution
        .bins
        .iter()
        .map(|b| Bar::new(b.center(), b.count as f64).width(b.width()))
        .collect();
    let kde: PlotPoints = view.distribution.kde.iter().copied().collect();

    Plot::new("distribution_plot")
        .legend(Legend::default())
        .x_axis_label("Daily rentals")
        .y_axis_label("Frequency")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Days")
                    .color(Color32::from_rgb(70, 110, 200)),
            );
            plot_ui.line(Line::new(kde).name("KDE").color(Color32::DARK_BLUE).width(2.0));
        });
}

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

fn season_chart(ui: &mut Ui, view: &DashboardView) {
    ui.heading("Mean daily rentals per season");

    Plot::new("season_plot")
        .legend(Legend::default())
        .x_axis_label("Season (1: Spring, 2: Summer, 3: Fall, 4: Winter)")
        .y_axis_label("Mean daily rentals")
        .show(ui, |plot_ui| {
            for (season, mean) in &view.season_means {
                let bar = Bar::new(f64::from(season.code()), *mean).width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(season.label())
                        .color(season_color(*season)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Peak hours
// ---------------------------------------------------------------------------

fn peak_hours_chart(ui: &mut Ui, state: &mut AppState, view: &DashboardView) {
    ui.heading("Mean hourly rentals by hour of day");

    let mut hours = state.filters.hours.unwrap_or(HourRange::FULL_DAY);
    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Hours");
        changed |= ui.add(egui::Slider::new(&mut hours.start, 0..=23)).changed();
        ui.label("to");
        changed |= ui.add(egui::Slider::new(&mut hours.end, 0..=23)).changed();
    });
    if changed {
        state.filters.hours = Some(hours);
        state.refilter();
    }

    let series: Vec<[f64; 2]> = view
        .hourly_means
        .iter()
        .map(|(h, mean)| [f64::from(*h), *mean])
        .collect();

    Plot::new("hourly_plot")
        .x_axis_label("Hour")
        .y_axis_label("Mean hourly rentals")
        .include_x(0.0)
        .include_x(23.0)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .color(Color32::from_rgb(255, 165, 0))
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(series))
                    .radius(3.5)
                    .color(Color32::from_rgb(255, 165, 0)),
            );
        });
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

fn temperature_chart(ui: &mut Ui, state: &mut AppState, view: &DashboardView) {
    ui.heading("Temperature vs daily rentals");

    if let Some((lo, hi)) = view.temperature.bounds {
        let mut range = state
            .filters
            .temperature
            .unwrap_or(TemperatureRange::new(lo, hi));
        let mut changed = false;
        ui.horizontal(|ui: &mut Ui| {
            ui.label("Temperature");
            changed |= ui.add(egui::Slider::new(&mut range.min, lo..=hi)).changed();
            ui.label("to");
            changed |= ui.add(egui::Slider::new(&mut range.max, lo..=hi)).changed();
            if ui.small_button("Reset").clicked() {
                state.reset_temperature_range();
            }
        });
        if changed {
            state.filters.temperature = Some(range);
            state.refilter();
        }
    }

    if let Some(fit) = &view.temperature.fit {
        ui.label(format!(
            "rentals ≈ {:.0} × temp + {:.0}   (R² = {:.3})",
            fit.slope, fit.intercept, fit.r_squared
        ));
    }

    let scatter = PlotPoints::from(view.temperature.points.clone());
    let fit_line = view.temperature.fit.zip(view.temperature.span).map(|(fit, (lo, hi))| {
        Line::new(PlotPoints::from(vec![[lo, fit.predict(lo)], [hi, fit.predict(hi)]]))
            .name("Linear fit")
            .color(Color32::RED)
            .width(2.0)
    });

    Plot::new("temperature_plot")
        .legend(Legend::default())
        .x_axis_label("Temperature (normalized)")
        .y_axis_label("Daily rentals")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(scatter)
                    .name("Days")
                    .radius(2.5)
                    .color(Color32::from_rgb(128, 0, 128)),
            );
            if let Some(line) = fit_line {
                plot_ui.line(line);
            }
        });
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

fn box_elem(x: f64, name: &str, b: &BoxSummary, color: Color32) -> BoxElem {
    BoxElem::new(
        x,
        BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
    )
    .name(name)
    .box_width(0.5)
    .fill(color.gamma_multiply(0.4))
    .stroke(egui::Stroke::new(1.5, color))
}

fn outlier_points(x: f64, b: &BoxSummary) -> Vec<[f64; 2]> {
    b.outliers.iter().map(|y| [x, *y]).collect()
}

fn weather_charts(ui: &mut Ui, view: &DashboardView) {
    ui.heading("Mean daily rentals per weather condition");

    let height = (ui.available_height() / 2.0 - 20.0).max(150.0);

    Plot::new("weather_mean_plot")
        .legend(Legend::default())
        .height(height)
        .x_axis_label("Weather (1: Clear, 2: Misty, 3: Light precipitation)")
        .y_axis_label("Mean daily rentals")
        .show(ui, |plot_ui| {
            for (weather, mean) in &view.weather_means {
                let bar = Bar::new(f64::from(weather.code()), *mean).width(0.6);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(weather.label())
                        .color(weather_color(*weather)),
                );
            }
        });

    ui.heading("Daily rentals spread by season and weather");
    Plot::new("box_plot")
        .legend(Legend::default())
        .x_axis_label("Season 1-4 | Weather 6-8")
        .y_axis_label("Daily rentals")
        .show(ui, |plot_ui| {
            for (season, b) in &view.season_boxes {
                let x = f64::from(season.code());
                let color = season_color(*season);
                plot_ui.box_plot(
                    BoxPlot::new(vec![box_elem(x, season.label(), b, color)])
                        .name(season.label())
                        .color(color),
                );
                plot_ui.points(Points::new(PlotPoints::from(outlier_points(x, b))).color(color));
            }
            for (weather, b) in &view.weather_boxes {
                let x = weather_box_position(*weather);
                let color = weather_color(*weather);
                plot_ui.box_plot(
                    BoxPlot::new(vec![box_elem(x, weather.label(), b, color)])
                        .name(weather.label())
                        .color(color),
                );
                plot_ui.points(Points::new(PlotPoints::from(outlier_points(x, b))).color(color));
            }
        });
}

/// Weather boxes sit to the right of the four season boxes.
fn weather_box_position(weather: Weather) -> f64 {
    f64::from(Season::ALL.len() as u8 + 1 + weather.code())
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn correlation_heatmap(ui: &mut Ui, view: &DashboardView) {
    ui.heading("Correlation between variables");
    ui.add_space(8.0);

    let matrix = &view.correlation;
    egui::Grid::new("correlation_grid")
        .spacing([2.0, 2.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for name in &matrix.columns {
                ui.strong(name);
            }
            ui.end_row();

            for (i, row_name) in matrix.columns.iter().enumerate() {
                ui.strong(row_name);
                for j in 0..matrix.columns.len() {
                    let (fill, text) = match matrix.get(i, j) {
                        Some(r) => (coolwarm(r), format!("{r:.2}")),
                        None => (Color32::from_gray(60), String::new()),
                    };
                    egui::Frame::default()
                        .fill(fill)
                        .inner_margin(6.0)
                        .show(ui, |ui: &mut Ui| {
                            ui.label(RichText::new(text).color(Color32::BLACK).monospace());
                        });
                }
                ui.end_row();
            }
        });
}
