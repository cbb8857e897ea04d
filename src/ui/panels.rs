use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use bike_dashboard::data::filter::WorkingDayFilter;
use bike_dashboard::data::model::{Season, Weather};

use crate::color::{season_color, weather_color};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let bounds = dataset.date_bounds();

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Seasons ----
            let n_selected = state.filters.seasons.len();
            ui.strong(format!("Season  ({n_selected}/{})", Season::ALL.len()));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.filters.seasons = Season::ALL.into_iter().collect();
                    changed = true;
                }
                if ui.small_button("None").clicked() {
                    state.filters.seasons.clear();
                    changed = true;
                }
            });
            for season in Season::ALL {
                let mut checked = state.filters.seasons.contains(&season);
                let text = RichText::new(season.label()).color(season_color(season));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_season(season);
                }
            }
            ui.separator();

            // ---- Working day ----
            ui.strong("Working day or holiday");
            egui::ComboBox::from_id_salt("working_day")
                .selected_text(state.filters.working_day.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for choice in WorkingDayFilter::ALL {
                        if ui
                            .selectable_value(&mut state.filters.working_day, choice, choice.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });
            ui.separator();

            // ---- Date range ----
            ui.strong("Date range");
            if let Some(range) = &mut state.filters.date_range {
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("From");
                    changed |= ui
                        .add(DatePickerButton::new(&mut range.start).id_salt("start_date"))
                        .changed();
                });
                ui.horizontal(|ui: &mut Ui| {
                    ui.label("To");
                    changed |= ui
                        .add(DatePickerButton::new(&mut range.end).id_salt("end_date"))
                        .changed();
                });
                if range.start > range.end {
                    ui.label(RichText::new("Start date is after end date").color(Color32::YELLOW));
                }
                if let Some((lo, hi)) = bounds {
                    if ui.small_button("Full range").clicked() {
                        range.start = lo;
                        range.end = hi;
                        changed = true;
                    }
                }
            }
            ui.separator();

            // ---- Weather ----
            let n_weather = state.filters.weather.as_ref().map_or(Weather::ALL.len(), |w| w.len());
            ui.strong(format!("Weather  ({n_weather}/{})", Weather::ALL.len()));
            for weather in Weather::ALL {
                let mut checked = state
                    .filters
                    .weather
                    .as_ref()
                    .map_or(true, |w| w.contains(&weather));
                let text = RichText::new(weather.label()).color(weather_color(weather));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_weather(weather);
                }
            }
        });

    if changed {
        state.reset_temperature_range();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar and the chart tab strip.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "{} records loaded, {} selected",
                view.total_records, view.filtered_records
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open bike sharing data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match bike_dashboard::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records from {} (dates {:?})",
                    dataset.len(),
                    path.display(),
                    dataset.date_bounds()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
