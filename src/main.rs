mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use bike_dashboard::data::filter::FilterSpec;
use bike_dashboard::data::loader::load_file;
use bike_dashboard::report::TextReport;
use bike_dashboard::view::{DEFAULT_HISTOGRAM_BINS, DashboardView, Presenter, ViewOptions};
use clap::Parser;
use eframe::egui;

use app::BikeDashboardApp;

/// Interactive bike sharing dashboard.
#[derive(Debug, Parser)]
#[command(name = "bike-dashboard", version, about)]
struct Cli {
    /// Combined day/hour dataset (.csv, .json or .parquet).
    #[arg(env = "BIKE_DASHBOARD_DATA")]
    data: Option<PathBuf>,

    /// Print a text summary for the unfiltered data instead of opening a window.
    #[arg(long)]
    report: bool,

    /// Number of bins in the daily rentals histogram.
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    bins: usize,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = ViewOptions {
        histogram_bins: cli.bins,
    };

    // A path given at startup must load; a broken dataset is fatal.
    let dataset = match &cli.data {
        Some(path) => {
            if !path.exists() {
                log::warn!("Dataset path {} does not exist", path.display());
            }
            let ds = load_file(path)?;
            log::info!("Loaded {} records from {}", ds.len(), path.display());
            Some(ds)
        }
        None => None,
    };

    if cli.report {
        let Some(dataset) = dataset else {
            bail!("--report needs a dataset path (argument or BIKE_DASHBOARD_DATA)");
        };
        let view = DashboardView::compute(&dataset, &FilterSpec::match_all(), options);
        let stdout = std::io::stdout();
        return TextReport::new(stdout.lock()).present(&view);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bike Sharing Dashboard",
        native_options,
        Box::new(move |_cc| {
            let mut app = BikeDashboardApp::new(options);
            if let Some(ds) = dataset {
                app.state.set_dataset(ds);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
