//! Plain-text presenter used by `bike-dashboard --report`.

use std::io::Write;

use anyhow::Result;

use crate::data::aggregate::labelled;
use crate::data::model::CategoryLabel;
use crate::stats::BoxSummary;
use crate::view::{DashboardView, Presenter};

/// Writes each chart of a [`DashboardView`] as a small table.
pub struct TextReport<W: Write> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{}", "-".repeat(title.chars().count()))?;
        Ok(())
    }

    fn means(&mut self, title: &str, series: &[(String, f64)]) -> Result<()> {
        self.heading(title)?;
        if series.is_empty() {
            writeln!(self.out, "  (no data)")?;
        }
        for (label, mean) in series {
            writeln!(self.out, "  {label:<22}{mean:>10.1}")?;
        }
        Ok(())
    }

    fn boxes<K: CategoryLabel>(
        &mut self,
        title: &str,
        boxes: &std::collections::BTreeMap<K, BoxSummary>,
    ) -> Result<()> {
        self.heading(title)?;
        if boxes.is_empty() {
            writeln!(self.out, "  (no data)")?;
        }
        for (key, b) in boxes {
            writeln!(
                self.out,
                "  {:<22}n={:<6} min={:<8.0} q1={:<8.0} median={:<8.0} q3={:<8.0} max={:<8.0} outliers={}",
                key.category_label(),
                b.count,
                b.lower_whisker,
                b.q1,
                b.median,
                b.q3,
                b.upper_whisker,
                b.outliers.len()
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for TextReport<W> {
    fn present(&mut self, view: &DashboardView) -> Result<()> {
        writeln!(
            self.out,
            "Bike sharing summary: {} of {} records selected",
            view.filtered_records, view.total_records
        )?;

        self.heading("Daily rentals distribution")?;
        let peak = view.distribution.bins.iter().map(|b| b.count).max().unwrap_or(0);
        for bin in &view.distribution.bins {
            let bar_len = if peak == 0 { 0 } else { bin.count * 40 / peak };
            writeln!(
                self.out,
                "  {:>8.0} - {:<8.0} {:>6} {}",
                bin.start,
                bin.end,
                bin.count,
                "#".repeat(bar_len)
            )?;
        }

        self.means("Mean daily rentals per season", &labelled(&view.season_means))?;
        self.means("Mean daily rentals per weather", &labelled(&view.weather_means))?;
        self.means("Mean hourly rentals per hour", &labelled(&view.hourly_means))?;

        self.heading("Temperature vs daily rentals")?;
        match &view.temperature.fit {
            Some(fit) => writeln!(
                self.out,
                "  rentals = {:.1} * temp + {:.1}   (R² = {:.3}, n = {})",
                fit.slope,
                fit.intercept,
                fit.r_squared,
                view.temperature.points.len()
            )?,
            None => writeln!(self.out, "  (not enough data for a regression)")?,
        }

        self.boxes("Daily rentals per season", &view.season_boxes)?;
        self.boxes("Daily rentals per weather", &view.weather_boxes)?;

        self.heading("Correlation")?;
        let cols = &view.correlation.columns;
        write!(self.out, "  {:<11}", "")?;
        for c in cols {
            write!(self.out, "{c:>11}")?;
        }
        writeln!(self.out)?;
        for (i, row_name) in cols.iter().enumerate() {
            write!(self.out, "  {row_name:<11}")?;
            for j in 0..cols.len() {
                match view.correlation.get(i, j) {
                    Some(r) => write!(self.out, "{r:>11.2}")?,
                    None => write!(self.out, "{:>11}", "-")?,
                }
            }
            writeln!(self.out)?;
        }

        self.out.flush()?;
        Ok(())
    }
}
