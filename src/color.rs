use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use bike_dashboard::data::model::{Season, Weather};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Category colours
// ---------------------------------------------------------------------------

pub fn season_color(season: Season) -> Color32 {
    let palette = generate_palette(Season::ALL.len());
    palette[usize::from(season.code() - 1)]
}

pub fn weather_color(weather: Weather) -> Color32 {
    match weather {
        Weather::Clear => hsl_to_color32(45.0, 0.85, 0.55),
        Weather::Misty => hsl_to_color32(210.0, 0.15, 0.6),
        Weather::LightPrecipitation => hsl_to_color32(215.0, 0.7, 0.5),
    }
}

// ---------------------------------------------------------------------------
// Diverging map for the correlation heatmap
// ---------------------------------------------------------------------------

/// Blue for -1, near-white for 0, red for +1.
pub fn coolwarm(r: f64) -> Color32 {
    let r = r.clamp(-1.0, 1.0) as f32;
    let hue = if r < 0.0 { 225.0 } else { 5.0 };
    let lightness = 0.95 - 0.45 * r.abs();
    hsl_to_color32(hue, 0.7, lightness)
}
