use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

/// One row of the combined day+hour export.
#[derive(Serialize)]
struct Row {
    dteday: String,
    season: u8,
    workingday: u8,
    weathersit: u8,
    temp_day: f64,
    hr: u8,
    cnt_day: u32,
    cnt_hour: u32,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Astronomical seasons as the source data encodes them (spring starts ~Mar 21).
fn season_of(date: NaiveDate) -> u8 {
    let md = date.month() * 100 + date.day();
    match md {
        321..=620 => 1,
        621..=922 => 2,
        923..=1220 => 3,
        _ => 4,
    }
}

/// Share of the day's rentals falling into each hour.
fn hourly_profile(working: bool) -> [f64; 24] {
    let mut w = [0.0; 24];
    for (h, slot) in w.iter_mut().enumerate() {
        let h = h as f64;
        *slot = if working {
            0.2 + 3.0 * (-(h - 8.0).powi(2) / 2.0).exp()
                + 3.5 * (-(h - 17.5).powi(2) / 3.0).exp()
                + 0.8 * (-(h - 12.5).powi(2) / 6.0).exp()
        } else {
            0.1 + 2.0 * (-(h - 14.0).powi(2) / 12.0).exp()
        };
    }
    let total: f64 = w.iter().sum();
    w.map(|v| v / total)
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "combined_data.csv".to_string());

    let start = NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid start date");
    let days = 731;
    let holidays = [(1, 1), (7, 4), (11, 11), (12, 25)];

    let mut writer = csv::Writer::from_path(&output_path).expect("Failed to create output file");
    let mut rows = 0usize;

    for d in 0..days {
        let date = start + Duration::days(d);
        let is_weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let is_holiday = holidays.contains(&(date.month(), date.day()));
        let working = !is_weekend && !is_holiday;

        // Seasonal temperature curve peaking mid-July.
        let phase = (date.ordinal() as f64 - 200.0) / 365.0 * 2.0 * std::f64::consts::PI;
        let temp = (0.5 + 0.3 * phase.cos() + rng.gauss(0.0, 0.05)).clamp(0.02, 0.98);

        let roll = rng.next_f64();
        let weather = if roll < 0.63 {
            1
        } else if roll < 0.95 {
            2
        } else {
            3
        };

        // Growth between the two years, temperature and weather effects.
        let growth = if date.year() == 2011 { 1.0 } else { 1.6 };
        let weather_factor = [1.0, 0.85, 0.4][weather as usize - 1];
        let base = 1500.0 + 5500.0 * temp - 1800.0 * (temp - 0.7).max(0.0) * 3.0;
        let cnt_day = (base * growth * weather_factor + rng.gauss(0.0, 300.0)).max(20.0) as u32;

        let profile = hourly_profile(working);
        for (hr, share) in profile.iter().enumerate() {
            let noisy = (f64::from(cnt_day) * share * (1.0 + rng.gauss(0.0, 0.1))).max(0.0);
            writer
                .serialize(Row {
                    dteday: date.format("%Y-%m-%d").to_string(),
                    season: season_of(date),
                    workingday: u8::from(working),
                    weathersit: weather,
                    temp_day: (temp * 10_000.0).round() / 10_000.0,
                    hr: hr as u8,
                    cnt_day,
                    cnt_hour: noisy.round() as u32,
                })
                .expect("Failed to write row");
            rows += 1;
        }
    }
    writer.flush().expect("Failed to flush writer");

    println!("Wrote {rows} hourly rows ({days} days) to {output_path}");
}
