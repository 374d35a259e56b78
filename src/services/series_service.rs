use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Good, PricePoint, PriceSeries};
use crate::utils::Table;

/// Source of uniform values in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Entropy-seeded source; output is not reproducible across runs
pub struct ThreadRandom(StdRng);

impl Default for ThreadRandom {
    fn default() -> Self {
        ThreadRandom(StdRng::from_entropy())
    }
}

impl RandomSource for ThreadRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Fixed constants for the random walk
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub goods: Vec<Good>,
    pub point_count: usize,
    pub interval: Duration,
    /// Total width of the symmetric delta interval
    pub swing: f64,
    pub floor: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            goods: Good::defaults(),
            point_count: 8,
            interval: Duration::hours(1),
            swing: 12.0,
            floor: 5.0,
        }
    }
}

/// Produces hourly random-walk prices for a fixed set of goods
pub struct SeriesGenerator<R: RandomSource> {
    config: GeneratorConfig,
    random: R,
}

impl<R: RandomSource> SeriesGenerator<R> {
    pub fn new(config: GeneratorConfig, random: R) -> Self {
        SeriesGenerator { config, random }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a series ending at the current instant
    pub fn generate(&mut self) -> PriceSeries {
        self.generate_at(Utc::now())
    }

    /// Generate a series whose last point is `now`
    pub fn generate_at(&mut self, now: DateTime<Utc>) -> PriceSeries {
        let goods: Vec<String> = self.config.goods.iter().map(|g| g.name.clone()).collect();
        let mut current: Vec<f64> = self.config.goods.iter().map(|g| g.base_price).collect();
        let mut points = Vec::with_capacity(self.config.point_count);

        for offset in (0..self.config.point_count).rev() {
            let timestamp = now - self.config.interval * offset as i32;
            for price in current.iter_mut() {
                *price = next_price(*price, self.random.next_unit(), self.config.swing, self.config.floor);
            }
            points.push(PricePoint {
                timestamp,
                prices: current.clone(),
            });
        }

        PriceSeries::new(goods, points)
    }
}

/// One walk step: shift `previous` by `(unit - 0.5) * swing`, round to cents,
/// never dropping below `floor`
pub fn next_price(previous: f64, unit: f64, swing: f64, floor: f64) -> f64 {
    let delta = (unit - 0.5) * swing;
    round_cents(previous + delta).max(floor)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a series as a plain text table for logging
pub fn format_series_table(series: &PriceSeries) -> String {
    let mut headers = vec!["Time"];
    headers.extend(series.goods().iter().map(String::as_str));
    let mut table = Table::new(headers);

    for point in series.points() {
        let mut cells = vec![point.timestamp.format("%Y-%m-%d %H:%M").to_string()];
        cells.extend(point.prices.iter().map(|p| format!("{:.2}", p)));
        table.add_row(cells.iter().map(String::as_str).collect());
    }

    table.render()
}
