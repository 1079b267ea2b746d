//! Mock forecast generation.

use crate::models::{SUMMARIES, WeatherForecast};
use chrono::{Days, NaiveDate};
use rand::{Rng, seq::SliceRandom};
use std::ops::RangeInclusive;

/// Number of days covered by a forecast
pub const FORECAST_DAYS: u64 = 5;

/// Range temperatures are drawn from, in degrees Celsius
pub const TEMPERATURE_RANGE_C: RangeInclusive<i32> = -20..=54;

/// Produce forecasts for the [`FORECAST_DAYS`] days following `today`
///
/// Temperature and summary are drawn independently and uniformly for each
/// day.
pub fn generate_forecast<R>(rng: &mut R, today: NaiveDate) -> Vec<WeatherForecast>
where
    R: Rng + ?Sized,
{
    (1..=FORECAST_DAYS)
        .map(|offset| {
            let date = today
                .checked_add_days(Days::new(offset))
                .unwrap_or(NaiveDate::MAX);
            let temperature_c = rng.gen_range(TEMPERATURE_RANGE_C);
            let summary = SUMMARIES.choose(&mut *rng).map(|s| s.to_string());
            WeatherForecast::new(date, temperature_c, summary)
        })
        .collect()
}
