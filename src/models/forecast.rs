//! Weather forecast response model.

use chrono::NaiveDate;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// The fixed set of summaries a forecast can carry
pub const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// A single day of forecast data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
pub struct WeatherForecast {
    /// Calendar date the forecast applies to
    pub date: NaiveDate,
    /// Temperature in degrees Celsius
    #[serde(rename = "temperatureC")]
    pub temperature_c: i32,
    /// Temperature in degrees Fahrenheit, derived from `temperatureC`
    #[serde(rename = "temperatureF")]
    pub temperature_f: i32,
    /// Short description of the day
    pub summary: Option<String>,
}

impl WeatherForecast {
    pub fn new(date: NaiveDate, temperature_c: i32, summary: Option<String>) -> Self {
        Self {
            date,
            temperature_c,
            temperature_f: fahrenheit(temperature_c),
            summary,
        }
    }
}

/// Convert Celsius to Fahrenheit, truncating toward zero
pub fn fahrenheit(celsius: i32) -> i32 {
    32 + (f64::from(celsius) / 0.5556) as i32
}
