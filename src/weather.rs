//! Current-weather lookup
//!
//! Used twice per consultation at most: resolving a place name from
//! coordinates, and fetching conditions for the final prompt.

mod error;
mod openweather;

pub use error::WeatherError;
pub use openweather::{OpenWeatherClient, DEFAULT_BASE_URL};

use serde::Serialize;

/// Current conditions at a place
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Place name as resolved by the provider
    pub name: Option<String>,
    pub temp_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub description: Option<String>,
}

impl WeatherReport {
    /// Resolved place name, if the provider returned a non-blank one
    pub fn place_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// One-line summary for the prompt, e.g. `31.2°C (feels 35.0°C), 62% humidity, haze`
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(temp) = self.temp_c {
            parts.push(match self.feels_like_c {
                Some(feels) => format!("{temp:.1}°C (feels {feels:.1}°C)"),
                None => format!("{temp:.1}°C"),
            });
        }
        if let Some(humidity) = self.humidity_pct {
            parts.push(format!("{humidity}% humidity"));
        }
        if let Some(description) = &self.description {
            parts.push(description.clone());
        }

        if parts.is_empty() {
            "unknown".to_string()
        } else {
            parts.join(", ")
        }
    }
}
