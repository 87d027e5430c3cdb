//! OpenWeatherMap current-weather client

use super::{WeatherError, WeatherReport};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Client for `/data/2.5/weather` in metric units
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Unreachable(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/data/2.5/weather", base_url.trim_end_matches('/')),
        })
    }

    pub async fn by_city(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        self.fetch(&[("q", city.to_string())]).await
    }

    pub async fn by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        self.fetch(&[("lat", lat.to_string()), ("lon", lon.to_string())])
            .await
    }

    async fn fetch(&self, location: &[(&str, String)]) -> Result<WeatherReport, WeatherError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(location)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| WeatherError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::from_reqwest(&e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OwmErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(WeatherError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        parse_report(&body)
    }
}

pub(crate) fn parse_report(body: &str) -> Result<WeatherReport, WeatherError> {
    let raw: OwmResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::InvalidResponse(format!("{e} - body: {body}")))?;

    Ok(WeatherReport {
        name: raw.name,
        temp_c: raw.main.as_ref().and_then(|m| m.temp),
        feels_like_c: raw.main.as_ref().and_then(|m| m.feels_like),
        humidity_pct: raw.main.as_ref().and_then(|m| m.humidity),
        description: raw.weather.into_iter().next().map(|w| w.description),
    })
}

// OpenWeatherMap API types

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: Option<String>,
    main: Option<OwmMain>,
    #[serde(default)]
    weather: Vec<OwmCondition>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmErrorResponse {
    message: String,
}
