//! Trait abstractions for the external collaborators
//!
//! These traits enable testing the executor with mock implementations.

use crate::llm::{LlmError, LlmRequest, LlmService};
use crate::weather::{OpenWeatherClient, WeatherError, WeatherReport};
use async_trait::async_trait;
use std::sync::Arc;

/// Current-weather lookups by place name or position
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn by_city(&self, name: &str) -> Result<WeatherReport, WeatherError>;

    async fn by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError>;
}

/// Text generation under a fixed system instruction
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: WeatherProvider + ?Sized> WeatherProvider for Arc<T> {
    async fn by_city(&self, name: &str) -> Result<WeatherReport, WeatherError> {
        (**self).by_city(name).await
    }

    async fn by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        (**self).by_coords(lat, lon).await
    }
}

#[async_trait]
impl<T: GenerativeBackend + ?Sized> GenerativeBackend for Arc<T> {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError> {
        (**self).generate(prompt, system_instruction).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn by_city(&self, name: &str) -> Result<WeatherReport, WeatherError> {
        OpenWeatherClient::by_city(self, name).await
    }

    async fn by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        OpenWeatherClient::by_coords(self, lat, lon).await
    }
}

/// Stand-in when no weather API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledWeather;

#[async_trait]
impl WeatherProvider for DisabledWeather {
    async fn by_city(&self, _name: &str) -> Result<WeatherReport, WeatherError> {
        Err(WeatherError::NotConfigured)
    }

    async fn by_coords(&self, _lat: f64, _lon: f64) -> Result<WeatherReport, WeatherError> {
        Err(WeatherError::NotConfigured)
    }
}

/// Adapter to use an `LlmService` as the generative backend
pub struct LlmBackend {
    service: Arc<dyn LlmService>,
}

impl LlmBackend {
    pub fn new(service: Arc<dyn LlmService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl GenerativeBackend for LlmBackend {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError> {
        let request = LlmRequest::single(system_instruction, prompt);
        let response = self.service.complete(&request).await?;
        Ok(response.text)
    }
}
