//! Runtime for executing intake turns
//!
//! Wires the session store, the state machine rules and the external
//! collaborators (weather, generative backend) together.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{IntakeRuntime, Timeouts};
pub use traits::*;

use crate::config::AppConfig;
use crate::facilities::FacilityDirectory;
use crate::llm::{GeminiService, LlmError, LoggingService};
use crate::session::{SessionStore, SystemClock};
use crate::weather::{OpenWeatherClient, WeatherError};
use std::sync::Arc;
use thiserror::Error;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = IntakeRuntime<Arc<dyn WeatherProvider>, LlmBackend>;

/// Failure to construct a collaborator client
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("generative backend: {0}")]
    Backend(#[from] LlmError),
    #[error("weather provider: {0}")]
    Weather(#[from] WeatherError),
}

impl ProductionRuntime {
    /// Build the runtime from configuration with real HTTP clients
    pub fn from_config(
        config: &AppConfig,
        directory: FacilityDirectory,
    ) -> Result<Self, StartupError> {
        let gemini = GeminiService::new(
            config.gemini_api_key.clone(),
            &config.gemini_model,
            &config.gemini_base_url,
            config.timeouts.backend,
        )?;
        let backend = LlmBackend::new(Arc::new(LoggingService::new(Arc::new(gemini))));

        let weather: Arc<dyn WeatherProvider> = match &config.owm_api_key {
            Some(key) => Arc::new(OpenWeatherClient::new(
                key.clone(),
                &config.owm_base_url,
                config.timeouts.weather,
            )?),
            None => {
                tracing::warn!("OWM_API_KEY not set, weather lookups disabled");
                Arc::new(DisabledWeather)
            }
        };

        let detector = config.escalation_detector();
        tracing::info!(keywords = ?detector.keywords(), "Escalation keywords");

        let sessions = SessionStore::new(config.session_ttl, Arc::new(SystemClock));

        Ok(IntakeRuntime::new(sessions, weather, backend)
            .with_detector(detector)
            .with_directory(directory)
            .with_timeouts(config.timeouts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::{AdviceMode, Inbound, Outbound, Stage};

    fn config(owm_key: Option<&str>) -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("test-key".to_string()),
            "OWM_API_KEY" => owm_key.map(str::to_string),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_from_config_without_weather_key() {
        let runtime =
            ProductionRuntime::from_config(&config(None), FacilityDirectory::builtin()).unwrap();
        assert_eq!(runtime.sessions().len().await, 0);

        // prompts never touch the network
        let out = runtime
            .handle_turn("u1", &Inbound::default().with_mode(AdviceMode::Text))
            .await;
        assert_eq!(out.stage(), Stage::AskLocation);
        assert!(matches!(out, Outbound::Prompt { .. }));
    }

    #[tokio::test]
    async fn test_disabled_weather_reports_not_configured() {
        let err = DisabledWeather.by_city("Delhi").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotConfigured));
    }

    #[test]
    fn test_from_config_with_weather_key() {
        assert!(
            ProductionRuntime::from_config(&config(Some("w")), FacilityDirectory::builtin())
                .is_ok()
        );
    }
}
