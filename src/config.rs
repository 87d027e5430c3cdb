//! Service configuration from environment variables

use crate::escalation::EscalationDetector;
use crate::facilities::{FacilityDirectory, FacilityFileError};
use crate::llm::{GEMINI_BASE_URL, GEMINI_MODEL};
use crate::runtime::Timeouts;
use crate::session::DEFAULT_SESSION_TTL;
use crate::weather::DEFAULT_BASE_URL as OWM_BASE_URL;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Facilities(#[from] FacilityFileError),
}

/// Everything the service needs at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Weather lookups are disabled without a key
    pub owm_api_key: Option<String>,
    pub owm_base_url: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub session_ttl: Duration,
    pub timeouts: Timeouts,
    /// Replaces the built-in keyword set when present
    pub escalation_keywords: Option<Vec<String>>,
    /// Replaces the built-in facility table when present
    pub facilities_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        Ok(Self {
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| GEMINI_MODEL.to_string()),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            owm_api_key: get("OWM_API_KEY"),
            owm_base_url: get("OWM_BASE_URL").unwrap_or_else(|| OWM_BASE_URL.to_string()),
            port: parse_or("HEALTHDESK_PORT", get("HEALTHDESK_PORT"), DEFAULT_PORT)?,
            cors_origins: get("HEALTHDESK_CORS_ORIGINS")
                .map_or_else(|| vec![DEFAULT_CORS_ORIGIN.to_string()], |v| split_list(&v)),
            session_ttl: secs_or(
                "HEALTHDESK_SESSION_TTL_SECS",
                get("HEALTHDESK_SESSION_TTL_SECS"),
                DEFAULT_SESSION_TTL,
            )?,
            timeouts: Timeouts {
                backend: secs_or(
                    "HEALTHDESK_BACKEND_TIMEOUT_SECS",
                    get("HEALTHDESK_BACKEND_TIMEOUT_SECS"),
                    Timeouts::default().backend,
                )?,
                weather: secs_or(
                    "HEALTHDESK_WEATHER_TIMEOUT_SECS",
                    get("HEALTHDESK_WEATHER_TIMEOUT_SECS"),
                    Timeouts::default().weather,
                )?,
            },
            escalation_keywords: get("HEALTHDESK_ESCALATION_KEYWORDS").map(|v| split_list(&v)),
            facilities_file: get("HEALTHDESK_FACILITIES_FILE").map(PathBuf::from),
        })
    }

    pub fn escalation_detector(&self) -> EscalationDetector {
        self.escalation_keywords
            .as_ref()
            .map_or_else(EscalationDetector::default, EscalationDetector::new)
    }

    /// Facility table from the configured file, or the built-in one
    pub fn facility_directory(&self) -> Result<FacilityDirectory, ConfigError> {
        match &self.facilities_file {
            Some(path) => Ok(FacilityDirectory::from_json_file(path)?),
            None => Ok(FacilityDirectory::builtin()),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T>(var: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            }),
        },
    }
}

fn secs_or(
    var: &'static str,
    value: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or(var, value.clone(), default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            var,
            value: value.unwrap_or_default(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_missing_gemini_key_is_fatal() {
        let err = from_pairs(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));

        let err = from_pairs(&[("GEMINI_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[("GEMINI_API_KEY", "k")]).unwrap();
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_origins, ["http://localhost:5173"]);
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
        assert_eq!(config.timeouts.backend, Duration::from_secs(30));
        assert_eq!(config.timeouts.weather, Duration::from_secs(5));
        assert!(config.owm_api_key.is_none());
        assert!(config.escalation_keywords.is_none());
        assert!(config.facilities_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("GEMINI_API_KEY", "k"),
            ("OWM_API_KEY", "w"),
            ("HEALTHDESK_PORT", "9090"),
            ("HEALTHDESK_CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("HEALTHDESK_SESSION_TTL_SECS", "60"),
            ("HEALTHDESK_ESCALATION_KEYWORDS", "seizure, stroke"),
        ])
        .unwrap();

        assert_eq!(config.owm_api_key.as_deref(), Some("w"));
        assert_eq!(config.port, 9090);
        assert_eq!(config.cors_origins, ["https://a.example", "https://b.example"]);
        assert_eq!(config.session_ttl, Duration::from_secs(60));

        let detector = config.escalation_detector();
        assert!(detector.is_severe("possible STROKE"));
        assert!(!detector.is_severe("chest pain"));
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = from_pairs(&[("GEMINI_API_KEY", "k"), ("HEALTHDESK_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "HEALTHDESK_PORT", .. }));

        let err = from_pairs(&[
            ("GEMINI_API_KEY", "k"),
            ("HEALTHDESK_BACKEND_TIMEOUT_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "HEALTHDESK_BACKEND_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn test_facility_directory_defaults_to_builtin() {
        let config = from_pairs(&[("GEMINI_API_KEY", "k")]).unwrap();
        let directory = config.facility_directory().unwrap();
        assert_eq!(directory.lookup("delhi"), ["AIIMS", "Sir Ganga Ram Hospital"]);
    }

    #[test]
    fn test_unreadable_facility_file_is_error() {
        let config = from_pairs(&[
            ("GEMINI_API_KEY", "k"),
            ("HEALTHDESK_FACILITIES_FILE", "/nonexistent/facilities.json"),
        ])
        .unwrap();
        assert!(matches!(
            config.facility_directory(),
            Err(ConfigError::Facilities(_))
        ));
    }
}
