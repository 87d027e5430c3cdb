//! Mock implementations for testing
//!
//! These mocks enable executor and API tests without real I/O.

use super::traits::{GenerativeBackend, WeatherProvider};
use crate::llm::LlmError;
use crate::session::Clock;
use crate::weather::{WeatherError, WeatherReport};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Manual Clock
// ============================================================================

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::TimeDelta::from_std(by).unwrap();
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ============================================================================
// Mock Weather Provider
// ============================================================================

/// Weather provider answering from fixed tables
#[derive(Default)]
pub struct MockWeather {
    cities: HashMap<String, WeatherReport>,
    coords: Option<WeatherReport>,
    fail_coords: bool,
    /// Record of lookups made (`city:<name>` or `coords:<lat>,<lon>`)
    pub calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockWeather {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer city lookups for `name` (case-insensitive)
    pub fn with_city(mut self, name: &str, temp_c: f64) -> Self {
        self.cities.insert(
            name.to_lowercase(),
            WeatherReport {
                name: Some(name.to_string()),
                temp_c: Some(temp_c),
                ..Default::default()
            },
        );
        self
    }

    /// Resolve every coordinate lookup to `name`
    pub fn with_coords_place(mut self, name: &str) -> Self {
        self.coords = Some(WeatherReport {
            name: Some(name.to_string()),
            ..Default::default()
        });
        self
    }

    /// Coordinate lookups succeed but carry no place name
    pub fn with_nameless_coords(mut self) -> Self {
        self.coords = Some(WeatherReport::default());
        self
    }

    /// Coordinate lookups fail as unreachable
    pub fn with_failing_coords(mut self) -> Self {
        self.fail_coords = true;
        self
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for MockWeather {
    async fn by_city(&self, name: &str) -> Result<WeatherReport, WeatherError> {
        self.calls.lock().unwrap().push(format!("city:{name}"));
        self.cities
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| WeatherError::Rejected {
                status: 404,
                message: "city not found".to_string(),
            })
    }

    async fn by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReport, WeatherError> {
        self.calls.lock().unwrap().push(format!("coords:{lat},{lon}"));
        if self.fail_coords {
            return Err(WeatherError::Unreachable("mock outage".to_string()));
        }
        self.coords.clone().ok_or_else(|| WeatherError::Rejected {
            status: 400,
            message: "wrong latitude".to_string(),
        })
    }
}

// ============================================================================
// Mock Generative Backend
// ============================================================================

/// Backend that returns queued results
pub struct MockBackend {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    /// Record of `(prompt, system_instruction)` pairs
    pub requests: Mutex<Vec<(String, String)>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful generation
    pub fn queue_response(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a failed generation
    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap()
            .push((prompt.to_string(), system_instruction.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::unreachable("No mock response queued")))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError> {
        self.next(prompt, system_instruction)
    }
}

// ============================================================================
// Delayed Mock Backend (for timeout testing)
// ============================================================================

/// Backend that sleeps before answering
pub struct DelayedMockBackend {
    inner: MockBackend,
    delay: Duration,
}

impl DelayedMockBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockBackend::new(),
            delay,
        }
    }

    pub fn queue_response(&self, text: impl Into<String>) {
        self.inner.queue_response(text);
    }
}

#[async_trait]
impl GenerativeBackend for DelayedMockBackend {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError> {
        tokio::time::sleep(self.delay).await;
        self.inner.next(prompt, system_instruction)
    }
}
