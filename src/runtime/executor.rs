//! Turn executor
//!
//! Walks the transition rules for one turn and performs the I/O the pure
//! rules cannot: the coordinate lookup in `AskLocation`, and the weather
//! lookup plus generation in `Answer`. Every collaborator call runs under
//! its own deadline; a missed deadline counts as a failure of that call.

use super::traits::{GenerativeBackend, WeatherProvider};
use crate::escalation::EscalationDetector;
use crate::facilities::FacilityDirectory;
use crate::llm::LlmError;
use crate::session::{Session, SessionStore};
use crate::state_machine::transition::{self, Rule, Step, RULES};
use crate::state_machine::{AdviceMode, Coordinates, FinalAnswer, Inbound, Outbound};
use crate::system_prompt::{compose_prompt, system_instruction};
use crate::weather::{WeatherError, WeatherReport};
use std::time::Duration;
use tokio::time::timeout;

/// Deadlines for collaborator calls
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub backend: Duration,
    pub weather: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            backend: Duration::from_secs(30),
            weather: Duration::from_secs(5),
        }
    }
}

/// Drives intake turns against the session store and collaborators
pub struct IntakeRuntime<W: WeatherProvider, B: GenerativeBackend> {
    sessions: SessionStore,
    weather: W,
    backend: B,
    detector: EscalationDetector,
    directory: FacilityDirectory,
    timeouts: Timeouts,
    system_instruction: String,
}

impl<W: WeatherProvider, B: GenerativeBackend> IntakeRuntime<W, B> {
    pub fn new(sessions: SessionStore, weather: W, backend: B) -> Self {
        Self {
            sessions,
            weather,
            backend,
            detector: EscalationDetector::default(),
            directory: FacilityDirectory::builtin(),
            timeouts: Timeouts::default(),
            system_instruction: system_instruction(),
        }
    }

    pub fn with_detector(mut self, detector: EscalationDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_directory(mut self, directory: FacilityDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one turn for `user_id`.
    ///
    /// Holds the user's session lock for the whole turn, so a double submit
    /// waits for the first turn instead of racing it.
    pub async fn handle_turn(&self, user_id: &str, inbound: &Inbound) -> Outbound {
        let turn_id = uuid::Uuid::new_v4();
        let mut session = self.sessions.checkout(user_id).await;
        let stage_before = session.stage;

        let outbound = self.advance(&mut session, inbound).await;

        tracing::info!(
            turn_id = %turn_id,
            user_id = %user_id,
            mode = session.mode.map_or("unset", AdviceMode::as_str),
            stage_before = %stage_before,
            stage_after = %session.stage,
            needs = ?session.needs(),
            reply_stage = %outbound.stage(),
            reply_len = outbound.reply().len(),
            "Turn handled"
        );
        drop(session);
        let sessions = self.sessions.len().await;
        tracing::debug!(sessions, "Session store size");
        if let Outbound::Answer(answer) = &outbound {
            if answer.escalate {
                tracing::warn!(
                    turn_id = %turn_id,
                    user_id = %user_id,
                    hospitals = answer.hospitals.len(),
                    "Severe symptoms, escalating"
                );
            }
        }

        outbound
    }

    /// Apply one inbound turn to `session`, possibly advancing several stages
    pub async fn advance(&self, session: &mut Session, inbound: &Inbound) -> Outbound {
        for rule in RULES {
            if !rule.applies_to(session) {
                continue;
            }

            let step = match rule {
                Rule::Mode => transition::apply_mode(session, inbound),
                Rule::Location => self.locate(session, inbound).await,
                Rule::Symptoms => transition::apply_symptoms(session, inbound),
                Rule::Answer => Step::Emit(Outbound::Answer(self.answer(session, inbound).await)),
            };

            if let Step::Emit(outbound) = step {
                return outbound;
            }
        }

        // Only reachable if a rule continued past the last stage
        transition::prompt_for(session.stage)
    }

    /// `AskLocation`: try the coordinates first, then a typed city name
    async fn locate(&self, session: &mut Session, inbound: &Inbound) -> Step {
        if let Some(coords) = inbound.coords {
            if let Some(place) = self.detect_place(coords).await {
                return transition::apply_detected_location(session, &place, inbound);
            }
        }
        transition::apply_manual_location(session, inbound)
    }

    async fn answer(&self, session: &mut Session, inbound: &Inbound) -> FinalAnswer {
        let location = session.location.clone().unwrap_or_default();
        let symptoms = session.symptoms.clone().unwrap_or_default();

        let weather = self.current_weather(location.trim()).await;
        let prompt = compose_prompt(inbound.tone(), &location, &symptoms, weather.as_ref());
        let generated = self.generate(&prompt).await;

        transition::finish(session, generated, &self.detector, &self.directory)
    }

    /// Place name for a position, `None` on any failure or a nameless result
    async fn detect_place(&self, coords: Coordinates) -> Option<String> {
        let result = timeout(
            self.timeouts.weather,
            self.weather.by_coords(coords.lat, coords.lon),
        )
        .await
        .unwrap_or_else(|_| Err(WeatherError::Timeout("coordinate lookup".to_string())));

        match result {
            Ok(report) => {
                let place = report.place_name().map(str::to_string);
                if place.is_none() {
                    tracing::info!(lat = coords.lat, lon = coords.lon, "Coordinates resolved to no place name");
                }
                place
            }
            Err(e) => {
                tracing::warn!(lat = coords.lat, lon = coords.lon, error = %e, "Coordinate lookup failed");
                None
            }
        }
    }

    async fn current_weather(&self, city: &str) -> Option<WeatherReport> {
        let result = timeout(self.timeouts.weather, self.weather.by_city(city))
            .await
            .unwrap_or_else(|_| Err(WeatherError::Timeout("city lookup".to_string())));

        match result {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(city = %city, error = %e, "Weather lookup failed");
                None
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let result = timeout(
            self.timeouts.backend,
            self.backend.generate(prompt, &self.system_instruction),
        )
        .await
        .unwrap_or_else(|_| {
            Err(LlmError::timeout(format!(
                "No answer within {}s",
                self.timeouts.backend.as_secs()
            )))
        });

        if let Err(e) = &result {
            tracing::warn!(kind = e.kind.as_str(), error = %e, "Generation failed, using fallback reply");
        }
        result
    }
}
