//! Pure stage-transition rules
//!
//! One turn walks [`RULES`] in order. A rule only fires when the session is
//! at its stage; it either advances the session and lets the next rule run
//! (`Step::Continue`) or stops the turn with a reply (`Step::Emit`). This is
//! what lets a single turn carrying mode, location and symptoms go straight
//! to the answer.
//!
//! Nothing here performs I/O. The coordinate lookup and the generation call
//! happen in the runtime, which feeds their results into these functions.

use super::{FinalAnswer, Inbound, Outbound, Stage};
use crate::escalation::EscalationDetector;
use crate::facilities::FacilityDirectory;
use crate::llm::LlmError;
use crate::session::Session;
use crate::system_prompt::fallback_reply;

pub const MODE_PROMPT: &str = "How would you like advice?\n1) Text\n2) Voice\n3) Both";
pub const LOCATION_PROMPT: &str = "Send your location or type your city (e.g., Noida / Delhi):";
pub const FEELING_PROMPT: &str = "How are you feeling? Describe symptoms briefly.";
pub const SYMPTOMS_PROMPT: &str = "Describe symptoms briefly:";

/// Outcome of applying one rule
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Session advanced (or rule did not apply); evaluate the next rule
    Continue,
    /// Stop the turn and send this reply
    Emit(Outbound),
}

/// Stage-transition rules in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Mode,
    Location,
    Symptoms,
    Answer,
}

pub const RULES: [Rule; 4] = [Rule::Mode, Rule::Location, Rule::Symptoms, Rule::Answer];

impl Rule {
    /// The stage this rule handles
    pub fn stage(self) -> Stage {
        match self {
            Rule::Mode => Stage::AskMode,
            Rule::Location => Stage::AskLocation,
            Rule::Symptoms => Stage::AskSymptoms,
            Rule::Answer => Stage::Answer,
        }
    }

    pub fn applies_to(self, session: &Session) -> bool {
        session.stage == self.stage()
    }
}

/// Re-prompt for whatever the stage is waiting on
pub fn prompt_for(stage: Stage) -> Outbound {
    match stage {
        Stage::AskMode | Stage::Answer => Outbound::prompt(Stage::AskMode, MODE_PROMPT),
        Stage::AskLocation => Outbound::prompt(Stage::AskLocation, LOCATION_PROMPT),
        Stage::AskSymptoms => Outbound::prompt(Stage::AskSymptoms, SYMPTOMS_PROMPT),
    }
}

/// `AskMode`: store the mode and move on, or ask for it
pub fn apply_mode(session: &mut Session, inbound: &Inbound) -> Step {
    match inbound.mode {
        Some(mode) => {
            session.mode.get_or_insert(mode);
            session.stage = Stage::AskLocation;
            Step::Continue
        }
        None => Step::Emit(prompt_for(Stage::AskMode)),
    }
}

/// `AskLocation` after the coordinates resolved to `place`
pub fn apply_detected_location(session: &mut Session, place: &str, inbound: &Inbound) -> Step {
    store_location(session, place);
    if inbound.symptoms.is_some() {
        return Step::Continue;
    }
    Step::Emit(Outbound::prompt(
        Stage::AskSymptoms,
        format!("Detected your location as **{place}**.\n{FEELING_PROMPT}"),
    ))
}

/// `AskLocation` from a typed city name, or ask for one
pub fn apply_manual_location(session: &mut Session, inbound: &Inbound) -> Step {
    let Some(location) = inbound.location.as_deref() else {
        return Step::Emit(prompt_for(Stage::AskLocation));
    };
    store_location(session, location);
    if inbound.symptoms.is_some() {
        return Step::Continue;
    }
    Step::Emit(Outbound::prompt(Stage::AskSymptoms, FEELING_PROMPT))
}

fn store_location(session: &mut Session, location: &str) {
    session.location.get_or_insert_with(|| location.to_string());
    session.stage = Stage::AskSymptoms;
}

/// `AskSymptoms`: store the symptoms and go on to the answer, or ask for them
pub fn apply_symptoms(session: &mut Session, inbound: &Inbound) -> Step {
    match inbound.symptoms.as_deref() {
        Some(symptoms) => {
            session
                .symptoms
                .get_or_insert_with(|| symptoms.to_string());
            session.stage = Stage::Answer;
            Step::Continue
        }
        None => Step::Emit(prompt_for(Stage::AskSymptoms)),
    }
}

/// `Answer`: assemble the final reply and start the next cycle.
///
/// `generated` is the backend's text or its failure; any failure becomes the
/// fixed fallback reply. Escalation and facilities are computed either way.
pub fn finish(
    session: &mut Session,
    generated: Result<String, LlmError>,
    detector: &EscalationDetector,
    directory: &FacilityDirectory,
) -> FinalAnswer {
    let location = session.location.clone().unwrap_or_default();
    let symptoms = session.symptoms.clone().unwrap_or_default();

    let reply = match generated {
        Ok(text) => text.trim().to_string(),
        Err(_) => fallback_reply(),
    };

    let escalate = detector.is_severe(&symptoms);
    let hospitals = directory.lookup(&location);
    let case_summary = escalate.then(|| format!("{symptoms} in {location}"));

    session.begin_cycle();

    FinalAnswer {
        reply,
        escalate,
        hospitals,
        case_summary,
    }
}
