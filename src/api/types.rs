//! API request and response types

use crate::state_machine::event::{coordinates, present};
use crate::state_machine::{AdviceMode, Inbound, Needs, Outbound, Stage};
use serde::{Deserialize, Serialize};

/// One chat turn from the client
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    /// Free text outside the intake stages; accepted and not interpreted
    #[allow(dead_code)]
    pub message: Option<String>,
    pub tone: Option<String>,
    pub mode: Option<String>,
    pub location: Option<String>,
    pub symptoms: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl ChatRequest {
    /// Normalize into an inbound turn. Blank strings and unknown modes
    /// become absent fields; other strings pass through untouched.
    pub fn into_inbound(self) -> Inbound {
        let mode = present(self.mode).and_then(|raw| match raw.parse::<AdviceMode>() {
            Ok(mode) => Some(mode),
            Err(e) => {
                tracing::debug!(user_id = %self.user_id, error = %e, "Ignoring mode");
                None
            }
        });

        Inbound {
            mode,
            location: present(self.location),
            coords: coordinates(self.lat, self.lon),
            symptoms: present(self.symptoms),
            tone: present(self.tone),
        }
    }
}

/// Reply to one chat turn
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub stage: Stage,
    pub needs: Needs,
    #[serde(default)]
    pub escalate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospitals: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_summary: Option<String>,
}

impl From<Outbound> for ChatResponse {
    fn from(outbound: Outbound) -> Self {
        let stage = outbound.stage();
        let needs = outbound.needs();
        match outbound {
            Outbound::Prompt { reply, .. } => Self {
                reply,
                stage,
                needs,
                escalate: false,
                hospitals: None,
                case_summary: None,
            },
            Outbound::Answer(answer) => Self {
                reply: answer.reply,
                stage,
                needs,
                escalate: answer.escalate,
                hospitals: Some(answer.hospitals),
                case_summary: answer.case_summary,
            },
        }
    }
}

/// Liveness payload
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
