//! Outbound turn produced by the state machine

use super::state::{Needs, Stage};

/// What the user sees after one turn
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Ask for the field the current stage is missing
    Prompt { stage: Stage, reply: String },
    /// Final advice for the cycle
    Answer(FinalAnswer),
}

/// Terminal reply of a consultation cycle
#[derive(Debug, Clone, PartialEq)]
pub struct FinalAnswer {
    pub reply: String,
    pub escalate: bool,
    pub hospitals: Vec<String>,
    pub case_summary: Option<String>,
}

impl Outbound {
    pub fn prompt(stage: Stage, reply: impl Into<String>) -> Self {
        Outbound::Prompt {
            stage,
            reply: reply.into(),
        }
    }

    /// Stage reported to the client for this reply
    pub fn stage(&self) -> Stage {
        match self {
            Outbound::Prompt { stage, .. } => *stage,
            Outbound::Answer(_) => Stage::Answer,
        }
    }

    pub fn reply(&self) -> &str {
        match self {
            Outbound::Prompt { reply, .. } => reply,
            Outbound::Answer(answer) => &answer.reply,
        }
    }

    pub fn needs(&self) -> Needs {
        self.stage().needs()
    }
}
