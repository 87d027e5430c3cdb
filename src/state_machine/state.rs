//! Intake stage and collected-field types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phase of the intake conversation for one user.
///
/// Ordered: within a single cycle a session only ever moves forward
/// (`AskMode < AskLocation < AskSymptoms < Answer`). Reaching `Answer`
/// starts the next cycle back at `AskMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    AskMode,
    AskLocation,
    AskSymptoms,
    Answer,
}

impl Stage {
    /// Wire name used in chat responses
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::AskMode => "ask_mode",
            Stage::AskLocation => "ask_location",
            Stage::AskSymptoms => "ask_symptoms",
            Stage::Answer => "answer",
        }
    }

    /// Which field the user still has to supply at this stage
    pub fn needs(self) -> Needs {
        Needs {
            mode: self == Stage::AskMode,
            location: self == Stage::AskLocation,
            symptoms: self == Stage::AskSymptoms,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the user wants advice delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceMode {
    Text,
    Voice,
    Both,
}

impl AdviceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AdviceMode::Text => "text",
            AdviceMode::Voice => "voice",
            AdviceMode::Both => "both",
        }
    }
}

/// Returned when a mode string matches neither a name nor a menu digit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized advice mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for AdviceMode {
    type Err = UnknownMode;

    /// Accepts the mode names and the `1`/`2`/`3` menu digits from the prompt.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "text" => Ok(AdviceMode::Text),
            "2" | "voice" => Ok(AdviceMode::Voice),
            "3" | "both" => Ok(AdviceMode::Both),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Flags telling the client what the current stage is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // mirrors the wire format
pub struct Needs {
    pub mode: bool,
    pub location: bool,
    pub symptoms: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering() {
        assert!(Stage::AskMode < Stage::AskLocation);
        assert!(Stage::AskLocation < Stage::AskSymptoms);
        assert!(Stage::AskSymptoms < Stage::Answer);
    }

    #[test]
    fn test_stage_wire_names_match_serde() {
        for stage in [
            Stage::AskMode,
            Stage::AskLocation,
            Stage::AskSymptoms,
            Stage::Answer,
        ] {
            let json = serde_json::to_value(stage).unwrap();
            assert_eq!(json, stage.as_str());
        }
    }

    #[test]
    fn test_needs_per_stage() {
        assert!(Stage::AskMode.needs().mode);
        assert!(Stage::AskLocation.needs().location);
        assert!(Stage::AskSymptoms.needs().symptoms);
        assert_eq!(Stage::Answer.needs(), Needs::default());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("text".parse::<AdviceMode>().unwrap(), AdviceMode::Text);
        assert_eq!(" Voice ".parse::<AdviceMode>().unwrap(), AdviceMode::Voice);
        assert_eq!("3".parse::<AdviceMode>().unwrap(), AdviceMode::Both);
        assert!("banana".parse::<AdviceMode>().is_err());
        assert!("".parse::<AdviceMode>().is_err());
    }
}
