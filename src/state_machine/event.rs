//! Inbound turn: whatever the user supplied on one request

use super::state::AdviceMode;

pub const DEFAULT_TONE: &str = "simple";

/// Coordinates reported by the client's geolocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One user turn, already normalized.
///
/// Blank strings never reach this type: constructors fold them into `None`
/// so the transition rules only ever check presence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inbound {
    pub mode: Option<AdviceMode>,
    pub location: Option<String>,
    pub coords: Option<Coordinates>,
    pub symptoms: Option<String>,
    pub tone: Option<String>,
}

impl Inbound {
    /// Tone for the composed prompt, `simple` unless the user picked one
    pub fn tone(&self) -> &str {
        self.tone.as_deref().unwrap_or(DEFAULT_TONE)
    }
}

#[cfg(test)]
impl Inbound {
    pub fn with_mode(mut self, mode: AdviceMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = present(Some(location.into()));
        self
    }

    pub fn with_coords(mut self, lat: f64, lon: f64) -> Self {
        self.coords = coordinates(Some(lat), Some(lon));
        self
    }

    pub fn with_symptoms(mut self, symptoms: impl Into<String>) -> Self {
        self.symptoms = present(Some(symptoms.into()));
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = present(Some(tone.into()));
        self
    }
}

/// Treat an empty or whitespace-only string as absent; anything else is
/// kept verbatim
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Both halves must be present and finite to count as a position
pub fn coordinates(lat: Option<f64>, lon: Option<f64>) -> Option<Coordinates> {
    match (lat, lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
            Some(Coordinates { lat, lon })
        }
        _ => None,
    }
}
