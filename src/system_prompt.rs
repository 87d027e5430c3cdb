//! Fixed assistant instruction and prompt composition
//!
//! The system instruction is the assistant's behavioral contract: short
//! bullet points, weather only when relevant, and the disclaimer as the last
//! line. The fallback reply carries the same disclaimer so every answer the
//! user sees ends with it.

use crate::weather::WeatherReport;

/// Mandatory trailing line on every final answer
pub const DISCLAIMER: &str = "Disclaimer: This is not a substitute for professional medical advice.";

/// Base system instruction establishing the assistant's role
const BASE_INSTRUCTION: &str = r"You are an AI Medical Assistant.
Respond in **3–5 short bullet points only**.
Do not write long paragraphs.
Only mention weather if useful.";

/// Reply used when the generative backend fails in any way
const FALLBACK_APOLOGY: &str = "I couldn't think clearly. Try again.";

/// Full system instruction sent with every generation request
pub fn system_instruction() -> String {
    format!("{BASE_INSTRUCTION}\nAlways end with: {DISCLAIMER}")
}

/// Fixed reply substituted for a failed generation
pub fn fallback_reply() -> String {
    format!("{FALLBACK_APOLOGY}\n{DISCLAIMER}")
}

/// Compose the user prompt from the collected intake fields.
///
/// `weather` is `None` when the lookup failed; the model is told so rather
/// than left guessing.
pub fn compose_prompt(
    tone: &str,
    location: &str,
    symptoms: &str,
    weather: Option<&WeatherReport>,
) -> String {
    let weather = weather.map_or_else(|| "unavailable".to_string(), WeatherReport::summary);
    format!("Tone={tone}. City={location}. Symptoms={symptoms}. Weather={weather}.")
}
