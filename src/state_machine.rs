//! Intake conversation state machine
//!
//! Stages, inbound/outbound turn types and the ordered transition rules.

mod effect;
pub mod event;
mod state;
pub mod transition;

pub use effect::{FinalAnswer, Outbound};
pub use event::{Coordinates, Inbound};
pub use state::{AdviceMode, Needs, Stage};
