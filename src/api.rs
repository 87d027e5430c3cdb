//! HTTP API for the intake service
//!
//! `POST /chat` carries one intake turn; `GET /` is a liveness probe.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::runtime::{GenerativeBackend, IntakeRuntime, WeatherProvider};
use crate::state_machine::{Inbound, Outbound};
use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can answer an intake turn
#[async_trait]
pub trait TurnHandler: Send + Sync {
    async fn handle_turn(&self, user_id: &str, inbound: &Inbound) -> Outbound;
}

#[async_trait]
impl<W: WeatherProvider, B: GenerativeBackend> TurnHandler for IntakeRuntime<W, B> {
    async fn handle_turn(&self, user_id: &str, inbound: &Inbound) -> Outbound {
        IntakeRuntime::handle_turn(self, user_id, inbound).await
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<dyn TurnHandler>,
}

impl AppState {
    pub fn new(intake: Arc<dyn TurnHandler>) -> Self {
        Self { intake }
    }
}
