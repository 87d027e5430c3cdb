//! Generative backend client
//!
//! Produces the final advice text. Gemini is the only provider; the trait
//! keeps the executor testable without network access.

mod error;
mod gemini;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use gemini::{GeminiService, DEFAULT_BASE_URL as GEMINI_BASE_URL, DEFAULT_MODEL as GEMINI_MODEL};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// A model that turns a request into generated text
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Model name, for logs
    fn model_id(&self) -> &str;
}

/// Records latency, prompt size and outcome of every generation
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let prompt_chars: usize = request.messages.iter().map(|m| m.text.len()).sum();
        let started = Instant::now();
        let outcome = self.inner.complete(request).await;
        let elapsed_ms = started.elapsed().as_millis();

        match &outcome {
            Err(e) => tracing::warn!(
                model = self.model_id(),
                elapsed_ms = %elapsed_ms,
                prompt_chars,
                kind = e.kind.as_str(),
                error = %e,
                "Generation failed"
            ),
            Ok(response) => tracing::info!(
                model = self.model_id(),
                elapsed_ms = %elapsed_ms,
                prompt_chars,
                reply_chars = response.text.len(),
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
                "Generation completed"
            ),
        }

        outcome
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}
