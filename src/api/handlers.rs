//! HTTP request handlers

use super::types::{ChatRequest, ChatResponse, ErrorResponse, StatusResponse};
use super::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/", get(status))
        // Intake turns
        .route("/chat", post(chat))
        .with_state(state)
}

async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK".to_string(),
        message: "POST /chat to chat".to_string(),
    })
}

/// One intake turn. Collaborator failures never surface here: they are
/// already folded into a normal reply by the runtime.
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let user_id = req.user_id.trim().to_string();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".to_string()));
    }

    let inbound = req.into_inbound();
    let outbound = state.intake.handle_turn(&user_id, &inbound).await;

    Ok(Json(ChatResponse::from(outbound)))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
