use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{AskRequest, AskResponse};

#[axum::debug_handler]
pub async fn educate(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Response {
    // the only hard rejection on this path; everything after is best-effort
    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response::<()>(
                error_codes::VALIDATION_ERROR,
                "Message is required".to_string(),
            ),
        )
            .into_response();
    }

    let response = state.gemini.ask(&req.message).await;

    (
        StatusCode::OK,
        success_to_api_response(AskResponse {
            response,
            timestamp: chrono::Utc::now(),
        }),
    )
        .into_response()
}
