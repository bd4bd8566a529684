use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{GENERAL_ROOM, MessageView};

/// HTTP history fetch, same contract as the socket replay: at most 50
/// messages, oldest first.
#[axum::debug_handler]
pub async fn get_messages(State(state): State<AppState>) -> Response {
    match MessageView::recent(&state.pool, GENERAL_ROOM).await {
        Ok(messages) => (StatusCode::OK, success_to_api_response(messages)).into_response(),
        Err(e) => {
            tracing::error!("Get messages error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Failed to load messages".to_string(),
                ),
            )
                .into_response()
        }
    }
}
