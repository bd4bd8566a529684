use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    middleware::SessionId,
    routes::auth::User,
    session::{SessionStore, SessionUser},
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{UpdateProfileRequest, update_profile};

/// Profile reads go to the store rather than the session copy, which may be
/// stale after an update elsewhere.
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(session_user): Extension<SessionUser>,
) -> Response {
    match User::find_by_id(&state.pool, &session_user.user_id).await {
        Ok(Some(user)) => (StatusCode::OK, success_to_api_response(user)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "User not found".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to load profile: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Failed to load profile".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn put_profile(
    State(state): State<AppState>,
    Extension(session_user): Extension<SessionUser>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(req): Json<UpdateProfileRequest>,
) -> Response {
    if req.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response::<()>(
                error_codes::VALIDATION_ERROR,
                "Name is required".to_string(),
            ),
        )
            .into_response();
    }

    match update_profile(&state.pool, &session_user.user_id, &req).await {
        Ok(user) => {
            // keep the cached session claim in step with the store
            let refreshed = SessionUser {
                name: user.name.clone(),
                ..session_user
            };
            if let Err(e) = SessionStore::update(&state.redis, &session_id, &refreshed).await {
                tracing::error!("Failed to refresh session after profile update: {}", e);
            }
            (StatusCode::OK, success_to_api_response(user)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to update profile: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Failed to update profile".to_string(),
                ),
            )
                .into_response()
        }
    }
}
