use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    middleware::SessionId,
    session::{SessionStore, SessionUser},
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{
    DashboardResponse, HelperProfile, UpdateHelperRequest, active_students,
};

const DASHBOARD_STUDENT_LIMIT: i64 = 20;

fn helper_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_to_api_response::<()>(
            error_codes::NOT_FOUND,
            "Helper profile not found".to_string(),
        ),
    )
        .into_response()
}

fn internal(msg: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_to_api_response::<()>(error_codes::INTERNAL_ERROR, msg.to_string()),
    )
        .into_response()
}

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session_user): Extension<SessionUser>,
) -> Response {
    let helper = match HelperProfile::find_by_user(&state.pool, &session_user.user_id).await {
        Ok(Some(helper)) => helper,
        Ok(None) => return helper_not_found(),
        Err(e) => {
            tracing::error!("Helper dashboard failed: {}", e);
            return internal("Failed to load dashboard");
        }
    };

    let students = match active_students(&state.pool, Some(DASHBOARD_STUDENT_LIMIT)).await {
        Ok(students) => students,
        Err(e) => {
            tracing::error!("Failed to load students for dashboard: {}", e);
            return internal("Failed to load dashboard");
        }
    };

    (
        StatusCode::OK,
        success_to_api_response(DashboardResponse { helper, students }),
    )
        .into_response()
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(session_user): Extension<SessionUser>,
) -> Response {
    match HelperProfile::find_by_user(&state.pool, &session_user.user_id).await {
        Ok(Some(helper)) => (StatusCode::OK, success_to_api_response(helper)).into_response(),
        Ok(None) => helper_not_found(),
        Err(e) => {
            tracing::error!("Failed to load helper profile: {}", e);
            internal("Failed to load profile")
        }
    }
}

#[axum::debug_handler]
pub async fn put_profile(
    State(state): State<AppState>,
    Extension(session_user): Extension<SessionUser>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(req): Json<UpdateHelperRequest>,
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

    match HelperProfile::update(&state.pool, &session_user.user_id, &req).await {
        Ok(Some(helper)) => {
            let refreshed = SessionUser {
                name: helper.name.clone(),
                ..session_user
            };
            if let Err(e) = SessionStore::update(&state.redis, &session_id, &refreshed).await {
                tracing::error!("Failed to refresh session after helper update: {}", e);
            }
            (StatusCode::OK, success_to_api_response(helper)).into_response()
        }
        Ok(None) => helper_not_found(),
        Err(e) => {
            tracing::error!("Failed to update helper profile: {}", e);
            internal("Failed to update profile")
        }
    }
}

#[axum::debug_handler]
pub async fn students(State(state): State<AppState>) -> Response {
    match active_students(&state.pool, None).await {
        Ok(students) => (StatusCode::OK, success_to_api_response(students)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list students: {}", e);
            internal("Failed to load students")
        }
    }
}
