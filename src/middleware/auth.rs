use axum::{
    body::Body,
    extract::{Extension, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    AppState,
    session::{SESSION_COOKIE, SessionStore, SessionUser},
    utils::{error_codes, error_to_api_response},
};

use crate::routes::auth::Role;

fn auth_required() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        error_to_api_response::<()>(error_codes::AUTH_FAILED, "Login required".to_string()),
    )
        .into_response()
}

/// Resolves the session cookie to a user and attaches it to the request.
/// Requests without a valid session are rejected before reaching handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return auth_required();
    };
    let session_id = cookie.value().to_string();

    match SessionStore::get(&state.redis, &session_id).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            req.extensions_mut().insert(SessionId(session_id));
            next.run(req).await
        }
        Ok(None) => auth_required(),
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Session store unavailable".to_string(),
                ),
            )
                .into_response()
        }
    }
}

/// Opaque session id, kept alongside the user so handlers that mutate the
/// profile can refresh the cached session copy.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

/// Gate for helper-only routes. Runs after `auth_middleware`.
pub async fn require_helper(
    Extension(user): Extension<SessionUser>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if user.role != Role::Helper {
        return (
            StatusCode::FORBIDDEN,
            error_to_api_response::<()>(
                error_codes::PERMISSION_DENIED,
                "Helper role required".to_string(),
            ),
        )
            .into_response();
    }
    next.run(req).await
}
