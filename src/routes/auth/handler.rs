use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    AppState,
    middleware::SessionId,
    routes::helper::HelperProfile,
    session::{SESSION_COOKIE, SessionStore, SessionUser},
    utils::{
        error_codes, error_to_api_response, hash_password, success_to_api_response,
    },
};

use super::model::{
    LoginRequest, RegisterRequest, RegisterResponse, Role, User, validate_registration,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    if let Err(msg) = validate_registration(&req) {
        return (
            StatusCode::OK,
            error_to_api_response::<()>(error_codes::VALIDATION_ERROR, msg),
        )
            .into_response();
    }

    match User::find_by_email(&state.pool, &req.email).await {
        Ok(Some(_)) => {
            return (
                StatusCode::OK,
                error_to_api_response::<()>(
                    error_codes::USER_EXISTS,
                    "Email already registered".to_string(),
                ),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Registration lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Registration failed. Please try again.".to_string(),
                ),
            )
                .into_response();
        }
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Registration failed. Please try again.".to_string(),
                ),
            )
                .into_response();
        }
    };

    let user = match User::create(&state.pool, &req, password_hash).await {
        Ok(user) => user,
        Err(e) => {
            // unique-violation race between the lookup and the insert
            if e.to_string().contains("unique constraint")
                || e.to_string().contains("duplicate key")
            {
                return (
                    StatusCode::OK,
                    error_to_api_response::<()>(
                        error_codes::USER_EXISTS,
                        "Email already registered".to_string(),
                    ),
                )
                    .into_response();
            }
            tracing::error!("Failed to create user: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Registration failed. Please try again.".to_string(),
                ),
            )
                .into_response();
        }
    };

    // helpers get a default profile next to the account
    if user.role == Role::Helper {
        if let Err(e) = HelperProfile::create_default(&state.pool, &user.user_id).await {
            tracing::error!("Failed to create helper profile for {}: {}", user.user_id, e);
        }
    }

    (
        StatusCode::OK,
        success_to_api_response(RegisterResponse {
            user_id: user.user_id,
            message: "Registration successful! Please login to continue.".to_string(),
        }),
    )
        .into_response()
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Response {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return (
            StatusCode::OK,
            error_to_api_response::<()>(
                error_codes::VALIDATION_ERROR,
                "Email and password are required".to_string(),
            ),
        )
            .into_response();
    }

    // Unknown email and bad password share one message to avoid enumeration
    let invalid = || {
        (
            StatusCode::OK,
            error_to_api_response::<()>(
                error_codes::AUTH_FAILED,
                "Invalid email or password".to_string(),
            ),
        )
            .into_response()
    };

    let user = match User::find_by_email(&state.pool, &req.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return invalid(),
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Login failed. Please try again.".to_string(),
                ),
            )
                .into_response();
        }
    };

    match user.verify_login(&req.password) {
        Ok(true) => {}
        Ok(false) => return invalid(),
        Err(e) => {
            tracing::error!("Password verification failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Login failed. Please try again.".to_string(),
                ),
            )
                .into_response();
        }
    }

    let session_user = SessionUser {
        user_id: user.user_id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
    };

    let session_id = match SessionStore::create(
        &state.redis,
        &session_user,
        state.config.session_ttl().as_secs(),
    )
    .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to create session: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Login failed. Please try again.".to_string(),
                ),
            )
                .into_response();
        }
    };

    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    (
        jar.add(cookie),
        success_to_api_response(session_user),
    )
        .into_response()
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    jar: CookieJar,
) -> Response {
    if let Err(e) = SessionStore::destroy(&state.redis, &session_id).await {
        tracing::error!("Failed to destroy session {}: {}", session_id, e);
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), success_to_api_response(())).into_response()
}

/// Valid-session probe; the auth middleware has already vetted the cookie.
#[axum::debug_handler]
pub async fn current_session(Extension(user): Extension<SessionUser>) -> Response {
    (StatusCode::OK, success_to_api_response(user)).into_response()
}
