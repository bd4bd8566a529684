use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{FeedbackStats, FeedbackSubmission};

#[derive(Debug, serde::Serialize)]
pub struct SubmitResponse {
    pub feedback_id: String,
    pub message: String,
}

fn client_ip(headers: &HeaderMap, addr: Option<&SocketAddr>) -> Option<String> {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .map(|s| s.trim().to_string())
        .or_else(|| addr.map(|a| a.ip().to_string()))
}

#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(submission): Json<FeedbackSubmission>,
) -> Response {
    let record = match submission.validate() {
        Ok(record) => record,
        Err(msg) => {
            return (
                StatusCode::OK,
                error_to_api_response::<()>(error_codes::VALIDATION_ERROR, msg),
            )
                .into_response();
        }
    };

    let ip_address = client_ip(&headers, Some(&addr));

    match record.insert(&state.pool, ip_address).await {
        Ok(feedback_id) => (
            StatusCode::OK,
            success_to_api_response(SubmitResponse {
                feedback_id,
                message: "Thank you for your valuable feedback! Your insights help us improve Sahay for everyone."
                    .to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error saving feedback: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "An error occurred while submitting your feedback. Please try again."
                        .to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn stats(State(state): State<AppState>) -> Response {
    match FeedbackStats::collect(&state.pool).await {
        Ok(stats) => (StatusCode::OK, success_to_api_response(stats)).into_response(),
        Err(e) => {
            tracing::error!("Error fetching feedback stats: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "Failed to fetch statistics".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_proxy_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.9, 1.1.1.1"));
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(&addr)).as_deref(), Some("10.0.0.9"));
    }

    #[test]
    fn test_client_ip_falls_back_to_socket() {
        let headers = HeaderMap::new();
        let addr: SocketAddr = "192.168.1.5:9000".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(&addr)).as_deref(), Some("192.168.1.5"));
    }
}
