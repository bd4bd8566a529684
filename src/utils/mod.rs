use axum::Json;
use bcrypt::{DEFAULT_COST, hash, verify};
use serde::Serialize;

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: 0,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const USER_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;
    pub const RATE_LIMIT: i32 = 1005;
    pub const INTERNAL_ERROR: i32 = 5000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hashed = hash_password("hunter2!").unwrap();
        assert!(verify_password("hunter2!", &hashed).unwrap());
        assert!(!verify_password("hunter3!", &hashed).unwrap());
    }

    #[test]
    fn test_api_response_shape() {
        let Json(resp) = success_to_api_response(serde_json::json!({"ok": true}));
        assert_eq!(resp.code, error_codes::SUCCESS);
        assert_eq!(resp.msg, "success");
        assert!(resp.resp_data.is_some());

        let Json(err) = error_to_api_response::<()>(error_codes::NOT_FOUND, "missing".into());
        assert_eq!(err.code, error_codes::NOT_FOUND);
        assert!(err.resp_data.is_none());
    }
}
