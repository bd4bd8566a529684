use std::sync::Arc;

use redis::{AsyncCommands, Client as RedisClient};
use serde::{Deserialize, Serialize};

use crate::routes::auth::Role;

pub const SESSION_COOKIE: &str = "sahay_session";

fn session_key(session_id: &str) -> String {
    format!("session:{}", session_id)
}

/// Identity claim carried by a session cookie. Treated as a cache of the
/// users row: privileged reads go back to the store for authoritative data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

pub struct SessionStore;

impl SessionStore {
    /// Creates a session and returns its opaque id for the cookie.
    pub async fn create(
        redis: &Arc<RedisClient>,
        user: &SessionUser,
        ttl: u64,
    ) -> Result<String, redis::RedisError> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let mut conn = redis.get_multiplexed_async_connection().await?;

        let json = serde_json::to_string(user).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::IoError,
                "session serialize error",
                e.to_string(),
            ))
        })?;
        let _: () = conn.set_ex(session_key(&session_id), json, ttl).await?;

        Ok(session_id)
    }

    pub async fn get(
        redis: &Arc<RedisClient>,
        session_id: &str,
    ) -> Result<Option<SessionUser>, redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;
        let result: Option<String> = conn.get(session_key(session_id)).await?;

        match result {
            Some(json) => {
                let user = serde_json::from_str(&json).map_err(|e| {
                    redis::RedisError::from((
                        redis::ErrorKind::IoError,
                        "session deserialize error",
                        e.to_string(),
                    ))
                })?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Rewrites the cached identity in place, preserving the remaining TTL.
    pub async fn update(
        redis: &Arc<RedisClient>,
        session_id: &str,
        user: &SessionUser,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;
        let key = session_key(session_id);

        let ttl: i64 = conn.ttl(&key).await?;
        if ttl <= 0 {
            return Ok(());
        }

        let json = serde_json::to_string(user).map_err(|e| {
            redis::RedisError::from((
                redis::ErrorKind::IoError,
                "session serialize error",
                e.to_string(),
            ))
        })?;
        let _: () = conn.set_ex(key, json, ttl as u64).await?;

        Ok(())
    }

    pub async fn destroy(
        redis: &Arc<RedisClient>,
        session_id: &str,
    ) -> Result<(), redis::RedisError> {
        let mut conn = redis.get_multiplexed_async_connection().await?;
        let _: () = conn.del(session_key(session_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_roundtrip() {
        let user = SessionUser {
            user_id: "u-1".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            role: Role::Helper,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains(r#""role":"helper""#));

        let back: SessionUser = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_id, "u-1");
        assert_eq!(back.role, Role::Helper);
    }

    #[test]
    fn test_session_key_prefix() {
        assert_eq!(session_key("abc"), "session:abc");
    }
}
