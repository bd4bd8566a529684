use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Student,
    Helper,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub age: Option<i32>,
    pub institution: Option<String>,
    pub bio: Option<String>,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
    pub age: Option<i32>,
    pub institution: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Pre-store checks for a registration request. The duplicate-email check
/// happens against the database afterwards.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), String> {
    if req.name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.password.is_empty()
        || req.confirm_password.is_empty()
    {
        return Err("All fields are required".to_string());
    }
    if req.password != req.confirm_password {
        return Err("Passwords do not match".to_string());
    }
    if req.password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }
    Ok(())
}

impl User {
    pub async fn create(
        pool: &PgPool,
        req: &RegisterRequest,
        password_hash: String,
    ) -> Result<Self, sqlx::Error> {
        let user_id = uuid::Uuid::new_v4().to_string();
        let role = req.role.unwrap_or(Role::Student);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, name, email, password_hash, role, age, institution)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING user_id, name, email, password_hash, role, age, institution, bio,
                      is_active, joined_at
            "#,
        )
        .bind(&user_id)
        .bind(req.name.trim())
        .bind(req.email.trim().to_lowercase())
        .bind(password_hash)
        .bind(role)
        .bind(req.age)
        .bind(req.institution.as_deref())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, email, password_hash, role, age, institution, bio,
                   is_active, joined_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &PgPool, user_id: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, email, password_hash, role, age, institution, bio,
                   is_active, joined_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub fn verify_login(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        crate::utils::verify_password(password, &self.password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            password: "secret7".into(),
            confirm_password: "secret7".into(),
            role: None,
            age: Some(21),
            institution: Some("IIT Delhi".into()),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&request()).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let mut req = request();
        req.email = "  ".into();
        assert_eq!(
            validate_registration(&req).unwrap_err(),
            "All fields are required"
        );
    }

    #[test]
    fn test_password_mismatch() {
        let mut req = request();
        req.confirm_password = "different".into();
        assert_eq!(
            validate_registration(&req).unwrap_err(),
            "Passwords do not match"
        );
    }

    #[test]
    fn test_short_password() {
        let mut req = request();
        req.password = "abc".into();
        req.confirm_password = "abc".into();
        assert_eq!(
            validate_registration(&req).unwrap_err(),
            "Password must be at least 6 characters long"
        );
    }

    #[test]
    fn test_role_wire_format() {
        let role: Role = serde_json::from_str(r#""helper""#).unwrap();
        assert_eq!(role, Role::Helper);
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), r#""student""#);
    }
}
