use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "helper_availability", rename_all = "lowercase")]
pub enum Availability {
    Available,
    Busy,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Specialization {
    Anxiety,
    Depression,
    AcademicStress,
    SocialAnxiety,
    GeneralSupport,
}

impl Specialization {
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialization::Anxiety => "anxiety",
            Specialization::Depression => "depression",
            Specialization::AcademicStress => "academic-stress",
            Specialization::SocialAnxiety => "social-anxiety",
            Specialization::GeneralSupport => "general-support",
        }
    }
}

/// Helper row joined with its user account.
#[derive(Debug, Serialize, FromRow)]
pub struct HelperProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub specialization: Vec<String>,
    pub experience: Option<String>,
    pub availability: Availability,
    pub rating: f32,
    pub total_sessions: i32,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct StudentSummary {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub institution: Option<String>,
    pub bio: Option<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHelperRequest {
    pub name: String,
    pub experience: Option<String>,
    pub specialization: Vec<Specialization>,
    pub availability: Availability,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub helper: HelperProfile,
    pub students: Vec<StudentSummary>,
}

const HELPER_SELECT: &str = r#"
    SELECT h.user_id, u.name, u.email, h.specialization, h.experience, h.availability,
           h.rating, h.total_sessions, h.verified, h.created_at
    FROM helpers h
    JOIN users u ON h.user_id = u.user_id
    WHERE h.user_id = $1
"#;

impl HelperProfile {
    /// New helper accounts start available, with the general-support tag only.
    pub async fn create_default(pool: &PgPool, user_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO helpers (user_id, specialization)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(vec![Specialization::GeneralSupport.as_str().to_string()])
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_user(pool: &PgPool, user_id: &str) -> Result<Option<Self>, sqlx::Error> {
        let helper = sqlx::query_as::<_, HelperProfile>(HELPER_SELECT)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(helper)
    }

    /// Writes the name on users and the helper fields on helpers. No
    /// cross-table transaction; the store serializes each write on its own.
    pub async fn update(
        pool: &PgPool,
        user_id: &str,
        req: &UpdateHelperRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query("UPDATE users SET name = $1 WHERE user_id = $2")
            .bind(req.name.trim())
            .bind(user_id)
            .execute(pool)
            .await?;

        let specialization: Vec<String> = req
            .specialization
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        sqlx::query(
            r#"
            UPDATE helpers
            SET experience = $1, specialization = $2, availability = $3
            WHERE user_id = $4
            "#,
        )
        .bind(req.experience.as_deref())
        .bind(specialization)
        .bind(req.availability)
        .bind(user_id)
        .execute(pool)
        .await?;

        Self::find_by_user(pool, user_id).await
    }
}

pub async fn active_students(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<StudentSummary>, sqlx::Error> {
    let students = sqlx::query_as::<_, StudentSummary>(
        r#"
        SELECT user_id, name, email, age, institution, bio, joined_at
        FROM users
        WHERE role = 'student' AND is_active
        ORDER BY joined_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit.unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await?;

    Ok(students)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialization_wire_format() {
        let s: Specialization = serde_json::from_str(r#""academic-stress""#).unwrap();
        assert_eq!(s, Specialization::AcademicStress);
        assert_eq!(s.as_str(), "academic-stress");
    }

    #[test]
    fn test_unknown_specialization_rejected() {
        assert!(serde_json::from_str::<Specialization>(r#""everything""#).is_err());
    }

    #[test]
    fn test_availability_wire_format() {
        let a: Availability = serde_json::from_str(r#""busy""#).unwrap();
        assert_eq!(a, Availability::Busy);
    }
}
