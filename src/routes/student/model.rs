use serde::Deserialize;
use sqlx::PgPool;

use crate::routes::auth::User;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub age: Option<i32>,
    pub institution: Option<String>,
    pub bio: Option<String>,
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: &str,
    req: &UpdateProfileRequest,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = $1, age = $2, institution = $3, bio = $4
        WHERE user_id = $5
        RETURNING user_id, name, email, password_hash, role, age, institution, bio,
                  is_active, joined_at
        "#,
    )
    .bind(req.name.trim())
    .bind(req.age)
    .bind(req.institution.as_deref())
    .bind(req.bio.as_deref())
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}
