use scholaris_core::hash_password;
use scholaris_models::auth::Role;
use sqlx::PgPool;
use uuid::Uuid;

/// Creates an admin account. Fails if the username is taken.
pub async fn create_admin(
    db: &PgPool,
    username: &str,
    password: &str,
) -> Result<Uuid, Box<dyn std::error::Error>> {
    if !(3..=20).contains(&username.chars().count()) {
        return Err("Username must be between 3 and 20 characters".into());
    }
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, password, role)
         VALUES ($1, $2, $3)
         ON CONFLICT (username) DO NOTHING
         RETURNING id",
    )
    .bind(username)
    .bind(&hashed_password)
    .bind(Role::Admin)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "The username is already taken.".into())
}
