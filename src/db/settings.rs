use crate::error::AppError;
use crate::models::BeeminderCredentials;
use sqlx::SqlitePool;

pub async fn get_beeminder_credentials(
    pool: &SqlitePool,
    owner_id: &str,
) -> Result<Option<BeeminderCredentials>, AppError> {
    let creds = sqlx::query_as::<_, BeeminderCredentials>(
        r#"
        SELECT owner_id, username, auth_token, goal_slug, updated_at
        FROM beeminder_credentials
        WHERE owner_id = ?
        "#,
    )
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(creds)
}

pub async fn upsert_beeminder_credentials(
    pool: &SqlitePool,
    owner_id: &str,
    username: &str,
    auth_token: &str,
    goal_slug: &str,
    now: &str,
) -> Result<BeeminderCredentials, AppError> {
    sqlx::query(
        r#"
        INSERT INTO beeminder_credentials (owner_id, username, auth_token, goal_slug, updated_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (owner_id) DO UPDATE SET
            username = excluded.username,
            auth_token = excluded.auth_token,
            goal_slug = excluded.goal_slug,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(owner_id)
    .bind(username)
    .bind(auth_token)
    .bind(goal_slug)
    .bind(now)
    .execute(pool)
    .await?;

    get_beeminder_credentials(pool, owner_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve saved credentials".to_string()))
}

pub async fn delete_beeminder_credentials(pool: &SqlitePool, owner_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM beeminder_credentials WHERE owner_id = ?")
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(())
}
