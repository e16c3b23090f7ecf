use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::day_boundary::to_db_timestamp,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn get_beeminder(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<BeeminderStatus>, AppError> {
    let creds = db::get_beeminder_credentials(&state.pool, &auth.user_id).await?;
    Ok(Json(creds.into()))
}

pub async fn update_beeminder(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<UpdateBeeminderRequest>, JsonRejection>,
) -> Result<Json<BeeminderStatus>, AppError> {
    let Json(req) = payload?;
    let (Some(username), Some(auth_token), Some(goal_slug)) = (
        required(req.username),
        required(req.auth_token),
        required(req.goal_slug),
    ) else {
        return Err(AppError::BadRequest(
            "username, authToken, and goalSlug are required".to_string(),
        ));
    };

    let now = to_db_timestamp(Utc::now());
    let creds = db::upsert_beeminder_credentials(
        &state.pool,
        &auth.user_id,
        &username,
        &auth_token,
        &goal_slug,
        &now,
    )
    .await?;

    tracing::info!(owner_id = %auth.user_id, goal = %creds.goal_slug, "Beeminder connected");
    Ok(Json(Some(creds).into()))
}

pub async fn delete_beeminder(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<BeeminderStatus>, AppError> {
    db::delete_beeminder_credentials(&state.pool, &auth.user_id).await?;
    Ok(Json(BeeminderStatus::disconnected()))
}
