//! # 모자(Hat) API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/hats?tz=<분> | `list_hats` | 오래된 체크 해제 후 목록 |
//! | POST | /api/hats | `create_hat` | 새 모자 (201) |
//! | PATCH | /api/hats/{id} | `update_hat` | 이름/완료 여부 변경 |
//! | DELETE | /api/hats/{id} | `delete_hat` | soft-delete |
//!
//! 남의 모자와 삭제된 모자는 모두 404입니다.

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::day_boundary::{local_day_start, parse_offset, to_db_timestamp},
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

/// 빈 이름(공백만 있는 경우 포함)을 거부하고 trim한 이름을 돌려줍니다.
fn validate_name(name: Option<&str>) -> Result<String, AppError> {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n.to_string()),
        _ => Err(AppError::BadRequest("Name is required".to_string())),
    }
}

/// 모자 목록을 조회합니다.
///
/// `GET /api/hats?tz=-540` → `[ {...}, ... ]`
///
/// 읽기 전에 호출자의 "오늘" 경계보다 먼저 체크된 모자를 해제합니다.
/// 경계는 요청마다 `tz`로 다시 계산합니다 (여행 등으로 시간대가 바뀔 수 있음).
pub async fn list_hats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TzQuery>,
) -> Result<Json<Vec<Hat>>, AppError> {
    let offset = parse_offset(query.tz.as_deref());
    let day_start = to_db_timestamp(local_day_start(Utc::now(), offset));
    let hats = db::list_hats_for_day(&state.pool, &auth.user_id, &day_start).await?;
    Ok(Json(hats))
}

/// 새 모자를 생성합니다.
///
/// `POST /api/hats` + `{ "name": "Writing" }` → `201 Created`
pub async fn create_hat(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateHatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Hat>), AppError> {
    let Json(req) = payload?;
    let name = validate_name(req.name.as_deref())?;
    let now = to_db_timestamp(Utc::now());
    let hat = db::create_hat(&state.pool, &auth.user_id, &name, &now).await?;
    Ok((StatusCode::CREATED, Json(hat)))
}

/// 모자 이름이나 완료 여부를 바꿉니다.
///
/// `PATCH /api/hats/{id}` + `{ "done": true }`
///
/// `done`을 바꾸면 `doneAt`도 같은 UPDATE에서 함께 설정/해제됩니다.
pub async fn update_hat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateHatRequest>, JsonRejection>,
) -> Result<Json<Hat>, AppError> {
    let Json(req) = payload?;
    // 검증은 쓰기 전에
    let name = match req.name.as_deref() {
        Some(raw) => Some(validate_name(Some(raw))?),
        None => None,
    };

    let now = to_db_timestamp(Utc::now());
    let hat = db::update_hat(
        &state.pool,
        &auth.user_id,
        &id,
        name.as_deref(),
        req.done,
        &now,
    )
    .await?
    .ok_or(AppError::NotFound)?;
    Ok(Json(hat))
}

/// 모자를 soft-delete 합니다. 관련 세션은 그대로 남습니다.
///
/// `DELETE /api/hats/{id}` → `{ "ok": true }`
pub async fn delete_hat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let now = to_db_timestamp(Utc::now());
    let deleted = db::soft_delete_hat(&state.pool, &auth.user_id, &id, &now).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    Ok(Json(json!({ "ok": true })))
}
