//! # 포커스 세션 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/sessions | `create_session` | 세션 기록 (201), Beeminder 전송 트리거 |
//! | GET | /api/sessions | `list_sessions` | 최신순 목록 (모자 이름 포함) |
//! | DELETE | /api/sessions | `clear_sessions` | 이력 전체 삭제 |
//! | GET | /api/sessions/score?tz=<분> | `get_score` | `{ totalScore, todayScore }` |
//!
//! 실제 규칙(검증, 점수 집계, 동기화)은 `services::ledger`에 있습니다.

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    routes::AppState,
    services::day_boundary::parse_offset,
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

/// 세션을 기록합니다.
///
/// `POST /api/sessions` + `{ "durationSeconds": 420, "score": 7, "hatId": "..." }`
///
/// 모자가 호출자의 것이 아니면 404. Beeminder 전송은 응답을 기다리게 하지 않습니다.
pub async fn create_session(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FocusSession>), AppError> {
    let Json(req) = payload?;
    let (Some(duration_seconds), Some(score)) = (req.duration_seconds, req.score) else {
        return Err(AppError::BadRequest(
            "durationSeconds and score are required".to_string(),
        ));
    };
    let hat_id = req
        .hat_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("hatId is required".to_string()))?;

    let session = state
        .ledger()
        .record_session(&auth.user_id, &hat_id, duration_seconds, score, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `GET /api/sessions` → `[ { ..., "hat": { "name": "Writing" } }, ... ]`
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SessionRecord>>, AppError> {
    let sessions = state.ledger().list_sessions(&auth.user_id).await?;
    Ok(Json(sessions))
}

/// `GET /api/sessions/score?tz=-540` → `{ "totalScore": 18, "todayScore": 8 }`
///
/// `tz`가 없거나 숫자가 아니면 UTC 기준입니다.
pub async fn get_score(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TzQuery>,
) -> Result<Json<ScoreSummary>, AppError> {
    let offset = parse_offset(query.tz.as_deref());
    let summary = state
        .ledger()
        .get_score(&auth.user_id, offset, Utc::now())
        .await?;
    Ok(Json(summary))
}

/// `DELETE /api/sessions` → `{ "deleted": 3 }`
pub async fn clear_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let deleted = state.ledger().clear_history(&auth.user_id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
