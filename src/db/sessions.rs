//! # 포커스 세션 데이터베이스 쿼리 모듈
//!
//! 세션 생성, 목록, 점수 집계, 일괄 삭제를 담당합니다.
//! UPDATE 쿼리는 없습니다 (세션은 불변).
//!
//! ## 세션 라이프사이클
//! ```text
//! [타이머 완료/중단] → create_session() → (불변) → delete_sessions_for_owner()로만 제거
//! ```

use crate::error::AppError;
use crate::models::{FocusSession, ScoreSummary, SessionRecord, SessionWithHatRow};
use sqlx::SqlitePool;

/// 세션을 기록합니다.
///
/// INSERT ... SELECT 로 "모자가 호출자 소유이고 삭제되지 않았을 때만" 삽입합니다.
/// 검증과 삽입 사이에 모자가 삭제되더라도 남의 모자에 세션이 붙지 않습니다.
///
/// ## 반환값
/// - `Ok(Some(FocusSession))`: 생성된 세션
/// - `Ok(None)`: 모자가 없거나 남의 것이거나 삭제됨 → 라우트에서 404
pub async fn create_session(
    pool: &SqlitePool,
    owner_id: &str,
    hat_id: &str,
    duration_seconds: i64,
    score: i64,
    created_at: &str,
) -> Result<Option<FocusSession>, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    let result = sqlx::query(
        r#"
        INSERT INTO focus_sessions (id, owner_id, hat_id, duration_seconds, score, created_at)
        SELECT ?, h.owner_id, h.id, ?, ?, ?
        FROM hats h
        WHERE h.id = ? AND h.owner_id = ? AND h.deleted_at IS NULL
        "#,
    )
    .bind(&id)
    .bind(duration_seconds)
    .bind(score)
    .bind(created_at)
    .bind(hat_id)
    .bind(owner_id)
    .execute(pool)
    .await
    .map_err(|e| AppError::from_insert(e, "Session"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_session(pool, owner_id, &id).await
}

/// ID로 세션 하나를 조회합니다 (소유자 범위).
pub async fn get_session(
    pool: &SqlitePool,
    owner_id: &str,
    id: &str,
) -> Result<Option<FocusSession>, AppError> {
    let session = sqlx::query_as::<_, FocusSession>(
        r#"
        SELECT id, owner_id, hat_id, duration_seconds, score, created_at
        FROM focus_sessions
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// 사용자의 모든 세션을 최신순으로 조회합니다.
///
/// 모자가 나중에 soft-delete 되었어도 이름은 그대로 보여줍니다.
pub async fn list_sessions_for_owner(
    pool: &SqlitePool,
    owner_id: &str,
) -> Result<Vec<SessionRecord>, AppError> {
    let rows = sqlx::query_as::<_, SessionWithHatRow>(
        r#"
        SELECT s.id, s.owner_id, s.hat_id, s.duration_seconds, s.score, s.created_at,
               h.name AS hat_name
        FROM focus_sessions s
        JOIN hats h ON h.id = s.hat_id
        WHERE s.owner_id = ?
        ORDER BY s.created_at DESC, s.id DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SessionRecord::from).collect())
}

/// 전체 점수와 `since` 이후(오늘) 점수를 한 번의 쿼리로 계산합니다.
///
/// 행이 없으면 SUM이 NULL이 되므로 COALESCE로 0을 돌려줍니다.
pub async fn score_summary(
    pool: &SqlitePool,
    owner_id: &str,
    since: &str,
) -> Result<ScoreSummary, AppError> {
    let (total_score, today_score): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(score), 0),
               COALESCE(SUM(CASE WHEN created_at >= ? THEN score ELSE 0 END), 0)
        FROM focus_sessions
        WHERE owner_id = ?
        "#,
    )
    .bind(since)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(ScoreSummary {
        total_score,
        today_score,
    })
}

/// 사용자의 세션 이력을 모두 지우고 삭제된 개수를 반환합니다.
pub async fn delete_sessions_for_owner(pool: &SqlitePool, owner_id: &str) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM focus_sessions WHERE owner_id = ?")
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
