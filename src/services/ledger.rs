//! # 점수 & 세션 원장(Ledger)
//!
//! 포커스 세션의 권위 있는 기록입니다. 라우트 핸들러와 타이머 싱크(`timer::LedgerSink`)가
//! 같은 경로로 세션을 남깁니다.
//!
//! ## 흐름
//! ```text
//! record_session()
//!   ├─ 검증 (음수 → 400, 남의/삭제된 모자 → 404)   ← 어떤 쓰기보다 먼저
//!   ├─ INSERT (서버 시각)
//!   └─ score > 0 이면 spawn: 연동 정보 조회 → Beeminder 전송   ← 기다리지 않음
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::task::JoinHandle;

use crate::{
    db,
    error::AppError,
    models::{FocusSession, ScoreSummary, SessionRecord},
    services::{
        beeminder::{BeeminderClient, Datapoint},
        day_boundary::{local_day_start, to_db_timestamp},
    },
};

#[derive(Debug, Clone)]
pub struct Ledger {
    pool: SqlitePool,
    sync: BeeminderClient,
}

impl Ledger {
    pub fn new(pool: SqlitePool, sync: BeeminderClient) -> Self {
        Self { pool, sync }
    }

    /// 세션 하나를 기록하고 생성된 행을 반환합니다.
    ///
    /// Beeminder 전송은 백그라운드 태스크로 넘기므로 응답을 늦추지 않고,
    /// 실패해도 이미 저장된 세션에는 영향이 없습니다.
    pub async fn record_session(
        &self,
        owner_id: &str,
        hat_id: &str,
        duration_seconds: i64,
        score: i64,
        now: DateTime<Utc>,
    ) -> Result<FocusSession, AppError> {
        if duration_seconds < 0 {
            return Err(AppError::BadRequest(
                "durationSeconds must not be negative".to_string(),
            ));
        }
        if score < 0 {
            return Err(AppError::BadRequest("score must not be negative".to_string()));
        }

        let hat = db::get_hat(&self.pool, owner_id, hat_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let session = db::create_session(
            &self.pool,
            owner_id,
            &hat.id,
            duration_seconds,
            score,
            &to_db_timestamp(now),
        )
        .await?
        .ok_or(AppError::NotFound)?;

        tracing::info!(
            owner_id,
            session_id = %session.id,
            hat_id = %hat.id,
            duration_seconds,
            score,
            "focus session recorded"
        );

        if score > 0 {
            // 핸들은 버립니다 (fire-and-forget)
            let _ = self.spawn_sync(&session, &hat.name);
        }

        Ok(session)
    }

    /// 연동 정보 조회부터 전송까지를 백그라운드 태스크 하나로 띄웁니다.
    ///
    /// 요청 경로에서는 DB도 HTTP도 기다리지 않습니다. 태스크 안의 에러는 모두 로그로 끝납니다.
    fn spawn_sync(&self, session: &FocusSession, hat_name: &str) -> JoinHandle<()> {
        let pool = self.pool.clone();
        let sync = self.sync.clone();
        let owner_id = session.owner_id.clone();
        let datapoint = Datapoint::for_session(
            &session.id,
            hat_name,
            session.score,
            session.duration_seconds / 60,
        );

        tokio::spawn(async move {
            let creds = match db::get_beeminder_credentials(&pool, &owner_id).await {
                Ok(creds) => creds,
                Err(e) => {
                    tracing::warn!(owner_id = %owner_id, requestid = %datapoint.requestid, "could not load Beeminder settings: {}", e);
                    return;
                }
            };
            sync.deliver(creds, datapoint).await;
        })
    }

    pub async fn list_sessions(&self, owner_id: &str) -> Result<Vec<SessionRecord>, AppError> {
        db::list_sessions_for_owner(&self.pool, owner_id).await
    }

    /// 전체 점수와, 호출자 현지 날짜 기준 오늘 점수
    pub async fn get_score(
        &self,
        owner_id: &str,
        tz_offset_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<ScoreSummary, AppError> {
        let since = to_db_timestamp(local_day_start(now, tz_offset_minutes));
        db::score_summary(&self.pool, owner_id, &since).await
    }

    /// 세션 이력 전체 삭제. 삭제된 개수를 반환합니다.
    pub async fn clear_history(&self, owner_id: &str) -> Result<u64, AppError> {
        let deleted = db::delete_sessions_for_owner(&self.pool, owner_id).await?;
        tracing::info!(owner_id, deleted, "session history cleared");
        Ok(deleted)
    }
}
