//! # 포커스 세션 모델 정의
//!
//! 한 번의 포커스 시도(완료 또는 중도 포기)를 기록합니다.
//! 세션은 만들어진 뒤 수정되지 않습니다. 생성, 목록, 집계, 일괄 삭제만 있습니다.
//!
//! ## 점수 규칙
//! - 타이머가 끝까지 가면: 점수 = 굴린 시간(분)
//! - 중간에 멈추면: 점수 = 0, `duration_seconds`에는 실제로 보낸 시간이 남습니다

use serde::{Deserialize, Serialize};

/// 포커스 세션 엔티티 — DB의 `focus_sessions` 테이블 한 행
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: String,
    pub owner_id: String,
    pub hat_id: String,
    pub duration_seconds: i64,
    pub score: i64,
    /// 서버가 부여하는 생성 시각 (UTC)
    pub created_at: String,
}

/// 세션 목록 조회용 행 — 모자 이름을 JOIN으로 함께 가져옵니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionWithHatRow {
    pub id: String,
    pub owner_id: String,
    pub hat_id: String,
    pub duration_seconds: i64,
    pub score: i64,
    pub created_at: String,
    pub hat_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HatName {
    pub name: String,
}

/// `GET /api/sessions` 응답 항목: `{ ..., "hat": { "name": "..." } }`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(flatten)]
    pub session: FocusSession,
    pub hat: HatName,
}

impl From<SessionWithHatRow> for SessionRecord {
    fn from(row: SessionWithHatRow) -> Self {
        Self {
            session: FocusSession {
                id: row.id,
                owner_id: row.owner_id,
                hat_id: row.hat_id,
                duration_seconds: row.duration_seconds,
                score: row.score,
                created_at: row.created_at,
            },
            hat: HatName { name: row.hat_name },
        }
    }
}

/// 세션 생성 요청 — `POST /api/sessions`
///
/// 필수 필드지만 누락 시 400을 주기 위해 Option으로 받습니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub duration_seconds: Option<i64>,
    pub score: Option<i64>,
    pub hat_id: Option<String>,
}

/// `GET /api/sessions/score` 응답
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub total_score: i64,
    pub today_score: i64,
}

/// `?tz=` 쿼리. 숫자가 아니어도 거부하지 않도록 문자열로 받습니다.
#[derive(Debug, Default, Deserialize)]
pub struct TzQuery {
    pub tz: Option<String>,
}
