//! # 모자(Hat) 모델 정의
//!
//! 모자는 사용자가 정의한 활동 단위입니다 (예: "글쓰기", "운동").
//! 포커스 세션은 아직 `done`이 아닌 모자 중에서 무작위로 하나를 고릅니다.
//!
//! ## 구조체 역할
//! - `Hat`: DB의 `hats` 테이블 한 행 (응답용)
//! - `CreateHatRequest`: `POST /api/hats` 요청 본문
//! - `UpdateHatRequest`: `PATCH /api/hats/{id}` 요청 본문

use serde::{Deserialize, Serialize};

/// 모자 엔티티
///
/// `done_at`은 `done`이 true가 될 때 정확히 설정되고, false가 되거나
/// 날짜가 바뀌어 자동 해제될 때 지워집니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Hat {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub done: bool,
    pub done_at: Option<String>,
    /// soft-delete 표시. 삭제된 모자는 목록/선택/수정 어디에도 나오지 않으므로 응답에서 뺍니다.
    #[serde(skip_serializing)]
    pub deleted_at: Option<String>,
    pub created_at: String,
}

/// 모자 생성 요청
///
/// `name`이 Option인 이유: 필드가 빠진 경우도 serde 에러(422)가 아니라
/// 핸들러에서 400으로 돌려주기 위해서입니다.
#[derive(Debug, Deserialize)]
pub struct CreateHatRequest {
    pub name: Option<String>,
}

/// 모자 수정 요청 — 보낸 필드만 바뀝니다 (PATCH)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateHatRequest {
    pub name: Option<String>,
    pub done: Option<bool>,
}
