//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 구성입니다.
//!
//! 각 하위 모듈:
//! - `hats`: 모자 목록(일일 자동 해제 포함)/생성/수정/삭제
//! - `sessions`: 세션 기록/목록/점수/이력 삭제
//! - `settings`: Beeminder 연동 설정
//! - `health`: 서버 상태 확인 (헬스체크)
//!
//! `/health`를 제외한 모든 라우트는 `AuthUser` 추출기로 Bearer 토큰을 요구합니다.

pub mod hats;
pub mod health;
pub mod sessions;
pub mod settings;

pub use hats::*;
pub use health::*;
pub use sessions::*;
pub use settings::*;

use axum::{
    routing::{get, patch},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::services::{beeminder::BeeminderClient, Ledger};

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `SqlitePool`과 `reqwest::Client`는 내부적으로 Arc라서 clone이 저렴합니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// JWT 토큰 검증용 비밀키
    pub jwt_secret: String,
    /// Beeminder 전송 클라이언트
    pub sync: BeeminderClient,
}

impl AppState {
    pub fn ledger(&self) -> Ledger {
        Ledger::new(self.pool.clone(), self.sync.clone())
    }
}

/// `/api` 아래에 들어갈 라우트들
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/hats", get(list_hats).post(create_hat))
        .route("/hats/{id}", patch(update_hat).delete(delete_hat))
        .route(
            "/sessions",
            get(list_sessions).post(create_session).delete(clear_sessions),
        )
        .route("/sessions/score", get(get_score))
        .route(
            "/settings/beeminder",
            get(get_beeminder)
                .put(update_beeminder)
                .delete(delete_beeminder),
        )
        .route("/health", get(health_check))
        .with_state(state)
}

/// 전체 앱: `/api` 중첩 + CORS + 요청 로깅
pub fn app(state: AppState) -> Router {
    // 개발 편의상 모든 출처 허용. 프로덕션에서는 UI 도메인으로 좁혀야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
