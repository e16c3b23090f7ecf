//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 라우트 핸들러(routes/)와 서비스(services/)가 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `hats`: 모자 CRUD, soft-delete, 일일 자동 해제
//! - `sessions`: 포커스 세션 기록/목록/점수 집계
//! - `settings`: Beeminder 연동 정보

pub mod hats;
pub mod sessions;
pub mod settings;

pub use hats::*;
pub use sessions::*;
pub use settings::*;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// 연결 풀을 만들고 마이그레이션을 실행합니다.
///
/// `sqlite::memory:`는 연결마다 별도 DB이므로 테스트에서는 `max_connections = 1`로 부릅니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
