//! # hatrack 웹 서버 진입점
//!
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성 + 마이그레이션
//! 4. Beeminder 클라이언트 준비
//! 5. 라우터 구성 후 HTTP 서버 시작

use std::time::Duration;

use anyhow::Result;
use hatrack::{
    config::Config,
    db,
    routes::{self, AppState},
    services::beeminder::BeeminderClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 괜찮습니다
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 hatrack, tower_http, axum을 debug로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hatrack=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting hatrack server on {}:{}", config.host, config.port);

    let pool = db::connect(&config.database_url, 5).await?;

    let sync = BeeminderClient::new(
        &config.beeminder_api_url,
        Duration::from_secs(config.sync_timeout_secs),
    )?;
    tracing::info!("Beeminder sync target: {}", config.beeminder_api_url);

    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        sync,
    };
    let app = routes::app(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
