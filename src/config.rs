//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수(.env 파일 포함)에서 서버 설정값을 읽어옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: Bearer 토큰 검증용 비밀키 (필수)
//! - `HOST`: 서버 바인딩 주소 (기본값 "0.0.0.0")
//! - `PORT`: 서버 포트 번호 (기본값 4000)
//! - `BEEMINDER_API_URL`: Beeminder API 루트 (기본값 `https://www.beeminder.com/api/v1`)
//! - `SYNC_TIMEOUT_SECS`: Beeminder 요청 1회의 타임아웃(초, 기본값 10)

use std::env;

pub const DEFAULT_BEEMINDER_API_URL: &str = "https://www.beeminder.com/api/v1";

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/hatrack.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 검증에 사용하는 비밀키
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// Beeminder API 루트 URL. 테스트에서는 목 서버 주소로 바꿉니다.
    pub beeminder_api_url: String,
    /// Beeminder 요청 타임아웃(초)
    pub sync_timeout_secs: u64,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지는 기본값이 있고, 숫자 파싱에 실패해도 기본값을 씁니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .unwrap_or(4000),
            beeminder_api_url: env::var("BEEMINDER_API_URL")
                .unwrap_or_else(|_| DEFAULT_BEEMINDER_API_URL.to_string()),
            sync_timeout_secs: env::var("SYNC_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}
