//! # hatrack
//!
//! 모자(hat) 단위의 습관 추적 백엔드입니다.
//! 무작위 포커스 타이머로 점수를 쌓고, 점수가 난 세션을 Beeminder로 보냅니다.
//!
//! 바이너리(`main.rs`)와 통합 테스트(`tests/`)가 같은 모듈을 쓰도록 라이브러리로 노출합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod timer;
