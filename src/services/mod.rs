//! # 비즈니스 로직 서비스
//!
//! - `day_boundary`: 시간대 오프셋 → "오늘" 시작 시각 (순수 함수)
//! - `ledger`: 세션 기록/점수 집계, Beeminder 전송 트리거
//! - `beeminder`: Beeminder 데이터포인트 전송 (fire-and-forget)

pub mod beeminder;
pub mod day_boundary;
pub mod ledger;

pub use ledger::Ledger;
