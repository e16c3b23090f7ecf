//! # 데이터 모델 모듈
//!
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `hat`: 모자(활동)
//! - `session`: 포커스 세션과 점수
//! - `settings`: Beeminder 연동 정보
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Hat`처럼 짧게 쓸 수 있습니다.

pub mod hat;
pub mod session;
pub mod settings;

pub use hat::*;
pub use session::*;
pub use settings::*;
