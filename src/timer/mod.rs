//! 무작위 포커스 타이머
//!
//! - `machine`: 시계 없는 상태 기계 (모자 선택, 시간 주사위, 카운트다운 판정)
//! - `countdown`: 1초 틱을 보내는 tokio 태스크
//! - `runner`: 둘을 묶고 결과를 `SessionSink`로 기록하는 드라이버

pub mod countdown;
pub mod machine;
pub mod runner;

pub use countdown::{Countdown, Tick, TICK_PERIOD};
pub use machine::{
    FocusOutcome, FocusTimer, Phase, Pick, TimerRun, MAX_ROLL_MINUTES, MIN_ROLL_MINUTES,
};
pub use runner::{FocusRunner, LedgerSink, SessionSink, SinkError};
