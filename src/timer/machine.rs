//! # 포커스 타이머 상태 기계
//!
//! 시계가 없는 순수 상태 기계입니다. 호출자가 1초마다 `tick()`을 한 번씩 넣어 줍니다.
//! 난수는 주입된 `Rng`에서만 가져오므로, 같은 시드면 모자 선택과 시간 주사위가
//! 그대로 재현됩니다.
//!
//! ## 상태 전이
//!
//! ```text
//! Idle -> RevealActivity -> RevealDuration -> Running -> (Complete | StoppedEarly) -> Idle
//! ```
//!
//! 단계에 맞지 않는 명령은 무시되고 `None`/`false`를 돌려줍니다.

use std::ops::RangeInclusive;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::Hat;

/// 시간 주사위의 최소/최대 눈(분)
pub const MIN_ROLL_MINUTES: u32 = 1;
pub const MAX_ROLL_MINUTES: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    RevealActivity,
    RevealDuration,
    Running,
    Complete,
    StoppedEarly,
}

/// 이번 실행에 뽑힌 모자
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub hat_id: String,
    pub hat_name: String,
}

/// 끝난 실행의 결과. 세션 싱크로 넘어갑니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusOutcome {
    pub hat_id: String,
    pub hat_name: String,
    /// 주사위로 나온 시간(분)
    pub minutes: u32,
    /// 실제로 보낸 초. 완료면 `minutes * 60`
    pub duration_seconds: u32,
    /// 완료면 `minutes`, 조기 중단이면 0
    pub score: u32,
    pub completed: bool,
}

/// 포커스 시도 한 번의 휘발성 상태 (메모리에만 존재)
#[derive(Debug, Clone)]
pub struct TimerRun {
    pub pick: Pick,
    pub minutes: Option<u32>,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub outcome: Option<FocusOutcome>,
}

impl TimerRun {
    pub fn elapsed_secs(&self) -> u32 {
        self.total_secs - self.remaining_secs
    }

    /// 남은 시간 `MM:SS`
    pub fn remaining_display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}

#[derive(Debug)]
pub struct FocusTimer<R> {
    rng: R,
    dice: RangeInclusive<u32>,
    phase: Phase,
    run: Option<TimerRun>,
}

impl<R: Rng> FocusTimer<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            dice: MIN_ROLL_MINUTES..=MAX_ROLL_MINUTES,
            phase: Phase::Idle,
            run: None,
        }
    }

    /// 주사위 눈의 범위를 좁힙니다 (짧은 연습 세션 등).
    ///
    /// 비어 있거나 1~25분을 벗어나는 범위는 무시하고 기본값을 유지합니다.
    pub fn with_dice(mut self, dice: RangeInclusive<u32>) -> Self {
        let within = *dice.start() >= MIN_ROLL_MINUTES && *dice.end() <= MAX_ROLL_MINUTES;
        if !dice.is_empty() && within {
            self.dice = dice;
        }
        self
    }

    // ── 조회 ──────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&self) -> Option<&TimerRun> {
        self.run.as_ref()
    }

    pub fn outcome(&self) -> Option<&FocusOutcome> {
        self.run.as_ref().and_then(|r| r.outcome.as_ref())
    }

    // ── 명령 ──────────────────────────────────────────────────────────

    /// 아직 `done`이 아닌 모자 중 하나를 무작위로 고릅니다.
    ///
    /// 고를 모자가 없으면 `Idle`에 그대로 머뭅니다.
    pub fn begin(&mut self, hats: &[Hat]) -> Option<&Pick> {
        if self.phase != Phase::Idle {
            return None;
        }
        let eligible: Vec<&Hat> = hats
            .iter()
            .filter(|h| !h.done && h.deleted_at.is_none())
            .collect();
        let hat = eligible.choose(&mut self.rng)?;

        self.run = Some(TimerRun {
            pick: Pick {
                hat_id: hat.id.clone(),
                hat_name: hat.name.clone(),
            },
            minutes: None,
            remaining_secs: 0,
            total_secs: 0,
            outcome: None,
        });
        self.phase = Phase::RevealActivity;
        self.run.as_ref().map(|r| &r.pick)
    }

    /// 시간 주사위(분)
    pub fn roll(&mut self) -> Option<u32> {
        if self.phase != Phase::RevealActivity {
            return None;
        }
        let minutes = self.rng.gen_range(self.dice.clone());
        let run = self.run.as_mut()?;
        run.minutes = Some(minutes);
        self.phase = Phase::RevealDuration;
        Some(minutes)
    }

    /// 카운트다운을 준비합니다. 전체 초를 반환합니다.
    pub fn start_countdown(&mut self) -> Option<u32> {
        if self.phase != Phase::RevealDuration {
            return None;
        }
        let run = self.run.as_mut()?;
        let total = run.minutes?.checked_mul(60)?;
        run.total_secs = total;
        run.remaining_secs = total;
        self.phase = Phase::Running;
        Some(total)
    }

    /// 1초 진행합니다.
    ///
    /// 0에 도달한 틱에서만 결과를 내고 다시는 내지 않습니다.
    /// `Running`을 벗어난 뒤의 틱은 아무 일도 하지 않습니다.
    pub fn tick(&mut self) -> Option<FocusOutcome> {
        if self.phase != Phase::Running {
            return None;
        }
        let run = self.run.as_mut()?;
        run.remaining_secs = run.remaining_secs.saturating_sub(1);
        if run.remaining_secs > 0 {
            return None;
        }

        let minutes = run.minutes.unwrap_or_default();
        let outcome = FocusOutcome {
            hat_id: run.pick.hat_id.clone(),
            hat_name: run.pick.hat_name.clone(),
            minutes,
            duration_seconds: run.total_secs,
            score: minutes,
            completed: true,
        };
        run.outcome = Some(outcome.clone());
        self.phase = Phase::Complete;
        Some(outcome)
    }

    /// 실행 중인 카운트다운을 멈춥니다. 점수는 0, 경과 시간은 남깁니다.
    pub fn stop_early(&mut self) -> Option<FocusOutcome> {
        if self.phase != Phase::Running {
            return None;
        }
        let run = self.run.as_mut()?;
        let outcome = FocusOutcome {
            hat_id: run.pick.hat_id.clone(),
            hat_name: run.pick.hat_name.clone(),
            minutes: run.minutes.unwrap_or_default(),
            duration_seconds: run.elapsed_secs(),
            score: 0,
            completed: false,
        };
        run.outcome = Some(outcome.clone());
        self.phase = Phase::StoppedEarly;
        Some(outcome)
    }

    /// "한 번 더"와 "그만"은 모두 `Idle`로 돌아가며 실행 상태를 버립니다.
    pub fn finish(&mut self) -> bool {
        match self.phase {
            Phase::Complete | Phase::StoppedEarly => {
                self.phase = Phase::Idle;
                self.run = None;
                true
            }
            _ => false,
        }
    }
}
