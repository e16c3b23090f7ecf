//! # 포커스 세션 러너
//!
//! `FocusTimer` 상태 기계에 실제 시계(`Countdown`)와 기록 경로(`SessionSink`)를 붙입니다.
//!
//! - 새 카운트다운을 시작하기 전에 이전 것을 항상 취소합니다.
//! - 현재 세대가 아닌 틱은 버립니다.
//! - 종료 결과(완료/조기 중단)는 정확히 한 번 싱크로 기록됩니다.
//!   기록이 실패해도 단계(phase)는 되돌리지 않습니다.
//! - `finish()`로 Idle에 돌아가면 모자 목록을 새로 읽으라고 리스너에 알립니다.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{error::AppError, models::Hat, services::Ledger};

use super::countdown::{Countdown, Tick, TICK_PERIOD};
use super::machine::{FocusOutcome, FocusTimer, Phase, Pick, TimerRun};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Ledger(#[from] AppError),

    #[error("session rejected: {0}")]
    Rejected(String),
}

/// 끝난 세션을 받아 어딘가에 남기는 쪽
pub trait SessionSink {
    fn record(&self, outcome: &FocusOutcome) -> impl Future<Output = Result<(), SinkError>> + Send;
}

/// 원장(`Ledger`)에 기록하는 싱크. HTTP 경로와 같은 검증/동기화를 거칩니다.
#[derive(Debug, Clone)]
pub struct LedgerSink {
    ledger: Ledger,
    owner_id: String,
}

impl LedgerSink {
    pub fn new(ledger: Ledger, owner_id: impl Into<String>) -> Self {
        Self {
            ledger,
            owner_id: owner_id.into(),
        }
    }
}

impl SessionSink for LedgerSink {
    async fn record(&self, outcome: &FocusOutcome) -> Result<(), SinkError> {
        self.ledger
            .record_session(
                &self.owner_id,
                &outcome.hat_id,
                i64::from(outcome.duration_seconds),
                i64::from(outcome.score),
                Utc::now(),
            )
            .await?;
        Ok(())
    }
}

type RefreshListener = Box<dyn FnMut() + Send>;

pub struct FocusRunner<R, S> {
    timer: FocusTimer<R>,
    sink: S,
    period: Duration,
    generation: u64,
    countdown: Option<Countdown>,
    ticks_tx: UnboundedSender<Tick>,
    ticks_rx: UnboundedReceiver<Tick>,
    on_refresh: Option<RefreshListener>,
}

impl<R: Rng, S: SessionSink> FocusRunner<R, S> {
    pub fn new(timer: FocusTimer<R>, sink: S) -> Self {
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        Self {
            timer,
            sink,
            period: TICK_PERIOD,
            generation: 0,
            countdown: None,
            ticks_tx,
            ticks_rx,
            on_refresh: None,
        }
    }

    /// 틱 간격을 바꿉니다. 1틱은 여전히 "1초"로 셉니다.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn on_refresh(mut self, listener: impl FnMut() + Send + 'static) -> Self {
        self.on_refresh = Some(Box::new(listener));
        self
    }

    pub fn phase(&self) -> Phase {
        self.timer.phase()
    }

    pub fn run(&self) -> Option<&TimerRun> {
        self.timer.run()
    }

    pub fn outcome(&self) -> Option<&FocusOutcome> {
        self.timer.outcome()
    }

    pub fn begin(&mut self, hats: &[Hat]) -> Option<Pick> {
        self.timer.begin(hats).cloned()
    }

    pub fn roll(&mut self) -> Option<u32> {
        self.timer.roll()
    }

    /// 카운트다운을 시작합니다. 이전 카운트다운은 먼저 취소됩니다.
    pub fn start(&mut self) -> Option<u32> {
        let total = self.timer.start_countdown()?;
        self.cancel_countdown();
        self.generation += 1;
        self.countdown = Some(Countdown::spawn(
            self.generation,
            self.period,
            self.ticks_tx.clone(),
        ));
        tracing::debug!(generation = self.generation, total_secs = total, "countdown started");
        Some(total)
    }

    /// 현재 세대의 틱 하나를 기다려 적용합니다.
    ///
    /// 이 틱으로 0에 도달하면 결과를 기록하고 반환합니다.
    /// Running이 아니면 기다리지 않고 `None`입니다.
    pub async fn next_tick(&mut self) -> Result<Option<FocusOutcome>, SinkError> {
        while self.timer.phase() == Phase::Running {
            let Some(tick) = self.ticks_rx.recv().await else {
                return Ok(None);
            };
            if tick.generation != self.generation {
                continue;
            }
            if let Some(outcome) = self.timer.tick() {
                self.cancel_countdown();
                self.record(&outcome).await?;
                tracing::info!(
                    hat_id = %outcome.hat_id,
                    minutes = outcome.minutes,
                    "focus session complete"
                );
                return Ok(Some(outcome));
            }
            return Ok(None);
        }
        Ok(None)
    }

    /// 0에 도달할 때까지 틱을 돌립니다.
    pub async fn run_to_completion(&mut self) -> Result<Option<FocusOutcome>, SinkError> {
        while self.timer.phase() == Phase::Running {
            if let Some(outcome) = self.next_tick().await? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    /// 조기 중단: 카운트다운을 멈추고 점수 0으로 기록합니다.
    pub async fn stop_early(&mut self) -> Result<Option<FocusOutcome>, SinkError> {
        let Some(outcome) = self.timer.stop_early() else {
            return Ok(None);
        };
        self.cancel_countdown();
        self.record(&outcome).await?;
        tracing::info!(
            hat_id = %outcome.hat_id,
            elapsed_secs = outcome.duration_seconds,
            "focus session stopped early"
        );
        Ok(Some(outcome))
    }

    /// 종료 화면에서 Idle로 돌아갑니다.
    pub fn finish(&mut self) -> bool {
        if !self.timer.finish() {
            return false;
        }
        if let Some(listener) = self.on_refresh.as_mut() {
            listener();
        }
        true
    }

    async fn record(&self, outcome: &FocusOutcome) -> Result<(), SinkError> {
        self.sink.record(outcome).await.inspect_err(|e| {
            tracing::warn!(hat_id = %outcome.hat_id, score = outcome.score, "failed to record focus session: {}", e);
        })
    }

    fn cancel_countdown(&mut self) {
        if let Some(mut countdown) = self.countdown.take() {
            countdown.cancel();
        }
    }
}
