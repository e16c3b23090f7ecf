//! 1초 간격 틱을 보내는 카운트다운 태스크
//!
//! 틱마다 실행 세대(generation)를 붙여 보냅니다. 받는 쪽은 현재 세대가 아닌 틱을
//! 버리므로, 취소 직전에 채널에 들어간 틱이 다음 실행을 건드리지 못합니다.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// 기본 틱 간격
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// 실행 중인 카운트다운 하나. drop되면 취소됩니다.
#[derive(Debug)]
pub struct Countdown {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Countdown {
    /// 첫 틱은 `period` 뒤에 옵니다. 받는 쪽이 사라지면 태스크도 끝납니다.
    pub fn spawn(generation: u64, period: Duration, ticks: UnboundedSender<Tick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });

        Self {
            generation,
            handle: Some(handle),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 여러 번 불러도 안전합니다.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "countdown cancelled");
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    const FAST: Duration = Duration::from_millis(5);

    #[tokio::test]
    async fn ticks_carry_their_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::spawn(3, FAST, tx);
        assert!(countdown.is_active());

        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(Tick { generation: 3 }));
        }
        countdown.cancel();
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::spawn(1, FAST, tx);
        rx.recv().await.unwrap();

        countdown.cancel();
        countdown.cancel();
        assert!(!countdown.is_active());

        while rx.try_recv().is_ok() {}
        time::sleep(FAST * 10).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dropping_cancels() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        drop(Countdown::spawn(9, FAST, tx));
        time::sleep(FAST * 10).await;
        // 태스크가 끝나면 송신자도 사라져 채널이 닫힙니다
        while let Ok(tick) = rx.try_recv() {
            assert_eq!(tick.generation, 9);
        }
        assert!(rx.recv().await.is_none());
    }
}
