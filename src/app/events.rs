use std::time::Duration;

use chrono::NaiveDate;
use rand::Rng;
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};

use crate::domain::weather::{ForecastBundle, RawWeatherSnapshot};

#[derive(Debug)]
pub enum FetchPayload {
    Forecast(ForecastBundle),
    Date {
        date: NaiveDate,
        snapshot: RawWeatherSnapshot,
    },
}

#[derive(Debug)]
pub enum EngineEvent {
    Bootstrap,
    TickRefresh,
    FetchSucceeded {
        generation: u64,
        payload: Box<FetchPayload>,
    },
    FetchFailed {
        generation: u64,
        error: String,
    },
    Quit,
}

/// Sends `TickRefresh` roughly every `every`, jittered by ±10% so many
/// instances do not hit the API in lockstep.
pub fn start_refresh_task(tx: mpsc::Sender<EngineEvent>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let base = every.max(Duration::from_secs(10)).as_secs_f64();
        loop {
            let wait_secs = {
                let mut rng = rand::rng();
                let jitter = rng.random_range(-0.1..0.1);
                (base * (1.0 + jitter)).max(1.0)
            };
            sleep(Duration::from_secs_f64(wait_secs)).await;
            if tx.send(EngineEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    })
}

pub fn schedule_retry(tx: mpsc::Sender<EngineEvent>, delay: Duration) {
    tokio::spawn(async move {
        sleep(delay.max(Duration::from_secs(1))).await;
        let _ = tx.send(EngineEvent::TickRefresh).await;
    });
}

/// Latest-write-wins slot for the in-flight fetch. Starting a fetch aborts the
/// previous task and bumps the generation; results tagged with an older
/// generation are stale.
#[derive(Debug, Default)]
pub struct FetchSlot {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl FetchSlot {
    pub fn begin(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;
        self.generation
    }

    pub fn attach(&mut self, handle: JoinHandle<()>) {
        self.handle = Some(handle);
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Accepts a result for `generation`, releasing the slot. Returns `false`
    /// for results from a superseded fetch.
    pub fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.handle = None;
        true
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn begin_aborts_previous_fetch() {
        let mut slot = FetchSlot::default();
        let first = slot.begin();
        let pending = tokio::spawn(async {
            sleep(Duration::from_secs(3600)).await;
        });
        let abort = pending.abort_handle();
        slot.attach(pending);
        assert!(slot.in_flight());

        let second = slot.begin();
        assert_eq!(second, first + 1);
        for _ in 0..16 {
            if abort.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(abort.is_finished());
        assert!(!slot.finish(first));
        assert!(slot.finish(second));
        assert!(!slot.in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn retry_fires_after_delay() {
        let (tx, mut rx) = mpsc::channel(1);
        schedule_retry(tx, Duration::from_secs(20));
        tokio::time::advance(Duration::from_secs(21)).await;
        assert!(matches!(rx.recv().await, Some(EngineEvent::TickRefresh)));
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_ticks_within_jitter_window() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = start_refresh_task(tx, Duration::from_secs(300));

        tokio::time::advance(Duration::from_secs(269)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_secs(62)).await;
        assert!(matches!(rx.recv().await, Some(EngineEvent::TickRefresh)));
        handle.abort();
    }
}
