//! Cancellable periodic tasks
//!
//! Used for the 30-second status poll and the load-test monitor. The next
//! tick is scheduled after the previous one finishes, so a slow API never
//! stacks up overlapping rounds. Stopping the handle also abandons an
//! in-flight tick.

use std::future::Future;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// What a tick wants to happen next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

/// Timing of a periodic task
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    /// Wait before the first tick
    pub initial_delay: Duration,
    /// Wait between the end of one tick and the start of the next
    pub period: Duration,
}

impl Schedule {
    /// First tick one full period after start
    pub fn every(period: Duration) -> Self {
        Self {
            initial_delay: period,
            period,
        }
    }
}

/// Handle to a running periodic task
pub struct PollerHandle {
    name: &'static str,
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Whether the loop has exited (stopped or returned `Stop`)
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop and wait for it to exit
    pub async fn stop(self) {
        // Err only means the loop already exited on its own
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            debug!(poller = self.name, error = %e, "Poller task ended abnormally");
        }
    }
}

/// Spawn `tick` on the given schedule until it returns `Stop` or the
/// handle is stopped
pub fn spawn<F, Fut>(name: &'static str, schedule: Schedule, mut tick: F) -> PollerHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = TickOutcome> + Send + 'static,
{
    let (shutdown, mut shutdown_rx) = broadcast::channel(1);

    let task = tokio::spawn(async move {
        debug!(
            poller = name,
            period_ms = schedule.period.as_millis() as u64,
            "Starting poller"
        );

        let mut delay = schedule.initial_delay;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown_rx.recv() => {
                    info!(poller = name, "Poller stopped");
                    return;
                }
            }

            let outcome = tokio::select! {
                outcome = tick() => outcome,
                _ = shutdown_rx.recv() => {
                    info!(poller = name, "Poller stopped during tick");
                    return;
                }
            };

            if outcome == TickOutcome::Stop {
                debug!(poller = name, "Poller finished");
                return;
            }
            delay = schedule.period;
        }
    });

    PollerHandle {
        name,
        shutdown,
        task,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type BoxedTick = std::pin::Pin<Box<dyn Future<Output = TickOutcome> + Send>>;

    fn counting(counter: Arc<AtomicUsize>, stop_after: usize) -> impl FnMut() -> BoxedTick {
        move || {
            let counter = counter.clone();
            Box::pin(async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n >= stop_after {
                    TickOutcome::Stop
                } else {
                    TickOutcome::Continue
                }
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_initial_delay() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = spawn(
            "test",
            Schedule::every(Duration::from_secs(30)),
            counting(counter.clone(), usize::MAX),
        );

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_ticks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = spawn(
            "test",
            Schedule::every(Duration::from_secs(1)),
            counting(counter.clone(), usize::MAX),
        );

        tokio::time::sleep(Duration::from_millis(3500)).await;
        handle.stop().await;
        let ticks = counter.load(Ordering::SeqCst);
        assert_eq!(ticks, 3);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_can_end_the_loop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = spawn(
            "test",
            Schedule {
                initial_delay: Duration::from_secs(1),
                period: Duration::from_secs(2),
            },
            counting(counter.clone(), 3),
        );

        // ticks at 1s, 3s, 5s; the third asks to stop
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert!(handle.is_finished());

        // stopping an already finished loop is harmless
        handle.stop().await;
    }
}
