//! Clock source: one tokio interval task per armed timer handle

use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;
use crate::core::controller::Event;
use crate::core::timers::TimerHandle;

/// Keeps tick tasks in step with the controller's armed timers.
///
/// Ticks arrive as `Event::Tick(handle)` on the channel. A tick that races a
/// cancellation still reaches the controller, which drops it as stale.
#[derive(Debug)]
pub struct TimerDriver {
    tx: UnboundedSender<Event>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TimerDriver {
    pub fn new(tx: UnboundedSender<Event>) -> Self {
        Self {
            tx,
            tasks: HashMap::new(),
        }
    }

    /// Abort tasks for handles no longer armed, spawn tasks for new ones
    pub fn sync(&mut self, armed: &[TimerHandle]) {
        self.tasks.retain(|handle, task| {
            let keep = armed.contains(handle);
            if !keep {
                debug!(?handle, "timer task aborted");
                task.abort();
            }
            keep
        });

        for handle in armed {
            if self.tasks.contains_key(handle) {
                continue;
            }
            let handle = *handle;
            let tx = self.tx.clone();
            let period = handle.kind.period();
            let task = tokio::spawn(async move {
                let mut ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    if tx.send(Event::Tick(handle)).is_err() {
                        break;
                    }
                }
            });
            debug!(?handle, ?period, "timer task spawned");
            self.tasks.insert(handle, task);
        }
    }

    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    pub fn shutdown(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timers::{TimerKind, TimerSet};
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::error::TryRecvError;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_cancelled() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut driver = TimerDriver::new(tx);
        let mut timers = TimerSet::new();
        let handle = timers.arm(TimerKind::Question);

        driver.sync(&timers.armed());
        assert_eq!(driver.running(), 1);
        assert_eq!(rx.recv().await, Some(Event::Tick(handle)));
        assert_eq!(rx.recv().await, Some(Event::Tick(handle)));

        timers.cancel(TimerKind::Question);
        driver.sync(&timers.armed());
        assert_eq!(driver.running(), 0);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut driver = TimerDriver::new(tx);
        let mut timers = TimerSet::new();
        let first = timers.arm(TimerKind::Interference);
        driver.sync(&timers.armed());
        let second = timers.arm(TimerKind::Interference);
        driver.sync(&timers.armed());
        assert_eq!(driver.running(), 1);
        assert_eq!(rx.recv().await, Some(Event::Tick(second)));
        assert_ne!(first, second);
    }
}
