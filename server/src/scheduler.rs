use cosweep_core::{Scheduler, TimerId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

use crate::hub::Command;

/// Runs each interval as its own task that feeds ticks into the hub's command queue.
pub struct TokioScheduler {
    commands: UnboundedSender<Command>,
    next_id: u64,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(commands: UnboundedSender<Command>) -> Self {
        Self {
            commands,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn start_interval(&mut self, period: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId::new(self.next_id);
        let commands = self.commands.clone();

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if commands.send(Command::Tick(id)).is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(id, task);
        log::trace!("Started timer {:?} every {:?}", id, period);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
            log::trace!("Cancelled timer {:?}", id);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn interval_ticks_until_cancelled() {
        let (tx, mut rx) = unbounded_channel();
        let mut scheduler = TokioScheduler::new(tx);

        let id = scheduler.start_interval(Duration::from_millis(10));
        for _ in 0..2 {
            assert!(matches!(rx.recv().await, Some(Command::Tick(tick)) if tick == id));
        }

        scheduler.cancel(id);
        // drain anything that was already queued before the abort landed
        tokio::time::sleep(Duration::from_millis(30)).await;
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }
}
