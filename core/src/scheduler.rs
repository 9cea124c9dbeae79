use std::collections::BTreeMap;
use std::time::Duration;

/// Handle for a repeating timer issued by a [`Scheduler`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Source of repeating timers. Fired ticks are delivered back through [`crate::GameEngine::tick`] by whoever drives
/// the engine, so every tick runs to completion like any other request.
pub trait Scheduler {
    fn start_interval(&mut self, period: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn start_interval(&mut self, period: Duration) -> TimerId {
        (**self).start_interval(period)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Interval {
    period: Duration,
    next_due: Duration,
}

/// Virtual clock, time only moves through [`ManualScheduler::advance`].
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    intervals: BTreeMap<TimerId, Interval>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn active_timers(&self) -> usize {
        self.intervals.len()
    }

    /// Moves the clock forward and returns every tick that came due, oldest first.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        let target = self.now + by;
        let mut fired = Vec::new();

        loop {
            let due = self
                .intervals
                .iter()
                .filter(|(_, interval)| interval.next_due <= target)
                .min_by_key(|&(&id, interval)| (interval.next_due, id))
                .map(|(&id, interval)| (id, interval.next_due));
            let Some((id, at)) = due else {
                break;
            };

            self.now = at;
            if let Some(interval) = self.intervals.get_mut(&id) {
                interval.next_due += interval.period;
            }
            fired.push(id);
        }

        self.now = target;
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn start_interval(&mut self, period: Duration) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.intervals.insert(
            id,
            Interval {
                period,
                next_due: self.now + period,
            },
        );
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.intervals.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn interval_fires_once_per_period() {
        let mut scheduler = ManualScheduler::new();
        let id = scheduler.start_interval(SECOND);

        assert!(scheduler.advance(Duration::from_millis(999)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![id]);
        assert_eq!(scheduler.advance(3 * SECOND), vec![id, id, id]);
        assert_eq!(scheduler.now(), 4 * SECOND);
    }

    #[test]
    fn cancelled_interval_stops_firing() {
        let mut scheduler = ManualScheduler::new();
        let id = scheduler.start_interval(SECOND);
        scheduler.cancel(id);

        assert!(scheduler.advance(10 * SECOND).is_empty());
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn ticks_are_ordered_across_timers() {
        let mut scheduler = ManualScheduler::new();
        let slow = scheduler.start_interval(2 * SECOND);
        let fast = scheduler.start_interval(SECOND);

        assert_eq!(scheduler.advance(2 * SECOND), vec![fast, slow, fast]);
    }
}
