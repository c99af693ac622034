//! Wall-clock access for the simulator

#[cfg(test)]
use std::cell::Cell;

#[cfg(test)]
use chrono::Duration;
use chrono::Utc;

use crate::facility::Timestamp;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock that only moves when told to. Optionally advances by a fixed
/// step on every read.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Timestamp>,
    step: Duration,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Cell::new(now),
            step: Duration::zero(),
        }
    }

    pub fn with_step(now: Timestamp, step: Duration) -> Self {
        Self {
            now: Cell::new(now),
            step,
        }
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let now = self.now.get();
        self.now.set(now + self.step);
        now
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    #[test]
    fn manual_clock_steps_per_read() {
        let start = DateTime::from_timestamp(1_737_000_000, 0).unwrap();
        let clock = ManualClock::with_step(start, Duration::seconds(60));
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start + Duration::seconds(60));

        let frozen = ManualClock::new(start);
        assert_eq!(frozen.now(), start);
        assert_eq!(frozen.now(), start);
    }
}
