//! Position acquisition guard.
//!
//! [`PositionGuard::acquire`] keeps sampling the sensor until it either gets
//! a valid pose or the sensor reports a deadzone. Transient failures are
//! retried without limit, pausing for the poll interval between attempts;
//! they are never surfaced to the caller. Every valid sample replaces the
//! cached last-valid pose. A deadzone leaves the cache untouched and is
//! returned as-is: recovering from it is the caller's job.

use std::time::Duration;

use log::{trace, warn};

use super::devices::{Pose, PositionSensor, Reading};
use crate::time::Clock;

/// Result of one acquisition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acquired {
    /// A confirmed-valid pose. The cache has been updated.
    Valid(Pose),
    /// The robot is outside sensor coverage.
    Deadzone,
}

/// Wraps a [`PositionSensor`] with retrying and last-valid caching.
pub struct PositionGuard<S> {
    sensor:     S,
    poll:       Duration,
    last_valid: Option<Pose>,
    retries:    u64,
}

impl<S: PositionSensor> PositionGuard<S> {
    /// Creates a guard that waits `poll` between transient retries.
    pub fn new(sensor: S, poll: Duration) -> Self {
        Self {
            sensor,
            poll,
            last_valid: None,
            retries: 0,
        }
    }

    /// Samples until the reading is valid or a deadzone.
    pub fn acquire<C: Clock + ?Sized>(&mut self, clock: &mut C) -> Acquired {
        loop {
            match self.sensor.sample() {
                Reading::Valid(pose) => {
                    self.last_valid = Some(pose);
                    return Acquired::Valid(pose);
                }
                Reading::Deadzone => {
                    warn!("Position sensor reports deadzone");
                    return Acquired::Deadzone;
                }
                Reading::NotReady => {
                    self.retries += 1;
                    trace!("Position not ready, retrying ({} retries so far)", self.retries);
                    clock.sleep(self.poll);
                }
            }
        }
    }

    /// The most recent valid pose, if any has been seen.
    pub fn last_valid(&self) -> Option<Pose> { self.last_valid }

    /// Total transient retries since creation or the last reset.
    pub fn retries(&self) -> u64 { self.retries }

    /// Forgets the cached pose and retry count.
    pub fn reset(&mut self) {
        self.last_valid = None;
        self.retries = 0;
    }

    /// Direct access to the sensor, bypassing the cache.
    pub fn sensor_mut(&mut self) -> &mut S { &mut self.sensor }

    /// Consumes the guard and returns the sensor.
    pub fn into_inner(self) -> S { self.sensor }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct Scripted(VecDeque<Reading>);

    impl PositionSensor for Scripted {
        fn sample(&mut self) -> Reading { self.0.pop_front().unwrap_or(Reading::NotReady) }
    }

    #[derive(Default)]
    struct CountingClock {
        slept: Vec<Duration>,
    }

    impl Clock for CountingClock {
        fn sleep(&mut self, duration: Duration) { self.slept.push(duration); }

        fn now(&self) -> Duration { self.slept.iter().sum() }
    }

    fn guard(readings: Vec<Reading>) -> PositionGuard<Scripted> {
        PositionGuard::new(Scripted(readings.into()), Duration::from_millis(10))
    }

    #[test]
    fn retries_until_valid() {
        let pose = Pose::new(3.0, 4.0, 10.0);
        let mut g = guard(vec![Reading::NotReady, Reading::NotReady, Reading::Valid(pose)]);
        let mut clock = CountingClock::default();

        assert_eq!(g.acquire(&mut clock), Acquired::Valid(pose));
        assert_eq!(clock.slept, vec![Duration::from_millis(10); 2]);
        assert_eq!(g.last_valid(), Some(pose));
        assert_eq!(g.retries(), 2);
    }

    #[test]
    fn deadzone_keeps_previous_cache() {
        let pose = Pose::new(8.0, 9.0, 180.0);
        let mut g = guard(vec![Reading::Valid(pose), Reading::NotReady, Reading::Deadzone]);
        let mut clock = CountingClock::default();

        assert_eq!(g.acquire(&mut clock), Acquired::Valid(pose));
        assert_eq!(g.acquire(&mut clock), Acquired::Deadzone);
        assert_eq!(g.last_valid(), Some(pose));
    }

    #[test]
    fn cache_tracks_latest_valid() {
        let first = Pose::new(1.0, 1.0, 0.0);
        let second = Pose::new(2.0, 2.0, 90.0);
        let mut g = guard(vec![Reading::Valid(first), Reading::Valid(second)]);
        let mut clock = CountingClock::default();

        g.acquire(&mut clock);
        g.acquire(&mut clock);
        assert_eq!(g.last_valid(), Some(second));
        assert!(clock.slept.is_empty());

        g.reset();
        assert_eq!(g.last_valid(), None);
    }
}
