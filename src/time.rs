//! Blocking time source used for loop pacing and dead-reckoned turns.
//!
//! Every suspension point in the navigation core is a fixed-duration sleep
//! issued through [`Clock`]. On the robot [`VexClock`] waits on the vexide
//! runtime and reads the user program uptime; on a host [`SystemClock`]
//! sleeps the thread. In tests the [`sim`](crate::sim) clock advances
//! simulated time instead.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//!
//! use beacon_nav::time::{Clock, VexClock};
//!
//! let mut clock = VexClock::new();
//! clock.sleep(Duration::from_millis(10));
//! log::info!("uptime {:?}", clock.now());
//! ```

use std::time::Duration;
#[cfg(not(target_os = "vexos"))]
use std::time::Instant;

/// A blocking delay primitive plus an uptime reading.
pub trait Clock {
    /// Blocks for `duration`.
    fn sleep(&mut self, duration: Duration);

    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;
}

#[cfg(target_os = "vexos")]
pub use self::vex::VexClock;

#[cfg(target_os = "vexos")]
mod vex {
    use std::time::Duration;

    use vexide::{
        runtime::block_on,
        time::{sleep, user_uptime},
    };

    use super::Clock;

    /// Clock backed by the vexide runtime.
    ///
    /// Sleeping drives vexide's executor until the delay elapses, so tasks
    /// spawned next to the navigator keep running. [`Clock::now`] is the
    /// user program uptime, the same time base the logger stamps lines with.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct VexClock;

    impl VexClock {
        /// Creates the clock.
        pub const fn new() -> Self { Self }
    }

    impl Clock for VexClock {
        fn sleep(&mut self, duration: Duration) { block_on(sleep(duration)); }

        fn now(&self) -> Duration { user_uptime() }
    }
}

/// Host clock backed by `std::thread::sleep`.
#[cfg(not(target_os = "vexos"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

#[cfg(not(target_os = "vexos"))]
impl SystemClock {
    /// Creates a clock whose uptime starts now.
    pub fn new() -> Self { Self { start: Instant::now() } }
}

#[cfg(not(target_os = "vexos"))]
impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

#[cfg(not(target_os = "vexos"))]
impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) { std::thread::sleep(duration); }

    fn now(&self) -> Duration { self.start.elapsed() }
}

/// Converts fractional seconds to a `Duration`, clamping negatives and NaN to zero.
pub fn secs(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds)
    } else {
        Duration::ZERO
    }
}
