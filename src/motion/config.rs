//! Navigation configuration.
//!
//! [`NavConfig`] carries the calibration values of a particular robot and
//! the pacing of every control loop. Thresholds that define the control
//! policy itself (heading tolerances, correction tiers, power tiers) live as
//! constants next to the controllers that use them.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use beacon_nav::motion::config::NavConfig;
//!
//! let config = NavConfig::default()
//!     .with_trims(96.0, 100.0)
//!     .with_seconds_per_degree(0.005)
//!     .with_goto_cycle(Duration::from_millis(20));
//! assert!(config.validate().is_ok());
//! ```

use std::{ops::RangeInclusive, time::Duration};

use crate::{
    error::{NavError, Result},
    motion::position::SensorOffset,
};

/// Calibration and pacing for a [`Navigator`](super::navigator::Navigator).
#[derive(Debug, Clone, PartialEq)]
pub struct NavConfig {
    /// Left motor trim, `(0, 100]`. Every left power fraction is scaled by it.
    pub left_trim_percent:        f64,
    /// Right motor trim, `(0, 100]`.
    pub right_trim_percent:       f64,
    /// Dead-reckoned seconds per degree when turning at blind-turn power.
    pub seconds_per_degree:       f64,
    /// Sensor mount position relative to the robot centroid.
    pub sensor_offset:            SensorOffset,
    /// Range of x where the direct escape route is blocked.
    pub obstacle_band:            RangeInclusive<f64>,
    /// Heading driven along to leave a deadzone.
    pub primary_escape_heading:   f64,
    /// Heading used to clear the obstacle band before escaping.
    pub alternate_escape_heading: f64,
    /// Pause between transient sensor retries.
    pub acquire_poll:             Duration,
    /// Heading controller loop period.
    pub turn_cycle:               Duration,
    /// Point controller loop period.
    pub goto_cycle:               Duration,
    /// Sensor poll period while driving out of a deadzone.
    pub recovery_poll:            Duration,
    /// Extra drive time after coverage returns.
    pub recovery_settle:          Duration,
    /// Length of the leg driven along the alternate escape heading.
    pub alternate_leg:            Duration,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            left_trim_percent:        100.0,
            right_trim_percent:       100.0,
            seconds_per_degree:       0.0045,
            sensor_offset:            SensorOffset::default(),
            obstacle_band:            7.0..=24.0,
            primary_escape_heading:   270.0,
            alternate_escape_heading: 0.0,
            acquire_poll:             Duration::from_millis(10),
            turn_cycle:               Duration::from_millis(10),
            goto_cycle:               Duration::from_millis(25),
            recovery_poll:            Duration::from_millis(10),
            recovery_settle:          Duration::from_millis(500),
            alternate_leg:            Duration::from_millis(500),
        }
    }
}

impl NavConfig {
    /// Sets both motor trims.
    pub fn with_trims(mut self, left: f64, right: f64) -> Self {
        self.left_trim_percent = left;
        self.right_trim_percent = right;
        self
    }

    /// Sets the dead-reckoned turn rate.
    pub fn with_seconds_per_degree(mut self, seconds_per_degree: f64) -> Self {
        self.seconds_per_degree = seconds_per_degree;
        self
    }

    /// Sets the sensor mount offset.
    pub fn with_sensor_offset(mut self, offset: SensorOffset) -> Self {
        self.sensor_offset = offset;
        self
    }

    /// Sets the obstacle band used to pick an escape route.
    pub fn with_obstacle_band(mut self, band: RangeInclusive<f64>) -> Self {
        self.obstacle_band = band;
        self
    }

    /// Sets the primary and alternate escape headings.
    pub fn with_escape_headings(mut self, primary: f64, alternate: f64) -> Self {
        self.primary_escape_heading = primary;
        self.alternate_escape_heading = alternate;
        self
    }

    /// Sets the transient retry pause.
    pub fn with_acquire_poll(mut self, poll: Duration) -> Self {
        self.acquire_poll = poll;
        self
    }

    /// Sets the heading controller period.
    pub fn with_turn_cycle(mut self, cycle: Duration) -> Self {
        self.turn_cycle = cycle;
        self
    }

    /// Sets the point controller period.
    pub fn with_goto_cycle(mut self, cycle: Duration) -> Self {
        self.goto_cycle = cycle;
        self
    }

    /// Sets the recovery poll period, settle time and alternate leg length.
    pub fn with_recovery_timing(mut self, poll: Duration, settle: Duration, leg: Duration) -> Self {
        self.recovery_poll = poll;
        self.recovery_settle = settle;
        self.alternate_leg = leg;
        self
    }

    /// Checks the configuration for values no robot could use.
    pub fn validate(&self) -> Result<()> {
        for (name, trim) in [
            ("left_trim_percent", self.left_trim_percent),
            ("right_trim_percent", self.right_trim_percent),
        ] {
            if !(trim > 0.0 && trim <= 100.0) {
                return Err(NavError::InvalidConfig(format!(
                    "{} must be in (0, 100], got {}",
                    name, trim
                )));
            }
        }
        if !self.seconds_per_degree.is_finite() || self.seconds_per_degree < 0.0 {
            return Err(NavError::InvalidConfig(format!(
                "seconds_per_degree must be a non-negative number, got {}",
                self.seconds_per_degree
            )));
        }
        if self.obstacle_band.is_empty() {
            return Err(NavError::InvalidConfig(format!(
                "obstacle_band {:?} is empty",
                self.obstacle_band
            )));
        }
        for (name, heading) in [
            ("primary_escape_heading", self.primary_escape_heading),
            ("alternate_escape_heading", self.alternate_escape_heading),
        ] {
            if !heading.is_finite() {
                return Err(NavError::InvalidConfig(format!(
                    "{} must be finite, got {}",
                    name, heading
                )));
            }
        }
        if !self.sensor_offset.forward.is_finite() || !self.sensor_offset.left.is_finite() {
            return Err(NavError::InvalidConfig(format!(
                "sensor_offset must be finite, got {:?}",
                self.sensor_offset
            )));
        }
        Ok(())
    }

    /// Scales a `[-1, 1]` power fraction pair into trimmed wheel percentages.
    pub(crate) fn trimmed(&self, left: f64, right: f64) -> (f64, f64) {
        (left * self.left_trim_percent, right * self.right_trim_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = NavConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.goto_cycle, Duration::from_millis(25));
        assert_eq!(config.obstacle_band, 7.0..=24.0);
    }

    #[test]
    fn rejects_bad_trims() {
        assert!(NavConfig::default().with_trims(0.0, 100.0).validate().is_err());
        assert!(NavConfig::default().with_trims(100.0, 120.0).validate().is_err());
        assert!(NavConfig::default().with_trims(f64::NAN, 90.0).validate().is_err());
        assert!(NavConfig::default().with_trims(50.0, 100.0).validate().is_ok());
    }

    #[test]
    fn rejects_negative_rate_and_empty_band() {
        assert!(NavConfig::default().with_seconds_per_degree(-0.1).validate().is_err());
        let err = NavConfig::default()
            .with_obstacle_band(24.0..=7.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("obstacle_band"));
    }

    #[test]
    fn trims_scale_fractions() {
        let config = NavConfig::default().with_trims(90.0, 80.0);
        let (l, r) = config.trimmed(0.5, -0.25);
        assert!((l - 45.0).abs() < 1e-9);
        assert!((r + 20.0).abs() < 1e-9);
    }
}
