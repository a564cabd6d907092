//! Deadzone recovery and dead-reckoned turning.
//!
//! When the position sensor reports that the robot is outside beacon
//! coverage, nothing closed-loop can run. Recovery drives the robot back
//! into coverage blind, using only the last valid pose:
//!
//! 1. If the cached x lies outside the obstacle band, blind-turn to the
//!    primary escape heading.
//! 2. Otherwise the direct route is blocked. Blind-turn to the alternate
//!    heading, drive a short leg, stop, and blind-turn from the alternate
//!    heading to the primary one. The robot's heading after the leg is
//!    assumed to be the alternate heading; errors of ~10 degrees are
//!    tolerated.
//! 3. Drive along the escape heading, polling the sensor, until it reports
//!    a valid reading. Keep driving for the settle time so the robot is well
//!    inside coverage, then stop.
//!
//! Blind turns rotate at a fixed power for a duration computed from the
//! calibrated seconds-per-degree rate.

use log::{info, warn};

use crate::{
    drivetrain::Drive,
    motion::{
        geo::{TurnDirection, angular_distance, turn_direction},
        navigator::Navigator,
        position::{Pose, PositionSensor},
    },
    time::{Clock, secs},
};

/// Rotation power for blind turns, as a fraction of full power.
pub const BLIND_TURN_POWER: f64 = 0.4;

/// Power for the leg along the alternate escape heading.
pub const ALTERNATE_LEG_POWER: f64 = 0.5;

/// Power while driving back into coverage.
pub const ESCAPE_POWER: f64 = 0.4;

impl<S, D, C> Navigator<S, D, C>
where
    S: PositionSensor,
    D: Drive,
    C: Clock,
{
    /// Drives blind until the sensor has coverage again.
    ///
    /// Sets the sticky deadzone flag. Blocks until the sensor reports a
    /// valid reading, then settles and stops.
    pub fn recover(&mut self) {
        self.exhausted_deadzone = true;
        self.recoveries += 1;

        let last = match self.guard.last_valid() {
            Some(pose) => pose,
            None => {
                warn!("Deadzone recovery without a valid pose, assuming the origin");
                Pose::origin()
            }
        };
        let centroid = self.centroid(&last);
        let primary = self.config.primary_escape_heading;
        let alternate = self.config.alternate_escape_heading;

        warn!(
            "Recovering from deadzone, last valid ({:.1}, {:.1}, {:.1})",
            centroid.x, centroid.y, last.heading
        );

        if self.config.obstacle_band.contains(&centroid.x) {
            info!("Escape route blocked, detouring via heading {:.1}", alternate);
            self.blind_turn(last.heading, alternate);
            self.command(ALTERNATE_LEG_POWER, ALTERNATE_LEG_POWER);
            self.clock.sleep(self.config.alternate_leg);
            self.stop();
            self.blind_turn(alternate, primary);
        } else {
            self.blind_turn(last.heading, primary);
        }

        self.command(ESCAPE_POWER, ESCAPE_POWER);
        let mut polls = 0u32;
        while !self.guard.sensor_mut().sample().is_valid() {
            polls += 1;
            self.clock.sleep(self.config.recovery_poll);
        }
        self.clock.sleep(self.config.recovery_settle);
        self.stop();

        info!(
            "Deadzone recovery #{} done after {} polls",
            self.recoveries, polls
        );
    }

    /// Rotates in place from `from` to `to` without sensor feedback.
    ///
    /// Turns the short way at [`BLIND_TURN_POWER`] for
    /// `angular_distance(from, to) * seconds_per_degree`, then stops.
    pub fn blind_turn(&mut self, from: f64, to: f64) {
        let distance = angular_distance(from, to);
        let direction = turn_direction(from, to);
        let duration = secs(distance * self.config.seconds_per_degree);
        info!(
            "Blind turn {:?} {:.1} degrees ({:.1} -> {:.1}) for {:?}",
            direction, distance, from, to, duration
        );

        let (left, right) = match direction {
            TurnDirection::Left => (-BLIND_TURN_POWER, BLIND_TURN_POWER),
            TurnDirection::Right => (BLIND_TURN_POWER, -BLIND_TURN_POWER),
        };
        self.command(left, right);
        self.clock.sleep(duration);
        self.stop();
    }
}
