//! Point controller.
//!
//! [`Navigator::go_to_point`] drives the robot centroid to a target
//! coordinate. It turns toward the target once, then runs a convergence loop
//! that corrects heading while driving:
//!
//! - Heading error up to [`CORRECTION_THRESHOLD`] is ignored and the robot
//!   drives straight.
//! - Above it, the wheel on the inside of the turn is slowed to 0.5x (error
//!   under [`LARGE_CORRECTION`]) or 0.3x of the other wheel.
//! - At [`REALIGN_THRESHOLD`] or more, the robot stops and re-runs the
//!   heading controller.
//!
//! Reversing drives backwards with the rear of the robot facing the target.
//! A time limit of `T` seconds caps the loop at `T * 10` iterations; this is
//! an iteration count, not a wall-clock measurement.
//!
//! # Example
//!
//! ```ignore
//! use beacon_nav::motion::goto::{PrecisionMode, TargetSpec};
//!
//! let outcome = nav.go_to_point(
//!     &TargetSpec::new(24.0, 36.0)
//!         .final_heading(90.0)
//!         .precision(PrecisionMode::Fine),
//! );
//! ```

use log::{debug, info};

use crate::{
    drivetrain::Drive,
    motion::{
        geo::{Point, TurnDirection, angular_distance, opposite_heading, turn_direction},
        navigator::{Navigator, Outcome},
        position::{Pose, PositionSensor},
    },
    time::Clock,
};

/// Heading error, in degrees, above which a cycle corrects instead of driving straight.
pub const CORRECTION_THRESHOLD: f64 = 3.0;

/// Heading error from which the inside wheel is slowed harder.
pub const LARGE_CORRECTION: f64 = 15.0;

/// Heading error from which the robot stops and re-runs the heading controller.
pub const REALIGN_THRESHOLD: f64 = 30.0;

/// Distance inside which straight cycles use the gentler approach power.
pub const APPROACH_DISTANCE: f64 = 4.0;

/// Straight-cycle power when the run is time-boxed.
pub const TIMED_POWER: f64 = 0.2;

/// Convergence iterations per second of time limit.
pub const ITERATIONS_PER_SECOND: f64 = 10.0;

/// Trade-off between final precision and speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecisionMode {
    /// Slow, tight tolerance.
    Fine = 0,
    /// Medium speed and tolerance.
    #[default]
    Normal = 1,
    /// Fast, loose tolerance.
    Coarse = 2,
}

impl PrecisionMode {
    fn level(self) -> f64 { self as u8 as f64 }

    /// Distance at which the target counts as reached.
    pub fn tolerance(self) -> f64 { 0.75 + 0.25 * self.level() }

    /// Full straight-line power, as a fraction.
    pub fn base_power(self) -> f64 { 0.2 + 0.1 * self.level() }

    /// Straight-line power within [`APPROACH_DISTANCE`] of the target.
    pub fn approach_power(self) -> f64 { 0.2 + 0.05 * self.level() }
}

/// A point controller request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSpec {
    /// Target x.
    pub x:             f64,
    /// Target y.
    pub y:             f64,
    /// Heading to turn to once the point is reached.
    pub final_heading: Option<f64>,
    /// Drive backwards to the target.
    pub reverse:       bool,
    /// Iteration budget in seconds (`ITERATIONS_PER_SECOND` iterations each).
    pub time_limit:    Option<f64>,
    /// Precision/speed trade-off.
    pub precision:     PrecisionMode,
}

impl TargetSpec {
    /// The no-op target. Passing it returns immediately.
    pub const SKIP: TargetSpec = TargetSpec {
        x:             -1.0,
        y:             -1.0,
        final_heading: None,
        reverse:       false,
        time_limit:    None,
        precision:     PrecisionMode::Normal,
    };

    /// A forward, untimed, normal-precision target.
    pub fn new(x: f64, y: f64) -> Self { Self { x, y, ..Self::SKIP } }

    /// Turn to `heading` after arriving.
    pub fn final_heading(mut self, heading: f64) -> Self {
        self.final_heading = Some(heading);
        self
    }

    /// Drive there backwards.
    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Give up after `seconds * 10` convergence iterations.
    pub fn time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Sets the precision mode.
    pub fn precision(mut self, precision: PrecisionMode) -> Self {
        self.precision = precision;
        self
    }

    /// True for the `(-1, -1)` no-op target.
    pub fn is_skip(&self) -> bool { self.x == -1.0 && self.y == -1.0 }

    /// The target point.
    pub fn point(&self) -> Point { Point::new(self.x, self.y) }

    /// Maximum convergence iterations, if time-boxed.
    pub fn max_iterations(&self) -> Option<u32> {
        self.time_limit
            .map(|t| (t * ITERATIONS_PER_SECOND).floor().max(0.0) as u32)
    }
}

/// `(left, right)` wheel scales for a correction cycle.
///
/// The wheel on the inside of the turn runs at `0.5` (or `0.3` for large
/// errors) of the outside wheel. Reversing negates both wheels and swaps
/// which one is slowed.
pub fn correction_scales(direction: TurnDirection, reverse: bool, large: bool) -> (f64, f64) {
    let slow = if large { 0.3 } else { 0.5 };
    match (reverse, direction) {
        (false, TurnDirection::Left) => (slow, 1.0),
        (false, TurnDirection::Right) => (1.0, slow),
        (true, TurnDirection::Left) => (-1.0, -slow),
        (true, TurnDirection::Right) => (-slow, -1.0),
    }
}

impl<S, D, C> Navigator<S, D, C>
where
    S: PositionSensor,
    D: Drive,
    C: Clock,
{
    /// Drives the robot centroid to within the precision tolerance of `target`.
    ///
    /// Returns [`Outcome::Skipped`] for [`TargetSpec::SKIP`] without touching
    /// the sensor or the drive, and [`Outcome::TimedOut`] when the iteration
    /// budget runs out. A robot already within tolerance does not move,
    /// except for the optional final turn.
    pub fn go_to_point(&mut self, target: &TargetSpec) -> Outcome {
        if target.is_skip() {
            info!("go_to_point: skip target, nothing to do");
            return Outcome::Skipped;
        }
        info!(
            "go_to_point: target ({:.2}, {:.2}), final heading {:?}, reverse {}, time limit {:?}, {:?}",
            target.x, target.y, target.final_heading, target.reverse, target.time_limit, target.precision
        );

        let Some(mut pose) = self.acquire() else {
            return Outcome::Deadzone;
        };
        let goal = target.point();
        let tolerance = target.precision.tolerance();
        let mut timed_out = false;
        let mut iterations = 0u32;

        if self.centroid(&pose).distance_to(goal) > tolerance {
            let heading = self.desired_heading(&pose, target);
            if self.turn(heading) == Outcome::Deadzone {
                return Outcome::Deadzone;
            }
            pose = match self.acquire() {
                Some(p) => p,
                None => return Outcome::Deadzone,
            };

            let mut power = target.precision.base_power();
            let max_iterations = target.max_iterations();

            while self.centroid(&pose).distance_to(goal) > tolerance {
                if let Some(max) = max_iterations {
                    iterations += 1;
                    if iterations > max {
                        timed_out = true;
                        break;
                    }
                }

                let distance = self.centroid(&pose).distance_to(goal);
                let desired = self.desired_heading(&pose, target);
                let error = angular_distance(pose.heading, desired);
                debug!(
                    "go_to_point: at ({:.2}, {:.2}) heading {:.2}, distance {:.2}, desired {:.2}, error {:.2}",
                    pose.x, pose.y, pose.heading, distance, desired, error
                );

                if error > CORRECTION_THRESHOLD {
                    if error >= REALIGN_THRESHOLD {
                        debug!("go_to_point: error {:.2} too large, realigning", error);
                        self.stop();
                        if self.turn(desired) == Outcome::Deadzone {
                            return Outcome::Deadzone;
                        }
                    } else {
                        let (left, right) = correction_scales(
                            turn_direction(pose.heading, desired),
                            target.reverse,
                            error >= LARGE_CORRECTION,
                        );
                        self.command(left * power, right * power);
                    }
                } else {
                    power = if target.time_limit.is_some() {
                        TIMED_POWER
                    } else if distance > APPROACH_DISTANCE {
                        target.precision.base_power()
                    } else {
                        target.precision.approach_power()
                    };
                    let signed = if target.reverse { -power } else { power };
                    self.command(signed, signed);
                }

                self.clock.sleep(self.config.goto_cycle);
                pose = match self.acquire() {
                    Some(p) => p,
                    None => return Outcome::Deadzone,
                };
            }
            self.stop();
        }

        if let Some(heading) = target.final_heading {
            if self.turn(heading) == Outcome::Deadzone {
                return Outcome::Deadzone;
            }
            if let Some(p) = self.current_pose() {
                pose = p;
            }
        }

        let centroid = self.centroid(&pose);
        info!(
            "go_to_point done: intended ({:.2}, {:.2}), actual ({:.2}, {:.2}), heading {:.2}, {} timed iterations{}",
            target.x,
            target.y,
            centroid.x,
            centroid.y,
            pose.heading,
            iterations,
            if timed_out { ", timed out" } else { "" }
        );
        if timed_out {
            Outcome::TimedOut
        } else {
            Outcome::Completed
        }
    }

    /// Bearing from the centroid to the target, flipped when reversing.
    fn desired_heading(&self, pose: &Pose, target: &TargetSpec) -> f64 {
        let bearing = self.centroid(pose).bearing_to(target.point());
        if target.reverse {
            opposite_heading(bearing)
        } else {
            bearing
        }
    }
}
