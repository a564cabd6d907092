//! Heading controller and fine alignment.
//!
//! [`Navigator::turn`] rotates in place until the heading is within
//! [`TURN_TOLERANCE`] of the target. The tolerance is wide because the point
//! controller, which usually calls it, keeps correcting heading while it
//! drives. Power is picked from a tier table by remaining error:
//!
//! | direction | error       | left, right   |
//! |-----------|-------------|---------------|
//! | left      | > 50        | -0.4, +0.5    |
//! | left      | > 25        | -0.4, +0.4    |
//! | left      | <= 25       | -0.2, +0.2    |
//! | right     | > 40        | +0.425, -0.425|
//! | right     | <= 40       | +0.2, -0.2    |
//!
//! The largest left tier is asymmetric and the right side has one tier
//! fewer than the left. Both are calibration, keep them.
//!
//! The fine-alignment controllers pulse both wheels briefly, stop, and wait
//! for the robot and sensor to settle before reading again. Continuous
//! correction overshoots at these tolerances.

use std::time::Duration;

use log::{debug, info};

use crate::{
    drivetrain::Drive,
    motion::{
        geo::{Point, TurnDirection, angular_distance, turn_direction},
        navigator::{Navigator, Outcome},
        position::PositionSensor,
    },
    time::Clock,
};

/// Heading controller terminal tolerance, in degrees.
pub const TURN_TOLERANCE: f64 = 8.0;

/// `(error above, left, right)` power tiers for left turns.
const LEFT_TIERS: [(f64, f64, f64); 3] = [(50.0, -0.4, 0.5), (25.0, -0.4, 0.4), (0.0, -0.2, 0.2)];

/// `(error above, left, right)` power tiers for right turns.
const RIGHT_TIERS: [(f64, f64, f64); 2] = [(40.0, 0.425, -0.425), (0.0, 0.2, -0.2)];

/// Power used for fine-alignment pulses.
pub const PULSE_POWER: f64 = 0.2;

/// Wait after each fine-alignment pulse.
pub const PULSE_SETTLE: Duration = Duration::from_millis(340);

/// Fine alignment tolerance and pulse length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FineAlign {
    /// Acceptable final error, in degrees.
    pub tolerance: f64,
    /// Length of one pulse.
    pub pulse:     Duration,
}

impl FineAlign {
    /// 5 degree tolerance, 150 ms pulses.
    pub const KINDA_CLOSE: FineAlign = FineAlign {
        tolerance: 5.0,
        pulse:     Duration::from_millis(150),
    };

    /// 1.5 degree tolerance, 75 ms pulses.
    pub const REALLY_CLOSE: FineAlign = FineAlign {
        tolerance: 1.5,
        pulse:     Duration::from_millis(75),
    };
}

/// Left and right power fractions for a heading-controller iteration.
pub fn turn_power(direction: TurnDirection, error: f64) -> (f64, f64) {
    let tiers: &[(f64, f64, f64)] = match direction {
        TurnDirection::Left => &LEFT_TIERS,
        TurnDirection::Right => &RIGHT_TIERS,
    };
    tiers
        .iter()
        .find(|(above, ..)| error > *above)
        .or(tiers.last())
        .map(|&(_, left, right)| (left, right))
        .unwrap_or((0.0, 0.0))
}

impl<S, D, C> Navigator<S, D, C>
where
    S: PositionSensor,
    D: Drive,
    C: Clock,
{
    /// Rotates in place to within [`TURN_TOLERANCE`] of `target` and stops.
    pub fn turn(&mut self, target: f64) -> Outcome {
        info!("turn: target heading {:.2}", target);
        let Some(mut pose) = self.acquire() else {
            return Outcome::Deadzone;
        };
        let start = pose.heading;
        let mut iterations = 0u32;

        while angular_distance(pose.heading, target) > TURN_TOLERANCE {
            let error = angular_distance(pose.heading, target);
            let direction = turn_direction(pose.heading, target);
            let (left, right) = turn_power(direction, error);
            debug!(
                "turn: heading {:.2}, error {:.2}, {:?}, power ({:.3}, {:.3})",
                pose.heading, error, direction, left, right
            );
            self.command(left, right);
            self.show(&[
                format!("Current  {:.1}", pose.heading),
                format!("Intended {:.1}", target),
            ]);

            self.clock.sleep(self.config.turn_cycle);
            iterations += 1;
            pose = match self.acquire() {
                Some(p) => p,
                None => return Outcome::Deadzone,
            };
        }
        self.stop();

        info!(
            "turn done: started {:.2}, intended {:.2}, actual {:.2}, {} iterations",
            start, target, pose.heading, iterations
        );
        Outcome::Completed
    }

    /// Turns to face the point `(x, y)`.
    ///
    /// The bearing is taken from the robot centroid at the time of the call.
    pub fn turn_to_point(&mut self, x: f64, y: f64) -> Outcome {
        let Some(pose) = self.acquire() else {
            return Outcome::Deadzone;
        };
        let bearing = self.centroid(&pose).bearing_to(Point::new(x, y));
        info!("turn_to_point: ({:.2}, {:.2}) is at bearing {:.2}", x, y, bearing);
        self.turn(bearing)
    }

    /// Fine alignment to within 5 degrees of `target`.
    pub fn turn_when_kinda_close(&mut self, target: f64) -> Outcome {
        self.fine_align(target, FineAlign::KINDA_CLOSE)
    }

    /// Fine alignment to within 1.5 degrees of `target`.
    pub fn turn_when_really_close(&mut self, target: f64) -> Outcome {
        self.fine_align(target, FineAlign::REALLY_CLOSE)
    }

    /// Pulse-and-settle until the heading is within `align.tolerance`.
    pub fn fine_align(&mut self, target: f64, align: FineAlign) -> Outcome {
        info!(
            "fine_align: target {:.2}, tolerance {:.2}, pulse {:?}",
            target, align.tolerance, align.pulse
        );
        let mut pulses = 0u32;
        let pose = loop {
            let Some(pose) = self.acquire() else {
                return Outcome::Deadzone;
            };
            if angular_distance(pose.heading, target) <= align.tolerance {
                break pose;
            }

            let (left, right) = match turn_direction(pose.heading, target) {
                TurnDirection::Left => (-PULSE_POWER, PULSE_POWER),
                TurnDirection::Right => (PULSE_POWER, -PULSE_POWER),
            };
            debug!("fine_align: heading {:.2}, pulse ({:.2}, {:.2})", pose.heading, left, right);
            self.command(left, right);
            self.clock.sleep(align.pulse);
            self.stop();
            self.clock.sleep(PULSE_SETTLE);
            pulses += 1;
        };

        info!(
            "fine_align done: intended {:.2}, actual {:.2}, {} pulses",
            target, pose.heading, pulses
        );
        Outcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{
        display::StatusDisplay,
        drivetrain::MotorCommand,
        motion::{config::NavConfig, position::{Pose, Reading}},
        sim::{SimConfig, SimRobot},
    };

    #[test]
    fn tiers_match_table() {
        assert_eq!(turn_power(TurnDirection::Left, 120.0), (-0.4, 0.5));
        assert_eq!(turn_power(TurnDirection::Left, 50.0), (-0.4, 0.4));
        assert_eq!(turn_power(TurnDirection::Left, 25.0), (-0.2, 0.2));
        assert_eq!(turn_power(TurnDirection::Left, 9.0), (-0.2, 0.2));
        assert_eq!(turn_power(TurnDirection::Right, 41.0), (0.425, -0.425));
        assert_eq!(turn_power(TurnDirection::Right, 40.0), (0.2, -0.2));
        assert_eq!(turn_power(TurnDirection::Right, 0.0), (0.2, -0.2));
    }

    #[test]
    fn turn_converges_and_stops() {
        let robot = SimRobot::new(SimConfig::default(), Pose::new(30.0, 30.0, 10.0));
        let mut nav = robot.navigator(NavConfig::default()).unwrap();

        assert_eq!(nav.turn(150.0), Outcome::Completed);

        let commands = robot.commands();
        assert_eq!(commands[0], MotorCommand::new(-40.0, 50.0));
        assert!(commands.last().unwrap().is_stopped());
        assert!(nav.motor_mirror().is_stopped());
        assert!(angular_distance(robot.true_pose().heading, 150.0) <= TURN_TOLERANCE + 1.0);
    }

    #[test]
    fn turn_right_uses_right_tiers() {
        let robot = SimRobot::new(SimConfig::default(), Pose::new(30.0, 30.0, 90.0));
        let mut nav = robot.navigator(NavConfig::default()).unwrap();

        assert_eq!(nav.turn(0.0), Outcome::Completed);
        assert_eq!(robot.commands()[0], MotorCommand::new(42.5, -42.5));
        assert!(robot.commands().contains(&MotorCommand::new(20.0, -20.0)));
    }

    #[test]
    fn turn_with_monotone_scripted_heading() {
        let robot = SimRobot::new(SimConfig::default().frozen(), Pose::new(0.0, 0.0, 100.0));
        let headings = [100.0, 80.0, 60.0, 40.0, 20.0, 5.0];
        robot.script(headings.iter().map(|&h| Reading::Valid(Pose::new(0.0, 0.0, h))));
        let mut nav = robot.navigator(NavConfig::default()).unwrap();

        assert_eq!(nav.turn(0.0), Outcome::Completed);
        assert_eq!(robot.samples(), headings.len());
        assert!(robot.commands().last().unwrap().is_stopped());
        assert_eq!(robot.commands().len(), headings.len());
    }

    #[test]
    fn turn_shows_current_and_intended_heading() {
        #[derive(Clone, Default)]
        struct Frames(Rc<RefCell<Vec<Vec<String>>>>);

        impl StatusDisplay for Frames {
            fn show(&mut self, lines: &[String]) { self.0.borrow_mut().push(lines.to_vec()); }
        }

        let frames = Frames::default();
        let robot = SimRobot::new(SimConfig::default(), Pose::new(0.0, 0.0, 0.0));
        let mut nav = robot
            .navigator(NavConfig::default())
            .unwrap()
            .with_display(frames.clone());

        assert_eq!(nav.turn(45.0), Outcome::Completed);

        let frames = frames.0.borrow();
        let turning = robot.commands().iter().filter(|c| !c.is_stopped()).count();
        assert_eq!(frames.len(), turning);
        assert_eq!(frames[0], vec!["Current  0.0".to_string(), "Intended 45.0".to_string()]);
    }

    #[test]
    fn turn_to_point_faces_the_point() {
        let robot = SimRobot::new(SimConfig::default(), Pose::new(0.0, 0.0, 0.0));
        let mut nav = robot.navigator(NavConfig::default()).unwrap();

        assert_eq!(nav.turn_to_point(0.0, 50.0), Outcome::Completed);
        assert!(angular_distance(robot.true_pose().heading, 90.0) <= TURN_TOLERANCE + 1.0);
    }

    #[test]
    fn turn_deadzone_aborts_after_one_recovery() {
        let robot = SimRobot::new(SimConfig::default(), Pose::new(40.0, 30.0, 270.0));
        robot.script([Reading::Valid(Pose::new(40.0, 30.0, 90.0)), Reading::Deadzone]);
        let mut nav = robot.navigator(NavConfig::default()).unwrap();

        assert_eq!(nav.turn(0.0), Outcome::Deadzone);
        assert_eq!(nav.state().recoveries, 1);
        assert!(nav.has_exhausted_deadzone());
    }

    #[test]
    fn really_close_reaches_tolerance() {
        let robot = SimRobot::new(SimConfig::default(), Pose::new(30.0, 30.0, 80.0));
        let mut nav = robot.navigator(NavConfig::default()).unwrap();

        assert_eq!(nav.turn_when_really_close(90.0), Outcome::Completed);
        assert!(angular_distance(robot.true_pose().heading, 90.0) <= 1.5);
        assert!(robot.sleeps().iter().filter(|d| **d == PULSE_SETTLE).count() < 20);
    }

    #[test]
    fn kinda_close_reaches_tolerance() {
        let robot = SimRobot::new(SimConfig::default(), Pose::new(30.0, 30.0, 350.0));
        let mut nav = robot.navigator(NavConfig::default()).unwrap();

        assert_eq!(nav.turn_when_kinda_close(15.0), Outcome::Completed);
        assert!(angular_distance(robot.true_pose().heading, 15.0) <= 5.0);
        assert!(robot.commands().last().unwrap().is_stopped());
    }

    #[test]
    fn fine_align_already_aligned_does_nothing() {
        let robot = SimRobot::new(SimConfig::default(), Pose::new(30.0, 30.0, 91.0));
        let mut nav = robot.navigator(NavConfig::default()).unwrap();

        assert_eq!(nav.turn_when_really_close(90.0), Outcome::Completed);
        assert!(robot.commands().is_empty());
    }

    #[test]
    fn fine_align_deadzone_recovers_once() {
        let robot = SimRobot::new(SimConfig::default().frozen(), Pose::new(0.0, 0.0, 80.0));
        robot.script([Reading::Valid(Pose::new(0.0, 0.0, 80.0)), Reading::Deadzone]);
        let mut nav = robot.navigator(NavConfig::default()).unwrap();

        assert_eq!(nav.turn_when_really_close(90.0), Outcome::Deadzone);
        assert_eq!(nav.state().recoveries, 1);
        assert!(nav.has_exhausted_deadzone());

        let commands = robot.commands();
        assert_eq!(commands[0], MotorCommand::new(-20.0, 20.0));
        assert!(commands[1].is_stopped());
        assert_eq!(commands.iter().filter(|c| **c == commands[0]).count(), 1);
        assert_eq!(&robot.sleeps()[..2], &[FineAlign::REALLY_CLOSE.pulse, PULSE_SETTLE]);
        assert_eq!(robot.samples(), 3);
        assert!(commands.last().unwrap().is_stopped());
    }
}
