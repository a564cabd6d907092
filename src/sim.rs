//! Differential-drive simulator.
//!
//! [`SimRobot`] keeps one shared world (`Rc<RefCell<..>>`) and hands out
//! separate handles implementing [`PositionSensor`], [`Drive`] and
//! [`Clock`], so a [`Navigator`] can be run against it exactly as it runs
//! against hardware. Time only advances when the navigator sleeps; the pose
//! is integrated from the last motor command during that sleep.
//!
//! The world also records every motor command and every sleep, counts
//! sensor samples, and can replay a script of readings before falling back
//! to the simulated pose.
//!
//! # Example
//!
//! ```
//! use beacon_nav::{
//!     motion::{config::NavConfig, position::Pose},
//!     sim::{SimConfig, SimRobot},
//! };
//!
//! let robot = SimRobot::new(SimConfig::default(), Pose::new(0.0, 0.0, 0.0));
//! let mut nav = robot.navigator(NavConfig::default()).unwrap();
//! let _ = nav.turn(90.0);
//! assert!(robot.commands().last().unwrap().is_stopped());
//! ```

use std::{cell::RefCell, collections::VecDeque, ops::RangeInclusive, rc::Rc, time::Duration};

use crate::{
    drivetrain::{Drive, MotorCommand},
    error::Result,
    motion::{
        config::NavConfig,
        navigator::Navigator,
        position::{Pose, PositionSensor, Reading, SensorOffset},
    },
    time::Clock,
};

/// Integration step.
const STEP: f64 = 0.001;

/// A navigator running against a [`SimRobot`].
pub type SimNavigator = Navigator<SimSensor, SimDrive, SimClock>;

/// An axis-aligned region without sensor coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadzoneRect {
    /// Covered x range.
    pub x: RangeInclusive<f64>,
    /// Covered y range.
    pub y: RangeInclusive<f64>,
}

impl DeadzoneRect {
    /// Returns true if `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool { self.x.contains(&x) && self.y.contains(&y) }
}

/// Physical parameters of the simulated robot.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Linear speed, in inches per second, per percent of mean wheel power.
    pub inches_per_sec_per_percent:  f64,
    /// Turn rate, in degrees per second, per percent of half the wheel difference.
    pub degrees_per_sec_per_percent: f64,
    /// Where the sensor is mounted relative to the centroid.
    pub sensor_offset:               SensorOffset,
    /// Regions in which the sensor reports a deadzone.
    pub deadzones:                   Vec<DeadzoneRect>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            inches_per_sec_per_percent:  0.5,
            degrees_per_sec_per_percent: 1.5,
            sensor_offset:               SensorOffset::default(),
            deadzones:                   Vec::new(),
        }
    }
}

impl SimConfig {
    /// A robot whose wheels do nothing. Only scripted readings change.
    pub fn frozen(mut self) -> Self {
        self.inches_per_sec_per_percent = 0.0;
        self.degrees_per_sec_per_percent = 0.0;
        self
    }

    /// Adds a deadzone rectangle.
    pub fn with_deadzone(mut self, x: RangeInclusive<f64>, y: RangeInclusive<f64>) -> Self {
        self.deadzones.push(DeadzoneRect { x, y });
        self
    }

    /// Sets the sensor mount offset.
    pub fn with_sensor_offset(mut self, offset: SensorOffset) -> Self {
        self.sensor_offset = offset;
        self
    }

    /// Seconds per degree when spinning in place at `power_percent`.
    ///
    /// Feed this to [`NavConfig::with_seconds_per_degree`] so blind turns
    /// match the simulated robot.
    pub fn seconds_per_degree(&self, power_percent: f64) -> f64 {
        1.0 / (power_percent * self.degrees_per_sec_per_percent)
    }
}

struct SimWorld {
    config:   SimConfig,
    pose:     Pose,
    command:  MotorCommand,
    elapsed:  Duration,
    script:   VecDeque<Reading>,
    commands: Vec<MotorCommand>,
    sleeps:   Vec<Duration>,
    samples:  usize,
}

impl SimWorld {
    fn sensor_pose(&self) -> Pose {
        let (sin, cos) = self.pose.heading.to_radians().sin_cos();
        let offset = self.config.sensor_offset;
        Pose::new(
            self.pose.x + offset.forward * cos - offset.left * sin,
            self.pose.y + offset.forward * sin + offset.left * cos,
            self.pose.heading,
        )
    }

    fn sample(&mut self) -> Reading {
        self.samples += 1;
        if let Some(reading) = self.script.pop_front() {
            return reading;
        }
        let sensor = self.sensor_pose();
        if self.config.deadzones.iter().any(|z| z.contains(sensor.x, sensor.y)) {
            Reading::Deadzone
        } else {
            Reading::Valid(sensor)
        }
    }

    fn advance(&mut self, duration: Duration) {
        let total = duration.as_secs_f64();
        let steps = (total / STEP).floor();
        for _ in 0..steps as u64 {
            self.integrate(STEP);
        }
        let remainder = total - steps * STEP;
        if remainder > 0.0 {
            self.integrate(remainder);
        }
        self.elapsed += duration;
    }

    fn integrate(&mut self, dt: f64) {
        let MotorCommand { left, right } = self.command;
        let speed = (left + right) / 2.0 * self.config.inches_per_sec_per_percent;
        let rate = (right - left) / 2.0 * self.config.degrees_per_sec_per_percent;

        let heading = self.pose.heading + rate * dt;
        let (sin, cos) = heading.to_radians().sin_cos();
        self.pose = Pose::new(
            self.pose.x + speed * cos * dt,
            self.pose.y + speed * sin * dt,
            heading,
        );
    }
}

/// A simulated robot. Cloning shares the same world.
#[derive(Clone)]
pub struct SimRobot {
    world: Rc<RefCell<SimWorld>>,
}

impl SimRobot {
    /// Creates a stationary robot with its centroid at `pose`.
    pub fn new(config: SimConfig, pose: Pose) -> Self {
        Self {
            world: Rc::new(RefCell::new(SimWorld {
                config,
                pose,
                command: MotorCommand::STOP,
                elapsed: Duration::ZERO,
                script: VecDeque::new(),
                commands: Vec::new(),
                sleeps: Vec::new(),
                samples: 0,
            })),
        }
    }

    /// A sensor handle.
    pub fn sensor(&self) -> SimSensor {
        SimSensor {
            world: Rc::clone(&self.world),
        }
    }

    /// A drive handle.
    pub fn drive(&self) -> SimDrive {
        SimDrive {
            world: Rc::clone(&self.world),
        }
    }

    /// A clock handle.
    pub fn clock(&self) -> SimClock {
        SimClock {
            world: Rc::clone(&self.world),
        }
    }

    /// Builds a navigator wired to this robot.
    pub fn navigator(&self, config: NavConfig) -> Result<SimNavigator> {
        Navigator::new(self.sensor(), self.drive(), self.clock(), config)
    }

    /// Queues readings returned before any simulated ones.
    pub fn script(&self, readings: impl IntoIterator<Item = Reading>) {
        self.world.borrow_mut().script.extend(readings);
    }

    /// Moves the robot centroid without simulating the motion.
    pub fn teleport(&self, pose: Pose) { self.world.borrow_mut().pose = pose; }

    /// The simulated centroid pose.
    pub fn true_pose(&self) -> Pose { self.world.borrow().pose }

    /// The physical parameters.
    pub fn config(&self) -> SimConfig { self.world.borrow().config.clone() }

    /// Every command issued so far, stops included.
    pub fn commands(&self) -> Vec<MotorCommand> { self.world.borrow().commands.clone() }

    /// Every sleep issued so far.
    pub fn sleeps(&self) -> Vec<Duration> { self.world.borrow().sleeps.clone() }

    /// Number of sensor samples taken.
    pub fn samples(&self) -> usize { self.world.borrow().samples }

    /// Simulated time elapsed.
    pub fn elapsed(&self) -> Duration { self.world.borrow().elapsed }
}

/// Sensor handle of a [`SimRobot`].
pub struct SimSensor {
    world: Rc<RefCell<SimWorld>>,
}

impl PositionSensor for SimSensor {
    fn sample(&mut self) -> Reading { self.world.borrow_mut().sample() }
}

/// Drive handle of a [`SimRobot`].
pub struct SimDrive {
    world: Rc<RefCell<SimWorld>>,
}

impl Drive for SimDrive {
    fn set_percent(&mut self, command: MotorCommand) {
        let mut world = self.world.borrow_mut();
        world.command = command;
        world.commands.push(command);
    }
}

/// Clock handle of a [`SimRobot`].
pub struct SimClock {
    world: Rc<RefCell<SimWorld>>,
}

impl Clock for SimClock {
    fn sleep(&mut self, duration: Duration) {
        let mut world = self.world.borrow_mut();
        world.sleeps.push(duration);
        world.advance(duration);
    }

    fn now(&self) -> Duration { self.world.borrow().elapsed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drives_straight_along_heading() {
        let robot = SimRobot::new(SimConfig::default(), Pose::new(0.0, 0.0, 90.0));
        robot.drive().set_percent(MotorCommand::new(20.0, 20.0));
        robot.clock().sleep(Duration::from_secs(1));

        let pose = robot.true_pose();
        assert!(pose.x.abs() < 1e-6);
        assert!((pose.y - 10.0).abs() < 1e-6);
        assert_eq!(robot.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn spins_counter_clockwise_for_left_turn() {
        let robot = SimRobot::new(SimConfig::default(), Pose::new(5.0, 5.0, 0.0));
        robot.drive().set_percent(MotorCommand::new(-40.0, 40.0));
        robot.clock().sleep(Duration::from_millis(500));

        let pose = robot.true_pose();
        assert!((pose.heading - 30.0).abs() < 1e-6);
        assert!((pose.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn script_then_deadzone_then_valid() {
        let config = SimConfig::default().with_deadzone(0.0..=10.0, 0.0..=10.0);
        let robot = SimRobot::new(config, Pose::new(5.0, 5.0, 0.0));
        robot.script([Reading::NotReady]);
        let mut sensor = robot.sensor();

        assert_eq!(sensor.sample(), Reading::NotReady);
        assert_eq!(sensor.sample(), Reading::Deadzone);
        robot.teleport(Pose::new(20.0, 5.0, 0.0));
        assert!(sensor.sample().is_valid());
        assert_eq!(robot.samples(), 3);
    }

    #[test]
    fn sensor_reports_mount_position() {
        let config = SimConfig::default().with_sensor_offset(SensorOffset::new(2.0, 1.0));
        let robot = SimRobot::new(config, Pose::new(0.0, 0.0, 90.0));

        match robot.sensor().sample() {
            Reading::Valid(pose) => {
                assert!((pose.x + 1.0).abs() < 1e-9);
                assert!((pose.y - 2.0).abs() < 1e-9);
                let centroid = pose.centroid(SensorOffset::new(2.0, 1.0));
                assert!(centroid.x.abs() < 1e-9 && centroid.y.abs() < 1e-9);
            }
            other => panic!("unexpected reading {:?}", other),
        }
    }

    #[test]
    fn frozen_robot_stays_put() {
        let robot = SimRobot::new(SimConfig::default().frozen(), Pose::new(1.0, 2.0, 3.0));
        robot.drive().set_percent(MotorCommand::new(100.0, -100.0));
        robot.clock().sleep(Duration::from_secs(2));
        assert_eq!(robot.true_pose(), Pose::new(1.0, 2.0, 3.0));
        assert_eq!(robot.commands().len(), 1);
    }
}
