//! Differential drivetrain actuation.
//!
//! The navigation core only ever talks to the wheels through the [`Drive`]
//! trait: a percentage for the left side, a percentage for the right side,
//! and a stop. Commands are fire-and-forget; a new command simply overwrites
//! the previous one.
//!
//! On the V5 brain, [`Differential`] maps percentages onto motor voltages
//! for a pair of motor groups.
//!
//! # Example
//!
//! ```ignore
//! use beacon_nav::drivetrain::Differential;
//! use vexide::prelude::*;
//!
//! let drivetrain = Differential::new(
//!     [
//!         Motor::new(peripherals.port_1, Gearset::Green, Direction::Forward),
//!         Motor::new(peripherals.port_2, Gearset::Green, Direction::Forward),
//!     ],
//!     [
//!         Motor::new(peripherals.port_3, Gearset::Green, Direction::Reverse),
//!         Motor::new(peripherals.port_4, Gearset::Green, Direction::Reverse),
//!     ],
//! );
//! ```

/// A pair of wheel percentages, each in `[-100, 100]`. Sign is direction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotorCommand {
    /// Left side percentage.
    pub left:  f64,
    /// Right side percentage.
    pub right: f64,
}

impl MotorCommand {
    /// Both sides stopped.
    pub const STOP: MotorCommand = MotorCommand {
        left:  0.0,
        right: 0.0,
    };

    /// Creates a command, clamping both sides to `[-100, 100]`.
    pub fn new(left: f64, right: f64) -> Self {
        Self {
            left:  clamp_percent(left),
            right: clamp_percent(right),
        }
    }

    /// Returns true if both sides are zero.
    pub fn is_stopped(&self) -> bool { self.left == 0.0 && self.right == 0.0 }
}

fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(-100.0, 100.0)
    }
}

/// Drive actuators for a differential robot.
pub trait Drive {
    /// Sets both sides at once. Percentages are already clamped.
    fn set_percent(&mut self, command: MotorCommand);

    /// Stops both sides.
    fn stop(&mut self) { self.set_percent(MotorCommand::STOP); }
}

impl<D: Drive + ?Sized> Drive for &mut D {
    fn set_percent(&mut self, command: MotorCommand) { (**self).set_percent(command); }

    fn stop(&mut self) { (**self).stop(); }
}

#[cfg(target_os = "vexos")]
pub use self::vex::Differential;

#[cfg(target_os = "vexos")]
mod vex {
    use std::{cell::RefCell, rc::Rc};

    use log::warn;
    use vexide::{prelude::Motor, smart::motor::BrakeMode};

    use super::{Drive, MotorCommand};

    /// Full-scale motor voltage.
    const MAX_VOLTAGE: f64 = 12.0;

    /// A differential drivetrain built from two V5 motor groups.
    ///
    /// The motors are stored in reference-counted cells so other systems can
    /// share them.
    #[derive(Clone)]
    pub struct Differential {
        /// The left motor group.
        pub left:  Rc<RefCell<dyn AsMut<[Motor]>>>,
        /// The right motor group.
        pub right: Rc<RefCell<dyn AsMut<[Motor]>>>,
    }

    impl Differential {
        /// Creates a new drivetrain with the provided left/right motors.
        pub fn new<L: AsMut<[Motor]> + 'static, R: AsMut<[Motor]> + 'static>(
            left: L,
            right: R,
        ) -> Self {
            Self {
                left:  Rc::new(RefCell::new(left)),
                right: Rc::new(RefCell::new(right)),
            }
        }

        /// Creates a drivetrain with shared ownership of the motor groups.
        pub fn from_shared<L: AsMut<[Motor]> + 'static, R: AsMut<[Motor]> + 'static>(
            left: Rc<RefCell<L>>,
            right: Rc<RefCell<R>>,
        ) -> Self {
            Self { left, right }
        }

        /// Sets the brake mode used when the drivetrain is stopped.
        pub fn set_brakemode(&self, brakemode: BrakeMode) {
            for group in [&self.left, &self.right] {
                if let Ok(mut motors) = group.try_borrow_mut() {
                    for motor in motors.as_mut() {
                        if let Err(e) = motor.brake(brakemode) {
                            warn!("Motor Brake Error: {}", e);
                        }
                    }
                }
            }
        }

        fn set_side(group: &Rc<RefCell<dyn AsMut<[Motor]>>>, percent: f64) {
            let voltage = percent / 100.0 * MAX_VOLTAGE;
            match group.try_borrow_mut() {
                Ok(mut motors) => {
                    for motor in motors.as_mut() {
                        if let Err(e) = motor.set_voltage(voltage) {
                            warn!("Motor Voltage Error: {}", e);
                        }
                    }
                }
                Err(e) => warn!("Error Borrowing Motor Group: {}", e),
            }
        }
    }

    impl Drive for Differential {
        fn set_percent(&mut self, command: MotorCommand) {
            Self::set_side(&self.left, command.left);
            Self::set_side(&self.right, command.right);
        }

        fn stop(&mut self) {
            for group in [&self.left, &self.right] {
                if let Ok(mut motors) = group.try_borrow_mut() {
                    for motor in motors.as_mut() {
                        let _ = motor.brake(BrakeMode::Brake);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder(Vec<MotorCommand>);

    impl Drive for Recorder {
        fn set_percent(&mut self, command: MotorCommand) { self.0.push(command); }
    }

    #[test]
    fn new_clamps_out_of_range_percents() {
        let cmd = MotorCommand::new(140.0, -250.0);
        assert_eq!(cmd, MotorCommand::new(100.0, -100.0));
        assert_eq!(MotorCommand::new(f64::NAN, 5.0).left, 0.0);
    }

    #[test]
    fn default_stop_issues_zero_command() {
        let mut drive = Recorder(Vec::new());
        drive.set_percent(MotorCommand::new(30.0, 30.0));
        drive.stop();
        assert_eq!(drive.0.len(), 2);
        assert!(drive.0[1].is_stopped());
    }

    #[test]
    fn mutable_reference_forwards() {
        fn pulse<D: Drive>(mut drive: D) {
            drive.set_percent(MotorCommand::new(-20.0, 20.0));
            drive.stop();
        }

        let mut drive = Recorder(Vec::new());
        pulse(&mut drive);
        assert_eq!(drive.0, vec![MotorCommand::new(-20.0, 20.0), MotorCommand::STOP]);
    }
}
