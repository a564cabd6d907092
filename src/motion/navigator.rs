//! The navigation context.
//!
//! A [`Navigator`] owns everything a controller call touches: the position
//! sensor (behind a [`PositionGuard`]), the drive, the clock, the status
//! display, the configuration and the small amount of state that outlives a
//! single call. Controllers are methods on it and are defined in the
//! sibling modules:
//!
//! - [`turn`](super::turn): heading controller and fine alignment.
//! - [`goto`](super::goto): point controller.
//! - [`deadzone`](super::deadzone): deadzone recovery and blind turns.
//!
//! Everything runs on the calling thread. The only suspension points are
//! the fixed sleeps issued through the [`Clock`].
//!
//! # Example
//!
//! ```ignore
//! use beacon_nav::motion::{config::NavConfig, goto::TargetSpec, navigator::Navigator};
//!
//! let mut nav = Navigator::new(gps, drivetrain, clock, NavConfig::default())?;
//! let _ = nav.go_to_point(&TargetSpec::new(24.0, 36.0).final_heading(90.0));
//! if nav.has_exhausted_deadzone() {
//!     // skip waypoints that need fresh positioning
//! }
//! ```

use log::{trace, warn};

use crate::{
    display::{NullDisplay, StatusDisplay},
    drivetrain::{Drive, MotorCommand},
    error::Result,
    motion::{
        config::NavConfig,
        geo::Point,
        position::{Acquired, Pose, PositionGuard, PositionSensor},
    },
    time::Clock,
};

/// How a controller call ended.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The controller reached its tolerance.
    Completed,
    /// The point controller's iteration budget ran out first.
    TimedOut,
    /// The sensor lost coverage; recovery ran and the call was abandoned.
    Deadzone,
    /// The target was the no-op sentinel. Nothing happened.
    Skipped,
}

/// A snapshot of the state that persists across controller calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavState {
    /// The most recent confirmed-valid pose.
    pub last_valid:         Option<Pose>,
    /// Set the first time deadzone recovery runs. Never cleared by control code.
    pub exhausted_deadzone: bool,
    /// The last command issued to the drive, after trims.
    pub motors:             MotorCommand,
    /// Number of deadzone recoveries run.
    pub recoveries:         u32,
}

/// Closed-loop navigation over a position sensor `S`, a drive `D` and a clock `C`.
pub struct Navigator<S, D, C> {
    pub(crate) guard:              PositionGuard<S>,
    pub(crate) drive:              D,
    pub(crate) clock:              C,
    pub(crate) display:            Box<dyn StatusDisplay>,
    pub(crate) config:             NavConfig,
    pub(crate) exhausted_deadzone: bool,
    pub(crate) motors:             MotorCommand,
    pub(crate) recoveries:         u32,
}

impl<S, D, C> Navigator<S, D, C>
where
    S: PositionSensor,
    D: Drive,
    C: Clock,
{
    /// Creates a navigator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidConfig`](crate::error::NavError::InvalidConfig)
    /// if the configuration is unusable.
    pub fn new(sensor: S, drive: D, clock: C, config: NavConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            guard: PositionGuard::new(sensor, config.acquire_poll),
            drive,
            clock,
            display: Box::new(NullDisplay),
            config,
            exhausted_deadzone: false,
            motors: MotorCommand::STOP,
            recoveries: 0,
        })
    }

    /// Attaches a status display.
    pub fn with_display(mut self, display: impl StatusDisplay + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &NavConfig { &self.config }

    /// A snapshot of the persistent state.
    pub fn state(&self) -> NavState {
        NavState {
            last_valid:         self.guard.last_valid(),
            exhausted_deadzone: self.exhausted_deadzone,
            motors:             self.motors,
            recoveries:         self.recoveries,
        }
    }

    /// True once deadzone recovery has run at least once.
    ///
    /// Mission code uses this to skip waypoints that rely on fresh positioning.
    pub fn has_exhausted_deadzone(&self) -> bool { self.exhausted_deadzone }

    /// The last command issued to the drive. Diagnostic only.
    pub fn motor_mirror(&self) -> MotorCommand { self.motors }

    /// The last valid pose, for callers that need a position while the
    /// sensor is unavailable.
    pub fn current_pose(&self) -> Option<Pose> { self.guard.last_valid() }

    /// Clears the cached pose, the deadzone flag and the diagnostics.
    pub fn reset_state(&mut self) {
        self.guard.reset();
        self.exhausted_deadzone = false;
        self.motors = MotorCommand::STOP;
        self.recoveries = 0;
    }

    /// Gives back the sensor, drive and clock.
    pub fn into_parts(self) -> (S, D, C) { (self.guard.into_inner(), self.drive, self.clock) }

    /// Issues a pair of power fractions, scaled by the motor trims.
    pub(crate) fn command(&mut self, left: f64, right: f64) {
        let (left, right) = self.config.trimmed(left, right);
        let command = MotorCommand::new(left, right);
        trace!("Motor command: left {:.1}%, right {:.1}%", command.left, command.right);
        self.drive.set_percent(command);
        self.motors = command;
    }

    /// Stops both sides.
    pub(crate) fn stop(&mut self) {
        self.drive.stop();
        self.motors = MotorCommand::STOP;
    }

    /// Acquires a valid pose, running deadzone recovery if coverage is lost.
    ///
    /// `None` means recovery ran and the calling controller must return
    /// [`Outcome::Deadzone`] immediately.
    pub(crate) fn acquire(&mut self) -> Option<Pose> {
        match self.guard.acquire(&mut self.clock) {
            Acquired::Valid(pose) => Some(pose),
            Acquired::Deadzone => {
                warn!("Deadzone entered, abandoning the current controller call");
                self.recover();
                None
            }
        }
    }

    /// The robot centroid for a sensor pose.
    pub(crate) fn centroid(&self, pose: &Pose) -> Point { pose.centroid(self.config.sensor_offset) }

    pub(crate) fn show(&mut self, lines: &[String]) { self.display.show(lines); }
}
