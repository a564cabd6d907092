//! # Beacon Nav
//!
//! Beacon Nav is the closed-loop navigation core of a differential-drive
//! robot that localizes with an absolute beacon sensor. It runs on the
//! [Vexide](https://vexide.dev) V5 platform and on any host. It provides:
//!
//! - **Heading Control**: A tiered in-place turn controller plus
//!   pulse-and-settle fine alignment.
//! - **Point Control**: Drive-to-point with continuous heading correction,
//!   reverse driving, time-boxing and an optional final heading.
//! - **Deadzone Recovery**: A blind escape maneuver for when the sensor has
//!   no coverage, with a sticky flag for mission logic to consult.
//! - **Display and Logging**: Status lines on an
//!   [`embedded-graphics`](https://crates.io/crates/embedded-graphics) target
//!   and a console + file logger.
//! - **Simulation**: A deterministic simulated robot for testing controllers
//!   without hardware or real delays.
//!
//! ## Quick Start
//!
//! ```ignore
//! use beacon_nav::{
//!     drivetrain::Differential,
//!     motion::{config::NavConfig, goto::TargetSpec, position::GpsBeacon, Navigator},
//!     time::VexClock,
//! };
//! use vexide::prelude::*;
//!
//! #[vexide::main]
//! async fn main(peripherals: Peripherals) {
//!     let drivetrain = Differential::new(
//!         [Motor::new(peripherals.port_1, Gearset::Green, Direction::Forward)],
//!         [Motor::new(peripherals.port_2, Gearset::Green, Direction::Reverse)],
//!     );
//!     let gps = GpsBeacon::new(GpsSensor::new(peripherals.port_3, [0.0, 0.0], [0.0, 0.0], 90.0));
//!
//!     let mut nav = Navigator::new(gps, drivetrain, VexClock::new(), NavConfig::default())
//!         .expect("valid config");
//!     let _ = nav.go_to_point(&TargetSpec::new(24.0, 36.0).final_heading(90.0));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`drivetrain`]: Motor command type and the drive abstraction.
//! - [`motion`]: Geometry, position sensing and the controllers.
//! - [`display`]: Status display on `embedded-graphics` targets.
//! - [`fs`]: Logging to console and file.
//! - [`sim`]: Simulated robot.

/// Differential drivetrain actuation.
///
/// Provides [`MotorCommand`](drivetrain::MotorCommand) and the
/// [`Drive`](drivetrain::Drive) trait, plus the V5 motor-group drivetrain
/// when building for VEXos.
pub mod drivetrain;

/// Error types.
pub mod error;

/// Filesystem utilities module.
///
/// Contains the logger that records controller diagnostics to the console
/// and to a file.
pub mod fs;

/// Closed-loop navigation module.
///
/// - **Geometry**: Angular distance, turn direction, bearing and distance.
/// - **Position**: Sensor trait, reading classification and acquisition guard.
/// - **Controllers**: Turn, fine alignment, go-to-point and deadzone recovery.
pub mod motion;

/// Status display module.
pub mod display;

/// Deterministic simulated robot.
pub mod sim;

/// Clock abstraction.
pub mod time;
