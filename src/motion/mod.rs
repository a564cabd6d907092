//! Closed-loop navigation.
//!
//! This module drives a differential robot to headings and points using an
//! absolute position sensor that is noisy and occasionally blind. It
//! includes:
//!
//! - **Geometry**: Heading and distance helpers every controller is tuned
//!   against.
//! - **Position**: Sensor abstraction and the acquisition guard that retries
//!   noise and reports deadzones.
//! - **Controllers**: The heading controller, fine alignment, the point
//!   controller and deadzone recovery, all methods on [`Navigator`].
//!
//! # Architecture
//!
//! Every controller is a blocking loop on the calling thread: read the
//! sensor, issue a motor command, sleep a fixed interval, repeat. A deadzone
//! seen at any read runs recovery once and ends the call with
//! [`Outcome::Deadzone`], including any controller that nested it.
//!
//! # Example
//!
//! ```ignore
//! use beacon_nav::motion::{config::NavConfig, goto::TargetSpec, navigator::Navigator};
//!
//! let mut nav = Navigator::new(sensor, drive, clock, NavConfig::default())?;
//! let _ = nav.turn(90.0);
//! let _ = nav.go_to_point(&TargetSpec::new(24.0, 36.0).time_limit(3.0));
//! let _ = nav.turn_when_really_close(90.0);
//! ```

/// Calibration and loop pacing.
pub mod config;

/// Deadzone recovery and blind turns.
pub mod deadzone;

/// Heading and distance geometry.
pub mod geo;

/// Point controller.
pub mod goto;

/// The navigation context that owns the sensor, drive and clock.
pub mod navigator;

/// Absolute position sensing.
pub mod position;

/// Heading controller and fine alignment.
pub mod turn;

pub use navigator::{NavState, Navigator, Outcome};
