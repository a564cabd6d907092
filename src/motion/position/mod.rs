//! Absolute position sensing.
//!
//! This module wraps the beacon position sensor used for closed-loop
//! navigation:
//!
//! - **[`devices`]**: The [`Pose`] type, the sensor trait and the
//!   classification of raw readings into valid / not-ready / deadzone.
//! - **[`guard`]**: The acquisition guard that retries transient failures,
//!   caches the last valid pose and reports deadzones to its caller.
//! - **`gps`** (V5 only): A [`PositionSensor`] backed by the V5 GPS sensor.
//!
//! # Example
//!
//! ```ignore
//! use beacon_nav::motion::position::{guard::{Acquired, PositionGuard}, devices::Reading};
//!
//! let mut guard = PositionGuard::new(sensor, poll_interval);
//! match guard.acquire(&mut clock) {
//!     Acquired::Valid(pose) => println!("at ({}, {})", pose.x, pose.y),
//!     Acquired::Deadzone => println!("lost coverage"),
//! }
//! ```

/// Pose type, sensor trait and raw reading classification.
pub mod devices;

/// Bounded-retry acquisition with last-valid caching.
pub mod guard;

#[cfg(target_os = "vexos")]
mod gps;

pub use devices::{Pose, PositionSensor, Reading, SensorOffset};
#[cfg(target_os = "vexos")]
pub use gps::GpsBeacon;
pub use guard::{Acquired, PositionGuard};
