//! V5 GPS sensor as a beacon.
//!
//! The GPS reports metres and a clockwise compass heading. [`GpsBeacon`]
//! converts both to the inches and counter-clockwise degrees the
//! controllers work in, and treats a high RMS error as lost coverage.
//!
//! # Example
//!
//! ```ignore
//! use beacon_nav::motion::position::GpsBeacon;
//! use vexide::prelude::*;
//!
//! let gps = GpsSensor::new(peripherals.port_3, [0.0, 0.0], [0.0, 0.0], 90.0);
//! let beacon = GpsBeacon::new(gps).with_max_error(0.05);
//! ```

use log::warn;
use vexide::smart::gps::GpsSensor;

use super::devices::{PositionSensor, Reading};

const INCHES_PER_METER: f64 = 39.3701;

/// RMS error (metres) above which the GPS is considered blind.
const DEFAULT_MAX_ERROR: f64 = 0.1;

/// A [`PositionSensor`] backed by the V5 GPS sensor.
///
/// Positions are reported in inches. The GPS heading is a clockwise compass
/// heading, so it is converted to the counter-clockwise convention used by
/// the rest of the crate. A reading whose RMS error exceeds `max_error` is
/// reported as a deadzone; port errors are logged and reported as not ready.
pub struct GpsBeacon {
    gps:       GpsSensor,
    max_error: f64,
}

impl GpsBeacon {
    /// Wraps a GPS sensor using the default error threshold.
    pub fn new(gps: GpsSensor) -> Self {
        Self {
            gps,
            max_error: DEFAULT_MAX_ERROR,
        }
    }

    /// Sets the RMS error threshold, in metres.
    pub fn with_max_error(mut self, max_error: f64) -> Self {
        self.max_error = max_error;
        self
    }
}

impl PositionSensor for GpsBeacon {
    fn sample(&mut self) -> Reading {
        match self.gps.error() {
            Ok(err) if err > self.max_error => return Reading::Deadzone,
            Ok(_) => {}
            Err(e) => {
                warn!("GPS Error Read Failed: {}", e);
                return Reading::NotReady;
            }
        }

        let position = match self.gps.position() {
            Ok(p) => p,
            Err(e) => {
                warn!("GPS Position Read Failed: {}", e);
                return Reading::NotReady;
            }
        };
        let heading = match self.gps.heading() {
            Ok(h) => (90.0 - h.as_degrees()).rem_euclid(360.0),
            Err(e) => {
                warn!("GPS Heading Read Failed: {}", e);
                return Reading::NotReady;
            }
        };

        Reading::from_raw(
            position.x * INCHES_PER_METER,
            position.y * INCHES_PER_METER,
            heading,
        )
    }
}
