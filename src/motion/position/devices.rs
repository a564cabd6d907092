//! Pose type and position sensor abstraction.
//!
//! The beacon sensor reports three values per cycle: x, y and heading. Two
//! sentinel values distinguish its failure modes:
//!
//! - `-1.0`: no reading yet / transiently invalid. Retried silently.
//! - `-2.0`: the robot is inside a zone with no beacon coverage.
//!
//! [`Reading::from_raw`] turns such a raw triple into a [`Reading`].

use crate::motion::geo::{Point, normalize_heading};

/// Raw sentinel for "no reading yet".
pub const NOT_READY_SENTINEL: f64 = -1.0;

/// Raw sentinel for "inside an uncovered zone".
pub const DEADZONE_SENTINEL: f64 = -2.0;

/// A 2D position with heading, as reported by the position sensor.
///
/// # Example
///
/// ```
/// use beacon_nav::motion::position::Pose;
///
/// let pose = Pose::new(24.0, 12.0, 90.0);
/// assert_eq!(pose.point().x, 24.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// The x-coordinate in field units.
    pub x:       f64,
    /// The y-coordinate in field units.
    pub y:       f64,
    /// Heading in degrees, `[0, 360)`.
    pub heading: f64,
}

impl Pose {
    /// Creates a new Pose, wrapping the heading into `[0, 360)`.
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading: normalize_heading(heading),
        }
    }

    /// Creates a Pose at the origin (0, 0) with heading 0.
    pub fn origin() -> Self { Self::new(0.0, 0.0, 0.0) }

    /// The position part of the pose.
    pub fn point(&self) -> Point { Point::new(self.x, self.y) }

    /// The robot centroid for a sensor mounted at `offset` from it.
    ///
    /// The sensor sits `offset.forward` ahead of and `offset.left` to the
    /// left of the centroid, so the centroid is found by stepping back along
    /// the current heading.
    pub fn centroid(&self, offset: SensorOffset) -> Point {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        Point::new(
            self.x - offset.forward * cos + offset.left * sin,
            self.y - offset.forward * sin - offset.left * cos,
        )
    }
}

/// Mounting offset of the position sensor relative to the robot centroid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorOffset {
    /// Distance ahead of the centroid, along the robot's heading.
    pub forward: f64,
    /// Distance to the left of the centroid.
    pub left:    f64,
}

impl SensorOffset {
    /// Creates a new offset.
    pub fn new(forward: f64, left: f64) -> Self { Self { forward, left } }
}

/// One sample from the position sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// A usable pose.
    Valid(Pose),
    /// No usable reading this cycle (noise, start-up). Retry.
    NotReady,
    /// The robot is outside sensor coverage.
    Deadzone,
}

impl Reading {
    /// Classifies a raw `(x, y, heading)` triple using the beacon sentinels.
    ///
    /// A deadzone sentinel on any channel wins over everything else. A
    /// not-ready sentinel, a non-finite value, or a heading outside
    /// `[0, 360)` is treated as not ready.
    pub fn from_raw(x: f64, y: f64, heading: f64) -> Reading {
        let channels = [x, y, heading];
        if channels.iter().any(|&v| v == DEADZONE_SENTINEL) {
            return Reading::Deadzone;
        }
        if channels.iter().any(|&v| !v.is_finite() || v == NOT_READY_SENTINEL) {
            return Reading::NotReady;
        }
        if !(0.0..360.0).contains(&heading) {
            return Reading::NotReady;
        }
        Reading::Valid(Pose::new(x, y, heading))
    }

    /// Returns true for [`Reading::Valid`].
    pub fn is_valid(&self) -> bool { matches!(self, Reading::Valid(_)) }
}

/// An absolute position sensor.
///
/// Implementations return whatever the hardware reports this instant; the
/// [`PositionGuard`](super::guard::PositionGuard) handles retries.
pub trait PositionSensor {
    /// Takes one sample.
    fn sample(&mut self) -> Reading;
}

impl<S: PositionSensor + ?Sized> PositionSensor for &mut S {
    fn sample(&mut self) -> Reading { (**self).sample() }
}
