//! Heading and distance geometry.
//!
//! Headings are in degrees on a wrapping `[0, 360)` circle, measured
//! counter-clockwise from the +x axis: 0 is east, 90 north, 180 west and
//! 270 south. Turning left means turning counter-clockwise, i.e. towards a
//! larger heading.
//!
//! Every controller threshold is tuned against exactly these functions, so
//! they are kept free of state and side effects.

/// A 2D point in field coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// The x-coordinate in field units (inches).
    pub x: f64,
    /// The y-coordinate in field units (inches).
    pub y: f64,
}

impl Point {
    /// Create a new point using `x` and `y` coordinates
    pub fn new(x: f64, y: f64) -> Self { Point { x, y } }

    /// Distance from this point to `other`.
    pub fn distance_to(&self, other: Point) -> f64 {
        euclidean_distance(self.x, self.y, other.x, other.y)
    }

    /// Bearing from this point to `other`.
    pub fn bearing_to(&self, other: Point) -> f64 {
        desired_heading(self.x, self.y, other.x, other.y)
    }
}

/// Which way to rotate in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDirection {
    /// Counter-clockwise, heading increases.
    Left,
    /// Clockwise, heading decreases.
    Right,
}

impl TurnDirection {
    /// `+1.0` for left, `-1.0` for right.
    pub fn sign(self) -> f64 {
        match self {
            TurnDirection::Left => 1.0,
            TurnDirection::Right => -1.0,
        }
    }
}

/// Wraps any heading into `[0, 360)`.
pub fn normalize_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Magnitude of the smaller arc between two headings, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = normalize_heading(a - b);
    diff.min(360.0 - diff)
}

/// Shortest rotation from `current` to `target`.
///
/// Left is returned when the counter-clockwise offset lies in `(0, 180]`,
/// right otherwise. Two headings exactly 180 degrees apart therefore always
/// resolve to [`TurnDirection::Left`], and identical headings resolve to
/// [`TurnDirection::Right`] (the rotation amount is zero either way).
pub fn turn_direction(current: f64, target: f64) -> TurnDirection {
    let ccw = normalize_heading(target - current);
    if ccw > 0.0 && ccw <= 180.0 {
        TurnDirection::Left
    } else {
        TurnDirection::Right
    }
}

/// Bearing from `(from_x, from_y)` to `(to_x, to_y)`, in `[0, 360)`.
///
/// A zero-length vector has no bearing; it is defined as `0.0` (east).
pub fn desired_heading(from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> f64 {
    let dx = to_x - from_x;
    let dy = to_y - from_y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    normalize_heading(dy.atan2(dx).to_degrees())
}

/// Straight-line distance between two points.
pub fn euclidean_distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 { (x2 - x1).hypot(y2 - y1) }

/// The heading pointing the other way, `(h + 180) mod 360`.
pub fn opposite_heading(heading: f64) -> f64 { normalize_heading(heading + 180.0) }

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample_headings() -> Vec<f64> {
        let mut headings: Vec<f64> = (0..72).map(|i| i as f64 * 5.0).collect();
        headings.extend([0.1, 359.9, 179.999, 180.001, 33.3, 271.75]);
        headings
    }

    #[test]
    fn angular_distance_symmetric_and_bounded() {
        for &a in &sample_headings() {
            assert!(angular_distance(a, a).abs() < EPS);
            for &b in &sample_headings() {
                let ab = angular_distance(a, b);
                let ba = angular_distance(b, a);
                assert!((ab - ba).abs() < EPS, "{} vs {} for {}, {}", ab, ba, a, b);
                assert!((0.0..=180.0).contains(&ab));
            }
        }
    }

    #[test]
    fn angular_distance_wraps() {
        assert!((angular_distance(350.0, 10.0) - 20.0).abs() < EPS);
        assert!((angular_distance(0.0, 180.0) - 180.0).abs() < EPS);
        assert!((angular_distance(-90.0, 270.0)).abs() < EPS);
    }

    #[test]
    fn turn_direction_lands_on_target() {
        for &current in &sample_headings() {
            for &target in &sample_headings() {
                let dir = turn_direction(current, target);
                let moved = current + dir.sign() * angular_distance(current, target);
                assert!(
                    angular_distance(moved, target) < 1e-6,
                    "{} -> {} via {:?}",
                    current,
                    target,
                    dir
                );
            }
        }
    }

    #[test]
    fn turn_direction_tie_breaks() {
        assert_eq!(turn_direction(0.0, 180.0), TurnDirection::Left);
        assert_eq!(turn_direction(180.0, 0.0), TurnDirection::Left);
        assert_eq!(turn_direction(90.0, 270.0), TurnDirection::Left);
        assert_eq!(turn_direction(45.0, 45.0), TurnDirection::Right);
        assert_eq!(turn_direction(0.0, 10.0), TurnDirection::Left);
        assert_eq!(turn_direction(10.0, 0.0), TurnDirection::Right);
        assert_eq!(turn_direction(350.0, 10.0), TurnDirection::Left);
    }

    #[test]
    fn desired_heading_cardinals() {
        assert!((desired_heading(0.0, 0.0, 5.0, 0.0) - 0.0).abs() < EPS);
        assert!((desired_heading(0.0, 0.0, 0.0, 5.0) - 90.0).abs() < EPS);
        assert!((desired_heading(0.0, 0.0, -5.0, 0.0) - 180.0).abs() < EPS);
        assert!((desired_heading(0.0, 0.0, 0.0, -5.0) - 270.0).abs() < EPS);
        assert!((desired_heading(1.0, 1.0, 2.0, 2.0) - 45.0).abs() < EPS);
    }

    #[test]
    fn desired_heading_zero_vector_is_east() {
        assert_eq!(desired_heading(12.0, 7.5, 12.0, 7.5), 0.0);
    }

    #[test]
    fn distance_and_opposite() {
        assert!((euclidean_distance(0.0, 0.0, 3.0, 4.0) - 5.0).abs() < EPS);
        assert_eq!(euclidean_distance(2.0, 2.0, 2.0, 2.0), 0.0);
        assert!((opposite_heading(90.0) - 270.0).abs() < EPS);
        assert!((opposite_heading(270.0) - 90.0).abs() < EPS);
        assert!((opposite_heading(180.0)).abs() < EPS);
    }

    #[test]
    fn normalize_never_returns_360() {
        assert_eq!(normalize_heading(-1e-20), 0.0);
        assert!((normalize_heading(-30.0) - 330.0).abs() < EPS);
        assert!((normalize_heading(725.0) - 5.0).abs() < EPS);
    }

    #[test]
    fn point_helpers() {
        let a = Point::new(10.0, 10.0);
        let b = Point::new(10.0, 20.0);
        assert!((a.distance_to(b) - 10.0).abs() < EPS);
        assert!((a.bearing_to(b) - 90.0).abs() < EPS);
    }
}
