//! Spatial query helpers.
//! Pure direction and distance functions used by every behaviour module.
use glam::Vec2;

/// Returns the unit vector pointing from `from` towards `to`.
///
/// Zero-length or non-finite inputs yield `Vec2::ZERO` rather than NaN.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use warband::spatial::direction;
/// let dir = direction(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
/// assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
/// assert_eq!(direction(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
/// ```
#[must_use]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    if !delta.is_finite() {
        return Vec2::ZERO;
    }
    delta.try_normalize().unwrap_or(Vec2::ZERO)
}

/// Euclidean distance between two points.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use warband::spatial::distance;
/// assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Returns the point on a circle of `radius` around `centre` at `angle`
/// radians.
#[must_use]
pub fn point_on_circle(centre: Vec2, radius: f32, angle: f32) -> Vec2 {
    centre + Vec2::from_angle(angle) * radius
}
