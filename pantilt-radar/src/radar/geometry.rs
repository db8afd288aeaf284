//! Polar (angle, distance) to screen conversions.
//!
//! Screen `y` grows downward while radar angles grow counter-clockwise: hence the sign flip on y.

use embedded_graphics::prelude::Point;

/// Converts polar coordinates around `center` into (x, y) screen coordinates:
/// `x = cx + r·cos(θ)`, `y = cy − r·sin(θ)`.
pub fn polar_to_screen(center: (f64, f64), angle_degrees: f64, radius: f64) -> (f64, f64) {
    let theta = angle_degrees.to_radians();
    (
        center.0 + radius * theta.cos(),
        center.1 - radius * theta.sin(),
    )
}

/// Converts (x, y) screen coordinates back into polar (angle in degrees, radius) around `center`.
///
/// Angles are given in [0, 360).
pub fn screen_to_polar(center: (f64, f64), point: (f64, f64)) -> (f64, f64) {
    let dx = point.0 - center.0;
    let dy = center.1 - point.1;
    let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
    (angle, dx.hypot(dy))
}

/// Same as [`polar_to_screen`] but lands on the pixel grid (truncating toward zero).
pub fn polar_to_pixel(center: Point, angle_degrees: f64, radius: f64) -> Point {
    let theta = angle_degrees.to_radians();
    Point::new(
        center.x.saturating_add((radius * theta.cos()) as i32),
        center.y.saturating_sub((radius * theta.sin()) as i32),
    )
}

/// Scales a real-world `distance` into a screen radius: `max_range` maps onto `radius` pixels.
pub fn distance_to_radius(distance: f64, max_range: f64, radius: u32) -> f64 {
    distance / max_range * radius as f64
}

/// Checks whether `point` lies inside the disc of given `radius` around `center`.
pub fn in_disc(center: Point, radius: u32, point: Point) -> bool {
    let dx = point.x as i128 - center.x as i128;
    let dy = point.y as i128 - center.y as i128;
    dx * dx + dy * dy <= (radius as i128) * (radius as i128)
}
