pub const EARTH_RADIUS_M: f64 = 6371008.8;
pub const METERS_PER_NM: f64 = 1852.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
  pub lat: f64,
  pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPos {
  pub x: i32,
  pub y: i32,
}

/// Normalizes an angle in degrees into [-180, 180).
pub fn wrap_deg(angle: f64) -> f64 {
  (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Distance (nautical miles) and bearing (degrees) from `from` to `to`.
///
/// Uses an equirectangular approximation, accurate enough at the ranges a
/// traffic display works with and much cheaper than a great-circle solve.
pub fn polar_from(from: Point, to: Point) -> (f64, f64) {
  let mid_lat = ((from.lat + to.lat) / 2.0).to_radians();
  let north = (to.lat - from.lat).to_radians();
  let east = (to.lng - from.lng).to_radians() * mid_lat.cos();
  let distance = (east * east + north * north).sqrt() * EARTH_RADIUS_M / METERS_PER_NM;
  let bearing = east.atan2(north).to_degrees();
  (distance, bearing)
}

/// Clock position (1 to 12) for a bearing relative to own course, 30 degrees
/// per sector.
pub fn clock_position(relative_bearing: f64) -> u8 {
  let mut oclock = (relative_bearing / 30.0).round() as i32;
  if oclock <= 0 {
    oclock += 12;
  }
  if oclock > 12 {
    oclock -= 12;
  }
  oclock as u8
}

#[cfg(test)]
pub mod tests {
  use super::*;

  #[test]
  fn test_wrap_deg() {
    assert_eq!(wrap_deg(0.0), 0.0);
    assert_eq!(wrap_deg(90.0), 90.0);
    assert_eq!(wrap_deg(190.0), -170.0);
    assert_eq!(wrap_deg(-190.0), 170.0);
    assert_eq!(wrap_deg(360.0), 0.0);
    assert_eq!(wrap_deg(540.0), -180.0);
  }

  #[test]
  fn test_polar_due_north() {
    let own = Point { lat: 52.0, lng: 13.0 };
    let target = Point { lat: 53.0, lng: 13.0 };
    let (distance, bearing) = polar_from(own, target);
    assert!((distance - 60.04).abs() < 0.01);
    assert!(bearing.abs() < 1e-6);
  }

  #[test]
  fn test_polar_due_east_shrinks_with_latitude() {
    let own = Point { lat: 52.0, lng: 13.0 };
    let target = Point { lat: 52.0, lng: 14.0 };
    let (distance, bearing) = polar_from(own, target);
    assert!((distance - 36.96).abs() < 0.05);
    assert!((bearing - 90.0).abs() < 1e-6);
  }

  #[test]
  fn test_polar_southwest_quadrant() {
    let own = Point { lat: 52.0, lng: 10.0 };
    let target = Point { lat: 51.0, lng: 9.0 };
    let (distance, bearing) = polar_from(own, target);
    assert!((distance - 70.72).abs() < 0.05);
    assert!((bearing + 148.1).abs() < 0.1);
  }

  #[test]
  fn test_clock_position() {
    assert_eq!(clock_position(0.0), 12);
    assert_eq!(clock_position(-5.0), 12);
    assert_eq!(clock_position(30.0), 1);
    assert_eq!(clock_position(100.0), 3);
    assert_eq!(clock_position(-100.0), 9);
    assert_eq!(clock_position(180.0), 6);
    assert_eq!(clock_position(-180.0), 6);
    assert_eq!(clock_position(-90.0), 9);
  }
}
