use crate::{geo::Point, sensor::wire::SituationReport};

/// Horizontal accuracy readings at or above this are treated as no fix.
pub const ACCURACY_INVALID: f64 = 19999.0;

/// Everything the display knows about the own aircraft, fed exclusively by
/// the situation stream plus scale controls from the radar stream.
///
/// Two dirty flags: `was_changed` covers the fields the radar view draws,
/// `attitude_changed` the ones only the artificial horizon cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct Ownship {
  pub connected: bool,
  pub gps_valid: bool,
  pub course: i32,
  pub altitude: f64,
  pub latitude: f64,
  pub longitude: f64,
  pub range: u32,
  pub limits: u32,
  pub gps_accuracy: f64,
  pub pitch: f64,
  pub roll: f64,
  pub gyro_heading: f64,
  pub slip_skid: f64,
  pub gps_speed: f64,
  pub gps_altitude: f64,
  pub ahrs_sensor: bool,
  pub was_changed: bool,
  pub attitude_changed: bool,
}

impl Default for Ownship {
  fn default() -> Self {
    Self {
      connected: false,
      gps_valid: false,
      course: 0,
      altitude: -99.0,
      latitude: 0.0,
      longitude: 0.0,
      range: 5,
      limits: 10000,
      gps_accuracy: 20000.0,
      pitch: 0.0,
      roll: 0.0,
      gyro_heading: 0.0,
      slip_skid: 0.0,
      gps_speed: 0.0,
      gps_altitude: -99.0,
      ahrs_sensor: false,
      was_changed: true,
      attitude_changed: true,
    }
  }
}

impl Ownship {
  pub fn position(&self) -> Point {
    Point {
      lat: self.latitude,
      lng: self.longitude,
    }
  }

  /// Folds one situation message in, field by field. Only an actual change
  /// raises the matching dirty flag, so a steady stream of identical
  /// messages costs no redraws.
  pub fn apply(&mut self, report: &SituationReport) {
    if !self.connected {
      self.connected = true;
      self.was_changed = true;
    }
    let gps_valid = report.gps_horizontal_accuracy < ACCURACY_INVALID;
    if self.gps_valid != gps_valid {
      self.gps_valid = gps_valid;
      self.was_changed = true;
    }
    let course = report.true_course.round() as i32;
    if self.course != course {
      self.course = course;
      self.was_changed = true;
    }
    if self.altitude != report.pressure_altitude {
      self.altitude = report.pressure_altitude;
      self.was_changed = true;
    }
    if self.latitude != report.latitude {
      self.latitude = report.latitude;
      self.was_changed = true;
    }
    if self.longitude != report.longitude {
      self.longitude = report.longitude;
      self.was_changed = true;
    }
    self.gps_accuracy = report.gps_horizontal_accuracy;

    if self.pitch != report.pitch {
      self.pitch = report.pitch;
      self.attitude_changed = true;
    }
    if self.roll != report.roll {
      self.roll = report.roll;
      self.attitude_changed = true;
    }
    if self.gyro_heading != report.gyro_heading {
      self.gyro_heading = report.gyro_heading;
      self.attitude_changed = true;
    }
    if self.slip_skid != report.slip_skid {
      self.slip_skid = report.slip_skid;
      self.attitude_changed = true;
    }
    if self.gps_speed != report.ground_speed {
      self.gps_speed = report.ground_speed;
      self.attitude_changed = true;
    }
    if self.gps_altitude != report.altitude_msl {
      self.gps_altitude = report.altitude_msl;
      self.attitude_changed = true;
    }
    let sensor = report.ahrs_sensor();
    if self.ahrs_sensor != sensor {
      self.ahrs_sensor = sensor;
      self.attitude_changed = true;
    }
  }

  /// A lost transport matters to the picture only if we were connected.
  pub fn drop_connection(&mut self) -> bool {
    if self.connected {
      self.connected = false;
      self.was_changed = true;
      true
    } else {
      false
    }
  }

  /// Applies a scale control update. The dirty flags stay untouched, the
  /// caller signals the redraw through the traffic path.
  pub fn set_scale(&mut self, range: u32, limits: u32) -> bool {
    let mut changed = false;
    if self.range != range {
      self.range = range;
      changed = true;
    }
    if self.limits != limits {
      self.limits = limits;
      changed = true;
    }
    changed
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;

  fn sample_report() -> SituationReport {
    SituationReport {
      gps_horizontal_accuracy: 8.5,
      latitude: 52.57,
      longitude: 13.32,
      true_course: 45.6,
      pressure_altitude: 1085.1,
      ground_speed: 95.6,
      altitude_msl: 183.2,
      pitch: -2.4,
      roll: 1.1,
      gyro_heading: 187.2,
      slip_skid: -0.5,
      ahrs_status: 7,
    }
  }

  fn clean() -> Ownship {
    let mut own = Ownship::default();
    own.was_changed = false;
    own.attitude_changed = false;
    own
  }

  #[test]
  fn test_starts_disconnected_and_dirty() {
    let own = Ownship::default();
    assert!(!own.connected);
    assert!(!own.gps_valid);
    assert!(own.was_changed);
    assert_eq!(own.range, 5);
    assert_eq!(own.limits, 10000);
  }

  #[test]
  fn test_apply_marks_changes() {
    let mut own = clean();
    own.apply(&sample_report());
    assert!(own.connected);
    assert!(own.gps_valid);
    assert_eq!(own.course, 46);
    assert_eq!(own.altitude, 1085.1);
    assert!(own.was_changed);
    assert!(own.attitude_changed);
  }

  #[test]
  fn test_identical_report_stays_clean() {
    let mut own = clean();
    own.apply(&sample_report());
    own.was_changed = false;
    own.attitude_changed = false;
    own.apply(&sample_report());
    assert!(!own.was_changed);
    assert!(!own.attitude_changed);
  }

  #[test]
  fn test_attitude_only_change_skips_radar_flag() {
    let mut own = clean();
    own.apply(&sample_report());
    own.was_changed = false;
    own.attitude_changed = false;
    let mut report = sample_report();
    report.pitch = 3.0;
    own.apply(&report);
    assert!(!own.was_changed);
    assert!(own.attitude_changed);
  }

  #[test]
  fn test_accuracy_threshold() {
    let mut own = clean();
    let mut report = sample_report();
    report.gps_horizontal_accuracy = 19999.0;
    own.apply(&report);
    assert!(!own.gps_valid);
    report.gps_horizontal_accuracy = 19998.9;
    own.apply(&report);
    assert!(own.gps_valid);
  }

  #[test]
  fn test_drop_connection_once() {
    let mut own = clean();
    own.apply(&sample_report());
    own.was_changed = false;
    assert!(own.drop_connection());
    assert!(own.was_changed);
    own.was_changed = false;
    assert!(!own.drop_connection());
    assert!(!own.was_changed);
  }

  #[test]
  fn test_set_scale() {
    let mut own = clean();
    assert!(own.set_scale(10, 10000));
    assert_eq!(own.range, 10);
    assert!(!own.was_changed);
    assert!(!own.set_scale(10, 10000));
    assert!(own.set_scale(10, 5000));
    assert_eq!(own.limits, 5000);
  }
}
