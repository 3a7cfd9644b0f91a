use crate::{display::AhrsView, ownship::Ownship};

pub const MSG_GROUND_TEST: &str = "No GPS,Ground ONLY!";
pub const MSG_PSEUDO_AHRS: &str = "PSEUDO AHRS ONLY!";
pub const MSG_NO_AHRS: &str = "NO IMU OR GPS!";
pub const MSG_NO_CONNECTION: &str = "NO CONNECTION!";

/// GPS accuracy beyond this is too poor to trust the derived attitude.
const ACCURACY_LIMIT: f64 = 30.0;

/// Warning banner for the artificial horizon. Tells the pilot what the
/// shown attitude is actually based on.
pub fn banner(connected: bool, gps_accuracy: f64, ahrs_sensor: bool) -> Option<&'static str> {
  if !connected {
    return Some(MSG_NO_CONNECTION);
  }
  match (gps_accuracy >= ACCURACY_LIMIT, ahrs_sensor) {
    (true, true) => Some(MSG_GROUND_TEST),
    (true, false) => Some(MSG_NO_AHRS),
    (false, false) => Some(MSG_PSEUDO_AHRS),
    (false, true) => None,
  }
}

pub fn view_from(own: &Ownship) -> AhrsView {
  AhrsView {
    pitch: own.pitch,
    roll: own.roll,
    heading: own.gyro_heading,
    slip_skid: own.slip_skid,
    gps_speed: own.gps_speed,
    gps_altitude: own.gps_altitude,
    banner: banner(own.connected, own.gps_accuracy, own.ahrs_sensor),
  }
}
