use serde::Deserialize;
use serde_json::Value;

/// Own-ship message from the situation endpoint. The device sends a lot
/// more fields, only the ones the display works with are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SituationReport {
  #[serde(rename = "GPSHorizontalAccuracy")]
  pub gps_horizontal_accuracy: f64,
  #[serde(rename = "GPSLatitude")]
  pub latitude: f64,
  #[serde(rename = "GPSLongitude")]
  pub longitude: f64,
  #[serde(rename = "GPSTrueCourse")]
  pub true_course: f64,
  #[serde(rename = "BaroPressureAltitude")]
  pub pressure_altitude: f64,
  #[serde(rename = "GPSGroundSpeed", default)]
  pub ground_speed: f64,
  #[serde(rename = "GPSAltitudeMSL", default)]
  pub altitude_msl: f64,
  #[serde(rename = "AHRSPitch", default)]
  pub pitch: f64,
  #[serde(rename = "AHRSRoll", default)]
  pub roll: f64,
  #[serde(rename = "AHRSGyroHeading", default)]
  pub gyro_heading: f64,
  #[serde(rename = "AHRSSlipSkid", default)]
  pub slip_skid: f64,
  #[serde(rename = "AHRSStatus", default)]
  pub ahrs_status: u32,
}

impl SituationReport {
  /// An IMU is present when bit 1 of the AHRS status word is set.
  pub fn ahrs_sensor(&self) -> bool {
    self.ahrs_status & 0x02 != 0
  }
}

/// One aircraft report from the radar endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrafficReport {
  #[serde(rename = "Icao_addr")]
  pub icao: u32,
  #[serde(rename = "Age", default)]
  pub age: f64,
  #[serde(rename = "AgeLastAlt", default)]
  pub age_last_alt: f64,
  #[serde(rename = "Alt", default)]
  pub altitude: f64,
  #[serde(rename = "Speed_valid", default)]
  pub speed_valid: bool,
  #[serde(rename = "Speed", default)]
  pub speed: f64,
  #[serde(rename = "Vvel", default)]
  pub vertical_speed: f64,
  #[serde(rename = "Position_valid", default)]
  pub position_valid: bool,
  #[serde(rename = "Lat", default)]
  pub latitude: f64,
  #[serde(rename = "Lng", default)]
  pub longitude: f64,
  #[serde(rename = "Track")]
  pub track: Option<f64>,
  #[serde(rename = "DistanceEstimated", default)]
  pub distance_estimated: f64,
}

/// Scale update pushed over the radar feed when display settings change.
/// Either key may arrive alone; an absent one keeps its current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScaleControl {
  #[serde(rename = "RadarRange")]
  pub range: Option<u32>,
  #[serde(rename = "RadarLimits")]
  pub limits: Option<u32>,
}

/// The radar endpoint multiplexes three payload kinds over one stream.
#[derive(Debug)]
pub enum RadarMessage {
  Control(ScaleControl),
  Traffic(TrafficReport),
  /// Steering frames for other display types, nothing to do here.
  Steering,
}

pub fn parse_radar_message(raw: &str) -> serde_json::Result<RadarMessage> {
  let value: Value = serde_json::from_str(raw)?;
  if value.get("RadarRange").is_some() || value.get("RadarLimits").is_some() {
    return Ok(RadarMessage::Control(serde_json::from_value(value)?));
  }
  if value.get("Icao_addr").is_some() {
    return Ok(RadarMessage::Traffic(serde_json::from_value(value)?));
  }
  Ok(RadarMessage::Steering)
}

#[cfg(test)]
pub mod tests {
  use super::*;

  #[test]
  fn test_situation_payload() {
    let raw = r#"{
      "GPSLastFixSinceMidnightUTC": 32304.2, "GPSLatitude": 52.57154,
      "GPSLongitude": 13.32982, "GPSFixQuality": 1, "GPSSatellites": 10,
      "GPSHorizontalAccuracy": 8.5, "GPSAltitudeMSL": 183.2,
      "GPSTrueCourse": 45.6, "GPSGroundSpeed": 95.6,
      "BaroTemperature": 29.1, "BaroPressureAltitude": 1085.1,
      "AHRSPitch": -2.4, "AHRSRoll": 1.1, "AHRSGyroHeading": 187.2,
      "AHRSSlipSkid": -0.5, "AHRSStatus": 7
    }"#;
    let report: SituationReport = serde_json::from_str(raw).unwrap();
    assert_eq!(report.gps_horizontal_accuracy, 8.5);
    assert_eq!(report.latitude, 52.57154);
    assert_eq!(report.true_course, 45.6);
    assert_eq!(report.pressure_altitude, 1085.1);
    assert_eq!(report.pitch, -2.4);
    assert!(report.ahrs_sensor());
  }

  #[test]
  fn test_situation_without_imu_fields() {
    let raw = r#"{
      "GPSLatitude": 52.0, "GPSLongitude": 13.0, "GPSHorizontalAccuracy": 12.0,
      "GPSTrueCourse": 0, "BaroPressureAltitude": 900
    }"#;
    let report: SituationReport = serde_json::from_str(raw).unwrap();
    assert_eq!(report.ahrs_status, 0);
    assert!(!report.ahrs_sensor());
  }

  #[test]
  fn test_situation_missing_core_fields_is_an_error() {
    assert!(serde_json::from_str::<SituationReport>("{}").is_err());
  }

  #[test]
  fn test_radar_traffic_payload() {
    let raw = r#"{
      "Icao_addr": 11400918, "Reg": "D-EXYZ", "Tail": "D-EXYZ",
      "Position_valid": true, "Lat": 52.6, "Lng": 13.4, "Alt": 3500,
      "Track": 180, "Speed": 120, "Speed_valid": true, "Vvel": 256,
      "Age": 1.35, "AgeLastAlt": 1.35, "DistanceEstimated": 2319.2
    }"#;
    let msg = parse_radar_message(raw).unwrap();
    match msg {
      RadarMessage::Traffic(report) => {
        assert_eq!(report.icao, 11400918);
        assert!(report.position_valid);
        assert_eq!(report.track, Some(180.0));
        assert_eq!(report.speed, 120.0);
      }
      other => panic!("expected traffic, got {other:?}"),
    }
  }

  #[test]
  fn test_radar_mode_s_payload_has_no_track() {
    let raw = r#"{
      "Icao_addr": 5000011, "Position_valid": false, "Alt": 5500,
      "Speed_valid": false, "Vvel": 0, "Age": 2.9, "AgeLastAlt": 2.9,
      "DistanceEstimated": 4223.0
    }"#;
    let msg = parse_radar_message(raw).unwrap();
    match msg {
      RadarMessage::Traffic(report) => {
        assert!(!report.position_valid);
        assert_eq!(report.track, None);
        assert_eq!(report.distance_estimated, 4223.0);
      }
      other => panic!("expected traffic, got {other:?}"),
    }
  }

  #[test]
  fn test_radar_control_payload() {
    let raw = r#"{"RadarRange": 10, "RadarLimits": 5000}"#;
    let msg = parse_radar_message(raw).unwrap();
    match msg {
      RadarMessage::Control(ctl) => {
        assert_eq!(ctl.range, Some(10));
        assert_eq!(ctl.limits, Some(5000));
      }
      other => panic!("expected control, got {other:?}"),
    }
  }

  #[test]
  fn test_radar_control_payload_with_one_key() {
    let msg = parse_radar_message(r#"{"RadarRange": 10}"#).unwrap();
    match msg {
      RadarMessage::Control(ctl) => {
        assert_eq!(ctl.range, Some(10));
        assert_eq!(ctl.limits, None);
      }
      other => panic!("expected control, got {other:?}"),
    }
  }

  #[test]
  fn test_radar_steering_payload_is_ignored() {
    let msg = parse_radar_message(r#"{"MedLevel": 3, "LowLevel": 1}"#).unwrap();
    assert!(matches!(msg, RadarMessage::Steering));
  }

  #[test]
  fn test_radar_malformed_payload_is_an_error() {
    assert!(parse_radar_message("not json at all").is_err());
    assert!(parse_radar_message(r#"{"RadarRange": "wide"}"#).is_err());
  }
}
