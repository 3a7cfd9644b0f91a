use crate::{config, geo::ScreenPos};
use log::{debug, info};
use std::{
  error::Error,
  fmt::{Debug, Display},
  time::Duration,
};

#[derive(Debug)]
pub enum DisplayError {
  UnknownDevice(String),
}

impl Display for DisplayError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DisplayError::UnknownDevice(name) => write!(f, "Unknown display device {name}"),
    }
  }
}

impl Error for DisplayError {}

/// Pixel layout and timing of the attached panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenGeometry {
  /// Usable extent of the square drawing area in pixels.
  pub max_pixel: i32,
  pub zero_x: i32,
  pub zero_y: i32,
  /// Measured time a full panel update takes.
  pub refresh: Duration,
}

impl ScreenGeometry {
  fn half_extent(&self) -> f64 {
    self.max_pixel as f64 / 2.0
  }

  /// Pixel length of a distance at the given range scale.
  pub fn scaled_px(&self, distance_nm: f64, range: u32) -> i32 {
    (self.half_extent() * distance_nm / range as f64).round() as i32
  }

  /// Projects a relative bearing and distance onto the screen, own ship at
  /// the zero point, course up.
  pub fn project(&self, relative_bearing: f64, distance_nm: f64, range: u32) -> ScreenPos {
    let rad = relative_bearing.to_radians();
    let scale = self.half_extent() / range as f64;
    ScreenPos {
      x: self.zero_x + (rad.sin() * distance_nm * scale).round() as i32,
      y: self.zero_y - (rad.cos() * distance_nm * scale).round() as i32,
    }
  }
}

/// Fixed chrome around the radar picture: scale, own altitude, status.
#[derive(Debug, Clone, PartialEq)]
pub struct SituationView {
  pub connected: bool,
  pub gps_valid: bool,
  pub own_altitude: f64,
  pub course: i32,
  pub range: u32,
  pub limits: u32,
  pub gps_accuracy: f64,
  pub devices: usize,
  pub sound_on: bool,
}

/// One positional aircraft symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AircraftSprite {
  pub pos: ScreenPos,
  /// Track relative to own course, degrees.
  pub direction: i32,
  /// Relative altitude in hundreds of feet.
  pub height: i32,
  /// Vertical speed in feet per minute.
  pub vspeed: f64,
  /// Speed vector length in pixels.
  pub vector_len: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
  pub utc: String,
  pub remaining: String,
  pub running: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AhrsView {
  pub pitch: f64,
  pub roll: f64,
  pub heading: f64,
  pub slip_skid: f64,
  pub gps_speed: f64,
  pub gps_altitude: f64,
  pub banner: Option<&'static str>,
}

/// Everything a panel driver has to provide. Draw calls build up a frame,
/// `commit` pushes it out.
pub trait DisplayControl: Send {
  fn geometry(&self) -> ScreenGeometry;

  /// True while the panel is still busy with the previous update.
  fn is_busy(&self) -> bool;

  fn startup(&mut self, version: &str, target: &str);

  fn clear(&mut self);

  fn situation(&mut self, view: &SituationView);

  fn aircraft(&mut self, sprite: &AircraftSprite);

  /// Range-only contact: an arc segment at the estimated distance.
  fn modes_aircraft(&mut self, radius: i32, height: i32, arc_deg: i32);

  fn timer(&mut self, view: &TimerView);

  fn ahrs(&mut self, view: &AhrsView);

  fn shutdown_notice(&mut self, remaining_secs: i64);

  fn commit(&mut self);

  /// Full panel refresh, clears ghosting on e-paper.
  fn refresh(&mut self);

  fn cleanup(&mut self);
}

/// Driver that draws into the log only. Keeps the whole pipeline runnable
/// on machines without a panel attached.
pub struct HeadlessDisplay {
  geometry: ScreenGeometry,
}

impl HeadlessDisplay {
  pub fn new(cfg: &config::Screen) -> Self {
    let size = cfg.size as i32;
    Self {
      geometry: ScreenGeometry {
        max_pixel: size,
        zero_x: size / 2,
        zero_y: size / 2,
        refresh: cfg.refresh,
      },
    }
  }
}

impl DisplayControl for HeadlessDisplay {
  fn geometry(&self) -> ScreenGeometry {
    self.geometry
  }

  fn is_busy(&self) -> bool {
    false
  }

  fn startup(&mut self, version: &str, target: &str) {
    info!("radarscope {version} looking for {target}");
  }

  fn clear(&mut self) {}

  fn situation(&mut self, view: &SituationView) {
    debug!(
      "chrome: connected={} gps={} range={} limits={} course={}",
      view.connected, view.gps_valid, view.range, view.limits, view.course
    );
  }

  fn aircraft(&mut self, sprite: &AircraftSprite) {
    debug!(
      "aircraft at ({}, {}) heading {} height {}",
      sprite.pos.x, sprite.pos.y, sprite.direction, sprite.height
    );
  }

  fn modes_aircraft(&mut self, radius: i32, height: i32, arc_deg: i32) {
    debug!("range circle r={radius} height={height} arc={arc_deg}");
  }

  fn timer(&mut self, view: &TimerView) {
    debug!("timer {} utc {}", view.remaining, view.utc);
  }

  fn ahrs(&mut self, view: &AhrsView) {
    debug!(
      "ahrs pitch={:.1} roll={:.1} banner={:?}",
      view.pitch, view.roll, view.banner
    );
  }

  fn shutdown_notice(&mut self, remaining_secs: i64) {
    debug!("shutdown in {remaining_secs}");
  }

  fn commit(&mut self) {}

  fn refresh(&mut self) {}

  fn cleanup(&mut self) {
    info!("display released");
  }
}

pub fn open_device(cfg: &config::Screen) -> Result<Box<dyn DisplayControl>, DisplayError> {
  match cfg.device.as_str() {
    "headless" => Ok(Box::new(HeadlessDisplay::new(cfg))),
    other => Err(DisplayError::UnknownDevice(other.to_owned())),
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;

  fn screen() -> ScreenGeometry {
    ScreenGeometry {
      max_pixel: 480,
      zero_x: 240,
      zero_y: 240,
      refresh: Duration::from_millis(100),
    }
  }

  #[test]
  fn test_project_dead_ahead() {
    let pos = screen().project(0.0, 3.0, 5);
    assert_eq!(pos, ScreenPos { x: 240, y: 96 });
  }

  #[test]
  fn test_project_right_abeam() {
    let pos = screen().project(90.0, 2.5, 5);
    assert_eq!(pos, ScreenPos { x: 360, y: 240 });
  }

  #[test]
  fn test_project_range_ring_is_screen_edge() {
    let pos = screen().project(180.0, 5.0, 5);
    assert_eq!(pos, ScreenPos { x: 240, y: 480 });
  }

  #[test]
  fn test_scaled_px() {
    assert_eq!(screen().scaled_px(2.0, 5), 96);
    assert_eq!(screen().scaled_px(0.0, 5), 0);
    assert_eq!(screen().scaled_px(5.0, 5), 240);
  }

  #[test]
  fn test_open_device() {
    assert!(open_device(&config::Screen::default()).is_ok());
    let mut bad = config::Screen::default();
    bad.device = "epaper_9in9".to_owned();
    assert!(open_device(&bad).is_err());
  }
}
