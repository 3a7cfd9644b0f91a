use crate::geo::ScreenPos;
use chrono::{DateTime, Utc};

/// How a contact is drawn, depending on what its reports carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackKind {
  /// Nothing placeable received yet.
  Unclassified,
  /// Position known, drawn as an aircraft symbol. `screen` is empty while
  /// the contact sits outside the configured range or altitude window.
  Positional {
    screen: Option<ScreenPos>,
    direction: Option<i32>,
    vector_len: Option<i32>,
  },
  /// Distance estimate only, drawn as an arc at the matching radius.
  RangeOnly { radius_px: i32, arc_deg: i32 },
}

/// One aircraft as the table tracks it.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
  pub icao: u32,
  pub last_contact: DateTime<Utc>,
  /// Altitude relative to own ship, hundreds of feet.
  pub height: i32,
  /// Last known horizontal speed, knots.
  pub nspeed: Option<f64>,
  /// Vertical speed, feet per minute.
  pub vspeed: f64,
  /// Distance in nautical miles, estimated for range-only contacts.
  pub gps_distance: f64,
  pub was_spoken: bool,
  pub kind: TrackKind,
}

impl Track {
  pub fn new(icao: u32, now: DateTime<Utc>) -> Self {
    Self {
      icao,
      last_contact: now,
      height: 0,
      nspeed: None,
      vspeed: 0.0,
      gps_distance: 0.0,
      was_spoken: false,
      kind: TrackKind::Unclassified,
    }
  }

  pub fn is_range_only(&self) -> bool {
    matches!(self.kind, TrackKind::RangeOnly { .. })
  }

  /// Relative track direction, carried across reports that omit it.
  pub fn direction(&self) -> Option<i32> {
    match self.kind {
      TrackKind::Positional { direction, .. } => direction,
      _ => None,
    }
  }

  /// Last drawn speed vector length, carried the same way.
  pub fn vector_len(&self) -> Option<i32> {
    match self.kind {
      TrackKind::Positional { vector_len, .. } => vector_len,
      _ => None,
    }
  }
}
