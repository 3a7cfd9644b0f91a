use crate::{
  display::ScreenGeometry,
  geo::{self, Point},
  ownship::Ownship,
  sensor::wire::TrafficReport,
  speech::TrafficCall,
};
use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;

pub mod track;

use track::{Track, TrackKind};

/// Contacts silent for longer than this are dropped from the picture.
pub const CONTACT_CUTOFF_SECS: i64 = 29;
/// Arc slots rotate by this much between range-only contacts.
const ARC_STEP_DEG: i32 = 210;
/// Slots in [ARC_EXCLUDE_FROM, ARC_EXCLUDE_TO) would collide with the
/// fixed chrome at the bottom of the picture.
const ARC_EXCLUDE_FROM: i32 = 130;
const ARC_EXCLUDE_TO: i32 = 230;
/// Look-ahead the drawn speed vector represents, seconds.
const SPEED_VECTOR_SECS: f64 = 60.0;

/// All currently known contacts plus the rotating arc slot pointer.
#[derive(Debug, Default)]
pub struct TrafficTable {
  tracks: HashMap<u32, Track>,
  last_arc: i32,
}

impl TrafficTable {
  pub fn len(&self) -> usize {
    self.tracks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tracks.is_empty()
  }

  pub fn get(&self, icao: u32) -> Option<&Track> {
    self.tracks.get(&icao)
  }

  /// Forgets everything. Used when the display scale changes, geometry
  /// computed under the old scale would be misleading.
  pub fn clear(&mut self) {
    self.tracks.clear();
  }

  fn next_arc(&mut self) -> i32 {
    self.last_arc = (self.last_arc + ARC_STEP_DEG) % 360;
    if (ARC_EXCLUDE_FROM..ARC_EXCLUDE_TO).contains(&self.last_arc) {
      self.last_arc = (self.last_arc + ARC_STEP_DEG) % 360;
    }
    self.last_arc
  }

  /// Folds one aircraft report into the table and classifies the contact.
  ///
  /// A report with a valid position (and a usable own fix) becomes a
  /// positional contact; otherwise the distance estimate places it on an
  /// arc. Reports providing neither leave the table untouched. Returns a
  /// voice alert when the contact just crossed inside half the range.
  pub fn ingest(
    &mut self,
    report: &TrafficReport,
    own: &Ownship,
    screen: &ScreenGeometry,
    now: DateTime<Utc>,
  ) -> Option<TrafficCall> {
    let positional = report.position_valid && own.gps_valid;
    if !positional && (report.distance_estimated == 0.0 || report.altitude == 0.0) {
      return None;
    }

    // arc slot is settled before the entry borrow; existing range-only
    // contacts keep theirs
    let arc_deg = if positional {
      0
    } else {
      match self.tracks.get(&report.icao).map(|t| t.kind) {
        Some(TrackKind::RangeOnly { arc_deg, .. }) => arc_deg,
        _ => self.next_arc(),
      }
    };

    let track = self
      .tracks
      .entry(report.icao)
      .or_insert_with(|| Track::new(report.icao, now));
    let age = report.age.min(report.age_last_alt);
    track.last_contact = now - Duration::milliseconds((age * 1000.0) as i64);
    track.height = ((report.altitude - own.altitude) / 100.0).round() as i32;
    if report.speed_valid {
      track.nspeed = Some(report.speed);
    }
    track.vspeed = report.vertical_speed;

    let range = own.range as f64;
    if positional {
      let target = Point {
        lat: report.latitude,
        lng: report.longitude,
      };
      let (distance, bearing) = geo::polar_from(own.position(), target);
      let rel = geo::wrap_deg(bearing - own.course as f64);
      debug!(
        "contact {:06x} at {distance:.1} nm bearing {rel:.0}",
        report.icao
      );
      track.gps_distance = distance;

      let direction = match report.track {
        Some(t) => Some(geo::wrap_deg(t - own.course as f64).round() as i32),
        None => track.direction(),
      };
      let within = distance <= range && track.height.abs() <= own.limits as i32 / 100;
      let vector_len = if within {
        track
          .nspeed
          .map(|kt| screen.scaled_px(kt * SPEED_VECTOR_SECS / 3600.0, own.range))
      } else {
        track.vector_len()
      };
      track.kind = TrackKind::Positional {
        screen: within.then(|| screen.project(rel, distance, own.range)),
        direction,
        vector_len,
      };
      alert(track, distance, range, Some(geo::clock_position(rel)))
    } else {
      let distance = report.distance_estimated / geo::METERS_PER_NM;
      debug!("contact {:06x} within {distance:.1} nm", report.icao);
      track.gps_distance = distance;
      track.kind = TrackKind::RangeOnly {
        radius_px: screen.scaled_px(distance, own.range),
        arc_deg,
      };
      alert(track, distance, range, None)
    }
  }

  /// Drops contacts not heard from within the cutoff. Returns how many
  /// went away.
  pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
    let cutoff = now - Duration::seconds(CONTACT_CUTOFF_SECS);
    let before = self.tracks.len();
    self.tracks.retain(|icao, track| {
      let keep = track.last_contact >= cutoff;
      if !keep {
        debug!("contact {icao:06x} faded");
      }
      keep
    });
    before - self.tracks.len()
  }

  /// Contacts ordered farthest first, so closer ones draw on top.
  pub fn by_descending_distance(&self) -> Vec<&Track> {
    let mut tracks: Vec<&Track> = self.tracks.values().collect();
    tracks.sort_by(|a, b| {
      b.gps_distance
        .partial_cmp(&a.gps_distance)
        .unwrap_or(std::cmp::Ordering::Equal)
    });
    tracks
  }
}

/// Speak once crossing inside half range, rearm only after the contact has
/// been out past three quarters of it. Keeps range jitter from chattering.
fn alert(track: &mut Track, distance: f64, range: f64, oclock: Option<u8>) -> Option<TrafficCall> {
  if distance <= range / 2.0 {
    if !track.was_spoken {
      track.was_spoken = true;
      return Some(TrafficCall {
        height: track.height,
        oclock,
      });
    }
  } else if distance >= range * 0.75 {
    track.was_spoken = false;
  }
  None
}
