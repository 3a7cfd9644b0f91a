use crate::display::TimerView;
use chrono::{DateTime, Duration, Utc};
use std::time::Duration as StdDuration;

/// Countdown timer state. All methods take the current instant so the
/// logic stays clock-free and testable.
#[derive(Debug)]
pub struct TimerState {
  preset: Duration,
  /// Remaining time while stopped.
  left: Duration,
  /// Expiry instant while running.
  deadline: Option<DateTime<Utc>>,
  announced: bool,
  last_drawn: Option<i64>,
}

impl TimerState {
  pub fn new(preset: StdDuration) -> Self {
    let preset = Duration::from_std(preset).unwrap_or_else(|_| Duration::seconds(300));
    Self {
      preset,
      left: preset,
      deadline: None,
      announced: false,
      last_drawn: None,
    }
  }

  pub fn is_running(&self) -> bool {
    self.deadline.is_some()
  }

  /// Start when stopped, stop when running. Starting an expired timer does
  /// nothing until it is reset.
  pub fn toggle(&mut self, now: DateTime<Utc>) {
    match self.deadline.take() {
      Some(deadline) => {
        self.left = (deadline - now).max(Duration::zero());
      }
      None => {
        if self.left > Duration::zero() {
          self.deadline = Some(now + self.left);
        }
      }
    }
  }

  /// Back to the full preset; a running timer restarts from it.
  pub fn reset(&mut self, now: DateTime<Utc>) {
    self.left = self.preset;
    self.announced = false;
    if self.deadline.is_some() {
      self.deadline = Some(now + self.preset);
    }
  }

  pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
    match self.deadline {
      Some(deadline) => (deadline - now).max(Duration::zero()),
      None => self.left,
    }
  }

  /// True exactly once when a running countdown reaches zero.
  pub fn just_expired(&mut self, now: DateTime<Utc>) -> bool {
    if self.is_running() && self.remaining(now) == Duration::zero() && !self.announced {
      self.announced = true;
      true
    } else {
      false
    }
  }

  /// View for the current second, or nothing when the drawn second has not
  /// changed yet.
  pub fn render(&mut self, now: DateTime<Utc>, force: bool) -> Option<TimerView> {
    let stamp = now.timestamp();
    if !force && self.last_drawn == Some(stamp) {
      return None;
    }
    self.last_drawn = Some(stamp);
    let secs = self.remaining(now).num_seconds();
    Some(TimerView {
      utc: now.format("%H:%M:%S").to_string(),
      remaining: format!("{:02}:{:02}", secs / 60, secs % 60),
      running: self.is_running(),
    })
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;

  fn state() -> TimerState {
    TimerState::new(StdDuration::from_secs(300))
  }

  #[test]
  fn test_starts_stopped_at_preset() {
    let timer = state();
    assert!(!timer.is_running());
    assert_eq!(timer.remaining(Utc::now()).num_seconds(), 300);
  }

  #[test]
  fn test_toggle_runs_and_freezes() {
    let t0 = Utc::now();
    let mut timer = state();
    timer.toggle(t0);
    assert!(timer.is_running());
    assert_eq!(timer.remaining(t0 + Duration::seconds(30)).num_seconds(), 270);

    timer.toggle(t0 + Duration::seconds(30));
    assert!(!timer.is_running());
    assert_eq!(timer.remaining(t0 + Duration::seconds(100)).num_seconds(), 270);

    timer.toggle(t0 + Duration::seconds(100));
    assert_eq!(timer.remaining(t0 + Duration::seconds(160)).num_seconds(), 210);
  }

  #[test]
  fn test_reset_restores_preset() {
    let t0 = Utc::now();
    let mut timer = state();
    timer.toggle(t0);
    timer.reset(t0 + Duration::seconds(60));
    assert!(timer.is_running());
    assert_eq!(timer.remaining(t0 + Duration::seconds(60)).num_seconds(), 300);
  }

  #[test]
  fn test_expiry_announced_once() {
    let t0 = Utc::now();
    let mut timer = state();
    timer.toggle(t0);
    assert!(!timer.just_expired(t0 + Duration::seconds(299)));
    assert!(timer.just_expired(t0 + Duration::seconds(301)));
    assert!(!timer.just_expired(t0 + Duration::seconds(302)));

    timer.reset(t0 + Duration::seconds(310));
    assert!(!timer.just_expired(t0 + Duration::seconds(310)));
  }

  #[test]
  fn test_expired_timer_needs_reset_to_restart() {
    let t0 = Utc::now();
    let mut timer = state();
    timer.toggle(t0);
    timer.toggle(t0 + Duration::seconds(400));
    assert_eq!(timer.remaining(t0 + Duration::seconds(400)).num_seconds(), 0);
    timer.toggle(t0 + Duration::seconds(401));
    assert!(!timer.is_running());
  }

  #[test]
  fn test_render_once_per_second() {
    let t0 = Utc::now();
    let mut timer = state();
    let first = timer.render(t0, false);
    assert!(first.is_some());
    assert_eq!(first.unwrap().remaining, "05:00");
    assert!(timer.render(t0, false).is_none());
    assert!(timer.render(t0, true).is_some());
    assert!(timer.render(t0 + Duration::seconds(1), false).is_some());
  }
}
