use chrono::{DateTime, Duration, Utc};
use log::{error, info};
use std::process::Command;

/// Grace period between entering shutdown mode and powering off.
pub const SHUTDOWN_WAIT_SECS: i64 = 6;

/// Lets the display power the host machine down.
pub trait HostControl: Send + Sync {
  fn power_off(&self);
}

/// Shells out the way a headless flight box expects.
pub struct PowerOffCommand;

impl HostControl for PowerOffCommand {
  fn power_off(&self) {
    let res = Command::new("sudo")
      .args(["shutdown", "--poweroff", "now"])
      .status();
    if let Err(err) = res {
      error!("error invoking poweroff: {err}");
    }
  }
}

/// Countdown towards power-off, cancellable by any button.
#[derive(Debug, Default)]
pub struct ShutdownState {
  deadline: Option<DateTime<Utc>>,
  power_off_pending: bool,
}

impl ShutdownState {
  /// Arms the countdown once; later calls while armed do nothing.
  pub fn arm(&mut self, now: DateTime<Utc>) {
    if self.deadline.is_none() {
      info!("shutdown countdown armed");
      self.deadline = Some(now + Duration::seconds(SHUTDOWN_WAIT_SECS));
    }
  }

  pub fn disarm(&mut self) {
    self.deadline = None;
    self.power_off_pending = false;
  }

  /// Seconds left on the countdown, clamped at zero.
  pub fn remaining(&self, now: DateTime<Utc>) -> Option<i64> {
    self.deadline.map(|d| (d - now).num_seconds().max(0))
  }

  pub fn expired(&self, now: DateTime<Utc>) -> bool {
    matches!(self.deadline, Some(d) if now > d)
  }

  pub fn request_power_off(&mut self) {
    self.power_off_pending = true;
  }

  /// Consumes the pending power-off request.
  pub fn take_power_off(&mut self) -> bool {
    std::mem::take(&mut self.power_off_pending)
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;

  #[test]
  fn test_arm_once_and_count_down() {
    let t0 = Utc::now();
    let mut state = ShutdownState::default();
    assert_eq!(state.remaining(t0), None);

    state.arm(t0);
    assert_eq!(state.remaining(t0), Some(6));
    assert_eq!(state.remaining(t0 + Duration::seconds(2)), Some(4));
    assert_eq!(state.remaining(t0 + Duration::seconds(10)), Some(0));

    // re-arming while armed must not push the deadline out
    state.arm(t0 + Duration::seconds(5));
    assert_eq!(state.remaining(t0 + Duration::seconds(5)), Some(1));
  }

  #[test]
  fn test_expiry_and_cancel() {
    let t0 = Utc::now();
    let mut state = ShutdownState::default();
    state.arm(t0);
    assert!(!state.expired(t0 + Duration::seconds(5)));
    assert!(state.expired(t0 + Duration::seconds(7)));

    state.disarm();
    assert!(!state.expired(t0 + Duration::seconds(7)));
    assert_eq!(state.remaining(t0), None);
  }

  #[test]
  fn test_power_off_request_is_consumed_once() {
    let mut state = ShutdownState::default();
    assert!(!state.take_power_off());
    state.request_power_off();
    assert!(state.take_power_off());
    assert!(!state.take_power_off());
  }

  #[test]
  fn test_disarm_clears_pending_power_off() {
    let mut state = ShutdownState::default();
    state.request_power_off();
    state.disarm();
    assert!(!state.take_power_off());
  }
}
