pub mod ahrs;
pub mod shutdown;
pub mod timer;

/// Display modes the button handlers cycle through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Radar,
  Timer,
  Shutdown,
  /// One full-panel refresh, then straight back to radar.
  Refresh,
  Ahrs,
}

/// Selectable range rings, nautical miles.
pub const RANGES: [u32; 4] = [2, 5, 10, 40];
/// Selectable altitude windows, feet.
pub const LIMITS: [u32; 5] = [1000, 2000, 5000, 10000, 50000];

/// Next value in a cycle of steps, falling back to the first entry when
/// the current value is not in the list.
pub fn next_step(steps: &[u32], current: u32) -> u32 {
  match steps.iter().position(|s| *s == current) {
    Some(idx) => steps[(idx + 1) % steps.len()],
    None => steps[0],
  }
}
