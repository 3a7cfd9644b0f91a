#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
  Left,
  Middle,
  Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPress {
  pub button: Button,
  /// Held past the long-press threshold.
  pub long: bool,
}

/// Non-blocking source of button presses, polled on the UI cadence.
pub trait InputSource: Send {
  fn poll(&mut self) -> Option<ButtonPress>;
}

/// Input source for setups without physical buttons.
pub struct NullInput;

impl InputSource for NullInput {
  fn poll(&mut self) -> Option<ButtonPress> {
    None
  }
}
