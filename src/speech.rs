use log::info;

/// A voice alert for one nearby aircraft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficCall {
  /// Relative altitude in hundreds of feet.
  pub height: i32,
  /// Clock position, absent for range-only contacts.
  pub oclock: Option<u8>,
}

impl TrafficCall {
  pub fn phrase(&self) -> String {
    let mut phrase = String::from("Traffic ");
    if let Some(oclock) = self.oclock {
      phrase.push_str(&format!("{oclock} o'clock "));
    }
    let sign = if self.height < 0 { "minus" } else { "plus" };
    phrase.push_str(&format!("{sign} {} feet", (self.height * 100).abs()));
    phrase
  }
}

/// Sink for spoken announcements.
pub trait SpeechOutput: Send + Sync {
  fn speak(&self, phrase: &str);

  /// Paired audio devices currently reachable.
  fn connected_devices(&self) -> usize {
    0
  }
}

/// Logs phrases instead of speaking them, for setups without an audio
/// stack attached.
pub struct ConsoleSpeech;

impl SpeechOutput for ConsoleSpeech {
  fn speak(&self, phrase: &str) {
    info!("speech: {phrase}");
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;

  #[test]
  fn test_phrase_with_clock_position() {
    let call = TrafficCall {
      height: 5,
      oclock: Some(3),
    };
    assert_eq!(call.phrase(), "Traffic 3 o'clock plus 500 feet");
  }

  #[test]
  fn test_phrase_below_own_level() {
    let call = TrafficCall {
      height: -12,
      oclock: Some(11),
    };
    assert_eq!(call.phrase(), "Traffic 11 o'clock minus 1200 feet");
  }

  #[test]
  fn test_phrase_without_clock_position() {
    let call = TrafficCall {
      height: 0,
      oclock: None,
    };
    assert_eq!(call.phrase(), "Traffic plus 0 feet");
  }
}
