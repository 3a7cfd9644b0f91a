use log::{debug, error};
use reqwest::Client;
use serde_json::json;

/// Pushes display scale changes back to the sensor, which echoes them on
/// the radar feed for every connected display.
pub trait SettingsPush: Send + Sync {
  fn push(&self, range: u32, limits: u32);
}

/// Fire and forget POST against the sensor's settings endpoint.
pub struct HttpSettings {
  url: String,
}

impl HttpSettings {
  pub fn new(url: &str) -> Self {
    Self {
      url: url.to_owned(),
    }
  }
}

impl SettingsPush for HttpSettings {
  fn push(&self, range: u32, limits: u32) {
    let url = self.url.clone();
    tokio::spawn(async move {
      debug!("pushing scale {range} nm / {limits} ft to {url}");
      let client = Client::new();
      let body = json!({"RadarRange": range, "RadarLimits": limits});
      let res = client.post(&url).json(&body).send().await;
      if let Err(err) = res {
        error!("error pushing settings: {err}");
      }
    });
  }
}
