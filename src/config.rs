use duration_str::deserialize_duration;
use log::LevelFilter;
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path, time::Duration};

#[derive(Deserialize, Debug, Clone)]
pub struct Sensor {
  pub host: String,
  #[serde(deserialize_with = "deserialize_duration")]
  pub retry: Duration,
  #[serde(deserialize_with = "deserialize_duration")]
  pub reopen: Duration,
}

impl Default for Sensor {
  fn default() -> Self {
    Self {
      host: "192.168.10.1".to_owned(),
      retry: Duration::from_secs(1),
      reopen: Duration::from_secs(1),
    }
  }
}

impl Sensor {
  pub fn situation_url(&self) -> String {
    format!("ws://{}/situation", self.host)
  }

  pub fn radar_url(&self) -> String {
    format!("ws://{}/radar", self.host)
  }

  pub fn settings_url(&self) -> String {
    format!("http://{}/setSettings", self.host)
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Screen {
  pub device: String,
  pub size: u32,
  #[serde(deserialize_with = "deserialize_duration")]
  pub refresh: Duration,
}

impl Default for Screen {
  fn default() -> Self {
    Self {
      device: "headless".to_owned(),
      size: 480,
      refresh: Duration::from_millis(500),
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Speech {
  pub enabled: bool,
}

impl Default for Speech {
  fn default() -> Self {
    Self { enabled: false }
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Timer {
  #[serde(deserialize_with = "deserialize_duration")]
  pub preset: Duration,
}

impl Default for Timer {
  fn default() -> Self {
    Self {
      preset: Duration::from_secs(300),
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
  pub level: LevelFilter,
}

impl Default for Log {
  fn default() -> Self {
    Self {
      level: LevelFilter::Debug,
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
  pub log: Log,
  pub sensor: Sensor,
  pub screen: Screen,
  pub speech: Speech,
  pub timer: Timer,
}

pub fn read_config(filename: Option<&str>) -> Config {
  let mut filenames = vec!["./radarscope.toml", "/etc/radarscope.toml"];
  if let Some(filename) = filename {
    filenames.insert(0, filename);
  }

  for fname in filenames {
    let path = Path::new(fname);
    println!("Trying config file {}...", fname);
    if path.is_file() {
      let res = File::open(path);
      if let Err(err) = res {
        println!("Error opening config file {}: {}", fname, err);
        continue;
      }
      let mut f = res.unwrap();
      let mut config_raw = String::new();
      let res = f.read_to_string(&mut config_raw);
      if let Err(err) = res {
        println!("Error reading config file {}: {}", fname, err);
        continue;
      }
      let res: Result<Config, toml::de::Error> = toml::from_str(&config_raw);
      if let Err(err) = res {
        println!("Error parsing config file {}: {}", fname, err);
        continue;
      }
      return res.unwrap();
    }
    println!("Config file {} does not exist", fname);
  }
  println!("No config files can be read, using default settings");
  Default::default()
}
