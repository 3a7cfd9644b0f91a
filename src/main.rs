use clap::Parser;
use log::info;
use radarscope::{
  config::read_config,
  display,
  input::NullInput,
  scope::{RadarFeed, Scope, SituationFeed},
  sensor::{run_feed, settings::HttpSettings},
  speech::ConsoleSpeech,
  ui::{shutdown::PowerOffCommand, Mode},
};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;

const VERSION: &str = env!("CARGO_PKG_VERSION");
/// How long the startup panel stays up before the first live frame.
const STARTUP_HOLD: Duration = Duration::from_secs(4);

/// Traffic awareness display fed by a connected situation sensor.
#[derive(Parser, Debug)]
struct Args {
  /// Configuration file to try before the usual locations
  #[arg(long)]
  config: Option<String>,
  /// Display device to draw on
  #[arg(short, long)]
  device: Option<String>,
  /// Speak traffic alerts
  #[arg(short, long)]
  speak: bool,
  /// Start on the timer panel
  #[arg(short, long)]
  timer: bool,
  /// Sensor host to connect to
  #[arg(short, long)]
  connect: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let args = Args::parse();
  let mut config = read_config(args.config.as_deref());
  if let Some(device) = args.device {
    config.screen.device = device;
  }
  if args.speak {
    config.speech.enabled = true;
  }
  if let Some(host) = args.connect {
    config.sensor.host = host;
  }

  TermLogger::init(
    config.log.level,
    Config::default(),
    TerminalMode::Stdout,
    ColorChoice::Always,
  )
  .unwrap();

  info!("starting radarscope version {}", VERSION);
  let mut display = display::open_device(&config.screen)?;
  let geometry = display.geometry();
  display.startup(VERSION, &config.sensor.host);
  sleep(STARTUP_HOLD).await;

  let initial_mode = if args.timer { Mode::Timer } else { Mode::Radar };
  let scope = Scope::new(
    config.clone(),
    geometry,
    initial_mode,
    Box::new(ConsoleSpeech),
    Box::new(HttpSettings::new(&config.sensor.settings_url())),
    Box::new(PowerOffCommand),
  );
  let scope = Arc::new(scope);

  let situation_handle = {
    let scope = scope.clone();
    tokio::spawn(run_feed(
      config.sensor.situation_url(),
      "situation",
      config.sensor.retry,
      config.sensor.reopen,
      SituationFeed(scope),
    ))
  };
  let radar_handle = {
    let scope = scope.clone();
    tokio::spawn(run_feed(
      config.sensor.radar_url(),
      "radar",
      config.sensor.retry,
      config.sensor.reopen,
      RadarFeed(scope),
    ))
  };
  let input_handle = {
    let scope = scope.clone();
    tokio::spawn(async move { scope.run_input(Box::new(NullInput)).await })
  };
  let mut display_handle = {
    let scope = scope.clone();
    tokio::spawn(async move { scope.run_display(display).await })
  };

  tokio::select! {
    _ = tokio::signal::ctrl_c() => {
      info!("interrupted, shutting down");
    }
    _ = &mut display_handle => {}
  }

  scope.request_quit();
  sleep(geometry.refresh * 2).await;
  situation_handle.abort();
  radar_handle.abort();
  input_handle.abort();
  if !display_handle.is_finished() {
    let _ = display_handle.await;
  }
  info!("stopped");
  Ok(())
}
