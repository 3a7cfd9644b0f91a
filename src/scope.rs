use crate::{
  config::Config,
  display::{AircraftSprite, DisplayControl, ScreenGeometry, SituationView},
  input::{Button, ButtonPress, InputSource},
  ownship::Ownship,
  sensor::{settings::SettingsPush, wire, FeedConsumer},
  speech::SpeechOutput,
  traffic::{track::TrackKind, TrafficTable},
  ui::{
    self,
    ahrs,
    shutdown::{HostControl, ShutdownState},
    timer::TimerState,
    Mode,
  },
};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use std::{
  sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
  },
  time::Duration,
};
use tokio::{
  sync::RwLock,
  time::{sleep, Instant},
};

/// Button poll cadence.
const UI_TICK: Duration = Duration::from_millis(100);
/// Pause between drawn frames.
const DRAW_PAUSE: Duration = Duration::from_millis(200);
/// How often the paired audio device count is rechecked.
const DEVICE_CHECK_EVERY: Duration = Duration::from_secs(3);

/// Shared hub every task works against: own-ship state, the traffic
/// picture, the active mode and the attached peripherals.
///
/// Lock order where both are held: ownship before traffic.
pub struct Scope {
  cfg: Config,
  screen: ScreenGeometry,

  ownship: RwLock<Ownship>,
  traffic: RwLock<TrafficTable>,
  mode: RwLock<Mode>,
  timer: RwLock<TimerState>,
  shutdown: RwLock<ShutdownState>,

  speech: Box<dyn SpeechOutput>,
  settings: Box<dyn SettingsPush>,
  host: Box<dyn HostControl>,

  aircraft_changed: AtomicBool,
  ui_changed: AtomicBool,
  sound_on: AtomicBool,
  quit: AtomicBool,
  devices: AtomicUsize,
}

impl Scope {
  pub fn new(
    cfg: Config,
    screen: ScreenGeometry,
    initial_mode: Mode,
    speech: Box<dyn SpeechOutput>,
    settings: Box<dyn SettingsPush>,
    host: Box<dyn HostControl>,
  ) -> Self {
    let timer = TimerState::new(cfg.timer.preset);
    Self {
      cfg,
      screen,
      ownship: RwLock::new(Ownship::default()),
      traffic: RwLock::new(TrafficTable::default()),
      mode: RwLock::new(initial_mode),
      timer: RwLock::new(timer),
      shutdown: RwLock::new(ShutdownState::default()),
      speech,
      settings,
      host,
      aircraft_changed: AtomicBool::new(true),
      ui_changed: AtomicBool::new(true),
      sound_on: AtomicBool::new(true),
      quit: AtomicBool::new(false),
      devices: AtomicUsize::new(0),
    }
  }

  pub fn request_quit(&self) {
    self.quit.store(true, Ordering::Relaxed);
  }

  fn quitting(&self) -> bool {
    self.quit.load(Ordering::Relaxed)
  }

  fn speech_on(&self) -> bool {
    self.cfg.speech.enabled && self.sound_on.load(Ordering::Relaxed)
  }

  pub async fn handle_situation(&self, raw: &str) {
    let report = match serde_json::from_str::<wire::SituationReport>(raw) {
      Ok(report) => report,
      Err(err) => {
        warn!("skipping malformed situation message: {err}");
        return;
      }
    };
    self.ownship.write().await.apply(&report);
  }

  pub async fn handle_traffic(&self, raw: &str) {
    let msg = match wire::parse_radar_message(raw) {
      Ok(msg) => msg,
      Err(err) => {
        warn!("skipping malformed radar message: {err}");
        return;
      }
    };
    self.aircraft_changed.store(true, Ordering::Relaxed);
    match msg {
      wire::RadarMessage::Control(ctl) => {
        let (changed, range, limits) = {
          let mut own = self.ownship.write().await;
          let range = ctl.range.unwrap_or(own.range);
          let limits = ctl.limits.unwrap_or(own.limits);
          (own.set_scale(range, limits), range, limits)
        };
        if changed {
          self.traffic.write().await.clear();
          info!("scale changed to {range} nm / {limits} ft, the picture restarts");
        }
      }
      wire::RadarMessage::Traffic(report) => {
        let own = self.ownship.read().await.clone();
        let call = self
          .traffic
          .write()
          .await
          .ingest(&report, &own, &self.screen, Utc::now());
        if let Some(call) = call {
          if self.speech_on() {
            self.speech.speak(&call.phrase());
          }
        }
      }
      wire::RadarMessage::Steering => {}
    }
  }

  async fn radar_input(&self, press: ButtonPress) -> Option<Mode> {
    match (press.button, press.long) {
      (Button::Left, false) => {
        self.cycle_range().await;
        Some(Mode::Radar)
      }
      (Button::Left, true) => Some(Mode::Shutdown),
      (Button::Middle, false) => {
        self.cycle_limits().await;
        Some(Mode::Radar)
      }
      (Button::Middle, true) => {
        let on = !self.sound_on.load(Ordering::Relaxed);
        self.sound_on.store(on, Ordering::Relaxed);
        info!("sound {}", if on { "on" } else { "off" });
        Some(Mode::Radar)
      }
      (Button::Right, false) => Some(Mode::Timer),
      (Button::Right, true) => Some(Mode::Refresh),
    }
  }

  /// The sensor is the single source of truth for the scale; the local
  /// picture changes when it echoes the new values back.
  async fn cycle_range(&self) {
    let own = self.ownship.read().await;
    let range = ui::next_step(&ui::RANGES, own.range);
    info!("requesting range {range} nm");
    self.settings.push(range, own.limits);
  }

  async fn cycle_limits(&self) {
    let own = self.ownship.read().await;
    let limits = ui::next_step(&ui::LIMITS, own.limits);
    info!("requesting altitude window {limits} ft");
    self.settings.push(own.range, limits);
  }

  async fn timer_input(&self, press: ButtonPress) -> Option<Mode> {
    match (press.button, press.long) {
      (Button::Left, false) => {
        self.timer.write().await.reset(Utc::now());
        Some(Mode::Timer)
      }
      (Button::Left, true) => Some(Mode::Shutdown),
      (Button::Middle, false) => {
        self.timer.write().await.toggle(Utc::now());
        Some(Mode::Timer)
      }
      (Button::Middle, true) => None,
      (Button::Right, false) => Some(Mode::Ahrs),
      (Button::Right, true) => Some(Mode::Refresh),
    }
  }

  async fn ahrs_input(&self, press: ButtonPress) -> Option<Mode> {
    match (press.button, press.long) {
      (Button::Left, true) => Some(Mode::Shutdown),
      (Button::Right, false) => Some(Mode::Radar),
      (Button::Right, true) => Some(Mode::Refresh),
      _ => Some(Mode::Ahrs),
    }
  }

  /// Runs every tick while in shutdown mode: arms the countdown, cancels
  /// on any press, requests power-off once the deadline passes.
  async fn shutdown_input(&self, press: Option<ButtonPress>) -> Option<Mode> {
    let mut shutdown = self.shutdown.write().await;
    let now = Utc::now();
    shutdown.arm(now);
    if press.is_some() {
      shutdown.disarm();
      info!("shutdown cancelled");
      return Some(Mode::Radar);
    }
    if shutdown.expired(now) {
      shutdown.request_power_off();
    }
    None
  }

  pub async fn run_input(&self, mut input: Box<dyn InputSource>) {
    let mut last_device_check = Instant::now();
    loop {
      if self.quitting() {
        debug!("input loop done");
        return;
      }
      sleep(UI_TICK).await;

      let press = input.poll();
      let mode = *self.mode.read().await;
      let next = match mode {
        Mode::Shutdown => self.shutdown_input(press).await,
        // the display loop alone moves on from a refresh
        Mode::Refresh => None,
        _ => match press {
          Some(press) => match mode {
            Mode::Radar => self.radar_input(press).await,
            Mode::Timer => self.timer_input(press).await,
            Mode::Ahrs => self.ahrs_input(press).await,
            _ => None,
          },
          None => None,
        },
      };
      if let Some(next) = next {
        *self.mode.write().await = next;
        self.ui_changed.store(true, Ordering::Relaxed);
      }

      if self.cfg.speech.enabled && last_device_check.elapsed() >= DEVICE_CHECK_EVERY {
        last_device_check = Instant::now();
        self.check_devices();
      }
    }
  }

  /// Announces a newly paired audio device and refreshes the chrome.
  fn check_devices(&self) {
    let current = self.speech.connected_devices();
    let previous = self.devices.swap(current, Ordering::Relaxed);
    if current != previous {
      info!("{current} audio devices connected");
      if current > previous && self.sound_on.load(Ordering::Relaxed) {
        self.speech.speak("Radar connected");
      }
      self.ui_changed.store(true, Ordering::Relaxed);
    }
  }

  pub async fn run_display(&self, mut display: Box<dyn DisplayControl>) {
    loop {
      if self.quitting() {
        debug!("display loop done");
        display.cleanup();
        return;
      }
      if display.is_busy() {
        sleep(self.screen.refresh / 3).await;
      } else {
        if self.display_tick(display.as_mut()).await {
          return;
        }
        sleep(DRAW_PAUSE).await;
      }
      self.sweep_traffic().await;
    }
  }

  /// One frame of whatever the active mode shows. Returns true when the
  /// host is going down and the loop must end.
  async fn display_tick(&self, display: &mut dyn DisplayControl) -> bool {
    let mode = *self.mode.read().await;
    let force = self.ui_changed.swap(false, Ordering::Relaxed);
    match mode {
      Mode::Radar => self.draw_radar(display, force).await,
      Mode::Timer => self.draw_timer(display, force).await,
      Mode::Ahrs => self.draw_ahrs(display, force).await,
      Mode::Shutdown => return self.draw_shutdown(display).await,
      Mode::Refresh => {
        debug!("full refresh");
        display.refresh();
        *self.mode.write().await = Mode::Radar;
        self.ui_changed.store(true, Ordering::Relaxed);
      }
    }
    false
  }

  async fn draw_radar(&self, display: &mut dyn DisplayControl, force: bool) {
    let aircraft_changed = self.aircraft_changed.swap(false, Ordering::Relaxed);
    let (situation_changed, own) = {
      let mut own = self.ownship.write().await;
      let changed = own.was_changed;
      own.was_changed = false;
      (changed, own.clone())
    };
    if !(situation_changed || aircraft_changed || force) {
      return;
    }

    display.clear();
    display.situation(&SituationView {
      connected: own.connected,
      gps_valid: own.gps_valid,
      own_altitude: own.altitude,
      course: own.course,
      range: own.range,
      limits: own.limits,
      gps_accuracy: own.gps_accuracy,
      devices: self.devices.load(Ordering::Relaxed),
      sound_on: self.sound_on.load(Ordering::Relaxed),
    });
    {
      let traffic = self.traffic.read().await;
      let ordered = traffic.by_descending_distance();
      for track in &ordered {
        if let TrackKind::RangeOnly { radius_px, arc_deg } = track.kind {
          if radius_px <= self.screen.max_pixel / 2 {
            display.modes_aircraft(radius_px, track.height, arc_deg);
          }
        }
      }
      for track in &ordered {
        if let TrackKind::Positional {
          screen: Some(pos),
          direction,
          vector_len,
        } = track.kind
        {
          if pos.x > 0 && pos.x <= self.screen.max_pixel && pos.y <= self.screen.max_pixel {
            display.aircraft(&AircraftSprite {
              pos,
              direction: direction.unwrap_or(0),
              height: track.height,
              vspeed: track.vspeed,
              vector_len: vector_len.unwrap_or(0),
            });
          }
        }
      }
    }
    display.commit();
  }

  async fn draw_timer(&self, display: &mut dyn DisplayControl, force: bool) {
    let now = Utc::now();
    let (view, announce) = {
      let mut timer = self.timer.write().await;
      (timer.render(now, force), timer.just_expired(now))
    };
    if announce {
      info!("timer expired");
      if self.speech_on() {
        self.speech.speak("Timer expired");
      }
    }
    if let Some(view) = view {
      display.clear();
      display.timer(&view);
      display.commit();
    }
  }

  async fn draw_ahrs(&self, display: &mut dyn DisplayControl, force: bool) {
    let (changed, view) = {
      let mut own = self.ownship.write().await;
      let changed = own.was_changed || own.attitude_changed;
      own.was_changed = false;
      own.attitude_changed = false;
      (changed, ahrs::view_from(&own))
    };
    if changed || force {
      display.clear();
      display.ahrs(&view);
      display.commit();
    }
  }

  async fn draw_shutdown(&self, display: &mut dyn DisplayControl) -> bool {
    let now = Utc::now();
    let (remaining, power_off) = {
      let mut shutdown = self.shutdown.write().await;
      (shutdown.remaining(now), shutdown.take_power_off())
    };
    if let Some(remaining) = remaining {
      display.clear();
      display.shutdown_notice(remaining);
      display.commit();
    }
    if power_off {
      info!("powering the host down");
      display.cleanup();
      self.host.power_off();
      return true;
    }
    false
  }

  async fn sweep_traffic(&self) {
    let removed = self.traffic.write().await.sweep(Utc::now());
    if removed > 0 {
      self.aircraft_changed.store(true, Ordering::Relaxed);
    }
  }
}

/// Situation feed wiring: messages update the own-ship state, transport
/// loss drops the connection flag.
pub struct SituationFeed(pub Arc<Scope>);

#[async_trait]
impl FeedConsumer for SituationFeed {
  async fn consume(&self, raw: &str) {
    self.0.handle_situation(raw).await;
  }

  async fn connection_lost(&self) {
    let dropped = self.0.ownship.write().await.drop_connection();
    if dropped {
      info!("sensor connection lost");
    }
  }
}

/// Radar feed wiring: traffic, scale controls and steering frames.
pub struct RadarFeed(pub Arc<Scope>);

#[async_trait]
impl FeedConsumer for RadarFeed {
  async fn consume(&self, raw: &str) {
    self.0.handle_traffic(raw).await;
  }
}
