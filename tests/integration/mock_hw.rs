//! Mock hardware and adapters for integration tests.
//!
//! `MockHw` implements every hardware port the service needs. Its clock only
//! moves when a test advances it (or when a blocking burst sleeps), and every
//! relay write is recorded with its timestamp.

use std::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;
use relaylight::app::events::AppEvent;
use relaylight::app::ports::{
    ButtonInput, ButtonLevel, Clock, ConfigError, ConfigPort, EventSink, RelayOutput,
};
use relaylight::app::service::AppService;
use relaylight::config::LightConfig;
use relaylight::drivers::button::ButtonEvent;

// ── MockHw ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockHw {
    pub now: u32,
    pub pressed: bool,
    /// `(timestamp_ms, energized)` for every relay write.
    pub relay_writes: Vec<(u32, bool)>,
    pub slept_ms: u32,
}

#[allow(dead_code)]
impl MockHw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn relay_level(&self) -> Option<bool> {
        self.relay_writes.last().map(|&(_, on)| on)
    }

    /// Number of writes that changed the relay level.
    pub fn flips(&self) -> usize {
        self.relay_writes
            .windows(2)
            .filter(|w| w[0].1 != w[1].1)
            .count()
    }

    /// Timestamps at which the relay level changed.
    pub fn flip_times(&self) -> Vec<u32> {
        self.relay_writes
            .windows(2)
            .filter(|w| w[0].1 != w[1].1)
            .map(|w| w[1].0)
            .collect()
    }
}

impl ButtonInput for MockHw {
    fn read_button(&mut self) -> ButtonLevel {
        if self.pressed {
            ButtonLevel::Pressed
        } else {
            ButtonLevel::Released
        }
    }
}

impl Clock for MockHw {
    fn now_ms(&self) -> u32 {
        self.now
    }
}

impl RelayOutput for MockHw {
    fn write_relay(&mut self, energized: bool) {
        self.relay_writes.push((self.now, energized));
    }
}

impl DelayNs for MockHw {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ms(us / 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.slept_ms += ms;
        self.now = self.now.wrapping_add(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gestures(&self) -> Vec<ButtonEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Gesture(g) => Some(*g),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockNvs ───────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockNvs {
    pub stored: RefCell<Option<LightConfig>>,
    pub saves: Cell<u32>,
    pub fail_writes: Cell<bool>,
}

#[allow(dead_code)]
impl MockNvs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigPort for MockNvs {
    fn load(&self) -> Result<LightConfig, ConfigError> {
        self.stored.borrow().clone().ok_or(ConfigError::NotFound)
    }

    fn save(&self, config: &LightConfig) -> Result<(), ConfigError> {
        if self.fail_writes.get() {
            return Err(ConfigError::IoError);
        }
        config.validate()?;
        *self.stored.borrow_mut() = Some(config.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// ── Rig: service + mocks + loop driver ────────────────────────

pub const POLL_MS: u32 = 10;

pub struct Rig {
    pub app: AppService,
    pub hw: MockHw,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: LightConfig) -> Self {
        let mut rig = Self {
            app: AppService::new(config),
            hw: MockHw::new(),
            sink: RecordingSink::new(),
        };
        rig.app.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    /// One loop iteration at the current time.
    pub fn tick(&mut self) -> Option<ButtonEvent> {
        self.app.tick(&mut self.hw, &mut self.sink)
    }

    /// Iterate every `POLL_MS` until the clock reaches `t` (inclusive).
    pub fn run_until(&mut self, t: u32) {
        while self.hw.now < t {
            self.hw.now = (self.hw.now + POLL_MS).min(t);
            self.tick();
        }
    }

    pub fn press(&mut self) {
        self.hw.pressed = true;
        self.tick();
    }

    pub fn release(&mut self) {
        self.hw.pressed = false;
        self.tick();
    }

    /// Press now and release after `duration` ms, polling in between.
    pub fn press_for(&mut self, duration: u32) {
        let end = self.hw.now + duration;
        self.press();
        self.run_until(end);
        self.release();
    }
}
