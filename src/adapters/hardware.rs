//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the button and relay pin drivers, the uptime clock and a blocking
//! delay, exposing them through [`ButtonInput`], [`Clock`], [`RelayOutput`]
//! and [`DelayNs`]. Generic over `embedded-hal` pins so the same adapter
//! runs against ESP-IDF `PinDriver`s or test doubles.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{ButtonInput, ButtonLevel, Clock, RelayOutput};
use crate::drivers::button::ButtonPin;
use crate::drivers::relay::RelayPin;

use super::time::UptimeClock;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<B, R, D> {
    button: ButtonPin<B>,
    relay: RelayPin<R>,
    clock: UptimeClock,
    delay: D,
}

impl<B: InputPin, R: OutputPin, D: DelayNs> HardwareAdapter<B, R, D> {
    pub fn new(button: B, relay: R, delay: D) -> Self {
        Self {
            button: ButtonPin::new(button),
            relay: RelayPin::new(relay),
            clock: UptimeClock::new(),
            delay,
        }
    }

    /// Level last driven onto the relay pin, `None` before the first write.
    pub fn relay_level(&self) -> Option<bool> {
        self.relay.last_written()
    }

    /// Sleep between loop iterations.
    pub fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

// ── Port implementations ──────────────────────────────────────

impl<B: InputPin, R, D> ButtonInput for HardwareAdapter<B, R, D> {
    fn read_button(&mut self) -> ButtonLevel {
        self.button.read_button()
    }
}

impl<B, R, D> Clock for HardwareAdapter<B, R, D> {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}

impl<B, R: OutputPin, D> RelayOutput for HardwareAdapter<B, R, D> {
    fn write_relay(&mut self, energized: bool) {
        self.relay.write_relay(energized);
    }
}

impl<B, R, D: DelayNs> DelayNs for HardwareAdapter<B, R, D> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
