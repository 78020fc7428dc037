//! Relay coil driver.
//!
//! Drives the relay through any `embedded-hal` output pin (HIGH = energised).
//! This driver is a dumb actuator: the logical relay state lives in
//! [`Relay`](crate::app::relay::Relay), which writes through
//! [`RelayOutput`] on every change.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps an `esp_idf_svc::hal::gpio::PinDriver`.
//! On host/test: any pin mock implementing `OutputPin`.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::RelayOutput;

pub struct RelayPin<P> {
    pin: P,
    last_written: Option<bool>,
}

impl<P: OutputPin> RelayPin<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_written: None,
        }
    }

    /// Last level handed to the pin, `None` before the first write.
    pub fn last_written(&self) -> Option<bool> {
        self.last_written
    }
}

impl<P: OutputPin> RelayOutput for RelayPin<P> {
    fn write_relay(&mut self, energized: bool) {
        let res = if energized {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match res {
            Ok(()) => self.last_written = Some(energized),
            Err(e) => warn!("Relay write failed: {:?}", e),
        }
    }
}
