//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one line per application event to
//! the logger (UART / USB-CDC on the device).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::flash::FlashMode;
use crate::app::ports::EventSink;

fn on_off(energized: bool) -> &'static str {
    if energized { "ON" } else { "OFF" }
}

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(cfg) => {
                info!(
                    "START | mode={} | period={}ms | repeat={} | timing={:?} | remote={}",
                    cfg.gesture_mapping.form_value(),
                    cfg.flash_period_ms,
                    cfg.flash_repeat_count,
                    cfg.burst_timing,
                    cfg.remote_config_enabled,
                );
            }
            AppEvent::Gesture(g) => info!("GESTURE | {:?}", g),
            AppEvent::RelaySwitched(on) => info!("RELAY | {}", on_off(*on)),
            AppEvent::FlashStarted { mode, period_ms } => match mode {
                FlashMode::Continuous => info!("FLASH | continuous every {}ms", period_ms),
                FlashMode::Burst { total_half_cycles } => {
                    info!("FLASH | burst of {} flips every {}ms", total_half_cycles, period_ms);
                }
            },
            AppEvent::FlashEnded { reason, restored_to } => {
                info!("FLASH | {:?}, relay restored {}", reason, on_off(*restored_to));
            }
            AppEvent::ConfigApplied(cfg) => {
                info!(
                    "CONFIG | mode={} | period={}ms | repeat={}",
                    cfg.gesture_mapping.form_value(),
                    cfg.flash_period_ms,
                    cfg.flash_repeat_count,
                );
            }
            AppEvent::ConfigRejected(e) => warn!("CONFIG | rejected: {}", e),
            AppEvent::ConfigSaved => info!("CONFIG | saved"),
        }
    }
}
