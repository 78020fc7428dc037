//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the gesture classifier, relay state, flash sequencer
//! and live configuration. It exposes a hardware-agnostic API; all I/O
//! flows through port traits injected at call sites, making the whole
//! controller testable with a synthetic clock.
//!
//! ```text
//!  ButtonInput ─┐   ┌──────────────────────────┐
//!  Clock ───────┼──▶│        AppService         │──▶ EventSink
//!               │   │ classify · route · flash  │
//!  RelayOutput ◀┘   └──────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::{BurstTiming, LightConfig};
use crate::drivers::button::{ButtonEvent, GestureClassifier};

use super::commands::AppCommand;
use super::events::{AppEvent, FlashEnd};
use super::flash::{FlashMode, FlashSequencer};
use super::ports::{ButtonInput, Clock, ConfigPort, EventSink, RelayOutput};
use super::relay::Relay;
use super::remote::LightStatus;
use super::router::{Action, route};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: LightConfig,
    classifier: GestureClassifier,
    relay: Relay,
    flash: FlashSequencer,
    tick_count: u64,
    config_dirty: bool,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the relay; call [`start`](Self::start) next.
    pub fn new(config: LightConfig) -> Self {
        Self {
            config,
            classifier: GestureClassifier::new(),
            relay: Relay::new(),
            flash: FlashSequencer::new(),
            tick_count: 0,
            config_dirty: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the relay to a known (off) level and announce the config.
    pub fn start(&mut self, hw: &mut impl RelayOutput, sink: &mut impl EventSink) {
        self.relay.set(hw, false);
        sink.emit(&AppEvent::Started(self.config.clone()));
        info!("AppService started ({:?})", self.config.gesture_mapping);
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one control-loop iteration: sample → classify → route → flash.
    ///
    /// `hw` satisfies every port at once to avoid overlapping mutable
    /// borrows. Returns the gesture classified this iteration, if any.
    pub fn tick(
        &mut self,
        hw: &mut (impl ButtonInput + Clock + RelayOutput + DelayNs),
        sink: &mut impl EventSink,
    ) -> Option<ButtonEvent> {
        self.tick_count += 1;

        let level = hw.read_button();
        let now_ms = hw.now_ms();
        let gesture = self.classifier.tick(level, now_ms, &self.config.button);

        if let Some(event) = gesture {
            sink.emit(&AppEvent::Gesture(event));
            if let Some(action) = route(event, self.config.gesture_mapping) {
                self.perform(action, hw, now_ms, sink);
            }
        }

        if self.flash.tick(&mut self.relay, hw, now_ms) {
            sink.emit(&AppEvent::FlashEnded {
                reason: FlashEnd::Completed,
                restored_to: self.relay.is_energized(),
            });
        }

        gesture
    }

    fn perform(
        &mut self,
        action: Action,
        hw: &mut (impl RelayOutput + DelayNs),
        now_ms: u32,
        sink: &mut impl EventSink,
    ) {
        match action {
            Action::ToggleRelay => {
                // A later restore would overwrite the toggle, so end the
                // session first and toggle relative to the pre-flash state.
                self.end_flash(FlashEnd::Cancelled, hw, sink);
                let on = self.relay.toggle(hw);
                sink.emit(&AppEvent::RelaySwitched(on));
            }
            Action::StartBurst => self.start_burst(hw, now_ms, sink),
            Action::StartContinuousFlash => {
                let period_ms = self.config.flash_period_ms;
                if self.flash.start_continuous(&self.relay, period_ms, now_ms) {
                    sink.emit(&AppEvent::FlashStarted {
                        mode: FlashMode::Continuous,
                        period_ms,
                    });
                }
            }
            Action::StopFlash => self.end_flash(FlashEnd::Stopped, hw, sink),
        }
    }

    fn start_burst(
        &mut self,
        hw: &mut (impl RelayOutput + DelayNs),
        now_ms: u32,
        sink: &mut impl EventSink,
    ) {
        let pairs = self.config.flash_repeat_count;
        let period_ms = self.config.flash_period_ms;
        let mode = FlashMode::Burst {
            total_half_cycles: pairs.saturating_mul(2),
        };

        if self.flash.is_active() {
            debug!("Burst ignored: flash session already active");
            return;
        }
        if pairs == 0 {
            debug!("Burst ignored: flash_repeat_count is 0");
            return;
        }

        match self.config.burst_timing {
            BurstTiming::NonBlocking => {
                if self.flash.start_burst(&self.relay, pairs, period_ms, now_ms) {
                    sink.emit(&AppEvent::FlashStarted { mode, period_ms });
                }
            }
            BurstTiming::Blocking => {
                sink.emit(&AppEvent::FlashStarted { mode, period_ms });
                self.flash.run_blocking_burst(&mut self.relay, hw, pairs, period_ms);
                sink.emit(&AppEvent::FlashEnded {
                    reason: FlashEnd::Completed,
                    restored_to: self.relay.is_energized(),
                });
            }
        }
    }

    fn end_flash(
        &mut self,
        reason: FlashEnd,
        hw: &mut impl RelayOutput,
        sink: &mut impl EventSink,
    ) {
        if self.flash.stop(&mut self.relay, hw) {
            sink.emit(&AppEvent::FlashEnded {
                reason,
                restored_to: self.relay.is_energized(),
            });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (remote config, boot code, tests).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl RelayOutput,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::UpdateConfig(new_config) => {
                if let Err(e) = new_config.validate() {
                    warn!("Config update refused: {}", e);
                    return;
                }
                self.apply_config(new_config, hw, sink);
            }
            AppCommand::RemoteConfig(form) => {
                let update = form.apply_to(&self.config);
                for rejected in &update.rejected {
                    warn!("Remote config field rejected: {}", rejected);
                    sink.emit(&AppEvent::ConfigRejected(*rejected));
                }
                if update.config != self.config {
                    self.apply_config(update.config, hw, sink);
                }
            }
            AppCommand::StopFlash => self.end_flash(FlashEnd::Stopped, hw, sink),
            AppCommand::SaveConfig => {
                self.config_dirty = true;
                info!("Explicit config save requested");
            }
        }
    }

    fn apply_config(
        &mut self,
        new_config: LightConfig,
        hw: &mut impl RelayOutput,
        sink: &mut impl EventSink,
    ) {
        // With a new mapping the pending HoldEnd may route to a no-op and
        // leave continuous flashing running forever.
        if new_config.gesture_mapping != self.config.gesture_mapping {
            self.end_flash(FlashEnd::Cancelled, hw, sink);
        }
        self.config = new_config;
        self.config_dirty = true;
        sink.emit(&AppEvent::ConfigApplied(self.config.clone()));
    }

    // ── Persistence ───────────────────────────────────────────

    /// Persist the config if it changed since the last flush.
    /// Returns `true` if the config was saved.
    pub fn flush_config(&mut self, storage: &impl ConfigPort, sink: &mut impl EventSink) -> bool {
        if !self.config_dirty {
            return false;
        }
        // Cleared on failure too; the next change retries instead of every
        // loop iteration.
        self.config_dirty = false;
        match storage.save(&self.config) {
            Ok(()) => {
                sink.emit(&AppEvent::ConfigSaved);
                true
            }
            Err(e) => {
                warn!("Config save failed: {}", e);
                false
            }
        }
    }

    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &LightConfig {
        &self.config
    }

    pub fn relay_on(&self) -> bool {
        self.relay.is_energized()
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_active()
    }

    /// Total loop iterations executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Snapshot for the status endpoint.
    pub fn status(&self) -> LightStatus {
        LightStatus {
            relay_on: self.relay.is_energized(),
            flashing: self.flash.is_active(),
            mode: self.config.gesture_mapping.form_value(),
            flash_period_ms: self.config.flash_period_ms,
            flash_repeat_count: self.config.flash_repeat_count,
        }
    }
}
