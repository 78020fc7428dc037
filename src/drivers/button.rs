//! Button gesture classifier and active-low input pin reader.
//!
//! ## Hardware
//!
//! Active-low momentary switch with internal pull-up. The pin is sampled
//! once per control-loop iteration; there is no ISR and no fixed period.
//!
//! ## Gesture detection
//!
//! | Gesture    | Condition                                  | Event       |
//! |------------|--------------------------------------------|-------------|
//! | Click      | `click_min < duration < click_max`         | `Click`     |
//! | Hold       | still pressed at `hold`                    | `HoldStart` |
//! | Hold ends  | release after `HoldStart`                  | `HoldEnd`   |
//! | Noise      | anything else                              | none        |
//!
//! Thresholds come from [`ButtonTiming`] and are passed on every call, so a
//! config change only affects the next gesture.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use crate::app::ports::{ButtonInput, ButtonLevel};
use crate::config::ButtonTiming;

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Click,
    HoldStart,
    HoldEnd,
}

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Pressed { since_ms: u32 },
    Held { since_ms: u32 },
}

pub struct GestureClassifier {
    state: GestureState,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    /// Call once per control-loop iteration with the current input level.
    /// Returns a classified gesture event, if any.
    pub fn tick(
        &mut self,
        level: ButtonLevel,
        now_ms: u32,
        timing: &ButtonTiming,
    ) -> Option<ButtonEvent> {
        match (self.state, level) {
            (GestureState::Idle, ButtonLevel::Pressed) => {
                self.state = GestureState::Pressed { since_ms: now_ms };
                None
            }
            (GestureState::Idle, ButtonLevel::Released) => None,

            (GestureState::Pressed { since_ms }, ButtonLevel::Pressed) => {
                if now_ms.wrapping_sub(since_ms) >= timing.hold_ms {
                    self.state = GestureState::Held { since_ms };
                    return Some(ButtonEvent::HoldStart);
                }
                None
            }

            (GestureState::Pressed { since_ms }, ButtonLevel::Released) => {
                self.state = GestureState::Idle;
                let duration = now_ms.wrapping_sub(since_ms);
                debug!("Press duration: {}ms", duration);

                if duration >= timing.hold_ms {
                    // Crossed the hold threshold between two samples. No
                    // HoldStart was emitted, so there is nothing to end.
                    debug!("Late hold release ignored");
                    return None;
                }
                if duration > timing.click_min_ms && duration < timing.click_max_ms {
                    return Some(ButtonEvent::Click);
                }
                None
            }

            (GestureState::Held { .. }, ButtonLevel::Pressed) => None,

            (GestureState::Held { .. }, ButtonLevel::Released) => {
                self.state = GestureState::Idle;
                Some(ButtonEvent::HoldEnd)
            }
        }
    }

    /// True while a press is in progress (pressed or held).
    pub fn is_pressed(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// True once the hold threshold was crossed, until release.
    pub fn is_holding(&self) -> bool {
        matches!(self.state, GestureState::Held { .. })
    }

    /// Timestamp of the press in progress, if any.
    pub fn press_started_at(&self) -> Option<u32> {
        match self.state {
            GestureState::Idle => None,
            GestureState::Pressed { since_ms } | GestureState::Held { since_ms } => Some(since_ms),
        }
    }
}

/// Active-low button on any `embedded-hal` input pin.
pub struct ButtonPin<P> {
    pin: P,
}

impl<P: InputPin> ButtonPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> ButtonInput for ButtonPin<P> {
    fn read_button(&mut self) -> ButtonLevel {
        match self.pin.is_low() {
            Ok(true) => ButtonLevel::Pressed,
            Ok(false) => ButtonLevel::Released,
            Err(e) => {
                warn!("Button read failed: {:?}", e);
                ButtonLevel::Released
            }
        }
    }
}
