//! System configuration parameters
//!
//! All tunable parameters for the relay light controller. Values are loaded
//! once from NVS at boot and afterwards change only through the remote
//! configuration path or an explicit [`AppCommand`](crate::app::commands::AppCommand).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Which gesture toggles the relay; the other one drives flashing.
///
/// This is a full swap, not two independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureMapping {
    /// Click toggles, hold flashes continuously while held.
    ClickToggles,
    /// Hold toggles, click fires a bounded burst.
    HoldToggles,
}

impl GestureMapping {
    /// Value used by the remote configuration form.
    pub fn form_value(self) -> &'static str {
        match self {
            Self::ClickToggles => "click",
            Self::HoldToggles => "hold",
        }
    }

    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "click" => Some(Self::ClickToggles),
            "hold" => Some(Self::HoldToggles),
            _ => None,
        }
    }
}

/// Timing discipline for bounded bursts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstTiming {
    /// One flip per loop iteration, gated by elapsed time.
    NonBlocking,
    /// Flip and sleep inside a single call. Stalls input sampling and the
    /// config inbox for the whole burst.
    Blocking,
}

/// Gesture classification thresholds (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonTiming {
    /// Presses at or below this are treated as contact bounce.
    pub click_min_ms: u32,
    /// Presses at or above this are too long to be a click.
    pub click_max_ms: u32,
    /// Presses reaching this become a hold.
    pub hold_ms: u32,
}

impl Default for ButtonTiming {
    fn default() -> Self {
        Self {
            click_min_ms: 50,
            click_max_ms: 200,
            hold_ms: 500,
        }
    }
}

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightConfig {
    // --- Gestures ---
    pub gesture_mapping: GestureMapping,
    pub button: ButtonTiming,

    // --- Flashing ---
    /// Half-cycle length of a flash sequence (milliseconds)
    pub flash_period_ms: u32,
    /// On/off pairs per burst
    pub flash_repeat_count: u32,
    pub burst_timing: BurstTiming,

    // --- Runtime ---
    /// Yield between control loop iterations on device (milliseconds)
    pub poll_interval_ms: u32,
    /// Start the soft-AP and HTTP config endpoint at boot
    pub remote_config_enabled: bool,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            gesture_mapping: GestureMapping::ClickToggles,
            button: ButtonTiming::default(),

            flash_period_ms: 100,
            flash_repeat_count: 3,
            burst_timing: BurstTiming::NonBlocking,

            poll_interval_ms: 10,
            remote_config_enabled: false,
        }
    }
}

pub const FLASH_PERIOD_MIN_MS: u32 = 20;
pub const FLASH_PERIOD_MAX_MS: u32 = 10_000;
pub const FLASH_REPEAT_MAX: u32 = 100;

impl LightConfig {
    /// Range-check every field. Invalid configs are never applied or persisted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(FLASH_PERIOD_MIN_MS..=FLASH_PERIOD_MAX_MS).contains(&self.flash_period_ms) {
            return Err(ConfigError::ValidationFailed("flash_period_ms must be 20–10000"));
        }
        if self.flash_repeat_count > FLASH_REPEAT_MAX {
            return Err(ConfigError::ValidationFailed("flash_repeat_count must be 0–100"));
        }
        let b = &self.button;
        if b.click_min_ms >= b.click_max_ms {
            return Err(ConfigError::ValidationFailed("click_min_ms must be < click_max_ms"));
        }
        if b.click_max_ms > b.hold_ms {
            return Err(ConfigError::ValidationFailed("click_max_ms must be <= hold_ms"));
        }
        if !(100..=10_000).contains(&b.hold_ms) {
            return Err(ConfigError::ValidationFailed("hold_ms must be 100–10000"));
        }
        if self.poll_interval_ms > 50 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be 0–50"));
        }
        Ok(())
    }
}
