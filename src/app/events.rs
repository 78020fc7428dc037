//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them (serial log today).

use crate::config::LightConfig;
use crate::drivers::button::ButtonEvent;

use super::flash::FlashMode;
use super::remote::RemoteConfigError;

/// Why a flash session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashEnd {
    /// Burst ran all its flips.
    Completed,
    /// `HoldEnd` or an explicit stop command.
    Stopped,
    /// Pre-empted by a relay toggle or a mapping change.
    Cancelled,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the active config).
    Started(LightConfig),

    /// A gesture was classified.
    Gesture(ButtonEvent),

    /// The relay's steady state changed through a toggle.
    RelaySwitched(bool),

    FlashStarted { mode: FlashMode, period_ms: u32 },

    FlashEnded { reason: FlashEnd, restored_to: bool },

    /// A new configuration was applied.
    ConfigApplied(LightConfig),

    /// A remote field was rejected; the previous value was kept.
    ConfigRejected(RemoteConfigError),

    /// The config was written to persistent storage.
    ConfigSaved,
}
