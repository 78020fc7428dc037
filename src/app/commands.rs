//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (remote config
//! endpoint, boot code, tests) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::config::LightConfig;

use super::remote::ConfigForm;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Replace the whole configuration (validated first).
    UpdateConfig(LightConfig),

    /// Apply a submitted remote configuration form field by field.
    RemoteConfig(ConfigForm),

    /// Cancel any flash session and restore the relay.
    StopFlash,

    /// Persist the current config on the next flush even if unchanged.
    SaveConfig,
}
