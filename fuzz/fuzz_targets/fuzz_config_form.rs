//! Fuzz target: remote configuration form
//!
//! Feeds arbitrary query strings through `ConfigForm::parse` and
//! `apply_to`, checking:
//! - No panics on any UTF-8 input
//! - The resulting config always validates
//! - A rejected delay never changes the stored period
//!
//! cargo fuzz run fuzz_config_form

#![no_main]

use libfuzzer_sys::fuzz_target;
use relaylight::app::remote::{ConfigForm, RemoteConfigError};
use relaylight::config::LightConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(query) = core::str::from_utf8(data) else {
        return;
    };

    let current = LightConfig::default();
    let update = ConfigForm::parse(query).apply_to(&current);

    assert!(update.config.validate().is_ok());
    assert_eq!(update.config.flash_repeat_count, current.flash_repeat_count);

    let delay_rejected = update.rejected.iter().any(|e| {
        matches!(
            e,
            RemoteConfigError::PeriodNotANumber
                | RemoteConfigError::PeriodNegative
                | RemoteConfigError::PeriodOutOfRange
        )
    });
    if delay_rejected {
        assert_eq!(update.config.flash_period_ms, current.flash_period_ms);
    }
});
