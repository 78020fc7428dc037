//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the control loop stops feeding it. A blocking
//! burst holds the loop for `2 * repeat * period` ms, so the timeout is
//! derived from the config rather than fixed.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::config::{FLASH_PERIOD_MAX_MS, FLASH_REPEAT_MAX, LightConfig};

/// Lower bound for the TWDT timeout.
pub const MIN_TIMEOUT_MS: u32 = 5_000;

/// Timeout that survives the longest loop stall `config` can cause.
pub fn timeout_for(config: &LightConfig) -> u32 {
    let repeat = config.flash_repeat_count.min(FLASH_REPEAT_MAX);
    let period = config.flash_period_ms.min(FLASH_PERIOD_MAX_MS);
    let stall = repeat.saturating_mul(2).saturating_mul(period);
    stall.saturating_add(MIN_TIMEOUT_MS)
}

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    #[cfg(not(target_os = "espidf"))]
    feeds: core::cell::Cell<u32>,
    #[cfg(not(target_os = "espidf"))]
    reconfigures: u32,
}

impl Watchdog {
    /// Configure the TWDT and subscribe the calling task.
    pub fn new(timeout_ms: u32) -> Self {
        let timeout_ms = timeout_ms.max(MIN_TIMEOUT_MS);

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: plain FFI into the TWDT; a null task handle means
            // the current task.
            let subscribed = unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!("TWDT reconfigure returned {}", ret);
                }
                esp_task_wdt_add(core::ptr::null_mut()) == ESP_OK
            };
            if subscribed {
                info!("Watchdog: subscribed ({} ms timeout)", timeout_ms);
            } else {
                log::warn!("Watchdog: failed to subscribe");
            }
            Self { timeout_ms, subscribed }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("Watchdog(sim): {} ms timeout, no-op", timeout_ms);
            Self {
                timeout_ms,
                feeds: core::cell::Cell::new(0),
                reconfigures: 0,
            }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Change the timeout in place, keeping the subscription.
    ///
    /// The requested value is latched before the IDF call, so a failing
    /// reconfigure is attempted and reported once per distinct timeout.
    pub fn reconfigure(&mut self, timeout_ms: u32) {
        let timeout_ms = timeout_ms.max(MIN_TIMEOUT_MS);
        if timeout_ms == self.timeout_ms {
            return;
        }
        let previous = core::mem::replace(&mut self.timeout_ms, timeout_ms);

        #[cfg(target_os = "espidf")]
        {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            // SAFETY: plain FFI; the config is copied by the callee.
            let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
            if ret != ESP_OK {
                log::warn!("TWDT reconfigure to {} ms returned {}", timeout_ms, ret);
                return;
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.reconfigures = self.reconfigures.saturating_add(1);
        }

        info!("Watchdog: timeout {} -> {} ms", previous, timeout_ms);
    }

    /// Feed the watchdog once per loop iteration.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: resets the TWDT entry of the subscribed task.
            unsafe {
                esp_task_wdt_reset();
            }
        }

        #[cfg(not(target_os = "espidf"))]
        self.feeds.set(self.feeds.get().wrapping_add(1));
    }

    /// Feeds recorded by the simulation backend.
    #[cfg(not(target_os = "espidf"))]
    pub fn feed_count(&self) -> u32 {
        self.feeds.get()
    }

    /// Timeout changes pushed to the simulation backend.
    #[cfg(not(target_os = "espidf"))]
    pub fn reconfigure_count(&self) -> u32 {
        self.reconfigures
    }
}
