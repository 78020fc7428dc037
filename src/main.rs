//! RelayLight firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │  HardwareAdapter      LogEventSink   NvsAdapter          │
//! │  (Button+Relay+Clock) (EventSink)    (ConfigPort)        │
//! │  soft-AP + httpd ──▶ CONFIG_INBOX / STATUS_BOARD ◀──┐    │
//! │  ────────────── Port Trait Boundary ─────────────── │    │
//! │  ┌───────────────────────────────────────────────┐  │    │
//! │  │   AppService: classify · route · flash        │──┘    │
//! │  └───────────────────────────────────────────────┘       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Button on GPIO4 (active low, internal pull-up), relay on GPIO2.

use anyhow::{Context, Result};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio::{PinDriver, Pull};
use esp_idf_svc::hal::prelude::Peripherals;
use log::info;

use relaylight::adapters::hardware::HardwareAdapter;
use relaylight::adapters::log_sink::LogEventSink;
use relaylight::adapters::nvs::NvsAdapter;
use relaylight::adapters::{http, wifi};
use relaylight::app::commands::AppCommand;
use relaylight::app::remote::{CONFIG_INBOX, STATUS_BOARD};
use relaylight::app::service::AppService;
use relaylight::drivers::watchdog::{Watchdog, timeout_for};
use relaylight::error::Error;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("RelayLight v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()
        .map_err(|_| Error::Init("peripherals already taken"))?;

    // ── 2. Config from NVS (or defaults) ──────────────────────
    let nvs = NvsAdapter::new().context("NVS init")?;
    let config = nvs.load_or_default();

    // ── 3. Pins ───────────────────────────────────────────────
    let mut button = PinDriver::input(peripherals.pins.gpio4)?;
    button.set_pull(Pull::Up)?;
    let relay = PinDriver::output(peripherals.pins.gpio2)?;
    let mut hw = HardwareAdapter::new(button, relay, Delay::new_default());

    // ── 4. Optional remote configuration ──────────────────────
    // Both handles must outlive the loop.
    let _remote = if config.remote_config_enabled {
        let sysloop = EspSystemEventLoop::take()?;
        let ap = wifi::start_soft_ap(peripherals.modem, sysloop)?;
        let server = http::start_server()?;
        Some((ap, server))
    } else {
        info!("Remote config disabled");
        None
    };

    // ── 5. Service ────────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(config);
    app.start(&mut hw, &mut sink);
    STATUS_BOARD.publish(app.status());

    let mut watchdog = Watchdog::new(timeout_for(app.config()));

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        let mut received = false;
        while let Some(form) = CONFIG_INBOX.take() {
            app.handle_command(AppCommand::RemoteConfig(form), &mut hw, &mut sink);
            received = true;
        }
        if received {
            // A longer burst may now stall the loop past the old timeout.
            watchdog.reconfigure(timeout_for(app.config()));
        }

        app.tick(&mut hw, &mut sink);

        app.flush_config(&nvs, &mut sink);

        STATUS_BOARD.publish(app.status());
        watchdog.feed();

        // Yield to the idle task even when polling continuously.
        hw.pause_ms(app.config().poll_interval_ms.max(1));
    }
}
