//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                      | Connects to            |
//! |------------|---------------------------------|------------------------|
//! | `hardware` | ButtonInput, RelayOutput, Clock | GPIO pins, uptime      |
//! | `log_sink` | EventSink                       | Serial log output      |
//! | `nvs`      | ConfigPort                      | NVS / in-memory store  |
//! | `time`     | Clock                           | ESP32 system timer     |
//! | `http`     | (config inbox producer)         | ESP-IDF httpd          |
//! | `wifi`     | none                            | ESP-IDF soft-AP        |

pub mod hardware;
#[cfg(target_os = "espidf")]
pub mod http;
pub mod log_sink;
pub mod nvs;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod wifi;
