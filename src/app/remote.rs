//! Remote configuration boundary.
//!
//! The HTTP endpoint accepts exactly two fields:
//!
//! | field   | values            | target                       |
//! |---------|-------------------|------------------------------|
//! | `mode`  | `click` \| `hold` | [`LightConfig::gesture_mapping`] |
//! | `delay` | integer ms, ≥ 0   | [`LightConfig::flash_period_ms`] |
//!
//! Fields are validated independently. A rejected field keeps its previous
//! value; it is never coerced to zero. `flash_repeat_count` is not
//! remotely settable.
//!
//! ```text
//! ┌──────────────┐  ConfigForm   ┌──────────────┐
//! │  HTTP task   │─────────────▶│ Control loop  │
//! │              │◀─────────────│               │
//! └──────────────┘  LightStatus  └──────────────┘
//! ```
//!
//! Forms are queued in a [`ConfigInbox`] and applied by the control loop
//! between iterations, so an in-flight flash session never observes a
//! half-applied config.

use core::cell::Cell;
use core::fmt;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use serde::Serialize;

use crate::config::{FLASH_PERIOD_MAX_MS, FLASH_PERIOD_MIN_MS, GestureMapping, LightConfig};

/// Capacity of the `mode` field after decoding.
pub const MODE_FIELD_CAP: usize = 8;
/// Capacity of the `delay` field after decoding.
pub const DELAY_FIELD_CAP: usize = 16;

/// Where a successful submission redirects to.
pub const REDIRECT_LOCATION: &str = "/";

const INBOX_DEPTH: usize = 4;

// ───────────────────────────────────────────────────────────────
// Form parsing
// ───────────────────────────────────────────────────────────────

/// One decoded form value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue<const N: usize> {
    Missing,
    Value(heapless::String<N>),
    /// Too long for the field, bad escape, or not UTF-8.
    Malformed,
}

impl<const N: usize> FormValue<N> {
    fn decode(raw: &str) -> Self {
        match percent_decode::<N>(raw) {
            Some(s) => Self::Value(s),
            None => Self::Malformed,
        }
    }
}

/// A submitted configuration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigForm {
    pub mode: FormValue<MODE_FIELD_CAP>,
    pub delay: FormValue<DELAY_FIELD_CAP>,
}

/// Per-field rejection reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteConfigError {
    UnknownMode,
    MalformedMode,
    PeriodNotANumber,
    PeriodNegative,
    PeriodOutOfRange,
}

impl fmt::Display for RemoteConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMode => write!(f, "mode: expected 'click' or 'hold'"),
            Self::MalformedMode => write!(f, "mode: malformed value"),
            Self::PeriodNotANumber => write!(f, "flash_period: not a number"),
            Self::PeriodNegative => write!(f, "flash_period: negative"),
            Self::PeriodOutOfRange => write!(
                f,
                "flash_period: must be {}..={} ms",
                FLASH_PERIOD_MIN_MS, FLASH_PERIOD_MAX_MS
            ),
        }
    }
}

/// Number of fields a form can carry; each is rejected at most once.
const FORM_FIELDS: usize = 2;

pub type RejectedFields = heapless::Vec<RemoteConfigError, FORM_FIELDS>;

fn reject(rejected: &mut RejectedFields, e: RemoteConfigError) {
    let pushed = rejected.push(e);
    debug_assert!(pushed.is_ok(), "more rejections than form fields");
}

/// Result of applying a form: the new config plus every rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUpdate {
    pub config: LightConfig,
    pub rejected: RejectedFields,
}

impl ConfigForm {
    /// Parse an `application/x-www-form-urlencoded` query string.
    /// Unknown keys are ignored; for repeated keys the last one wins.
    pub fn parse(query: &str) -> Self {
        let mut form = Self {
            mode: FormValue::Missing,
            delay: FormValue::Missing,
        };
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "mode" => form.mode = FormValue::decode(value),
                "delay" => form.delay = FormValue::decode(value),
                _ => {}
            }
        }
        form
    }

    /// Apply every valid field on top of `current`.
    pub fn apply_to(&self, current: &LightConfig) -> RemoteUpdate {
        let mut config = current.clone();
        let mut rejected = RejectedFields::new();

        match &self.mode {
            FormValue::Missing => {}
            FormValue::Malformed => reject(&mut rejected, RemoteConfigError::MalformedMode),
            FormValue::Value(v) => match GestureMapping::from_form_value(v.as_str()) {
                Some(m) => config.gesture_mapping = m,
                None => reject(&mut rejected, RemoteConfigError::UnknownMode),
            },
        }

        match &self.delay {
            FormValue::Missing => {}
            FormValue::Malformed => reject(&mut rejected, RemoteConfigError::PeriodNotANumber),
            FormValue::Value(v) => match parse_period(v.as_str()) {
                Ok(ms) => {
                    let candidate = LightConfig {
                        flash_period_ms: ms,
                        ..config.clone()
                    };
                    if candidate.validate().is_ok() {
                        config = candidate;
                    } else {
                        reject(&mut rejected, RemoteConfigError::PeriodOutOfRange);
                    }
                }
                Err(e) => reject(&mut rejected, e),
            },
        }

        RemoteUpdate { config, rejected }
    }
}

fn parse_period(raw: &str) -> Result<u32, RemoteConfigError> {
    let s = raw.trim();
    if let Ok(ms) = s.parse::<u32>() {
        return Ok(ms);
    }
    match s.parse::<i64>() {
        Ok(v) if v < 0 => Err(RemoteConfigError::PeriodNegative),
        Ok(_) => Err(RemoteConfigError::PeriodOutOfRange),
        Err(_) => Err(RemoteConfigError::PeriodNotANumber),
    }
}

fn percent_decode<const N: usize>(raw: &str) -> Option<heapless::String<N>> {
    let mut bytes: heapless::Vec<u8, N> = heapless::Vec::new();
    let mut it = raw.bytes();
    while let Some(b) = it.next() {
        let decoded = match b {
            b'+' => b' ',
            b'%' => {
                let hi = hex_val(it.next()?)?;
                let lo = hex_val(it.next()?)?;
                (hi << 4) | lo
            }
            other => other,
        };
        bytes.push(decoded).ok()?;
    }
    heapless::String::from_utf8(bytes).ok()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Extract the query part of a request URI (`/config?mode=click` → `mode=click`).
pub fn query_of(uri: &str) -> &str {
    uri.split_once('?').map_or("", |(_, q)| q)
}

// ───────────────────────────────────────────────────────────────
// Inbox: HTTP task → control loop
// ───────────────────────────────────────────────────────────────

/// Outcome of a submission, mapped to an HTTP status by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteResponse {
    /// 303 See Other.
    SeeOther(&'static str),
    /// Inbox full; 503.
    Busy,
}

pub struct ConfigInbox {
    channel: Channel<CriticalSectionRawMutex, ConfigForm, INBOX_DEPTH>,
}

impl Default for ConfigInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigInbox {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Parse `query` and queue it for the control loop.
    pub fn submit_query(&self, query: &str) -> RemoteResponse {
        if self.channel.try_send(ConfigForm::parse(query)).is_ok() {
            RemoteResponse::SeeOther(REDIRECT_LOCATION)
        } else {
            log::warn!("Config inbox full, request dropped");
            RemoteResponse::Busy
        }
    }

    /// Next pending form, if any. Called by the control loop.
    pub fn take(&self) -> Option<ConfigForm> {
        self.channel.try_receive().ok()
    }
}

/// Inbox shared by the HTTP adapter and `main`.
pub static CONFIG_INBOX: ConfigInbox = ConfigInbox::new();

// ───────────────────────────────────────────────────────────────
// Status board: control loop → HTTP task
// ───────────────────────────────────────────────────────────────

/// Snapshot served by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightStatus {
    pub relay_on: bool,
    pub flashing: bool,
    pub mode: &'static str,
    pub flash_period_ms: u32,
    pub flash_repeat_count: u32,
}

impl LightStatus {
    pub const INITIAL: Self = Self {
        relay_on: false,
        flashing: false,
        mode: "click",
        flash_period_ms: 100,
        flash_repeat_count: 3,
    };

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// The configuration page served at `/`, preselecting current values.
    pub fn render_page(&self) -> String {
        let selected = |m: &str| if self.mode == m { " selected" } else { "" };
        format!(
            "<h1>Light Configuration</h1>\
             <form action='/config' method='get'>\
             <p>Mode: <select name='mode'>\
             <option value='click'{}>Click On/Off</option>\
             <option value='hold'{}>Hold On/Off</option>\
             </select></p>\
             <p>Flash Delay (ms, {min}-{max}): <input type='number' name='delay' \
             min='{min}' max='{max}' value='{}'></p>\
             <p><input type='submit' value='Save'></p>\
             </form>",
            selected("click"),
            selected("hold"),
            self.flash_period_ms,
            min = FLASH_PERIOD_MIN_MS,
            max = FLASH_PERIOD_MAX_MS,
        )
    }
}

pub struct StatusBoard {
    inner: Mutex<CriticalSectionRawMutex, Cell<LightStatus>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(LightStatus::INITIAL)),
        }
    }

    pub fn publish(&self, status: LightStatus) {
        self.inner.lock(|c| c.set(status));
    }

    pub fn current(&self) -> LightStatus {
        self.inner.lock(Cell::get)
    }
}

/// Status shared by the HTTP adapter and `main`.
pub static STATUS_BOARD: StatusBoard = StatusBoard::new();
