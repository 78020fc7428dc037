//! Flash sequencer: timed on/off oscillation of the relay.
//!
//! A [`FlashSession`] exists exactly while flashing. It snapshots the flash
//! period and the relay state at start, so config edits made mid-session
//! never affect it, and the relay always returns to where it was.
//!
//! | Mode         | Ends when                         | Started by (default mapping) |
//! |--------------|-----------------------------------|------------------------------|
//! | `Continuous` | [`FlashSequencer::stop`]          | `HoldStart`                  |
//! | `Burst`      | `2n` flips done, or `stop`        | `Click` (hold-toggles)       |
//!
//! Non-blocking sessions advance at most one half-cycle per
//! [`FlashSequencer::tick`]. [`FlashSequencer::run_blocking_burst`] is the
//! compatibility path that sleeps between flips.

use embedded_hal::delay::DelayNs;

use super::ports::RelayOutput;
use super::relay::Relay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashMode {
    Continuous,
    Burst { total_half_cycles: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashSession {
    pub mode: FlashMode,
    pub half_cycles_done: u32,
    pub last_toggle_ms: u32,
    pub period_ms: u32,
    /// Relay state captured at start, restored on exit.
    pub restore_to: bool,
}

#[derive(Debug, Default)]
pub struct FlashSequencer {
    session: Option<FlashSession>,
}

impl FlashSequencer {
    pub fn new() -> Self {
        Self { session: None }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&FlashSession> {
        self.session.as_ref()
    }

    /// Start flashing until [`stop`](Self::stop). No-op if a session is active.
    pub fn start_continuous(&mut self, relay: &Relay, period_ms: u32, now_ms: u32) -> bool {
        self.start(FlashMode::Continuous, relay, period_ms, now_ms)
    }

    /// Start a burst of `pairs` on/off pairs. No-op if a session is active
    /// or `pairs` is zero.
    pub fn start_burst(&mut self, relay: &Relay, pairs: u32, period_ms: u32, now_ms: u32) -> bool {
        if pairs == 0 {
            return false;
        }
        let mode = FlashMode::Burst {
            total_half_cycles: pairs.saturating_mul(2),
        };
        self.start(mode, relay, period_ms, now_ms)
    }

    fn start(&mut self, mode: FlashMode, relay: &Relay, period_ms: u32, now_ms: u32) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(FlashSession {
            mode,
            half_cycles_done: 0,
            last_toggle_ms: now_ms,
            period_ms,
            restore_to: relay.is_energized(),
        });
        true
    }

    /// Cancel the active session and restore the relay. Idempotent.
    /// Returns `true` if a session was cancelled.
    pub fn stop(&mut self, relay: &mut Relay, out: &mut impl RelayOutput) -> bool {
        match self.session.take() {
            Some(s) => {
                relay.set(out, s.restore_to);
                true
            }
            None => false,
        }
    }

    /// Advance the active session. Returns `true` if the session just
    /// terminated on its own (burst exhausted).
    pub fn tick(&mut self, relay: &mut Relay, out: &mut impl RelayOutput, now_ms: u32) -> bool {
        let Some(s) = self.session.as_mut() else {
            return false;
        };
        if now_ms.wrapping_sub(s.last_toggle_ms) < s.period_ms {
            return false;
        }

        s.last_toggle_ms = now_ms;
        relay.toggle(out);
        s.half_cycles_done = s.half_cycles_done.saturating_add(1);

        if let FlashMode::Burst { total_half_cycles } = s.mode {
            if s.half_cycles_done >= total_half_cycles {
                let restore_to = s.restore_to;
                self.session = None;
                relay.set(out, restore_to);
                return true;
            }
        }
        false
    }

    /// Run a whole burst inside this call, sleeping `period_ms` after each
    /// flip. No-op if a session is active. Returns the number of flips made.
    pub fn run_blocking_burst(
        &mut self,
        relay: &mut Relay,
        hw: &mut (impl RelayOutput + DelayNs),
        pairs: u32,
        period_ms: u32,
    ) -> u32 {
        if self.session.is_some() {
            return 0;
        }
        let restore_to = relay.is_energized();
        let flips = pairs.saturating_mul(2);
        for _ in 0..flips {
            relay.toggle(hw);
            hw.delay_ms(period_ms);
        }
        relay.set(hw, restore_to);
        flips
    }
}
