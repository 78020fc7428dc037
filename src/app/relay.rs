//! Logical relay state with write-through to the output port.

use super::ports::RelayOutput;

/// The relay actuator. Owns the logical energised state; every mutation
/// is written through to the [`RelayOutput`] immediately.
#[derive(Debug, Default)]
pub struct Relay {
    energized: bool,
}

impl Relay {
    /// Starts de-energised. Call [`Relay::set`] once at boot to drive the
    /// pin to a known level.
    pub fn new() -> Self {
        Self { energized: false }
    }

    /// Idempotent; always writes through, even if the state is unchanged.
    pub fn set(&mut self, out: &mut impl RelayOutput, energized: bool) {
        self.energized = energized;
        out.write_relay(energized);
    }

    /// Flip and write through. Returns the new state.
    pub fn toggle(&mut self, out: &mut impl RelayOutput) -> bool {
        self.set(out, !self.energized);
        self.energized
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }
}
