//! Gesture → action table.
//!
//! | event     | `ClickToggles`                 | `HoldToggles`      |
//! |-----------|--------------------------------|--------------------|
//! | Click     | toggle relay                   | start burst        |
//! | HoldStart | start continuous flash         | toggle relay       |
//! | HoldEnd   | stop flash, restore relay      | nothing            |
//!
//! `HoldEnd` under `HoldToggles` is deliberately a no-op: the toggle already
//! happened at `HoldStart`. Pending product confirmation.

use crate::config::GestureMapping;
use crate::drivers::button::ButtonEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleRelay,
    StartBurst,
    StartContinuousFlash,
    StopFlash,
}

pub fn route(event: ButtonEvent, mapping: GestureMapping) -> Option<Action> {
    use ButtonEvent::{Click, HoldEnd, HoldStart};
    use GestureMapping::{ClickToggles, HoldToggles};

    match (event, mapping) {
        (Click, ClickToggles) | (HoldStart, HoldToggles) => Some(Action::ToggleRelay),
        (Click, HoldToggles) => Some(Action::StartBurst),
        (HoldStart, ClickToggles) => Some(Action::StartContinuousFlash),
        (HoldEnd, ClickToggles) => Some(Action::StopFlash),
        (HoldEnd, HoldToggles) => None,
    }
}
