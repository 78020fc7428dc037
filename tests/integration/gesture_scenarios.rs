//! End-to-end gesture scenarios: button samples in, relay writes out.

use relaylight::app::commands::AppCommand;
use relaylight::app::events::{AppEvent, FlashEnd};
use relaylight::config::{BurstTiming, GestureMapping, LightConfig};
use relaylight::drivers::button::ButtonEvent;

use super::mock_hw::Rig;

fn hold_toggles() -> LightConfig {
    LightConfig {
        gesture_mapping: GestureMapping::HoldToggles,
        flash_repeat_count: 3,
        flash_period_ms: 100,
        ..Default::default()
    }
}

fn ended(reason: FlashEnd) -> impl Fn(&AppEvent) -> bool {
    move |e| matches!(e, AppEvent::FlashEnded { reason: r, .. } if *r == reason)
}

// ── Click toggles (default mapping) ──────────────────────────

#[test]
fn click_toggles_relay_once() {
    let mut rig = Rig::new(LightConfig::default());

    rig.press_for(120);

    assert_eq!(rig.sink.gestures(), vec![ButtonEvent::Click]);
    assert_eq!(rig.hw.relay_level(), Some(true));
    assert_eq!(rig.hw.flips(), 1);
    assert!(rig.app.relay_on());

    rig.run_until(400);
    rig.press_for(120);
    assert_eq!(rig.hw.relay_level(), Some(false));
    assert_eq!(rig.hw.flips(), 2);
}

#[test]
fn bounce_and_slow_press_are_ignored() {
    let mut rig = Rig::new(LightConfig::default());

    rig.press_for(30);
    rig.run_until(200);
    rig.press_for(300);

    assert!(rig.sink.gestures().is_empty());
    assert_eq!(rig.hw.flips(), 0);
    assert!(!rig.app.is_flashing());
}

#[test]
fn hold_flashes_then_restores_on_release() {
    let mut rig = Rig::new(LightConfig::default());

    rig.press_for(600);

    assert_eq!(
        rig.sink.gestures(),
        vec![ButtonEvent::HoldStart, ButtonEvent::HoldEnd]
    );
    assert!(rig.sink.events.iter().any(|e| matches!(
        e,
        AppEvent::FlashStarted { period_ms: 100, .. }
    )));
    assert_eq!(rig.sink.count(ended(FlashEnd::Stopped)), 1);
    assert_eq!(rig.hw.relay_level(), Some(false));
    assert!(!rig.app.is_flashing());
}

#[test]
fn continuous_flash_alternates_at_period_and_restores_on() {
    let mut rig = Rig::new(LightConfig::default());
    rig.press_for(120);
    assert!(rig.app.relay_on());
    rig.run_until(300);

    // HoldStart at 800, then one flip per 100 ms until release at 1300.
    rig.press_for(1_000);

    let times: Vec<u32> = rig
        .hw
        .flip_times()
        .into_iter()
        .filter(|&t| t > 300)
        .collect();
    assert_eq!(&times[..5], &[900, 1000, 1100, 1200, 1300]);
    assert_eq!(rig.hw.relay_level(), Some(true));
    assert!(rig.app.relay_on());
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Gesture(ButtonEvent::HoldStart))), 1);
}

#[test]
fn long_hold_emits_single_hold_start() {
    let mut rig = Rig::new(LightConfig::default());
    rig.press();
    rig.run_until(5_000);
    assert_eq!(rig.sink.gestures(), vec![ButtonEvent::HoldStart]);
    rig.release();
    assert_eq!(
        rig.sink.gestures(),
        vec![ButtonEvent::HoldStart, ButtonEvent::HoldEnd]
    );
}

// ── Hold toggles ─────────────────────────────────────────────

#[test]
fn click_runs_bounded_burst() {
    let mut rig = Rig::new(hold_toggles());

    rig.press_for(120);
    rig.run_until(1_500);

    assert_eq!(rig.hw.flip_times(), vec![220, 320, 420, 520, 620, 720]);
    assert_eq!(rig.hw.relay_level(), Some(false));
    assert_eq!(rig.sink.count(ended(FlashEnd::Completed)), 1);
    assert!(!rig.app.is_flashing());
}

#[test]
fn blocking_burst_sleeps_through_flips() {
    let mut rig = Rig::new(LightConfig {
        burst_timing: BurstTiming::Blocking,
        ..hold_toggles()
    });

    rig.press_for(120);

    assert_eq!(rig.hw.flip_times(), vec![120, 220, 320, 420, 520, 620]);
    assert_eq!(rig.hw.slept_ms, 600);
    assert_eq!(rig.hw.now, 720);
    assert_eq!(rig.hw.relay_level(), Some(false));
    assert_eq!(rig.sink.count(ended(FlashEnd::Completed)), 1);
}

#[test]
fn click_during_burst_leaves_burst_unchanged() {
    let mut rig = Rig::new(hold_toggles());

    rig.press_for(120);
    rig.run_until(250);
    rig.press_for(100);
    rig.run_until(1_500);

    assert_eq!(rig.sink.gestures(), vec![ButtonEvent::Click, ButtonEvent::Click]);
    assert_eq!(rig.hw.flip_times(), vec![220, 320, 420, 520, 620, 720]);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::FlashStarted { .. })), 1);
}

#[test]
fn hold_toggles_relay_and_release_is_noop() {
    let mut rig = Rig::new(hold_toggles());

    rig.press_for(700);

    assert_eq!(
        rig.sink.gestures(),
        vec![ButtonEvent::HoldStart, ButtonEvent::HoldEnd]
    );
    assert_eq!(rig.hw.flip_times(), vec![500]);
    assert!(rig.app.relay_on());
}

#[test]
fn zero_repeat_count_burst_does_nothing() {
    let mut rig = Rig::new(LightConfig {
        flash_repeat_count: 0,
        ..hold_toggles()
    });

    rig.press_for(120);
    rig.run_until(1_000);

    assert_eq!(rig.hw.flips(), 0);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::FlashStarted { .. })), 0);
}

// ── Interactions ─────────────────────────────────────────────

#[test]
fn hold_toggle_during_burst_cancels_then_toggles() {
    let mut rig = Rig::new(hold_toggles());

    rig.press_for(120);
    // Burst runs 120..720 flipping every 100 ms; the hold lands at 630.
    rig.run_until(130);
    rig.press_for(550);

    assert_eq!(rig.sink.count(ended(FlashEnd::Cancelled)), 1);
    assert_eq!(rig.sink.count(ended(FlashEnd::Completed)), 0);
    // Restored to off, then toggled on; no later restore overrides it.
    rig.run_until(2_000);
    assert!(rig.app.relay_on());
    assert_eq!(rig.hw.relay_level(), Some(true));
    assert!(!rig.app.is_flashing());
    assert_eq!(rig.hw.flip_times(), vec![220, 320, 420, 520, 620, 630, 630]);
}

#[test]
fn mapping_change_cancels_continuous_flash() {
    let mut rig = Rig::new(LightConfig::default());

    rig.press();
    rig.run_until(650);
    assert!(rig.app.is_flashing());

    rig.app
        .handle_command(AppCommand::UpdateConfig(hold_toggles()), &mut rig.hw, &mut rig.sink);

    assert!(!rig.app.is_flashing());
    assert_eq!(rig.hw.relay_level(), Some(false));
    assert_eq!(rig.sink.count(ended(FlashEnd::Cancelled)), 1);

    // The pending release now routes to a no-op.
    rig.release();
    rig.run_until(1_500);
    assert_eq!(rig.hw.relay_level(), Some(false));
}

#[test]
fn stop_command_is_idempotent() {
    let mut rig = Rig::new(LightConfig::default());
    rig.press();
    rig.run_until(700);

    rig.app
        .handle_command(AppCommand::StopFlash, &mut rig.hw, &mut rig.sink);
    rig.app
        .handle_command(AppCommand::StopFlash, &mut rig.hw, &mut rig.sink);

    assert_eq!(rig.sink.count(ended(FlashEnd::Stopped)), 1);
    assert!(!rig.app.is_flashing());
}

#[test]
fn live_threshold_change_applies_to_next_press() {
    let mut rig = Rig::new(LightConfig::default());
    let mut cfg = LightConfig::default();
    cfg.button.click_max_ms = 400;
    cfg.button.hold_ms = 800;
    rig.app
        .handle_command(AppCommand::UpdateConfig(cfg), &mut rig.hw, &mut rig.sink);

    rig.press_for(300);

    assert_eq!(rig.sink.gestures(), vec![ButtonEvent::Click]);
}
