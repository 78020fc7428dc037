//! Remote configuration through the inbox, the service and persistence.

use relaylight::app::commands::AppCommand;
use relaylight::app::events::AppEvent;
use relaylight::app::ports::ConfigPort;
use relaylight::app::remote::{ConfigForm, ConfigInbox, RemoteConfigError, RemoteResponse};
use relaylight::config::{GestureMapping, LightConfig};

use super::mock_hw::{MockNvs, Rig};

fn submit(rig: &mut Rig, query: &str) {
    let form = ConfigForm::parse(query);
    rig.app
        .handle_command(AppCommand::RemoteConfig(form), &mut rig.hw, &mut rig.sink);
}

fn rejections(rig: &Rig) -> Vec<RemoteConfigError> {
    rig.sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ConfigRejected(r) => Some(*r),
            _ => None,
        })
        .collect()
}

#[test]
fn non_numeric_period_keeps_stored_value() {
    let nvs = MockNvs::new();
    let mut rig = Rig::new(LightConfig {
        flash_period_ms: 250,
        ..Default::default()
    });

    submit(&mut rig, "mode=click&delay=fast");

    assert_eq!(rig.app.config().flash_period_ms, 250);
    assert_eq!(rejections(&rig), vec![RemoteConfigError::PeriodNotANumber]);
    assert!(!rig.app.flush_config(&nvs, &mut rig.sink));
    assert_eq!(nvs.saves.get(), 0);
}

#[test]
fn valid_form_applies_and_persists() {
    let nvs = MockNvs::new();
    let mut rig = Rig::new(LightConfig::default());

    submit(&mut rig, "mode=hold&delay=150");

    assert_eq!(rig.app.config().gesture_mapping, GestureMapping::HoldToggles);
    assert_eq!(rig.app.config().flash_period_ms, 150);
    assert!(rig.app.flush_config(&nvs, &mut rig.sink));
    assert_eq!(nvs.load().unwrap(), *rig.app.config());
    assert!(rig.sink.events.iter().any(|e| matches!(e, AppEvent::ConfigSaved)));

    // Nothing new to save.
    assert!(!rig.app.flush_config(&nvs, &mut rig.sink));
    assert_eq!(nvs.saves.get(), 1);
}

#[test]
fn bad_delay_does_not_discard_good_mode() {
    let mut rig = Rig::new(LightConfig::default());

    submit(&mut rig, "mode=hold&delay=-5");

    assert_eq!(rig.app.config().gesture_mapping, GestureMapping::HoldToggles);
    assert_eq!(rig.app.config().flash_period_ms, 100);
    assert_eq!(rejections(&rig), vec![RemoteConfigError::PeriodNegative]);
}

#[test]
fn zero_period_is_rejected_not_applied() {
    let mut rig = Rig::new(LightConfig::default());

    submit(&mut rig, "delay=0");

    assert_eq!(rig.app.config().flash_period_ms, 100);
    assert_eq!(rejections(&rig), vec![RemoteConfigError::PeriodOutOfRange]);
    assert!(!rig.app.is_config_dirty());
}

#[test]
fn remote_period_applies_to_next_burst() {
    let mut rig = Rig::new(LightConfig {
        gesture_mapping: GestureMapping::HoldToggles,
        ..Default::default()
    });

    submit(&mut rig, "delay=200");
    rig.press_for(120);
    rig.run_until(2_000);

    assert_eq!(rig.hw.flip_times(), vec![320, 520, 720, 920, 1120, 1320]);
}

#[test]
fn period_change_mid_burst_keeps_snapshot() {
    let mut rig = Rig::new(LightConfig {
        gesture_mapping: GestureMapping::HoldToggles,
        ..Default::default()
    });

    rig.press_for(120);
    rig.run_until(250);
    submit(&mut rig, "delay=500");
    rig.run_until(2_000);

    assert_eq!(rig.hw.flip_times(), vec![220, 320, 420, 520, 620, 720]);
    assert_eq!(rig.app.config().flash_period_ms, 500);
}

#[test]
fn failed_save_is_not_retried_every_iteration() {
    let nvs = MockNvs::new();
    nvs.fail_writes.set(true);
    let mut rig = Rig::new(LightConfig::default());

    submit(&mut rig, "delay=300");
    assert!(!rig.app.flush_config(&nvs, &mut rig.sink));
    assert!(!rig.app.is_config_dirty());

    nvs.fail_writes.set(false);
    rig.app
        .handle_command(AppCommand::SaveConfig, &mut rig.hw, &mut rig.sink);
    assert!(rig.app.flush_config(&nvs, &mut rig.sink));
    assert_eq!(nvs.load().unwrap().flash_period_ms, 300);
}

#[test]
fn inbox_hands_forms_to_the_loop_in_order() {
    let inbox = ConfigInbox::new();
    let mut rig = Rig::new(LightConfig::default());

    assert_eq!(inbox.submit_query("delay=120"), RemoteResponse::SeeOther("/"));
    assert_eq!(inbox.submit_query("delay=130&mode=hold"), RemoteResponse::SeeOther("/"));

    while let Some(form) = inbox.take() {
        rig.app
            .handle_command(AppCommand::RemoteConfig(form), &mut rig.hw, &mut rig.sink);
    }

    assert_eq!(rig.app.config().flash_period_ms, 130);
    assert_eq!(rig.app.config().gesture_mapping, GestureMapping::HoldToggles);
    assert_eq!(rig.app.status().mode, "hold");
}
