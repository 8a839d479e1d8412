// End-to-end: input arrives through the rig's router, ticks run the
// analyzer -> envelope -> deformation chain.

use pulse_core::{
    CloudRefs, EffectMode, Modifiers, PostEffect, Rig, RigConfig, SceneRequest, StageControls,
    TickInput,
};

const KNOBS: &str = "nanoKONTROL2 SLIDER/KNOB";
const KEYS: &str = "nanoKEY2 KEYBOARD";
const PAD: &str = "nanoPAD2 PAD";

fn press(rig: &mut Rig, code: &str) {
    rig.key(code, true, Modifiers::NONE);
    rig.key(code, false, Modifiers::NONE);
}

fn idle_tick(rig: &mut Rig, dt_sec: f32) {
    rig.tick(TickInput {
        dt_sec,
        ..TickInput::default()
    });
}

#[test]
fn mode_keys_and_notes_select_modes() {
    let mut rig = Rig::default();
    press(&mut rig, "KeyE");
    assert_eq!(rig.mode(), EffectMode::Breath);
    rig.controller(KEYS, 0x90, 51, 90);
    assert_eq!(rig.mode(), EffectMode::Bubble);
    // Same note from the knob bank is not a mode switch.
    rig.controller(KNOBS, 0x90, 48, 90);
    assert_eq!(rig.mode(), EffectMode::Bubble);
    // Note-off never switches.
    rig.controller(KEYS, 0x80, 48, 0);
    assert_eq!(rig.mode(), EffectMode::Bubble);
}

#[test]
fn knobs_write_the_active_mode_only() {
    let mut rig = Rig::default();
    press(&mut rig, "KeyW");
    rig.controller(KNOBS, 0xB0, 1, 127);
    assert_eq!(rig.params().params(EffectMode::Noise).noise_amp(), 3.0);
    assert_eq!(rig.params().params(EffectMode::Wave).noise_amp(), 2.0);
    // Knob on the keys device is ignored.
    rig.controller(KEYS, 0xB0, 1, 0);
    assert_eq!(rig.params().params(EffectMode::Noise).noise_amp(), 3.0);
}

#[test]
fn stage_follows_knobs_and_keys() {
    let mut rig = Rig::default();
    rig.controller(KNOBS, 0xB0, 19, 127);
    rig.controller(KNOBS, 0xB0, 7, 0);
    let stage = rig.stage();
    assert!((stage.offset.x - 2.0).abs() < 1e-6);
    assert_eq!(stage.animation_speed, 0.8);

    for _ in 0..50 {
        rig.key("KeyD", true, Modifiers::ctrl());
        rig.key("ArrowUp", true, Modifiers::NONE);
    }
    let stage = rig.stage();
    assert_eq!(stage.offset.x, 2.0);
    assert!((stage.rotation.x + std::f32::consts::FRAC_PI_3).abs() < 1e-6);

    press(&mut rig, "KeyR");
    assert_eq!(rig.stage(), StageControls::default());
}

#[test]
fn post_notes_and_keys_drive_the_selector() {
    let mut rig = Rig::default();
    rig.controller(KEYS, 0x90, 61, 100);
    assert_eq!(rig.post_effect(), PostEffect::Film);
    press(&mut rig, "BracketLeft");
    assert_eq!(rig.post_effect(), PostEffect::Glitch);
    press(&mut rig, "Digit0");
    assert_eq!(rig.post_effect(), PostEffect::None);
    // Ctrl+Digit0 belongs to the monitor, not the post selector.
    rig.controller(KEYS, 0x90, 64, 100);
    rig.key("Digit0", true, Modifiers::ctrl());
    assert_eq!(rig.post_effect(), PostEffect::ColorShift);
}

#[test]
fn auto_cycle_skips_none_every_interval() {
    let mut rig = Rig::default();
    rig.controller(KEYS, 0x90, 72, 100);
    assert!(rig.post_auto());
    assert_eq!(rig.post_effect(), PostEffect::Bloom);

    let mut seen = vec![rig.post_effect()];
    for _ in 0..(12 * 60) {
        idle_tick(&mut rig, 1.0 / 60.0);
        if *seen.last().unwrap() != rig.post_effect() {
            seen.push(rig.post_effect());
        }
    }
    assert!(seen.len() >= 6, "{:?}", seen);
    assert!(!seen.contains(&PostEffect::None));
    assert_eq!(seen[4], PostEffect::ColorShift);
    assert_eq!(seen[5], PostEffect::Bloom);

    rig.controller(KEYS, 0x90, 65, 100);
    assert!(!rig.post_auto());
    assert_eq!(rig.post_effect(), PostEffect::None);
}

#[test]
fn pads_queue_scene_requests() {
    let mut rig = Rig::default();
    rig.controller(PAD, 0x90, 36, 100);
    rig.controller(PAD, 0x90, 36, 100);
    rig.controller(PAD, 0x90, 55, 100);
    rig.controller(PAD, 0x90, 55, 0);
    rig.controller(PAD, 0x90, 20, 100);
    let requests = rig.take_scene_requests();
    assert_eq!(
        requests,
        [
            SceneRequest::Model {
                index: 0,
                file: "sample1.gvrm".into()
            },
            SceneRequest::Animation {
                index: 3,
                file: "Gangnam Style.fbx".into()
            },
        ]
    );
    assert!(rig.take_scene_requests().is_empty());
}

#[test]
fn keyboard_steps_through_catalog() {
    let mut rig = Rig::default();
    press(&mut rig, "PageUp");
    rig.key("NumpadMultiply", true, Modifiers::shift());
    press(&mut rig, "Numpad2");
    let requests = rig.take_scene_requests();
    assert_eq!(requests.len(), 3);
    assert!(matches!(requests[0], SceneRequest::Model { index: 5, .. }));
    assert!(matches!(requests[1], SceneRequest::Animation { index: 13, .. }));
    assert!(matches!(requests[2], SceneRequest::Animation { index: 2, .. }));
    assert_eq!(rig.scene().animation(), 2);
}

#[test]
fn monitor_chords_need_ctrl() {
    let mut rig = Rig::default();
    rig.key("KeyM", true, Modifiers::ctrl());
    assert_eq!(rig.monitor_gain(), 0.0);
    rig.key("KeyM", true, Modifiers::ctrl());
    rig.key("Minus", true, Modifiers::ctrl());
    rig.key("Minus", true, Modifiers::ctrl());
    assert!((rig.monitor_gain() - 0.8).abs() < 1e-6);
    rig.key("Digit0", true, Modifiers::ctrl());
    assert_eq!(rig.monitor_gain(), 1.0);
    press(&mut rig, "KeyM");
    assert_eq!(rig.monitor_gain(), 1.0);
}

#[test]
fn bass_hit_pumps_the_cloud_for_one_tick() {
    let mut rig = Rig::default();
    let base = vec![1.0f32; 12];
    let centers = vec![0.0f32; 6];
    let mut live = vec![0.0f32; 12];
    let spectrum = [255u8, 0, 0, 0];

    let report = rig.tick(TickInput {
        time_ms: 0.0,
        dt_sec: 1.0 / 60.0,
        spectrum: Some(&spectrum),
        waveform: None,
        sample_rate: 400.0,
        cloud: Some(CloudRefs {
            base: &base,
            centers: &centers,
            live: &mut live,
        }),
    });
    assert_eq!(report.deformed, Some(2));
    assert!((report.amp_factor - 9.0).abs() < 1e-6);
    // Wave at y = 0, t = 0 sits on a zero crossing: scale is the amp factor.
    assert!((live[0] - 9.0).abs() < 1e-5);

    let report = rig.tick(TickInput {
        time_ms: 16.0,
        dt_sec: 1.0 / 60.0,
        spectrum: Some(&spectrum),
        sample_rate: 400.0,
        ..TickInput::default()
    });
    assert_eq!(report.amp_factor, 1.0);
    assert_eq!(report.deformed, None);
}

#[test]
fn seeded_rigs_pick_the_same_random_effects() {
    let picks = |seed| {
        let mut rig = Rig::new(RigConfig {
            seed,
            ..RigConfig::default()
        });
        (0..8)
            .map(|_| {
                press(&mut rig, "BracketRight");
                rig.post_effect()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(7), picks(7));
}

#[test]
fn status_line_tracks_changes() {
    let mut rig = Rig::default();
    assert!(rig.status_line().starts_with("wave | freq 15.00"));
    press(&mut rig, "KeyT");
    press(&mut rig, "Digit5");
    let line = rig.status_line();
    assert!(line.starts_with("bubble |"), "{line}");
    assert!(line.contains("post bloom"), "{line}");
}
