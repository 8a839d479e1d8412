// Parameter store: clamping, binding table and mode cycling.

use proptest::prelude::*;
use pulse_core::{BindingTable, EffectMode, ParamField, ParameterStore};

fn arb_mode() -> impl Strategy<Value = EffectMode> {
    (0usize..EffectMode::COUNT).prop_map(|i| EffectMode::ALL[i])
}

fn arb_field() -> impl Strategy<Value = ParamField> {
    (0usize..ParamField::ALL.len()).prop_map(|i| ParamField::ALL[i])
}

fn assert_all_in_range(store: &ParameterStore) {
    for mode in EffectMode::ALL {
        let set = store.params(mode);
        for field in ParamField::ALL {
            let (lo, hi) = field.range();
            let v = set.get(field);
            assert!(
                (lo..=hi).contains(&v),
                "{}.{} = {} outside [{}, {}]",
                mode,
                field.name(),
                v,
                lo,
                hi
            );
        }
    }
}

#[test]
fn next_mode_wraps_after_four() {
    let mut store = ParameterStore::default();
    let seen: Vec<_> = (0..5).map(|_| store.next_mode()).collect();
    assert_eq!(
        seen,
        [
            EffectMode::Noise,
            EffectMode::Breath,
            EffectMode::Bubble,
            EffectMode::Wave,
            EffectMode::Noise
        ]
    );
}

#[test]
fn bindings_cover_three_knobs_per_mode() {
    let table = BindingTable::default();
    for mode in EffectMode::ALL {
        for cc in 0..3 {
            assert!(table.for_cc(mode, cc).is_some(), "{mode} cc{cc} unbound");
        }
        assert!(table.for_cc(mode, 3).is_none());
    }
}

#[test]
fn binding_range_is_tighter_than_field_range() {
    let mut store = ParameterStore::default();
    assert_eq!(store.set_param(EffectMode::Noise, ParamField::Amp, 1e6), Some(3.0));
    assert_eq!(store.set_param(EffectMode::Wave, ParamField::Amp, 1e6), Some(10.0));
}

#[test]
fn direct_amp_writes_stop_at_ten() {
    let mut store = ParameterStore::default();
    assert_eq!(ParamField::Amp.range(), (0.1, 10.0));
    assert_eq!(store.set_value(EffectMode::Bubble, ParamField::Amp, 15.0), 10.0);
    assert_eq!(store.set_value(EffectMode::Wave, ParamField::Amp, 1e6), 10.0);
    assert_eq!(store.set_value(EffectMode::Wave, ParamField::Amp, -4.0), 0.1);
    assert_eq!(store.params(EffectMode::Bubble).amp(), 10.0);
}

#[test]
fn bubble_knobs_drive_bubble_fields() {
    let mut store = ParameterStore::default();
    store.select(EffectMode::Bubble);
    store.apply_cc(0, 0.5);
    store.apply_cc(1, 1.0);
    store.apply_cc(2, 1.0);
    let p = store.params(EffectMode::Bubble);
    assert_eq!(p.wave_speed(), 6.0);
    assert_eq!(p.bubble_noise_amp(), 2.5);
    assert!((p.bubble_breath_amp() - 1.2).abs() < 1e-6);
    assert_eq!(store.params(EffectMode::Wave).wave_speed(), 6.0);
}

proptest! {
    #[test]
    fn direct_writes_are_clamped(
        writes in proptest::collection::vec((arb_mode(), arb_field(), any::<f32>()), 1..64),
    ) {
        let mut store = ParameterStore::default();
        for (mode, field, value) in writes {
            let stored = store.set_value(mode, field, value);
            let (lo, hi) = field.range();
            prop_assert!((lo..=hi).contains(&stored));
        }
        assert_all_in_range(&store);
    }

    #[test]
    fn knob_sweeps_are_clamped(
        moves in proptest::collection::vec((0usize..4, 0u8..8, -2.0f32..3.0), 1..64),
    ) {
        let mut store = ParameterStore::default();
        for (mode, cc, value) in moves {
            store.set_mode(mode);
            store.apply_cc(cc, value);
        }
        assert_all_in_range(&store);
    }

    #[test]
    fn out_of_range_mode_index_is_ignored(index in 4usize..10_000) {
        let mut store = ParameterStore::default();
        store.select(EffectMode::Breath);
        prop_assert!(!store.set_mode(index));
        prop_assert_eq!(store.mode(), EffectMode::Breath);
    }
}
