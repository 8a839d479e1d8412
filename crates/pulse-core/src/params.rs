//! Effect modes, per-mode parameter records and the controller binding table.
//!
//! Every write into a [`ParameterSet`] goes through [`ParamField::clamp`], so a
//! stored value can never leave its declared range.

use crate::constants::{MODE_NOTE_FIRST, MODE_NOTE_LAST};
use crate::error::PulseError;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EffectMode {
    #[default]
    Wave,
    Noise,
    Breath,
    Bubble,
}

impl EffectMode {
    pub const ALL: [EffectMode; 4] = [
        EffectMode::Wave,
        EffectMode::Noise,
        EffectMode::Breath,
        EffectMode::Bubble,
    ];
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectMode::Wave => "wave",
            EffectMode::Noise => "noise",
            EffectMode::Breath => "breath",
            EffectMode::Bubble => "bubble",
        }
    }
}

impl fmt::Display for EffectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectMode {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PulseError::UnknownName {
                kind: "mode",
                name: s.to_string(),
            })
    }
}

/// Keyboard codes that jump straight to a mode.
#[inline]
pub fn mode_for_key(code: &str) -> Option<EffectMode> {
    match code {
        "KeyQ" => Some(EffectMode::Wave),
        "KeyW" => Some(EffectMode::Noise),
        "KeyE" => Some(EffectMode::Breath),
        "KeyT" => Some(EffectMode::Bubble),
        _ => None,
    }
}

/// Keys-device notes 48..=51 map onto the modes in order.
#[inline]
pub fn mode_for_note(note: u8) -> Option<EffectMode> {
    if (MODE_NOTE_FIRST..=MODE_NOTE_LAST).contains(&note) {
        EffectMode::from_index((note - MODE_NOTE_FIRST) as usize)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamField {
    WaveFreq,
    WaveSpeed,
    Amp,
    NoiseAmp,
    NoiseSpeed,
    BreathSpeed,
    BreathAmp,
    BubbleWaveAmp,
    BubbleNoiseAmp,
    BubbleBreathAmp,
}

impl ParamField {
    pub const ALL: [ParamField; 10] = [
        ParamField::WaveFreq,
        ParamField::WaveSpeed,
        ParamField::Amp,
        ParamField::NoiseAmp,
        ParamField::NoiseSpeed,
        ParamField::BreathSpeed,
        ParamField::BreathAmp,
        ParamField::BubbleWaveAmp,
        ParamField::BubbleNoiseAmp,
        ParamField::BubbleBreathAmp,
    ];

    /// Inclusive `(min, max)` a stored value must stay within.
    pub fn range(self) -> (f32, f32) {
        match self {
            ParamField::WaveFreq => (0.1, 100.0),
            ParamField::WaveSpeed => (0.05, 20.0),
            ParamField::Amp => (0.1, 10.0),
            ParamField::NoiseAmp => (0.1, 5.0),
            ParamField::NoiseSpeed => (0.1, 50.0),
            ParamField::BreathSpeed => (0.05, 5.0),
            ParamField::BreathAmp => (0.05, 1.5),
            ParamField::BubbleWaveAmp => (0.0, 4.0),
            ParamField::BubbleNoiseAmp => (0.0, 4.0),
            ParamField::BubbleBreathAmp => (0.0, 2.0),
        }
    }

    /// Clamp into range. NaN collapses to the lower bound.
    pub fn clamp(self, value: f32) -> f32 {
        let (lo, hi) = self.range();
        if value.is_nan() {
            lo
        } else {
            value.clamp(lo, hi)
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamField::WaveFreq => "wave_freq",
            ParamField::WaveSpeed => "wave_speed",
            ParamField::Amp => "amp",
            ParamField::NoiseAmp => "noise_amp",
            ParamField::NoiseSpeed => "noise_speed",
            ParamField::BreathSpeed => "breath_speed",
            ParamField::BreathAmp => "breath_amp",
            ParamField::BubbleWaveAmp => "bubble_wave_amp",
            ParamField::BubbleNoiseAmp => "bubble_noise_amp",
            ParamField::BubbleBreathAmp => "bubble_breath_amp",
        }
    }
}

impl FromStr for ParamField {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PulseError::UnknownName {
                kind: "parameter",
                name: s.to_string(),
            })
    }
}

/// Parameters read by the deformation engine. Fields are private so the
/// only way in is a clamped setter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet {
    wave_freq: f32,
    wave_speed: f32,
    amp: f32,
    noise_amp: f32,
    noise_speed: f32,
    breath_speed: f32,
    breath_amp: f32,
    bubble_wave_amp: f32,
    bubble_noise_amp: f32,
    bubble_breath_amp: f32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            wave_freq: 15.0,
            wave_speed: 6.0,
            amp: 3.0,
            noise_amp: 2.0,
            noise_speed: 10.0,
            breath_speed: 1.5,
            breath_amp: 0.4,
            bubble_wave_amp: 1.0,
            bubble_noise_amp: 1.0,
            bubble_breath_amp: 0.5,
        }
    }
}

impl ParameterSet {
    pub fn get(&self, field: ParamField) -> f32 {
        match field {
            ParamField::WaveFreq => self.wave_freq,
            ParamField::WaveSpeed => self.wave_speed,
            ParamField::Amp => self.amp,
            ParamField::NoiseAmp => self.noise_amp,
            ParamField::NoiseSpeed => self.noise_speed,
            ParamField::BreathSpeed => self.breath_speed,
            ParamField::BreathAmp => self.breath_amp,
            ParamField::BubbleWaveAmp => self.bubble_wave_amp,
            ParamField::BubbleNoiseAmp => self.bubble_noise_amp,
            ParamField::BubbleBreathAmp => self.bubble_breath_amp,
        }
    }

    /// Store `value` clamped to the field range; returns what was stored.
    pub fn set(&mut self, field: ParamField, value: f32) -> f32 {
        let v = field.clamp(value);
        let slot = match field {
            ParamField::WaveFreq => &mut self.wave_freq,
            ParamField::WaveSpeed => &mut self.wave_speed,
            ParamField::Amp => &mut self.amp,
            ParamField::NoiseAmp => &mut self.noise_amp,
            ParamField::NoiseSpeed => &mut self.noise_speed,
            ParamField::BreathSpeed => &mut self.breath_speed,
            ParamField::BreathAmp => &mut self.breath_amp,
            ParamField::BubbleWaveAmp => &mut self.bubble_wave_amp,
            ParamField::BubbleNoiseAmp => &mut self.bubble_noise_amp,
            ParamField::BubbleBreathAmp => &mut self.bubble_breath_amp,
        };
        *slot = v;
        v
    }

    pub fn wave_freq(&self) -> f32 {
        self.wave_freq
    }
    pub fn wave_speed(&self) -> f32 {
        self.wave_speed
    }
    pub fn amp(&self) -> f32 {
        self.amp
    }
    pub fn noise_amp(&self) -> f32 {
        self.noise_amp
    }
    pub fn noise_speed(&self) -> f32 {
        self.noise_speed
    }
    pub fn breath_speed(&self) -> f32 {
        self.breath_speed
    }
    pub fn breath_amp(&self) -> f32 {
        self.breath_amp
    }
    pub fn bubble_wave_amp(&self) -> f32 {
        self.bubble_wave_amp
    }
    pub fn bubble_noise_amp(&self) -> f32 {
        self.bubble_noise_amp
    }
    pub fn bubble_breath_amp(&self) -> f32 {
        self.bubble_breath_amp
    }
}

/// `value = clamp(offset + raw * scale, min, max)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub offset: f32,
    pub min: f32,
    pub max: f32,
}

impl Transform {
    pub const fn linear(scale: f32, offset: f32, min: f32, max: f32) -> Self {
        Self {
            scale,
            offset,
            min,
            max,
        }
    }

    pub fn apply(&self, raw: f32) -> f32 {
        let v = self.offset + raw * self.scale;
        if v.is_nan() {
            self.min
        } else {
            v.clamp(self.min, self.max)
        }
    }
}

/// One row of the controller mapping: continuous controller `cc` drives
/// `field` of `mode`'s parameter set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Binding {
    pub mode: EffectMode,
    pub cc: u8,
    pub field: ParamField,
    pub transform: Transform,
}

const fn bind(mode: EffectMode, cc: u8, field: ParamField, transform: Transform) -> Binding {
    Binding {
        mode,
        cc,
        field,
        transform,
    }
}

const DEFAULT_BINDINGS: [Binding; 12] = [
    bind(
        EffectMode::Wave,
        0,
        ParamField::WaveFreq,
        Transform::linear(30.0, 5.0, 0.1, 100.0),
    ),
    bind(
        EffectMode::Wave,
        1,
        ParamField::WaveSpeed,
        Transform::linear(10.0, 0.0, 0.05, 20.0),
    ),
    bind(
        EffectMode::Wave,
        2,
        ParamField::Amp,
        Transform::linear(5.0, 0.0, 0.1, 10.0),
    ),
    bind(
        EffectMode::Noise,
        0,
        ParamField::NoiseSpeed,
        Transform::linear(20.0, 0.0, 0.1, 50.0),
    ),
    bind(
        EffectMode::Noise,
        1,
        ParamField::NoiseAmp,
        Transform::linear(3.0, 0.0, 0.1, 5.0),
    ),
    bind(
        EffectMode::Noise,
        2,
        ParamField::Amp,
        Transform::linear(2.0, 0.0, 0.1, 3.0),
    ),
    bind(
        EffectMode::Breath,
        0,
        ParamField::BreathSpeed,
        Transform::linear(3.0, 0.0, 0.05, 5.0),
    ),
    bind(
        EffectMode::Breath,
        1,
        ParamField::BreathAmp,
        Transform::linear(0.8, 0.0, 0.05, 1.5),
    ),
    bind(
        EffectMode::Breath,
        2,
        ParamField::Amp,
        Transform::linear(2.0, 0.0, 0.1, 3.0),
    ),
    bind(
        EffectMode::Bubble,
        0,
        ParamField::WaveSpeed,
        Transform::linear(12.0, 0.0, 0.05, 20.0),
    ),
    bind(
        EffectMode::Bubble,
        1,
        ParamField::BubbleNoiseAmp,
        Transform::linear(2.5, 0.0, 0.0, 4.0),
    ),
    bind(
        EffectMode::Bubble,
        2,
        ParamField::BubbleBreathAmp,
        Transform::linear(1.2, 0.0, 0.0, 2.0),
    ),
];

/// Declarative `(mode, cc) -> (field, transform)` lookup. Read-only once the
/// rig is built.
#[derive(Clone, Debug, PartialEq)]
pub struct BindingTable {
    rows: Vec<Binding>,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new(DEFAULT_BINDINGS.to_vec())
    }
}

impl BindingTable {
    pub fn new(rows: Vec<Binding>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Binding] {
        &self.rows
    }

    pub fn for_cc(&self, mode: EffectMode, cc: u8) -> Option<&Binding> {
        self.rows.iter().find(|b| b.mode == mode && b.cc == cc)
    }

    pub fn for_field(&self, mode: EffectMode, field: ParamField) -> Option<&Binding> {
        self.rows.iter().find(|b| b.mode == mode && b.field == field)
    }
}

/// Active mode plus one parameter record per mode.
#[derive(Clone, Debug)]
pub struct ParameterStore {
    mode: EffectMode,
    sets: [ParameterSet; EffectMode::COUNT],
    bindings: BindingTable,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(BindingTable::default())
    }
}

impl ParameterStore {
    pub fn new(bindings: BindingTable) -> Self {
        Self {
            mode: EffectMode::default(),
            sets: Default::default(),
            bindings,
        }
    }

    pub fn mode(&self) -> EffectMode {
        self.mode
    }

    pub fn params(&self, mode: EffectMode) -> &ParameterSet {
        &self.sets[mode.index()]
    }

    pub fn active(&self) -> &ParameterSet {
        self.params(self.mode)
    }

    /// Switch by index. Out-of-range indices are ignored rather than wrapped.
    pub fn set_mode(&mut self, index: usize) -> bool {
        match EffectMode::from_index(index) {
            Some(mode) => {
                self.select(mode);
                true
            }
            None => false,
        }
    }

    pub fn select(&mut self, mode: EffectMode) {
        if mode != self.mode {
            log::info!("[params] mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    pub fn next_mode(&mut self) -> EffectMode {
        self.select(self.mode.next());
        self.mode
    }

    /// Direct write, clamped to the field range.
    pub fn set_value(&mut self, mode: EffectMode, field: ParamField, value: f32) -> f32 {
        self.sets[mode.index()].set(field, value)
    }

    /// Apply a raw controller value through the `(mode, field)` binding.
    /// Returns the stored value, or `None` when no binding exists.
    pub fn set_param(&mut self, mode: EffectMode, field: ParamField, raw: f32) -> Option<f32> {
        let transform = self.bindings.for_field(mode, field)?.transform;
        Some(self.set_value(mode, field, transform.apply(raw)))
    }

    /// Route a normalized control-change through the active mode's bindings.
    pub fn apply_cc(&mut self, cc: u8, value: f32) -> Option<(ParamField, f32)> {
        let binding = *self.bindings.for_cc(self.mode, cc)?;
        let stored = self.set_value(binding.mode, binding.field, binding.transform.apply(value));
        Some((binding.field, stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let p = ParameterSet::default();
        assert_eq!(p.wave_freq(), 15.0);
        assert_eq!(p.wave_speed(), 6.0);
        assert_eq!(p.amp(), 3.0);
        assert_eq!(p.noise_amp(), 2.0);
        assert_eq!(p.noise_speed(), 10.0);
        assert_eq!(p.breath_speed(), 1.5);
        assert_eq!(p.breath_amp(), 0.4);
        for f in ParamField::ALL {
            let (lo, hi) = f.range();
            assert!(p.get(f) >= lo && p.get(f) <= hi, "{} default out of range", f.name());
        }
    }

    #[test]
    fn every_binding_stays_inside_its_field_range() {
        for b in BindingTable::default().rows() {
            let (lo, hi) = b.field.range();
            assert!(b.transform.min >= lo && b.transform.max <= hi, "{:?}", b);
        }
    }

    #[test]
    fn wave_freq_knob_maps_affinely() {
        let mut store = ParameterStore::default();
        assert_eq!(store.apply_cc(0, 0.0), Some((ParamField::WaveFreq, 5.0)));
        assert_eq!(store.apply_cc(0, 1.0), Some((ParamField::WaveFreq, 35.0)));
    }

    #[test]
    fn knob_targets_follow_active_mode() {
        let mut store = ParameterStore::default();
        store.select(EffectMode::Noise);
        assert_eq!(store.apply_cc(2, 1.0), Some((ParamField::Amp, 2.0)));
        // The wave record is untouched by a noise-mode knob.
        assert_eq!(store.params(EffectMode::Wave).amp(), 3.0);
        assert_eq!(store.params(EffectMode::Noise).amp(), 2.0);
        store.apply_cc(2, 0.5);
        assert_eq!(store.params(EffectMode::Noise).amp(), 1.0);
        assert_eq!(store.params(EffectMode::Wave).amp(), 3.0);
    }

    #[test]
    fn unknown_cc_and_field_pairs_are_noops() {
        let mut store = ParameterStore::default();
        let before = store.clone();
        assert_eq!(store.apply_cc(99, 1.0), None);
        assert_eq!(store.set_param(EffectMode::Wave, ParamField::BubbleNoiseAmp, 1.0), None);
        assert_eq!(store.active(), before.active());
    }

    #[test]
    fn set_mode_ignores_out_of_range() {
        let mut store = ParameterStore::default();
        store.select(EffectMode::Breath);
        assert!(!store.set_mode(4));
        assert!(!store.set_mode(usize::MAX));
        assert_eq!(store.mode(), EffectMode::Breath);
        assert!(store.set_mode(3));
        assert_eq!(store.mode(), EffectMode::Bubble);
    }

    #[test]
    fn nan_is_clamped_to_lower_bound() {
        let mut store = ParameterStore::default();
        let v = store.set_value(EffectMode::Wave, ParamField::WaveFreq, f32::NAN);
        assert_eq!(v, 0.1);
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("Bubble".parse::<EffectMode>(), Ok(EffectMode::Bubble));
        assert_eq!("WAVE_FREQ".parse::<ParamField>(), Ok(ParamField::WaveFreq));
        assert!("sparkle".parse::<EffectMode>().is_err());
    }

    #[test]
    fn mode_notes_cover_exactly_four_keys() {
        assert_eq!(mode_for_note(47), None);
        assert_eq!(mode_for_note(48), Some(EffectMode::Wave));
        assert_eq!(mode_for_note(51), Some(EffectMode::Bubble));
        assert_eq!(mode_for_note(52), None);
    }
}
