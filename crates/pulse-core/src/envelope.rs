//! Bass-driven impact envelope with a refractory cooldown.
//!
//! A qualifying bass transient produces a single tick at `on_level`, after
//! which re-triggering is blocked until the cooldown has drained. The
//! trigger tick counts towards the refractory window, so with the reference
//! config (0.1 drained at 0.01 per tick) a sustained bass yields exactly one
//! impact every 10 ticks.

use crate::constants::*;

/// How the cooldown drains between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CooldownDecay {
    /// Fixed amount per tick regardless of elapsed time. Matches the
    /// reference behaviour at the reference frame rate.
    PerTick(f32),
    /// Amount per elapsed second, so the window length is frame-rate
    /// independent.
    PerSecond(f32),
}

impl CooldownDecay {
    /// Per-second equivalent of the per-tick default at the reference rate.
    pub fn frame_rate_independent() -> Self {
        CooldownDecay::PerSecond(COOLDOWN_STEP_PER_TICK * REFERENCE_TICK_HZ)
    }

    fn drain(self, dt_sec: f32) -> f32 {
        match self {
            CooldownDecay::PerTick(step) => step,
            CooldownDecay::PerSecond(rate) => rate * dt_sec.max(0.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct EnvelopeConfig {
    pub threshold: f32,
    pub on_level: f32,
    pub cooldown: f32,
    pub decay: CooldownDecay,
    pub amp_gain: f32,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            threshold: IMPACT_THRESHOLD,
            on_level: IMPACT_LEVEL,
            cooldown: IMPACT_COOLDOWN,
            decay: CooldownDecay::PerTick(COOLDOWN_STEP_PER_TICK),
            amp_gain: IMPACT_AMP_GAIN,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnvelopeState {
    pub level: f32,
    pub cooldown: f32,
}

impl EnvelopeState {
    pub fn is_cooling(&self) -> bool {
        self.cooldown > 0.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct EnvelopeFollower {
    pub config: EnvelopeConfig,
    state: EnvelopeState,
}

impl EnvelopeFollower {
    pub fn new(config: EnvelopeConfig) -> Self {
        Self {
            config,
            state: EnvelopeState::default(),
        }
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Multiplier handed to the deformation engine.
    pub fn amp_factor(&self) -> f32 {
        1.0 + self.state.level * self.config.amp_gain
    }

    /// Advance one tick. `dt_sec` is only read by [`CooldownDecay::PerSecond`].
    pub fn step(&mut self, bass: f32, dt_sec: f32) -> f32 {
        let s = &mut self.state;
        if s.cooldown > 0.0 {
            s.cooldown -= self.config.decay.drain(dt_sec);
            if s.cooldown < COOLDOWN_EPSILON {
                s.cooldown = 0.0;
            }
        }

        if s.cooldown > 0.0 {
            s.level = 0.0;
        } else if bass > self.config.threshold {
            s.level = self.config.on_level;
            s.cooldown = self.config.cooldown;
            log::debug!("[envelope] impact bass={:.3}", bass);
        } else {
            s.level = 0.0;
        }
        s.level
    }

    pub fn reset(&mut self) {
        self.state = EnvelopeState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_input_never_triggers() {
        let mut env = EnvelopeFollower::default();
        for _ in 0..100 {
            assert_eq!(env.step(0.05, 1.0 / 60.0), 0.0);
        }
        assert_eq!(env.amp_factor(), 1.0);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut env = EnvelopeFollower::default();
        assert_eq!(env.step(IMPACT_THRESHOLD, 0.0), 0.0);
        assert_eq!(env.step(IMPACT_THRESHOLD + 1e-4, 0.0), IMPACT_LEVEL);
    }

    #[test]
    fn impact_lasts_one_tick_and_sets_amp_factor() {
        let mut env = EnvelopeFollower::default();
        assert_eq!(env.step(0.5, 0.0), 0.8);
        assert!((env.amp_factor() - 9.0).abs() < 1e-6);
        assert_eq!(env.step(0.5, 0.0), 0.0);
        assert!(env.state().is_cooling());
    }

    #[test]
    fn per_second_decay_depends_on_elapsed_time() {
        let config = EnvelopeConfig {
            decay: CooldownDecay::frame_rate_independent(),
            ..EnvelopeConfig::default()
        };
        // At 30 Hz the window (0.1 / 0.6 per sec ~ 167 ms) spans 5 ticks.
        let mut env = EnvelopeFollower::new(config);
        let hits: Vec<usize> = (0..20)
            .filter(|_| env.step(1.0, 1.0 / 30.0) > 0.0)
            .collect();
        assert_eq!(hits, vec![0, 5, 10, 15]);
    }

    #[test]
    fn reset_clears_cooldown() {
        let mut env = EnvelopeFollower::default();
        env.step(1.0, 0.0);
        env.reset();
        assert_eq!(env.step(1.0, 0.0), IMPACT_LEVEL);
    }
}
