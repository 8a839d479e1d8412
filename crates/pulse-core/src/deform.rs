//! Per-element scale deformation of a packed point cloud.
//!
//! Each element is a 6-channel record (an upper-triangular 3x3 covariance:
//! xx, xy, xz, yy, yz, zz). Only the diagonal channels are scaled; the
//! off-diagonal channels of `live` are left for the caller to own.

use crate::constants::*;
use crate::error::PulseError;
use crate::params::{EffectMode, ParameterSet};
use std::f64::consts::TAU;

/// Borrowed attribute buffers for one tick.
pub struct ShapeBuffers<'a> {
    base: &'a [f32],
    centers: &'a [f32],
    live: &'a mut [f32],
}

impl<'a> ShapeBuffers<'a> {
    /// Checks `live.len() == base.len()`, `base.len() % 6 == 0` and one
    /// 3-vector of `centers` per element.
    pub fn new(
        base: &'a [f32],
        centers: &'a [f32],
        live: &'a mut [f32],
    ) -> Result<Self, PulseError> {
        let elements = base.len() / CHANNELS_PER_ELEMENT;
        let ok = live.len() == base.len()
            && base.len() % CHANNELS_PER_ELEMENT == 0
            && centers.len() == elements * CENTER_COMPONENTS;
        if !ok {
            return Err(PulseError::BufferShape {
                base: base.len(),
                live: live.len(),
                centers: centers.len(),
            });
        }
        Ok(Self {
            base,
            centers,
            live,
        })
    }

    pub fn element_count(&self) -> usize {
        self.base.len() / CHANNELS_PER_ELEMENT
    }

    pub fn live(&self) -> &[f32] {
        &*self.live
    }
}

/// Scale factor for one element, before the diagonal write.
#[inline]
fn element_scale(
    mode: EffectMode,
    p: &ParameterSet,
    t: f64,
    channel: f64,
    y: f64,
    breath: f64,
) -> f64 {
    match mode {
        EffectMode::Wave => {
            1.0 + (y * p.wave_freq() as f64 + t * p.wave_speed() as f64).sin() * p.amp() as f64
        }
        EffectMode::Noise => {
            let n = (channel * NOISE_PHASE_PER_CHANNEL + t * p.noise_speed() as f64).sin()
                * p.noise_amp() as f64;
            1.0 + NOISE_DEPTH * n
        }
        EffectMode::Breath => 1.0 + breath * p.breath_amp() as f64,
        EffectMode::Bubble => {
            let wave = (y * BUBBLE_WAVE_FREQ_RATIO * p.wave_freq() as f64
                + t * BUBBLE_WAVE_SPEED_RATIO * p.wave_speed() as f64)
                .sin()
                * p.bubble_wave_amp() as f64;
            let noise = (channel * BUBBLE_NOISE_PHASE_PER_CHANNEL
                + t * BUBBLE_NOISE_SPEED_RATIO * p.noise_speed() as f64)
                .sin()
                * p.bubble_noise_amp() as f64;
            let breath = breath * p.bubble_breath_amp() as f64;
            1.0 + (wave + noise + breath) * BUBBLE_DEPTH
        }
    }
}

/// Overwrite the diagonal channels of `bufs.live` with `base * scale`.
///
/// Deterministic in its arguments. Phases are evaluated in `f64` so long
/// sessions (large `t_ms`) keep their precision.
pub fn deform(
    mode: EffectMode,
    params: &ParameterSet,
    t_ms: f64,
    amp_factor: f32,
    bufs: &mut ShapeBuffers<'_>,
) {
    let t = t_ms * 0.001;
    let a = amp_factor as f64;
    // Breath phase is uniform across elements.
    let breath = (t * params.breath_speed() as f64 * TAU).sin();

    let records = bufs
        .base
        .chunks_exact(CHANNELS_PER_ELEMENT)
        .zip(bufs.live.chunks_exact_mut(CHANNELS_PER_ELEMENT))
        .zip(bufs.centers.chunks_exact(CENTER_COMPONENTS));
    for (e, ((base, live), center)) in records.enumerate() {
        let channel = (e * CHANNELS_PER_ELEMENT) as f64;
        let s = element_scale(mode, params, t, channel, center[1] as f64, breath) * a;
        for k in DIAGONAL_CHANNELS {
            live[k] = (base[k] as f64 * s) as f32;
        }
    }
}
