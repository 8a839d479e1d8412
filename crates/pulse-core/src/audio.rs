//! Band-energy and loudness extraction from analyser snapshots.
//!
//! Snapshots follow the WebAudio analyser conventions: frequency data is one
//! byte of normalized magnitude per bin covering `0..sample_rate/2`, and
//! time-domain data is unsigned 8-bit PCM centred on 128. Both functions are
//! pure over their input; a missing snapshot yields silence.

use crate::constants::*;

/// Per-tick band energies. Rebuilt from scratch every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioFrame {
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    pub rms: f32,
}

impl AudioFrame {
    pub const SILENT: AudioFrame = AudioFrame {
        bass: 0.0,
        mid: 0.0,
        high: 0.0,
        rms: 0.0,
    };
}

/// Bucket edges and weights used by [`AudioAnalyzer::bands`].
#[derive(Clone, Debug)]
pub struct BandConfig {
    pub bass_upper_hz: f32,
    pub mid_upper_hz: f32,
    pub high_upper_hz: f32,
    pub bass_weight: f32,
    pub mid_weight: f32,
    pub high_weight: f32,
    pub gain: f32,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            bass_upper_hz: BASS_UPPER_HZ,
            mid_upper_hz: MID_UPPER_HZ,
            high_upper_hz: HIGH_UPPER_HZ,
            bass_weight: BASS_WEIGHT,
            mid_weight: MID_WEIGHT,
            high_weight: HIGH_WEIGHT,
            gain: BAND_GAIN,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AudioAnalyzer {
    pub config: BandConfig,
}

impl AudioAnalyzer {
    pub fn new(config: BandConfig) -> Self {
        Self { config }
    }

    /// Split a byte spectrum into bass/mid/high proportions.
    ///
    /// Each bin contributes `(byte/255)^2` to the unweighted total and its
    /// weighted value to the bucket its centre frequency falls in. Bins above
    /// the high edge count towards the total only.
    pub fn bands(&self, magnitudes: Option<&[u8]>, sample_rate: f32) -> AudioFrame {
        let bins = match magnitudes {
            Some(b) if !b.is_empty() && sample_rate > 0.0 => b,
            _ => return AudioFrame::SILENT,
        };
        let c = &self.config;
        let step = (sample_rate * 0.5) / bins.len() as f32;

        let mut bass = 0.0f32;
        let mut mid = 0.0f32;
        let mut high = 0.0f32;
        let mut total = 0.0f32;
        for (i, &byte) in bins.iter().enumerate() {
            let freq = i as f32 * step;
            let v = byte as f32 / 255.0;
            let energy = v * v;
            total += energy;
            if freq < c.bass_upper_hz {
                bass += energy * c.bass_weight;
            } else if freq < c.mid_upper_hz {
                mid += energy * c.mid_weight;
            } else if freq < c.high_upper_hz {
                high += energy * c.high_weight;
            }
        }

        let normalize = |energy: f32| {
            if total > 0.0 {
                (energy / total * c.gain).min(1.0)
            } else {
                0.0
            }
        };
        AudioFrame {
            bass: normalize(bass),
            mid: normalize(mid),
            high: normalize(high),
            rms: 0.0,
        }
    }

    /// Root-mean-square of a byte waveform rescaled to `[-1, 1]`.
    pub fn loudness(&self, samples: Option<&[u8]>) -> f32 {
        let samples = match samples {
            Some(s) if !s.is_empty() => s,
            _ => return 0.0,
        };
        let sum: f32 = samples
            .iter()
            .map(|&b| {
                let v = (b as f32 - WAVEFORM_MIDPOINT) / WAVEFORM_MIDPOINT;
                v * v
            })
            .sum();
        (sum / samples.len() as f32).sqrt()
    }

    /// Full frame: band split plus waveform RMS.
    pub fn analyze(
        &self,
        magnitudes: Option<&[u8]>,
        waveform: Option<&[u8]>,
        sample_rate: f32,
    ) -> AudioFrame {
        AudioFrame {
            rms: self.loudness(waveform),
            ..self.bands(magnitudes, sample_rate)
        }
    }
}
