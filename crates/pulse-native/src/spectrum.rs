//! Byte spectrum and waveform snapshots in the shape the browser's analyser
//! node produces, so the core sees the same input on both hosts.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;
const SMOOTHING: f32 = 0.8;

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

pub struct SpectrumProbe {
    fft: Arc<dyn Fft<f32>>,
    size: usize,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    spectrum: Vec<u8>,
    waveform: Vec<u8>,
}

impl SpectrumProbe {
    pub fn new(size: usize) -> Self {
        let size = size.max(2).next_power_of_two();
        let mut planner = FftPlanner::new();
        Self {
            fft: planner.plan_fft_forward(size),
            size,
            scratch: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; size / 2],
            spectrum: vec![0; size / 2],
            waveform: vec![128; size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Analyse the most recent `size` samples (zero-padded at the front when
    /// fewer are available) and return `(spectrum, waveform)`.
    pub fn process(&mut self, samples: &[f32]) -> (&[u8], &[u8]) {
        let take = samples.len().min(self.size);
        let pad = self.size - take;
        let recent = &samples[samples.len() - take..];

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(s * hann_window(i, self.size), 0.0);
        }
        for (i, byte) in self.waveform.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { recent[i - pad] };
            *byte = (128.0 + s * 128.0).clamp(0.0, 255.0) as u8;
        }

        self.fft.process(&mut self.scratch);

        let norm = 1.0 / self.size as f32;
        let range = MAX_DECIBELS - MIN_DECIBELS;
        for ((bin, smooth), byte) in self
            .scratch
            .iter()
            .zip(self.smoothed.iter_mut())
            .zip(self.spectrum.iter_mut())
        {
            let magnitude = bin.norm() * norm;
            *smooth = SMOOTHING * *smooth + (1.0 - SMOOTHING) * magnitude;
            let db = if *smooth > 0.0 {
                20.0 * smooth.log10()
            } else {
                MIN_DECIBELS
            };
            *byte = (255.0 * (db - MIN_DECIBELS) / range).clamp(0.0, 255.0) as u8;
        }

        (&self.spectrum, &self.waveform)
    }
}
