//! Microphone capture via cpal. The callback mixes to mono and keeps the
//! most recent `capacity` samples; the tick loop copies them out.

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::{Arc, Mutex};

pub struct Capture {
    _stream: cpal::Stream,
    ring: Arc<Mutex<Vec<f32>>>,
    sample_rate: f32,
}

impl Capture {
    pub fn open(capacity: usize) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| anyhow!("no default input device"))?;
        let config = device
            .default_input_config()
            .context("querying input config")?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        log::info!(
            "[capture] {} {:?} rate={} channels={}",
            device.name().unwrap_or_else(|_| "input".into()),
            config.sample_format(),
            sample_rate,
            channels
        );

        let ring = Arc::new(Mutex::new(Vec::with_capacity(capacity * 2)));
        let stream_config: cpal::StreamConfig = config.clone().into();
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_input::<f32>(&device, &stream_config, channels, capacity, ring.clone())
            }
            cpal::SampleFormat::I16 => {
                build_input::<i16>(&device, &stream_config, channels, capacity, ring.clone())
            }
            cpal::SampleFormat::U16 => {
                build_input::<u16>(&device, &stream_config, channels, capacity, ring.clone())
            }
            other => return Err(anyhow!("unsupported sample format {:?}", other)),
        }
        .context("building input stream")?;
        stream.play().context("starting input stream")?;

        Ok(Self {
            _stream: stream,
            ring,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Copy the latest window into `out`. Leaves `out` empty if the lock
    /// is poisoned.
    pub fn snapshot(&self, out: &mut Vec<f32>) {
        out.clear();
        if let Ok(ring) = self.ring.lock() {
            out.extend_from_slice(&ring);
        }
    }
}

fn build_input<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    capacity: usize,
    ring: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = channels.max(1);
    device.build_input_stream(
        config,
        move |data: &[T], _| {
            let Ok(mut ring) = ring.lock() else {
                return;
            };
            for frame in data.chunks(channels) {
                let sum: f32 = frame.iter().map(|s| s.to_sample::<f32>()).sum();
                ring.push(sum / frame.len() as f32);
            }
            let excess = ring.len().saturating_sub(capacity);
            if excess > 0 {
                ring.drain(..excess);
            }
        },
        |err| log::warn!("[capture] stream error: {err}"),
        None,
    )
}
