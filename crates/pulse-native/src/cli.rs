//! Command-line argument parsing.

use clap::Parser;
use pulse_core::{CooldownDecay, EnvelopeConfig, RigConfig};

#[derive(Parser, Debug)]
#[command(name = "pulse-native")]
#[command(
    about = "Headless audio-reactive point-cloud rig driven by mic and console commands",
    long_about = None
)]
pub struct Args {
    /// Ticks per second
    #[arg(long, value_name = "HZ", default_value = "60")]
    pub tick_hz: f32,

    /// Stop after this many seconds (runs until `quit` when omitted)
    #[arg(long, value_name = "SECONDS")]
    pub seconds: Option<f32>,

    /// Number of elements in the synthetic point cloud
    #[arg(long, value_name = "COUNT", default_value = "2048")]
    pub points: usize,

    /// Analysis window length in samples (power of two)
    #[arg(long, value_name = "SAMPLES", default_value = "2048")]
    pub fft_size: usize,

    /// Run without opening an input device
    #[arg(long)]
    pub no_mic: bool,

    /// Drain the impact cooldown per elapsed second instead of per tick
    #[arg(long)]
    pub per_second_decay: bool,

    /// Seed for random post-effect picks
    #[arg(long, default_value = "42")]
    pub seed: u64,
}

impl Args {
    pub fn rig_config(&self) -> RigConfig {
        let mut envelope = EnvelopeConfig::default();
        if self.per_second_decay {
            envelope.decay = CooldownDecay::frame_rate_independent();
            log::info!("[cli] cooldown drains per second");
        }
        RigConfig {
            envelope,
            seed: self.seed,
            ..RigConfig::default()
        }
    }

    pub fn tick_interval_sec(&self) -> f32 {
        1.0 / self.tick_hz.clamp(1.0, 1000.0)
    }
}
