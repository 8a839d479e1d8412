use clap::Parser;
use pulse_core::{CloudRefs, Rig, SceneRequest, TickInput};
use std::sync::mpsc::TryRecvError;
use std::time::{Duration, Instant};

mod capture;
mod cli;
mod cloud;
mod console;
mod spectrum;

use cli::Args;
use console::Command;

/// Apply queued console commands. Returns false once `quit` arrives.
fn drain_console(rig: &mut Rig, rx: &std::sync::mpsc::Receiver<Command>) -> bool {
    loop {
        match rx.try_recv() {
            Ok(Command::Key { code, modifiers }) => {
                rig.key(&code, true, modifiers);
            }
            Ok(Command::Up { code }) => {
                rig.key(&code, false, Default::default());
            }
            Ok(Command::Midi {
                device,
                status,
                data1,
                data2,
            }) => {
                if rig.controller(&device, status, data1, data2).is_none() {
                    log::info!("[midi] ignored {} {:#04x} {} {}", device, status, data1, data2);
                }
            }
            Ok(Command::Status) => log::info!("{}", rig.status_line()),
            Ok(Command::Quit) | Err(TryRecvError::Disconnected) => return false,
            Err(TryRecvError::Empty) => return true,
        }
    }
}

fn log_scene_requests(rig: &Rig) {
    for req in rig.take_scene_requests() {
        match req {
            SceneRequest::Model { index, file } => {
                log::info!("[scene] load model #{} {}", index, file)
            }
            SceneRequest::Animation { index, file } => {
                log::info!("[scene] play animation #{} {}", index, file)
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let mut rig = Rig::new(args.rig_config());
    let mut cloud = cloud::PointCloud::sphere(args.points, 1.0, 0.02);
    let mut probe = spectrum::SpectrumProbe::new(args.fft_size);
    log::info!(
        "[native] points={} tick_hz={} fft={}",
        cloud.len(),
        args.tick_hz,
        probe.size()
    );

    let capture = if args.no_mic {
        None
    } else {
        match capture::Capture::open(probe.size()) {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("[native] running without input: {:#}", e);
                None
            }
        }
    };
    let commands = console::spawn()?;

    let interval = Duration::from_secs_f32(args.tick_interval_sec());
    let start = Instant::now();
    let mut last = start;
    let mut last_status = start;
    let mut samples = Vec::with_capacity(probe.size());

    while drain_console(&mut rig, &commands) {
        let now = Instant::now();
        let dt_sec = (now - last).as_secs_f32();
        last = now;
        let elapsed = now - start;
        if args.seconds.is_some_and(|s| elapsed.as_secs_f32() >= s) {
            break;
        }

        let (spectrum, waveform, sample_rate) = match &capture {
            Some(c) => {
                c.snapshot(&mut samples);
                let (s, w) = probe.process(&samples);
                (Some(s), Some(w), c.sample_rate())
            }
            None => (None, None, 0.0),
        };
        let report = rig.tick(TickInput {
            time_ms: elapsed.as_secs_f64() * 1000.0,
            dt_sec,
            spectrum,
            waveform,
            sample_rate,
            cloud: Some(CloudRefs {
                base: &cloud.base,
                centers: &cloud.centers,
                live: &mut cloud.live,
            }),
        });
        if let Some(effect) = report.post_changed {
            log::info!("[post] auto -> {}", effect);
        }
        log_scene_requests(&rig);

        if now - last_status >= Duration::from_secs(1) {
            last_status = now;
            log::info!(
                "{} | bass {:.2} rms {:.2} | scale {:.3}",
                rig.status_line(),
                report.frame.bass,
                report.frame.rms,
                cloud.mean_scale()
            );
        }

        if let Some(rest) = interval.checked_sub(now.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    log::info!("[native] stopped after {:.1}s", start.elapsed().as_secs_f32());
    Ok(())
}
