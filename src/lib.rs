#![cfg(target_arch = "wasm32")]
use instant::Instant;
use pulse_core::{CloudRefs, Rig, RigConfig, SceneRequest, TickInput};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

mod audio;
mod events;
mod overlay;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("pulse-web starting");
    Ok(())
}

fn scene_request_to_js(req: &SceneRequest) -> anyhow::Result<JsValue> {
    let (kind, index, file) = match req {
        SceneRequest::Model { index, file } => ("model", *index, file),
        SceneRequest::Animation { index, file } => ("animation", *index, file),
    };
    let obj = js_sys::Object::new();
    for (key, value) in [
        ("kind", JsValue::from_str(kind)),
        ("index", JsValue::from_f64(index as f64)),
        ("file", JsValue::from_str(file)),
    ] {
        js_sys::Reflect::set(&obj, &JsValue::from_str(key), &value)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(obj.into())
}

/// JS-facing handle. The page owns rendering and asset loading; this drives
/// the rig from its animation frame and forwards controller messages.
#[wasm_bindgen]
pub struct PulseHost {
    rig: Rc<RefCell<Rig>>,
    tap: Option<audio::AnalyserTap>,
    last_instant: Option<Instant>,
}

#[wasm_bindgen]
impl PulseHost {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PulseHost {
        let rig = Rc::new(RefCell::new(Rig::new(RigConfig::default())));
        events::wire_keyboard(&rig);
        overlay::refresh(&rig.borrow().status_line());
        PulseHost {
            rig,
            tap: None,
            last_instant: None,
        }
    }

    pub fn attach_analyser(&mut self, node: web::AnalyserNode, sample_rate: f32) {
        self.tap = Some(audio::AnalyserTap::new(node, sample_rate));
    }

    /// One frame: analyse, step the envelope, deform `live` in place.
    /// Returns the amp factor applied this frame.
    pub fn tick(&mut self, time_ms: f64, base: &[f32], centers: &[f32], live: &mut [f32]) -> f32 {
        let now = Instant::now();
        let dt_sec = self
            .last_instant
            .map(|prev| now.duration_since(prev).as_secs_f32())
            .unwrap_or(0.0);
        self.last_instant = Some(now);

        let sample_rate = self.tap.as_ref().map_or(0.0, |t| t.sample_rate());
        let (spectrum, waveform) = match self.tap.as_mut() {
            Some(tap) => {
                let (s, w) = tap.read();
                (Some(s), Some(w))
            }
            None => (None, None),
        };
        let cloud = (!base.is_empty()).then_some(CloudRefs {
            base,
            centers,
            live,
        });

        let Ok(mut rig) = self.rig.try_borrow_mut() else {
            return 1.0;
        };
        let report = rig.tick(TickInput {
            time_ms,
            dt_sec,
            spectrum,
            waveform,
            sample_rate,
            cloud,
        });
        if let Some(effect) = report.post_changed {
            log::info!("[post] auto -> {}", effect);
            overlay::refresh(&rig.status_line());
        }
        report.amp_factor
    }

    /// Controller message from Web MIDI. Returns false when the device or
    /// status was not recognised.
    pub fn midi(&mut self, device: &str, status: u8, data1: u8, data2: u8) -> bool {
        let Ok(mut rig) = self.rig.try_borrow_mut() else {
            return false;
        };
        let handled = rig.controller(device, status, data1, data2).is_some();
        if handled {
            overlay::refresh(&rig.status_line());
        }
        handled
    }

    pub fn post_effect(&self) -> String {
        self.rig.borrow().post_effect().name().to_string()
    }

    pub fn take_scene_requests(&self) -> js_sys::Array {
        let out = js_sys::Array::new();
        for req in self.rig.borrow().take_scene_requests() {
            match scene_request_to_js(&req) {
                Ok(v) => {
                    out.push(&v);
                }
                Err(e) => log::warn!("[scene] dropped request: {:#}", e),
            }
        }
        out
    }

    pub fn monitor_gain(&self) -> f32 {
        self.rig.borrow().monitor_gain()
    }

    pub fn animation_speed(&self) -> f32 {
        self.rig.borrow().stage().animation_speed
    }

    /// `[x, y, z, pitch, yaw]`
    pub fn camera(&self) -> Vec<f32> {
        let stage = self.rig.borrow().stage();
        vec![
            stage.offset.x,
            stage.offset.y,
            stage.offset.z,
            stage.rotation.x,
            stage.rotation.y,
        ]
    }

    pub fn status_line(&self) -> String {
        self.rig.borrow().status_line()
    }
}

impl Default for PulseHost {
    fn default() -> Self {
        Self::new()
    }
}
