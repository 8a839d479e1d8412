//! The deformation rig: owns the router and every piece of shared state,
//! and runs one analyzer -> envelope -> deformation pass per tick.
//!
//! Controllers are registered with the router at construction. Each handler
//! captures `Rc<RefCell<_>>` clones of the state it mutates; the rig keeps
//! the other clone for ticking and for host queries.

use crate::audio::{AudioAnalyzer, AudioFrame, BandConfig};
use crate::constants::DEFAULT_SEED;
use crate::deform::{deform, ShapeBuffers};
use crate::display;
use crate::envelope::{EnvelopeConfig, EnvelopeFollower, EnvelopeState};
use crate::input::{ControllerMessage, DeviceRole, DeviceTable, InputEvent, InputRouter, Modifiers};
use crate::monitor::MonitorGain;
use crate::params::{mode_for_key, mode_for_note, BindingTable, EffectMode, ParameterStore};
use crate::post::{command_for_key, command_for_note, PostConfig, PostEffect, PostEffectSelector};
use crate::scene::{SceneCatalog, SceneCommand, SceneCursor, SceneRequest};
use crate::stage::StageControls;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug)]
pub struct RigConfig {
    pub bands: BandConfig,
    pub envelope: EnvelopeConfig,
    pub devices: DeviceTable,
    pub bindings: BindingTable,
    pub post: PostConfig,
    pub scene: SceneCatalog,
    pub seed: u64,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            bands: BandConfig::default(),
            envelope: EnvelopeConfig::default(),
            devices: DeviceTable::default(),
            bindings: BindingTable::default(),
            post: PostConfig::default(),
            scene: SceneCatalog::default(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Attribute slices for one tick. Shape is validated by the rig.
pub struct CloudRefs<'a> {
    pub base: &'a [f32],
    pub centers: &'a [f32],
    pub live: &'a mut [f32],
}

#[derive(Default)]
pub struct TickInput<'a> {
    pub time_ms: f64,
    pub dt_sec: f32,
    pub spectrum: Option<&'a [u8]>,
    pub waveform: Option<&'a [u8]>,
    pub sample_rate: f32,
    pub cloud: Option<CloudRefs<'a>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub frame: AudioFrame,
    pub envelope: EnvelopeState,
    pub amp_factor: f32,
    pub mode: EffectMode,
    /// Elements written, or `None` when no usable buffers were supplied.
    pub deformed: Option<usize>,
    /// Set when the post auto-cycle switched effect this tick.
    pub post_changed: Option<PostEffect>,
}

pub struct Rig {
    router: InputRouter,
    analyzer: AudioAnalyzer,
    envelope: EnvelopeFollower,
    params: Rc<RefCell<ParameterStore>>,
    stage: Rc<RefCell<StageControls>>,
    post: Rc<RefCell<PostEffectSelector>>,
    scene: Rc<RefCell<SceneCursor>>,
    requests: Rc<RefCell<Vec<SceneRequest>>>,
    monitor: Rc<RefCell<MonitorGain>>,
}

impl Default for Rig {
    fn default() -> Self {
        Self::new(RigConfig::default())
    }
}

impl Rig {
    pub fn new(config: RigConfig) -> Self {
        let mut rig = Self {
            router: InputRouter::new(config.devices),
            analyzer: AudioAnalyzer::new(config.bands),
            envelope: EnvelopeFollower::new(config.envelope),
            params: Rc::new(RefCell::new(ParameterStore::new(config.bindings))),
            stage: Rc::new(RefCell::new(StageControls::default())),
            post: Rc::new(RefCell::new(PostEffectSelector::new(config.post, config.seed))),
            scene: Rc::new(RefCell::new(SceneCursor::new(config.scene))),
            requests: Rc::new(RefCell::new(Vec::new())),
            monitor: Rc::new(RefCell::new(MonitorGain::default())),
        };
        rig.register_handlers();
        rig
    }

    fn register_handlers(&mut self) {
        let params = self.params.clone();
        self.router.register("mode", move |ev| {
            let mut store = params.try_borrow_mut()?;
            match ev {
                InputEvent::Key(k) => {
                    if let Some(mode) = mode_for_key(&k.code) {
                        store.select(mode);
                    }
                }
                InputEvent::Controller(c) => match (c.role, c.message) {
                    (DeviceRole::Keys, ControllerMessage::NoteOn { note, .. }) => {
                        if let Some(mode) = mode_for_note(note) {
                            store.select(mode);
                        }
                    }
                    (DeviceRole::Knobs, ControllerMessage::ControlChange { cc, value }) => {
                        if let Some((field, v)) = store.apply_cc(cc, value) {
                            log::debug!("[midi] {} {}={:.3}", store.mode(), field.name(), v);
                        }
                    }
                    _ => {}
                },
            }
            Ok(())
        });

        let stage = self.stage.clone();
        self.router.register("stage", move |ev| {
            let mut stage = stage.try_borrow_mut()?;
            if let Some(k) = ev.key() {
                stage.apply_key(&k.code, k.modifiers.ctrl);
            } else if let Some(ControllerMessage::ControlChange { cc, value }) =
                ev.from_role(DeviceRole::Knobs)
            {
                stage.apply_cc(cc, value);
            }
            Ok(())
        });

        let post = self.post.clone();
        self.router.register("post", move |ev| {
            let command = match ev {
                InputEvent::Key(k) if !k.modifiers.ctrl => command_for_key(&k.code),
                InputEvent::Controller(_) => match ev.from_role(DeviceRole::Keys) {
                    Some(ControllerMessage::NoteOn { note, .. }) => command_for_note(note),
                    _ => None,
                },
                _ => None,
            };
            if let Some(command) = command {
                post.try_borrow_mut()?.apply(command);
            }
            Ok(())
        });

        let scene = self.scene.clone();
        let requests = self.requests.clone();
        self.router.register("scene", move |ev| {
            let mut cursor = scene.try_borrow_mut()?;
            let command = match ev {
                InputEvent::Key(k) => SceneCommand::for_key(&k.code, k.modifiers.shift),
                InputEvent::Controller(_) => match ev.from_role(DeviceRole::Pad) {
                    Some(ControllerMessage::NoteOn { note, .. }) => {
                        SceneCommand::for_pad_note(note, cursor.catalog())
                    }
                    _ => None,
                },
            };
            if let Some(request) = command.and_then(|c| cursor.apply(c)) {
                requests.try_borrow_mut()?.push(request);
            }
            Ok(())
        });

        let monitor = self.monitor.clone();
        self.router.register("monitor", move |ev| {
            match ev.key() {
                Some(k) if k.modifiers.ctrl => {
                    monitor.try_borrow_mut()?.apply_key(&k.code);
                }
                _ => {}
            }
            Ok(())
        });
    }

    /// Keyboard transition from the host.
    pub fn key(&mut self, code: &str, pressed: bool, modifiers: Modifiers) -> usize {
        self.router.dispatch(code, pressed, modifiers)
    }

    /// Raw controller triple from the host, tagged with its device name.
    pub fn controller(&mut self, device: &str, status: u8, data1: u8, data2: u8) -> Option<usize> {
        self.router.dispatch_controller(device, status, data1, data2)
    }

    pub fn tick(&mut self, input: TickInput<'_>) -> TickReport {
        let frame = self
            .analyzer
            .analyze(input.spectrum, input.waveform, input.sample_rate);
        self.envelope.step(frame.bass, input.dt_sec);
        let amp_factor = self.envelope.amp_factor();
        let post_changed = self.post.borrow_mut().advance(input.dt_sec);

        let store = self.params.borrow();
        let mode = store.mode();
        let deformed = input.cloud.and_then(|cloud| {
            match ShapeBuffers::new(cloud.base, cloud.centers, cloud.live) {
                Ok(mut bufs) => {
                    deform(mode, store.active(), input.time_ms, amp_factor, &mut bufs);
                    Some(bufs.element_count())
                }
                Err(e) => {
                    log::warn!("[tick] skipping deformation: {}", e);
                    None
                }
            }
        });

        TickReport {
            frame,
            envelope: self.envelope.state(),
            amp_factor,
            mode,
            deformed,
            post_changed,
        }
    }

    pub fn take_scene_requests(&self) -> Vec<SceneRequest> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn params(&self) -> Ref<'_, ParameterStore> {
        self.params.borrow()
    }

    pub fn mode(&self) -> EffectMode {
        self.params.borrow().mode()
    }

    pub fn envelope(&self) -> EnvelopeState {
        self.envelope.state()
    }

    pub fn post_effect(&self) -> PostEffect {
        self.post.borrow().current()
    }

    pub fn post_auto(&self) -> bool {
        self.post.borrow().is_auto()
    }

    pub fn stage(&self) -> StageControls {
        self.stage.borrow().clone()
    }

    pub fn monitor_gain(&self) -> f32 {
        self.monitor.borrow().gain()
    }

    pub fn scene(&self) -> Ref<'_, SceneCursor> {
        self.scene.borrow()
    }

    pub fn mode_summary(&self) -> String {
        display::mode_summary(&self.params.borrow())
    }

    pub fn status_line(&self) -> String {
        display::status_line(
            &self.params.borrow(),
            self.post_effect(),
            &self.stage.borrow(),
            &self.monitor.borrow(),
        )
    }
}
