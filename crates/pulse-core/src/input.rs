//! Keyboard and controller routing.
//!
//! One [`InputRouter`] owns every handler; keyboard presses and classified
//! controller messages both arrive as an [`InputEvent`] and are offered to
//! each handler in registration order. A failing handler is logged and
//! skipped so the rest still run.

use crate::constants::*;
use fnv::FnvHashSet;
use smallvec::SmallVec;
use std::panic::{self, AssertUnwindSafe};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }
}

/// A key press. Codes are physical key names (`"KeyQ"`, `"ArrowLeft"`, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: String,
    pub modifiers: Modifiers,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControllerMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    /// `value` is already normalized to `[0, 1]`.
    ControlChange { cc: u8, value: f32 },
}

impl ControllerMessage {
    /// Classify a raw `(status, data1, data2)` triple by its high nibble.
    pub fn classify(status: u8, data1: u8, data2: u8) -> Option<Self> {
        match status & STATUS_TYPE_MASK {
            STATUS_NOTE_ON if data2 == 0 => Some(ControllerMessage::NoteOff { note: data1 }),
            STATUS_NOTE_ON => Some(ControllerMessage::NoteOn {
                note: data1,
                velocity: data2,
            }),
            STATUS_NOTE_OFF => Some(ControllerMessage::NoteOff { note: data1 }),
            STATUS_CONTROL_CHANGE => Some(ControllerMessage::ControlChange {
                cc: data1,
                value: data2.min(CONTROLLER_MAX as u8) as f32 / CONTROLLER_MAX,
            }),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceRole {
    /// Drum pad: scene model/animation requests.
    Pad,
    /// Knob bank: deformation parameters and stage controls.
    Knobs,
    /// Key bed: effect mode and post effects.
    Keys,
}

/// Case-insensitive substring patterns identifying controller devices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceTable {
    patterns: Vec<(String, DeviceRole)>,
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self::new([
            ("nanopad", DeviceRole::Pad),
            ("nanokontrol", DeviceRole::Knobs),
            ("nanokey", DeviceRole::Keys),
        ])
    }
}

impl DeviceTable {
    pub fn new<'a>(patterns: impl IntoIterator<Item = (&'a str, DeviceRole)>) -> Self {
        Self {
            patterns: patterns
                .into_iter()
                .map(|(p, r)| (p.to_ascii_lowercase(), r))
                .collect(),
        }
    }

    /// First pattern contained in `device_name` wins.
    pub fn resolve(&self, device_name: &str) -> Option<DeviceRole> {
        let name = device_name.to_ascii_lowercase();
        self.patterns
            .iter()
            .find(|(pattern, _)| name.contains(pattern.as_str()))
            .map(|&(_, role)| role)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerEvent {
    pub role: DeviceRole,
    pub channel: u8,
    pub message: ControllerMessage,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    Controller(ControllerEvent),
}

impl InputEvent {
    pub fn key(&self) -> Option<&KeyEvent> {
        match self {
            InputEvent::Key(k) => Some(k),
            InputEvent::Controller(_) => None,
        }
    }

    /// Controller message, only if it came from a device playing `role`.
    pub fn from_role(&self, role: DeviceRole) -> Option<ControllerMessage> {
        match self {
            InputEvent::Controller(c) if c.role == role => Some(c.message),
            _ => None,
        }
    }
}

pub type Handler = Box<dyn FnMut(&InputEvent) -> anyhow::Result<()>>;

pub struct InputRouter {
    handlers: Vec<(String, Handler)>,
    pressed: FnvHashSet<String>,
    devices: DeviceTable,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(DeviceTable::default())
    }
}

impl InputRouter {
    pub fn new(devices: DeviceTable) -> Self {
        Self {
            handlers: Vec::new(),
            pressed: FnvHashSet::default(),
            devices,
        }
    }

    /// Add a named handler. An existing name keeps its slot in the order and
    /// gets the new handler.
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: FnMut(&InputEvent) -> anyhow::Result<()> + 'static,
    {
        let handler: Handler = Box::new(handler);
        match self.handlers.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = handler,
            None => self.handlers.push((name.to_string(), handler)),
        }
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(n, _)| n != name);
        self.handlers.len() != before
    }

    pub fn handler_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|(n, _)| n.as_str())
    }

    /// Record a key transition; presses are also offered to every handler.
    /// Returns how many handlers completed without error.
    pub fn dispatch(&mut self, code: &str, pressed: bool, modifiers: Modifiers) -> usize {
        if !pressed {
            self.pressed.remove(code);
            return 0;
        }
        self.pressed.insert(code.to_string());
        self.dispatch_event(&InputEvent::Key(KeyEvent {
            code: code.to_string(),
            modifiers,
        }))
    }

    /// Classify a controller triple and route it by device. Unknown devices
    /// and unclassified statuses are dropped and return `None`.
    pub fn dispatch_controller(
        &mut self,
        device_name: &str,
        status: u8,
        data1: u8,
        data2: u8,
    ) -> Option<usize> {
        let role = self.devices.resolve(device_name)?;
        let message = ControllerMessage::classify(status, data1, data2)?;
        let event = InputEvent::Controller(ControllerEvent {
            role,
            channel: status & 0x0F,
            message,
        });
        Some(self.dispatch_event(&event))
    }

    pub fn dispatch_event(&mut self, event: &InputEvent) -> usize {
        let mut ok = 0;
        for (name, handler) in self.handlers.iter_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => ok += 1,
                Ok(Err(e)) => log::warn!("[input] handler {} failed: {:#}", name, e),
                Err(payload) => {
                    let msg = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    log::warn!("[input] handler {} panicked: {}", name, msg);
                }
            }
        }
        ok
    }

    pub fn is_pressed(&self, code: &str) -> bool {
        self.pressed.contains(code)
    }

    pub fn pressed_keys(&self) -> SmallVec<[String; 4]> {
        let mut keys: SmallVec<[String; 4]> = self.pressed.iter().cloned().collect();
        keys.sort();
        keys
    }
}
