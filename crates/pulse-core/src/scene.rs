//! Model and animation requests for the scene collaborator.
//!
//! The core never loads assets. It only tracks which catalog entries are
//! current and queues [`SceneRequest`]s for the host to act on.

use crate::constants::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneCatalog {
    pub models: Vec<String>,
    pub animations: Vec<String>,
    /// Model the host loads at startup.
    pub initial_model: usize,
}

impl Default for SceneCatalog {
    fn default() -> Self {
        let models: Vec<String> = (1..=MODEL_COUNT).map(|i| format!("sample{i}.gvrm")).collect();
        let animations = [
            "Idle.fbx",
            "Walking.fbx",
            "Breathing.fbx",
            "Gangnam Style.fbx",
            "Warrior.fbx",
            "Listening.fbx",
            "Shrugging.fbx",
            "Chicken Dance.fbx",
            "Pointing.fbx",
            "Around.fbx",
            "Acknowledging.fbx",
            "Dizzy Idle.fbx",
            "Happy Idle.fbx",
            "Jab Cross.fbx",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        Self {
            models,
            animations,
            initial_model: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneRequest {
    Model { index: usize, file: String },
    Animation { index: usize, file: String },
}

/// Pad slot for a note-on, 1..=4.
pub fn pad_slot(note: u8) -> Option<usize> {
    PAD_SLOT_BASES
        .iter()
        .position(|&base| note >= base && note < base.saturating_add(PAD_SLOT_WIDTH))
        .map(|i| i + 1)
}

/// What the performer asked for, before it is checked against the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneCommand {
    Model(usize),
    Animation(usize),
    NextModel,
    PrevModel,
    NextAnimation,
    PrevAnimation,
}

impl SceneCommand {
    /// Odd pad slots pick models, even slots pick animations.
    pub fn for_pad_note(note: u8, catalog: &SceneCatalog) -> Option<Self> {
        let slot = pad_slot(note)?;
        let offset = (note - PAD_SLOT_BASES[slot - 1]) as usize;
        if slot % 2 == 1 {
            (!catalog.models.is_empty()).then(|| SceneCommand::Model(offset % catalog.models.len()))
        } else {
            (!catalog.animations.is_empty())
                .then(|| SceneCommand::Animation(offset % catalog.animations.len()))
        }
    }

    pub fn for_key(code: &str, shift: bool) -> Option<Self> {
        if let Some(digit) = code.strip_prefix("Numpad").and_then(|d| d.parse::<usize>().ok()) {
            return Some(SceneCommand::Animation(digit));
        }
        match (code, shift) {
            ("NumpadDecimal", true) => Some(SceneCommand::Animation(10)),
            ("NumpadAdd", true) => Some(SceneCommand::Animation(11)),
            ("NumpadSubtract", true) => Some(SceneCommand::Animation(12)),
            ("NumpadMultiply", true) => Some(SceneCommand::Animation(13)),
            ("PageUp", _) => Some(SceneCommand::NextModel),
            ("PageDown", _) => Some(SceneCommand::PrevModel),
            ("Home", _) => Some(SceneCommand::NextAnimation),
            ("End", _) => Some(SceneCommand::PrevAnimation),
            _ => None,
        }
    }
}

fn step(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

#[derive(Clone, Debug)]
pub struct SceneCursor {
    catalog: SceneCatalog,
    model: usize,
    animation: usize,
}

impl SceneCursor {
    pub fn new(catalog: SceneCatalog) -> Self {
        let model = catalog.initial_model.min(catalog.models.len().saturating_sub(1));
        Self {
            catalog,
            model,
            animation: 0,
        }
    }

    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    pub fn model(&self) -> usize {
        self.model
    }

    pub fn animation(&self) -> usize {
        self.animation
    }

    /// Resolve a command into a request, moving the cursor. Returns `None`
    /// for out-of-range indices and for the model that is already loaded.
    pub fn apply(&mut self, command: SceneCommand) -> Option<SceneRequest> {
        let models = self.catalog.models.len();
        let animations = self.catalog.animations.len();
        let target = match command {
            SceneCommand::Model(i) => SceneCommand::Model(i),
            SceneCommand::NextModel | SceneCommand::PrevModel if models > 0 => {
                SceneCommand::Model(step(self.model, models, command == SceneCommand::NextModel))
            }
            SceneCommand::Animation(i) => SceneCommand::Animation(i),
            SceneCommand::NextAnimation | SceneCommand::PrevAnimation if animations > 0 => {
                SceneCommand::Animation(step(
                    self.animation,
                    animations,
                    command == SceneCommand::NextAnimation,
                ))
            }
            _ => return None,
        };
        match target {
            SceneCommand::Model(i) => {
                let file = self.catalog.models.get(i)?.clone();
                if i == self.model {
                    log::info!("[scene] model {} already loaded", file);
                    return None;
                }
                self.model = i;
                log::info!("[scene] model -> {}", file);
                Some(SceneRequest::Model { index: i, file })
            }
            SceneCommand::Animation(i) => {
                let file = self.catalog.animations.get(i)?.clone();
                self.animation = i;
                log::info!("[scene] animation -> {}", file);
                Some(SceneRequest::Animation { index: i, file })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_slots_partition_notes() {
        assert_eq!(pad_slot(35), None);
        assert_eq!(pad_slot(36), Some(1));
        assert_eq!(pad_slot(51), Some(1));
        assert_eq!(pad_slot(52), Some(2));
        assert_eq!(pad_slot(99), Some(4));
        assert_eq!(pad_slot(100), None);
    }

    #[test]
    fn pad_notes_wrap_into_catalog() {
        let c = SceneCatalog::default();
        assert_eq!(SceneCommand::for_pad_note(36, &c), Some(SceneCommand::Model(0)));
        assert_eq!(SceneCommand::for_pad_note(46, &c), Some(SceneCommand::Model(1)));
        assert_eq!(SceneCommand::for_pad_note(67, &c), Some(SceneCommand::Animation(1)));
        assert_eq!(SceneCommand::for_pad_note(84, &c), Some(SceneCommand::Animation(0)));
    }

    #[test]
    fn same_model_is_dropped() {
        let mut cur = SceneCursor::new(SceneCatalog::default());
        assert_eq!(cur.apply(SceneCommand::Model(4)), None);
        assert!(cur.apply(SceneCommand::Model(0)).is_some());
        assert_eq!(cur.apply(SceneCommand::Model(0)), None);
    }

    #[test]
    fn stepping_wraps_both_ways() {
        let mut cur = SceneCursor::new(SceneCatalog::default());
        assert_eq!(
            cur.apply(SceneCommand::PrevAnimation),
            Some(SceneRequest::Animation { index: 13, file: "Jab Cross.fbx".into() })
        );
        assert_eq!(
            cur.apply(SceneCommand::NextAnimation),
            Some(SceneRequest::Animation { index: 0, file: "Idle.fbx".into() })
        );
    }

    #[test]
    fn shifted_numpad_reaches_upper_animations() {
        assert_eq!(SceneCommand::for_key("Numpad7", false), Some(SceneCommand::Animation(7)));
        assert_eq!(SceneCommand::for_key("NumpadAdd", true), Some(SceneCommand::Animation(11)));
        assert_eq!(SceneCommand::for_key("NumpadAdd", false), None);
    }
}
