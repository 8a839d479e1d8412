//! Post-processing effect selection, with a timed auto-cycle.

use crate::constants::*;
use rand::prelude::*;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PostEffect {
    #[default]
    None,
    Bloom,
    Film,
    Glitch,
    Scanline,
    ColorShift,
}

impl PostEffect {
    /// Cycle order.
    pub const ALL: [PostEffect; 6] = [
        PostEffect::None,
        PostEffect::Bloom,
        PostEffect::Film,
        PostEffect::Glitch,
        PostEffect::Scanline,
        PostEffect::ColorShift,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PostEffect::None => "none",
            PostEffect::Bloom => "bloom",
            PostEffect::Film => "film",
            PostEffect::Glitch => "glitch",
            PostEffect::Scanline => "scanline",
            PostEffect::ColorShift => "colorShift",
        }
    }
}

impl fmt::Display for PostEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub struct PostConfig {
    pub auto_interval_sec: f32,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            auto_interval_sec: POST_AUTO_INTERVAL_SEC,
        }
    }
}

/// What a keys-device note or keyboard code asks the selector to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostCommand {
    Select(PostEffect),
    /// Turn auto off and clear the effect.
    Off,
    Next,
    Random,
    ToggleAuto,
}

pub fn command_for_note(note: u8) -> Option<PostCommand> {
    match note {
        60 => Some(PostCommand::Select(PostEffect::Bloom)),
        61 => Some(PostCommand::Select(PostEffect::Film)),
        62 => Some(PostCommand::Select(PostEffect::Glitch)),
        63 => Some(PostCommand::Select(PostEffect::Scanline)),
        64 => Some(PostCommand::Select(PostEffect::ColorShift)),
        65 => Some(PostCommand::Off),
        66 => Some(PostCommand::Next),
        67 => Some(PostCommand::Random),
        72 => Some(PostCommand::ToggleAuto),
        _ => None,
    }
}

pub fn command_for_key(code: &str) -> Option<PostCommand> {
    match code {
        "Digit5" => Some(PostCommand::Select(PostEffect::Bloom)),
        "Digit6" => Some(PostCommand::Select(PostEffect::Film)),
        "Digit7" => Some(PostCommand::Select(PostEffect::Glitch)),
        "Digit8" => Some(PostCommand::Select(PostEffect::Scanline)),
        "Digit9" => Some(PostCommand::Select(PostEffect::ColorShift)),
        "Digit0" => Some(PostCommand::Select(PostEffect::None)),
        "BracketLeft" => Some(PostCommand::Next),
        "BracketRight" => Some(PostCommand::Random),
        "Backslash" => Some(PostCommand::ToggleAuto),
        _ => None,
    }
}

pub struct PostEffectSelector {
    pub config: PostConfig,
    current: PostEffect,
    auto: bool,
    timer: f32,
    rng: StdRng,
}

impl PostEffectSelector {
    pub fn new(config: PostConfig, seed: u64) -> Self {
        Self {
            config,
            current: PostEffect::None,
            auto: false,
            timer: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn current(&self) -> PostEffect {
        self.current
    }

    pub fn enabled(&self) -> bool {
        self.current != PostEffect::None
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn toggle(&mut self, effect: PostEffect) -> PostEffect {
        if effect != self.current {
            log::info!("[post] {} -> {}", self.current, effect);
        }
        self.current = effect;
        effect
    }

    pub fn next(&mut self) -> PostEffect {
        let len = PostEffect::ALL.len();
        let mut i = (self.current.index() + 1) % len;
        if self.auto && PostEffect::ALL[i] == PostEffect::None {
            i = (i + 1) % len;
        }
        self.toggle(PostEffect::ALL[i])
    }

    /// Uniform pick among the non-`None` effects.
    pub fn random(&mut self) -> PostEffect {
        let pick = *PostEffect::ALL[1..]
            .choose(&mut self.rng)
            .unwrap_or(&PostEffect::Bloom);
        self.toggle(pick)
    }

    pub fn toggle_auto(&mut self) -> bool {
        self.auto = !self.auto;
        log::info!("[post] auto={}", self.auto);
        if self.auto {
            self.timer = 0.0;
            self.next();
        }
        self.auto
    }

    pub fn set_auto(&mut self, on: bool) {
        if self.auto != on {
            self.toggle_auto();
        }
    }

    /// Accumulate elapsed time; in auto mode, returns the new effect each
    /// time the interval elapses.
    pub fn advance(&mut self, dt_sec: f32) -> Option<PostEffect> {
        if !self.auto {
            return None;
        }
        self.timer += dt_sec.max(0.0);
        if self.timer < self.config.auto_interval_sec {
            return None;
        }
        self.timer = 0.0;
        Some(self.next())
    }

    pub fn apply(&mut self, command: PostCommand) -> PostEffect {
        match command {
            PostCommand::Select(effect) => self.toggle(effect),
            PostCommand::Off => {
                self.set_auto(false);
                self.toggle(PostEffect::None)
            }
            PostCommand::Next => self.next(),
            PostCommand::Random => self.random(),
            PostCommand::ToggleAuto => {
                self.toggle_auto();
                self.current
            }
        }
    }
}
