//! Camera offset, camera rotation and animation speed for the scene
//! collaborator. Pure state; the rig feeds it knob and key input.

use crate::constants::*;
use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_3, PI, TAU};

#[derive(Clone, Debug, PartialEq)]
pub struct StageControls {
    /// Camera offset from its rest position.
    pub offset: Vec3,
    /// `x` is pitch, `y` is yaw (radians).
    pub rotation: Vec2,
    pub animation_speed: f32,
}

impl Default for StageControls {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            rotation: Vec2::ZERO,
            animation_speed: 1.0,
        }
    }
}

fn clamp_range(v: f32, (lo, hi): (f32, f32)) -> f32 {
    v.clamp(lo, hi)
}

impl StageControls {
    /// Knob-bank control change. Returns false if `cc` is not a stage control.
    pub fn apply_cc(&mut self, cc: u8, value: f32) -> bool {
        let v = value.clamp(0.0, 1.0);
        match cc {
            CC_CAMERA_X => self.offset.x = (v - 0.5) * 4.0,
            CC_CAMERA_Y => self.offset.y = (v - 0.3) * 3.0,
            CC_CAMERA_Z => self.offset.z = (v - 0.5) * 4.0,
            CC_CAMERA_YAW => self.rotation.y = (v - 0.5) * TAU,
            CC_CAMERA_PITCH => self.rotation.x = (v - 0.5) * PI * 0.67,
            CC_ANIMATION_SPEED => {
                let (lo, hi) = ANIMATION_SPEED_CC_RANGE;
                self.animation_speed = (lo + (hi - lo) * v).clamp(lo, hi);
            }
            _ => return false,
        }
        true
    }

    /// Keyboard nudges. Offsets need Ctrl; rotation, speed and reset do not.
    pub fn apply_key(&mut self, code: &str, ctrl: bool) -> bool {
        let step = STAGE_KEY_STEP;
        if ctrl {
            match code {
                "KeyA" => self.offset.x = clamp_range(self.offset.x - step, OFFSET_X_RANGE),
                "KeyD" => self.offset.x = clamp_range(self.offset.x + step, OFFSET_X_RANGE),
                "KeyS" => self.offset.y = clamp_range(self.offset.y - step, OFFSET_Y_RANGE),
                "KeyI" => self.offset.y = clamp_range(self.offset.y + step, OFFSET_Y_RANGE),
                "KeyU" => self.offset.z = clamp_range(self.offset.z - step, OFFSET_Z_RANGE),
                "KeyO" => self.offset.z = clamp_range(self.offset.z + step, OFFSET_Z_RANGE),
                _ => return false,
            }
            return true;
        }
        match code {
            "ArrowLeft" => self.rotation.y = (self.rotation.y - step).clamp(-PI, PI),
            "ArrowRight" => self.rotation.y = (self.rotation.y + step).clamp(-PI, PI),
            "ArrowUp" => {
                self.rotation.x = (self.rotation.x - step * 0.5).clamp(-FRAC_PI_3, FRAC_PI_3)
            }
            "ArrowDown" => {
                self.rotation.x = (self.rotation.x + step * 0.5).clamp(-FRAC_PI_3, FRAC_PI_3)
            }
            "Minus" => {
                self.animation_speed =
                    clamp_range(self.animation_speed - step, ANIMATION_SPEED_KEY_RANGE)
            }
            "Equal" => {
                self.animation_speed =
                    clamp_range(self.animation_speed + step, ANIMATION_SPEED_KEY_RANGE)
            }
            "KeyR" => {
                self.reset();
                log::info!("[stage] reset");
            }
            _ => return false,
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
