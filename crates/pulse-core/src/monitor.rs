use crate::constants::MONITOR_VOLUME_STEP;

/// Input monitor volume with a mute switch. The host applies [`gain`] to
/// whatever node feeds the speakers.
///
/// [`gain`]: MonitorGain::gain
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorGain {
    volume: f32,
    muted: bool,
}

impl Default for MonitorGain {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

impl MonitorGain {
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        log::info!("[monitor] muted={}", self.muted);
        self.muted
    }

    pub fn nudge(&mut self, delta: f32) -> f32 {
        self.volume = (self.volume + delta).clamp(0.0, 1.0);
        self.volume
    }

    /// Ctrl-chorded keys only.
    pub fn apply_key(&mut self, code: &str) -> bool {
        match code {
            "KeyM" => {
                self.toggle_mute();
            }
            "Equal" => {
                self.nudge(MONITOR_VOLUME_STEP);
            }
            "Minus" => {
                self.nudge(-MONITOR_VOLUME_STEP);
            }
            "Digit0" => self.volume = 1.0,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mute_zeroes_gain_but_keeps_volume() {
        let mut m = MonitorGain::default();
        m.nudge(-0.25);
        m.toggle_mute();
        assert_eq!(m.gain(), 0.0);
        assert_eq!(m.volume(), 0.75);
        m.toggle_mute();
        assert_eq!(m.gain(), 0.75);
    }

    #[test]
    fn volume_is_clamped() {
        let mut m = MonitorGain::default();
        assert!(m.apply_key("Equal"));
        assert_eq!(m.volume(), 1.0);
        for _ in 0..20 {
            m.apply_key("Minus");
        }
        assert_eq!(m.volume(), 0.0);
        m.apply_key("Digit0");
        assert_eq!(m.gain(), 1.0);
    }
}
