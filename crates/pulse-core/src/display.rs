//! Short human-readable summaries for HUDs and log lines.

use crate::monitor::MonitorGain;
use crate::params::ParameterStore;
use crate::post::PostEffect;
use crate::stage::StageControls;

/// `"wave | freq 15.00 speed 6.00 amp 3.00"`
pub fn mode_summary(store: &ParameterStore) -> String {
    let p = store.active();
    format!(
        "{} | freq {:.2} speed {:.2} amp {:.2}",
        store.mode(),
        p.wave_freq(),
        p.wave_speed(),
        p.amp()
    )
}

pub fn status_line(
    store: &ParameterStore,
    post: PostEffect,
    stage: &StageControls,
    monitor: &MonitorGain,
) -> String {
    format!(
        "{} | post {} | anim x{:.1} | monitor {:.1}{}",
        mode_summary(store),
        post,
        stage.animation_speed,
        monitor.gain(),
        if monitor.is_muted() { " (muted)" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EffectMode;

    #[test]
    fn summary_uses_active_mode() {
        let mut store = ParameterStore::default();
        assert_eq!(mode_summary(&store), "wave | freq 15.00 speed 6.00 amp 3.00");
        store.select(EffectMode::Breath);
        assert!(mode_summary(&store).starts_with("breath |"));
    }

    #[test]
    fn status_line_reports_post_and_monitor() {
        let line = status_line(
            &ParameterStore::default(),
            PostEffect::Glitch,
            &StageControls::default(),
            &MonitorGain::default(),
        );
        assert!(line.ends_with("| post glitch | anim x1.0 | monitor 1.0"));
    }
}
