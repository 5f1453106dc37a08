use std::time::Duration;

use crate::animation::curve::{FadeCurve, linear_progress};

/// Observable fade state of one layer, derived from its target and current alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeState {
    Hidden,
    FadingIn,
    Visible,
    FadingOut,
}

/// Callbacks for the fade of the observed (actual image) layer.
pub trait FadeListener {
    /// The layer started animating towards visible.
    fn on_fade_started(&mut self) {}

    /// The layer finished animating towards visible.
    fn on_fade_finished(&mut self) {}

    /// The layer was made visible without animation.
    fn on_shown_immediately(&mut self) {}
}

/// Per-layer fade bookkeeping.
///
/// A request only records the target; the transition clock starts at the next tick so
/// that every layer touched by one batch starts from the same instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LayerFade {
    visible: bool,
    alpha: f64,
    start_alpha: f64,
    pending: bool,
    started_at: Option<Duration>,
    duration: Duration,
}

impl LayerFade {
    pub(crate) fn hidden() -> Self {
        Self {
            visible: false,
            alpha: 0.0,
            start_alpha: 0.0,
            pending: false,
            started_at: None,
            duration: Duration::ZERO,
        }
    }

    pub(crate) fn alpha(&self) -> f64 {
        self.alpha
    }

    pub(crate) fn is_target_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.pending || self.started_at.is_some()
    }

    pub(crate) fn state(&self) -> FadeState {
        match (self.visible, self.alpha) {
            (true, a) if a >= 1.0 => FadeState::Visible,
            (true, _) => FadeState::FadingIn,
            (false, a) if a <= 0.0 => FadeState::Hidden,
            (false, _) => FadeState::FadingOut,
        }
    }

    /// Retarget the layer. Repeating the current target still restarts the clock.
    pub(crate) fn request(&mut self, visible: bool, duration: Duration) {
        self.visible = visible;
        self.start_alpha = self.alpha;
        self.duration = duration;
        self.pending = true;
        self.started_at = None;
    }

    pub(crate) fn finish(&mut self) {
        self.alpha = self.target_alpha();
        self.start_alpha = self.alpha;
        self.pending = false;
        self.started_at = None;
    }

    /// Advance to `now`. Returns whether the layer is still animating afterwards.
    pub(crate) fn tick(&mut self, now: Duration, curve: FadeCurve) -> bool {
        if self.pending {
            self.pending = false;
            self.started_at = Some(now);
        }
        let Some(started_at) = self.started_at else {
            return false;
        };
        let progress = linear_progress(now.saturating_sub(started_at), self.duration);
        let target = self.target_alpha();
        self.alpha = self.start_alpha + (target - self.start_alpha) * curve.apply(progress);
        if progress >= 1.0 {
            self.alpha = target;
            self.started_at = None;
            return false;
        }
        true
    }

    fn target_alpha(&self) -> f64 {
        if self.visible { 1.0 } else { 0.0 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/fade.rs"]
mod tests;
