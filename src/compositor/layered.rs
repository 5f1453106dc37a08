use std::{fmt, mem, time::Duration};

use smallvec::SmallVec;

use crate::{
    animation::curve::FadeCurve,
    chain::node::{Link, Node},
    compositor::{
        fade::{FadeListener, FadeState, LayerFade},
        parent::{self, Parent},
    },
    drawable::canvas::Canvas,
    foundation::core::Rect,
    foundation::error::{DraweeError, DraweeResult},
};

/// One fixed position of the compositor: optional content plus its fade.
#[derive(Debug)]
pub struct LayerSlot {
    pub(crate) content: Link,
    bounds: Rect,
    fade: LayerFade,
}

impl LayerSlot {
    fn new(content: Link) -> Self {
        Self {
            content,
            bounds: Rect::ZERO,
            fade: LayerFade::hidden(),
        }
    }

    pub fn content(&self) -> Option<&Node> {
        self.content.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    pub fn state(&self) -> FadeState {
        self.fade.state()
    }

    pub fn alpha(&self) -> f64 {
        self.fade.alpha()
    }

    /// Replace the slot content, laying the new content out at the slot bounds.
    pub(crate) fn set_content(&mut self, content: Link) -> Link {
        let old = mem::replace(&mut self.content, content);
        if let Some(node) = self.content.as_mut() {
            node.set_bounds(self.bounds);
        }
        old
    }

    /// Lay the content out again, for when something deep in the chain changed size.
    pub(crate) fn relayout(&mut self) {
        self.set_bounds(self.bounds);
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        if let Some(node) = self.content.as_mut() {
            node.set_bounds(bounds);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BatchOp {
    Fade {
        index: usize,
        visible: bool,
        duration: Duration,
    },
    Finish,
}

/// Fixed, ordered stack of layers with independent cross-fades.
///
/// Layers draw in ascending index order. Fades advance only through [`Self::tick`].
pub struct LayeredCompositor {
    slots: Box<[LayerSlot]>,
    bounds: Rect,
    alpha: f64,
    duration: Duration,
    curve: FadeCurve,
    batch_depth: u32,
    queued: SmallVec<[BatchOp; 8]>,
    observed_layer: Option<usize>,
    listener: Option<Box<dyn FadeListener>>,
}

impl fmt::Debug for LayeredCompositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredCompositor")
            .field("slots", &self.slots)
            .field("bounds", &self.bounds)
            .field("alpha", &self.alpha)
            .field("duration", &self.duration)
            .field("curve", &self.curve)
            .field("batch_depth", &self.batch_depth)
            .field("queued", &self.queued)
            .field("observed_layer", &self.observed_layer)
            .finish_non_exhaustive()
    }
}

impl LayeredCompositor {
    /// All layers start hidden.
    pub fn new(layers: Vec<Link>) -> Self {
        let slots: Vec<LayerSlot> = layers.into_iter().map(LayerSlot::new).collect();
        Self {
            slots: slots.into_boxed_slice(),
            bounds: Rect::ZERO,
            alpha: 1.0,
            duration: Duration::ZERO,
            curve: FadeCurve::Linear,
            batch_depth: 0,
            queued: SmallVec::new(),
            observed_layer: None,
            listener: None,
        }
    }

    /// Report fades of layer `index` to the fade listener.
    pub fn with_observed_layer(mut self, index: usize) -> Self {
        self.observed_layer = Some(index);
        self
    }

    pub fn layer_count(&self) -> usize {
        self.slots.len()
    }

    fn check_index(&self, index: usize) -> DraweeResult<()> {
        if index >= self.slots.len() {
            return Err(layer_out_of_range(index, self.slots.len()));
        }
        Ok(())
    }

    pub fn layer(&self, index: usize) -> DraweeResult<&LayerSlot> {
        let count = self.slots.len();
        self.slots
            .get(index)
            .ok_or_else(|| layer_out_of_range(index, count))
    }

    pub(crate) fn layer_mut(&mut self, index: usize) -> DraweeResult<&mut LayerSlot> {
        let count = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or_else(|| layer_out_of_range(index, count))
    }

    pub fn layers(&self) -> impl Iterator<Item = &LayerSlot> {
        self.slots.iter()
    }

    pub fn drawable(&self, index: usize) -> DraweeResult<Option<&Node>> {
        Ok(self.layer(index)?.content())
    }

    /// Replace the whole content of layer `index`, decorators included, and return the
    /// previous content.
    pub fn set_drawable(&mut self, index: usize, content: Link) -> DraweeResult<Link> {
        let slot = self.layer_mut(index)?;
        Ok(slot.set_content(content))
    }

    /// Attachment point for new content of layer `index`.
    pub fn locate_parent(&mut self, index: usize) -> DraweeResult<Parent<'_>> {
        Ok(parent::locate(self.layer_mut(index)?))
    }

    pub fn transition_duration(&self) -> Duration {
        self.duration
    }

    /// Applies to fades requested from now on.
    pub fn set_transition_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn fade_curve(&self) -> FadeCurve {
        self.curve
    }

    pub fn set_fade_curve(&mut self, curve: FadeCurve) {
        self.curve = curve;
    }

    pub fn set_fade_listener(&mut self, listener: Option<Box<dyn FadeListener>>) {
        self.listener = listener;
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Opacity multiplied into every layer.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        for slot in self.slots.iter_mut() {
            slot.set_bounds(bounds);
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn begin_batch_mode(&mut self) {
        self.batch_depth += 1;
    }

    /// Close one batch scope. The outermost scope applies every queued request.
    pub fn end_batch_mode(&mut self) {
        match self.batch_depth {
            0 => {}
            1 => {
                self.batch_depth = 0;
                let queued = mem::take(&mut self.queued);
                tracing::trace!(ops = queued.len(), "applying fade batch");
                for op in queued {
                    match op {
                        BatchOp::Fade {
                            index,
                            visible,
                            duration,
                        } => self.apply_fade(index, visible, duration),
                        BatchOp::Finish => self.apply_finish(),
                    }
                }
            }
            _ => self.batch_depth -= 1,
        }
    }

    pub fn fade_in_layer(&mut self, index: usize) -> DraweeResult<()> {
        self.check_index(index)?;
        self.request(index, true);
        Ok(())
    }

    pub fn fade_out_layer(&mut self, index: usize) -> DraweeResult<()> {
        self.check_index(index)?;
        self.request(index, false);
        Ok(())
    }

    pub fn fade_in_all_layers(&mut self) {
        for index in 0..self.slots.len() {
            self.request(index, true);
        }
    }

    pub fn fade_out_all_layers(&mut self) {
        for index in 0..self.slots.len() {
            self.request(index, false);
        }
    }

    /// Only layer `index` ends up visible.
    pub fn fade_to_layer(&mut self, index: usize) -> DraweeResult<()> {
        self.check_index(index)?;
        for i in 0..self.slots.len() {
            self.request(i, i == index);
        }
        Ok(())
    }

    /// Layers `0..=index` end up visible, the rest hidden.
    pub fn fade_up_to_layer(&mut self, index: usize) -> DraweeResult<()> {
        self.check_index(index)?;
        for i in 0..self.slots.len() {
            self.request(i, i <= index);
        }
        Ok(())
    }

    /// Show or hide one layer right away, leaving every other layer's transition and
    /// any open batch alone.
    pub fn set_layer_visible_immediately(
        &mut self,
        index: usize,
        visible: bool,
    ) -> DraweeResult<()> {
        let slot = self.layer_mut(index)?;
        slot.fade.request(visible, Duration::ZERO);
        slot.fade.finish();
        Ok(())
    }

    /// Collapse every transition to its target with no animation.
    pub fn finish_transition_immediately(&mut self) {
        if self.is_batching() {
            self.queued.push(BatchOp::Finish);
        } else {
            self.apply_finish();
        }
    }

    /// The transition duration is fixed here, even when the request waits in a batch.
    fn request(&mut self, index: usize, visible: bool) {
        let duration = self.duration;
        if self.is_batching() {
            self.queued.push(BatchOp::Fade {
                index,
                visible,
                duration,
            });
        } else {
            self.apply_fade(index, visible, duration);
        }
    }

    fn apply_fade(&mut self, index: usize, visible: bool, duration: Duration) {
        if let Some(slot) = self.slots.get_mut(index) {
            tracing::trace!(index, visible, ?duration, "fade requested");
            slot.fade.request(visible, duration);
        }
    }

    fn apply_finish(&mut self) {
        let shown = self.observed_layer.and_then(|i| self.slots.get(i)).is_some_and(|slot| {
            slot.fade.is_target_visible() && (slot.fade.is_animating() || slot.fade.alpha() < 1.0)
        });
        for slot in self.slots.iter_mut() {
            slot.fade.finish();
        }
        if shown && let Some(listener) = self.listener.as_mut() {
            listener.on_shown_immediately();
        }
    }

    /// Whether any layer has a transition pending or in flight.
    pub fn is_transitioning(&self) -> bool {
        self.slots.iter().any(|slot| slot.fade.is_animating())
    }

    /// Advance every fade to `now`. Returns whether any layer is still animating.
    pub fn tick(&mut self, now: Duration) -> bool {
        let curve = self.curve;
        let mut animating = false;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let was_pending = slot.fade.is_pending();
            let was_animating = slot.fade.is_animating();
            let still = slot.fade.tick(now, curve);
            animating |= still;

            if self.observed_layer != Some(index) || !slot.fade.is_target_visible() {
                continue;
            }
            let Some(listener) = self.listener.as_mut() else {
                continue;
            };
            if was_pending {
                listener.on_fade_started();
            }
            if was_animating && !still {
                listener.on_fade_finished();
            }
        }
        animating
    }

    /// Draw non-empty, non-transparent layers bottom to top.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        let alpha = self.alpha;
        for slot in self.slots.iter_mut() {
            let layer_alpha = slot.fade.alpha() * alpha;
            if layer_alpha <= 0.0 {
                continue;
            }
            if let Some(node) = slot.content.as_mut() {
                node.set_alpha(layer_alpha);
                node.draw(canvas);
            }
        }
    }
}

fn layer_out_of_range(index: usize, count: usize) -> DraweeError {
    DraweeError::out_of_range(format!("layer {index} (layer count {count})"))
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/layered.rs"]
mod tests;
