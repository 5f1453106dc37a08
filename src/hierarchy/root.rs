use crate::{
    chain::rounding::{Rounding, RoundingParams},
    compositor::layered::LayeredCompositor,
    drawable::{canvas::Canvas, content::Drawable},
    foundation::core::Rect,
};

/// Top of the tree: composite rounding around the compositor, then the controller
/// overlay on top of everything.
#[derive(Debug)]
pub struct RootNode {
    compositor: LayeredCompositor,
    rounding: Option<Rounding>,
    controller_overlay: Option<Box<dyn Drawable>>,
    bounds: Rect,
}

impl RootNode {
    pub fn new(compositor: LayeredCompositor) -> Self {
        Self {
            compositor,
            rounding: None,
            controller_overlay: None,
            bounds: Rect::ZERO,
        }
    }

    pub fn compositor(&self) -> &LayeredCompositor {
        &self.compositor
    }

    pub(crate) fn compositor_mut(&mut self) -> &mut LayeredCompositor {
        &mut self.compositor
    }

    /// Composite-level rounding, present only in overlay-color mode.
    pub fn rounding(&self) -> Option<&Rounding> {
        self.rounding.as_ref()
    }

    /// Adds, updates or removes composite rounding to match `params`.
    pub(crate) fn update_overlay_rounding(&mut self, params: Option<&RoundingParams>) {
        match (params.filter(|p| p.is_overlay()), self.rounding.as_mut()) {
            (Some(params), Some(rounding)) => rounding.set_params(params.clone()),
            (Some(params), None) => {
                tracing::debug!("adding composite rounding");
                self.rounding = Some(Rounding::new(params.clone()));
            }
            (None, Some(_)) => {
                tracing::debug!("removing composite rounding");
                self.rounding = None;
            }
            (None, None) => {}
        }
    }

    pub fn has_controller_overlay(&self) -> bool {
        self.controller_overlay.is_some()
    }

    pub fn set_controller_overlay(&mut self, overlay: Option<Box<dyn Drawable>>) {
        self.controller_overlay = overlay;
        if let Some(overlay) = self.controller_overlay.as_mut() {
            overlay.set_bounds(self.bounds);
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.compositor.set_bounds(bounds);
        if let Some(overlay) = self.controller_overlay.as_mut() {
            overlay.set_bounds(bounds);
        }
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        let bounds = self.bounds;
        let compositor = &mut self.compositor;
        match self.rounding.as_ref() {
            Some(rounding) => {
                rounding.draw_with_overlay(canvas, bounds, 1.0, |canvas| compositor.draw(canvas))
            }
            None => compositor.draw(canvas),
        }
        if let Some(overlay) = self.controller_overlay.as_mut() {
            overlay.draw(canvas);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hierarchy/root.rs"]
mod tests;
