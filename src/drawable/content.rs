use std::fmt;

use kurbo::Shape as _;

use crate::{
    drawable::canvas::{Canvas, FillRule},
    foundation::core::{ColorFilter, Rect, Rgba8Premul, Size},
};

/// Opaque content capability required from collaborators.
///
/// The hierarchy only positions content, sets its opacity and color filter, and asks it
/// to draw. It never inspects concrete types behind this trait.
pub trait Drawable: fmt::Debug {
    fn bounds(&self) -> Rect;

    fn set_bounds(&mut self, bounds: Rect);

    /// Natural size of the content, or `None` when it simply fills its bounds.
    fn intrinsic_size(&self) -> Option<Size> {
        None
    }

    /// Opacity in `[0, 1]` applied to everything this drawable paints.
    fn set_alpha(&mut self, alpha: f64);

    fn set_color_filter(&mut self, _filter: Option<ColorFilter>) {}

    /// Progress level in `0..=10_000`, used by progress indicators.
    fn set_level(&mut self, _level: u32) {}

    fn draw(&mut self, canvas: &mut dyn Canvas);
}

/// Solid color content, optionally with an intrinsic size.
#[derive(Clone, Debug)]
pub struct ColorDrawable {
    color: Rgba8Premul,
    size: Option<Size>,
    bounds: Rect,
    alpha: f64,
    filter: Option<ColorFilter>,
}

impl ColorDrawable {
    pub fn new(color: Rgba8Premul) -> Self {
        Self {
            color,
            size: None,
            bounds: Rect::ZERO,
            alpha: 1.0,
            filter: None,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn color(&self) -> Rgba8Premul {
        self.color
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The color this drawable paints after filter and opacity.
    pub fn effective_color(&self) -> Rgba8Premul {
        let filtered = match self.filter {
            Some(filter) => filter.apply(self.color),
            None => self.color,
        };
        filtered.with_opacity(self.alpha)
    }
}

impl Drawable for ColorDrawable {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn intrinsic_size(&self) -> Option<Size> {
        self.size
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_color_filter(&mut self, filter: Option<ColorFilter>) {
        self.filter = filter;
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        let color = self.effective_color();
        if color.is_transparent() {
            return;
        }
        canvas.fill_path(&self.bounds.to_path(0.1), color, FillRule::NonZero);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/content.rs"]
mod tests;
