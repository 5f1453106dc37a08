use kurbo::{Circle, RoundedRect, RoundedRectRadii, Shape as _};

use crate::{
    chain::node::{DrawableParent, ForwardedProps, Link, Node},
    drawable::canvas::{Canvas, FillRule},
    foundation::core::{Affine, BezPath, Rect, Rgba8Premul},
    foundation::error::{DraweeError, DraweeResult},
};

const PATH_TOLERANCE: f64 = 0.1;

/// Where rounding is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMethod {
    /// One wrapper around the whole composite paints `overlay_color` outside the rounded
    /// shape instead of clipping.
    OverlayColor,
    /// Every leaf is clipped to the rounded shape by its own wrapper.
    #[default]
    LeafClip,
}

/// Per-corner radii, clockwise from the top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

/// Which corners a uniform radius applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CornerMask {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_right: bool,
    pub bottom_left: bool,
}

impl Default for CornerMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl CornerMask {
    pub const ALL: Self = Self {
        top_left: true,
        top_right: true,
        bottom_right: true,
        bottom_left: true,
    };
}

impl CornerRadii {
    pub const ZERO: Self = Self {
        top_left: 0.0,
        top_right: 0.0,
        bottom_right: 0.0,
        bottom_left: 0.0,
    };

    pub fn new(top_left: f64, top_right: f64, bottom_right: f64, bottom_left: f64) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    pub fn uniform(radius: f64) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    pub fn masked(radius: f64, mask: CornerMask) -> Self {
        let pick = |on: bool| if on { radius } else { 0.0 };
        Self::new(
            pick(mask.top_left),
            pick(mask.top_right),
            pick(mask.bottom_right),
            pick(mask.bottom_left),
        )
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    fn as_array(&self) -> [f64; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

impl From<CornerRadii> for RoundedRectRadii {
    fn from(r: CornerRadii) -> Self {
        Self::new(r.top_left, r.top_right, r.bottom_right, r.bottom_left)
    }
}

/// Rounding configuration shared by leaf and composite rounding.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RoundingParams {
    pub method: RoundingMethod,
    pub round_as_circle: bool,
    pub corners_radii: CornerRadii,
    pub overlay_color: Rgba8Premul,
    pub border_width: f64,
    pub border_color: Rgba8Premul,
    /// Inset of the rounded shape from the bounds.
    pub padding: f64,
}

impl RoundingParams {
    pub fn as_circle() -> Self {
        Self {
            round_as_circle: true,
            ..Self::default()
        }
    }

    pub fn from_corners_radius(radius: f64) -> Self {
        Self::from_corners_radii(CornerRadii::uniform(radius))
    }

    pub fn from_corners_radii(radii: CornerRadii) -> Self {
        Self {
            corners_radii: radii,
            ..Self::default()
        }
    }

    /// Switches to [`RoundingMethod::OverlayColor`] painting `color` outside the shape.
    pub fn with_overlay_color(mut self, color: Rgba8Premul) -> Self {
        self.method = RoundingMethod::OverlayColor;
        self.overlay_color = color;
        self
    }

    pub fn with_border(mut self, color: Rgba8Premul, width: f64) -> Self {
        self.border_color = color;
        self.border_width = width;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.method == RoundingMethod::LeafClip
    }

    pub fn is_overlay(&self) -> bool {
        self.method == RoundingMethod::OverlayColor
    }

    pub fn validate(&self) -> DraweeResult<()> {
        let radii = self.corners_radii.as_array();
        if radii.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(DraweeError::validation(
                "rounding corner radii must be finite and >= 0",
            ));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(DraweeError::validation(
                "rounding border_width must be finite and >= 0",
            ));
        }
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(DraweeError::validation(
                "rounding padding must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Rounding geometry and painting for one set of bounds.
///
/// Used directly around the composite and inside [`RoundingWrapper`] around leaves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rounding {
    params: RoundingParams,
}

impl Rounding {
    pub fn new(params: RoundingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RoundingParams {
        &self.params
    }

    pub fn set_params(&mut self, params: RoundingParams) {
        self.params = params;
    }

    /// Back to no radii and no border, keeping the method.
    pub fn reset(&mut self) {
        self.params = RoundingParams {
            method: self.params.method,
            ..RoundingParams::default()
        };
    }

    /// Whether drawing through this rounding changes anything at all.
    pub fn is_active(&self) -> bool {
        self.params.round_as_circle
            || !self.params.corners_radii.is_zero()
            || self.params.border_width > 0.0
    }

    /// The rounded shape inscribed in `bounds`.
    pub fn shape_path(&self, bounds: Rect) -> BezPath {
        self.shape_path_inset(bounds, self.params.padding)
    }

    fn shape_path_inset(&self, bounds: Rect, inset: f64) -> BezPath {
        let rect = bounds.inset(-inset);
        if self.params.round_as_circle {
            let radius = (rect.width().min(rect.height()) * 0.5).max(0.0);
            Circle::new(rect.center(), radius).to_path(PATH_TOLERANCE)
        } else {
            RoundedRect::from_rect(rect, RoundedRectRadii::from(self.params.corners_radii))
                .to_path(PATH_TOLERANCE)
        }
    }

    /// Clip to the shape, draw, then stroke the border.
    pub fn draw_clipped(
        &self,
        canvas: &mut dyn Canvas,
        bounds: Rect,
        alpha: f64,
        draw: impl FnOnce(&mut dyn Canvas),
    ) {
        if !self.is_active() {
            draw(canvas);
            return;
        }
        canvas.save();
        canvas.clip_path(&self.shape_path(bounds));
        draw(canvas);
        canvas.restore();
        self.draw_border(canvas, bounds, alpha);
    }

    /// Draw, then paint the overlay color everywhere outside the shape, then the border.
    pub fn draw_with_overlay(
        &self,
        canvas: &mut dyn Canvas,
        bounds: Rect,
        alpha: f64,
        draw: impl FnOnce(&mut dyn Canvas),
    ) {
        draw(canvas);
        if !self.is_active() {
            return;
        }
        if !self.params.overlay_color.is_transparent() {
            let mut ring = bounds.to_path(PATH_TOLERANCE);
            ring.extend(self.shape_path(bounds).elements().iter().copied());
            canvas.fill_path(&ring, self.params.overlay_color, FillRule::EvenOdd);
        }
        self.draw_border(canvas, bounds, alpha);
    }

    fn draw_border(&self, canvas: &mut dyn Canvas, bounds: Rect, alpha: f64) {
        let width = self.params.border_width;
        if width <= 0.0 {
            return;
        }
        let color = self.params.border_color.with_opacity(alpha);
        if color.is_transparent() {
            return;
        }
        let path = self.shape_path_inset(bounds, self.params.padding + width * 0.5);
        canvas.stroke_path(&path, color, width);
    }
}

/// Leaf-level rounding: clips exactly one content node.
#[derive(Debug)]
pub struct RoundingWrapper {
    pub(crate) child: Link,
    pub(crate) props: ForwardedProps,
    rounding: Rounding,
}

impl RoundingWrapper {
    pub fn new(child: Link, params: RoundingParams) -> Self {
        Self {
            child,
            props: ForwardedProps::default(),
            rounding: Rounding::new(params),
        }
    }

    pub fn rounding(&self) -> &Rounding {
        &self.rounding
    }

    pub fn params(&self) -> &RoundingParams {
        self.rounding.params()
    }

    pub fn set_params(&mut self, params: RoundingParams) {
        self.rounding.set_params(params);
    }

    pub fn reset(&mut self) {
        self.rounding.reset();
    }

    pub fn bounds(&self) -> Rect {
        self.props.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.props.bounds = bounds;
        if let Some(child) = self.child.as_mut() {
            child.set_bounds(bounds);
        }
    }

    /// Rounds the part of the content that is visible in its layer, so corners stay
    /// round when a parent crops or moves the content.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        let bounds = self.props.bounds;
        let alpha = self.props.alpha();
        let Some(child) = self.child.as_mut() else {
            return;
        };
        if !self.rounding.is_active() {
            child.draw(canvas);
            return;
        }
        // Round what is visible in the layer, not the child's own rect.
        let view = self
            .props
            .view
            .filter(|v| v.to_slot != Affine::IDENTITY && v.to_slot.determinant().abs() > 1e-12);
        let Some(view) = view else {
            let shape = match self.props.view {
                Some(v) => v.visible.intersect(bounds),
                None => bounds,
            };
            self.rounding
                .draw_clipped(canvas, shape, alpha, |canvas| child.draw(canvas));
            return;
        };
        let to_slot = view.to_slot;
        let shape = view.visible.intersect(to_slot.transform_rect_bbox(bounds));
        canvas.save();
        canvas.transform(to_slot.inverse());
        self.rounding.draw_clipped(canvas, shape, alpha, |canvas| {
            canvas.transform(to_slot);
            child.draw(canvas);
        });
        canvas.restore();
    }
}

impl DrawableParent for RoundingWrapper {
    fn child(&self) -> Option<&Node> {
        self.child.as_ref()
    }

    fn child_mut(&mut self) -> Option<&mut Node> {
        self.child.as_mut()
    }

    fn set_child(&mut self, child: Link) -> Link {
        let old = self.props.replace_child(&mut self.child, child);
        if let Some(child) = self.child.as_mut() {
            child.set_bounds(self.props.bounds);
        }
        old
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chain/rounding.rs"]
mod tests;
