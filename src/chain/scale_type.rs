use kurbo::Shape as _;

use crate::{
    chain::node::{DrawableParent, ForwardedProps, Link, Node, SlotView},
    drawable::canvas::Canvas,
    foundation::core::{Affine, CENTER_FOCUS, Point, Rect, Size},
};

/// How content with an intrinsic size is mapped into its destination bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    /// Scale each axis independently to fill the bounds exactly.
    FitXy,
    /// Uniform fit, aligned to the top-left.
    FitStart,
    /// Uniform fit, centered.
    FitCenter,
    /// Uniform fit, aligned to the bottom-right.
    FitEnd,
    /// No scaling, centered.
    Center,
    /// Like `FitCenter` but never scales up.
    CenterInside,
    /// Uniform fill, centered; overflow is cropped.
    CenterCrop,
    /// Uniform fill keeping the focus point as close to the center as possible.
    FocusCrop,
    /// Uniform fit, aligned to the bottom-left.
    FitBottomStart,
}

impl ScaleType {
    /// Transform that maps a child of `child` size at the origin into `parent`.
    ///
    /// Translations are snapped to whole pixels. `focus` is only read by
    /// [`ScaleType::FocusCrop`].
    pub fn transform(self, parent: Rect, child: Size, focus: Point) -> Affine {
        let (pw, ph) = (parent.width(), parent.height());
        let (cw, ch) = (child.width, child.height);
        let sx = pw / cw;
        let sy = ph / ch;

        let (scale_x, scale_y, dx, dy) = match self {
            Self::FitXy => (sx, sy, parent.x0, parent.y0),
            Self::FitStart => {
                let s = sx.min(sy);
                (s, s, parent.x0, parent.y0)
            }
            Self::FitCenter => {
                let s = sx.min(sy);
                (
                    s,
                    s,
                    parent.x0 + (pw - cw * s) * 0.5,
                    parent.y0 + (ph - ch * s) * 0.5,
                )
            }
            Self::FitEnd => {
                let s = sx.min(sy);
                (s, s, parent.x0 + (pw - cw * s), parent.y0 + (ph - ch * s))
            }
            Self::FitBottomStart => {
                let s = sx.min(sy);
                (s, s, parent.x0, parent.y0 + (ph - ch * s))
            }
            Self::Center => (
                1.0,
                1.0,
                parent.x0 + (pw - cw) * 0.5,
                parent.y0 + (ph - ch) * 0.5,
            ),
            Self::CenterInside => {
                let s = sx.min(sy).min(1.0);
                (
                    s,
                    s,
                    parent.x0 + (pw - cw * s) * 0.5,
                    parent.y0 + (ph - ch * s) * 0.5,
                )
            }
            Self::CenterCrop => {
                if sy > sx {
                    (sy, sy, parent.x0 + (pw - cw * sy) * 0.5, parent.y0)
                } else {
                    (sx, sx, parent.x0, parent.y0 + (ph - ch * sx) * 0.5)
                }
            }
            Self::FocusCrop => {
                if sy > sx {
                    let scaled = cw * sy;
                    let dx = (pw * 0.5 - scaled * focus.x).min(0.0).max(pw - scaled);
                    (sy, sy, parent.x0 + dx, parent.y0)
                } else {
                    let scaled = ch * sx;
                    let dy = (ph * 0.5 - scaled * focus.y).min(0.0).max(ph - scaled);
                    (sx, sx, parent.x0, parent.y0 + dy)
                }
            }
        };

        Affine::translate((snap(dx), snap(dy))) * Affine::scale_non_uniform(scale_x, scale_y)
    }
}

fn snap(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Decorator mapping its child's intrinsic bounds into its own bounds. Whatever the
/// mapping pushes outside those bounds is clipped.
#[derive(Debug)]
pub struct ScaleTypeWrapper {
    pub(crate) child: Link,
    pub(crate) props: ForwardedProps,
    scale_type: ScaleType,
    focus_point: Point,
    draw_matrix: Option<Affine>,
    configured_size: Option<Size>,
}

impl ScaleTypeWrapper {
    pub fn new(child: Link, scale_type: ScaleType) -> Self {
        Self {
            child,
            props: ForwardedProps::default(),
            scale_type,
            focus_point: CENTER_FOCUS,
            draw_matrix: None,
            configured_size: None,
        }
    }

    pub fn with_focus_point(mut self, focus_point: Point) -> Self {
        self.focus_point = focus_point;
        self
    }

    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    pub fn set_scale_type(&mut self, scale_type: ScaleType) {
        if self.scale_type == scale_type {
            return;
        }
        self.scale_type = scale_type;
        self.configure_bounds();
    }

    pub fn focus_point(&self) -> Point {
        self.focus_point
    }

    pub fn set_focus_point(&mut self, focus_point: Point) {
        if self.focus_point == focus_point {
            return;
        }
        self.focus_point = focus_point;
        self.configure_bounds();
    }

    pub fn bounds(&self) -> Rect {
        self.props.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.props.bounds = bounds;
        self.configure_bounds();
    }

    /// Matrix applied when drawing the child, if the child is not simply stretched to
    /// the wrapper's bounds.
    pub fn draw_matrix(&self) -> Option<Affine> {
        self.draw_matrix
    }

    fn configure_bounds(&mut self) {
        let bounds = self.props.bounds;
        let Some(child) = self.child.as_mut() else {
            self.configured_size = None;
            self.draw_matrix = None;
            return;
        };

        let size = child.intrinsic_size();
        self.configured_size = size;
        match size {
            Some(size)
                if size.width > 0.0
                    && size.height > 0.0
                    && self.scale_type != ScaleType::FitXy
                    && size != bounds.size() =>
            {
                child.set_bounds(Rect::from_origin_size(Point::ZERO, size));
                self.draw_matrix = Some(self.scale_type.transform(bounds, size, self.focus_point));
            }
            _ => {
                child.set_bounds(bounds);
                self.draw_matrix = None;
            }
        }
        let view = SlotView::within(self.props.view, bounds);
        child.set_slot_view(Some(match self.draw_matrix {
            Some(matrix) => view.through(matrix),
            None => view,
        }));
    }

    pub(crate) fn set_slot_view(&mut self, view: Option<SlotView>) {
        self.props.view = view;
        self.configure_bounds();
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        // Content may change its natural size between frames (e.g. an animated image).
        let current = self.child.as_ref().and_then(Node::intrinsic_size);
        if current != self.configured_size {
            self.configure_bounds();
        }
        let bounds = self.props.bounds;
        let Some(child) = self.child.as_mut() else {
            return;
        };
        match self.draw_matrix {
            Some(matrix) => {
                canvas.save();
                canvas.clip_path(&bounds.to_path(0.1));
                canvas.transform(matrix);
                child.draw(canvas);
                canvas.restore();
            }
            None => child.draw(canvas),
        }
    }
}

impl DrawableParent for ScaleTypeWrapper {
    fn child(&self) -> Option<&Node> {
        self.child.as_ref()
    }

    fn child_mut(&mut self) -> Option<&mut Node> {
        self.child.as_mut()
    }

    fn set_child(&mut self, child: Link) -> Link {
        let old = self.props.replace_child(&mut self.child, child);
        self.configure_bounds();
        old
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chain/scale_type.rs"]
mod tests;
