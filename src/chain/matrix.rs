use crate::{
    chain::node::{DrawableParent, ForwardedProps, Link, Node, SlotView},
    drawable::canvas::Canvas,
    foundation::core::{Affine, Point, Rect},
};
use kurbo::Shape as _;

/// Decorator drawing its child through an arbitrary affine matrix.
///
/// Children with an intrinsic size are laid out at their natural size and positioned
/// by the matrix relative to the wrapper's origin; output is clipped to the wrapper.
#[derive(Debug)]
pub struct MatrixWrapper {
    pub(crate) child: Link,
    pub(crate) props: ForwardedProps,
    matrix: Affine,
    draw_matrix: Option<Affine>,
}

impl MatrixWrapper {
    pub fn new(child: Link, matrix: Affine) -> Self {
        Self {
            child,
            props: ForwardedProps::default(),
            matrix,
            draw_matrix: None,
        }
    }

    pub fn matrix(&self) -> Affine {
        self.matrix
    }

    pub fn set_matrix(&mut self, matrix: Affine) {
        self.matrix = matrix;
        self.configure_bounds();
    }

    pub fn bounds(&self) -> Rect {
        self.props.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.props.bounds = bounds;
        self.configure_bounds();
    }

    pub fn draw_matrix(&self) -> Option<Affine> {
        self.draw_matrix
    }

    fn configure_bounds(&mut self) {
        let bounds = self.props.bounds;
        let Some(child) = self.child.as_mut() else {
            self.draw_matrix = None;
            return;
        };
        match child.intrinsic_size() {
            Some(size) if size.width > 0.0 && size.height > 0.0 => {
                child.set_bounds(Rect::from_origin_size(Point::ZERO, size));
                self.draw_matrix = Some(Affine::translate(bounds.origin().to_vec2()) * self.matrix);
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

impl DrawableParent for MatrixWrapper {
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
#[path = "../../tests/unit/chain/matrix.rs"]
mod tests;
