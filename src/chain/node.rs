use std::mem;

use crate::{
    chain::{
        forwarding::ForwardingWrapper, matrix::MatrixWrapper, rounding::RoundingWrapper,
        scale_type::ScaleTypeWrapper,
    },
    drawable::{canvas::Canvas, content::Drawable},
    foundation::core::{Affine, ColorFilter, Rect, Size},
};

/// An owned, possibly empty, attachment point. Slots and every wrapper hold exactly one.
pub type Link = Option<Node>;

/// One node of a wrapper chain: either leaf content or a decorator owning one child.
///
/// Nodes are moved, never shared: attaching a node somewhere means it has already been
/// taken out of wherever it was before.
#[derive(Debug)]
pub enum Node {
    Leaf(Box<dyn Drawable>),
    ScaleType(Box<ScaleTypeWrapper>),
    Matrix(Box<MatrixWrapper>),
    Rounding(Box<RoundingWrapper>),
    Forwarding(Box<ForwardingWrapper>),
}

/// Discriminant of a [`Node`], for inspection and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Leaf,
    ScaleType,
    Matrix,
    Rounding,
    Forwarding,
}

/// A node that owns a single replaceable child.
pub trait DrawableParent {
    fn child(&self) -> Option<&Node>;

    fn child_mut(&mut self) -> Option<&mut Node>;

    /// Attach `child`, returning the previous child detached.
    fn set_child(&mut self, child: Link) -> Link;
}

impl Node {
    pub fn leaf(drawable: impl Drawable + 'static) -> Self {
        Self::Leaf(Box::new(drawable))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Leaf(_) => NodeKind::Leaf,
            Self::ScaleType(_) => NodeKind::ScaleType,
            Self::Matrix(_) => NodeKind::Matrix,
            Self::Rounding(_) => NodeKind::Rounding,
            Self::Forwarding(_) => NodeKind::Forwarding,
        }
    }

    fn as_parent(&self) -> Option<&dyn DrawableParent> {
        match self {
            Self::Leaf(_) => None,
            Self::ScaleType(w) => Some(w.as_ref()),
            Self::Matrix(w) => Some(w.as_ref()),
            Self::Rounding(w) => Some(w.as_ref()),
            Self::Forwarding(w) => Some(w.as_ref()),
        }
    }

    fn as_parent_mut(&mut self) -> Option<&mut dyn DrawableParent> {
        match self {
            Self::Leaf(_) => None,
            Self::ScaleType(w) => Some(w.as_mut()),
            Self::Matrix(w) => Some(w.as_mut()),
            Self::Rounding(w) => Some(w.as_mut()),
            Self::Forwarding(w) => Some(w.as_mut()),
        }
    }

    pub fn child(&self) -> Option<&Node> {
        self.as_parent().and_then(DrawableParent::child)
    }

    pub fn child_mut(&mut self) -> Option<&mut Node> {
        self.as_parent_mut().and_then(DrawableParent::child_mut)
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Self::Leaf(d) => d.bounds(),
            Self::ScaleType(w) => w.bounds(),
            Self::Matrix(w) => w.bounds(),
            Self::Rounding(w) => w.bounds(),
            Self::Forwarding(w) => w.bounds(),
        }
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        match self {
            Self::Leaf(d) => d.set_bounds(bounds),
            Self::ScaleType(w) => w.set_bounds(bounds),
            Self::Matrix(w) => w.set_bounds(bounds),
            Self::Rounding(w) => w.set_bounds(bounds),
            Self::Forwarding(w) => w.set_bounds(bounds),
        }
    }

    pub fn intrinsic_size(&self) -> Option<Size> {
        match self {
            Self::Leaf(d) => d.intrinsic_size(),
            other => other.child().and_then(Node::intrinsic_size),
        }
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        match self {
            Self::Leaf(d) => d.set_alpha(alpha),
            Self::ScaleType(w) => w.props.set_alpha(&mut w.child, alpha),
            Self::Matrix(w) => w.props.set_alpha(&mut w.child, alpha),
            Self::Rounding(w) => w.props.set_alpha(&mut w.child, alpha),
            Self::Forwarding(w) => w.props.set_alpha(&mut w.current, alpha),
        }
    }

    pub fn set_color_filter(&mut self, filter: Option<ColorFilter>) {
        match self {
            Self::Leaf(d) => d.set_color_filter(filter),
            Self::ScaleType(w) => w.props.set_color_filter(&mut w.child, filter),
            Self::Matrix(w) => w.props.set_color_filter(&mut w.child, filter),
            Self::Rounding(w) => w.props.set_color_filter(&mut w.child, filter),
            Self::Forwarding(w) => w.props.set_color_filter(&mut w.current, filter),
        }
    }

    /// Tell this node where its space ends up inside the layer.
    pub(crate) fn set_slot_view(&mut self, view: Option<SlotView>) {
        match self {
            Self::Leaf(_) => {}
            Self::ScaleType(w) => w.set_slot_view(view),
            Self::Matrix(w) => w.set_slot_view(view),
            Self::Rounding(w) => w.props.set_slot_view(&mut w.child, view),
            Self::Forwarding(w) => w.props.set_slot_view(&mut w.current, view),
        }
    }

    /// Forwarded to the leaf.
    pub fn set_level(&mut self, level: u32) {
        match self {
            Self::Leaf(d) => d.set_level(level),
            other => {
                if let Some(child) = other.child_mut() {
                    child.set_level(level);
                }
            }
        }
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        match self {
            Self::Leaf(d) => d.draw(canvas),
            Self::ScaleType(w) => w.draw(canvas),
            Self::Matrix(w) => w.draw(canvas),
            Self::Rounding(w) => w.draw(canvas),
            Self::Forwarding(w) => w.draw(canvas),
        }
    }

    /// Transform from this node's child space into this node's space.
    pub(crate) fn child_transform(&self) -> Affine {
        match self {
            Self::ScaleType(w) => w.draw_matrix().unwrap_or(Affine::IDENTITY),
            Self::Matrix(w) => w.draw_matrix().unwrap_or(Affine::IDENTITY),
            _ => Affine::IDENTITY,
        }
    }

    /// Bounds of the innermost leaf after every transform on the way down, expressed in
    /// this node's space. `None` when the chain ends without content.
    pub fn transformed_leaf_bounds(&self) -> Option<Rect> {
        let mut transform = Affine::IDENTITY;
        let mut node = self;
        loop {
            match node {
                Self::Leaf(d) => return Some(transform.transform_rect_bbox(d.bounds())),
                other => {
                    transform = transform * other.child_transform();
                    node = other.child()?;
                }
            }
        }
    }

    /// Node kinds from this node down to the leaf, outermost first.
    pub fn chain_kinds(&self) -> Vec<NodeKind> {
        let mut kinds = vec![self.kind()];
        let mut node = self;
        while let Some(child) = node.child() {
            kinds.push(child.kind());
            node = child;
        }
        kinds
    }
}

/// Placement of a node's space inside its layer.
///
/// `to_slot` maps the node's space into layer space and `visible` is the part of the
/// layer, in layer space, that the node's ancestors let through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SlotView {
    pub(crate) to_slot: Affine,
    pub(crate) visible: Rect,
}

impl SlotView {
    /// View of a node laid out at `bounds` under `parent`; `None` means the node sits
    /// directly in the layer.
    pub(crate) fn within(parent: Option<SlotView>, bounds: Rect) -> Self {
        match parent {
            None => Self {
                to_slot: Affine::IDENTITY,
                visible: bounds,
            },
            Some(view) => Self {
                to_slot: view.to_slot,
                visible: view
                    .visible
                    .intersect(view.to_slot.transform_rect_bbox(bounds)),
            },
        }
    }

    /// The same view seen from a child drawn through `matrix`.
    pub(crate) fn through(self, matrix: Affine) -> Self {
        Self {
            to_slot: self.to_slot * matrix,
            visible: self.visible,
        }
    }
}

/// State a wrapper forwards to whichever child it currently owns.
///
/// Alpha and color filter are only forwarded once they have been set, so content handed
/// in with its own filter keeps it until the wrapper is told otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ForwardedProps {
    pub(crate) bounds: Rect,
    alpha: Option<f64>,
    color_filter: Option<Option<ColorFilter>>,
    pub(crate) view: Option<SlotView>,
}

impl ForwardedProps {
    pub(crate) fn alpha(&self) -> f64 {
        self.alpha.unwrap_or(1.0)
    }

    pub(crate) fn set_alpha(&mut self, child: &mut Link, alpha: f64) {
        let alpha = alpha.clamp(0.0, 1.0);
        self.alpha = Some(alpha);
        if let Some(child) = child {
            child.set_alpha(alpha);
        }
    }

    pub(crate) fn set_color_filter(&mut self, child: &mut Link, filter: Option<ColorFilter>) {
        self.color_filter = Some(filter);
        if let Some(child) = child {
            child.set_color_filter(filter);
        }
    }

    pub(crate) fn set_slot_view(&mut self, child: &mut Link, view: Option<SlotView>) {
        self.view = view;
        if let Some(child) = child {
            child.set_slot_view(view);
        }
    }

    /// Swap in a new child and hand it everything forwarded so far. Bounds are the
    /// caller's job since each wrapper lays its child out differently.
    pub(crate) fn replace_child(&self, link: &mut Link, child: Link) -> Link {
        let old = mem::replace(link, child);
        if let Some(child) = link {
            if let Some(alpha) = self.alpha {
                child.set_alpha(alpha);
            }
            if let Some(filter) = self.color_filter {
                child.set_color_filter(filter);
            }
            if self.view.is_some() {
                child.set_slot_view(self.view);
            }
        }
        old
    }
}

/// Descends through every decorator that is not leaf rounding and returns the link
/// holding the leaf (or its leaf rounding).
pub(crate) fn leaf_link(mut link: &mut Link) -> &mut Link {
    loop {
        link = match *link {
            Some(Node::ScaleType(ref mut w)) => &mut w.child,
            Some(Node::Matrix(ref mut w)) => &mut w.child,
            Some(Node::Forwarding(ref mut w)) => &mut w.current,
            _ => return link,
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chain/node.rs"]
mod tests;
