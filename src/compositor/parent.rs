use crate::{
    chain::{
        matrix::MatrixWrapper,
        node::{DrawableParent, Link, Node},
        scale_type::{ScaleType, ScaleTypeWrapper},
        wrapping::maybe_wrap_with_scale_type,
    },
    compositor::layered::LayerSlot,
    foundation::error::{DraweeError, DraweeResult},
};

/// What kind of node a [`Parent`] is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParentKind {
    Slot,
    ScaleType,
    Matrix,
}

/// The node that receives new content for a layer.
///
/// Scale-type and matrix decorators belong to the slot, so the walk looks through
/// them. Rounding and forwarding are never looked through.
#[derive(Debug)]
pub enum Parent<'a> {
    Slot(&'a mut LayerSlot),
    ScaleType(&'a mut ScaleTypeWrapper),
    Matrix(&'a mut MatrixWrapper),
}

pub(crate) fn locate(slot: &mut LayerSlot) -> Parent<'_> {
    let mut parent = match slot.content {
        Some(Node::ScaleType(ref mut w)) => Parent::ScaleType(w.as_mut()),
        Some(Node::Matrix(ref mut w)) => Parent::Matrix(w.as_mut()),
        _ => return Parent::Slot(slot),
    };
    loop {
        parent = match parent {
            Parent::Slot(slot) => return Parent::Slot(slot),
            Parent::ScaleType(w) => match w.child {
                Some(Node::ScaleType(ref mut c)) => Parent::ScaleType(c.as_mut()),
                Some(Node::Matrix(ref mut c)) => Parent::Matrix(c.as_mut()),
                _ => return Parent::ScaleType(w),
            },
            Parent::Matrix(w) => match w.child {
                Some(Node::ScaleType(ref mut c)) => Parent::ScaleType(c.as_mut()),
                Some(Node::Matrix(ref mut c)) => Parent::Matrix(c.as_mut()),
                _ => return Parent::Matrix(w),
            },
        };
    }
}

/// First scale-type decorator in the run of slot decorators of `slot`.
pub(crate) fn find_scale_type(slot: &mut LayerSlot) -> Option<&mut ScaleTypeWrapper> {
    let mut link = &mut slot.content;
    loop {
        link = match *link {
            Some(Node::ScaleType(ref mut w)) => return Some(w.as_mut()),
            Some(Node::Matrix(ref mut w)) => &mut w.child,
            _ => return None,
        };
    }
}

pub(crate) fn scale_type_of(slot: &LayerSlot) -> Option<&ScaleTypeWrapper> {
    let mut node = slot.content();
    while let Some(n) = node {
        match n {
            Node::ScaleType(w) => return Some(&**w),
            Node::Matrix(w) => node = w.child(),
            _ => return None,
        }
    }
    None
}

pub(crate) fn has_scale_type(slot: &LayerSlot) -> bool {
    scale_type_of(slot).is_some()
}

impl<'a> Parent<'a> {
    pub fn kind(&self) -> ParentKind {
        match self {
            Self::Slot(_) => ParentKind::Slot,
            Self::ScaleType(_) => ParentKind::ScaleType,
            Self::Matrix(_) => ParentKind::Matrix,
        }
    }

    pub fn child(&self) -> Option<&Node> {
        match self {
            Self::Slot(slot) => slot.content(),
            Self::ScaleType(w) => w.child(),
            Self::Matrix(w) => w.child(),
        }
    }

    /// Attach `child` here and return the detached previous child.
    pub fn set_child(&mut self, child: Link) -> Link {
        match self {
            Self::Slot(slot) => slot.set_content(child),
            Self::ScaleType(w) => w.set_child(child),
            Self::Matrix(w) => w.set_child(child),
        }
    }

    pub(crate) fn child_link(&mut self) -> &mut Link {
        match self {
            Self::Slot(slot) => &mut slot.content,
            Self::ScaleType(w) => &mut w.child,
            Self::Matrix(w) => &mut w.child,
        }
    }

    pub fn into_scale_type(self) -> Option<&'a mut ScaleTypeWrapper> {
        match self {
            Self::ScaleType(w) => Some(w),
            _ => None,
        }
    }

    /// Put a new scale-type decorator between this parent and its child.
    pub fn wrap_child_with_scale_type(&mut self, scale_type: ScaleType) -> DraweeResult<()> {
        if self.child().is_none() {
            return Err(DraweeError::precondition(
                "cannot apply a scale type to an empty layer",
            ));
        }
        let child = self.set_child(None);
        let wrapped = maybe_wrap_with_scale_type(child, Some(scale_type), None);
        self.set_child(wrapped);
        tracing::debug!(
            ?scale_type,
            parent = ?self.kind(),
            "wrapped layer content with scale type"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/parent.rs"]
mod tests;
