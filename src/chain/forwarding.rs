use crate::{
    chain::node::{DrawableParent, ForwardedProps, Link, Node},
    drawable::canvas::Canvas,
    foundation::core::{ColorFilter, Rect},
};

/// Stable indirection node whose target can be swapped without the owning slot noticing.
///
/// An absent target forwards to nothing: the wrapper then behaves as a transparent
/// drawable without intrinsic size.
#[derive(Debug, Default)]
pub struct ForwardingWrapper {
    pub(crate) current: Link,
    pub(crate) props: ForwardedProps,
}

impl ForwardingWrapper {
    pub fn new(current: Link) -> Self {
        Self {
            current,
            props: ForwardedProps::default(),
        }
    }

    pub fn has_target(&self) -> bool {
        self.current.is_some()
    }

    /// Applied to the current target and to every later one.
    pub fn set_color_filter(&mut self, filter: Option<ColorFilter>) {
        self.props.set_color_filter(&mut self.current, filter);
    }

    pub fn bounds(&self) -> Rect {
        self.props.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.props.bounds = bounds;
        if let Some(current) = self.current.as_mut() {
            current.set_bounds(bounds);
        }
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        if let Some(current) = self.current.as_mut() {
            current.draw(canvas);
        }
    }
}

impl DrawableParent for ForwardingWrapper {
    fn child(&self) -> Option<&Node> {
        self.current.as_ref()
    }

    fn child_mut(&mut self) -> Option<&mut Node> {
        self.current.as_mut()
    }

    fn set_child(&mut self, child: Link) -> Link {
        let old = self.props.replace_child(&mut self.current, child);
        if let Some(current) = self.current.as_mut() {
            current.set_bounds(self.props.bounds);
        }
        old
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chain/forwarding.rs"]
mod tests;
