use crate::{
    chain::{
        matrix::MatrixWrapper,
        node::{Link, Node, leaf_link},
        rounding::{RoundingParams, RoundingWrapper},
        scale_type::{ScaleType, ScaleTypeWrapper},
    },
    foundation::core::{Affine, Point},
};

/// Wraps `link` in a scale-type decorator when both content and a scale type are given.
pub fn maybe_wrap_with_scale_type(
    link: Link,
    scale_type: Option<ScaleType>,
    focus_point: Option<Point>,
) -> Link {
    let Some(scale_type) = scale_type else {
        return link;
    };
    let node = link?;
    let bounds = node.bounds();
    let mut wrapper = ScaleTypeWrapper::new(Some(node), scale_type);
    if let Some(focus_point) = focus_point {
        wrapper = wrapper.with_focus_point(focus_point);
    }
    wrapper.set_bounds(bounds);
    Some(Node::ScaleType(Box::new(wrapper)))
}

/// Wraps `link` in a matrix decorator when both content and a matrix are given.
pub fn maybe_wrap_with_matrix(link: Link, matrix: Option<Affine>) -> Link {
    let Some(matrix) = matrix else {
        return link;
    };
    let node = link?;
    let bounds = node.bounds();
    let mut wrapper = MatrixWrapper::new(Some(node), matrix);
    wrapper.set_bounds(bounds);
    Some(Node::Matrix(Box::new(wrapper)))
}

/// Applies leaf rounding to freshly built content when `params` ask for it.
pub fn maybe_apply_leaf_rounding(mut link: Link, params: Option<&RoundingParams>) -> Link {
    if let Some(params) = params.filter(|p| p.is_leaf()) {
        apply_leaf_rounding(&mut link, params);
    }
    link
}

/// Rounds the leaf under `link`, looking through slot decorators and forwarding.
///
/// Existing leaf rounding is reconfigured in place; otherwise the leaf gets a new
/// rounding wrapper at its exact position in the chain.
pub(crate) fn apply_leaf_rounding(link: &mut Link, params: &RoundingParams) {
    let leaf = leaf_link(link);
    match leaf.as_mut() {
        None => return,
        Some(Node::Rounding(wrapper)) => {
            wrapper.set_params(params.clone());
            return;
        }
        Some(_) => {}
    }
    let content = leaf.take();
    let bounds = content.as_ref().map(Node::bounds).unwrap_or_default();
    let mut wrapper = RoundingWrapper::new(content, params.clone());
    wrapper.set_bounds(bounds);
    *leaf = Some(Node::Rounding(Box::new(wrapper)));
}

/// Brings the leaf rounding under `link` in line with `params`.
///
/// Leaf rounding that is no longer wanted is reset to no rounding and stays where it is.
pub(crate) fn update_leaf_rounding(link: &mut Link, params: Option<&RoundingParams>) {
    match params.filter(|p| p.is_leaf()) {
        Some(params) => apply_leaf_rounding(link, params),
        None => {
            if let Some(Node::Rounding(wrapper)) = leaf_link(link).as_mut() {
                wrapper.reset();
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chain/wrapping.rs"]
mod tests;
