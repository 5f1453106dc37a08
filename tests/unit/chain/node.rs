use super::*;
use crate::{
    chain::{rounding::RoundingParams, scale_type::ScaleType},
    drawable::{canvas::DisplayList, content::ColorDrawable},
    foundation::core::Rgba8Premul,
};

fn sized(w: f64, h: f64) -> Node {
    Node::leaf(ColorDrawable::new(Rgba8Premul::WHITE).with_size(Size::new(w, h)))
}

fn scaled(child: Node, scale_type: ScaleType) -> Node {
    Node::ScaleType(Box::new(ScaleTypeWrapper::new(Some(child), scale_type)))
}

#[test]
fn chain_kinds_lists_outermost_first() {
    let rounded = Node::Rounding(Box::new(RoundingWrapper::new(
        Some(sized(10.0, 10.0)),
        RoundingParams::from_corners_radius(2.0),
    )));
    let node = scaled(rounded, ScaleType::FitCenter);
    assert_eq!(
        node.chain_kinds(),
        vec![NodeKind::ScaleType, NodeKind::Rounding, NodeKind::Leaf]
    );
}

#[test]
fn intrinsic_size_is_read_through_wrappers() {
    let node = scaled(sized(40.0, 20.0), ScaleType::Center);
    assert_eq!(node.intrinsic_size(), Some(Size::new(40.0, 20.0)));
    let empty = Node::Forwarding(Box::new(ForwardingWrapper::default()));
    assert_eq!(empty.intrinsic_size(), None);
}

#[test]
fn transformed_leaf_bounds_applies_draw_matrix() {
    let mut node = scaled(sized(50.0, 25.0), ScaleType::FitCenter);
    node.set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(
        node.transformed_leaf_bounds(),
        Some(Rect::new(0.0, 25.0, 100.0, 75.0))
    );
}

#[test]
fn transformed_leaf_bounds_is_none_without_content() {
    let node = Node::Forwarding(Box::new(ForwardingWrapper::default()));
    assert_eq!(node.transformed_leaf_bounds(), None);
}

#[test]
fn alpha_set_on_wrapper_reaches_replacement_child() {
    let mut forwarding = ForwardingWrapper::default();
    forwarding.props.set_alpha(&mut forwarding.current, 0.0);
    forwarding.set_child(Some(sized(10.0, 10.0)));
    forwarding.set_bounds(Rect::new(0.0, 0.0, 10.0, 10.0));
    let mut list = DisplayList::new();
    forwarding.draw(&mut list);
    assert!(list.is_empty());
}

#[test]
fn leaf_link_stops_at_leaf_rounding() {
    let rounded = Node::Rounding(Box::new(RoundingWrapper::new(
        Some(sized(10.0, 10.0)),
        RoundingParams::default(),
    )));
    let mut link = Some(scaled(rounded, ScaleType::FitCenter));
    let leaf = leaf_link(&mut link);
    assert_eq!(leaf.as_ref().map(Node::kind), Some(NodeKind::Rounding));
}

#[test]
fn leaf_link_descends_through_forwarding() {
    let forwarding = ForwardingWrapper::new(Some(sized(10.0, 10.0)));
    let mut link = Some(scaled(
        Node::Forwarding(Box::new(forwarding)),
        ScaleType::CenterCrop,
    ));
    let leaf = leaf_link(&mut link);
    assert_eq!(leaf.as_ref().map(Node::kind), Some(NodeKind::Leaf));
}

#[test]
fn slot_view_narrows_to_parent_visible_area() {
    let shift = Affine::translate((-50.0, 0.0));
    let parent = SlotView::within(None, Rect::new(0.0, 0.0, 100.0, 100.0)).through(shift);
    let view = SlotView::within(Some(parent), Rect::new(0.0, 0.0, 200.0, 100.0));
    assert_eq!(view.to_slot, shift);
    assert_eq!(view.visible, Rect::new(0.0, 0.0, 100.0, 100.0));
}

#[test]
fn leaf_rounding_learns_where_it_lands_in_the_layer() {
    let rounded = Node::Rounding(Box::new(RoundingWrapper::new(
        Some(sized(200.0, 100.0)),
        RoundingParams::from_corners_radius(4.0),
    )));
    let forwarding = ForwardingWrapper::new(Some(rounded));
    let mut node = scaled(Node::Forwarding(Box::new(forwarding)), ScaleType::CenterCrop);
    node.set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));

    let Node::ScaleType(w) = &node else {
        panic!("expected scale type wrapper");
    };
    let Some(Node::Forwarding(f)) = w.child() else {
        panic!("expected forwarding wrapper");
    };
    let Some(Node::Rounding(r)) = f.child() else {
        panic!("expected leaf rounding");
    };
    let view = r.props.view.expect("view reaches leaf rounding");
    assert_eq!(Some(view.to_slot), w.draw_matrix());
    assert_eq!(view.visible, Rect::new(0.0, 0.0, 100.0, 100.0));
}
