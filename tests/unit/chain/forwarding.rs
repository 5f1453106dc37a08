use super::*;
use crate::{
    drawable::{canvas::DisplayList, content::ColorDrawable},
    foundation::core::Rgba8Premul,
};

const BOUNDS: Rect = Rect::new(0.0, 0.0, 30.0, 30.0);

fn orange() -> Rgba8Premul {
    Rgba8Premul::from_straight_rgba(240, 120, 0, 255)
}

#[test]
fn empty_target_draws_nothing() {
    let mut w = ForwardingWrapper::default();
    w.set_bounds(BOUNDS);
    assert!(!w.has_target());

    let mut list = DisplayList::new();
    w.draw(&mut list);
    assert!(list.is_empty());
}

#[test]
fn new_target_inherits_bounds_and_filter() {
    let filter = ColorFilter::Multiply(Rgba8Premul::from_straight_rgba(128, 128, 128, 255));
    let mut w = ForwardingWrapper::new(None);
    w.set_bounds(BOUNDS);
    w.set_color_filter(Some(filter));

    let old = w.set_child(Some(Node::leaf(ColorDrawable::new(orange()))));
    assert!(old.is_none());
    assert!(w.has_target());
    assert_eq!(w.child().map(Node::bounds), Some(BOUNDS));

    let mut list = DisplayList::new();
    w.draw(&mut list);
    assert_eq!(list.fill_colors(), vec![filter.apply(orange())]);
}

#[test]
fn swapping_hands_back_previous_target() {
    let mut w = ForwardingWrapper::new(Some(Node::leaf(ColorDrawable::new(orange()))));
    let old = w.set_child(None);
    assert!(matches!(old, Some(Node::Leaf(_))));
    assert!(!w.has_target());

    w.set_color_filter(None);
    let mut list = DisplayList::new();
    w.draw(&mut list);
    assert!(list.is_empty());
}
