use super::*;
use crate::drawable::{
    canvas::{DisplayList, DrawOp},
    content::ColorDrawable,
};

const BOUNDS: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

fn leaf() -> Node {
    Node::leaf(ColorDrawable::new(Rgba8Premul::WHITE))
}

#[test]
fn masked_radii_only_touch_selected_corners() {
    let mask = CornerMask {
        top_left: true,
        top_right: false,
        bottom_right: true,
        bottom_left: false,
    };
    assert_eq!(
        CornerRadii::masked(8.0, mask),
        CornerRadii::new(8.0, 0.0, 8.0, 0.0)
    );
    assert_eq!(CornerRadii::masked(8.0, CornerMask::ALL), CornerRadii::uniform(8.0));
}

#[test]
fn default_params_are_leaf_and_inactive() {
    let params = RoundingParams::default();
    assert!(params.is_leaf());
    assert!(!Rounding::new(params).is_active());
}

#[test]
fn overlay_color_switches_method() {
    let params = RoundingParams::as_circle().with_overlay_color(Rgba8Premul::WHITE);
    assert!(params.is_overlay());
    assert!(params.round_as_circle);
}

#[test]
fn validate_rejects_negative_radius() {
    let params = RoundingParams::from_corners_radius(-1.0);
    assert!(params.validate().is_err());
    assert!(RoundingParams::from_corners_radius(4.0).validate().is_ok());
}

#[test]
fn params_deserialize_with_defaults() {
    let params: RoundingParams =
        serde_json::from_str(r#"{"round_as_circle":true,"border_width":2.0}"#).unwrap();
    assert!(params.round_as_circle);
    assert_eq!(params.method, RoundingMethod::LeafClip);
    assert_eq!(params.border_width, 2.0);
}

#[test]
fn reset_clears_radii_and_keeps_method() {
    let mut rounding = Rounding::new(
        RoundingParams::from_corners_radius(5.0).with_overlay_color(Rgba8Premul::WHITE),
    );
    rounding.reset();
    assert!(!rounding.is_active());
    assert!(rounding.params().is_overlay());
}

#[test]
fn leaf_wrapper_clips_child_and_strokes_border() {
    let params = RoundingParams::from_corners_radius(10.0).with_border(Rgba8Premul::WHITE, 2.0);
    let mut w = RoundingWrapper::new(Some(leaf()), params);
    w.set_bounds(BOUNDS);
    let mut list = DisplayList::new();
    w.draw(&mut list);
    assert_eq!(list.clip_count(), 1);
    assert!(matches!(list.ops().last(), Some(DrawOp::Stroke { width, .. }) if *width == 2.0));
}

#[test]
fn inactive_leaf_wrapper_draws_child_unclipped() {
    let mut w = RoundingWrapper::new(Some(leaf()), RoundingParams::default());
    w.set_bounds(BOUNDS);
    let mut list = DisplayList::new();
    w.draw(&mut list);
    assert_eq!(list.clip_count(), 0);
    assert_eq!(list.fill_colors(), vec![Rgba8Premul::WHITE]);
}

#[test]
fn overlay_paints_ring_after_content() {
    let black = Rgba8Premul::from_straight_rgba(0, 0, 0, 255);
    let rounding = Rounding::new(RoundingParams::as_circle().with_overlay_color(black));
    let mut list = DisplayList::new();
    let mut content = leaf();
    content.set_bounds(BOUNDS);
    rounding.draw_with_overlay(&mut list, BOUNDS, 1.0, |canvas| content.draw(canvas));
    assert_eq!(list.fill_colors(), vec![Rgba8Premul::WHITE, black]);
    assert!(matches!(
        list.ops().last(),
        Some(DrawOp::Fill { rule: FillRule::EvenOdd, .. })
    ));
}

#[test]
fn circle_path_is_inscribed_in_padded_bounds() {
    let rounding = Rounding::new(RoundingParams::as_circle().with_padding(10.0));
    let bbox = rounding.shape_path(Rect::new(0.0, 0.0, 100.0, 60.0)).bounding_box();
    assert!((bbox.width() - 40.0).abs() < 0.5);
    assert!((bbox.center().x - 50.0).abs() < 0.5);
}

#[test]
fn set_child_lays_out_new_child_at_wrapper_bounds() {
    let mut w = RoundingWrapper::new(None, RoundingParams::default());
    w.set_bounds(BOUNDS);
    assert!(w.set_child(Some(leaf())).is_none());
    assert_eq!(w.child().map(Node::bounds), Some(BOUNDS));
}
