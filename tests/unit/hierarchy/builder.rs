use super::*;
use crate::{
    compositor::fade::FadeState,
    drawable::content::ColorDrawable,
    foundation::core::Rgba8Premul,
    foundation::error::DraweeError,
    hierarchy::controller::{OVERLAY_IMAGES_INDEX, PLACEHOLDER_IMAGE_INDEX},
};

fn white() -> ColorDrawable {
    ColorDrawable::new(Rgba8Premul::WHITE)
}

#[test]
fn default_build_reserves_one_overlay() {
    let h = HierarchyBuilder::new().build().unwrap();
    assert_eq!(h.layer_count(), OVERLAY_IMAGES_INDEX + 1);
    assert_eq!(h.overlay_count(), 1);
    assert_eq!(h.fade_duration(), Duration::from_millis(300));
}

#[test]
fn overlays_and_pressed_overlay_get_their_own_layers() {
    let h = HierarchyBuilder::new()
        .overlay(white())
        .overlay(white())
        .pressed_state_overlay(white())
        .build()
        .unwrap();
    assert_eq!(h.layer_count(), OVERLAY_IMAGES_INDEX + 3);
    assert_eq!(h.overlay_count(), 2);
    assert_eq!(
        h.layer_state(OVERLAY_IMAGES_INDEX + 2).unwrap(),
        FadeState::Hidden
    );
}

#[test]
fn setters_land_in_options() {
    let b = HierarchyBuilder::new()
        .fade_duration(Duration::from_millis(120))
        .fade_curve(FadeCurve::EaseIn)
        .placeholder_scale_type(None)
        .actual_image_scale_type(Some(ScaleType::FitCenter))
        .actual_image_focus_point(Point::new(0.1, 0.9))
        .actual_image_matrix(Affine::scale(2.0))
        .resources(Resources { density: 3.0 });
    let o = b.options();
    assert_eq!(o.fade_duration_ms, 120);
    assert_eq!(o.fade_curve, FadeCurve::EaseIn);
    assert_eq!(o.placeholder.scale_type, None);
    assert_eq!(o.actual_image.scale_type, Some(ScaleType::FitCenter));
    assert_eq!(o.actual_image.focus_point, Some(Point::new(0.1, 0.9)));
    assert_eq!(o.actual_image.matrix, Some(Affine::scale(2.0)));
    assert_eq!(o.resources.density, 3.0);
}

#[test]
fn invalid_options_fail_the_build() {
    let err = HierarchyBuilder::new()
        .rounding_params(RoundingParams::from_corners_radius(f64::NAN))
        .build()
        .unwrap_err();
    assert!(matches!(err, DraweeError::Validation(_)));
}

#[test]
fn placeholder_is_shown_after_build() {
    let h = HierarchyBuilder::new().placeholder(white()).build().unwrap();
    assert!(h.has_placeholder_image());
    assert_eq!(
        h.layer_state(PLACEHOLDER_IMAGE_INDEX).unwrap(),
        FadeState::Visible
    );
}
