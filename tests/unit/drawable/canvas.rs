use super::*;
use kurbo::{Rect, Shape};

#[test]
fn transform_is_scoped_by_save_restore() {
    let mut list = DisplayList::new();
    let path = Rect::new(0.0, 0.0, 1.0, 1.0).to_path(0.1);

    list.save();
    list.transform(Affine::translate((5.0, 0.0)));
    list.fill_path(&path, Rgba8Premul::WHITE, FillRule::NonZero);
    list.restore();
    list.fill_path(&path, Rgba8Premul::WHITE, FillRule::NonZero);

    let transforms: Vec<Affine> = list
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Fill { transform, .. } => Some(*transform),
            _ => None,
        })
        .collect();
    assert_eq!(
        transforms,
        vec![Affine::translate((5.0, 0.0)), Affine::IDENTITY]
    );
}

#[test]
fn unbalanced_restore_is_ignored() {
    let mut list = DisplayList::new();
    list.restore();
    assert!(list.is_empty());
}

#[test]
fn clip_count_counts_clips_only() {
    let mut list = DisplayList::new();
    let path = Rect::new(0.0, 0.0, 1.0, 1.0).to_path(0.1);
    list.clip_path(&path);
    list.stroke_path(&path, Rgba8Premul::WHITE, 1.0);
    assert_eq!(list.clip_count(), 1);
    assert!(list.fill_colors().is_empty());
}
