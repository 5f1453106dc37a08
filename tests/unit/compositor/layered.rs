use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    chain::{
        node::NodeKind,
        scale_type::{ScaleType, ScaleTypeWrapper},
    },
    drawable::{canvas::DisplayList, content::ColorDrawable},
    foundation::core::Rgba8Premul,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn color(r: u8) -> Rgba8Premul {
    Rgba8Premul::from_straight_rgba(r, 0, 0, 255)
}

fn leaf(r: u8) -> Link {
    Some(Node::leaf(ColorDrawable::new(color(r))))
}

fn three_layers() -> LayeredCompositor {
    let mut c = LayeredCompositor::new(vec![leaf(1), leaf(2), leaf(3)]);
    c.set_bounds(Rect::new(0.0, 0.0, 10.0, 10.0));
    c.set_transition_duration(ms(100));
    c
}

fn states(c: &LayeredCompositor) -> Vec<FadeState> {
    c.layers().map(LayerSlot::state).collect()
}

struct Recorder(Rc<RefCell<Vec<&'static str>>>);

impl FadeListener for Recorder {
    fn on_fade_started(&mut self) {
        self.0.borrow_mut().push("started");
    }

    fn on_fade_finished(&mut self) {
        self.0.borrow_mut().push("finished");
    }

    fn on_shown_immediately(&mut self) {
        self.0.borrow_mut().push("shown");
    }
}

#[test]
fn out_of_range_index_is_rejected() {
    let mut c = three_layers();
    assert!(c.fade_in_layer(3).unwrap_err().is_out_of_range());
    assert!(c.fade_out_layer(7).unwrap_err().is_out_of_range());
    assert!(c.set_drawable(3, None).unwrap_err().is_out_of_range());
    assert!(c.layer(3).is_err());
    assert_eq!(states(&c), vec![FadeState::Hidden; 3]);
}

#[test]
fn fade_in_animates_over_duration() {
    let mut c = three_layers();
    c.fade_in_layer(1).unwrap();
    assert!(c.tick(ms(0)));
    assert!(c.tick(ms(50)));
    assert!((c.layer(1).unwrap().alpha() - 0.5).abs() < 1e-9);
    assert!(!c.tick(ms(100)));
    assert_eq!(
        states(&c),
        vec![FadeState::Hidden, FadeState::Visible, FadeState::Hidden]
    );
}

#[test]
fn batch_applies_requests_together() {
    let mut c = three_layers();
    c.fade_in_layer(0).unwrap();
    c.finish_transition_immediately();

    c.begin_batch_mode();
    c.fade_out_layer(0).unwrap();
    c.fade_in_layer(1).unwrap();
    assert_eq!(
        states(&c),
        vec![FadeState::Visible, FadeState::Hidden, FadeState::Hidden]
    );
    c.end_batch_mode();
    assert_eq!(
        states(&c),
        vec![FadeState::FadingOut, FadeState::FadingIn, FadeState::Hidden]
    );

    c.tick(ms(0));
    for t in [25, 50, 75] {
        c.tick(ms(t));
        let a0 = c.layer(0).unwrap().alpha();
        let a1 = c.layer(1).unwrap().alpha();
        assert!((a0 + a1 - 1.0).abs() < 1e-9);
    }
}

#[test]
fn nested_batches_apply_at_outermost_end() {
    let mut c = three_layers();
    c.begin_batch_mode();
    c.begin_batch_mode();
    c.fade_in_layer(2).unwrap();
    c.end_batch_mode();
    assert!(c.is_batching());
    assert_eq!(c.layer(2).unwrap().state(), FadeState::Hidden);
    c.end_batch_mode();
    assert_eq!(c.layer(2).unwrap().state(), FadeState::FadingIn);
}

#[test]
fn finish_inside_batch_collapses_queued_requests() {
    let mut c = three_layers();
    c.begin_batch_mode();
    c.fade_in_layer(1).unwrap();
    c.finish_transition_immediately();
    c.end_batch_mode();
    assert_eq!(c.layer(1).unwrap().alpha(), 1.0);
    assert!(!c.is_transitioning());
}

#[test]
fn fade_to_and_up_to_layer() {
    let mut c = three_layers();
    c.fade_to_layer(1).unwrap();
    c.finish_transition_immediately();
    assert_eq!(
        states(&c),
        vec![FadeState::Hidden, FadeState::Visible, FadeState::Hidden]
    );
    c.fade_up_to_layer(1).unwrap();
    c.finish_transition_immediately();
    assert_eq!(
        states(&c),
        vec![FadeState::Visible, FadeState::Visible, FadeState::Hidden]
    );
    c.fade_in_all_layers();
    c.finish_transition_immediately();
    assert_eq!(states(&c), vec![FadeState::Visible; 3]);
    c.fade_out_all_layers();
    c.finish_transition_immediately();
    assert_eq!(states(&c), vec![FadeState::Hidden; 3]);
}

#[test]
fn duration_change_does_not_touch_in_flight_fade() {
    let mut c = three_layers();
    c.fade_in_layer(0).unwrap();
    c.set_transition_duration(ms(1000));
    c.tick(ms(0));
    assert!(!c.tick(ms(100)));
    assert_eq!(c.layer(0).unwrap().state(), FadeState::Visible);
    assert_eq!(c.transition_duration(), ms(1000));
}

#[test]
fn batched_fade_keeps_duration_from_request_time() {
    let mut c = three_layers();
    c.begin_batch_mode();
    c.fade_in_layer(0).unwrap();
    c.set_transition_duration(ms(1000));
    c.end_batch_mode();
    c.tick(ms(0));
    assert!(!c.tick(ms(100)));
    assert_eq!(c.layer(0).unwrap().state(), FadeState::Visible);
    assert_eq!(c.layer(0).unwrap().alpha(), 1.0);
}

#[test]
fn draws_visible_layers_in_index_order() {
    let mut c = three_layers();
    c.fade_in_layer(2).unwrap();
    c.fade_in_layer(0).unwrap();
    c.finish_transition_immediately();
    let mut list = DisplayList::new();
    c.draw(&mut list);
    assert_eq!(list.fill_colors(), vec![color(1), color(3)]);
}

#[test]
fn layer_alpha_reaches_content() {
    let mut c = three_layers();
    c.fade_in_layer(0).unwrap();
    c.tick(ms(0));
    c.tick(ms(50));
    let mut list = DisplayList::new();
    c.draw(&mut list);
    assert_eq!(list.fill_colors(), vec![color(1).with_opacity(0.5)]);
}

#[test]
fn set_drawable_none_clears_slot_and_its_scale_type() {
    let mut c = three_layers();
    let wrapped = ScaleTypeWrapper::new(leaf(9), ScaleType::CenterCrop);
    c.set_drawable(1, Some(Node::ScaleType(Box::new(wrapped))))
        .unwrap();
    assert_eq!(
        c.drawable(1).unwrap().map(Node::chain_kinds),
        Some(vec![NodeKind::ScaleType, NodeKind::Leaf])
    );
    let old = c.set_drawable(1, None).unwrap();
    assert!(old.is_some());
    assert!(c.layer(1).unwrap().is_empty());
}

#[test]
fn new_content_takes_slot_bounds() {
    let mut c = three_layers();
    c.set_drawable(0, leaf(4)).unwrap();
    assert_eq!(
        c.drawable(0).unwrap().map(Node::bounds),
        Some(Rect::new(0.0, 0.0, 10.0, 10.0))
    );
}

#[test]
fn listener_sees_observed_layer_fade() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut c = three_layers().with_observed_layer(1);
    c.set_fade_listener(Some(Box::new(Recorder(events.clone()))));

    c.fade_in_layer(0).unwrap();
    c.tick(ms(0));
    c.tick(ms(100));
    assert!(events.borrow().is_empty());

    c.fade_in_layer(1).unwrap();
    c.tick(ms(200));
    c.tick(ms(300));
    assert_eq!(*events.borrow(), vec!["started", "finished"]);

    c.fade_out_layer(1).unwrap();
    c.finish_transition_immediately();
    c.fade_in_layer(1).unwrap();
    c.finish_transition_immediately();
    assert_eq!(*events.borrow(), vec!["started", "finished", "shown"]);
}
