use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn starts_hidden_and_settled() {
    let fade = LayerFade::hidden();
    assert_eq!(fade.state(), FadeState::Hidden);
    assert_eq!(fade.alpha(), 0.0);
    assert!(!fade.is_animating());
}

#[test]
fn request_waits_for_first_tick() {
    let mut fade = LayerFade::hidden();
    fade.request(true, ms(100));
    assert_eq!(fade.state(), FadeState::FadingIn);
    assert!(fade.is_pending());

    assert!(fade.tick(ms(1000), FadeCurve::Linear));
    assert_eq!(fade.alpha(), 0.0);
    assert!(fade.tick(ms(1050), FadeCurve::Linear));
    assert!((fade.alpha() - 0.5).abs() < 1e-9);
    assert!(!fade.tick(ms(1100), FadeCurve::Linear));
    assert_eq!(fade.state(), FadeState::Visible);
}

#[test]
fn fade_out_runs_from_current_alpha() {
    let mut fade = LayerFade::hidden();
    fade.request(true, ms(100));
    fade.tick(ms(0), FadeCurve::Linear);
    fade.tick(ms(40), FadeCurve::Linear);
    fade.request(false, ms(100));
    assert_eq!(fade.state(), FadeState::FadingOut);
    fade.tick(ms(40), FadeCurve::Linear);
    fade.tick(ms(90), FadeCurve::Linear);
    assert!((fade.alpha() - 0.2).abs() < 1e-9);
}

#[test]
fn finish_jumps_to_target() {
    let mut fade = LayerFade::hidden();
    fade.request(true, ms(300));
    fade.finish();
    assert_eq!(fade.state(), FadeState::Visible);
    assert!(!fade.is_animating());
    assert!(!fade.tick(ms(5), FadeCurve::Linear));
}

#[test]
fn zero_duration_completes_on_first_tick() {
    let mut fade = LayerFade::hidden();
    fade.request(true, Duration::ZERO);
    assert!(!fade.tick(ms(0), FadeCurve::EaseInOut));
    assert_eq!(fade.alpha(), 1.0);
}

#[test]
fn repeated_request_restarts_clock_without_changing_state() {
    let mut fade = LayerFade::hidden();
    fade.request(true, ms(100));
    fade.finish();
    fade.request(true, ms(100));
    assert_eq!(fade.state(), FadeState::Visible);
    assert!(fade.is_animating());
    assert!(fade.tick(ms(0), FadeCurve::Linear));
    assert_eq!(fade.alpha(), 1.0);
    assert!(!fade.tick(ms(100), FadeCurve::Linear));
}

#[test]
fn curve_shapes_intermediate_alpha() {
    let mut fade = LayerFade::hidden();
    fade.request(true, ms(100));
    fade.tick(ms(0), FadeCurve::EaseIn);
    fade.tick(ms(50), FadeCurve::EaseIn);
    assert!((fade.alpha() - 0.25).abs() < 1e-9);
}
