use std::time::Duration;

use crate::{
    animation::curve::FadeCurve,
    chain::{
        forwarding::ForwardingWrapper,
        node::{DrawableParent, Link, Node},
        rounding::RoundingParams,
        scale_type::{ScaleType, ScaleTypeWrapper},
        wrapping::{
            maybe_apply_leaf_rounding, maybe_wrap_with_matrix, maybe_wrap_with_scale_type,
            update_leaf_rounding,
        },
    },
    compositor::{
        fade::{FadeListener, FadeState},
        layered::LayeredCompositor,
        parent,
    },
    drawable::{canvas::Canvas, content::Drawable},
    foundation::core::{ColorFilter, Point, Rect, is_finite_point},
    foundation::error::{DraweeError, DraweeResult},
    hierarchy::{
        builder::HierarchyBuilder,
        config::{BranchOptions, Resources},
        root::RootNode,
        state::HierarchyState,
    },
};

pub const BACKGROUND_IMAGE_INDEX: usize = 0;
pub const PLACEHOLDER_IMAGE_INDEX: usize = 1;
pub const ACTUAL_IMAGE_INDEX: usize = 2;
pub const PROGRESS_BAR_IMAGE_INDEX: usize = 3;
pub const RETRY_IMAGE_INDEX: usize = 4;
pub const FAILURE_IMAGE_INDEX: usize = 5;
pub const OVERLAY_IMAGES_INDEX: usize = 6;

/// Progress at or above this counts as done and hides the progress bar.
const PROGRESS_DONE: f64 = 0.999;

const BRANCHES: [usize; 5] = [
    PLACEHOLDER_IMAGE_INDEX,
    ACTUAL_IMAGE_INDEX,
    PROGRESS_BAR_IMAGE_INDEX,
    RETRY_IMAGE_INDEX,
    FAILURE_IMAGE_INDEX,
];

/// Layered image slot: background, placeholder, actual image, progress bar, retry,
/// failure and overlays, with cross-fades between display states.
///
/// Layer indices are fixed at construction. The actual image is swapped through a
/// forwarding node that never leaves its layer.
#[derive(Debug)]
pub struct GenericHierarchy {
    resources: Resources,
    rounding: Option<RoundingParams>,
    root: RootNode,
    overlay_count: usize,
    pressed_overlay_index: Option<usize>,
    pressed: bool,
    state: HierarchyState,
}

fn leaf(drawable: Option<Box<dyn Drawable>>) -> Link {
    drawable.map(Node::Leaf)
}

fn build_branch(
    drawable: Option<Box<dyn Drawable>>,
    branch: Option<BranchOptions>,
    rounding: Option<&RoundingParams>,
) -> Link {
    let rounded = maybe_apply_leaf_rounding(leaf(drawable), rounding);
    let branch = branch.unwrap_or(BranchOptions {
        scale_type: None,
        focus_point: None,
    });
    maybe_wrap_with_scale_type(rounded, branch.scale_type, branch.focus_point)
}

fn forwarding_in(link: &mut Link) -> Option<&mut ForwardingWrapper> {
    let mut link = link;
    loop {
        link = match *link {
            Some(Node::ScaleType(ref mut w)) => &mut w.child,
            Some(Node::Matrix(ref mut w)) => &mut w.child,
            Some(Node::Forwarding(ref mut w)) => return Some(w.as_mut()),
            _ => return None,
        };
    }
}

fn forwarding_of(node: Option<&Node>) -> Option<&ForwardingWrapper> {
    let mut node = node;
    while let Some(n) = node {
        match n {
            Node::Forwarding(w) => return Some(&**w),
            Node::ScaleType(_) | Node::Matrix(_) => node = n.child(),
            _ => return None,
        }
    }
    None
}

fn missing_forwarding() -> DraweeError {
    DraweeError::precondition("actual image layer has no forwarding node")
}

fn check_focus_point(focus_point: Point) -> DraweeResult<()> {
    if !is_finite_point(focus_point) {
        return Err(DraweeError::precondition("focus point must be finite"));
    }
    Ok(())
}

impl GenericHierarchy {
    #[tracing::instrument(skip(builder))]
    pub(crate) fn new(builder: HierarchyBuilder) -> Self {
        let HierarchyBuilder {
            options,
            background,
            placeholder,
            retry,
            failure,
            progress_bar,
            overlays,
            pressed_state_overlay,
        } = builder;
        let rounding = options.rounding_px();
        let r = rounding.as_ref();

        let mut actual = Node::Forwarding(Box::default());
        if let Some(filter) = options.actual_image.color_filter {
            actual.set_color_filter(Some(filter));
        }
        let actual = maybe_wrap_with_matrix(Some(actual), options.actual_image.matrix);
        let actual = maybe_wrap_with_scale_type(
            actual,
            options.actual_image.scale_type,
            options.actual_image.focus_point,
        );

        let mut layers: Vec<Link> = vec![
            build_branch(background, None, r),
            build_branch(placeholder, Some(options.placeholder), r),
            actual,
            build_branch(progress_bar, Some(options.progress_bar), r),
            build_branch(retry, Some(options.retry), r),
            build_branch(failure, Some(options.failure), r),
        ];
        let overlay_count = overlays.len().max(1);
        if overlays.is_empty() {
            layers.push(None);
        }
        layers.extend(overlays.into_iter().map(|o| build_branch(Some(o), None, r)));
        let pressed_overlay_index = pressed_state_overlay.map(|o| {
            layers.push(build_branch(Some(o), None, r));
            layers.len() - 1
        });

        let mut compositor =
            LayeredCompositor::new(layers).with_observed_layer(ACTUAL_IMAGE_INDEX);
        compositor.set_transition_duration(options.fade_duration());
        compositor.set_fade_curve(options.fade_curve);

        let mut root = RootNode::new(compositor);
        root.update_overlay_rounding(r);

        let mut hierarchy = Self {
            resources: options.resources,
            rounding,
            root,
            overlay_count,
            pressed_overlay_index,
            pressed: false,
            state: HierarchyState::Initial,
        };
        hierarchy.reset_fade();
        tracing::debug!(
            layers = hierarchy.layer_count(),
            overlays = overlay_count,
            "hierarchy built"
        );
        hierarchy
    }

    pub fn builder() -> HierarchyBuilder {
        HierarchyBuilder::new()
    }

    pub fn resources(&self) -> Resources {
        self.resources
    }

    pub fn root(&self) -> &RootNode {
        &self.root
    }

    pub fn compositor(&self) -> &LayeredCompositor {
        self.root.compositor()
    }

    fn compositor_mut(&mut self) -> &mut LayeredCompositor {
        self.root.compositor_mut()
    }

    pub fn layer_count(&self) -> usize {
        self.compositor().layer_count()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlay_count
    }

    pub fn state(&self) -> HierarchyState {
        self.state
    }

    pub fn layer_state(&self, index: usize) -> DraweeResult<FadeState> {
        Ok(self.compositor().layer(index)?.state())
    }

    pub fn layer_alpha(&self, index: usize) -> DraweeResult<f64> {
        Ok(self.compositor().layer(index)?.alpha())
    }

    /// Run `f` inside one fade batch, closing the batch even when `f` fails.
    fn batch(&mut self, f: impl FnOnce(&mut Self) -> DraweeResult<()>) -> DraweeResult<()> {
        self.compositor_mut().begin_batch_mode();
        let result = f(self);
        self.compositor_mut().end_batch_mode();
        result
    }

    fn fade_out_branches(&mut self) -> DraweeResult<()> {
        let compositor = self.compositor_mut();
        for index in BRANCHES {
            compositor.fade_out_layer(index)?;
        }
        Ok(())
    }

    fn apply_pressed(&mut self) -> DraweeResult<()> {
        let (Some(index), pressed) = (self.pressed_overlay_index, self.pressed) else {
            return Ok(());
        };
        if pressed {
            self.compositor_mut().fade_in_layer(index)
        } else {
            self.compositor_mut().fade_out_layer(index)
        }
    }

    fn reset_fade(&mut self) {
        let result = self.batch(|h| {
            h.compositor_mut().fade_in_all_layers();
            h.fade_out_branches()?;
            h.compositor_mut().fade_in_layer(PLACEHOLDER_IMAGE_INDEX)?;
            h.apply_pressed()?;
            h.compositor_mut().finish_transition_immediately();
            Ok(())
        });
        if let Err(err) = result {
            tracing::warn!(%err, "fade reset incomplete");
        }
    }

    fn forwarding_mut(&mut self) -> DraweeResult<&mut ForwardingWrapper> {
        let slot = self.compositor_mut().layer_mut(ACTUAL_IMAGE_INDEX)?;
        forwarding_in(&mut slot.content).ok_or_else(missing_forwarding)
    }

    /// Point the forwarding node at `image` and re-lay out the layer, since scale type
    /// and matrix depend on the new target's intrinsic size.
    fn set_actual_image(&mut self, image: Link) -> DraweeResult<()> {
        let slot = self.compositor_mut().layer_mut(ACTUAL_IMAGE_INDEX)?;
        forwarding_in(&mut slot.content)
            .ok_or_else(missing_forwarding)?
            .set_child(image);
        slot.relayout();
        Ok(())
    }

    fn forwarding(&self) -> Option<&ForwardingWrapper> {
        let slot = self.compositor().layer(ACTUAL_IMAGE_INDEX).ok()?;
        forwarding_of(slot.content())
    }

    /// Back to the initial state: no image, placeholder shown, no animation.
    #[tracing::instrument(skip(self))]
    pub fn reset(&mut self) -> DraweeResult<()> {
        self.set_actual_image(None)?;
        self.reset_fade();
        self.state = HierarchyState::Initial;
        Ok(())
    }

    /// Show `drawable` as the actual image, fading out every branch.
    #[tracing::instrument(skip(self, drawable))]
    pub fn set_image(
        &mut self,
        drawable: Box<dyn Drawable>,
        progress: f64,
        immediate: bool,
    ) -> DraweeResult<()> {
        if !progress.is_finite() {
            return Err(DraweeError::precondition("progress must be finite"));
        }
        let image = maybe_apply_leaf_rounding(Some(Node::Leaf(drawable)), self.rounding.as_ref());
        self.set_actual_image(image)?;
        self.batch(|h| {
            h.fade_out_branches()?;
            h.compositor_mut().fade_in_layer(ACTUAL_IMAGE_INDEX)?;
            h.apply_progress(progress)?;
            if immediate {
                h.compositor_mut().finish_transition_immediately();
            }
            Ok(())
        })?;
        self.state = HierarchyState::ImageSet;
        tracing::debug!(state = self.state.as_str(), "hierarchy state changed");
        Ok(())
    }

    /// Shows the progress bar while `progress` is below completion.
    pub fn set_progress(&mut self, progress: f64, immediate: bool) -> DraweeResult<()> {
        if !progress.is_finite() {
            return Err(DraweeError::precondition("progress must be finite"));
        }
        if self.compositor().drawable(PROGRESS_BAR_IMAGE_INDEX)?.is_none() {
            return Ok(());
        }
        self.batch(|h| {
            h.apply_progress(progress)?;
            if immediate {
                h.compositor_mut().finish_transition_immediately();
            }
            Ok(())
        })
    }

    fn apply_progress(&mut self, progress: f64) -> DraweeResult<()> {
        let compositor = self.compositor_mut();
        let Some(node) = compositor.layer_mut(PROGRESS_BAR_IMAGE_INDEX)?.content.as_mut() else {
            return Ok(());
        };
        let level = (progress.clamp(0.0, 1.0) * 10_000.0).round() as u32;
        node.set_level(level);
        if progress >= PROGRESS_DONE {
            compositor.fade_out_layer(PROGRESS_BAR_IMAGE_INDEX)
        } else {
            compositor.fade_in_layer(PROGRESS_BAR_IMAGE_INDEX)
        }
    }

    /// Show the failure image, or the placeholder when none is configured.
    pub fn set_failure(&mut self) -> DraweeResult<()> {
        self.show_branch_or_placeholder(FAILURE_IMAGE_INDEX)?;
        self.state = HierarchyState::Failure;
        tracing::debug!(state = self.state.as_str(), "hierarchy state changed");
        Ok(())
    }

    /// Show the retry image, or the placeholder when none is configured.
    pub fn set_retry(&mut self) -> DraweeResult<()> {
        self.show_branch_or_placeholder(RETRY_IMAGE_INDEX)?;
        self.state = HierarchyState::Retry;
        tracing::debug!(state = self.state.as_str(), "hierarchy state changed");
        Ok(())
    }

    fn show_branch_or_placeholder(&mut self, index: usize) -> DraweeResult<()> {
        let shown = if self.compositor().drawable(index)?.is_some() {
            index
        } else {
            PLACEHOLDER_IMAGE_INDEX
        };
        self.batch(|h| {
            h.fade_out_branches()?;
            h.compositor_mut().fade_in_layer(shown)
        })
    }

    /// Drawn above every layer, outside composite rounding.
    pub fn set_controller_overlay(&mut self, overlay: Option<Box<dyn Drawable>>) {
        self.root.set_controller_overlay(overlay);
    }

    pub fn bounds(&self) -> Rect {
        self.root.bounds()
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.root.set_bounds(bounds);
    }

    /// Advance fades to `now`; returns whether anything is still animating.
    pub fn tick(&mut self, now: Duration) -> bool {
        self.compositor_mut().tick(now)
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.root.draw(canvas);
    }

    pub fn fade_duration(&self) -> Duration {
        self.compositor().transition_duration()
    }

    pub fn set_fade_duration(&mut self, duration: Duration) {
        self.compositor_mut().set_transition_duration(duration);
    }

    pub fn fade_curve(&self) -> FadeCurve {
        self.compositor().fade_curve()
    }

    pub fn set_fade_curve(&mut self, curve: FadeCurve) {
        self.compositor_mut().set_fade_curve(curve);
    }

    pub fn set_fade_listener(&mut self, listener: Option<Box<dyn FadeListener>>) {
        self.compositor_mut().set_fade_listener(listener);
    }

    /// Scale-type decorator of layer `index`, created with `FitXy` if missing.
    fn scale_type_wrapper_at(&mut self, index: usize) -> DraweeResult<&mut ScaleTypeWrapper> {
        let slot = self.compositor_mut().layer_mut(index)?;
        if !parent::has_scale_type(slot) {
            parent::locate(slot).wrap_child_with_scale_type(ScaleType::FitXy)?;
        }
        parent::find_scale_type(slot)
            .ok_or_else(|| DraweeError::precondition(format!("layer {index} has no scale type")))
    }

    fn scale_type_wrapper_of(&self, index: usize) -> Option<&ScaleTypeWrapper> {
        let slot = self.compositor().layer(index).ok()?;
        parent::scale_type_of(slot)
    }

    pub fn has_scale_type_at(&self, index: usize) -> DraweeResult<bool> {
        Ok(parent::has_scale_type(self.compositor().layer(index)?))
    }

    pub fn set_actual_image_scale_type(&mut self, scale_type: ScaleType) -> DraweeResult<()> {
        self.scale_type_wrapper_at(ACTUAL_IMAGE_INDEX)?
            .set_scale_type(scale_type);
        Ok(())
    }

    /// `None` when the actual image is attached without a scale type.
    pub fn actual_image_scale_type(&self) -> Option<ScaleType> {
        self.scale_type_wrapper_of(ACTUAL_IMAGE_INDEX)
            .map(ScaleTypeWrapper::scale_type)
    }

    pub fn set_actual_image_focus_point(&mut self, focus_point: Point) -> DraweeResult<()> {
        check_focus_point(focus_point)?;
        self.scale_type_wrapper_at(ACTUAL_IMAGE_INDEX)?
            .set_focus_point(focus_point);
        Ok(())
    }

    pub fn actual_image_focus_point(&self) -> Option<Point> {
        self.scale_type_wrapper_of(ACTUAL_IMAGE_INDEX)
            .map(ScaleTypeWrapper::focus_point)
    }

    pub fn set_actual_image_color_filter(
        &mut self,
        filter: Option<ColorFilter>,
    ) -> DraweeResult<()> {
        self.forwarding_mut()?.set_color_filter(filter);
        Ok(())
    }

    /// Where the actual image lands inside the hierarchy bounds, after scale type and
    /// matrix. `None` without an image.
    pub fn actual_image_bounds(&self) -> Option<Rect> {
        self.compositor()
            .layer(ACTUAL_IMAGE_INDEX)
            .ok()?
            .content()?
            .transformed_leaf_bounds()
    }

    pub fn has_image(&self) -> bool {
        self.forwarding().is_some_and(ForwardingWrapper::has_target)
    }

    /// Replace the content of a layer, keeping its decorators. `None` clears the layer
    /// and any decorators with it.
    fn set_child_at(
        &mut self,
        index: usize,
        drawable: Option<Box<dyn Drawable>>,
    ) -> DraweeResult<()> {
        let Some(drawable) = drawable else {
            self.compositor_mut().set_drawable(index, None)?;
            return Ok(());
        };
        let content = maybe_apply_leaf_rounding(Some(Node::Leaf(drawable)), self.rounding.as_ref());
        self.compositor_mut().locate_parent(index)?.set_child(content);
        Ok(())
    }

    fn set_child_with_scale_type_at(
        &mut self,
        index: usize,
        drawable: Box<dyn Drawable>,
        scale_type: ScaleType,
    ) -> DraweeResult<()> {
        self.set_child_at(index, Some(drawable))?;
        self.scale_type_wrapper_at(index)?.set_scale_type(scale_type);
        Ok(())
    }

    pub fn set_background_image(
        &mut self,
        drawable: Option<Box<dyn Drawable>>,
    ) -> DraweeResult<()> {
        self.set_child_at(BACKGROUND_IMAGE_INDEX, drawable)
    }

    pub fn set_background_image_with_scale_type(
        &mut self,
        drawable: Box<dyn Drawable>,
        scale_type: ScaleType,
    ) -> DraweeResult<()> {
        self.set_child_with_scale_type_at(BACKGROUND_IMAGE_INDEX, drawable, scale_type)
    }

    pub fn set_placeholder_image(
        &mut self,
        drawable: Option<Box<dyn Drawable>>,
    ) -> DraweeResult<()> {
        self.set_child_at(PLACEHOLDER_IMAGE_INDEX, drawable)
    }

    pub fn set_placeholder_image_with_scale_type(
        &mut self,
        drawable: Box<dyn Drawable>,
        scale_type: ScaleType,
    ) -> DraweeResult<()> {
        self.set_child_with_scale_type_at(PLACEHOLDER_IMAGE_INDEX, drawable, scale_type)
    }

    pub fn set_placeholder_focus_point(&mut self, focus_point: Point) -> DraweeResult<()> {
        check_focus_point(focus_point)?;
        self.scale_type_wrapper_at(PLACEHOLDER_IMAGE_INDEX)?
            .set_focus_point(focus_point);
        Ok(())
    }

    pub fn has_placeholder_image(&self) -> bool {
        matches!(
            self.compositor().drawable(PLACEHOLDER_IMAGE_INDEX),
            Ok(Some(_))
        )
    }

    pub fn set_failure_image(&mut self, drawable: Option<Box<dyn Drawable>>) -> DraweeResult<()> {
        self.set_child_at(FAILURE_IMAGE_INDEX, drawable)
    }

    pub fn set_failure_image_with_scale_type(
        &mut self,
        drawable: Box<dyn Drawable>,
        scale_type: ScaleType,
    ) -> DraweeResult<()> {
        self.set_child_with_scale_type_at(FAILURE_IMAGE_INDEX, drawable, scale_type)
    }

    pub fn set_retry_image(&mut self, drawable: Option<Box<dyn Drawable>>) -> DraweeResult<()> {
        self.set_child_at(RETRY_IMAGE_INDEX, drawable)
    }

    pub fn set_retry_image_with_scale_type(
        &mut self,
        drawable: Box<dyn Drawable>,
        scale_type: ScaleType,
    ) -> DraweeResult<()> {
        self.set_child_with_scale_type_at(RETRY_IMAGE_INDEX, drawable, scale_type)
    }

    pub fn set_progress_bar_image(
        &mut self,
        drawable: Option<Box<dyn Drawable>>,
    ) -> DraweeResult<()> {
        self.set_child_at(PROGRESS_BAR_IMAGE_INDEX, drawable)
    }

    pub fn set_progress_bar_image_with_scale_type(
        &mut self,
        drawable: Box<dyn Drawable>,
        scale_type: ScaleType,
    ) -> DraweeResult<()> {
        self.set_child_with_scale_type_at(PROGRESS_BAR_IMAGE_INDEX, drawable, scale_type)
    }

    /// Replace overlay `index` (counted from the first overlay). Fails without touching
    /// anything when `index` is not an overlay.
    pub fn set_overlay_image(
        &mut self,
        index: usize,
        drawable: Option<Box<dyn Drawable>>,
    ) -> DraweeResult<()> {
        if index >= self.overlay_count {
            return Err(DraweeError::out_of_range(format!(
                "overlay {index} (overlay count {})",
                self.overlay_count
            )));
        }
        self.set_child_at(OVERLAY_IMAGES_INDEX + index, drawable)
    }

    pub fn set_overlay(&mut self, drawable: Option<Box<dyn Drawable>>) -> DraweeResult<()> {
        self.set_overlay_image(0, drawable)
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Show or hide the pressed-state overlay, without animation.
    pub fn set_pressed(&mut self, pressed: bool) -> DraweeResult<()> {
        let Some(index) = self.pressed_overlay_index else {
            return Ok(());
        };
        self.pressed = pressed;
        self.compositor_mut()
            .set_layer_visible_immediately(index, pressed)?;
        tracing::trace!(index, pressed, "pressed state changed");
        Ok(())
    }

    pub fn rounding_params(&self) -> Option<&RoundingParams> {
        self.rounding.as_ref()
    }

    /// Update composite rounding and every layer's leaf rounding in place.
    #[tracing::instrument(skip(self))]
    pub fn set_rounding_params(&mut self, params: Option<RoundingParams>) -> DraweeResult<()> {
        if let Some(params) = &params {
            params.validate()?;
        }
        self.rounding = params;
        let params = self.rounding.as_ref();
        self.root.update_overlay_rounding(params);
        let compositor = self.root.compositor_mut();
        for index in 0..compositor.layer_count() {
            let mut parent = compositor.locate_parent(index)?;
            update_leaf_rounding(parent.child_link(), params);
            compositor.layer_mut(index)?.relayout();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hierarchy/controller.rs"]
mod tests;
