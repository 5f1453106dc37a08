use std::time::Duration;

use crate::{
    animation::curve::FadeCurve,
    chain::{rounding::RoundingParams, scale_type::ScaleType},
    drawable::content::Drawable,
    foundation::core::{Affine, ColorFilter, Point},
    foundation::error::DraweeResult,
    hierarchy::{
        config::{HierarchyOptions, Resources},
        controller::GenericHierarchy,
    },
};

/// Fluent configuration of a [`GenericHierarchy`].
///
/// Everything here is consumed once by [`HierarchyBuilder::build`]; later changes go
/// through the hierarchy's own setters.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    pub(crate) options: HierarchyOptions,
    pub(crate) background: Option<Box<dyn Drawable>>,
    pub(crate) placeholder: Option<Box<dyn Drawable>>,
    pub(crate) retry: Option<Box<dyn Drawable>>,
    pub(crate) failure: Option<Box<dyn Drawable>>,
    pub(crate) progress_bar: Option<Box<dyn Drawable>>,
    pub(crate) overlays: Vec<Box<dyn Drawable>>,
    pub(crate) pressed_state_overlay: Option<Box<dyn Drawable>>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: HierarchyOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &HierarchyOptions {
        &self.options
    }

    pub fn resources(mut self, resources: Resources) -> Self {
        self.options.resources = resources;
        self
    }

    pub fn fade_duration(mut self, duration: Duration) -> Self {
        self.options.fade_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn fade_curve(mut self, curve: FadeCurve) -> Self {
        self.options.fade_curve = curve;
        self
    }

    pub fn background(mut self, drawable: impl Drawable + 'static) -> Self {
        self.background = Some(Box::new(drawable));
        self
    }

    pub fn placeholder(mut self, drawable: impl Drawable + 'static) -> Self {
        self.placeholder = Some(Box::new(drawable));
        self
    }

    pub fn placeholder_scale_type(mut self, scale_type: Option<ScaleType>) -> Self {
        self.options.placeholder.scale_type = scale_type;
        self
    }

    pub fn placeholder_focus_point(mut self, focus_point: Point) -> Self {
        self.options.placeholder.focus_point = Some(focus_point);
        self
    }

    pub fn retry(mut self, drawable: impl Drawable + 'static) -> Self {
        self.retry = Some(Box::new(drawable));
        self
    }

    pub fn retry_scale_type(mut self, scale_type: Option<ScaleType>) -> Self {
        self.options.retry.scale_type = scale_type;
        self
    }

    pub fn failure(mut self, drawable: impl Drawable + 'static) -> Self {
        self.failure = Some(Box::new(drawable));
        self
    }

    pub fn failure_scale_type(mut self, scale_type: Option<ScaleType>) -> Self {
        self.options.failure.scale_type = scale_type;
        self
    }

    pub fn progress_bar(mut self, drawable: impl Drawable + 'static) -> Self {
        self.progress_bar = Some(Box::new(drawable));
        self
    }

    pub fn progress_bar_scale_type(mut self, scale_type: Option<ScaleType>) -> Self {
        self.options.progress_bar.scale_type = scale_type;
        self
    }

    pub fn actual_image_scale_type(mut self, scale_type: Option<ScaleType>) -> Self {
        self.options.actual_image.scale_type = scale_type;
        self
    }

    pub fn actual_image_focus_point(mut self, focus_point: Point) -> Self {
        self.options.actual_image.focus_point = Some(focus_point);
        self
    }

    pub fn actual_image_matrix(mut self, matrix: Affine) -> Self {
        self.options.actual_image.matrix = Some(matrix);
        self
    }

    pub fn actual_image_color_filter(mut self, filter: ColorFilter) -> Self {
        self.options.actual_image.color_filter = Some(filter);
        self
    }

    /// Appends one overlay slot holding `drawable`.
    pub fn overlay(mut self, drawable: impl Drawable + 'static) -> Self {
        self.overlays.push(Box::new(drawable));
        self
    }

    pub fn pressed_state_overlay(mut self, drawable: impl Drawable + 'static) -> Self {
        self.pressed_state_overlay = Some(Box::new(drawable));
        self
    }

    /// Lengths in `params` are density-independent, like the rest of the options.
    pub fn rounding_params(mut self, params: RoundingParams) -> Self {
        self.options.rounding = Some(params);
        self
    }

    pub fn build(self) -> DraweeResult<GenericHierarchy> {
        self.options.validate()?;
        Ok(GenericHierarchy::new(self))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hierarchy/builder.rs"]
mod tests;
