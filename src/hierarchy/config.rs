use std::time::Duration;

use crate::{
    animation::curve::FadeCurve,
    chain::{rounding::RoundingParams, scale_type::ScaleType},
    foundation::core::{Affine, ColorFilter, Point, is_finite_point},
    foundation::error::{DraweeError, DraweeResult},
};

pub const DEFAULT_FADE_DURATION_MS: u64 = 300;
pub const DEFAULT_BRANCH_SCALE_TYPE: ScaleType = ScaleType::CenterInside;
pub const DEFAULT_ACTUAL_IMAGE_SCALE_TYPE: ScaleType = ScaleType::CenterCrop;

/// Display metrics the hierarchy was built for.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Resources {
    /// Device pixels per density-independent unit.
    pub density: f64,
}

impl Default for Resources {
    fn default() -> Self {
        Self { density: 1.0 }
    }
}

impl Resources {
    pub fn to_px(&self, dp: f64) -> f64 {
        dp * self.density
    }
}

/// Scale type and focus point of one branch layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BranchOptions {
    /// `None` attaches content without any scale-type decorator.
    pub scale_type: Option<ScaleType>,
    pub focus_point: Option<Point>,
}

impl Default for BranchOptions {
    fn default() -> Self {
        Self {
            scale_type: Some(DEFAULT_BRANCH_SCALE_TYPE),
            focus_point: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ActualImageOptions {
    pub scale_type: Option<ScaleType>,
    pub focus_point: Option<Point>,
    pub matrix: Option<Affine>,
    pub color_filter: Option<ColorFilter>,
}

impl Default for ActualImageOptions {
    fn default() -> Self {
        Self {
            scale_type: Some(DEFAULT_ACTUAL_IMAGE_SCALE_TYPE),
            focus_point: None,
            matrix: None,
            color_filter: None,
        }
    }
}

/// Serializable part of a hierarchy configuration. Content drawables are handed to
/// [`crate::HierarchyBuilder`] separately.
///
/// Rounding lengths here are density-independent and are scaled by
/// [`Resources::density`] when the hierarchy is built.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HierarchyOptions {
    pub resources: Resources,
    pub fade_duration_ms: u64,
    pub fade_curve: FadeCurve,
    pub placeholder: BranchOptions,
    pub retry: BranchOptions,
    pub failure: BranchOptions,
    pub progress_bar: BranchOptions,
    pub actual_image: ActualImageOptions,
    pub rounding: Option<RoundingParams>,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self {
            resources: Resources::default(),
            fade_duration_ms: DEFAULT_FADE_DURATION_MS,
            fade_curve: FadeCurve::Linear,
            placeholder: BranchOptions::default(),
            retry: BranchOptions::default(),
            failure: BranchOptions::default(),
            progress_bar: BranchOptions::default(),
            actual_image: ActualImageOptions::default(),
            rounding: None,
        }
    }
}

impl HierarchyOptions {
    pub fn from_json_str(s: &str) -> DraweeResult<Self> {
        let options: Self = serde_json::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    /// Rounding with lengths converted to pixels.
    pub fn rounding_px(&self) -> Option<RoundingParams> {
        let density = self.resources.density;
        self.rounding.clone().map(|mut r| {
            r.corners_radii.top_left *= density;
            r.corners_radii.top_right *= density;
            r.corners_radii.bottom_right *= density;
            r.corners_radii.bottom_left *= density;
            r.border_width *= density;
            r.padding *= density;
            r
        })
    }

    pub fn validate(&self) -> DraweeResult<()> {
        let density = self.resources.density;
        if !density.is_finite() || density <= 0.0 {
            return Err(DraweeError::validation(
                "resources density must be finite and > 0",
            ));
        }
        let branches = [
            ("placeholder", self.placeholder.focus_point),
            ("retry", self.retry.focus_point),
            ("failure", self.failure.focus_point),
            ("progress_bar", self.progress_bar.focus_point),
            ("actual_image", self.actual_image.focus_point),
        ];
        for (name, focus) in branches {
            if let Some(p) = focus
                && !is_finite_point(p)
            {
                return Err(DraweeError::validation(format!(
                    "{name} focus point must be finite"
                )));
            }
        }
        if let Some(m) = self.actual_image.matrix
            && !m.is_finite()
        {
            return Err(DraweeError::validation(
                "actual_image matrix must be finite",
            ));
        }
        if let Some(r) = &self.rounding {
            r.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hierarchy/config.rs"]
mod tests;
