//! Drawee displays one logical image slot as a fixed stack of cross-fading layers.
//!
//! A [`GenericHierarchy`] owns the stack: background, placeholder, actual image,
//! progress bar, retry, failure and overlays, each at a fixed index. Callers drive it
//! with display-state transitions ([`GenericHierarchy::set_image`],
//! [`GenericHierarchy::set_failure`], [`GenericHierarchy::reset`], ...), advance fades
//! with [`GenericHierarchy::tick`], and record frames through the [`Canvas`] trait.
//!
//! # Structure
//!
//! 1. **Content**: anything implementing [`Drawable`]; the hierarchy never inspects it.
//! 2. **Wrapper chains**: each layer holds a [`Node`] chain of decorators around its
//!    content (scale type, matrix, leaf rounding, and the forwarding node of the actual
//!    image). Changing parameters updates decorators in place.
//! 3. **Compositor**: [`LayeredCompositor`] keeps one [`LayerSlot`] per index with its
//!    own fade, batches fade requests, and draws layers bottom to top.
//! 4. **Root**: [`RootNode`] adds composite rounding and the controller overlay.
//!
//! Nothing here rasterizes, decodes or blocks. Time is passed in by the caller.
#![forbid(unsafe_code)]

mod animation;
mod chain;
mod compositor;
mod drawable;
mod foundation;
mod hierarchy;

pub use animation::curve::FadeCurve;
pub use chain::forwarding::ForwardingWrapper;
pub use chain::matrix::MatrixWrapper;
pub use chain::node::{DrawableParent, Link, Node, NodeKind};
pub use chain::rounding::{
    CornerMask, CornerRadii, Rounding, RoundingMethod, RoundingParams, RoundingWrapper,
};
pub use chain::scale_type::{ScaleType, ScaleTypeWrapper};
pub use chain::wrapping::{
    maybe_apply_leaf_rounding, maybe_wrap_with_matrix, maybe_wrap_with_scale_type,
};
pub use compositor::fade::{FadeListener, FadeState};
pub use compositor::layered::{LayerSlot, LayeredCompositor};
pub use compositor::parent::{Parent, ParentKind};
pub use drawable::canvas::{Canvas, DisplayList, DrawOp, FillRule};
pub use drawable::content::{ColorDrawable, Drawable};
pub use foundation::core::{
    Affine, BezPath, CENTER_FOCUS, ColorFilter, Point, Rect, Rgba8Premul, Size, Vec2,
};
pub use foundation::error::{DraweeError, DraweeResult};
pub use hierarchy::builder::HierarchyBuilder;
pub use hierarchy::config::{
    ActualImageOptions, BranchOptions, DEFAULT_ACTUAL_IMAGE_SCALE_TYPE,
    DEFAULT_BRANCH_SCALE_TYPE, DEFAULT_FADE_DURATION_MS, HierarchyOptions, Resources,
};
pub use hierarchy::controller::{
    ACTUAL_IMAGE_INDEX, BACKGROUND_IMAGE_INDEX, FAILURE_IMAGE_INDEX, GenericHierarchy,
    OVERLAY_IMAGES_INDEX, PLACEHOLDER_IMAGE_INDEX, PROGRESS_BAR_IMAGE_INDEX, RETRY_IMAGE_INDEX,
};
pub use hierarchy::root::RootNode;
pub use hierarchy::state::HierarchyState;
