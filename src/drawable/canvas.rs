use crate::foundation::core::{Affine, BezPath, Rgba8Premul};

/// Winding rule used when filling a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// The rendering boundary.
///
/// The hierarchy never rasterizes: it issues state changes and fills against this trait,
/// and drawables render themselves through it. Implementations decide what a "path" and
/// a "clip" become in pixels.
pub trait Canvas {
    /// Push the current transform and clip.
    fn save(&mut self);

    /// Pop back to the most recent [`Canvas::save`].
    fn restore(&mut self);

    /// Post-multiply the current transform.
    fn transform(&mut self, affine: Affine);

    /// Intersect the current clip with `path`.
    fn clip_path(&mut self, path: &BezPath);

    fn fill_path(&mut self, path: &BezPath, color: Rgba8Premul, rule: FillRule);

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8Premul, width: f64);
}

/// Operation recorded by [`DisplayList`], with the transform resolved at record time.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Clip {
        path: BezPath,
        transform: Affine,
    },
    Fill {
        path: BezPath,
        transform: Affine,
        color: Rgba8Premul,
        rule: FillRule,
    },
    Stroke {
        path: BezPath,
        transform: Affine,
        color: Rgba8Premul,
        width: f64,
    },
}

/// Recording [`Canvas`]: the composite of one frame as an ordered op list.
#[derive(Clone, Debug)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
    current: Affine,
    stack: Vec<Affine>,
}

impl Default for DisplayList {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayList {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            current: Affine::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Colors of every fill, in paint order.
    pub fn fill_colors(&self) -> Vec<Rgba8Premul> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    pub fn clip_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Clip { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Canvas for DisplayList {
    fn save(&mut self) {
        self.stack.push(self.current);
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        // Unbalanced restores are ignored, as on most 2D backends.
        if let Some(prev) = self.stack.pop() {
            self.current = prev;
            self.ops.push(DrawOp::Restore);
        }
    }

    fn transform(&mut self, affine: Affine) {
        self.current = self.current * affine;
    }

    fn clip_path(&mut self, path: &BezPath) {
        self.ops.push(DrawOp::Clip {
            path: path.clone(),
            transform: self.current,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8Premul, rule: FillRule) {
        self.ops.push(DrawOp::Fill {
            path: path.clone(),
            transform: self.current,
            color,
            rule,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8Premul, width: f64) {
        self.ops.push(DrawOp::Stroke {
            path: path.clone(),
            transform: self.current,
            color,
            width,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/drawable/canvas.rs"]
mod tests;
