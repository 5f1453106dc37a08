pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    pub fn transparent() -> Self {
        Self::TRANSPARENT
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: mul_div255(r, a),
            g: mul_div255(g, a),
            b: mul_div255(b, a),
            a,
        }
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Scales all channels by `opacity` (clamped to `[0, 1]`).
    pub fn with_opacity(self, opacity: f64) -> Self {
        let op = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: mul_div255(self.r, op),
            g: mul_div255(self.g, op),
            b: mul_div255(self.b, op),
            a: mul_div255(self.a, op),
        }
    }
}

/// Color filter a drawable applies to its own output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFilter {
    /// Paint the filter color over the content, keeping the content's coverage.
    SrcAtop(Rgba8Premul),
    /// Channel-wise multiply with the filter color.
    Multiply(Rgba8Premul),
}

impl ColorFilter {
    pub fn apply(self, c: Rgba8Premul) -> Rgba8Premul {
        match self {
            Self::SrcAtop(f) => {
                let inv = 255 - f.a;
                Rgba8Premul {
                    r: mul_div255(f.r, c.a).saturating_add(mul_div255(c.r, inv)),
                    g: mul_div255(f.g, c.a).saturating_add(mul_div255(c.g, inv)),
                    b: mul_div255(f.b, c.a).saturating_add(mul_div255(c.b, inv)),
                    a: c.a,
                }
            }
            Self::Multiply(f) => Rgba8Premul {
                r: mul_div255(c.r, f.r),
                g: mul_div255(c.g, f.g),
                b: mul_div255(c.b, f.b),
                a: mul_div255(c.a, f.a),
            },
        }
    }
}

/// Focus point in normalized child coordinates; `(0.5, 0.5)` is the center.
pub const CENTER_FOCUS: Point = Point::new(0.5, 0.5);

pub(crate) fn is_finite_point(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

fn mul_div255(x: u8, y: u8) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
