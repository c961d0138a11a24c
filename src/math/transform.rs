use super::vec2::Vec2;

/// A rotation followed by a translation, with the sine and cosine of the
/// angle computed once up front so it can be applied to many vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub sin: f64,
    pub cos: f64,
}

impl Transform {
    /// Creates a transform for the given pose.
    pub fn new(position: Vec2, angle: f64) -> Self {
        Self {
            position,
            sin: angle.sin(),
            cos: angle.cos(),
        }
    }

    /// Creates an identity transform (no translation, no rotation).
    pub fn identity() -> Self {
        Self::new(Vec2::ZERO, 0.0)
    }

    /// Applies the transform (rotation then translation) to a point.
    pub fn apply(self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.cos * point.x - self.sin * point.y + self.position.x,
            self.sin * point.x + self.cos * point.y + self.position.y,
        )
    }
}
